//! Error types for the staking module wiring layer.
//!
//! The hierarchy separates failures that abort startup from failures that are
//! passed through from the running module:
//!
//! - [`ConfigurationError`] - self-contradictory wiring, never retried
//! - [`MigrationError`] - registrar rejections and failed store transitions
//! - [`HookError`] - a composite hook member failed while handling an event
//! - [`GenesisError`] - malformed or invalid genesis envelopes
//! - [`CodecError`] - address string/bytes conversion failures
//! - [`ModuleError`] - top-level error returned by the lifecycle contract

use thiserror::Error;

/// A boxed error type for opaque collaborator failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type returned by [`AppModule`](crate::AppModule).
#[derive(Error, Debug)]
pub enum ModuleError {
    /// The module was wired with a contradictory configuration.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A hook member failed.
    #[error("hook error: {0}")]
    Hook(#[from] HookError),

    /// The genesis envelope could not be processed.
    #[error("genesis error: {0}")]
    Genesis(#[from] GenesisError),

    /// A migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] MigrationError),

    /// A service could not be registered with the host.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// An error returned by the core service, passed through unchanged.
    #[error(transparent)]
    Runtime(BoxError),
}

/// Fatal wiring errors.
///
/// Any of these aborts the startup sequence before the module is exposed to
/// callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Only one of the two address codec factories was supplied.
    #[error("either both or none of the validator and consensus address codec factories must be provided")]
    IncompletePair,

    /// A validator or consensus prefix is still empty after derivation.
    #[error(
        "bech32 prefixes for validator and/or consensus addresses must be provided (validator: {validator:?}, consensus: {consensus:?})"
    )]
    MissingPrefix {
        /// Final validator prefix.
        validator: String,
        /// Final consensus prefix.
        consensus: String,
    },

    /// A prefix was supplied but cannot be used as a human-readable part.
    #[error("invalid bech32 prefix {prefix:?}: {reason}")]
    InvalidPrefix {
        /// The rejected prefix.
        prefix: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The hooks order does not name exactly the registered providers.
    #[error("hooks order {order:?} does not match registered hook providers {providers:?}")]
    OrderingMismatch {
        /// The effective order.
        order: Vec<String>,
        /// The sorted provider names.
        providers: Vec<String>,
    },

    /// The hooks order names a provider that was never registered.
    #[error("can't find staking hooks for module {name}")]
    MissingExtension {
        /// The unknown name.
        name: String,
    },

    /// Hooks were already installed on the keeper.
    #[error("staking hooks have already been set")]
    HooksAlreadySet,

    /// The configured authority is not a valid address.
    #[error("malformed authority {authority:?}: {reason}")]
    MalformedAuthority {
        /// The configured value.
        authority: String,
        /// Decoder failure.
        reason: String,
    },

    /// No migration was supplied for a required version.
    #[error("missing migration for x/{module} from version {from} to {to}", to = .from + 1)]
    MissingMigration {
        /// Module name.
        module: String,
        /// Source version.
        from: u64,
    },

    /// A migration was supplied for a version outside `[1, N-1]`.
    #[error("unexpected migration for x/{module} from version {from}")]
    UnexpectedMigration {
        /// Module name.
        module: String,
        /// Source version.
        from: u64,
    },

    /// The host registrar rejected a migration.
    #[error("failed to register migration for x/{module} from version {from}: {source}")]
    MigrationRejected {
        /// Module name.
        module: String,
        /// Source version.
        from: u64,
        /// Registrar error.
        #[source]
        source: MigrationError,
    },

    /// A module with the same name is already registered with the host.
    #[error("module {0} is already registered")]
    DuplicateModule(String),

    /// The configuration document could not be parsed.
    #[error("failed to parse module configuration: {0}")]
    Parse(String),
}

/// Errors raised while registering or running migrations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// A handler for the same `(module, from)` pair already exists.
    #[error("migration for x/{module} from version {from} is already registered")]
    DuplicateRegistration {
        /// Module name.
        module: String,
        /// Source version.
        from: u64,
    },

    /// Versions start at 1.
    #[error("invalid migration version {from} for x/{module}")]
    InvalidVersion {
        /// Module name.
        module: String,
        /// Source version.
        from: u64,
    },

    /// The runner found no handler for a required transition.
    #[error("no migration registered for x/{module} from version {from}")]
    MissingHandler {
        /// Module name.
        module: String,
        /// Source version.
        from: u64,
    },

    /// The stored schema is newer than anything this binary can migrate to.
    #[error("x/{module} schema version {stored} is newer than supported {latest}")]
    UnsupportedVersion {
        /// Module name.
        module: String,
        /// Persisted version marker.
        stored: u64,
        /// Target version of this binary.
        latest: u64,
    },

    /// A stored record could not be decoded or re-encoded.
    #[error("corrupt record at key {key}: {reason}")]
    Corrupt {
        /// Hex-encoded store key.
        key: String,
        /// Decoder failure.
        reason: String,
    },

    /// The legacy parameter subspace held an unusable value.
    #[error("legacy parameter {key}: {reason}")]
    Legacy {
        /// Parameter key.
        key: String,
        /// Why it is unusable.
        reason: String,
    },
}

/// Errors produced by a composite hook dispatcher.
#[derive(Error, Debug)]
pub enum HookError {
    /// A member failed; later members were not invoked.
    #[error("staking hooks `{hook}` failed on {event}: {source}")]
    Failed {
        /// Name of the failing member.
        hook: String,
        /// Name of the event being dispatched.
        event: &'static str,
        /// The member's error.
        #[source]
        source: BoxError,
    },
}

/// Errors raised while importing, exporting or validating genesis.
#[derive(Error, Debug)]
pub enum GenesisError {
    /// The envelope is not a valid encoding of the module's genesis state.
    #[error("failed to unmarshal {module} genesis state: {source}")]
    Decode {
        /// Module name.
        module: String,
        /// Decoder failure.
        #[source]
        source: BoxError,
    },

    /// The state could not be encoded.
    #[error("failed to marshal {module} genesis state: {source}")]
    Encode {
        /// Module name.
        module: String,
        /// Encoder failure.
        #[source]
        source: BoxError,
    },

    /// The envelope decoded but violates a genesis rule.
    #[error("invalid {module} genesis state: {reason}")]
    Invalid {
        /// Module name.
        module: String,
        /// Violated rule.
        reason: String,
    },
}

/// Errors raised by the host's service registrar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// A service with the same name is already registered.
    #[error("service {0} is already registered")]
    Duplicate(String),
}

/// Address string/bytes conversion errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An empty string was given where an address is required.
    #[error("empty address string is not allowed")]
    Empty,

    /// The string is not a valid encoding.
    #[error("decoding address {input:?} failed: {reason}")]
    Decode {
        /// The rejected input.
        input: String,
        /// Decoder failure.
        reason: String,
    },

    /// The string carries another prefix.
    #[error("invalid bech32 prefix: expected {expected}, got {found}")]
    WrongPrefix {
        /// Prefix of this codec.
        expected: String,
        /// Prefix of the input.
        found: String,
    },

    /// The prefix cannot be used as a human-readable part.
    #[error("invalid prefix {prefix:?}: {reason}")]
    InvalidPrefix {
        /// The rejected prefix.
        prefix: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The address has an unsupported byte length.
    #[error("address length {0} is not supported")]
    InvalidLength(usize),

    /// The bytes could not be encoded.
    #[error("encoding address failed: {0}")]
    Encode(String),
}

impl From<BoxError> for ModuleError {
    fn from(err: BoxError) -> Self {
        ModuleError::Runtime(err)
    }
}
