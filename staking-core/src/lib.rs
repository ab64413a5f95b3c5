//! # staking-core
//!
//! Core contracts for the staking module composition layer.
//!
//! This crate has minimal dependencies and is meant to be imported by the
//! modules that extend or host staking without pulling in the standard
//! implementations.
//!
//! ## Extension layer ([`StakingHooks`])
//!
//! Other modules observe staking through lifecycle hooks. A provider receives
//! a [`StakingEvent`] and the current [`BlockContext`] and either accepts the
//! event or fails. Providers are composed into one ordered dispatcher by the
//! module wiring.
//!
//! ## Identity layer ([`AddressCodec`])
//!
//! Raw [`Address`] bytes are rendered as strings by codecs. Validator operator
//! and consensus addresses use distinct codec roles
//! ([`ValidatorAddressCodec`], [`ConsensusAddressCodec`]).
//!
//! ## Host layer ([`AppModule`])
//!
//! The lifecycle contract the host drives: service and migration registration,
//! round hooks, genesis import and export. Registration with the host is
//! explicit through [`ModuleRegistry`].
//!
//! # Error Types
//!
//! - [`ConfigurationError`] - fatal wiring errors
//! - [`ModuleError`] - top-level lifecycle error
//! - [`HookError`], [`GenesisError`], [`MigrationError`], [`CodecError`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod address;
mod collaborators;
mod context;
mod error;
mod event;
mod hook;
mod migration;
mod module;
mod registry;
mod store;

// Re-exports
pub use address::{
    ADDRESS_LEN, Address, AddressCodec, ConsensusAddressCodec, MAX_ADDRESS_LEN,
    ValidatorAddressCodec, consensus_address, module_address, verify_address_format,
};
pub use collaborators::{AccountKeeper, BankKeeper, LegacySubspace};
pub use context::{BlockContext, ValidatorUpdate};
pub use error::{
    BoxError, CodecError, ConfigurationError, GenesisError, HookError, MigrationError,
    ModuleError, ServiceError,
};
pub use event::StakingEvent;
pub use hook::{DynStakingHooks, HookFuture, StakingHooks};
pub use migration::{MigrationHandler, MigrationRegistrar};
pub use module::{
    AppModule, Invariant, InvariantOutcome, InvariantRegistry, ServiceHandler, ServiceRegistrar,
};
pub use registry::{ModuleDescriptor, ModuleRegistry};
pub use store::{KvStore, key_hex, length_prefixed, split_length_prefixed};
