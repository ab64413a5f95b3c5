//! # staking
//!
//! Composition and lifecycle wiring for the staking module.
//!
//! At startup the host:
//!
//! 1. calls [`register`] with its [`ModuleRegistry`],
//! 2. calls [`provide_module`], which resolves the address codecs and builds
//!    the [`Keeper`] and the [`StakingModule`] adapter,
//! 3. calls [`invoke_set_staking_hooks`] with the hook providers of other
//!    modules, which freezes them into one ordered dispatcher on the keeper,
//! 4. registers migrations through [`AppModule::register_migrations`].
//!
//! ```rust,ignore
//! let config = AppConfig::from_toml_str(&text)?;
//! let outputs = provide_module(ModuleInputs::new(
//!     config.staking.clone(),
//!     config.auth,
//!     store,
//!     account_keeper,
//!     bank_keeper,
//! ))?;
//! invoke_set_staking_hooks(Some(&config.staking), Some(&outputs.keeper), &providers)?;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export the lower layers
pub use staking_core;
pub use staking_std;

pub mod codec;
pub mod config;
pub mod genesis;
pub mod hooks;
pub mod keeper;
pub mod migrations;
pub mod module;
pub mod provider;
pub mod registration;
pub mod telemetry;

pub use codec::{
    AddressCodecInputs, CodecPair, CodecSource, ConsensusCodecFactory, ValidatorCodecFactory,
    provide_address_codec, resolve_codecs,
};
pub use config::{AppConfig, AuthConfig, ModuleConfig};
pub use hooks::{HookProviders, build_staking_hooks, invoke_set_staking_hooks};
pub use keeper::{GenesisState, Keeper, KeeperError, Params};
pub use migrations::register_all;
pub use module::StakingModule;
pub use provider::{ModuleInputs, ModuleOutputs, provide_module, resolve_authority};
pub use registration::register;
pub use telemetry::init_tracing;

pub use staking_core::{AppModule, ConfigurationError, ModuleRegistry};

/// Module name.
pub const MODULE_NAME: &str = "staking";

/// Name of the module whose account is the default authority.
pub const GOV_MODULE_NAME: &str = "gov";

/// Module account holding bonded tokens.
pub const BONDED_POOL_NAME: &str = "bonded_tokens_pool";

/// Module account holding tokens that are not bonded.
pub const NOT_BONDED_POOL_NAME: &str = "not_bonded_tokens_pool";

/// Current on-disk schema version.
pub const CONSENSUS_VERSION: u64 = 5;
