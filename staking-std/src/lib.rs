//! # staking-std
//!
//! Standard implementations for the staking module composition layer.
//!
//! This crate provides:
//! - **Codecs**: [`Bech32Codec`]
//! - **Composite hooks**: [`MultiStakingHooks`], [`LoggingHooks`]
//! - **Storage**: [`MemStore`]
//! - **Migrations**: [`MigrationRegistry`] (registrar and runner)
//! - **Testing**: recording hooks and in-memory collaborators

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core contracts
pub use staking_core;

// Modules
pub mod codec;
pub mod hooks;
pub mod migration;
pub mod store;
pub mod testing;

pub use codec::Bech32Codec;
pub use hooks::{LoggingHooks, MultiStakingHooks, NamedHooks};
pub use migration::{MigrationRegistry, VersionMap};
pub use store::MemStore;
