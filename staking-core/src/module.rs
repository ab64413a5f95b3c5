//! The host runtime's module lifecycle contract.

use crate::{
    context::{BlockContext, ValidatorUpdate},
    error::{ConfigurationError, ModuleError, ServiceError},
    migration::MigrationRegistrar,
};
use async_trait::async_trait;
use std::{any::Any, sync::Arc};

/// A request or query service exposed by a module.
pub type ServiceHandler = Arc<dyn Any + Send + Sync>;

/// The host's service router.
pub trait ServiceRegistrar {
    /// Register a named service implementation.
    fn register_service(
        &mut self,
        name: &'static str,
        handler: ServiceHandler,
    ) -> Result<(), ServiceError>;
}

/// Result of evaluating one invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantOutcome {
    /// Human-readable summary.
    pub message: String,
    /// Whether the invariant is broken.
    pub broken: bool,
}

/// A registered invariant check.
pub type Invariant = Box<dyn Fn() -> InvariantOutcome + Send + Sync>;

/// The host's invariant registry.
pub trait InvariantRegistry {
    /// Register an invariant under `module/route`.
    fn register_route(&mut self, module: &str, route: &str, invariant: Invariant);
}

/// Lifecycle contract every hosted module implements.
///
/// The host calls the registration methods once during startup and the round
/// and genesis methods afterwards. Errors from the round and genesis methods
/// come from the module's core service and are passed through unchanged.
#[async_trait]
pub trait AppModule: Send + Sync {
    /// Unique module name.
    fn name(&self) -> &'static str;

    /// Current on-disk schema version.
    fn consensus_version(&self) -> u64;

    /// Register request and query services.
    fn register_services(&self, registrar: &mut dyn ServiceRegistrar) -> Result<(), ModuleError>;

    /// Register invariant checks.
    fn register_invariants(&self, registry: &mut dyn InvariantRegistry);

    /// Register every schema migration below [`Self::consensus_version`].
    fn register_migrations(
        &self,
        registrar: &mut dyn MigrationRegistrar,
    ) -> Result<(), ConfigurationError>;

    /// Encoded genesis state for a fresh network.
    fn default_genesis(&self) -> Result<Vec<u8>, ModuleError>;

    /// Check an encoded genesis state without applying it.
    fn validate_genesis(&self, bytes: &[u8]) -> Result<(), ModuleError>;

    /// Called at the start of every round.
    async fn begin_block(&self, ctx: &BlockContext) -> Result<(), ModuleError>;

    /// Called at the end of every round.
    async fn end_block(&self, ctx: &BlockContext) -> Result<Vec<ValidatorUpdate>, ModuleError>;

    /// Apply an encoded genesis state.
    async fn init_genesis(
        &self,
        ctx: &BlockContext,
        bytes: &[u8],
    ) -> Result<Vec<ValidatorUpdate>, ModuleError>;

    /// Encode the current state as genesis.
    async fn export_genesis(&self, ctx: &BlockContext) -> Result<Vec<u8>, ModuleError>;
}
