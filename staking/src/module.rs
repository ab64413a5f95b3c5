//! Host lifecycle adapter.

use crate::{
    CONSENSUS_VERSION, MODULE_NAME, genesis,
    keeper::{
        Keeper, MSG_SERVICE_NAME, Migrator, MsgServer, QUERY_SERVICE_NAME, Querier,
        register_invariants,
    },
    migrations::register_all,
};
use async_trait::async_trait;
use staking_core::{
    AppModule, BlockContext, ConfigurationError, InvariantRegistry, LegacySubspace,
    MigrationRegistrar, ModuleError, ServiceRegistrar, ValidatorUpdate,
};
use std::{fmt, sync::Arc};

/// The staking module as seen by the host.
///
/// Every lifecycle call is forwarded to the keeper; errors it returns are
/// passed through unchanged.
#[derive(Clone)]
pub struct StakingModule {
    keeper: Arc<Keeper>,
    legacy_subspace: Option<Arc<dyn LegacySubspace>>,
}

impl fmt::Debug for StakingModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StakingModule")
            .field("keeper", &self.keeper)
            .field("legacy_subspace", &self.legacy_subspace.is_some())
            .finish()
    }
}

impl StakingModule {
    /// Wrap `keeper`.
    pub fn new(keeper: Arc<Keeper>, legacy_subspace: Option<Arc<dyn LegacySubspace>>) -> Self {
        Self {
            keeper,
            legacy_subspace,
        }
    }

    /// The wrapped keeper.
    pub fn keeper(&self) -> &Arc<Keeper> {
        &self.keeper
    }
}

#[async_trait]
impl AppModule for StakingModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    fn consensus_version(&self) -> u64 {
        CONSENSUS_VERSION
    }

    fn register_services(&self, registrar: &mut dyn ServiceRegistrar) -> Result<(), ModuleError> {
        registrar.register_service(
            MSG_SERVICE_NAME,
            Arc::new(MsgServer::new(Arc::clone(&self.keeper))),
        )?;
        registrar.register_service(
            QUERY_SERVICE_NAME,
            Arc::new(Querier::new(Arc::clone(&self.keeper))),
        )?;
        Ok(())
    }

    fn register_invariants(&self, registry: &mut dyn InvariantRegistry) {
        register_invariants(registry, Arc::clone(&self.keeper));
    }

    fn register_migrations(
        &self,
        registrar: &mut dyn MigrationRegistrar,
    ) -> Result<(), ConfigurationError> {
        let migrator = Migrator::new(self.legacy_subspace.clone());
        register_all(
            MODULE_NAME,
            CONSENSUS_VERSION,
            migrator.migrations(),
            registrar,
        )
    }

    fn default_genesis(&self) -> Result<Vec<u8>, ModuleError> {
        Ok(genesis::default_genesis()?)
    }

    fn validate_genesis(&self, bytes: &[u8]) -> Result<(), ModuleError> {
        genesis::validate_genesis_bytes(bytes)?;
        Ok(())
    }

    async fn begin_block(&self, ctx: &BlockContext) -> Result<(), ModuleError> {
        Ok(self.keeper.begin_blocker(ctx)?)
    }

    async fn end_block(&self, ctx: &BlockContext) -> Result<Vec<ValidatorUpdate>, ModuleError> {
        Ok(self.keeper.end_blocker(ctx).await?)
    }

    async fn init_genesis(
        &self,
        ctx: &BlockContext,
        bytes: &[u8],
    ) -> Result<Vec<ValidatorUpdate>, ModuleError> {
        genesis::init_genesis(&self.keeper, ctx, bytes).await
    }

    async fn export_genesis(&self, _ctx: &BlockContext) -> Result<Vec<u8>, ModuleError> {
        genesis::export_genesis(&self.keeper)
    }
}
