//! Construction of the keeper and the module adapter.

use crate::{
    GOV_MODULE_NAME,
    codec::{
        AddressCodecInputs, ConsensusCodecFactory, ValidatorCodecFactory, provide_address_codec,
    },
    config::{AuthConfig, ModuleConfig},
    keeper::Keeper,
    module::StakingModule,
};
use staking_core::{
    AccountKeeper, Address, BankKeeper, ConfigurationError, KvStore, LegacySubspace,
};
use std::{fmt, sync::Arc};

/// Everything [`provide_module`] needs.
///
/// The constructor takes the required inputs; optional ones are set with the
/// `with_*` methods and stay absent otherwise.
pub struct ModuleInputs {
    /// Staking configuration.
    pub config: ModuleConfig,
    /// Auth configuration.
    pub auth_config: AuthConfig,
    /// The module's store.
    pub store: Arc<dyn KvStore>,
    /// Auth module collaborator.
    pub account_keeper: Arc<dyn AccountKeeper>,
    /// Bank module collaborator.
    pub bank_keeper: Arc<dyn BankKeeper>,
    /// Explicit validator codec factory.
    pub validator_codec_factory: Option<ValidatorCodecFactory>,
    /// Explicit consensus codec factory.
    pub consensus_codec_factory: Option<ConsensusCodecFactory>,
    /// Retired parameter namespace, read by early migrations.
    pub legacy_subspace: Option<Arc<dyn LegacySubspace>>,
}

impl ModuleInputs {
    /// Inputs with every optional dependency absent.
    pub fn new(
        config: ModuleConfig,
        auth_config: AuthConfig,
        store: Arc<dyn KvStore>,
        account_keeper: Arc<dyn AccountKeeper>,
        bank_keeper: Arc<dyn BankKeeper>,
    ) -> Self {
        Self {
            config,
            auth_config,
            store,
            account_keeper,
            bank_keeper,
            validator_codec_factory: None,
            consensus_codec_factory: None,
            legacy_subspace: None,
        }
    }

    /// Supply both address codec factories.
    pub fn with_codec_factories(
        mut self,
        validator: ValidatorCodecFactory,
        consensus: ConsensusCodecFactory,
    ) -> Self {
        self.validator_codec_factory = Some(validator);
        self.consensus_codec_factory = Some(consensus);
        self
    }

    /// Supply the legacy parameter subspace.
    pub fn with_legacy_subspace(mut self, subspace: Arc<dyn LegacySubspace>) -> Self {
        self.legacy_subspace = Some(subspace);
        self
    }
}

impl fmt::Debug for ModuleInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleInputs")
            .field("config", &self.config)
            .field("auth_config", &self.auth_config)
            .field("validator_codec_factory", &self.validator_codec_factory.is_some())
            .field("consensus_codec_factory", &self.consensus_codec_factory.is_some())
            .field("legacy_subspace", &self.legacy_subspace.is_some())
            .finish_non_exhaustive()
    }
}

/// What [`provide_module`] hands back to the host.
pub struct ModuleOutputs {
    /// Keeper handle, shared with the adapter. Hooks are installed on it
    /// after the module is built.
    pub keeper: Arc<Keeper>,
    /// Lifecycle adapter for the host.
    pub module: StakingModule,
}

impl fmt::Debug for ModuleOutputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleOutputs")
            .field("keeper", &self.keeper)
            .finish_non_exhaustive()
    }
}

/// Resolve the module authority.
///
/// Empty means the governance module account. Anything else must decode
/// with the account address codec.
pub fn resolve_authority(
    configured: &str,
    account_keeper: &dyn AccountKeeper,
) -> Result<Address, ConfigurationError> {
    if configured.is_empty() {
        return Ok(account_keeper.module_address(GOV_MODULE_NAME));
    }

    account_keeper
        .address_codec()
        .string_to_bytes(configured)
        .map_err(|err| ConfigurationError::MalformedAuthority {
            authority: configured.to_string(),
            reason: err.to_string(),
        })
}

/// Build the keeper and wrap it in the module adapter.
pub fn provide_module(inputs: ModuleInputs) -> Result<ModuleOutputs, ConfigurationError> {
    let ModuleInputs {
        config,
        auth_config,
        store,
        account_keeper,
        bank_keeper,
        validator_codec_factory,
        consensus_codec_factory,
        legacy_subspace,
    } = inputs;

    let authority = resolve_authority(&config.authority, &*account_keeper)?;
    let authority = account_keeper
        .address_codec()
        .bytes_to_string(&authority)
        .map_err(|err| ConfigurationError::MalformedAuthority {
            authority: config.authority.clone(),
            reason: err.to_string(),
        })?;

    let codecs = provide_address_codec(AddressCodecInputs {
        config: &config,
        auth_config: &auth_config,
        validator_codec_factory,
        consensus_codec_factory,
    })?;

    tracing::info!(%authority, "providing staking module");

    let keeper = Arc::new(Keeper::new(
        store,
        account_keeper,
        bank_keeper,
        authority,
        codecs.validator,
        codecs.consensus,
    ));
    let module = StakingModule::new(Arc::clone(&keeper), legacy_subspace);

    Ok(ModuleOutputs { keeper, module })
}
