#![allow(dead_code)]

use staking::{
    AuthConfig, GenesisState, HookProviders, ModuleConfig, ModuleInputs, ModuleOutputs,
    keeper::{BondStatus, Delegation, Keeper, Validator},
    provide_module,
};
use staking_core::{AccountKeeper, Address, AddressCodec, DynStakingHooks, LegacySubspace};
use staking_std::{
    Bech32Codec, MemStore,
    testing::{CallLog, FailingHooks, RecordingHooks, StaticAccountKeeper, StaticBankKeeper},
};
use std::sync::Arc;

// ============================================================================
// Host
// ============================================================================

pub const BASE_PREFIX: &str = "cosmos";

pub struct Host {
    pub store: Arc<MemStore>,
    pub outputs: ModuleOutputs,
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        bech32_prefix: BASE_PREFIX.to_string(),
    }
}

pub fn account_keeper() -> StaticAccountKeeper {
    StaticAccountKeeper::new(Bech32Codec::new(BASE_PREFIX).unwrap())
}

pub fn inputs(config: ModuleConfig, store: Arc<MemStore>) -> ModuleInputs {
    ModuleInputs::new(
        config,
        auth_config(),
        store,
        Arc::new(account_keeper()),
        Arc::new(StaticBankKeeper::new()),
    )
}

pub fn host(config: ModuleConfig) -> Host {
    host_with_legacy(config, None)
}

pub fn host_with_legacy(
    config: ModuleConfig,
    legacy: Option<Arc<dyn LegacySubspace>>,
) -> Host {
    let store = Arc::new(MemStore::new());
    let mut inputs = inputs(config, store.clone());
    if let Some(legacy) = legacy {
        inputs = inputs.with_legacy_subspace(legacy);
    }
    Host {
        store,
        outputs: provide_module(inputs).unwrap(),
    }
}

// ============================================================================
// Hook Providers
// ============================================================================

pub fn recording_providers(names: &[&str], log: &CallLog) -> HookProviders {
    names
        .iter()
        .map(|name| {
            let hooks: Arc<dyn DynStakingHooks> = Arc::new(RecordingHooks::new(name, log.clone()));
            (name.to_string(), hooks)
        })
        .collect()
}

pub fn failing_provider(name: &str, log: &CallLog) -> (String, Arc<dyn DynStakingHooks>) {
    (
        name.to_string(),
        Arc::new(FailingHooks::new(name, log.clone(), "boom")),
    )
}

pub fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

// ============================================================================
// Genesis Fixtures
// ============================================================================

pub fn operator(keeper: &Keeper, byte: u8) -> String {
    keeper
        .validator_address_codec()
        .bytes_to_string(&Address::new(vec![byte; 20]))
        .unwrap()
}

pub fn account(byte: u8) -> String {
    account_keeper()
        .address_codec()
        .bytes_to_string(&Address::new(vec![byte; 20]))
        .unwrap()
}

/// Two bonded-capable validators, one delegation each.
pub fn fresh_genesis(keeper: &Keeper) -> GenesisState {
    GenesisState {
        validators: vec![
            Validator {
                operator_address: operator(keeper, 1),
                consensus_pubkey: vec![0xa1; 32],
                status: BondStatus::Unbonded,
                tokens: 2_000_000,
                delegator_shares: 2_000_000,
                jailed: false,
            },
            Validator {
                operator_address: operator(keeper, 2),
                consensus_pubkey: vec![0xa2; 32],
                status: BondStatus::Unbonded,
                tokens: 7_000_000,
                delegator_shares: 7_000_000,
                jailed: false,
            },
        ],
        delegations: vec![
            Delegation {
                delegator_address: account(11),
                validator_address: operator(keeper, 1),
                shares: 2_000_000,
            },
            Delegation {
                delegator_address: account(12),
                validator_address: operator(keeper, 2),
                shares: 7_000_000,
            },
        ],
        ..GenesisState::default()
    }
}
