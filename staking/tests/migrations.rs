//! Migration registration and an end-to-end upgrade of a version 1 store.

use staking::{
    AppModule, ConfigurationError, ModuleConfig,
    keeper::{BondStatus, Delegation, Migrator, Params, Validator},
    register_all,
};
use staking_core::{
    Address, KvStore, LegacySubspace, MigrationError, MigrationHandler, length_prefixed,
};
use staking_std::{MigrationRegistry, VersionMap, testing::MemSubspace};
use std::{collections::BTreeMap, sync::Arc};

mod common;
use common::{account, host_with_legacy, operator};

fn noop() -> MigrationHandler {
    Box::new(|_: &dyn KvStore| Ok::<(), MigrationError>(()))
}

#[test]
fn complete_set_registers_and_gap_fails() {
    let mut registry = MigrationRegistry::new();
    let complete: BTreeMap<u64, MigrationHandler> =
        [1, 2, 3, 4].into_iter().map(|v| (v, noop())).collect();
    register_all("staking", 5, complete, &mut registry).unwrap();
    assert_eq!(registry.registered_versions("staking"), vec![1, 2, 3, 4]);

    let mut registry = MigrationRegistry::new();
    let gap: BTreeMap<u64, MigrationHandler> =
        [1, 2, 4].into_iter().map(|v| (v, noop())).collect();
    assert_eq!(
        register_all("staking", 5, gap, &mut registry).unwrap_err(),
        ConfigurationError::MissingMigration {
            module: "staking".into(),
            from: 3
        }
    );
}

#[test]
fn migrator_matches_the_consensus_version() {
    let migrations = Migrator::new(None).migrations();
    let mut registry = MigrationRegistry::new();
    register_all("staking", staking::CONSENSUS_VERSION, migrations, &mut registry).unwrap();
}

#[test]
fn version_one_store_upgrades_to_current_layout() {
    let legacy = Arc::new(MemSubspace::new());
    legacy.set_raw("BondDenom", br#""uatom""#.to_vec());
    legacy.set_raw("MaxValidators", b"3".to_vec());
    legacy.set_raw("MinCommissionRate", br#""0.05""#.to_vec());

    let host = host_with_legacy(
        ModuleConfig::default(),
        Some(legacy.clone() as Arc<dyn LegacySubspace>),
    );
    let keeper = &host.outputs.keeper;
    let store = &host.store;

    // Version 1 layout: fixed-width keys, no params, no index.
    let validator = Validator {
        operator_address: operator(keeper, 1),
        consensus_pubkey: vec![0xa1; 32],
        status: BondStatus::Bonded,
        tokens: 4_000_000,
        delegator_shares: 4_000_000,
        jailed: false,
    };
    let delegation = Delegation {
        delegator_address: account(9),
        validator_address: operator(keeper, 1),
        shares: 4_000_000,
    };
    let val = [1u8; 20];
    let del = [9u8; 20];
    store.set(
        &[&[0x21][..], &val[..]].concat(),
        &serde_json::to_vec(&validator).unwrap(),
    );
    store.set(
        &[&[0x31][..], &del[..], &val[..]].concat(),
        &serde_json::to_vec(&delegation).unwrap(),
    );

    let mut registry = MigrationRegistry::new();
    host.outputs.module.register_migrations(&mut registry).unwrap();

    let mut versions = VersionMap::from([("staking".to_string(), 1)]);
    registry
        .run_migrations(&mut versions, "staking", 5, &**store)
        .unwrap();
    assert_eq!(versions["staking"], 5);

    let params = keeper.params().unwrap();
    assert_eq!(
        params,
        Params {
            bond_denom: "uatom".into(),
            max_validators: 3,
            min_commission_rate: "0.05".into(),
            ..Params::default()
        }
    );

    let operator_address = Address::new(val.to_vec());
    assert_eq!(keeper.validator(&operator_address).unwrap(), Some(validator));
    assert_eq!(
        keeper.validator_delegations(&operator_address).unwrap(),
        vec![delegation.clone()]
    );
    assert_eq!(keeper.delegations().unwrap(), vec![delegation]);

    let index_key = [
        vec![0x71],
        length_prefixed(&val).unwrap(),
        length_prefixed(&del).unwrap(),
    ]
    .concat();
    assert!(store.has(&index_key));
    assert!(!store.has(&[&[0x21][..], &val[..]].concat()));

    // A second run finds nothing to do.
    let before = store.snapshot();
    registry
        .run_migrations(&mut versions, "staking", 5, &**store)
        .unwrap();
    assert_eq!(store.snapshot(), before);
}

#[test]
fn upgrade_without_legacy_subspace_uses_defaults() {
    let host = host_with_legacy(ModuleConfig::default(), None);
    let mut registry = MigrationRegistry::new();
    host.outputs.module.register_migrations(&mut registry).unwrap();

    let mut versions = VersionMap::from([("staking".to_string(), 1)]);
    registry
        .run_migrations(&mut versions, "staking", 5, &*host.store)
        .unwrap();

    assert_eq!(host.outputs.keeper.params().unwrap(), Params::default());
    assert_eq!(versions["staking"], 5);
}
