//! Genesis import and export through the host lifecycle adapter.

use staking::{
    AppModule, ModuleConfig, genesis::{decode_genesis, encode_genesis}, invoke_set_staking_hooks,
};
use staking_core::{BlockContext, GenesisError, ModuleError};
use staking_std::testing::CallLog;

mod common;
use common::{failing_provider, fresh_genesis, host, recording_providers};

#[tokio::test]
async fn fresh_genesis_fires_hooks_and_bonds_validators() {
    let config = ModuleConfig::default();
    let host = host(config.clone());
    let log = CallLog::new();
    invoke_set_staking_hooks(
        Some(&config),
        Some(&host.outputs.keeper),
        &recording_providers(&["distribution"], &log),
    )
    .unwrap();

    let state = fresh_genesis(&host.outputs.keeper);
    let bytes = encode_genesis(&state).unwrap();
    let module = &host.outputs.module;
    module.validate_genesis(&bytes).unwrap();

    let updates = module
        .init_genesis(&BlockContext::new(1, 0), &bytes)
        .await
        .unwrap();

    // Highest power first.
    assert_eq!(
        updates.iter().map(|u| u.power).collect::<Vec<_>>(),
        vec![7, 2]
    );
    assert_eq!(
        log.event_names(),
        vec![
            "after_validator_created",
            "after_validator_created",
            "before_delegation_created",
            "after_delegation_modified",
            "before_delegation_created",
            "after_delegation_modified",
            "after_validator_bonded",
            "after_validator_bonded",
        ]
    );
}

#[tokio::test]
async fn export_then_import_is_stable() {
    let source = host(ModuleConfig::default());
    let ctx = BlockContext::new(1, 0);
    let state = fresh_genesis(&source.outputs.keeper);
    source
        .outputs
        .module
        .init_genesis(&ctx, &encode_genesis(&state).unwrap())
        .await
        .unwrap();

    let exported = source.outputs.module.export_genesis(&ctx).await.unwrap();
    let decoded = decode_genesis(&exported).unwrap();
    assert!(decoded.exported);
    assert_eq!(decoded.validators.len(), state.validators.len());
    assert_eq!(decoded.delegations, state.delegations);
    assert_eq!(decoded.last_total_power, 9);

    let target = host(ModuleConfig::default());
    let log = CallLog::new();
    invoke_set_staking_hooks(
        Some(&ModuleConfig::default()),
        Some(&target.outputs.keeper),
        &recording_providers(&["distribution"], &log),
    )
    .unwrap();

    let updates = target
        .outputs
        .module
        .init_genesis(&ctx, &exported)
        .await
        .unwrap();
    assert_eq!(updates.len(), 2);
    assert!(log.is_empty(), "exported genesis must not fire hooks");

    let reexported = target.outputs.module.export_genesis(&ctx).await.unwrap();
    assert_eq!(decode_genesis(&reexported).unwrap(), decoded);
}

#[tokio::test]
async fn undecodable_envelope_is_fatal() {
    let host = host(ModuleConfig::default());
    let err = host
        .outputs
        .module
        .init_genesis(&BlockContext::default(), b"\x00\x01")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ModuleError::Genesis(GenesisError::Decode { .. })
    ));
}

#[tokio::test]
async fn failing_hook_aborts_import_with_its_name() {
    let config = ModuleConfig::default();
    let host = host(config.clone());
    let log = CallLog::new();
    let mut providers = recording_providers(&["distribution"], &log);
    let (name, hooks) = failing_provider("slashing", &log);
    providers.insert(name, hooks);
    invoke_set_staking_hooks(Some(&config), Some(&host.outputs.keeper), &providers).unwrap();

    let bytes = encode_genesis(&fresh_genesis(&host.outputs.keeper)).unwrap();
    let err = host
        .outputs
        .module
        .init_genesis(&BlockContext::new(1, 0), &bytes)
        .await
        .unwrap_err();

    match err {
        ModuleError::Hook(staking_core::HookError::Failed { hook, event, .. }) => {
            assert_eq!(hook, "slashing");
            assert_eq!(event, "after_validator_created");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(log.callers(), vec!["distribution", "slashing"]);
}

#[tokio::test]
async fn round_hooks_follow_power_changes() {
    let host = host(ModuleConfig::default());
    let module = &host.outputs.module;
    let keeper = &host.outputs.keeper;
    let state = fresh_genesis(keeper);
    module
        .init_genesis(&BlockContext::new(1, 0), &encode_genesis(&state).unwrap())
        .await
        .unwrap();

    module.begin_block(&BlockContext::new(2, 10)).await.unwrap();
    assert_eq!(
        keeper.historical_info(2).unwrap().unwrap().validator_set.len(),
        2
    );
    assert!(module.end_block(&BlockContext::new(2, 10)).await.unwrap().is_empty());

    let mut grown = state.validators[0].clone();
    grown.tokens = 11_000_000;
    keeper.set_validator(&grown).unwrap();

    let updates = module.end_block(&BlockContext::new(3, 15)).await.unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].power, 11);
    assert_eq!(keeper.last_total_power().unwrap(), 18);
}
