//! Composition of staking hook providers into one ordered dispatcher.

use crate::{config::ModuleConfig, keeper::Keeper};
use staking_core::{ConfigurationError, DynStakingHooks};
use staking_std::{LoggingHooks, MultiStakingHooks, NamedHooks};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

/// Hook providers keyed by the name of the module that supplies them.
pub type HookProviders = HashMap<String, Arc<dyn DynStakingHooks>>;

/// Compose `providers` into a dispatcher that invokes them in `order`.
///
/// Each provider is wrapped so its events are traced under its name.
/// An empty `order` means providers run sorted by name. A non-empty `order`
/// must name every provider exactly once. No providers at all is not an
/// error: there is simply nothing to install.
pub fn build_staking_hooks(
    providers: &HookProviders,
    order: &[String],
) -> Result<Option<MultiStakingHooks>, ConfigurationError> {
    if providers.is_empty() {
        if !order.is_empty() {
            tracing::warn!(?order, "hooks order configured but no staking hooks were provided");
        }
        return Ok(None);
    }

    let mut names: Vec<String> = providers.keys().cloned().collect();
    names.sort();

    let order = if order.is_empty() {
        names.clone()
    } else {
        order.to_vec()
    };

    if order.len() != names.len() {
        return Err(ConfigurationError::OrderingMismatch {
            order,
            providers: names,
        });
    }

    let mut seen = HashSet::with_capacity(order.len());
    let mut members = Vec::with_capacity(order.len());
    for name in &order {
        if !seen.insert(name.as_str()) {
            return Err(ConfigurationError::OrderingMismatch {
                order: order.clone(),
                providers: names,
            });
        }
        let hooks = providers
            .get(name)
            .ok_or_else(|| ConfigurationError::MissingExtension { name: name.clone() })?;
        let traced = LoggingHooks::new(Arc::clone(hooks), name.clone());
        members.push(NamedHooks::new(name.clone(), Arc::new(traced)));
    }

    tracing::info!(?order, "composed staking hooks");
    Ok(Some(MultiStakingHooks::new(members)))
}

/// Build the dispatcher from `providers` and install it on `keeper`.
///
/// Does nothing when either the configuration or the keeper is absent, or
/// when there are no providers.
pub fn invoke_set_staking_hooks(
    config: Option<&ModuleConfig>,
    keeper: Option<&Keeper>,
    providers: &HookProviders,
) -> Result<(), ConfigurationError> {
    let (Some(config), Some(keeper)) = (config, keeper) else {
        return Ok(());
    };

    match build_staking_hooks(providers, &config.hooks_order)? {
        Some(hooks) => keeper.set_hooks(hooks),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staking_core::{BlockContext, HookError, StakingEvent};
    use staking_std::testing::{CallLog, FailingHooks, RecordingHooks};

    fn providers(names: &[&str], log: &CallLog) -> HookProviders {
        names
            .iter()
            .map(|name| {
                let hooks: Arc<dyn DynStakingHooks> =
                    Arc::new(RecordingHooks::new(name, log.clone()));
                (name.to_string(), hooks)
            })
            .collect()
    }

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn empty_providers_build_nothing() {
        assert!(build_staking_hooks(&HookProviders::new(), &[]).unwrap().is_none());
        assert!(
            build_staking_hooks(&HookProviders::new(), &order(&["slashing"]))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn default_order_is_sorted() {
        let log = CallLog::new();
        let hooks = build_staking_hooks(&providers(&["slashing", "distribution", "gov"], &log), &[])
            .unwrap()
            .unwrap();
        assert_eq!(hooks.names(), vec!["distribution", "gov", "slashing"]);
    }

    #[test]
    fn explicit_order_is_kept() {
        let log = CallLog::new();
        let hooks = build_staking_hooks(
            &providers(&["a", "b", "c"], &log),
            &order(&["c", "a", "b"]),
        )
        .unwrap()
        .unwrap();
        assert_eq!(hooks.names(), vec!["c", "a", "b"]);
    }

    #[test]
    fn length_mismatch_reports_both_sequences() {
        let log = CallLog::new();
        let err = build_staking_hooks(&providers(&["b", "a"], &log), &order(&["a"])).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::OrderingMismatch {
                order: order(&["a"]),
                providers: order(&["a", "b"]),
            }
        );
    }

    #[test]
    fn unknown_name_is_a_missing_extension() {
        let log = CallLog::new();
        let err =
            build_staking_hooks(&providers(&["a", "b"], &log), &order(&["a", "x"])).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingExtension { name: "x".into() }
        );
    }

    #[test]
    fn repeated_name_is_a_mismatch() {
        let log = CallLog::new();
        let err =
            build_staking_hooks(&providers(&["a", "b"], &log), &order(&["a", "a"])).unwrap_err();
        assert!(matches!(err, ConfigurationError::OrderingMismatch { .. }));
    }

    #[tokio::test]
    async fn composed_hooks_forward_events_in_order() {
        let log = CallLog::new();
        let mut providers = providers(&["b", "a"], &log);
        let failing: Arc<dyn DynStakingHooks> =
            Arc::new(FailingHooks::new("c", log.clone(), "rejected"));
        providers.insert("c".to_string(), failing);

        let hooks = build_staking_hooks(&providers, &order(&["b", "c", "a"]))
            .unwrap()
            .unwrap();
        let err = hooks
            .dispatch(
                &BlockContext::new(3, 0),
                &StakingEvent::AfterUnbondingInitiated { id: 1 },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, HookError::Failed { ref hook, .. } if hook == "c"));
        assert_eq!(log.callers(), vec!["b", "c"]);
    }
}
