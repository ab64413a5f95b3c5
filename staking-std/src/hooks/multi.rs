//! Ordered composite of staking hook providers.

use staking_core::{BlockContext, BoxError, DynStakingHooks, HookError, StakingEvent, StakingHooks};
use std::{fmt, sync::Arc};

/// One named member of a [`MultiStakingHooks`].
#[derive(Clone)]
pub struct NamedHooks {
    name: String,
    hooks: Arc<dyn DynStakingHooks>,
}

impl NamedHooks {
    /// Pair a provider with the name it was registered under.
    pub fn new(name: impl Into<String>, hooks: Arc<dyn DynStakingHooks>) -> Self {
        Self {
            name: name.into(),
            hooks,
        }
    }

    /// Registration name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The provider.
    pub fn hooks(&self) -> &Arc<dyn DynStakingHooks> {
        &self.hooks
    }
}

impl fmt::Debug for NamedHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedHooks")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A frozen, ordered sequence of hook providers.
///
/// Built once and never mutated. Every event is forwarded to the members
/// sequentially, in construction order. Dispatch stops at the first member
/// that fails: the error is returned with that member's name and the members
/// after it are not invoked.
///
/// # Example
/// ```ignore
/// let hooks = MultiStakingHooks::new(vec![
///     NamedHooks::new("distribution", Arc::new(distribution_hooks)),
///     NamedHooks::new("slashing", Arc::new(slashing_hooks)),
/// ]);
/// hooks.dispatch(&ctx, &event).await?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct MultiStakingHooks {
    members: Arc<[NamedHooks]>,
}

impl MultiStakingHooks {
    /// Freeze `members` in the given order.
    pub fn new(members: Vec<NamedHooks>) -> Self {
        Self {
            members: members.into(),
        }
    }

    /// Member names in dispatch order.
    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(NamedHooks::name).collect()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Forward `event` to every member in order, stopping at the first failure.
    pub async fn dispatch(&self, ctx: &BlockContext, event: &StakingEvent) -> Result<(), HookError> {
        for member in self.members.iter() {
            if let Err(source) = member.hooks.on_event_dyn(ctx, event).await {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    hook = %member.name,
                    event = event.name(),
                    error = %source,
                    "staking hooks failed"
                );
                return Err(HookError::Failed {
                    hook: member.name.clone(),
                    event: event.name(),
                    source,
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<NamedHooks> for MultiStakingHooks {
    fn from_iter<I: IntoIterator<Item = NamedHooks>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// A composite is itself a provider, so composites can nest.
impl StakingHooks for MultiStakingHooks {
    async fn on_event(&self, ctx: &BlockContext, event: &StakingEvent) -> Result<(), BoxError> {
        self.dispatch(ctx, event).await.map_err(BoxError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CallLog, FailingHooks, RecordingHooks};
    use proptest::prelude::*;
    use staking_core::Address;

    fn event() -> StakingEvent {
        StakingEvent::AfterValidatorCreated {
            validator: Address::new(vec![9; 20]),
        }
    }

    fn recording(name: &str, log: &CallLog) -> NamedHooks {
        NamedHooks::new(name, Arc::new(RecordingHooks::new(name, log.clone())))
    }

    #[tokio::test]
    async fn dispatches_in_construction_order() {
        let log = CallLog::new();
        let hooks = MultiStakingHooks::new(vec![
            recording("slashing", &log),
            recording("distribution", &log),
            recording("gov", &log),
        ]);

        hooks.dispatch(&BlockContext::new(3, 0), &event()).await.unwrap();

        assert_eq!(log.callers(), vec!["slashing", "distribution", "gov"]);
        assert_eq!(hooks.names(), vec!["slashing", "distribution", "gov"]);
    }

    #[tokio::test]
    async fn empty_composite_is_a_no_op() {
        let hooks = MultiStakingHooks::default();
        assert!(hooks.is_empty());
        hooks.dispatch(&BlockContext::default(), &event()).await.unwrap();
    }

    #[tokio::test]
    async fn nested_composite_reports_inner_failure() {
        let log = CallLog::new();
        let inner = MultiStakingHooks::new(vec![NamedHooks::new(
            "broken",
            Arc::new(FailingHooks::new("broken", log.clone(), "boom")),
        )]);
        let outer = MultiStakingHooks::new(vec![
            NamedHooks::new("inner", Arc::new(inner)),
            recording("after", &log),
        ]);

        let err = outer
            .dispatch(&BlockContext::default(), &event())
            .await
            .unwrap_err();
        let HookError::Failed { hook, .. } = err;
        assert_eq!(hook, "inner");
        assert_eq!(log.callers(), vec!["broken"]);
    }

    proptest! {
        // Members before and including the failing one run in order; the rest
        // never run, and the error names the failing member.
        #[test]
        fn stops_at_first_failure(len in 1usize..8, fail_seed in any::<usize>()) {
            let fail_at = fail_seed % len;
            let log = CallLog::new();
            let members: Vec<NamedHooks> = (0..len)
                .map(|i| {
                    let name = format!("hooks-{i}");
                    if i == fail_at {
                        NamedHooks::new(
                            name.clone(),
                            Arc::new(FailingHooks::new(&name, log.clone(), "rejected")),
                        )
                    } else {
                        recording(&name, &log)
                    }
                })
                .collect();
            let hooks = MultiStakingHooks::new(members);

            let result = futures::executor::block_on(
                hooks.dispatch(&BlockContext::default(), &event()),
            );

            let expected: Vec<String> = (0..=fail_at).map(|i| format!("hooks-{i}")).collect();
            prop_assert_eq!(log.callers(), expected);
            match result {
                Err(HookError::Failed { hook, event, .. }) => {
                    prop_assert_eq!(hook, format!("hooks-{fail_at}"));
                    prop_assert_eq!(event, "after_validator_created");
                }
                Ok(()) => prop_assert!(false, "dispatch should fail"),
            }
        }

        #[test]
        fn all_members_run_when_none_fail(len in 0usize..8) {
            let log = CallLog::new();
            let hooks: MultiStakingHooks = (0..len)
                .map(|i| recording(&format!("hooks-{i}"), &log))
                .collect();

            let result = futures::executor::block_on(
                hooks.dispatch(&BlockContext::default(), &event()),
            );

            prop_assert!(result.is_ok());
            prop_assert_eq!(log.callers().len(), len);
        }
    }
}
