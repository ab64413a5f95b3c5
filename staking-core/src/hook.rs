//! # Staking Hooks
//!
//! The capability an extension provider implements to observe staking
//! lifecycle events.
//!
//! Providers are authored independently (distribution, slashing, governance
//! tallying, ...) and composed by the module wiring into a single ordered
//! dispatcher. Each provider sees an event together with the round it
//! happened in and either accepts it or fails with an opaque error.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`StakingHooks`] uses native `async fn` for static dispatch. Collections of
//! heterogeneous providers hold them as [`DynStakingHooks`] trait objects; the
//! blanket implementation makes every `StakingHooks` type usable there.

use crate::{context::BlockContext, error::BoxError, event::StakingEvent};
use std::{future::Future, pin::Pin, sync::Arc};

/// Boxed future returned by [`DynStakingHooks::on_event_dyn`].
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;

/// An extension provider for staking lifecycle events.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `StakingHooks`",
    label = "missing `StakingHooks` implementation",
    note = "Staking hooks must implement `on_event` to be installed on the staking keeper."
)]
pub trait StakingHooks: Send + Sync + 'static {
    /// Called for every lifecycle event the staking module emits.
    fn on_event(
        &self,
        ctx: &BlockContext,
        event: &StakingEvent,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Object-safe version of [`StakingHooks`].
pub trait DynStakingHooks: Send + Sync + 'static {
    /// Called for every lifecycle event (dynamic dispatch version).
    fn on_event_dyn<'a>(
        &'a self,
        ctx: &'a BlockContext,
        event: &'a StakingEvent,
    ) -> HookFuture<'a>;
}

impl<T: StakingHooks> DynStakingHooks for T {
    fn on_event_dyn<'a>(
        &'a self,
        ctx: &'a BlockContext,
        event: &'a StakingEvent,
    ) -> HookFuture<'a> {
        Box::pin(self.on_event(ctx, event))
    }
}

impl StakingHooks for Box<dyn DynStakingHooks> {
    async fn on_event(&self, ctx: &BlockContext, event: &StakingEvent) -> Result<(), BoxError> {
        (**self).on_event_dyn(ctx, event).await
    }
}

impl StakingHooks for Arc<dyn DynStakingHooks> {
    async fn on_event(&self, ctx: &BlockContext, event: &StakingEvent) -> Result<(), BoxError> {
        (**self).on_event_dyn(ctx, event).await
    }
}
