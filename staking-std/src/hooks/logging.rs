//! Logging wrapper for hook providers.

use staking_core::{BlockContext, BoxError, StakingEvent, StakingHooks};

/// A provider wrapper that logs every event before forwarding it.
///
/// With the `tracing` feature disabled this is a plain pass-through.
pub struct LoggingHooks<H> {
    inner: H,
    name: String,
}

impl<H> LoggingHooks<H> {
    /// Wrap `inner`, logging under `name`.
    pub fn new(inner: H, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: StakingHooks> StakingHooks for LoggingHooks<H> {
    async fn on_event(&self, ctx: &BlockContext, event: &StakingEvent) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                hooks = self.name.as_str(),
                height = ctx.height,
                event = event.name(),
                "dispatching staking event"
            );
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = self.name;
        }

        let result = self.inner.on_event(ctx, event).await;

        #[cfg(feature = "tracing")]
        {
            if let Err(err) = &result {
                tracing::debug!(
                    hooks = self.name.as_str(),
                    event = event.name(),
                    error = %err,
                    "staking event rejected"
                );
            }
        }

        result
    }
}
