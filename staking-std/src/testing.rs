//! Testing utilities for staking wiring.
//!
//! This module provides in-memory collaborators and observable hook providers
//! so module wiring can be exercised without a real host.
//!
//! # Features
//!
//! - [`CallLog`]: shared, ordered record of hook invocations
//! - [`RecordingHooks`]: a provider that records every event it receives
//! - [`FailingHooks`]: a provider that records the call and then fails
//! - [`StaticAccountKeeper`], [`StaticBankKeeper`], [`MemSubspace`]: collaborators
//! - [`RecordingServiceRegistrar`], [`RecordingInvariantRegistry`]: host registrars

use parking_lot::Mutex;
use staking_core::{
    AccountKeeper, Address, AddressCodec, BankKeeper, BlockContext, BoxError, Invariant,
    InvariantRegistry, LegacySubspace, ServiceError, ServiceHandler, ServiceRegistrar,
    StakingEvent, StakingHooks,
};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

// ============================================================================
// Call Log
// ============================================================================

/// One recorded hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookCall {
    /// Name of the provider that was called.
    pub hooks: String,
    /// Round height.
    pub height: u64,
    /// The event.
    pub event: StakingEvent,
}

/// Shared, ordered record of hook invocations.
///
/// Clones share the same underlying log, so several providers can append to
/// one timeline.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<HookCall>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every recorded call.
    pub fn calls(&self) -> Vec<HookCall> {
        self.calls.lock().clone()
    }

    /// Provider names in call order.
    pub fn callers(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.hooks.clone()).collect()
    }

    /// Event names in call order.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(|c| c.event.name()).collect()
    }

    /// Number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Forget every recorded call.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn push(&self, hooks: &str, ctx: &BlockContext, event: &StakingEvent) {
        self.calls.lock().push(HookCall {
            hooks: hooks.to_string(),
            height: ctx.height,
            event: event.clone(),
        });
    }
}

// ============================================================================
// Hook Providers
// ============================================================================

/// A provider that records every event it receives.
///
/// # Example
///
/// ```rust,ignore
/// let log = CallLog::new();
/// let hooks = RecordingHooks::new("distribution", log.clone());
///
/// // install and run...
///
/// assert_eq!(log.callers(), vec!["distribution"]);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingHooks {
    name: String,
    log: CallLog,
}

impl RecordingHooks {
    /// Create a provider that records into `log` under `name`.
    pub fn new(name: &str, log: CallLog) -> Self {
        Self {
            name: name.to_string(),
            log,
        }
    }

    /// The name calls are recorded under.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl StakingHooks for RecordingHooks {
    async fn on_event(&self, ctx: &BlockContext, event: &StakingEvent) -> Result<(), BoxError> {
        self.log.push(&self.name, ctx, event);
        Ok(())
    }
}

/// A provider that records the call and then fails with a fixed message.
#[derive(Debug, Clone)]
pub struct FailingHooks {
    name: String,
    log: CallLog,
    message: String,
}

impl FailingHooks {
    /// Create a provider that fails with `message`.
    pub fn new(name: &str, log: CallLog, message: &str) -> Self {
        Self {
            name: name.to_string(),
            log,
            message: message.to_string(),
        }
    }
}

impl StakingHooks for FailingHooks {
    async fn on_event(&self, ctx: &BlockContext, event: &StakingEvent) -> Result<(), BoxError> {
        self.log.push(&self.name, ctx, event);
        Err(self.message.clone().into())
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// An account keeper with a fixed address codec.
#[derive(Debug, Clone)]
pub struct StaticAccountKeeper {
    codec: Arc<dyn AddressCodec>,
}

impl StaticAccountKeeper {
    /// Create an account keeper that renders addresses with `codec`.
    pub fn new(codec: impl AddressCodec + 'static) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }
}

impl AccountKeeper for StaticAccountKeeper {
    fn address_codec(&self) -> Arc<dyn AddressCodec> {
        Arc::clone(&self.codec)
    }
}

/// A bank keeper with settable balances.
#[derive(Debug, Default)]
pub struct StaticBankKeeper {
    balances: Mutex<HashMap<(Address, String), u128>>,
}

impl StaticBankKeeper {
    /// Create a bank keeper where every balance is zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the balance of `denom` held by `address`.
    pub fn set_balance(&self, address: Address, denom: &str, amount: u128) {
        self.balances
            .lock()
            .insert((address, denom.to_string()), amount);
    }
}

impl BankKeeper for StaticBankKeeper {
    fn balance(&self, address: &Address, denom: &str) -> u128 {
        self.balances
            .lock()
            .get(&(address.clone(), denom.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

/// An in-memory legacy parameter subspace.
#[derive(Debug, Default)]
pub struct MemSubspace {
    params: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemSubspace {
    /// Create an empty subspace.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LegacySubspace for MemSubspace {
    fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.params.lock().get(key).cloned()
    }

    fn set_raw(&self, key: &str, value: Vec<u8>) {
        self.params.lock().insert(key.to_string(), value);
    }

    fn is_empty(&self) -> bool {
        self.params.lock().is_empty()
    }
}

// ============================================================================
// Host Registrars
// ============================================================================

/// A service registrar that keeps every registered handler.
#[derive(Default)]
pub struct RecordingServiceRegistrar {
    services: BTreeMap<&'static str, ServiceHandler>,
}

impl RecordingServiceRegistrar {
    /// Create an empty registrar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered service names, ascending.
    pub fn names(&self) -> Vec<&'static str> {
        self.services.keys().copied().collect()
    }

    /// Downcast a registered handler to its concrete type.
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.services
            .get(name)
            .cloned()
            .and_then(|handler| handler.downcast::<T>().ok())
    }
}

impl ServiceRegistrar for RecordingServiceRegistrar {
    fn register_service(
        &mut self,
        name: &'static str,
        handler: ServiceHandler,
    ) -> Result<(), ServiceError> {
        if self.services.contains_key(name) {
            return Err(ServiceError::Duplicate(name.to_string()));
        }
        self.services.insert(name, handler);
        Ok(())
    }
}

/// An invariant registry that can run what it collected.
#[derive(Default)]
pub struct RecordingInvariantRegistry {
    routes: Vec<(String, Invariant)>,
}

impl RecordingInvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered routes as `module/route`, in registration order.
    pub fn routes(&self) -> Vec<&str> {
        self.routes.iter().map(|(route, _)| route.as_str()).collect()
    }

    /// Routes whose invariant is currently broken.
    pub fn broken(&self) -> Vec<String> {
        self.routes
            .iter()
            .filter(|(_, invariant)| invariant().broken)
            .map(|(route, _)| route.clone())
            .collect()
    }
}

impl InvariantRegistry for RecordingInvariantRegistry {
    fn register_route(&mut self, module: &str, route: &str, invariant: Invariant) {
        self.routes.push((format!("{module}/{route}"), invariant));
    }
}
