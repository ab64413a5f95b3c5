//! Module configuration.
//!
//! Every option is optional; empty values mean "use the default rule" as
//! described on each field. Configuration is read once at startup and consumed
//! by [`provide_module`](crate::provide_module).

use serde::{Deserialize, Serialize};
use staking_core::ConfigurationError;

/// Staking module configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleConfig {
    /// Address allowed to run privileged operations. Empty means the
    /// governance module account.
    pub authority: String,
    /// Prefix for validator operator addresses. Empty means derived from the
    /// auth prefix.
    pub bech32_prefix_validator: String,
    /// Prefix for validator consensus addresses. Empty means derived from the
    /// auth prefix.
    pub bech32_prefix_consensus: String,
    /// Order in which hook providers are invoked. Empty means sorted by name.
    pub hooks_order: Vec<String>,
}

/// The part of the auth module configuration staking depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Prefix for plain account addresses, e.g. `cosmos`.
    pub bech32_prefix: String,
}

/// Configuration document with one table per module.
///
/// ```toml
/// [auth]
/// bech32_prefix = "cosmos"
///
/// [staking]
/// hooks_order = ["distribution", "slashing"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Auth module table.
    pub auth: AuthConfig,
    /// Staking module table.
    pub staking: ModuleConfig,
}

impl AppConfig {
    /// Parse a TOML configuration document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(text).map_err(|err| ConfigurationError::Parse(err.to_string()))
    }
}
