//! Records the keeper persists and exchanges through genesis.

use serde::{Deserialize, Serialize};

/// Tokens per unit of consensus power.
pub const POWER_REDUCTION: u64 = 1_000_000;

/// Module parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Duration of the unbonding period.
    pub unbonding_time_secs: u64,
    /// Size of the bonded validator set.
    pub max_validators: u32,
    /// Maximum unbonding or redelegation entries per pair.
    pub max_entries: u32,
    /// Number of historical round markers to keep.
    pub historical_entries: u32,
    /// Denomination that can be bonded.
    pub bond_denom: String,
    /// Lowest commission rate a validator may charge, as a decimal string.
    ///
    /// Absent from records written before schema version 3.
    #[serde(default)]
    pub min_commission_rate: String,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            unbonding_time_secs: 21 * 24 * 60 * 60,
            max_validators: 100,
            max_entries: 7,
            historical_entries: 10_000,
            bond_denom: "stake".to_string(),
            min_commission_rate: "0".to_string(),
        }
    }
}

impl Params {
    /// Check the parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.bond_denom.trim().is_empty() {
            return Err("bond denom cannot be blank".to_string());
        }
        if self.max_validators == 0 {
            return Err("max validators must be positive".to_string());
        }
        if self.max_entries == 0 {
            return Err("max entries must be positive".to_string());
        }
        if self.unbonding_time_secs == 0 {
            return Err("unbonding time must be positive".to_string());
        }
        match parse_rate(&self.min_commission_rate) {
            Some(rate) if (0.0..=1.0).contains(&rate) => Ok(()),
            Some(_) => Err(format!(
                "minimum commission rate {} must be between 0 and 1",
                self.min_commission_rate
            )),
            None => Err(format!(
                "minimum commission rate {:?} is not a decimal",
                self.min_commission_rate
            )),
        }
    }
}

// Plain decimal notation only: no sign, exponent, or special values.
fn parse_rate(text: &str) -> Option<f64> {
    let well_formed = !text.is_empty()
        && text.chars().all(|c| c.is_ascii_digit() || c == '.')
        && text.matches('.').count() <= 1
        && !text.starts_with('.')
        && !text.ends_with('.');
    if !well_formed {
        return None;
    }
    text.parse().ok()
}

/// Bonding state of a validator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondStatus {
    /// Not in the active set and not unbonding.
    #[default]
    Unbonded,
    /// Left the active set, tokens are maturing.
    Unbonding,
    /// In the active set.
    Bonded,
}

/// A validator record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// Operator address rendered with the validator codec.
    pub operator_address: String,
    /// Consensus public key bytes.
    pub consensus_pubkey: Vec<u8>,
    /// Bonding state.
    #[serde(default)]
    pub status: BondStatus,
    /// Bonded tokens.
    pub tokens: u64,
    /// Total shares issued to delegators.
    pub delegator_shares: u64,
    /// Whether the validator is jailed.
    #[serde(default)]
    pub jailed: bool,
}

impl Validator {
    /// Power this validator would have if bonded.
    pub fn potential_power(&self) -> i64 {
        i64::try_from(self.tokens / POWER_REDUCTION).unwrap_or(i64::MAX)
    }

    /// Power this validator currently contributes.
    pub fn consensus_power(&self) -> i64 {
        if self.status == BondStatus::Bonded {
            self.potential_power()
        } else {
            0
        }
    }
}

/// A delegation from an account to a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    /// Delegator address rendered with the account codec.
    pub delegator_address: String,
    /// Operator address rendered with the validator codec.
    pub validator_address: String,
    /// Shares held.
    pub shares: u64,
}

/// Power a validator had at the end of the previous round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastValidatorPower {
    /// Operator address rendered with the validator codec.
    pub address: String,
    /// Consensus power.
    pub power: i64,
}

/// The module's genesis state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisState {
    /// Module parameters.
    pub params: Params,
    /// Sum of the last validator powers.
    pub last_total_power: i64,
    /// Validator powers at export time.
    pub last_validator_powers: Vec<LastValidatorPower>,
    /// Every validator.
    pub validators: Vec<Validator>,
    /// Every delegation.
    pub delegations: Vec<Delegation>,
    /// Whether the state was produced by an export.
    pub exported: bool,
}

/// Token balances of the staking pool accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Tokens held by bonded validators.
    pub bonded_tokens: u128,
    /// Tokens that are unbonding or never bonded.
    pub not_bonded_tokens: u128,
}

/// Stored marker for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalInfo {
    /// Round height.
    pub height: u64,
    /// Round time.
    pub time_unix_secs: u64,
    /// Bonded operator addresses at that round.
    pub validator_set: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert_eq!(Params::default().validate(), Ok(()));
    }

    #[test]
    fn params_bounds() {
        let invalid = [
            Params {
                bond_denom: " ".into(),
                ..Params::default()
            },
            Params {
                max_validators: 0,
                ..Params::default()
            },
            Params {
                min_commission_rate: "1.5".into(),
                ..Params::default()
            },
            Params {
                min_commission_rate: "-0.1".into(),
                ..Params::default()
            },
            Params {
                min_commission_rate: "abc".into(),
                ..Params::default()
            },
            Params {
                min_commission_rate: String::new(),
                ..Params::default()
            },
        ];
        for params in invalid {
            assert!(params.validate().is_err(), "{params:?}");
        }

        let ok = Params {
            min_commission_rate: "0.05".into(),
            ..Params::default()
        };
        assert_eq!(ok.validate(), Ok(()));
    }

    #[test]
    fn consensus_power_requires_bonding() {
        let mut validator = Validator {
            operator_address: "v".into(),
            consensus_pubkey: vec![1],
            status: BondStatus::Unbonded,
            tokens: 12_500_000,
            delegator_shares: 12_500_000,
            jailed: false,
        };
        assert_eq!(validator.potential_power(), 12);
        assert_eq!(validator.consensus_power(), 0);
        validator.status = BondStatus::Bonded;
        assert_eq!(validator.consensus_power(), 12);
    }

    #[test]
    fn params_without_commission_rate_decode() {
        let params: Params = serde_json::from_str(
            r#"{"unbonding_time_secs":1,"max_validators":1,"max_entries":1,"historical_entries":0,"bond_denom":"stake"}"#,
        )
        .unwrap();
        assert!(params.min_commission_rate.is_empty());
    }
}
