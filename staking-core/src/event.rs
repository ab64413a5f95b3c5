//! Lifecycle events delivered to staking hooks.

use crate::address::Address;

/// A staking lifecycle event.
///
/// Every event names the addresses it concerns; hooks decide which events
/// they care about and ignore the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakingEvent {
    /// A validator was created.
    AfterValidatorCreated {
        /// Operator address.
        validator: Address,
    },
    /// A validator's description or commission is about to change.
    BeforeValidatorModified {
        /// Operator address.
        validator: Address,
    },
    /// A validator was deleted.
    AfterValidatorRemoved {
        /// Consensus address.
        consensus: Address,
        /// Operator address.
        validator: Address,
    },
    /// A validator entered the bonded set.
    AfterValidatorBonded {
        /// Consensus address.
        consensus: Address,
        /// Operator address.
        validator: Address,
    },
    /// A validator left the bonded set.
    AfterValidatorBeginUnbonding {
        /// Consensus address.
        consensus: Address,
        /// Operator address.
        validator: Address,
    },
    /// A delegation is about to be created.
    BeforeDelegationCreated {
        /// Delegator account.
        delegator: Address,
        /// Operator address.
        validator: Address,
    },
    /// A delegation's shares are about to change.
    BeforeDelegationSharesModified {
        /// Delegator account.
        delegator: Address,
        /// Operator address.
        validator: Address,
    },
    /// A delegation is about to be removed.
    BeforeDelegationRemoved {
        /// Delegator account.
        delegator: Address,
        /// Operator address.
        validator: Address,
    },
    /// A delegation was created or changed.
    AfterDelegationModified {
        /// Delegator account.
        delegator: Address,
        /// Operator address.
        validator: Address,
    },
    /// A validator is about to be slashed.
    BeforeValidatorSlashed {
        /// Operator address.
        validator: Address,
        /// Slash fraction as a decimal string.
        fraction: String,
    },
    /// An unbonding operation was started.
    AfterUnbondingInitiated {
        /// Unbonding operation id.
        id: u64,
    },
}

impl StakingEvent {
    /// Stable event name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AfterValidatorCreated { .. } => "after_validator_created",
            Self::BeforeValidatorModified { .. } => "before_validator_modified",
            Self::AfterValidatorRemoved { .. } => "after_validator_removed",
            Self::AfterValidatorBonded { .. } => "after_validator_bonded",
            Self::AfterValidatorBeginUnbonding { .. } => "after_validator_begin_unbonding",
            Self::BeforeDelegationCreated { .. } => "before_delegation_created",
            Self::BeforeDelegationSharesModified { .. } => "before_delegation_shares_modified",
            Self::BeforeDelegationRemoved { .. } => "before_delegation_removed",
            Self::AfterDelegationModified { .. } => "after_delegation_modified",
            Self::BeforeValidatorSlashed { .. } => "before_validator_slashed",
            Self::AfterUnbondingInitiated { .. } => "after_unbonding_initiated",
        }
    }

    /// The operator address the event concerns, if any.
    pub fn validator(&self) -> Option<&Address> {
        match self {
            Self::AfterValidatorCreated { validator }
            | Self::BeforeValidatorModified { validator }
            | Self::AfterValidatorRemoved { validator, .. }
            | Self::AfterValidatorBonded { validator, .. }
            | Self::AfterValidatorBeginUnbonding { validator, .. }
            | Self::BeforeDelegationCreated { validator, .. }
            | Self::BeforeDelegationSharesModified { validator, .. }
            | Self::BeforeDelegationRemoved { validator, .. }
            | Self::AfterDelegationModified { validator, .. }
            | Self::BeforeValidatorSlashed { validator, .. } => Some(validator),
            Self::AfterUnbondingInitiated { .. } => None,
        }
    }
}
