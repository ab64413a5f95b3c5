use super::Keeper;
use crate::MODULE_NAME;
use staking_core::{InvariantOutcome, InvariantRegistry};
use std::{collections::BTreeMap, sync::Arc};

/// Route of the non-negative shares check.
pub const NONNEGATIVE_SHARES_ROUTE: &str = "nonnegative-shares";

/// Route of the delegator shares check.
pub const DELEGATOR_SHARES_ROUTE: &str = "delegator-shares";

/// Register the keeper's invariants.
pub fn register_invariants(registry: &mut dyn InvariantRegistry, keeper: Arc<Keeper>) {
    let k = Arc::clone(&keeper);
    registry.register_route(
        MODULE_NAME,
        NONNEGATIVE_SHARES_ROUTE,
        Box::new(move || nonnegative_shares(&k)),
    );
    registry.register_route(
        MODULE_NAME,
        DELEGATOR_SHARES_ROUTE,
        Box::new(move || delegator_shares(&keeper)),
    );
}

/// Every stored delegation holds a positive number of shares.
fn nonnegative_shares(keeper: &Keeper) -> InvariantOutcome {
    let delegations = match keeper.delegations() {
        Ok(delegations) => delegations,
        Err(err) => return outcome(NONNEGATIVE_SHARES_ROUTE, vec![err.to_string()]),
    };

    let problems = delegations
        .iter()
        .filter(|delegation| delegation.shares == 0)
        .map(|delegation| {
            format!(
                "delegation with zero shares: {} -> {}",
                delegation.delegator_address, delegation.validator_address
            )
        })
        .collect();
    outcome(NONNEGATIVE_SHARES_ROUTE, problems)
}

/// Each validator's delegator shares equal the sum of its delegations.
fn delegator_shares(keeper: &Keeper) -> InvariantOutcome {
    let (validators, delegations) = match (keeper.validators(), keeper.delegations()) {
        (Ok(validators), Ok(delegations)) => (validators, delegations),
        (Err(err), _) | (_, Err(err)) => {
            return outcome(DELEGATOR_SHARES_ROUTE, vec![err.to_string()]);
        }
    };

    let mut sums: BTreeMap<&str, u128> = BTreeMap::new();
    for delegation in &delegations {
        *sums.entry(delegation.validator_address.as_str()).or_default() +=
            u128::from(delegation.shares);
    }

    let mut problems = Vec::new();
    for validator in &validators {
        let expected = u128::from(validator.delegator_shares);
        let actual = sums
            .remove(validator.operator_address.as_str())
            .unwrap_or_default();
        if expected != actual {
            problems.push(format!(
                "validator {} has {} delegator shares but delegations sum to {}",
                validator.operator_address, expected, actual
            ));
        }
    }
    for orphan in sums.keys() {
        problems.push(format!("delegation to unknown validator {orphan}"));
    }

    outcome(DELEGATOR_SHARES_ROUTE, problems)
}

fn outcome(route: &str, problems: Vec<String>) -> InvariantOutcome {
    if problems.is_empty() {
        InvariantOutcome {
            message: format!("{MODULE_NAME}: {route} invariant holds"),
            broken: false,
        }
    } else {
        InvariantOutcome {
            message: format!(
                "{MODULE_NAME}: {route} invariant broken\n{}",
                problems.join("\n")
            ),
            broken: true,
        }
    }
}
