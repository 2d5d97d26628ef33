//! Contract validation
//!
//! Checks run in a fixed order over the contract and each of its ancestors
//! (every contract visited once):
//!
//! 1. unsupported members: operations and accessor shapes that do not classify
//! 2. name conflicts: one name with two different types anywhere in the
//!    lattice, or one name declared twice by the same contract
//! 3. configured limits: lattice depth and resolved property count
//!
//! The same name with the same type declared by two different contracts is
//! not an error; resolution keeps the first declaration.

use crate::classifier::classify;
use crate::config::LimitsConfig;
use dtoforge_core::contract::{Contract, Member};
use dtoforge_core::{Error, Result, ValueType};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::debug;

/// Validate a contract lattice
///
/// # Errors
///
/// - `UnsupportedMember` for operations and unclassifiable accessors
/// - `PropertyNameConflict` for incompatible duplicate names
/// - `LimitExceeded` when the lattice exceeds configured limits
pub fn validate(contract: &Contract, limits: &LimitsConfig) -> Result<()> {
    let ancestors = contract.ancestors();
    let lattice: Vec<&Contract> = std::iter::once(contract)
        .chain(ancestors.iter().map(Arc::as_ref))
        .collect();

    check_members(&lattice)?;
    let distinct = check_names(&lattice)?;
    check_limits(contract, distinct, limits)?;
    Ok(())
}

/// Advisory check: `true` when `validate` would succeed
pub fn validate_contract(contract: &Contract, limits: &LimitsConfig) -> bool {
    match validate(contract, limits) {
        Ok(()) => true,
        Err(e) => {
            debug!(target: "dtoforge::synth", contract = contract.name(), error = %e, "Contract is invalid");
            false
        }
    }
}

fn check_members(lattice: &[&Contract]) -> Result<()> {
    for contract in lattice {
        for member in contract.members() {
            let reason = match member {
                Member::Operation { .. } => Some("operations are not supported".to_string()),
                Member::Property(p) => classify(p.accessors).err().map(|e| e.to_string()),
            };
            if let Some(reason) = reason {
                return Err(Error::UnsupportedMember {
                    contract: contract.name().to_string(),
                    member: member.name().to_string(),
                    reason,
                });
            }
        }
    }
    Ok(())
}

/// Returns the number of distinct property names
fn check_names(lattice: &[&Contract]) -> Result<usize> {
    let mut first_seen: FxHashMap<&str, (&str, &ValueType)> = FxHashMap::default();

    for &contract in lattice {
        let mut local = FxHashSet::default();
        for prop in contract.own_properties() {
            if !local.insert(prop.name.as_str()) {
                return Err(Error::PropertyNameConflict {
                    name: prop.name.clone(),
                    first_origin: contract.name().to_string(),
                    first_type: prop.value_type.clone(),
                    second_origin: contract.name().to_string(),
                    second_type: prop.value_type.clone(),
                });
            }
            match first_seen.get(prop.name.as_str()) {
                Some((origin, ty)) if **ty != prop.value_type => {
                    return Err(Error::PropertyNameConflict {
                        name: prop.name.clone(),
                        first_origin: origin.to_string(),
                        first_type: (*ty).clone(),
                        second_origin: contract.name().to_string(),
                        second_type: prop.value_type.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    first_seen.insert(prop.name.as_str(), (contract.name(), &prop.value_type));
                }
            }
        }
    }
    Ok(first_seen.len())
}

fn check_limits(contract: &Contract, properties: usize, limits: &LimitsConfig) -> Result<()> {
    let depth = contract.depth();
    if depth > limits.max_lattice_depth {
        return Err(Error::LimitExceeded {
            contract: contract.name().to_string(),
            what: "lattice depth",
            limit: limits.max_lattice_depth,
            actual: depth,
        });
    }
    if properties > limits.max_properties {
        return Err(Error::LimitExceeded {
            contract: contract.name().to_string(),
            what: "property count",
            limit: limits.max_properties,
            actual: properties,
        });
    }
    Ok(())
}
