//! Property resolution
//!
//! Flattens a contract lattice into one ordered, name-unique list of
//! properties. Order:
//!
//! 1. the contract's own declarations, in declaration order
//! 2. every ancestor exactly once, depth-first post-order over parents in
//!    declaration order, each contributing its own declarations
//!
//! The first declaration of a name wins. Later declarations of the same name
//! are skipped; whether they are compatible is the validator's concern.

use dtoforge_core::contract::{AccessorShape, Contract, ContractId, Visibility};
use dtoforge_core::ValueType;
use rustc_hash::FxHashSet;

/// A property after resolution, tagged with the contract that declared it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProperty {
    /// Property name
    pub name: String,
    /// Declared value type
    pub value_type: ValueType,
    /// Declared accessor pair
    pub accessors: AccessorShape,
    /// Declared visibility
    pub visibility: Visibility,
    /// Name of the declaring contract
    pub origin: String,
}

impl ResolvedProperty {
    /// Returns true for public properties
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// Ordered, deduplicated property list of one contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPropertySet {
    contract_id: ContractId,
    contract_name: String,
    properties: Vec<ResolvedProperty>,
}

impl ResolvedPropertySet {
    /// Contract this set was resolved from
    pub fn contract_id(&self) -> ContractId {
        self.contract_id
    }

    /// Name of the contract this set was resolved from
    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    /// Properties in resolved order
    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedProperty> {
        self.properties.iter()
    }

    /// Public properties in resolved order
    pub fn public(&self) -> impl Iterator<Item = &ResolvedProperty> {
        self.properties.iter().filter(|p| p.is_public())
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if the contract resolves to no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Look up a property by name
    pub fn get(&self, name: &str) -> Option<&ResolvedProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Property names in resolved order
    pub fn names(&self) -> Vec<&str> {
        self.properties.iter().map(|p| p.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a ResolvedPropertySet {
    type Item = &'a ResolvedProperty;
    type IntoIter = std::slice::Iter<'a, ResolvedProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

/// Resolve the full property list of a contract
///
/// Total: never fails. Operations are ignored.
pub fn resolve(contract: &Contract) -> ResolvedPropertySet {
    let mut seen = FxHashSet::default();
    let mut properties = Vec::new();

    let mut take = |source: &Contract| {
        for decl in source.own_properties() {
            if seen.insert(decl.name.clone()) {
                properties.push(ResolvedProperty {
                    name: decl.name.clone(),
                    value_type: decl.value_type.clone(),
                    accessors: decl.accessors,
                    visibility: decl.visibility,
                    origin: source.name().to_string(),
                });
            }
        }
    };

    take(contract);
    for ancestor in contract.ancestors() {
        take(ancestor.as_ref());
    }

    ResolvedPropertySet {
        contract_id: contract.id(),
        contract_name: contract.name().to_string(),
        properties,
    }
}
