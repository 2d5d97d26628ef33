//! Contract definitions
//!
//! A `Contract` is an immutable, named set of member declarations plus an
//! ordered list of parent contracts. Parents are held as `Arc<Contract>` and
//! a contract can only reference contracts that were built before it, so the
//! lattice is always acyclic.

use super::member::{AccessorShape, Member, PropertyMember, Visibility};
use crate::value::{PropertyValue, ValueType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_CONTRACT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique contract identity
///
/// Assigned when a contract is built. Two separately built contracts never
/// share an id, even when their names and members are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractId(u64);

impl ContractId {
    fn next() -> Self {
        ContractId(NEXT_CONTRACT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "contract#{}", self.0)
    }
}

/// A declarative capability set of named, typed properties
#[derive(Debug)]
pub struct Contract {
    id: ContractId,
    name: String,
    members: Vec<Member>,
    parents: Vec<Arc<Contract>>,
    // this contract's id plus every ancestor id
    lineage: HashSet<ContractId>,
    depth: usize,
}

impl Contract {
    /// Start building a contract
    pub fn builder(name: impl Into<String>) -> ContractBuilder {
        ContractBuilder {
            name: name.into(),
            members: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Contract identity
    pub fn id(&self) -> ContractId {
        self.id
    }

    /// Contract name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members declared directly on this contract, in declaration order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Direct parents, in declaration order
    pub fn parents(&self) -> &[Arc<Contract>] {
        &self.parents
    }

    /// Properties declared directly on this contract, in declaration order
    pub fn own_properties(&self) -> impl Iterator<Item = &PropertyMember> {
        self.members.iter().filter_map(Member::as_property)
    }

    /// Every ancestor exactly once, depth-first post-order over parents
    ///
    /// An ancestor's own parents come before the ancestor itself. The
    /// contract itself is not included.
    pub fn ancestors(&self) -> Vec<Arc<Contract>> {
        let mut seen = HashSet::new();
        seen.insert(self.id);
        let mut out = Vec::new();
        for parent in &self.parents {
            collect_post_order(parent, &mut seen, &mut out);
        }
        out
    }

    /// Returns true if this contract is `id` or has it as an ancestor
    pub fn is_or_extends(&self, id: ContractId) -> bool {
        self.lineage.contains(&id)
    }

    /// Length of the longest parent chain, counting this contract
    pub fn depth(&self) -> usize {
        self.depth
    }
}

fn collect_post_order(
    contract: &Arc<Contract>,
    seen: &mut HashSet<ContractId>,
    out: &mut Vec<Arc<Contract>>,
) {
    if !seen.insert(contract.id) {
        return;
    }
    for parent in &contract.parents {
        collect_post_order(parent, seen, out);
    }
    out.push(Arc::clone(contract));
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Builder for [`Contract`]
#[derive(Debug)]
pub struct ContractBuilder {
    name: String,
    members: Vec<Member>,
    parents: Vec<Arc<Contract>>,
}

impl ContractBuilder {
    /// Add a parent contract
    pub fn extends(mut self, parent: Arc<Contract>) -> Self {
        self.parents.push(parent);
        self
    }

    /// Declare a public property typed by a Rust type
    pub fn property<T: PropertyValue>(self, name: impl Into<String>, accessors: AccessorShape) -> Self {
        self.member(name, T::value_type(), accessors, Visibility::Public)
    }

    /// Declare a restricted property typed by a Rust type
    pub fn restricted<T: PropertyValue>(
        self,
        name: impl Into<String>,
        accessors: AccessorShape,
    ) -> Self {
        self.member(name, T::value_type(), accessors, Visibility::Restricted)
    }

    /// Declare a property with an explicit value type
    pub fn member(
        mut self,
        name: impl Into<String>,
        value_type: ValueType,
        accessors: AccessorShape,
        visibility: Visibility,
    ) -> Self {
        self.members.push(Member::Property(PropertyMember {
            name: name.into(),
            value_type,
            accessors,
            visibility,
        }));
        self
    }

    /// Declare a behavioral member
    pub fn operation(mut self, name: impl Into<String>) -> Self {
        self.members.push(Member::Operation { name: name.into() });
        self
    }

    /// Finish the contract and assign its identity
    ///
    /// Lineage and depth are computed here from the parents' own values, so
    /// each contract in a lattice is visited once no matter how many paths
    /// lead to it.
    pub fn build(self) -> Arc<Contract> {
        let id = ContractId::next();
        let mut lineage = HashSet::new();
        lineage.insert(id);
        for parent in &self.parents {
            lineage.extend(parent.lineage.iter().copied());
        }
        let depth = 1 + self.parents.iter().map(|p| p.depth).max().unwrap_or(0);

        Arc::new(Contract {
            id,
            name: self.name,
            members: self.members,
            parents: self.parents,
            lineage,
            depth,
        })
    }
}
