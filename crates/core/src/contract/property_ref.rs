//! Statically declared contracts and typed property references

use super::definition::Contract;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A contract known at compile time
///
/// Implemented by the unit structs that `define_contract!` generates. The
/// returned contract must be the same `Arc` on every call so that its
/// `ContractId` is stable.
pub trait ContractType: 'static {
    /// The contract definition
    fn contract() -> Arc<Contract>;
}

/// Typed reference to a property declared by contract `C`
///
/// References declared on a parent contract can be used wherever a child
/// contract is expected; membership is checked against the resolved property
/// set when the reference is used.
pub struct PropertyRef<C, T> {
    name: &'static str,
    _marker: PhantomData<fn() -> (C, T)>,
}

impl<C, T> PropertyRef<C, T> {
    /// Create a reference to the property `name`
    pub const fn new(name: &'static str) -> Self {
        PropertyRef {
            name,
            _marker: PhantomData,
        }
    }

    /// Property name
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<C, T> Clone for PropertyRef<C, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, T> Copy for PropertyRef<C, T> {}

impl<C, T> fmt::Debug for PropertyRef<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyRef").field(&self.name).finish()
    }
}
