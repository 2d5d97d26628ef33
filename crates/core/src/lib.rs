//! Core types for dtoforge
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: Unified value enum held by instance slots and templates
//! - ValueType: Declared property type with its type default
//! - PropertyValue: Rust type bridge for type-checked property access
//! - Contract: Composable set of named, typed property declarations
//! - ContractType / PropertyRef: Static contracts and typed property handles
//! - Tagged2 / Tagged3: Tagged result unions
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod contract;
pub mod error;
mod macros;
pub mod tagged;
pub mod value;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use tagged::{Tagged2, Tagged3};
pub use value::{PropertyValue, Value, ValueType};

// Re-export contract types at crate root for convenience
pub use contract::{
    AccessorShape, Contract, ContractBuilder, ContractId, ContractType, Member, Mutability,
    PropertyMember, PropertyRef, Visibility, WriteAccess,
};
