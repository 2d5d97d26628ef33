//! Error types for dtoforge
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::value::ValueType;
use std::io;
use thiserror::Error;

/// Result type alias for dtoforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for contract validation, synthesis and construction
#[derive(Debug, Error)]
pub enum Error {
    /// Contract declares a member that is not a well-formed property accessor
    #[error("Unsupported member '{member}' on contract '{contract}': {reason}")]
    UnsupportedMember {
        /// Contract that declares the member
        contract: String,
        /// Member name
        member: String,
        /// Why the member was rejected
        reason: String,
    },

    /// The same property name is declared with incompatible types
    #[error(
        "Property name conflict for '{name}': {first_type} in '{first_origin}' vs {second_type} in '{second_origin}'"
    )]
    PropertyNameConflict {
        /// Conflicting property name
        name: String,
        /// Contract where the name was first seen
        first_origin: String,
        /// Type of the first declaration
        first_type: ValueType,
        /// Contract of the conflicting declaration
        second_origin: String,
        /// Type of the conflicting declaration
        second_type: ValueType,
    },

    /// Base type has no reachable empty constructor
    #[error("Incompatible base type '{base}': no empty constructor")]
    IncompatibleBaseType {
        /// Base type name
        base: String,
    },

    /// Attempt to set a restricted property through the public surface
    #[error("Property '{contract}.{property}' is restricted and cannot be set by a template")]
    InaccessibleProperty {
        /// Contract name
        contract: String,
        /// Property name
        property: String,
    },

    /// Activation values do not match the constructor signature
    #[error("Constructor signature mismatch for '{type_name}': {reason}")]
    ConstructorSignatureMismatch {
        /// Synthesized type name
        type_name: String,
        /// What did not match
        reason: String,
    },

    /// Tagged union resolved before any variant was assigned
    #[error("Unresolvable state: tagged union holds no variant")]
    UnresolvableState,

    /// Property is not part of the contract
    #[error("Unknown property '{property}' on contract '{contract}'")]
    UnknownProperty {
        /// Contract name
        contract: String,
        /// Property name
        property: String,
    },

    /// Value type does not match the declared property type
    #[error("Type mismatch for '{property}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Property name
        property: String,
        /// Declared type
        expected: ValueType,
        /// Supplied type
        actual: String,
    },

    /// Write to a property that is fixed at construction
    #[error("Property '{property}' is read-only after construction")]
    ReadOnlyProperty {
        /// Property name
        property: String,
    },

    /// Configured limit exceeded
    #[error("Limit exceeded for contract '{contract}': {what} is {actual}, max {limit}")]
    LimitExceeded {
        /// Contract name
        contract: String,
        /// Limit name
        what: &'static str,
        /// Configured maximum
        limit: usize,
        /// Observed value
        actual: usize,
    },

    /// Encoding or decoding failure in a codec adapter
    #[error("Codec error: {0}")]
    Codec(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error (config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build a `TypeMismatch` error
    pub fn type_mismatch(property: impl Into<String>, expected: &ValueType, actual: impl Into<String>) -> Self {
        Error::TypeMismatch {
            property: property.into(),
            expected: expected.clone(),
            actual: actual.into(),
        }
    }

    /// Build an `UnknownProperty` error
    pub fn unknown_property(contract: impl Into<String>, property: impl Into<String>) -> Self {
        Error::UnknownProperty {
            contract: contract.into(),
            property: property.into(),
        }
    }

    /// Build an `InaccessibleProperty` error
    pub fn inaccessible(contract: impl Into<String>, property: impl Into<String>) -> Self {
        Error::InaccessibleProperty {
            contract: contract.into(),
            property: property.into(),
        }
    }

    /// Returns true for errors raised while validating a contract definition
    pub fn is_contract_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedMember { .. }
                | Error::PropertyNameConflict { .. }
                | Error::LimitExceeded { .. }
        )
    }
}
