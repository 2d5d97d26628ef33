//! Contract members
//!
//! A contract declares members. Only property accessors are supported; an
//! `Operation` exists so that contracts with behavior can be described and
//! rejected during validation instead of being silently dropped.

use crate::value::ValueType;
use serde::{Deserialize, Serialize};

/// Write half of an accessor pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WriteAccess {
    /// No writer
    None,
    /// Writable only while the value is being constructed
    Init,
    /// Writable at any time
    Free,
}

/// Accessor pair declared for a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessorShape {
    /// Property has a reader
    pub read: bool,
    /// Property writer kind
    pub write: WriteAccess,
}

impl AccessorShape {
    /// Reader only
    pub const GET: AccessorShape = AccessorShape {
        read: true,
        write: WriteAccess::None,
    };

    /// Reader plus construction-time writer
    pub const GET_INIT: AccessorShape = AccessorShape {
        read: true,
        write: WriteAccess::Init,
    };

    /// Reader plus writer
    pub const GET_SET: AccessorShape = AccessorShape {
        read: true,
        write: WriteAccess::Free,
    };

    /// Writer only. Never classifies.
    pub const SET: AccessorShape = AccessorShape {
        read: false,
        write: WriteAccess::Free,
    };

    /// Create an accessor shape
    pub const fn new(read: bool, write: WriteAccess) -> Self {
        AccessorShape { read, write }
    }
}

/// Whether a slot may change after construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mutability {
    /// Fixed at construction
    Immutable,
    /// Writable after construction
    Mutable,
}

impl Mutability {
    /// Returns true for `Mutable`
    pub const fn is_mutable(&self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

/// Who may set a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Visibility {
    /// Part of the constructor and settable through templates
    #[default]
    Public,
    /// Storage-only: excluded from the constructor and from templates
    Restricted,
}

/// A property as declared by one contract
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyMember {
    /// Property name
    pub name: String,
    /// Declared value type
    pub value_type: ValueType,
    /// Declared accessor pair
    pub accessors: AccessorShape,
    /// Declared visibility
    pub visibility: Visibility,
}

/// A declared contract member
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Member {
    /// Property accessor
    Property(PropertyMember),
    /// Behavioral member
    Operation {
        /// Operation name
        name: String,
    },
}

impl Member {
    /// Member name
    pub fn name(&self) -> &str {
        match self {
            Member::Property(p) => &p.name,
            Member::Operation { name } => name,
        }
    }

    /// Get the property declaration, if this member is one
    pub fn as_property(&self) -> Option<&PropertyMember> {
        match self {
            Member::Property(p) => Some(p),
            Member::Operation { .. } => None,
        }
    }
}
