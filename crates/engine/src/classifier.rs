//! Mutability classification
//!
//! | read | write | result      |
//! |------|-------|-------------|
//! | yes  | none  | Immutable   |
//! | yes  | init  | Immutable   |
//! | yes  | free  | Mutable     |
//! | no   | free  | write-only  |
//! | no   | init  | write-only  |
//! | no   | none  | no accessor |

use dtoforge_core::contract::{AccessorShape, Mutability, WriteAccess};
use std::fmt;

/// Accessor shape that does not describe a storable property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// Writer without a reader
    WriteOnly,
    /// Neither reader nor writer
    NoAccessor,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::WriteOnly => write!(f, "write-only properties are not supported"),
            ShapeError::NoAccessor => write!(f, "property declares no accessor"),
        }
    }
}

/// Classify an accessor shape
pub fn classify(shape: AccessorShape) -> Result<Mutability, ShapeError> {
    match (shape.read, shape.write) {
        (true, WriteAccess::None) | (true, WriteAccess::Init) => Ok(Mutability::Immutable),
        (true, WriteAccess::Free) => Ok(Mutability::Mutable),
        (false, WriteAccess::None) => Err(ShapeError::NoAccessor),
        (false, _) => Err(ShapeError::WriteOnly),
    }
}
