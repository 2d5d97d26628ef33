//! Tagged result unions
//!
//! `Tagged2` and `Tagged3` hold at most one of two or three alternatives. The
//! default state holds none; resolving it is an error rather than a silent
//! no-op.
//!
//! ```
//! use dtoforge_core::Tagged2;
//!
//! let v: Tagged2<String, i64> = Tagged2::second(5);
//! let out = v.resolve(|s| s.len() as i64, |n| n * 2).unwrap();
//! assert_eq!(out, 10);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Union of two alternatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tagged2<T1, T2> {
    /// No alternative assigned
    Unresolved,
    /// First alternative
    First(T1),
    /// Second alternative
    Second(T2),
}

// Manual impls: the derive would require every alternative to be `Default`.
impl<T1, T2> Default for Tagged2<T1, T2> {
    fn default() -> Self {
        Tagged2::Unresolved
    }
}

impl<T1, T2> Tagged2<T1, T2> {
    /// Hold the first alternative
    pub fn first(value: T1) -> Self {
        Tagged2::First(value)
    }

    /// Hold the second alternative
    pub fn second(value: T2) -> Self {
        Tagged2::Second(value)
    }

    /// Returns true while no alternative is held
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Tagged2::Unresolved)
    }

    /// Dispatch to exactly one handler
    pub fn resolve<R>(self, on_first: impl FnOnce(T1) -> R, on_second: impl FnOnce(T2) -> R) -> Result<R> {
        match self {
            Tagged2::First(v) => Ok(on_first(v)),
            Tagged2::Second(v) => Ok(on_second(v)),
            Tagged2::Unresolved => Err(Error::UnresolvableState),
        }
    }

    /// Borrow the first alternative
    pub fn as_first(&self) -> Option<&T1> {
        match self {
            Tagged2::First(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the second alternative
    pub fn as_second(&self) -> Option<&T2> {
        match self {
            Tagged2::Second(v) => Some(v),
            _ => None,
        }
    }
}

impl<T1: Default, T2> Tagged2<T1, T2> {
    /// The first alternative, or `T1::default()` when another is held
    pub fn into_first(self) -> T1 {
        match self {
            Tagged2::First(v) => v,
            _ => T1::default(),
        }
    }
}

impl<T1, T2: Default> Tagged2<T1, T2> {
    /// The second alternative, or `T2::default()` when another is held
    pub fn into_second(self) -> T2 {
        match self {
            Tagged2::Second(v) => v,
            _ => T2::default(),
        }
    }
}

/// Union of three alternatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tagged3<T1, T2, T3> {
    /// No alternative assigned
    Unresolved,
    /// First alternative
    First(T1),
    /// Second alternative
    Second(T2),
    /// Third alternative
    Third(T3),
}

impl<T1, T2, T3> Default for Tagged3<T1, T2, T3> {
    fn default() -> Self {
        Tagged3::Unresolved
    }
}

impl<T1, T2, T3> Tagged3<T1, T2, T3> {
    /// Hold the first alternative
    pub fn first(value: T1) -> Self {
        Tagged3::First(value)
    }

    /// Hold the second alternative
    pub fn second(value: T2) -> Self {
        Tagged3::Second(value)
    }

    /// Hold the third alternative
    pub fn third(value: T3) -> Self {
        Tagged3::Third(value)
    }

    /// Returns true while no alternative is held
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Tagged3::Unresolved)
    }

    /// Dispatch to exactly one handler
    pub fn resolve<R>(
        self,
        on_first: impl FnOnce(T1) -> R,
        on_second: impl FnOnce(T2) -> R,
        on_third: impl FnOnce(T3) -> R,
    ) -> Result<R> {
        match self {
            Tagged3::First(v) => Ok(on_first(v)),
            Tagged3::Second(v) => Ok(on_second(v)),
            Tagged3::Third(v) => Ok(on_third(v)),
            Tagged3::Unresolved => Err(Error::UnresolvableState),
        }
    }

    /// Borrow the first alternative
    pub fn as_first(&self) -> Option<&T1> {
        match self {
            Tagged3::First(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the second alternative
    pub fn as_second(&self) -> Option<&T2> {
        match self {
            Tagged3::Second(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the third alternative
    pub fn as_third(&self) -> Option<&T3> {
        match self {
            Tagged3::Third(v) => Some(v),
            _ => None,
        }
    }
}

impl<T1: Default, T2, T3> Tagged3<T1, T2, T3> {
    /// The first alternative, or `T1::default()` when another is held
    pub fn into_first(self) -> T1 {
        match self {
            Tagged3::First(v) => v,
            _ => T1::default(),
        }
    }
}

impl<T1, T2: Default, T3> Tagged3<T1, T2, T3> {
    /// The second alternative, or `T2::default()` when another is held
    pub fn into_second(self) -> T2 {
        match self {
            Tagged3::Second(v) => v,
            _ => T2::default(),
        }
    }
}

impl<T1, T2, T3: Default> Tagged3<T1, T2, T3> {
    /// The third alternative, or `T3::default()` when another is held
    pub fn into_third(self) -> T3 {
        match self {
            Tagged3::Third(v) => v,
            _ => T3::default(),
        }
    }
}
