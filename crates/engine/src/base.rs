//! Base types
//!
//! A synthesized type may carry a concrete Rust value alongside its property
//! slots. The base value is always produced by its empty constructor; a base
//! without one cannot be combined with a contract.

use dtoforge_core::{Error, Result};
use std::any::{Any, TypeId};
use std::fmt;

/// Empty constructor of a base type
pub type BaseFactory = fn() -> Box<dyn Any + Send + Sync>;

fn construct_default<B: Default + Send + Sync + 'static>() -> Box<dyn Any + Send + Sync> {
    Box::new(B::default())
}

/// Descriptor of a concrete Rust type used as a synthesis base
#[derive(Clone, Copy)]
pub struct BaseType {
    type_id: TypeId,
    type_name: &'static str,
    factory: Option<BaseFactory>,
}

impl BaseType {
    /// Base type with an empty constructor (`Default`)
    pub fn of<B: Default + Send + Sync + 'static>() -> Self {
        BaseType {
            type_id: TypeId::of::<B>(),
            type_name: std::any::type_name::<B>(),
            factory: Some(construct_default::<B>),
        }
    }

    /// Base type without an empty constructor
    ///
    /// Synthesis with an opaque base fails with `IncompatibleBaseType`.
    pub fn opaque<B: 'static>() -> Self {
        BaseType {
            type_id: TypeId::of::<B>(),
            type_name: std::any::type_name::<B>(),
            factory: None,
        }
    }

    /// Rust `TypeId` of the base
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified Rust type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Last path segment of the type name
    pub fn short_name(&self) -> &'static str {
        let path = self.type_name.split('<').next().unwrap_or(self.type_name);
        path.rsplit("::").next().unwrap_or(path)
    }

    /// Returns true if the base has an empty constructor
    pub fn has_empty_constructor(&self) -> bool {
        self.factory.is_some()
    }

    /// Run the empty constructor
    ///
    /// # Errors
    ///
    /// Returns `IncompatibleBaseType` for opaque bases.
    pub fn construct(&self) -> Result<Box<dyn Any + Send + Sync>> {
        match self.factory {
            Some(factory) => Ok(factory()),
            None => Err(Error::IncompatibleBaseType {
                base: self.short_name().to_string(),
            }),
        }
    }
}

impl PartialEq for BaseType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for BaseType {}

impl fmt::Debug for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseType")
            .field("type_name", &self.type_name)
            .field("empty_constructor", &self.factory.is_some())
            .finish()
    }
}
