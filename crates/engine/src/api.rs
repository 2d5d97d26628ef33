//! Entry points
//!
//! Free functions operate on the process-wide cache (`TypeCache::global()`).
//! The same operations are available as methods on any `TypeCache` for
//! callers that manage their own cache.
//!
//! ```
//! use dtoforge_core::define_contract;
//! use dtoforge_engine::api;
//!
//! define_contract! {
//!     pub struct Point {
//!         x: i64 = GET,
//!         y: i64 = GET,
//!     }
//! }
//!
//! let p = api::create_instance_with::<Point, _>(|t| {
//!     t.set(Point::x, 3)?.set(Point::y, 4)?;
//!     Ok(())
//! })
//! .unwrap();
//! assert_eq!(p.get(Point::y).unwrap(), 4);
//! ```

use crate::base::BaseType;
use crate::cache::TypeCache;
use crate::instance::Instance;
use crate::synthesizer::SynthesizedType;
use crate::template::Template;
use crate::validator;
use dtoforge_core::contract::{Contract, ContractType};
use dtoforge_core::Result;
use std::sync::Arc;

impl TypeCache {
    /// Instance of `C` built by the empty constructor
    pub fn create_instance<C: ContractType>(&self) -> Result<Instance> {
        self.get::<C>()?.construct_empty()
    }

    /// Instance of `C` built from a template prepared by `build`
    pub fn create_instance_with<C, F>(&self, build: F) -> Result<Instance>
    where
        C: ContractType,
        F: FnOnce(&mut Template<C>) -> Result<()>,
    {
        let mut template = Template::<C>::in_cache(self);
        build(&mut template)?;
        template.activate()
    }

    /// Instance of a dynamically built contract, empty constructor
    pub fn create_instance_of(&self, contract: &Arc<Contract>) -> Result<Instance> {
        self.get_or_synthesize(contract, None)?.construct_empty()
    }

    /// Advisory validation of `C` against this cache's limits
    pub fn validate_contract<C: ContractType>(&self) -> bool {
        self.validate_contract_of(&C::contract())
    }

    /// Advisory validation of a contract against this cache's limits
    pub fn validate_contract_of(&self, contract: &Contract) -> bool {
        validator::validate_contract(contract, &self.config().limits)
    }
}

/// Synthesized type of `C`
pub fn get_type<C: ContractType>() -> Result<Arc<SynthesizedType>> {
    TypeCache::global().get::<C>()
}

/// Synthesized type of `C` over a base type
pub fn get_type_with_base<C: ContractType>(base: &BaseType) -> Result<Arc<SynthesizedType>> {
    TypeCache::global().get_with_base::<C>(base)
}

/// Synthesized type of a dynamically built contract
pub fn get_type_of(contract: &Arc<Contract>) -> Result<Arc<SynthesizedType>> {
    TypeCache::global().get_or_synthesize(contract, None)
}

/// Synthesized type of a dynamically built contract over a base type
pub fn get_type_of_with_base(contract: &Arc<Contract>, base: &BaseType) -> Result<Arc<SynthesizedType>> {
    TypeCache::global().get_or_synthesize(contract, Some(base))
}

/// Instance of `C` with every property at its type default
pub fn create_instance<C: ContractType>() -> Result<Instance> {
    TypeCache::global().create_instance::<C>()
}

/// Instance of `C` built from a template prepared by `build`
pub fn create_instance_with<C, F>(build: F) -> Result<Instance>
where
    C: ContractType,
    F: FnOnce(&mut Template<C>) -> Result<()>,
{
    TypeCache::global().create_instance_with(build)
}

/// Instance of `C` activated from an existing template
pub fn create_instance_from<C: ContractType>(template: &Template<C>) -> Result<Instance> {
    template.activate()
}

/// Instance of a dynamically built contract with every property at its
/// type default
pub fn create_instance_of(contract: &Arc<Contract>) -> Result<Instance> {
    TypeCache::global().create_instance_of(contract)
}

/// `true` if `C` would synthesize under the global cache's limits
pub fn validate_contract<C: ContractType>() -> bool {
    TypeCache::global().validate_contract::<C>()
}

/// `true` if a dynamically built contract would synthesize under the global
/// cache's limits
pub fn validate_contract_of(contract: &Contract) -> bool {
    TypeCache::global().validate_contract_of(contract)
}
