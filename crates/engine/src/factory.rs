//! Reusable instance factories
//!
//! A `Factory<C>` pins the synthesized type of `C` once and keeps one staging
//! template. Each `create_instance` call activates the current template, so
//! a caller can tweak a few values between instances without rebuilding the
//! rest.

use crate::base::BaseType;
use crate::cache::TypeCache;
use crate::instance::Instance;
use crate::synthesizer::SynthesizedType;
use crate::template::{DynamicTemplate, Template};
use dtoforge_core::contract::ContractType;
use dtoforge_core::Result;
use std::sync::Arc;

/// Factory producing instances of contract `C`
#[derive(Debug)]
pub struct Factory<C> {
    template: Template<C>,
    ty: Arc<SynthesizedType>,
}

impl<C: ContractType> Factory<C> {
    /// Factory over the global cache
    pub fn new() -> Result<Self> {
        Self::in_cache(TypeCache::global())
    }

    /// Factory over `cache`
    pub fn in_cache(cache: &TypeCache) -> Result<Self> {
        Ok(Factory {
            template: Template::in_cache(cache),
            ty: cache.get::<C>()?,
        })
    }

    /// Factory whose instances carry a base value
    pub fn with_base(cache: &TypeCache, base: &BaseType) -> Result<Self> {
        Ok(Factory {
            template: Template::in_cache(cache),
            ty: cache.get_with_base::<C>(base)?,
        })
    }

    /// Factory starting from prepared template values
    pub fn from_template(cache: &TypeCache, template: Template<C>) -> Result<Self> {
        Ok(Factory {
            ty: cache.get::<C>()?,
            template,
        })
    }

    /// Type of the produced instances
    pub fn synthesized_type(&self) -> &Arc<SynthesizedType> {
        &self.ty
    }

    /// The staging template
    pub fn template(&self) -> &Template<C> {
        &self.template
    }

    /// The staging template, for edits between instances
    pub fn template_mut(&mut self) -> &mut Template<C> {
        &mut self.template
    }

    /// By-name access to the staging template
    pub fn dynamic(&mut self) -> DynamicTemplate<'_> {
        self.template.dynamic()
    }

    /// Activate the current template
    pub fn create_instance(&self) -> Result<Instance> {
        self.template.activate_as(&self.ty)
    }

    /// Endless stream of instances
    ///
    /// Yields an instance from the current template, then runs `templater`
    /// on the template before the next one. The stream ends after the first
    /// error.
    pub fn create_instances<F>(&mut self, templater: F) -> Instances<'_, C, F>
    where
        F: FnMut(&mut Template<C>) -> Result<()>,
    {
        Instances {
            factory: self,
            templater,
            started: false,
            done: false,
        }
    }
}

/// Iterator returned by [`Factory::create_instances`]
pub struct Instances<'a, C, F> {
    factory: &'a mut Factory<C>,
    templater: F,
    started: bool,
    done: bool,
}

impl<C, F> Iterator for Instances<'_, C, F>
where
    C: ContractType,
    F: FnMut(&mut Template<C>) -> Result<()>,
{
    type Item = Result<Instance>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.started {
            if let Err(e) = (self.templater)(&mut self.factory.template) {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.started = true;
        let result = self.factory.create_instance();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
