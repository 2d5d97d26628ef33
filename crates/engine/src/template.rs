//! Templates: staged property values
//!
//! A `Template<C>` collects prospective values for the public properties of
//! contract `C` and activates them into an instance through the full
//! constructor. Unset properties activate with their type default.
//!
//! Values that `C` has no place for are kept in an overflow map instead of
//! being dropped. Casting `A -> B -> A` therefore restores every value that
//! `B` lacked.

use crate::base::BaseType;
use crate::cache::TypeCache;
use crate::instance::Instance;
use crate::resolver::{ResolvedProperty, ResolvedPropertySet};
use crate::synthesizer::SynthesizedType;
use dtoforge_core::contract::{ContractType, PropertyRef};
use dtoforge_core::{Error, PropertyValue, Result, Value};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Staged values for contract `C`
pub struct Template<C> {
    cache: TypeCache,
    properties: Arc<ResolvedPropertySet>,
    values: HashMap<String, Value>,
    overflow: HashMap<String, Value>,
    _contract: PhantomData<fn() -> C>,
}

impl<C: ContractType> Template<C> {
    /// Empty template bound to the global cache
    pub fn new() -> Self {
        Self::in_cache(TypeCache::global())
    }

    /// Empty template bound to `cache`
    pub fn in_cache(cache: &TypeCache) -> Self {
        Template {
            cache: cache.clone(),
            properties: cache.resolved(&C::contract()),
            values: HashMap::new(),
            overflow: HashMap::new(),
            _contract: PhantomData,
        }
    }

    /// Snapshot the public properties of an instance
    ///
    /// The instance must implement `C` (directly or through a contract that
    /// extends it). Public values of the instance that `C` does not declare
    /// go to the overflow map.
    ///
    /// # Errors
    ///
    /// Returns `ConstructorSignatureMismatch` if the instance does not
    /// implement `C`.
    pub fn from_instance(instance: &Instance) -> Result<Self> {
        Self::from_instance_in(TypeCache::global(), instance)
    }

    /// Like [`from_instance`](Self::from_instance), bound to `cache`
    pub fn from_instance_in(cache: &TypeCache, instance: &Instance) -> Result<Self> {
        let contract = C::contract();
        let ty = instance.synthesized_type();
        if !ty.implements(contract.id()) {
            return Err(ty.signature_mismatch(format!(
                "instance does not implement contract '{}'",
                contract.name()
            )));
        }

        let mut template = Self::in_cache(cache);
        for (slot, value) in instance.public_values() {
            template.stage(slot.name.clone(), value.clone());
        }
        Ok(template)
    }

    /// Resolved properties of `C`
    pub fn properties(&self) -> &ResolvedPropertySet {
        &self.properties
    }

    /// Read a staged value, or the type default when unset
    pub fn get<P: ContractType, T: PropertyValue>(&self, prop: PropertyRef<P, T>) -> Result<T> {
        let declared = self.check::<P, T>(prop.name())?;
        let value = self
            .values
            .get(prop.name())
            .cloned()
            .unwrap_or_else(|| declared.value_type.default_value());
        decode(declared, value)
    }

    /// Read a staged value, `None` when unset
    pub fn try_get<P: ContractType, T: PropertyValue>(
        &self,
        prop: PropertyRef<P, T>,
    ) -> Result<Option<T>> {
        let declared = self.check::<P, T>(prop.name())?;
        match self.values.get(prop.name()) {
            Some(value) => decode(declared, value.clone()).map(Some),
            None => Ok(None),
        }
    }

    /// Stage a value
    ///
    /// # Errors
    ///
    /// - `UnknownProperty` if `C` does not have the property
    /// - `InaccessibleProperty` for restricted properties
    /// - `TypeMismatch` if `T` is not the declared type
    pub fn set<P: ContractType, T: PropertyValue>(
        &mut self,
        prop: PropertyRef<P, T>,
        value: T,
    ) -> Result<&mut Self> {
        self.check::<P, T>(prop.name())?;
        self.values.insert(prop.name().to_string(), value.into_value());
        Ok(self)
    }

    /// Remove a staged value
    pub fn unset<P: ContractType, T: PropertyValue>(
        &mut self,
        prop: PropertyRef<P, T>,
    ) -> Result<&mut Self> {
        self.check::<P, T>(prop.name())?;
        self.values.remove(prop.name());
        Ok(self)
    }

    /// Returns true if a value is staged for the property
    pub fn is_set<P, T>(&self, prop: PropertyRef<P, T>) -> bool {
        self.values.contains_key(prop.name())
    }

    /// Values carried for properties `C` does not declare
    pub fn overflow(&self) -> &HashMap<String, Value> {
        &self.overflow
    }

    /// Re-stage these values as a template of contract `D`
    ///
    /// Values of properties `D` declares with the same type are kept as `D`
    /// values; every other value, including this template's overflow, moves
    /// to the new overflow.
    pub fn cast<D: ContractType>(&self) -> Template<D> {
        let mut target = Template::<D>::in_cache(&self.cache);
        for (name, value) in self.overflow.iter().chain(self.values.iter()) {
            target.stage(name.clone(), value.clone());
        }
        debug!(
            target: "dtoforge::synth",
            from = self.properties.contract_name(),
            to = target.properties.contract_name(),
            kept = target.values.len(),
            overflow = target.overflow.len(),
            "Cast template"
        );
        target
    }

    /// Activate through the full constructor of `C`'s synthesized type
    pub fn activate(&self) -> Result<Instance> {
        let ty = self.cache.get::<C>()?;
        self.activate_as(&ty)
    }

    /// Activate through the full constructor of `C` over a base type
    pub fn activate_with_base(&self, base: &BaseType) -> Result<Instance> {
        let ty = self.cache.get_with_base::<C>(base)?;
        self.activate_as(&ty)
    }

    /// Activate through the full constructor of a given synthesized type
    ///
    /// # Errors
    ///
    /// Returns `ConstructorSignatureMismatch` if `ty` was synthesized for a
    /// different contract.
    pub fn activate_as(&self, ty: &Arc<SynthesizedType>) -> Result<Instance> {
        if ty.contract_id() != self.properties.contract_id() {
            return Err(ty.signature_mismatch(format!(
                "template is for contract '{}'",
                self.properties.contract_name()
            )));
        }
        let args = ty
            .full_constructor()
            .iter()
            .map(|param| {
                self.values
                    .get(&param.name)
                    .cloned()
                    .unwrap_or_else(|| param.value_type.default_value())
            })
            .collect();
        ty.construct(args)
    }

    /// Untyped by-name access to the staged values
    pub fn dynamic(&mut self) -> DynamicTemplate<'_> {
        DynamicTemplate {
            properties: &self.properties,
            values: &mut self.values,
        }
    }

    fn check<P: ContractType, T: PropertyValue>(&self, name: &str) -> Result<&ResolvedProperty> {
        let owner = P::contract();
        let contract = self.properties.contract_name();
        let declared = if C::contract().is_or_extends(owner.id()) {
            self.properties.get(name)
        } else {
            None
        };
        let declared = declared.ok_or_else(|| Error::unknown_property(contract, name))?;
        if !declared.is_public() {
            return Err(Error::inaccessible(declared.origin.clone(), name));
        }
        let expected = T::value_type();
        if declared.value_type != expected {
            return Err(Error::type_mismatch(name, &declared.value_type, expected.to_string()));
        }
        Ok(declared)
    }

    /// Place a value in `values` if `C` can hold it, otherwise in `overflow`
    ///
    /// A name can be held in both maps at once: the `C`-typed value in
    /// `values` and a value of another contract's type in `overflow`.
    fn stage(&mut self, name: String, value: Value) {
        let fits = self
            .properties
            .get(&name)
            .map_or(false, |p| p.is_public() && p.value_type.accepts(&value));
        if fits {
            if let Some(displaced) = self.values.insert(name.clone(), value) {
                self.overflow.insert(name, displaced);
            }
        } else {
            self.overflow.insert(name, value);
        }
    }
}

fn decode<T: PropertyValue>(declared: &ResolvedProperty, value: Value) -> Result<T> {
    let actual = value.type_name();
    T::from_value(value).ok_or_else(|| Error::type_mismatch(&declared.name, &declared.value_type, actual))
}

impl<C: ContractType> Default for Template<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for Template<C> {
    fn clone(&self) -> Self {
        Template {
            cache: self.cache.clone(),
            properties: Arc::clone(&self.properties),
            values: self.values.clone(),
            overflow: self.overflow.clone(),
            _contract: PhantomData,
        }
    }
}

impl<C> fmt::Debug for Template<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("contract", &self.properties.contract_name())
            .field("values", &self.values)
            .field("overflow", &self.overflow)
            .finish()
    }
}

/// By-name view over a template's staged values
///
/// Explicitly dynamic: names and types are checked at runtime only.
pub struct DynamicTemplate<'a> {
    properties: &'a ResolvedPropertySet,
    values: &'a mut HashMap<String, Value>,
}

impl DynamicTemplate<'_> {
    /// Staged value, or the type default when unset
    pub fn get(&self, name: &str) -> Result<Value> {
        let declared = self.declared(name)?;
        Ok(self
            .values
            .get(name)
            .cloned()
            .unwrap_or_else(|| declared.value_type.default_value()))
    }

    /// Stage a value by name
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let declared = self.declared(name)?;
        if !declared.value_type.accepts(&value) {
            return Err(Error::type_mismatch(name, &declared.value_type, value.type_name()));
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Remove a staged value by name
    pub fn unset(&mut self, name: &str) -> Result<Option<Value>> {
        self.declared(name)?;
        Ok(self.values.remove(name))
    }

    /// Public property names in resolved order
    pub fn names(&self) -> Vec<&str> {
        self.properties.public().map(|p| p.name.as_str()).collect()
    }

    fn declared(&self, name: &str) -> Result<&ResolvedProperty> {
        let declared = self
            .properties
            .get(name)
            .ok_or_else(|| Error::unknown_property(self.properties.contract_name(), name))?;
        if !declared.is_public() {
            return Err(Error::inaccessible(declared.origin.clone(), name));
        }
        Ok(declared)
    }
}
