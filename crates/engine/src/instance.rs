//! Instances of synthesized types
//!
//! An `Instance` is the single record type behind every synthesized type: an
//! ordered set of `Value` slots plus, optionally, a base value. Typed access
//! goes through `PropertyRef` handles, which are checked against the
//! instance's contract and slot types at runtime.
//!
//! ## Dual view
//!
//! `view::<C>()` and `base::<B>()` both borrow the same instance, so there is
//! exactly one object regardless of which face is used.

use crate::synthesizer::{Slot, SynthesizedType};
use dtoforge_core::contract::{ContractType, PropertyRef};
use dtoforge_core::{Error, PropertyValue, Result, Value};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A value of a synthesized type
pub struct Instance {
    ty: Arc<SynthesizedType>,
    slots: Box<[Value]>,
    base: Option<Box<dyn Any + Send + Sync>>,
}

/// Which access path is asking for a slot
#[derive(Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Trusted,
}

impl Instance {
    pub(crate) fn from_parts(
        ty: Arc<SynthesizedType>,
        slots: Box<[Value]>,
        base: Option<Box<dyn Any + Send + Sync>>,
    ) -> Self {
        Instance { ty, slots, base }
    }

    /// Type of this instance
    pub fn synthesized_type(&self) -> &Arc<SynthesizedType> {
        &self.ty
    }

    /// Type name of this instance
    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    /// Read a public property
    ///
    /// # Errors
    ///
    /// - `UnknownProperty` if the property is not part of this type
    /// - `InaccessibleProperty` for restricted properties
    /// - `TypeMismatch` if `T` is not the declared type
    pub fn get<C: ContractType, T: PropertyValue>(&self, prop: PropertyRef<C, T>) -> Result<T> {
        let index = self.locate::<C, T>(prop.name(), Access::Public)?;
        self.read(index, prop.name())
    }

    /// Write a public mutable property
    ///
    /// # Errors
    ///
    /// As [`get`](Self::get), plus `ReadOnlyProperty` for immutable
    /// properties.
    pub fn set<C: ContractType, T: PropertyValue>(
        &mut self,
        prop: PropertyRef<C, T>,
        value: T,
    ) -> Result<()> {
        let index = self.locate::<C, T>(prop.name(), Access::Public)?;
        self.write(index, value)
    }

    /// Read a property regardless of visibility
    pub fn get_restricted<C: ContractType, T: PropertyValue>(
        &self,
        prop: PropertyRef<C, T>,
    ) -> Result<T> {
        let index = self.locate::<C, T>(prop.name(), Access::Trusted)?;
        self.read(index, prop.name())
    }

    /// Write a mutable property regardless of visibility
    ///
    /// Used by persistence layers that own storage-only flags.
    pub fn set_restricted<C: ContractType, T: PropertyValue>(
        &mut self,
        prop: PropertyRef<C, T>,
        value: T,
    ) -> Result<()> {
        let index = self.locate::<C, T>(prop.name(), Access::Trusted)?;
        self.write(index, value)
    }

    /// Slot values in resolved order
    pub fn values(&self) -> &[Value] {
        &self.slots
    }

    /// Value of a public property by name
    pub fn value(&self, name: &str) -> Option<&Value> {
        let index = self.ty.slot_index(name)?;
        if self.ty.slots()[index].is_public() {
            Some(&self.slots[index])
        } else {
            None
        }
    }

    /// Public `(slot, value)` pairs in resolved order
    pub fn public_values(&self) -> impl Iterator<Item = (&Slot, &Value)> {
        self.ty
            .slots()
            .iter()
            .zip(self.slots.iter())
            .filter(|(slot, _)| slot.is_public())
    }

    /// Borrow this instance as contract `C`
    ///
    /// # Errors
    ///
    /// Returns `ConstructorSignatureMismatch` when the instance does not
    /// implement `C`.
    pub fn view<C: ContractType>(&self) -> Result<View<'_, C>> {
        let contract = C::contract();
        if !self.ty.implements(contract.id()) {
            return Err(self.ty.signature_mismatch(format!(
                "instance does not implement contract '{}'",
                contract.name()
            )));
        }
        Ok(View {
            instance: self,
            _contract: PhantomData,
        })
    }

    /// Borrow the base value
    pub fn base<B: 'static>(&self) -> Option<&B> {
        self.base.as_ref()?.downcast_ref::<B>()
    }

    /// Mutably borrow the base value
    pub fn base_mut<B: 'static>(&mut self) -> Option<&mut B> {
        self.base.as_mut()?.downcast_mut::<B>()
    }

    fn locate<C: ContractType, T: PropertyValue>(&self, name: &str, access: Access) -> Result<usize> {
        let contract = C::contract();
        let index = if self.ty.implements(contract.id()) {
            self.ty.slot_index(name)
        } else {
            None
        };
        let index = index.ok_or_else(|| Error::unknown_property(self.ty.contract().name(), name))?;

        let slot = &self.ty.slots()[index];
        if access == Access::Public && !slot.is_public() {
            return Err(Error::inaccessible(slot.origin.clone(), name));
        }
        let expected = T::value_type();
        if slot.value_type != expected {
            return Err(Error::type_mismatch(name, &slot.value_type, expected.to_string()));
        }
        Ok(index)
    }

    fn read<T: PropertyValue>(&self, index: usize, name: &str) -> Result<T> {
        let value = self.slots[index].clone();
        let actual = value.type_name();
        T::from_value(value)
            .ok_or_else(|| Error::type_mismatch(name, &self.ty.slots()[index].value_type, actual))
    }

    fn write<T: PropertyValue>(&mut self, index: usize, value: T) -> Result<()> {
        let slot = &self.ty.slots()[index];
        if !slot.mutability.is_mutable() {
            return Err(Error::ReadOnlyProperty {
                property: slot.name.clone(),
            });
        }
        self.slots[index] = value.into_value();
        Ok(())
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.ty.name());
        for (slot, value) in self.ty.slots().iter().zip(self.slots.iter()) {
            s.field(&slot.name, value);
        }
        s.finish()
    }
}

/// An instance seen through contract `C`
pub struct View<'a, C> {
    instance: &'a Instance,
    _contract: PhantomData<fn() -> C>,
}

impl<'a, C: ContractType> View<'a, C> {
    /// Read a public property
    pub fn get<T: PropertyValue>(&self, prop: PropertyRef<C, T>) -> Result<T> {
        self.instance.get(prop)
    }

    /// The instance behind this view
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }
}

impl<C> Clone for View<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for View<'_, C> {}
