//! Type synthesis
//!
//! Turns a validated contract (and optionally a base type) into a
//! `SynthesizedType`: one typed slot per resolved property, an empty
//! constructor and one fully parameterized constructor.
//!
//! ## Constructors
//!
//! - empty: no parameters, every slot at its type default
//! - full: one positional parameter per public property in resolved order;
//!   restricted properties are storage-only and start at their type default
//!
//! Both constructors finish by running the base type's empty constructor.

use crate::base::BaseType;
use crate::classifier::classify;
use crate::config::EngineConfig;
use crate::instance::Instance;
use crate::resolver::{resolve, ResolvedPropertySet};
use crate::validator::validate;
use dtoforge_core::contract::{Contract, ContractId, Mutability, Visibility};
use dtoforge_core::{Error, Result, Value, ValueType};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage slot of a synthesized type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Property name
    pub name: String,
    /// Declared value type
    pub value_type: ValueType,
    /// Whether the slot is writable after construction
    pub mutability: Mutability,
    /// Whether the slot is part of the public surface
    pub visibility: Visibility,
    /// Contract that declared the property
    pub origin: String,
}

impl Slot {
    /// Returns true for public slots
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// One positional parameter of the full constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Property name
    pub name: String,
    /// Expected value type
    pub value_type: ValueType,
}

/// Concrete type synthesized for a contract
#[derive(Debug)]
pub struct SynthesizedType {
    name: String,
    contract: Arc<Contract>,
    properties: Arc<ResolvedPropertySet>,
    slots: Vec<Slot>,
    index: FxHashMap<String, usize>,
    parameters: Vec<Parameter>,
    // slot index of each constructor parameter
    parameter_slots: Vec<usize>,
    base: Option<BaseType>,
}

/// Validate, resolve and synthesize a contract
///
/// # Errors
///
/// Any validation error, or `IncompatibleBaseType` when `base` has no empty
/// constructor.
pub fn synthesize(
    contract: &Arc<Contract>,
    base: Option<&BaseType>,
    config: &EngineConfig,
) -> Result<SynthesizedType> {
    synthesize_resolved(contract, Arc::new(resolve(contract)), base, config)
}

/// Synthesize from an already resolved property set
pub(crate) fn synthesize_resolved(
    contract: &Arc<Contract>,
    properties: Arc<ResolvedPropertySet>,
    base: Option<&BaseType>,
    config: &EngineConfig,
) -> Result<SynthesizedType> {
    if let Err(e) = validate(contract, &config.limits) {
        warn!(target: "dtoforge::synth", contract = contract.name(), error = %e, "Rejected contract");
        return Err(e);
    }
    if let Some(base) = base {
        if !base.has_empty_constructor() {
            warn!(target: "dtoforge::synth", contract = contract.name(), base = base.short_name(), "Rejected base type");
            return Err(Error::IncompatibleBaseType {
                base: base.short_name().to_string(),
            });
        }
    }

    let mut slots = Vec::with_capacity(properties.len());
    let mut index = FxHashMap::default();
    let mut parameters = Vec::new();
    let mut parameter_slots = Vec::new();

    for (i, prop) in properties.iter().enumerate() {
        // validated above, so every shape classifies
        let mutability = classify(prop.accessors).map_err(|e| Error::UnsupportedMember {
            contract: prop.origin.clone(),
            member: prop.name.clone(),
            reason: e.to_string(),
        })?;
        if prop.is_public() {
            parameters.push(Parameter {
                name: prop.name.clone(),
                value_type: prop.value_type.clone(),
            });
            parameter_slots.push(i);
        }
        index.insert(prop.name.clone(), i);
        slots.push(Slot {
            name: prop.name.clone(),
            value_type: prop.value_type.clone(),
            mutability,
            visibility: prop.visibility,
            origin: prop.origin.clone(),
        });
    }

    let name = match base {
        Some(base) => format!("{}.{}", base.short_name(), contract.name()),
        None => contract.name().to_string(),
    };

    if config.trace_synthesis {
        info!(target: "dtoforge::synth", type_name = %name, slots = slots.len(), parameters = parameters.len(), "Synthesized type");
    } else {
        debug!(target: "dtoforge::synth", type_name = %name, slots = slots.len(), parameters = parameters.len(), "Synthesized type");
    }

    Ok(SynthesizedType {
        name,
        contract: Arc::clone(contract),
        properties,
        slots,
        index,
        parameters,
        parameter_slots,
        base: base.copied(),
    })
}

impl SynthesizedType {
    /// Type name: `"{Contract}"` or `"{Base}.{Contract}"`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contract this type implements
    pub fn contract(&self) -> &Arc<Contract> {
        &self.contract
    }

    /// Identity of the implemented contract
    pub fn contract_id(&self) -> ContractId {
        self.contract.id()
    }

    /// Resolved property set the slots were built from
    pub fn properties(&self) -> &Arc<ResolvedPropertySet> {
        &self.properties
    }

    /// Base type, if any
    pub fn base(&self) -> Option<&BaseType> {
        self.base.as_ref()
    }

    /// All slots in resolved order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Slot position of a property
    pub fn slot_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Slot of a property
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slot_index(name).map(|i| &self.slots[i])
    }

    /// Full constructor signature, in resolved order
    pub fn full_constructor(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns true if this type implements `id` or a contract extending it
    pub fn implements(&self, id: ContractId) -> bool {
        self.contract.is_or_extends(id)
    }

    /// Run the empty constructor
    ///
    /// # Errors
    ///
    /// Propagates base construction failures.
    pub fn construct_empty(self: &Arc<Self>) -> Result<Instance> {
        let slots = self.default_slots();
        let base = self.construct_base()?;
        Ok(Instance::from_parts(Arc::clone(self), slots, base))
    }

    /// Run the full constructor with positional arguments
    ///
    /// # Errors
    ///
    /// Returns `ConstructorSignatureMismatch` when the argument count or any
    /// argument type does not match `full_constructor()`.
    pub fn construct(self: &Arc<Self>, args: Vec<Value>) -> Result<Instance> {
        if args.len() != self.parameters.len() {
            return Err(self.signature_mismatch(format!(
                "expected {} arguments, got {}",
                self.parameters.len(),
                args.len()
            )));
        }

        let mut slots = self.default_slots();
        for (position, value) in args.into_iter().enumerate() {
            let param = &self.parameters[position];
            if !param.value_type.accepts(&value) {
                return Err(self.signature_mismatch(format!(
                    "argument {} ('{}') expected {}, got {}",
                    position,
                    param.name,
                    param.value_type,
                    value.type_name()
                )));
            }
            slots[self.parameter_slots[position]] = value;
        }

        let base = self.construct_base()?;
        Ok(Instance::from_parts(Arc::clone(self), slots, base))
    }

    pub(crate) fn signature_mismatch(&self, reason: String) -> Error {
        Error::ConstructorSignatureMismatch {
            type_name: self.name.clone(),
            reason,
        }
    }

    fn default_slots(&self) -> Box<[Value]> {
        self.slots.iter().map(|s| s.value_type.default_value()).collect()
    }

    fn construct_base(&self) -> Result<Option<Box<dyn std::any::Any + Send + Sync>>> {
        self.base.as_ref().map(BaseType::construct).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtoforge_core::contract::AccessorShape;

    #[derive(Debug, Default)]
    struct Entity {
        revision: u32,
    }

    fn product() -> Arc<Contract> {
        let article = Contract::builder("Article")
            .property::<i64>("id", AccessorShape::GET)
            .build();
        let name = Contract::builder("Name")
            .extends(article.clone())
            .property::<String>("name", AccessorShape::GET_SET)
            .build();
        let priced = Contract::builder("Priced")
            .extends(article)
            .property::<f64>("price", AccessorShape::GET_SET)
            .build();
        Contract::builder("Product").extends(name).extends(priced).build()
    }

    #[test]
    fn test_slots_follow_resolved_order() {
        let ty = synthesize(&product(), None, &EngineConfig::default()).unwrap();
        assert_eq!(ty.name(), "Product");
        let names: Vec<&str> = ty.slots().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ty.properties().names());
        assert_eq!(ty.slot("id").unwrap().mutability, Mutability::Immutable);
        assert_eq!(ty.slot("price").unwrap().mutability, Mutability::Mutable);
    }

    #[test]
    fn test_full_constructor_order() {
        let ty = synthesize(&product(), None, &EngineConfig::default()).unwrap();
        let params: Vec<(&str, &ValueType)> = ty
            .full_constructor()
            .iter()
            .map(|p| (p.name.as_str(), &p.value_type))
            .collect();
        assert_eq!(
            params,
            vec![
                ("id", &ValueType::Int),
                ("name", &ValueType::String),
                ("price", &ValueType::Float)
            ]
        );
    }

    #[test]
    fn test_restricted_not_in_constructor() {
        let c = Contract::builder("Persistent")
            .property::<i64>("version", AccessorShape::GET_INIT)
            .restricted::<bool>("obsolete", AccessorShape::GET_SET)
            .build();
        let ty = synthesize(&c, None, &EngineConfig::default()).unwrap();
        assert_eq!(ty.slots().len(), 2);
        assert_eq!(ty.full_constructor().len(), 1);
        assert_eq!(ty.full_constructor()[0].name, "version");
    }

    #[test]
    fn test_construct_checks_arity_and_types() {
        let ty = Arc::new(synthesize(&product(), None, &EngineConfig::default()).unwrap());

        let err = ty.construct(vec![Value::Int(1)]).unwrap_err();
        assert!(matches!(err, Error::ConstructorSignatureMismatch { .. }));

        let err = ty
            .construct(vec![Value::Int(1), Value::Int(2), Value::Float(1.0)])
            .unwrap_err();
        assert!(err.to_string().contains("'name'"));

        let instance = ty
            .construct(vec![
                Value::Int(1),
                Value::String("Widget".to_string()),
                Value::Float(9.99),
            ])
            .unwrap();
        assert_eq!(instance.values()[2], Value::Float(9.99));
    }

    #[test]
    fn test_construct_empty_uses_defaults() {
        let ty = Arc::new(synthesize(&product(), None, &EngineConfig::default()).unwrap());
        let instance = ty.construct_empty().unwrap();
        assert_eq!(
            instance.values(),
            &[
                Value::Int(0),
                Value::String(String::new()),
                Value::Float(0.0)
            ]
        );
    }

    #[test]
    fn test_base_type_name_and_value() {
        let base = BaseType::of::<Entity>();
        let ty = Arc::new(synthesize(&product(), Some(&base), &EngineConfig::default()).unwrap());
        assert_eq!(ty.name(), "Entity.Product");

        let instance = ty.construct_empty().unwrap();
        assert_eq!(instance.base::<Entity>().unwrap().revision, 0);
    }

    #[test]
    fn test_opaque_base_rejected() {
        struct Handle;
        let base = BaseType::opaque::<Handle>();
        let err = synthesize(&product(), Some(&base), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, Error::IncompatibleBaseType { .. }));
    }

    #[test]
    fn test_invalid_contract_rejected() {
        let c = Contract::builder("Behaves").operation("run").build();
        let err = synthesize(&c, None, &EngineConfig::default()).unwrap_err();
        assert!(err.is_contract_error());
    }

    #[test]
    fn test_implements_ancestor() {
        let product = product();
        let ty = synthesize(&product, None, &EngineConfig::default()).unwrap();
        let article_id = product.ancestors()[0].id();
        assert!(ty.implements(product.id()));
        assert!(ty.implements(article_id));
    }
}
