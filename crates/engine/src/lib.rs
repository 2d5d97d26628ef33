//! Type synthesis engine for dtoforge
//!
//! This crate turns contracts into concrete, memoized types:
//! - Resolver: flattens a contract lattice into an ordered property list
//! - Classifier / Validator: accessor rules and structural checks
//! - Synthesizer: slot layout plus empty and full constructors
//! - TypeCache: one synthesized type per (contract, base) for the process
//! - Template / Factory: staged values activated through the full constructor
//! - Codec: JSON adapter over the constructor order
//!
//! Data flow: Contract -> Resolver -> Classifier -> Validator -> Synthesizer
//! -> TypeCache. Template activation calls the cached type's full
//! constructor in resolved order.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod base;
pub mod cache;
pub mod classifier;
pub mod codec;
pub mod config;
pub mod factory;
pub mod instance;
pub mod resolver;
pub mod synthesizer;
pub mod template;
pub mod validator;

pub use base::BaseType;
pub use cache::TypeCache;
pub use classifier::{classify, ShapeError};
pub use config::{CodecConfig, EngineConfig, LimitsConfig, CONFIG_FILE_NAME};
pub use factory::{Factory, Instances};
pub use instance::{Instance, View};
pub use resolver::{resolve, ResolvedProperty, ResolvedPropertySet};
pub use synthesizer::{synthesize, Parameter, Slot, SynthesizedType};
pub use template::{DynamicTemplate, Template};
pub use validator::{validate, validate_contract};

pub use dtoforge_core::{
    define_contract, AccessorShape, Contract, ContractBuilder, ContractId, ContractType, Error,
    Member, Mutability, PropertyMember, PropertyRef, PropertyValue, Result, Tagged2, Tagged3,
    Value, ValueType, Visibility, WriteAccess,
};
