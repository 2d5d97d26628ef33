//! Contract model
//!
//! Contracts describe the shape of a data-holding type without implementing
//! it. The engine turns a contract (and everything it extends) into a
//! synthesized type.
//!
//! ## Module Structure
//!
//! - `member`: member declarations, accessor shapes, mutability and visibility
//! - `definition`: `Contract`, its identity and its builder
//! - `property_ref`: `ContractType` and typed `PropertyRef` handles
//!
//! ## Usage
//!
//! ```
//! use dtoforge_core::contract::{AccessorShape, Contract};
//!
//! let article = Contract::builder("Article")
//!     .property::<i64>("id", AccessorShape::GET)
//!     .build();
//! let named = Contract::builder("Name")
//!     .extends(article)
//!     .property::<String>("name", AccessorShape::GET_SET)
//!     .build();
//! assert_eq!(named.ancestors().len(), 1);
//! ```

pub mod definition;
pub mod member;
pub mod property_ref;

// Re-exports
pub use definition::{Contract, ContractBuilder, ContractId};
pub use member::{AccessorShape, Member, Mutability, PropertyMember, Visibility, WriteAccess};
pub use property_ref::{ContractType, PropertyRef};
