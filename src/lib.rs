//! dtoforge - runtime synthesis of data-holding types from property contracts
//!
//! Declare contracts (named, typed properties that compose other contracts),
//! and let the engine produce one concrete, memoized type per composition,
//! with per-property mutability and exactly two construction paths.
//!
//! # Quick Start
//!
//! ```
//! use dtoforge::{api, define_contract, Template};
//!
//! define_contract! {
//!     pub struct Article {
//!         id: i64 = GET,
//!     }
//! }
//!
//! define_contract! {
//!     pub struct Priced: Article {
//!         price: f64 = GET_SET,
//!     }
//! }
//!
//! let mut template = Template::<Priced>::new();
//! template.set(Article::id, 7).unwrap().set(Priced::price, 9.99).unwrap();
//!
//! let mut product = template.activate().unwrap();
//! product.set(Priced::price, 8.99).unwrap();
//! assert!(product.set(Article::id, 8).is_err());
//!
//! assert_eq!(api::get_type::<Priced>().unwrap().name(), "Priced");
//! ```
//!
//! # Architecture
//!
//! The contract model, value model and errors live in `dtoforge-core`;
//! resolution, validation, synthesis, caching, templates and the JSON codec
//! live in `dtoforge-engine`. Both are re-exported here.

pub use dtoforge_engine::*;
