//! Shared contracts for the engine integration suites.
//!
//! Import via `mod common;` from any test file.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use dtoforge_core::define_contract;
use uuid::Uuid;

// ============================================================================
// Product lattice: Product(Name(Article), Priced(Article))
// ============================================================================

define_contract! {
    pub struct Article {
        id: i64 = GET,
    }
}

define_contract! {
    pub struct Name: Article {
        name: String = GET_SET,
    }
}

define_contract! {
    pub struct Priced: Article {
        price: f64 = GET_SET,
    }
}

define_contract! {
    pub struct Product: Name, Priced {}
}

// ============================================================================
// Catalog lattice: DetailProduct{custom}(ListProduct(CatalogEntry, Title), Description)
// ============================================================================

define_contract! {
    pub struct CatalogEntry {
        article_id: i64 = GET,
    }
}

define_contract! {
    pub struct Title {
        name: String = GET_SET,
    }
}

define_contract! {
    pub struct ListProduct: CatalogEntry, Title {}
}

define_contract! {
    pub struct Description {
        description: String = GET_SET,
    }
}

define_contract! {
    pub struct DetailProduct: ListProduct, Description {
        custom: String = GET_SET,
    }
}

// ============================================================================
// Journaled records
// ============================================================================

define_contract! {
    pub struct Persistent {
        id: Uuid = GET,
        version_id: i64 = GET,
        created: DateTime<Utc> = GET_INIT,
    }
    restricted {
        obsolete: bool = GET_SET,
        next_version_id: Option<i64> = GET_SET,
    }
}

define_contract! {
    pub struct Customer: Persistent {
        email: String = GET_SET,
        display_name: String = GET_SET,
    }
}

define_contract! {
    pub struct Contact {
        email: String = GET_SET,
    }
}

// ============================================================================
// Base types
// ============================================================================

#[derive(Debug, Default)]
pub struct EntityBase {
    pub loaded_from: String,
    pub dirty: bool,
}

pub struct NoDefaultBase {
    pub handle: u64,
}
