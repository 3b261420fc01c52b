//! Tessel Catalog
//!
//! Type declarations for container items: names, parent types, abstractness and
//! construction strategies. The catalog is immutable after construction via
//! CatalogBuilder, and answers the "is assignable to" question type filters rely on.

mod builder;
mod catalog;
mod types;

pub use builder::{CatalogBuilder, CatalogError, TypeBuilder};
pub use catalog::TypeCatalog;
pub use types::*;
