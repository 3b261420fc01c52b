//! Tessel Core Types
//!
//! This crate provides the foundational types shared by the catalog and the container:
//! - Type identifiers (TypeId)
//! - Value types (the Value enum for dynamic attributes)
//! - The generic configurable Item

mod id;
mod item;
mod value;

pub use id::*;
pub use item::*;
pub use value::*;
