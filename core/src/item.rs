//! The generic configurable item.
//!
//! Hosts that do not bring their own instance type can store `Item`s in a
//! container: a name, the resolved type, and a bag of attributes that
//! configuration actions read and write.

use crate::{Attributes, TypeId, Value};

/// A named, typed bag of attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Name of the entry this item was realized for.
    pub name: String,
    /// Resolved type of this item.
    pub type_id: TypeId,
    /// Attribute values.
    pub attributes: Attributes,
}

impl Item {
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            attributes: Attributes::new(),
        }
    }

    /// Construction strategy usable directly as a catalog factory.
    pub fn factory(name: &str, type_id: TypeId) -> Self {
        Self::new(name, type_id)
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Get an attribute value by name.
    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set an attribute value, returning the previous one.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, name: &str) -> Option<Value> {
        self.attributes.shift_remove(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}
