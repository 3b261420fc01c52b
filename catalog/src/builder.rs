//! CatalogBuilder for constructing an immutable TypeCatalog.

use crate::{Factory, SubtypeIndex, TypeCatalog, TypeDef};
use std::collections::HashMap;
use std::rc::Rc;
use tessel_core::TypeId;
use thiserror::Error;

/// Errors that can occur during catalog construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Unknown parent type: {0}")]
    UnknownParentType(String),
}

/// Builder for constructing an immutable TypeCatalog.
pub struct CatalogBuilder<T> {
    /// Next type ID to allocate.
    next_type_id: u32,
    /// Types being built.
    types: HashMap<TypeId, TypeDef>,
    /// Type name to ID mapping.
    type_names: HashMap<String, TypeId>,
    /// Construction strategies by type.
    factories: HashMap<TypeId, Factory<T>>,
}

impl<T> Default for CatalogBuilder<T> {
    fn default() -> Self {
        Self {
            next_type_id: 0,
            types: HashMap::new(),
            type_names: HashMap::new(),
            factories: HashMap::new(),
        }
    }
}

impl<T> CatalogBuilder<T> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type definition.
    pub fn add_type(&mut self, name: impl Into<String>) -> TypeBuilder<'_, T> {
        TypeBuilder {
            builder: self,
            name: name.into(),
            parent_names: Vec::new(),
            is_abstract: false,
            factory: None,
        }
    }

    /// Build the immutable catalog.
    pub fn build(self) -> TypeCatalog<T> {
        let subtype_index = SubtypeIndex::build(&self.types);
        TypeCatalog::new(self.types, self.type_names, self.factories, subtype_index)
    }
}

/// Builder for a type definition.
pub struct TypeBuilder<'a, T> {
    builder: &'a mut CatalogBuilder<T>,
    name: String,
    parent_names: Vec<String>,
    is_abstract: bool,
    factory: Option<Factory<T>>,
}

impl<'a, T> TypeBuilder<'a, T> {
    /// Add a parent type by name. The parent must already be declared.
    pub fn extends(mut self, parent_name: impl Into<String>) -> Self {
        self.parent_names.push(parent_name.into());
        self
    }

    /// Mark as abstract. Abstract types are never instantiated, even with a factory.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Set the construction strategy for this type.
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str, TypeId) -> T + 'static,
    {
        self.factory = Some(Rc::new(factory));
        self
    }

    /// Finish building this type.
    pub fn done(self) -> Result<TypeId, CatalogError> {
        let builder = self.builder;

        if builder.type_names.contains_key(&self.name) {
            return Err(CatalogError::DuplicateTypeName(self.name));
        }

        let mut parent_ids = Vec::with_capacity(self.parent_names.len());
        for parent_name in &self.parent_names {
            match builder.type_names.get(parent_name) {
                Some(&parent_id) => parent_ids.push(parent_id),
                None => return Err(CatalogError::UnknownParentType(parent_name.clone())),
            }
        }

        let id = TypeId::new(builder.next_type_id);
        builder.next_type_id += 1;

        let type_def = TypeDef {
            id,
            name: self.name.clone(),
            parent_ids,
            is_abstract: self.is_abstract,
        };

        if let Some(factory) = self.factory {
            builder.factories.insert(id, factory);
        }
        builder.type_names.insert(self.name, id);
        builder.types.insert(id, type_def);

        Ok(id)
    }
}
