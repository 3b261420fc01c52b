//! The TypeCatalog - immutable type lookup.

use crate::{Factory, SubtypeIndex, TypeDef};
use std::collections::HashMap;
use std::fmt;
use tessel_core::TypeId;

/// The TypeCatalog provides runtime lookup of item type definitions and their
/// construction strategies. It is immutable after construction.
pub struct TypeCatalog<T> {
    /// Type definitions by ID.
    types: HashMap<TypeId, TypeDef>,
    /// Type ID lookup by name.
    type_names: HashMap<String, TypeId>,
    /// Construction strategies by type.
    factories: HashMap<TypeId, Factory<T>>,
    /// Precomputed subtype relationships.
    subtype_index: SubtypeIndex,
}

impl<T> TypeCatalog<T> {
    pub(crate) fn new(
        types: HashMap<TypeId, TypeDef>,
        type_names: HashMap<String, TypeId>,
        factories: HashMap<TypeId, Factory<T>>,
        subtype_index: SubtypeIndex,
    ) -> Self {
        Self {
            types,
            type_names,
            factories,
            subtype_index,
        }
    }

    // ==================== Type Lookups ====================

    /// Get a type definition by ID.
    pub fn get_type(&self, id: TypeId) -> Option<&TypeDef> {
        self.types.get(&id)
    }

    /// Get a type definition by name.
    pub fn get_type_by_name(&self, name: &str) -> Option<&TypeDef> {
        self.type_names.get(name).and_then(|id| self.types.get(id))
    }

    /// Get a type ID by name.
    pub fn get_type_id(&self, name: &str) -> Option<TypeId> {
        self.type_names.get(name).copied()
    }

    /// Name of a type, falling back to the raw id for unknown types.
    pub fn type_name(&self, id: TypeId) -> String {
        match self.types.get(&id) {
            Some(def) => def.name.clone(),
            None => id.to_string(),
        }
    }

    /// All type definitions, in declaration order.
    pub fn all_types(&self) -> impl Iterator<Item = &TypeDef> {
        let mut defs: Vec<&TypeDef> = self.types.values().collect();
        defs.sort_by_key(|def| def.id);
        defs.into_iter()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // ==================== Subtype Queries ====================

    /// Check if a value of type `sub` can be used where `super_type` is expected.
    pub fn is_assignable(&self, sub: TypeId, super_type: TypeId) -> bool {
        self.subtype_index.is_subtype(sub, super_type)
    }

    /// Get all subtypes of a type (not including the type itself).
    pub fn get_subtypes(&self, type_id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.subtype_index.get_subtypes(type_id)
    }

    /// Get all supertypes of a type (not including the type itself).
    pub fn get_supertypes(&self, type_id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.subtype_index.get_supertypes(type_id)
    }

    // ==================== Construction ====================

    /// Whether the type has a usable construction strategy.
    pub fn is_instantiable(&self, id: TypeId) -> bool {
        self.constructor(id).is_some()
    }

    /// Construct a fresh, unconfigured instance of `id` for the entry `item_name`.
    /// Returns `None` if the type is unknown, abstract, or has no factory.
    pub fn instantiate(&self, id: TypeId, item_name: &str) -> Option<T> {
        self.constructor(id).map(|factory| factory(item_name, id))
    }

    fn constructor(&self, id: TypeId) -> Option<&Factory<T>> {
        let def = self.types.get(&id)?;
        if def.is_abstract {
            return None;
        }
        self.factories.get(&id)
    }
}

impl<T> fmt::Debug for TypeCatalog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut instantiable: Vec<&TypeId> = self.factories.keys().collect();
        instantiable.sort();
        f.debug_struct("TypeCatalog")
            .field("types", &self.types)
            .field("instantiable", &instantiable)
            .field("subtype_index", &self.subtype_index)
            .finish()
    }
}
