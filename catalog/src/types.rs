//! Type definitions and the precomputed subtype index.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use tessel_core::TypeId;

/// Construction strategy for a concrete type: receives the entry name and the
/// resolved type, and returns a fresh, unconfigured instance.
pub type Factory<T> = Rc<dyn Fn(&str, TypeId) -> T>;

/// Item type definition.
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Unique identifier.
    pub id: TypeId,
    /// Type name.
    pub name: String,
    /// Direct parent type IDs.
    pub parent_ids: Vec<TypeId>,
    /// Whether this type is abstract (never instantiated, only used as a filter or contract).
    pub is_abstract: bool,
}

impl TypeDef {
    pub fn new(id: TypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_ids: Vec::new(),
            is_abstract: false,
        }
    }

    pub fn with_parent(mut self, parent_id: TypeId) -> Self {
        self.parent_ids.push(parent_id);
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Precomputed subtype relationships.
#[derive(Debug, Default)]
pub struct SubtypeIndex {
    /// For each type, all of its supertypes (transitive, excluding itself).
    supertypes: HashMap<TypeId, BTreeSet<TypeId>>,
    /// For each type, all of its subtypes (transitive, excluding itself).
    subtypes: HashMap<TypeId, BTreeSet<TypeId>>,
}

impl SubtypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from type definitions.
    ///
    /// Parents always carry a lower id than their children, so visiting types
    /// in id order sees every parent's closure before it is needed.
    pub fn build(types: &HashMap<TypeId, TypeDef>) -> Self {
        let mut index = Self::new();
        let mut ordered: Vec<&TypeDef> = types.values().collect();
        ordered.sort_by_key(|def| def.id);

        for def in ordered {
            let mut closure = BTreeSet::new();
            for &parent_id in &def.parent_ids {
                closure.insert(parent_id);
                if let Some(inherited) = index.supertypes.get(&parent_id) {
                    closure.extend(inherited.iter().copied());
                }
            }
            for &super_id in &closure {
                index.subtypes.entry(super_id).or_default().insert(def.id);
            }
            index.subtypes.entry(def.id).or_default();
            index.supertypes.insert(def.id, closure);
        }

        index
    }

    /// Whether `id` is part of this index.
    pub fn contains(&self, id: TypeId) -> bool {
        self.supertypes.contains_key(&id)
    }

    /// Check if `sub` is a subtype of `super_type` (reflexive). Unknown ids are
    /// never subtypes of anything.
    pub fn is_subtype(&self, sub: TypeId, super_type: TypeId) -> bool {
        match self.supertypes.get(&sub) {
            Some(supers) => sub == super_type || supers.contains(&super_type),
            None => false,
        }
    }

    /// All subtypes of a type (not including the type itself), in id order.
    pub fn get_subtypes(&self, type_id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.subtypes
            .get(&type_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// All supertypes of a type (not including the type itself), in id order.
    pub fn get_supertypes(&self, type_id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.supertypes
            .get(&type_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}
