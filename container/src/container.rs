//! The Container - a deferred, named-item registry.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use tessel_catalog::TypeCatalog;
use tessel_core::TypeId;

use crate::entry::Entry;
use crate::rules::{action, Rule, RuleStore};
use crate::{
    materializer, Action, ActionResult, ContainerError, ContainerResult, Phase, RealizationState,
    TypeFilter, TypeView, DEFAULT_DISPLAY_NAME,
};

/// State shared by every handle and view of one container.
pub(crate) struct Shared<T> {
    pub display_name: String,
    pub contract: TypeId,
    pub default_type: TypeId,
    pub catalog: Rc<TypeCatalog<T>>,
    /// Entries in declaration order.
    pub entries: RefCell<IndexMap<String, Entry<T>>>,
    pub rules: RefCell<RuleStore<T>>,
}

/// A named collection whose items are constructed and configured on first use.
///
/// `Container` is a cheap handle: clones share the same entries and rules, so
/// configuration actions can capture a clone and query the container they are
/// configuring. It is single-threaded by construction.
pub struct Container<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Container<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

/// Builder for a Container.
pub struct ContainerBuilder<T> {
    catalog: Rc<TypeCatalog<T>>,
    contract: TypeId,
    display_name: String,
    default_type: Option<TypeId>,
}

impl<T> ContainerBuilder<T> {
    /// Name used in log events.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Type used by `create(name)` and `create_with(name, action)`.
    /// Defaults to the contract type.
    pub fn default_type(mut self, type_id: TypeId) -> Self {
        self.default_type = Some(type_id);
        self
    }

    /// Build the container.
    pub fn build(self) -> ContainerResult<Container<T>> {
        let contract = self.contract;
        if self.catalog.get_type(contract).is_none() {
            return Err(ContainerError::UnknownType { type_id: contract });
        }

        let default_type = self.default_type.unwrap_or(contract);
        if !self.catalog.is_assignable(default_type, contract) {
            return Err(ContainerError::incompatible_type(
                "<default>",
                self.catalog.type_name(default_type),
                self.catalog.type_name(contract),
            ));
        }

        Ok(Container {
            shared: Rc::new(Shared {
                display_name: self.display_name,
                contract,
                default_type,
                catalog: self.catalog,
                entries: RefCell::new(IndexMap::new()),
                rules: RefCell::new(RuleStore::new()),
            }),
        })
    }
}

impl<T: 'static> Container<T> {
    /// Start building a container whose items must be assignable to `contract`.
    pub fn builder(catalog: Rc<TypeCatalog<T>>, contract: TypeId) -> ContainerBuilder<T> {
        ContainerBuilder {
            catalog,
            contract,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            default_type: None,
        }
    }

    /// Create a container with default settings.
    pub fn new(catalog: Rc<TypeCatalog<T>>, contract: TypeId) -> ContainerResult<Self> {
        Self::builder(catalog, contract).build()
    }

    pub fn display_name(&self) -> &str {
        &self.shared.display_name
    }

    pub fn contract_type(&self) -> TypeId {
        self.shared.contract
    }

    pub fn default_type(&self) -> TypeId {
        self.shared.default_type
    }

    pub fn catalog(&self) -> &TypeCatalog<T> {
        &self.shared.catalog
    }

    // ==================== Declaration ====================

    /// Declare an item of the default type. Nothing is constructed.
    pub fn create(&self, name: impl Into<String>) -> ContainerResult<()> {
        self.declare(name.into(), self.shared.default_type, None, &TypeFilter::any())
    }

    /// Declare an item of the default type, configured by `f` when realized.
    pub fn create_with<F>(&self, name: impl Into<String>, f: F) -> ContainerResult<()>
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.declare(
            name.into(),
            self.shared.default_type,
            Some(action(f)),
            &TypeFilter::any(),
        )
    }

    /// Declare an item of `type_id`, which must be assignable to the contract type.
    pub fn create_typed(&self, name: impl Into<String>, type_id: TypeId) -> ContainerResult<()> {
        self.declare(name.into(), type_id, None, &TypeFilter::any())
    }

    /// Declare an item of `type_id`, configured by `f` when realized.
    pub fn create_typed_with<F>(
        &self,
        name: impl Into<String>,
        type_id: TypeId,
        f: F,
    ) -> ContainerResult<()>
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.declare(name.into(), type_id, Some(action(f)), &TypeFilter::any())
    }

    /// Add an entry after checking the name and type. `bounds` holds any extra
    /// types the item must satisfy (a view's filter).
    pub(crate) fn declare(
        &self,
        name: String,
        type_id: TypeId,
        creation_action: Option<Action<T>>,
        bounds: &TypeFilter,
    ) -> ContainerResult<()> {
        let catalog = self.catalog();
        let mut entries = self.shared.entries.borrow_mut();

        if entries.contains_key(&name) {
            return Err(ContainerError::duplicate_name(name));
        }

        let required = bounds.narrow(self.shared.contract);
        if let Some(missing) = required.first_mismatch(catalog, type_id) {
            return Err(ContainerError::incompatible_type(
                name,
                catalog.type_name(type_id),
                catalog.type_name(missing),
            ));
        }

        debug!(
            container = %self.shared.display_name,
            item = %name,
            type_name = %catalog.type_name(type_id),
            "declared item"
        );
        entries.insert(name, Entry::new(type_id, creation_action));
        Ok(())
    }

    // ==================== Rule Registration ====================

    /// Configure the item `name` when it is realized, after its creation action.
    /// The name must already be declared.
    pub fn named<F>(&self, name: &str, f: F) -> ContainerResult<()>
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        if !self.contains_key(name) {
            return Err(ContainerError::unknown_name(name));
        }
        self.register(Phase::Named, TypeFilter::any(), Some(name), action(f));
        Ok(())
    }

    /// Configure every item, before its creation action.
    pub fn before_each<F>(&self, f: F)
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.register(Phase::BeforeEach, TypeFilter::any(), None, action(f));
    }

    /// Configure every item of `type_id`, before its creation action.
    pub fn before_each_of<F>(&self, type_id: TypeId, f: F)
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.register(Phase::BeforeEach, TypeFilter::of(type_id), None, action(f));
    }

    /// Configure every item, after its creation action and named rules.
    pub fn all<F>(&self, f: F)
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.register(Phase::AllOrTyped, TypeFilter::any(), None, action(f));
    }

    /// Configure every item of `type_id`, after its creation action and named rules.
    pub fn all_of<F>(&self, type_id: TypeId, f: F)
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.register(Phase::AllOrTyped, TypeFilter::of(type_id), None, action(f));
    }

    /// Configure every item once all other configuration has been applied.
    pub fn after_each<F>(&self, f: F)
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.register(Phase::AfterEach, TypeFilter::any(), None, action(f));
    }

    /// Configure every item of `type_id` once all other configuration has been applied.
    pub fn after_each_of<F>(&self, type_id: TypeId, f: F)
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.register(Phase::AfterEach, TypeFilter::of(type_id), None, action(f));
    }

    /// Append a rule. Entries already realized are not affected.
    pub(crate) fn register(
        &self,
        phase: Phase,
        filter: TypeFilter,
        name: Option<&str>,
        action: Action<T>,
    ) {
        trace!(
            container = %self.shared.display_name,
            %phase,
            filter = ?filter.types(),
            item = name,
            "registered rule"
        );
        self.shared.rules.borrow_mut().push(
            phase,
            Rule {
                filter,
                name: name.map(str::to_string),
                action,
            },
        );
    }

    // ==================== Views ====================

    /// A view restricted to items assignable to `type_id`.
    pub fn with_type(&self, type_id: TypeId) -> TypeView<'_, T> {
        TypeView::new(self, type_id, TypeFilter::of(type_id))
    }

    // ==================== Queries ====================

    /// Number of declared items. Nothing is realized.
    pub fn len(&self) -> usize {
        self.shared.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared names in declaration order. Nothing is realized.
    pub fn keys(&self) -> Vec<String> {
        self.keys_matching(&TypeFilter::any())
    }

    /// Whether `name` is declared. Nothing is realized.
    pub fn contains_key(&self, name: &str) -> bool {
        self.shared.entries.borrow().contains_key(name)
    }

    /// The realized item `name`, realizing it first if needed.
    ///
    /// Returns `Ok(None)` if `name` is not declared, and an error if it is
    /// declared but could not be realized.
    pub fn get(&self, name: &str) -> ContainerResult<Option<Rc<T>>> {
        materializer::realize(&self.shared, name)
    }

    /// Realize every item and return them in declaration order.
    pub fn values(&self) -> ContainerResult<Vec<Rc<T>>> {
        self.values_matching(&TypeFilter::any())
    }

    /// Realize every item and return them with their names, in declaration order.
    pub fn iter(&self) -> ContainerResult<Vec<(String, Rc<T>)>> {
        self.iter_matching(&TypeFilter::any())
    }

    /// Whether an item equal to `item` exists.
    ///
    /// This realizes every item in the container.
    pub fn contains_value(&self, item: &T) -> ContainerResult<bool>
    where
        T: PartialEq,
    {
        self.contains_value_matching(item, &TypeFilter::any())
    }

    /// Force realization of every item, stopping at the first failure.
    pub fn realize_all(&self) -> ContainerResult<()> {
        self.values().map(|_| ())
    }

    /// Realization state of `name`, without realizing it.
    pub fn state(&self, name: &str) -> Option<RealizationState> {
        self.shared.entries.borrow().get(name).map(Entry::state)
    }

    /// Declared type of `name`, without realizing it.
    pub fn declared_type(&self, name: &str) -> Option<TypeId> {
        self.shared
            .entries
            .borrow()
            .get(name)
            .map(|entry| entry.declared_type)
    }

    /// Number of rules registered for `phase`. For `Phase::Create`, the number
    /// of entries declared with a creation action.
    pub fn rule_count(&self, phase: Phase) -> usize {
        match phase {
            Phase::Create => self
                .shared
                .entries
                .borrow()
                .values()
                .filter(|entry| entry.creation_action.is_some())
                .count(),
            _ => self.shared.rules.borrow().len(phase),
        }
    }

    // ==================== Filtered Queries ====================

    pub(crate) fn keys_matching(&self, filter: &TypeFilter) -> Vec<String> {
        let catalog = self.catalog();
        self.shared
            .entries
            .borrow()
            .iter()
            .filter(|(_, entry)| filter.matches(catalog, entry.declared_type))
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub(crate) fn contains_key_matching(&self, name: &str, filter: &TypeFilter) -> bool {
        self.declared_type(name)
            .is_some_and(|type_id| filter.matches(self.catalog(), type_id))
    }

    pub(crate) fn get_matching(
        &self,
        name: &str,
        filter: &TypeFilter,
    ) -> ContainerResult<Option<Rc<T>>> {
        if !self.contains_key_matching(name, filter) {
            return Ok(None);
        }
        self.get(name)
    }

    pub(crate) fn iter_matching(
        &self,
        filter: &TypeFilter,
    ) -> ContainerResult<Vec<(String, Rc<T>)>> {
        let mut realized = Vec::new();
        for name in self.keys_matching(filter) {
            if let Some(instance) = self.get(&name)? {
                realized.push((name, instance));
            }
        }
        Ok(realized)
    }

    pub(crate) fn values_matching(&self, filter: &TypeFilter) -> ContainerResult<Vec<Rc<T>>> {
        Ok(self
            .iter_matching(filter)?
            .into_iter()
            .map(|(_, instance)| instance)
            .collect())
    }

    pub(crate) fn contains_value_matching(
        &self,
        item: &T,
        filter: &TypeFilter,
    ) -> ContainerResult<bool>
    where
        T: PartialEq,
    {
        let values = self.values_matching(filter)?;
        Ok(values.iter().any(|instance| instance.as_ref() == item))
    }
}

impl<T> fmt::Debug for Container<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.shared.entries.borrow();
        let rules = self.shared.rules.borrow();
        let states: Vec<(&String, RealizationState)> = entries
            .iter()
            .map(|(name, entry)| (name, entry.state()))
            .collect();
        f.debug_struct("Container")
            .field("display_name", &self.shared.display_name)
            .field("contract", &self.shared.contract)
            .field("entries", &states)
            .field("rules", &*rules)
            .finish()
    }
}
