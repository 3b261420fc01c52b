//! Type views: a container seen through a type filter.

use std::fmt;
use std::rc::Rc;

use tessel_core::TypeId;

use crate::rules::action;
use crate::{ActionResult, Container, ContainerError, ContainerResult, Phase, TypeFilter};

/// A non-owning projection of a container onto the items assignable to a type.
///
/// Queries only see matching items. Rules registered through the view are
/// stored in the underlying container with the view's filter, so they are
/// visible to the container and to every other view.
pub struct TypeView<'c, T> {
    container: &'c Container<T>,
    view_type: TypeId,
    filter: TypeFilter,
}

impl<'c, T: 'static> TypeView<'c, T> {
    pub(crate) fn new(container: &'c Container<T>, view_type: TypeId, filter: TypeFilter) -> Self {
        Self {
            container,
            view_type,
            filter,
        }
    }

    /// The type this view was requested for.
    pub fn view_type(&self) -> TypeId {
        self.view_type
    }

    /// Every type an item must be assignable to to be visible here.
    pub fn filter(&self) -> &TypeFilter {
        &self.filter
    }

    pub fn container(&self) -> &'c Container<T> {
        self.container
    }

    /// A narrower view: items assignable to this view's types and to `type_id`.
    pub fn with_type(&self, type_id: TypeId) -> TypeView<'c, T> {
        TypeView::new(self.container, type_id, self.filter.narrow(type_id))
    }

    // ==================== Declaration ====================

    /// Declare an item of the view's type.
    pub fn create(&self, name: impl Into<String>) -> ContainerResult<()> {
        self.container
            .declare(name.into(), self.view_type, None, &self.filter)
    }

    /// Declare an item of the view's type, configured by `f` when realized.
    pub fn create_with<F>(&self, name: impl Into<String>, f: F) -> ContainerResult<()>
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.container
            .declare(name.into(), self.view_type, Some(action(f)), &self.filter)
    }

    /// Declare an item of `type_id`, which must match this view.
    pub fn create_typed(&self, name: impl Into<String>, type_id: TypeId) -> ContainerResult<()> {
        self.container
            .declare(name.into(), type_id, None, &self.filter)
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
        self.container
            .declare(name.into(), type_id, Some(action(f)), &self.filter)
    }

    // ==================== Rule Registration ====================

    /// Configure the item `name`, which must be visible through this view.
    pub fn named<F>(&self, name: &str, f: F) -> ContainerResult<()>
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        if !self.contains_key(name) {
            return Err(ContainerError::unknown_name(name));
        }
        self.container
            .register(Phase::Named, self.filter.clone(), Some(name), action(f));
        Ok(())
    }

    pub fn before_each<F>(&self, f: F)
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.container
            .register(Phase::BeforeEach, self.filter.clone(), None, action(f));
    }

    pub fn before_each_of<F>(&self, type_id: TypeId, f: F)
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.container
            .register(Phase::BeforeEach, self.filter.narrow(type_id), None, action(f));
    }

    pub fn all<F>(&self, f: F)
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.container
            .register(Phase::AllOrTyped, self.filter.clone(), None, action(f));
    }

    pub fn all_of<F>(&self, type_id: TypeId, f: F)
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.container
            .register(Phase::AllOrTyped, self.filter.narrow(type_id), None, action(f));
    }

    pub fn after_each<F>(&self, f: F)
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.container
            .register(Phase::AfterEach, self.filter.clone(), None, action(f));
    }

    pub fn after_each_of<F>(&self, type_id: TypeId, f: F)
    where
        F: Fn(&mut T) -> ActionResult + 'static,
    {
        self.container
            .register(Phase::AfterEach, self.filter.narrow(type_id), None, action(f));
    }

    // ==================== Queries ====================

    /// Number of matching items. Nothing is realized.
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Matching names, in declaration order. Nothing is realized.
    pub fn keys(&self) -> Vec<String> {
        self.container.keys_matching(&self.filter)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.container.contains_key_matching(name, &self.filter)
    }

    /// The realized item `name`, or `Ok(None)` if it is not declared or does
    /// not match this view. A non-matching item is not realized.
    pub fn get(&self, name: &str) -> ContainerResult<Option<Rc<T>>> {
        self.container.get_matching(name, &self.filter)
    }

    /// Realize every matching item, in declaration order.
    pub fn values(&self) -> ContainerResult<Vec<Rc<T>>> {
        self.container.values_matching(&self.filter)
    }

    pub fn iter(&self) -> ContainerResult<Vec<(String, Rc<T>)>> {
        self.container.iter_matching(&self.filter)
    }

    /// Whether a matching item equal to `item` exists. Realizes every matching item.
    pub fn contains_value(&self, item: &T) -> ContainerResult<bool>
    where
        T: PartialEq,
    {
        self.container.contains_value_matching(item, &self.filter)
    }
}

impl<T> fmt::Debug for TypeView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeView")
            .field("view_type", &self.view_type)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}
