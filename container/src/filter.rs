//! Type filters for rules and views.

use tessel_catalog::TypeCatalog;
use tessel_core::TypeId;

/// Restricts a rule or view to entries whose resolved type is assignable to
/// every listed type. An empty filter matches everything.
///
/// Narrowing a filter adds a type, so a rule registered through
/// `with_type(a)` with an explicit type `b` applies only to items that are
/// both `a` and `b`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    required: Vec<TypeId>,
}

impl TypeFilter {
    /// A filter matching every entry.
    pub fn any() -> Self {
        Self::default()
    }

    /// A filter matching entries assignable to `type_id`.
    pub fn of(type_id: TypeId) -> Self {
        Self {
            required: vec![type_id],
        }
    }

    /// The intersection of this filter and `type_id`.
    pub fn narrow(&self, type_id: TypeId) -> Self {
        let mut required = self.required.clone();
        if !required.contains(&type_id) {
            required.push(type_id);
        }
        Self { required }
    }

    pub fn is_any(&self) -> bool {
        self.required.is_empty()
    }

    /// The types an entry must be assignable to, in narrowing order.
    pub fn types(&self) -> &[TypeId] {
        &self.required
    }

    /// Check whether an entry of `type_id` passes the filter.
    pub fn matches<T>(&self, catalog: &TypeCatalog<T>, type_id: TypeId) -> bool {
        self.required
            .iter()
            .all(|&required| catalog.is_assignable(type_id, required))
    }

    /// First required type `type_id` is not assignable to, if any.
    pub(crate) fn first_mismatch<T>(
        &self,
        catalog: &TypeCatalog<T>,
        type_id: TypeId,
    ) -> Option<TypeId> {
        self.required
            .iter()
            .copied()
            .find(|&required| !catalog.is_assignable(type_id, required))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_catalog::CatalogBuilder;
    use tessel_core::Item;

    fn catalog() -> (TypeCatalog<Item>, TypeId, TypeId, TypeId, TypeId) {
        let mut builder = CatalogBuilder::new();
        let component = builder.add_type("Component").abstract_type().done().unwrap();
        let labeled = builder.add_type("Labeled").abstract_type().done().unwrap();
        let widget = builder.add_type("Widget").extends("Component").done().unwrap();
        let button = builder
            .add_type("Button")
            .extends("Widget")
            .extends("Labeled")
            .done()
            .unwrap();
        (builder.build(), component, labeled, widget, button)
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let (catalog, _, labeled, widget, _) = catalog();
        let filter = TypeFilter::any();

        assert!(filter.is_any());
        assert!(filter.matches(&catalog, widget));
        assert!(filter.matches(&catalog, labeled));
    }

    #[test]
    fn test_narrowed_filter_is_an_intersection() {
        // GIVEN a filter on Component narrowed to Labeled
        let (catalog, component, labeled, widget, button) = catalog();
        let filter = TypeFilter::of(component).narrow(labeled);

        // THEN only types that are both match
        assert!(filter.matches(&catalog, button));
        assert!(!filter.matches(&catalog, widget));
        assert_eq!(filter.first_mismatch(&catalog, widget), Some(labeled));
        assert_eq!(filter.types(), &[component, labeled]);
    }

    #[test]
    fn test_narrow_ignores_repeated_type() {
        let (_, component, ..) = catalog();
        let filter = TypeFilter::of(component).narrow(component);
        assert_eq!(filter.types(), &[component]);
    }
}
