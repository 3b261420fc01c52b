//! The rule store: ordered configuration rules per phase.

use std::fmt;
use std::rc::Rc;

use tessel_catalog::TypeCatalog;
use tessel_core::TypeId;

use crate::{ActionResult, Phase, TypeFilter};

/// An opaque unit of configuration behavior applied to an instance.
pub type Action<T> = Rc<dyn Fn(&mut T) -> ActionResult>;

/// Wrap a closure as a shareable action.
pub fn action<T, F>(f: F) -> Action<T>
where
    F: Fn(&mut T) -> ActionResult + 'static,
{
    Rc::new(f)
}

/// A registered configuration rule.
pub(crate) struct Rule<T> {
    pub filter: TypeFilter,
    /// Only set for `Phase::Named` rules.
    pub name: Option<String>,
    pub action: Action<T>,
}

impl<T> Rule<T> {
    fn applies_to(&self, name: &str, type_id: TypeId, catalog: &TypeCatalog<T>) -> bool {
        let name_matches = match &self.name {
            Some(target) => target == name,
            None => true,
        };
        name_matches && self.filter.matches(catalog, type_id)
    }
}

/// Rules in registration order, one sequence per phase.
///
/// The `Create` slot stays empty: creation actions belong to their entry.
pub(crate) struct RuleStore<T> {
    phases: [Vec<Rule<T>>; 5],
}

impl<T> Default for RuleStore<T> {
    fn default() -> Self {
        Self {
            phases: Default::default(),
        }
    }
}

impl<T> RuleStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, phase: Phase, rule: Rule<T>) {
        self.phases[phase as usize].push(rule);
    }

    /// Actions of `phase` applying to the entry, in registration order.
    pub fn matching(
        &self,
        phase: Phase,
        name: &str,
        type_id: TypeId,
        catalog: &TypeCatalog<T>,
    ) -> Vec<Action<T>> {
        self.phases[phase as usize]
            .iter()
            .filter(|rule| rule.applies_to(name, type_id, catalog))
            .map(|rule| Rc::clone(&rule.action))
            .collect()
    }

    pub fn len(&self, phase: Phase) -> usize {
        self.phases[phase as usize].len()
    }
}

impl<T> fmt::Debug for RuleStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for phase in Phase::ORDER {
            map.entry(&phase, &self.len(phase));
        }
        map.finish()
    }
}
