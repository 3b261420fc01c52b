//! Realization: construct an entry's instance and apply its rules exactly once.

use std::rc::Rc;

use tracing::{debug, trace, warn};

use tessel_core::TypeId;

use crate::container::Shared;
use crate::entry::EntryState;
use crate::{Action, ContainerError, ContainerResult, Phase};

/// Realize the entry `name`, or return its cached instance.
///
/// Returns `Ok(None)` if no such entry is declared. A failed realization is
/// recorded on the entry and re-raised on later calls without re-running.
pub(crate) fn realize<T>(shared: &Shared<T>, name: &str) -> ContainerResult<Option<Rc<T>>> {
    let (type_id, creation_action) = {
        let mut entries = shared.entries.borrow_mut();
        let Some(entry) = entries.get_mut(name) else {
            return Ok(None);
        };
        match &entry.state {
            EntryState::Realized(instance) => return Ok(Some(Rc::clone(instance))),
            EntryState::Failed(err) => return Err(err.clone()),
            EntryState::Realizing => return Err(ContainerError::cyclic_realization(name)),
            EntryState::Declared => {}
        }
        entry.state = EntryState::Realizing;
        (entry.declared_type, entry.creation_action.clone())
    };

    debug!(
        container = %shared.display_name,
        item = name,
        type_name = %shared.catalog.type_name(type_id),
        "realizing item"
    );

    let outcome = configure(shared, name, type_id, creation_action);

    let mut entries = shared.entries.borrow_mut();
    match outcome {
        Ok((instance, applied)) => {
            let instance = Rc::new(instance);
            if let Some(entry) = entries.get_mut(name) {
                entry.state = EntryState::Realized(Rc::clone(&instance));
            }
            debug!(
                container = %shared.display_name,
                item = name,
                actions = applied,
                "realized item"
            );
            Ok(Some(instance))
        }
        Err(err) => {
            if let Some(entry) = entries.get_mut(name) {
                entry.state = EntryState::Failed(err.clone());
            }
            warn!(
                container = %shared.display_name,
                item = name,
                error = %err,
                "realization failed"
            );
            Err(err)
        }
    }
}

/// Instantiate and run every phase. Returns the instance and the number of
/// actions applied.
///
/// Each phase's rules are collected when the phase starts, and no container
/// borrow is held while an action runs, so actions may query or register
/// against the same container.
fn configure<T>(
    shared: &Shared<T>,
    name: &str,
    type_id: TypeId,
    creation_action: Option<Action<T>>,
) -> ContainerResult<(T, usize)> {
    let mut instance = shared.catalog.instantiate(type_id, name).ok_or_else(|| {
        ContainerError::uninstantiable_type(name, shared.catalog.type_name(type_id))
    })?;

    let mut applied = 0;
    for phase in Phase::ORDER {
        let actions: Vec<Action<T>> = match phase {
            Phase::Create => creation_action.iter().cloned().collect(),
            _ => shared
                .rules
                .borrow()
                .matching(phase, name, type_id, &shared.catalog),
        };
        trace!(item = name, %phase, actions = actions.len(), "applying phase");

        for action in actions {
            action(&mut instance).map_err(|e| e.into_container_error(name, phase))?;
            applied += 1;
        }
    }

    Ok((instance, applied))
}
