//! Container entries and their realization state.

use std::rc::Rc;

use tessel_core::TypeId;

use crate::{Action, ContainerError};

/// Externally visible realization state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealizationState {
    /// Declared, not yet constructed.
    Declared,
    /// Construction or configuration is in progress.
    Realizing,
    /// Fully configured; the instance is cached.
    Realized,
    /// Realization failed; the error is re-raised on every access.
    Failed,
}

pub(crate) enum EntryState<T> {
    Declared,
    Realizing,
    Realized(Rc<T>),
    Failed(ContainerError),
}

/// A single named, possibly unrealized item.
pub(crate) struct Entry<T> {
    pub declared_type: TypeId,
    pub state: EntryState<T>,
    /// Applied during the `Create` phase of this entry only.
    pub creation_action: Option<Action<T>>,
}

impl<T> Entry<T> {
    pub fn new(declared_type: TypeId, creation_action: Option<Action<T>>) -> Self {
        Self {
            declared_type,
            state: EntryState::Declared,
            creation_action,
        }
    }

    pub fn state(&self) -> RealizationState {
        match self.state {
            EntryState::Declared => RealizationState::Declared,
            EntryState::Realizing => RealizationState::Realizing,
            EntryState::Realized(_) => RealizationState::Realized,
            EntryState::Failed(_) => RealizationState::Failed,
        }
    }
}
