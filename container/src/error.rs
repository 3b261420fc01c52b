//! Container error types.

use crate::Phase;
use tessel_core::TypeId;
use thiserror::Error;

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Result type for configuration actions.
pub type ActionResult = Result<(), ActionError>;

/// Errors raised by container operations.
///
/// Errors are cloneable: an entry whose realization failed keeps its error and
/// re-raises it on every later access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("Cannot create '{name}': an item with that name already exists")]
    DuplicateName { name: String },

    #[error("Cannot create '{name}': type {type_name} is not assignable to {contract}")]
    IncompatibleType {
        name: String,
        type_name: String,
        contract: String,
    },

    #[error("Unknown item: {name}")]
    UnknownName { name: String },

    #[error("Unknown type: {type_id}")]
    UnknownType { type_id: TypeId },

    #[error("Cannot realize '{name}': type {type_name} has no construction strategy")]
    UninstantiableType { name: String, type_name: String },

    #[error("Cyclic realization of '{name}': it was queried while being configured")]
    CyclicRealization { name: String },

    #[error("Configuration of '{name}' failed during {phase}: {message}")]
    ActionFailed {
        name: String,
        phase: Phase,
        message: String,
    },
}

impl ContainerError {
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    pub fn incompatible_type(
        name: impl Into<String>,
        type_name: impl Into<String>,
        contract: impl Into<String>,
    ) -> Self {
        Self::IncompatibleType {
            name: name.into(),
            type_name: type_name.into(),
            contract: contract.into(),
        }
    }

    pub fn unknown_name(name: impl Into<String>) -> Self {
        Self::UnknownName { name: name.into() }
    }

    pub fn uninstantiable_type(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UninstantiableType {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    pub fn cyclic_realization(name: impl Into<String>) -> Self {
        Self::CyclicRealization { name: name.into() }
    }

    pub fn action_failed(name: impl Into<String>, phase: Phase, message: impl Into<String>) -> Self {
        Self::ActionFailed {
            name: name.into(),
            phase,
            message: message.into(),
        }
    }
}

/// Failure reported by a configuration action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The action rejected the item.
    #[error("{0}")]
    Message(String),

    /// A container query made by the action failed.
    #[error(transparent)]
    Container(Box<ContainerError>),
}

impl ActionError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Attach the entry and phase the action ran for.
    pub(crate) fn into_container_error(self, name: &str, phase: Phase) -> ContainerError {
        match self {
            ActionError::Message(message) => ContainerError::action_failed(name, phase, message),
            ActionError::Container(err) => *err,
        }
    }
}

impl From<ContainerError> for ActionError {
    fn from(e: ContainerError) -> Self {
        Self::Container(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_error_gains_entry_context() {
        let err = ActionError::message("color not set").into_container_error("a", Phase::AfterEach);

        assert_eq!(err, ContainerError::action_failed("a", Phase::AfterEach, "color not set"));
        assert_eq!(
            err.to_string(),
            "Configuration of 'a' failed during afterEach: color not set"
        );
    }

    #[test]
    fn test_nested_container_error_passes_through() {
        let nested: ActionError = ContainerError::cyclic_realization("a").into();
        let err = nested.into_container_error("b", Phase::AllOrTyped);

        assert_eq!(err, ContainerError::cyclic_realization("a"));
    }
}
