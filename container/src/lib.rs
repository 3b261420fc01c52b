//! Tessel Container
//!
//! A deferred, named-item registry. Callers declare named items and attach
//! configuration rules without constructing anything; an item is realized on
//! first access, at which point its rules run exactly once in phase order:
//!
//! ```text
//! BeforeEach → Create → Named → AllOrTyped → AfterEach
//! ```
//!
//! Responsibilities:
//! - Declare entries (create) and register rules (named, before_each, all, after_each)
//! - Realize entries lazily and cache the configured instance
//! - Detect re-entrant realization of the same entry
//! - Project the container onto a type (with_type)

mod container;
mod entry;
mod error;
mod filter;
mod materializer;
mod phase;
mod rules;
mod view;

pub use container::{Container, ContainerBuilder};
pub use entry::RealizationState;
pub use error::{ActionError, ActionResult, ContainerError, ContainerResult};
pub use filter::TypeFilter;
pub use phase::Phase;
pub use rules::{action, Action};
pub use view::TypeView;

pub use tessel_catalog::{CatalogBuilder, TypeCatalog};
pub use tessel_core::TypeId;

/// Display name used when a container is built without one.
pub const DEFAULT_DISPLAY_NAME: &str = "container";
