//! Configuration phases.

use std::fmt;

/// One of the fixed stages in which configuration is applied to an entry.
///
/// Phases run in declaration order of this enum; within a phase, rules run in
/// registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Defaults, applied before any identity-specific configuration.
    BeforeEach,
    /// The action supplied when the entry was declared.
    Create,
    /// Rules registered against the entry's name.
    Named,
    /// Bulk and type-targeted rules.
    AllOrTyped,
    /// Finalization and validation, seeing the fully configured item.
    AfterEach,
}

impl Phase {
    /// All phases in application order.
    pub const ORDER: [Phase; 5] = [
        Phase::BeforeEach,
        Phase::Create,
        Phase::Named,
        Phase::AllOrTyped,
        Phase::AfterEach,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::BeforeEach => "beforeEach",
            Phase::Create => "create",
            Phase::Named => "named",
            Phase::AllOrTyped => "all",
            Phase::AfterEach => "afterEach",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
