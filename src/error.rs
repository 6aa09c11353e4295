//! Error types for forest assembly and checked queries.

use thiserror::Error;

/// Why a flat list of segment records could not be assembled into a forest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("segment id '{0}' appears more than once")]
    DuplicateId(String),
    #[error("segment '{child}' names unknown parent '{parent}'")]
    UnknownParent { child: String, parent: String },
    #[error("segments form a cycle and never reach a root: {}", .ids.join(", "))]
    Cycle { ids: Vec<String> },
}

/// Failures reported by the checked query variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("parent '{parent}' is not below the supplied root")]
    ParentNotInRoot { parent: String },
}
