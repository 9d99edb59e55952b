//! Lifecycle action types

use serde::{Deserialize, Serialize};

/// Lifecycle action being awaited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Create a new resource
    Create,
    /// Update an existing resource
    Update,
    /// Delete a resource
    Delete,
}

impl ActionType {
    pub const ALL: [ActionType; 3] = [ActionType::Create, ActionType::Update, ActionType::Delete];

    /// Noun used in wait diagnostics ("waiting for ... creation")
    pub fn noun(&self) -> &'static str {
        match self {
            ActionType::Create => "creation",
            ActionType::Update => "update",
            ActionType::Delete => "deletion",
        }
    }

    /// Present participle used in submit diagnostics ("creating ...")
    pub fn gerund(&self) -> &'static str {
        match self {
            ActionType::Create => "creating",
            ActionType::Update => "updating",
            ActionType::Delete => "deleting",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Delete => write!(f, "delete"),
        }
    }
}

/// How a lifecycle wait ended, when it did not fail
#[derive(Debug)]
pub enum Settled<T> {
    /// The resource reached a target state; carries the last probed object
    Converged(T),
    /// The resource is gone (delete waits only)
    Gone,
    /// The resource type has no waiter for this action
    Skipped,
}

impl<T> Settled<T> {
    pub fn into_object(self) -> Option<T> {
        match self {
            Settled::Converged(object) => Some(object),
            Settled::Gone | Settled::Skipped => None,
        }
    }

    pub fn is_gone(&self) -> bool {
        matches!(self, Settled::Gone)
    }
}
