use crate::domain::{Day, TaskId};
use thiserror::Error;

/// Bad user input, rejected before any state changes
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown day: {0:?}")]
    UnknownDay(String),

    #[error("subject must not be empty")]
    EmptySubject,

    #[error("duration must be a whole number of minutes, got {0:?}")]
    InvalidDuration(String),

    #[error("no tasks are planned for {0}")]
    DayNotPresent(Day),

    #[error("display name must not be empty")]
    EmptyDisplayName,
}

/// Failure talking to the task store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed task document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the planner core
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The local change is kept; local state is ahead of the store
    #[error("could not save tasks: {0}")]
    Persist(#[source] StoreError),

    /// The last known task list is kept and marked stale
    #[error("live task updates failed: {0}")]
    Subscription(#[source] StoreError),

    #[error("not signed in")]
    NotSignedIn,

    #[error("no task id left after {0}")]
    IdsExhausted(TaskId),

    #[error("identity provider error: {0}")]
    Identity(String),
}

impl PlannerError {
    /// Whether the error was caused by user input rather than a collaborator
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PlannerError::Validation(_) | PlannerError::NotFound(_) | PlannerError::NotSignedIn
        )
    }
}
