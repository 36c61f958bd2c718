//! Remote task store: a per-identity document holding the whole task list.
//!
//! Readers subscribe and receive whole-document snapshots; writers replace
//! the whole list.

pub mod file;
#[cfg(test)]
pub mod memory;

pub use file::FileTaskStore;

use crate::domain::{Task, TaskDocument};
use crate::error::StoreError;
use crate::identity::Identity;

/// Document contents at one point in time; `None` when no document exists yet
pub type Snapshot = Option<TaskDocument>;

/// What a subscription delivers: a snapshot or a failure of the read channel
pub type SnapshotEvent = Result<Snapshot, StoreError>;

/// Callback receiving snapshots; may be invoked from any thread
pub type SnapshotListener = Box<dyn Fn(SnapshotEvent) + Send + Sync>;

pub trait TaskStore: Send + Sync {
    /// Start delivering snapshots of `identity`'s document to `listener`.
    ///
    /// Implementations deliver the current snapshot right away and a new one
    /// after every change, until the returned handle is cancelled or dropped.
    fn subscribe(&self, identity: &Identity, listener: SnapshotListener) -> Subscription;

    /// Replace `identity`'s whole task list
    fn replace(&self, identity: &Identity, tasks: &[Task]) -> Result<(), StoreError>;

    /// Check for changes made outside this process and notify subscribers
    fn poll(&self) {}
}

/// Handle to a live subscription; cancelled on `unsubscribe` or drop
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
