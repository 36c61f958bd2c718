use super::{Snapshot, SnapshotListener, Subscription, TaskStore};
use crate::domain::{Task, TaskDocument};
use crate::error::StoreError;
use crate::identity::Identity;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Default)]
struct Inner {
    documents: HashMap<String, TaskDocument>,
    subscribers: Vec<(u64, String, Arc<SnapshotListener>)>,
    next_id: u64,
    fail_replace: bool,
    replace_calls: usize,
}

/// In-memory store with hooks for simulating remote edits and failures
#[derive(Clone, Default)]
pub struct MemoryTaskStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners_for(&self, uid: &str) -> Vec<Arc<SnapshotListener>> {
        self.lock()
            .subscribers
            .iter()
            .filter(|(_, owner, _)| owner == uid)
            .map(|(_, _, listener)| Arc::clone(listener))
            .collect()
    }

    pub fn set_fail_replace(&self, fail: bool) {
        self.lock().fail_replace = fail;
    }

    pub fn replace_calls(&self) -> usize {
        self.lock().replace_calls
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    pub fn document(&self, identity: &Identity) -> Option<TaskDocument> {
        self.lock().documents.get(&identity.uid).cloned()
    }

    /// Simulate another client writing the document
    pub fn push_remote(&self, identity: &Identity, snapshot: Snapshot) {
        {
            let mut inner = self.lock();
            match &snapshot {
                Some(doc) => {
                    inner.documents.insert(identity.uid.clone(), doc.clone());
                }
                None => {
                    inner.documents.remove(&identity.uid);
                }
            }
        }
        for listener in self.listeners_for(&identity.uid) {
            listener(Ok(snapshot.clone()));
        }
    }

    /// Simulate the read channel failing
    pub fn push_error(&self, identity: &Identity, message: &str) {
        for listener in self.listeners_for(&identity.uid) {
            listener(Err(StoreError::Unavailable(message.to_string())));
        }
    }
}

impl TaskStore for MemoryTaskStore {
    fn subscribe(&self, identity: &Identity, listener: SnapshotListener) -> Subscription {
        let listener = Arc::new(listener);
        let (id, current) = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner
                .subscribers
                .push((id, identity.uid.clone(), Arc::clone(&listener)));
            (id, inner.documents.get(&identity.uid).cloned())
        };

        listener(Ok(current));

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                inner.subscribers.retain(|(sub_id, _, _)| *sub_id != id);
            }
        })
    }

    fn replace(&self, identity: &Identity, tasks: &[Task]) -> Result<(), StoreError> {
        let document = {
            let mut inner = self.lock();
            inner.replace_calls += 1;
            if inner.fail_replace {
                return Err(StoreError::Unavailable("write rejected".to_string()));
            }
            let document = TaskDocument::from_tasks(tasks);
            inner.documents.insert(identity.uid.clone(), document.clone());
            document
        };

        for listener in self.listeners_for(&identity.uid) {
            listener(Ok(Some(document.clone())));
        }
        Ok(())
    }
}
