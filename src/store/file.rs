use super::{Snapshot, SnapshotEvent, SnapshotListener, Subscription, TaskStore};
use crate::domain::{Task, TaskDocument};
use crate::error::StoreError;
use crate::identity::Identity;
use crate::persistence::atomic_write;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::SystemTime;

const USERS_DIR: &str = "users";

struct Subscriber {
    id: u64,
    uid: String,
    listener: Arc<SnapshotListener>,
    /// Modification time of the document when this subscriber last saw it
    last_seen: Option<SystemTime>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Task store keeping one JSON document per identity under `<data_dir>/users/`
pub struct FileTaskStore {
    root: PathBuf,
    registry: Arc<Mutex<Registry>>,
}

impl FileTaskStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            root: data_dir.join(USERS_DIR),
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    pub fn document_path(&self, identity: &Identity) -> PathBuf {
        self.root.join(format!("{}.json", identity.uid))
    }

    fn path_for_uid(&self, uid: &str) -> PathBuf {
        self.root.join(format!("{}.json", uid))
    }

    fn read_snapshot(path: &Path) -> SnapshotEvent {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let document: TaskDocument = serde_json::from_str(&content)?;
        Ok(Some(document))
    }

    fn modified(path: &Path) -> Option<SystemTime> {
        fs::metadata(path).and_then(|m| m.modified()).ok()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver `snapshot` to every subscriber of `uid` and record `seen`
    fn notify(&self, uid: &str, snapshot: &Snapshot, seen: Option<SystemTime>) {
        let listeners: Vec<Arc<SnapshotListener>> = {
            let mut registry = self.lock();
            registry
                .subscribers
                .iter_mut()
                .filter(|s| s.uid == uid)
                .map(|s| {
                    s.last_seen = seen;
                    Arc::clone(&s.listener)
                })
                .collect()
        };

        for listener in listeners {
            listener(Ok(snapshot.clone()));
        }
    }
}

impl TaskStore for FileTaskStore {
    fn subscribe(&self, identity: &Identity, listener: SnapshotListener) -> Subscription {
        let path = self.document_path(identity);
        let listener = Arc::new(listener);

        let id = {
            let mut registry = self.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.subscribers.push(Subscriber {
                id,
                uid: identity.uid.clone(),
                listener: Arc::clone(&listener),
                last_seen: Self::modified(&path),
            });
            id
        };
        log::debug!("subscriber {} watching {}", id, path.display());

        listener(Self::read_snapshot(&path));

        let registry: Weak<Mutex<Registry>> = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
                registry.subscribers.retain(|s| s.id != id);
                log::debug!("subscriber {} cancelled", id);
            }
        })
    }

    fn replace(&self, identity: &Identity, tasks: &[Task]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        let path = self.document_path(identity);

        let document = TaskDocument::from_tasks(tasks);
        let json = serde_json::to_string_pretty(&document)?;
        atomic_write(&path, &json).map_err(|e| StoreError::Unavailable(format!("{:#}", e)))?;
        log::debug!("wrote {} tasks to {}", tasks.len(), path.display());

        self.notify(&identity.uid, &Some(document), Self::modified(&path));
        Ok(())
    }

    fn poll(&self) {
        let watched: Vec<(u64, String, Option<SystemTime>)> = self
            .lock()
            .subscribers
            .iter()
            .map(|s| (s.id, s.uid.clone(), s.last_seen))
            .collect();

        for (id, uid, last_seen) in watched {
            let path = self.path_for_uid(&uid);
            let current = Self::modified(&path);
            if current == last_seen {
                continue;
            }
            log::info!("task document for {} changed on disk", uid);

            let listener = {
                let mut registry = self.lock();
                match registry.subscribers.iter_mut().find(|s| s.id == id) {
                    Some(subscriber) => {
                        subscriber.last_seen = current;
                        Arc::clone(&subscriber.listener)
                    }
                    None => continue,
                }
            };
            listener(Self::read_snapshot(&path));
        }
    }
}
