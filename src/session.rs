use crate::controller::TaskListController;
use crate::error::PlannerError;
use crate::identity::{Identity, IdentityEvent, IdentityProvider};
use crate::store::TaskStore;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// Signed-in context: ties identity changes to the task list controller.
///
/// The controller is loaded when an identity is acquired and unloaded when
/// it is lost.
pub struct Session<P: IdentityProvider> {
    provider: P,
    events: Receiver<IdentityEvent>,
    controller: TaskListController,
}

impl<P: IdentityProvider> Session<P> {
    pub fn new(mut provider: P, store: Arc<dyn TaskStore>) -> Self {
        let events = provider.subscribe();
        let mut controller = TaskListController::new(store);
        if let Some(identity) = provider.current() {
            controller.load(identity);
        }

        Self {
            provider,
            events,
            controller,
        }
    }

    pub fn controller(&self) -> &TaskListController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TaskListController {
        &mut self.controller
    }

    pub fn identity(&self) -> Option<Identity> {
        self.provider.current()
    }

    pub fn sign_in(&mut self, display_name: &str) -> Result<Identity, PlannerError> {
        self.provider.sign_in(display_name)
    }

    pub fn sign_out(&mut self) -> Result<(), PlannerError> {
        self.provider.sign_out()
    }

    /// Apply identity changes, then queued task snapshots
    pub fn process_events(&mut self) -> Result<usize, PlannerError> {
        while let Ok(event) = self.events.try_recv() {
            match event {
                IdentityEvent::SignedIn(identity) => self.controller.load(identity),
                IdentityEvent::SignedOut => self.controller.unload(),
            }
        }
        self.controller.pump()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SyncState, TaskDocument};
    use crate::identity::LocalIdentityProvider;
    use crate::store::memory::MemoryTaskStore;
    use tempfile::tempdir;

    #[test]
    fn test_sign_in_loads_and_sign_out_unloads() {
        let dir = tempdir().unwrap();
        let store = MemoryTaskStore::new();
        let mut session = Session::new(LocalIdentityProvider::open(dir.path()), Arc::new(store.clone()));
        assert_eq!(session.controller().sync_state(), SyncState::Idle);

        session.sign_in("Lan").unwrap();
        session.process_events().unwrap();
        assert_eq!(session.controller().sync_state(), SyncState::Synced);
        assert_eq!(store.subscriber_count(), 1);

        session.controller_mut().create("Monday", "Math", 30).unwrap();
        session.process_events().unwrap();
        assert_eq!(session.controller().tasks().len(), 1);

        session.sign_out().unwrap();
        session.process_events().unwrap();
        assert!(session.controller().tasks().is_empty());
        assert!(session.identity().is_none());
        assert_eq!(store.subscriber_count(), 0);

        // Remote data survives sign-out
        let lan = Identity::from_display_name("Lan");
        assert_eq!(store.document(&lan).unwrap().tasks.len(), 1);
    }

    #[test]
    fn test_sign_in_with_other_case_keeps_unsaved_work() {
        let dir = tempdir().unwrap();
        let store = MemoryTaskStore::new();
        let mut session = Session::new(LocalIdentityProvider::open(dir.path()), Arc::new(store.clone()));
        session.sign_in("Lan").unwrap();
        session.process_events().unwrap();

        store.set_fail_replace(true);
        let _ = session.controller_mut().create("Monday", "Math", 30);
        assert_eq!(session.controller().sync_state(), SyncState::LocalAhead);

        session.sign_in("lan").unwrap();
        session.process_events().unwrap();
        assert_eq!(session.controller().sync_state(), SyncState::LocalAhead);
        assert_eq!(session.controller().tasks().len(), 1);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_remembered_identity_loads_on_start() {
        let dir = tempdir().unwrap();
        let store = MemoryTaskStore::new();
        let lan = Identity::from_display_name("Lan");
        store.push_remote(
            &lan,
            Some(TaskDocument {
                tasks: vec![serde_json::json!({ "id": 1, "day": "Monday", "subject": "Math", "time": 30 })],
            }),
        );

        let mut provider = LocalIdentityProvider::open(dir.path());
        provider.sign_in("Lan").unwrap();

        let mut session = Session::new(LocalIdentityProvider::open(dir.path()), Arc::new(store));
        session.process_events().unwrap();
        assert_eq!(session.controller().tasks().len(), 1);
    }

    #[test]
    fn test_switching_identity_reloads() {
        let dir = tempdir().unwrap();
        let store = MemoryTaskStore::new();
        let mut session = Session::new(LocalIdentityProvider::open(dir.path()), Arc::new(store.clone()));

        session.sign_in("Lan").unwrap();
        session.process_events().unwrap();
        session.controller_mut().create("Monday", "Math", 30).unwrap();

        session.sign_in("Minh").unwrap();
        session.process_events().unwrap();
        assert_eq!(session.controller().identity().unwrap().display_name, "Minh");
        assert!(session.controller().tasks().is_empty());
        assert_eq!(store.subscriber_count(), 1);
    }
}
