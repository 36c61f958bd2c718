use crate::domain::{NewTask, SyncState, Task, TaskId};
use crate::error::PlannerError;
use crate::identity::Identity;
use crate::store::{Snapshot, SnapshotEvent, SnapshotListener, Subscription, TaskStore};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Snapshot tagged with the load generation that subscribed for it
type Delivery = (u64, SnapshotEvent);

fn system_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Owns the task list of the active identity.
///
/// Local mutations are applied immediately and then persisted as a whole
/// list. Snapshots from the store are queued by the subscription and applied
/// in arrival order by [`pump`](Self::pump); a snapshot always replaces the
/// local list.
pub struct TaskListController {
    store: Arc<dyn TaskStore>,
    identity: Option<Identity>,
    tasks: Vec<Task>,
    subscription: Option<Subscription>,
    sender: Sender<Delivery>,
    inbox: Receiver<Delivery>,
    generation: u64,
    sync: SyncState,
    pending_persists: usize,
    stale: bool,
    clock: fn() -> i64,
}

impl TaskListController {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        let (sender, inbox) = mpsc::channel();
        Self {
            store,
            identity: None,
            tasks: Vec::new(),
            subscription: None,
            sender,
            inbox,
            generation: 0,
            sync: SyncState::Idle,
            pending_persists: 0,
            stale: false,
            clock: system_millis,
        }
    }

    /// Use a fixed clock for task ids (tests)
    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync
    }

    /// Local mutations not yet accepted by the store or superseded by a snapshot
    pub fn pending_persists(&self) -> usize {
        self.pending_persists
    }

    /// Whether the live read channel failed since the last good snapshot
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Subscribe to `identity`'s task document, replacing any previous identity
    pub fn load(&mut self, identity: Identity) {
        self.unload();

        self.generation += 1;
        let generation = self.generation;
        let sender = self.sender.clone();
        let listener: SnapshotListener = Box::new(move |event| {
            // The controller may be gone; nothing to deliver to then
            let _ = sender.send((generation, event));
        });

        log::info!("loading tasks for {}", identity.display_name);
        self.sync = SyncState::Loading;
        self.subscription = Some(self.store.subscribe(&identity, listener));
        self.identity = Some(identity);
    }

    /// Cancel the subscription and forget the task list
    pub fn unload(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.generation += 1;
        while self.inbox.try_recv().is_ok() {}

        if let Some(identity) = self.identity.take() {
            log::info!("unloaded tasks for {}", identity.display_name);
        }
        self.tasks.clear();
        self.sync = SyncState::Idle;
        self.pending_persists = 0;
        self.stale = false;
    }

    /// Apply queued snapshots in arrival order.
    ///
    /// Returns how many snapshots were applied. A failed delivery keeps the
    /// current list, marks it stale and is reported unless a later snapshot
    /// in the same batch recovered.
    pub fn pump(&mut self) -> Result<usize, PlannerError> {
        if self.identity.is_none() {
            return Ok(0);
        }
        self.store.poll();

        let mut applied = 0;
        let mut failure = None;
        while let Ok((generation, event)) = self.inbox.try_recv() {
            if generation != self.generation {
                log::debug!("discarding snapshot from cancelled subscription {}", generation);
                continue;
            }
            match event {
                Ok(snapshot) => {
                    self.apply_snapshot(snapshot);
                    applied += 1;
                }
                Err(e) => {
                    log::warn!("task subscription failed, keeping last known tasks: {}", e);
                    self.stale = true;
                    failure = Some(e);
                }
            }
        }

        match failure {
            Some(e) if self.stale => Err(PlannerError::Subscription(e)),
            _ => Ok(applied),
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        if self.pending_persists > 0 {
            log::warn!(
                "snapshot replaced {} unsaved change(s) to the task list",
                self.pending_persists
            );
        }
        self.tasks = snapshot.map(|doc| doc.decode()).unwrap_or_default();
        self.sync = SyncState::Synced;
        self.pending_persists = 0;
        self.stale = false;
        log::debug!("applied snapshot with {} tasks", self.tasks.len());
    }

    /// Validate and append a new task, then persist.
    ///
    /// On a persist error the task stays in the local list.
    pub fn create(&mut self, day: &str, subject: &str, duration_minutes: i64) -> Result<TaskId, PlannerError> {
        if self.identity.is_none() {
            return Err(PlannerError::NotSignedIn);
        }
        let new_task = NewTask::validate(day, subject, duration_minutes)?;

        let id = TaskId::next(&self.tasks, (self.clock)())
            .ok_or(PlannerError::IdsExhausted(TaskId(i64::MAX)))?;
        self.tasks.push(Task::new(
            id,
            new_task.day,
            new_task.subject,
            new_task.duration_minutes,
        ));
        log::info!("created task {}", id);

        self.mark_local_change();
        self.persist()?;
        Ok(id)
    }

    /// Flip the completion flag of one task, then persist.
    ///
    /// Returns the new flag value.
    pub fn toggle_completion(&mut self, id: TaskId) -> Result<bool, PlannerError> {
        if self.identity.is_none() {
            return Err(PlannerError::NotSignedIn);
        }
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(PlannerError::NotFound(id))?;
        task.completed = !task.completed;
        let completed = task.completed;
        log::info!("task {} completed={}", id, completed);

        self.mark_local_change();
        self.persist()?;
        Ok(completed)
    }

    /// Remove one task, then persist
    pub fn delete(&mut self, id: TaskId) -> Result<Task, PlannerError> {
        if self.identity.is_none() {
            return Err(PlannerError::NotSignedIn);
        }
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(PlannerError::NotFound(id))?;
        let removed = self.tasks.remove(index);
        log::info!("deleted task {}", id);

        self.mark_local_change();
        self.persist()?;
        Ok(removed)
    }

    /// Persist the current list again after an earlier failure
    pub fn retry_persist(&mut self) -> Result<(), PlannerError> {
        if self.sync != SyncState::LocalAhead {
            return Ok(());
        }
        self.persist()
    }

    fn mark_local_change(&mut self) {
        self.pending_persists += 1;
        self.sync = SyncState::LocalAhead;
    }

    fn persist(&mut self) -> Result<(), PlannerError> {
        let identity = self.identity.as_ref().ok_or(PlannerError::NotSignedIn)?;

        match self.store.replace(identity, &self.tasks) {
            Ok(()) => {
                self.pending_persists = 0;
                self.sync = SyncState::Synced;
                Ok(())
            }
            Err(e) => {
                log::warn!(
                    "persist failed with {} unsaved change(s): {}",
                    self.pending_persists,
                    e
                );
                Err(PlannerError::Persist(e))
            }
        }
    }
}
