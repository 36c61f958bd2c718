/// Screen shown in the main area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Plan,
    Stats,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Plan => "Plan",
            Screen::Stats => "Stats",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Screen::Plan => Screen::Stats,
            Screen::Stats => Screen::Plan,
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    ConfirmDelete,
    SigningIn,
}

/// Reconciliation state between the in-memory task list and the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No identity loaded
    Idle,
    /// Subscribed, waiting for the first snapshot
    Loading,
    /// Local list matches the last snapshot or successful persist
    Synced,
    /// Local changes not yet accepted by the store
    LocalAhead,
}

impl SyncState {
    pub fn label(&self) -> &'static str {
        match self {
            SyncState::Idle => "signed out",
            SyncState::Loading => "loading",
            SyncState::Synced => "synced",
            SyncState::LocalAhead => "unsaved changes",
        }
    }
}
