use crate::config::PlannerConfig;
use crate::domain::{
    parse_duration, AggregationView, Bucket, Day, Screen, SyncState, Task, TaskId, UiMode, ViewSelector,
};
use crate::error::PlannerError;
use crate::identity::{Identity, LocalIdentityProvider};
use crate::notifications::Notifications;
use crate::session::Session;
use chrono::Datelike;
use std::time::Instant;

pub type PlannerSession = Session<LocalIdentityProvider>;

/// Add task form
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub day: Day,
    pub subject: String,
    pub minutes: String,
    pub editing_field: usize, // 0 = subject, 1 = minutes; day is cycled with ←/→
}

impl InputFormState {
    fn new(day: Day) -> Self {
        Self {
            day,
            subject: String::new(),
            minutes: String::new(),
            editing_field: 0,
        }
    }
}

/// Main application state
pub struct AppState {
    pub session: PlannerSession,
    pub view: ViewSelector,
    pub screen: Screen,
    pub ui_mode: UiMode,
    pub selected_index: usize,
    pub input_form: Option<InputFormState>,
    pub login_name: String,
    pub pending_delete: Option<TaskId>,
    pub notifications: Notifications,
    pub config: PlannerConfig,
    pub last_tick: Instant,
}

impl AppState {
    pub fn new(session: PlannerSession, config: PlannerConfig) -> Self {
        let ui_mode = if session.identity().is_some() {
            UiMode::Normal
        } else {
            UiMode::SigningIn
        };

        Self {
            session,
            view: ViewSelector::new(),
            screen: Screen::Plan,
            ui_mode,
            selected_index: 0,
            input_form: None,
            login_name: String::new(),
            pending_delete: None,
            notifications: Notifications::new(config.notification_ttl()),
            config,
            last_tick: Instant::now(),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.session.identity()
    }

    pub fn tasks(&self) -> &[Task] {
        self.session.controller().tasks()
    }

    pub fn sync_state(&self) -> SyncState {
        self.session.controller().sync_state()
    }

    pub fn is_stale(&self) -> bool {
        self.session.controller().is_stale()
    }

    pub fn pending_persists(&self) -> usize {
        self.session.controller().pending_persists()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks().get(self.selected_index)
    }

    /// Buckets for the Stats screen
    pub fn current_buckets(&self) -> Vec<Bucket> {
        self.view.current_view(self.tasks())
    }

    pub fn aggregation_view(&self) -> AggregationView {
        self.view.aggregation_view(self.tasks())
    }

    /// Apply identity events and store snapshots, expire notifications
    pub fn tick(&mut self) {
        if let Err(e) = self.session.process_events() {
            self.report_error(&e);
        }
        self.after_change();

        if self.identity().is_none() && self.ui_mode != UiMode::SigningIn {
            self.input_form = None;
            self.pending_delete = None;
            self.ui_mode = UiMode::SigningIn;
        }

        let now = Instant::now();
        self.notifications.expire(now);
        self.last_tick = now;
    }

    /// Keep view and selection valid for the current task list
    fn after_change(&mut self) {
        if self.view.reconcile(self.session.controller().tasks()) {
            log::debug!("selected day no longer has tasks, showing all");
        }
        let len = self.tasks().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    fn report_error(&mut self, error: &PlannerError) {
        if error.is_user_error() {
            log::debug!("rejected: {}", error);
            self.notifications.push_error(error.to_string());
        } else {
            log::error!("{}", error);
            let hint = match error {
                PlannerError::Persist(_) => " (r to retry)",
                _ => "",
            };
            self.notifications.push_error(format!("{}{}", error, hint));
        }
    }

    pub fn toggle_screen(&mut self) {
        self.screen = self.screen.toggle();
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.tasks().len() {
            self.selected_index += 1;
        }
    }

    /// Flip completion of the selected task
    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return;
        };
        let result = self.session.controller_mut().toggle_completion(id);
        if let Err(e) = result {
            self.report_error(&e);
        }
        self.after_change();
    }

    /// Delete the selected task, asking first when configured to
    pub fn request_delete(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return;
        };
        if self.config.confirm_delete {
            self.pending_delete = Some(id);
            self.ui_mode = UiMode::ConfirmDelete;
        } else {
            self.delete_task(id);
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            self.delete_task(id);
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.ui_mode = UiMode::Normal;
    }

    fn delete_task(&mut self, id: TaskId) {
        match self.session.controller_mut().delete(id) {
            Ok(task) => self
                .notifications
                .push_info(format!("Deleted {} ({})", task.subject, task.day_label())),
            Err(e) => self.report_error(&e),
        }
        self.after_change();
    }

    /// Persist again after a failed save
    pub fn retry_save(&mut self) {
        if self.sync_state() != SyncState::LocalAhead {
            return;
        }
        match self.session.controller_mut().retry_persist() {
            Ok(()) => self.notifications.push_info("Saved"),
            Err(e) => self.report_error(&e),
        }
    }

    /// Start adding a new task (opens input form)
    pub fn start_add_task(&mut self) {
        let today = Day::from_weekday(chrono::Local::now().weekday());
        self.input_form = Some(InputFormState::new(today));
        self.ui_mode = UiMode::AddingTask;
    }

    /// Toggle between subject and minutes
    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.editing_field = (form.editing_field + 1) % 2;
        }
    }

    pub fn input_form_cycle_day(&mut self, forward: bool) {
        if let Some(form) = &mut self.input_form {
            form.day = if forward { form.day.next() } else { form.day.prev() };
        }
    }

    /// Add character to input form (current field)
    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            match form.editing_field {
                0 => form.subject.push(c),
                _ => {
                    if c.is_ascii_digit() {
                        form.minutes.push(c)
                    }
                }
            }
        }
    }

    /// Backspace in input form (current field)
    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            match form.editing_field {
                0 => {
                    form.subject.pop();
                }
                _ => {
                    form.minutes.pop();
                }
            }
        }
    }

    /// Submit the form; invalid input keeps it open
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.clone() else {
            return;
        };

        let result = parse_duration(&form.minutes)
            .map_err(PlannerError::from)
            .and_then(|minutes| {
                self.session
                    .controller_mut()
                    .create(form.day.label(), &form.subject, minutes)
            });

        match result {
            Ok(_) => {
                self.notifications
                    .push_info(format!("Added {} on {}", form.subject.trim(), form.day));
                self.close_form();
            }
            Err(e) if e.is_user_error() => self.report_error(&e),
            Err(e) => {
                // Task is kept locally even though the save failed
                self.report_error(&e);
                self.close_form();
            }
        }
        self.after_change();
    }

    fn close_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
        self.selected_index = self.tasks().len().saturating_sub(1);
    }

    /// Cancel input form
    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    pub fn cycle_view_next(&mut self) {
        self.view.cycle_next(self.session.controller().tasks());
    }

    pub fn cycle_view_prev(&mut self) {
        self.view.cycle_prev(self.session.controller().tasks());
    }

    pub fn select_all_days(&mut self) {
        self.view.select_all();
    }

    pub fn select_day(&mut self, day: Day) {
        if let Err(e) = self.view.select_day(day, self.session.controller().tasks()) {
            self.report_error(&PlannerError::from(e));
        }
    }

    pub fn login_add_char(&mut self, c: char) {
        self.login_name.push(c);
    }

    pub fn login_backspace(&mut self) {
        self.login_name.pop();
    }

    pub fn submit_login(&mut self) {
        match self.session.sign_in(&self.login_name) {
            Ok(identity) => {
                self.notifications
                    .push_info(format!("Signed in as {}", identity.display_name));
                self.login_name.clear();
                self.selected_index = 0;
                self.view.select_all();
                self.ui_mode = UiMode::Normal;
                self.tick();
            }
            Err(e) => self.report_error(&e),
        }
    }

    /// Leave the sign-in prompt if someone is still signed in
    pub fn cancel_login(&mut self) -> bool {
        if self.identity().is_some() {
            self.login_name.clear();
            self.ui_mode = UiMode::Normal;
            true
        } else {
            false
        }
    }

    pub fn start_switch_user(&mut self) {
        self.login_name.clear();
        self.ui_mode = UiMode::SigningIn;
    }

    pub fn sign_out(&mut self) {
        match self.session.sign_out() {
            Ok(()) => {
                self.notifications.push_info("Signed out");
                self.tick();
            }
            Err(e) => self.report_error(&e),
        }
    }

    pub fn dismiss_notification(&mut self) {
        self.notifications.dismiss();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DayFilter;
    use crate::notifications::Level;
    use crate::store::memory::MemoryTaskStore;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    fn create_test_app() -> (AppState, MemoryTaskStore, TempDir) {
        let dir = tempdir().unwrap();
        let store = MemoryTaskStore::new();
        let session = Session::new(LocalIdentityProvider::open(dir.path()), Arc::new(store.clone()));
        let app = AppState::new(session, PlannerConfig::default());
        (app, store, dir)
    }

    fn signed_in_app() -> (AppState, MemoryTaskStore, TempDir) {
        let (mut app, store, dir) = create_test_app();
        for c in "Lan".chars() {
            app.login_add_char(c);
        }
        app.submit_login();
        (app, store, dir)
    }

    fn add_task(app: &mut AppState, day: Day, subject: &str, minutes: &str) {
        app.start_add_task();
        app.input_form.as_mut().unwrap().day = day;
        for c in subject.chars() {
            app.input_form_add_char(c);
        }
        app.input_form_toggle_field();
        for c in minutes.chars() {
            app.input_form_add_char(c);
        }
        app.submit_input_form();
    }

    #[test]
    fn test_starts_at_sign_in_prompt() {
        let (app, _store, _dir) = create_test_app();
        assert_eq!(app.ui_mode, UiMode::SigningIn);
        assert!(app.identity().is_none());
    }

    #[test]
    fn test_empty_login_is_rejected() {
        let (mut app, _store, _dir) = create_test_app();
        app.login_add_char(' ');
        app.submit_login();

        assert_eq!(app.ui_mode, UiMode::SigningIn);
        assert_eq!(app.notifications.latest().unwrap().level, Level::Error);
    }

    #[test]
    fn test_sign_in_and_add_task() {
        let (mut app, store, _dir) = signed_in_app();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.sync_state(), SyncState::Synced);

        add_task(&mut app, Day::Monday, "Math", "30");
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input_form.is_none());
        assert_eq!(app.tasks().len(), 1);
        assert_eq!(app.tasks()[0].subject, "Math");
        assert_eq!(app.tasks()[0].duration_minutes, 30);

        let lan = app.identity().unwrap();
        assert_eq!(store.document(&lan).unwrap().tasks.len(), 1);
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let (mut app, _store, _dir) = signed_in_app();
        add_task(&mut app, Day::Monday, "   ", "30");

        assert_eq!(app.ui_mode, UiMode::AddingTask);
        assert!(app.input_form.is_some());
        assert!(app.tasks().is_empty());
        assert_eq!(app.notifications.latest().unwrap().level, Level::Error);

        app.cancel_input_form();
        add_task(&mut app, Day::Monday, "Math", "");
        assert_eq!(app.ui_mode, UiMode::AddingTask);
        assert!(app.tasks().is_empty());
    }

    #[test]
    fn test_minutes_field_only_takes_digits() {
        let (mut app, _store, _dir) = signed_in_app();
        app.start_add_task();
        app.input_form_toggle_field();
        for c in "4a5-".chars() {
            app.input_form_add_char(c);
        }
        assert_eq!(app.input_form.as_ref().unwrap().minutes, "45");
    }

    #[test]
    fn test_toggle_selected() {
        let (mut app, _store, _dir) = signed_in_app();
        add_task(&mut app, Day::Monday, "Math", "30");

        app.toggle_selected();
        assert!(app.tasks()[0].completed);
        app.toggle_selected();
        assert!(!app.tasks()[0].completed);
    }

    #[test]
    fn test_delete_with_confirmation() {
        let (mut app, _store, _dir) = signed_in_app();
        add_task(&mut app, Day::Monday, "Math", "30");

        app.request_delete();
        assert_eq!(app.ui_mode, UiMode::ConfirmDelete);
        app.cancel_delete();
        assert_eq!(app.tasks().len(), 1);

        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.tasks().is_empty());
    }

    #[test]
    fn test_delete_without_confirmation() {
        let (mut app, _store, _dir) = signed_in_app();
        app.config.confirm_delete = false;
        add_task(&mut app, Day::Monday, "Math", "30");

        app.request_delete();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.tasks().is_empty());
    }

    #[test]
    fn test_failed_save_keeps_task_and_retry_recovers() {
        let (mut app, store, _dir) = signed_in_app();
        store.set_fail_replace(true);
        add_task(&mut app, Day::Monday, "Math", "30");

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.tasks().len(), 1);
        assert_eq!(app.sync_state(), SyncState::LocalAhead);
        let latest = app.notifications.latest().unwrap();
        assert_eq!(latest.level, Level::Error);
        assert!(latest.message.contains("r to retry"));

        store.set_fail_replace(false);
        app.retry_save();
        assert_eq!(app.sync_state(), SyncState::Synced);
        assert_eq!(app.pending_persists(), 0);
    }

    #[test]
    fn test_view_reverts_when_day_emptied() {
        let (mut app, _store, _dir) = signed_in_app();
        add_task(&mut app, Day::Monday, "Math", "30");
        add_task(&mut app, Day::Tuesday, "Physics", "45");

        app.select_day(Day::Tuesday);
        assert_eq!(app.view.selected(), DayFilter::Day(Day::Tuesday));
        assert_eq!(app.current_buckets().len(), 1);

        app.selected_index = 1;
        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.view.selected(), DayFilter::All);
    }

    #[test]
    fn test_select_missing_day_notifies() {
        let (mut app, _store, _dir) = signed_in_app();
        add_task(&mut app, Day::Monday, "Math", "30");

        app.select_day(Day::Sunday);
        assert_eq!(app.view.selected(), DayFilter::All);
        assert_eq!(app.notifications.latest().unwrap().level, Level::Error);
    }

    #[test]
    fn test_remote_change_applied_on_tick() {
        let (mut app, store, _dir) = signed_in_app();
        let lan = app.identity().unwrap();
        store.push_remote(
            &lan,
            Some(crate::domain::TaskDocument {
                tasks: vec![serde_json::json!({ "id": 7, "day": "Friday", "subject": "Art", "time": 20 })],
            }),
        );

        app.tick();
        assert_eq!(app.tasks().len(), 1);
        assert_eq!(app.tasks()[0].subject, "Art");
    }

    #[test]
    fn test_selection_clamped_after_remote_removal() {
        let (mut app, store, _dir) = signed_in_app();
        add_task(&mut app, Day::Monday, "Math", "30");
        add_task(&mut app, Day::Monday, "Physics", "30");
        assert_eq!(app.selected_index, 1);

        let lan = app.identity().unwrap();
        store.push_remote(&lan, None);
        app.tick();
        assert!(app.tasks().is_empty());
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_sign_out_returns_to_prompt() {
        let (mut app, _store, _dir) = signed_in_app();
        add_task(&mut app, Day::Monday, "Math", "30");

        app.sign_out();
        assert_eq!(app.ui_mode, UiMode::SigningIn);
        assert!(app.tasks().is_empty());
        assert!(!app.cancel_login());
    }

    #[test]
    fn test_switch_user_can_be_cancelled() {
        let (mut app, _store, _dir) = signed_in_app();
        app.start_switch_user();
        assert_eq!(app.ui_mode, UiMode::SigningIn);
        assert!(app.cancel_login());
        assert_eq!(app.ui_mode, UiMode::Normal);
    }
}
