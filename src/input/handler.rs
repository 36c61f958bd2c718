use crate::app::AppState;
use crate::domain::{Day, Screen, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events; returns true when the app should quit
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask => handle_input_form_mode(app, key),
        UiMode::ConfirmDelete => handle_confirm_delete_mode(app, key),
        UiMode::SigningIn => handle_sign_in_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Switch between Plan and Stats
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_screen();
            Ok(false)
        }

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection_down();
            Ok(false)
        }

        // Day filter (Stats screen)
        KeyCode::Left if app.screen == Screen::Stats => {
            app.cycle_view_prev();
            Ok(false)
        }
        KeyCode::Right if app.screen == Screen::Stats => {
            app.cycle_view_next();
            Ok(false)
        }
        KeyCode::Char('w') if app.screen == Screen::Stats => {
            app.select_all_days();
            Ok(false)
        }
        KeyCode::Char(c @ '1'..='7') if app.screen == Screen::Stats => {
            let index = c as usize - '1' as usize;
            app.select_day(Day::ALL[index]);
            Ok(false)
        }

        // Toggle completion
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.toggle_selected();
            Ok(false)
        }

        // Add task
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.start_add_task();
            Ok(false)
        }

        // Delete task
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => {
            app.request_delete();
            Ok(false)
        }

        // Retry a failed save
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.retry_save();
            Ok(false)
        }

        // Switch user / sign out
        KeyCode::Char('u') | KeyCode::Char('U') => {
            app.start_switch_user();
            Ok(false)
        }
        KeyCode::Char('L') => {
            app.sign_out();
            Ok(false)
        }

        KeyCode::Esc => {
            app.dismiss_notification();
            Ok(false)
        }

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),

        _ => Ok(false),
    }
}

/// Handle keys in input form mode (adding task)
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Submit form
        KeyCode::Enter => {
            app.submit_input_form();
            Ok(false)
        }

        // Cancel form
        KeyCode::Esc => {
            app.cancel_input_form();
            Ok(false)
        }

        // Switch between subject and minutes
        KeyCode::Tab | KeyCode::BackTab => {
            app.input_form_toggle_field();
            Ok(false)
        }

        // Change day
        KeyCode::Left => {
            app.input_form_cycle_day(false);
            Ok(false)
        }
        KeyCode::Right => {
            app.input_form_cycle_day(true);
            Ok(false)
        }

        KeyCode::Backspace => {
            app.input_form_backspace();
            Ok(false)
        }

        KeyCode::Char(c) => {
            app.input_form_add_char(c);
            Ok(false)
        }

        _ => Ok(false),
    }
}

fn handle_confirm_delete_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            app.confirm_delete();
            Ok(false)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.cancel_delete();
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys at the sign-in prompt
fn handle_sign_in_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            app.submit_login();
            Ok(false)
        }

        // Back to the task list, or quit when nobody is signed in
        KeyCode::Esc => Ok(!app.cancel_login()),

        KeyCode::Backspace => {
            app.login_backspace();
            Ok(false)
        }

        KeyCode::Char(c) => {
            app.login_add_char(c);
            Ok(false)
        }

        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::domain::DayFilter;
    use crate::identity::LocalIdentityProvider;
    use crate::session::Session;
    use crate::store::memory::MemoryTaskStore;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    fn press(app: &mut AppState, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn create_test_app() -> (AppState, TempDir) {
        let dir = tempdir().unwrap();
        let store = MemoryTaskStore::new();
        let session = Session::new(LocalIdentityProvider::open(dir.path()), Arc::new(store));
        (AppState::new(session, PlannerConfig::default()), dir)
    }

    #[test]
    fn test_sign_in_add_and_toggle_by_keys() {
        let (mut app, _dir) = create_test_app();

        type_text(&mut app, "Lan");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.ui_mode, UiMode::Normal);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.ui_mode, UiMode::AddingTask);
        type_text(&mut app, "Math");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "30");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.tasks().len(), 1);

        press(&mut app, KeyCode::Char(' '));
        assert!(app.tasks()[0].completed);
    }

    #[test]
    fn test_form_keys_do_not_leak_to_normal_mode() {
        let (mut app, _dir) = create_test_app();
        type_text(&mut app, "Lan");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('a'));
        // 'q' is text inside the form, not quit
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.input_form.as_ref().unwrap().subject, "q");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.tasks().is_empty());
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let (mut app, _dir) = create_test_app();
        type_text(&mut app, "Lan");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Math");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "30");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.ui_mode, UiMode::ConfirmDelete);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.tasks().len(), 1);

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.tasks().is_empty());
    }

    #[test]
    fn test_stats_day_keys() {
        let (mut app, _dir) = create_test_app();
        type_text(&mut app, "Lan");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('a'));
        app.input_form.as_mut().unwrap().day = Day::Tuesday;
        type_text(&mut app, "Math");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "30");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.screen, Screen::Stats);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.view.selected(), DayFilter::Day(Day::Tuesday));
        press(&mut app, KeyCode::Char('w'));
        assert_eq!(app.view.selected(), DayFilter::All);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.view.selected(), DayFilter::Day(Day::Tuesday));
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _dir) = create_test_app();
        // Esc at the first sign-in prompt quits
        assert!(press(&mut app, KeyCode::Esc));

        type_text(&mut app, "Lan");
        press(&mut app, KeyCode::Enter);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)).unwrap());
    }
}
