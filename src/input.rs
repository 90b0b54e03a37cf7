//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] mutations.  Anything that has to reach
//! beyond the app state (the poller, the session itself) comes back as a
//! [`Command`] for the main loop to carry out.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;
use crate::config::Config;
use crate::form::Field;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch now and restart the countdown.
    Refresh,
    /// Tear the session down and start over with this configuration.
    Reload(Config),
}

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return None;
    }

    if app.form.is_some() {
        return handle_form_key(app, key);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        // Nothing to refresh until the first cycle is under way.
        KeyCode::Char('r') if app.countdown.is_some() => return Some(Command::Refresh),
        KeyCode::Char('o') => app.open_form(),
        _ => {}
    }
    None
}

fn handle_form_key(app: &mut App, key: KeyEvent) -> Option<Command> {
    let form = app.form.as_mut()?;

    match key.code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => {
            let config = form.submit()?;
            app.close_form();
            return Some(Command::Reload(config));
        }
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Left if form.focus == Field::Unit => form.previous_unit(),
        KeyCode::Right | KeyCode::Char(' ') if form.focus == Field::Unit => form.next_unit(),
        KeyCode::Char(ch) => form.insert(ch),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrequencyUnit;
    use crate::poll::PollMsg;
    use std::time::Instant;

    fn app() -> App {
        let config = Config::new("https://buildhub.example/", 10, FrequencyUnit::Minutes).unwrap();
        App::new(config, None)
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Command> {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);
    }

    #[test]
    fn ctrl_c_quits_even_inside_the_form() {
        let mut app = app();
        app.open_form();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.quit);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut app, key);
        assert!(!app.quit);
    }

    #[test]
    fn refresh_needs_a_running_cycle() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('r')), None);

        app.apply(PollMsg::CycleStarted(Instant::now()));
        assert_eq!(press(&mut app, KeyCode::Char('r')), Some(Command::Refresh));
    }

    #[test]
    fn esc_in_form_closes_it_without_quitting() {
        let mut app = app();
        press(&mut app, KeyCode::Char('o'));
        assert!(app.form.is_some());

        press(&mut app, KeyCode::Esc);
        assert!(app.form.is_none());
        assert!(!app.quit);
    }

    #[test]
    fn q_inside_form_is_typed_not_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('o'));
        press(&mut app, KeyCode::Char('q'));

        assert!(!app.quit);
        assert_eq!(app.form.as_ref().unwrap().source, "https://buildhub.example/q");
    }

    #[test]
    fn editing_and_submitting_reloads_with_new_config() {
        let mut app = app();
        press(&mut app, KeyCode::Char('o'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);

        let command = press(&mut app, KeyCode::Enter);

        let expected = Config::new("https://buildhub.example/", 3, FrequencyUnit::Hours).unwrap();
        assert_eq!(command, Some(Command::Reload(expected)));
        assert!(app.form.is_none());
    }

    #[test]
    fn invalid_submission_keeps_the_form_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('o'));
        app.form.as_mut().unwrap().source = "::".into();

        assert_eq!(press(&mut app, KeyCode::Enter), None);
        let form = app.form.as_ref().unwrap();
        assert!(form.error.is_some());
        assert_eq!(app.config.frequency, 10, "session config is untouched");
    }
}
