use analysis_core::View;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::AppState;

/// Returns true when the app should exit.
pub(crate) fn handle_key_event(key: KeyEvent, app: &mut AppState) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if app.confirm_quit {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            KeyCode::Esc => {
                app.confirm_quit = false;
                return false;
            }
            _ => {
                app.confirm_quit = false;
            }
        }
    }

    match app.view() {
        View::Input => handle_input_key(key, ctrl, app),
        View::Results => handle_results_key(key, ctrl, app),
    }
    false
}

fn handle_input_key(key: KeyEvent, ctrl: bool, app: &mut AppState) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') if ctrl => app.confirm_quit = true,
        KeyCode::Char('s') | KeyCode::Char('S') if ctrl => app.submit(),
        KeyCode::F(5) => app.submit(),
        KeyCode::Char('r') | KeyCode::Char('R') if ctrl => app.open_results(),
        KeyCode::Char('t') | KeyCode::Char('T') if ctrl => app.toggle_theme(),
        KeyCode::F(2) => app.toggle_mode(),
        KeyCode::Tab => app.cycle_focus(),
        KeyCode::Esc => app.dismiss(),
        KeyCode::Enter => app.confirm(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) if !ctrl => app.insert_char(ch),
        _ => {}
    }
}

fn handle_results_key(key: KeyEvent, ctrl: bool, app: &mut AppState) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.confirm_quit = true,
        KeyCode::Esc | KeyCode::Backspace => app.back_to_input(),
        KeyCode::Char('r') | KeyCode::Char('R') if ctrl => app.back_to_input(),
        KeyCode::Tab | KeyCode::Left | KeyCode::Right => app.toggle_results_tab(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.export_report(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.export_summary(),
        KeyCode::Char('t') | KeyCode::Char('T') => app.toggle_theme(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::app::tests::{deliver, high_risk, test_app};
    use analysis_core::presentation::ResultsTab;
    use analysis_core::InputMode;
    use protocol::config::Skin;

    fn press(app: &mut AppState, code: KeyCode) -> bool {
        handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), app)
    }

    fn ctrl(app: &mut AppState, ch: char) -> bool {
        handle_key_event(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL), app)
    }

    #[tokio::test]
    async fn letters_are_text_in_input_view() {
        let (mut app, _rx) = test_app(Skin::Editorial);
        for ch in "quest".chars() {
            assert!(!press(&mut app, KeyCode::Char(ch)));
        }
        assert_eq!(app.session.capture().text(), "quest");
        assert!(!app.confirm_quit);
    }

    #[tokio::test]
    async fn ctrl_q_asks_before_quitting() {
        let (mut app, _rx) = test_app(Skin::Editorial);
        assert!(!ctrl(&mut app, 'q'));
        assert!(app.confirm_quit);
        assert!(!press(&mut app, KeyCode::Esc));
        assert!(!app.confirm_quit);
        ctrl(&mut app, 'q');
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[tokio::test]
    async fn f2_switches_mode() {
        let (mut app, _rx) = test_app(Skin::Editorial);
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.session.capture().mode(), InputMode::File);
    }

    #[tokio::test]
    async fn ctrl_r_without_result_stays_on_input() {
        let (mut app, _rx) = test_app(Skin::Editorial);
        ctrl(&mut app, 'r');
        assert_eq!(app.view(), View::Input);
    }

    #[tokio::test]
    async fn results_keys() {
        let (mut app, _rx) = test_app(Skin::Compact);
        deliver(&mut app, high_risk());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.results_tab, ResultsTab::Flagged);
        press(&mut app, KeyCode::Char('e'));
        let message = app.status_message.clone().expect("status");
        assert!(message.starts_with("Report saved to"), "{message}");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view(), View::Input);
    }

    #[tokio::test]
    async fn q_in_results_needs_confirmation() {
        let (mut app, _rx) = test_app(Skin::Editorial);
        deliver(&mut app, high_risk());
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(press(&mut app, KeyCode::Char('q')));
    }
}
