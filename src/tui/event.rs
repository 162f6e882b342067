use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, Message};
use crate::models::Preset;

/// Map key events to messages based on current app state
pub fn handle_key(key: KeyEvent, app: &App) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    // If help is shown, any key closes it
    if app.show_help {
        return Some(Message::ToggleHelp);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Message::Quit),
        KeyCode::Char('?') => Some(Message::ToggleHelp),
        KeyCode::Esc => Some(Message::ClearStatus),
        KeyCode::Char('1') => Some(Message::SelectPreset(Preset::FiveMinutes)),
        KeyCode::Char('2') => Some(Message::SelectPreset(Preset::ThirtyMinutes)),
        KeyCode::Char('3') => Some(Message::SelectPreset(Preset::OneHour)),
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => {
            toggle_message(app)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Message::Reset),
        _ => None,
    }
}

/// Start when the start affordance is shown, pause otherwise; nothing when
/// there is no time left (the control is disabled)
fn toggle_message(app: &App) -> Option<Message> {
    let state = app.state();
    if state.can_start() {
        Some(Message::Start)
    } else if state.remaining_seconds == 0 {
        None
    } else {
        Some(Message::Pause)
    }
}
