use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction::{self, *};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    Quit,
    None,
}

pub fn map_key(ev: &KeyEvent) -> KeyAction {
    if is_ctrl_c(ev) {
        return KeyAction::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => KeyAction::Turn(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => KeyAction::Turn(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => KeyAction::Turn(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => KeyAction::Turn(Right),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::None,
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
