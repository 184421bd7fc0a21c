//! Keyboard input mapping

use crossterm::event::{KeyCode, KeyEvent};

use dv_core::Direction;

/// A player command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Validate,
    Repair,
    Quit,
}

/// Map a key event to a command
///
/// Movement uses the direction initials (n/s/e/w for the compass,
/// u/d for stairs) plus the arrow keys for the compass directions.
pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('n') | KeyCode::Up => Some(Command::Move(Direction::North)),
        KeyCode::Char('s') | KeyCode::Down => Some(Command::Move(Direction::South)),
        KeyCode::Char('e') | KeyCode::Right => Some(Command::Move(Direction::East)),
        KeyCode::Char('w') | KeyCode::Left => Some(Command::Move(Direction::West)),
        KeyCode::Char('u') => Some(Command::Move(Direction::Up)),
        KeyCode::Char('d') => Some(Command::Move(Direction::Down)),
        KeyCode::Char('v') => Some(Command::Validate),
        KeyCode::Char('r') => Some(Command::Repair),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}
