//! Key mapping from terminal events to commands.

use crate::types::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map one key to a command.
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if should_quit(key) {
        return Some(Command::Quit);
    }
    match key.code {
        // Movement
        KeyCode::Left
        | KeyCode::Char('a')
        | KeyCode::Char('A')
        | KeyCode::Char('h')
        | KeyCode::Char('H') => Some(Command::MoveLeft),
        KeyCode::Right
        | KeyCode::Char('d')
        | KeyCode::Char('D')
        | KeyCode::Char('l')
        | KeyCode::Char('L') => Some(Command::MoveRight),

        // Actions
        KeyCode::Up
        | KeyCode::Char(' ')
        | KeyCode::Char('w')
        | KeyCode::Char('W')
        | KeyCode::Char('k')
        | KeyCode::Char('K') => Some(Command::Jump),
        KeyCode::Char('f') | KeyCode::Char('F') | KeyCode::Char('x') | KeyCode::Char('X') => {
            Some(Command::Attack)
        }
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(Command::Pause),

        _ => None,
    }
}

pub fn is_movement(cmd: Command) -> bool {
    matches!(cmd, Command::MoveLeft | Command::MoveRight)
}

/// Check if key should quit.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Option<Command> {
        command_for_key(KeyEvent::from(code))
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(key(KeyCode::Left), Some(Command::MoveLeft));
        assert_eq!(key(KeyCode::Char('A')), Some(Command::MoveLeft));
        assert_eq!(key(KeyCode::Right), Some(Command::MoveRight));
        assert_eq!(key(KeyCode::Char('l')), Some(Command::MoveRight));
        assert!(is_movement(Command::MoveLeft));
        assert!(!is_movement(Command::Jump));
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(key(KeyCode::Up), Some(Command::Jump));
        assert_eq!(key(KeyCode::Char(' ')), Some(Command::Jump));
        assert_eq!(key(KeyCode::Char('f')), Some(Command::Attack));
        assert_eq!(key(KeyCode::Char('p')), Some(Command::Pause));
        assert_eq!(key(KeyCode::Esc), Some(Command::Pause));
        assert_eq!(key(KeyCode::Char('m')), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert_eq!(key(KeyCode::Char('Q')), Some(Command::Quit));
    }
}
