use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// All commands a player can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    /// Pick up the card(s) under the cursor, or drop them on the chosen stack.
    Select,
    /// Abandon a move in progress.
    Cancel,
    /// Show the next draw-pile card.
    NextInPile,
    /// Send the card under the cursor to its foundation.
    Resolve,
    /// Send everything that can go to the foundations there.
    AutoResolve,
    /// Undo the last action.
    Undo,
    Save,
    Load,
    /// Deal again. Only honoured once the game is won.
    NewGame,
    /// Toggle the help panel.
    Help,
    /// Quit the game.
    Quit,
}

/// Map a single key press to a `Command`.
///
/// Key reference:
/// ```text
/// ←↑↓→ / h j k l   -- Move the cursor (in move mode: pick the target stack)
/// space | enter     -- Start a move / drop onto the target stack
/// esc               -- Cancel the move
/// p                 -- Next card in the draw pile
/// r                 -- Resolve the card under the cursor
/// a                 -- Auto-resolve
/// u                 -- Undo
/// s | l             -- Save / load
/// n                 -- New game (after a win)
/// ?                 -- Help
/// q | ctrl-c        -- Quit
/// ```
pub fn parse_key(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    let cmd = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Command::Up,
        KeyCode::Down | KeyCode::Char('j') => Command::Down,
        KeyCode::Left | KeyCode::Char('h') => Command::Left,
        KeyCode::Right | KeyCode::Char('l') => Command::Right,
        KeyCode::Char(' ') | KeyCode::Enter => Command::Select,
        KeyCode::Esc => Command::Cancel,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'p' => Command::NextInPile,
            'r' => Command::Resolve,
            'a' => Command::AutoResolve,
            'u' => Command::Undo,
            's' => Command::Save,
            'o' => Command::Load,
            'n' => Command::NewGame,
            '?' => Command::Help,
            'q' => Command::Quit,
            _ => return None,
        },
        _ => return None,
    };
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_vi_keys_navigate() {
        assert_eq!(parse_key(press(KeyCode::Up)), Some(Command::Up));
        assert_eq!(parse_key(press(KeyCode::Char('j'))), Some(Command::Down));
        assert_eq!(parse_key(press(KeyCode::Char('h'))), Some(Command::Left));
        assert_eq!(parse_key(press(KeyCode::Right)), Some(Command::Right));
    }

    #[test]
    fn game_keys() {
        assert_eq!(parse_key(press(KeyCode::Char(' '))), Some(Command::Select));
        assert_eq!(parse_key(press(KeyCode::Esc)), Some(Command::Cancel));
        assert_eq!(parse_key(press(KeyCode::Char('P'))), Some(Command::NextInPile));
        assert_eq!(parse_key(press(KeyCode::Char('u'))), Some(Command::Undo));
        assert_eq!(parse_key(press(KeyCode::Char('o'))), Some(Command::Load));
        assert_eq!(parse_key(press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(parse_key(press(KeyCode::Char('z'))), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(parse_key(key), Some(Command::Quit));
        let key = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(parse_key(key), None);
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = press(KeyCode::Char('u'));
        key.kind = KeyEventKind::Release;
        assert_eq!(parse_key(key), None);
    }
}
