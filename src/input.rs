use anyhow::Result;

use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Quit,
}

/// A keyboard, or anything pretending to be one.
pub trait KeySource {
    /// Returns immediately, with `None` if no key is waiting.
    fn poll_key(&mut self) -> Result<Option<char>>;

    /// Blocks until a key is pressed.
    fn wait_key(&mut self) -> Result<char>;
}

/// Maps a key to a command, ignoring case. Unknown keys map to `None`.
pub fn map_key(key: char) -> Option<Command> {
    match key.to_ascii_lowercase() {
        'w' => Some(Command::Turn(Direction::Up)),
        's' => Some(Command::Turn(Direction::Down)),
        'a' => Some(Command::Turn(Direction::Left)),
        'd' => Some(Command::Turn(Direction::Right)),
        'q' => Some(Command::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_ignore_case() {
        assert_eq!(map_key('w'), Some(Command::Turn(Direction::Up)));
        assert_eq!(map_key('W'), Some(Command::Turn(Direction::Up)));
        assert_eq!(map_key('S'), Some(Command::Turn(Direction::Down)));
        assert_eq!(map_key('a'), Some(Command::Turn(Direction::Left)));
        assert_eq!(map_key('D'), Some(Command::Turn(Direction::Right)));
    }

    #[test]
    fn quit_key() {
        assert_eq!(map_key('q'), Some(Command::Quit));
        assert_eq!(map_key('Q'), Some(Command::Quit));
    }

    #[test]
    fn other_keys_are_ignored() {
        for key in [' ', 'x', '1', '\n', 'é'] {
            assert_eq!(map_key(key), None);
        }
    }
}
