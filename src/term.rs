use crate::input::KeySource;
use crate::render::DrawSink;
use crate::TermInt;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, read, poll};
use log::{debug, warn};

/// Keeps the terminal in raw mode on the alternate screen for as long as it lives.
///
/// Dropping it puts the terminal back the way it was, whichever way the game ends.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    /// Takes over the terminal. `needed` is the `(width, height)` the game will draw into.
    pub fn enter(needed: (TermInt, TermInt)) -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size.")?;
        if width < needed.0 || height < needed.1 {
            warn!("terminal is {}x{} but the game needs {}x{}", width, height, needed.0, needed.1);
        }

        terminal::enable_raw_mode().context("Error setting raw mode.")?;
        // From here on `Drop` undoes whatever did get applied.
        let guard = TerminalGuard { active: true };

        let mut out = stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            cursor::DisableBlinking,
            terminal::Clear(ClearType::All)
        )
        .context("Error entering alt screen.")?;

        debug!("terminal set up");
        Ok(guard)
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let mut out = stdout();
        let screen = execute!(out, cursor::EnableBlinking, cursor::Show, LeaveAlternateScreen);
        let raw = terminal::disable_raw_mode();
        screen.context("Error leaving alt screen.")?;
        raw.context("Error unsetting raw mode.")?;

        debug!("terminal restored");
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            // Nothing left to report to but the log.
            warn!("couldn't restore terminal: {:#}", err);
        }
    }
}

/// Draws straight to stdout.
pub struct Screen {
    stdout: Stdout,
}

impl Screen {
    pub fn new() -> Self {
        Screen { stdout: stdout() }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen::new()
    }
}

impl DrawSink for Screen {
    fn draw(&mut self, row: TermInt, col: TermInt, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(col, row), style::Print(ch))?;
        Ok(())
    }

    fn draw_str(&mut self, row: TermInt, col: TermInt, s: &str) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(col, row), style::Print(s))?;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing.")
    }
}

/// Reads crossterm key events.
#[derive(Default)]
pub struct Keyboard;

impl KeySource for Keyboard {
    fn poll_key(&mut self) -> Result<Option<char>> {
        while poll(Duration::ZERO)? {
            if let Event::Key(ev) = read()? {
                if let Some(key) = key_to_char(&ev) {
                    return Ok(Some(key));
                }
            }
        }

        Ok(None)
    }

    fn wait_key(&mut self) -> Result<char> {
        loop {
            if let Event::Key(ev) = read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(key_to_char(&ev).unwrap_or(' '));
                }
            }
        }
    }
}

/// Folds the keys the game cares about down to single characters.
///
/// Arrows become WASD, Esc and Ctrl+C become `q`. Releases and repeats are dropped.
pub fn key_to_char(ev: &KeyEvent) -> Option<char> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }

    match ev.code {
        KeyCode::Char('c') | KeyCode::Char('C') if ev.modifiers.contains(KeyModifiers::CONTROL) => {
            Some('q')
        }
        KeyCode::Char(ch) => Some(ch),
        KeyCode::Up => Some('w'),
        KeyCode::Left => Some('a'),
        KeyCode::Down => Some('s'),
        KeyCode::Right => Some('d'),
        KeyCode::Esc => Some('q'),
        _ => None,
    }
}
