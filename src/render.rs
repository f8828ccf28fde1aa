//! Projects a `GameState` onto a character grid and pushes it to a draw sink.

use anyhow::Result;
use rand::Rng;

use crate::state::{GameState, Status};
use crate::TermInt;

const EMPTY_CHAR: char = ' ';
const HEAD_CHAR: char = '●';
const BODY_CHAR: char = '○';
const FOOD_CHAR: char = '★';
const DEAD_SNAKE_CHAR: char = 'X';

const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';
const HORIZONTAL: char = '─';
const VERTICAL: char = '│';

pub const LEGEND: &str = "Controls: W/↑ Up  S/↓ Down  A/← Left  D/→ Right  Q Quit";

/// Rows of text drawn under the board, status line included.
pub const TEXT_ROWS: TermInt = 6;

/// Something that can show characters at `(row, col)`.
pub trait DrawSink {
    fn draw(&mut self, row: TermInt, col: TermInt, ch: char) -> Result<()>;

    fn draw_str(&mut self, row: TermInt, col: TermInt, s: &str) -> Result<()> {
        for (i, ch) in s.chars().enumerate() {
            self.draw(row, col + i as TermInt, ch)?;
        }
        Ok(())
    }

    /// Makes everything drawn since the last call visible.
    fn present(&mut self) -> Result<()>;
}

/// Fixed-size character grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: TermInt,
    height: TermInt,
    cells: Vec<char>,
}

impl Grid {
    pub fn new(width: TermInt, height: TermInt) -> Self {
        Grid { width, height, cells: vec![EMPTY_CHAR; width as usize * height as usize] }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    fn idx(&self, row: i16, col: i16) -> Option<usize> {
        if row < 0 || col < 0 || row as TermInt >= self.height || col as TermInt >= self.width {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    pub fn get(&self, row: i16, col: i16) -> Option<char> {
        self.idx(row, col).map(|i| self.cells[i])
    }

    /// Out-of-range writes are dropped.
    pub fn set(&mut self, row: i16, col: i16, ch: char) {
        if let Some(i) = self.idx(row, col) {
            self.cells[i] = ch;
        }
    }

    pub fn row_string(&self, row: TermInt) -> Option<String> {
        if row >= self.height {
            return None;
        }
        let start = row as usize * self.width as usize;
        Some(self.cells[start..start + self.width as usize].iter().collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).filter_map(move |row| self.row_string(row))
    }
}

pub fn render<R: Rng>(state: &GameState<R>) -> Grid {
    let (width, height) = (state.width(), state.height());
    let mut grid = Grid::new(width, height);
    let (last_row, last_col) = (height as i16 - 1, width as i16 - 1);

    for col in 0..=last_col {
        grid.set(0, col, HORIZONTAL);
        grid.set(last_row, col, HORIZONTAL);
    }
    for row in 0..=last_row {
        grid.set(row, 0, VERTICAL);
        grid.set(row, last_col, VERTICAL);
    }
    grid.set(0, 0, TOP_LEFT);
    grid.set(0, last_col, TOP_RIGHT);
    grid.set(last_row, 0, BOTTOM_LEFT);
    grid.set(last_row, last_col, BOTTOM_RIGHT);

    let dead = matches!(state.status(), Status::Crashed(_));
    let (head_ch, body_ch) = if dead {
        (DEAD_SNAKE_CHAR, DEAD_SNAKE_CHAR)
    } else {
        (HEAD_CHAR, BODY_CHAR)
    };

    let snake = state.snake();
    for (row, col) in snake.cells().skip(1) {
        grid.set(row, col, body_ch);
    }
    let head = snake.head();
    grid.set(head.0, head.1, head_ch);

    // The head covers the food on the tick it eats it.
    let food = state.food();
    if food != head && state.status() != Status::Won {
        grid.set(food.0, food.1, FOOD_CHAR);
    }

    grid
}

/// Text shown under the board.
pub fn status_lines<R: Rng>(state: &GameState<R>) -> Vec<String> {
    let mut lines = vec![format!("Score: {}", state.score()), LEGEND.to_string()];

    if state.is_game_over() {
        let banner = match state.status() {
            Status::Won => "*** YOU WIN ***",
            _ => "*** GAME OVER ***",
        };
        lines.push(String::new());
        lines.push(banner.to_string());
        lines.push(format!("Final Score: {}", state.score()));
        lines.push("Press any key to exit...".to_string());
    }

    lines
}

/// Full redraw of the board and the text under it.
pub fn draw<R: Rng, S: DrawSink + ?Sized>(state: &GameState<R>, sink: &mut S) -> Result<()> {
    let grid = render(state);

    for (row, line) in grid.rows().enumerate() {
        sink.draw_str(row as TermInt, 0, &line)?;
    }

    let lines = status_lines(state);
    let pad = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0).max(grid.width() as usize);

    for i in 0..TEXT_ROWS as usize {
        let text = lines.get(i).map(String::as_str).unwrap_or("");
        let padded = format!("{:<width$}", text, width = pad);
        sink.draw_str(grid.height() + i as TermInt, 0, &padded)?;
    }

    sink.present()
}
