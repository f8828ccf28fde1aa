//! Game state and the per-tick update.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::snake::{Direction, Snake};
use crate::{Coords, TermInt};

pub const MIN_SIDE: TermInt = 5;
pub const MAX_SIDE: TermInt = 1000;
pub const DEFAULT_WIDTH: TermInt = 40;
pub const DEFAULT_HEIGHT: TermInt = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("board of {width}x{height} is too small, both sides must be at least {}", MIN_SIDE)]
    BoardTooSmall { width: TermInt, height: TermInt },
    #[error("board of {width}x{height} is too large, both sides must be at most {}", MAX_SIDE)]
    BoardTooLarge { width: TermInt, height: TermInt },
    #[error("starting cell {cell:?} is not inside the board's border")]
    StartOutsideInterior { cell: Coords },
    #[error("snake body must be non-empty, distinct and connected")]
    InvalidBody,
    #[error("food can't be placed at {cell:?}")]
    FoodNotPlaceable { cell: Coords },
}

/// Starting layout of the snake.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    /// One cell in the centre, heading right.
    #[default]
    Classic,
    /// Three cells heading left, tail to the right of the head.
    Trail,
}

impl Preset {
    pub fn direction(self) -> Direction {
        match self {
            Preset::Classic => Direction::Right,
            Preset::Trail => Direction::Left,
        }
    }

    pub fn length(self) -> usize {
        match self {
            Preset::Classic => 1,
            Preset::Trail => 3,
        }
    }

    /// Cells of the starting snake, head first, for a board of at least 5x5.
    ///
    /// The head sits at the centre, or as close to it as lets the body trail
    /// inside the border with a free cell ahead. On boards too narrow for a
    /// straight trail the body bends along the border.
    pub fn body(self, width: TermInt, height: TermInt) -> Vec<Coords> {
        let (w, h) = (width as i16, height as i16);
        let trail = self.length() as i16 - 1;
        let (mid_row, mid_col) = (h / 2, w / 2);

        let head = match self.direction() {
            Direction::Left => (mid_row, mid_col.min(w - 2 - trail).max(2)),
            Direction::Right => (mid_row, mid_col.max(1 + trail).min(w - 3)),
            Direction::Up => (mid_row.min(h - 2 - trail).max(2), mid_col),
            Direction::Down => (mid_row.max(1 + trail).min(h - 3), mid_col),
        };

        let mut behind = self.direction().opposite();
        let mut cells = vec![head];

        while cells.len() < self.length() {
            let last = cells[cells.len() - 1];
            if !is_interior(width, height, behind.step(last)) {
                behind = match behind {
                    Direction::Left | Direction::Right => Direction::Down,
                    Direction::Up | Direction::Down => Direction::Right,
                };
                if !is_interior(width, height, behind.step(last)) {
                    behind = behind.opposite();
                }
            }
            cells.push(behind.step(last));
        }

        cells
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Preset::Classic),
            "trail" => Ok(Preset::Trail),
            other => Err(format!("unknown preset '{}', expected 'classic' or 'trail'", other)),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Classic => write!(f, "classic"),
            Preset::Trail => write!(f, "trail"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Crash {
    Wall,
    Body,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Crashed(Crash),
    /// The snake covers every interior cell, so there is nowhere left for food.
    Won,
}

/// What a single `update` did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    Moved,
    Ate,
    Crashed(Crash),
    Won,
    /// The game was already over.
    Idle,
}

pub struct GameState<R: Rng = StdRng> {
    width: TermInt,
    height: TermInt,
    snake: Snake,
    food: Coords,
    score: u32,
    status: Status,
    rng: R,
}

impl GameState<StdRng> {
    /// A fresh game seeded from the OS.
    pub fn new(width: TermInt, height: TermInt, preset: Preset) -> Result<Self, StateError> {
        GameState::with_rng(width, height, preset, StdRng::from_entropy())
    }
}

impl<R: Rng> GameState<R> {
    pub fn with_rng(
        width: TermInt,
        height: TermInt,
        preset: Preset,
        rng: R,
    ) -> Result<Self, StateError> {
        check_board(width, height)?;
        GameState::with_snake(width, height, preset.body(width, height), preset.direction(), rng)
    }

    /// Starts from an explicit body, head first.
    pub fn with_snake(
        width: TermInt,
        height: TermInt,
        body: Vec<Coords>,
        direction: Direction,
        rng: R,
    ) -> Result<Self, StateError> {
        check_board(width, height)?;

        if let Some(&cell) = body.iter().find(|&&c| !is_interior(width, height, c)) {
            return Err(StateError::StartOutsideInterior { cell });
        }
        if !is_valid_body(&body) {
            return Err(StateError::InvalidBody);
        }

        let mut state = GameState {
            width,
            height,
            snake: Snake::from_cells(body, direction),
            food: (0, 0),
            score: 0,
            status: Status::Running,
            rng,
        };

        match state.spawn_food() {
            Some(food) => state.food = food,
            None => state.status = Status::Won,
        }

        debug!(
            "new game {}x{}, snake of {} at {:?} heading {:?}, food at {:?}",
            width, height, state.snake.len(), state.snake.head(), direction, state.food
        );
        Ok(state)
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn food(&self) -> Coords {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status != Status::Running
    }

    pub fn is_interior(&self, cell: Coords) -> bool {
        is_interior(self.width, self.height, cell)
    }

    /// Moves the food to `cell`, which must be a free interior cell.
    pub fn place_food(&mut self, cell: Coords) -> Result<(), StateError> {
        if !self.is_interior(cell) || self.snake.contains(cell) {
            return Err(StateError::FoodNotPlaceable { cell });
        }
        self.food = cell;
        Ok(())
    }

    pub fn change_direction(&mut self, requested: Direction) {
        self.snake.set_direction(requested);
    }

    /// Advances the game by one tick. Does nothing once the game is over.
    pub fn update(&mut self) -> Tick {
        if self.is_game_over() {
            return Tick::Idle;
        }

        let new_head = self.snake.next_head();

        // Checked against the body before it moves, so the tail still counts.
        let crash = if !self.is_interior(new_head) {
            Some(Crash::Wall)
        } else if self.snake.contains(new_head) {
            Some(Crash::Body)
        } else {
            None
        };

        if let Some(crash) = crash {
            debug!("crashed into {:?} at {:?}, score {}", crash, new_head, self.score);
            self.status = Status::Crashed(crash);
            return Tick::Crashed(crash);
        }

        let ate = new_head == self.food;
        self.snake.advance(new_head, ate);

        if !ate {
            trace!("head at {:?}", new_head);
            return Tick::Moved;
        }

        self.score += 1;
        match self.spawn_food() {
            Some(food) => {
                debug!("ate food at {:?}, score {}, next food at {:?}", new_head, self.score, food);
                self.food = food;
                Tick::Ate
            }
            None => {
                debug!("board filled with a snake of {}", self.snake.len());
                self.status = Status::Won;
                Tick::Won
            }
        }
    }

    /// Rejection-samples a free interior cell, or `None` if there isn't one.
    fn spawn_food(&mut self) -> Option<Coords> {
        let interior = (self.width as usize - 2) * (self.height as usize - 2);
        if self.snake.len() >= interior {
            return None;
        }

        loop {
            let cell = (
                self.rng.gen_range(1..self.height as i16 - 1),
                self.rng.gen_range(1..self.width as i16 - 1),
            );
            if !self.snake.contains(cell) {
                return Some(cell);
            }
        }
    }
}

fn check_board(width: TermInt, height: TermInt) -> Result<(), StateError> {
    if width < MIN_SIDE || height < MIN_SIDE {
        return Err(StateError::BoardTooSmall { width, height });
    }
    if width > MAX_SIDE || height > MAX_SIDE {
        return Err(StateError::BoardTooLarge { width, height });
    }
    Ok(())
}

fn is_interior(width: TermInt, height: TermInt, (row, col): Coords) -> bool {
    row > 0 && col > 0 && row < height as i16 - 1 && col < width as i16 - 1
}

fn is_valid_body(body: &[Coords]) -> bool {
    let mut seen = HashSet::with_capacity(body.len());
    let distinct = body.iter().all(|c| seen.insert(*c));
    let connected = body.windows(2).all(|w| (w[0].0 - w[1].0).abs() + (w[0].1 - w[1].1).abs() == 1);

    !body.is_empty() && distinct && connected
}
