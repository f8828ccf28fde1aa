//! Terminal Snake.
//!
//! `state` holds the game and its tick, `render` turns it into characters,
//! `driver` runs the loop against any `KeySource`/`DrawSink`, and `term` is
//! the crossterm-backed implementation of both.

pub mod config;
pub mod driver;
pub mod input;
pub mod render;
pub mod snake;
pub mod state;
pub mod term;

pub type TermInt = u16;
/// `(row, col)` on the board.
pub type Coords = (i16, i16);
