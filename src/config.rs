use clap::Parser;

use crate::state::{Preset, DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_SIDE, MIN_SIDE};
use crate::TermInt;

/// Steer the snake with WASD or the arrow keys, eat the stars, don't hit anything.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "ascii-snake", version)]
pub struct Args {
    /// Board width in cells, border included
    #[arg(
        long,
        default_value_t = DEFAULT_WIDTH,
        value_parser = clap::value_parser!(u16).range(MIN_SIDE as i64..=MAX_SIDE as i64)
    )]
    pub width: TermInt,

    /// Board height in cells, border included
    #[arg(
        long,
        default_value_t = DEFAULT_HEIGHT,
        value_parser = clap::value_parser!(u16).range(MIN_SIDE as i64..=MAX_SIDE as i64)
    )]
    pub height: TermInt,

    /// Starting snake: "classic" (1 cell heading right) or "trail" (3 cells heading left)
    #[arg(long, default_value_t = Preset::Classic)]
    pub preset: Preset,
}
