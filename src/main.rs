use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use ascii_snake::config::Args;
use ascii_snake::driver::{Driver, EndReason, ThreadClock};
use ascii_snake::render::TEXT_ROWS;
use ascii_snake::state::GameState;
use ascii_snake::term::{Keyboard, Screen, TerminalGuard};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    info!("starting {}x{} game, {} preset", args.width, args.height, args.preset);

    let mut state = GameState::new(args.width, args.height, args.preset)
        .context("Can't start the game")?;

    let summary = {
        let _guard = TerminalGuard::enter((args.width, args.height + TEXT_ROWS))?;
        let mut driver = Driver::new(Keyboard, Screen::new(), ThreadClock);
        driver.run(&mut state)?
    };

    match summary.ended_by {
        EndReason::Quit => println!("Thanks for playing! Score: {}", summary.score),
        EndReason::GameOver(_) => println!("Final score: {}", summary.score),
    }

    Ok(())
}
