use std::{thread::sleep, time::Duration};

use anyhow::Result;
use log::{debug, info, trace};
use rand::Rng;

use crate::input::{map_key, Command, KeySource};
use crate::render::{draw, DrawSink};
use crate::state::{GameState, Status, Tick};

pub const TICK_INTERVAL_MS: u64 = 150;

pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

pub struct ThreadClock;

impl Clock for ThreadClock {
    fn sleep(&mut self, duration: Duration) {
        sleep(duration);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver,
    Exited,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    Quit,
    GameOver(Status),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub score: u32,
    pub length: usize,
    pub ended_by: EndReason,
}

pub struct Driver<K, S, C> {
    keys: K,
    sink: S,
    clock: C,
    tick: Duration,
    phase: Phase,
}

impl<K: KeySource, S: DrawSink, C: Clock> Driver<K, S, C> {
    pub fn new(keys: K, sink: S, clock: C) -> Self {
        Driver {
            keys,
            sink,
            clock,
            tick: Duration::from_millis(TICK_INTERVAL_MS),
            phase: Phase::Running,
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (K, S, C) {
        (self.keys, self.sink, self.clock)
    }

    /// Plays `state` until the player quits or the game ends and a key is pressed.
    pub fn run<R: Rng>(&mut self, state: &mut GameState<R>) -> Result<Summary> {
        draw(state, &mut self.sink)?;
        let mut ended_by = EndReason::Quit;

        while self.phase != Phase::Exited {
            match self.phase {
                Phase::Running => {
                    if self.tick_once(state)? == Phase::Exited {
                        info!("quit with score {}", state.score());
                    }
                }
                Phase::GameOver => {
                    ended_by = EndReason::GameOver(state.status());
                    let key = self.keys.wait_key()?;
                    debug!("got {:?} after game over", key);
                    self.phase = Phase::Exited;
                }
                Phase::Exited => {}
            }
        }

        Ok(Summary { score: state.score(), length: state.snake().len(), ended_by })
    }

    /// Drains input, steps the game and redraws. Returns the new phase.
    pub fn tick_once<R: Rng>(&mut self, state: &mut GameState<R>) -> Result<Phase> {
        while let Some(key) = self.keys.poll_key()? {
            match map_key(key) {
                Some(Command::Quit) => {
                    self.phase = Phase::Exited;
                    return Ok(self.phase);
                }
                Some(Command::Turn(dir)) => state.change_direction(dir),
                None => trace!("ignored key {:?}", key),
            }
        }

        let tick = state.update();
        draw(state, &mut self.sink)?;

        match tick {
            Tick::Crashed(_) | Tick::Won | Tick::Idle => {
                info!("game over ({:?}) with score {}", state.status(), state.score());
                self.phase = Phase::GameOver;
            }
            Tick::Moved | Tick::Ate => self.clock.sleep(self.tick),
        }

        Ok(self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TEXT_ROWS;
    use crate::snake::Direction;
    use crate::state::{Crash, Preset};
    use crate::TermInt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, VecDeque};

    /// Each inner `Vec` holds the keys waiting at the start of one tick.
    struct Script {
        ticks: VecDeque<Vec<char>>,
        current: VecDeque<char>,
        started: bool,
        waits: usize,
    }

    impl Script {
        fn new(ticks: Vec<Vec<char>>) -> Self {
            Script { ticks: ticks.into(), current: VecDeque::new(), started: false, waits: 0 }
        }
    }

    impl KeySource for Script {
        fn poll_key(&mut self) -> Result<Option<char>> {
            if !self.started {
                self.current = self.ticks.pop_front().unwrap_or_default().into();
                self.started = true;
            }
            let key = self.current.pop_front();
            if key.is_none() {
                self.started = false;
            }
            Ok(key)
        }

        fn wait_key(&mut self) -> Result<char> {
            self.waits += 1;
            Ok(' ')
        }
    }

    #[derive(Default)]
    struct Screen {
        cells: HashMap<(TermInt, TermInt), char>,
        frames: usize,
    }

    impl DrawSink for Screen {
        fn draw(&mut self, row: TermInt, col: TermInt, ch: char) -> Result<()> {
            self.cells.insert((row, col), ch);
            Ok(())
        }

        fn present(&mut self) -> Result<()> {
            self.frames += 1;
            Ok(())
        }
    }

    impl Screen {
        fn text(&self) -> String {
            let mut keys: Vec<_> = self.cells.keys().copied().collect();
            keys.sort();
            keys.into_iter().map(|k| self.cells[&k]).collect()
        }
    }

    #[derive(Default)]
    struct FakeClock {
        slept: Vec<Duration>,
    }

    impl Clock for FakeClock {
        fn sleep(&mut self, duration: Duration) {
            self.slept.push(duration);
        }
    }

    fn driver(ticks: Vec<Vec<char>>) -> Driver<Script, Screen, FakeClock> {
        Driver::new(Script::new(ticks), Screen::default(), FakeClock::default())
    }

    fn game() -> GameState {
        let rng = StdRng::seed_from_u64(4);
        let mut state = GameState::with_rng(20, 10, Preset::Classic, rng).unwrap();
        state.place_food((1, 1)).unwrap();
        state
    }

    #[test]
    fn quit_before_any_update() {
        let mut state = game();
        let mut driver = driver(vec![vec!['q']]);

        let summary = driver.run(&mut state).unwrap();

        assert_eq!(summary, Summary { score: 0, length: 1, ended_by: EndReason::Quit });
        assert_eq!(state.snake().head(), (5, 10));
        assert_eq!(driver.phase(), Phase::Exited);

        let (keys, screen, clock) = driver.into_parts();
        assert_eq!(keys.waits, 0);
        assert_eq!(screen.frames, 1);
        assert!(clock.slept.is_empty());
    }

    #[test]
    fn runs_into_the_wall_and_waits_for_a_key() {
        // Head at (5,10) heading right on a 20-wide board: 8 safe steps, then col 19.
        let mut state = game();
        let mut driver = driver(vec![]);

        let summary = driver.run(&mut state).unwrap();

        assert_eq!(summary.ended_by, EndReason::GameOver(Status::Crashed(Crash::Wall)));
        assert_eq!(state.snake().head(), (5, 18));

        let (keys, screen, clock) = driver.into_parts();
        assert_eq!(keys.waits, 1);
        assert_eq!(screen.frames, 10);
        assert_eq!(clock.slept, vec![Duration::from_millis(TICK_INTERVAL_MS); 8]);
        assert!(screen.text().contains("*** GAME OVER ***"));
    }

    #[test]
    fn keys_steer_and_reversals_are_dropped() {
        let mut state = game();
        let mut driver = driver(vec![vec!['x', 'W'], vec!['s'], vec!['a', 'q']]);

        driver.tick_once(&mut state).unwrap();
        assert_eq!(state.direction(), Direction::Up);
        assert_eq!(state.snake().head(), (4, 10));

        driver.tick_once(&mut state).unwrap();
        assert_eq!(state.direction(), Direction::Up);
        assert_eq!(state.snake().head(), (3, 10));

        assert_eq!(driver.tick_once(&mut state).unwrap(), Phase::Exited);
        assert_eq!(state.snake().head(), (3, 10));
        assert_eq!(state.snake().get_direction(), Direction::Up);
        assert_eq!(state.snake().pending_direction(), Direction::Left);
    }

    #[test]
    fn status_area_fits_under_the_board() {
        let mut state = game();
        let mut driver = driver(vec![vec!['q']]);
        driver.run(&mut state).unwrap();

        let bottom = driver.sink().cells.keys().map(|(row, _)| *row).max().unwrap();
        assert_eq!(bottom, state.height() + TEXT_ROWS - 1);
    }
}
