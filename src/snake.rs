use std::collections::VecDeque;

use crate::Coords;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    /// Unit step as `(row, col)`.
    pub fn delta(self) -> Coords {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn step(self, from: Coords) -> Coords {
        let (dr, dc) = self.delta();
        (from.0 + dr, from.1 + dc)
    }
}

/// The snake's body, head first, together with its heading.
///
/// `direction` is what the last tick moved along; `pending` is what the next
/// tick will move along. Turning is checked against `direction`, so two quick
/// presses within one tick can't fold the snake back onto itself.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
    pending: Direction,
}

impl Snake {
    /// Takes an explicit body, head first. Callers check it is non-empty,
    /// distinct and connected.
    pub(crate) fn from_cells(cells: Vec<Coords>, direction: Direction) -> Self {
        Snake { body: cells.into(), direction, pending: direction }
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = Coords> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, cell: Coords) -> bool {
        self.body.contains(&cell)
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    /// Queues a turn for the next step. Reversals are dropped.
    pub fn set_direction(&mut self, new_direction: Direction) {
        if new_direction != self.direction.opposite() {
            self.pending = new_direction;
        }
    }

    /// Commits the queued turn and returns where the head would land.
    pub fn next_head(&mut self) -> Coords {
        self.direction = self.pending;
        self.direction.step(self.head())
    }

    /// Pushes a new head. Unless `grow` is set, the old tail is dropped and returned.
    pub fn advance(&mut self, new_head: Coords, grow: bool) -> Option<Coords> {
        self.body.push_front(new_head);

        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, Arbitrary, Gen};

    impl Arbitrary for Direction {
        fn arbitrary(g: &mut Gen) -> Direction {
            *g.choose(&Direction::ALL).unwrap()
        }
    }

    #[test]
    fn head_comes_first() {
        let snake = Snake::from_cells(vec![(10, 20), (10, 21), (10, 22)], Left);
        assert_eq!(snake.head(), (10, 20));
        assert_eq!(snake.len(), 3);
        assert!(snake.contains((10, 22)));
        assert!(!snake.contains((10, 23)));
    }

    #[test]
    fn advance_drops_tail_unless_growing() {
        let mut snake = Snake::from_cells(vec![(5, 5), (5, 4)], Right);
        let head = snake.next_head();
        assert_eq!(head, (5, 6));

        assert_eq!(snake.advance(head, false), Some((5, 4)));
        assert_eq!(snake.len(), 2);

        let head = snake.next_head();
        assert_eq!(snake.advance(head, true), None);
        assert_eq!(snake.len(), 3);
        let cells: Vec<_> = snake.cells().collect();
        assert_eq!(cells, vec![(5, 7), (5, 6), (5, 5)]);
    }

    #[test]
    fn turn_is_checked_against_committed_direction() {
        let mut snake = Snake::from_cells(vec![(5, 5)], Right);

        // Up is fine, then Left is still a reversal of the committed Right.
        snake.set_direction(Up);
        snake.set_direction(Left);
        assert_eq!(snake.pending_direction(), Up);
        assert_eq!(snake.get_direction(), Right);

        snake.next_head();
        assert_eq!(snake.get_direction(), Up);
    }

    fn reversal_is_ignored_prop(start: Direction) -> bool {
        let mut snake = Snake::from_cells(vec![(5, 5)], start);
        snake.set_direction(start.opposite());
        snake.pending_direction() == start && snake.get_direction() == start
    }

    #[test]
    fn reversal_is_ignored() {
        quickcheck(reversal_is_ignored_prop as fn(Direction) -> bool);
    }

    fn opposite_cancels_step_prop(dir: Direction, row: i8, col: i8) -> bool {
        let from = (row as i16, col as i16);
        dir.opposite().step(dir.step(from)) == from
    }

    #[test]
    fn opposite_cancels_step() {
        quickcheck(opposite_cancels_step_prop as fn(Direction, i8, i8) -> bool);
    }
}
