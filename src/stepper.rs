//! Fill order of the cube.
//!
//! Coordinates are visited with the first axis fastest, then the second, then
//! the third. Every neighbour of a coordinate precedes it in this order.

use crate::cube::Pos;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepState {
    /// The cursor points at the next cell to fill.
    Running,
    /// Every cell is filled.
    Finished,
}

/// Points at the next cell to fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    pos: Pos,
    lens: [usize; 3],
    state: StepState,
}

impl Cursor {
    /// A cursor at the first coordinate after the origin. When the cube
    /// consists of the origin only, the cursor starts out finished.
    pub fn new(lens: [usize; 3]) -> Self {
        let mut cursor = Cursor {
            pos: Pos::ORIGIN,
            lens,
            state: StepState::Running,
        };
        cursor.advance();
        cursor
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == StepState::Finished
    }

    /// Move to the next coordinate, or finish after the last one.
    pub fn advance(&mut self) {
        if self.is_finished() {
            return;
        }
        let mut axes = self.pos.axes();
        for (x, &len) in axes.iter_mut().zip(&self.lens) {
            if *x < len {
                *x += 1;
                self.pos = Pos::from_axes(axes);
                return;
            }
            *x = 0;
        }
        self.state = StepState::Finished;
    }
}

impl Iterator for Cursor {
    type Item = Pos;

    /// The remaining coordinates, the current one included.
    fn next(&mut self) -> Option<Pos> {
        if self.is_finished() {
            return None;
        }
        let pos = self.pos;
        self.advance();
        Some(pos)
    }
}
