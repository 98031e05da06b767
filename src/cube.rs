//! The three-dimensional DP table and its recurrence.
//!
//! Cell `(i, j, k)` holds the best sum-of-pairs score of aligning the first
//! `i`, `j` and `k` symbols of the three sequences, together with every
//! neighbouring coordinate that attains that score.
//!
//! Cells are stored in a flat arena. The flat index of `(i, j, k)` is
//! `i + (|A|+1) * (j + (|B|+1) * k)`, so increasing indices coincide with the
//! fill order of the `Cursor`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::alphabet::{Seq, Symbol};
use crate::cost_model::{PenaltyModel, Score};
use crate::error::AlignError;
use crate::step_trace::{Candidate, StepTrace};

/// A coordinate `(i, j, k)` in the cube.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos(pub usize, pub usize, pub usize);

impl Pos {
    pub const ORIGIN: Pos = Pos(0, 0, 0);

    /// The terminal coordinate for sequences of the given lengths.
    pub fn target(a: Seq, b: Seq, c: Seq) -> Pos {
        Pos(a.len(), b.len(), c.len())
    }

    pub fn axes(self) -> [usize; 3] {
        [self.0, self.1, self.2]
    }

    pub fn from_axes([i, j, k]: [usize; 3]) -> Pos {
        Pos(i, j, k)
    }

    /// The neighbour reached by taking `mv` backwards, or `None` when that
    /// would decrement a zero coordinate.
    pub fn step_back(self, mv: Move) -> Option<Pos> {
        let [i, j, k] = self.axes();
        let [da, db, dc] = mv.map(usize::from);
        Some(Pos(
            i.checked_sub(da)?,
            j.checked_sub(db)?,
            k.checked_sub(dc)?,
        ))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0, self.1, self.2)
    }
}

/// Which of the three sequences consume a symbol in one column.
pub type Move = [bool; 3];

/// All moves, in the order in which candidates are evaluated and predecessors
/// are stored.
pub const MOVES: [Move; 7] = [
    [true, true, true],
    [true, true, false],
    [true, false, true],
    [true, false, false],
    [false, true, true],
    [false, true, false],
    [false, false, true],
];

/// The column emitted when going from `from` to its successor `to`.
///
/// Each axis that advanced contributes the symbol it consumed; the other axes
/// contribute a gap.
pub fn column_between(seqs: [Seq; 3], from: Pos, to: Pos) -> [Symbol; 3] {
    let (from, to) = (from.axes(), to.axes());
    std::array::from_fn(|axis| {
        debug_assert!(to[axis] - from[axis] <= 1);
        if from[axis] == to[axis] {
            Symbol::Gap
        } else {
            seqs[axis][from[axis]]
        }
    })
}

/// One entry of the cube.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    score: Option<Score>,
    predecessors: SmallVec<[Pos; 3]>,
}

impl Cell {
    /// `None` until the cell is filled.
    pub fn score(&self) -> Option<Score> {
        self.score
    }

    /// Every neighbour that attains the score. Empty for the origin and for
    /// unfilled cells.
    pub fn predecessors(&self) -> &[Pos] {
        &self.predecessors
    }

    pub fn is_filled(&self) -> bool {
        self.score.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DpCube {
    /// Sequence lengths `|A|, |B|, |C|`.
    lens: [usize; 3],
    cells: Vec<Cell>,
}

impl DpCube {
    /// A cube for sequences of the given lengths. Only the origin is filled.
    pub fn new(lens: [usize; 3]) -> Self {
        let size = lens.iter().map(|l| l + 1).product();
        let mut cells = vec![Cell::default(); size];
        cells[0].score = Some(0);
        DpCube { lens, cells }
    }

    pub fn lens(&self) -> [usize; 3] {
        self.lens
    }

    pub fn target(&self) -> Pos {
        Pos::from_axes(self.lens)
    }

    /// Total number of cells, the origin included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.axes().iter().zip(self.lens).all(|(&x, l)| x <= l)
    }

    #[inline]
    fn index(&self, Pos(i, j, k): Pos) -> usize {
        assert!(
            self.contains(Pos(i, j, k)),
            "{} is outside the cube {}",
            Pos(i, j, k),
            self.target()
        );
        i + (self.lens[0] + 1) * (j + (self.lens[1] + 1) * k)
    }

    fn pos(&self, index: usize) -> Pos {
        let (w, h) = (self.lens[0] + 1, self.lens[1] + 1);
        Pos(index % w, index / w % h, index / (w * h))
    }

    /// Panics when `pos` is outside the cube.
    pub fn get(&self, pos: Pos) -> &Cell {
        &self.cells[self.index(pos)]
    }

    pub fn score(&self, pos: Pos) -> Option<Score> {
        self.get(pos).score
    }

    pub fn predecessors(&self, pos: Pos) -> &[Pos] {
        self.get(pos).predecessors()
    }

    /// All cells in fill order.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (self.pos(idx), cell))
    }

    /// Evaluate every candidate move into `pos` without modifying the cube.
    ///
    /// All neighbours of `pos` must be filled already.
    pub(crate) fn evaluate(
        &self,
        pos: Pos,
        seqs: [Seq; 3],
        cm: &PenaltyModel,
    ) -> Result<StepTrace, AlignError> {
        let mut candidates: SmallVec<[Candidate; 7]> = SmallVec::new();
        for mv in MOVES {
            let Some(from) = pos.step_back(mv) else {
                continue;
            };
            let Some(from_score) = self.score(from) else {
                unreachable!("{from} is needed to fill {pos} but is not filled yet");
            };
            let column = column_between(seqs, from, pos);
            let penalty = cm.triplet(column[0], column[1], column[2])?;
            let score = from_score
                .checked_add(penalty)
                .ok_or(AlignError::ScoreOverflow)?;
            candidates.push(Candidate {
                from,
                column,
                from_score,
                penalty,
                score,
            });
        }
        let Some(best) = candidates.iter().map(|c| c.score).max() else {
            unreachable!("the origin has no candidates and is never filled by the recurrence");
        };
        Ok(StepTrace {
            pos,
            candidates,
            best,
        })
    }

    /// Fill `pos` with the maximum candidate score and all arg-max neighbours.
    ///
    /// On error the cell is left untouched.
    pub(crate) fn fill_cell(
        &mut self,
        pos: Pos,
        seqs: [Seq; 3],
        cm: &PenaltyModel,
    ) -> Result<StepTrace, AlignError> {
        let trace = self.evaluate(pos, seqs, cm)?;
        let idx = self.index(pos);
        let cell = &mut self.cells[idx];
        cell.score = Some(trace.best);
        cell.predecessors = trace.predecessors().collect();
        Ok(trace)
    }
}
