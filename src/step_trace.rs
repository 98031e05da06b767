//! Structured record of a single filled cell.

use smallvec::SmallVec;
use std::fmt;

use crate::alphabet::Symbol;
use crate::cost_model::Score;
use crate::cube::Pos;

/// One evaluated move into the filled cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// The neighbour the move starts from.
    pub from: Pos,
    /// The column appended by the move.
    pub column: [Symbol; 3],
    pub from_score: Score,
    /// Sum-of-pairs score of `column`.
    pub penalty: Score,
    /// `from_score + penalty`.
    pub score: Score,
}

/// What happened when one cell was filled: every candidate in evaluation
/// order, and the chosen maximum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepTrace {
    pub pos: Pos,
    pub candidates: SmallVec<[Candidate; 7]>,
    pub best: Score,
}

impl StepTrace {
    /// The candidates attaining `best`, in evaluation order.
    pub fn chosen(&self) -> impl Iterator<Item = &Candidate> + '_ {
        self.candidates.iter().filter(|c| c.score == self.best)
    }

    pub fn predecessors(&self) -> impl Iterator<Item = Pos> + '_ {
        self.chosen().map(|c| c.from)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.column;
        let Pos(i, j, k) = self.from;
        write!(f, "F({i},{j},{k}) + e({x},{y},{z}) = {} + ", self.from_score)?;
        if self.penalty < 0 {
            write!(f, "({})", self.penalty)?;
        } else {
            write!(f, "{}", self.penalty)?;
        }
        write!(f, " = {}", self.score)
    }
}

impl fmt::Display for StepTrace {
    /// ```text
    /// Filled cell (1,1,0) with -2, the maximum of:
    ///   F(0,0,0) + e(A,A,-) = 0 + (-2) = -2  *
    ///   F(0,1,0) + e(A,-,-) = -4 + (-4) = -8
    ///   F(1,0,0) + e(-,A,-) = -4 + (-4) = -8
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Filled cell {} with {}, the maximum of:", self.pos, self.best)?;
        for c in &self.candidates {
            write!(f, "\n  {c}")?;
            if c.score == self.best {
                write!(f, "  *")?;
            }
        }
        Ok(())
    }
}
