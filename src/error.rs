use thiserror::Error;

use crate::alphabet::Symbol;
use crate::cost_model::Score;

/// Errors reported by the alignment engine.
///
/// Every variant is a recoverable condition for the immediate caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignError {
    /// An input sequence contains a character outside `{A, G, C, T, -}`.
    #[error("sequence {seq} contains invalid character {ch:?} at position {pos}")]
    InvalidSymbol { seq: usize, pos: usize, ch: char },

    /// The penalty for the pair was never set.
    #[error("no penalty was set for the pair ({x}, {y})")]
    UninitializedPenalty { x: Symbol, y: Symbol },

    /// `step_once` was called after the last cell was filled.
    #[error("all cells are already filled")]
    AlreadyFinished,

    /// Alignments were requested before the cube was completely filled.
    #[error("the cube is not completely filled yet")]
    NotReady,

    /// A penalty was changed after filling the cube started.
    #[error("the penalty model cannot change once filling has started")]
    PenaltyModelFrozen,

    /// A column score or a cell score does not fit in a `Score`.
    #[error("score overflow: a sum of penalties does not fit in 32 bits")]
    ScoreOverflow,

    /// A penalty table lists the two orders of a pair with different values.
    #[error("penalty table is not symmetric: ({x}, {y}) = {xy} but ({y}, {x}) = {yx}")]
    AsymmetricPenalty {
        x: Symbol,
        y: Symbol,
        xy: Score,
        yx: Score,
    },
}
