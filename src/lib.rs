//!
//! # Triple aligner
//!
//! Exact global alignment of three nucleotide sequences under a symmetric
//! sum-of-pairs penalty table, reporting every co-optimal alignment.
//!
//! The scores live in a three-dimensional DP cube that is filled one cell at
//! a time. Each cell keeps all neighbours that attain its maximum, and the
//! alignments are read off by walking those links back from the terminal
//! coordinate.
//!
//! It can be used in a few ways:
//! - Drive an `Aligner` step by step, inspecting each filled cell.
//! - Run an `Aligner` to completion and enumerate or stream its alignments.
//! - Call `align` to do both at once and get `AlignStats`.
//!
pub mod aligner;
pub mod alphabet;
pub mod cli;
pub mod cost_model;
pub mod cube;
pub mod error;
pub mod generate;
pub mod observer;
pub mod stats;
pub mod step_trace;
pub mod stepper;
pub mod traceback;

pub mod prelude {
    pub use crate::aligner::Aligner;
    pub use crate::alphabet::{parse_sequence, seq_to_string, Seq, Sequence, Symbol};
    pub use crate::cost_model::{PenaltyModel, Score};
    pub use crate::cube::Pos;
    pub use crate::error::AlignError;
    pub use crate::observer::{NoObserver, StepObserver};
    pub use crate::stats::AlignStats;
    pub use crate::step_trace::{Candidate, StepTrace};
    pub use crate::stepper::StepState;
    pub use crate::traceback::Alignment;
    pub use crate::{align, align_with};
}

use instant::Instant;
use prelude::*;
use stats::Timing;

/// Fill the cube for `seqs` and enumerate at most `limit` optimal alignments.
pub fn align(
    seqs: [Sequence; 3],
    cm: PenaltyModel,
    limit: Option<usize>,
) -> Result<(Vec<Alignment>, AlignStats), AlignError> {
    align_with(seqs, cm, limit, &mut NoObserver)
}

/// Like `align`, reporting every filled cell to `observer`.
pub fn align_with(
    seqs: [Sequence; 3],
    cm: PenaltyModel,
    limit: Option<usize>,
    observer: &mut impl StepObserver,
) -> Result<(Vec<Alignment>, AlignStats), AlignError> {
    let mut stats = AlignStats::init(seqs.each_ref().map(|s| s.as_slice()));
    let [a, b, c] = seqs;
    let mut aligner = Aligner::with_penalties(a, b, c, cm);

    let start = Instant::now();
    aligner.run_to_completion_with(observer)?;
    let filled = Instant::now();
    let (alignments, truncated) = match limit {
        Some(limit) => aligner.enumerate_alignments_up_to(limit)?,
        None => (aligner.enumerate_alignments()?, false),
    };
    let end = Instant::now();

    stats.score = aligner.score().ok_or(AlignError::NotReady)?.into();
    stats.alignments = alignments.len();
    stats.truncated = truncated as usize;
    stats.timing = Timing {
        total: (end - start).as_secs_f64(),
        fill: (filled - start).as_secs_f64(),
        traceback: (end - filled).as_secs_f64(),
    };
    Ok((alignments, stats))
}
