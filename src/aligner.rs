//! The `Aligner` owns the three sequences, the penalty model, the cube and the
//! fill cursor, and exposes stepping, inspection and enumeration.

use log::{debug, info, trace, warn};

use crate::alphabet::{parse_sequence, Seq, Sequence, Symbol};
use crate::cost_model::{PenaltyModel, Score};
use crate::cube::{DpCube, Pos};
use crate::error::AlignError;
use crate::observer::{NoObserver, StepObserver};
use crate::step_trace::StepTrace;
use crate::stepper::{Cursor, StepState};
use crate::traceback::{self, Alignment, Alignments};

/// Incremental three-way global aligner.
///
/// ```
/// use triple_aligner::prelude::*;
/// use Symbol::*;
///
/// let mut aligner = Aligner::new("AA", "AAC", "CAA").unwrap();
/// for (x, y, v) in [(A, A, 2), (A, C, -1), (A, Gap, -2), (C, C, 2), (C, Gap, -2), (Gap, Gap, 0)] {
///     aligner.set_pair_penalty(x, y, v).unwrap();
/// }
/// aligner.run_to_completion().unwrap();
/// assert_eq!(aligner.cell_score(2, 3, 3), Some(4));
/// let alignments = aligner.enumerate_alignments().unwrap();
/// assert_eq!(alignments[0].rows, ["-AA-", "-AAC", "CAA-"]);
/// ```
#[derive(Clone, Debug)]
pub struct Aligner {
    seqs: [Sequence; 3],
    cm: PenaltyModel,
    cube: DpCube,
    cursor: Cursor,
    /// Number of cells filled so far, the origin excluded.
    filled: usize,
    last_step: Option<StepTrace>,
}

impl Aligner {
    /// Parse three sequences over `{A, G, C, T, -}`. All penalties start out
    /// unset.
    pub fn new(a: &str, b: &str, c: &str) -> Result<Self, AlignError> {
        Ok(Self::from_sequences(
            parse_sequence(0, a.as_bytes())?,
            parse_sequence(1, b.as_bytes())?,
            parse_sequence(2, c.as_bytes())?,
        ))
    }

    pub fn from_sequences(a: Sequence, b: Sequence, c: Sequence) -> Self {
        Self::with_penalties(a, b, c, PenaltyModel::new())
    }

    pub fn with_penalties(a: Sequence, b: Sequence, c: Sequence, cm: PenaltyModel) -> Self {
        let lens = [a.len(), b.len(), c.len()];
        let cursor = Cursor::new(lens);
        if cursor.is_finished() {
            debug!("all sequences are empty; nothing to fill");
        }
        Aligner {
            seqs: [a, b, c],
            cm,
            cube: DpCube::new(lens),
            cursor,
            filled: 0,
            last_step: None,
        }
    }

    pub fn sequences(&self) -> [Seq; 3] {
        self.seqs.each_ref().map(|s| s.as_slice())
    }

    pub fn penalties(&self) -> &PenaltyModel {
        &self.cm
    }

    /// Set the score of the unordered pair `{x, y}`.
    ///
    /// Fails once a cell other than the origin has been filled.
    pub fn set_pair_penalty(&mut self, x: Symbol, y: Symbol, value: Score) -> Result<(), AlignError> {
        if self.filled > 0 {
            return Err(AlignError::PenaltyModelFrozen);
        }
        self.cm.set_pair(x, y, value);
        Ok(())
    }

    /// Replace the whole penalty model. Fails like `set_pair_penalty`.
    pub fn set_penalties(&mut self, cm: PenaltyModel) -> Result<(), AlignError> {
        if self.filled > 0 {
            return Err(AlignError::PenaltyModelFrozen);
        }
        self.cm = cm;
        Ok(())
    }

    pub fn state(&self) -> StepState {
        self.cursor.state()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }

    /// The cell the next step fills.
    pub fn next_cell(&self) -> Option<Pos> {
        (!self.is_finished()).then(|| self.cursor.pos())
    }

    /// Number of cells filled so far, the origin excluded.
    pub fn filled_cells(&self) -> usize {
        self.filled
    }

    pub fn cube(&self) -> &DpCube {
        &self.cube
    }

    fn fill_next(&mut self) -> Result<StepTrace, AlignError> {
        if self.cursor.is_finished() {
            return Err(AlignError::AlreadyFinished);
        }
        let pos = self.cursor.pos();
        let seqs = self.seqs.each_ref().map(|s| s.as_slice());
        let step = self.cube.fill_cell(pos, seqs, &self.cm)?;
        debug!("filled {pos} with {}", step.best);
        trace!("{step}");
        self.filled += 1;
        self.cursor.advance();
        if self.cursor.is_finished() {
            info!(
                "filled all {} cells; optimal score {}",
                self.filled + 1,
                step.best
            );
        }
        Ok(step)
    }

    /// Fill the cell under the cursor and move to the next one.
    pub fn step_once(&mut self) -> Result<&StepTrace, AlignError> {
        let step = self.fill_next()?;
        Ok(self.last_step.insert(step))
    }

    /// Step until every cell is filled. Does nothing when already finished.
    pub fn run_to_completion(&mut self) -> Result<(), AlignError> {
        self.run_to_completion_with(&mut NoObserver)
    }

    /// Like `run_to_completion`, reporting each filled cell to `observer`.
    pub fn run_to_completion_with(
        &mut self,
        observer: &mut impl StepObserver,
    ) -> Result<(), AlignError> {
        if self.is_finished() {
            return Ok(());
        }
        while !self.is_finished() {
            let step = self.fill_next()?;
            observer.cell_filled(&step, &self.cube);
            self.last_step = Some(step);
        }
        observer.finished(&self.cube);
        Ok(())
    }

    /// The trace of the most recently filled cell.
    pub fn last_step(&self) -> Option<&StepTrace> {
        self.last_step.as_ref()
    }

    /// Panics when `(i, j, k)` is outside the cube.
    pub fn cell_score(&self, i: usize, j: usize, k: usize) -> Option<Score> {
        self.cube.score(Pos(i, j, k))
    }

    /// Panics when `(i, j, k)` is outside the cube.
    pub fn cell_predecessors(&self, i: usize, j: usize, k: usize) -> &[Pos] {
        self.cube.predecessors(Pos(i, j, k))
    }

    /// The optimal score, once finished.
    pub fn score(&self) -> Option<Score> {
        if self.is_finished() {
            self.cube.score(self.cube.target())
        } else {
            None
        }
    }

    fn ensure_finished(&self) -> Result<(), AlignError> {
        if self.is_finished() {
            Ok(())
        } else {
            Err(AlignError::NotReady)
        }
    }

    /// Every optimal alignment.
    pub fn enumerate_alignments(&self) -> Result<Vec<Alignment>, AlignError> {
        self.ensure_finished()?;
        Ok(traceback::enumerate(&self.cube, self.sequences(), None).0)
    }

    /// The first `limit` optimal alignments, and whether more exist.
    pub fn enumerate_alignments_up_to(
        &self,
        limit: usize,
    ) -> Result<(Vec<Alignment>, bool), AlignError> {
        self.ensure_finished()?;
        let (alignments, truncated) = traceback::enumerate(&self.cube, self.sequences(), Some(limit));
        if truncated {
            warn!("more than {limit} optimal alignments exist; only the first {limit} are returned");
        }
        Ok((alignments, truncated))
    }

    /// Stream the optimal alignments in the same order as `enumerate_alignments`.
    pub fn alignments(&self) -> Result<Alignments<'_>, AlignError> {
        self.ensure_finished()?;
        Ok(Alignments::new(&self.cube, self.sequences()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use Symbol::*;

    fn fixture() -> Aligner {
        let mut aligner = Aligner::new("AA", "AAC", "CAA").unwrap();
        for (x, y, v) in [
            (A, A, 2),
            (A, C, -1),
            (A, Gap, -2),
            (C, C, 2),
            (C, Gap, -2),
            (Gap, Gap, 0),
        ] {
            aligner.set_pair_penalty(x, y, v).unwrap();
        }
        aligner
    }

    #[test]
    fn invalid_symbol() {
        assert_eq!(
            Aligner::new("AC", "AXC", "").unwrap_err(),
            AlignError::InvalidSymbol {
                seq: 1,
                pos: 1,
                ch: 'X'
            }
        );
    }

    #[test]
    fn step_by_step() {
        let mut aligner = fixture();
        assert_eq!(aligner.state(), StepState::Running);
        assert_eq!(aligner.next_cell(), Some(Pos(1, 0, 0)));
        assert!(aligner.last_step().is_none());

        let step = aligner.step_once().unwrap();
        assert_eq!(step.pos, Pos(1, 0, 0));
        assert_eq!(step.best, -4);
        assert_eq!(aligner.cell_score(1, 0, 0), Some(-4));
        assert_eq!(aligner.cell_score(2, 0, 0), None);

        aligner.step_once().unwrap();
        assert_eq!(aligner.cell_score(2, 0, 0), Some(-8));
        aligner.step_once().unwrap();
        assert_eq!(aligner.cell_score(0, 1, 0), Some(-4));
        let step = aligner.step_once().unwrap();
        assert_eq!(step.pos, Pos(1, 1, 0));
        assert_eq!(step.best, -2);
        assert_eq!(aligner.cell_predecessors(1, 1, 0), &[Pos(0, 0, 0)]);
        assert_eq!(aligner.filled_cells(), 4);
    }

    #[test]
    fn frozen_after_first_step() {
        let mut aligner = fixture();
        aligner.set_pair_penalty(A, A, 3).unwrap();
        aligner.step_once().unwrap();
        assert_eq!(
            aligner.set_pair_penalty(A, A, 2),
            Err(AlignError::PenaltyModelFrozen)
        );
        assert_eq!(
            aligner.set_penalties(PenaltyModel::example()),
            Err(AlignError::PenaltyModelFrozen)
        );
    }

    #[test]
    fn finished_lifecycle() {
        let mut aligner = fixture();
        assert_eq!(aligner.enumerate_alignments(), Err(AlignError::NotReady));
        assert!(aligner.alignments().is_err());
        assert_eq!(aligner.score(), None);
        aligner.run_to_completion().unwrap();
        assert!(aligner.is_finished());
        assert_eq!(aligner.next_cell(), None);
        assert_eq!(aligner.score(), Some(4));
        assert_eq!(aligner.last_step().map(|s| s.pos), Some(Pos(2, 3, 3)));
        assert_eq!(aligner.step_once().unwrap_err(), AlignError::AlreadyFinished);
        assert_eq!(aligner.run_to_completion(), Ok(()));
        assert_eq!(aligner.filled_cells(), 3 * 4 * 4 - 1);
    }

    #[test]
    fn missing_penalty_is_reported_and_cell_stays_unfilled() {
        let mut aligner = Aligner::new("G", "", "").unwrap();
        aligner.set_pair_penalty(Gap, Gap, 0).unwrap();
        assert_eq!(
            aligner.step_once().unwrap_err(),
            AlignError::UninitializedPenalty { x: G, y: Gap }
        );
        assert_eq!(aligner.cell_score(1, 0, 0), None);
        assert_eq!(aligner.next_cell(), Some(Pos(1, 0, 0)));
        // Nothing was filled, so the model can still be completed.
        aligner.set_pair_penalty(G, Gap, -1).unwrap();
        aligner.run_to_completion().unwrap();
        assert_eq!(aligner.score(), Some(-2));
    }

    #[test]
    fn score_overflow_is_reported_and_cell_stays_unfilled() {
        let big = Score::MAX / 2;

        // A single column overflows.
        let mut aligner = Aligner::new("A", "A", "A").unwrap();
        aligner.set_penalties(PenaltyModel::linear(big, big, big)).unwrap();
        aligner.step_once().unwrap();
        aligner.step_once().unwrap();
        assert_eq!(aligner.cell_score(1, 0, 0), Some(Score::MAX - 1));
        assert_eq!(aligner.step_once().unwrap_err(), AlignError::ScoreOverflow);
        assert_eq!(aligner.cell_score(1, 1, 0), None);
        assert_eq!(aligner.next_cell(), Some(Pos(1, 1, 0)));

        // Every column fits, but the running score does not.
        let mut aligner = Aligner::new("AA", "", "").unwrap();
        aligner.set_penalties(PenaltyModel::linear(0, 0, big)).unwrap();
        assert_eq!(
            aligner.run_to_completion(),
            Err(AlignError::ScoreOverflow)
        );
        assert_eq!(aligner.cell_score(1, 0, 0), Some(Score::MAX - 1));
        assert_eq!(aligner.cell_score(2, 0, 0), None);
        assert!(!aligner.is_finished());
    }

    #[test]
    fn all_empty() {
        let mut aligner = Aligner::new("", "", "").unwrap();
        assert!(aligner.is_finished());
        assert_eq!(aligner.run_to_completion(), Ok(()));
        let alignments = aligner.enumerate_alignments().unwrap();
        assert_eq!(alignments.len(), 1);
        assert_eq!(alignments[0].rows, ["", "", ""]);
        assert_eq!(alignments[0].path, vec![Pos::ORIGIN]);
    }

    #[test]
    fn observer_sees_every_cell() {
        let mut aligner = fixture();
        let mut seen = vec![];
        aligner
            .run_to_completion_with(&mut |step: &StepTrace| seen.push(step.pos))
            .unwrap();
        assert_eq!(seen.len(), aligner.filled_cells());
        assert_eq!(seen.first(), Some(&Pos(1, 0, 0)));
        assert_eq!(seen.last(), Some(&Pos(2, 3, 3)));
    }

    #[test]
    fn send_and_sync() {
        fn check<T: Send + Sync>() {}
        check::<Aligner>();
    }
}
