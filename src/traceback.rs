//! Reconstruction of all co-optimal alignments from a filled cube.
//!
//! Every root-to-origin walk over the predecessor links of the cube is one
//! optimal alignment. Predecessors are visited in their stored order, so the
//! output order is deterministic. Nothing is deduplicated.

use std::fmt;
use std::ops::ControlFlow;

use itertools::Itertools;

use crate::alphabet::{parse_sequence, Seq, Symbol};
use crate::cost_model::{PenaltyModel, Score};
use crate::cube::{column_between, DpCube, Pos};
use crate::error::AlignError;

/// One optimal alignment of the three sequences.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Alignment {
    /// The gapped sequences, all of equal length.
    pub rows: [String; 3],
    /// Cube coordinates from the origin to the terminal coordinate, one more
    /// than the number of columns.
    pub path: Vec<Pos>,
}

impl Alignment {
    fn from_stacks(columns: &[[Symbol; 3]], path: &[Pos]) -> Self {
        let rows = std::array::from_fn(|r| columns.iter().rev().map(|c| c[r].to_char()).collect());
        Alignment {
            rows,
            path: path.iter().rev().copied().collect(),
        }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.rows[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The columns, left to right.
    pub fn columns(&self) -> Result<Vec<[Symbol; 3]>, AlignError> {
        let [a, b, c] = [0, 1, 2].map(|r| parse_sequence(r, self.rows[r].as_bytes()));
        Ok(itertools::izip!(a?, b?, c?)
            .map(|(x, y, z)| [x, y, z])
            .collect())
    }

    /// Sum-of-pairs score of all columns.
    pub fn score(&self, cm: &PenaltyModel) -> Result<Score, AlignError> {
        self.columns()?
            .into_iter()
            .try_fold(0 as Score, |total, [x, y, z]| {
                total
                    .checked_add(cm.triplet(x, y, z)?)
                    .ok_or(AlignError::ScoreOverflow)
            })
    }

    /// Check that this is a valid alignment of `seqs` and return its score.
    ///
    /// Panics when the rows or the path are inconsistent with `seqs`.
    pub fn verify(&self, seqs: [Seq; 3], cm: &PenaltyModel) -> Result<Score, AlignError> {
        let len = self.len();
        for row in &self.rows {
            assert_eq!(row.len(), len, "rows have different lengths");
        }
        assert_eq!(self.path.len(), len + 1);
        assert_eq!(self.path.first(), Some(&Pos::ORIGIN));
        assert_eq!(self.path.last(), Some(&Pos(seqs[0].len(), seqs[1].len(), seqs[2].len())));

        let columns = self.columns()?;
        for ((&from, &to), &column) in self.path.iter().tuple_windows().zip(&columns) {
            let steps = from.axes().into_iter().zip(to.axes()).map(|(f, t)| t.checked_sub(f));
            let steps: Vec<_> = steps.collect();
            assert!(
                steps.iter().all(|s| matches!(s, Some(0 | 1))),
                "invalid step {from} -> {to}"
            );
            assert!(steps.contains(&Some(1)), "empty step at {from}");
            assert_eq!(column, column_between(seqs, from, to), "column at {from} -> {to}");
        }
        self.score(cm)
    }
}

impl fmt::Display for Alignment {
    /// ```text
    /// Sequence 1: -AA-
    /// Sequence 2: -AAC
    /// Sequence 3: CAA-
    /// Path: (0,0,0)→(0,0,1)→(1,1,2)→(2,2,3)→(2,3,3)
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.rows.iter().enumerate() {
            writeln!(f, "Sequence {}: {row}", r + 1)?;
        }
        write!(f, "Path: {}", self.path.iter().join("→"))
    }
}

/// Recursive depth-first traversal emitting at most `limit` alignments.
struct Traceback<'a> {
    cube: &'a DpCube,
    seqs: [Seq<'a>; 3],
    limit: usize,
    columns: Vec<[Symbol; 3]>,
    path: Vec<Pos>,
    out: Vec<Alignment>,
}

impl<'a> Traceback<'a> {
    fn visit(&mut self, pos: Pos) -> ControlFlow<()> {
        let cube = self.cube;
        let preds = cube.predecessors(pos);
        self.path.push(pos);
        let flow = if preds.is_empty() {
            if self.out.len() == self.limit {
                ControlFlow::Break(())
            } else {
                self.out.push(Alignment::from_stacks(&self.columns, &self.path));
                ControlFlow::Continue(())
            }
        } else {
            preds.iter().try_for_each(|&p| {
                self.columns.push(column_between(self.seqs, p, pos));
                let flow = self.visit(p);
                self.columns.pop();
                flow
            })
        };
        self.path.pop();
        flow
    }
}

/// All alignments of a filled cube, at most `limit` of them.
///
/// The second value is true when more than `limit` alignments exist.
pub(crate) fn enumerate(
    cube: &DpCube,
    seqs: [Seq; 3],
    limit: Option<usize>,
) -> (Vec<Alignment>, bool) {
    let mut tb = Traceback {
        cube,
        seqs,
        limit: limit.unwrap_or(usize::MAX),
        columns: vec![],
        path: vec![],
        out: vec![],
    };
    let flow = tb.visit(cube.target());
    (tb.out, flow.is_break())
}

struct Frame {
    pos: Pos,
    /// Length of the path above this frame.
    depth: usize,
    /// The column between `pos` and its successor on the path.
    column: Option<[Symbol; 3]>,
}

/// Lazily yields the same alignments, in the same order, as a full
/// enumeration, without materialising them all.
pub struct Alignments<'a> {
    cube: &'a DpCube,
    seqs: [Seq<'a>; 3],
    stack: Vec<Frame>,
    columns: Vec<[Symbol; 3]>,
    path: Vec<Pos>,
}

impl<'a> Alignments<'a> {
    pub(crate) fn new(cube: &'a DpCube, seqs: [Seq<'a>; 3]) -> Self {
        Alignments {
            cube,
            seqs,
            stack: vec![Frame {
                pos: cube.target(),
                depth: 0,
                column: None,
            }],
            columns: vec![],
            path: vec![],
        }
    }
}

impl<'a> Iterator for Alignments<'a> {
    type Item = Alignment;

    fn next(&mut self) -> Option<Alignment> {
        while let Some(Frame { pos, depth, column }) = self.stack.pop() {
            self.path.truncate(depth);
            self.columns.truncate(depth.saturating_sub(1));
            self.columns.extend(column);
            self.path.push(pos);

            let preds = self.cube.predecessors(pos);
            if preds.is_empty() {
                return Some(Alignment::from_stacks(&self.columns, &self.path));
            }
            for &p in preds.iter().rev() {
                self.stack.push(Frame {
                    pos: p,
                    depth: self.path.len(),
                    column: Some(column_between(self.seqs, p, pos)),
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::alphabet::Sequence;
    use crate::stepper::Cursor;

    fn filled(seqs: [Seq; 3], cm: &PenaltyModel) -> DpCube {
        let lens = seqs.map(|s| s.len());
        let mut cube = DpCube::new(lens);
        for pos in Cursor::new(lens) {
            cube.fill_cell(pos, seqs, cm).unwrap();
        }
        cube
    }

    fn seqs(a: &str, b: &str, c: &str) -> [Sequence; 3] {
        [a, b, c].map(|s| s.bytes().map(|c| Symbol::from_byte(c).unwrap()).collect())
    }

    #[test]
    fn two_ties_in_order() {
        let cm = PenaltyModel::linear(1, -1, -1);
        let [a, b, c] = seqs("AC", "CA", "");
        let s: [Seq; 3] = [&a, &b, &c];
        let cube = filled(s, &cm);
        assert_eq!(cube.score(cube.target()), Some(-5));
        let (alns, truncated) = enumerate(&cube, s, None);
        assert!(!truncated);
        assert_eq!(alns.len(), 2);
        assert_eq!(alns[0].rows, ["-AC", "CA-", "---"].map(String::from));
        assert_eq!(
            alns[0].path,
            vec![Pos(0, 0, 0), Pos(0, 1, 0), Pos(1, 2, 0), Pos(2, 2, 0)]
        );
        assert_eq!(alns[1].rows, ["AC-", "-CA", "---"].map(String::from));
        assert_eq!(
            alns[1].path,
            vec![Pos(0, 0, 0), Pos(1, 0, 0), Pos(2, 1, 0), Pos(2, 2, 0)]
        );
        for aln in &alns {
            assert_eq!(aln.verify(s, &cm), Ok(-5));
        }
    }

    #[test]
    fn limit_truncates() {
        let cm = PenaltyModel::linear(1, -1, -1);
        let [a, b, c] = seqs("AT", "TA", "AT");
        let s: [Seq; 3] = [&a, &b, &c];
        let cube = filled(s, &cm);
        let (all, truncated) = enumerate(&cube, s, Some(2));
        assert_eq!(all.len(), 2);
        assert!(!truncated);
        let (one, truncated) = enumerate(&cube, s, Some(1));
        assert!(truncated);
        assert_eq!(one, all[..1]);
        assert_eq!(enumerate(&cube, s, Some(0)), (vec![], true));
    }

    #[test]
    fn lazy_matches_recursive() {
        let mut cm = PenaltyModel::new();
        for x in Symbol::ALL {
            for y in Symbol::ALL {
                cm.set_pair(x, y, 0);
            }
        }
        let [a, b, c] = seqs("A", "A", "A");
        let s: [Seq; 3] = [&a, &b, &c];
        let cube = filled(s, &cm);
        let (eager, _) = enumerate(&cube, s, None);
        // Ordered set partitions of three columns.
        assert_eq!(eager.len(), 13);
        let lazy: Vec<_> = Alignments::new(&cube, s).collect();
        assert_eq!(eager, lazy);
    }

    #[test]
    fn origin_only() {
        let cm = PenaltyModel::new();
        let cube = DpCube::new([0, 0, 0]);
        let s: [Seq; 3] = [&[], &[], &[]];
        let (alns, _) = enumerate(&cube, s, None);
        assert_eq!(alns.len(), 1);
        assert!(alns[0].is_empty());
        assert_eq!(alns[0].path, vec![Pos::ORIGIN]);
        assert_eq!(alns[0].verify(s, &cm), Ok(0));
        assert_eq!(Alignments::new(&cube, s).count(), 1);
    }

    #[test]
    #[should_panic]
    fn verify_rejects_wrong_sequences() {
        let cm = PenaltyModel::linear(1, -1, -1);
        let [a, b, c] = seqs("AC", "CA", "");
        let s: [Seq; 3] = [&a, &b, &c];
        let cube = filled(s, &cm);
        let aln = Alignments::new(&cube, s).next().unwrap();
        let [x, y, z] = seqs("AG", "CA", "");
        let _ = aln.verify([&x, &y, &z], &cm);
    }

    #[test]
    fn display() {
        let aln = Alignment {
            rows: ["A-", "AC", "--"].map(String::from),
            path: vec![Pos(0, 0, 0), Pos(1, 1, 0), Pos(1, 2, 0)],
        };
        assert_eq!(
            aln.to_string(),
            "Sequence 1: A-\nSequence 2: AC\nSequence 3: --\nPath: (0,0,0)→(1,1,0)→(1,2,0)"
        );
    }
}
