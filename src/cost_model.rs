//! This module contains the `PenaltyModel`: a symmetric pairwise score table
//! over the alphabet, used for sum-of-pairs scoring of alignment columns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::alphabet::Symbol;
use crate::error::AlignError;

/// Scores are maximised: higher is better.
pub type Score = i32;

/// The on-disk shape of a penalty table: `row symbol -> column symbol -> score`.
pub type PenaltyRows = BTreeMap<Symbol, BTreeMap<Symbol, Score>>;

/// A symmetric score for every unordered pair of symbols.
///
/// Pairs start out unset. Querying an unset pair is an error, so a table must
/// be fully populated for every pair that the input can produce before
/// filling starts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PenaltyRows", into = "PenaltyRows")]
pub struct PenaltyModel {
    table: [[Option<Score>; Symbol::COUNT]; Symbol::COUNT],
}

impl PenaltyModel {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// `matches` for equal nucleotides, `mismatch` for different ones, `gap`
    /// for a nucleotide against a gap, and 0 for gap against gap.
    pub fn linear(matches: Score, mismatch: Score, gap: Score) -> Self {
        let mut cm = Self::new();
        for x in Symbol::NUCLEOTIDES {
            for y in Symbol::NUCLEOTIDES {
                cm.set_pair(x, y, if x == y { matches } else { mismatch });
            }
            cm.set_pair(x, Symbol::Gap, gap);
        }
        cm.set_pair(Symbol::Gap, Symbol::Gap, 0);
        cm
    }

    /// The table used when no other table is configured.
    pub fn example() -> Self {
        use Symbol::*;
        let mut cm = Self::new();
        for (x, y, v) in [
            (A, A, 10),
            (A, G, -1),
            (A, C, -3),
            (A, T, -4),
            (G, G, 7),
            (G, C, -5),
            (G, T, -3),
            (C, C, 9),
            (C, T, 0),
            (T, T, 8),
        ] {
            cm.set_pair(x, y, v);
        }
        for x in Symbol::NUCLEOTIDES {
            cm.set_pair(x, Gap, -5);
        }
        cm.set_pair(Gap, Gap, 0);
        cm
    }

    /// Record the score of the unordered pair `{x, y}`.
    pub fn set_pair(&mut self, x: Symbol, y: Symbol, value: Score) {
        self.table[x.index()][y.index()] = Some(value);
        self.table[y.index()][x.index()] = Some(value);
    }

    /// The score of `{x, y}`, if set.
    #[inline]
    pub fn get(&self, x: Symbol, y: Symbol) -> Option<Score> {
        self.table[x.index()][y.index()]
    }

    #[inline]
    pub fn pair(&self, x: Symbol, y: Symbol) -> Result<Score, AlignError> {
        self.get(x, y)
            .ok_or(AlignError::UninitializedPenalty { x, y })
    }

    /// Sum-of-pairs score of one column `(x, y, z)`.
    #[inline]
    pub fn triplet(&self, x: Symbol, y: Symbol, z: Symbol) -> Result<Score, AlignError> {
        let (xy, xz, yz) = (self.pair(x, y)?, self.pair(x, z)?, self.pair(y, z)?);
        xy.checked_add(xz)
            .and_then(|s| s.checked_add(yz))
            .ok_or(AlignError::ScoreOverflow)
    }

    /// Unordered pairs `(x, y)` with `x <= y` that are still unset.
    pub fn missing_pairs(&self) -> Vec<(Symbol, Symbol)> {
        Self::unordered_pairs()
            .filter(|&(x, y)| self.get(x, y).is_none())
            .collect()
    }

    /// True when all 15 unordered pairs are set.
    pub fn is_complete(&self) -> bool {
        self.missing_pairs().is_empty()
    }

    fn unordered_pairs() -> impl Iterator<Item = (Symbol, Symbol)> {
        Symbol::ALL
            .into_iter()
            .flat_map(|x| Symbol::ALL.into_iter().filter(move |&y| x <= y).map(move |y| (x, y)))
    }

    /// Build a table from nested rows.
    ///
    /// Each pair may be given in either or both orders. When both orders are
    /// given they must agree.
    pub fn from_rows(rows: &PenaltyRows) -> Result<Self, AlignError> {
        let mut cm = Self::new();
        for (&x, row) in rows {
            for (&y, &xy) in row {
                if let Some(yx) = rows.get(&y).and_then(|r| r.get(&x)) {
                    if *yx != xy {
                        return Err(AlignError::AsymmetricPenalty { x, y, xy, yx: *yx });
                    }
                }
                cm.set_pair(x, y, xy);
            }
        }
        Ok(cm)
    }

    /// The set pairs as nested rows, upper triangle only.
    pub fn to_rows(&self) -> PenaltyRows {
        let mut rows = PenaltyRows::new();
        for (x, y) in Self::unordered_pairs() {
            if let Some(v) = self.get(x, y) {
                rows.entry(x).or_default().insert(y, v);
            }
        }
        rows
    }
}

impl TryFrom<PenaltyRows> for PenaltyModel {
    type Error = AlignError;

    fn try_from(rows: PenaltyRows) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<PenaltyModel> for PenaltyRows {
    fn from(cm: PenaltyModel) -> Self {
        cm.to_rows()
    }
}
