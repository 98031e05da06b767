//! The fixed nucleotide alphabet, including the gap symbol.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AlignError;

/// One element of the alphabet `{A, G, C, T, -}`.
///
/// The discriminants are the ordinals used to index the penalty table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    A = 0,
    G = 1,
    C = 2,
    T = 3,
    #[serde(rename = "-")]
    Gap = 4,
}

/// An owned sequence.
pub type Sequence = Vec<Symbol>;
/// A sequence slice.
pub type Seq<'a> = &'a [Symbol];

impl Symbol {
    /// Number of symbols, gap included.
    pub const COUNT: usize = 5;

    /// All symbols in ordinal order.
    pub const ALL: [Symbol; Symbol::COUNT] = [Symbol::A, Symbol::G, Symbol::C, Symbol::T, Symbol::Gap];

    /// The nucleotides, i.e. every symbol except the gap.
    pub const NUCLEOTIDES: [Symbol; 4] = [Symbol::A, Symbol::G, Symbol::C, Symbol::T];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_byte(c: u8) -> Option<Symbol> {
        match c {
            b'A' => Some(Symbol::A),
            b'G' => Some(Symbol::G),
            b'C' => Some(Symbol::C),
            b'T' => Some(Symbol::T),
            b'-' => Some(Symbol::Gap),
            _ => None,
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            Symbol::A => 'A',
            Symbol::G => 'G',
            Symbol::C => 'C',
            Symbol::T => 'T',
            Symbol::Gap => '-',
        }
    }

    pub const fn is_gap(self) -> bool {
        matches!(self, Symbol::Gap)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl TryFrom<char> for Symbol {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        u8::try_from(c)
            .ok()
            .and_then(Symbol::from_byte)
            .ok_or(c)
    }
}

/// Parse sequence number `seq` (0, 1 or 2) of the input.
///
/// The input is decoded as UTF-8 so that an invalid character is reported
/// whole. Lowercase letters are rejected like any other character outside
/// the alphabet.
pub fn parse_sequence(seq: usize, text: &[u8]) -> Result<Sequence, AlignError> {
    String::from_utf8_lossy(text)
        .chars()
        .enumerate()
        .map(|(pos, ch)| {
            Symbol::try_from(ch).map_err(|ch| AlignError::InvalidSymbol { seq, pos, ch })
        })
        .collect()
}

/// Parse the three sequences of one input triple.
pub fn parse_triple(texts: [&[u8]; 3]) -> Result<[Sequence; 3], AlignError> {
    let [a, b, c] = texts;
    Ok([
        parse_sequence(0, a)?,
        parse_sequence(1, b)?,
        parse_sequence(2, c)?,
    ])
}

pub fn seq_to_string(seq: Seq) -> String {
    seq.iter().map(|s| s.to_char()).collect()
}
