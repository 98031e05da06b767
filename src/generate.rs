//! Random triples of related sequences.
//!
//! A random ancestor is mutated independently three times, each time with
//! `ceil(e * n)` uniformly chosen substitutions, insertions and deletions.

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::alphabet::{Seq, Sequence, Symbol};

#[derive(Parser, Serialize, Deserialize, Clone, Debug, Default)]
pub struct GenerateArgs {
    /// The number of sequence triples to generate
    #[clap(short = 'x', long, display_order = 2)]
    pub cnt: Option<usize>,

    /// Length of the generated ancestor
    #[clap(short = 'n', long, display_order = 3)]
    pub length: Option<usize>,

    /// Error rate of each descendant relative to the ancestor
    #[clap(short, long, display_order = 4)]
    pub error_rate: Option<f32>,

    /// Seed to initialize RNG for reproducability
    #[clap(long)]
    pub seed: Option<u64>,
}

impl GenerateArgs {
    pub fn to_generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            length: self.length.unwrap_or(0),
            error_rate: self.error_rate.unwrap_or(0.),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GenerateOptions {
    pub length: usize,
    pub error_rate: f32,
}

enum Mutation {
    // Replace symbol at pos.
    Substitution(usize, Symbol),
    // Insert symbol before pos.
    Insertion(usize, Symbol),
    // Delete symbol at pos.
    Deletion(usize),
}

fn rand_symbol(rng: &mut impl Rng) -> Symbol {
    Symbol::NUCLEOTIDES[rng.gen_range(0..4)]
}

fn random_mutation(len: usize, rng: &mut impl Rng) -> Mutation {
    // Substitution / insertion / deletion all with equal probability.
    // For length 0 sequences, only generate insertions.
    match if len == 0 { 1 } else { rng.gen_range(0..3usize) } {
        0 => Mutation::Substitution(rng.gen_range(0..len), rand_symbol(rng)),
        1 => Mutation::Insertion(rng.gen_range(0..len + 1), rand_symbol(rng)),
        _ => Mutation::Deletion(rng.gen_range(0..len)),
    }
}

/// Apply `num_mutations` random edits to a copy of `ancestor`.
pub fn mutate(ancestor: Seq, num_mutations: usize, rng: &mut impl Rng) -> Sequence {
    let mut s = ancestor.to_vec();
    for _ in 0..num_mutations {
        match random_mutation(s.len(), rng) {
            Mutation::Substitution(i, c) => s[i] = c,
            Mutation::Insertion(i, c) => s.insert(i, c),
            Mutation::Deletion(i) => {
                s.remove(i);
            }
        }
    }
    s
}

pub fn generate_triple(opt: &GenerateOptions, rng: &mut impl Rng) -> [Sequence; 3] {
    let ancestor: Sequence = (0..opt.length).map(|_| rand_symbol(rng)).collect();
    let num_mutations = (opt.error_rate * opt.length as f32).ceil() as usize;
    std::array::from_fn(|_| mutate(&ancestor, num_mutations, rng))
}

pub fn setup_triple_with_seed(seed: u64, n: usize, e: f32) -> [Sequence; 3] {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_triple(
        &GenerateOptions {
            length: n,
            error_rate: e,
        },
        &mut rng,
    )
}

pub fn setup_triple(n: usize, e: f32) -> [Sequence; 3] {
    setup_triple_with_seed(31415, n, e)
}
