use crate::{cost_model::PenaltyModel, generate::GenerateArgs};
use bio::io::fasta;
use clap::{value_parser, Parser};
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    ops::ControlFlow,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Parser, Serialize, Deserialize)]
#[clap(author, about)]
pub struct Cli {
    #[clap(flatten)]
    pub input: Input,

    /// A .json file with the penalty table, as nested rows: {"A": {"A": 10, "-": -5}, ...}.
    ///
    /// Pairs may be given in either order. Defaults to a built-in example table.
    #[arg(short, long, value_parser = value_parser!(PathBuf))]
    pub penalties: Option<PathBuf>,

    /// Report at most this many optimal alignments per triple.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print how every cell of the cube is filled.
    #[arg(long, hide_short_help = true)]
    pub steps: bool,

    /// Where to write optional statistics.
    #[arg(short, long, value_parser = value_parser!(PathBuf))]
    pub output: Option<PathBuf>,

    /// Print less. Pass twice for summary line only.
    ///
    /// Do not print alignments and per-triple stats, but overwrite the running average.
    /// Pass twice to only print a summary line and avoid all terminal clutter, e.g. for benchmarking.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub silent: u8,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid penalty table {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read a penalty table in the nested-row JSON format.
pub fn read_penalties(path: &Path) -> Result<PenaltyModel, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_owned(),
        source,
    })
}

impl Cli {
    /// The configured penalty table, or the built-in example.
    pub fn penalty_model(&self) -> Result<PenaltyModel, ConfigError> {
        match &self.penalties {
            Some(path) => read_penalties(path),
            None => Ok(PenaltyModel::example()),
        }
    }
}

#[derive(Parser, Serialize, Deserialize)]
#[clap(next_help_heading = "Input")]
pub struct Input {
    /// The .seq, .txt, or Fasta file with sequence triples to align, or a directory of them.
    #[clap(short, long, value_parser = value_parser!(PathBuf), display_order = 1)]
    pub input: Option<PathBuf>,

    /// Three sequences to align.
    #[clap(long, num_args = 3, value_names = ["A", "B", "C"], conflicts_with = "input", display_order = 1)]
    pub seqs: Option<Vec<String>>,

    /// Options to generate an input triple.
    #[clap(flatten, next_help_heading = "Generated input")]
    pub generate: GenerateArgs,
}

impl Input {
    /// Call the given function for each triple in the input, until it returns
    /// `Break`. Returns `Break` when the input was not processed completely.
    ///
    /// Sequences are passed on unparsed, so that invalid characters are
    /// reported by the aligner.
    pub fn process_input_triples(
        &self,
        mut run_triple: impl FnMut([&[u8]; 3]) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let mut run_cropped_triple = |seqs: [&[u8]; 3]| -> ControlFlow<()> {
            // Shrink if needed.
            match self.generate.length {
                Some(n) => run_triple(seqs.map(|s| &s[..s.len().min(n)])),
                None => run_triple(seqs),
            }
        };

        if let Some(seqs) = &self.seqs {
            if let Some((a, b, c)) = seqs.iter().collect_tuple() {
                run_cropped_triple([a.as_bytes(), b.as_bytes(), c.as_bytes()])?;
            }
        } else if let Some(input) = &self.input {
            // Parse file
            let mut files = if input.is_file() {
                vec![input.clone()]
            } else {
                input
                    .read_dir()
                    .unwrap_or_else(|_| panic!("{} is not a file or directory", input.display()))
                    .map(|x| x.unwrap().path())
                    .collect_vec()
            };
            files.sort();

            for f in files {
                match f.extension().expect("Unknown file extension") {
                    ext if ext == "seq" || ext == "txt" => {
                        let f = BufReader::new(File::open(&f).unwrap());
                        for (mut a, mut b, mut c) in
                            f.lines().map(|l| l.unwrap().into_bytes()).tuples()
                        {
                            if ext == "seq" {
                                assert_eq!(a.remove(0), b'>');
                                assert_eq!(b.remove(0), b'<');
                                assert_eq!(c.remove(0), b'^');
                            }
                            run_cropped_triple([&a[..], &b[..], &c[..]])?;
                        }
                    }
                    ext if ext == "fna" || ext == "fa" || ext == "fasta" => {
                        for (a, b, c) in fasta::Reader::new(BufReader::new(File::open(&f).unwrap()))
                            .records()
                            .tuples()
                        {
                            let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
                            run_cropped_triple([a.seq(), b.seq(), c.seq()])?;
                        }
                    }
                    ext => {
                        unreachable!(
                            "Unknown file extension {ext:?}. Must be in {{seq,txt,fna,fa,fasta}}."
                        )
                    }
                };
            }
        } else {
            // Generate random input.
            let opt = self.generate.to_generate_options();
            assert!(opt.length > 0, "-n/--length must be specified when generating sequences. Use -i <file> or --seqs to align given sequences.");
            let seed = self.generate.seed.unwrap_or_else(|| {
                let seed = ChaCha8Rng::from_entropy().gen_range(0..1_000);
                eprintln!("Seed: {seed}");
                seed
            });
            let rng = &mut ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..self.generate.cnt.unwrap_or(1) {
                let seqs = crate::generate::generate_triple(&opt, rng)
                    .map(|s| s.iter().map(|s| s.to_char() as u8).collect_vec());
                run_triple([&seqs[0][..], &seqs[1][..], &seqs[2][..]])?;
            }
        }
        ControlFlow::Continue(())
    }
}
