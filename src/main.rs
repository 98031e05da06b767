use clap::Parser;
use itertools::Itertools;
use log::info;
use std::{ops::ControlFlow, process::ExitCode};
use triple_aligner::{alphabet::parse_triple, cli::Cli, prelude::*};

fn main() -> ExitCode {
    env_logger::init();
    let args = Cli::parse();

    let cm = match args.penalty_model() {
        Ok(cm) => cm,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    if !cm.is_complete() {
        info!(
            "penalty table has no value for {}",
            cm.missing_pairs()
                .iter()
                .map(|(x, y)| format!("{x}/{y}"))
                .join(", ")
        );
    }

    let mut avg_result = AlignStats::default();

    // Process the input. Stops at the first triple that cannot be aligned.
    let processed = args.input.process_input_triples(|seqs: [&[u8]; 3]| {
        let r = parse_triple(seqs).and_then(|seqs| {
            if args.steps {
                align_with(seqs, cm.clone(), args.limit, &mut |step: &StepTrace| {
                    println!("{step}")
                })
            } else {
                align(seqs, cm.clone(), args.limit)
            }
        });
        let (alignments, r) = match r {
            Ok(r) => r,
            Err(err) => {
                eprintln!("{err}");
                return ControlFlow::Break(());
            }
        };
        info!(
            "score {} with {} optimal alignments in {:.3}ms",
            r.score,
            r.alignments,
            1000. * r.timing.total
        );

        // Print the alignments and stats.
        if args.silent == 0 {
            println!("Optimal score: {}", r.score);
            for (i, alignment) in alignments.iter().enumerate() {
                println!("Alignment {}:\n{alignment}\n", i + 1);
            }
        }
        if args.silent <= 1 {
            print!("\r");
            if args.silent == 0 {
                r.print();
            }
        }
        avg_result += r;
        if args.silent <= 1 {
            avg_result.print_no_newline();
        }
        ControlFlow::Continue(())
    });
    let mut failed = processed.is_break();

    if avg_result.sample_size > 0 {
        print!("\r");
        avg_result.print();

        if let Some(output) = &args.output {
            let (header, vals) = avg_result.values();

            if let Err(err) = std::fs::write(
                output,
                format!(
                    "{}\n{}\n",
                    header.iter().map(|x| x.trim()).join("\t"),
                    vals.iter().map(|x| x.trim()).join("\t")
                ),
            ) {
                eprintln!("could not write {}: {err}", output.display());
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
