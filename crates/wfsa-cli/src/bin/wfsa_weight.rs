// wfsa-weight: Weigh strings from stdin against a described automaton.
//
// Reads strings from stdin (one per line) and prints the weight the
// automaton assigns to each, summed over all of its accepting paths:
//   string<TAB>weight
//
// Usage:
//   wfsa-weight [OPTIONS] AUTOMATON.json
//
// Options:
//   -s, --semiring NAME   boolean, real, tropical or log (default: $WFSA_SEMIRING, else tropical)
//   --tokens              Labels are whitespace-separated tokens, not characters
//   -h, --help            Print help

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use wfsa::automata::string_weight;
use wfsa_cli::{SemiringKind, SemiringTask};
use wfsa_core::{OrderedSemiring, Semifield};

struct WeighLines {
    path: PathBuf,
    tokens: bool,
}

impl SemiringTask for WeighLines {
    type Output = Result<(), String>;

    fn run<S>(self, semiring: S) -> Result<(), String>
    where
        S: Semifield + OrderedSemiring + Clone,
        S::Weight: DeserializeOwned + Display,
    {
        let description = wfsa_cli::load_description::<S::Weight>(&self.path)?;
        let automaton = description.build(semiring).map_err(|e| e.to_string())?;

        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut out = io::BufWriter::new(stdout.lock());

        for line in stdin.lock().lines() {
            let line = line.map_err(|e| format!("error reading stdin: {e}"))?;
            let labels = wfsa_cli::tokenize(&line, self.tokens);
            let weight = string_weight(&automaton, &labels);
            let _ = writeln!(out, "{}\t{}", line, weight);
        }
        Ok(())
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if wfsa_cli::wants_help(&args) {
        println!("wfsa-weight: Weigh strings from stdin against a described automaton.");
        println!();
        println!("Usage: wfsa-weight [OPTIONS] AUTOMATON.json");
        println!();
        println!("Reads strings from stdin (one per line). Prints:");
        println!("  string<TAB>weight");
        println!();
        println!("Options:");
        println!("  -s, --semiring NAME   boolean, real, tropical or log");
        println!("                        (default: ${}, else tropical)", wfsa_cli::SEMIRING_ENV);
        println!("  --tokens              Labels are whitespace-separated tokens");
        println!("  -h, --help            Print this help");
        return;
    }

    let (semiring, mut args) = wfsa_cli::parse_option(&args, "--semiring", Some("-s"))
        .unwrap_or_else(|e| wfsa_cli::fatal(&e));
    let tokens = wfsa_cli::take_flag(&mut args, "--tokens");
    let kind = SemiringKind::resolve(semiring.as_deref()).unwrap_or_else(|e| wfsa_cli::fatal(&e));

    let [path] = args.as_slice() else {
        wfsa_cli::fatal("expected exactly one automaton description (see --help)");
    };

    let task = WeighLines {
        path: PathBuf::from(path),
        tokens,
    };
    if let Err(e) = kind.dispatch(task) {
        wfsa_cli::fatal(&e);
    }
}
