// wfsa-best: Print the best strings of a described automaton.
//
// Determinizes the automaton and prints its k best distinct strings, best
// first, each with its weight summed over all of its paths:
//   weight<TAB>string
//
// Usage:
//   wfsa-best [OPTIONS] AUTOMATON.json
//
// Options:
//   -k, --count N         Number of strings to print (default: 1)
//   -s, --semiring NAME   boolean, real, tropical or log (default: $WFSA_SEMIRING, else tropical)
//   --tokens              Separate token labels with spaces in the output
//   --paths               Print the k best paths instead of distinct strings
//   -h, --help            Print help

use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use wfsa::automata::{best_strings, shortest_paths};
use wfsa_cli::{SemiringKind, SemiringTask};
use wfsa_core::{OrderedSemiring, Semifield};

struct PrintBest {
    path: PathBuf,
    count: usize,
    tokens: bool,
    paths: bool,
}

impl SemiringTask for PrintBest {
    type Output = Result<(), String>;

    fn run<S>(self, semiring: S) -> Result<(), String>
    where
        S: Semifield + OrderedSemiring + Clone,
        S::Weight: DeserializeOwned + Display,
    {
        let description = wfsa_cli::load_description::<S::Weight>(&self.path)?;
        let automaton = description.build(semiring).map_err(|e| e.to_string())?;

        let best: Vec<(S::Weight, Vec<String>)> = if self.paths {
            shortest_paths(&automaton, self.count)
                .into_iter()
                .map(|p| (p.weight, p.label))
                .collect()
        } else {
            best_strings(&automaton, self.count)
                .into_iter()
                .map(|p| (p.weight, p.label))
                .collect()
        };

        let stdout = io::stdout();
        let mut out = io::BufWriter::new(stdout.lock());
        for (weight, labels) in best {
            let _ = writeln!(out, "{}\t{}", weight, wfsa_cli::detokenize(&labels, self.tokens));
        }
        Ok(())
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if wfsa_cli::wants_help(&args) {
        println!("wfsa-best: Print the best strings of a described automaton.");
        println!();
        println!("Usage: wfsa-best [OPTIONS] AUTOMATON.json");
        println!();
        println!("Prints one line per string, best first:");
        println!("  weight<TAB>string");
        println!();
        println!("Options:");
        println!("  -k, --count N         Number of strings to print (default: 1)");
        println!("  -s, --semiring NAME   boolean, real, tropical or log");
        println!("                        (default: ${}, else tropical)", wfsa_cli::SEMIRING_ENV);
        println!("  --tokens              Separate token labels with spaces");
        println!("  --paths               Print the best paths instead of distinct strings");
        println!("  -h, --help            Print this help");
        return;
    }

    let (semiring, args) = wfsa_cli::parse_option(&args, "--semiring", Some("-s"))
        .unwrap_or_else(|e| wfsa_cli::fatal(&e));
    let (count, mut args) = wfsa_cli::parse_option(&args, "--count", Some("-k"))
        .unwrap_or_else(|e| wfsa_cli::fatal(&e));
    let tokens = wfsa_cli::take_flag(&mut args, "--tokens");
    let paths = wfsa_cli::take_flag(&mut args, "--paths");
    let kind = SemiringKind::resolve(semiring.as_deref()).unwrap_or_else(|e| wfsa_cli::fatal(&e));
    let count = match count {
        Some(n) => n
            .parse::<usize>()
            .unwrap_or_else(|_| wfsa_cli::fatal(&format!("invalid count '{n}'"))),
        None => 1,
    };

    let [path] = args.as_slice() else {
        wfsa_cli::fatal("expected exactly one automaton description (see --help)");
    };

    let task = PrintBest {
        path: PathBuf::from(path),
        count,
        tokens,
        paths,
    };
    if let Err(e) = kind.dispatch(task) {
        wfsa_cli::fatal(&e);
    }
}
