// wfsa-cli: shared utilities for CLI tools.

use std::fmt;
use std::path::Path;
use std::process;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use wfsa::description::AutomatonDescription;
use wfsa_core::{
    BooleanSemiring, LogSemiring, OrderedSemiring, RealSemiring, Semifield, TropicalSemiring,
};

/// Environment variable naming the semiring when `--semiring` is absent.
pub const SEMIRING_ENV: &str = "WFSA_SEMIRING";

/// The semirings a description can be loaded over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemiringKind {
    Boolean,
    Real,
    Tropical,
    Log,
}

impl FromStr for SemiringKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Ok(Self::Boolean),
            "real" | "probability" => Ok(Self::Real),
            "tropical" => Ok(Self::Tropical),
            "log" => Ok(Self::Log),
            _ => Err(format!(
                "unknown semiring '{s}' (expected boolean, real, tropical or log)"
            )),
        }
    }
}

impl fmt::Display for SemiringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::Real => "real",
            Self::Tropical => "tropical",
            Self::Log => "log",
        })
    }
}

/// Work that can run over any semiring a description can be loaded over.
pub trait SemiringTask {
    type Output;

    fn run<S>(self, semiring: S) -> Self::Output
    where
        S: Semifield + OrderedSemiring + Clone,
        S::Weight: DeserializeOwned + fmt::Display;
}

impl SemiringKind {
    /// Resolve the semiring: explicit flag, then `WFSA_SEMIRING`, then
    /// tropical.
    pub fn resolve(flag: Option<&str>) -> Result<Self, String> {
        match flag {
            Some(name) => name.parse(),
            None => match std::env::var(SEMIRING_ENV) {
                Ok(name) if !name.is_empty() => name
                    .parse()
                    .map_err(|e| format!("{SEMIRING_ENV}: {e}")),
                _ => Ok(Self::Tropical),
            },
        }
    }

    /// Run `task` with the concrete semiring this kind names.
    pub fn dispatch<T: SemiringTask>(self, task: T) -> T::Output {
        match self {
            Self::Boolean => task.run(BooleanSemiring),
            Self::Real => task.run(RealSemiring),
            Self::Tropical => task.run(TropicalSemiring),
            Self::Log => task.run(LogSemiring),
        }
    }
}

/// Read and parse a JSON automaton description.
pub fn load_description<W: DeserializeOwned>(
    path: &Path,
) -> Result<AutomatonDescription<W>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    parse_description(&text).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Parse a JSON automaton description from a string.
pub fn parse_description<W: DeserializeOwned>(text: &str) -> Result<AutomatonDescription<W>, String> {
    serde_json::from_str(text).map_err(|e| format!("invalid automaton description: {e}"))
}

/// Split an input line into labels: whitespace-separated tokens with
/// `tokens`, otherwise one label per character.
pub fn tokenize(line: &str, tokens: bool) -> Vec<String> {
    if tokens {
        line.split_whitespace().map(str::to_string).collect()
    } else {
        line.chars().map(String::from).collect()
    }
}

/// Join labels back into display form, the inverse of [`tokenize`].
pub fn detokenize(labels: &[String], tokens: bool) -> String {
    labels.join(if tokens { " " } else { "" })
}

/// Parse a `--name=VALUE`, `--name VALUE` or `-s VALUE` option from command
/// line args.
///
/// Returns `(value, remaining_args)`. The last occurrence wins.
pub fn parse_option(
    args: &[String],
    long: &str,
    short: Option<&str>,
) -> Result<(Option<String>, Vec<String>), String> {
    let long_eq = format!("{long}=");
    let mut value = None;
    let mut remaining = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if let Some(val) = arg.strip_prefix(&long_eq) {
            value = Some(val.to_string());
        } else if arg == long || short == Some(arg.as_str()) {
            match iter.next() {
                Some(val) => value = Some(val.clone()),
                None => return Err(format!("{arg} requires a value")),
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    Ok((value, remaining))
}

/// Remove a boolean flag from the args. Returns whether it was present.
pub fn take_flag(args: &mut Vec<String>, long: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != long);
    args.len() != before
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn semiring_names() {
        assert_eq!("tropical".parse::<SemiringKind>(), Ok(SemiringKind::Tropical));
        assert_eq!("Log".parse::<SemiringKind>(), Ok(SemiringKind::Log));
        assert_eq!("bool".parse::<SemiringKind>(), Ok(SemiringKind::Boolean));
        assert_eq!("probability".parse::<SemiringKind>(), Ok(SemiringKind::Real));
        assert!("arctic".parse::<SemiringKind>().is_err());
        assert_eq!(SemiringKind::Real.to_string(), "real");
    }

    #[test]
    fn explicit_flag_wins() {
        assert_eq!(SemiringKind::resolve(Some("real")), Ok(SemiringKind::Real));
        assert!(SemiringKind::resolve(Some("nope")).is_err());
    }

    #[test]
    fn option_forms() {
        let (v, rest) = parse_option(&args(&["--semiring=log", "a.json"]), "--semiring", None).unwrap();
        assert_eq!(v.as_deref(), Some("log"));
        assert_eq!(rest, args(&["a.json"]));

        let (v, rest) = parse_option(&args(&["-k", "3", "a.json"]), "--count", Some("-k")).unwrap();
        assert_eq!(v.as_deref(), Some("3"));
        assert_eq!(rest, args(&["a.json"]));

        let (v, rest) = parse_option(&args(&["a.json"]), "--count", Some("-k")).unwrap();
        assert_eq!(v, None);
        assert_eq!(rest, args(&["a.json"]));
    }

    #[test]
    fn option_without_value() {
        let err = parse_option(&args(&["a.json", "--count"]), "--count", Some("-k")).unwrap_err();
        assert_eq!(err, "--count requires a value");
    }

    #[test]
    fn flags_are_removed() {
        let mut a = args(&["--tokens", "a.json"]);
        assert!(take_flag(&mut a, "--tokens"));
        assert_eq!(a, args(&["a.json"]));
        assert!(!take_flag(&mut a, "--tokens"));
    }

    #[test]
    fn tokenization() {
        assert_eq!(tokenize("abc", false), args(&["a", "b", "c"]));
        assert_eq!(tokenize(" the  cat ", true), args(&["the", "cat"]));
        assert_eq!(detokenize(&args(&["the", "cat"]), true), "the cat");
        assert_eq!(detokenize(&args(&["a", "b"]), false), "ab");
    }

    #[test]
    fn description_errors_are_readable() {
        let err = parse_description::<f64>("{ \"states\": ").unwrap_err();
        assert!(err.starts_with("invalid automaton description"));
        let d = parse_description::<bool>(r#"{ "states": 1 }"#).unwrap();
        assert_eq!(d.states, 1);
    }

    struct SemiringName;

    impl SemiringTask for SemiringName {
        type Output = String;

        fn run<S>(self, semiring: S) -> String
        where
            S: Semifield + OrderedSemiring + Clone,
            S::Weight: DeserializeOwned + fmt::Display,
        {
            semiring.one().to_string()
        }
    }

    #[test]
    fn dispatch_picks_concrete_semiring() {
        assert_eq!(SemiringKind::Boolean.dispatch(SemiringName), "true");
        assert_eq!(SemiringKind::Real.dispatch(SemiringName), "1");
        assert_eq!(SemiringKind::Tropical.dispatch(SemiringName), "0");
    }
}
