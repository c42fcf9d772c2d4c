//! `jsonsieve`: validates a JSON document from a file or standard input.
//!
//! Exits 0 when the input is valid, 1 when it is not, and 2 on usage errors
//! or when the input cannot be read.

use std::{
    fs::File,
    io::{self, Read},
    process::ExitCode,
};

use anyhow::{Context, Result, bail};
use jsonsieve::{GrammarError, Position, SieveOptions, Summary, ValidationError, validate_reader};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: jsonsieve [--json] [--multiple] [--max-depth N] \
                     [--max-token-bytes N] [--read-size N] [PATH|-]";

#[derive(Debug, Default)]
struct Args {
    path: Option<String>,
    json: bool,
    help: bool,
    options: SieveOptions,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--json" => parsed.json = true,
            "--multiple" => parsed.options.allow_multiple_values = true,
            "--max-depth" => parsed.options.max_depth = Some(count(&arg, args.next())?),
            "--max-token-bytes" => parsed.options.max_buffer_len = Some(count(&arg, args.next())?),
            "--read-size" => parsed.options.read_size = count(&arg, args.next())?,
            flag if flag.starts_with("--") => bail!("unknown option `{flag}`"),
            _ => {
                if let Some(previous) = &parsed.path {
                    bail!("unexpected argument `{arg}` after `{previous}`");
                }
                parsed.path = Some(arg);
            }
        }
    }
    Ok(parsed)
}

fn count(flag: &str, value: Option<String>) -> Result<usize> {
    let value = value.with_context(|| format!("`{flag}` needs a value"))?;
    let n = value
        .parse::<usize>()
        .with_context(|| format!("`{flag}` expects a positive integer, got `{value}`"))?;
    if n == 0 {
        bail!("`{flag}` must be at least 1");
    }
    Ok(n)
}

#[derive(Serialize)]
struct Report<'a> {
    input: &'a str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
}

#[derive(Serialize)]
struct ErrorReport {
    stage: &'static str,
    message: String,
    position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    grammar: Option<GrammarError>,
}

impl ErrorReport {
    fn new(err: &ValidationError<io::Error>) -> Self {
        let (stage, grammar) = match err {
            ValidationError::Lexical(_) => ("lexical", None),
            ValidationError::Grammar(err) => ("grammar", Some(err.clone())),
        };
        Self {
            stage,
            message: err.to_string(),
            position: err.position(),
            grammar,
        }
    }
}

fn open(path: Option<&str>) -> Result<Box<dyn Read>> {
    match path {
        None | Some("-") => Ok(Box::new(io::stdin().lock())),
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open `{path}`"))?;
            Ok(Box::new(file))
        }
    }
}

/// Returns whether the input is valid.
fn run(args: &Args) -> Result<bool> {
    let name = match args.path.as_deref() {
        None | Some("-") => "<stdin>",
        Some(path) => path,
    };
    let reader = open(args.path.as_deref())?;
    tracing::debug!(input = name, options = ?args.options, "validating");

    let outcome = match validate_reader(reader, &args.options) {
        Err(err) if err.is_source_error() => {
            return Err(err).with_context(|| format!("failed to read `{name}`"));
        }
        outcome => outcome,
    };

    if args.json {
        let report = match &outcome {
            Ok(summary) => Report {
                input: name,
                valid: true,
                summary: Some(*summary),
                error: None,
            },
            Err(err) => Report {
                input: name,
                valid: false,
                summary: None,
                error: Some(ErrorReport::new(err)),
            },
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(outcome.is_ok());
    }

    match outcome {
        Ok(summary) => {
            println!(
                "valid: {} tokens, {} document(s), max depth {}",
                summary.tokens, summary.documents, summary.max_depth
            );
            Ok(true)
        }
        Err(err) => {
            eprintln!("invalid: {name}: {err}");
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("jsonsieve: {err:#}\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("jsonsieve: {err:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(ToString::to_string))
    }

    #[test]
    fn defaults() {
        let parsed = args(&[]).unwrap();
        assert_eq!(parsed.path, None);
        assert!(!parsed.json);
        assert_eq!(parsed.options, SieveOptions::default());
    }

    #[test]
    fn flags() {
        let parsed = args(&[
            "--json",
            "--multiple",
            "--max-depth",
            "4",
            "--max-token-bytes",
            "1024",
            "--read-size",
            "16",
            "doc.json",
        ])
        .unwrap();
        assert_eq!(parsed.path.as_deref(), Some("doc.json"));
        assert!(parsed.json);
        assert_eq!(
            parsed.options,
            SieveOptions {
                read_size: 16,
                max_buffer_len: Some(1024),
                max_depth: Some(4),
                allow_multiple_values: true,
            }
        );
    }

    #[test]
    fn usage_errors() {
        assert!(args(&["--max-depth"]).is_err());
        assert!(args(&["--max-depth", "zero"]).is_err());
        assert!(args(&["--read-size", "0"]).is_err());
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["a.json", "b.json"]).is_err());
    }

    #[test]
    fn report_shape() {
        let err = validate_reader(&b"[1,]"[..], &SieveOptions::default()).unwrap_err();
        let report = Report {
            input: "<stdin>",
            valid: false,
            summary: None,
            error: Some(ErrorReport::new(&err)),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["error"]["stage"], "grammar");
        assert_eq!(value["error"]["position"]["offset"], 3);
        assert_eq!(value["error"]["grammar"]["kind"], "UnexpectedToken");
        assert!(value.get("summary").is_none());
    }
}
