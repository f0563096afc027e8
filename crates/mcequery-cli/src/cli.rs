//! CLI argument parsing using clap.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// mcequery - lint and analyze Marketing Cloud Engagement queries
#[derive(Parser, Debug)]
#[command(name = "mcequery")]
#[command(about = "Lint Marketing Cloud Engagement SQL, infer its output schema and preview completions", long_about = None)]
#[command(version)]
pub struct Args {
    /// SQL files to analyze (reads from stdin if none provided)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// JSON file describing the account's tables and fields
    #[arg(short, long, value_name = "FILE")]
    pub metadata: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Print the inferred output schema instead of lint results
    #[arg(long, conflicts_with = "complete")]
    pub infer: bool,

    /// Print completion items at this byte offset instead of lint results
    #[arg(long, value_name = "OFFSET")]
    pub complete: Option<usize>,

    /// Comma-separated list of lint rule codes to exclude (e.g., LINT_ST_003,LINT_RF_001)
    #[arg(long, value_delimiter = ',')]
    pub exclude_rules: Vec<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress warnings on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn mode(&self) -> Mode {
        match (self.infer, self.complete) {
            (true, _) => Mode::Infer,
            (false, Some(offset)) => Mode::Complete(offset),
            (false, None) => Mode::Lint,
        }
    }

    /// Default `tracing` filter directive for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// What the invocation does with each input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Lint,
    Infer,
    Complete(usize),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::parse_from(["mcequery", "query.sql"]);
        assert_eq!(args.files.len(), 1);
        assert_eq!(args.format, OutputFormat::Table);
        assert_eq!(args.mode(), Mode::Lint);
        assert_eq!(args.log_directive(), "warn");
    }

    #[test]
    fn test_parse_full_args() {
        let args = Args::parse_from([
            "mcequery",
            "-m",
            "tables.json",
            "-f",
            "json",
            "-o",
            "out.json",
            "--quiet",
            "--compact",
            "-vv",
            "a.sql",
            "b.sql",
        ]);
        assert_eq!(args.metadata.unwrap().to_str().unwrap(), "tables.json");
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.output.unwrap().to_str().unwrap(), "out.json");
        assert!(args.quiet);
        assert!(args.compact);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn test_modes() {
        let args = Args::parse_from(["mcequery", "--infer", "q.sql"]);
        assert_eq!(args.mode(), Mode::Infer);

        let args = Args::parse_from(["mcequery", "--complete", "14", "q.sql"]);
        assert_eq!(args.mode(), Mode::Complete(14));
    }

    #[test]
    fn test_infer_conflicts_with_complete() {
        let result = Args::try_parse_from(["mcequery", "--infer", "--complete", "3", "q.sql"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_exclude_rules() {
        let args = Args::parse_from([
            "mcequery",
            "--exclude-rules",
            "LINT_ST_003,LINT_RF_001",
            "--exclude-rules",
            "LINT_CL_001",
            "q.sql",
        ]);
        assert_eq!(
            args.exclude_rules,
            vec!["LINT_ST_003", "LINT_RF_001", "LINT_CL_001"]
        );
    }
}
