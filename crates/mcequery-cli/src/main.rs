//! mcequery - lint and analyze Marketing Cloud Engagement queries

use mcequery_cli::cli::{self, Mode};
use mcequery_cli::input::{self, SqlSource};
use mcequery_cli::metadata::{self, AccountMetadata};
use mcequery_cli::output::{
    format_completion_json, format_completion_table, format_lint_json, format_lint_results,
    format_schema_json, format_schema_table, FileLintResult, FileSchemaResult,
};

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use mcequery_core::{
    complete, infer_schema, lint_with_metadata, CompletionRequest, LintConfig, LintOptions,
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Args, OutputFormat};

/// Lint errors found or analysis failed.
const EXIT_FAILURE: u8 = 1;
/// Configuration error (unreadable input or metadata, bad arguments).
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args);

    match run(args) {
        Ok(true) => ExitCode::from(EXIT_FAILURE),
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mcequery: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the verbosity flags.
fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Runs the selected mode; `Ok(true)` means a failure worth exit code 1.
fn run(args: Args) -> Result<bool> {
    let sources = input::read_input(&args.files)?;
    let account = metadata::load_metadata(args.metadata.as_deref())?;
    debug!(
        inputs = sources.len(),
        tables = account.tables.len(),
        "loaded inputs"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start async runtime")?;

    let (output, failed) = match args.mode() {
        Mode::Lint => runtime.block_on(run_lint(&args, &sources, &account)),
        Mode::Infer => runtime.block_on(run_infer(&args, &sources, &account)),
        Mode::Complete(offset) => runtime.block_on(run_complete(&args, &sources, &account, offset)),
    };

    write_output(&args.output, &output)?;
    Ok(failed)
}

async fn run_lint(
    args: &Args,
    sources: &[SqlSource],
    account: &AccountMetadata,
) -> (String, bool) {
    let started_at = Instant::now();
    let options = LintOptions {
        config: LintConfig {
            enabled: true,
            disabled_rules: args.exclude_rules.clone(),
        },
        known_tables: account.tables.iter().map(|t| t.name.clone()).collect(),
        ..LintOptions::default()
    };

    let mut results = Vec::with_capacity(sources.len());
    for source in sources {
        let diagnostics = lint_with_metadata(&source.content, &options, &account.fetcher).await;
        results.push(FileLintResult::new(&source.name, &source.content, &diagnostics));
    }

    let failed = results.iter().any(FileLintResult::has_errors);
    let colored = args.output.is_none() && io::stdout().is_terminal();
    let output = match args.format {
        OutputFormat::Json => format_lint_json(&results, args.compact),
        OutputFormat::Table => format_lint_results(&results, colored, started_at.elapsed()),
    };
    (output, failed)
}

async fn run_infer(
    args: &Args,
    sources: &[SqlSource],
    account: &AccountMetadata,
) -> (String, bool) {
    let mut results = Vec::with_capacity(sources.len());
    for source in sources {
        let result = match infer_schema(&source.content, &account.fetcher).await {
            Ok(fields) => FileSchemaResult {
                file: source.name.clone(),
                fields: Some(fields),
                error: None,
            },
            Err(err) => {
                if !args.quiet {
                    eprintln!("mcequery: warning: {}: {err}", source.name);
                }
                FileSchemaResult {
                    file: source.name.clone(),
                    fields: None,
                    error: Some(err.to_string()),
                }
            }
        };
        results.push(result);
    }

    let failed = results.iter().any(|result| result.error.is_some());
    let output = match args.format {
        OutputFormat::Json => format_schema_json(&results, args.compact),
        OutputFormat::Table => format_schema_table(&results),
    };
    (output, failed)
}

async fn run_complete(
    args: &Args,
    sources: &[SqlSource],
    account: &AccountMetadata,
    offset: usize,
) -> (String, bool) {
    let mut output = String::new();
    for source in sources {
        if offset > source.content.len() && !args.quiet {
            eprintln!(
                "mcequery: warning: {}: offset {offset} is past the end of the input",
                source.name
            );
        }
        let mut request = CompletionRequest::new(source.content.clone(), offset)
            .explicit()
            .with_tables(account.tables.clone());
        request.has_tenant = account.has_shared_tables();

        let items = complete(&request, &account.fetcher).await;
        let rendered = match args.format {
            OutputFormat::Json => format_completion_json(&items, args.compact),
            OutputFormat::Table => format_completion_table(&source.name, &items),
        };
        output.push_str(&rendered);
        if !output.ends_with('\n') {
            output.push('\n');
        }
    }
    (output, false)
}

fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
