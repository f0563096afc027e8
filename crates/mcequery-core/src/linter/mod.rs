//! Lint Rule Engine.
//!
//! Lexical rules scan the token stream and run on any input. Semantic rules
//! read the parsed query model and are skipped when the statement does not
//! parse. Every enabled rule runs; results are merged, sorted and
//! de-duplicated so identical input always yields identical output.

pub mod config;
pub mod rule;
pub mod rules;

use tracing::debug;

use config::{LintConfig, LintOptions};
use rule::{LintContext, LintEngine, LintRule};

use crate::metadata::{fields_for_tables, MetadataFetcher};
use crate::scope::resolve_scope;
use crate::types::Diagnostic;

/// The SQL linter, holding a set of rules and configuration.
pub struct Linter {
    rules: Vec<Box<dyn LintRule>>,
    config: LintConfig,
}

impl Linter {
    pub fn new(config: LintConfig) -> Self {
        Self {
            rules: rules::all_rules(),
            config,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Rules that will run under the current configuration.
    pub fn active_rules(&self) -> impl Iterator<Item = &dyn LintRule> {
        self.rules
            .iter()
            .map(Box::as_ref)
            .filter(|rule| self.config.is_rule_enabled(rule.code()))
    }

    pub fn check(&self, ctx: &LintContext) -> Vec<Diagnostic> {
        if !self.config.enabled {
            return Vec::new();
        }

        let mut diagnostics = Vec::new();
        let mut ran = 0usize;
        for rule in self.active_rules() {
            if rule.engine() == LintEngine::Semantic && ctx.model.is_none() {
                continue;
            }
            ran += 1;
            diagnostics.extend(rule.check(ctx));
        }
        debug!(
            rules = ran,
            diagnostics = diagnostics.len(),
            parsed = ctx.model.is_some(),
            "lint pass finished"
        );

        normalize_diagnostics(diagnostics, ctx.sql.len())
    }
}

/// Lints `sql` with every rule enabled in `options.config`.
pub fn lint(sql: &str, options: &LintOptions) -> Vec<Diagnostic> {
    let linter = Linter::new(options.config.clone());
    let ctx = LintContext::new(sql, options);
    linter.check(&ctx)
}

/// Like [`lint`], but first looks up the fields of every table the statement
/// references and `options` does not already describe.
pub async fn lint_with_metadata(
    sql: &str,
    options: &LintOptions,
    fetcher: &dyn MetadataFetcher,
) -> Vec<Diagnostic> {
    let scope = resolve_scope(sql);
    let mut missing: Vec<String> = Vec::new();
    for table in scope.tables.iter().filter(|table| !table.is_subquery) {
        let known = options
            .table_fields
            .keys()
            .any(|name| name.eq_ignore_ascii_case(&table.name));
        let queued = missing
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&table.name));
        if !known && !queued {
            missing.push(table.name.clone());
        }
    }

    if missing.is_empty() {
        return lint(sql, options);
    }

    let fetched = fields_for_tables(fetcher, &missing).await;
    let mut enriched = options.clone();
    for (name, fields) in missing.into_iter().zip(fetched) {
        if let Some(fields) = fields {
            enriched
                .table_fields
                .insert(name, fields.into_iter().map(|field| field.name).collect());
        }
    }
    lint(sql, &enriched)
}

/// True when any diagnostic blocks execution.
pub fn has_blocking_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_blocking)
}

fn normalize_diagnostics(mut diagnostics: Vec<Diagnostic>, sql_len: usize) -> Vec<Diagnostic> {
    for diagnostic in &mut diagnostics {
        let span = diagnostic.span().clamp_to(sql_len);
        diagnostic.start_index = span.start;
        diagnostic.end_index = span.end;
    }
    diagnostics.sort_by(|left, right| sort_key(left).cmp(&sort_key(right)));
    diagnostics.dedup();
    diagnostics
}

fn sort_key(diagnostic: &Diagnostic) -> (usize, usize, u8, &str, &str) {
    (
        diagnostic.start_index,
        diagnostic.end_index,
        diagnostic.severity.rank(),
        diagnostic.code.as_str(),
        diagnostic.message.as_str(),
    )
}
