//! Rendering of suite results

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::fmt::Write;

use crate::group::TestGroup;
use crate::report::{Outcome, SuiteResult};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Table,
    /// JSON document, for CI
    Json,
    /// Plain key/value lines
    Plain,
}

fn colored_outcome(outcome: Outcome) -> String {
    match outcome {
        Outcome::Passed => outcome.as_str().green().to_string(),
        Outcome::Failed => outcome.as_str().red().to_string(),
        Outcome::Skipped => outcome.as_str().yellow().to_string(),
    }
}

/// Render the suite result in the requested format
pub fn render(results: &SuiteResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => render_table(results),
        OutputFormat::Json => serde_json::to_string_pretty(results).unwrap_or_default(),
        OutputFormat::Plain => render_plain(results),
    }
}

fn render_table(results: &SuiteResult) -> String {
    let mut groups = Table::new();
    groups
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    groups.set_header(vec!["Group", "Priority", "Result", "Steps", "Time (ms)"]);
    for group in &results.groups {
        let passed = group.steps.iter().filter(|s| s.outcome == Outcome::Passed).count();
        groups.add_row(vec![
            group.name.clone(),
            group.priority.to_string(),
            colored_outcome(group.outcome),
            format!("{}/{}", passed, group.steps.len()),
            group.duration_ms.to_string(),
        ]);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{groups}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "PASSED: {}/{}   FAILED: {}   SKIPPED: {}",
        results.passed, results.total, results.failed, results.skipped
    );

    if results.all_passed() {
        let _ = writeln!(out, "{}", "All groups passed.".green());
    } else {
        let _ = writeln!(out);
        let _ = writeln!(out, "Groups that did not pass:");
        for group in results.not_passed() {
            let reason = group.error.as_deref().unwrap_or("unknown error");
            let _ = writeln!(out, "  {} {} - {}", colored_outcome(group.outcome), group.name, reason);
        }
    }

    if !results.created.is_empty() {
        let mut created = Table::new();
        created.load_preset(UTF8_FULL);
        created.set_header(vec!["Field", "Identifier"]);
        for (field, id) in &results.created {
            created.add_row(vec![field.clone(), id.clone()]);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Test data created:");
        let _ = writeln!(out, "{created}");
    }

    out
}

fn render_plain(results: &SuiteResult) -> String {
    let mut out = String::new();
    for group in &results.groups {
        let _ = writeln!(out, "{}: {}", group.name, group.outcome);
        for step in &group.steps {
            let _ = writeln!(
                out,
                "  [{}] {} {}: {}",
                step.at.format("%H:%M:%S"),
                step.outcome,
                step.step,
                step.detail
            );
        }
    }
    let _ = writeln!(out, "---");
    let _ = writeln!(out, "total: {}", results.total);
    let _ = writeln!(out, "passed: {}", results.passed);
    let _ = writeln!(out, "failed: {}", results.failed);
    let _ = writeln!(out, "skipped: {}", results.skipped);
    for (field, id) in &results.created {
        let _ = writeln!(out, "{}: {}", field, id);
    }
    out
}

/// Describe the run order and each group's shared-state fields
pub fn render_plan(groups: &[Box<dyn TestGroup>]) -> String {
    let join = |keys: &[crate::state::EntityKey]| {
        if keys.is_empty() {
            "-".to_string()
        } else {
            keys.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        }
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Group", "Priority", "Requires", "Reads", "Writes"]);
    for (i, group) in groups.iter().enumerate() {
        let access = group.access();
        table.add_row(vec![
            (i + 1).to_string(),
            group.name().to_string(),
            group.priority().to_string(),
            join(access.requires),
            join(access.reads),
            join(access.writes),
        ]);
    }
    table.to_string()
}
