//! Terminal, Markdown and JSON reports.
//!
//! All three are built from a rendered [`ResultsPanel`], so list contents
//! are already plain text when they get here.

use crate::cli::OutputFormat;
use crate::models::VerdictCategory;
use crate::render::ResultsPanel;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Context about the run that produced a panel.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// URL of the roasted repository.
    pub repo_url: String,
    /// Analysis service that produced the verdict.
    pub service_url: String,
    pub analysis_date: DateTime<Utc>,
    pub duration_seconds: f64,
}

const ROAST_TITLE: &str = "🔥 The Roast";
const GOOD_TITLE: &str = "✅ Good Things";
const SUGGESTIONS_TITLE: &str = "🛠️ Suggestions";

/// Generate a report in the requested format.
pub fn generate_report(
    format: OutputFormat,
    panel: &ResultsPanel,
    metadata: &ReportMetadata,
) -> Result<String> {
    match format {
        OutputFormat::Terminal => Ok(generate_terminal_report(panel)),
        OutputFormat::Markdown => Ok(generate_markdown_report(panel, metadata)),
        OutputFormat::Json => generate_json_report(panel, metadata),
    }
}

/// Verdict banner followed by the three lists.
pub fn generate_terminal_report(panel: &ResultsPanel) -> String {
    let mut output = String::new();

    let category = panel.category.unwrap_or(VerdictCategory::Negative);
    let banner = format!("{}  {}  {}", category.emoji(), panel.headline, category.emoji());
    let rule = "═".repeat(banner.chars().count() + 4);

    output.push_str(&format!("\n╔{}╗\n", rule));
    output.push_str(&format!("║  {}  ║\n", banner));
    output.push_str(&format!("╚{}╝\n", rule));

    for (title, items) in sections(panel) {
        output.push_str(&format!("\n{}\n", title));
        if items.is_empty() {
            output.push_str("  (nothing here)\n");
        }
        for item in items {
            output.push_str(&format!("  • {}\n", item));
        }
    }

    output
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(panel: &ResultsPanel, metadata: &ReportMetadata) -> String {
    let mut output = String::new();

    output.push_str("# RepoRoast Report\n\n");

    // Metadata section
    output.push_str("## Metadata\n\n");
    output.push_str(&format!(
        "- **Repository:** {}\n",
        escape_markdown(&metadata.repo_url)
    ));
    output.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("- **Service:** `{}`\n", metadata.service_url));
    output.push_str(&format!(
        "- **Duration:** {:.1}s\n\n",
        metadata.duration_seconds
    ));

    // Verdict
    let category = panel.category.unwrap_or(VerdictCategory::Negative);
    output.push_str("## Verdict\n\n");
    output.push_str(&format!(
        "> {} **{}** ({})\n\n",
        category.emoji(),
        escape_markdown(&panel.headline),
        category
    ));

    for (title, items) in sections(panel) {
        output.push_str(&format!("## {}\n\n", title));
        if items.is_empty() {
            output.push_str("_Nothing here._\n\n");
            continue;
        }
        for item in items {
            output.push_str(&format!("- {}\n", escape_markdown(item)));
        }
        output.push('\n');
    }

    output.push_str("---\n\n");
    output.push_str(&format!(
        "*Generated by roastctl v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    output
}

/// Generate a JSON report.
pub fn generate_json_report(panel: &ResultsPanel, metadata: &ReportMetadata) -> Result<String> {
    #[derive(Serialize)]
    struct JsonReport<'a> {
        metadata: &'a ReportMetadata,
        results: &'a ResultsPanel,
    }

    serde_json::to_string_pretty(&JsonReport {
        metadata,
        results: panel,
    })
    .context("Failed to serialize report to JSON")
}

/// Write a report to disk.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

fn sections(panel: &ResultsPanel) -> [(&'static str, &[String]); 3] {
    [
        (ROAST_TITLE, panel.roast.as_slice()),
        (GOOD_TITLE, panel.good_things.as_slice()),
        (SUGGESTIONS_TITLE, panel.suggestions.as_slice()),
    ]
}

/// Backslash-escape Markdown metacharacters so items read as plain text.
fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '`' | '*' | '_' | '[' | ']' | '(' | ')' | '#' | '!' | '|' | '<' | '>' | '~'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisResult;

    fn panel() -> ResultsPanel {
        let mut panel = ResultsPanel::new();
        panel.render(&AnalysisResult {
            verdict: "Almost There".to_string(),
            roast: vec!["Your README is a *cry* for help".to_string()],
            good_things: vec![],
            suggestions: vec!["Add tests".to_string(), "Add <more> tests".to_string()],
            verdict_category: None,
        });
        panel
    }

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            repo_url: "https://github.com/owner/repo".to_string(),
            service_url: "http://localhost:5000".to_string(),
            analysis_date: Utc::now(),
            duration_seconds: 4.2,
        }
    }

    #[test]
    fn test_terminal_report() {
        let output = generate_terminal_report(&panel());
        assert!(output.contains("🟡  ALMOST THERE  🟡"));
        assert!(output.contains("  • Add tests\n  • Add <more> tests\n"));
        assert!(output.contains("✅ Good Things\n  (nothing here)"));
    }

    #[test]
    fn test_markdown_report_escapes_items() {
        let output = generate_markdown_report(&panel(), &metadata());
        assert!(output.starts_with("# RepoRoast Report"));
        assert!(output.contains("**ALMOST THERE** (Cautionary)"));
        assert!(output.contains("- Your README is a \\*cry\\* for help\n"));
        assert!(output.contains("- Add \\<more\\> tests\n"));
        assert!(output.contains("- **Duration:** 4.2s"));
    }

    #[test]
    fn test_json_report() {
        let output = generate_json_report(&panel(), &metadata()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["results"]["headline"], "ALMOST THERE");
        assert_eq!(value["results"]["category"], "cautionary");
        assert_eq!(value["results"]["suggestions"][1], "Add <more> tests");
        assert_eq!(value["metadata"]["repo_url"], "https://github.com/owner/repo");
        assert!(value["results"].get("visible").is_none());
    }

    #[test]
    fn test_generate_report_dispatch() {
        let md = generate_report(OutputFormat::Markdown, &panel(), &metadata()).unwrap();
        assert!(md.contains("## Verdict"));
        let term = generate_report(OutputFormat::Terminal, &panel(), &metadata()).unwrap();
        assert!(term.contains("╔"));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roast.md");
        write_report(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_write_report_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("roast.md");
        let err = write_report(&path, "hello").unwrap_err();
        assert!(err.to_string().contains("Failed to write report"));
    }
}
