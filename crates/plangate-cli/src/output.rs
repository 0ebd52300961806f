//! Rendering of validation results to stdout.
//!
//! Text mode prints `OK`, or `FAIL` followed by one `- <message>` line per
//! violation. JSON mode prints `{"passed", "violations"}`. The return value
//! of [`emit`] drives the process exit code.

use anyhow::{Context, Result};
use serde_json::json;

use plangate_core::Report;

pub fn render_text(report: &Report) -> String {
    if report.passed() {
        return "OK".to_string();
    }
    let mut out = String::from("FAIL");
    for violation in report.violations() {
        out.push_str("\n- ");
        out.push_str(&violation.message);
    }
    out
}

pub fn render_json(report: &Report) -> Result<String> {
    let value = json!({
        "passed": report.passed(),
        "violations": report.violations(),
    });
    serde_json::to_string_pretty(&value).context("failed to serialize report")
}

/// Print `report` and return whether it passed.
pub fn emit(report: &Report, as_json: bool) -> Result<bool> {
    let rendered = if as_json {
        render_json(report)?
    } else {
        render_text(report)
    };
    println!("{rendered}");
    Ok(report.passed())
}

/// Print a failure that stopped validation before any rule ran.
///
/// Always returns `false`.
pub fn emit_aborted(error: &dyn std::fmt::Display, as_json: bool) -> Result<bool> {
    if as_json {
        let value = json!({
            "passed": false,
            "error": error.to_string(),
            "violations": [],
        });
        let rendered =
            serde_json::to_string_pretty(&value).context("failed to serialize report")?;
        println!("{rendered}");
    } else {
        println!("FAIL: {error}");
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plangate_core::{RuleKind, Violation};

    #[test]
    fn passing_report_renders_ok() {
        assert_eq!(render_text(&Report::new()), "OK");
    }

    #[test]
    fn failing_report_lists_every_message() {
        let report: Report = [
            Violation::new(RuleKind::RequiredSection, "Missing section: ## 1. 核心变更摘要"),
            Violation::new(RuleKind::MissingPath, "missing: src/app.py (op: Modify)"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            render_text(&report),
            "FAIL\n- Missing section: ## 1. 核心变更摘要\n- missing: src/app.py (op: Modify)"
        );
    }

    #[test]
    fn json_carries_rule_names_and_messages() {
        let report: Report = [Violation::new(RuleKind::BannedPhrase, "Contains banned phrase: TBD")]
            .into_iter()
            .collect();

        let value: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(value["passed"], false);
        assert_eq!(value["violations"][0]["rule"], "banned_phrase");
        assert_eq!(value["violations"][0]["message"], "Contains banned phrase: TBD");
    }

    #[test]
    fn json_for_passing_report_has_empty_violations() {
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&Report::new()).unwrap()).unwrap();
        assert_eq!(value["passed"], true);
        assert_eq!(value["violations"].as_array().map(Vec::len), Some(0));
    }
}
