//! Scope gate: every file a plan claims to touch must exist.
//!
//! Rows of the files-in-scope table are checked against the filesystem,
//! relative to a root directory. Rows that create a file, placeholder rows
//! and rows without a path claim are skipped, as is anything inside a fenced
//! code block. Without the scope section nothing can be checked, so its
//! absence is the only early exit.

pub mod table;

use std::path::{Path, PathBuf};

use crate::document::PlanDocument;
use crate::outline::Outline;
use crate::report::{Report, RuleKind, Violation};
use crate::rules::RuleSet;

pub use table::{RowError, ScopeRow, parse_table_rows};

/// Checks the files-in-scope table of a plan against a directory tree.
#[derive(Debug, Clone)]
pub struct ScopeValidator<'r> {
    rules: &'r RuleSet,
    root: PathBuf,
    strict: bool,
}

impl<'r> ScopeValidator<'r> {
    /// Paths are resolved against `root`; strictness defaults to the rule
    /// set's `scope.strict`.
    pub fn new(rules: &'r RuleSet, root: impl Into<PathBuf>) -> Self {
        Self {
            rules,
            root: root.into(),
            strict: rules.scope.strict,
        }
    }

    /// Report malformed rows as violations instead of skipping them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn validate_document(&self, document: &PlanDocument) -> Report {
        self.validate(document.text())
    }

    pub fn validate(&self, text: &str) -> Report {
        let outline = Outline::parse(text);
        let section = self
            .rules
            .heading_for(&self.rules.scope.section)
            .and_then(|heading| outline.section(heading));

        let Some(section) = section else {
            return [Violation::new(
                RuleKind::ScopeSectionMissing,
                "scope section not found",
            )]
            .into_iter()
            .collect();
        };

        let (rows, errors) = parse_table_rows(section.numbered_lines());

        // (line, violation) so strict-mode row errors interleave by position.
        let mut found: Vec<(usize, Violation)> = Vec::new();

        if self.strict {
            found.extend(errors.iter().map(|e| {
                (
                    e.line(),
                    Violation::new(RuleKind::MalformedScopeRow, e.to_string()),
                )
            }));
        } else if !errors.is_empty() {
            tracing::debug!(skipped = errors.len(), "skipped unreadable scope rows");
        }

        for row in &rows {
            if row.is_placeholder() || row.declares_creation(&self.rules.scope.create_marker) {
                continue;
            }
            let target = self.root.join(&row.path);
            let exists = target.exists();
            tracing::debug!(path = %target.display(), exists, op = %row.operation, "checked scope path");
            if !exists {
                found.push((
                    row.line,
                    Violation::new(
                        RuleKind::MissingPath,
                        format!("missing: {} (op: {})", row.path, row.operation),
                    ),
                ));
            }
        }

        found.sort_by_key(|(line, _)| *line);
        found.into_iter().map(|(_, v)| v).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::default_rules;
    use plangate_test_utils::{PlanFixture, TempWorkspace};

    fn validate_in(ws: &TempWorkspace, text: &str) -> Report {
        let rules = default_rules();
        ScopeValidator::new(&rules, ws.path()).validate(text)
    }

    fn messages(report: &Report) -> Vec<&str> {
        report.violations().iter().map(|v| v.message.as_str()).collect()
    }

    #[test]
    fn existing_modify_path_passes() {
        let ws = TempWorkspace::new();
        ws.touch("src/app.py");
        let text = PlanFixture::complete()
            .scope_rows(&[("Modify", "`src/app.py`", "fix bug")])
            .render();
        assert!(validate_in(&ws, &text).passed());
    }

    #[test]
    fn missing_modify_path_fails() {
        let ws = TempWorkspace::new();
        let text = PlanFixture::complete()
            .scope_rows(&[("Modify", "`src/app.py`", "fix bug")])
            .render();
        let report = validate_in(&ws, &text);
        assert_eq!(messages(&report), vec!["missing: src/app.py (op: Modify)"]);
        assert_eq!(report.violations()[0].rule, RuleKind::MissingPath);
    }

    #[test]
    fn create_rows_are_never_checked() {
        let ws = TempWorkspace::new();
        let text = PlanFixture::complete()
            .scope_rows(&[
                ("Create", "`src/new.rs`", "new"),
                ("create", "`src/other.rs`", "new"),
                ("Create/Modify", "`src/both.rs`", "either"),
            ])
            .render();
        assert!(validate_in(&ws, &text).passed());
    }

    #[test]
    fn placeholder_rows_are_never_checked() {
        let ws = TempWorkspace::new();
        let text = PlanFixture::complete()
            .scope_rows(&[
                ("Modify", "`<file>`", "placeholder"),
                ("Delete", "`[path]`", "placeholder"),
                ("Modify", "` `", "blank"),
            ])
            .render();
        assert!(validate_in(&ws, &text).passed());
    }

    #[test]
    fn every_missing_path_is_collected() {
        let ws = TempWorkspace::new();
        ws.touch("present.rs");
        let text = PlanFixture::complete()
            .scope_rows(&[
                ("Modify", "`a.rs`", ""),
                ("Modify", "`present.rs`", ""),
                ("Delete", "`b.rs`", ""),
            ])
            .render();
        let report = validate_in(&ws, &text);
        assert_eq!(
            messages(&report),
            vec!["missing: a.rs (op: Modify)", "missing: b.rs (op: Delete)"]
        );
    }

    #[test]
    fn directories_count_as_existing() {
        let ws = TempWorkspace::new();
        ws.touch("src/lib.rs");
        let text = PlanFixture::complete()
            .scope_rows(&[("Modify", "`src`", "whole module")])
            .render();
        assert!(validate_in(&ws, &text).passed());
    }

    #[test]
    fn missing_section_short_circuits() {
        let ws = TempWorkspace::new();
        let text = PlanFixture::complete().without_section("## 2.").render();
        let report = validate_in(&ws, &text);
        assert_eq!(messages(&report), vec!["scope section not found"]);
        assert_eq!(report.violations()[0].rule, RuleKind::ScopeSectionMissing);
    }

    #[test]
    fn tables_in_other_sections_are_ignored() {
        let ws = TempWorkspace::new();
        let text = PlanFixture::complete()
            .append("## 1.", "| Modify | `ghost.rs` | elsewhere |\n")
            .render();
        assert!(validate_in(&ws, &text).passed());
    }

    #[test]
    fn malformed_rows_are_skipped_by_default() {
        let ws = TempWorkspace::new();
        let text = PlanFixture::complete()
            .append("## 2.", "| lonely |\n| Modify | no-quotes.rs | x |\n")
            .render();
        assert!(validate_in(&ws, &text).passed());
    }

    #[test]
    fn strict_mode_reports_malformed_rows_in_line_order() {
        let ws = TempWorkspace::new();
        let text = PlanFixture::complete()
            .scope_rows(&[("Modify", "`gone.rs`", "")])
            .append("## 2.", "| lonely |\n")
            .render();
        let rules = default_rules();
        let report = ScopeValidator::new(&rules, ws.path())
            .strict(true)
            .validate(&text);

        let kinds: Vec<RuleKind> = report.violations().iter().map(|v| v.rule).collect();
        assert_eq!(kinds, vec![RuleKind::MissingPath, RuleKind::MalformedScopeRow]);
        assert!(report.violations()[1]
            .message
            .ends_with("malformed scope row (expected at least 2 columns)"));
    }

    #[test]
    fn strict_mode_accepts_header_rows() {
        let ws = TempWorkspace::new();
        let rules = default_rules();
        let text = PlanFixture::complete().render();
        let report = ScopeValidator::new(&rules, ws.path())
            .strict(true)
            .validate(&text);
        assert!(report.passed(), "unexpected: {:?}", messages(&report));
    }

    #[test]
    fn strictness_follows_rule_set_by_default() {
        let mut rules = default_rules();
        rules.scope.strict = true;
        let ws = TempWorkspace::new();
        let validator = ScopeValidator::new(&rules, ws.path());
        let text = PlanFixture::complete()
            .append("## 2.", "| lonely |\n")
            .render();
        assert_eq!(validator.validate(&text).len(), 1);
        assert_eq!(validator.root(), ws.path());
    }

    #[test]
    fn strict_mode_ignores_fenced_shell_snippets() {
        let ws = TempWorkspace::new();
        let rules = default_rules();
        let text = PlanFixture::complete()
            .append("## 2.", "```bash\nls src | wc -l\n```\n")
            .render();
        let report = ScopeValidator::new(&rules, ws.path())
            .strict(true)
            .validate(&text);
        assert!(report.passed(), "unexpected: {:?}", messages(&report));
    }

    #[test]
    fn fenced_example_tables_are_not_scope_rows() {
        let ws = TempWorkspace::new();
        let text = PlanFixture::complete()
            .append("## 2.", "```markdown\n| Modify | `example/only.rs` | sample |\n```\n")
            .render();
        assert!(validate_in(&ws, &text).passed());
    }
}
