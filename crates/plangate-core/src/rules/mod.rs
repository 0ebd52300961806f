//! Rule set parsing and validation.
//!
//! Parses a rules TOML string into a [`RuleSet`] and validates:
//! - Section ids are unique.
//! - Every section has a non-empty heading title.
//! - Code-block, evidence, rollback and scope rules reference known
//!   section ids.
//! - Rollback keywords are non-empty.
//!
//! The default rule set is embedded in the binary at compile time.

pub mod format;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::outline::HeadingQuery;

pub use format::{CodeBlockRule, EvidenceRule, RollbackRule, RuleSet, ScopeRule, SectionRule};

/// Errors that can occur while loading a rule set.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("failed to read rules file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("duplicate section id: {0:?}")]
    DuplicateSection(String),

    #[error("section {0:?} has an empty heading")]
    EmptyHeading(String),

    #[error("{0} rule has an empty keyword")]
    EmptyKeyword(&'static str),

    #[error("{rule} rule references unknown section {section:?}")]
    UnknownSection { rule: &'static str, section: String },
}

/// The embedded default rules TOML.
static DEFAULT_RULES_TOML: &str = include_str!("default_rules.toml");

/// Load the embedded default rule set.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed.
pub fn default_rules() -> RuleSet {
    parse_rules_toml(DEFAULT_RULES_TOML).expect("embedded default_rules.toml is invalid")
}

/// Parse and validate a rules TOML string.
pub fn parse_rules_toml(content: &str) -> Result<RuleSet, RulesError> {
    let rules: RuleSet = toml::from_str(content)?;
    validate(&rules)?;
    Ok(rules)
}

/// Read, parse and validate a rules file.
pub fn load_rules(path: &Path) -> Result<RuleSet, RulesError> {
    let content = std::fs::read_to_string(path).map_err(|source| RulesError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = parse_rules_toml(&content)?;
    tracing::debug!(path = %path.display(), sections = rules.sections.len(), "loaded rule set");
    Ok(rules)
}

impl Default for RuleSet {
    fn default() -> Self {
        default_rules()
    }
}

impl RuleSet {
    /// Heading text for a section id.
    pub fn heading_for(&self, id: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.heading.as_str())
    }
}

fn validate(rules: &RuleSet) -> Result<(), RulesError> {
    let mut ids = HashSet::new();
    for section in &rules.sections {
        if !ids.insert(section.id.as_str()) {
            return Err(RulesError::DuplicateSection(section.id.clone()));
        }
        if HeadingQuery::parse(&section.heading).title().is_empty() {
            return Err(RulesError::EmptyHeading(section.id.clone()));
        }
    }

    let known = |rule: &'static str, section: &str| {
        if ids.contains(section) {
            Ok(())
        } else {
            Err(RulesError::UnknownSection {
                rule,
                section: section.to_string(),
            })
        }
    };

    for block in &rules.code_blocks {
        known("code block", &block.section)?;
    }
    if let Some(evidence) = &rules.evidence {
        known("evidence", &evidence.section)?;
    }
    if let Some(rollback) = &rules.rollback {
        known("rollback", &rollback.section)?;
        // An empty keyword is contained in every section.
        if rollback.keywords.iter().any(|k| k.is_empty()) {
            return Err(RulesError::EmptyKeyword("rollback"));
        }
    }
    known("scope", &rules.scope.section)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_are_valid() {
        let rules = default_rules();
        assert_eq!(rules.sections.len(), 7);
        assert_eq!(rules.banned_phrases, vec!["实现逻辑", "处理边界情况", "TBD", "TODO"]);
        assert_eq!(rules.code_blocks.len(), 2);
        assert_eq!(rules.code_blocks[0].section, "implementation");
        assert_eq!(rules.code_blocks[1].section, "data_structures");
        assert_eq!(rules.heading_for("scope"), Some("## 2. 涉及文件清单"));
        assert!(!rules.scope.strict);
    }

    #[test]
    fn default_rules_distinguish_both_step_five_sections() {
        let rules = default_rules();
        assert_eq!(rules.heading_for("verification"), Some("## 5. 验证策略"));
        assert_eq!(rules.heading_for("risk"), Some("## 5. 风险评估与回滚"));
    }

    #[test]
    fn default_rules_roundtrip_through_toml() {
        let rules = default_rules();
        let serialized = toml::to_string_pretty(&rules).expect("should serialize");
        let reparsed = parse_rules_toml(&serialized).expect("should reparse");
        assert_eq!(rules, reparsed);
    }

    #[test]
    fn rejects_duplicate_section_ids() {
        let toml_str = r###"
[[sections]]
id = "scope"
heading = "## A"

[[sections]]
id = "scope"
heading = "## B"
"###;
        let err = parse_rules_toml(toml_str).unwrap_err();
        assert!(
            matches!(err, RulesError::DuplicateSection(ref id) if id == "scope"),
            "expected DuplicateSection, got: {err}"
        );
    }

    #[test]
    fn rejects_empty_heading() {
        let toml_str = r###"
[[sections]]
id = "scope"
heading = "##  "
"###;
        let err = parse_rules_toml(toml_str).unwrap_err();
        assert!(
            matches!(err, RulesError::EmptyHeading(_)),
            "expected EmptyHeading, got: {err}"
        );
    }

    #[test]
    fn rejects_unknown_code_block_section() {
        let toml_str = r###"
[[sections]]
id = "scope"
heading = "## Files"

[[code_blocks]]
section = "impl"
label = "Implementation"
"###;
        let err = parse_rules_toml(toml_str).unwrap_err();
        assert!(
            matches!(err, RulesError::UnknownSection { rule: "code block", .. }),
            "expected UnknownSection, got: {err}"
        );
    }

    #[test]
    fn rejects_scope_without_matching_section() {
        let toml_str = r###"
[[sections]]
id = "summary"
heading = "## Summary"
"###;
        let err = parse_rules_toml(toml_str).unwrap_err();
        assert!(
            matches!(err, RulesError::UnknownSection { rule: "scope", .. }),
            "expected UnknownSection, got: {err}"
        );
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = parse_rules_toml("this is not valid toml {{{").unwrap_err();
        assert!(
            matches!(err, RulesError::TomlError(_)),
            "expected TomlError, got: {err}"
        );
    }

    #[test]
    fn load_rules_reports_missing_file() {
        let err = load_rules(Path::new("/nonexistent/rules.toml")).unwrap_err();
        assert!(
            matches!(err, RulesError::Read { .. }),
            "expected Read, got: {err}"
        );
    }

    #[test]
    fn empty_rollback_keyword_is_rejected() {
        let mut rules = default_rules();
        if let Some(rollback) = rules.rollback.as_mut() {
            rollback.keywords.push(String::new());
        }
        let toml_str = toml::to_string_pretty(&rules).unwrap();
        let err = parse_rules_toml(&toml_str).unwrap_err();
        assert!(
            matches!(err, RulesError::EmptyKeyword("rollback")),
            "expected EmptyKeyword, got: {err}"
        );
    }

    #[test]
    fn load_rules_reads_custom_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(
            &path,
            r###"
banned_phrases = ["FIXME"]

[[sections]]
id = "scope"
heading = "## Files"
"###,
        )
        .unwrap();

        let rules = load_rules(&path).expect("should load");
        assert_eq!(rules.banned_phrases, vec!["FIXME"]);
        assert!(rules.evidence.is_none());
    }
}
