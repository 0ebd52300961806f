//! TOML format types for rule set files.
//!
//! These types map directly to the rules TOML format and are deserialized
//! via `serde` + the `toml` crate. Validation lives in the parent module.

use serde::{Deserialize, Serialize};

/// Top-level structure of a rules file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleSet {
    /// Phrases that must not appear anywhere in a plan.
    #[serde(default)]
    pub banned_phrases: Vec<String>,
    /// Required sections, in the order they are reported when missing.
    #[serde(default)]
    pub sections: Vec<SectionRule>,
    /// Sections that must contain a fenced code block.
    #[serde(default)]
    pub code_blocks: Vec<CodeBlockRule>,
    /// Executable-evidence rule. Absent means disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<EvidenceRule>,
    /// Rollback-hint rule. Absent means disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback: Option<RollbackRule>,
    /// Files-in-scope table settings.
    #[serde(default)]
    pub scope: ScopeRule,
}

/// A `[[sections]]` entry: a required heading with a stable id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionRule {
    /// Stable identifier used by other rules (e.g. `verification`).
    pub id: String,
    /// Heading as written in the plan, e.g. `## 5. 验证策略`.
    pub heading: String,
}

/// A `[[code_blocks]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeBlockRule {
    pub section: String,
    /// Prefix of the violation message.
    pub label: String,
}

/// The `[evidence]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceRule {
    pub section: String,
    pub label: String,
    /// Command tokens accepted as evidence, matched case-insensitively.
    #[serde(default)]
    pub commands: Vec<String>,
}

/// The `[rollback]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RollbackRule {
    pub section: String,
    pub label: String,
    /// Any one of these, matched literally, satisfies the rule.
    pub keywords: Vec<String>,
}

/// The `[scope]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScopeRule {
    #[serde(default = "default_scope_section")]
    pub section: String,
    /// Rows whose operation contains this marker (case-insensitive) declare
    /// files that do not exist yet.
    #[serde(default = "default_create_marker")]
    pub create_marker: String,
    /// Report malformed table rows instead of skipping them.
    #[serde(default)]
    pub strict: bool,
}

impl Default for ScopeRule {
    fn default() -> Self {
        Self {
            section: default_scope_section(),
            create_marker: default_create_marker(),
            strict: false,
        }
    }
}

fn default_scope_section() -> String {
    "scope".to_string()
}

fn default_create_marker() -> String {
    "create".to_string()
}
