//! Validation reports.

use std::fmt;

use serde::Serialize;

/// Which rule produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    RequiredSection,
    BannedPhrase,
    CodeBlock,
    ExecutableEvidence,
    RollbackHint,
    ScopeSectionMissing,
    MalformedScopeRow,
    MissingPath,
    NoReferences,
    MissingReference,
}

/// A single detected rule failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: RuleKind,
    pub message: String,
}

impl Violation {
    pub fn new(rule: RuleKind, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Ordered violations from one validation run.
///
/// Violations keep the order in which rules were evaluated. A report passes
/// when it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    violations: Vec<Violation>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Append every violation from `other`, keeping its order.
    pub fn merge(&mut self, other: Report) {
        self.violations.extend(other.violations);
    }

    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Messages of all violations produced by `rule`.
    pub fn messages_for(&self, rule: RuleKind) -> Vec<&str> {
        self.violations
            .iter()
            .filter(|v| v.rule == rule)
            .map(|v| v.message.as_str())
            .collect()
    }
}

impl FromIterator<Violation> for Report {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_passes() {
        let report = Report::new();
        assert!(report.passed());
        assert_eq!(report.len(), 0);
    }

    #[test]
    fn any_violation_fails() {
        let mut report = Report::new();
        report.push(Violation::new(RuleKind::BannedPhrase, "Contains banned phrase: TBD"));
        assert!(!report.passed());
        assert_eq!(report.violations()[0].to_string(), "Contains banned phrase: TBD");
    }

    #[test]
    fn merge_preserves_order() {
        let mut first: Report = [Violation::new(RuleKind::RequiredSection, "a")]
            .into_iter()
            .collect();
        let second: Report = [
            Violation::new(RuleKind::MissingPath, "b"),
            Violation::new(RuleKind::MissingPath, "c"),
        ]
        .into_iter()
        .collect();
        first.merge(second);

        let messages: Vec<&str> = first.violations().iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b", "c"]);
        assert_eq!(first.messages_for(RuleKind::MissingPath), vec!["b", "c"]);
    }
}
