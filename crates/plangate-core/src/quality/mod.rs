//! Quality gate: required sections, banned phrasing and evidence rules.
//!
//! Every rule is evaluated on every run and violations are reported in rule
//! definition order:
//!
//! 1. Required sections are present in the outline.
//! 2. No banned phrase appears anywhere in the document.
//! 3. Each configured section contains a fenced code block.
//! 4. The evidence section shows an inline code span or a known command.
//! 5. The rollback section mentions one of the rollback keywords.
//!
//! A missing section is read as empty, so the section-scoped rules fail for
//! it as well.

use std::collections::HashMap;

use crate::document::PlanDocument;
use crate::outline::{Outline, Section};
use crate::report::{Report, RuleKind, Violation};
use crate::rules::RuleSet;

const CODE_FENCE: &str = "```";

/// Applies the quality rules of a [`RuleSet`] to plan text.
#[derive(Debug, Clone)]
pub struct QualityValidator<'r> {
    rules: &'r RuleSet,
    /// Evidence command tokens, lowercased once up front.
    commands: Vec<String>,
}

impl<'r> QualityValidator<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        let commands = rules
            .evidence
            .iter()
            .flat_map(|e| e.commands.iter())
            .filter(|c| !c.is_empty())
            .map(|c| c.to_lowercase())
            .collect();
        Self { rules, commands }
    }

    pub fn validate_document(&self, document: &PlanDocument) -> Report {
        self.validate(document.text())
    }

    pub fn validate(&self, text: &str) -> Report {
        let outline = Outline::parse(text);
        let sections = resolve_sections(self.rules, &outline);
        let mut report = Report::new();

        for section in &self.rules.sections {
            if lookup(&sections, &section.id).is_none() {
                report.push(Violation::new(
                    RuleKind::RequiredSection,
                    format!("Missing section: {}", section.heading),
                ));
            }
        }

        for phrase in self.rules.banned_phrases.iter().filter(|p| !p.is_empty()) {
            if text.contains(phrase.as_str()) {
                report.push(Violation::new(
                    RuleKind::BannedPhrase,
                    format!("Contains banned phrase: {phrase}"),
                ));
            }
        }

        for block in &self.rules.code_blocks {
            let body = section_text(&sections, &block.section);
            if !body.contains(CODE_FENCE) {
                report.push(Violation::new(
                    RuleKind::CodeBlock,
                    format!("{}: no code block found", block.label),
                ));
            }
        }

        if let Some(evidence) = &self.rules.evidence {
            let body = section_text(&sections, &evidence.section);
            if !self.has_executable_evidence(body) {
                report.push(Violation::new(
                    RuleKind::ExecutableEvidence,
                    format!("{}: no executable command detected", evidence.label),
                ));
            }
        }

        if let Some(rollback) = &self.rules.rollback {
            let body = section_text(&sections, &rollback.section);
            if !rollback.keywords.iter().any(|k| body.contains(k.as_str())) {
                report.push(Violation::new(
                    RuleKind::RollbackHint,
                    format!("{}: missing rollback hint", rollback.label),
                ));
            }
        }

        tracing::debug!(violations = report.len(), "quality rules evaluated");
        report
    }

    /// An inline code span anywhere in the section, or a command token
    /// matched case-insensitively.
    fn has_executable_evidence(&self, body: &str) -> bool {
        if body.contains('`') {
            return true;
        }
        let lowered = body.to_lowercase();
        self.commands.iter().any(|c| lowered.contains(c.as_str()))
    }
}

/// Every configured section looked up once, keyed by id.
fn resolve_sections<'r, 't>(
    rules: &'r RuleSet,
    outline: &Outline<'t>,
) -> HashMap<&'r str, Option<Section<'t>>> {
    rules
        .sections
        .iter()
        .map(|rule| (rule.id.as_str(), outline.section(&rule.heading)))
        .collect()
}

fn lookup<'t>(sections: &HashMap<&str, Option<Section<'t>>>, id: &str) -> Option<Section<'t>> {
    sections.get(id).copied().flatten()
}

/// Text of section `id`, or `""` when the plan lacks it.
fn section_text<'t>(sections: &HashMap<&str, Option<Section<'t>>>, id: &str) -> &'t str {
    lookup(sections, id).map_or("", |section| section.text())
}
