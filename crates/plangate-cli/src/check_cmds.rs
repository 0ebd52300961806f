//! CLI handlers for the plan gates.
//!
//! Implements:
//! - `plangate quality <plan>` -- quality gate only
//! - `plangate scope <plan>`   -- scope gate only
//! - `plangate check <plan>`   -- both gates, quality first

use std::path::Path;

use anyhow::{Context, Result};

use plangate_core::{
    DocumentError, PlanDocument, QualityValidator, RuleSet, ScopeValidator, accept,
};

use crate::output;

/// Options shared by the commands that run the scope gate.
#[derive(Debug, Clone)]
pub struct ScopeOptions<'a> {
    pub root: &'a Path,
    pub strict: bool,
}

// -----------------------------------------------------------------------
// Entry points
// -----------------------------------------------------------------------

pub fn run_quality(plan: &Path, rules: &RuleSet, as_json: bool) -> Result<bool> {
    let Some(document) = load_plan(plan)? else {
        return not_found(plan, as_json);
    };
    let report = QualityValidator::new(rules).validate_document(&document);
    output::emit(&report, as_json)
}

pub fn run_scope(
    plan: &Path,
    rules: &RuleSet,
    options: &ScopeOptions<'_>,
    as_json: bool,
) -> Result<bool> {
    let Some(document) = load_plan(plan)? else {
        return not_found(plan, as_json);
    };
    let report = scope_validator(rules, options).validate_document(&document);
    output::emit(&report, as_json)
}

pub fn run_check(
    plan: &Path,
    rules: &RuleSet,
    options: &ScopeOptions<'_>,
    as_json: bool,
) -> Result<bool> {
    let Some(document) = load_plan(plan)? else {
        return not_found(plan, as_json);
    };
    let quality = QualityValidator::new(rules);
    let scope = scope_validator(rules, options);
    let report = accept(&document, &quality, &scope);
    output::emit(&report, as_json)
}

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

/// Load the plan, mapping a missing file to `None`.
pub(crate) fn load_plan(plan: &Path) -> Result<Option<PlanDocument>> {
    match PlanDocument::load(plan) {
        Ok(document) => Ok(Some(document)),
        Err(DocumentError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to load plan {}", plan.display())),
    }
}

pub(crate) fn not_found(plan: &Path, as_json: bool) -> Result<bool> {
    let err = DocumentError::NotFound {
        path: plan.to_path_buf(),
    };
    output::emit_aborted(&err, as_json)
}

fn scope_validator<'r>(rules: &'r RuleSet, options: &ScopeOptions<'_>) -> ScopeValidator<'r> {
    let validator = ScopeValidator::new(rules, options.root);
    // --strict can only tighten the rule set's setting.
    if options.strict {
        validator.strict(true)
    } else {
        validator
    }
}
