//! Read-only inspection commands.
//!
//! Implements:
//! - `plangate outline <plan>` -- headings as the validators see them
//! - `plangate rules`          -- the effective rule set as TOML

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use plangate_core::{Outline, RuleSet};

use crate::check_cmds::{load_plan, not_found};

pub fn run_outline(plan: &Path) -> Result<bool> {
    let Some(document) = load_plan(plan)? else {
        return not_found(plan, false);
    };
    print!("{}", render_outline(&document.outline()));
    Ok(true)
}

/// One line per heading: line number, then the heading as written.
pub fn render_outline(outline: &Outline<'_>) -> String {
    let mut out = String::new();
    for heading in outline.headings() {
        let marks = "#".repeat(usize::from(heading.level));
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{:>5}  {marks} {}", heading.line, heading.title);
    }
    out
}

pub fn run_rules(rules: &RuleSet) -> Result<bool> {
    let rendered = toml::to_string_pretty(rules).context("failed to serialize rule set")?;
    print!("{rendered}");
    Ok(true)
}
