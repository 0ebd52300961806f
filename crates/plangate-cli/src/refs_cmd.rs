//! CLI handler for `plangate refs`.

use anyhow::{Context, Result};

use plangate_core::{RefError, ReferenceChecker};

use crate::config::PlangateConfig;
use crate::output;

/// Check the configured reference index.
pub fn run_refs(config: &PlangateConfig, as_json: bool) -> Result<bool> {
    let checker =
        ReferenceChecker::new(&config.references_dir).index_name(config.index_name.as_str());

    match checker.check() {
        Ok(report) => output::emit(&report, as_json),
        Err(err @ RefError::IndexNotFound { .. }) => output::emit_aborted(&err, as_json),
        Err(err) => Err(err).context("reference check failed"),
    }
}
