//! Plan acceptance: the quality gate followed by the scope gate.

use crate::document::PlanDocument;
use crate::quality::QualityValidator;
use crate::report::Report;
use crate::scope::ScopeValidator;

/// Run both gates over one document and concatenate their reports.
///
/// Quality violations come first, then scope violations. Neither gate
/// suppresses the other.
pub fn accept(
    document: &PlanDocument,
    quality: &QualityValidator<'_>,
    scope: &ScopeValidator<'_>,
) -> Report {
    let mut report = quality.validate_document(document);
    report.merge(scope.validate_document(document));
    tracing::debug!(
        path = %document.path().display(),
        violations = report.len(),
        "plan acceptance evaluated"
    );
    report
}
