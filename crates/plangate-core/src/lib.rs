//! Validation engine for markdown plan documents.
//!
//! A plan is accepted for execution only when it carries the required
//! sections, avoids placeholder phrasing, shows code where code is mandated,
//! and every file it claims to modify actually exists.

pub mod acceptance;
pub mod document;
pub mod outline;
pub mod quality;
pub mod refs;
pub mod report;
pub mod rules;
pub mod scope;

mod tokens;

pub use acceptance::accept;
pub use document::{DocumentError, PlanDocument};
pub use outline::{Heading, HeadingQuery, Outline, Section, extract};
pub use quality::QualityValidator;
pub use refs::{DEFAULT_INDEX_NAME, RefError, ReferenceChecker};
pub use report::{Report, RuleKind, Violation};
pub use rules::{RuleSet, RulesError};
pub use scope::{RowError, ScopeRow, ScopeValidator};
