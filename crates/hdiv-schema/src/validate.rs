//! # Schema Validation
//!
//! Orchestrates a lint run: load a country dataset, run every check over
//! the loaded records, and aggregate the findings into a [`Report`].
//!
//! ## Contract
//!
//! - Structural failures (missing dataset, unreadable or unparsable file)
//!   abort with an [`HdivError`]; no partial report is produced.
//! - Schema violations never abort. All checks run to completion so a
//!   single run reports every problem.
//! - Violations are ordered: shape problems found while loading, then
//!   duplicate ids, parent links, lineage, and timeline.

use std::path::Path;

use hdiv_core::HdivError;

use crate::checks::{
    check_lineage_symmetry, check_parent_links, check_timeline_ordering, check_unique_ids,
};
use crate::load::{load, Dataset};
use crate::policy::LintPolicy;
use crate::report::Report;
use crate::violation::ViolationKind;

/// Runs the dataset checks under a fixed policy.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    policy: LintPolicy,
}

impl SchemaValidator {
    /// Create a validator applying `policy`.
    pub fn new(policy: LintPolicy) -> Self {
        Self { policy }
    }

    /// Load `<countries_root>/<country>` and validate it.
    ///
    /// # Errors
    ///
    /// Returns the load error if the dataset is missing or a file cannot be
    /// read or parsed.
    pub fn run(&self, countries_root: &Path, country: &str) -> Result<Report, HdivError> {
        let dataset = load(countries_root, country)?;
        tracing::info!(
            dataset = %dataset.root.display(),
            files = dataset.files.len(),
            divisions = dataset.len(),
            "loaded dataset"
        );
        Ok(self.validate(&dataset))
    }

    /// Run every check over an already loaded dataset.
    pub fn validate(&self, dataset: &Dataset) -> Report {
        let records = dataset.divisions.as_slice();
        let mut violations = dataset.issues.clone();

        let stages = [
            (ViolationKind::DuplicateId, check_unique_ids(records)),
            (ViolationKind::DanglingParent, check_parent_links(records, &self.policy)),
            (ViolationKind::AsymmetricLineage, check_lineage_symmetry(records)),
            (ViolationKind::TimelineViolation, check_timeline_ordering(records, &self.policy)),
        ];
        for (kind, found) in stages {
            tracing::debug!(check = %kind, violations = found.len(), "check finished");
            violations.extend(found);
        }

        let report = Report::new(
            dataset.root.clone(),
            dataset.files.len(),
            dataset.len(),
            violations,
        );
        if report.is_clean() {
            tracing::info!(divisions = report.divisions, "dataset is clean");
        } else {
            tracing::warn!(violations = report.total(), "dataset has schema violations");
        }
        report
    }
}

/// Lint `<countries_root>/<country>` with `policy`.
///
/// Shorthand for `SchemaValidator::new(policy).run(countries_root, country)`.
pub fn run(countries_root: &Path, country: &str, policy: LintPolicy) -> Result<Report, HdivError> {
    SchemaValidator::new(policy).run(countries_root, country)
}
