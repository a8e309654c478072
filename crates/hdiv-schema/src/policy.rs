//! # Lint Policy
//!
//! Knobs for the parts of the schema that datasets interpret differently:
//! how open-ended validity windows nest, whether successive versions may
//! share a boundary day, and how parentless records are treated.
//!
//! The defaults reproduce the behaviour the dataset has always been linted
//! with. A policy is usually read from the `policy:` section of the lint
//! configuration file.

use std::collections::BTreeSet;

use hdiv_core::ValidityDate;
use serde::{Deserialize, Serialize};

/// How absent `from`/`to` bounds take part in parent/child nesting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenBounds {
    /// Absent `from` is the open past and absent `to` the open future.
    /// An open-ended parent contains every child end; an open-ended child
    /// of a closed parent outlives it.
    #[default]
    Unbounded,
    /// Comparisons involving an absent bound are skipped.
    Lenient,
}

/// Whether a version may begin on the day its predecessor ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharedBoundary {
    /// `to` is inclusive: starting on the predecessor's `to` day overlaps.
    #[default]
    Overlap,
    /// Starting on the predecessor's `to` day is accepted.
    Allowed,
}

impl SharedBoundary {
    /// True when a version starting on `from` collides with a predecessor
    /// that ended on `previous_to`.
    pub fn overlaps(&self, from: ValidityDate, previous_to: ValidityDate) -> bool {
        match self {
            Self::Overlap => from <= previous_to,
            Self::Allowed => from < previous_to,
        }
    }
}

/// Policy applied by the checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintPolicy {
    /// Treatment of open bounds when nesting child windows in parents.
    pub open_bounds: OpenBounds,
    /// Boundary-day rule between successive versions.
    pub shared_boundary: SharedBoundary,
    /// Flag overlapping versions of the same base division.
    pub check_version_overlap: bool,
    /// Report records without a parent.
    pub require_parent: bool,
    /// Parent ids accepted without a matching record, e.g. a country code.
    pub root_parents: BTreeSet<String>,
}

impl Default for LintPolicy {
    fn default() -> Self {
        Self {
            open_bounds: OpenBounds::default(),
            shared_boundary: SharedBoundary::default(),
            check_version_overlap: true,
            require_parent: false,
            root_parents: BTreeSet::new(),
        }
    }
}

impl LintPolicy {
    /// True when `id` is a configured root parent.
    pub fn is_root_parent(&self, id: &str) -> bool {
        self.root_parents.contains(id)
    }
}
