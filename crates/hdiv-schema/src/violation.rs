//! # Schema Violations
//!
//! Structured, non-fatal findings produced by the dataset checks.
//!
//! Every violation names the record it concerns, where that record lives,
//! the broad kind of problem, and the specific rule that was broken. The
//! `Display` form is a single self-contained line: a maintainer can act on
//! it without consulting the checker's source.

use std::fmt;
use std::path::PathBuf;

use hdiv_core::DivisionId;
use serde::Serialize;

/// Where a record (or a file-level problem) was found.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceLocation {
    /// Dataset file the record was read from.
    pub file: PathBuf,
    /// Position in the file's `divisions` sequence; `None` for problems
    /// that concern the file as a whole.
    pub index: Option<usize>,
}

impl SourceLocation {
    /// Location of the `index`-th entry of a file's `divisions` sequence.
    pub fn record(file: impl Into<PathBuf>, index: usize) -> Self {
        Self {
            file: file.into(),
            index: Some(index),
        }
    }

    /// Location of a whole file.
    pub fn file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            index: None,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}:divisions[{i}]", self.file.display()),
            None => write!(f, "{}", self.file.display()),
        }
    }
}

/// Broad category of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// Two or more records share an id.
    DuplicateId,
    /// A parent reference does not resolve.
    DanglingParent,
    /// A `was`/`became` edge has no reciprocal edge.
    AsymmetricLineage,
    /// A validity window is inverted, escapes its parent, or overlaps a
    /// sibling version.
    TimelineViolation,
    /// A record or file does not have the expected shape.
    MalformedRecord,
}

impl ViolationKind {
    /// All kinds, in report order.
    pub const ALL: [ViolationKind; 5] = [
        ViolationKind::MalformedRecord,
        ViolationKind::DuplicateId,
        ViolationKind::DanglingParent,
        ViolationKind::AsymmetricLineage,
        ViolationKind::TimelineViolation,
    ];

    /// Stable kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateId => "duplicate-id",
            Self::DanglingParent => "dangling-parent",
            Self::AsymmetricLineage => "asymmetric-lineage",
            Self::TimelineViolation => "timeline-violation",
            Self::MalformedRecord => "malformed-record",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The specific rule a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    // duplicate-id
    /// The id is defined more than once.
    IdDefinedTwice,

    // dangling-parent
    /// The parent id names no record and is not a configured root parent.
    UnknownParent,
    /// The record has no parent while parents are required.
    MissingParent,

    // asymmetric-lineage
    /// The referenced record does not point back.
    MissingReciprocal,
    /// The referenced record does not exist.
    UnknownTarget,

    // timeline-violation
    /// `from` is after `to`.
    FromAfterTo,
    /// The record starts before its parent does.
    StartsBeforeParent,
    /// The record ends after its parent does.
    EndsAfterParent,
    /// The record is still valid although its parent has ended.
    OutlivesParent,
    /// Two versions of the same base division overlap in time.
    VersionOverlap,

    // malformed-record
    /// The file's top level is not a mapping, or `divisions` is not a sequence.
    InvalidFileLayout,
    /// A `divisions` entry is not a mapping.
    NotAMapping,
    /// The record has no string `id`.
    MissingId,
    /// A `from`/`to` value is not a recognizable date.
    InvalidDate,
    /// The parent reference is not a string.
    InvalidParent,
    /// Both `parent` and `parent_id` are given and disagree.
    ConflictingParent,
    /// A `was`/`became` value is not a list of ids.
    InvalidRelation,
}

impl Rule {
    /// The kind of violation this rule belongs to.
    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::IdDefinedTwice => ViolationKind::DuplicateId,
            Self::UnknownParent | Self::MissingParent => ViolationKind::DanglingParent,
            Self::MissingReciprocal | Self::UnknownTarget => ViolationKind::AsymmetricLineage,
            Self::FromAfterTo
            | Self::StartsBeforeParent
            | Self::EndsAfterParent
            | Self::OutlivesParent
            | Self::VersionOverlap => ViolationKind::TimelineViolation,
            Self::InvalidFileLayout
            | Self::NotAMapping
            | Self::MissingId
            | Self::InvalidDate
            | Self::InvalidParent
            | Self::ConflictingParent
            | Self::InvalidRelation => ViolationKind::MalformedRecord,
        }
    }

    /// Stable kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IdDefinedTwice => "id-defined-twice",
            Self::UnknownParent => "unknown-parent",
            Self::MissingParent => "missing-parent",
            Self::MissingReciprocal => "missing-reciprocal",
            Self::UnknownTarget => "unknown-target",
            Self::FromAfterTo => "from-after-to",
            Self::StartsBeforeParent => "starts-before-parent",
            Self::EndsAfterParent => "ends-after-parent",
            Self::OutlivesParent => "outlives-parent",
            Self::VersionOverlap => "version-overlap",
            Self::InvalidFileLayout => "invalid-file-layout",
            Self::NotAMapping => "not-a-mapping",
            Self::MissingId => "missing-id",
            Self::InvalidDate => "invalid-date",
            Self::InvalidParent => "invalid-parent",
            Self::ConflictingParent => "conflicting-parent",
            Self::InvalidRelation => "invalid-relation",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single schema violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Broad category, always `rule.kind()`.
    pub kind: ViolationKind,
    /// The rule that was broken.
    pub rule: Rule,
    /// The record the violation is about, when it has a usable id.
    pub division: Option<DivisionId>,
    /// Where that record (or file) lives.
    pub location: SourceLocation,
    /// Other locations involved, e.g. the colliding definitions of a
    /// duplicate id or the record on the far end of a lineage edge.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<SourceLocation>,
    /// Human-readable description of the problem.
    pub message: String,
}

impl Violation {
    /// Create a violation for `rule` at `location`.
    pub fn new(rule: Rule, location: SourceLocation, message: impl Into<String>) -> Self {
        Self {
            kind: rule.kind(),
            rule,
            division: None,
            location,
            related: Vec::new(),
            message: message.into(),
        }
    }

    /// Attach the id of the record concerned.
    pub fn for_division(mut self, id: &DivisionId) -> Self {
        self.division = Some(id.clone());
        self
    }

    /// Attach another location involved in the violation.
    pub fn with_related(mut self, location: SourceLocation) -> Self {
        self.related.push(location);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location)?;
        if let Some(id) = &self.division {
            write!(f, " ({id})")?;
        }
        write!(f, ": {} [{}]: {}", self.kind, self.rule, self.message)
    }
}
