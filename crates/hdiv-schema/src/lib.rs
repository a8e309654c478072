//! # hdiv-schema: Dataset Schema Validation
//!
//! Validates a historical divisions dataset against the division schema.
//!
//! ## Pipeline
//!
//! 1. [`load`] walks `<countries-root>/<country>/` and reads every YAML
//!    file into [`Division`] records. Shape problems become
//!    `malformed-record` violations; unreadable files abort.
//! 2. The [`checks`] run as independent pure functions over the records:
//!    - [`check_unique_ids`]: every id is defined once.
//!    - [`check_parent_links`]: every parent reference resolves.
//!    - [`check_lineage_symmetry`]: `was`/`became` edges are mutual.
//!    - [`check_timeline_ordering`]: windows are ordered, nest in their
//!      parent, and versions of one division do not overlap.
//! 3. [`SchemaValidator`] aggregates everything into a [`Report`] whose
//!    exit code is 0 iff no violations were found.
//!
//! ## Crate Policy
//!
//! - Depends only on `hdiv-core` internally.
//! - Read-only: nothing here writes to the filesystem.
//! - Violations are data, not errors. Only structural failures surface as
//!   `HdivError`.

pub mod checks;
pub mod division;
pub mod load;
pub mod policy;
pub mod report;
pub mod validate;
pub mod violation;

pub use checks::{
    check_lineage_symmetry, check_parent_links, check_timeline_ordering, check_unique_ids,
};
pub use division::{Division, Relation};
pub use load::{load, Dataset};
pub use policy::{LintPolicy, OpenBounds, SharedBoundary};
pub use report::{Report, EXIT_FATAL, EXIT_OK, EXIT_VIOLATIONS};
pub use validate::{run, SchemaValidator};
pub use violation::{Rule, SourceLocation, Violation, ViolationKind};
