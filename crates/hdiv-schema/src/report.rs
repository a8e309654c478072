//! # Lint Report
//!
//! Aggregated outcome of one lint run: what was checked, every violation
//! found, per-kind counts, and the resulting exit status.
//!
//! Rendering is deterministic. The same dataset and policy always produce
//! byte-identical text and JSON.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::violation::{Violation, ViolationKind};

/// Exit status of a clean run.
pub const EXIT_OK: u8 = 0;
/// Exit status of a run that found violations.
pub const EXIT_VIOLATIONS: u8 = 1;
/// Exit status of a run aborted by a fatal error.
pub const EXIT_FATAL: u8 = 2;

/// Result of linting one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// The country directory that was linted.
    pub dataset: PathBuf,
    /// Number of dataset files read.
    pub files: usize,
    /// Number of records validated.
    pub divisions: usize,
    /// Violation count per kind; kinds without violations are omitted.
    pub counts: BTreeMap<ViolationKind, usize>,
    /// Every violation, in check order.
    pub violations: Vec<Violation>,
}

impl Report {
    /// Build a report from the collected violations.
    pub fn new(dataset: PathBuf, files: usize, divisions: usize, violations: Vec<Violation>) -> Self {
        let mut counts = BTreeMap::new();
        for v in &violations {
            *counts.entry(v.kind).or_insert(0) += 1;
        }
        Self {
            dataset,
            files,
            divisions,
            counts,
            violations,
        }
    }

    /// True when no violations were found.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations of `kind`.
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Total number of violations.
    pub fn total(&self) -> usize {
        self.violations.len()
    }

    /// Violations of one kind.
    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    /// Process exit status: [`EXIT_OK`] iff clean, else [`EXIT_VIOLATIONS`].
    pub fn exit_code(&self) -> u8 {
        if self.is_clean() {
            EXIT_OK
        } else {
            EXIT_VIOLATIONS
        }
    }

    /// One-line summary, e.g. `3 violations in 11 divisions: 1 duplicate-id, 2 timeline-violation`.
    pub fn summary(&self) -> String {
        if self.is_clean() {
            return format!(
                "OK: {} divisions validated in {}",
                self.divisions,
                self.dataset.display()
            );
        }
        let parts: Vec<String> = ViolationKind::ALL
            .iter()
            .filter_map(|kind| match self.count(*kind) {
                0 => None,
                n => Some(format!("{n} {kind}")),
            })
            .collect();
        let noun = if self.total() == 1 { "violation" } else { "violations" };
        format!(
            "{} {noun} in {} divisions: {}",
            self.total(),
            self.divisions,
            parts.join(", ")
        )
    }

    /// Full human-readable report.
    ///
    /// A clean report is the single `OK:` line. Otherwise a header, one
    /// ` - ` line per violation, and the summary.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if self.is_clean() {
            let _ = writeln!(out, "{}", self.summary());
            return out;
        }
        let _ = writeln!(out, "Schema lint found issues:");
        for v in &self.violations {
            let _ = writeln!(out, " - {v}");
        }
        let _ = writeln!(out, "{}", self.summary());
        out
    }

    /// Machine-readable report.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::{Rule, SourceLocation};

    fn violation(rule: Rule) -> Violation {
        Violation::new(rule, SourceLocation::record("norway/a.yaml", 0), "detail")
    }

    #[test]
    fn clean_report() {
        let r = Report::new(PathBuf::from("countries/norway"), 2, 10, Vec::new());
        assert!(r.is_clean());
        assert_eq!(r.exit_code(), EXIT_OK);
        assert_eq!(r.render_text(), "OK: 10 divisions validated in countries/norway\n");
    }

    #[test]
    fn counts_and_exit_code() {
        let r = Report::new(
            PathBuf::from("countries/norway"),
            1,
            4,
            vec![
                violation(Rule::FromAfterTo),
                violation(Rule::IdDefinedTwice),
                violation(Rule::VersionOverlap),
            ],
        );
        assert_eq!(r.exit_code(), EXIT_VIOLATIONS);
        assert_eq!(r.count(ViolationKind::TimelineViolation), 2);
        assert_eq!(r.count(ViolationKind::DuplicateId), 1);
        assert_eq!(r.count(ViolationKind::DanglingParent), 0);
        assert_eq!(r.of_kind(ViolationKind::TimelineViolation).count(), 2);
        assert_eq!(
            r.summary(),
            "3 violations in 4 divisions: 1 duplicate-id, 2 timeline-violation"
        );
    }

    #[test]
    fn text_lists_every_violation() {
        let r = Report::new(
            PathBuf::from("countries/norway"),
            1,
            1,
            vec![violation(Rule::UnknownParent)],
        );
        let text = r.render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Schema lint found issues:");
        assert!(lines[1].starts_with(" - norway/a.yaml:divisions[0]: dangling-parent [unknown-parent]"));
        assert_eq!(lines[2], "1 violation in 1 divisions: 1 dangling-parent");
    }

    #[test]
    fn json_uses_kebab_case_names() {
        let r = Report::new(
            PathBuf::from("countries/norway"),
            1,
            1,
            vec![violation(Rule::MissingReciprocal)],
        );
        let json: serde_json::Value = serde_json::from_str(&r.to_json().unwrap()).unwrap();
        assert_eq!(json["counts"]["asymmetric-lineage"], 1);
        assert_eq!(json["violations"][0]["rule"], "missing-reciprocal");
        assert_eq!(json["violations"][0]["location"]["index"], 0);
    }
}
