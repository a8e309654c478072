//! # Dataset Checks
//!
//! The four schema checks, each a pure function over an immutable slice of
//! records. Checks never stop at the first problem: each returns every
//! violation it finds, in a deterministic order (record order for
//! per-record rules, id order for grouped rules).
//!
//! When an id is defined more than once, reference lookups resolve to the
//! first definition; the duplicates themselves are reported by
//! [`check_unique_ids`].

use std::collections::{BTreeMap, HashMap, HashSet};

use hdiv_core::{ValidityDate, ValidityWindow};

use crate::division::{Division, Relation};
use crate::policy::{LintPolicy, OpenBounds};
use crate::violation::{Rule, Violation};

/// Lookup from id to the first record defining it.
pub fn index(records: &[Division]) -> HashMap<&str, &Division> {
    let mut by_id = HashMap::with_capacity(records.len());
    for record in records {
        by_id.entry(record.id.as_str()).or_insert(record);
    }
    by_id
}

/// Report every id defined more than once.
///
/// Produces exactly one violation per duplicated id. It is attached to the
/// first definition and lists every other definition as related.
pub fn check_unique_ids(records: &[Division]) -> Vec<Violation> {
    let mut by_id: BTreeMap<&str, Vec<&Division>> = BTreeMap::new();
    for record in records {
        by_id.entry(record.id.as_str()).or_default().push(record);
    }

    by_id
        .into_values()
        .filter(|defs| defs.len() > 1)
        .map(|defs| {
            let first = defs[0];
            let places: Vec<String> = defs.iter().map(|d| d.location.to_string()).collect();
            let violation = Violation::new(
                Rule::IdDefinedTwice,
                first.location.clone(),
                format!(
                    "duplicate division id '{}' defined {} times: {}",
                    first.id,
                    defs.len(),
                    places.join(", ")
                ),
            )
            .for_division(&first.id);
            defs[1..]
                .iter()
                .fold(violation, |v, d| v.with_related(d.location.clone()))
        })
        .collect()
}

/// Report every parent reference that does not resolve.
pub fn check_parent_links(records: &[Division], policy: &LintPolicy) -> Vec<Violation> {
    let by_id = index(records);
    let mut violations = Vec::new();

    for record in records {
        match &record.parent {
            None if policy.require_parent => violations.push(
                Violation::new(
                    Rule::MissingParent,
                    record.location.clone(),
                    "missing parent reference",
                )
                .for_division(&record.id),
            ),
            None => {}
            Some(parent) if policy.is_root_parent(parent.as_str()) => {}
            Some(parent) if by_id.contains_key(parent.as_str()) => {}
            Some(parent) => violations.push(
                Violation::new(
                    Rule::UnknownParent,
                    record.location.clone(),
                    format!("parent '{parent}' not found in dataset"),
                )
                .for_division(&record.id),
            ),
        }
    }

    violations
}

/// Report every one-directional `was`/`became` edge.
///
/// A record listing B in `was` needs B to list it in `became`, and the
/// other way round. Each edge is reported once, from the record that
/// declares it. Edges to ids that do not exist are reported as well.
pub fn check_lineage_symmetry(records: &[Division]) -> Vec<Violation> {
    let by_id = index(records);
    let mut violations = Vec::new();

    for record in records {
        for relation in [Relation::Was, Relation::Became] {
            let counterpart = relation.counterpart();
            let mut seen = HashSet::new();
            for target_id in record.relation(relation) {
                if !seen.insert(target_id) {
                    continue;
                }
                let Some(target) = by_id.get(target_id.as_str()) else {
                    violations.push(
                        Violation::new(
                            Rule::UnknownTarget,
                            record.location.clone(),
                            format!("{relation} references unknown id '{target_id}'"),
                        )
                        .for_division(&record.id),
                    );
                    continue;
                };
                if !target.relation(counterpart).contains(&record.id) {
                    violations.push(
                        Violation::new(
                            Rule::MissingReciprocal,
                            record.location.clone(),
                            format!(
                                "lineage mismatch: {} {relation} -> {target_id} without reciprocal \
                                 {counterpart} -> {} on {target_id}",
                                record.id, record.id
                            ),
                        )
                        .for_division(&record.id)
                        .with_related(target.location.clone()),
                    );
                }
            }
        }
    }

    violations
}

/// Report inverted windows, children escaping their parent's window, and
/// overlapping versions of one base division.
pub fn check_timeline_ordering(records: &[Division], policy: &LintPolicy) -> Vec<Violation> {
    let by_id = index(records);
    let mut violations = Vec::new();

    for record in records {
        let window = record.window;
        if window.is_inverted() {
            violations.push(
                Violation::new(
                    Rule::FromAfterTo,
                    record.location.clone(),
                    format!("window {window} starts after it ends"),
                )
                .for_division(&record.id),
            );
        }

        let Some(parent) = record.parent.as_ref().and_then(|p| by_id.get(p.as_str())) else {
            continue;
        };
        for (rule, detail) in nesting_breaches(&window, &parent.window, policy.open_bounds) {
            violations.push(
                Violation::new(
                    rule,
                    record.location.clone(),
                    format!(
                        "window {window} is not within parent {} window {}: {detail}",
                        parent.id, parent.window
                    ),
                )
                .for_division(&record.id)
                .with_related(parent.location.clone()),
            );
        }
    }

    if policy.check_version_overlap {
        violations.extend(version_overlaps(records, policy));
    }

    violations
}

/// A bound for ordering purposes, where `None` is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum End {
    Date(ValidityDate),
    Open,
}

impl From<Option<ValidityDate>> for End {
    fn from(to: Option<ValidityDate>) -> Self {
        to.map_or(End::Open, End::Date)
    }
}

fn nesting_breaches(
    child: &ValidityWindow,
    parent: &ValidityWindow,
    open_bounds: OpenBounds,
) -> Vec<(Rule, String)> {
    let mut breaches = Vec::new();

    match (child.from, parent.from) {
        (Some(c), Some(p)) if c < p => {
            breaches.push((Rule::StartsBeforeParent, format!("starts {c} before parent starts {p}")));
        }
        (None, Some(p)) if open_bounds == OpenBounds::Unbounded => {
            breaches.push((
                Rule::StartsBeforeParent,
                format!("has no start date but parent starts {p}"),
            ));
        }
        _ => {}
    }

    match (child.to, parent.to) {
        (Some(c), Some(p)) if c > p => {
            breaches.push((Rule::EndsAfterParent, format!("ends {c} after parent ended {p}")));
        }
        (None, Some(p)) if open_bounds == OpenBounds::Unbounded => {
            breaches.push((
                Rule::OutlivesParent,
                format!("is still valid but parent ended {p}"),
            ));
        }
        _ => {}
    }

    breaches
}

fn version_overlaps(records: &[Division], policy: &LintPolicy) -> Vec<Violation> {
    // Later definitions of a duplicated id are not versions of anything.
    let mut seen = HashSet::new();
    let mut groups: BTreeMap<&str, Vec<&Division>> = BTreeMap::new();
    for record in records.iter().filter(|r| seen.insert(r.id.as_str())) {
        groups.entry(record.id.base()).or_default().push(record);
    }

    let mut violations = Vec::new();
    for (base, mut versions) in groups {
        if versions.len() < 2 {
            continue;
        }
        versions.sort_by_key(|d| (d.window.from, End::from(d.window.to)));

        let mut latest: Option<(End, &Division)> = None;
        for version in versions {
            if let (Some((end, previous)), Some(from)) = (latest, version.window.from) {
                let overlaps = match end {
                    End::Open => true,
                    End::Date(previous_to) => policy.shared_boundary.overlaps(from, previous_to),
                };
                if overlaps {
                    let ended = match end {
                        End::Open => "is still valid".to_string(),
                        End::Date(d) => format!("ended {d}"),
                    };
                    violations.push(
                        Violation::new(
                            Rule::VersionOverlap,
                            version.location.clone(),
                            format!(
                                "timeline overlap for {base}: {} starts {from} but previous version {} {ended}",
                                version.id, previous.id
                            ),
                        )
                        .for_division(&version.id)
                        .with_related(previous.location.clone()),
                    );
                }
            }

            let end = End::from(version.window.to);
            if latest.map_or(true, |(latest_end, _)| end > latest_end) {
                latest = Some((end, version));
            }
        }
    }

    violations
}
