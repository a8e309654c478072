//! # Division Records
//!
//! The in-memory form of one `divisions` entry and its extraction from a
//! parsed YAML value.
//!
//! Extraction never fails. Fields with the wrong shape are reported as
//! `malformed-record` violations and then treated as absent, so the rest of
//! the record still takes part in the checks. Only an entry without a
//! usable `id` is dropped, since no other check can refer to it.

use hdiv_core::{DivisionId, ValidityDate, ValidityWindow};
use serde_yaml::{Mapping, Value};

use crate::violation::{Rule, SourceLocation, Violation};

/// A `was`/`became` relation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Predecessors of the record.
    Was,
    /// Successors of the record.
    Became,
}

impl Relation {
    /// YAML key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Was => "was",
            Self::Became => "became",
        }
    }

    /// The field that must hold the reverse edge.
    pub fn counterpart(&self) -> Relation {
        match self {
            Self::Was => Self::Became,
            Self::Became => Self::Was,
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One administrative/historical division record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    /// Identifier, expected to be unique across the dataset.
    pub id: DivisionId,
    /// Parent division, `None` for roots.
    pub parent: Option<DivisionId>,
    /// Validity window.
    pub window: ValidityWindow,
    /// Predecessor ids.
    pub was: Vec<DivisionId>,
    /// Successor ids.
    pub became: Vec<DivisionId>,
    /// Where the record was read from.
    pub location: SourceLocation,
}

impl Division {
    /// Ids listed in the given relation field.
    pub fn relation(&self, relation: Relation) -> &[DivisionId] {
        match relation {
            Relation::Was => &self.was,
            Relation::Became => &self.became,
        }
    }

    /// Extract a record from one `divisions` entry.
    ///
    /// Shape problems are appended to `issues`. Returns `None` when the
    /// entry is not a mapping or has no string `id`.
    pub fn from_yaml(
        entry: &Value,
        location: SourceLocation,
        issues: &mut Vec<Violation>,
    ) -> Option<Division> {
        let Some(map) = untagged(entry).as_mapping() else {
            issues.push(Violation::new(
                Rule::NotAMapping,
                location,
                format!("division entry must be a mapping, got {}", describe(entry)),
            ));
            return None;
        };

        let id = match map.get("id").map(untagged) {
            Some(Value::String(s)) if !s.trim().is_empty() => DivisionId::new(s.as_str()),
            other => {
                let got = other.map(describe).unwrap_or_else(|| "nothing".to_string());
                issues.push(Violation::new(
                    Rule::MissingId,
                    location,
                    format!("division must have a non-empty string id, got {got}"),
                ));
                return None;
            }
        };

        let mut ctx = FieldContext {
            id: &id,
            location: &location,
            issues,
        };

        let parent = ctx.parent(map);
        let from = ctx.date(map, "from");
        let to = ctx.date(map, "to");
        let was = ctx.relation(map, Relation::Was);
        let became = ctx.relation(map, Relation::Became);

        Some(Division {
            id,
            parent,
            window: ValidityWindow::new(from, to),
            was,
            became,
            location,
        })
    }
}

/// Borrowed state shared by the per-field extractors of one record.
struct FieldContext<'a> {
    id: &'a DivisionId,
    location: &'a SourceLocation,
    issues: &'a mut Vec<Violation>,
}

impl FieldContext<'_> {
    fn report(&mut self, rule: Rule, message: String) {
        self.issues.push(
            Violation::new(rule, self.location.clone(), message).for_division(self.id),
        );
    }

    fn parent(&mut self, map: &Mapping) -> Option<DivisionId> {
        let parent_id = self.parent_field(map, "parent_id");
        let parent = self.parent_field(map, "parent");
        match (parent_id, parent) {
            (Some(a), Some(b)) if a != b => {
                self.report(
                    Rule::ConflictingParent,
                    format!("parent_id '{a}' disagrees with parent '{b}'"),
                );
                Some(a)
            }
            (Some(a), _) => Some(a),
            (None, b) => b,
        }
    }

    fn parent_field(&mut self, map: &Mapping, key: &str) -> Option<DivisionId> {
        match map.get(key).map(untagged) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(DivisionId::new(s.as_str())),
            // YAML 1.1 readers turn a bare NO (Norway) into false.
            Some(Value::Bool(b)) => Some(DivisionId::new(if *b { "YES" } else { "NO" })),
            Some(other) => {
                self.report(
                    Rule::InvalidParent,
                    format!("{key} must be a string or null, got {}", describe(other)),
                );
                None
            }
        }
    }

    fn date(&mut self, map: &Mapping, key: &str) -> Option<ValidityDate> {
        let value = map.get(key).map(untagged)?;
        let parsed = match value {
            Value::Null => return None,
            Value::String(s) => ValidityDate::parse(s).map_err(|e| e.to_string()),
            Value::Number(n) => match n.as_i64().and_then(|y| i32::try_from(y).ok()) {
                Some(year) => ValidityDate::from_year(year).map_err(|e| e.to_string()),
                None => Err(format!("expected a year, got {n}")),
            },
            other => Err(format!("expected ISO date string or null, got {}", describe(other))),
        };
        match parsed {
            Ok(date) => Some(date),
            Err(reason) => {
                self.report(Rule::InvalidDate, format!("{key}: {reason}"));
                None
            }
        }
    }

    fn relation(&mut self, map: &Mapping, relation: Relation) -> Vec<DivisionId> {
        let key = relation.key();
        let items = match map.get(key).map(untagged) {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Sequence(items)) => items,
            Some(other) => {
                self.report(
                    Rule::InvalidRelation,
                    format!("{key}: expected a list, got {}", describe(other)),
                );
                return Vec::new();
            }
        };

        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            match untagged(item) {
                Value::String(s) => ids.push(DivisionId::new(s.as_str())),
                Value::Mapping(m) => match m.get("id").map(untagged) {
                    Some(Value::String(s)) => ids.push(DivisionId::new(s.as_str())),
                    _ => self.report(
                        Rule::InvalidRelation,
                        format!("{key}: entry is missing a string 'id' field"),
                    ),
                },
                other => self.report(
                    Rule::InvalidRelation,
                    format!("{key}: expected an id or a mapping with id, got {}", describe(other)),
                ),
            }
        }
        ids
    }
}

/// Strip YAML tags, keeping the tagged value.
pub(crate) fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

/// Short description of a YAML value for messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string '{s}'"),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => describe(&tagged.value),
    }
}
