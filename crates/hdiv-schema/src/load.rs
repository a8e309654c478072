//! # Dataset Loading
//!
//! Discovers and parses the YAML files of one country dataset.
//!
//! ## Layout
//!
//! A dataset lives at `<countries-root>/<country>/`. Every `*.yaml` (or
//! `*.yml`) file below it, at any depth, is read in sorted path order. A
//! file holds a mapping with a top-level `divisions:` sequence:
//!
//! ```yaml
//! divisions:
//!   - id: "NO-03:1838"
//!     parent: NO
//!     from: "1838-01-01"
//!     to: "2019-12-31"
//!     became: ["NO-46:2020"]
//! ```
//!
//! ## Failure Semantics
//!
//! Structural failures abort the load: a missing dataset directory, an
//! unreadable file, a file that is not UTF-8, or a file that is not YAML.
//! Shape problems inside well-formed YAML are collected as violations on
//! the returned [`Dataset`] and never abort.

use std::path::{Path, PathBuf};

use hdiv_core::HdivError;
use serde_yaml::Value;

use crate::division::{describe, untagged, Division};
use crate::violation::{Rule, SourceLocation, Violation};

/// Key of the record sequence in every dataset file.
pub const DIVISIONS_KEY: &str = "divisions";

/// File extensions treated as dataset files.
const YAML_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// All records of one country dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// The country directory that was loaded.
    pub root: PathBuf,
    /// Dataset files read, in load order.
    pub files: Vec<PathBuf>,
    /// Records in load order (file order, then position within the file).
    pub divisions: Vec<Division>,
    /// Shape problems found while reading records.
    pub issues: Vec<Violation>,
}

impl Dataset {
    /// Number of records loaded.
    pub fn len(&self) -> usize {
        self.divisions.len()
    }

    /// True when no records were loaded.
    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }
}

/// Load the dataset of `country` below `countries_root`.
///
/// # Errors
///
/// - `HdivError::DatasetNotFound` if `<countries_root>/<country>` is not a
///   directory.
/// - `HdivError::Io`, `HdivError::Encoding`, or `HdivError::Parse` if any
///   dataset file cannot be read or parsed.
pub fn load(countries_root: &Path, country: &str) -> Result<Dataset, HdivError> {
    let root = countries_root.join(country);
    load_dir(&root)
}

/// Load every dataset file below `root`.
pub fn load_dir(root: &Path) -> Result<Dataset, HdivError> {
    if !root.is_dir() {
        return Err(HdivError::DatasetNotFound {
            path: root.to_path_buf(),
        });
    }

    let files = find_yaml_files(root)?;
    tracing::debug!(root = %root.display(), files = files.len(), "discovered dataset files");

    let mut divisions = Vec::new();
    let mut issues = Vec::new();
    for path in &files {
        let before = divisions.len();
        load_file(path, &mut divisions, &mut issues)?;
        tracing::trace!(
            file = %path.display(),
            records = divisions.len() - before,
            "loaded dataset file"
        );
    }

    Ok(Dataset {
        root: root.to_path_buf(),
        files,
        divisions,
        issues,
    })
}

/// Parse one dataset file, appending its records and shape problems.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not UTF-8, or is not
/// valid YAML.
pub fn load_file(
    path: &Path,
    divisions: &mut Vec<Division>,
    issues: &mut Vec<Violation>,
) -> Result<(), HdivError> {
    let bytes = std::fs::read(path).map_err(|e| HdivError::io(path, e))?;
    let content = String::from_utf8(bytes).map_err(|_| HdivError::Encoding {
        path: path.to_path_buf(),
    })?;

    if is_blank(&content) {
        return Ok(());
    }

    let document: Value = serde_yaml::from_str(&content).map_err(|e| {
        let (line, column) = e
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((0, 0));
        HdivError::Parse {
            file: path.to_path_buf(),
            line,
            column,
            reason: e.to_string(),
        }
    })?;

    let entries = match untagged(&document) {
        Value::Null => return Ok(()),
        Value::Mapping(map) => match map.get(DIVISIONS_KEY).map(untagged) {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Sequence(entries)) => entries,
            Some(other) => {
                issues.push(Violation::new(
                    Rule::InvalidFileLayout,
                    SourceLocation::file(path),
                    format!("'{DIVISIONS_KEY}' must be a list, got {}", describe(other)),
                ));
                return Ok(());
            }
        },
        other => {
            issues.push(Violation::new(
                Rule::InvalidFileLayout,
                SourceLocation::file(path),
                format!(
                    "top level must be a mapping with a '{DIVISIONS_KEY}' list, got {}",
                    describe(other)
                ),
            ));
            return Ok(());
        }
    };

    for (i, entry) in entries.iter().enumerate() {
        if let Some(division) = Division::from_yaml(entry, SourceLocation::record(path, i), issues) {
            divisions.push(division);
        }
    }

    Ok(())
}

/// Recursively find dataset files below `dir`, sorted by path.
///
/// Symlinked files are included; symlinked directories are skipped, so a
/// link back into the tree cannot load the same records twice.
///
/// # Errors
///
/// Returns `HdivError::Io` if a directory cannot be listed.
pub fn find_yaml_files(dir: &Path) -> Result<Vec<PathBuf>, HdivError> {
    let mut results = Vec::new();
    walk_for_files(dir, &mut results)?;
    results.sort();
    Ok(results)
}

fn walk_for_files(dir: &Path, acc: &mut Vec<PathBuf>) -> Result<(), HdivError> {
    let entries = std::fs::read_dir(dir).map_err(|e| HdivError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| HdivError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| HdivError::io(&path, e))?;
        if file_type.is_dir() {
            walk_for_files(&path, acc)?;
        } else if file_type.is_symlink() && path.is_dir() {
            // Symlinked directories are not descended into.
            tracing::debug!(path = %path.display(), "skipping symlinked directory");
        } else if is_yaml(&path) {
            acc.push(path);
        }
    }
    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| YAML_EXTENSIONS.contains(&ext))
}

/// True when the text holds nothing but whitespace and comments.
fn is_blank(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#') || line == "---")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn find_yaml_files_sorted_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b/counties.yaml", "divisions: []\n");
        write(dir.path(), "a/deep/nested/municipalities.yml", "divisions: []\n");
        write(dir.path(), "notes.txt", "not yaml");
        let files = find_yaml_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0] < files[1], "Results should be sorted: {files:?}");
        assert!(files[0].ends_with("municipalities.yml"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_walked() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "norway/a.yaml", "divisions:\n  - id: A\n");
        let country = dir.path().join("norway");
        std::os::unix::fs::symlink(&country, country.join("loop")).unwrap();
        std::os::unix::fs::symlink(country.join("a.yaml"), country.join("alias.yml")).unwrap();

        let files = find_yaml_files(&country).unwrap();
        assert_eq!(files, [country.join("a.yaml"), country.join("alias.yml")]);

        std::fs::remove_file(country.join("alias.yml")).unwrap();
        let ds = load(dir.path(), "norway").unwrap();
        assert_eq!(ds.len(), 1);
        assert!(ds.issues.is_empty());
    }

    #[test]
    fn missing_country_is_dataset_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path(), "atlantis").unwrap_err();
        match err {
            HdivError::DatasetNotFound { path } => assert!(path.ends_with("atlantis")),
            other => panic!("Expected DatasetNotFound, got: {other}"),
        }
    }

    #[test]
    fn country_that_is_a_file_is_dataset_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "norway", "divisions: []\n");
        assert!(matches!(
            load(dir.path(), "norway"),
            Err(HdivError::DatasetNotFound { .. })
        ));
    }

    #[test]
    fn loads_records_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "norway/a.yaml",
            "divisions:\n  - id: A\n  - id: B\n    parent: A\n",
        );
        write(dir.path(), "norway/b.yaml", "divisions:\n  - id: C\n");
        let ds = load(dir.path(), "norway").unwrap();
        let ids: Vec<&str> = ds.divisions.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "C"]);
        assert_eq!(ds.files.len(), 2);
        assert_eq!(ds.divisions[1].location.index, Some(1));
        assert!(ds.issues.is_empty());
    }

    #[test]
    fn parse_error_carries_line() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "norway/broken.yaml",
            "divisions:\n  - id: A\n    from: [unclosed\n",
        );
        match load(dir.path(), "norway").unwrap_err() {
            HdivError::Parse { file, line, .. } => {
                assert!(file.ends_with("broken.yaml"));
                assert!(line > 0, "expected a line number");
            }
            other => panic!("Expected Parse, got: {other}"),
        }
    }

    #[test]
    fn non_utf8_is_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("norway");
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("latin1.yaml"), [0x64, 0x69, 0xff, 0xfe]).unwrap();
        assert!(matches!(
            load(dir.path(), "norway"),
            Err(HdivError::Encoding { .. })
        ));
    }

    #[test]
    fn blank_and_keyless_files_contribute_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "norway/empty.yaml", "");
        write(dir.path(), "norway/comments.yaml", "# todo\n\n");
        write(dir.path(), "norway/meta.yaml", "country: Norway\n");
        let ds = load(dir.path(), "norway").unwrap();
        assert!(ds.is_empty());
        assert!(ds.issues.is_empty());
    }

    #[test]
    fn wrong_layout_is_a_violation_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "norway/list.yaml", "- id: A\n");
        write(dir.path(), "norway/scalar.yaml", "divisions: nope\n");
        let ds = load(dir.path(), "norway").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.issues.len(), 2);
        assert!(ds.issues.iter().all(|v| v.rule == Rule::InvalidFileLayout));
    }

    #[test]
    fn malformed_entries_collected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "norway/a.yaml",
            "divisions:\n  - id: A\n  - name: no id here\n  - plain string\n",
        );
        let ds = load(dir.path(), "norway").unwrap();
        assert_eq!(ds.len(), 1);
        let rules: Vec<Rule> = ds.issues.iter().map(|v| v.rule).collect();
        assert_eq!(rules, [Rule::MissingId, Rule::NotAMapping]);
        assert_eq!(ds.issues[1].location.index, Some(2));
    }
}
