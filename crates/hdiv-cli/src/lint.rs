//! # Lint Command
//!
//! Resolves the dataset location and policy from flags, the optional
//! configuration file, and defaults (in that order of precedence), runs the
//! validator, and writes the report.
//!
//! Text reports go to stdout when clean and to stderr otherwise. JSON
//! reports always go to stdout.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use hdiv_schema::{LintPolicy, Report, SchemaValidator};

use crate::config::LintConfig;
use crate::{resolve_countries_root, resolve_path, DEFAULT_COUNTRY};

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per violation, for people.
    #[default]
    Text,
    /// Pretty-printed JSON, for tools.
    Json,
}

/// Arguments for a lint run.
#[derive(Args, Debug, Default)]
pub struct LintArgs {
    /// Country dataset to lint [default: norway].
    #[arg(long, value_name = "NAME")]
    pub country: Option<String>,

    /// Directory containing the country datasets [default: nearest
    /// `countries/` directory at or above the working directory].
    #[arg(long, value_name = "PATH")]
    pub countries_root: Option<PathBuf>,

    /// Lint configuration file (YAML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Fully resolved inputs of a lint run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintTarget {
    /// Directory containing the country datasets.
    pub countries_root: PathBuf,
    /// Country dataset to lint.
    pub country: String,
    /// Policy for the checks.
    pub policy: LintPolicy,
}

impl LintTarget {
    /// Merge flags, configuration file, and defaults.
    ///
    /// Relative paths given on the command line are resolved against `cwd`.
    pub fn resolve(args: &LintArgs, cwd: &Path) -> Result<Self> {
        let config = match &args.config {
            Some(path) => {
                let path = resolve_path(path, cwd);
                LintConfig::load(&path)
                    .with_context(|| format!("failed to load lint configuration {}", path.display()))?
            }
            None => LintConfig::default(),
        };

        let countries_root = match (&args.countries_root, config.countries_root) {
            (Some(flag), _) => resolve_path(flag, cwd),
            (None, Some(from_config)) => from_config,
            (None, None) => resolve_countries_root(cwd),
        };
        let country = args
            .country
            .clone()
            .or(config.country)
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

        Ok(Self {
            countries_root,
            country,
            policy: config.policy,
        })
    }
}

/// Execute a lint run, printing to the process's stdout and stderr.
///
/// Returns exit code: 0 when clean, 1 when violations were found. Fatal
/// errors are returned as `Err`.
pub fn run_lint(args: &LintArgs, cwd: &Path) -> Result<u8> {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    lint_to(args, cwd, &mut stdout.lock(), &mut stderr.lock())
}

/// Execute a lint run, writing the report to the given streams.
pub fn lint_to(
    args: &LintArgs,
    cwd: &Path,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    let target = LintTarget::resolve(args, cwd)?;
    tracing::info!(
        countries_root = %target.countries_root.display(),
        country = %target.country,
        "linting dataset"
    );

    let report = SchemaValidator::new(target.policy)
        .run(&target.countries_root, &target.country)
        .with_context(|| format!("cannot lint country '{}'", target.country))?;

    write_report(&report, args.format, out, err)?;
    Ok(report.exit_code())
}

fn write_report(
    report: &Report,
    format: OutputFormat,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = report.to_json().context("failed to serialize report")?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Text if report.is_clean() => write!(out, "{}", report.render_text())?,
        OutputFormat::Text => write!(err, "{}", report.render_text())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdiv_core::HdivError;

    fn write_country(root: &Path, files: &[(&str, &str)]) {
        for (name, content) in files {
            let path = root.join("countries/norway").join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
    }

    fn lint(args: &LintArgs, cwd: &Path) -> (Result<u8>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = lint_to(args, cwd, &mut out, &mut err);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn clean_dataset_prints_ok_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        write_country(dir.path(), &[("a.yaml", "divisions:\n  - id: A\n  - {id: B, parent: A}\n")]);
        let (code, out, err) = lint(&LintArgs::default(), dir.path());
        assert_eq!(code.unwrap(), 0);
        assert!(out.starts_with("OK: 2 divisions validated in"), "{out}");
        assert!(err.is_empty());
    }

    #[test]
    fn violations_go_to_stderr_with_exit_1() {
        let dir = tempfile::tempdir().unwrap();
        write_country(dir.path(), &[("a.yaml", "divisions:\n  - {id: B, parent: GONE}\n")]);
        let (code, out, err) = lint(&LintArgs::default(), dir.path());
        assert_eq!(code.unwrap(), 1);
        assert!(out.is_empty());
        assert!(err.starts_with("Schema lint found issues:"));
        assert!(err.contains("parent 'GONE' not found in dataset"));
    }

    #[test]
    fn json_format_goes_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        write_country(dir.path(), &[("a.yaml", "divisions:\n  - {id: B, parent: GONE}\n")]);
        let args = LintArgs {
            format: OutputFormat::Json,
            ..LintArgs::default()
        };
        let (code, out, err) = lint(&args, dir.path());
        assert_eq!(code.unwrap(), 1);
        assert!(err.is_empty());
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["counts"]["dangling-parent"], 1);
    }

    #[test]
    fn missing_country_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("countries")).unwrap();
        let args = LintArgs {
            country: Some("atlantis".to_string()),
            ..LintArgs::default()
        };
        let (result, _, _) = lint(&args, dir.path());
        let e = result.unwrap_err();
        assert!(matches!(
            e.downcast_ref::<HdivError>(),
            Some(HdivError::DatasetNotFound { .. })
        ));
    }

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lint.yaml"),
            "countries_root: elsewhere\ncountry: sweden\npolicy:\n  require_parent: true\n",
        )
        .unwrap();
        let args = LintArgs {
            country: Some("norway".to_string()),
            config: Some(PathBuf::from("lint.yaml")),
            ..LintArgs::default()
        };
        let target = LintTarget::resolve(&args, dir.path()).unwrap();
        assert_eq!(target.country, "norway");
        assert_eq!(target.countries_root, dir.path().join("elsewhere"));
        assert!(target.policy.require_parent);
    }

    #[test]
    fn config_policy_applies() {
        let dir = tempfile::tempdir().unwrap();
        write_country(dir.path(), &[("a.yaml", "divisions:\n  - {id: NO-03, parent: NO}\n")]);
        std::fs::write(
            dir.path().join("lint.yaml"),
            "policy:\n  root_parents: [NO]\n",
        )
        .unwrap();
        let args = LintArgs {
            config: Some(dir.path().join("lint.yaml")),
            ..LintArgs::default()
        };
        let (code, _, _) = lint(&args, dir.path());
        assert_eq!(code.unwrap(), 0);
    }

    #[test]
    fn bad_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lint.yaml"), "policy: [oops]\n").unwrap();
        let args = LintArgs {
            config: Some(PathBuf::from("lint.yaml")),
            ..LintArgs::default()
        };
        let (result, _, _) = lint(&args, dir.path());
        let e = result.unwrap_err();
        assert!(matches!(
            e.downcast_ref::<HdivError>(),
            Some(HdivError::Config { .. })
        ));
    }
}
