//! # Lint Configuration File
//!
//! Optional YAML file selecting the dataset and the lint policy:
//!
//! ```yaml
//! countries_root: ../countries   # relative to this file
//! country: norway
//! policy:
//!   open_bounds: lenient
//!   root_parents: ["NO"]
//! ```
//!
//! Every key is optional. Command-line flags take precedence over the file.

use std::path::{Path, PathBuf};

use hdiv_core::HdivError;
use hdiv_schema::LintPolicy;
use serde::Deserialize;

/// Contents of a lint configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Directory holding the country datasets.
    pub countries_root: Option<PathBuf>,
    /// Country dataset to lint.
    pub country: Option<String>,
    /// Policy for the checks.
    pub policy: LintPolicy,
}

impl LintConfig {
    /// Read and parse a configuration file.
    ///
    /// A relative `countries_root` is resolved against the directory that
    /// contains the file.
    ///
    /// # Errors
    ///
    /// Returns `HdivError::Config` if the file cannot be read or does not
    /// match the expected layout.
    pub fn load(path: &Path) -> Result<Self, HdivError> {
        let config_error = |reason: String| HdivError::Config {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path)
            .map_err(|e| config_error(format!("cannot read file: {e}")))?;
        let mut config: LintConfig = if content.trim().is_empty() {
            LintConfig::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| config_error(e.to_string()))?
        };

        if let Some(root) = config.countries_root.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.countries_root = Some(crate::resolve_path(&root, base));
        }

        tracing::debug!(config = %path.display(), "loaded lint configuration");
        Ok(config)
    }
}
