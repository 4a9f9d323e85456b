//! Configuration management for f90ops.
//!
//! This module provides the [`Config`] struct which controls what is reported.
//! Configuration can be loaded from:
//! - TOML files (`f90ops.toml`)
//! - CLI arguments (which override file settings)
//! - In-file directives (`! f90ops: --operators eq,ne`)
//!
//! Config files are auto-discovered by searching parent directories from the file
//! being checked up to the filesystem root, plus the user's home directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::scan::{LegacyOperator, OperatorSet, Scanner};

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["f90ops.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    // Try HOME environment variable first (works on Unix and some Windows setups)
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Fallback for Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

/// Main configuration struct for f90ops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Operators to report (default: all six)
    pub operators: Vec<LegacyOperator>,

    /// Report scanner warnings (default: true)
    pub warnings: bool,

    /// Rewrite legacy operators instead of only reporting them (default: false)
    pub fix: bool,

    /// Check files at all (default: true)
    pub enabled: bool,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub operators: Option<Vec<LegacyOperator>>,
    pub warnings: Option<bool>,
    pub fix: Option<bool>,
    pub enabled: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            operators: LegacyOperator::ALL.to_vec(),
            warnings: true,
            fix: false,
            enabled: true,
        }
    }
}

impl Config {
    /// Validate configuration values
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.operators.is_empty() {
            return Some("operators must name at least one operator".to_string());
        }
        None
    }

    /// The configured operators as a set
    #[must_use]
    pub fn operator_set(&self) -> OperatorSet {
        self.operators.iter().copied().collect()
    }

    /// A scanner for the configured operators
    #[must_use]
    pub fn scanner(&self) -> Scanner {
        Scanner::new(self.operator_set())
    }

    /// Replace the operator list
    pub fn set_operators(&mut self, operators: OperatorSet) {
        self.operators = operators.iter().collect();
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = &partial.operators {
            self.operators.clone_from(v);
        }
        if let Some(v) = partial.warnings {
            self.warnings = v;
        }
        if let Some(v) = partial.fix {
            self.fix = v;
        }
        if let Some(v) = partial.enabled {
            self.enabled = v;
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home directory config.
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Home directory config has the lowest priority
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        // Relative paths would stop the ancestor walk at the working directory
        let start_path = std::fs::canonicalize(start_path)
            .or_else(|_| std::path::absolute(start_path))
            .unwrap_or_else(|_| start_path.to_path_buf());
        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.clone())
        } else {
            std::env::current_dir().ok()
        };

        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Root first, nearest directory last
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Unreadable or invalid files are skipped with a warning.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let mut config = Self::default();
        for path in Self::discover_config_files(start_path) {
            debug!(path = %path.display(), "loading config file");
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => warn!("failed to parse {}: {e}", path.display()),
                },
                Err(e) => warn!("failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}
