//! Inline directive parsing for `! f90ops:` comments
//!
//! Supports in-file configuration overrides via special comments:
//! `! f90ops: --operators eq,ne --no-warnings`

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::Config;
use crate::scan::OperatorSet;

/// Pattern to match f90ops directives
static F90OPS_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*!\s*f90ops:\s*(.*?)\s*$").unwrap());

/// Parsed directive options that can override config
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveOverrides {
    pub operators: Option<OperatorSet>,
    pub enabled: Option<bool>,
    pub warnings: Option<bool>,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operators.is_none() && self.enabled.is_none() && self.warnings.is_none()
    }

    /// Apply the overrides to `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(operators) = self.operators {
            debug!(?operators, "directive override: operators");
            config.set_operators(operators);
        }
        if let Some(enabled) = self.enabled {
            debug!(enabled, "directive override: enabled");
            config.enabled = enabled;
        }
        if let Some(warnings) = self.warnings {
            debug!(warnings, "directive override: warnings");
            config.warnings = warnings;
        }
    }
}

/// Check if a line contains an f90ops directive
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    F90OPS_DIRECTIVE_RE.is_match(line)
}

/// Parse an f90ops directive line and return option overrides
///
/// # Returns
/// * `Some(DirectiveOverrides)` if the line is a directive with at least one known option
/// * `None` otherwise
#[must_use]
pub fn parse_directive(line: &str) -> Option<DirectiveOverrides> {
    let caps = F90OPS_DIRECTIVE_RE.captures(line)?;
    let args_str = caps.get(1)?.as_str();

    parse_directive_args(args_str)
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> Option<DirectiveOverrides> {
    let mut overrides = DirectiveOverrides::default();
    let mut tokens = args_str.split_whitespace();

    while let Some(token) = tokens.next() {
        match token {
            "-o" | "--operators" => {
                if let Some(list) = tokens.next() {
                    match list.parse::<OperatorSet>() {
                        Ok(set) if !set.is_empty() => overrides.operators = Some(set),
                        Ok(_) => debug!("directive ignores empty operator list"),
                        Err(e) => debug!("directive ignores operators: {e}"),
                    }
                }
            }
            "--disable" | "off" => {
                overrides.enabled = Some(false);
            }
            "--enable" | "on" => {
                overrides.enabled = Some(true);
            }
            "--no-warnings" => {
                overrides.warnings = Some(false);
            }
            "--warnings" => {
                overrides.warnings = Some(true);
            }
            _ => {
                // Unknown option, skip
            }
        }
    }

    if overrides.is_empty() {
        None
    } else {
        Some(overrides)
    }
}

/// Scan input for f90ops directives and return the first found
///
/// Only the first directive is used (subsequent ones are ignored).
pub fn find_directive<R: std::io::BufRead>(input: &mut R) -> Option<DirectiveOverrides> {
    let mut buffer = String::new();

    while input.read_line(&mut buffer).ok()? > 0 {
        if is_directive_line(&buffer) {
            return parse_directive(&buffer);
        }
        buffer.clear();
    }

    None
}
