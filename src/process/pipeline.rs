//! Check and fix pipeline for a single input
//!
//! - [`config_for_source`]: applies an in-file `! f90ops:` directive to a base config
//! - [`check_file`]: streams a reader through the scanner
//! - [`fix_file`]: scans, rewrites legacy operators and writes the result

use std::io::{BufRead, BufReader, Cursor, Read, Write};

use anyhow::Context;
use tracing::debug;

use crate::config::Config;
use crate::directive::find_directive;
use crate::format::apply_fixes;
use crate::scan::ScanReport;
use crate::Result;

/// Make a per-file copy of `config` with the file's directive applied
#[must_use]
pub fn config_for_source(config: &Config, contents: &[u8], name: &str) -> Config {
    let mut file_config = config.clone();
    let cursor = Cursor::new(contents);
    if let Some(overrides) = find_directive(&mut BufReader::new(cursor)) {
        debug!(file = name, "found f90ops directive");
        overrides.apply(&mut file_config);
    }
    file_config
}

/// Scan one input for legacy operators
///
/// Returns an empty report when the configuration disables checking. Read
/// errors abort the scan of this input.
pub fn check_file<R: BufRead>(reader: R, config: &Config, name: &str) -> Result<ScanReport> {
    if !config.enabled {
        debug!(file = name, "checking disabled");
        return Ok(ScanReport::default());
    }

    let mut report = config
        .scanner()
        .scan_reader(reader)
        .finish()
        .with_context(|| format!("failed to scan {name}"))?;
    if !config.warnings {
        report.warnings.clear();
    }
    debug!(
        file = name,
        findings = report.findings.len(),
        warnings = report.warnings.len(),
        "scanned"
    );
    Ok(report)
}

/// Rewrite the legacy operators of one input
///
/// The fixed text is written to `output`; the returned report lists the
/// replaced operators. A disabled input is copied unchanged.
pub fn fix_file<R: Read, W: Write>(
    mut reader: R,
    output: &mut W,
    config: &Config,
    name: &str,
) -> Result<ScanReport> {
    let mut source = String::new();
    reader
        .read_to_string(&mut source)
        .with_context(|| format!("failed to read {name}"))?;

    if !config.enabled {
        debug!(file = name, "checking disabled, copying input");
        output.write_all(source.as_bytes())?;
        return Ok(ScanReport::default());
    }

    let mut report = config.scanner().check_str(&source);
    let fixed = apply_fixes(&source, &report.findings);
    output.write_all(fixed.as_bytes())?;

    if !config.warnings {
        report.warnings.clear();
    }
    debug!(file = name, fixed = report.findings.len(), "fixed");
    Ok(report)
}
