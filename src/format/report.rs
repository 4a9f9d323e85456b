//! Text rendering of findings and warnings
//!
//! One line per item, prefixed with `<path>:<line>:<column>:` so editors and
//! CI logs can jump to the location.

use std::io::{self, Write};

use crate::error::ScanWarning;
use crate::scan::{Finding, ScanReport};

/// Render one finding
///
/// `<path>:<line>:<column>: legacy operator '<token>' should be '<replacement>'`
#[must_use]
pub fn render_finding(path: &str, finding: &Finding) -> String {
    format!(
        "{path}:{}:{}: legacy operator '{}' should be '{}'",
        finding.line,
        finding.column,
        finding.text,
        finding.replacement()
    )
}

/// Render one warning
#[must_use]
pub fn render_warning(path: &str, warning: &ScanWarning) -> String {
    match warning.column() {
        Some(column) => format!("{path}:{}:{column}: warning: {warning}", warning.line()),
        None => format!("{path}:{}: warning: {warning}", warning.line()),
    }
}

/// Write every finding of `report`, one per line
pub fn write_findings<W: Write>(out: &mut W, path: &str, report: &ScanReport) -> io::Result<()> {
    for finding in &report.findings {
        writeln!(out, "{}", render_finding(path, finding))?;
    }
    Ok(())
}

/// Write every warning of `report`, one per line
pub fn write_warnings<W: Write>(out: &mut W, path: &str, report: &ScanReport) -> io::Result<()> {
    for warning in &report.warnings {
        writeln!(out, "{}", render_warning(path, warning))?;
    }
    Ok(())
}
