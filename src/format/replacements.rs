//! Relational operator replacement for Fortran code
//!
//! Rewrites Fortran 77 relational operators (.lt., .le., .gt., .ge., .eq., .ne.)
//! to their Fortran 90 forms (<, <=, >, >=, ==, /=) at the positions the
//! scanner reported. Everything else, including line terminators, is copied
//! through unchanged.

use tracing::debug;

use crate::scan::{Finding, OperatorSet, ScanReport, Scanner};

/// Replace the reported operators in `source`
///
/// `findings` must come from scanning `source` and be in scan order. A
/// finding whose token no longer matches the text at its position is
/// skipped.
#[must_use]
pub fn apply_fixes(source: &str, findings: &[Finding]) -> String {
    let mut result = String::with_capacity(source.len());
    let mut pending = findings.iter().peekable();

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let number = index + 1;
        let mut copied = 0;

        // Out-of-order findings cannot be applied
        while pending.next_if(|f| f.line < number).is_some() {}

        while let Some(finding) = pending.next_if(|f| f.line == number) {
            let range = finding.byte_range();
            if range.start < copied || line.get(range.clone()) != Some(finding.text.as_str()) {
                debug!(
                    line = number,
                    column = finding.column,
                    "stale finding, leaving text as is"
                );
                continue;
            }
            result.push_str(&line[copied..range.start]);
            result.push_str(finding.replacement());
            copied = range.end;
        }

        result.push_str(&line[copied..]);
    }

    result
}

/// Scan `source` and replace every legacy operator in `operators`
///
/// Returns the fixed text and the report of what was replaced.
#[must_use]
pub fn fix_source(source: &str, operators: OperatorSet) -> (String, ScanReport) {
    let report = Scanner::new(operators).check_str(source);
    let fixed = apply_fixes(source, &report.findings);
    (fixed, report)
}
