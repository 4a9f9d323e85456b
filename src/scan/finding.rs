//! Findings and per-input scan reports

use super::operator::LegacyOperator;
use crate::error::ScanWarning;

/// A single legacy operator occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// 1-based line number
    pub line: usize,
    /// 1-based column of the leading dot, in characters
    pub column: usize,
    /// Byte offset of the leading dot within the line
    pub byte_offset: usize,
    pub operator: LegacyOperator,
    /// The token as written in the source, case preserved
    pub text: String,
}

impl Finding {
    /// The modern operator that should replace this token
    #[must_use]
    pub fn replacement(&self) -> &'static str {
        self.operator.modern()
    }

    /// Byte range of the token within its line
    #[must_use]
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.byte_offset..self.byte_offset + self.text.len()
    }
}

/// Everything found in one input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub findings: Vec<Finding>,
    pub warnings: Vec<ScanWarning>,
}

impl ScanReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacement_and_range() {
        let finding = Finding {
            line: 2,
            column: 8,
            byte_offset: 7,
            operator: LegacyOperator::Ne,
            text: ".NE.".to_string(),
        };
        assert_eq!(finding.replacement(), "/=");
        assert_eq!(finding.byte_range(), 7..11);
    }

    #[test]
    fn test_empty_report_is_clean() {
        let report = ScanReport::default();
        assert!(report.is_clean());
    }
}
