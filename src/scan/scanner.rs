//! The operator scanner
//!
//! [`Scanner`] matches legacy operators against the masked code of each
//! physical line. [`Findings`] drives it lazily over a reader, one line at a
//! time, and collects warnings on the side.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, trace};

use super::finding::{Finding, ScanReport};
use super::operator::{LegacyOperator, OperatorSet};
use crate::error::{ScanError, ScanWarning};
use crate::parser::patterns::DOTTED_WORD_RE;
use crate::parser::{SourceLine, SourceLines};

/// Scans Fortran source for legacy relational operators
#[derive(Debug, Clone, Copy, Default)]
pub struct Scanner {
    operators: OperatorSet,
}

impl Scanner {
    #[must_use]
    pub fn new(operators: OperatorSet) -> Self {
        Self { operators }
    }

    /// The operators this scanner reports
    #[must_use]
    pub fn operators(&self) -> OperatorSet {
        self.operators
    }

    /// Lazily scan in-memory text
    ///
    /// Each call starts again from the first line.
    #[must_use]
    pub fn scan_str<'a>(&self, text: &'a str) -> Findings<BufReader<&'a [u8]>> {
        Findings::new(*self, SourceLines::from_string(text))
    }

    /// Lazily scan a reader
    pub fn scan_reader<R: BufRead>(&self, reader: R) -> Findings<R> {
        Findings::new(*self, SourceLines::new(reader))
    }

    /// Scan in-memory text to completion
    #[must_use]
    pub fn check_str(&self, text: &str) -> ScanReport {
        let mut findings = self.scan_str(text);
        let collected: Vec<Finding> = findings.by_ref().collect();
        ScanReport {
            findings: collected,
            warnings: findings.into_warnings(),
        }
    }

    /// Scan a file to completion
    pub fn scan_path(&self, path: &Path) -> Result<ScanReport, ScanError> {
        let file = File::open(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.scan_reader(BufReader::new(file))
            .finish()
            .map_err(|e| e.with_path(path))
    }

    /// Find the legacy operators in a single lexed line
    ///
    /// Only the masked code is searched, so strings and comments never match.
    #[must_use]
    pub fn scan_line(&self, line: &SourceLine) -> Vec<Finding> {
        let mut findings = Vec::new();
        for caps in DOTTED_WORD_RE.captures_iter(&line.code) {
            let (Some(whole), Some(letters)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(operator) = LegacyOperator::from_letters(letters.as_str()) else {
                continue;
            };
            if !self.operators.contains(operator) {
                continue;
            }
            let start = whole.start();
            findings.push(Finding {
                line: line.number,
                column: line.text[..start].chars().count() + 1,
                byte_offset: start,
                operator,
                text: line.text[whole.range()].to_string(),
            });
        }
        findings
    }
}

/// Continuation bookkeeping across physical lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    open_continuation: Option<usize>,
}

impl ScanState {
    /// Whether the last code line ended with `&`
    #[must_use]
    pub fn in_continuation(&self) -> bool {
        self.open_continuation.is_some()
    }

    /// Line number of the `&` that is still waiting for its next line
    #[must_use]
    pub fn continuation_line(&self) -> Option<usize> {
        self.open_continuation
    }

    /// Update the state with the next physical line
    ///
    /// Blank and comment-only lines leave an open continuation open.
    pub fn advance(&mut self, line: &SourceLine) {
        if line.starts_in_string || !line.is_code_blank() {
            self.open_continuation = line.continued.then_some(line.number);
        }
    }
}

/// Lazy iterator over the findings of one input
///
/// Warnings are collected separately and are complete once the iterator
/// returns `None`. A read error ends the iteration; [`Findings::finish`]
/// surfaces it.
pub struct Findings<R: BufRead> {
    scanner: Scanner,
    lines: SourceLines<R>,
    state: ScanState,
    pending: VecDeque<Finding>,
    warnings: Vec<ScanWarning>,
    error: Option<io::Error>,
    done: bool,
}

impl<R: BufRead> Findings<R> {
    fn new(scanner: Scanner, lines: SourceLines<R>) -> Self {
        Self {
            scanner,
            lines,
            state: ScanState::default(),
            pending: VecDeque::new(),
            warnings: Vec::new(),
            error: None,
            done: false,
        }
    }

    /// Warnings seen so far
    #[must_use]
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Current continuation state
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }

    #[must_use]
    pub fn into_warnings(self) -> Vec<ScanWarning> {
        self.warnings
    }

    /// Drain the remaining findings into a report
    pub fn finish(mut self) -> Result<ScanReport, ScanError> {
        let findings: Vec<Finding> = self.by_ref().collect();
        if let Some(e) = self.error.take() {
            return Err(ScanError::Read(e));
        }
        Ok(ScanReport {
            findings,
            warnings: self.warnings,
        })
    }

    fn observe(&mut self, line: &SourceLine) {
        if let Some(column) = line.unterminated_string {
            debug!(line = line.number, column, "unterminated string literal");
            self.warnings.push(ScanWarning::UnterminatedString {
                line: line.number,
                column,
            });
        }
        let found = self.scanner.scan_line(line);
        if !found.is_empty() {
            trace!(line = line.number, count = found.len(), "legacy operators");
        }
        self.pending.extend(found);
        self.state.advance(line);
    }

    fn end_of_input(&mut self) {
        self.done = true;
        if let Some(line) = self.state.continuation_line() {
            debug!(line, "input ended inside a continuation");
            self.warnings
                .push(ScanWarning::UnterminatedContinuation { line });
        }
    }
}

impl<R: BufRead> Iterator for Findings<R> {
    type Item = Finding;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(finding) = self.pending.pop_front() {
                return Some(finding);
            }
            if self.done {
                return None;
            }
            match self.lines.next() {
                Some(Ok(line)) => self.observe(&line),
                Some(Err(e)) => {
                    debug!(error = %e, "read failed, aborting scan");
                    self.done = true;
                    self.error = Some(e);
                }
                None => self.end_of_input(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<Finding> {
        Scanner::default().scan_str(text).collect()
    }

    #[test]
    fn test_all_six_operators() {
        let found = scan("if (a .ge. b .or. a .le. b .or. a .gt. b .or. a .lt. b .or. a .eq. b .or. a .ne. b) x = 1\n");
        let ops: Vec<LegacyOperator> = found.iter().map(|f| f.operator).collect();
        assert_eq!(
            ops,
            vec![
                LegacyOperator::Ge,
                LegacyOperator::Le,
                LegacyOperator::Gt,
                LegacyOperator::Lt,
                LegacyOperator::Eq,
                LegacyOperator::Ne,
            ]
        );
    }

    #[test]
    fn test_column_is_one_based() {
        let found = scan("if (ib .gt. 5)");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 1);
        assert_eq!(found[0].column, 8);
        assert_eq!(found[0].text, ".gt.");
        assert_eq!(found[0].replacement(), ">");
    }

    #[test]
    fn test_column_counts_characters() {
        let found = scan("x = 'ü' // y; if (a .EQ. b) z = 1");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].column, 21);
        // 'ü' is two bytes wide
        assert_eq!(found[0].byte_offset, 21);
        assert_eq!(found[0].text, ".EQ.");
    }

    #[test]
    fn test_string_contents_ignored() {
        assert!(scan("print *, '.ge.'").is_empty());
        assert!(scan(r#"print *, "a .lt. b""#).is_empty());
    }

    #[test]
    fn test_comment_contents_ignored() {
        assert!(scan("x = 1 ! was: if (a .eq. b)").is_empty());
        assert!(scan("! if (a .ne. b) then").is_empty());
    }

    #[test]
    fn test_modern_operators_not_reported() {
        assert!(scan("if (a >= b .and. c /= d .or. e == f) x = 1").is_empty());
    }

    #[test]
    fn test_other_dotted_words_not_reported() {
        assert!(scan("l = a .eqv. b .neqv. c .and. .not. d .or. .true.").is_empty());
        assert!(scan("x = a .gte. b").is_empty());
    }

    #[test]
    fn test_no_space_operators() {
        let found = scan("if(a.ne.b.and.c.lt.d)x=1");
        let ops: Vec<&str> = found.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(ops, vec![".ne.", ".lt."]);
    }

    #[test]
    fn test_operator_before_logical_constant() {
        let found = scan("if (flag .eq..true.) x = 1");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].operator, LegacyOperator::Eq);
    }

    #[test]
    fn test_operator_subset() {
        let scanner = Scanner::new("eq".parse().unwrap());
        let found: Vec<Finding> = scanner.scan_str("if (a .eq. b .or. a .ne. c) x = 1").collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].operator, LegacyOperator::Eq);
    }

    #[test]
    fn test_continuation_lines_scanned_independently() {
        let text = "if (a .gt. b .and. & ! a <= b\n    & c .eq. d) then\n";
        let found = scan(text);
        assert_eq!(found.len(), 2);
        assert_eq!((found[0].line, found[0].column), (1, 7));
        assert_eq!((found[1].line, found[1].column), (2, 9));
    }

    #[test]
    fn test_findings_strictly_ordered() {
        let text = "a = b .lt. c .or. d .gt. e\nf = g .ge. h\n";
        let found = scan(text);
        let positions: Vec<(usize, usize)> = found.iter().map(|f| (f.line, f.column)).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_unterminated_string_warning_keeps_findings() {
        let text = "if (a .ge. b) print *, 'oops\nif (c .lt. d) x = 1\n";
        let report = Scanner::default().check_str(text);
        assert_eq!(report.findings.len(), 2);
        assert_eq!(
            report.warnings,
            vec![ScanWarning::UnterminatedString { line: 1, column: 24 }]
        );
    }

    #[test]
    fn test_unterminated_continuation_warning() {
        let text = "x = a .eq. b &\n  ! trailing comment\n";
        let report = Scanner::default().check_str(text);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(
            report.warnings,
            vec![ScanWarning::UnterminatedContinuation { line: 1 }]
        );
    }

    #[test]
    fn test_comment_between_continuation_lines() {
        let text = "x = a .eq. b .or. &\n  ! explain\n\n  & c .ne. d\n";
        let report = Scanner::default().check_str(text);
        assert_eq!(report.findings.len(), 2);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_scan_state_tracks_continuation() {
        let mut findings = Scanner::default().scan_str("a = 1 .eq. &\n  & 2\n");
        assert!(findings.next().is_some());
        assert!(findings.state().in_continuation());
        assert_eq!(findings.state().continuation_line(), Some(1));
        assert!(findings.next().is_none());
        assert!(!findings.state().in_continuation());
    }

    #[test]
    fn test_scanning_is_restartable() {
        let text = "if (a .le. b) x = 1\nif (c .ne. d) y = 2\n";
        let scanner = Scanner::default();
        let first: Vec<Finding> = scanner.scan_str(text).collect();
        let second: Vec<Finding> = scanner.scan_str(text).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_read_error_surfaces_from_finish() {
        let bytes: &[u8] = b"x = a .eq. b\n\xff\xfe\n";
        let result = Scanner::default().scan_reader(bytes).finish();
        assert!(matches!(result, Err(ScanError::Read(_))));
    }

    #[test]
    fn test_scan_path_missing_file() {
        let result = Scanner::default().scan_path(Path::new("/nonexistent/dir/file.f90"));
        match result {
            Err(ScanError::Io { path, .. }) => {
                assert_eq!(path, Path::new("/nonexistent/dir/file.f90"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
