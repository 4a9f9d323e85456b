/// `SourceLines` - Reads physical Fortran lines and lexes each one
///
/// This module handles:
/// - Reading physical lines and stripping line terminators
/// - Masking string and comment regions while keeping byte offsets
/// - Detecting trailing `&` continuation markers
/// - Multiline strings (carrying string state across `&` continuations)
/// - Recovering from unterminated strings
use std::io::{self, BufRead, BufReader};

use super::char_filter::{CharFilter, LexState};

/// A physical Fortran line with its lexed code view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number
    pub number: usize,
    /// The original text, without the line terminator
    pub text: String,
    /// The text with string and comment bytes replaced by spaces
    pub code: String,
    /// Whether the line ends with `&` outside a comment (or inside a continued string)
    pub continued: bool,
    /// Whether the line began inside a string continued from the previous line
    pub starts_in_string: bool,
    /// 1-based column of a quote that was never closed on this line
    pub unterminated_string: Option<usize>,
}

impl SourceLine {
    /// Lex `text` as line `number`, starting in `carry` state
    ///
    /// Returns the line and the state the next line starts in.
    #[must_use]
    pub fn lex(number: usize, text: &str, carry: LexState) -> (Self, LexState) {
        let lexed = lex_line(text, carry);
        let line = SourceLine {
            number,
            text: text.to_string(),
            code: lexed.code,
            continued: lexed.continued,
            starts_in_string: carry.in_string(),
            unterminated_string: lexed
                .unterminated
                .map(|pos| text[..pos].chars().count() + 1),
        };
        (line, lexed.carry)
    }

    /// Whether the line has no code at all (blank or comment-only)
    #[must_use]
    pub fn is_code_blank(&self) -> bool {
        self.code.trim().is_empty()
    }
}

/// Result of lexing one physical line
struct LexedLine {
    code: String,
    continued: bool,
    carry: LexState,
    unterminated: Option<usize>,
}

/// Lex one line, blanking strings and comments
///
/// An unterminated string is reported once per line; the unmatched quote is
/// then treated as code and lexing restarts right after it.
fn lex_line(text: &str, carry: LexState) -> LexedLine {
    let mut mask = vec![b' '; text.len()];
    let mut state = carry;
    let mut start = 0;
    let mut unterminated = None;

    if state.in_string() {
        // A continued string resumes after the leading `&`, if any
        let trimmed = text.trim_start();
        if trimmed.starts_with('&') {
            start = text.len() - trimmed.len() + 1;
        }
    }

    loop {
        let mut filter = CharFilter::starting_at(text, start, state);
        for (pos, c) in filter.by_ref() {
            c.encode_utf8(&mut mask[pos..pos + c.len_utf8()]);
        }

        let end_state = filter.state();
        if !end_state.in_string() {
            let code = String::from_utf8_lossy(&mask).into_owned();
            let continued = code.trim_end().ends_with('&');
            return LexedLine {
                code,
                continued,
                carry: LexState::Code,
                unterminated,
            };
        }

        if text.trim_end().ends_with('&') {
            return LexedLine {
                code: String::from_utf8_lossy(&mask).into_owned(),
                continued: true,
                carry: end_state,
                unterminated,
            };
        }

        let open = filter.string_start();
        unterminated.get_or_insert(open.unwrap_or(start));
        if let Some(quote) = open {
            // Quotes are ASCII, so the quote occupies exactly one byte
            mask[quote] = text.as_bytes()[quote];
            start = quote + 1;
        }
        state = LexState::Code;
    }
}

/// `SourceLines` reads physical lines from a reader
///
/// Each line is lexed as it is read; string state carries over lines that
/// end inside a string with `&`.
pub struct SourceLines<R: BufRead> {
    reader: R,
    line_number: usize,
    carry: LexState,
    buffer: String,
}

impl<R: BufRead> SourceLines<R> {
    /// Create a new `SourceLines`
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            carry: LexState::Code,
            buffer: String::new(),
        }
    }

    /// Get the number of the last line read
    pub fn get_line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for SourceLines<R> {
    type Item = io::Result<SourceLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                if self.buffer.ends_with('\n') {
                    self.buffer.pop();
                    if self.buffer.ends_with('\r') {
                        self.buffer.pop();
                    }
                }
                let (line, carry) = SourceLine::lex(self.line_number, &self.buffer, self.carry);
                self.carry = carry;
                Some(Ok(line))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Helper to create `SourceLines` from a string
impl<'a> SourceLines<BufReader<&'a [u8]>> {
    #[must_use]
    pub fn from_string(s: &'a str) -> Self {
        Self::new(BufReader::new(s.as_bytes()))
    }
}
