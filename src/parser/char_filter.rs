/// `CharFilter` - Iterator that yields only the code characters of a line
///
/// This is the lexer state machine at the heart of the scanner. It walks a
/// single physical line and tracks whether each character is plain code,
/// part of a single- or double-quoted string, or part of a trailing `!`
/// comment. Only code characters are yielded, each with its byte position
/// in the original line, so callers can match operators against code while
/// still reporting positions relative to the unstripped text.

/// Lexer state for the current character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexState {
    #[default]
    Code,
    SingleQuote, // '...'
    DoubleQuote, // "..."
    Comment,     // ! ... to end of line
}

impl LexState {
    /// Whether this state is inside a string literal
    #[must_use]
    pub fn in_string(self) -> bool {
        matches!(self, LexState::SingleQuote | LexState::DoubleQuote)
    }

    /// The quote character that closes the current string
    #[must_use]
    pub fn closing_quote(self) -> Option<char> {
        match self {
            LexState::SingleQuote => Some('\''),
            LexState::DoubleQuote => Some('"'),
            LexState::Code | LexState::Comment => None,
        }
    }
}

/// Iterator adapter that filters out strings and comments
///
/// Yields (position, character) pairs for only the actual Fortran code.
/// Quote characters belong to their string and `!` belongs to its comment,
/// so neither is yielded. A doubled quote inside a string (`'it''s'`)
/// closes and immediately reopens the string, which keeps the contents
/// filtered.
pub struct CharFilter<'a> {
    chars: std::str::CharIndices<'a>,
    base: usize,
    state: LexState,
    string_start: Option<usize>,
}

impl<'a> CharFilter<'a> {
    /// Create a `CharFilter` over a whole line, starting in code
    #[must_use]
    pub fn new(content: &'a str) -> Self {
        Self::with_state(content, LexState::Code)
    }

    /// Create a `CharFilter` with an initial state
    ///
    /// Used for lines that begin inside a string continued from the
    /// previous line.
    #[must_use]
    pub fn with_state(content: &'a str, state: LexState) -> Self {
        Self::starting_at(content, 0, state)
    }

    /// Create a `CharFilter` that starts lexing at byte `start` of `content`
    ///
    /// Yielded positions stay relative to the start of `content`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not on a char boundary of `content`.
    #[must_use]
    pub fn starting_at(content: &'a str, start: usize, state: LexState) -> Self {
        Self {
            chars: content[start..].char_indices(),
            base: start,
            state,
            string_start: None,
        }
    }

    /// Check if we're currently inside a string
    #[must_use]
    pub fn instring(&self) -> bool {
        self.state.in_string()
    }

    /// Current lexer state
    #[must_use]
    pub fn state(&self) -> LexState {
        self.state
    }

    /// Byte position of the quote that opened the current string
    ///
    /// `None` when not in a string, or when the string was already open at
    /// the first character this filter saw.
    #[must_use]
    pub fn string_start(&self) -> Option<usize> {
        self.string_start
    }

    /// Get the filtered content as a string
    pub fn filter_all(&mut self) -> String {
        let mut result = String::with_capacity(self.chars.size_hint().0);
        for (_, c) in self.by_ref() {
            result.push(c);
        }
        result
    }
}

impl Iterator for CharFilter<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        // A comment runs to the end of the line
        if self.state == LexState::Comment {
            return None;
        }

        for (offset, c) in self.chars.by_ref() {
            let pos = self.base + offset;
            match self.state {
                LexState::Code => match c {
                    '!' => {
                        self.state = LexState::Comment;
                        return None;
                    }
                    '\'' => {
                        self.state = LexState::SingleQuote;
                        self.string_start = Some(pos);
                    }
                    '"' => {
                        self.state = LexState::DoubleQuote;
                        self.string_start = Some(pos);
                    }
                    _ => return Some((pos, c)),
                },
                LexState::SingleQuote | LexState::DoubleQuote => {
                    if Some(c) == self.state.closing_quote() {
                        self.state = LexState::Code;
                        self.string_start = None;
                    }
                }
                LexState::Comment => return None,
            }
        }

        None
    }
}
