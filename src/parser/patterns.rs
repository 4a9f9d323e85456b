/// Regex patterns for Fortran syntax
///
/// All patterns are compiled once at first use via `LazyLock`.
///
/// All regexes use case-insensitive + unicode flags
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Build a case-insensitive regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. This is acceptable because all patterns
/// in this module are compile-time constants that are verified by tests.
/// The panic occurs at first access of the `LazyLock` static.
fn build_re(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .unicode(true)
        .build()
        .unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

/// A dotted word such as `.eq.`, `.and.`, `.true.` or a user-defined `.cross.`
///
/// Matches are taken left to right without overlap, so the closing dot of
/// one dotted word can never open the next one.
pub static DOTTED_WORD_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\.([a-z]+)\."));
