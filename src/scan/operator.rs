//! Legacy relational operators and operator sets
//!
//! Fortran 77 spells comparisons as dotted words (`.lt.`, `.le.`, `.gt.`,
//! `.ge.`, `.eq.`, `.ne.`); Fortran 90 added the symbolic forms
//! (`<`, `<=`, `>`, `>=`, `==`, `/=`).

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// One of the six legacy relational operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum LegacyOperator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// Error for an unrecognised operator name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown relational operator '{0}' (expected one of: lt, le, gt, ge, eq, ne)")]
pub struct OperatorParseError(pub String);

impl LegacyOperator {
    /// All operators, in bit order
    pub const ALL: [LegacyOperator; 6] = [
        LegacyOperator::Lt,
        LegacyOperator::Le,
        LegacyOperator::Gt,
        LegacyOperator::Ge,
        LegacyOperator::Eq,
        LegacyOperator::Ne,
    ];

    /// The dotted Fortran 77 spelling, lowercase
    #[must_use]
    pub fn legacy(self) -> &'static str {
        match self {
            LegacyOperator::Lt => ".lt.",
            LegacyOperator::Le => ".le.",
            LegacyOperator::Gt => ".gt.",
            LegacyOperator::Ge => ".ge.",
            LegacyOperator::Eq => ".eq.",
            LegacyOperator::Ne => ".ne.",
        }
    }

    /// The symbolic Fortran 90 spelling
    #[must_use]
    pub fn modern(self) -> &'static str {
        match self {
            LegacyOperator::Lt => "<",
            LegacyOperator::Le => "<=",
            LegacyOperator::Gt => ">",
            LegacyOperator::Ge => ">=",
            LegacyOperator::Eq => "==",
            LegacyOperator::Ne => "/=",
        }
    }

    /// Look up the operator named by the letters between the dots
    ///
    /// Case-insensitive; `"GE"` and `"ge"` both give [`LegacyOperator::Ge`].
    #[must_use]
    pub fn from_letters(letters: &str) -> Option<Self> {
        match letters.to_ascii_lowercase().as_str() {
            "lt" => Some(LegacyOperator::Lt),
            "le" => Some(LegacyOperator::Le),
            "gt" => Some(LegacyOperator::Gt),
            "ge" => Some(LegacyOperator::Ge),
            "eq" => Some(LegacyOperator::Eq),
            "ne" => Some(LegacyOperator::Ne),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for LegacyOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.legacy())
    }
}

impl FromStr for LegacyOperator {
    type Err = OperatorParseError;

    /// Accepts `ge`, `.ge.` (any case) or the modern `>=`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(op) = LegacyOperator::ALL
            .into_iter()
            .find(|op| op.modern() == trimmed)
        {
            return Ok(op);
        }
        let letters = trimmed
            .strip_prefix('.')
            .and_then(|t| t.strip_suffix('.'))
            .unwrap_or(trimmed);
        LegacyOperator::from_letters(letters).ok_or_else(|| OperatorParseError(s.to_string()))
    }
}

impl TryFrom<String> for LegacyOperator {
    type Error = OperatorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The set of legacy operators to report
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorSet(u8);

impl OperatorSet {
    /// No operators
    #[must_use]
    pub const fn empty() -> Self {
        OperatorSet(0)
    }

    /// All six operators
    #[must_use]
    pub const fn all() -> Self {
        OperatorSet(0b11_1111)
    }

    #[must_use]
    pub fn contains(self, op: LegacyOperator) -> bool {
        self.0 & op.bit() != 0
    }

    pub fn insert(&mut self, op: LegacyOperator) {
        self.0 |= op.bit();
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the members in a fixed order (lt, le, gt, ge, eq, ne)
    pub fn iter(self) -> impl Iterator<Item = LegacyOperator> {
        LegacyOperator::ALL
            .into_iter()
            .filter(move |op| self.contains(*op))
    }
}

impl Default for OperatorSet {
    fn default() -> Self {
        OperatorSet::all()
    }
}

impl fmt::Debug for OperatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(LegacyOperator::legacy)).finish()
    }
}

impl FromIterator<LegacyOperator> for OperatorSet {
    fn from_iter<T: IntoIterator<Item = LegacyOperator>>(iter: T) -> Self {
        let mut set = OperatorSet::empty();
        for op in iter {
            set.insert(op);
        }
        set
    }
}

impl FromStr for OperatorSet {
    type Err = OperatorParseError;

    /// Parse a comma-separated list such as `ge,le,.eq.`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<LegacyOperator>)
            .collect()
    }
}
