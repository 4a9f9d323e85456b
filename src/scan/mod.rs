//! Legacy relational operator detection.
//!
//! - [`LegacyOperator`] / [`OperatorSet`]: the six dotted operators and which of them to report
//! - [`Scanner`]: matches operators in the code portion of each physical line
//! - [`Findings`]: lazy iterator over a reader's findings, with warnings on the side
//! - [`ScanState`]: tracks open `&` continuations between lines
//!
//! Every physical line is scanned on its own. Continuations never merge
//! lines; they only matter for string state and for the end-of-input check.

pub mod finding;
pub mod operator;
pub mod scanner;

pub use finding::{Finding, ScanReport};
pub use operator::{LegacyOperator, OperatorParseError, OperatorSet};
pub use scanner::{Findings, ScanState, Scanner};
