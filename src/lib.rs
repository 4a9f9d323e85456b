//! f90ops - Checker for legacy Fortran relational operators
//!
//! Reports `.eq.`, `.ne.`, `.lt.`, `.le.`, `.gt.` and `.ge.` in free-form
//! Fortran source and optionally rewrites them to `==`, `/=`, `<`, `<=`, `>`
//! and `>=`. Operators inside string literals and comments are ignored.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod format;
pub mod parser;
pub mod process;
pub mod scan;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use directive::{find_directive, parse_directive, DirectiveOverrides};
pub use error::{Result, ScanError, ScanWarning};
pub use format::{apply_fixes, fix_source, render_finding, render_warning};
pub use scan::{Finding, LegacyOperator, OperatorSet, ScanReport, Scanner};
