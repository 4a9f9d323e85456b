//! Output side of the checker.
//!
//! - [`replacements`]: rewrites legacy operators to their modern forms (`--fix`)
//! - [`report`]: renders findings and warnings as `path:line:column:` lines

pub mod replacements;
pub mod report;

pub use replacements::{apply_fixes, fix_source};
pub use report::{render_finding, render_warning, write_findings, write_warnings};
