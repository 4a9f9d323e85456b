//! Per-input processing.
//!
//! For every input the binary:
//! - reads the contents and applies any `! f90ops:` directive ([`config_for_source`])
//! - either reports legacy operators ([`check_file`]) or rewrites them ([`fix_file`])
//!
//! Both entry points work on any reader, so files and stdin share one path.

pub mod pipeline;

pub use pipeline::{check_file, config_for_source, fix_file};
