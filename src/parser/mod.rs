//! Fortran source lexing utilities.
//!
//! This module provides the infrastructure for reading and lexing Fortran source:
//! - [`CharFilter`]: Lexer state machine that separates code from strings and comments
//! - [`SourceLines`]: Reads physical lines, masks strings/comments, tracks `&` continuations
//! - [`patterns`]: Precompiled regex patterns for Fortran syntax elements
//!
//! Lines are never joined. Each physical line keeps its own number and a
//! masked copy of its code, so positions found in the mask are positions in
//! the original text.

pub mod char_filter;
pub mod patterns;
pub mod stream;

pub use char_filter::{CharFilter, LexState};
pub use stream::{SourceLine, SourceLines};
