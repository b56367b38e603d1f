//! Program loader and CLI glue for the LS8 emulator.
//!
//! The core never reads source text; this crate parses the binary-literal
//! program format and drives [`ls8_core`] on its behalf.

/// Binary-literal program source parser.
pub mod parser;
pub use parser::{parse_program, ParseError, ParseErrorKind};

/// Trace-event rendering for the CLI.
pub mod trace;
pub use trace::TraceWriter;

#[cfg(test)]
use tempfile as _;
