//! Source parser for the LS8 binary-literal program format.
//!
//! A program is a sequence of lines, each holding an 8-bit value written in
//! binary digits, optionally followed by a `#` comment to end of line;
//! blank and comment-only lines are ignored.

use std::fmt;

/// A parse failure with its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-indexed line number of the offending line.
    pub line: usize,
    /// The kind of failure.
    pub kind: ParseErrorKind,
}

/// Classification of program-source parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The line holds characters other than binary digits.
    InvalidBinaryLiteral(String),
    /// The literal is wider than 8 bits.
    ValueOutOfRange(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBinaryLiteral(text) => write!(f, "invalid binary literal '{text}'"),
            Self::ValueOutOfRange(text) => write!(f, "value '{text}' does not fit in 8 bits"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses program source into the flat byte sequence handed to the core.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the 1-indexed line number of the
/// first offending line.
pub fn parse_program(source: &str) -> Result<Vec<u8>, ParseError> {
    let mut program = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let code = line.split_once('#').map_or(line, |(code, _)| code).trim();
        if code.is_empty() {
            continue;
        }

        match u8::from_str_radix(code, 2) {
            Ok(byte) => program.push(byte),
            Err(_) => {
                let kind = if code.bytes().all(|b| matches!(b, b'0' | b'1')) {
                    ParseErrorKind::ValueOutOfRange(code.to_string())
                } else {
                    ParseErrorKind::InvalidBinaryLiteral(code.to_string())
                };
                return Err(ParseError {
                    line: index + 1,
                    kind,
                });
            }
        }
    }

    Ok(program)
}
