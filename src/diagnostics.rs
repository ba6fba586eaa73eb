//! Diagnostics
//!
//! Lexing and parsing never abort on malformed input. Problems are recorded
//! as [`Diagnostic`] values on the side while the pipeline keeps going, and
//! the caller decides what to do with them. Fatal diagnostics mean the output
//! cannot be trusted; non-fatal ones record a recovery (for example an
//! unclosed `$` re-lexed as a plain word).

use crate::position::Position;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// A character the lexer has no rule for.
    UnrecognizedChar,
    /// A character that breaks the shape of a construct being scanned.
    UnexpectedChar,
    /// A delimited sequence that never closed before end of input.
    UnclosedSequence,
    /// A token the parser has no rule for.
    UnrecognizedToken,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::UnrecognizedChar => "unrecognized character",
            DiagnosticKind::UnexpectedChar => "unexpected character",
            DiagnosticKind::UnclosedSequence => "unclosed sequence",
            DiagnosticKind::UnrecognizedToken => "unrecognized token",
        };
        f.write_str(label)
    }
}

/// A single problem found while lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub position: Position,
    /// Fatal diagnostics invalidate the output; non-fatal ones were recovered.
    pub fatal: bool,
    /// What the scanner was looking for when it gave up.
    pub expected: Option<String>,
    /// A suggestion for fixing the source.
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn unrecognized_char(position: Position) -> Self {
        Self {
            kind: DiagnosticKind::UnrecognizedChar,
            position,
            fatal: true,
            expected: None,
            hint: None,
        }
    }

    pub fn unexpected_char(position: Position, expected: &str, hint: &str) -> Self {
        Self {
            kind: DiagnosticKind::UnexpectedChar,
            position,
            fatal: false,
            expected: Some(expected.to_string()),
            hint: Some(hint.to_string()),
        }
    }

    pub fn unclosed_sequence(position: Position, expected: &str, hint: &str) -> Self {
        Self {
            kind: DiagnosticKind::UnclosedSequence,
            position,
            fatal: false,
            expected: Some(expected.to_string()),
            hint: Some(hint.to_string()),
        }
    }

    pub fn unrecognized_token(position: Position) -> Self {
        Self {
            kind: DiagnosticKind::UnrecognizedToken,
            position,
            fatal: true,
            expected: None,
            hint: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = if self.fatal { "error" } else { "warning" };
        write!(f, "{}: {} at {}", severity, self.kind, self.position)?;
        if let Some(expected) = &self.expected {
            write!(f, ": expected {}", expected)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " ({})", hint)?;
        }
        Ok(())
    }
}

/// Whether any diagnostic in the list invalidates the output.
pub fn has_fatal(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.fatal)
}

// ============================================================================
// Tests
// ============================================================================
