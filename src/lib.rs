//! mtex: a lightweight plain-text markup to LaTeX converter
//!
//! The pipeline has three stages:
//!
//! 1. [`lexer::lex`] walks the source with a backtracking character cursor
//!    and produces a flat token stream. Tokens keep the whitespace that
//!    followed them, so spacing survives into the output.
//! 2. [`parser::parse`] builds a forest of paragraphs, headings, lists,
//!    emphasis spans, links and images from the tokens. Malformed markup
//!    degrades structurally: unclosed constructs collapse back into the
//!    literal words the author typed.
//! 3. [`render::render`] maps the forest to LaTeX source, optionally wrapped
//!    in a standalone document preamble.
//!
//! Problems at any stage are collected as [`diagnostics::Diagnostic`] values
//! rather than errors; the pipeline always runs to completion and the caller
//! decides how to present them. [`pipeline::convert`] ties the stages
//! together.

pub mod ast;
pub mod cursor;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod position;
pub mod render;
pub mod token;

pub use ast::{Branch, BranchKind, Leaf, LeafKind, MacroDef, Node};
pub use diagnostics::{has_fatal, Diagnostic, DiagnosticKind};
pub use lexer::{lex, LexerOutput};
pub use parser::{parse, ParserOutput};
pub use pipeline::{convert, process, ConvertOutput, OutputFormat, PipelineError, ProcessOutput};
pub use position::Position;
pub use render::{render, RenderOptions};
pub use token::{detokenize, Token, TokenKind};
