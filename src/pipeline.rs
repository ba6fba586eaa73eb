//! Conversion pipeline
//!
//! Glues the stages together: lex, parse, render. The pipeline never fails
//! on malformed markup; it returns the rendered output together with the
//! combined diagnostics and leaves the fatality decision to the caller. The
//! only hard errors are serialization problems when a JSON dump was
//! requested.

use crate::ast::MacroDef;
use crate::diagnostics::Diagnostic;
use crate::lexer::lex;
use crate::parser::parse;
use crate::render::{render, RenderOptions};
use std::fmt;

/// What the pipeline should emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Rendered LaTeX (the default).
    Latex,
    /// The token stream as JSON, for tooling and debugging.
    TokensJson,
    /// The parse forest as JSON.
    AstJson,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "latex" => Some(OutputFormat::Latex),
            "tokens-json" => Some(OutputFormat::TokensJson),
            "ast-json" => Some(OutputFormat::AstJson),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum PipelineError {
    UnknownFormat(String),
    Json(serde_json::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::UnknownFormat(name) => {
                write!(f, "unknown output format `{name}` (expected latex, tokens-json or ast-json)")
            }
            PipelineError::Json(err) => write!(f, "failed to serialize output: {err}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Json(err)
    }
}

/// The result of a full markup-to-LaTeX conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOutput {
    pub latex: String,
    pub macro_defs: Vec<MacroDef>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Convert markup source to LaTeX, collecting diagnostics from every stage.
pub fn convert(source: &str, options: &RenderOptions) -> ConvertOutput {
    let lexed = lex(source);
    let parsed = parse(&lexed.tokens);
    let mut diagnostics = lexed.diagnostics;
    diagnostics.extend(parsed.diagnostics);
    ConvertOutput {
        latex: render(&parsed.ast, options),
        macro_defs: parsed.macro_defs,
        diagnostics,
    }
}

/// Pipeline output in the requested format, plus the diagnostics that apply
/// to the stages that ran.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn process(
    source: &str,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<ProcessOutput, PipelineError> {
    match format {
        OutputFormat::Latex => {
            let output = convert(source, options);
            Ok(ProcessOutput {
                text: output.latex,
                diagnostics: output.diagnostics,
            })
        }
        OutputFormat::TokensJson => {
            let lexed = lex(source);
            let text = serde_json::to_string_pretty(&lexed.tokens)?;
            Ok(ProcessOutput {
                text,
                diagnostics: lexed.diagnostics,
            })
        }
        OutputFormat::AstJson => {
            let lexed = lex(source);
            let parsed = parse(&lexed.tokens);
            let mut diagnostics = lexed.diagnostics;
            diagnostics.extend(parsed.diagnostics);
            let text = serde_json::to_string_pretty(&parsed.ast)?;
            Ok(ProcessOutput { text, diagnostics })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_convert_clean_document() {
        let output = convert("# Title\nhello **world**", &RenderOptions::default());
        assert_eq!(output.diagnostics, vec![]);
        assert_eq!(output.latex, "\\section{Title}\n\nhello \\textbf{world}\n\n");
    }

    #[test]
    fn test_convert_collects_macro_defs() {
        let output = convert("macro pi = { 3.14 }", &RenderOptions::default());
        assert_eq!(output.macro_defs.len(), 1);
        assert_eq!(output.macro_defs[0].name, "pi");
    }

    #[test]
    fn test_convert_combines_stage_diagnostics() {
        // lexer warning (unclosed math) plus a clean parse
        let output = convert("$x", &RenderOptions::default());
        assert_eq!(output.diagnostics.len(), 1);
        assert!(!output.diagnostics[0].fatal);
        // the opener degraded to a word and still renders
        assert_eq!(output.latex, "$x\n\n");
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::from_name("latex"), Some(OutputFormat::Latex));
        assert_eq!(
            OutputFormat::from_name("tokens-json"),
            Some(OutputFormat::TokensJson)
        );
        assert_eq!(
            OutputFormat::from_name("ast-json"),
            Some(OutputFormat::AstJson)
        );
        assert_eq!(OutputFormat::from_name("html"), None);
    }

    #[test]
    fn test_tokens_json_dump() {
        let output = process("hi", OutputFormat::TokensJson, &RenderOptions::default()).unwrap();
        assert!(output.text.contains("\"Sof\""));
        assert!(output.text.contains("\"hi\""));
        assert!(output.text.contains("\"Eof\""));
    }

    #[test]
    fn test_ast_json_dump() {
        let output = process("hi", OutputFormat::AstJson, &RenderOptions::default()).unwrap();
        assert!(output.text.contains("\"Paragraph\""));
        assert!(output.text.contains("\"hi\""));
    }

    #[test]
    fn test_unknown_format_error_message() {
        let err = PipelineError::UnknownFormat("html".to_string());
        assert!(err.to_string().contains("`html`"));
    }
}
