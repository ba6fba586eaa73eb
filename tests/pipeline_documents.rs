//! End-to-end tests over whole documents: lexing round trips, LaTeX output,
//! macro collection, and fatality handling.

use mtex::render::RenderOptions;
use mtex::{convert, detokenize, has_fatal, lex};
use pretty_assertions::assert_eq;

const DOCUMENT: &str = "\
# Intro

Some **bold** and *italic* text with $x^2$ inline,
a [link](https://example.org) and a reference to @eq1 below.

macro greet name = { Hello name }

TEX <<< eq
\\begin{equation}\\label{eq1} x = 1 \\end{equation}
eq

## Lists

- first
- second

1. one
2. two
";

#[test]
fn document_lexes_without_diagnostics_and_round_trips() {
    let output = lex(DOCUMENT);
    assert_eq!(output.diagnostics, vec![]);
    assert_eq!(detokenize(&output.tokens), DOCUMENT);
}

#[test]
fn document_converts_to_the_expected_latex_fragments() {
    let output = convert(DOCUMENT, &RenderOptions::default());
    assert_eq!(output.diagnostics, vec![]);

    let latex = &output.latex;
    assert!(latex.contains("\\section{Intro}\n"));
    assert!(latex.contains("\\textbf{bold}"));
    assert!(latex.contains("\\textit{italic}"));
    assert!(latex.contains("$x^2$"));
    assert!(latex.contains("\\href{https://example.org}{link}"));
    assert!(latex.contains("\\ref{eq1}"));
    assert!(latex.contains("\\begin{equation}\\label{eq1} x = 1 \\end{equation}"));
    assert!(latex.contains("\\subsection{Lists}\n"));
    assert!(latex.contains("\\begin{itemize}\n\\item first\n\\item second\n\\end{itemize}"));
    assert!(latex.contains("\\begin{enumerate}\n\\item one\n\\item two\n\\end{enumerate}"));
}

#[test]
fn document_collects_its_macro_definitions() {
    let output = convert(DOCUMENT, &RenderOptions::default());
    assert_eq!(output.macro_defs.len(), 1);
    assert_eq!(output.macro_defs[0].name, "greet");
    assert_eq!(output.macro_defs[0].params, vec!["name".to_string()]);
    assert_eq!(output.macro_defs[0].body, "Hello name");
}

#[test]
fn small_document_converts_exactly() {
    let output = convert("# T\n\na **b** c\n", &RenderOptions::default());
    assert_eq!(output.diagnostics, vec![]);
    assert_eq!(output.latex, "\\section{T}\n\na \\textbf{b} c\n\n");
}

#[test]
fn standalone_mode_wraps_the_document() {
    let output = convert("hello\n", &RenderOptions { standalone: true });
    assert!(output.latex.starts_with("\\documentclass{article}\n"));
    assert!(output.latex.contains("\\usepackage[normalem]{ulem}\n"));
    assert!(output.latex.ends_with("\\end{document}\n"));
    assert!(output.latex.contains("hello\n"));
}

#[test]
fn recovered_problems_still_produce_output() {
    let output = convert("an $unterminated formula", &RenderOptions::default());
    assert_eq!(output.diagnostics.len(), 1);
    assert!(!has_fatal(&output.diagnostics));
    assert_eq!(output.latex, "an $unterminated formula\n\n");
}

#[test]
fn fatal_problems_are_reported_but_conversion_completes() {
    let output = convert("ok \u{1} text", &RenderOptions::default());
    assert!(has_fatal(&output.diagnostics));
    // the surrounding text still rendered; the caller decides what to do
    assert!(output.latex.contains("ok"));
    assert!(output.latex.contains("text"));
}

#[test]
fn comments_never_reach_the_output() {
    let output = convert("keep this % but not this\n", &RenderOptions::default());
    assert_eq!(output.diagnostics, vec![]);
    assert_eq!(output.latex, "keep this\n\n");
}

#[test]
fn empty_source_renders_nothing() {
    let output = convert("", &RenderOptions::default());
    assert_eq!(output.latex, "");
    assert_eq!(output.diagnostics, vec![]);
    assert_eq!(output.macro_defs, vec![]);
}
