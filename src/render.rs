//! LaTeX renderer
//!
//! Turns a parse forest into LaTeX source. Rendering is total over the node
//! kinds: every leaf and branch kind has a mapping, enforced by exhaustive
//! matches, so new kinds fail to compile here instead of silently dropping
//! output. Word spacing comes from the pads the lexer preserved; block
//! structure (paragraphs, sections, lists) is normalized to one construct
//! per line.

use crate::ast::{Branch, BranchKind, Leaf, LeafKind, Node};

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Wrap the output in a `\documentclass` preamble and document
    /// environment.
    pub standalone: bool,
}

/// Render a parse forest to LaTeX.
pub fn render(ast: &[Node], options: &RenderOptions) -> String {
    let body = render_nodes(ast);
    if options.standalone {
        wrap_standalone(&body)
    } else {
        body
    }
}

fn wrap_standalone(body: &str) -> String {
    format!(
        "\\documentclass{{article}}\n\
         \\usepackage{{amsmath}}\n\
         \\usepackage{{graphicx}}\n\
         \\usepackage[normalem]{{ulem}}\n\
         \\usepackage{{hyperref}}\n\
         \n\
         \\begin{{document}}\n\
         \n\
         {body}\
         \\end{{document}}\n"
    )
}

fn render_nodes(nodes: &[Node]) -> String {
    nodes.iter().map(render_node).collect()
}

fn render_node(node: &Node) -> String {
    match node {
        Node::Leaf(leaf) => render_leaf(leaf),
        Node::Branch(branch) => render_branch(branch),
    }
}

fn render_leaf(leaf: &Leaf) -> String {
    match leaf.kind {
        LeafKind::Word => format!("{}{}", leaf.lexeme, leaf.right_pad),
        LeafKind::AtDelim => {
            let name = leaf.lexeme.strip_prefix('@').unwrap_or(&leaf.lexeme);
            format!("\\ref{{{}}}{}", name, leaf.right_pad)
        }
        // raw blocks pass through verbatim, opener and closer stripped
        LeafKind::RawTex => format!("{}\n", heredoc_body(&leaf.lexeme)),
        LeafKind::TexInlineMath
        | LeafKind::TexDisplayMath
        | LeafKind::LatexInlineMath
        | LeafKind::LatexDisplayMath => format!("{}{}", leaf.lexeme, leaf.right_pad),
    }
}

/// The contents of a heredoc lexeme: everything between the opener line and
/// the closing marker line.
fn heredoc_body(lexeme: &str) -> &str {
    let Some(start) = lexeme.find('\n') else {
        return "";
    };
    let Some(end) = lexeme.rfind('\n') else {
        return "";
    };
    if end <= start {
        return "";
    }
    &lexeme[start + 1..end]
}

fn render_branch(branch: &Branch) -> String {
    let inline_content = || format!("{}{}", branch.left_pad, render_nodes(&branch.children));
    match branch.kind {
        BranchKind::Paragraph => {
            let content = render_nodes(&branch.children);
            if content.trim().is_empty() {
                String::new()
            } else {
                format!("{}\n\n", content.trim_end())
            }
        }

        BranchKind::Section => render_heading("\\section", branch),
        BranchKind::Subsection => render_heading("\\subsection", branch),
        BranchKind::Subsubsection => render_heading("\\subsubsection", branch),
        BranchKind::SectionStar => render_heading("\\section*", branch),
        BranchKind::SubsectionStar => render_heading("\\subsection*", branch),
        BranchKind::SubsubsectionStar => render_heading("\\subsubsection*", branch),

        BranchKind::Italic => format!("\\textit{{{}}}{}", inline_content(), branch.right_pad),
        BranchKind::Bold => format!("\\textbf{{{}}}{}", inline_content(), branch.right_pad),
        BranchKind::Underline => {
            format!("\\underline{{{}}}{}", inline_content(), branch.right_pad)
        }
        BranchKind::Strikethrough => {
            format!("\\sout{{{}}}{}", inline_content(), branch.right_pad)
        }

        BranchKind::Link => {
            let target = branch.target.as_deref().unwrap_or("");
            let caption = render_nodes(&branch.children);
            format!(
                "\\href{{{}}}{{{}}}{}",
                target,
                caption.trim(),
                branch.right_pad
            )
        }
        BranchKind::Image => render_image(branch),

        BranchKind::Itemize => render_list("itemize", branch),
        BranchKind::Enumerate => render_list("enumerate", branch),
        BranchKind::ListItem => {
            let content = render_nodes(&branch.children);
            format!("\\item {}\n", content.trim_end())
        }
    }
}

fn render_heading(command: &str, branch: &Branch) -> String {
    let content = render_nodes(&branch.children);
    format!("{}{{{}}}\n\n", command, content.trim())
}

fn render_list(environment: &str, branch: &Branch) -> String {
    let items = render_nodes(&branch.children);
    format!(
        "\\begin{{{environment}}}\n{items}\\end{{{environment}}}\n"
    )
}

fn render_image(branch: &Branch) -> String {
    let target = branch.target.as_deref().unwrap_or("");
    let caption = render_nodes(&branch.children);
    let caption = caption.trim();
    let mut out = String::from("\\begin{figure}[h]\n\\centering\n");
    out.push_str(&format!("\\includegraphics{{{target}}}\n"));
    if !caption.is_empty() {
        out.push_str(&format!("\\caption{{{caption}}}\n"));
    }
    out.push_str("\\end{figure}\n");
    out
}

// ============================================================================
// Tests
// ============================================================================
