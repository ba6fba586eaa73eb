//! Parser
//!
//! Builds a forest of AST nodes from the token stream. The parser keeps a
//! stack of open branches; leaves attach to the top of the stack and a
//! matching closer pops a branch onto its parent. When a closer never shows
//! up, recovery is structural: everything above a chosen target branch is
//! collapsed, each open branch demoted to the literal word of its opening
//! delimiter and its children flattened into the target. Malformed input
//! therefore degrades to plain words instead of failing the parse.
//!
//! Macro definitions are collected on the side and leave no node behind.

use crate::ast::{Branch, BranchKind, Leaf, LeafKind, MacroDef, Node};
use crate::diagnostics::Diagnostic;
use crate::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// `macro <name> <params...> = { <body> }`
static MACRO_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^macro\s+(\S+)\s*([^=]*?)\s*=\s*\{(.*)\}\s*$").unwrap());

/// Everything the parser produced for one token stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserOutput {
    pub ast: Vec<Node>,
    pub macro_defs: Vec<MacroDef>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a full token stream as produced by [`crate::lexer::lex`].
pub fn parse(tokens: &[Token]) -> ParserOutput {
    Parser::new(tokens).run()
}

fn extract_macro_def(lexeme: &str) -> Option<MacroDef> {
    let caps = MACRO_DEF.captures(lexeme)?;
    Some(MacroDef {
        name: caps[1].to_string(),
        params: caps[2].split_whitespace().map(str::to_string).collect(),
        body: caps[3].trim().to_string(),
    })
}

struct Parser<'a> {
    tokens: &'a [Token],
    index: usize,
    forest: Vec<Node>,
    stack: Vec<Branch>,
    macro_defs: Vec<MacroDef>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            index: 0,
            forest: Vec::new(),
            stack: Vec::new(),
            macro_defs: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(mut self) -> ParserOutput {
        while self.index < self.tokens.len() {
            self.maybe_close_row();
            self.dispatch();
        }
        ParserOutput {
            ast: self.forest,
            macro_defs: self.macro_defs,
            diagnostics: self.diagnostics,
        }
    }

    /// A row branch spans one source line. Close it as soon as the next
    /// token starts on a later line.
    fn maybe_close_row(&mut self) {
        let Some(row) = self
            .stack
            .iter()
            .find(|b| b.kind.is_row())
            .map(|b| b.position.row)
        else {
            return;
        };
        if self.tokens[self.index].position.row > row {
            self.handle_row_end();
        }
    }

    fn dispatch(&mut self) {
        let token = self.tokens[self.index].clone();
        match token.kind {
            TokenKind::Sof => {
                if self.index == 0 {
                    self.handle_par_start();
                } else {
                    self.diagnostics
                        .push(Diagnostic::unrecognized_token(token.position));
                }
                self.index += 1;
            }
            TokenKind::Eof => {
                self.handle_row_end();
                self.handle_par_end();
                self.index += 1;
            }
            TokenKind::EmptyRow => {
                self.handle_row_end();
                self.handle_par_end();
                self.handle_par_start();
                self.index += 1;
            }

            TokenKind::Word => self.handle_leaf(LeafKind::Word, &token),
            TokenKind::AtDelim => self.handle_leaf(LeafKind::AtDelim, &token),
            TokenKind::Heredoc => self.handle_leaf(LeafKind::RawTex, &token),
            TokenKind::TexInlineMath => self.handle_leaf(LeafKind::TexInlineMath, &token),
            TokenKind::TexDisplayMath => self.handle_leaf(LeafKind::TexDisplayMath, &token),
            TokenKind::LatexInlineMath => self.handle_leaf(LeafKind::LatexInlineMath, &token),
            TokenKind::LatexDisplayMath => self.handle_leaf(LeafKind::LatexDisplayMath, &token),
            // a bare `)` is just text
            TokenKind::RightParen => self.handle_leaf(LeafKind::Word, &token),

            TokenKind::MacroDef => self.handle_macro_def(&token),

            TokenKind::Star => self.handle_enclosed(BranchKind::Italic, &token),
            TokenKind::DoubleStar => self.handle_enclosed(BranchKind::Bold, &token),
            TokenKind::DoubleUnderscore => self.handle_enclosed(BranchKind::Underline, &token),
            TokenKind::DoubleTilde => self.handle_enclosed(BranchKind::Strikethrough, &token),

            TokenKind::Hash => self.handle_row_start(BranchKind::Section, &token),
            TokenKind::DoubleHash => self.handle_row_start(BranchKind::Subsection, &token),
            TokenKind::TripleHash => self.handle_row_start(BranchKind::Subsubsection, &token),
            TokenKind::HashStar => self.handle_row_start(BranchKind::SectionStar, &token),
            TokenKind::DoubleHashStar => {
                self.handle_row_start(BranchKind::SubsectionStar, &token)
            }
            TokenKind::TripleHashStar => {
                self.handle_row_start(BranchKind::SubsubsectionStar, &token)
            }

            TokenKind::LeftBracket => self.handle_link_start(BranchKind::Link, &token),
            TokenKind::BangBracket => self.handle_link_start(BranchKind::Image, &token),
            TokenKind::BracketParen => self.handle_link_end(&token),

            TokenKind::UlItem => self.handle_list_item(BranchKind::Itemize, &token),
            TokenKind::OlItem => self.handle_list_item(BranchKind::Enumerate, &token),
        }
    }

    // ------------------------------------------------------------------
    // Stack plumbing
    // ------------------------------------------------------------------

    /// Attach a finished node to the open branch, or to the forest when the
    /// stack is empty.
    fn attach(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(top) => top.children.push(node),
            None => self.forest.push(node),
        }
    }

    /// Pop the top branch and attach it. Paragraphs that collected no
    /// children leave no trace.
    fn pop_branch(&mut self) {
        let Some(branch) = self.stack.pop() else {
            return;
        };
        if branch.kind == BranchKind::Paragraph && branch.children.is_empty() {
            return;
        }
        self.attach(Node::Branch(branch));
    }

    /// Demote every branch above `index` into `stack[index]`: each becomes
    /// the word of its opening delimiter, followed by its flattened children.
    fn collapse_to(&mut self, index: usize) {
        let demoted = self.stack.split_off(index + 1);
        let target = &mut self.stack[index];
        for branch in demoted {
            target.children.push(Node::Leaf(branch.demote()));
            target.children.extend(branch.children);
        }
    }

    /// Collapse the top branch into its parent. With a single open branch,
    /// a paragraph is put underneath it first.
    fn collapse_to_previous(&mut self) {
        match self.stack.len() {
            0 => {}
            1 => self.collapse_to_paragraph(),
            n => self.collapse_to(n - 2),
        }
    }

    /// Collapse onto the open paragraph, inserting a synthetic one at the
    /// bottom of the stack if nothing in the stack is a paragraph.
    fn collapse_to_paragraph(&mut self) {
        if self.stack.is_empty() {
            return;
        }
        match self
            .stack
            .iter()
            .position(|b| b.kind == BranchKind::Paragraph)
        {
            Some(index) => self.collapse_to(index),
            None => {
                let position = self.stack[0].position;
                self.stack
                    .insert(0, Branch::new(BranchKind::Paragraph, position));
                self.collapse_to(0);
            }
        }
    }

    fn collapse_to_row(&mut self) {
        if let Some(index) = self.stack.iter().position(|b| b.kind.is_row()) {
            self.collapse_to(index);
        }
    }

    fn collapse_to_link_or_image(&mut self) {
        if let Some(index) = self.stack.iter().rposition(|b| b.kind.is_link_or_image()) {
            self.collapse_to(index);
        }
    }

    fn collapse_to_list_item(&mut self) {
        if let Some(index) = self
            .stack
            .iter()
            .rposition(|b| b.kind == BranchKind::ListItem)
        {
            self.collapse_to(index);
        }
    }

    fn collapse_to_list(&mut self) {
        if let Some(index) = self.stack.iter().rposition(|b| b.kind.is_list()) {
            self.collapse_to(index);
        }
    }

    // ------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------

    fn handle_leaf(&mut self, kind: LeafKind, token: &Token) {
        let leaf = Leaf::new(kind, token.position, &token.lexeme, &token.right_pad);
        self.attach(Node::Leaf(leaf));
        self.index += 1;
    }

    /// Emphasis delimiters toggle: a delimiter closes the branch it opened
    /// when that branch is on top of the stack, and opens a new one
    /// otherwise.
    fn handle_enclosed(&mut self, kind: BranchKind, token: &Token) {
        match self.stack.last_mut() {
            Some(top) if top.kind == kind => {
                top.right_pad = token.right_pad.clone();
                self.pop_branch();
            }
            _ => {
                let branch = Branch::new(kind, token.position)
                    .with_opener(&token.lexeme, &token.right_pad);
                self.stack.push(branch);
            }
        }
        self.index += 1;
    }

    fn handle_par_start(&mut self) {
        let position = self
            .tokens
            .get(self.index)
            .map(|t| t.position)
            .unwrap_or_default();
        self.stack.push(Branch::new(BranchKind::Paragraph, position));
    }

    fn handle_par_end(&mut self) {
        self.handle_list_end();
        if self.stack.is_empty() {
            return;
        }
        self.collapse_to_paragraph();
        self.pop_branch();
    }

    fn handle_row_start(&mut self, kind: BranchKind, token: &Token) {
        self.handle_par_end();
        let branch =
            Branch::new(kind, token.position).with_opener(&token.lexeme, &token.right_pad);
        self.stack.push(branch);
        self.index += 1;
    }

    fn handle_row_end(&mut self) {
        if !self.stack.iter().any(|b| b.kind.is_row()) {
            return;
        }
        self.collapse_to_row();
        self.pop_branch();
        self.handle_par_start();
    }

    fn handle_list_item(&mut self, kind: BranchKind, token: &Token) {
        if self.stack.iter().any(|b| b.kind == kind) {
            self.handle_list_item_end();
        } else {
            self.stack.push(Branch::new(kind, token.position));
        }
        let item = Branch::new(BranchKind::ListItem, token.position)
            .with_opener(&token.lexeme, &token.right_pad);
        self.stack.push(item);
        self.index += 1;
    }

    fn handle_list_item_end(&mut self) {
        if !self
            .stack
            .iter()
            .any(|b| b.kind == BranchKind::ListItem)
        {
            return;
        }
        self.collapse_to_list_item();
        self.pop_branch();
    }

    fn handle_list_end(&mut self) {
        self.handle_list_item_end();
        if !self.stack.iter().any(|b| b.kind.is_list()) {
            return;
        }
        self.collapse_to_list();
        self.pop_branch();
    }

    /// Open a link or image branch, unless one of the same kind is already
    /// open; they do not nest, so the inner opener reads as text.
    fn handle_link_start(&mut self, kind: BranchKind, token: &Token) {
        if self.stack.iter().any(|b| b.kind == kind) {
            self.handle_leaf(LeafKind::Word, token);
            return;
        }
        let branch =
            Branch::new(kind, token.position).with_opener(&token.lexeme, &token.right_pad);
        self.stack.push(branch);
        self.index += 1;
    }

    /// `](` closes the innermost open link or image when a `WORD` target and
    /// `)` follow. Any other trailer demotes the branch and the separator
    /// reads as text.
    fn handle_link_end(&mut self, token: &Token) {
        if !self.stack.iter().any(|b| b.kind.is_link_or_image()) {
            self.handle_leaf(LeafKind::Word, token);
            return;
        }
        self.collapse_to_link_or_image();

        let trailer = match (
            self.tokens.get(self.index + 1),
            self.tokens.get(self.index + 2),
        ) {
            (Some(target), Some(closer))
                if target.kind == TokenKind::Word && closer.kind == TokenKind::RightParen =>
            {
                Some((target.lexeme.clone(), closer.right_pad.clone()))
            }
            _ => None,
        };

        match trailer {
            Some((target, right_pad)) => {
                if let Some(top) = self.stack.last_mut() {
                    top.target = Some(target);
                    top.right_pad = right_pad;
                }
                self.pop_branch();
                self.index += 3;
            }
            None => {
                self.collapse_to_previous();
                self.handle_leaf(LeafKind::Word, token);
            }
        }
    }

    /// Record a macro definition; a line that does not match the definition
    /// grammar reads as text.
    fn handle_macro_def(&mut self, token: &Token) {
        match extract_macro_def(&token.lexeme) {
            Some(def) => {
                self.macro_defs.push(def);
                self.index += 1;
            }
            None => {
                self.diagnostics.push(Diagnostic::unexpected_char(
                    token.position,
                    "`= { ... }` after the macro name",
                    "write the definition as `macro name params = { body }`",
                ));
                self.handle_leaf(LeafKind::Word, token);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
