//! AST types
//!
//! The parser produces a forest of [`Node`]s. A node is either a [`Leaf`]
//! wrapping a single token's text or a [`Branch`] with children. Branches
//! remember the delimiter that opened them (`opener`) and the padding around
//! it, so an unclosed branch can be demoted back into the literal word the
//! author actually typed.

use crate::position::Position;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LeafKind {
    Word,
    /// `@name` reference.
    AtDelim,
    /// Raw LaTeX from a heredoc block.
    RawTex,
    TexInlineMath,
    TexDisplayMath,
    LatexInlineMath,
    LatexDisplayMath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BranchKind {
    Paragraph,
    Section,
    Subsection,
    Subsubsection,
    SectionStar,
    SubsectionStar,
    SubsubsectionStar,
    Italic,
    Bold,
    Underline,
    Strikethrough,
    Link,
    Image,
    Itemize,
    Enumerate,
    ListItem,
}

impl BranchKind {
    /// Row branches span the rest of their source line (headings).
    pub fn is_row(&self) -> bool {
        matches!(
            self,
            BranchKind::Section
                | BranchKind::Subsection
                | BranchKind::Subsubsection
                | BranchKind::SectionStar
                | BranchKind::SubsectionStar
                | BranchKind::SubsubsectionStar
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self, BranchKind::Itemize | BranchKind::Enumerate)
    }

    pub fn is_link_or_image(&self) -> bool {
        matches!(self, BranchKind::Link | BranchKind::Image)
    }
}

/// A terminal node carrying one token's text and trailing pad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaf {
    pub kind: LeafKind,
    pub position: Position,
    pub lexeme: String,
    pub right_pad: String,
}

impl Leaf {
    pub fn new(kind: LeafKind, position: Position, lexeme: &str, right_pad: &str) -> Self {
        Self {
            kind,
            position,
            lexeme: lexeme.to_string(),
            right_pad: right_pad.to_string(),
        }
    }
}

/// An interior node with children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub kind: BranchKind,
    pub position: Position,
    /// Source text of the delimiter that opened this branch.
    pub opener: String,
    /// Whitespace between the opening delimiter and the first child.
    pub left_pad: String,
    /// Whitespace after the closing delimiter, filled in on close.
    pub right_pad: String,
    /// Link or image target, filled in when the trailer validates.
    pub target: Option<String>,
    pub children: Vec<Node>,
}

impl Branch {
    pub fn new(kind: BranchKind, position: Position) -> Self {
        Self {
            kind,
            position,
            opener: String::new(),
            left_pad: String::new(),
            right_pad: String::new(),
            target: None,
            children: Vec::new(),
        }
    }

    pub fn with_opener(mut self, opener: &str, left_pad: &str) -> Self {
        self.opener = opener.to_string();
        self.left_pad = left_pad.to_string();
        self
    }

    /// The word this branch reads as when its closer never arrives.
    pub fn demote(&self) -> Leaf {
        Leaf::new(LeafKind::Word, self.position, &self.opener, &self.left_pad)
    }
}

/// One node of the parse forest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Node {
    Leaf(Leaf),
    Branch(Branch),
}

impl Node {
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            Node::Leaf(_) => None,
            Node::Branch(branch) => Some(branch),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Node::Leaf(leaf) => leaf.position,
            Node::Branch(branch) => branch.position,
        }
    }
}

/// A macro definition collected on the side of the parse.
///
/// Definitions are recorded for later expansion tooling; call sites are not
/// expanded during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: String,
}

// ============================================================================
// Tests
// ============================================================================
