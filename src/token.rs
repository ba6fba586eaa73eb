//! Token definitions
//!
//! The lexer turns source text into a flat sequence of tokens. Each token
//! records the text it matched (`lexeme`) and the run of whitespace that
//! followed it (`right_pad`), so the original spacing survives lexing and a
//! token stream can be turned back into text with [`detokenize`].

use crate::position::Position;
use serde::Serialize;
use std::fmt;

/// The closed set of token kinds the lexer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Start-of-file marker, always the first token.
    Sof,
    /// End-of-file marker, always the last token.
    Eof,
    /// A blank line (`\n\n` and any whitespace run that follows it).
    EmptyRow,

    /// A run of ordinary text, with escape sequences already unescaped.
    Word,
    /// `@name`: a reference to a labeled element.
    AtDelim,
    /// A whole `macro ... = { ... }` definition line.
    MacroDef,
    /// A `TEX <<< ID ... ID` raw block, opener through closing marker.
    Heredoc,

    /// `$...$` inline math.
    TexInlineMath,
    /// `$$...$$` display math.
    TexDisplayMath,
    /// `\(...\)` inline math.
    LatexInlineMath,
    /// `\[...\]` display math.
    LatexDisplayMath,

    /// `*` italic delimiter.
    Star,
    /// `**` bold delimiter.
    DoubleStar,
    /// `__` underline delimiter.
    DoubleUnderscore,
    /// `~~` strikethrough delimiter.
    DoubleTilde,

    /// `#` section heading marker.
    Hash,
    /// `##` subsection heading marker.
    DoubleHash,
    /// `###` subsubsection heading marker.
    TripleHash,
    /// `#*` unnumbered section heading marker.
    HashStar,
    /// `##*` unnumbered subsection heading marker.
    DoubleHashStar,
    /// `###*` unnumbered subsubsection heading marker.
    TripleHashStar,

    /// `[` link opener.
    LeftBracket,
    /// `![` image opener.
    BangBracket,
    /// `](` caption/target separator.
    BracketParen,
    /// `)` target closer.
    RightParen,

    /// `-` unordered list marker at the start of a line.
    UlItem,
    /// `<digits>.` ordered list marker at the start of a line.
    OlItem,
}

impl TokenKind {
    /// Heading markers open a row that spans the rest of the source line.
    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            TokenKind::Hash
                | TokenKind::DoubleHash
                | TokenKind::TripleHash
                | TokenKind::HashStar
                | TokenKind::DoubleHashStar
                | TokenKind::TripleHashStar
        )
    }

    pub fn is_math(&self) -> bool {
        matches!(
            self,
            TokenKind::TexInlineMath
                | TokenKind::TexDisplayMath
                | TokenKind::LatexInlineMath
                | TokenKind::LatexDisplayMath
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single lexed token.
///
/// `right_pad` holds the whitespace that separated this token from the next
/// one. Structural tokens (`Sof`, `Eof`, `EmptyRow`) never carry a pad; the
/// `EmptyRow` lexeme holds the whole blank-line whitespace run instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub right_pad: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: &str, right_pad: &str, position: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.to_string(),
            right_pad: right_pad.to_string(),
            position,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Sof | TokenKind::Eof | TokenKind::EmptyRow
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}) at {}", self.kind, self.lexeme, self.position)
    }
}

/// Reconstruct source text from a token stream.
///
/// Concatenates each token's lexeme and right pad. The result matches the
/// original input exactly except where the lexer intentionally normalized it:
/// escape backslashes are gone from `Word` lexemes and comments were dropped.
pub fn detokenize(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&token.lexeme);
        out.push_str(&token.right_pad);
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::Word, "hello", " ", Position::new(0, 1, 1));
        assert_eq!(token.to_string(), "Word(\"hello\") at 1:1");
    }

    #[test]
    fn test_detokenize_preserves_padding() {
        let tokens = vec![
            Token::new(TokenKind::Sof, "", "", Position::start()),
            Token::new(TokenKind::Word, "one", "  ", Position::new(0, 1, 1)),
            Token::new(TokenKind::Word, "two", "\n", Position::new(5, 1, 6)),
            Token::new(TokenKind::Eof, "", "", Position::new(9, 2, 1)),
        ];
        assert_eq!(detokenize(&tokens), "one  two\n");
    }

    #[test]
    fn test_heading_kinds() {
        assert!(TokenKind::Hash.is_heading());
        assert!(TokenKind::TripleHashStar.is_heading());
        assert!(!TokenKind::Word.is_heading());
        assert!(!TokenKind::Star.is_heading());
    }

    #[test]
    fn test_math_kinds() {
        assert!(TokenKind::TexInlineMath.is_math());
        assert!(TokenKind::LatexDisplayMath.is_math());
        assert!(!TokenKind::Heredoc.is_math());
    }

    #[test]
    fn test_structural_tokens() {
        let sof = Token::new(TokenKind::Sof, "", "", Position::start());
        let word = Token::new(TokenKind::Word, "w", "", Position::start());
        assert!(sof.is_structural());
        assert!(!word.is_structural());
    }
}
