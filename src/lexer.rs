//! Lexer
//!
//! A single-pass lexer that walks the source with a [`Cursor`] and dispatches
//! on the current character. Most constructs are recognized directly; the
//! speculative ones (math delimiters, heredocs, ordered-list markers) take a
//! snapshot first and rewind to re-lex their opening characters as plain
//! words when the construct turns out to be malformed. Failures become
//! [`Diagnostic`] records, never errors: lexing always runs to the end of the
//! input and always produces a token stream framed by `Sof` and `Eof`.

use crate::cursor::Cursor;
use crate::diagnostics::Diagnostic;
use crate::position::Position;
use crate::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// Shape of a raw-block opener line: `TEX <<< marker`.
static HEREDOC_OPENER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^TEX <<< (\S+)\s*$").unwrap());

/// Characters that a backslash can escape into a literal word character.
pub fn is_escapable(c: char) -> bool {
    matches!(
        c,
        '%' | '[' | '@' | ')' | '~' | '_' | ']' | '!' | '*' | '$'
    )
}

/// Everything the lexer produced for one input.
#[derive(Debug, Clone, PartialEq)]
pub struct LexerOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lex a whole source string.
pub fn lex(source: &str) -> LexerOutput {
    Lexer::new(source).run()
}

struct Lexer {
    cursor: Cursor,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            cursor: Cursor::new(source),
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(mut self) -> LexerOutput {
        self.push_token(TokenKind::Sof, "", "", Position::start());
        while self.cursor.has_source_left() {
            self.step();
        }
        let end = self.cursor.position();
        self.push_token(TokenKind::Eof, "", "", end);
        LexerOutput {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn push_token(&mut self, kind: TokenKind, lexeme: &str, right_pad: &str, position: Position) {
        self.tokens.push(Token::new(kind, lexeme, right_pad, position));
    }

    /// One dispatch on the current character. Every path consumes at least
    /// one character, so the main loop always terminates.
    fn step(&mut self) {
        let c = match self.cursor.cur_char() {
            Some(c) => c,
            None => return,
        };
        match c {
            '\n' if self.cursor.peek(1) == Some('\n') => self.handle_empty_row(),
            _ if c.is_whitespace() => self.cursor.advance(1),
            '%' => self.handle_comment(),
            '$' => self.handle_dollar(),
            '\\' => self.handle_backslash(),
            '*' => self.handle_star(),
            '_' if self.cursor.peek(1) == Some('_') => {
                self.fixed_token(TokenKind::DoubleUnderscore, "__")
            }
            '~' if self.cursor.peek(1) == Some('~') => {
                self.fixed_token(TokenKind::DoubleTilde, "~~")
            }
            '[' => self.fixed_token(TokenKind::LeftBracket, "["),
            '!' if self.cursor.peek(1) == Some('[') => {
                self.fixed_token(TokenKind::BangBracket, "![")
            }
            ']' if self.cursor.peek(1) == Some('(') => {
                self.fixed_token(TokenKind::BracketParen, "](")
            }
            ')' => self.fixed_token(TokenKind::RightParen, ")"),
            '@' => self.handle_at_delim(),
            '#' if self.cursor.at_line_start() => self.handle_heading(),
            '-' if self.cursor.at_line_start() && self.cursor.peek(1) == Some(' ') => {
                self.fixed_token(TokenKind::UlItem, "-")
            }
            _ => self.handle_other(c),
        }
    }

    /// Fallback dispatch for characters without a rule of their own.
    fn handle_other(&mut self, c: char) {
        if c.is_ascii_digit() && self.cursor.at_line_start() {
            self.handle_ordered_list();
        } else if c == 'm' && self.cursor.at_line_start() && self.cursor.at_str("macro ") {
            self.handle_macro_def();
        } else if c == 'T' && self.cursor.at_line_start() && self.cursor.at_str("TEX <<< ") {
            self.handle_heredoc();
        } else if c.is_control() {
            let position = self.cursor.position();
            self.diagnostics.push(Diagnostic::unrecognized_char(position));
            self.cursor.advance(1);
        } else {
            self.handle_word();
        }
    }

    /// Emit a token whose lexeme is known up front (delimiters and markers).
    fn fixed_token(&mut self, kind: TokenKind, lexeme: &str) {
        let position = self.cursor.position();
        self.cursor.advance(lexeme.chars().count());
        let pad = self.cursor.capture_right_pad();
        self.push_token(kind, lexeme, &pad, position);
    }

    /// A blank line and all whitespace that follows it, captured as one token.
    fn handle_empty_row(&mut self) {
        let position = self.cursor.position();
        let mut run = String::new();
        while let Some(c) = self.cursor.cur_char() {
            if !c.is_whitespace() {
                break;
            }
            run.push(c);
            self.cursor.advance(1);
        }
        self.push_token(TokenKind::EmptyRow, &run, "", position);
    }

    /// `%` comments run to the end of the line and produce no token. The
    /// newline stays in the stream so blank-line detection still works.
    fn handle_comment(&mut self) {
        self.cursor
            .advance_while(|c| c.cur_char().is_some_and(|ch| ch != '\n'));
    }

    fn handle_star(&mut self) {
        if self.cursor.peek(1) == Some('*') {
            self.fixed_token(TokenKind::DoubleStar, "**");
        } else {
            self.fixed_token(TokenKind::Star, "*");
        }
    }

    fn handle_dollar(&mut self) {
        if self.cursor.peek(1) == Some('$') {
            self.handle_math("$$", "$$", TokenKind::TexDisplayMath);
        } else {
            self.handle_math("$", "$", TokenKind::TexInlineMath);
        }
    }

    fn handle_backslash(&mut self) {
        match self.cursor.peek(1) {
            Some('(') => self.handle_math("\\(", "\\)", TokenKind::LatexInlineMath),
            Some('[') => self.handle_math("\\[", "\\]", TokenKind::LatexDisplayMath),
            Some(c) if is_escapable(c) => self.handle_word(),
            _ => self.handle_macro_call(),
        }
    }

    /// Macro call sites are not expanded yet; the call lexes as a plain word.
    fn handle_macro_call(&mut self) {
        self.handle_word();
    }

    /// Scan a delimited math sequence. On a missing closer, record the
    /// problem, rewind, and let the opener lex as a word.
    fn handle_math(&mut self, open: &str, close: &str, kind: TokenKind) {
        let snapshot = self.cursor.snapshot();
        let position = self.cursor.position();
        self.cursor.mark_position();
        self.cursor.advance(open.chars().count());
        self.cursor.advance_until(|c| c.at_str(close));
        if !self.cursor.at_str(close) {
            self.diagnostics.push(Diagnostic::unclosed_sequence(
                position,
                &format!("`{close}`"),
                "close the math sequence or escape its opening delimiter",
            ));
            self.cursor.backtrack_to(snapshot);
            self.handle_word();
            return;
        }
        self.cursor.advance(close.chars().count() - 1);
        let lexeme = self.cursor.capture_marked_substring();
        self.cursor.advance(1);
        let pad = self.cursor.capture_right_pad();
        self.push_token(kind, &lexeme, &pad, position);
    }

    /// Heading markers are only recognized in column 1 and only when a space
    /// follows the marker; anything else on a `#` lexes as a word.
    fn handle_heading(&mut self) {
        let after = self.cursor.lookahead(3);
        let (kind, lexeme) = if after.starts_with("##*") {
            (TokenKind::TripleHashStar, "###*")
        } else if after.starts_with("##") {
            (TokenKind::TripleHash, "###")
        } else if after.starts_with("#*") {
            (TokenKind::DoubleHashStar, "##*")
        } else if after.starts_with('#') {
            (TokenKind::DoubleHash, "##")
        } else if after.starts_with('*') {
            (TokenKind::HashStar, "#*")
        } else {
            (TokenKind::Hash, "#")
        };
        let expected = format!("{} ", &lexeme[1..]);
        if self.cursor.lookahead(lexeme.len()) != expected {
            self.handle_word();
            return;
        }
        self.fixed_token(kind, lexeme);
    }

    /// `<digits>.` followed by a space, in column 1. Anything else rewinds
    /// and lexes as a word.
    fn handle_ordered_list(&mut self) {
        let snapshot = self.cursor.snapshot();
        let position = self.cursor.position();
        self.cursor.mark_position();
        self.cursor
            .advance_while(|c| c.cur_char().is_some_and(|ch| ch.is_ascii_digit()));
        if self.cursor.cur_char() == Some('.') && self.cursor.peek(1) == Some(' ') {
            let lexeme = self.cursor.capture_marked_substring();
            self.cursor.advance(1);
            let pad = self.cursor.capture_right_pad();
            self.push_token(TokenKind::OlItem, &lexeme, &pad, position);
        } else {
            self.cursor.backtrack_to(snapshot);
            self.handle_word();
        }
    }

    /// A whole `macro ... = { ... }` line, kept verbatim. Validation of the
    /// definition grammar happens in the parser.
    fn handle_macro_def(&mut self) {
        let position = self.cursor.position();
        let mut line = String::new();
        while let Some(c) = self.cursor.cur_char() {
            if c == '\n' {
                break;
            }
            line.push(c);
            self.cursor.advance(1);
        }
        self.push_token(TokenKind::MacroDef, &line, "", position);
    }

    /// `TEX <<< marker` through a line holding only `marker`. The lexeme
    /// keeps the opener and closer so the raw body can be recovered later.
    fn handle_heredoc(&mut self) {
        let snapshot = self.cursor.snapshot();
        let position = self.cursor.position();
        self.cursor.mark_position();

        let mut opener = String::new();
        while let Some(c) = self.cursor.cur_char() {
            if c == '\n' {
                break;
            }
            opener.push(c);
            self.cursor.advance(1);
        }
        let marker = match HEREDOC_OPENER
            .captures(&opener)
            .map(|caps| caps[1].to_string())
        {
            Some(marker) => marker,
            None => {
                self.diagnostics.push(Diagnostic::unexpected_char(
                    position,
                    "an identifier after `TEX <<<`",
                    "name the raw block, e.g. `TEX <<< eq1`",
                ));
                self.cursor.backtrack_to(snapshot);
                self.handle_word();
                return;
            }
        };

        loop {
            if !self.cursor.has_source_left() {
                self.diagnostics.push(Diagnostic::unclosed_sequence(
                    position,
                    &format!("`{marker}`"),
                    "close the raw block with its marker on a line of its own",
                ));
                self.cursor.backtrack_to(snapshot);
                self.handle_word();
                return;
            }
            // sitting on the newline that ends the previous line
            self.cursor.advance(1);
            if self.line_is_marker(&marker) {
                self.cursor.advance(marker.chars().count() - 1);
                let lexeme = self.cursor.capture_marked_substring();
                self.cursor.advance(1);
                self.push_token(TokenKind::Heredoc, &lexeme, "", position);
                return;
            }
            self.cursor
                .advance_while(|c| c.cur_char().is_some_and(|ch| ch != '\n'));
        }
    }

    /// Whether the line under the cursor consists of exactly `marker`.
    fn line_is_marker(&self, marker: &str) -> bool {
        self.cursor.at_str(marker)
            && matches!(self.cursor.peek(marker.chars().count()), None | Some('\n'))
    }

    /// `@` followed by a non-whitespace run. A lone `@` is just a word.
    fn handle_at_delim(&mut self) {
        match self.cursor.peek(1) {
            Some(c) if !c.is_whitespace() => {}
            _ => {
                self.handle_word();
                return;
            }
        }
        let position = self.cursor.position();
        self.cursor.mark_position();
        self.cursor
            .advance_while(|c| c.peek(1).is_some_and(|ch| !ch.is_whitespace()));
        let lexeme = self.cursor.capture_marked_substring();
        self.cursor.advance(1);
        let pad = self.cursor.capture_right_pad();
        self.push_token(TokenKind::AtDelim, &lexeme, &pad, position);
    }

    /// A run of ordinary text. The first character is always consumed; after
    /// that the scan stops before whitespace, before any delimiter character
    /// or two-character delimiter pair, and before a backslash that does not
    /// start an escape. Escape pairs are consumed whole and stripped from
    /// the lexeme.
    fn handle_word(&mut self) {
        let position = self.cursor.position();
        self.cursor.mark_position();
        self.advance_word();
        let raw = self.cursor.capture_marked_substring();
        self.cursor.advance(1);
        let pad = self.cursor.capture_right_pad();
        self.push_token(TokenKind::Word, &unescape_word(&raw), &pad, position);
    }

    /// Move the cursor onto the last character of the word.
    fn advance_word(&mut self) {
        loop {
            let cur = match self.cursor.cur_char() {
                Some(c) => c,
                None => return,
            };
            // an escape pair is consumed whole: step onto the escaped char
            if cur == '\\' && self.cursor.peek(1).is_some_and(is_escapable) {
                self.cursor.advance(1);
            }
            let next = match self.cursor.peek(1) {
                Some(c) => c,
                None => return,
            };
            if next.is_whitespace() {
                return;
            }
            if next == '\\' {
                if self.cursor.peek(2).is_some_and(is_escapable) {
                    // step onto the backslash; the loop consumes the pair
                    self.cursor.advance(1);
                    continue;
                }
                return;
            }
            let pair = self.cursor.lookahead(2);
            if matches!(pair.as_str(), "~~" | "__" | "](" | "![") {
                return;
            }
            if matches!(next, '%' | '[' | '@' | ')' | '*' | '$') {
                return;
            }
            self.cursor.advance(1);
        }
    }
}

/// Strip the backslash from every escape pair in a raw word lexeme.
fn unescape_word(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if is_escapable(next) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::detokenize;
    use pretty_assertions::assert_eq;

    /// Lex and assert no diagnostics were produced.
    fn lex_clean(source: &str) -> Vec<Token> {
        let output = lex(source);
        assert_eq!(output.diagnostics, vec![], "input: {source:?}");
        output.tokens
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        let tokens = lex_clean("");
        assert_eq!(kinds(&tokens), vec![TokenKind::Sof, TokenKind::Eof]);
        assert_eq!(tokens[1].position, Position::new(0, 1, 1));
    }

    #[test]
    fn test_words_and_padding() {
        let tokens = lex_clean("hello  world");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Sof, TokenKind::Word, TokenKind::Word, TokenKind::Eof]
        );
        assert_eq!(tokens[1].lexeme, "hello");
        assert_eq!(tokens[1].right_pad, "  ");
        assert_eq!(tokens[2].lexeme, "world");
        assert_eq!(tokens[2].position, Position::new(7, 1, 8));
    }

    #[test]
    fn test_pad_spans_single_newlines() {
        let tokens = lex_clean("one\n  two");
        assert_eq!(tokens[1].right_pad, "\n  ");
        assert_eq!(tokens[2].position.row, 2);
        assert_eq!(tokens[2].position.col, 3);
    }

    #[test]
    fn test_emphasis_delimiters() {
        let tokens = lex_clean("**a** *b* __c__ ~~d~~");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Sof,
                TokenKind::DoubleStar,
                TokenKind::Word,
                TokenKind::DoubleStar,
                TokenKind::Star,
                TokenKind::Word,
                TokenKind::Star,
                TokenKind::DoubleUnderscore,
                TokenKind::Word,
                TokenKind::DoubleUnderscore,
                TokenKind::DoubleTilde,
                TokenKind::Word,
                TokenKind::DoubleTilde,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[3].right_pad, " ");
    }

    #[test]
    fn test_single_underscore_is_a_word() {
        let tokens = lex_clean("_x");
        assert_eq!(kinds(&tokens), vec![TokenKind::Sof, TokenKind::Word, TokenKind::Eof]);
        assert_eq!(tokens[1].lexeme, "_x");
    }

    #[test]
    fn test_heading_markers() {
        let tokens = lex_clean("# a\n## b\n### c\n#* d\n##* e\n###* f");
        let heading_kinds: Vec<TokenKind> = tokens
            .iter()
            .filter(|t| t.kind.is_heading())
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            heading_kinds,
            vec![
                TokenKind::Hash,
                TokenKind::DoubleHash,
                TokenKind::TripleHash,
                TokenKind::HashStar,
                TokenKind::DoubleHashStar,
                TokenKind::TripleHashStar,
            ]
        );
        assert_eq!(tokens[1].lexeme, "#");
        assert_eq!(tokens[1].right_pad, " ");
    }

    #[test]
    fn test_hash_without_space_is_a_word() {
        let tokens = lex_clean("#title");
        assert_eq!(kinds(&tokens), vec![TokenKind::Sof, TokenKind::Word, TokenKind::Eof]);
        assert_eq!(tokens[1].lexeme, "#title");
    }

    #[test]
    fn test_four_hashes_are_a_word() {
        let tokens = lex_clean("#### x");
        assert_eq!(tokens[1].kind, TokenKind::Word);
        assert_eq!(tokens[1].lexeme, "####");
    }

    #[test]
    fn test_hash_mid_line_is_a_word() {
        let tokens = lex_clean("a # b");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Sof, TokenKind::Word, TokenKind::Word, TokenKind::Word, TokenKind::Eof]
        );
        assert_eq!(tokens[2].lexeme, "#");
    }

    #[test]
    fn test_list_markers() {
        let tokens = lex_clean("- a\n12. b");
        assert_eq!(tokens[1].kind, TokenKind::UlItem);
        assert_eq!(tokens[1].lexeme, "-");
        assert_eq!(tokens[3].kind, TokenKind::OlItem);
        assert_eq!(tokens[3].lexeme, "12.");
        assert_eq!(tokens[3].right_pad, " ");
    }

    #[test]
    fn test_list_markers_need_column_one_and_space() {
        let tokens = lex_clean("-a\na 1. b\n2.c");
        let words: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Word)
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(words, vec!["-a", "a", "1.", "b", "2.c"]);
    }

    #[test]
    fn test_inline_math() {
        let tokens = lex_clean("$x + y$ z");
        assert_eq!(tokens[1].kind, TokenKind::TexInlineMath);
        assert_eq!(tokens[1].lexeme, "$x + y$");
        assert_eq!(tokens[1].right_pad, " ");
        assert_eq!(tokens[2].lexeme, "z");
    }

    #[test]
    fn test_display_math() {
        let tokens = lex_clean("$$\\frac{a}{b}$$");
        assert_eq!(tokens[1].kind, TokenKind::TexDisplayMath);
        assert_eq!(tokens[1].lexeme, "$$\\frac{a}{b}$$");
    }

    #[test]
    fn test_latex_style_math() {
        let tokens = lex_clean("\\(x\\) \\[y\\]");
        assert_eq!(tokens[1].kind, TokenKind::LatexInlineMath);
        assert_eq!(tokens[1].lexeme, "\\(x\\)");
        assert_eq!(tokens[2].kind, TokenKind::LatexDisplayMath);
        assert_eq!(tokens[2].lexeme, "\\[y\\]");
    }

    #[test]
    fn test_unterminated_math_degrades_to_word() {
        let output = lex("$unterminated");
        assert_eq!(output.diagnostics.len(), 1);
        assert!(!output.diagnostics[0].fatal);
        assert_eq!(
            output.diagnostics[0].kind,
            crate::diagnostics::DiagnosticKind::UnclosedSequence
        );
        assert_eq!(
            kinds(&output.tokens),
            vec![TokenKind::Sof, TokenKind::Word, TokenKind::Eof]
        );
        assert_eq!(output.tokens[1].lexeme, "$unterminated");
    }

    #[test]
    fn test_heredoc() {
        let tokens = lex_clean("TEX <<< eq\n\\alpha + 1\neq\n");
        assert_eq!(tokens[1].kind, TokenKind::Heredoc);
        assert_eq!(tokens[1].lexeme, "TEX <<< eq\n\\alpha + 1\neq");
        assert_eq!(tokens[1].right_pad, "");
    }

    #[test]
    fn test_heredoc_marker_at_end_of_input() {
        let tokens = lex_clean("TEX <<< eq\nbody\neq");
        assert_eq!(tokens[1].kind, TokenKind::Heredoc);
        assert_eq!(tokens[1].lexeme, "TEX <<< eq\nbody\neq");
    }

    #[test]
    fn test_heredoc_without_marker_degrades_to_words() {
        let output = lex("TEX <<< eq\nbody");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(
            output.diagnostics[0].kind,
            crate::diagnostics::DiagnosticKind::UnclosedSequence
        );
        let words: Vec<&str> = output
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Word)
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(words, vec!["TEX", "<<<", "eq", "body"]);
    }

    #[test]
    fn test_heredoc_with_malformed_opener() {
        let output = lex("TEX <<< \nx");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(
            output.diagnostics[0].kind,
            crate::diagnostics::DiagnosticKind::UnexpectedChar
        );
        assert!(!output.diagnostics[0].fatal);
    }

    #[test]
    fn test_macro_definition_line() {
        let tokens = lex_clean("macro greet name = { Hello name }\nafter");
        assert_eq!(tokens[1].kind, TokenKind::MacroDef);
        assert_eq!(tokens[1].lexeme, "macro greet name = { Hello name }");
        assert_eq!(tokens[1].right_pad, "");
        assert_eq!(tokens[2].lexeme, "after");
    }

    #[test]
    fn test_at_delim() {
        let tokens = lex_clean("see @fig1 here");
        assert_eq!(tokens[2].kind, TokenKind::AtDelim);
        assert_eq!(tokens[2].lexeme, "@fig1");
        assert_eq!(tokens[2].right_pad, " ");
    }

    #[test]
    fn test_lone_at_is_a_word() {
        let tokens = lex_clean("@ x");
        assert_eq!(tokens[1].kind, TokenKind::Word);
        assert_eq!(tokens[1].lexeme, "@");
    }

    #[test]
    fn test_escapes_fold_into_words() {
        let tokens = lex_clean("\\*bold\\* a\\]b");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Sof, TokenKind::Word, TokenKind::Word, TokenKind::Eof]
        );
        assert_eq!(tokens[1].lexeme, "*bold*");
        assert_eq!(tokens[2].lexeme, "a]b");
    }

    #[test]
    fn test_backslash_before_plain_char_stays_in_word() {
        let tokens = lex_clean("\\q");
        assert_eq!(tokens[1].kind, TokenKind::Word);
        assert_eq!(tokens[1].lexeme, "\\q");
    }

    #[test]
    fn test_empty_row() {
        let tokens = lex_clean("a\n\nb");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Sof, TokenKind::Word, TokenKind::EmptyRow, TokenKind::Word, TokenKind::Eof]
        );
        assert_eq!(tokens[1].right_pad, "");
        assert_eq!(tokens[2].lexeme, "\n\n");
        assert_eq!(tokens[2].position, Position::new(1, 1, 2));
        assert_eq!(tokens[3].position.row, 3);
    }

    #[test]
    fn test_empty_row_swallows_the_whole_gap() {
        let tokens = lex_clean("a\n\n\n  b");
        assert_eq!(tokens[2].kind, TokenKind::EmptyRow);
        assert_eq!(tokens[2].lexeme, "\n\n\n  ");
    }

    #[test]
    fn test_line_with_a_space_is_not_an_empty_row() {
        let tokens = lex_clean("a\n \nb");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Sof, TokenKind::Word, TokenKind::Word, TokenKind::Eof]
        );
        assert_eq!(tokens[1].right_pad, "\n \n");
    }

    #[test]
    fn test_comments_are_dropped() {
        let tokens = lex_clean("a % a comment, with * and $\nb");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Sof, TokenKind::Word, TokenKind::Word, TokenKind::Eof]
        );
        assert_eq!(tokens[2].lexeme, "b");
    }

    #[test]
    fn test_comment_then_blank_line() {
        let tokens = lex_clean("a\n% note\n\nb");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Sof, TokenKind::Word, TokenKind::EmptyRow, TokenKind::Word, TokenKind::Eof]
        );
    }

    #[test]
    fn test_link_tokens() {
        let tokens = lex_clean("[caption](url)");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Sof,
                TokenKind::LeftBracket,
                TokenKind::Word,
                TokenKind::BracketParen,
                TokenKind::Word,
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[2].lexeme, "caption");
        assert_eq!(tokens[4].lexeme, "url");
    }

    #[test]
    fn test_image_tokens() {
        let tokens = lex_clean("![alt text](img.png)");
        assert_eq!(tokens[1].kind, TokenKind::BangBracket);
        assert_eq!(tokens[1].lexeme, "![");
        assert_eq!(tokens[4].kind, TokenKind::BracketParen);
    }

    #[test]
    fn test_unpaired_bracket_chars() {
        let tokens = lex_clean("a]b c! ]x");
        let words: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Word)
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(words, vec!["a]b", "c!", "]x"]);
    }

    #[test]
    fn test_control_char_is_fatal() {
        let output = lex("\u{0}");
        assert_eq!(output.diagnostics.len(), 1);
        assert!(output.diagnostics[0].fatal);
        assert_eq!(kinds(&output.tokens), vec![TokenKind::Sof, TokenKind::Eof]);
    }

    #[test]
    fn test_detokenize_round_trip() {
        let source = "# Title\nsome **bold** words $x$\n- item one\n- item two\n";
        let tokens = lex_clean(source);
        assert_eq!(detokenize(&tokens), source);
    }

    #[test]
    fn test_detokenize_round_trip_with_blank_lines() {
        let source = "first paragraph\n\nsecond  paragraph\n";
        let tokens = lex_clean(source);
        assert_eq!(detokenize(&tokens), source);
    }
}
