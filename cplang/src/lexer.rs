//! Line tokenizer.
//!
//! Every source line is lexed on its own into a flat list of [`Token`]s. The
//! tokenizer is total and lossless: joining the texts of the returned tokens
//! gives back the input line byte for byte, and characters it has no rule for
//! end up as [`TokenKind::Other`] instead of an error.

use logos::{Lexer, Logos};
use std::fmt;

/// How a `/*` seen by the lexer ends on its own line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opener {
    /// The matching `*/` is on the same line and was consumed.
    Closed,
    /// No `*/` follows; only the two delimiter characters were consumed.
    Open,
}

fn block_comment(lex: &mut Lexer<Lexeme>) -> Opener {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Opener::Closed
        }
        None => Opener::Open,
    }
}

/// Raw lexemes, in the order they are tried. Longest match wins, so `->`
/// beats `-` followed by `>` and `//` beats two `/`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment(Opener),
    #[token(">=")]
    #[token("<=")]
    #[token("!=")]
    #[token("==")]
    #[token("->")]
    Operator,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,
    #[regex(r"[(){}:;=+\-*/<>]")]
    Punct,
    #[regex(r"\s+")]
    Whitespace,
    #[regex(r".", priority = 0)]
    Other,
}

/// Category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `// ...` up to the end of the line.
    LineComment,
    /// A `/* ... */` span opened and closed on the same line.
    BlockComment,
    /// `/*` glued together by the comment tracker.
    CommentOpen,
    /// `*/` glued together by the comment tracker.
    CommentClose,
    /// Multi-character operator: `>=`, `<=`, `!=`, `==` or `->`.
    Operator,
    /// Identifier or keyword.
    Word,
    /// One of `(){}:;=+-*/<>`.
    Punct,
    Whitespace,
    /// Any other single character, digits included.
    Other,
    /// Line terminator appended to rewritten output.
    Newline,
}

impl Lexeme {
    const fn kind(self) -> TokenKind {
        match self {
            Lexeme::LineComment => TokenKind::LineComment,
            Lexeme::BlockComment(_) => TokenKind::BlockComment,
            Lexeme::Operator => TokenKind::Operator,
            Lexeme::Word => TokenKind::Word,
            Lexeme::Punct => TokenKind::Punct,
            Lexeme::Whitespace => TokenKind::Whitespace,
            Lexeme::Other => TokenKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Word, text)
    }

    pub fn punct(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Punct, text)
    }

    /// A single space, used to separate emitted words.
    pub fn space() -> Self {
        Self::new(TokenKind::Whitespace, " ")
    }

    pub fn newline() -> Self {
        Self::new(TokenKind::Newline, "\n")
    }

    pub fn is_word(&self, text: &str) -> bool {
        self.kind == TokenKind::Word && self.text == text
    }

    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Lexes one source line (without its line terminator).
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut lexer = Lexeme::lexer(line);
    let mut tokens = Vec::new();

    while let Some(lexeme) = lexer.next() {
        match lexeme {
            // an unterminated opener stays two loose characters; the comment
            // tracker decides what they mean
            Ok(Lexeme::BlockComment(Opener::Open)) => {
                tokens.extend([Token::punct("/"), Token::punct("*")]);
            }
            Ok(lexeme) => tokens.push(Token::new(lexeme.kind(), lexer.slice())),
            // anything the rules reject is still kept, verbatim
            Err(()) => tokens.push(Token::new(TokenKind::Other, lexer.slice())),
        }
    }

    tokens
}

/// Joins token texts back into a string.
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<(TokenKind, String)> {
        tokenize(line)
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn tokenizing_is_lossless() {
        let lines = [
            "",
            "let x: int = 10",
            "let* p: int = q",
            "   \tfn add(a: int, b: int) -> int {",
            "print(\"%d\\n\", x) // trailing comment",
            "/* one-line block */ import math",
            "/* unterminated block",
            "a >= b && c != d || e == f <= g",
            "x = 3 * (y - 4) / z;",
            "weird $ @ ` ~ é 漢字 chars",
            "\ttabs\r",
            "**/ */ /*",
        ];
        for line in lines {
            assert_eq!(render(&tokenize(line)), line, "line {line:?}");
        }
    }

    #[test]
    fn arrow_beats_minus() {
        let toks = kinds("a->b - c");
        assert_eq!(toks[1], (TokenKind::Operator, "->".to_string()));
        assert_eq!(toks[4], (TokenKind::Punct, "-".to_string()));
    }

    #[test]
    fn let_star_is_two_tokens() {
        let toks = kinds("let* p");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Word, "let".to_string()),
                (TokenKind::Punct, "*".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Word, "p".to_string()),
            ]
        );
    }

    #[test]
    fn comments() {
        let toks = kinds("x /* note */ y // rest /* of line");
        assert_eq!(toks[2], (TokenKind::BlockComment, "/* note */".to_string()));
        assert_eq!(
            toks.last().cloned(),
            Some((TokenKind::LineComment, "// rest /* of line".to_string()))
        );

        // an unterminated block opener is plain punctuation
        let toks = kinds("/* open");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Punct, "/".to_string()),
                (TokenKind::Punct, "*".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Word, "open".to_string()),
            ]
        );

        let toks = kinds("y = a /*p");
        assert_eq!(toks.len(), 9);
        assert_eq!(toks[6], (TokenKind::Punct, "/".to_string()));
        assert_eq!(toks[7], (TokenKind::Punct, "*".to_string()));
        assert_eq!(toks[8], (TokenKind::Word, "p".to_string()));
    }

    #[test]
    fn block_comment_closes_at_the_first_terminator() {
        let toks = kinds("/* a */ b */");
        assert_eq!(toks[0], (TokenKind::BlockComment, "/* a */".to_string()));
        assert_eq!(toks[2], (TokenKind::Word, "b".to_string()));
        assert_eq!(toks[4], (TokenKind::Punct, "*".to_string()));
        assert_eq!(toks[5], (TokenKind::Punct, "/".to_string()));

        let toks = kinds("/**/");
        assert_eq!(toks, vec![(TokenKind::BlockComment, "/**/".to_string())]);
    }

    #[test]
    fn other_tokens_are_single_characters() {
        for line in ["/* never closed $ 12", "a /*p", "#@! /* x", "\u{a0}\u{2003}"] {
            for tok in tokenize(line) {
                if tok.kind == TokenKind::Other {
                    assert_eq!(tok.text.chars().count(), 1, "line {line:?}: {tok:?}");
                }
            }
        }
    }

    #[test]
    fn unicode_whitespace_is_whitespace() {
        let toks = tokenize("\u{a0}let\u{2003}x");
        assert!(toks[0].is_whitespace());
        assert!(toks[2].is_whitespace());
    }

    #[test]
    fn digits_and_unknown_characters_fall_back_to_other() {
        let toks = kinds("10#");
        assert_eq!(
            toks,
            vec![
                (TokenKind::Other, "1".to_string()),
                (TokenKind::Other, "0".to_string()),
                (TokenKind::Other, "#".to_string()),
            ]
        );
    }

    #[test]
    fn whitespace_runs_are_single_tokens() {
        let toks = kinds("a \t  b");
        assert_eq!(toks.len(), 3);
        assert!(tokenize("a \t  b")[1].is_whitespace());
    }
}
