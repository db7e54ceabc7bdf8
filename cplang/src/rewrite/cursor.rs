use crate::lexer::{Token, TokenKind};

/// Forward-only matcher over a token slice that steps over whitespace.
///
/// Every construct rule describes its expected shape with a cursor instead
/// of fixed offsets, so `let x : int` and `let x:int` match alike.
pub(super) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token], pos: usize) -> Self {
        Self { tokens, pos }
    }

    /// Index of the next unconsumed token (whitespace included).
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn skip_whitespace(&mut self) {
        while self.tokens.get(self.pos).is_some_and(Token::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Next significant token, without consuming it.
    pub fn peek(&mut self) -> Option<&'a Token> {
        self.skip_whitespace();
        self.tokens.get(self.pos)
    }

    /// Consumes the next significant token if it is the punctuation `text`.
    pub fn eat_punct(&mut self, text: &str) -> bool {
        match self.peek() {
            Some(tok) if tok.is_punct(text) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Consumes the next significant token if it is a word.
    pub fn word(&mut self) -> Option<&'a str> {
        match self.peek() {
            Some(tok) if tok.kind == TokenKind::Word => {
                self.pos += 1;
                Some(tok.text.as_str())
            }
            _ => None,
        }
    }

    /// `true` once only whitespace is left.
    pub fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }
}
