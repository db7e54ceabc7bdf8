//! Block-comment tracking across lines.
//!
//! The tokenizer only sees one line at a time, so a `/*` on one line and its
//! `*/` several lines later come out as loose `/` and `*` punctuation. The
//! tracker glues the first adjacent pair on a line back into a delimiter and
//! flips the state accordingly.
//!
//! This is a heuristic and nothing more: it looks for one adjacent `/` `*`
//! (or `*` `/`) pair per line, so an expression such as `a /*p` opens a
//! comment. There is no real delimiter scan behind it.

use crate::lexer::{Token, TokenKind};

/// Whether the translation cursor is inside a block comment.
///
/// Owned by one translation run; a new run starts [`CommentState::Outside`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentState {
    #[default]
    Outside,
    Inside,
}

impl CommentState {
    pub const fn is_inside(self) -> bool {
        matches!(self, CommentState::Inside)
    }

    /// Glues comment delimiters on `tokens` and updates the state.
    ///
    /// Inside a comment the first `*` `/` pair closes it; once outside, the
    /// first `/` `*` pair opens one.
    pub fn track(&mut self, tokens: &mut Vec<Token>) -> LineScope {
        let mut code_from = None;

        if self.is_inside()
            && let Some(at) = glue(tokens, "*", "/", TokenKind::CommentClose)
        {
            *self = CommentState::Outside;
            code_from = Some(at + 1);
        }
        if !self.is_inside() && glue(tokens, "/", "*", TokenKind::CommentOpen).is_some() {
            *self = CommentState::Inside;
        }

        match (self.is_inside(), code_from) {
            (true, _) => LineScope::Comment,
            (false, Some(at)) => LineScope::CodeFrom(at),
            (false, None) => LineScope::Code,
        }
    }
}

/// Which part of a tracked line is code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineScope {
    Code,
    /// The line ends inside a comment; nothing on it is rewritten.
    Comment,
    /// A comment closes on this line and code resumes at this token index.
    CodeFrom(usize),
}

/// Merges the first `first` `second` pair into one token and returns its index.
fn glue(tokens: &mut Vec<Token>, first: &str, second: &str, kind: TokenKind) -> Option<usize> {
    let at = tokens
        .windows(2)
        .position(|pair| pair[0].is_punct(first) && pair[1].is_punct(second))?;

    tokens[at] = Token::new(kind, format!("{first}{second}"));
    tokens.remove(at + 1);
    Some(at)
}
