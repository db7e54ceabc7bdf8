//! The `rewrite` module turns one tokenized cpl line into C tokens.
//!
//! It is a keyword-driven rewrite table, not a parser: each rule looks for its
//! keyword on the line, checks the shape of the tokens around it and splices
//! in the C equivalent. Nothing nests and no rule looks past the current line.
//! A rule that does not recognise the shape it expects leaves the line as it
//! was and reports a [`RewriteWarning`].

mod cursor;
mod decl;
mod function;
mod stmt;

use crate::error::RewriteWarning;
use crate::lexer::{Token, TokenKind};
use log::debug;

/// Types lowered to themselves.
pub(crate) const NUMERIC_TYPES: [&str; 3] = ["int", "float", "double"];

/// The string primitive, lowered to `char` arrays and pointers.
pub(crate) const STRING_TYPE: &str = "string";

/// A rule either rewrites the line or rejects it. Notes that do not stop the
/// rewrite (only `fn` has any) go into the shared vector so every rule keeps
/// one signature.
type Rule = fn(&mut Vec<Token>, &mut Vec<RewriteWarning>) -> Result<(), RewriteWarning>;

/// Applied in order, each at most once per line.
const RULES: [(&str, Rule); 4] = [
    ("let", decl::rewrite_let),
    ("fn", function::rewrite_fn),
    ("print", stmt::rewrite_print),
    ("import", stmt::rewrite_import),
];

/// Drops `//` comments and the whitespace they leave at the end of the line.
pub fn strip_line_comments(tokens: &mut Vec<Token>) {
    tokens.retain(|t| t.kind != TokenKind::LineComment);
    if tokens.last().is_some_and(Token::is_whitespace) {
        tokens.pop();
    }
}

/// `true` for a line with nothing but whitespace.
pub fn is_blank(tokens: &[Token]) -> bool {
    tokens.iter().all(Token::is_whitespace)
}

/// Runs every construct rule, then terminates the statement if needed.
///
/// Warnings from rules that gave up are returned; those lines keep their
/// original tokens for that construct.
pub fn rewrite(tokens: &mut Vec<Token>) -> Vec<RewriteWarning> {
    let mut warnings = Vec::new();

    for (keyword, rule) in RULES {
        if let Err(warning) = rule(tokens, &mut warnings) {
            debug!("`{keyword}` rule left the line unchanged");
            warnings.push(warning);
        }
    }

    if !tokens.last().is_some_and(ends_statement) {
        tokens.push(Token::punct(";"));
    }

    warnings
}

/// Tokens after which no `;` is appended: braces, an existing `;`, the `>`
/// closing an `#include`, and block-comment delimiters.
fn ends_statement(tok: &Token) -> bool {
    match tok.kind {
        TokenKind::CommentOpen | TokenKind::CommentClose => true,
        TokenKind::Punct => matches!(tok.text.as_str(), ";" | "{" | "}" | ">"),
        _ => false,
    }
}
