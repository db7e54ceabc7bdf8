//! `fn` headers.
//!
//! `fn name(a: int, s: string) -> int {` becomes `int name(int a, char *s) {`.
//! Without an arrow the function returns `void`.

use std::ops::Range;

use super::cursor::Cursor;
use super::{NUMERIC_TYPES, STRING_TYPE};
use crate::error::RewriteWarning;
use crate::lexer::{Token, TokenKind};
use crate::malformed;

pub(super) fn rewrite_fn(
    tokens: &mut Vec<Token>,
    notes: &mut Vec<RewriteWarning>,
) -> Result<(), RewriteWarning> {
    let Some(at) = tokens.iter().position(|t| t.is_word("fn")) else {
        return Ok(());
    };

    let params = match tokens[at..].iter().position(|t| t.is_punct("(")) {
        Some(offset) => {
            let open = at + offset;
            let close = tokens[open..]
                .iter()
                .position(|t| t.is_punct(")"))
                .map(|offset| open + offset)
                .ok_or_else(|| malformed!("fn", "unclosed parameter list"))?;
            Some((open, close, lower_params(&tokens[open + 1..close])?))
        }
        None => None,
    };

    let arrow = tokens
        .iter()
        .position(|t| t.kind == TokenKind::Operator && t.text == "->");

    let (return_type, dropped) = match arrow {
        Some(arrow) => {
            if let Some((_, close, _)) = &params
                && arrow < *close
            {
                return Err(malformed!("fn", "`->` before the end of the parameter list"));
            }
            let (ty, range) = return_annotation(tokens, arrow)?;
            (ty, Some(range))
        }
        None => ("void".to_string(), None),
    };

    let numeric = NUMERIC_TYPES.contains(&return_type.as_str());
    let return_type = if dropped.is_some() && !numeric {
        notes.push(RewriteWarning::NonNumericReturn(return_type));
        "int".to_string()
    } else {
        return_type
    };

    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if i == at {
            out.push(Token::word(return_type.as_str()));
            i += 1;
            continue;
        }
        if let Some((open, close, lowered)) = &params
            && i == *open
        {
            out.push(tokens[i].clone());
            out.extend_from_slice(lowered);
            i = *close;
            continue;
        }
        if let Some(range) = &dropped
            && i == range.start
        {
            i = range.end;
            continue;
        }
        out.push(tokens[i].clone());
        i += 1;
    }

    while out.last().is_some_and(Token::is_whitespace) {
        out.pop();
    }

    *tokens = out;
    Ok(())
}

/// Reads `-> type` and returns the type with the token range to drop: the
/// arrow, the type and the whitespace after it.
fn return_annotation(tokens: &[Token], arrow: usize) -> Result<(String, Range<usize>), RewriteWarning> {
    let mut cursor = Cursor::new(tokens, arrow + 1);
    let ty = cursor
        .word()
        .ok_or_else(|| malformed!("fn", "expected a return type after `->`"))?;
    cursor.skip_whitespace();
    Ok((ty.to_string(), arrow..cursor.pos()))
}

/// Lowers `name: type` parameters. Parameters already written C-style are
/// kept as they are.
fn lower_params(inner: &[Token]) -> Result<Vec<Token>, RewriteWarning> {
    let mut out = Vec::with_capacity(inner.len());

    for (n, param) in inner.split(|t| t.text == ",").enumerate() {
        if n > 0 {
            out.push(Token::new(TokenKind::Other, ","));
        }
        if !param.iter().any(|t| t.is_punct(":")) {
            out.extend_from_slice(param);
            continue;
        }

        let mut cursor = Cursor::new(param, 0);
        let name = cursor
            .word()
            .ok_or_else(|| malformed!("fn", "expected a parameter name"))?;
        if !cursor.eat_punct(":") {
            return Err(malformed!("fn", "expected `:` after parameter `{name}`"));
        }
        let ty = cursor
            .word()
            .ok_or_else(|| malformed!("fn", "expected a type for parameter `{name}`"))?;
        if !cursor.at_end() {
            return Err(malformed!("fn", "unexpected tokens after parameter `{name}`"));
        }

        out.extend(param.iter().take_while(|t| t.is_whitespace()).cloned());
        if ty == STRING_TYPE {
            out.extend([Token::word("char"), Token::space(), Token::punct("*")]);
        } else {
            out.extend([Token::word(ty), Token::space()]);
        }
        out.push(Token::word(name));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{render, tokenize};

    fn rewrite(line: &str) -> (Result<String, RewriteWarning>, Vec<RewriteWarning>) {
        let mut tokens = tokenize(line);
        let mut notes = Vec::new();
        let result = rewrite_fn(&mut tokens, &mut notes).map(|()| render(&tokens));
        (result, notes)
    }

    #[test]
    fn value_returning() {
        let (out, notes) = rewrite("fn f() -> int {");
        assert_eq!(out.unwrap(), "int f() {");
        assert!(notes.is_empty());

        assert_eq!(rewrite("fn avg() -> double {").0.unwrap(), "double avg() {");
    }

    #[test]
    fn void_returning() {
        assert_eq!(rewrite("fn f() {").0.unwrap(), "void f() {");
        assert_eq!(rewrite("fn greet()").0.unwrap(), "void greet()");
    }

    #[test]
    fn prototype_without_body() {
        assert_eq!(rewrite("fn f() -> int").0.unwrap(), "int f()");
    }

    #[test]
    fn params_are_lowered() {
        assert_eq!(
            rewrite("fn add(a: int, b: float) -> int {").0.unwrap(),
            "int add(int a, float b) {"
        );
        assert_eq!(
            rewrite("fn greet(name: string) {").0.unwrap(),
            "void greet(char *name) {"
        );
        assert_eq!(
            rewrite("fn legacy(int a, int b) {").0.unwrap(),
            "void legacy(int a, int b) {"
        );
    }

    #[test]
    fn non_numeric_return_falls_back_to_int() {
        let (out, notes) = rewrite("fn name() -> string {");
        assert_eq!(out.unwrap(), "int name() {");
        assert_eq!(
            notes,
            vec![RewriteWarning::NonNumericReturn("string".to_string())]
        );
    }

    #[test]
    fn malformed_headers() {
        assert!(rewrite("fn f( -> int {").0.is_err());
        assert!(rewrite("fn f() -> {").0.is_err());
        assert!(rewrite("fn f(a:) {").0.is_err());
    }
}
