//! `let` and `let*` declarations.
//!
//! ```text
//! let* name : type = value                              -> type &name = value
//! let name : type [; unsigned] [; long|long long|short] = value
//!                                   -> [unsigned] [long...] type name = value
//! ```
//!
//! `string` lowers to `char *name` in the reference form and to a `char`
//! array in the plain one.

use super::cursor::Cursor;
use super::{NUMERIC_TYPES, STRING_TYPE};
use crate::error::RewriteWarning;
use crate::lexer::{Token, TokenKind};
use crate::malformed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Width {
    #[default]
    Default,
    Short,
    Long,
    LongLong,
}

impl Width {
    const fn words(self) -> &'static [&'static str] {
        match self {
            Width::Default => &[],
            Width::Short => &["short"],
            Width::Long => &["long"],
            Width::LongLong => &["long", "long"],
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Declaration<'a> {
    reference: bool,
    name: &'a str,
    ty: &'a str,
    unsigned: bool,
    width: Width,
    /// Index of the first token kept verbatim (`=` or a closing `;`).
    tail: usize,
}

pub(super) fn rewrite_let(
    tokens: &mut Vec<Token>,
    _notes: &mut Vec<RewriteWarning>,
) -> Result<(), RewriteWarning> {
    let Some(at) = tokens.iter().position(|t| t.is_word("let")) else {
        return Ok(());
    };

    let decl = match_declaration(tokens, at)?;
    let head = decl.lower()?;

    let mut out = Vec::with_capacity(tokens.len() + head.len());
    out.extend_from_slice(&tokens[..at]);
    out.extend(head);
    if let Some(tail) = tokens.get(decl.tail) {
        if tail.is_punct("=") {
            out.push(Token::space());
        }
        out.extend_from_slice(&tokens[decl.tail..]);
    }

    *tokens = out;
    Ok(())
}

fn match_declaration(tokens: &[Token], at: usize) -> Result<Declaration<'_>, RewriteWarning> {
    let mut cursor = Cursor::new(tokens, at + 1);

    let reference = cursor.eat_punct("*");
    let name = cursor
        .word()
        .ok_or_else(|| malformed!("let", "expected a variable name"))?;
    if !cursor.eat_punct(":") {
        return Err(malformed!("let", "expected `:` after `{name}`"));
    }
    let ty = cursor
        .word()
        .ok_or_else(|| malformed!("let", "expected a type after `{name}:`"))?;

    let mut unsigned = false;
    let mut width = Width::Default;
    loop {
        cursor.skip_whitespace();
        let semi = cursor.pos();
        if !cursor.eat_punct(";") {
            break;
        }
        // a bare trailing `;` ends the declaration
        if cursor.at_end() {
            return finish(reference, name, ty, unsigned, width, semi);
        }

        let mut group = Vec::new();
        while let Some(word) = cursor.word() {
            group.push(word);
        }
        match group.as_slice() {
            ["unsigned"] => unsigned = true,
            ["short"] => width = Width::Short,
            ["long"] => width = Width::Long,
            ["long", "long"] => width = Width::LongLong,
            [] => return Err(malformed!("let", "expected a modifier after `;`")),
            other => return Err(RewriteWarning::UnknownModifier(other.join(" "))),
        }
    }

    cursor.skip_whitespace();
    let tail = cursor.pos();
    match cursor.peek() {
        None => finish(reference, name, ty, unsigned, width, tokens.len()),
        Some(tok) if tok.is_punct("=") => finish(reference, name, ty, unsigned, width, tail),
        Some(tok) => Err(malformed!("let", "unexpected `{tok}` after the type")),
    }
}

fn finish<'a>(
    reference: bool,
    name: &'a str,
    ty: &'a str,
    unsigned: bool,
    width: Width,
    tail: usize,
) -> Result<Declaration<'a>, RewriteWarning> {
    if reference && (unsigned || width != Width::Default) {
        return Err(malformed!("let", "modifiers are not allowed on `let*`"));
    }
    Ok(Declaration {
        reference,
        name,
        ty,
        unsigned,
        width,
        tail,
    })
}

impl Declaration<'_> {
    /// Declaration head without the initializer.
    fn lower(&self) -> Result<Vec<Token>, RewriteWarning> {
        let mut out = Vec::new();
        let numeric = NUMERIC_TYPES.contains(&self.ty);

        if !numeric && self.ty != STRING_TYPE {
            return Err(RewriteWarning::UnknownType(self.ty.to_string()));
        }

        if self.reference {
            if numeric {
                out.extend([
                    Token::word(self.ty),
                    Token::space(),
                    Token::new(TokenKind::Other, "&"),
                ]);
            } else {
                out.extend([Token::word("char"), Token::space(), Token::punct("*")]);
            }
            out.push(Token::word(self.name));
            return Ok(out);
        }

        if self.unsigned {
            out.extend([Token::word("unsigned"), Token::space()]);
        }

        if numeric {
            for word in self.width.words() {
                out.extend([Token::word(*word), Token::space()]);
            }
            out.extend([Token::word(self.ty), Token::space(), Token::word(self.name)]);
        } else {
            if self.width != Width::Default {
                return Err(malformed!("let", "`{}` has no width modifiers", STRING_TYPE));
            }
            out.extend([
                Token::word("char"),
                Token::space(),
                Token::word(self.name),
                Token::new(TokenKind::Other, "["),
                Token::new(TokenKind::Other, "]"),
            ]);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{render, tokenize};

    fn rewrite(line: &str) -> Result<String, RewriteWarning> {
        let mut tokens = tokenize(line);
        rewrite_let(&mut tokens, &mut Vec::new())?;
        Ok(render(&tokens))
    }

    #[test]
    fn plain_numeric() {
        assert_eq!(rewrite("let x: int = 5").unwrap(), "int x = 5");
        assert_eq!(rewrite("let ratio: double = 0.5").unwrap(), "double ratio = 0.5");
        assert_eq!(rewrite("    let y:float=1").unwrap(), "    float y =1");
    }

    #[test]
    fn reference_form() {
        assert_eq!(rewrite("let* p: int = q").unwrap(), "int &p = q");
        assert_eq!(rewrite("let* b: string = a").unwrap(), "char *b = a");
        assert_eq!(rewrite("let *p : double = d").unwrap(), "double &p = d");
    }

    #[test]
    fn strings() {
        assert_eq!(rewrite("let s: string = \"hi\"").unwrap(), "char s[] = \"hi\"");
        assert_eq!(
            rewrite("let s: string; unsigned = \"hi\"").unwrap(),
            "unsigned char s[] = \"hi\""
        );
    }

    #[test]
    fn modifiers() {
        let cases = [
            ("let a: int; unsigned = 3", "unsigned int a = 3"),
            ("let a: int; short = 1", "short int a = 1"),
            ("let a: int; long = 4", "long int a = 4"),
            ("let a: int; long long = 4", "long long int a = 4"),
            ("let a: int; unsigned; long = 4", "unsigned long int a = 4"),
            ("let a: int; unsigned; long long = 4", "unsigned long long int a = 4"),
            ("let a: int; long long; unsigned = 4", "unsigned long long int a = 4"),
            ("let d: double; long = 1", "long double d = 1"),
        ];
        for (input, expected) in cases {
            assert_eq!(rewrite(input).unwrap(), expected, "input {input:?}");
        }
    }

    #[test]
    fn without_initializer() {
        assert_eq!(rewrite("let n: int").unwrap(), "int n");
        assert_eq!(rewrite("let n: int;").unwrap(), "int n;");
        assert_eq!(rewrite("let n: int; unsigned;").unwrap(), "unsigned int n;");
    }

    #[test]
    fn malformed_shapes_are_reported() {
        assert!(matches!(rewrite("let = 5"), Err(RewriteWarning::Malformed { .. })));
        assert!(matches!(rewrite("let x = 5"), Err(RewriteWarning::Malformed { .. })));
        assert!(matches!(rewrite("let x:"), Err(RewriteWarning::Malformed { .. })));
        assert!(matches!(rewrite("let x: int junk = 5"), Err(RewriteWarning::Malformed { .. })));
        assert_eq!(
            rewrite("let x: int; const = 5"),
            Err(RewriteWarning::UnknownModifier("const".to_string()))
        );
        assert_eq!(
            rewrite("let v: Vec = 5"),
            Err(RewriteWarning::UnknownType("Vec".to_string()))
        );
        assert!(matches!(
            rewrite("let* p: int; unsigned = q"),
            Err(RewriteWarning::Malformed { .. })
        ));
    }

    #[test]
    fn lines_without_let_are_untouched() {
        assert_eq!(rewrite("x = letter + 1").unwrap(), "x = letter + 1");
    }
}
