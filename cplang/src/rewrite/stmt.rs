//! `print` calls and `import` lines.

use super::cursor::Cursor;
use crate::error::RewriteWarning;
use crate::lexer::{Token, TokenKind};
use crate::malformed;

pub(super) fn rewrite_print(
    tokens: &mut Vec<Token>,
    _notes: &mut Vec<RewriteWarning>,
) -> Result<(), RewriteWarning> {
    if let Some(tok) = tokens.iter_mut().find(|t| t.is_word("print")) {
        *tok = Token::word("printf");
    }
    Ok(())
}

/// `import name` becomes `#include <name.h>`. A `;` right after the name is
/// swallowed, since a directive takes no terminator.
pub(super) fn rewrite_import(
    tokens: &mut Vec<Token>,
    _notes: &mut Vec<RewriteWarning>,
) -> Result<(), RewriteWarning> {
    let Some(at) = tokens.iter().position(|t| t.is_word("import")) else {
        return Ok(());
    };

    let mut cursor = Cursor::new(tokens, at + 1);
    let header = cursor
        .word()
        .ok_or_else(|| malformed!("import", "missing module name"))?;
    cursor.eat_punct(";");
    if !cursor.at_end() {
        return Err(malformed!("import", "unexpected tokens after `{header}`"));
    }

    let mut out = tokens[..at].to_vec();
    out.extend([
        Token::new(TokenKind::Other, "#include"),
        Token::space(),
        Token::punct("<"),
        Token::word(header),
        Token::new(TokenKind::Other, ".h"),
        Token::punct(">"),
    ]);

    *tokens = out;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{render, tokenize};

    #[test]
    fn print_becomes_printf() {
        let mut tokens = tokenize("print(\"%d\\n\", x)");
        rewrite_print(&mut tokens, &mut Vec::new()).unwrap();
        assert_eq!(render(&tokens), "printf(\"%d\\n\", x)");

        let mut tokens = tokenize("printer(x)");
        rewrite_print(&mut tokens, &mut Vec::new()).unwrap();
        assert_eq!(render(&tokens), "printer(x)");
    }

    #[test]
    fn import_becomes_include() {
        for line in ["import math", "import  math;", "import math "] {
            let mut tokens = tokenize(line);
            rewrite_import(&mut tokens, &mut Vec::new()).unwrap();
            assert_eq!(render(&tokens), "#include <math.h>", "line {line:?}");
        }
    }

    #[test]
    fn import_without_name_is_left_alone() {
        let mut tokens = tokenize("import");
        let err = rewrite_import(&mut tokens, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, RewriteWarning::Malformed { keyword: "import", .. }));
        assert_eq!(render(&tokens), "import");
    }
}
