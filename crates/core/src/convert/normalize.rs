//! Rewrites of extracted expression text for the frame editor.
//!
//! Both functions re-tokenize their input, so keywords inside string
//! literals, comments or longer identifiers are never touched.

use crate::lexer::{self, Token};

/// Replace every `instanceof` keyword with the `<:` operator. Everything
/// else, whitespace included, is copied unchanged.
pub fn normalize_operators(text: &str) -> String {
    let Ok(tokens) = lexer::lex(text) else {
        return text.to_owned();
    };
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for tok in tokens.iter().filter(|t| t.token.is_word("instanceof")) {
        out.push_str(&text[copied..tok.start]);
        out.push_str("<:");
        copied = tok.end;
    }
    out.push_str(&text[copied..]);
    out
}

/// Split `target = value` at its first top-level plain `=`.
pub fn split_assignment(text: &str) -> Option<(String, String)> {
    let tokens = lexer::lex(text).ok()?;
    let mut depth = 0i32;
    for tok in &tokens {
        match tok.token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => depth -= 1,
            Token::Op("=") if depth == 0 => {
                let target = text[..tok.start].trim();
                let value = text[tok.end..].trim();
                if target.is_empty() {
                    return None;
                }
                return Some((target.to_owned(), value.to_owned()));
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instanceof_becomes_subtype_operator() {
        assert_eq!(normalize_operators("obj instanceof String"), "obj <: String");
    }

    #[test]
    fn whitespace_and_other_tokens_are_kept() {
        assert_eq!(
            normalize_operators("a&&(b  instanceof List<?>)"),
            "a&&(b  <: List<?>)"
        );
        assert_eq!(normalize_operators("g(1,2)"), "g(1,2)");
    }

    #[test]
    fn literals_and_identifiers_are_not_rewritten() {
        assert_eq!(
            normalize_operators("say(\"x instanceof y\") + instanceofCount"),
            "say(\"x instanceof y\") + instanceofCount"
        );
    }

    #[test]
    fn unlexable_text_is_returned_unchanged() {
        assert_eq!(normalize_operators("a # instanceof"), "a # instanceof");
    }

    #[test]
    fn plain_assignment_splits() {
        assert_eq!(
            split_assignment("total = total + x[i]"),
            Some(("total".into(), "total + x[i]".into()))
        );
        assert_eq!(
            split_assignment("a[i = 1] = f(b = 2)"),
            Some(("a[i = 1]".into(), "f(b = 2)".into()))
        );
    }

    #[test]
    fn other_operators_do_not_split() {
        assert_eq!(split_assignment("x += 1"), None);
        assert_eq!(split_assignment("a == b"), None);
        assert_eq!(split_assignment("count++"), None);
        assert_eq!(split_assignment("print(a = 1)"), None);
    }
}
