use super::Scanner;
use crate::error::ConvertError;
use crate::hooks::ScanHooks;
use crate::lexer::Token;

const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null",
];

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

pub(super) const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
];

pub(super) fn is_keyword(w: &str) -> bool {
    KEYWORDS.contains(&w)
}

pub(super) fn is_primitive(w: &str) -> bool {
    PRIMITIVES.contains(&w)
}

/// A word that may start a type: a primitive or a non-reserved name.
fn starts_type(token: &Token) -> bool {
    match token {
        Token::Word(w) => is_primitive(w) || !is_keyword(w),
        _ => false,
    }
}

impl<'a, H: ScanHooks> Scanner<'a, H> {
    /// Index just past the type starting at `at`, array dimensions included.
    pub(super) fn type_end(&self, at: usize) -> Option<usize> {
        let mut i = self.type_name_end(at)?;
        while self.at(i).token == Token::LBracket && self.at(i + 1).token == Token::RBracket {
            i += 2;
        }
        Some(i)
    }

    /// Index just past a possibly qualified, possibly generic type name.
    pub(super) fn type_name_end(&self, at: usize) -> Option<usize> {
        if !starts_type(&self.at(at).token) {
            return None;
        }
        let mut i = at + 1;
        loop {
            if self.at(i).token.is_op("<") {
                i = self.type_args_end(i)?;
            }
            let qualified = self.at(i).token == Token::Dot
                && matches!(&self.at(i + 1).token, Token::Word(w) if !is_keyword(w));
            if !qualified {
                return Some(i);
            }
            i += 2;
        }
    }

    /// Index just past the `<...>` opening at `at`. Depth is counted over
    /// the whole group so `>>` and `>>>` close several levels at once.
    pub(super) fn type_args_end(&self, at: usize) -> Option<usize> {
        let mut depth: i32 = 0;
        let mut i = at;
        loop {
            match &self.at(i).token {
                Token::Op("<") => depth += 1,
                Token::Op(">") => depth -= 1,
                Token::Op(">>") => depth -= 2,
                Token::Op(">>>") => depth -= 3,
                Token::Op("?") | Token::Op("&") | Token::Dot | Token::Comma => {}
                Token::LBracket | Token::RBracket => {}
                Token::Word(w) if w == "extends" || w == "super" || starts_type(&self.at(i).token) => {}
                _ => return None,
            }
            i += 1;
            match depth {
                0 => return Some(i),
                d if d < 0 => return None,
                _ => {}
            }
        }
    }

    /// Consume a type and report it.
    pub(super) fn scan_type(&mut self) -> Result<(), ConvertError> {
        let end = self
            .type_end(self.pos)
            .ok_or_else(|| self.err(format!("expected a type, found {}", self.describe_cur())))?;
        let first = self.cur();
        let last = self.at(end - 1);
        self.pos = end;
        self.hooks.got_type_spec(first, last)
    }

    /// Consume a type without reporting it (casts, `instanceof`, `new`).
    pub(super) fn skip_type(&mut self) -> Result<(), ConvertError> {
        let end = self
            .type_end(self.pos)
            .ok_or_else(|| self.err(format!("expected a type, found {}", self.describe_cur())))?;
        self.pos = end;
        Ok(())
    }

    /// Index just past leading modifiers and annotations starting at `at`.
    pub(super) fn modifiers_end(&self, at: usize) -> usize {
        let mut i = at;
        loop {
            match &self.at(i).token {
                Token::Word(w) if MODIFIERS.contains(&w.as_str()) => {
                    // `synchronized (` opens a statement
                    if w == "synchronized" && self.at(i + 1).token == Token::LParen {
                        return i;
                    }
                    i += 1;
                }
                Token::At if !self.at(i + 1).token.is_word("interface") => {
                    i = self.annotation_end(i);
                }
                _ => return i,
            }
        }
    }

    /// Index just past the annotation whose `@` is at `at`.
    pub(super) fn annotation_end(&self, at: usize) -> usize {
        let mut i = at + 1;
        while matches!(self.at(i).token, Token::Word(_)) {
            i += 1;
            if self.at(i).token != Token::Dot {
                break;
            }
            i += 1;
        }
        if self.at(i).token == Token::LParen {
            if let Some(close) = self.matching_close(i) {
                return close + 1;
            }
        }
        i
    }
}

#[cfg(test)]
mod tests {
    use super::super::Scanner;
    use crate::hooks::ScanHooks;
    use crate::lexer::{lex, Spanned};

    struct Nothing;
    impl ScanHooks for Nothing {}

    fn type_len(src: &str) -> Option<usize> {
        let tokens: Vec<Spanned> = lex(src).unwrap();
        let mut hooks = Nothing;
        let scanner = Scanner::new(src, &tokens, &[], &mut hooks);
        scanner.type_end(0)
    }

    #[test]
    fn simple_and_qualified_types() {
        assert_eq!(type_len("int x"), Some(1));
        assert_eq!(type_len("java.util.List x"), Some(5));
        assert_eq!(type_len("String[][] x"), Some(5));
    }

    #[test]
    fn generic_types_with_shift_closers() {
        assert_eq!(type_len("List<String> x"), Some(4));
        assert_eq!(type_len("Map<K, List<V>> x"), Some(8));
        assert_eq!(type_len("A<B<C<D>>> x"), Some(8));
        assert_eq!(type_len("List<? extends Number> x"), Some(6));
        assert_eq!(type_len("Map.Entry<K, V>[] x"), Some(10));
    }

    #[test]
    fn non_types_are_rejected() {
        assert_eq!(type_len("return x"), None);
        assert_eq!(type_len("a < b;"), None);
        assert_eq!(type_len("42"), None);
    }
}
