use super::statements::LOCAL_TYPE_DECLS;
use super::types::is_keyword;
use super::Scanner;
use crate::error::ConvertError;
use crate::hooks::ScanHooks;
use crate::lexer::{Spanned, Token};

impl<'a, H: ScanHooks> Scanner<'a, H> {
    // -- Members -------------------------------------------------

    /// One top-level item: a method, a constructor, a skipped type or
    /// import, or a statement.
    pub(super) fn scan_member(&mut self) -> Result<(), ConvertError> {
        let tok = self.cur();
        if let Token::Word(w) = &tok.token {
            if w == "import" || w == "package" {
                self.hooks
                    .got_unsupported(tok, &format!("'{}' declaration", w))?;
                return self.skip_to_semi();
            }
        }

        let after = self.modifiers_end(self.pos);
        let head = self.at(after);
        match &head.token {
            Token::Word(w)
                if LOCAL_TYPE_DECLS.contains(&w.as_str())
                    && matches!(self.at(after + 1).token, Token::Word(_)) =>
            {
                self.hooks
                    .got_unsupported(head, &format!("'{}' declaration", w))?;
                self.pos = after;
                return self.skip_statement();
            }
            Token::At => {
                self.hooks
                    .got_unsupported(head, "annotation type declaration")?;
                self.pos = after + 1;
                return self.skip_statement();
            }
            _ => {}
        }

        if self.at_constructor(after) {
            self.scan_constructor()
        } else if self.at_method(after) {
            self.scan_method()
        } else {
            self.scan_statement()
        }
    }

    /// `Name (params) {` or `Name (params) throws`
    fn at_constructor(&self, at: usize) -> bool {
        let named = matches!(&self.at(at).token, Token::Word(w) if !is_keyword(w));
        if !named || self.at(at + 1).token != Token::LParen {
            return false;
        }
        match self.matching_close(at + 1) {
            Some(close) => {
                let next = &self.at(close + 1).token;
                next == &Token::LBrace || next.is_word("throws")
            }
            None => false,
        }
    }

    /// `[<T>] Type name (`
    fn at_method(&self, at: usize) -> bool {
        let start = if self.at(at).token.is_op("<") {
            match self.type_args_end(at) {
                Some(end) => end,
                None => return false,
            }
        } else {
            at
        };
        let Some(end) = self.type_end(start) else {
            return false;
        };
        matches!(&self.at(end).token, Token::Word(w) if !is_keyword(w))
            && self.at(end + 1).token == Token::LParen
    }

    /// Modifier keywords and annotations at the cursor. An annotation,
    /// arguments included, comes back as a single token.
    pub(super) fn scan_modifiers(&mut self) -> Vec<Spanned> {
        let end = self.modifiers_end(self.pos);
        let mut modifiers = Vec::new();
        while self.pos < end {
            let tok = self.cur();
            if tok.token != Token::At {
                modifiers.push(tok.clone());
                self.advance();
                continue;
            }
            let stop = self.annotation_end(self.pos);
            let last = self.at(stop - 1);
            let text = self.src.get(tok.start..last.end).unwrap_or_default();
            modifiers.push(Spanned {
                token: Token::Word(text.to_owned()),
                line: tok.line,
                start: tok.start,
                end: last.end,
            });
            self.pos = stop;
        }
        modifiers
    }

    // -- Methods and constructors --------------------------------

    fn scan_method(&mut self) -> Result<(), ConvertError> {
        let first = self.cur();
        let modifiers = self.scan_modifiers();
        if self.is_op("<") {
            let tok = self.cur();
            let end = self
                .type_args_end(self.pos)
                .ok_or_else(|| self.err("unclosed type parameter list"))?;
            self.hooks
                .got_unsupported(tok, "generic method type parameters")?;
            self.pos = end;
        }
        self.scan_type()?;
        let name = self.expect_ident()?;
        self.hooks.begin_method_decl(first, &modifiers, name)?;
        self.scan_parameters()?;
        self.scan_throws()?;
        if self.peek() == &Token::Semi {
            let semi = self.advance();
            return self.hooks.end_method_decl(semi, false);
        }
        self.scan_block()?;
        let last = self.prev();
        self.hooks.end_method_decl(last, true)
    }

    fn scan_constructor(&mut self) -> Result<(), ConvertError> {
        let first = self.cur();
        let modifiers = self.scan_modifiers();
        let name = self.expect_ident()?;
        self.hooks.begin_constructor_decl(first, &modifiers, name)?;
        self.scan_parameters()?;
        self.scan_throws()?;
        let lbrace = self.expect(Token::LBrace, "'{'")?;
        self.hooks.begin_stmt_block(lbrace)?;
        self.flush_comments()?;
        if (self.is_word("super") || self.is_word("this")) && self.peek_at(1) == &Token::LParen {
            self.scan_delegate_call()?;
        }
        self.scan_block_rest()?;
        let last = self.prev();
        self.hooks.end_method_decl(last, true)
    }

    /// `super(args);` or `this(args);` opening a constructor body.
    fn scan_delegate_call(&mut self) -> Result<(), ConvertError> {
        let kw = self.cur();
        self.hooks.got_statement_expression(kw)?;
        self.hooks.begin_expression(kw)?;
        self.hooks.got_delegate_call(kw)?;
        self.advance();
        self.scan_arguments()?;
        let last = self.prev();
        self.hooks.end_expression(last, false)?;
        self.expect_semi()?;
        Ok(())
    }

    /// `(Type a, final Type... rest)`; parameter modifiers are dropped.
    fn scan_parameters(&mut self) -> Result<(), ConvertError> {
        self.expect(Token::LParen, "'('")?;
        if self.peek() != &Token::RParen {
            loop {
                self.scan_modifiers();
                self.scan_type()?;
                let ellipsis = match self.peek() {
                    Token::Ellipsis => Some(self.advance()),
                    _ => None,
                };
                let name = self.expect_ident()?;
                self.hooks.got_parameter(name, ellipsis)?;
                if self.peek() == &Token::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(Token::RParen, "')'")?;
        Ok(())
    }

    fn scan_throws(&mut self) -> Result<(), ConvertError> {
        if !self.is_word("throws") {
            return Ok(());
        }
        let kw = self.advance();
        self.hooks.begin_throws(kw)?;
        loop {
            self.scan_type()?;
            if self.peek() == &Token::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.hooks.end_throws()
    }
}

#[cfg(test)]
mod tests {
    use crate::hooks::{HookResult, ScanHooks};
    use crate::lexer::Spanned;
    use crate::scanner::scan;

    #[derive(Default)]
    struct Headers {
        src: String,
        seen: Vec<String>,
    }

    impl Headers {
        fn push(&mut self, event: String) -> HookResult {
            self.seen.push(event);
            Ok(())
        }
    }

    impl ScanHooks for Headers {
        fn got_type_spec(&mut self, first: &Spanned, last: &Spanned) -> HookResult {
            let t = self.src[first.start..last.end].to_owned();
            self.push(format!("type {}", t))
        }
        fn begin_method_decl(&mut self, _: &Spanned, mods: &[Spanned], name: &Spanned) -> HookResult {
            let mods: Vec<&str> = mods.iter().map(|m| m.text(&self.src)).collect();
            let e = format!("method {} {:?}", name.text(&self.src), mods);
            self.push(e)
        }
        fn begin_constructor_decl(&mut self, _: &Spanned, _: &[Spanned], name: &Spanned) -> HookResult {
            let e = format!("constructor {}", name.text(&self.src));
            self.push(e)
        }
        fn got_parameter(&mut self, name: &Spanned, ellipsis: Option<&Spanned>) -> HookResult {
            let e = format!("param {} {}", name.text(&self.src), ellipsis.is_some());
            self.push(e)
        }
        fn begin_throws(&mut self, _: &Spanned) -> HookResult {
            self.push("throws".into())
        }
        fn end_throws(&mut self) -> HookResult {
            self.push("/throws".into())
        }
        fn got_delegate_call(&mut self, kw: &Spanned) -> HookResult {
            let e = format!("delegate {}", kw.text(&self.src));
            self.push(e)
        }
        fn end_method_decl(&mut self, _: &Spanned, has_body: bool) -> HookResult {
            self.push(format!("end {}", has_body))
        }
        fn got_unsupported(&mut self, _: &Spanned, construct: &str) -> HookResult {
            self.push(construct.to_owned())
        }
    }

    fn seen(src: &str) -> Vec<String> {
        let mut hooks = Headers {
            src: src.to_owned(),
            ..Default::default()
        };
        scan(src, &mut hooks).unwrap();
        hooks.seen
    }

    #[test]
    fn method_header_events() {
        assert_eq!(
            seen("@Override public static List<String> names(int n, String... rest) throws IOException, E {}"),
            vec![
                "type List<String>",
                "method names [\"@Override\", \"public\", \"static\"]",
                "type int",
                "param n false",
                "type String",
                "param rest true",
                "throws",
                "type IOException",
                "type E",
                "/throws",
                "end true",
            ]
        );
    }

    #[test]
    fn abstract_method_has_no_body() {
        assert_eq!(
            seen("abstract double area();"),
            vec!["type double", "method area [\"abstract\"]", "end false"]
        );
    }

    #[test]
    fn constructor_with_delegate_call() {
        assert_eq!(
            seen("Point(int x) { this(x, 0); }"),
            vec!["constructor Point", "type int", "param x false", "delegate this", "end true"]
        );
    }

    #[test]
    fn call_statement_is_not_a_constructor() {
        assert_eq!(seen("setup(a);"), Vec::<String>::new());
    }

    #[test]
    fn skipped_declarations() {
        assert_eq!(
            seen("package a.b; import java.util.*; public class A { int x; } <T> T id(T t) { return t; }"),
            vec![
                "'package' declaration",
                "'import' declaration",
                "'class' declaration",
                "generic method type parameters",
                "type T",
                "method id []",
                "type T",
                "param t false",
                "end true",
            ]
        );
    }
}
