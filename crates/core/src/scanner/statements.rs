use super::types::is_keyword;
use super::Scanner;
use crate::error::ConvertError;
use crate::hooks::ScanHooks;
use crate::lexer::Token;

/// Statements that are recognized and then skipped.
const UNSUPPORTED_STATEMENTS: &[&str] = &["for", "do", "switch", "try", "synchronized", "assert"];

pub(super) const LOCAL_TYPE_DECLS: &[&str] = &["class", "interface", "enum", "record"];

impl<'a, H: ScanHooks> Scanner<'a, H> {
    // -- Blocks --------------------------------------------------

    /// `{ statements }`
    pub(super) fn scan_block(&mut self) -> Result<(), ConvertError> {
        let lbrace = self.expect(Token::LBrace, "'{'")?;
        self.hooks.begin_stmt_block(lbrace)?;
        self.scan_block_rest()
    }

    /// Statements up to and including the closing `}`.
    pub(super) fn scan_block_rest(&mut self) -> Result<(), ConvertError> {
        while self.peek() != &Token::RBrace {
            if self.at_eof() {
                return Err(self.err("unclosed block: expected '}'"));
            }
            self.scan_statement()?;
        }
        self.flush_comments()?;
        let rbrace = self.advance();
        self.hooks.end_stmt_block(rbrace)
    }

    /// The body of an `if`, `else` or `while`. A lone statement is reported
    /// as a block spanning that statement.
    fn scan_body(&mut self) -> Result<(), ConvertError> {
        if self.peek() == &Token::LBrace {
            return self.scan_block();
        }
        let first = self.cur();
        self.hooks.begin_stmt_block(first)?;
        self.scan_statement()?;
        let last = self.prev();
        self.hooks.end_stmt_block(last)
    }

    // -- Statements ----------------------------------------------

    pub(super) fn scan_statement(&mut self) -> Result<(), ConvertError> {
        self.nested(|s| s.scan_one_statement())
    }

    fn scan_one_statement(&mut self) -> Result<(), ConvertError> {
        self.flush_comments()?;
        let tok = self.cur();
        match &tok.token {
            Token::LBrace => self.scan_block(),
            Token::Semi => {
                self.advance();
                self.hooks.got_empty_statement(tok)
            }
            Token::Word(w) => match w.as_str() {
                "if" => self.scan_if(),
                "while" => self.scan_while(),
                "return" => self.scan_return(),
                "break" | "continue" => self.scan_jump(),
                "throw" => {
                    self.advance();
                    self.hooks.got_throw(tok)?;
                    self.scan_expression()?;
                    self.expect_semi()?;
                    Ok(())
                }
                "else" => Err(self.err("'else' without 'if'")),
                "case" | "default" | "catch" | "finally" => {
                    Err(self.err(format!("'{}' outside of its statement", w)))
                }
                w if UNSUPPORTED_STATEMENTS.contains(&w) => {
                    self.hooks
                        .got_unsupported(tok, &format!("'{}' statement", w))?;
                    self.skip_statement()
                }
                w if LOCAL_TYPE_DECLS.contains(&w)
                    && matches!(self.peek_at(1), Token::Word(_)) =>
                {
                    self.hooks
                        .got_unsupported(tok, &format!("local '{}' declaration", w))?;
                    self.skip_statement()
                }
                w if !is_keyword(w) && self.peek_at(1).is_op(":") => {
                    self.hooks.got_unsupported(tok, "labelled statement")?;
                    self.skip_statement()
                }
                _ if self.at_local_variable() => self.scan_local_variable(),
                _ => self.scan_expression_statement(),
            },
            Token::At => self.scan_local_variable(),
            _ => self.scan_expression_statement(),
        }
    }

    fn scan_expression_statement(&mut self) -> Result<(), ConvertError> {
        let first = self.cur();
        self.hooks.got_statement_expression(first)?;
        self.scan_expression()?;
        self.expect_semi()?;
        Ok(())
    }

    /// `if (c) A else if (d) B else C`
    fn scan_if(&mut self) -> Result<(), ConvertError> {
        let kw = self.advance();
        self.hooks.begin_if(kw)?;
        self.scan_condition()?;
        self.scan_body()?;
        while self.is_word("else") {
            if self.peek_at(1).is_word("if") {
                self.advance();
                let kw = self.advance();
                self.hooks.got_else_if(kw)?;
                self.scan_condition()?;
                self.scan_body()?;
            } else {
                let kw = self.advance();
                self.hooks.got_else(kw)?;
                self.scan_body()?;
                break;
            }
        }
        let last = self.prev();
        self.hooks.end_if(last)
    }

    fn scan_while(&mut self) -> Result<(), ConvertError> {
        let kw = self.advance();
        self.hooks.begin_while(kw)?;
        self.scan_condition()?;
        self.scan_body()?;
        let last = self.prev();
        self.hooks.end_while(last)
    }

    /// `( expression )`; the parentheses are not part of the expression.
    fn scan_condition(&mut self) -> Result<(), ConvertError> {
        self.expect(Token::LParen, "'('")?;
        self.scan_expression()?;
        self.expect(Token::RParen, "')'")?;
        Ok(())
    }

    fn scan_return(&mut self) -> Result<(), ConvertError> {
        let kw = self.advance();
        let has_value = self.peek() != &Token::Semi;
        self.hooks.got_return(kw, has_value)?;
        if has_value {
            self.scan_expression()?;
        }
        self.expect_semi()?;
        Ok(())
    }

    /// `break;`, `continue label;`
    fn scan_jump(&mut self) -> Result<(), ConvertError> {
        let kw = self.advance();
        let label = match self.peek() {
            Token::Word(_) => Some(self.expect_ident()?),
            _ => None,
        };
        if kw.token.is_word("break") {
            self.hooks.got_break(kw, label)?;
        } else {
            self.hooks.got_continue(kw, label)?;
        }
        self.expect_semi()?;
        Ok(())
    }

    // -- Local variables -----------------------------------------

    /// `Type name` followed by `=`, `,` or `;`, possibly after modifiers.
    fn at_local_variable(&self) -> bool {
        if self.modifiers_end(self.pos) > self.pos {
            return true;
        }
        let Some(end) = self.type_end(self.pos) else {
            return false;
        };
        let named = matches!(&self.at(end).token, Token::Word(w) if !is_keyword(w));
        let follow = &self.at(end + 1).token;
        named && (follow.is_op("=") || matches!(follow, Token::Comma | Token::Semi))
    }

    /// `[final] Type a = e, b;`
    pub(super) fn scan_local_variable(&mut self) -> Result<(), ConvertError> {
        let first = self.cur();
        let modifiers = self.scan_modifiers();
        self.scan_type()?;
        self.hooks.begin_variable_decl(first, &modifiers)?;
        loop {
            let name = self.expect_ident()?;
            if self.peek() == &Token::LBracket {
                return Err(self.err(
                    "array dimensions after a variable name are not supported; put them on the type",
                ));
            }
            let has_init = self.is_op("=");
            self.hooks.got_variable(name, has_init)?;
            if has_init {
                self.advance();
                self.scan_initializer()?;
            }
            if self.peek() == &Token::Comma {
                self.advance();
            } else {
                break;
            }
        }
        let semi = self.expect_semi()?;
        self.hooks.end_variable_decl(semi)
    }

    /// A variable initializer; a bare `{ ... }` array initializer counts
    /// as one expression.
    fn scan_initializer(&mut self) -> Result<(), ConvertError> {
        if self.peek() != &Token::LBrace {
            return self.scan_expression();
        }
        let first = self.cur();
        self.hooks.begin_expression(first)?;
        self.scan_array_init()?;
        let last = self.prev();
        self.hooks.end_expression(last, false)
    }

    // -- Recovery ------------------------------------------------

    /// Skip one statement without reporting anything inside it.
    pub(super) fn skip_statement(&mut self) -> Result<(), ConvertError> {
        match self.peek() {
            Token::LBrace => return self.skip_balanced(),
            Token::Semi => {
                self.advance();
                return Ok(());
            }
            Token::Word(w) => match w.as_str() {
                "if" => {
                    self.advance();
                    self.skip_balanced()?;
                    self.skip_statement()?;
                    if self.is_word("else") {
                        self.advance();
                        self.skip_statement()?;
                    }
                    return Ok(());
                }
                "for" | "while" => {
                    self.advance();
                    self.skip_balanced()?;
                    return self.skip_statement();
                }
                "switch" | "synchronized" => {
                    self.advance();
                    self.skip_balanced()?;
                    return self.skip_balanced();
                }
                "do" => {
                    self.advance();
                    self.skip_statement()?;
                    if !self.is_word("while") {
                        return Err(self.err("expected 'while' after 'do' body"));
                    }
                    self.advance();
                    self.skip_balanced()?;
                    self.expect_semi()?;
                    return Ok(());
                }
                "try" => {
                    self.advance();
                    if self.peek() == &Token::LParen {
                        self.skip_balanced()?;
                    }
                    self.skip_balanced()?;
                    while self.is_word("catch") {
                        self.advance();
                        self.skip_balanced()?;
                        self.skip_balanced()?;
                    }
                    if self.is_word("finally") {
                        self.advance();
                        self.skip_balanced()?;
                    }
                    return Ok(());
                }
                w if LOCAL_TYPE_DECLS.contains(&w) => {
                    while self.peek() != &Token::LBrace {
                        if self.at_eof() {
                            return Err(self.err(format!("expected the body of '{}'", w)));
                        }
                        self.advance();
                    }
                    return self.skip_balanced();
                }
                w if !is_keyword(w) && self.peek_at(1).is_op(":") => {
                    self.advance();
                    self.advance();
                    return self.skip_statement();
                }
                _ => {}
            },
            _ => {}
        }
        self.skip_to_semi()
    }

    /// Skip through the next `;` outside any brackets.
    pub(super) fn skip_to_semi(&mut self) -> Result<(), ConvertError> {
        loop {
            match self.peek() {
                Token::Semi => {
                    self.advance();
                    return Ok(());
                }
                Token::LParen | Token::LBracket | Token::LBrace => self.skip_balanced()?,
                Token::Eof => return Err(self.err("expected ';', found end of input")),
                Token::RBrace => return Err(self.err("expected ';', found '}'")),
                _ => {
                    self.advance();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::hooks::{HookResult, ScanHooks};
    use crate::lexer::Spanned;
    use crate::scanner::scan;

    #[derive(Default)]
    struct Statements {
        src: String,
        seen: Vec<String>,
    }

    impl ScanHooks for Statements {
        fn got_return(&mut self, _: &Spanned, has_value: bool) -> HookResult {
            self.seen.push(format!("return:{}", has_value));
            Ok(())
        }
        fn got_break(&mut self, _: &Spanned, label: Option<&Spanned>) -> HookResult {
            let label = label.map(|l| l.text(&self.src).to_owned());
            self.seen.push(format!("break:{:?}", label));
            Ok(())
        }
        fn got_empty_statement(&mut self, _: &Spanned) -> HookResult {
            self.seen.push("empty".into());
            Ok(())
        }
        fn begin_variable_decl(&mut self, _: &Spanned, modifiers: &[Spanned]) -> HookResult {
            let mods: Vec<&str> = modifiers.iter().map(|m| m.text(&self.src)).collect();
            self.seen.push(format!("var{:?}", mods));
            Ok(())
        }
        fn got_variable(&mut self, name: &Spanned, has_init: bool) -> HookResult {
            let e = format!("{}:{}", name.text(&self.src), has_init);
            self.seen.push(e);
            Ok(())
        }
        fn got_unsupported(&mut self, _: &Spanned, construct: &str) -> HookResult {
            self.seen.push(construct.to_owned());
            Ok(())
        }
    }

    fn seen(src: &str) -> Vec<String> {
        let mut hooks = Statements {
            src: src.to_owned(),
            ..Default::default()
        };
        scan(src, &mut hooks).unwrap();
        hooks.seen
    }

    #[test]
    fn jumps_and_empty_statements() {
        assert_eq!(
            seen("return; return 1; break; break outer; ;"),
            vec!["return:false", "return:true", "break:None", "break:Some(\"outer\")", "empty"]
        );
    }

    #[test]
    fn local_variables_with_modifiers_and_declarators() {
        assert_eq!(
            seen("final int a = 1, b; int[] c = {1, 2};"),
            vec!["var[\"final\"]", "a:true", "b:false", "var[]", "c:true"]
        );
    }

    #[test]
    fn every_unsupported_statement_is_skipped() {
        let src = "do { x(); } while (a); \
                   try (R r = open()) { y(); } catch (E e) { } finally { } \
                   switch (k) { case 1: break; } \
                   outer: while (true) { break outer; } \
                   class Local { void m() {} } \
                   assert x > 0 : \"msg\"; \
                   return;";
        assert_eq!(
            seen(src),
            vec![
                "'do' statement",
                "'try' statement",
                "'switch' statement",
                "labelled statement",
                "'class' declaration",
                "'assert' statement",
                "return:false",
            ]
        );
    }

    #[test]
    fn dangling_else_scans_cleanly() {
        let src = "if (a) if (b) x(); else y();";
        assert_eq!(seen(src), Vec::<String>::new());
    }
}
