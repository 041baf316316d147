use super::types::{is_keyword, is_primitive};
use super::Scanner;
use crate::error::ConvertError;
use crate::hooks::ScanHooks;
use crate::lexer::Token;

const BINARY_OPS: &[&str] = &[
    "||", "&&", "|", "^", "&", "==", "!=", "<", ">", "<=", ">=", "<<", ">>", ">>>", "+", "-", "*",
    "/", "%",
];

const ASSIGN_OPS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", ">>>=",
];

const PREFIX_OPS: &[&str] = &["+", "-", "!", "~", "++", "--"];

/// Words that can start an operand.
const OPERAND_WORDS: &[&str] = &["this", "super", "new", "true", "false", "null"];

fn is_op_in(token: &Token, ops: &[&str]) -> bool {
    matches!(token, Token::Op(op) if ops.contains(op))
}

impl<'a, H: ScanHooks> Scanner<'a, H> {
    /// One full expression wrapped in a begin/end pair.
    pub(super) fn scan_expression(&mut self) -> Result<(), ConvertError> {
        if matches!(
            self.peek(),
            Token::Semi | Token::RParen | Token::RBracket | Token::RBrace | Token::Comma | Token::Eof
        ) {
            return Err(self.err(format!(
                "expected an expression, found {}",
                self.describe_cur()
            )));
        }
        let first = self.cur();
        self.hooks.begin_expression(first)?;
        self.nested(|s| s.scan_assignment())?;
        let last = self.prev();
        self.hooks.end_expression(last, false)
    }

    fn scan_assignment(&mut self) -> Result<(), ConvertError> {
        self.scan_conditional()?;
        while is_op_in(self.peek(), ASSIGN_OPS) {
            self.advance();
            self.scan_conditional()?;
        }
        Ok(())
    }

    fn scan_conditional(&mut self) -> Result<(), ConvertError> {
        self.scan_binary()?;
        if self.is_op("?") {
            self.advance();
            self.nested(|s| {
                s.scan_assignment()?;
                s.expect(Token::Op(":"), "':'")?;
                s.scan_conditional()
            })?;
        }
        Ok(())
    }

    /// Operands joined by binary operators or `instanceof`. No tree is built,
    /// so precedence does not matter here.
    fn scan_binary(&mut self) -> Result<(), ConvertError> {
        self.scan_unary()?;
        loop {
            if self.is_word("instanceof") {
                self.advance();
                if self.is_word("final") {
                    self.advance();
                }
                self.skip_type()?;
                // pattern binding: `obj instanceof String s`
                if matches!(self.peek(), Token::Word(w) if !is_keyword(w)) {
                    self.advance();
                }
            } else if is_op_in(self.peek(), BINARY_OPS) {
                self.advance();
                self.scan_unary()?;
            } else {
                return Ok(());
            }
        }
    }

    fn scan_unary(&mut self) -> Result<(), ConvertError> {
        loop {
            if is_op_in(self.peek(), PREFIX_OPS) {
                self.advance();
            } else if let Some(after) = self.cast_end() {
                self.pos = after;
            } else {
                return self.scan_postfix();
            }
        }
    }

    /// Index just past `(Type)` at the cursor when it is a cast.
    fn cast_end(&self) -> Option<usize> {
        if self.peek() != &Token::LParen {
            return None;
        }
        let end = self.type_end(self.pos + 1)?;
        if self.at(end).token != Token::RParen {
            return None;
        }
        let primitive = matches!(&self.peek_at(1), Token::Word(w) if is_primitive(w));
        let operand = match &self.at(end + 1).token {
            Token::Word(w) => !is_keyword(w) || OPERAND_WORDS.contains(&w.as_str()),
            Token::Number(_) | Token::Str(_) | Token::Char(_) | Token::LParen => true,
            Token::Op(op) => *op == "!" || *op == "~" || (primitive && PREFIX_OPS.contains(op)),
            _ => false,
        };
        operand.then_some(end + 1)
    }

    fn scan_postfix(&mut self) -> Result<(), ConvertError> {
        self.scan_primary()?;
        loop {
            match self.peek() {
                Token::Dot => {
                    self.advance();
                    match self.peek() {
                        Token::Word(w) if w == "new" => self.scan_new()?,
                        Token::Word(w) if w == "class" || w == "this" || w == "super" => {
                            self.advance();
                        }
                        _ => {
                            if self.is_op("<") {
                                // `obj.<String>m()`
                                let open = self.cur();
                                self.hooks
                                    .got_unsupported(open, "explicit type argument list")?;
                                let end = self.type_args_end(self.pos).ok_or_else(|| {
                                    self.err("unclosed type argument list")
                                })?;
                                self.pos = end;
                            }
                            self.expect_ident()?;
                            if self.peek() == &Token::LParen {
                                self.scan_arguments()?;
                            }
                        }
                    }
                }
                Token::LBracket => {
                    self.advance();
                    self.scan_expression()?;
                    self.expect(Token::RBracket, "']'")?;
                }
                Token::Op("::") => {
                    self.advance();
                    if self.is_word("new") {
                        self.advance();
                    } else {
                        self.expect_ident()?;
                    }
                }
                Token::Op("++") | Token::Op("--") => {
                    self.advance();
                }
                _ => return Ok(()),
            }
        }
    }

    fn scan_primary(&mut self) -> Result<(), ConvertError> {
        match self.peek() {
            Token::Number(_) | Token::Str(_) | Token::Char(_) => {
                self.advance();
                Ok(())
            }
            Token::LParen => {
                if let Some(close) = self.matching_close(self.pos) {
                    if self.at(close + 1).token.is_op("->") {
                        return self.skip_lambda();
                    }
                }
                self.advance();
                self.scan_expression()?;
                self.expect(Token::RParen, "')'")?;
                Ok(())
            }
            Token::Word(w) => match w.as_str() {
                "new" => self.scan_new(),
                "this" | "super" => {
                    self.advance();
                    if self.peek() == &Token::LParen {
                        self.scan_arguments()?;
                    }
                    Ok(())
                }
                "true" | "false" | "null" => {
                    self.advance();
                    Ok(())
                }
                w if is_primitive(w) => {
                    // `int.class`, `int[].class`
                    self.skip_type()?;
                    if self.peek() != &Token::Dot || !self.peek_at(1).is_word("class") {
                        return Err(self.err(format!("unexpected type '{}' in expression", w)));
                    }
                    Ok(())
                }
                w if is_keyword(w) => {
                    Err(self.err(format!("unexpected keyword '{}' in expression", w)))
                }
                _ => {
                    if self.peek_at(1).is_op("->") {
                        return self.skip_lambda();
                    }
                    self.advance();
                    if self.peek() == &Token::LParen {
                        self.scan_arguments()?;
                    }
                    Ok(())
                }
            },
            _ => Err(self.err(format!(
                "expected an expression, found {}",
                self.describe_cur()
            ))),
        }
    }

    /// Report a lambda and step over it. A block body is skipped whole; an
    /// expression body ends at the first `,` `)` `]` `}` or `;` outside
    /// brackets.
    fn skip_lambda(&mut self) -> Result<(), ConvertError> {
        let head = self.cur();
        self.hooks.got_unsupported(head, "lambda expression")?;
        if self.peek() == &Token::LParen {
            self.skip_balanced()?;
        } else {
            self.advance();
        }
        self.advance(); // ->
        if self.peek() == &Token::LBrace {
            return self.skip_balanced();
        }
        let body = self.pos;
        loop {
            match self.peek() {
                Token::LParen | Token::LBracket | Token::LBrace => self.skip_balanced()?,
                Token::Comma
                | Token::RParen
                | Token::RBracket
                | Token::RBrace
                | Token::Semi
                | Token::Eof => break,
                _ => {
                    self.advance();
                }
            }
        }
        if self.pos == body {
            return Err(self.err(format!(
                "expected a lambda body, found {}",
                self.describe_cur()
            )));
        }
        Ok(())
    }

    /// `new T(args)`, `new T[n][]`, `new T[] { ... }`.
    fn scan_new(&mut self) -> Result<(), ConvertError> {
        self.advance();
        let end = self
            .type_name_end(self.pos)
            .ok_or_else(|| self.err(format!("expected a type, found {}", self.describe_cur())))?;
        self.pos = end;
        match self.peek() {
            Token::LParen => {
                self.scan_arguments()?;
                if self.peek() == &Token::LBrace {
                    let brace = self.cur();
                    self.hooks.got_unsupported(brace, "anonymous class body")?;
                    self.skip_balanced()?;
                }
                Ok(())
            }
            Token::LBracket => {
                while self.peek() == &Token::LBracket {
                    self.advance();
                    if self.peek() != &Token::RBracket {
                        self.scan_expression()?;
                    }
                    self.expect(Token::RBracket, "']'")?;
                }
                if self.peek() == &Token::LBrace {
                    self.scan_array_init()?;
                }
                Ok(())
            }
            _ => Err(self.err(format!(
                "expected '(' or '[' after 'new', found {}",
                self.describe_cur()
            ))),
        }
    }

    /// `{ a, { b }, c, }`
    pub(super) fn scan_array_init(&mut self) -> Result<(), ConvertError> {
        self.expect(Token::LBrace, "'{'")?;
        while self.peek() != &Token::RBrace {
            if self.peek() == &Token::LBrace {
                self.nested(|s| s.scan_array_init())?;
            } else {
                self.scan_expression()?;
            }
            if self.peek() == &Token::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(Token::RBrace, "'}'")?;
        Ok(())
    }

    /// `( a, b )` with an argument event before each argument.
    pub(super) fn scan_arguments(&mut self) -> Result<(), ConvertError> {
        let lparen = self.expect(Token::LParen, "'('")?;
        self.hooks.begin_argument_list(lparen)?;
        if self.peek() != &Token::RParen {
            loop {
                let first = self.cur();
                self.hooks.got_argument(first)?;
                self.scan_expression()?;
                if self.peek() == &Token::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let rparen = self.expect(Token::RParen, "')'")?;
        self.hooks.end_argument_list(rparen)
    }
}
