//! Reference scanner for a Java subset.
//!
//! Walks the token stream once with recursive descent and reports what it
//! recognizes through [`ScanHooks`]. Nothing is built here: the scanner only
//! decides where constructs begin and end, the hooks consumer does the rest.
use crate::error::ConvertError;
use crate::hooks::ScanHooks;
use crate::lexer::{self, Spanned, Token};

mod declarations;
mod expressions;
mod statements;
mod types;

/// Deepest nesting of expressions and statements the scanner accepts.
pub const MAX_NESTING: usize = 128;

/// Scan `src` and report every recognized construct to `hooks`.
pub fn scan<H: ScanHooks>(src: &str, hooks: &mut H) -> Result<(), ConvertError> {
    let (comments, tokens): (Vec<Spanned>, Vec<Spanned>) = lexer::lex(src)?
        .into_iter()
        .partition(|t| matches!(t.token, Token::Comment(_)));
    let mut scanner = Scanner::new(src, &tokens, &comments, hooks);
    scanner.scan_unit()
}

// ──────────────────────────────────────────────
// Scanner
// ──────────────────────────────────────────────

struct Scanner<'a, H: ScanHooks> {
    src: &'a str,
    /// Code tokens; the last one is always `Eof`
    tokens: &'a [Spanned],
    comments: &'a [Spanned],
    next_comment: usize,
    pos: usize,
    /// Current expression and statement nesting
    depth: usize,
    hooks: &'a mut H,
}

impl<'a, H: ScanHooks> Scanner<'a, H> {
    fn new(
        src: &'a str,
        tokens: &'a [Spanned],
        comments: &'a [Spanned],
        hooks: &'a mut H,
    ) -> Self {
        Scanner {
            src,
            tokens,
            comments,
            next_comment: 0,
            pos: 0,
            depth: 0,
            hooks,
        }
    }

    fn at(&self, index: usize) -> &'a Spanned {
        let tokens = self.tokens;
        &tokens[index.min(tokens.len() - 1)]
    }

    fn cur(&self) -> &'a Spanned {
        self.at(self.pos)
    }

    fn peek(&self) -> &'a Token {
        &self.cur().token
    }

    fn peek_at(&self, offset: usize) -> &'a Token {
        &self.at(self.pos + offset).token
    }

    /// The token before the cursor.
    fn prev(&self) -> &'a Spanned {
        self.at(self.pos.saturating_sub(1))
    }

    fn advance(&mut self) -> &'a Spanned {
        let t = self.cur();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn at_eof(&self) -> bool {
        self.peek() == &Token::Eof
    }

    fn is_word(&self, w: &str) -> bool {
        self.peek().is_word(w)
    }

    fn is_op(&self, op: &str) -> bool {
        self.peek().is_op(op)
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<&'a Spanned, ConvertError> {
        if self.peek() == &expected {
            Ok(self.advance())
        } else {
            Err(self.err(format!("expected {}, found {}", what, self.describe_cur())))
        }
    }

    fn expect_semi(&mut self) -> Result<&'a Spanned, ConvertError> {
        self.expect(Token::Semi, "';'")
    }

    /// An identifier that is not a reserved word.
    fn expect_ident(&mut self) -> Result<&'a Spanned, ConvertError> {
        match self.peek() {
            Token::Word(w) if !types::is_keyword(w) => Ok(self.advance()),
            _ => Err(self.err(format!(
                "expected an identifier, found {}",
                self.describe_cur()
            ))),
        }
    }

    fn describe_cur(&self) -> String {
        match self.peek() {
            Token::Eof => "end of input".to_owned(),
            _ => format!("'{}'", self.cur().text(self.src)),
        }
    }

    fn err(&self, msg: impl Into<String>) -> ConvertError {
        ConvertError::syntax(self.cur().line, msg)
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ConvertError>,
    ) -> Result<T, ConvertError> {
        if self.depth >= MAX_NESTING {
            return Err(self.err(format!("nesting deeper than {} levels", MAX_NESTING)));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Report every comment that starts before the current token.
    fn flush_comments(&mut self) -> Result<(), ConvertError> {
        let limit = self.cur().start;
        let comments = self.comments;
        while let Some(comment) = comments.get(self.next_comment) {
            if comment.start >= limit {
                break;
            }
            self.hooks.got_comment(comment)?;
            self.next_comment += 1;
        }
        Ok(())
    }

    /// Index of the token matching the opener at `index`.
    fn matching_close(&self, index: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, t) in self.tokens.iter().enumerate().skip(index) {
            match t.token {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                Token::Eof => return None,
                _ => {}
            }
        }
        None
    }

    /// Skip the balanced group opening at the cursor.
    fn skip_balanced(&mut self) -> Result<(), ConvertError> {
        let close = self
            .matching_close(self.pos)
            .ok_or_else(|| self.err(format!("unbalanced {}", self.describe_cur())))?;
        self.pos = close + 1;
        Ok(())
    }

    // -- Compilation unit ----------------------------------------

    fn scan_unit(&mut self) -> Result<(), ConvertError> {
        while !self.at_eof() {
            self.flush_comments()?;
            self.scan_member()?;
        }
        self.flush_comments()
    }
}
