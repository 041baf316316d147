use crate::error::ConvertError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifiers and keywords; the scanner tells them apart
    Word(String),
    /// Integer or floating-point literal, raw text
    Number(String),
    /// String literal, raw text including the quotes
    Str(String),
    /// Character literal, raw text including the quotes
    Char(String),
    /// Operator, longest match (`>>>=`, `->`, `::`, `?`, `:` ...)
    Op(&'static str),
    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Ellipsis,
    At,
    /// Line or block comment, raw text including the markers
    Comment(String),
    // End of input
    Eof,
}

impl Token {
    pub fn is_word(&self, w: &str) -> bool {
        matches!(self, Token::Word(x) if x == w)
    }

    pub fn is_op(&self, op: &str) -> bool {
        matches!(self, Token::Op(x) if *x == op)
    }
}

/// A token with its byte range in the source and the line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
    pub start: usize,
    pub end: usize,
}

impl Spanned {
    /// The token's text as it appears in `src`.
    pub fn text<'s>(&self, src: &'s str) -> &'s str {
        src.get(self.start..self.end).unwrap_or("")
    }
}

// Longest first, so that a prefix never shadows a longer operator.
const OPERATORS: &[&str] = &[
    ">>>=", "<<=", ">>=", ">>>", "->", "::", "++", "--", "&&", "||", "==", "!=", "<=", ">=", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "+", "-", "*", "/", "%", "=", "<", ">",
    "!", "~", "?", ":", "&", "|", "^",
];

pub fn lex(src: &str) -> Result<Vec<Spanned>, ConvertError> {
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut line: u32 = 1;

    while let Some(c) = src[pos..].chars().next() {
        let rest = &src[pos..];
        let start = pos;
        let tok_line = line;

        // Line comment
        if rest.starts_with("//") {
            let len = rest.find('\n').unwrap_or(rest.len());
            tokens.push(Spanned {
                token: Token::Comment(rest[..len].to_owned()),
                line: tok_line,
                start,
                end: start + len,
            });
            pos += len;
            continue;
        }

        // Block comment
        if rest.starts_with("/*") {
            let close = rest[2..]
                .find("*/")
                .ok_or_else(|| ConvertError::syntax(tok_line, "unterminated block comment"))?;
            let len = close + 4;
            let text = &rest[..len];
            line += text.matches('\n').count() as u32;
            tokens.push(Spanned {
                token: Token::Comment(text.to_owned()),
                line: tok_line,
                start,
                end: start + len,
            });
            pos += len;
            continue;
        }

        // Whitespace
        if c.is_whitespace() {
            if c == '\n' {
                line += 1;
            }
            pos += c.len_utf8();
            continue;
        }

        // String and character literals
        if c == '"' || c == '\'' {
            if rest.starts_with("\"\"\"") {
                return Err(ConvertError::syntax(tok_line, "text blocks are not supported"));
            }
            let len = quoted_len(rest, c, tok_line)?;
            let raw = rest[..len].to_owned();
            let token = if c == '"' {
                Token::Str(raw)
            } else {
                Token::Char(raw)
            };
            tokens.push(Spanned {
                token,
                line: tok_line,
                start,
                end: start + len,
            });
            pos += len;
            continue;
        }

        // Number
        let next_is_digit = rest[c.len_utf8()..].starts_with(|n: char| n.is_ascii_digit());
        if c.is_ascii_digit() || (c == '.' && next_is_digit) {
            let len = number_len(rest);
            tokens.push(Spanned {
                token: Token::Number(rest[..len].to_owned()),
                line: tok_line,
                start,
                end: start + len,
            });
            pos += len;
            continue;
        }

        // Identifier / keyword
        if c.is_alphabetic() || c == '_' || c == '$' {
            let len = rest
                .char_indices()
                .find(|(_, ch)| !(ch.is_alphanumeric() || *ch == '_' || *ch == '$'))
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            tokens.push(Spanned {
                token: Token::Word(rest[..len].to_owned()),
                line: tok_line,
                start,
                end: start + len,
            });
            pos += len;
            continue;
        }

        // Punctuation
        let punct = match c {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '{' => Some(Token::LBrace),
            '}' => Some(Token::RBrace),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            ';' => Some(Token::Semi),
            ',' => Some(Token::Comma),
            '@' => Some(Token::At),
            '.' if rest.starts_with("...") => Some(Token::Ellipsis),
            '.' => Some(Token::Dot),
            _ => None,
        };
        if let Some(token) = punct {
            let len = if token == Token::Ellipsis { 3 } else { 1 };
            tokens.push(Spanned {
                token,
                line: tok_line,
                start,
                end: start + len,
            });
            pos += len;
            continue;
        }

        // Operators
        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            tokens.push(Spanned {
                token: Token::Op(op),
                line: tok_line,
                start,
                end: start + op.len(),
            });
            pos += op.len();
            continue;
        }

        return Err(ConvertError::syntax(
            tok_line,
            format!("unexpected character '{}'", c),
        ));
    }

    tokens.push(Spanned {
        token: Token::Eof,
        line,
        start: src.len(),
        end: src.len(),
    });
    Ok(tokens)
}

/// Byte length of the quoted literal at the start of `rest`, quotes included.
fn quoted_len(rest: &str, quote: char, line: u32) -> Result<usize, ConvertError> {
    let mut chars = rest.char_indices().skip(1);
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\\' => {
                if chars.next().is_none() {
                    break;
                }
            }
            '\n' => break,
            _ if ch == quote => return Ok(i + ch.len_utf8()),
            _ => {}
        }
    }
    let what = if quote == '"' { "string" } else { "character" };
    Err(ConvertError::syntax(
        line,
        format!("unterminated {} literal", what),
    ))
}

/// Byte length of the numeric literal at the start of `rest`.
fn number_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let hex = rest.starts_with("0x") || rest.starts_with("0X");
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_alphanumeric() || b == b'_' {
            i += 1;
            // Signed exponent: 1e-5, 2.5E+3
            if !hex
                && (b == b'e' || b == b'E')
                && i < bytes.len()
                && (bytes[i] == b'+' || bytes[i] == b'-')
            {
                i += 1;
            }
        } else if b == b'.' && bytes.get(i + 1).is_some_and(|n| n.is_ascii_digit()) {
            i += 1;
        } else if b == b'.' && i > 0 && !rest[..i].contains('.') && !hex {
            // Trailing dot: `1.` is a double literal unless a member follows
            let after = bytes.get(i + 1).copied();
            if after.is_some_and(|n| n.is_ascii_alphabetic() || n == b'.') {
                break;
            }
            i += 1;
        } else {
            break;
        }
    }
    i
}
