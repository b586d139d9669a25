//! Lexer for rule text
//!
//! Tokens are produced lazily, one per call to [`Lexer::next_token`]. The
//! lexer tracks parenthesis depth itself so unbalanced input is reported as
//! an error token at the point it is detected.
//!
//! Recognition order at each position, first match wins: end of input, `&`,
//! `|`, `:`, `,`, `(`, `)`, `true`/`false`, quoted string, number,
//! whitespace, rule name.

use crate::core::span::Span;
use crate::core::token::{Token, TokenKind};

/// Lexer for rule text
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    depth: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer from rule text
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            depth: 0,
            done: false,
        }
    }

    /// The rule text being scanned
    pub fn source(&self) -> &'a str {
        self.input
    }

    /// Current open-parenthesis depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Scan the next token
    ///
    /// After an [`TokenKind::Eof`] or [`TokenKind::Error`] token every further
    /// call returns `Eof` at the same position.
    pub fn next_token(&mut self) -> Token<'a> {
        if self.done {
            return Token::new(TokenKind::Eof, "", Span::at(self.position));
        }

        let start = self.position;
        let Some(ch) = self.current_char() else {
            self.done = true;
            if self.depth > 0 {
                return Token::error(
                    format!(
                        "missing {} closing parenthesis at end of input",
                        self.depth
                    ),
                    Span::at(start),
                );
            }
            return Token::new(TokenKind::Eof, "", Span::at(start));
        };

        match ch {
            '&' => return self.single(TokenKind::And),
            '|' => return self.single(TokenKind::Or),
            ':' => return self.single(TokenKind::Colon),
            ',' => return self.single(TokenKind::Comma),
            '(' => {
                self.depth += 1;
                return self.single(TokenKind::OpenParen);
            }
            ')' => {
                if self.depth == 0 {
                    return self.fail(
                        start,
                        format!("closing parenthesis with no opening parenthesis at {start}"),
                    );
                }
                self.depth -= 1;
                return self.single(TokenKind::CloseParen);
            }
            _ => {}
        }

        if let Some(token) = self.read_bool() {
            return token;
        }
        if ch == '\'' || ch == '"' {
            return self.read_string(ch);
        }
        if let Some(token) = self.read_number() {
            return token;
        }
        if ch.is_whitespace() {
            return self.read_while(TokenKind::Whitespace, char::is_whitespace);
        }
        if is_ident_char(ch) {
            return self.read_while(TokenKind::Function, is_ident_char);
        }

        self.fail(start, format!("unexpected character '{ch}' at {start}"))
    }

    /// Get the current character at position
    fn current_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Emit a one-character token and advance past it
    fn single(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.position;
        self.position += 1;
        self.slice_token(kind, start)
    }

    fn slice_token(&self, kind: TokenKind, start: usize) -> Token<'a> {
        Token::new(
            kind,
            &self.input[start..self.position],
            Span::new(start, self.position),
        )
    }

    /// Emit an error token; the lexer yields nothing but EOF afterwards
    fn fail(&mut self, start: usize, message: String) -> Token<'a> {
        self.done = true;
        Token::error(message, Span::new(start, self.position.max(start + 1)))
    }

    fn read_while(&mut self, kind: TokenKind, accept: fn(char) -> bool) -> Token<'a> {
        let start = self.position;
        let len = self
            .rest()
            .find(|c: char| !accept(c))
            .unwrap_or(self.rest().len());
        self.position += len;
        self.slice_token(kind, start)
    }

    /// `true` or `false` as a whole word; `trueish` is a rule name
    fn read_bool(&mut self) -> Option<Token<'a>> {
        let rest = self.rest();
        let word = ["true", "false"]
            .into_iter()
            .find(|word| rest.starts_with(word))?;
        if rest[word.len()..].chars().next().is_some_and(is_ident_char) {
            return None;
        }
        let start = self.position;
        self.position += word.len();
        Some(self.slice_token(TokenKind::Bool, start))
    }

    /// Quoted string, quotes included in the token text
    fn read_string(&mut self, quote: char) -> Token<'a> {
        let start = self.position;
        let body = &self.rest()[1..];
        match body.find(quote) {
            Some(end) => {
                self.position += 1 + end + 1;
                self.slice_token(TokenKind::String, start)
            }
            None => {
                self.position = self.input.len();
                self.fail(start, format!("string opened at {start} is not closed"))
            }
        }
    }

    fn read_number(&mut self) -> Option<Token<'a>> {
        let len = scan_number(self.rest())?;
        let start = self.position;
        self.position += len;
        Some(self.slice_token(TokenKind::Number, start))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    /// Yields every token up to and including the first `Eof` or `Error`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        Some(self.next_token())
    }
}

/// Characters allowed in rule names
pub fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Length of the numeric literal at the start of `text`, if there is one.
///
/// Accepts an optional sign, a `0x`/`0o`/`0b` radix prefix, `_` digit
/// separators, a fractional part and (base 10 only) an exponent. A number
/// immediately followed by a rule-name character is not a number at all:
/// `3abc` scans as `None`, never as a partial `3`.
pub fn scan_number(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let mut radix = 10;
    if bytes.get(i) == Some(&b'0') {
        let prefixed = match bytes.get(i + 1) {
            Some(b'x' | b'X') => Some(16),
            Some(b'o' | b'O') => Some(8),
            Some(b'b' | b'B') => Some(2),
            _ => None,
        };
        if let Some(prefixed) = prefixed {
            radix = prefixed;
            i += 2;
        }
    }

    let mut digits = scan_digits(bytes, &mut i, radix);
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        digits += scan_digits(bytes, &mut i, radix);
    }
    if digits == 0 {
        return None;
    }

    if radix == 10 && matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        if scan_digits(bytes, &mut j, 10) == 0 {
            return None;
        }
        i = j;
    }

    if text[i..].chars().next().is_some_and(is_ident_char) {
        return None;
    }
    Some(i)
}

/// Advance past digits of `radix` and `_` separators after the first digit;
/// returns the digit count
fn scan_digits(bytes: &[u8], i: &mut usize, radix: u32) -> usize {
    let mut count = 0;
    while let Some(&b) = bytes.get(*i) {
        if b == b'_' && count > 0 {
            *i += 1;
        } else if char::from(b).is_digit(radix) {
            *i += 1;
            count += 1;
        } else {
            break;
        }
    }
    count
}
