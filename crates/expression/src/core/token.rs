//! Token types produced by the rule lexer
//!
//! Tokens keep the exact slice of rule text they were scanned from, so rule
//! parameters can be handed to rule functions in their literal form.

use std::borrow::Cow;
use std::fmt;

use super::span::Span;

/// A token in rule text with its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token kind
    pub kind: TokenKind,
    /// Exact input slice, or the diagnostic message for [`TokenKind::Error`]
    pub text: Cow<'a, str>,
    /// Source span for this token
    pub span: Span,
}

impl<'a> Token<'a> {
    /// Create a token borrowing its text from the rule string
    pub fn new(kind: TokenKind, text: &'a str, span: Span) -> Self {
        Self {
            kind,
            text: Cow::Borrowed(text),
            span,
        }
    }

    /// Create an error token carrying `message` as its text
    pub fn error(message: String, span: Span) -> Self {
        Self {
            kind: TokenKind::Error,
            text: Cow::Owned(message),
            span,
        }
    }

    /// Byte offset of the first character of this token
    pub fn offset(&self) -> usize {
        self.span.offset()
    }

    /// Check if this token is the end of input
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

/// The kind of token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Lexing failed; the token text holds the message
    Error,
    /// End of input
    Eof,
    /// `&`
    And,
    /// `|`
    Or,
    /// Rule name, or a bare word used as a parameter
    Function,
    /// `:` opening a parameter list
    Colon,
    /// `,` between parameters
    Comma,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `true` or `false`
    Bool,
    /// Numeric literal (e.g. `42`, `-1.5e3`, `0x1f`)
    Number,
    /// Single- or double-quoted string, quotes included
    String,
    /// Run of Unicode whitespace
    Whitespace,
}

impl TokenKind {
    /// Check if this token may appear as a rule parameter
    ///
    /// Bare words are accepted so `eq:alpha` works without quotes.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Number | Self::String | Self::Function
        )
    }

    /// Check if this token is a logical operator
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Human-readable name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Eof => "EOF",
            Self::And => "and",
            Self::Or => "or",
            Self::Function => "function",
            Self::Colon => "colon",
            Self::Comma => "comma",
            Self::OpenParen => "open paren",
            Self::CloseParen => "close paren",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Whitespace => "whitespace",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Error => write!(f, "error: {}", self.text),
            kind => write!(f, "{kind}: {}", self.text),
        }
    }
}
