//! Single-token lookahead over the lexer

use crate::core::token::{Token, TokenKind};
use crate::lexer::Lexer;
use crate::observer::Observer;

/// Peekable token stream with exactly one slot of lookahead.
///
/// Every token is reported to the observer once, when it leaves the lexer.
pub(crate) struct TokenCursor<'a, 'o> {
    lexer: Lexer<'a>,
    peeked: Option<Token<'a>>,
    observer: &'o dyn Observer,
}

impl<'a, 'o> TokenCursor<'a, 'o> {
    pub(crate) fn new(source: &'a str, observer: &'o dyn Observer) -> Self {
        Self {
            lexer: Lexer::new(source),
            peeked: None,
            observer,
        }
    }

    fn pull(&mut self) -> Token<'a> {
        let token = self.lexer.next_token();
        self.observer.on_token(&token);
        token
    }

    /// Consume the next token
    pub(crate) fn next(&mut self) -> Token<'a> {
        match self.peeked.take() {
            Some(token) => token,
            None => self.pull(),
        }
    }

    /// Look at the next token without consuming it
    pub(crate) fn peek(&mut self) -> &Token<'a> {
        let lexer = &mut self.lexer;
        let observer = self.observer;
        self.peeked.get_or_insert_with(|| {
            let token = lexer.next_token();
            observer.on_token(&token);
            token
        })
    }

    /// Kind of the next token
    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind
    }

    /// Consume whitespace tokens
    pub(crate) fn skip_whitespace(&mut self) {
        while self.peek_kind() == TokenKind::Whitespace {
            self.next();
        }
    }
}
