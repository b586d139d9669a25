//! Parser for rule text
//!
//! A state machine over the token stream with one call frame per nesting
//! level. Each frame holds a partial expression: empty, complete, or an
//! operator waiting for an operand. `&` and `|` share one precedence level
//! and associate to the left, so `a | b & c` means `(a | b) & c`; use
//! parentheses to group differently.

mod cursor;

use serde::{Deserialize, Serialize};

use crate::core::ast::{Node, Operator, Params, RuleCall, RuleTree};
use crate::core::token::{Token, TokenKind};
use crate::error::{ParseResult, SyntaxError};
use crate::observer::{NoopObserver, Observer};
use crate::registry::RuleRegistry;
use cursor::TokenCursor;

/// Bounds applied while parsing untrusted rule text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseLimits {
    /// Maximum parenthesis nesting
    pub max_depth: usize,
    /// Maximum number of rule calls in one rule string
    pub max_terms: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_terms: 256,
        }
    }
}

/// Parse `source` against `registry` with default limits and no observer
pub fn parse(source: &str, registry: &RuleRegistry) -> ParseResult<RuleTree> {
    Parser::new(source, registry, &NoopObserver).parse()
}

/// Parser for one rule string
pub struct Parser<'a, 'r> {
    source: &'a str,
    cursor: TokenCursor<'a, 'r>,
    registry: &'r RuleRegistry,
    observer: &'r dyn Observer,
    limits: ParseLimits,
    terms: usize,
}

impl<'a, 'r> Parser<'a, 'r> {
    /// Create a parser for `source`
    pub fn new(source: &'a str, registry: &'r RuleRegistry, observer: &'r dyn Observer) -> Self {
        Self {
            source,
            cursor: TokenCursor::new(source, observer),
            registry,
            observer,
            limits: ParseLimits::default(),
            terms: 0,
        }
    }

    /// Apply parse limits
    #[must_use = "builder methods must be chained or built"]
    pub fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Parse the whole rule string
    pub fn parse(mut self) -> ParseResult<RuleTree> {
        match self.parse_group(0, None) {
            Ok(root) => {
                let tree = RuleTree::new(self.source, root);
                self.observer.on_parsed(&tree);
                Ok(tree)
            }
            Err(error) => {
                self.observer.on_syntax_error(self.source, &error);
                Err(error)
            }
        }
    }

    /// Parse until end of input (top level) or the `)` closing this group
    fn parse_group(&mut self, depth: usize, open: Option<usize>) -> ParseResult<Option<Node>> {
        let mut current = Partial::Empty;

        loop {
            let token = self.cursor.next();
            let offset = token.offset();

            match token.kind {
                TokenKind::Whitespace => {}
                TokenKind::Error => return Err(lex_error(token)),
                TokenKind::Eof | TokenKind::CloseParen => {
                    let closes_group = token.kind == TokenKind::CloseParen;
                    if closes_group != open.is_some() {
                        return Err(unexpected(&token));
                    }
                    return current.finish();
                }
                TokenKind::Colon
                | TokenKind::Comma
                | TokenKind::Bool
                | TokenKind::Number
                | TokenKind::String => return Err(unexpected(&token)),
                TokenKind::Function => {
                    if !current.accepts_operand() {
                        return Err(SyntaxError::UnexpectedFunction {
                            name: token.text.into_owned(),
                            offset,
                        });
                    }
                    let call = self.parse_call(token)?;
                    current = current.attach(call, offset)?;
                }
                TokenKind::And | TokenKind::Or => {
                    let op = if token.kind == TokenKind::And {
                        Operator::And
                    } else {
                        Operator::Or
                    };
                    current = current.combine(op, offset)?;
                }
                TokenKind::OpenParen => {
                    if !current.accepts_operand() {
                        return Err(SyntaxError::MissingOperator { offset });
                    }
                    if depth >= self.limits.max_depth {
                        return Err(SyntaxError::TooDeep {
                            limit: self.limits.max_depth,
                            offset,
                        });
                    }
                    let inner = self
                        .parse_group(depth + 1, Some(offset))?
                        .ok_or(SyntaxError::EmptyGroup { offset })?;
                    current = current.attach(inner, offset)?;
                }
            }
        }
    }

    /// Resolve a rule name and read its optional `:param,param` list
    fn parse_call(&mut self, name: Token<'a>) -> ParseResult<Node> {
        let offset = name.offset();
        let rule = self
            .registry
            .get(&name.text)
            .ok_or_else(|| SyntaxError::UnknownRule {
                name: name.text.to_string(),
                offset,
            })?;

        self.terms += 1;
        if self.terms > self.limits.max_terms {
            return Err(SyntaxError::TooManyTerms {
                limit: self.limits.max_terms,
                offset,
            });
        }

        self.cursor.skip_whitespace();
        let params = if self.cursor.peek_kind() == TokenKind::Colon {
            self.cursor.next();
            self.parse_params()?
        } else {
            Params::new()
        };

        Ok(Node::Rule(RuleCall::new(name.text, params, rule)))
    }

    /// Alternate literal and comma until something else shows up; that
    /// token stays in the cursor for the caller.
    fn parse_params(&mut self) -> ParseResult<Params> {
        let mut params = Params::new();

        loop {
            self.cursor.skip_whitespace();
            let token = self.cursor.next();
            match token.kind {
                kind if kind.is_literal() => params.push(token.text.into_owned()),
                TokenKind::Error => return Err(lex_error(token)),
                _ => {
                    return Err(SyntaxError::BadParameter {
                        token: describe(&token),
                        offset: token.offset(),
                    });
                }
            }

            self.cursor.skip_whitespace();
            match self.cursor.peek_kind() {
                TokenKind::Comma => {
                    self.cursor.next();
                }
                kind if kind.is_literal() => {
                    let token = self.cursor.peek();
                    return Err(SyntaxError::MissingComma {
                        token: describe(token),
                        offset: token.offset(),
                    });
                }
                _ => return Ok(params),
            }
        }
    }
}

/// Partially built expression of one nesting level
enum Partial {
    Empty,
    Complete(Node),
    /// Operator seen; `left` fills first, the next operand completes it
    Pending {
        op: Operator,
        offset: usize,
        left: Option<Node>,
    },
}

impl Partial {
    fn accepts_operand(&self) -> bool {
        !matches!(self, Self::Complete(_))
    }

    fn attach(self, node: Node, offset: usize) -> ParseResult<Self> {
        match self {
            Self::Empty => Ok(Self::Complete(node)),
            Self::Pending {
                op,
                offset: op_offset,
                left: None,
            } => Ok(Self::Pending {
                op,
                offset: op_offset,
                left: Some(node),
            }),
            Self::Pending {
                op, left: Some(left), ..
            } => Ok(Self::Complete(op.join(left, node))),
            Self::Complete(_) => Err(SyntaxError::UnexpectedToken {
                token: node.to_string(),
                offset,
            }),
        }
    }

    fn combine(self, op: Operator, offset: usize) -> ParseResult<Self> {
        match self {
            Self::Empty => Ok(Self::Pending {
                op,
                offset,
                left: None,
            }),
            Self::Complete(node) => Ok(Self::Pending {
                op,
                offset,
                left: Some(node),
            }),
            Self::Pending { .. } => Err(SyntaxError::DuplicateOperator {
                operator: op.symbol(),
                offset,
            }),
        }
    }

    fn finish(self) -> ParseResult<Option<Node>> {
        match self {
            Self::Empty => Ok(None),
            Self::Complete(node) => Ok(Some(node)),
            Self::Pending { op, offset, .. } => Err(SyntaxError::DanglingOperator {
                operator: op.symbol(),
                offset,
            }),
        }
    }
}

fn lex_error(token: Token<'_>) -> SyntaxError {
    SyntaxError::Lex {
        offset: token.offset(),
        message: token.text.into_owned(),
    }
}

fn unexpected(token: &Token<'_>) -> SyntaxError {
    SyntaxError::UnexpectedToken {
        token: describe(token),
        offset: token.offset(),
    }
}

/// Token text for messages; zero-width tokens fall back to their kind
fn describe(token: &Token<'_>) -> String {
    if token.text.is_empty() {
        token.kind.name().to_string()
    } else {
        token.text.to_string()
    }
}
