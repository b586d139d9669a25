//! Core data types shared by the lexer, parser and evaluator

pub mod ast;
pub mod span;
pub mod token;

pub use ast::{Node, Operator, Params, RuleCall, RuleTree};
pub use span::Span;
pub use token::{Token, TokenKind};
