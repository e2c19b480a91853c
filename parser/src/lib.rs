//! Inventory Filter Parser
//!
//! This crate turns filter and order-by text into an unbound syntax tree:
//! - Lexing with line/column spans
//! - Recursive-descent parsing with NOT > AND > OR precedence
//! - Dotted relationship paths, `has(..)` existence tests, literals
//!
//! Name resolution happens later, in the compiler.

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::*;
pub use error::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse_filter, parse_order_by, Parser, MAX_NESTING};
