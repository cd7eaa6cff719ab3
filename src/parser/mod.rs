//! SQL Parser for column default expressions
//!
//! Converts default text such as `(RAND() + 5)` into an AST expression that
//! the binder turns into an expression tree.

pub mod ast;
pub mod keywords;
pub mod parser;
pub mod tokenizer;

pub use ast::*;
pub use keywords::*;
pub use parser::*;
pub use tokenizer::*;

use crate::common::error::PrismDBResult;

/// Main parser interface
pub struct SqlParser {
    tokenizer: Tokenizer,
}

impl SqlParser {
    /// Create a new SQL parser
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
        }
    }

    /// Parse a default expression. The whole input must be consumed.
    pub fn parse_expression(&self, sql: &str) -> PrismDBResult<Expression> {
        let tokens = self.tokenizer.tokenize(sql)?;
        let mut parser = Parser::new(tokens);
        parser.parse_default_expression()
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a single default expression (convenience function)
pub fn parse_default_expression(sql: &str) -> PrismDBResult<Expression> {
    SqlParser::new().parse_expression(sql)
}
