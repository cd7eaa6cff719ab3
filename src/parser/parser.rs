//! SQL Parser
//!
//! Parses tokens of a default expression into an AST expression.

use crate::common::error::{PrismDBError, PrismDBResult};
use crate::parser::ast::*;
use crate::parser::keywords::Keyword;
use crate::parser::tokenizer::{Token, TokenType};

/// Functions that may be written without parentheses
pub const NO_PAREN_FUNCTIONS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_USER",
    "LOCALTIME",
    "LOCALTIMESTAMP",
];

/// Nesting depth at which parsing gives up
const MAX_EXPRESSION_DEPTH: usize = 256;

/// SQL parser
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    /// Create a new parser with the given tokens
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let (line, column) = tokens.last().map_or((1, 1), |t| (t.line, t.column));
            tokens.push(Token::new(TokenType::EOF, String::new(), line, column));
        }
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Parse a complete default expression; trailing tokens are an error
    pub fn parse_default_expression(&mut self) -> PrismDBResult<Expression> {
        if self.current_token().is_eof() {
            return Err(PrismDBError::Parse("Empty default expression".to_string()));
        }

        let expression = self.parse_expression()?;

        if !self.current_token().is_eof() {
            return Err(PrismDBError::Parse(format!(
                "Unexpected token '{}' after expression at line {}, column {}",
                self.describe_current(),
                self.current_token().line,
                self.current_token().column
            )));
        }

        Ok(expression)
    }

    /// Parse expression
    pub fn parse_expression(&mut self) -> PrismDBResult<Expression> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(PrismDBError::Parse(
                "Expression nested too deeply".to_string(),
            ));
        }
        let result = self.parse_additive_expression();
        self.depth -= 1;
        result
    }

    /// Parse additive expression
    fn parse_additive_expression(&mut self) -> PrismDBResult<Expression> {
        let mut left = self.parse_multiplicative_expression()?;

        loop {
            let operator = match &self.current_token().token_type {
                TokenType::Plus => BinaryOperator::Add,
                TokenType::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.position += 1;

            let right = self.parse_multiplicative_expression()?;
            left = Expression::binary(left, operator, right);
        }

        Ok(left)
    }

    /// Parse multiplicative expression
    fn parse_multiplicative_expression(&mut self) -> PrismDBResult<Expression> {
        let mut left = self.parse_unary_expression()?;

        loop {
            let operator = match &self.current_token().token_type {
                TokenType::Star => BinaryOperator::Multiply,
                TokenType::Divide => BinaryOperator::Divide,
                TokenType::Modulo | TokenType::Keyword(Keyword::Mod) => BinaryOperator::Modulo,
                TokenType::Keyword(Keyword::Div) => BinaryOperator::IntegerDivide,
                _ => break,
            };
            self.position += 1;

            let right = self.parse_unary_expression()?;
            left = Expression::binary(left, operator, right);
        }

        Ok(left)
    }

    /// Parse unary expression
    fn parse_unary_expression(&mut self) -> PrismDBResult<Expression> {
        let operator = match &self.current_token().token_type {
            TokenType::Plus => UnaryOperator::Plus,
            TokenType::Minus => UnaryOperator::Minus,
            _ => return self.parse_primary_expression(),
        };
        self.position += 1;

        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(PrismDBError::Parse(
                "Expression nested too deeply".to_string(),
            ));
        }
        let expression = self.parse_unary_expression();
        self.depth -= 1;

        Ok(Expression::Unary {
            operator,
            expression: Box::new(expression?),
        })
    }

    /// Parse primary expression
    fn parse_primary_expression(&mut self) -> PrismDBResult<Expression> {
        match self.current_token().token_type.clone() {
            TokenType::StringLiteral(value) => {
                self.position += 1;
                Ok(Expression::Literal(LiteralValue::String(value)))
            }
            TokenType::NumericLiteral(text) => {
                self.position += 1;
                Ok(Expression::Literal(Self::parse_numeric_literal(&text)?))
            }
            TokenType::Keyword(Keyword::True) => {
                self.position += 1;
                Ok(Expression::Literal(LiteralValue::Boolean(true)))
            }
            TokenType::Keyword(Keyword::False) => {
                self.position += 1;
                Ok(Expression::Literal(LiteralValue::Boolean(false)))
            }
            TokenType::Keyword(Keyword::Null) => {
                self.position += 1;
                Ok(Expression::Literal(LiteralValue::Null))
            }
            TokenType::Identifier(identifier) => {
                self.position += 1;

                if self.current_token().token_type == TokenType::LeftParen {
                    return self.parse_function_call(identifier);
                }

                if self.current_token().token_type == TokenType::Dot {
                    self.consume_token(&TokenType::Dot)?;
                    let column = self.consume_identifier()?;
                    return Ok(Expression::ColumnReference {
                        table: Some(identifier),
                        column,
                    });
                }

                if Self::is_no_paren_function(&identifier) {
                    return Ok(Expression::function(identifier, vec![]));
                }

                Ok(Expression::ColumnReference {
                    table: None,
                    column: identifier,
                })
            }
            TokenType::LeftParen => {
                self.position += 1;
                let expression = self.parse_expression()?;
                self.consume_token(&TokenType::RightParen)?;
                Ok(expression)
            }
            _ => Err(PrismDBError::Parse(format!(
                "Unexpected token '{}' in expression at line {}, column {}",
                self.describe_current(),
                self.current_token().line,
                self.current_token().column
            ))),
        }
    }

    /// Numeric text becomes an integer when it has no fraction or exponent
    /// and fits in 64 bits, otherwise a float. Floats must be finite.
    fn parse_numeric_literal(text: &str) -> PrismDBResult<LiteralValue> {
        let is_integer = text.chars().all(|c| c.is_ascii_digit());
        if is_integer {
            if let Ok(value) = text.parse::<i64>() {
                return Ok(LiteralValue::Integer(value));
            }
        }
        let value = text
            .parse::<f64>()
            .map_err(|_| PrismDBError::Parse(format!("Invalid numeric literal: {}", text)))?;
        if !value.is_finite() {
            return Err(PrismDBError::Parse(format!(
                "Numeric literal {} is out of range",
                text
            )));
        }
        Ok(LiteralValue::Float(value))
    }

    fn is_no_paren_function(name: &str) -> bool {
        NO_PAREN_FUNCTIONS
            .iter()
            .any(|f| f.eq_ignore_ascii_case(name))
    }

    /// Parse function call
    fn parse_function_call(&mut self, name: String) -> PrismDBResult<Expression> {
        self.consume_token(&TokenType::LeftParen)?;

        let mut arguments = Vec::new();
        if self.current_token().token_type != TokenType::RightParen {
            arguments = self.parse_expression_list()?;
        }

        self.consume_token(&TokenType::RightParen)?;

        Ok(Expression::FunctionCall { name, arguments })
    }

    /// Parse comma-separated expressions
    fn parse_expression_list(&mut self) -> PrismDBResult<Vec<Expression>> {
        let mut expressions = vec![self.parse_expression()?];
        while self.consume_token(&TokenType::Comma).is_ok() {
            expressions.push(self.parse_expression()?);
        }
        Ok(expressions)
    }

    // Helper methods

    fn current_token(&self) -> &Token {
        let index = self.position.min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn describe_current(&self) -> String {
        let token = self.current_token();
        match &token.token_type {
            TokenType::EOF => "end of input".to_string(),
            TokenType::StringLiteral(s) => format!("'{}'", s),
            TokenType::Identifier(s) | TokenType::NumericLiteral(s) => s.clone(),
            TokenType::Keyword(k) => k.to_string(),
            _ if !token.text.is_empty() => token.text.clone(),
            other => format!("{:?}", other),
        }
    }

    fn consume_token(&mut self, token_type: &TokenType) -> PrismDBResult<&Token> {
        if self.current_token().token_type == *token_type {
            let token = &self.tokens[self.position];
            self.position += 1;
            Ok(token)
        } else {
            Err(PrismDBError::Parse(format!(
                "Expected {:?}, found '{}'",
                token_type,
                self.describe_current()
            )))
        }
    }

    fn consume_identifier(&mut self) -> PrismDBResult<String> {
        match &self.current_token().token_type {
            TokenType::Identifier(name) => {
                let name = name.clone();
                self.position += 1;
                Ok(name)
            }
            _ => Err(PrismDBError::Parse(format!(
                "Expected identifier, found '{}'",
                self.describe_current()
            ))),
        }
    }
}
