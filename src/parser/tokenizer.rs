//! SQL Tokenizer
//!
//! Breaks default expression text into tokens for parsing.

use crate::common::error::{PrismDBError, PrismDBResult};
use crate::parser::keywords::Keyword;
use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

/// SQL token types
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Literals
    Identifier(String),
    StringLiteral(String),
    NumericLiteral(String),

    // Keywords
    Keyword(Keyword),

    // Operators
    Plus,   // +
    Minus,  // -
    Star,   // *
    Divide, // /
    Modulo, // %

    // Punctuation
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,
    Dot,        // .

    EOF,
}

/// SQL token with position information
#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, text: String, line: usize, column: usize) -> Self {
        Self {
            token_type,
            text,
            line,
            column,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.token_type, TokenType::EOF)
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.token_type, TokenType::Keyword(k) if k == keyword)
    }
}

/// SQL tokenizer
pub struct Tokenizer {
    keywords: HashMap<String, Keyword>,
}

impl Tokenizer {
    pub fn new() -> Self {
        let keywords = Keyword::all()
            .iter()
            .map(|keyword| (keyword.to_string(), *keyword))
            .collect();

        Self { keywords }
    }

    /// Tokenize a SQL string into tokens
    pub fn tokenize(&self, sql: &str) -> PrismDBResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut chars = sql.chars().peekable();
        let mut line = 1;
        let mut column = 1;

        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                self.consume_whitespace(&mut chars, &mut line, &mut column);
                continue;
            }

            let start_line = line;
            let start_column = column;

            let single = match ch {
                '(' => Some(TokenType::LeftParen),
                ')' => Some(TokenType::RightParen),
                ',' => Some(TokenType::Comma),
                '+' => Some(TokenType::Plus),
                '-' => Some(TokenType::Minus),
                '*' => Some(TokenType::Star),
                '/' => Some(TokenType::Divide),
                '%' => Some(TokenType::Modulo),
                _ => None,
            };
            if let Some(token_type) = single {
                chars.next();
                column += 1;
                tokens.push(Token::new(token_type, ch.to_string(), start_line, start_column));
                continue;
            }

            match ch {
                '\'' | '"' => {
                    let (text, new_line, new_column) =
                        self.consume_string(&mut chars, ch, line, column)?;
                    line = new_line;
                    column = new_column;
                    tokens.push(Token::new(
                        TokenType::StringLiteral(text),
                        String::new(),
                        start_line,
                        start_column,
                    ));
                }
                '`' => {
                    let (text, new_column) = self.consume_quoted_identifier(&mut chars, column)?;
                    column = new_column;
                    tokens.push(Token::new(
                        TokenType::Identifier(text),
                        String::new(),
                        start_line,
                        start_column,
                    ));
                }
                '0'..='9' => {
                    let (text, new_column) = self.consume_number(&mut chars, column);
                    column = new_column;
                    tokens.push(Token::new(
                        TokenType::NumericLiteral(text.clone()),
                        text,
                        start_line,
                        start_column,
                    ));
                }
                '.' => {
                    chars.next();
                    column += 1;
                    if chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                        let (digits, new_column) = self.consume_number(&mut chars, column);
                        column = new_column;
                        let text = format!("0.{}", digits);
                        tokens.push(Token::new(
                            TokenType::NumericLiteral(text.clone()),
                            text,
                            start_line,
                            start_column,
                        ));
                    } else {
                        tokens.push(Token::new(
                            TokenType::Dot,
                            ".".to_string(),
                            start_line,
                            start_column,
                        ));
                    }
                }
                _ if self.is_identifier_start(ch) => {
                    let (text, new_column) = self.consume_identifier(&mut chars, column);
                    column = new_column;

                    match self.keywords.get(&text.to_uppercase()) {
                        Some(&keyword) => tokens.push(Token::new(
                            TokenType::Keyword(keyword),
                            text,
                            start_line,
                            start_column,
                        )),
                        None => tokens.push(Token::new(
                            TokenType::Identifier(text.clone()),
                            text,
                            start_line,
                            start_column,
                        )),
                    }
                }
                _ => {
                    return Err(PrismDBError::Parse(format!(
                        "Unexpected character '{}' at line {}, column {}",
                        ch, line, column
                    )));
                }
            }
        }

        tokens.push(Token::new(TokenType::EOF, String::new(), line, column));

        Ok(tokens)
    }

    fn consume_whitespace(
        &self,
        chars: &mut Peekable<Chars>,
        line: &mut usize,
        column: &mut usize,
    ) {
        while let Some(&ch) = chars.peek() {
            if !ch.is_whitespace() {
                break;
            }
            chars.next();
            if ch == '\n' {
                *line += 1;
                *column = 1;
            } else {
                *column += 1;
            }
        }
    }

    /// Consume a string quoted with `quote`. Supports backslash escapes and
    /// a doubled quote character.
    fn consume_string(
        &self,
        chars: &mut Peekable<Chars>,
        quote: char,
        mut line: usize,
        mut column: usize,
    ) -> PrismDBResult<(String, usize, usize)> {
        chars.next(); // Consume opening quote
        column += 1;

        let mut result = String::new();
        let mut escaped = false;

        while let Some(ch) = chars.next() {
            column += 1;

            if escaped {
                match ch {
                    'n' => result.push('\n'),
                    't' => result.push('\t'),
                    'r' => result.push('\r'),
                    '0' => result.push('\0'),
                    _ => result.push(ch),
                }
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                if chars.peek() == Some(&quote) {
                    chars.next();
                    column += 1;
                    result.push(quote);
                } else {
                    return Ok((result, line, column));
                }
            } else if ch == '\n' {
                line += 1;
                column = 1;
                result.push(ch);
            } else {
                result.push(ch);
            }
        }

        Err(PrismDBError::Parse(
            "Unterminated string literal".to_string(),
        ))
    }

    fn consume_quoted_identifier(
        &self,
        chars: &mut Peekable<Chars>,
        mut column: usize,
    ) -> PrismDBResult<(String, usize)> {
        chars.next(); // Consume opening backtick
        column += 1;

        let mut result = String::new();
        while let Some(ch) = chars.next() {
            column += 1;
            if ch == '`' {
                if chars.peek() == Some(&'`') {
                    chars.next();
                    column += 1;
                    result.push('`');
                } else {
                    return Ok((result, column));
                }
            } else {
                result.push(ch);
            }
        }

        Err(PrismDBError::Parse(
            "Unterminated quoted identifier".to_string(),
        ))
    }

    fn consume_digits(&self, chars: &mut Peekable<Chars>, result: &mut String, column: &mut usize) {
        while let Some(&ch) = chars.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            result.push(ch);
            chars.next();
            *column += 1;
        }
    }

    fn consume_number(&self, chars: &mut Peekable<Chars>, mut column: usize) -> (String, usize) {
        let mut result = String::new();

        // Integer part
        self.consume_digits(chars, &mut result, &mut column);

        // Fractional part
        if let Some(&'.') = chars.peek() {
            result.push('.');
            chars.next();
            column += 1;
            self.consume_digits(chars, &mut result, &mut column);
        }

        // Exponent part
        if let Some(&e) = chars.peek() {
            if e == 'e' || e == 'E' {
                result.push(e);
                chars.next();
                column += 1;

                if let Some(&sign) = chars.peek() {
                    if sign == '+' || sign == '-' {
                        result.push(sign);
                        chars.next();
                        column += 1;
                    }
                }
                self.consume_digits(chars, &mut result, &mut column);
            }
        }

        (result, column)
    }

    fn consume_identifier(&self, chars: &mut Peekable<Chars>, mut column: usize) -> (String, usize) {
        let mut result = String::new();

        while let Some(&ch) = chars.peek() {
            if !self.is_identifier_char(ch) {
                break;
            }
            result.push(ch);
            chars.next();
            column += 1;
        }

        (result, column)
    }

    fn is_identifier_start(&self, ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_identifier_char(&self, ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(sql: &str) -> PrismDBResult<Vec<TokenType>> {
        Ok(Tokenizer::new()
            .tokenize(sql)?
            .into_iter()
            .map(|t| t.token_type)
            .collect())
    }

    #[test]
    fn test_tokenize_function_call() -> PrismDBResult<()> {
        assert_eq!(
            types("(RAND() + 5)")?,
            vec![
                TokenType::LeftParen,
                TokenType::Identifier("RAND".to_string()),
                TokenType::LeftParen,
                TokenType::RightParen,
                TokenType::Plus,
                TokenType::NumericLiteral("5".to_string()),
                TokenType::RightParen,
                TokenType::EOF,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_tokenize_literals() -> PrismDBResult<()> {
        assert_eq!(
            types("1.5e3 .5 'it''s' \"a\\tb\" null `odd name` 7 div 2")?,
            vec![
                TokenType::NumericLiteral("1.5e3".to_string()),
                TokenType::NumericLiteral("0.5".to_string()),
                TokenType::StringLiteral("it's".to_string()),
                TokenType::StringLiteral("a\tb".to_string()),
                TokenType::Keyword(Keyword::Null),
                TokenType::Identifier("odd name".to_string()),
                TokenType::NumericLiteral("7".to_string()),
                TokenType::Keyword(Keyword::Div),
                TokenType::NumericLiteral("2".to_string()),
                TokenType::EOF,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_tokenize_errors() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize("'open").is_err());
        assert!(tokenizer.tokenize("`open").is_err());
        assert!(tokenizer.tokenize("1 = 1").is_err());
    }
}
