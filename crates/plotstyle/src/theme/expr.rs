//! Parser for constructor-call strings such as
//! `element_text(size = 12, colour = "grey30")`.
//!
//! The grammar only admits literals and nested calls:
//!
//! ```text
//! call  := IDENT '(' [arg (',' arg)*] [','] ')'
//! arg   := [IDENT '='] value
//! value := NUMBER | '-' NUMBER | STRING | TRUE | FALSE | NULL | call
//! ```
//!
//! Parsing never evaluates anything; which calls are meaningful is decided
//! by [`Element`](super::Element).

/// A parsed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Call(Call),
}

/// A constructor call with positional and named arguments, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Arg>,
    /// Byte offset of the call name in the input.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub name: Option<String>,
    pub value: Expr,
    /// Byte offset of the argument in the input.
    pub position: usize,
}

/// A constructor string that could not be parsed or built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid setting '{input}' at offset {position}: {message}")]
pub struct ExpressionError {
    pub input: String,
    pub position: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Number(f64),
    Str(String),
    LParen,
    RParen,
    Comma,
    Equals,
    Minus,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn tokenize(input: &'a str) -> Result<Vec<(usize, Token)>, ExpressionError> {
        let mut lexer = Lexer { input, pos: 0 };
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn error(&self, position: usize, message: impl Into<String>) -> ExpressionError {
        ExpressionError {
            input: self.input.to_string(),
            position,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn next_token(&mut self) -> Result<Option<(usize, Token)>, ExpressionError> {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }

        let start = self.pos;
        let Some(c) = self.bump() else {
            return Ok(None);
        };

        let token = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '=' => Token::Equals,
            '-' => Token::Minus,
            '"' | '\'' => Token::Str(self.string(c, start)?),
            c if c.is_ascii_digit() || c == '.' && self.peek().is_some_and(|n| n.is_ascii_digit()) => {
                Token::Number(self.number(start)?)
            }
            c if c.is_alphabetic() || c == '_' || c == '.' => {
                while self
                    .peek()
                    .is_some_and(|n| n.is_alphanumeric() || n == '_' || n == '.')
                {
                    self.bump();
                }
                Token::Ident(self.input[start..self.pos].to_string())
            }
            other => return Err(self.error(start, format!("unexpected character '{}'", other))),
        };
        Ok(Some((start, token)))
    }

    fn string(&mut self, quote: char, start: usize) -> Result<String, ExpressionError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(start, "unterminated string")),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => return Err(self.error(start, "unterminated string")),
                },
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
            }
        }
    }

    fn number(&mut self, start: usize) -> Result<f64, ExpressionError> {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.bump();
            } else if c == 'e' || c == 'E' {
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
            } else {
                break;
            }
        }
        // R integer suffix, as in `2L`
        let text = &self.input[start..self.pos];
        if self.peek() == Some('L') {
            self.bump();
        }
        text.parse::<f64>()
            .map_err(|_| self.error(start, format!("invalid number '{}'", text)))
    }
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(usize, Token)>,
    index: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, position: usize, message: impl Into<String>) -> ExpressionError {
        ExpressionError {
            input: self.input.to_string(),
            position,
            message: message.into(),
        }
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.index)
            .map(|(pos, _)| *pos)
            .unwrap_or(self.input.len())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|(_, token)| token)
    }

    fn peek_second(&self) -> Option<&Token> {
        self.tokens.get(self.index + 1).map(|(_, token)| token)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).map(|(_, token)| token.clone());
        self.index += 1;
        token
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), ExpressionError> {
        let position = self.position();
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            _ => Err(self.error(position, format!("expected {}", what))),
        }
    }

    fn call(&mut self) -> Result<Call, ExpressionError> {
        let position = self.position();
        let name = match self.advance() {
            Some(Token::Ident(name)) => name,
            _ => return Err(self.error(position, "expected a constructor name")),
        };
        self.expect(Token::LParen, "'('")?;

        let mut args = Vec::new();
        loop {
            if self.peek() == Some(&Token::RParen) {
                self.advance();
                break;
            }
            args.push(self.arg()?);

            let position = self.position();
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => break,
                _ => return Err(self.error(position, "expected ',' or ')'")),
            }
        }

        Ok(Call {
            name,
            args,
            position,
        })
    }

    fn arg(&mut self) -> Result<Arg, ExpressionError> {
        let position = self.position();
        let name = match (self.peek(), self.peek_second()) {
            (Some(Token::Ident(name)), Some(Token::Equals)) => {
                let name = name.clone();
                self.index += 2;
                Some(name)
            }
            _ => None,
        };
        let value = self.value()?;
        Ok(Arg {
            name,
            value,
            position,
        })
    }

    fn value(&mut self) -> Result<Expr, ExpressionError> {
        let position = self.position();
        match self.peek().cloned() {
            Some(Token::Number(n)) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            Some(Token::Minus) => {
                self.advance();
                match self.advance() {
                    Some(Token::Number(n)) => Ok(Expr::Number(-n)),
                    _ => Err(self.error(position, "expected a number after '-'")),
                }
            }
            Some(Token::Str(s)) => {
                self.advance();
                Ok(Expr::Str(s))
            }
            Some(Token::Ident(_)) if self.peek_second() == Some(&Token::LParen) => {
                self.call().map(Expr::Call)
            }
            Some(Token::Ident(ident)) => {
                self.advance();
                match ident.as_str() {
                    "TRUE" | "T" => Ok(Expr::Bool(true)),
                    "FALSE" | "F" => Ok(Expr::Bool(false)),
                    "NULL" | "NA" => Ok(Expr::Null),
                    other => Err(self.error(
                        position,
                        format!("'{}' is not a literal; only numbers, strings, TRUE, FALSE and NULL are allowed", other),
                    )),
                }
            }
            _ => Err(self.error(position, "expected a value")),
        }
    }
}

/// Parses a single constructor call spanning the whole input.
pub fn parse_call(input: &str) -> Result<Call, ExpressionError> {
    let tokens = Lexer::tokenize(input)?;
    let mut parser = Parser {
        input,
        tokens,
        index: 0,
    };
    let call = parser.call()?;
    if parser.index < parser.tokens.len() {
        return Err(parser.error(parser.position(), "unexpected input after call"));
    }
    Ok(call)
}
