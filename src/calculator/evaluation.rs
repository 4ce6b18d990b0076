//! Restricted arithmetic evaluator.
//!
//! Accepts only numerals, `+ - * /`, parentheses, the postfix square `**2`
//! and `sqrt(...)`. There are no names, no variables and no other functions:
//! any other character or identifier is rejected as a syntax error.

use std::fmt;
use thiserror::Error;

use super::formatting::FormattedExpression;

/// Maximum nesting of parentheses, `sqrt` calls and unary signs.
const MAX_DEPTH: usize = 256;

/// Why an expression could not be evaluated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Division by zero")]
    DivisionByZero,

    /// Unbalanced parentheses, unexpected token or malformed numeral.
    #[error("Syntax error: {0}")]
    SyntaxError(String),

    /// Square root of a negative number.
    #[error("Math domain error: {0}")]
    DomainError(String),

    /// The result is not a finite number.
    #[error("Numeric overflow")]
    Overflow,
}

type Result<T> = std::result::Result<T, EvaluationError>;

fn syntax(message: impl Into<String>) -> EvaluationError {
    EvaluationError::SyntaxError(message.into())
}

/// A computed value. Integers stay exact until an operation produces a
/// non-integral result or overflows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Real(r) => r,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Self::Integer(i) => i == 0,
            Self::Real(r) => r == 0.0,
        }
    }

    fn plus(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => a
                .checked_add(b)
                .map_or(Self::Real(a as f64 + b as f64), Self::Integer),
            (a, b) => Self::Real(a.as_f64() + b.as_f64()),
        }
    }

    fn minus(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => a
                .checked_sub(b)
                .map_or(Self::Real(a as f64 - b as f64), Self::Integer),
            (a, b) => Self::Real(a.as_f64() - b.as_f64()),
        }
    }

    fn times(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => a
                .checked_mul(b)
                .map_or(Self::Real(a as f64 * b as f64), Self::Integer),
            (a, b) => Self::Real(a.as_f64() * b.as_f64()),
        }
    }

    fn divided_by(self, rhs: Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(EvaluationError::DivisionByZero);
        }
        let value = match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) if a.checked_rem(b) == Some(0) => a
                .checked_div(b)
                .map_or(Self::Real(a as f64 / b as f64), Self::Integer),
            (a, b) => Self::Real(a.as_f64() / b.as_f64()),
        };
        Ok(value)
    }

    fn negate(self) -> Self {
        match self {
            Self::Integer(i) => i
                .checked_neg()
                .map_or(Self::Real(-(i as f64)), Self::Integer),
            Self::Real(r) => Self::Real(-r),
        }
    }

    fn sqrt(self) -> Result<Self> {
        let value = self.as_f64();
        if value < 0.0 {
            return Err(EvaluationError::DomainError(format!(
                "square root of negative number {value}"
            )));
        }
        Ok(Self::Real(value.sqrt()))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Num(Number),
    Plus,
    Minus,
    Star,
    Slash,
    /// `**`
    Pow,
    Open,
    Close,
    /// The `sqrt` function name.
    Sqrt,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Pow => f.write_str("**"),
            Self::Open => f.write_str("("),
            Self::Close => f.write_str(")"),
            Self::Sqrt => f.write_str("sqrt"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.peek().map(|&(_, next)| next) == Some('*') => {
                chars.next();
                Token::Pow
            }
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::Open,
            ')' => Token::Close,
            '0'..='9' | '.' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if !(next.is_ascii_digit() || next == '.') {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }
                Token::Num(parse_numeral(&input[start..end])?)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if !(next.is_ascii_alphanumeric() || next == '_') {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }
                match &input[start..end] {
                    "sqrt" => Token::Sqrt,
                    name => return Err(syntax(format!("unknown name '{name}'"))),
                }
            }
            other => return Err(syntax(format!("unexpected character '{other}'"))),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn parse_numeral(text: &str) -> Result<Number> {
    if text.contains('.') {
        return text
            .parse::<f64>()
            .map(Number::Real)
            .map_err(|_| syntax(format!("malformed number '{text}'")));
    }
    match text.parse::<i64>() {
        Ok(i) => Ok(Number::Integer(i)),
        // Too large for an exact integer.
        Err(_) => text
            .parse::<f64>()
            .map(Number::Real)
            .map_err(|_| syntax(format!("malformed number '{text}'"))),
    }
}

/// Recursive-descent parser that computes values as it goes.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(syntax(format!("expected '{expected}', found '{token}'"))),
            None => Err(syntax(format!("expected '{expected}' before end of input"))),
        }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            return Err(syntax("expression nested too deeply"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<Number> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    acc = acc.plus(self.term()?);
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    acc = acc.minus(self.term()?);
                }
                _ => return Ok(acc),
            }
        }
    }

    /// term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<Number> {
        let mut acc = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    acc = acc.times(self.unary()?);
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    acc = acc.divided_by(self.unary()?)?;
                }
                _ => return Ok(acc),
            }
        }
    }

    /// unary := ('-' | '+') unary | power
    fn unary(&mut self) -> Result<Number> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.nested(|p| p.unary()).map(Number::negate)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.nested(|p| p.unary())
            }
            _ => self.power(),
        }
    }

    /// power := primary ('**' '2')*
    fn power(&mut self) -> Result<Number> {
        let mut base = self.primary()?;
        while self.peek() == Some(Token::Pow) {
            self.pos += 1;
            match self.next() {
                Some(Token::Num(Number::Integer(2))) => base = base.times(base),
                Some(token) => return Err(syntax(format!("unsupported exponent '{token}'"))),
                None => return Err(syntax("missing exponent")),
            }
        }
        Ok(base)
    }

    /// primary := number | '(' expr ')' | 'sqrt' '(' expr ')'
    fn primary(&mut self) -> Result<Number> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::Open) => {
                let value = self.nested(|p| p.expr())?;
                self.expect(Token::Close)?;
                Ok(value)
            }
            Some(Token::Sqrt) => {
                self.expect(Token::Open)?;
                let value = self.nested(|p| p.expr())?;
                self.expect(Token::Close)?;
                value.sqrt()
            }
            Some(token) => Err(syntax(format!("unexpected '{token}'"))),
            None => Err(syntax("unexpected end of input")),
        }
    }
}

/// Evaluate a formatted expression.
pub fn evaluate(expr: &FormattedExpression) -> Result<Number> {
    evaluate_str(expr.as_str())
}

/// Evaluate strict arithmetic text directly.
pub fn evaluate_str(input: &str) -> Result<Number> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(syntax("empty expression"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    if let Some(extra) = parser.peek() {
        return Err(syntax(format!("unexpected '{extra}'")));
    }

    match value {
        Number::Real(r) if !r.is_finite() => Err(EvaluationError::Overflow),
        value => Ok(value),
    }
}
