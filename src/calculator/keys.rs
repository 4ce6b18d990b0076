//! Keypad keys accepted by the calculator.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a label does not name a keypad key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown key: {0:?}")]
pub struct ParseKeyError(pub String);

/// A decimal digit, always in `0..=9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 9 { Some(Self(value)) } else { None }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

/// A single key on the calculator keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Digit(Digit),
    Point,
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Square root prefix `√`.
    Root,
    /// Postfix square `x²`.
    Square,
    /// Sign toggle `+/-`.
    ToggleSign,
    OpenParen,
    CloseParen,
    Percent,
    /// All clear `AC`.
    Clear,
    /// Backspace `⌫`.
    Backspace,
    /// Evaluate `=`.
    Equals,
}

/// Keypad layout, six rows of four keys.
pub const KEYPAD: [[Key; 4]; 6] = [
    [Key::Clear, Key::Backspace, Key::Percent, Key::Divide],
    [Key::Digit(Digit(7)), Key::Digit(Digit(8)), Key::Digit(Digit(9)), Key::Multiply],
    [Key::Digit(Digit(4)), Key::Digit(Digit(5)), Key::Digit(Digit(6)), Key::Subtract],
    [Key::Digit(Digit(1)), Key::Digit(Digit(2)), Key::Digit(Digit(3)), Key::Add],
    [Key::Digit(Digit(0)), Key::Point, Key::OpenParen, Key::CloseParen],
    [Key::Root, Key::Square, Key::ToggleSign, Key::Equals],
];

const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

impl Key {
    /// The key for a digit, or `None` outside `0..=9`.
    pub const fn digit(value: u8) -> Option<Self> {
        match Digit::new(value) {
            Some(d) => Some(Self::Digit(d)),
            None => None,
        }
    }

    /// The label printed on the key. This is also the text appended to the
    /// display for keys that edit the expression.
    pub fn label(self) -> &'static str {
        match self {
            Self::Digit(d) => DIGITS[usize::from(d.value())],
            Self::Point => ".",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Root => "√",
            Self::Square => "x²",
            Self::ToggleSign => "+/-",
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            Self::Percent => "%",
            Self::Clear => "AC",
            Self::Backspace => "⌫",
            Self::Equals => "=",
        }
    }

    /// Check if pressing this key appends its label to the buffer.
    pub fn is_appendable(self) -> bool {
        !matches!(
            self,
            Self::ToggleSign | Self::Clear | Self::Backspace | Self::Equals
        )
    }
}

/// Check if a character is one of the binary operator symbols, including the
/// ASCII forms that may appear in a buffer.
pub fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '×' | '÷' | '*' | '/')
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "." => Self::Point,
            "+" => Self::Add,
            "-" => Self::Subtract,
            "×" => Self::Multiply,
            "÷" => Self::Divide,
            "√" => Self::Root,
            "x²" => Self::Square,
            "+/-" => Self::ToggleSign,
            "(" => Self::OpenParen,
            ")" => Self::CloseParen,
            "%" => Self::Percent,
            "AC" => Self::Clear,
            "⌫" => Self::Backspace,
            "=" => Self::Equals,
            _ => match s.as_bytes() {
                [b] => {
                    Self::digit(b.wrapping_sub(b'0')).ok_or_else(|| ParseKeyError(s.to_string()))?
                }
                _ => return Err(ParseKeyError(s.to_string())),
            },
        };
        Ok(key)
    }
}
