//! Display buffer state machine.
//!
//! The calculator keeps a single piece of state: the text on the display.
//! Each key press is turned into an [`Event`] and applied to produce the next
//! [`DisplayState`]. Editing is permissive; nothing is validated until `=`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::evaluation::{EvaluationError, evaluate};
use super::formatting::format_expression;
use super::keys::{Key, is_operator_char};
use super::normalize::{DEFAULT_PRECISION, normalize};

/// Text shown while the calculator is in the error state.
pub const ERROR_TEXT: &str = "Error";

lazy_static! {
    /// A plain numeral at the very end of the buffer.
    static ref TRAILING_NUMERAL: Regex = Regex::new(r"[0-9]+(?:\.[0-9]+)?$").unwrap();
    static ref NUMERAL: Regex = Regex::new(r"^[0-9]+(?:\.[0-9]+)?$").unwrap();
}

/// What happens to the lone `0` on a fresh display when a non-digit symbol
/// is pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadingZero {
    /// Keep the `0` for every symbol: `0+`, `0√`, `0(`. The kept `0` then
    /// multiplies whatever follows it.
    Append,
    /// Replace the `0` with `√` or `(`; keep it for everything else.
    #[default]
    Replace,
}

/// The calculator display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayState {
    /// An expression being edited, or the result of the last evaluation.
    Normal(String),
    /// The last evaluation failed.
    Error,
}

impl DisplayState {
    /// The text to render.
    pub fn text(&self) -> &str {
        match self {
            Self::Normal(text) => text,
            Self::Error => ERROR_TEXT,
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::Normal("0".to_string())
    }
}

/// An edit applied to the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Clear,
    Backspace,
    ToggleSign,
    /// Append the label of a digit, operator or symbol key.
    Append(Key),
    Evaluate,
}

impl From<Key> for Event {
    fn from(key: Key) -> Self {
        match key {
            Key::Clear => Self::Clear,
            Key::Backspace => Self::Backspace,
            Key::ToggleSign => Self::ToggleSign,
            Key::Equals => Self::Evaluate,
            other => Self::Append(other),
        }
    }
}

/// Keypad calculator: owns the display and applies key presses to it.
#[derive(Clone, Debug)]
pub struct Calculator {
    state: DisplayState,
    precision: u32,
    leading_zero: LeadingZero,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            state: DisplayState::default(),
            precision: DEFAULT_PRECISION,
            leading_zero: LeadingZero::default(),
        }
    }

    /// Set the number of decimal places kept in results.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Set how a symbol pressed on a fresh `0` display is handled.
    pub fn with_leading_zero(mut self, policy: LeadingZero) -> Self {
        self.leading_zero = policy;
        self
    }

    /// The text to render.
    pub fn display(&self) -> &str {
        self.state.text()
    }

    /// Check if the last evaluation failed.
    pub fn is_error(&self) -> bool {
        self.state == DisplayState::Error
    }

    /// Press a key and return the new display text.
    pub fn press(&mut self, key: Key) -> &str {
        self.apply(Event::from(key));
        self.display()
    }

    /// Apply an edit to the display.
    pub fn apply(&mut self, event: Event) {
        if let Event::Append(key) = event
            && !key.is_appendable()
        {
            return self.apply(Event::from(key));
        }

        let next = match (&self.state, event) {
            (_, Event::Clear) => DisplayState::default(),
            (DisplayState::Error, Event::Backspace) => DisplayState::default(),
            (DisplayState::Error, Event::ToggleSign | Event::Evaluate) => return,
            (DisplayState::Error, Event::Append(key)) => {
                DisplayState::Normal(append("0", key, self.leading_zero))
            }
            (DisplayState::Normal(text), Event::Backspace) => {
                DisplayState::Normal(backspace(text))
            }
            (DisplayState::Normal(text), Event::ToggleSign) => match toggle_sign(text) {
                Some(toggled) => DisplayState::Normal(toggled),
                None => return,
            },
            (DisplayState::Normal(text), Event::Append(key)) => {
                DisplayState::Normal(append(text, key, self.leading_zero))
            }
            (DisplayState::Normal(text), Event::Evaluate) => {
                if text.is_empty() || text == "0" {
                    return;
                }
                match evaluate_expression(text, self.precision) {
                    Ok(result) => {
                        debug!(expression = %text, %result, "Evaluated expression");
                        DisplayState::Normal(result)
                    }
                    Err(err) => {
                        debug!(expression = %text, error = %err, "Evaluation failed");
                        DisplayState::Error
                    }
                }
            }
        };

        trace!(?event, display = next.text(), "Applied event");
        self.state = next;
    }
}

/// Evaluate a keypad expression and format the result for the display.
///
/// A single dangling operator at the end (`7+`) is ignored.
pub fn evaluate_expression(raw: &str, precision: u32) -> Result<String, EvaluationError> {
    let raw = match raw.chars().last() {
        Some(c) if is_operator_char(c) => &raw[..raw.len() - c.len_utf8()],
        _ => raw,
    };

    let formatted = format_expression(raw);
    trace!(%formatted, "Formatted expression");

    let value = evaluate(&formatted)?;
    Ok(normalize(value, precision))
}

fn append(text: &str, key: Key, policy: LeadingZero) -> String {
    let label = key.label();
    if text != "0" {
        return format!("{text}{label}");
    }

    match (key, policy) {
        (Key::Digit(_), _) => label.to_string(),
        (Key::Point, _) => "0.".to_string(),
        (Key::Root | Key::OpenParen, LeadingZero::Replace) => label.to_string(),
        _ => format!("0{label}"),
    }
}

/// Drop the last token: `x²` as a whole, otherwise one character.
fn backspace(text: &str) -> String {
    let remainder = match text.strip_suffix("x²") {
        Some(rest) => rest,
        None => {
            let mut chars = text.chars();
            chars.next_back();
            chars.as_str()
        }
    };

    if remainder.is_empty() {
        "0".to_string()
    } else {
        remainder.to_string()
    }
}

/// Negate the trailing numeral or parenthesized group, or unwrap it if it is
/// already of the form `(-X)` with `X` a numeral or a single group. Returns
/// `None` when there is nothing to negate.
fn toggle_sign(text: &str) -> Option<String> {
    if text == "0" || text.ends_with(is_operator_char) {
        return None;
    }

    let start = if text.ends_with(')') {
        matching_open_paren(text)?
    } else {
        TRAILING_NUMERAL.find(text)?.start()
    };

    let (prefix, token) = text.split_at(start);
    let negated = token.strip_prefix("(-").and_then(|t| t.strip_suffix(')'));
    let plain = token.strip_prefix('(').and_then(|t| t.strip_suffix(')'));

    let toggled = match (negated, plain) {
        (Some(inner), _) if is_group(inner) => format!("{prefix}{inner}"),
        // A bare numeral must not fuse with a preceding operand: `5(-12)`.
        (Some(inner), _) if NUMERAL.is_match(inner) => {
            let separated = prefix.is_empty()
                || prefix.ends_with(|c: char| c == '(' || c == '√' || is_operator_char(c));
            if separated {
                format!("{prefix}{inner}")
            } else {
                format!("{prefix}({inner})")
            }
        }
        (None, Some(inner)) if NUMERAL.is_match(inner) => format!("{prefix}(-{inner})"),
        _ => format!("{prefix}(-{token})"),
    };

    Some(toggled)
}

/// Check if `text` is exactly one balanced parenthesized group.
fn is_group(text: &str) -> bool {
    text.starts_with('(') && text.ends_with(')') && matching_open_paren(text) == Some(0)
}

/// Byte index of the `(` that balances the `)` ending `text`.
fn matching_open_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
