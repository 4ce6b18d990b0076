//! Keypad calculator engine.
//!
//! This module provides functionality to:
//! - Edit an expression buffer one key press at a time
//! - Translate keypad notation (√, ×, ÷, x², %) into strict arithmetic
//! - Evaluate it with a restricted parser and normalize the result
//! - Detect key presses in typed text
//! - Copy results to the clipboard

mod clipboard;
mod detection;
mod editor;
mod evaluation;
mod formatting;
mod keys;
mod normalize;

pub use clipboard::{ClipboardError, copy_display, copy_to_clipboard};
pub use detection::scan_keys;
pub use editor::{Calculator, Event, LeadingZero, evaluate_expression};
pub use evaluation::{EvaluationError, Number, evaluate, evaluate_str};
pub use formatting::{FormattedExpression, format_expression};
pub use keys::{Digit, KEYPAD, Key, ParseKeyError};
pub use normalize::{DEFAULT_PRECISION, MAX_PRECISION, normalize};
