//! Key detection for typed input.
//!
//! Splits a line of text such as `12+3×(4-1)=` into the key presses that
//! would produce it. Besides the keypad labels, a few ASCII aliases are
//! accepted so the calculator can be driven from a plain terminal.

use lazy_static::lazy_static;
use regex::Regex;

use super::keys::{Key, ParseKeyError};

lazy_static! {
    /// One key label or alias at the start of the input. Longer labels come
    /// first so `+/-` wins over `+` and `x²` wins over `x`.
    static ref KEY_TOKEN: Regex = Regex::new(
        r"^(?:AC|ac|sqrt|\+/-|x²|\^2|[0-9]|[.+\-×*xX÷/√r()%=⌫<~Cc])"
    ).unwrap();
}

/// Map a matched label or alias to its key.
fn resolve(token: &str) -> Result<Key, ParseKeyError> {
    let key = match token {
        "*" | "x" | "X" => Key::Multiply,
        "/" => Key::Divide,
        "^2" => Key::Square,
        "sqrt" | "r" => Key::Root,
        "ac" | "C" | "c" => Key::Clear,
        "<" => Key::Backspace,
        "~" => Key::ToggleSign,
        label => label.parse()?,
    };
    Ok(key)
}

/// Split typed text into key presses. Whitespace is ignored.
///
/// Fails on the first piece of text that is neither a keypad label nor an
/// alias.
pub fn scan_keys(input: &str) -> Result<Vec<Key>, ParseKeyError> {
    let mut keys = Vec::new();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        let Some(found) = KEY_TOKEN.find(rest) else {
            let unknown: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
            return Err(ParseKeyError(unknown));
        };
        keys.push(resolve(found.as_str())?);
        rest = rest[found.end()..].trim_start();
    }

    Ok(keys)
}
