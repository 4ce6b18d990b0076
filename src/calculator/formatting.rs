//! Translation of keypad notation into strict arithmetic.
//!
//! The display buffer holds what the user typed (`5(3+1)`, `2√9`, `50%`,
//! `3x²`). Before evaluation it is lexed into a small token list, rewritten
//! structurally, and rendered as an expression the evaluator accepts
//! (`5*(3+1)`, `2*sqrt(9)`, `(50/100)`, `3**2`).

use std::fmt;

/// A buffer rewritten into strict arithmetic notation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattedExpression(String);

impl FormattedExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormattedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Lexeme {
    /// Run of digits and decimal points, e.g. `12`, `0.5`, `3.`.
    Numeral(String),
    Operator(char),
    Root,
    Square,
    Percent,
    Open,
    Close,
    /// `**2`, produced from `x²`.
    Power,
    /// `sqrt` call head, produced from `√`.
    Sqrt,
    /// Anything else; passed through for the evaluator to reject.
    Other(char),
}

/// Rewrite a raw display buffer into an expression for the evaluator.
///
/// This never fails. Input that cannot be made sense of is passed through
/// and rejected at evaluation time.
pub fn format_expression(raw: &str) -> FormattedExpression {
    let lexemes = lex(raw);
    let lexemes = insert_implicit_multiplication(lexemes);
    let lexemes = substitute_symbols(lexemes);
    let lexemes = desugar_percent(lexemes);
    let lexemes = desugar_root(lexemes);
    FormattedExpression(render(&lexemes))
}

fn lex(raw: &str) -> Vec<Lexeme> {
    let mut lexemes = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        let lexeme = match c {
            '0'..='9' | '.' => {
                let mut numeral = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !(next.is_ascii_digit() || next == '.') {
                        break;
                    }
                    numeral.push(next);
                    chars.next();
                }
                Lexeme::Numeral(numeral)
            }
            'x' if chars.peek() == Some(&'²') => {
                chars.next();
                Lexeme::Square
            }
            '+' | '-' | '×' | '÷' | '*' | '/' => Lexeme::Operator(c),
            '√' => Lexeme::Root,
            '%' => Lexeme::Percent,
            '(' => Lexeme::Open,
            ')' => Lexeme::Close,
            c if c.is_whitespace() => continue,
            other => Lexeme::Other(other),
        };
        lexemes.push(lexeme);
    }

    lexemes
}

/// `5(` becomes `5*(`, `2√` becomes `2*√`, and `)(` / `)√` likewise.
fn insert_implicit_multiplication(lexemes: Vec<Lexeme>) -> Vec<Lexeme> {
    let mut out: Vec<Lexeme> = Vec::with_capacity(lexemes.len());

    for lexeme in lexemes {
        let opens_operand = matches!(lexeme, Lexeme::Open | Lexeme::Root);
        let closes_operand = matches!(out.last(), Some(Lexeme::Numeral(_) | Lexeme::Close));
        if opens_operand && closes_operand {
            out.push(Lexeme::Operator('*'));
        }
        out.push(lexeme);
    }

    out
}

/// Keypad operators become ASCII operators and `x²` becomes `**2`.
fn substitute_symbols(lexemes: Vec<Lexeme>) -> Vec<Lexeme> {
    lexemes
        .into_iter()
        .map(|lexeme| match lexeme {
            Lexeme::Operator('×') => Lexeme::Operator('*'),
            Lexeme::Operator('÷') => Lexeme::Operator('/'),
            Lexeme::Square => Lexeme::Power,
            other => other,
        })
        .collect()
}

/// A numeral directly followed by `%` becomes `(numeral/100)`.
fn desugar_percent(lexemes: Vec<Lexeme>) -> Vec<Lexeme> {
    let mut out = Vec::with_capacity(lexemes.len());
    let mut iter = lexemes.into_iter().peekable();

    while let Some(lexeme) = iter.next() {
        match lexeme {
            Lexeme::Numeral(numeral) if iter.peek() == Some(&Lexeme::Percent) => {
                iter.next();
                out.extend([
                    Lexeme::Open,
                    Lexeme::Numeral(numeral),
                    Lexeme::Operator('/'),
                    Lexeme::Numeral("100".to_string()),
                    Lexeme::Close,
                ]);
            }
            other => out.push(other),
        }
    }

    out
}

/// `√(` opens a `sqrt(` call; `√` before a numeral wraps only that numeral.
fn desugar_root(lexemes: Vec<Lexeme>) -> Vec<Lexeme> {
    let mut out = Vec::with_capacity(lexemes.len());
    let mut iter = lexemes.into_iter().peekable();

    while let Some(lexeme) = iter.next() {
        if lexeme != Lexeme::Root {
            out.push(lexeme);
            continue;
        }
        match iter.peek() {
            Some(Lexeme::Open) => out.push(Lexeme::Sqrt),
            Some(Lexeme::Numeral(_)) => {
                if let Some(numeral) = iter.next() {
                    out.extend([Lexeme::Sqrt, Lexeme::Open, numeral, Lexeme::Close]);
                }
            }
            _ => out.push(Lexeme::Root),
        }
    }

    out
}

fn render(lexemes: &[Lexeme]) -> String {
    let mut out = String::new();

    for lexeme in lexemes {
        let piece: std::borrow::Cow<'_, str> = match lexeme {
            Lexeme::Numeral(numeral) => numeral.as_str().into(),
            Lexeme::Operator(c) | Lexeme::Other(c) => c.to_string().into(),
            Lexeme::Root => "√".into(),
            Lexeme::Square => "x²".into(),
            Lexeme::Percent => "%".into(),
            Lexeme::Open => "(".into(),
            Lexeme::Close => ")".into(),
            Lexeme::Power => "**2".into(),
            Lexeme::Sqrt => "sqrt".into(),
        };

        // Keep `**2` followed by `2` from reading back as `**22`.
        if ends_numeral(&out) && starts_numeral(&piece) {
            out.push(' ');
        }
        out.push_str(&piece);
    }

    out
}

fn ends_numeral(s: &str) -> bool {
    s.ends_with(|c: char| c.is_ascii_digit() || c == '.')
}

fn starts_numeral(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(raw: &str) -> String {
        format_expression(raw).to_string()
    }

    #[test]
    fn test_operator_substitution() {
        assert_eq!(fmt("7×3÷2"), "7*3/2");
        assert_eq!(fmt("2+2"), "2+2");
        assert_eq!(fmt(""), "");
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(fmt("5(3+1)"), "5*(3+1)");
        assert_eq!(fmt("(1+1)(2)"), "(1+1)*(2)");
        assert_eq!(fmt("2√9"), "2*sqrt(9)");
        assert_eq!(fmt("(4)√(16)"), "(4)*sqrt(16)");
    }

    #[test]
    fn test_square_applies_to_preceding_value() {
        assert_eq!(fmt("3x²"), "3**2");
        assert_eq!(fmt("(1+2)x²"), "(1+2)**2");
        assert_eq!(fmt("2x²2"), "2**2 2");
    }

    #[test]
    fn test_percent() {
        assert_eq!(fmt("50%"), "(50/100)");
        assert_eq!(fmt("200×12.5%"), "200*(12.5/100)");
        // Only bare numerals take a percent.
        assert_eq!(fmt("(50)%"), "(50)%");
    }

    #[test]
    fn test_root_binds_to_numeral_only() {
        assert_eq!(fmt("√9"), "sqrt(9)");
        assert_eq!(fmt("√9+16"), "sqrt(9)+16");
        assert_eq!(fmt("√(9+16)"), "sqrt(9+16)");
        assert_eq!(fmt("√50%"), "sqrt(50/100)");
    }

    #[test]
    fn test_unresolvable_symbols_pass_through() {
        assert_eq!(fmt("√√16"), "√sqrt(16)");
        assert_eq!(fmt("√-4"), "√-4");
        assert_eq!(fmt("2x"), "2x");
    }
}
