//! zcalc: a keypad calculator engine.
//!
//! The [`calculator`] module holds the expression editor, formatter and
//! restricted evaluator; [`config`] loads user settings.

pub mod calculator;
pub mod config;
