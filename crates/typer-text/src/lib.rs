#![forbid(unsafe_code)]

//! Text: grapheme cluster segmentation for typer.
//!
//! # Role in typer
//! `typer-text` is the leaf crate. It answers one question for the
//! controller in `typer-core`: where are the user-perceived character
//! boundaries of a word? Emoji with skin-tone modifiers, ZWJ sequences,
//! regional-indicator flags and combining marks are each a single unit.
//!
//! # Primary surface
//! - [`split`] / [`graphemes`] / [`grapheme_count`]: stateless helpers.
//! - [`GraphemeString`]: an owned string with a precomputed boundary table,
//!   so that "the first `n` graphemes" is a borrowed slice rather than a
//!   join.

pub mod grapheme;

pub use grapheme::{GraphemeString, grapheme_count, graphemes, split};
