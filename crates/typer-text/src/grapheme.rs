#![forbid(unsafe_code)]

//! Grapheme cluster splitting.
//!
//! All helpers use extended grapheme clusters (UAX #29), the same
//! segmentation a terminal or browser uses to decide what one visible
//! character is.
//!
//! # Invariants
//!
//! 1. **Round-trip**: concatenating [`split`] output reproduces the input.
//! 2. **Empty in, empty out**: `split("")` is empty.
//! 3. **Boundary alignment**: [`GraphemeString::prefix`] and
//!    [`GraphemeString::suffix`] never cut inside a cluster.
//! 4. **Monotonicity**: boundary offsets are strictly increasing.

use std::fmt;

use unicode_segmentation::UnicodeSegmentation;

/// Split `text` into its grapheme clusters, in order.
///
/// # Example
/// ```
/// use typer_text::split;
///
/// assert_eq!(split("e\u{0301}bc"), vec!["e\u{0301}", "b", "c"]);
/// assert_eq!(split("\u{1F44D}\u{1F3FB}!"), vec!["\u{1F44D}\u{1F3FB}", "!"]);
/// assert!(split("").is_empty());
/// ```
#[must_use]
pub fn split(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

/// Iterate over grapheme clusters without collecting.
#[inline]
pub fn graphemes(text: &str) -> impl Iterator<Item = &str> {
    text.graphemes(true)
}

/// Count the number of grapheme clusters in a string.
///
/// ```
/// use typer_text::grapheme_count;
///
/// assert_eq!(grapheme_count("hello"), 5);
/// assert_eq!(grapheme_count("\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}"), 1);
/// ```
#[inline]
#[must_use]
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

// ---------------------------------------------------------------------------
// GraphemeString
// ---------------------------------------------------------------------------

/// An owned string plus the byte offset where each grapheme cluster ends.
///
/// The controller keeps one of these for the active word and asks for
/// `prefix(cursor)` on every step; with the boundary table that is a slice,
/// not an allocation.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct GraphemeString {
    text: String,
    /// `ends[i]` is the exclusive byte end of cluster `i`.
    ends: Vec<usize>,
}

impl GraphemeString {
    /// Segment `text` and record its cluster boundaries.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let ends = text
            .grapheme_indices(true)
            .map(|(offset, g)| offset + g.len())
            .collect();
        Self { text, ends }
    }

    /// Number of grapheme clusters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// The full source string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Byte offset of the boundary before cluster `index`.
    ///
    /// Clamps to the string length for `index >= len()`.
    #[must_use]
    pub fn byte_offset(&self, index: usize) -> usize {
        match index {
            0 => 0,
            i if i >= self.ends.len() => self.text.len(),
            i => self.ends[i - 1],
        }
    }

    /// The first `count` clusters joined, as a borrowed slice.
    ///
    /// `count` past the end yields the whole string.
    #[must_use]
    pub fn prefix(&self, count: usize) -> &str {
        &self.text[..self.byte_offset(count)]
    }

    /// Everything after the first `count` clusters.
    #[must_use]
    pub fn suffix(&self, count: usize) -> &str {
        &self.text[self.byte_offset(count)..]
    }

    /// Cluster at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        if index >= self.ends.len() {
            return None;
        }
        Some(&self.text[self.byte_offset(index)..self.ends[index]])
    }

    /// Iterate over the clusters in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        (0..self.ends.len()).map(move |i| &self.text[self.byte_offset(i)..self.ends[i]])
    }

    /// Owned copies of every cluster.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }
}

impl fmt::Debug for GraphemeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphemeString")
            .field("text", &self.text)
            .field("len", &self.ends.len())
            .finish()
    }
}

impl fmt::Display for GraphemeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for GraphemeString {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for GraphemeString {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for GraphemeString {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
