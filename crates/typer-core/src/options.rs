#![forbid(unsafe_code)]

//! Configuration data for a typewriter run.
//!
//! [`TyperOptions`] is the serialisable half of a run's configuration: the
//! spool, repeat policy, timing, and styles. The callback half lives in
//! [`Hooks`](crate::Hooks). Options are immutable once a
//! [`Typer`](crate::Typer) has been built from them.
//!
//! # Loading
//!
//! With the `config-file` feature, options load from TOML or JSON:
//!
//! ```toml
//! spool = ["Hello", "World"]
//! repeats = "unbounded"
//! erase_style = "select-all"
//! pre_type_delay_ms = 250
//! type_delay_ms = 120
//! ```
//!
//! ```rust,ignore
//! let options = TyperOptions::from_toml_file("typer.toml")?;
//! ```
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `spool` | `["Typer"]` |
//! | `repeats` | unbounded |
//! | `shuffle` | `false` |
//! | `pre_type_delay` | 250ms |
//! | `type_delay` | 250ms |
//! | `pre_erase_delay` | 500ms |
//! | `erase_delay` | 70ms |
//! | `pre_clear_delay` | 1000ms |
//! | `initial_action` | typing |
//! | `erase_on_complete` | `false` |
//! | `erase_style` | backspace |
//! | `caret_animation_style` | blink |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use typer_text::grapheme_count;

use crate::error::{ConfigurationError, Result};

// ---------------------------------------------------------------------------
// Enumerated tokens
// ---------------------------------------------------------------------------

/// How a typed word is taken off screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum EraseStyle {
    /// One grapheme per step, trailing characters shown as erased.
    #[default]
    Backspace,
    /// One grapheme per step, trailing characters shown as selected.
    Select,
    /// Whole word at once, shown selected for `pre_clear_delay` first.
    SelectAll,
    /// Whole word at once, no pause.
    Clear,
}

impl EraseStyle {
    pub const ALL: [Self; 4] = [Self::Backspace, Self::Select, Self::SelectAll, Self::Clear];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backspace => "backspace",
            Self::Select => "select",
            Self::SelectAll => "select-all",
            Self::Clear => "clear",
        }
    }

    /// Whether erased graphemes render as a selection rather than removed.
    #[inline]
    #[must_use]
    pub const fn is_selection(self) -> bool {
        matches!(self, Self::Select | Self::SelectAll)
    }

    /// Whether the first erase step clears the entire remaining word.
    #[inline]
    #[must_use]
    pub const fn erases_whole_word(self) -> bool {
        matches!(self, Self::SelectAll | Self::Clear)
    }
}

/// Caret animation token, passed through untouched to the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CaretAnimationStyle {
    Solid,
    #[default]
    Blink,
    Smooth,
}

impl CaretAnimationStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Blink => "blink",
            Self::Smooth => "smooth",
        }
    }
}

/// Phase a run begins in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum InitialAction {
    /// Start from an empty cursor and type the first word.
    #[default]
    Typing,
    /// Treat the first word as already typed and erase it.
    Erasing,
}

impl InitialAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::Erasing => "erasing",
        }
    }
}

macro_rules! token_impls {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::error::ConfigurationError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| $crate::error::ConfigurationError::unknown_token($kind, s))
            }
        }
    };
}

pub(crate) use token_impls;

token_impls!(
    EraseStyle,
    "erase style",
    [
        EraseStyle::Backspace,
        EraseStyle::Select,
        EraseStyle::SelectAll,
        EraseStyle::Clear,
    ]
);
token_impls!(
    CaretAnimationStyle,
    "caret animation style",
    [
        CaretAnimationStyle::Solid,
        CaretAnimationStyle::Blink,
        CaretAnimationStyle::Smooth,
    ]
);
token_impls!(
    InitialAction,
    "initial action",
    [InitialAction::Typing, InitialAction::Erasing]
);

// ---------------------------------------------------------------------------
// Repeats
// ---------------------------------------------------------------------------

/// How many extra passes through the spool follow the first one.
///
/// `Finite(0)` plays the spool once; `Finite(1)` plays it twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Repeats {
    Finite(u32),
    #[default]
    Unbounded,
}

impl Repeats {
    /// Whether another pass may start after `completed` repeats.
    #[inline]
    #[must_use]
    pub const fn allows(self, completed: u32) -> bool {
        match self {
            Self::Finite(limit) => completed < limit,
            Self::Unbounded => true,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

impl From<u32> for Repeats {
    fn from(count: u32) -> Self {
        Self::Finite(count)
    }
}

impl fmt::Display for Repeats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

impl FromStr for Repeats {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "unbounded" {
            return Ok(Self::Unbounded);
        }
        s.parse::<u32>()
            .map(Self::Finite)
            .map_err(|_| ConfigurationError::unknown_token("repeats", s))
    }
}

#[cfg(feature = "serde")]
impl Serialize for Repeats {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Finite(n) => serializer.serialize_u32(*n),
            Self::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Repeats {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u32),
            Word(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(Self::Finite(n)),
            Raw::Word(word) => word.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(feature = "serde")]
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

// ---------------------------------------------------------------------------
// TyperOptions
// ---------------------------------------------------------------------------

/// Data configuration for one typewriter run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TyperOptions {
    /// Strings to type and erase, in order. Empty strings are skipped.
    pub spool: Vec<String>,
    pub repeats: Repeats,
    /// Shuffle the spool at start and again on every wrap.
    pub shuffle: bool,
    /// Seed for shuffling; `None` seeds from the OS.
    pub shuffle_seed: Option<u64>,

    #[cfg_attr(feature = "serde", serde(rename = "pre_type_delay_ms", with = "millis"))]
    pub pre_type_delay: Duration,
    #[cfg_attr(feature = "serde", serde(rename = "type_delay_ms", with = "millis"))]
    pub type_delay: Duration,
    #[cfg_attr(feature = "serde", serde(rename = "pre_erase_delay_ms", with = "millis"))]
    pub pre_erase_delay: Duration,
    #[cfg_attr(feature = "serde", serde(rename = "erase_delay_ms", with = "millis"))]
    pub erase_delay: Duration,
    /// Pause with the selection visible before a `select-all` erase clears.
    #[cfg_attr(feature = "serde", serde(rename = "pre_clear_delay_ms", with = "millis"))]
    pub pre_clear_delay: Duration,

    pub initial_action: InitialAction,
    /// Erase the last word even when no repeat follows.
    pub erase_on_complete: bool,
    pub erase_style: EraseStyle,
    pub caret_animation_style: CaretAnimationStyle,
}

impl Default for TyperOptions {
    fn default() -> Self {
        Self {
            spool: vec!["Typer".to_string()],
            repeats: Repeats::Unbounded,
            shuffle: false,
            shuffle_seed: None,
            pre_type_delay: Duration::from_millis(250),
            type_delay: Duration::from_millis(250),
            pre_erase_delay: Duration::from_millis(500),
            erase_delay: Duration::from_millis(70),
            pre_clear_delay: Duration::from_millis(1000),
            initial_action: InitialAction::Typing,
            erase_on_complete: false,
            erase_style: EraseStyle::Backspace,
            caret_animation_style: CaretAnimationStyle::Blink,
        }
    }
}

impl TyperOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn spool<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spool = words.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn repeats(mut self, repeats: impl Into<Repeats>) -> Self {
        self.repeats = repeats.into();
        self
    }

    #[must_use]
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    #[must_use]
    pub fn pre_type_delay(mut self, d: Duration) -> Self {
        self.pre_type_delay = d;
        self
    }

    #[must_use]
    pub fn type_delay(mut self, d: Duration) -> Self {
        self.type_delay = d;
        self
    }

    #[must_use]
    pub fn pre_erase_delay(mut self, d: Duration) -> Self {
        self.pre_erase_delay = d;
        self
    }

    #[must_use]
    pub fn erase_delay(mut self, d: Duration) -> Self {
        self.erase_delay = d;
        self
    }

    #[must_use]
    pub fn pre_clear_delay(mut self, d: Duration) -> Self {
        self.pre_clear_delay = d;
        self
    }

    /// Set all five delays at once (handy for tests).
    #[must_use]
    pub fn uniform_delay(self, d: Duration) -> Self {
        self.pre_type_delay(d)
            .type_delay(d)
            .pre_erase_delay(d)
            .erase_delay(d)
            .pre_clear_delay(d)
    }

    #[must_use]
    pub fn initial_action(mut self, action: InitialAction) -> Self {
        self.initial_action = action;
        self
    }

    #[must_use]
    pub fn erase_on_complete(mut self, erase: bool) -> Self {
        self.erase_on_complete = erase;
        self
    }

    #[must_use]
    pub fn erase_style(mut self, style: EraseStyle) -> Self {
        self.erase_style = style;
        self
    }

    #[must_use]
    pub fn caret_animation_style(mut self, style: CaretAnimationStyle) -> Self {
        self.caret_animation_style = style;
        self
    }

    /// The spool with zero-length strings removed, in configured order.
    #[must_use]
    pub fn filtered_spool(&self) -> Vec<String> {
        self.spool.iter().filter(|w| !w.is_empty()).cloned().collect()
    }

    /// Virtual time one full pass through the spool takes, typing and
    /// erasing every non-empty word.
    #[must_use]
    pub fn cycle_duration(&self) -> Duration {
        self.spool
            .iter()
            .filter(|w| !w.is_empty())
            .map(|word| {
                let steps = u32::try_from(grapheme_count(word).saturating_sub(1))
                    .unwrap_or(u32::MAX);
                let erase = match self.erase_style {
                    EraseStyle::Backspace | EraseStyle::Select => {
                        self.erase_delay.saturating_mul(steps)
                    }
                    EraseStyle::SelectAll => self.pre_clear_delay,
                    EraseStyle::Clear => Duration::ZERO,
                };
                self.pre_type_delay
                    .saturating_add(self.type_delay.saturating_mul(steps))
                    .saturating_add(self.pre_erase_delay)
                    .saturating_add(erase)
            })
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Check the options describe a run that can make progress.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::EmptySpool`] if every spool entry is empty.
    /// - [`ConfigurationError::ZeroLengthCycle`] if repeats are unbounded and
    ///   a full pass through the spool takes no time.
    pub fn validate(&self) -> Result<()> {
        if self.spool.iter().all(String::is_empty) {
            return Err(ConfigurationError::EmptySpool);
        }
        if self.repeats.is_unbounded() && self.cycle_duration().is_zero() {
            return Err(ConfigurationError::ZeroLengthCycle);
        }
        Ok(())
    }

    /// Load from a TOML string. Missing fields take their defaults.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let options: Self = toml::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string. Missing fields take their defaults.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}
