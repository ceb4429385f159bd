#![forbid(unsafe_code)]

//! Frame snapshots and the per-grapheme presentational partition.
//!
//! Nothing here draws. A [`Snapshot`] is what a view polls between ticks;
//! [`Snapshot::characters`] tags each grapheme with the status a renderer
//! would style it by, and [`Snapshot::caret_visible`] says whether a caret
//! belongs after the typed prefix.

use std::time::Duration;

use crate::options::{CaretAnimationStyle, EraseStyle, token_impls};
use crate::typer::Phase;

/// How a single grapheme should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CharacterStatus {
    /// Not yet typed.
    Untyped,
    Typed,
    /// Being erased under a selection-style erase.
    Selected,
    /// Being erased under `backspace` or `clear`.
    Erased,
}

impl CharacterStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Untyped => "untyped",
            Self::Typed => "typed",
            Self::Selected => "selected",
            Self::Erased => "erased",
        }
    }
}

token_impls!(
    CharacterStatus,
    "character status",
    [
        CharacterStatus::Untyped,
        CharacterStatus::Typed,
        CharacterStatus::Selected,
        CharacterStatus::Erased,
    ]
);

/// One grapheme and its status.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub value: String,
    pub status: CharacterStatus,
}

/// Observable controller state at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub phase: Phase,
    pub cursor: usize,
    /// The current word, split into grapheme clusters.
    pub graphemes: Vec<String>,
    pub spool_index: usize,
    pub repeat_count: u32,
    pub erase_style: EraseStyle,
    pub caret_animation_style: CaretAnimationStyle,
    /// Virtual time since the run started.
    pub elapsed: Duration,
}

impl Snapshot {
    /// Status of the grapheme at `index`.
    #[must_use]
    pub fn status_at(&self, index: usize) -> CharacterStatus {
        if index < self.cursor {
            return CharacterStatus::Typed;
        }
        match self.phase {
            Phase::Erasing if self.erase_style.is_selection() => CharacterStatus::Selected,
            Phase::Erasing => CharacterStatus::Erased,
            _ => CharacterStatus::Untyped,
        }
    }

    /// Every grapheme of the current word with its status.
    #[must_use]
    pub fn characters(&self) -> Vec<Character> {
        self.graphemes
            .iter()
            .enumerate()
            .map(|(i, g)| Character {
                value: g.clone(),
                status: self.status_at(i),
            })
            .collect()
    }

    /// Whether a caret should render.
    ///
    /// Hidden once the run is complete, and while a selection-style erase
    /// is in progress (the selection stands in for the caret).
    #[must_use]
    pub fn caret_visible(&self) -> bool {
        match self.phase {
            Phase::Complete => false,
            Phase::Erasing => !self.erase_style.is_selection(),
            Phase::Idle | Phase::Typing => true,
        }
    }

    /// The typed prefix, joined.
    #[must_use]
    pub fn typed_text(&self) -> String {
        self.graphemes[..self.cursor.min(self.graphemes.len())].concat()
    }

    /// The current word, joined.
    #[must_use]
    pub fn word(&self) -> String {
        self.graphemes.concat()
    }

    /// Whether both snapshots would draw the same frame (ignores `elapsed`).
    #[must_use]
    pub fn same_frame(&self, other: &Self) -> bool {
        self.phase == other.phase
            && self.cursor == other.cursor
            && self.spool_index == other.spool_index
            && self.repeat_count == other.repeat_count
            && self.graphemes == other.graphemes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(phase: Phase, cursor: usize, style: EraseStyle) -> Snapshot {
        Snapshot {
            phase,
            cursor,
            graphemes: vec!["a".into(), "b".into(), "c".into()],
            spool_index: 0,
            repeat_count: 0,
            erase_style: style,
            caret_animation_style: CaretAnimationStyle::Blink,
            elapsed: Duration::ZERO,
        }
    }

    fn statuses(s: &Snapshot) -> Vec<CharacterStatus> {
        s.characters().into_iter().map(|c| c.status).collect()
    }

    #[test]
    fn typing_partitions_typed_and_untyped() {
        use CharacterStatus::*;
        let s = snapshot(Phase::Typing, 1, EraseStyle::Select);
        assert_eq!(statuses(&s), vec![Typed, Untyped, Untyped]);
        assert!(s.caret_visible());
        assert_eq!(s.typed_text(), "a");
    }

    #[test]
    fn erasing_marks_tail_by_style() {
        use CharacterStatus::*;
        let backspace = snapshot(Phase::Erasing, 2, EraseStyle::Backspace);
        assert_eq!(statuses(&backspace), vec![Typed, Typed, Erased]);
        assert!(backspace.caret_visible());

        let clear = snapshot(Phase::Erasing, 0, EraseStyle::Clear);
        assert_eq!(statuses(&clear), vec![Erased, Erased, Erased]);

        let select = snapshot(Phase::Erasing, 1, EraseStyle::Select);
        assert_eq!(statuses(&select), vec![Typed, Selected, Selected]);
        assert!(!select.caret_visible());

        let select_all = snapshot(Phase::Erasing, 0, EraseStyle::SelectAll);
        assert_eq!(statuses(&select_all), vec![Selected, Selected, Selected]);
        assert!(!select_all.caret_visible());
    }

    #[test]
    fn complete_hides_caret() {
        let s = snapshot(Phase::Complete, 3, EraseStyle::Backspace);
        assert!(!s.caret_visible());
        assert_eq!(s.typed_text(), "abc");
        assert_eq!(s.word(), "abc");
    }

    #[test]
    fn character_values_follow_graphemes() {
        let s = snapshot(Phase::Idle, 0, EraseStyle::Backspace);
        let values: Vec<String> = s.characters().into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn same_frame_ignores_elapsed() {
        let a = snapshot(Phase::Typing, 1, EraseStyle::Backspace);
        let mut b = a.clone();
        b.elapsed = Duration::from_secs(3);
        assert!(a.same_frame(&b));
        b.cursor = 2;
        assert!(!a.same_frame(&b));
    }

    #[test]
    fn status_tokens() {
        assert_eq!(CharacterStatus::Selected.to_string(), "selected");
        assert_eq!(
            "erased".parse::<CharacterStatus>().unwrap(),
            CharacterStatus::Erased
        );
    }
}
