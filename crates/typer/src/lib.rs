#![forbid(unsafe_code)]

//! Typer public facade.
//!
//! Re-exports the controller, its configuration, the grapheme helpers and
//! (with the default `runtime` feature) the wall-clock driver.
//!
//! ```
//! use std::time::Duration;
//! use typer::prelude::*;
//!
//! let options = TyperOptions::new()
//!     .spool(["one", "two"])
//!     .repeats(0)
//!     .uniform_delay(Duration::from_millis(5));
//! let mut typer = Typer::new(options, Hooks::new()).unwrap();
//! typer.start();
//! typer.advance(Duration::from_secs(1));
//! assert_eq!(typer.phase(), Phase::Complete);
//! assert_eq!(typer.current_word(), "two");
//! ```

// --- Core re-exports -------------------------------------------------------

pub use typer_core::{
    CaretAnimationStyle, Character, CharacterStatus, ConfigurationError, EraseStyle, HookKind,
    Hooks, InitialAction, Phase, Repeats, Result, Snapshot, Typer, TyperOptions,
};

// --- Text re-exports -------------------------------------------------------

pub use typer_text::{GraphemeString, grapheme_count, graphemes, split};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use typer_runtime::{CancellationSource, CancellationToken, DriverHandle, TyperDriver};

pub mod prelude {
    pub use crate::{
        CaretAnimationStyle, EraseStyle, Hooks, InitialAction, Phase, Repeats, Snapshot, Typer,
        TyperOptions,
    };

    #[cfg(feature = "runtime")]
    pub use crate::TyperDriver;

    pub use crate::{core, text};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use typer_core as core;
#[cfg(feature = "runtime")]
pub use typer_runtime as runtime;
pub use typer_text as text;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_split_matches_text_crate() {
        assert_eq!(split("e\u{301}x"), vec!["e\u{301}", "x"]);
        assert_eq!(grapheme_count(""), 0);
    }

    #[test]
    fn prelude_builds_a_run() {
        use crate::prelude::*;
        let typer = Typer::new(TyperOptions::new().repeats(0), Hooks::new()).unwrap();
        assert_eq!(typer.phase(), Phase::Idle);
        assert_eq!(typer.erase_style(), EraseStyle::Backspace);
        assert_eq!(typer.caret_animation_style(), CaretAnimationStyle::Blink);
    }
}
