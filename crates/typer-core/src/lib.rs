#![forbid(unsafe_code)]

//! Typewriter animation state machine.
//!
//! `typer-core` owns everything a typewriter run needs except a clock:
//! [`TyperOptions`] and [`Hooks`] configure it, [`Typer`] runs it on a
//! virtual [`Timers`](timer::Timers) source, and [`Snapshot`] reports what a
//! view should draw.
//!
//! Hosts drive a [`Typer`] by calling [`Typer::advance`] with elapsed time;
//! `typer-runtime` does that against the wall clock on a background thread.

pub mod error;
pub mod hooks;
pub mod options;
pub mod timer;
pub mod typer;
pub mod view;

pub use error::{ConfigurationError, Result};
pub use hooks::{FinishHook, HookKind, Hooks, TextHook};
pub use options::{CaretAnimationStyle, EraseStyle, InitialAction, Repeats, TyperOptions};
pub use timer::{Fired, Firing, TimerRole, Timers};
pub use typer::{Phase, Typer};
pub use view::{Character, CharacterStatus, Snapshot};
