#![forbid(unsafe_code)]

//! The typewriter controller.
//!
//! A [`Typer`] walks a cursor through a queue of words: it types each word
//! one grapheme at a time, erases it according to its [`EraseStyle`], moves
//! on to the next word, wraps and (optionally) reshuffles at the end of the
//! spool, and stops when the repeat policy is exhausted.
//!
//! The controller is driven from outside. [`Typer::start`] arms the first
//! timer and [`Typer::advance`] moves the virtual clock forward, firing due
//! timers one at a time. Each firing mutates the cursor, then calls the
//! per-step hook, then (on the last step of a word) the completion hook.
//!
//! ```
//! use std::time::Duration;
//! use typer_core::{Hooks, Phase, Typer, TyperOptions};
//!
//! let options = TyperOptions::new()
//!     .spool(["hi"])
//!     .repeats(0)
//!     .uniform_delay(Duration::from_millis(10));
//! let mut typer = Typer::new(options, Hooks::new()).unwrap();
//!
//! typer.start();
//! typer.advance(Duration::from_millis(10));
//! assert_eq!(typer.cursor(), 1);
//! typer.advance(Duration::from_millis(10));
//! assert_eq!(typer.phase(), Phase::Complete);
//! ```
//!
//! # State machine
//!
//! ```text
//!   idle ──start──▶ typing ──word typed──▶ (idle) ──▶ erasing ──word erased──▶ (idle) ──▶ typing …
//!                     │                                  │
//!                     └──────────── finish ──────────────┴──────▶ complete
//! ```
//!
//! # Invariants
//!
//! 1. `cursor` stays in `[0, graphemes.len()]` and only moves by ±1 or
//!    jumps to `0` / `len`.
//! 2. `spool_index < spool_order.len()` and the active word always equals
//!    `spool_order[spool_index]`.
//! 3. Type-phase and erase-phase timers never coexist; arming a role
//!    cancels the previous timer in that role.
//! 4. `on_finish` fires at most once per run, and no timer is live once the
//!    phase is `Complete`.
//! 5. After [`teardown`](Typer::teardown) no hook fires and no timer is live.
//!
//! # Repeat counting
//!
//! `repeat_count` increments when the spool wraps from its last word back
//! to index 0. The "should repeat" test compares the count *before* that
//! increment against [`Repeats`](crate::Repeats).

use std::fmt;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use typer_text::GraphemeString;

use crate::error::Result;
use crate::hooks::{HookKind, Hooks};
use crate::options::{
    CaretAnimationStyle, EraseStyle, InitialAction, TyperOptions, token_impls,
};
use crate::timer::{TimerRole, Timers};
use crate::view::Snapshot;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Phase {
    /// Not started, or between a finished word and the next decision.
    #[default]
    Idle,
    Typing,
    Erasing,
    /// Terminal. Nothing further happens.
    Complete,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Typing => "typing",
            Self::Erasing => "erasing",
            Self::Complete => "complete",
        }
    }
}

token_impls!(
    Phase,
    "phase",
    [Phase::Idle, Phase::Typing, Phase::Erasing, Phase::Complete]
);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Type,
    Erase,
    /// End of the `select-all` pause: the selection is cleared.
    ClearSelection,
}

/// Typewriter animation controller.
pub struct Typer {
    options: TyperOptions,
    hooks: Hooks,
    /// Configured spool minus empty strings.
    words: Vec<String>,
    /// Order in effect for the current repeat cycle.
    spool_order: Vec<String>,
    spool_index: usize,
    word: GraphemeString,
    cursor: usize,
    repeat_count: u32,
    phase: Phase,
    timers: Timers<Action>,
    rng: SmallRng,
    started: bool,
    finished: bool,
    torn_down: bool,
    hook_failures: u32,
}

impl fmt::Debug for Typer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typer")
            .field("phase", &self.phase)
            .field("spool_index", &self.spool_index)
            .field("word", &self.word.as_str())
            .field("cursor", &self.cursor)
            .field("repeat_count", &self.repeat_count)
            .field("elapsed", &self.timers.now())
            .field("live_timers", &self.timers.live())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Typer {
    /// Build a controller from validated options.
    ///
    /// The run is prepared (spool filtered and, if enabled, shuffled; first
    /// word loaded) but no timer is armed until [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns the [`TyperOptions::validate`] error if the options cannot
    /// describe a run.
    pub fn new(options: TyperOptions, hooks: Hooks) -> Result<Self> {
        options.validate()?;
        let words = options.filtered_spool();
        let rng = match options.shuffle_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let mut typer = Self {
            options,
            hooks,
            spool_order: Vec::new(),
            words,
            spool_index: 0,
            word: GraphemeString::default(),
            cursor: 0,
            repeat_count: 0,
            phase: Phase::Idle,
            timers: Timers::new(),
            rng,
            started: false,
            finished: false,
            torn_down: false,
            hook_failures: 0,
        };
        typer.spool_order = typer.next_spool_order();
        typer.load_word(0);
        Ok(typer)
    }

    /// The configured words in this cycle's order.
    fn next_spool_order(&mut self) -> Vec<String> {
        let mut order = self.words.clone();
        if self.options.shuffle {
            order.shuffle(&mut self.rng);
        }
        order
    }

    fn load_word(&mut self, index: usize) {
        self.spool_index = index;
        self.word = GraphemeString::new(self.spool_order[index].as_str());
        self.cursor = 0;
        tracing::debug!(
            spool_index = index,
            graphemes = self.word.len(),
            repeat_count = self.repeat_count,
            "loaded word"
        );
    }
}

// ---------------------------------------------------------------------------
// Host-facing control
// ---------------------------------------------------------------------------

impl Typer {
    /// Activate the run.
    ///
    /// With [`InitialAction::Typing`] the first word types after
    /// `pre_type_delay`. With [`InitialAction::Erasing`] the cursor jumps to
    /// the end of the first word and erasing begins after `pre_erase_delay`.
    ///
    /// Calling `start` on a run that already started discards it and begins
    /// a fresh one (clock, counters and spool order reset). After
    /// [`teardown`](Self::teardown) this is a no-op.
    pub fn start(&mut self) {
        if self.torn_down {
            tracing::warn!("start called after teardown; ignoring");
            return;
        }
        if self.started {
            self.timers.reset();
            self.repeat_count = 0;
            self.finished = false;
            self.spool_order = self.next_spool_order();
        }
        self.started = true;
        self.load_word(0);

        match self.options.initial_action {
            InitialAction::Typing => self.start_typing(),
            InitialAction::Erasing => {
                self.cursor = self.word.len();
                self.start_erasing();
            }
        }
    }

    /// Move the virtual clock forward by `dt`, firing every timer that
    /// comes due, in deadline order.
    ///
    /// No-op before [`start`](Self::start) and after
    /// [`teardown`](Self::teardown).
    pub fn advance(&mut self, dt: Duration) {
        if !self.started || self.torn_down {
            return;
        }
        let horizon = self.timers.now().saturating_add(dt);
        while let Some(fired) = self.timers.pop_due(horizon) {
            self.on_timer(fired.role, fired.action);
        }
        self.timers.advance_to(horizon);
    }

    /// Time until the next timer fires, or `None` when nothing is armed.
    #[must_use]
    pub fn until_next_event(&self) -> Option<Duration> {
        if self.torn_down {
            return None;
        }
        self.timers.until_next()
    }

    /// Cancel every live timer. Idempotent; no hook fires afterwards.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        if !self.torn_down {
            self.torn_down = true;
            tracing::debug!(phase = %self.phase, "typer torn down");
        }
    }
}

impl Drop for Typer {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

impl Typer {
    fn on_timer(&mut self, role: TimerRole, action: Action) {
        match action {
            Action::Type => {
                let done = self.type_step();
                if role == TimerRole::PreDelay && !done {
                    self.timers
                        .arm_every(TimerRole::Step, self.options.type_delay, Action::Type);
                }
            }
            Action::Erase => {
                let done = self.erase_step();
                if role == TimerRole::PreDelay && !done {
                    self.timers
                        .arm_every(TimerRole::Step, self.options.erase_delay, Action::Erase);
                }
            }
            Action::ClearSelection => self.word_erased(),
        }
    }

    fn start_typing(&mut self) {
        self.cursor = 0;
        self.phase = Phase::Typing;
        self.timers.cancel(TimerRole::Step);
        self.timers.arm_once(
            TimerRole::PreDelay,
            self.options.pre_type_delay,
            Action::Type,
        );
        tracing::debug!(spool_index = self.spool_index, phase = %self.phase, "phase started");
    }

    fn start_erasing(&mut self) {
        self.phase = Phase::Erasing;
        self.timers.cancel(TimerRole::Step);
        self.timers.arm_once(
            TimerRole::PreDelay,
            self.options.pre_erase_delay,
            Action::Erase,
        );
        tracing::debug!(spool_index = self.spool_index, phase = %self.phase, "phase started");
    }

    /// Type one grapheme. Returns `true` if the word is now fully typed.
    fn type_step(&mut self) -> bool {
        self.cursor = (self.cursor + 1).min(self.word.len());
        tracing::trace!(cursor = self.cursor, "type step");
        let ok = self
            .hooks
            .call_text(HookKind::Type, self.word.prefix(self.cursor));
        self.record_hook(ok);

        if self.cursor < self.word.len() {
            return false;
        }
        self.timers.cancel(TimerRole::Step);
        self.phase = Phase::Idle;
        let ok = self.hooks.call_text(HookKind::Typed, self.word.as_str());
        self.record_hook(ok);
        self.after_typed();
        true
    }

    /// Erase per the erase style. Returns `true` once the cursor is at 0.
    fn erase_step(&mut self) -> bool {
        let style = self.options.erase_style;
        self.cursor = if style.erases_whole_word() {
            0
        } else {
            self.cursor.saturating_sub(1)
        };
        tracing::trace!(cursor = self.cursor, erase_style = %style, "erase step");
        let ok = self
            .hooks
            .call_text(HookKind::Erase, self.word.prefix(self.cursor));
        self.record_hook(ok);

        if self.cursor > 0 {
            return false;
        }
        self.timers.cancel(TimerRole::Step);
        if style == EraseStyle::SelectAll {
            self.timers.arm_once(
                TimerRole::PreDelay,
                self.options.pre_clear_delay,
                Action::ClearSelection,
            );
        } else {
            self.word_erased();
        }
        true
    }

    fn word_erased(&mut self) {
        self.phase = Phase::Idle;
        let ok = self.hooks.call_text(HookKind::Erased, self.word.as_str());
        self.record_hook(ok);
        self.after_erased();
    }

    fn is_last_word(&self) -> bool {
        self.spool_index + 1 == self.spool_order.len()
    }

    fn should_repeat(&self) -> bool {
        self.options.repeats.allows(self.repeat_count)
    }

    fn after_typed(&mut self) {
        if !self.is_last_word() || self.options.erase_on_complete || self.should_repeat() {
            self.start_erasing();
        } else {
            self.finish();
        }
    }

    fn after_erased(&mut self) {
        if !self.is_last_word() {
            self.load_word(self.spool_index + 1);
            self.start_typing();
        } else if self.should_repeat() {
            self.repeat_count = self.repeat_count.saturating_add(1);
            self.spool_order = self.next_spool_order();
            tracing::debug!(repeat_count = self.repeat_count, "spool wrapped");
            self.load_word(0);
            self.start_typing();
        } else {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.timers.cancel_all();
        self.phase = Phase::Complete;
        if self.finished {
            return;
        }
        self.finished = true;
        tracing::info!(
            repeat_count = self.repeat_count,
            elapsed_ms = self.timers.now().as_millis() as u64,
            "typer finished"
        );
        let ok = self.hooks.call_finish();
        self.record_hook(ok);
    }

    fn record_hook(&mut self, ok: bool) {
        if !ok {
            self.hook_failures = self.hook_failures.saturating_add(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

impl Typer {
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of leading graphemes of the current word considered typed.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub fn spool_index(&self) -> usize {
        self.spool_index
    }

    #[inline]
    #[must_use]
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    #[must_use]
    pub fn current_word(&self) -> &str {
        self.word.as_str()
    }

    #[must_use]
    pub fn graphemes(&self) -> &GraphemeString {
        &self.word
    }

    /// The typed prefix of the current word.
    #[must_use]
    pub fn typed_text(&self) -> &str {
        self.word.prefix(self.cursor)
    }

    #[must_use]
    pub fn spool_order(&self) -> &[String] {
        &self.spool_order
    }

    #[must_use]
    pub fn erase_style(&self) -> EraseStyle {
        self.options.erase_style
    }

    #[must_use]
    pub fn caret_animation_style(&self) -> CaretAnimationStyle {
        self.options.caret_animation_style
    }

    #[must_use]
    pub fn options(&self) -> &TyperOptions {
        &self.options
    }

    /// Virtual time since the run started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.timers.now()
    }

    /// Number of live timers (0..=2).
    #[must_use]
    pub fn live_timers(&self) -> usize {
        self.timers.live()
    }

    /// Number of hook invocations that panicked.
    #[must_use]
    pub fn hook_failures(&self) -> u32 {
        self.hook_failures
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Started, not complete and not torn down.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started && !self.torn_down && self.phase != Phase::Complete
    }

    /// Owned copy of everything a view needs to draw the current frame.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            cursor: self.cursor,
            graphemes: self.word.to_vec(),
            spool_index: self.spool_index,
            repeat_count: self.repeat_count,
            erase_style: self.options.erase_style,
            caret_animation_style: self.options.caret_animation_style,
            elapsed: self.timers.now(),
        }
    }
}
