#![forbid(unsafe_code)]

//! Lifecycle callbacks.
//!
//! [`Hooks`] is the callback half of a run's configuration. Every hook is
//! optional and invoked through a guard: a panicking hook is logged and
//! counted, and the controller carries on with its state and timers intact.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Callback receiving the relevant prefix or word.
pub type TextHook = Box<dyn FnMut(&str) + Send>;

/// Callback fired once when a run completes.
pub type FinishHook = Box<dyn FnMut() + Send>;

/// Identifies a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// A grapheme was typed; payload is the typed prefix.
    Type,
    /// A word finished typing; payload is the word.
    Typed,
    /// An erase step ran; payload is the remaining prefix.
    Erase,
    /// A word finished erasing; payload is the word.
    Erased,
    /// The run reached its terminal phase.
    Finish,
}

impl HookKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "on_type",
            Self::Typed => "on_typed",
            Self::Erase => "on_erase",
            Self::Erased => "on_erased",
            Self::Finish => "on_finish",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five lifecycle callbacks of a typewriter run.
///
/// ```
/// use typer_core::Hooks;
///
/// let hooks = Hooks::new()
///     .on_typed(|word| println!("typed {word}"))
///     .on_finish(|| println!("done"));
/// assert!(hooks.is_set(typer_core::HookKind::Typed));
/// ```
#[derive(Default)]
pub struct Hooks {
    on_type: Option<TextHook>,
    on_typed: Option<TextHook>,
    on_erase: Option<TextHook>,
    on_erased: Option<TextHook>,
    on_finish: Option<FinishHook>,
}

impl Hooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_type(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_type = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_typed(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_typed = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_erase(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_erase = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_erased(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_erased = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_finish(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_finish = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn is_set(&self, kind: HookKind) -> bool {
        match kind {
            HookKind::Type => self.on_type.is_some(),
            HookKind::Typed => self.on_typed.is_some(),
            HookKind::Erase => self.on_erase.is_some(),
            HookKind::Erased => self.on_erased.is_some(),
            HookKind::Finish => self.on_finish.is_some(),
        }
    }

    /// Invoke a text hook. Returns `false` if the hook panicked.
    ///
    /// `kind` must not be [`HookKind::Finish`]; that one goes through
    /// [`call_finish`](Self::call_finish).
    pub(crate) fn call_text(&mut self, kind: HookKind, text: &str) -> bool {
        let hook = match kind {
            HookKind::Type => &mut self.on_type,
            HookKind::Typed => &mut self.on_typed,
            HookKind::Erase => &mut self.on_erase,
            HookKind::Erased => &mut self.on_erased,
            HookKind::Finish => return true,
        };
        match hook {
            Some(f) => guarded(kind, || f(text)),
            None => true,
        }
    }

    /// Invoke the finish hook. Returns `false` if it panicked.
    pub(crate) fn call_finish(&mut self) -> bool {
        match &mut self.on_finish {
            Some(f) => guarded(HookKind::Finish, || f()),
            None => true,
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_type", &self.on_type.is_some())
            .field("on_typed", &self.on_typed.is_some())
            .field("on_erase", &self.on_erase.is_some())
            .field("on_erased", &self.on_erased.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}

fn guarded(kind: HookKind, f: impl FnOnce()) -> bool {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => true,
        Err(payload) => {
            tracing::error!(
                hook = kind.as_str(),
                panic = %panic_message(payload.as_ref()),
                "lifecycle hook panicked"
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn unset_hooks_are_noops() {
        let mut hooks = Hooks::new();
        assert!(hooks.call_text(HookKind::Type, "a"));
        assert!(hooks.call_finish());
    }

    #[test]
    fn text_hooks_receive_payload() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut hooks = Hooks::new().on_erase(move |s| sink.lock().unwrap().push(s.to_string()));

        assert!(hooks.call_text(HookKind::Erase, "ab"));
        assert!(hooks.call_text(HookKind::Type, "ignored"));
        assert_eq!(*seen.lock().unwrap(), vec!["ab".to_string()]);
    }

    #[test]
    fn panicking_hook_is_isolated() {
        let mut hooks = Hooks::new()
            .on_typed(|_| panic!("boom"))
            .on_finish(|| panic!("{}", String::from("owned boom")));
        assert!(!hooks.call_text(HookKind::Typed, "x"));
        // Still callable afterwards.
        assert!(!hooks.call_text(HookKind::Typed, "y"));
        assert!(!hooks.call_finish());
    }

    #[test]
    fn panic_message_extracts_strings() {
        let p: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(p.as_ref()), "static");
        let p: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(p.as_ref()), "owned");
        let p: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(p.as_ref()), "<non-string panic payload>");
    }

    #[test]
    fn debug_lists_which_hooks_are_set() {
        let hooks = Hooks::new().on_finish(|| {});
        let dbg = format!("{hooks:?}");
        assert!(dbg.contains("on_finish: true"));
        assert!(dbg.contains("on_type: false"));
        assert!(hooks.is_set(HookKind::Finish));
        assert!(!hooks.is_set(HookKind::Erase));
    }
}
