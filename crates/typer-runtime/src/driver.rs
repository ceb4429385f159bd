#![forbid(unsafe_code)]

//! Runs a [`Typer`] against the wall clock on a background thread.
//!
//! The driver thread sleeps on a [`CancellationToken`] until the typer's
//! next timer deadline, advances it by the measured elapsed time, and
//! publishes a [`Snapshot`] whenever the frame changed. Lifecycle hooks run
//! on the driver thread.
//!
//! ```no_run
//! use typer_core::{Hooks, Typer, TyperOptions};
//! use typer_runtime::TyperDriver;
//!
//! let typer = Typer::new(TyperOptions::new().repeats(0), Hooks::new()).unwrap();
//! let handle = TyperDriver::spawn(typer);
//! for frame in handle.snapshots() {
//!     println!("{}", frame.typed_text());
//! }
//! let typer = handle.wait().unwrap();
//! assert!(typer.is_complete());
//! ```
//!
//! # Shutdown
//!
//! The loop exits when the run completes, when nothing is armed, or when the
//! handle cancels. The typer is torn down before the thread returns it, and
//! the snapshot channel closes with it.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use typer_core::{Snapshot, Typer};
use web_time::Instant;

use crate::cancellation::{CancellationSource, CancellationToken};

/// Spawns driver threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TyperDriver;

impl TyperDriver {
    /// Start `typer` (if not already started) on a new thread.
    #[must_use]
    pub fn spawn(typer: Typer) -> DriverHandle {
        let source = CancellationSource::new();
        let token = source.token();
        let (tx, rx) = mpsc::channel();
        let thread = thread::spawn(move || run(typer, &token, &tx));
        DriverHandle {
            source,
            snapshots: rx,
            thread: Some(thread),
        }
    }
}

/// Owner's side of a running driver.
///
/// Dropping the handle cancels the run without waiting for the thread.
#[derive(Debug)]
pub struct DriverHandle {
    source: CancellationSource,
    snapshots: mpsc::Receiver<Snapshot>,
    thread: Option<JoinHandle<Typer>>,
}

impl DriverHandle {
    /// Frames published by the driver, oldest first.
    ///
    /// Iterating blocks until the next frame and ends when the driver
    /// thread exits.
    #[must_use]
    pub fn snapshots(&self) -> &mpsc::Receiver<Snapshot> {
        &self.snapshots
    }

    /// Ask the driver to stop. Returns immediately.
    pub fn cancel(&self) {
        self.source.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.source.is_cancelled()
    }

    /// Whether the driver thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Cancel, wait for the thread, and return the torn-down typer.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if the driver thread panicked.
    pub fn join(self) -> thread::Result<Typer> {
        self.cancel();
        self.wait()
    }

    /// Wait for the run to end on its own, then return the torn-down typer.
    ///
    /// Blocks forever on an unbounded run unless another party cancels.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if the driver thread panicked.
    pub fn wait(mut self) -> thread::Result<Typer> {
        match self.thread.take() {
            Some(thread) => thread.join(),
            // `thread` is only taken here, and `self` is consumed.
            None => Err(Box::new("driver thread already joined")),
        }
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.source.cancel();
        }
    }
}

fn run(mut typer: Typer, token: &CancellationToken, tx: &mpsc::Sender<Snapshot>) -> Typer {
    if !typer.is_started() {
        typer.start();
    }
    tracing::debug!(word = typer.current_word(), "driver started");

    let mut last = typer.snapshot();
    // A closed receiver is fine; hooks may be the only consumer.
    let _ = tx.send(last.clone());
    let mut mark = Instant::now();

    let reason = loop {
        if typer.is_complete() {
            break "complete";
        }
        let Some(wait) = typer.until_next_event() else {
            break "idle";
        };
        if token.wait_timeout(wait) {
            break "cancelled";
        }

        let now = Instant::now();
        typer.advance(now.saturating_duration_since(mark));
        mark = now;

        let frame = typer.snapshot();
        if !frame.same_frame(&last) {
            let _ = tx.send(frame.clone());
            last = frame;
        }
    };

    typer.teardown();
    tracing::debug!(
        reason,
        repeat_count = typer.repeat_count(),
        hook_failures = typer.hook_failures(),
        "driver stopped"
    );
    typer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use typer_core::{Hooks, Phase, TyperOptions};

    const MS_1: Duration = Duration::from_millis(1);

    fn quick(spool: &[&str]) -> TyperOptions {
        TyperOptions::new()
            .spool(spool.iter().copied())
            .uniform_delay(MS_1)
    }

    #[test]
    fn finite_run_completes_and_closes_channel() {
        let typer = Typer::new(quick(&["abc"]).repeats(0), Hooks::new()).unwrap();
        let handle = TyperDriver::spawn(typer);

        let frames: Vec<Snapshot> = handle.snapshots().iter().collect();
        let typer = handle.wait().unwrap();

        assert!(typer.is_complete());
        assert!(typer.is_torn_down());
        let cursors: Vec<usize> = frames.iter().map(|f| f.cursor).collect();
        assert_eq!(cursors.first(), Some(&0));
        assert_eq!(cursors.last(), Some(&3));
        assert!(cursors.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(frames.last().map(|f| f.phase), Some(Phase::Complete));
    }

    #[test]
    fn hooks_run_on_driver_thread_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (a, b, c) = (Arc::clone(&log), Arc::clone(&log), Arc::clone(&log));
        let hooks = Hooks::new()
            .on_type(move |s| a.lock().unwrap().push(format!("type:{s}")))
            .on_typed(move |s| b.lock().unwrap().push(format!("typed:{s}")))
            .on_finish(move || c.lock().unwrap().push("finish".into()));
        let typer = Typer::new(quick(&["ok"]).repeats(0), hooks).unwrap();

        let typer = TyperDriver::spawn(typer).wait().unwrap();
        assert!(typer.is_complete());
        assert_eq!(
            *log.lock().unwrap(),
            vec!["type:o", "type:ok", "typed:ok", "finish"]
        );
    }

    #[test]
    fn cancel_stops_unbounded_run() {
        let options = TyperOptions::new()
            .spool(["loop"])
            .uniform_delay(Duration::from_millis(5));
        let typer = Typer::new(options, Hooks::new()).unwrap();
        let handle = TyperDriver::spawn(typer);

        // Wait for at least one frame past the initial one.
        let rx = handle.snapshots();
        let _ = rx.recv_timeout(Duration::from_secs(5));
        let _ = rx.recv_timeout(Duration::from_secs(5));

        let typer = handle.join().unwrap();
        assert!(!typer.is_complete());
        assert!(typer.is_torn_down());
        assert_eq!(typer.live_timers(), 0);
    }

    #[test]
    fn dropping_handle_cancels() {
        let finished = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&finished);
        let hooks = Hooks::new().on_finish(move || *flag.lock().unwrap() = true);
        let options = TyperOptions::new()
            .spool(["never"])
            .repeats(0)
            .pre_type_delay(Duration::from_secs(60));
        let typer = Typer::new(options, hooks).unwrap();

        let handle = TyperDriver::spawn(typer);
        assert!(!handle.is_cancelled());
        drop(handle);
        assert!(!*finished.lock().unwrap());
    }

    #[test]
    fn already_started_typer_is_not_restarted() {
        let mut typer = Typer::new(quick(&["ab"]).repeats(0), Hooks::new()).unwrap();
        typer.start();
        typer.advance(MS_1);
        assert_eq!(typer.cursor(), 1);

        let handle = TyperDriver::spawn(typer);
        let first = handle.snapshots().recv().unwrap();
        assert_eq!(first.cursor, 1);
        assert!(handle.wait().unwrap().is_complete());
    }
}
