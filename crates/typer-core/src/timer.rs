#![forbid(unsafe_code)]

//! Virtual timer source with one slot per timer role.
//!
//! The controller never sleeps. It asks [`Timers`] to fire an action once
//! after a delay or repeatedly at an interval, and the host moves a virtual
//! clock forward; due timers pop out in deadline order and are handled
//! synchronously, one at a time.
//!
//! # Invariants
//!
//! 1. At most one timer per [`TimerRole`] is live; arming a role replaces
//!    (cancels) whatever that role held.
//! 2. `pop_due` never moves the clock backwards and never past its horizon.
//! 3. A one-shot timer fires at most once; a repeating timer is re-armed
//!    relative to its own deadline, so late polling does not drift.
//! 4. `cancel` and `cancel_all` are idempotent.

use std::time::Duration;

/// Which slot a timer occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerRole {
    /// One-shot pause before a phase's first step.
    PreDelay,
    /// Recurring step within a phase.
    Step,
}

/// When a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Firing {
    Once,
    Every(Duration),
}

#[derive(Debug, Clone)]
struct Timer<A> {
    deadline: Duration,
    firing: Firing,
    action: A,
}

/// A fired timer, handed back to the owner for handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<A> {
    pub role: TimerRole,
    pub action: A,
    /// Virtual time the timer was due.
    pub at: Duration,
}

/// Two timer slots on a shared virtual clock.
#[derive(Debug, Clone)]
pub struct Timers<A> {
    now: Duration,
    pre_delay: Option<Timer<A>>,
    step: Option<Timer<A>>,
    armed_total: u64,
}

impl<A> Default for Timers<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Timers<A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            pre_delay: None,
            step: None,
            armed_total: 0,
        }
    }

    fn slot_mut(&mut self, role: TimerRole) -> &mut Option<Timer<A>> {
        match role {
            TimerRole::PreDelay => &mut self.pre_delay,
            TimerRole::Step => &mut self.step,
        }
    }

    fn slot(&self, role: TimerRole) -> Option<&Timer<A>> {
        match role {
            TimerRole::PreDelay => self.pre_delay.as_ref(),
            TimerRole::Step => self.step.as_ref(),
        }
    }

    fn arm(&mut self, role: TimerRole, delay: Duration, firing: Firing, action: A) {
        let deadline = self.now.saturating_add(delay);
        *self.slot_mut(role) = Some(Timer {
            deadline,
            firing,
            action,
        });
        self.armed_total += 1;
    }

    /// Fire `action` once, `delay` from now. Replaces any live timer in `role`.
    pub fn arm_once(&mut self, role: TimerRole, delay: Duration, action: A) {
        self.arm(role, delay, Firing::Once, action);
    }

    /// Fire `action` every `interval`, first at now + `interval`.
    /// Replaces any live timer in `role`.
    pub fn arm_every(&mut self, role: TimerRole, interval: Duration, action: A) {
        self.arm(role, interval, Firing::Every(interval), action);
    }

    /// Cancel the timer in `role`. Returns whether one was live.
    pub fn cancel(&mut self, role: TimerRole) -> bool {
        self.slot_mut(role).take().is_some()
    }

    /// Cancel both slots.
    pub fn cancel_all(&mut self) {
        self.pre_delay = None;
        self.step = None;
    }

    #[inline]
    #[must_use]
    pub fn is_armed(&self, role: TimerRole) -> bool {
        self.slot(role).is_some()
    }

    /// Number of live timers (0..=2).
    #[must_use]
    pub fn live(&self) -> usize {
        usize::from(self.pre_delay.is_some()) + usize::from(self.step.is_some())
    }

    /// Total number of arm calls since construction.
    #[must_use]
    pub fn armed_total(&self) -> u64 {
        self.armed_total
    }

    /// Current virtual time.
    #[inline]
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward to `to`. Earlier values are ignored.
    pub fn advance_to(&mut self, to: Duration) {
        if to > self.now {
            self.now = to;
        }
    }

    /// Reset the clock to zero and drop every timer.
    pub fn reset(&mut self) {
        self.cancel_all();
        self.now = Duration::ZERO;
    }

    /// Deadline of `role`'s timer, if armed.
    #[must_use]
    pub fn deadline(&self, role: TimerRole) -> Option<Duration> {
        self.slot(role).map(|t| t.deadline)
    }

    /// Earliest live deadline, with `PreDelay` winning ties.
    fn earliest(&self) -> Option<(TimerRole, Duration)> {
        match (self.deadline(TimerRole::PreDelay), self.deadline(TimerRole::Step)) {
            (Some(p), Some(s)) if s < p => Some((TimerRole::Step, s)),
            (Some(p), _) => Some((TimerRole::PreDelay, p)),
            (None, Some(s)) => Some((TimerRole::Step, s)),
            (None, None) => None,
        }
    }

    /// Time from now until the earliest live deadline.
    #[must_use]
    pub fn until_next(&self) -> Option<Duration> {
        self.earliest()
            .map(|(_, deadline)| deadline.saturating_sub(self.now))
    }
}

impl<A: Clone> Timers<A> {
    /// Pop the earliest timer due at or before `horizon`.
    ///
    /// Moves the clock to that timer's deadline. One-shot timers are
    /// removed; repeating timers are re-armed one interval later.
    pub fn pop_due(&mut self, horizon: Duration) -> Option<Fired<A>> {
        let (role, deadline) = self.earliest()?;
        if deadline > horizon {
            return None;
        }
        self.advance_to(deadline);

        let slot = self.slot_mut(role);
        let timer = slot.as_mut()?;
        let action = timer.action.clone();
        let firing = timer.firing;
        match firing {
            Firing::Once => {
                *slot = None;
            }
            Firing::Every(interval) => {
                timer.deadline = deadline.saturating_add(interval);
            }
        }

        Some(Fired {
            role,
            action,
            at: deadline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_10: Duration = Duration::from_millis(10);
    const MS_25: Duration = Duration::from_millis(25);
    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn new_timers_are_empty() {
        let t: Timers<u8> = Timers::new();
        assert_eq!(t.live(), 0);
        assert_eq!(t.until_next(), None);
        assert_eq!(t.now(), Duration::ZERO);
    }

    #[test]
    fn once_fires_exactly_once() {
        let mut t = Timers::new();
        t.arm_once(TimerRole::PreDelay, MS_10, 'a');

        assert!(t.pop_due(Duration::from_millis(9)).is_none());
        let fired = t.pop_due(MS_100).unwrap();
        assert_eq!(fired.role, TimerRole::PreDelay);
        assert_eq!(fired.action, 'a');
        assert_eq!(fired.at, MS_10);
        assert_eq!(t.now(), MS_10);
        assert!(t.pop_due(MS_100).is_none());
        assert_eq!(t.live(), 0);
    }

    #[test]
    fn every_rearms_from_its_deadline() {
        let mut t = Timers::new();
        t.arm_every(TimerRole::Step, MS_10, ());

        let mut fired_at = Vec::new();
        while let Some(f) = t.pop_due(MS_25) {
            fired_at.push(f.at);
        }
        assert_eq!(fired_at, vec![MS_10, Duration::from_millis(20)]);
        assert_eq!(t.deadline(TimerRole::Step), Some(Duration::from_millis(30)));
    }

    #[test]
    fn arming_replaces_same_role() {
        let mut t = Timers::new();
        t.arm_once(TimerRole::PreDelay, MS_10, 1);
        t.arm_once(TimerRole::PreDelay, MS_100, 2);
        assert_eq!(t.live(), 1);
        assert!(t.pop_due(MS_25).is_none());
        assert_eq!(t.pop_due(MS_100).map(|f| f.action), Some(2));
    }

    #[test]
    fn earliest_deadline_pops_first_and_predelay_wins_ties() {
        let mut t = Timers::new();
        t.arm_every(TimerRole::Step, MS_10, "step");
        t.arm_once(TimerRole::PreDelay, MS_10, "pre");
        assert_eq!(t.pop_due(MS_100).map(|f| f.action), Some("pre"));
        assert_eq!(t.pop_due(MS_100).map(|f| f.action), Some("step"));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut t = Timers::new();
        t.arm_once(TimerRole::Step, MS_10, ());
        assert!(t.cancel(TimerRole::Step));
        assert!(!t.cancel(TimerRole::Step));
        t.cancel_all();
        t.cancel_all();
        assert_eq!(t.live(), 0);
    }

    #[test]
    fn until_next_is_relative_to_now() {
        let mut t = Timers::new();
        t.advance_to(MS_10);
        t.arm_once(TimerRole::PreDelay, MS_25, ());
        assert_eq!(t.until_next(), Some(MS_25));
        t.advance_to(Duration::from_millis(20));
        assert_eq!(t.until_next(), Some(Duration::from_millis(15)));
    }

    #[test]
    fn advance_to_never_rewinds() {
        let mut t: Timers<()> = Timers::new();
        t.advance_to(MS_100);
        t.advance_to(MS_10);
        assert_eq!(t.now(), MS_100);
    }

    #[test]
    fn reset_clears_clock_and_slots() {
        let mut t = Timers::new();
        t.arm_once(TimerRole::PreDelay, MS_10, ());
        t.advance_to(MS_100);
        t.reset();
        assert_eq!(t.now(), Duration::ZERO);
        assert_eq!(t.live(), 0);
        assert_eq!(t.armed_total(), 1);
    }
}
