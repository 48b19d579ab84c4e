//! Timers and Cooldowns
//!
//! Two ways to gate an action on time:
//! - `Cooldown`: an elapsed-time check stored next to the flag it guards.
//!   Good for "can I dash again?" style questions asked every frame.
//! - `Timers<E>`: one-shot delayed events. Instead of a callback closure the
//!   caller schedules a plain value and gets it back from `tick` once the
//!   delay has elapsed, then matches on it inside its own `update`.
//!
//! Example flow (dash):
//! 1. Input → `timers.after(0.2, DashEvent::End)`
//! 2. Frames later `tick` yields `DashEvent::End` → stop dashing,
//!    schedule `DashEvent::Ready` after the cooldown
//! 3. `DashEvent::Ready` → allow dashing again

/// An elapsed-time gate.
///
/// `trigger` succeeds only while the cooldown is ready, then blocks until
/// `duration` seconds of `tick` time have passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    duration: f32,
    remaining: f32,
}

impl Cooldown {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            remaining: 0.0,
        }
    }

    /// Try to use the gated action. Returns false (and changes nothing)
    /// while still cooling down.
    pub fn trigger(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.remaining = self.duration;
        true
    }

    /// Start the cooldown regardless of current state.
    pub fn force(&mut self) {
        self.remaining = self.duration;
    }

    pub fn tick(&mut self, delta_time: f32) {
        self.remaining = (self.remaining - delta_time).max(0.0);
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Fraction of the cooldown still to run: 1.0 just triggered, 0.0 ready
    pub fn fraction_remaining(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            (self.remaining / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn reset(&mut self) {
        self.remaining = 0.0;
    }
}

/// Handle to a scheduled timer, used to cancel or reset it.
///
/// Handles are never reused within one `Timers`, so a stale handle can't
/// cancel a newer timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct PendingTimer<E> {
    handle: TimerHandle,
    remaining: f32,
    /// Schedule order, breaks ties between timers due on the same tick
    seq: u64,
    event: E,
}

/// A set of one-shot delayed events.
#[derive(Debug)]
pub struct Timers<E> {
    pending: Vec<PendingTimer<E>>,
    next_id: u64,
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `event` to be returned by `tick` after `delay` seconds.
    pub fn after(&mut self, delay: f32, event: E) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let handle = TimerHandle(id);
        self.pending.push(PendingTimer {
            handle,
            remaining: delay.max(0.0),
            seq: id,
            event,
        });
        handle
    }

    /// Cancel a pending timer. Returns the event if it had not fired yet.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<E> {
        let idx = self.pending.iter().position(|t| t.handle == handle)?;
        Some(self.pending.remove(idx).event)
    }

    /// Restart a pending timer with a new delay. Returns false if the timer
    /// already fired or was cancelled.
    pub fn reset(&mut self, handle: TimerHandle, delay: f32) -> bool {
        match self.pending.iter_mut().find(|t| t.handle == handle) {
            Some(timer) => {
                timer.remaining = delay.max(0.0);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|t| t.handle == handle)
    }

    /// Seconds left on a pending timer
    pub fn remaining(&self, handle: TimerHandle) -> Option<f32> {
        self.pending
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.remaining)
    }

    /// Advance time and return every event whose delay has elapsed,
    /// earliest deadline first.
    pub fn tick(&mut self, delta_time: f32) -> Vec<E> {
        for timer in &mut self.pending {
            timer.remaining -= delta_time;
        }

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].remaining <= 0.0 {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }

        due.sort_by(|a, b| {
            a.remaining
                .partial_cmp(&b.remaining)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        due.into_iter().map(|t| t.event).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending timer without firing it
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_blocks_until_elapsed() {
        let mut cd = Cooldown::new(0.5);
        assert!(cd.trigger());
        assert!(!cd.trigger());

        cd.tick(0.3);
        assert!(!cd.trigger());
        assert!(!cd.is_ready());

        cd.tick(0.25);
        assert!(cd.is_ready());
        assert!(cd.trigger());
    }

    #[test]
    fn test_cooldown_fraction() {
        let mut cd = Cooldown::new(2.0);
        assert_eq!(cd.fraction_remaining(), 0.0);
        cd.trigger();
        assert_eq!(cd.fraction_remaining(), 1.0);
        cd.tick(1.0);
        assert!((cd.fraction_remaining() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_cooldown_always_ready() {
        let mut cd = Cooldown::new(0.0);
        assert!(cd.trigger());
        assert!(cd.trigger());
    }

    #[test]
    fn test_timer_fires_once_after_delay() {
        let mut timers: Timers<&str> = Timers::new();
        timers.after(1.0, "done");

        assert!(timers.tick(0.5).is_empty());
        assert_eq!(timers.tick(0.5), vec!["done"]);
        assert!(timers.tick(1.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let mut timers: Timers<u32> = Timers::new();
        timers.after(0.3, 3);
        timers.after(0.1, 1);
        timers.after(0.2, 2);
        timers.after(0.1, 4);

        // All due on one big tick: earliest deadline first, ties by schedule order
        assert_eq!(timers.tick(1.0), vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut timers: Timers<i32> = Timers::new();
        let a = timers.after(0.5, 1);
        timers.after(0.5, 2);

        assert_eq!(timers.cancel(a), Some(1));
        assert_eq!(timers.cancel(a), None);
        assert_eq!(timers.tick(1.0), vec![2]);
    }

    #[test]
    fn test_reset_extends_deadline() {
        let mut timers: Timers<()> = Timers::new();
        let h = timers.after(1.0, ());

        timers.tick(0.8);
        assert!(timers.reset(h, 1.0));
        assert!(timers.tick(0.8).is_empty());
        assert_eq!(timers.tick(0.25).len(), 1);
        assert!(!timers.reset(h, 1.0));
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut timers: Timers<()> = Timers::new();
        let first = timers.after(0.0, ());
        timers.tick(0.0);
        let second = timers.after(1.0, ());
        assert_ne!(first, second);
        assert!(timers.cancel(first).is_none());
        assert!(timers.is_pending(second));
    }
}
