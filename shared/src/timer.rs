//! One-shot delayed actions.
//!
//! Each scheduled action fires at most once. Handles are never reused, so a
//! cancelled or already-fired handle stays dead even if the caller keeps it.

/// Identifies one scheduled action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Scheduled<A> {
    handle: TimerHandle,
    remaining: f32,
    action: A,
}

#[derive(Debug)]
pub struct Timers<A> {
    next: u64,
    pending: Vec<Scheduled<A>>,
}

impl<A> Default for Timers<A> {
    fn default() -> Self {
        Self {
            next: 0,
            pending: Vec::new(),
        }
    }
}

impl<A> Timers<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire once after `delay_seconds`.
    ///
    /// A non-positive delay fires on the next [`Timers::advance`].
    pub fn schedule(&mut self, delay_seconds: f32, action: A) -> TimerHandle {
        self.next += 1;
        let handle = TimerHandle(self.next);
        self.pending.push(Scheduled {
            handle,
            remaining: delay_seconds.max(0.0),
            action,
        });
        handle
    }

    /// Returns `true` if the action was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.handle != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|s| s.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance time and return every action that came due, earliest first.
    /// Actions due at the same instant come back in scheduling order.
    pub fn advance(&mut self, dt_seconds: f32) -> Vec<A> {
        let dt = dt_seconds.max(0.0);
        for s in &mut self.pending {
            s.remaining -= dt;
        }

        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|s| s.remaining <= 0.0);
        self.pending = waiting;

        due.sort_by(|a, b| {
            a.remaining
                .total_cmp(&b.remaining)
                .then(a.handle.cmp(&b.handle))
        });
        due.into_iter().map(|s| s.action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_delay() {
        let mut timers = Timers::new();
        timers.schedule(0.1, "attach");

        assert!(timers.advance(0.05).is_empty());
        assert_eq!(timers.advance(0.05), vec!["attach"]);
        assert!(timers.advance(1.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = Timers::new();
        let handle = timers.schedule(0.1, 1);

        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));
        assert!(timers.advance(1.0).is_empty());
    }

    #[test]
    fn due_actions_come_back_in_due_order() {
        let mut timers = Timers::new();
        timers.schedule(0.3, "late");
        timers.schedule(0.1, "early");
        timers.schedule(0.1, "early-second");

        assert_eq!(timers.advance(0.5), vec!["early", "early-second", "late"]);
    }

    #[test]
    fn handles_are_not_reused() {
        let mut timers = Timers::new();
        let first = timers.schedule(0.0, ());
        timers.advance(0.0);
        let second = timers.schedule(0.0, ());

        assert_ne!(first, second);
        assert!(!timers.is_pending(first));
        assert!(timers.is_pending(second));
    }
}
