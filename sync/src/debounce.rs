//! Trailing-edge debounce with a single armed flush timer
//!
//! Each `schedule` replaces the pending value and moves its due time one
//! window out. A `FlushToken` is handed out only when no timer is armed;
//! its holder polls with it, sleeping until the reported due time, until
//! the value is ready or the slot has been emptied.
//!
//! Time is always passed in, never read here.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushToken(u64);

/// What an armed timer should do next
#[derive(Debug, PartialEq, Eq)]
pub enum FlushPoll<T> {
    /// Window elapsed; the timer is disarmed and owns the value
    Ready(T),
    /// Still inside the window; sleep until the given instant and poll again
    Wait(Instant),
    /// Nothing to send, or the token is no longer armed
    Idle,
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    due: Instant,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    next_token: u64,
    armed: Option<u64>,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            next_token: 0,
            armed: None,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replace the pending value; it becomes due one window after `now`.
    ///
    /// Returns a token only if a new flush timer has to be started.
    pub fn schedule(&mut self, value: T, now: Instant) -> Option<FlushToken> {
        self.pending = Some(Pending {
            value,
            due: now + self.window,
        });

        if self.armed.is_some() {
            return None;
        }
        self.next_token += 1;
        self.armed = Some(self.next_token);
        Some(FlushToken(self.next_token))
    }

    pub fn poll(&mut self, token: FlushToken, now: Instant) -> FlushPoll<T> {
        if self.armed != Some(token.0) {
            return FlushPoll::Idle;
        }

        let due = match &self.pending {
            Some(p) => p.due,
            None => {
                self.armed = None;
                return FlushPoll::Idle;
            }
        };
        if now < due {
            return FlushPoll::Wait(due);
        }

        self.armed = None;
        match self.pending.take() {
            Some(p) => FlushPoll::Ready(p.value),
            None => FlushPoll::Idle,
        }
    }

    /// Release a token whose timer was never started
    pub fn disarm(&mut self, token: FlushToken) {
        if self.armed == Some(token.0) {
            self.armed = None;
        }
    }

    /// Take the pending value regardless of timing. An armed timer stays
    /// armed and goes idle on its next poll.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(1000);

    #[test]
    fn test_burst_arms_one_timer_and_keeps_latest() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);

        let token = debouncer.schedule(0u64, start).unwrap();
        for i in 1..5u64 {
            let again = debouncer.schedule(i, start + Duration::from_millis(i * 100));
            assert_eq!(again, None);
        }

        let late = start + Duration::from_secs(10);
        assert_eq!(debouncer.poll(token, late), FlushPoll::Ready(4));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.is_armed());
    }

    #[test]
    fn test_not_due_before_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        let token = debouncer.schedule("a", start).unwrap();

        assert_eq!(
            debouncer.poll(token, start + Duration::from_millis(999)),
            FlushPoll::Wait(start + WINDOW)
        );
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.due_at(), Some(start + WINDOW));
        assert_eq!(debouncer.poll(token, start + WINDOW), FlushPoll::Ready("a"));
    }

    #[test]
    fn test_later_schedule_pushes_due_time_back() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        let token = debouncer.schedule(1, start).unwrap();
        debouncer.schedule(2, start + Duration::from_millis(800));

        let second_due = start + Duration::from_millis(1800);
        assert_eq!(debouncer.poll(token, start + WINDOW), FlushPoll::Wait(second_due));
        assert_eq!(debouncer.poll(token, second_due), FlushPoll::Ready(2));
    }

    #[test]
    fn test_take_leaves_timer_to_go_idle() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        let token = debouncer.schedule(7, start).unwrap();

        assert_eq!(debouncer.take(), Some(7));
        assert_eq!(debouncer.take(), None);
        assert!(debouncer.is_armed());

        // still armed, so a new value rides the existing timer
        assert_eq!(debouncer.schedule(8, start), None);
        assert_eq!(debouncer.take(), Some(8));

        assert_eq!(debouncer.poll(token, start + WINDOW), FlushPoll::Idle);
        assert!(!debouncer.is_armed());
        assert!(debouncer.schedule(9, start + WINDOW).is_some());
    }

    #[test]
    fn test_disarm_releases_unstarted_timer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        let token = debouncer.schedule(1, start).unwrap();

        debouncer.disarm(token);
        assert!(!debouncer.is_armed());
        assert!(debouncer.is_pending());

        let next = debouncer.schedule(2, start).unwrap();
        assert_ne!(next, token);
        assert_eq!(debouncer.poll(token, start + WINDOW), FlushPoll::Idle);
        assert_eq!(debouncer.poll(next, start + WINDOW), FlushPoll::Ready(2));
    }
}
