//! Two-slot state storage.
//!
//! [`StateBuffer`] holds exactly the current and the immediately preceding device
//! state, plus the time each was captured. It has no business logic beyond
//! storage and rotation; edge detection lives in [`edge`](crate::edge).

use std::time::Duration;

/// Current/previous state pair with timestamps.
///
/// Invariant: `previous_time() <= current_time()` as long as callers rotate with
/// non-decreasing times (the driver enforces this).
#[derive(Clone, Debug, PartialEq)]
pub struct StateBuffer<S> {
    current: S,
    previous: S,
    current_time: Duration,
    previous_time: Duration,
}

impl<S: Clone> StateBuffer<S> {
    /// Build a primed buffer: both slots hold `initial`, both stamps are zero.
    pub fn new(initial: S) -> Self {
        Self::new_at(initial, Duration::ZERO)
    }

    /// Build a primed buffer stamped with `time`.
    pub fn new_at(initial: S, time: Duration) -> Self {
        Self {
            previous: initial.clone(),
            current: initial,
            current_time: time,
            previous_time: time,
        }
    }

    /// Re-prime in place: current = previous = `initial`, both stamps zero.
    ///
    /// A freshly initialized buffer never reports an edge.
    pub fn initialize(&mut self, initial: S) {
        self.initialize_at(initial, Duration::ZERO);
    }

    /// Re-prime in place with both stamps set to `time`.
    pub fn initialize_at(&mut self, initial: S, time: Duration) {
        *self = Self::new_at(initial, time);
    }

    /// Shift current into previous and store `state` as current.
    ///
    /// Exactly one level of history is kept.
    pub fn rotate(&mut self, state: S, time: Duration) {
        self.previous = std::mem::replace(&mut self.current, state);
        self.previous_time = self.current_time;
        self.current_time = time;
    }
}

impl<S> StateBuffer<S> {
    #[inline]
    pub fn current(&self) -> &S {
        &self.current
    }

    #[inline]
    pub fn previous(&self) -> &S {
        &self.previous
    }

    #[inline]
    pub fn current_time(&self) -> Duration {
        self.current_time
    }

    #[inline]
    pub fn previous_time(&self) -> Duration {
        self.previous_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn initialize_sets_both_slots_and_zero_times() {
        let mut buf = StateBuffer::new(1u32);
        buf.rotate(2, ms(5));
        buf.initialize(7);
        assert_eq!(*buf.current(), 7);
        assert_eq!(*buf.previous(), 7);
        assert_eq!(buf.current_time(), Duration::ZERO);
        assert_eq!(buf.previous_time(), Duration::ZERO);
    }

    #[test]
    fn rotate_keeps_exactly_one_level_of_history() {
        let mut buf = StateBuffer::new(0u32);
        buf.rotate(1, ms(10));
        buf.rotate(2, ms(20));
        assert_eq!(*buf.previous(), 1);
        assert_eq!(*buf.current(), 2);
        assert_eq!(buf.previous_time(), ms(10));
        assert_eq!(buf.current_time(), ms(20));
    }

    #[test]
    fn rotate_with_identical_states_still_shifts() {
        let mut buf = StateBuffer::new(3u32);
        buf.rotate(3, ms(1));
        buf.rotate(3, ms(1));
        assert_eq!(*buf.previous(), 3);
        assert_eq!(*buf.current(), 3);
        assert_eq!(buf.previous_time(), buf.current_time());
    }

    #[test]
    fn initialize_at_stamps_both_times() {
        let buf = StateBuffer::new_at('a', ms(42));
        assert_eq!(buf.current_time(), ms(42));
        assert_eq!(buf.previous_time(), ms(42));
    }
}
