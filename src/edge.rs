//! Press/release transition queries.
//!
//! These are pure functions of a [`StateBuffer`] and an "is this button active
//! in this state" predicate. Connection status is handled by the driver, which
//! short-circuits to `false` before calling in here.

use crate::buffer::StateBuffer;

/// `true` if `button` is active now and was not active in the previous state.
#[inline]
pub fn has_just_been_pressed<S, B, F>(buffer: &StateBuffer<S>, button: B, is_active: F) -> bool
where
    B: Copy,
    F: Fn(&S, B) -> bool,
{
    is_active(buffer.current(), button) && !is_active(buffer.previous(), button)
}

/// `true` if `button` is inactive now and was active in the previous state.
#[inline]
pub fn has_just_been_released<S, B, F>(buffer: &StateBuffer<S>, button: B, is_active: F) -> bool
where
    B: Copy,
    F: Fn(&S, B) -> bool,
{
    !is_active(buffer.current(), button) && is_active(buffer.previous(), button)
}
