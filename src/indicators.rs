//! Keyboard lock indicators (Caps/Num/Scroll Lock).
//!
//! Indicator state belongs to the whole machine, not to one keyboard, so it is
//! kept in one process-wide "last known value" cache. Nothing updates it
//! behind your back: call [`refresh`] (or the Windows backend's
//! `refresh_from_os`) from the input-polling thread when you want a new value,
//! and read it anywhere with [`last_known`].

use crate::keyboard::{Key, RAW_KEYBOARD_LEN};
use bitflags::bitflags;
use log::debug;
use std::sync::atomic::{AtomicU8, Ordering};

bitflags! {
    /// Lock keys whose toggle is currently on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    #[repr(transparent)]
    pub struct LockIndicators: u8 {
        const CAPS_LOCK = 1 << 0;
        const NUM_LOCK = 1 << 1;
        const SCROLL_LOCK = 1 << 2;
    }
}

const RAW_TOGGLED: u8 = 0x01;

static LAST_KNOWN: AtomicU8 = AtomicU8::new(0);

impl LockIndicators {
    /// Decode the toggle bits of a `GetKeyboardState`-style buffer.
    pub fn from_raw(raw: &[u8; RAW_KEYBOARD_LEN]) -> Self {
        let toggled = |key: Key| raw[key.code() as usize] & RAW_TOGGLED != 0;
        let mut out = LockIndicators::empty();
        out.set(LockIndicators::CAPS_LOCK, toggled(Key::CAPS_LOCK));
        out.set(LockIndicators::NUM_LOCK, toggled(Key::NUM_LOCK));
        out.set(LockIndicators::SCROLL_LOCK, toggled(Key::SCROLL_LOCK));
        out
    }
}

/// Recompute the indicators from `raw` and store them as the last known value.
pub fn refresh(raw: &[u8; RAW_KEYBOARD_LEN]) -> LockIndicators {
    store(LockIndicators::from_raw(raw))
}

/// Store an externally obtained value as the last known value.
pub fn store(indicators: LockIndicators) -> LockIndicators {
    let old = LAST_KNOWN.swap(indicators.bits(), Ordering::Relaxed);
    if old != indicators.bits() {
        debug!("lock indicators: {indicators:?}");
    }
    indicators
}

/// The value stored by the most recent [`refresh`]/[`store`] (empty before the first).
pub fn last_known() -> LockIndicators {
    LockIndicators::from_bits_truncate(LAST_KNOWN.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_toggle_bits_only() {
        let mut raw = [0u8; RAW_KEYBOARD_LEN];
        raw[Key::CAPS_LOCK.code() as usize] = 0x01;
        raw[Key::NUM_LOCK.code() as usize] = 0x80; // held, not toggled
        raw[Key::SCROLL_LOCK.code() as usize] = 0x81;
        let ind = LockIndicators::from_raw(&raw);
        assert_eq!(ind, LockIndicators::CAPS_LOCK | LockIndicators::SCROLL_LOCK);
    }

    // The cache is process-wide, so everything touching it lives in one test.
    #[test]
    fn refresh_updates_last_known() {
        let mut raw = [0u8; RAW_KEYBOARD_LEN];
        raw[Key::NUM_LOCK.code() as usize] = 0x01;
        assert_eq!(refresh(&raw), LockIndicators::NUM_LOCK);
        assert_eq!(last_known(), LockIndicators::NUM_LOCK);

        store(LockIndicators::empty());
        assert_eq!(last_known(), LockIndicators::empty());
    }
}
