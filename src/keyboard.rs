//! Keyboard state and adapters.
//!
//! Keys are one-byte virtual-key codes. Every one of the 256 codes is a valid
//! [`Key`]; codes no hardware produces simply never read as down. Raw identifiers
//! wider than a byte are rejected when converted (`Key::try_from(u16)`).
//!
//! Two adapters are provided:
//! - [`KeyboardFeed`]: event-driven (Raw Input `WM_INPUT`), fed with [`KeyEvent`]s.
//! - [`RawKeyboardFeed`]: snapshot-driven, fed with a 256-byte key-state buffer
//!   (the `GetKeyboardState` layout: `0x80` = down, `0x01` = toggled).

use crate::device::{DeviceState, InputDevice, StateSource};
use crate::error::{InputError, Result, SourceError};
use crate::event::KeyEvent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinguishable key codes.
pub const KEY_COUNT: usize = 256;

/// Size of a raw keyboard state buffer.
pub const RAW_KEYBOARD_LEN: usize = KEY_COUNT;

const RAW_DOWN: u8 = 0x80;

/// A virtual-key code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub u8);

impl Key {
    pub const BACKSPACE: Key = Key(0x08);
    pub const TAB: Key = Key(0x09);
    pub const ENTER: Key = Key(0x0D);
    pub const SHIFT: Key = Key(0x10);
    pub const CONTROL: Key = Key(0x11);
    pub const ALT: Key = Key(0x12);
    pub const CAPS_LOCK: Key = Key(0x14);
    pub const ESCAPE: Key = Key(0x1B);
    pub const SPACE: Key = Key(0x20);
    pub const LEFT: Key = Key(0x25);
    pub const UP: Key = Key(0x26);
    pub const RIGHT: Key = Key(0x27);
    pub const DOWN: Key = Key(0x28);
    pub const NUM_LOCK: Key = Key(0x90);
    pub const SCROLL_LOCK: Key = Key(0x91);
    pub const LEFT_SHIFT: Key = Key(0xA0);
    pub const RIGHT_SHIFT: Key = Key(0xA1);
    pub const LEFT_CONTROL: Key = Key(0xA2);
    pub const RIGHT_CONTROL: Key = Key(0xA3);

    /// Key for an ASCII letter or digit (letters are case-insensitive).
    pub const fn from_ascii(c: u8) -> Option<Key> {
        match c {
            b'0'..=b'9' | b'A'..=b'Z' => Some(Key(c)),
            b'a'..=b'z' => Some(Key(c - 32)),
            _ => None,
        }
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self.0
    }
}

impl From<u8> for Key {
    fn from(code: u8) -> Self {
        Key(code)
    }
}

impl TryFrom<u16> for Key {
    type Error = InputError;

    fn try_from(code: u16) -> Result<Self> {
        u8::try_from(code).map(Key).map_err(|_| {
            InputError::invalid("key code", format!("{code:#x} does not fit in a byte"))
        })
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:#04x})", self.0)
    }
}

/// Which keys are down, one bit per code.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyboardState {
    bits: [u64; KEY_COUNT / 64],
}

impl KeyboardState {
    /// Decode a `GetKeyboardState`-style buffer (high bit = down).
    pub fn from_raw(raw: &[u8; RAW_KEYBOARD_LEN]) -> Self {
        let mut state = Self::default();
        for (code, byte) in raw.iter().enumerate() {
            if byte & RAW_DOWN != 0 {
                state.set(Key(code as u8), true);
            }
        }
        state
    }

    /// Decode a raw buffer of unknown length. It must be exactly 256 bytes.
    pub fn from_raw_slice(raw: &[u8]) -> Result<Self> {
        let raw: &[u8; RAW_KEYBOARD_LEN] = raw.try_into().map_err(|_| {
            InputError::invalid(
                "keyboard buffer",
                format!("expected {RAW_KEYBOARD_LEN} bytes, got {}", raw.len()),
            )
        })?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        let mut state = Self::default();
        for key in keys {
            state.set(key, true);
        }
        state
    }

    #[inline]
    pub fn is_down(&self, key: Key) -> bool {
        let code = key.0 as usize;
        self.bits[code / 64] & (1 << (code % 64)) != 0
    }

    #[inline]
    pub fn set(&mut self, key: Key, down: bool) {
        let code = key.0 as usize;
        let mask = 1u64 << (code % 64);
        if down {
            self.bits[code / 64] |= mask;
        } else {
            self.bits[code / 64] &= !mask;
        }
    }

    /// Keys currently down, in code order.
    pub fn pressed_keys(&self) -> impl Iterator<Item = Key> + '_ {
        (0..KEY_COUNT).map(|c| Key(c as u8)).filter(|k| self.is_down(*k))
    }

    pub fn pressed_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl fmt::Debug for KeyboardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.pressed_keys()).finish()
    }
}

impl DeviceState for KeyboardState {
    type Button = Key;

    fn neutral() -> Self {
        Self::default()
    }

    fn is_active(&self, key: Key) -> bool {
        self.is_down(key)
    }
}

/// Event-driven keyboard source.
///
/// Key events are queued between frames and applied, in order, to the held-key
/// set when the driver reads. The queue is empty after every read.
///
/// Only the held set at read time is visible, so a key that goes down and up
/// between two updates produces no edge at all. Hosts that need sub-frame taps
/// must look at the [`KeyEvent`] stream themselves.
#[derive(Debug)]
pub struct KeyboardFeed {
    held: KeyboardState,
    pending: Vec<KeyEvent>,
    connected: bool,
}

impl Default for KeyboardFeed {
    fn default() -> Self {
        Self {
            held: KeyboardState::default(),
            pending: Vec::new(),
            connected: true,
        }
    }
}

impl KeyboardFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: KeyEvent) {
        self.pending.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = KeyEvent>) {
        self.pending.extend(events);
    }

    /// Number of events waiting for the next read.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Mark the device as attached/removed (e.g. on `WM_INPUT_DEVICE_CHANGE`).
    ///
    /// Removing the device also forgets held keys and queued events.
    pub fn set_connected(&mut self, connected: bool) {
        if !connected {
            self.held = KeyboardState::default();
            self.pending.clear();
        }
        self.connected = connected;
    }
}

impl StateSource for KeyboardFeed {
    type State = KeyboardState;

    fn read_state(&mut self) -> Result<KeyboardState, SourceError> {
        if !self.connected {
            return Err(SourceError::Disconnected);
        }
        for event in self.pending.drain(..) {
            self.held.set(event.key, event.down);
        }
        Ok(self.held)
    }

    fn name(&self) -> &str {
        "keyboard"
    }
}

/// Snapshot-driven keyboard source fed with whole 256-byte buffers.
#[derive(Debug, Clone)]
pub struct RawKeyboardFeed {
    latest: [u8; RAW_KEYBOARD_LEN],
}

impl Default for RawKeyboardFeed {
    fn default() -> Self {
        Self {
            latest: [0; RAW_KEYBOARD_LEN],
        }
    }
}

impl RawKeyboardFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer the next read will decode.
    pub fn feed(&mut self, raw: [u8; RAW_KEYBOARD_LEN]) {
        self.latest = raw;
    }

    /// The last buffer fed (toggle bits included).
    pub fn latest_raw(&self) -> &[u8; RAW_KEYBOARD_LEN] {
        &self.latest
    }
}

impl StateSource for RawKeyboardFeed {
    type State = KeyboardState;

    fn read_state(&mut self) -> Result<KeyboardState, SourceError> {
        Ok(KeyboardState::from_raw(&self.latest))
    }

    fn name(&self) -> &str {
        "keyboard"
    }
}

/// A keyboard driver.
pub type Keyboard<S = KeyboardFeed> = InputDevice<S>;

impl<S: StateSource<State = KeyboardState>> InputDevice<S> {
    /// Keys that went down this frame, in code order.
    pub fn just_pressed_keys(&self) -> Vec<Key> {
        if !self.is_connected() {
            return Vec::new();
        }
        self.current_state()
            .pressed_keys()
            .filter(|k| !self.previous_state().is_down(*k))
            .collect()
    }

    /// Keys that went up this frame, in code order.
    pub fn just_released_keys(&self) -> Vec<Key> {
        if !self.is_connected() {
            return Vec::new();
        }
        self.previous_state()
            .pressed_keys()
            .filter(|k| !self.current_state().is_down(*k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceIndex;
    use std::time::Duration;

    #[test]
    fn raw_buffer_high_bit_means_down() {
        let mut raw = [0u8; RAW_KEYBOARD_LEN];
        raw[Key::SPACE.code() as usize] = 0x80;
        raw[Key::CAPS_LOCK.code() as usize] = 0x01; // toggled only
        raw[0xFF] = 0x81;
        let state = KeyboardState::from_raw(&raw);
        assert!(state.is_down(Key::SPACE));
        assert!(!state.is_down(Key::CAPS_LOCK));
        assert!(state.is_down(Key(0xFF)));
        assert_eq!(state.pressed_count(), 2);
    }

    #[test]
    fn raw_slice_must_be_256_bytes() {
        let err = KeyboardState::from_raw_slice(&[0u8; 255]).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(KeyboardState::from_raw_slice(&[0u8; 256]).is_ok());
    }

    #[test]
    fn wide_key_codes_are_rejected() {
        assert_eq!(Key::try_from(0x41u16).unwrap(), Key(0x41));
        assert!(Key::try_from(0x100u16).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn unused_codes_read_false() {
        let state = KeyboardState::from_keys([Key::ENTER]);
        for code in 0..=255u8 {
            assert_eq!(state.is_down(Key(code)), code == Key::ENTER.code());
        }
    }

    #[test]
    fn ascii_keys() {
        assert_eq!(Key::from_ascii(b'w'), Some(Key(b'W')));
        assert_eq!(Key::from_ascii(b'7'), Some(Key(b'7')));
        assert_eq!(Key::from_ascii(b'-'), None);
    }

    #[test]
    fn feed_applies_events_in_order_and_drains() {
        let w = Key::from_ascii(b'W').unwrap();
        let mut kb = Keyboard::new(KeyboardFeed::new(), DeviceIndex::FIRST).unwrap();

        kb.source_mut().extend([
            KeyEvent::down(w),
            KeyEvent::down(Key::SPACE),
            KeyEvent::up(Key::SPACE),
        ]);
        kb.update(Duration::from_millis(16)).unwrap();
        assert_eq!(kb.source().pending(), 0);
        assert!(kb.has_just_been_pressed(w));
        assert!(!kb.is_pressed(Key::SPACE));
        assert_eq!(kb.just_pressed_keys(), vec![w]);

        kb.update(Duration::from_millis(32)).unwrap();
        assert!(kb.is_pressed(w));
        assert!(!kb.has_just_been_pressed(w));

        kb.source_mut().push(KeyEvent::up(w));
        kb.update(Duration::from_millis(48)).unwrap();
        assert!(kb.has_just_been_released(w));
        assert_eq!(kb.just_released_keys(), vec![w]);
    }

    #[test]
    fn removed_keyboard_reports_nothing() {
        let mut kb = Keyboard::new(KeyboardFeed::new(), DeviceIndex::FIRST).unwrap();
        kb.source_mut().push(KeyEvent::down(Key::ESCAPE));
        kb.update(Duration::from_millis(16)).unwrap();
        assert!(kb.has_just_been_pressed(Key::ESCAPE));

        kb.source_mut().set_connected(false);
        kb.update(Duration::from_millis(32)).unwrap();
        assert!(!kb.is_connected());
        assert!(!kb.has_just_been_released(Key::ESCAPE));
        assert!(kb.just_released_keys().is_empty());
    }

    #[test]
    fn raw_feed_drives_edges() {
        let mut kb = InputDevice::new(RawKeyboardFeed::new(), DeviceIndex::FIRST).unwrap();
        let mut raw = [0u8; RAW_KEYBOARD_LEN];
        raw[Key::UP.code() as usize] = 0x80;
        kb.source_mut().feed(raw);
        kb.update(Duration::from_millis(16)).unwrap();
        assert!(kb.has_just_been_pressed(Key::UP));
        assert_eq!(kb.source().latest_raw()[Key::UP.code() as usize], 0x80);
    }
}
