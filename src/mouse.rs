//! Mouse state and the Raw Input accumulator.
//!
//! A mouse frame is a relative motion delta, a wheel delta, and the set of
//! buttons held at the end of the frame. [`MouseFeed`] sums packets between
//! frames; each driver update reads the sums out and zeroes them, while the
//! held-button set carries over.

use crate::device::{DeviceState, InputDevice, StateSource};
use crate::error::{InputError, Result, SourceError};
use crate::event::{MouseDelta, RawMouseFlags};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

impl MouseButton {
    pub const ALL: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::X1,
        MouseButton::X2,
    ];

    #[inline]
    pub fn flag(self) -> MouseButtons {
        match self {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Right => MouseButtons::RIGHT,
            MouseButton::Middle => MouseButtons::MIDDLE,
            MouseButton::X1 => MouseButtons::X1,
            MouseButton::X2 => MouseButtons::X2,
        }
    }

    /// (down, up) transition flags for this button in a Raw Input packet.
    fn raw_transitions(self) -> (RawMouseFlags, RawMouseFlags) {
        match self {
            MouseButton::Left => (RawMouseFlags::LEFT_DOWN, RawMouseFlags::LEFT_UP),
            MouseButton::Right => (RawMouseFlags::RIGHT_DOWN, RawMouseFlags::RIGHT_UP),
            MouseButton::Middle => (RawMouseFlags::MIDDLE_DOWN, RawMouseFlags::MIDDLE_UP),
            MouseButton::X1 => (RawMouseFlags::X1_DOWN, RawMouseFlags::X1_UP),
            MouseButton::X2 => (RawMouseFlags::X2_DOWN, RawMouseFlags::X2_UP),
        }
    }
}

/// Zero-based button number: 0 = left, 1 = right, 2 = middle, 3 = X1, 4 = X2.
impl TryFrom<u8> for MouseButton {
    type Error = InputError;

    fn try_from(index: u8) -> Result<Self> {
        MouseButton::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| InputError::invalid("mouse button", format!("{index} is outside 0..5")))
    }
}

bitflags! {
    /// Buttons held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    #[repr(transparent)]
    pub struct MouseButtons: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
        const X1 = 1 << 3;
        const X2 = 1 << 4;
    }
}

/// A 2D integer delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delta {
    pub x: i32,
    pub y: i32,
}

impl Delta {
    pub const ZERO: Delta = Delta { x: 0, y: 0 };

    #[inline]
    fn accumulate(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }
}

/// One mouse frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MouseState {
    /// Relative motion since the previous frame (raw counts).
    pub motion: Delta,
    /// Wheel motion since the previous frame: `x` horizontal, `y` vertical (raw units).
    pub wheel: Delta,
    pub buttons: MouseButtons,
}

impl DeviceState for MouseState {
    type Button = MouseButton;

    fn neutral() -> Self {
        Self::default()
    }

    fn is_active(&self, button: MouseButton) -> bool {
        self.buttons.contains(button.flag())
    }
}

/// Raw Input mouse accumulator.
///
/// Motion and wheel are summed until the next read. Buttons keep only their
/// held state, so a click that starts and ends between two updates is lost.
#[derive(Debug)]
pub struct MouseFeed {
    pending: MouseState,
    connected: bool,
}

impl Default for MouseFeed {
    fn default() -> Self {
        Self {
            pending: MouseState::default(),
            connected: true,
        }
    }
}

impl MouseFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one packet.
    ///
    /// Motion and wheel deltas are summed. Button transitions are applied in
    /// down-then-up order, so a click inside one packet leaves the button up.
    pub fn push(&mut self, delta: MouseDelta) {
        let acc = &mut self.pending;
        acc.motion.accumulate(delta.dx, delta.dy);
        if delta.flags.contains(RawMouseFlags::WHEEL) {
            acc.wheel.accumulate(0, delta.wheel as i32);
        }
        if delta.flags.contains(RawMouseFlags::HWHEEL) {
            acc.wheel.accumulate(delta.hwheel as i32, 0);
        }
        for button in MouseButton::ALL {
            let (down, up) = button.raw_transitions();
            if delta.flags.contains(down) {
                acc.buttons.insert(button.flag());
            }
            if delta.flags.contains(up) {
                acc.buttons.remove(button.flag());
            }
        }
    }

    pub fn extend(&mut self, deltas: impl IntoIterator<Item = MouseDelta>) {
        for delta in deltas {
            self.push(delta);
        }
    }

    /// What the next read would return.
    pub fn peek(&self) -> &MouseState {
        &self.pending
    }

    /// Mark the device as attached/removed. Removal drops held buttons and sums.
    pub fn set_connected(&mut self, connected: bool) {
        if !connected {
            self.pending = MouseState::default();
        }
        self.connected = connected;
    }
}

impl StateSource for MouseFeed {
    type State = MouseState;

    fn read_state(&mut self) -> Result<MouseState, SourceError> {
        if !self.connected {
            return Err(SourceError::Disconnected);
        }
        let state = self.pending;
        self.pending.motion = Delta::ZERO;
        self.pending.wheel = Delta::ZERO;
        Ok(state)
    }

    fn name(&self) -> &str {
        "mouse"
    }
}

/// A mouse driver.
pub type Mouse<S = MouseFeed> = InputDevice<S>;

impl<S: StateSource<State = MouseState>> InputDevice<S> {
    /// Motion of the current frame (zero while disconnected).
    pub fn motion(&self) -> Delta {
        if self.is_connected() {
            self.current_state().motion
        } else {
            Delta::ZERO
        }
    }

    /// Wheel motion of the current frame (zero while disconnected).
    pub fn wheel(&self) -> Delta {
        if self.is_connected() {
            self.current_state().wheel
        } else {
            Delta::ZERO
        }
    }
}
