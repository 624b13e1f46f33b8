//! Gamepad state and driver.
//!
//! The raw frame is the fixed 12-byte XInput-style record ([`RawGamepad`]):
//! a 16-bit button mask, two 8-bit triggers and four signed 16-bit stick axes.
//! [`Gamepad`] wraps the generic [`InputDevice`] driver and adds dead-zone
//! filtered analog accessors.
//!
//! # Example
//! ```
//! use padstate::backends::virtual_input::VirtualGamepad;
//! use padstate::{DeviceIndex, Gamepad, GamepadButton};
//! use std::time::Duration;
//!
//! let mut pad = Gamepad::new(VirtualGamepad::new(), DeviceIndex::FIRST).unwrap();
//! pad.source_mut().press(GamepadButton::A);
//! pad.update(Duration::from_millis(16)).unwrap();
//! assert!(pad.has_just_been_pressed(GamepadButton::A));
//! ```

use crate::deadzone::{normalize_axis, DeadZoneFilter, Stick};
use crate::device::{DeviceIndex, DeviceState, InputDevice, StateSource};
use crate::error::{InputError, Result};
use crate::snapshot::GamepadSnapshot;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::time::Duration;

bitflags! {
    /// Digital gamepad buttons. Bit positions match `XINPUT_GAMEPAD_*`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    #[repr(transparent)]
    pub struct GamepadButtons: u16 {
        const DPAD_UP = 0x0001;
        const DPAD_DOWN = 0x0002;
        const DPAD_LEFT = 0x0004;
        const DPAD_RIGHT = 0x0008;
        const START = 0x0010;
        const BACK = 0x0020;
        const LEFT_THUMB = 0x0040;
        const RIGHT_THUMB = 0x0080;
        const LEFT_SHOULDER = 0x0100;
        const RIGHT_SHOULDER = 0x0200;
        const A = 0x1000;
        const B = 0x2000;
        const X = 0x4000;
        const Y = 0x8000;
    }
}

/// A single gamepad button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadButton {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Start,
    Back,
    LeftThumb,
    RightThumb,
    LeftShoulder,
    RightShoulder,
    A,
    B,
    X,
    Y,
}

impl GamepadButton {
    pub const ALL: [GamepadButton; 14] = [
        GamepadButton::DPadUp,
        GamepadButton::DPadDown,
        GamepadButton::DPadLeft,
        GamepadButton::DPadRight,
        GamepadButton::Start,
        GamepadButton::Back,
        GamepadButton::LeftThumb,
        GamepadButton::RightThumb,
        GamepadButton::LeftShoulder,
        GamepadButton::RightShoulder,
        GamepadButton::A,
        GamepadButton::B,
        GamepadButton::X,
        GamepadButton::Y,
    ];

    pub fn flag(self) -> GamepadButtons {
        match self {
            GamepadButton::DPadUp => GamepadButtons::DPAD_UP,
            GamepadButton::DPadDown => GamepadButtons::DPAD_DOWN,
            GamepadButton::DPadLeft => GamepadButtons::DPAD_LEFT,
            GamepadButton::DPadRight => GamepadButtons::DPAD_RIGHT,
            GamepadButton::Start => GamepadButtons::START,
            GamepadButton::Back => GamepadButtons::BACK,
            GamepadButton::LeftThumb => GamepadButtons::LEFT_THUMB,
            GamepadButton::RightThumb => GamepadButtons::RIGHT_THUMB,
            GamepadButton::LeftShoulder => GamepadButtons::LEFT_SHOULDER,
            GamepadButton::RightShoulder => GamepadButtons::RIGHT_SHOULDER,
            GamepadButton::A => GamepadButtons::A,
            GamepadButton::B => GamepadButtons::B,
            GamepadButton::X => GamepadButtons::X,
            GamepadButton::Y => GamepadButtons::Y,
        }
    }
}

/// Converts a single-bit XInput button mask.
impl TryFrom<u16> for GamepadButton {
    type Error = InputError;

    fn try_from(mask: u16) -> Result<Self> {
        GamepadButton::ALL
            .into_iter()
            .find(|b| b.flag().bits() == mask)
            .ok_or_else(|| {
                InputError::invalid("gamepad button", format!("{mask:#06x} is not a single button bit"))
            })
    }
}

/// Raw XInput-style frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RawGamepad {
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

/// Byte length of [`RawGamepad`] in its packed little-endian form.
pub const RAW_GAMEPAD_LEN: usize = 12;

impl RawGamepad {
    /// Decode the packed `XINPUT_GAMEPAD` layout.
    pub fn from_bytes(b: &[u8; RAW_GAMEPAD_LEN]) -> Self {
        let i16_at = |i: usize| i16::from_le_bytes([b[i], b[i + 1]]);
        Self {
            buttons: u16::from_le_bytes([b[0], b[1]]),
            left_trigger: b[2],
            right_trigger: b[3],
            thumb_lx: i16_at(4),
            thumb_ly: i16_at(6),
            thumb_rx: i16_at(8),
            thumb_ry: i16_at(10),
        }
    }
}

/// One gamepad frame, raw (unfiltered) values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GamepadState {
    pub buttons: GamepadButtons,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub left_stick: Stick,
    pub right_stick: Stick,
}

impl From<RawGamepad> for GamepadState {
    /// Unknown button bits are dropped.
    fn from(raw: RawGamepad) -> Self {
        Self {
            buttons: GamepadButtons::from_bits_truncate(raw.buttons),
            left_trigger: raw.left_trigger,
            right_trigger: raw.right_trigger,
            left_stick: Stick::new(raw.thumb_lx, raw.thumb_ly),
            right_stick: Stick::new(raw.thumb_rx, raw.thumb_ry),
        }
    }
}

impl DeviceState for GamepadState {
    type Button = GamepadButton;

    fn neutral() -> Self {
        Self::default()
    }

    fn is_active(&self, button: GamepadButton) -> bool {
        self.buttons.contains(button.flag())
    }
}

/// Normalized stick position, both axes in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StickPosition {
    pub x: f32,
    pub y: f32,
}

impl StickPosition {
    pub const CENTER: StickPosition = StickPosition { x: 0.0, y: 0.0 };

    fn from_stick(stick: Stick) -> Self {
        Self {
            x: normalize_axis(stick.x),
            y: normalize_axis(stick.y),
        }
    }
}

/// Gamepad driver with dead-zone filtering.
#[derive(Debug)]
pub struct Gamepad<S: StateSource<State = GamepadState>> {
    device: InputDevice<S>,
    filter: DeadZoneFilter,
}

impl<S: StateSource<State = GamepadState>> Gamepad<S> {
    /// Wrap `source` with the default dead zones and prime it.
    pub fn new(source: S, index: DeviceIndex) -> Result<Self> {
        Self::with_filter(source, index, DeadZoneFilter::default())
    }

    pub fn with_filter(source: S, index: DeviceIndex, filter: DeadZoneFilter) -> Result<Self> {
        Ok(Self {
            device: InputDevice::new(source, index)?,
            filter,
        })
    }

    pub fn update(&mut self, time: Duration) -> Result<()> {
        self.device.update(time)
    }

    pub fn reset(&mut self, time: Duration) -> Result<()> {
        self.device.reset(time)
    }

    pub fn device(&self) -> &InputDevice<S> {
        &self.device
    }

    pub fn source(&self) -> &S {
        self.device.source()
    }

    pub fn source_mut(&mut self) -> &mut S {
        self.device.source_mut()
    }

    pub fn filter(&self) -> &DeadZoneFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: DeadZoneFilter) {
        self.filter = filter;
    }

    #[inline]
    pub fn current_state(&self) -> &GamepadState {
        self.device.current_state()
    }

    #[inline]
    pub fn previous_state(&self) -> &GamepadState {
        self.device.previous_state()
    }

    #[inline]
    pub fn current_state_time(&self) -> Duration {
        self.device.current_state_time()
    }

    #[inline]
    pub fn previous_state_time(&self) -> Duration {
        self.device.previous_state_time()
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.device.is_connected()
    }

    #[inline]
    pub fn index(&self) -> DeviceIndex {
        self.device.index()
    }

    pub fn is_pressed(&self, button: GamepadButton) -> bool {
        self.device.is_pressed(button)
    }

    pub fn has_just_been_pressed(&self, button: GamepadButton) -> bool {
        self.device.has_just_been_pressed(button)
    }

    pub fn has_just_been_released(&self, button: GamepadButton) -> bool {
        self.device.has_just_been_released(button)
    }

    /// Buttons down in the current frame (empty while disconnected).
    pub fn buttons(&self) -> GamepadButtons {
        if self.is_connected() {
            self.current_state().buttons
        } else {
            GamepadButtons::empty()
        }
    }

    /// Filtered left stick in raw units.
    pub fn left_stick_raw(&self) -> Stick {
        if !self.is_connected() {
            return Stick::CENTER;
        }
        self.filter.left_stick(self.current_state().left_stick)
    }

    /// Filtered right stick in raw units.
    pub fn right_stick_raw(&self) -> Stick {
        if !self.is_connected() {
            return Stick::CENTER;
        }
        self.filter.right_stick(self.current_state().right_stick)
    }

    pub fn left_stick(&self) -> StickPosition {
        StickPosition::from_stick(self.left_stick_raw())
    }

    pub fn right_stick(&self) -> StickPosition {
        StickPosition::from_stick(self.right_stick_raw())
    }

    /// Thresholded left trigger in `[0, 1]`.
    pub fn left_trigger(&self) -> f32 {
        self.trigger(self.current_state().left_trigger)
    }

    /// Thresholded right trigger in `[0, 1]`.
    pub fn right_trigger(&self) -> f32 {
        self.trigger(self.current_state().right_trigger)
    }

    fn trigger(&self, raw: u8) -> f32 {
        if !self.is_connected() {
            return 0.0;
        }
        self.filter.trigger(raw) as f32 / u8::MAX as f32
    }

    /// Owned view of the current frame with filtering applied.
    pub fn snapshot(&self) -> GamepadSnapshot {
        GamepadSnapshot {
            index: self.index().get(),
            connected: self.is_connected(),
            time: self.current_state_time(),
            buttons: self.buttons(),
            left_stick: self.left_stick(),
            right_stick: self.right_stick(),
            left_trigger: self.left_trigger(),
            right_trigger: self.right_trigger(),
        }
    }
}
