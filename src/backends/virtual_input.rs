//! In-process sources driven by code instead of hardware.
//!
//! Useful for tests, replays and headless runs. A [`VirtualGamepad`] holds the
//! frame the next read will return; it can also pretend to be unplugged or to
//! fail a read.

use crate::deadzone::Stick;
use crate::device::StateSource;
use crate::error::SourceError;
use crate::gamepad::{GamepadButton, GamepadState, RawGamepad};

/// Scriptable gamepad source.
#[derive(Debug, Clone)]
pub struct VirtualGamepad {
    name: String,
    frame: RawGamepad,
    connected: bool,
    fail_next: Option<u32>,
}

impl Default for VirtualGamepad {
    fn default() -> Self {
        Self::named("virtual gamepad")
    }
}

impl VirtualGamepad {
    /// A connected gamepad at rest.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            frame: RawGamepad::default(),
            connected: true,
            fail_next: None,
        }
    }

    /// Replace the whole frame.
    pub fn feed(&mut self, frame: RawGamepad) {
        self.frame = frame;
    }

    pub fn frame(&self) -> &RawGamepad {
        &self.frame
    }

    pub fn press(&mut self, button: GamepadButton) {
        self.frame.buttons |= button.flag().bits();
    }

    pub fn release(&mut self, button: GamepadButton) {
        self.frame.buttons &= !button.flag().bits();
    }

    pub fn set_left_stick(&mut self, stick: Stick) {
        self.frame.thumb_lx = stick.x;
        self.frame.thumb_ly = stick.y;
    }

    pub fn set_right_stick(&mut self, stick: Stick) {
        self.frame.thumb_rx = stick.x;
        self.frame.thumb_ry = stick.y;
    }

    pub fn set_triggers(&mut self, left: u8, right: u8) {
        self.frame.left_trigger = left;
        self.frame.right_trigger = right;
    }

    /// Unplug: reads report [`SourceError::Disconnected`] until [`connect`](Self::connect).
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn connect(&mut self) {
        self.connected = true;
    }

    /// Make the next read fail with `code` (once).
    pub fn fail_next(&mut self, code: u32) {
        self.fail_next = Some(code);
    }
}

impl StateSource for VirtualGamepad {
    type State = GamepadState;

    fn read_state(&mut self) -> Result<GamepadState, SourceError> {
        if let Some(code) = self.fail_next.take() {
            return Err(SourceError::Failed { code });
        }
        if !self.connected {
            return Err(SourceError::Disconnected);
        }
        Ok(self.frame.into())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// `count` connected virtual gamepads named `virtual:0`, `virtual:1`, ...
pub fn create_virtual_gamepads(count: usize) -> Vec<VirtualGamepad> {
    (0..count)
        .map(|i| VirtualGamepad::named(&format!("virtual:{i}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_is_one_shot() {
        let mut pad = VirtualGamepad::new();
        pad.fail_next(7);
        assert_eq!(pad.read_state(), Err(SourceError::Failed { code: 7 }));
        assert!(pad.read_state().is_ok());
    }

    #[test]
    fn press_and_release_edit_the_mask() {
        let mut pad = VirtualGamepad::new();
        pad.press(GamepadButton::A);
        pad.press(GamepadButton::Y);
        pad.release(GamepadButton::A);
        assert_eq!(pad.frame().buttons, 0x8000);
    }

    #[test]
    fn names_are_numbered() {
        let pads = create_virtual_gamepads(3);
        assert_eq!(pads[2].name(), "virtual:2");
    }
}
