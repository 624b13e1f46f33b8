//! Windows XInput gamepad source.
//!
//! XInput exposes Xbox-style controllers as numbered user slots. Each
//! [`XInputGamepad`] reads one slot with `XInputGetState` and hands the raw
//! `XINPUT_GAMEPAD` record to the driver unchanged; dead zones are applied by
//! [`Gamepad`](crate::gamepad::Gamepad), not here.
//!
//! # Error mapping
//! - `ERROR_SUCCESS` → the frame.
//! - `ERROR_DEVICE_NOT_CONNECTED` → [`SourceError::Disconnected`] (an empty slot).
//! - anything else → [`SourceError::Failed`] with the Win32 code.
//!
//! Slots past `XUSER_MAX_COUNT` (4 on current runtimes) always read as disconnected.

use crate::device::{DeviceIndex, StateSource};
use crate::error::SourceError;
use crate::gamepad::{GamepadState, RawGamepad};
use log::trace;

use windows_sys::Win32::Foundation::{ERROR_DEVICE_NOT_CONNECTED, ERROR_SUCCESS};
use windows_sys::Win32::UI::Input::XboxController::{XInputGetState, XINPUT_STATE, XUSER_MAX_COUNT};

/// One XInput user slot.
#[derive(Debug)]
pub struct XInputGamepad {
    slot: u32,
    name: String,
    /// `dwPacketNumber` of the last successful read.
    last_packet: Option<u32>,
}

impl XInputGamepad {
    pub fn new(index: DeviceIndex) -> Self {
        Self {
            slot: index.get() as u32,
            name: format!("xinput:{}", index),
            last_packet: None,
        }
    }

    /// Packet number of the last successful read (`None` while the slot is empty).
    ///
    /// XInput bumps it only when the controller state changed.
    pub fn last_packet(&self) -> Option<u32> {
        self.last_packet
    }
}

impl StateSource for XInputGamepad {
    type State = GamepadState;

    fn read_state(&mut self) -> Result<GamepadState, SourceError> {
        if self.slot >= XUSER_MAX_COUNT {
            return Err(SourceError::Disconnected);
        }

        // FFI struct: must be manually zeroed
        let mut state: XINPUT_STATE = unsafe { std::mem::zeroed() };
        let res = unsafe { XInputGetState(self.slot, &mut state) };

        match res {
            ERROR_SUCCESS => {
                let gp = state.Gamepad;
                if self.last_packet != Some(state.dwPacketNumber) {
                    trace!("[{}] packet {}", self.name, state.dwPacketNumber);
                }
                self.last_packet = Some(state.dwPacketNumber);
                Ok(RawGamepad {
                    buttons: gp.wButtons,
                    left_trigger: gp.bLeftTrigger,
                    right_trigger: gp.bRightTrigger,
                    thumb_lx: gp.sThumbLX,
                    thumb_ly: gp.sThumbLY,
                    thumb_rx: gp.sThumbRX,
                    thumb_ry: gp.sThumbRY,
                }
                .into())
            }
            ERROR_DEVICE_NOT_CONNECTED => {
                self.last_packet = None;
                Err(SourceError::Disconnected)
            }
            code => Err(SourceError::Failed { code }),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Sources for every XInput user slot (`0..XUSER_MAX_COUNT`).
pub fn xinput_gamepads() -> Vec<XInputGamepad> {
    (0..XUSER_MAX_COUNT as i32)
        .filter_map(|i| DeviceIndex::new(i).ok())
        .map(XInputGamepad::new)
        .collect()
}
