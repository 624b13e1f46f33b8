//! Per-frame snapshot of a gamepad.
//!
//! [`GamepadSnapshot`] is an **owned**, read-only view of one gamepad at the
//! time of its last update, with dead zones already applied. It is produced by
//! [`Gamepad::snapshot`](crate::gamepad::Gamepad::snapshot) and is cheap to copy
//! for fan-out to other systems (UI, replays, network).
//!
//! # Semantics
//! - A snapshot does **not** poll. It reflects the driver's current buffer slot.
//! - While disconnected every analog value is zero and `buttons` is empty.
//! - Serializes with serde; `buttons` uses the bitflags text form (`"A | START"`).

use crate::error::Result;
use crate::gamepad::{GamepadButtons, StickPosition};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Owned snapshot of one gamepad frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadSnapshot {
    /// Slot index (`0..8`).
    pub index: u8,
    pub connected: bool,
    /// Time stamp of the frame.
    pub time: Duration,
    pub buttons: GamepadButtons,
    pub left_stick: StickPosition,
    pub right_stick: StickPosition,
    /// `[0, 1]`
    pub left_trigger: f32,
    /// `[0, 1]`
    pub right_trigger: f32,
}

impl GamepadSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
