//! Analog conditioning for gamepad sticks and triggers.
//!
//! Raw stick axes are signed 16-bit (`-32768..=32767`), triggers are unsigned
//! 8-bit (`0..=255`). The functions here remove the noise band around the rest
//! position and rescale what is left so the output still spans the full range.
//!
//! The default thresholds match the values every XInput title has been tuned
//! against and must not drift:
//! - left stick: [`LEFT_STICK_DEAD_ZONE`] = 7849
//! - right stick: [`RIGHT_STICK_DEAD_ZONE`] = 8689
//! - triggers: [`TRIGGER_THRESHOLD`] = 30
//!
//! # Example
//! ```
//! use padstate::deadzone::{apply_stick_dead_zone, DeadZoneMode, Stick, LEFT_STICK_DEAD_ZONE};
//!
//! let resting = Stick::new(3000, -2500);
//! let out = apply_stick_dead_zone(resting, LEFT_STICK_DEAD_ZONE, DeadZoneMode::Circular).unwrap();
//! assert_eq!(out, Stick::CENTER);
//! ```

use crate::error::{InputError, Result};
use serde::{Deserialize, Serialize};

/// Default left thumbstick dead zone (raw units).
pub const LEFT_STICK_DEAD_ZONE: i16 = 7849;
/// Default right thumbstick dead zone (raw units).
pub const RIGHT_STICK_DEAD_ZONE: i16 = 8689;
/// Default trigger activation threshold (raw units).
pub const TRIGGER_THRESHOLD: u8 = 30;

const AXIS_POS_MAX: i32 = i16::MAX as i32; // 32767
const AXIS_NEG_MAX: i32 = -(i16::MIN as i32); // 32768

/// Raw stick position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stick {
    pub x: i16,
    pub y: i16,
}

impl Stick {
    pub const CENTER: Stick = Stick { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Both axes mapped into `[-1, 1]` with [`normalize_axis`].
    #[inline]
    pub fn normalized(self) -> (f32, f32) {
        (normalize_axis(self.x), normalize_axis(self.y))
    }
}

/// Stick dead-zone policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadZoneMode {
    /// Passthrough.
    None,
    /// Each axis is filtered independently.
    Linear,
    /// The (x, y) vector is filtered by magnitude; direction is preserved.
    #[default]
    Circular,
}

/// Map a raw axis into `[-1, 1]`.
///
/// Positive values divide by 32767 and negative values by 32768 so both
/// extremes land exactly on ±1.0.
#[inline]
pub fn normalize_axis(raw: i16) -> f32 {
    if raw >= 0 {
        raw as f32 / AXIS_POS_MAX as f32
    } else {
        raw as f32 / AXIS_NEG_MAX as f32
    }
}

/// Zero a trigger at or below `threshold` and stretch the rest back to `0..=255`.
///
/// `threshold` must be below 255.
pub fn apply_trigger_dead_zone(raw: u8, threshold: u8) -> Result<u8> {
    validate_trigger_threshold(threshold)?;
    Ok(trigger_dead_zone(raw, threshold))
}

/// Apply a stick dead zone under `mode`.
///
/// `dead_zone` must be in `0..32767`.
pub fn apply_stick_dead_zone(stick: Stick, dead_zone: i16, mode: DeadZoneMode) -> Result<Stick> {
    validate_stick_dead_zone(dead_zone)?;
    Ok(stick_dead_zone(stick, dead_zone, mode))
}

pub(crate) fn validate_trigger_threshold(threshold: u8) -> Result<()> {
    if threshold == u8::MAX {
        return Err(InputError::invalid(
            "trigger threshold",
            "must be below 255 (nothing left to rescale)",
        ));
    }
    Ok(())
}

pub(crate) fn validate_stick_dead_zone(dead_zone: i16) -> Result<()> {
    if !(0..i16::MAX).contains(&dead_zone) {
        return Err(InputError::invalid(
            "stick dead zone",
            format!("{dead_zone} is outside 0..32767"),
        ));
    }
    Ok(())
}

fn trigger_dead_zone(raw: u8, threshold: u8) -> u8 {
    if raw <= threshold {
        return 0;
    }
    let span = (u8::MAX - threshold) as u32;
    ((raw - threshold) as u32 * u8::MAX as u32 / span) as u8
}

fn stick_dead_zone(stick: Stick, dead_zone: i16, mode: DeadZoneMode) -> Stick {
    match mode {
        DeadZoneMode::None => stick,
        DeadZoneMode::Linear => Stick {
            x: axis_dead_zone(stick.x, dead_zone),
            y: axis_dead_zone(stick.y, dead_zone),
        },
        DeadZoneMode::Circular => radial_dead_zone(stick, dead_zone),
    }
}

fn axis_dead_zone(value: i16, dead_zone: i16) -> i16 {
    let v = value as i32;
    let dz = dead_zone as i32;
    if v.abs() <= dz {
        0
    } else if v > 0 {
        ((v - dz) * AXIS_POS_MAX / (AXIS_POS_MAX - dz)) as i16
    } else {
        ((v + dz) * AXIS_NEG_MAX / (AXIS_NEG_MAX - dz)) as i16
    }
}

fn radial_dead_zone(stick: Stick, dead_zone: i16) -> Stick {
    let x = stick.x as f64;
    let y = stick.y as f64;
    let dz = dead_zone as f64;
    let magnitude = (x * x + y * y).sqrt();
    if magnitude <= dz {
        return Stick::CENTER;
    }

    let max = AXIS_POS_MAX as f64;
    let scale = ((magnitude - dz) / (max - dz)) / magnitude * max;
    Stick {
        x: clamp_axis(x * scale),
        y: clamp_axis(y * scale),
    }
}

#[inline]
fn clamp_axis(v: f64) -> i16 {
    v.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Validated dead-zone settings for one gamepad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeadZoneFilter {
    left_stick: i16,
    right_stick: i16,
    trigger_threshold: u8,
    mode: DeadZoneMode,
}

impl Default for DeadZoneFilter {
    fn default() -> Self {
        Self {
            left_stick: LEFT_STICK_DEAD_ZONE,
            right_stick: RIGHT_STICK_DEAD_ZONE,
            trigger_threshold: TRIGGER_THRESHOLD,
            mode: DeadZoneMode::default(),
        }
    }
}

impl DeadZoneFilter {
    pub fn new(
        left_stick: i16,
        right_stick: i16,
        trigger_threshold: u8,
        mode: DeadZoneMode,
    ) -> Result<Self> {
        validate_stick_dead_zone(left_stick)?;
        validate_stick_dead_zone(right_stick)?;
        validate_trigger_threshold(trigger_threshold)?;
        Ok(Self {
            left_stick,
            right_stick,
            trigger_threshold,
            mode,
        })
    }

    /// Same thresholds, different stick policy.
    pub fn with_mode(self, mode: DeadZoneMode) -> Self {
        Self { mode, ..self }
    }

    pub fn mode(&self) -> DeadZoneMode {
        self.mode
    }

    pub fn left_stick_dead_zone(&self) -> i16 {
        self.left_stick
    }

    pub fn right_stick_dead_zone(&self) -> i16 {
        self.right_stick
    }

    pub fn trigger_threshold(&self) -> u8 {
        self.trigger_threshold
    }

    pub fn left_stick(&self, stick: Stick) -> Stick {
        stick_dead_zone(stick, self.left_stick, self.mode)
    }

    pub fn right_stick(&self, stick: Stick) -> Stick {
        stick_dead_zone(stick, self.right_stick, self.mode)
    }

    pub fn trigger(&self, raw: u8) -> u8 {
        trigger_dead_zone(raw, self.trigger_threshold)
    }
}
