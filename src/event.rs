//! Raw incremental input records.
//!
//! Event-driven sources (Windows Raw Input keyboard and mouse) deliver a stream of
//! small deltas between two frames. Hosts push them into a
//! [`KeyboardFeed`](crate::keyboard::KeyboardFeed) or
//! [`MouseFeed`](crate::mouse::MouseFeed); the next `update` merges and clears them.
//!
//! ## Units
//! - Mouse motion is in **raw OS counts** (not pixels, no acceleration).
//! - Wheel deltas are in **raw WHEEL_DELTA units** (typically ±120 per notch).
//! - Keys are virtual-key codes (layout-dependent, one byte).

use crate::keyboard::Key;
use bitflags::bitflags;

/// A single key transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    /// `true` for key-down (make), `false` for key-up (break).
    pub down: bool,
}

impl KeyEvent {
    #[inline]
    pub const fn down(key: Key) -> Self {
        Self { key, down: true }
    }

    #[inline]
    pub const fn up(key: Key) -> Self {
        Self { key, down: false }
    }
}

bitflags! {
    /// Button transition flags carried by a Raw Input mouse packet (`usButtonFlags`).
    ///
    /// Bit positions match `RI_MOUSE_*` so packets can be converted with
    /// [`RawMouseFlags::from_bits_truncate`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    #[repr(transparent)]
    pub struct RawMouseFlags: u16 {
        const LEFT_DOWN = 0x0001;
        const LEFT_UP = 0x0002;
        const RIGHT_DOWN = 0x0004;
        const RIGHT_UP = 0x0008;
        const MIDDLE_DOWN = 0x0010;
        const MIDDLE_UP = 0x0020;
        const X1_DOWN = 0x0040;
        const X1_UP = 0x0080;
        const X2_DOWN = 0x0100;
        const X2_UP = 0x0200;
        /// `wheel` carries a vertical wheel delta.
        const WHEEL = 0x0400;
        /// `hwheel` carries a horizontal wheel delta.
        const HWHEEL = 0x0800;
    }
}

/// One relative mouse packet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseDelta {
    /// Relative X motion (raw counts).
    pub dx: i32,
    /// Relative Y motion (raw counts).
    pub dy: i32,
    /// Button transitions in this packet.
    pub flags: RawMouseFlags,
    /// Vertical wheel delta (only meaningful with [`RawMouseFlags::WHEEL`]).
    pub wheel: i16,
    /// Horizontal wheel delta (only meaningful with [`RawMouseFlags::HWHEEL`]).
    pub hwheel: i16,
}

impl MouseDelta {
    /// Pure motion, no buttons or wheel.
    pub const fn motion(dx: i32, dy: i32) -> Self {
        Self {
            dx,
            dy,
            flags: RawMouseFlags::empty(),
            wheel: 0,
            hwheel: 0,
        }
    }

    /// Button transitions only.
    pub const fn buttons(flags: RawMouseFlags) -> Self {
        Self {
            dx: 0,
            dy: 0,
            flags,
            wheel: 0,
            hwheel: 0,
        }
    }

    /// A vertical wheel turn.
    pub const fn wheel(delta: i16) -> Self {
        Self {
            dx: 0,
            dy: 0,
            flags: RawMouseFlags::WHEEL,
            wheel: delta,
            hwheel: 0,
        }
    }
}
