//! Windows Raw Input parsing (keyboard + mouse).
//!
//! This module only turns `WM_INPUT` payloads into [`KeyEvent`]s and
//! [`MouseDelta`]s. Device registration and the message loop belong to the
//! host; it forwards each packet into a [`KeyboardFeed`] / [`MouseFeed`] and the
//! next driver update picks them up.
//!
//! ## Conventions
//! - Keys are reported by virtual-key code (`RAWKEYBOARD::VKey`).
//! - Mouse deltas are in **raw OS units** (counts). Absolute-position packets
//!   (pen tablets, remote desktop) carry no relative motion and are reported
//!   with `dx = dy = 0`.
//! - Wheel deltas are in **raw WHEEL_DELTA units** (typically ±120 per notch).

use crate::event::{KeyEvent, MouseDelta, RawMouseFlags};
use crate::keyboard::{Key, KeyboardFeed};
use crate::mouse::MouseFeed;
use core::ffi::c_void;
use log::trace;
use windows_sys::Win32::Foundation::HANDLE;
use windows_sys::Win32::UI::Input::*;

/// One parsed `WM_INPUT` packet.
#[derive(Clone, Copy, Debug)]
pub enum RawInputPacket {
    Keyboard { device: HANDLE, event: KeyEvent },
    Mouse { device: HANDLE, delta: MouseDelta },
}

impl RawInputPacket {
    /// Forward the packet into the matching accumulator.
    pub fn apply(&self, keyboard: &mut KeyboardFeed, mouse: &mut MouseFeed) {
        match *self {
            RawInputPacket::Keyboard { event, .. } => keyboard.push(event),
            RawInputPacket::Mouse { delta, .. } => mouse.push(delta),
        }
    }
}

// Local constants (avoid relying on module exports that vary by windows-sys version)
const RI_KEY_BREAK: u16 = 0x0001;
const MOUSE_MOVE_ABSOLUTE: u16 = 0x0001;
/// Sent for the E1 prefix of Pause and a few other synthetic packets.
const VK_FAKE: u16 = 0x00FF;

/// Fetch and parse the `WM_INPUT` payload behind `lparam`.
///
/// Returns `None` for packets this crate does not model and when the OS call
/// fails.
pub fn read_wm_input(lparam: isize) -> Option<RawInputPacket> {
    let handle = lparam as HRAWINPUT;
    let header_size = core::mem::size_of::<RAWINPUTHEADER>() as u32;

    let mut size = 0u32;
    // SAFETY: a null buffer only queries the payload size.
    let probed =
        unsafe { GetRawInputData(handle, RID_INPUT, core::ptr::null_mut(), &mut size, header_size) };
    if probed == u32::MAX || size == 0 {
        return None;
    }

    let mut payload = vec![0u8; size as usize];
    // SAFETY: `payload` is exactly `size` bytes long.
    let copied = unsafe {
        GetRawInputData(
            handle,
            RID_INPUT,
            payload.as_mut_ptr().cast::<c_void>(),
            &mut size,
            header_size,
        )
    };
    if copied == u32::MAX {
        return None;
    }
    payload.truncate(copied as usize);
    read_raw_input_bytes(&payload)
}

/// Parse a raw `RID_INPUT` payload (bytes returned by `GetRawInputData`).
///
/// Safe to call later as long as the bytes were copied during `WM_INPUT`.
pub fn read_raw_input_bytes(buf: &[u8]) -> Option<RawInputPacket> {
    let hdr_sz = core::mem::size_of::<RAWINPUTHEADER>();
    if buf.len() < hdr_sz {
        return None;
    }

    unsafe {
        // RAWINPUT payload is variable-sized; read the header first.
        let hdr: RAWINPUTHEADER = core::ptr::read_unaligned(buf.as_ptr() as *const RAWINPUTHEADER);
        let data_ptr = buf.as_ptr().add(hdr_sz);

        match hdr.dwType {
            RIM_TYPEKEYBOARD => {
                if buf.len() < hdr_sz + core::mem::size_of::<RAWKEYBOARD>() {
                    return None;
                }
                let kbd: RAWKEYBOARD = core::ptr::read_unaligned(data_ptr as *const RAWKEYBOARD);
                let vkey = kbd.VKey as u16;
                if vkey == 0 || vkey >= VK_FAKE {
                    return None;
                }
                let down = (kbd.Flags as u16 & RI_KEY_BREAK) == 0;
                trace!("[RAW/KBD] vkey={vkey:#04x} down={down}");

                Some(RawInputPacket::Keyboard {
                    device: hdr.hDevice,
                    event: KeyEvent {
                        key: Key(vkey as u8),
                        down,
                    },
                })
            }

            RIM_TYPEMOUSE => {
                if buf.len() < hdr_sz + core::mem::size_of::<RAWMOUSE>() {
                    return None;
                }
                let m: RAWMOUSE = core::ptr::read_unaligned(data_ptr as *const RAWMOUSE);

                let flags = RawMouseFlags::from_bits_truncate(m.Anonymous.Anonymous.usButtonFlags);
                let data = m.Anonymous.Anonymous.usButtonData as i16;
                let relative = (m.usFlags as u16 & MOUSE_MOVE_ABSOLUTE) == 0;
                let (dx, dy) = if relative { (m.lLastX, m.lLastY) } else { (0, 0) };
                trace!("[RAW/MOUSE] dx={dx} dy={dy} flags={flags:?} data={data}");

                Some(RawInputPacket::Mouse {
                    device: hdr.hDevice,
                    delta: MouseDelta {
                        dx,
                        dy,
                        flags,
                        wheel: if flags.contains(RawMouseFlags::WHEEL) { data } else { 0 },
                        hwheel: if flags.contains(RawMouseFlags::HWHEEL) { data } else { 0 },
                    },
                })
            }

            _ => None,
        }
    }
}
