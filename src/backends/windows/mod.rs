//! Windows input backends.
//!
//! - **XInput** gamepad slots ([`xinput`])
//! - **`GetKeyboardState`** keyboard polling and lock indicators ([`keyboard`])
//! - **Raw Input** `WM_INPUT` parsing for event-driven keyboard/mouse ([`raw_input`])
//!
//! The Raw Input parser is exposed for hosts that own the Win32 message loop and
//! want to forward `WM_INPUT` packets into a [`KeyboardFeed`](crate::keyboard::KeyboardFeed)
//! or [`MouseFeed`](crate::mouse::MouseFeed).

pub mod keyboard;
pub mod raw_input;
pub mod xinput;

pub use keyboard::{refresh_from_os, OsKeyboard};
pub use xinput::{xinput_gamepads, XInputGamepad};
