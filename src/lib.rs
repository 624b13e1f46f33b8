//! padstate: double-buffered input device state for real-time applications.
//!
//! Once per frame the host calls `update(time)` on each device. The driver reads
//! one complete state from its source, shifts the current state into the
//! previous slot and stores the new one. Between updates the application
//! queries freely:
//! - `is_pressed`, `has_just_been_pressed`, `has_just_been_released`
//! - gamepad analog values with dead zones applied
//! - `current_state` / `previous_state` and their timestamps
//!
//! Keyboard, mouse and gamepad are the same generic [`InputDevice`] with
//! different [`DeviceState`] payloads; see [`device`] for the protocol.
//!
//! Logging goes through the `log` facade; install any logger to see connect /
//! disconnect and failure records.

pub mod backends;
pub mod buffer;
pub mod config;
pub mod deadzone;
pub mod device;
pub mod edge;
pub mod error;
pub mod event;
pub mod gamepad;
pub mod indicators;
pub mod keyboard;
pub mod manager;
pub mod mouse;
pub mod snapshot;

pub use buffer::StateBuffer;
pub use config::{GamepadConfig, InputConfig};
pub use deadzone::{DeadZoneFilter, DeadZoneMode, Stick};
pub use device::{DeviceIndex, DeviceState, InputDevice, StateSource, MAX_DEVICES};
pub use error::{InputError, Result, SourceError};
pub use event::{KeyEvent, MouseDelta, RawMouseFlags};
pub use gamepad::{Gamepad, GamepadButton, GamepadButtons, GamepadState, RawGamepad, StickPosition};
pub use indicators::LockIndicators;
pub use keyboard::{Key, Keyboard, KeyboardFeed, KeyboardState, RawKeyboardFeed};
pub use manager::{GamepadManager, MAX_GAMEPADS};
pub use mouse::{Delta, Mouse, MouseButton, MouseButtons, MouseFeed, MouseState};
pub use snapshot::GamepadSnapshot;
