//! Input backends for `padstate`.
//!
//! Implementations of [`StateSource`](crate::device::StateSource) for concrete
//! input sources.
//!
//! # Feature flags
//! - **`native`** (default) enables the Windows backend (XInput, `GetKeyboardState`,
//!   Raw Input). It has no effect on other targets.
//!
//! [`virtual_input`] is always available.

use crate::device::StateSource;
use crate::gamepad::GamepadState;

pub mod virtual_input;

#[cfg(all(feature = "native", target_os = "windows"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "native", target_os = "windows"))))]
pub mod windows;

/// A type-erased gamepad source.
pub type BoxedGamepadSource = Box<dyn StateSource<State = GamepadState>>;

/// Gamepad sources for every slot the enabled native backend exposes.
///
/// On Windows with `native` this is one source per XInput user slot; elsewhere it
/// is empty.
pub fn probe_gamepads() -> Vec<BoxedGamepadSource> {
    #[allow(unused_mut)]
    let mut out: Vec<BoxedGamepadSource> = Vec::new();

    #[cfg(all(feature = "native", target_os = "windows"))]
    {
        out.extend(
            windows::xinput_gamepads()
                .into_iter()
                .map(|pad| Box::new(pad) as BoxedGamepadSource),
        );
    }

    out
}
