//! Windows keyboard source backed by `GetKeyboardState`.
//!
//! `GetKeyboardState` reports the key state as seen by the calling thread's
//! message queue, so this source must be read from the thread that pumps the
//! window messages.

use crate::device::StateSource;
use crate::error::{InputError, Result, SourceError};
use crate::indicators::{self, LockIndicators};
use crate::keyboard::{KeyboardState, RAW_KEYBOARD_LEN};

use windows_sys::Win32::Foundation::GetLastError;
use windows_sys::Win32::UI::Input::KeyboardAndMouse::GetKeyboardState;

/// Polls the whole 256-key state once per read.
#[derive(Debug, Clone)]
pub struct OsKeyboard {
    raw: [u8; RAW_KEYBOARD_LEN],
}

impl Default for OsKeyboard {
    fn default() -> Self {
        Self {
            raw: [0; RAW_KEYBOARD_LEN],
        }
    }
}

impl OsKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The buffer returned by the last successful read (toggle bits included).
    pub fn latest_raw(&self) -> &[u8; RAW_KEYBOARD_LEN] {
        &self.raw
    }
}

fn read_os_buffer(raw: &mut [u8; RAW_KEYBOARD_LEN]) -> Result<(), SourceError> {
    let ok = unsafe { GetKeyboardState(raw.as_mut_ptr()) };
    if ok == 0 {
        let code = unsafe { GetLastError() };
        return Err(SourceError::Failed { code });
    }
    Ok(())
}

impl StateSource for OsKeyboard {
    type State = KeyboardState;

    fn read_state(&mut self) -> Result<KeyboardState, SourceError> {
        let mut raw = [0u8; RAW_KEYBOARD_LEN];
        read_os_buffer(&mut raw)?;
        self.raw = raw;
        Ok(KeyboardState::from_raw(&self.raw))
    }

    fn name(&self) -> &str {
        "keyboard"
    }
}

/// Query the OS and store the result as the process-wide last known indicators.
pub fn refresh_from_os() -> Result<LockIndicators> {
    let mut raw = [0u8; RAW_KEYBOARD_LEN];
    read_os_buffer(&mut raw).map_err(|e| match e {
        SourceError::Failed { code } => InputError::Hardware { code },
        SourceError::Disconnected => InputError::Hardware { code: 0 },
    })?;
    Ok(indicators::refresh(&raw))
}
