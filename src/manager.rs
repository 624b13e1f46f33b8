use crate::deadzone::DeadZoneFilter;
use crate::device::{DeviceIndex, StateSource, MAX_DEVICES};
use crate::error::{InputError, Result};
use crate::gamepad::{Gamepad, GamepadState};
use log::{debug, warn};
use std::time::Duration;

/// Number of gamepad slots a manager can hold.
pub const MAX_GAMEPADS: usize = MAX_DEVICES;

/// Fixed set of gamepad slots, indexed `0..len()`.
///
/// Older XInput runtimes only expose slots 0..=3; the remaining slots simply
/// stay disconnected.
pub struct GamepadManager<S: StateSource<State = GamepadState>> {
    pads: Vec<Gamepad<S>>,
}

impl<S: StateSource<State = GamepadState>> GamepadManager<S> {
    /// One slot per source, in order, with default dead zones.
    pub fn new(sources: impl IntoIterator<Item = S>) -> Result<Self> {
        Self::with_filter(sources, DeadZoneFilter::default())
    }

    /// One slot per source, in order, all sharing `filter`.
    pub fn with_filter(
        sources: impl IntoIterator<Item = S>,
        filter: DeadZoneFilter,
    ) -> Result<Self> {
        let mut pads = Vec::new();
        for (i, source) in sources.into_iter().enumerate() {
            let index = i32::try_from(i).unwrap_or(i32::MAX);
            pads.push(Gamepad::with_filter(source, DeviceIndex::new(index)?, filter)?);
        }
        debug!("gamepad manager: {} slot(s)", pads.len());
        Ok(Self { pads })
    }

    /// The gamepad in slot `index`.
    pub fn get(&self, index: usize) -> Result<&Gamepad<S>> {
        let len = self.pads.len();
        self.pads.get(index).ok_or_else(|| slot_error(index, len))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Gamepad<S>> {
        let len = self.pads.len();
        self.pads.get_mut(index).ok_or_else(|| slot_error(index, len))
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gamepad<S>> {
        self.pads.iter()
    }

    /// Slots that reported a connected device on their last read.
    pub fn connected(&self) -> impl Iterator<Item = &Gamepad<S>> {
        self.pads.iter().filter(|p| p.is_connected())
    }

    /// Apply `filter` to every slot.
    pub fn set_filter(&mut self, filter: DeadZoneFilter) {
        for pad in &mut self.pads {
            pad.set_filter(filter);
        }
    }

    /// Update every slot in index order.
    ///
    /// A failing slot does not stop the others. The first failure (if any) is
    /// returned after all slots were visited.
    pub fn update_all(&mut self, time: Duration) -> Result<()> {
        let mut first_err = None;
        for pad in &mut self.pads {
            if let Err(e) = pad.update(time) {
                warn!("gamepad slot {} update failed: {e}", pad.index());
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Re-prime every slot (no edges on the next update).
    pub fn reset_all(&mut self, time: Duration) -> Result<()> {
        let mut first_err = None;
        for pad in &mut self.pads {
            if let Err(e) = pad.reset(time) {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

fn slot_error(index: usize, len: usize) -> InputError {
    InputError::invalid("gamepad slot", format!("{index} is outside 0..{len}"))
}

impl<S: StateSource<State = GamepadState>> std::ops::Index<usize> for GamepadManager<S> {
    type Output = Gamepad<S>;

    /// Panics on an out-of-range slot; use [`GamepadManager::get`] to get an error instead.
    fn index(&self, index: usize) -> &Gamepad<S> {
        &self.pads[index]
    }
}
