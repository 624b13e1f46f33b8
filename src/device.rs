//! Generic device driver.
//!
//! Every concrete device (keyboard, mouse, gamepad) is the same machine:
//! a [`StateSource`] that can read one complete [`DeviceState`] from the
//! hardware, wrapped by [`InputDevice`] which keeps the last two states in a
//! [`StateBuffer`] and answers press/release queries from them.
//!
//! ```text
//! new() ──prime──▶ Ready ──update(t)──▶ Ready
//!                    ▲                    │
//!                    └──────reset(t)──────┘
//! ```
//!
//! Connection is a flag, not a state: a read reporting
//! [`SourceError::Disconnected`] substitutes [`DeviceState::neutral`] and turns
//! every edge query into `false` until a read succeeds again.
//!
//! # Threading
//! The driver is meant to be owned by the input-polling thread. Nothing here is
//! synchronized; wrap it yourself if you query from another thread.

use crate::buffer::StateBuffer;
use crate::edge;
use crate::error::{InputError, Result, SourceError};
use log::{debug, warn};
use std::fmt;
use std::time::Duration;

/// Largest number of devices of one kind (e.g. XInput user slots).
pub const MAX_DEVICES: usize = 8;

/// A complete, immutable snapshot of one device.
pub trait DeviceState: Clone + PartialEq + fmt::Debug {
    /// Identifier of a digital input on this device.
    type Button: Copy + Eq + fmt::Debug;

    /// The all-released, centered state reported while disconnected.
    fn neutral() -> Self;

    /// `true` if `button` is down in this state.
    fn is_active(&self, button: Self::Button) -> bool;
}

/// Capability to read the current hardware state of one device.
///
/// Event-driven sources (Raw Input keyboard/mouse) merge incoming deltas into an
/// accumulator and hand it out (clearing the deltas) from `read_state`.
pub trait StateSource {
    type State: DeviceState;

    fn read_state(&mut self) -> Result<Self::State, SourceError>;

    /// Human-readable label used in log output.
    fn name(&self) -> &str {
        "input device"
    }
}

impl<T: StateSource + ?Sized> StateSource for Box<T> {
    type State = T::State;

    fn read_state(&mut self) -> Result<Self::State, SourceError> {
        (**self).read_state()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Slot number of a device among devices of the same kind (`0..8`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceIndex(u8);

impl DeviceIndex {
    pub const FIRST: DeviceIndex = DeviceIndex(0);

    /// Validate a slot number. Negative values and values `>= 8` are rejected.
    pub fn new(index: i32) -> Result<Self> {
        if index < 0 || index as usize >= MAX_DEVICES {
            return Err(InputError::invalid(
                "device index",
                format!("{index} is outside 0..{MAX_DEVICES}"),
            ));
        }
        Ok(DeviceIndex(index as u8))
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<i32> for DeviceIndex {
    type Error = InputError;

    fn try_from(index: i32) -> Result<Self> {
        DeviceIndex::new(index)
    }
}

impl fmt::Display for DeviceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Double-buffered driver around a [`StateSource`].
pub struct InputDevice<S: StateSource> {
    source: S,
    index: DeviceIndex,
    buffer: StateBuffer<S::State>,
    connected: bool,
}

impl<S: StateSource> InputDevice<S> {
    /// Wrap `source` and prime the buffer with one read.
    ///
    /// A disconnected source is fine (the device starts neutral and
    /// disconnected). A transient hardware failure is returned.
    pub fn new(source: S, index: DeviceIndex) -> Result<Self> {
        let mut device = Self {
            source,
            index,
            buffer: StateBuffer::new(S::State::neutral()),
            connected: false,
        };
        device.reset(Duration::ZERO)?;
        Ok(device)
    }

    /// Re-prime the buffer from a fresh read so that current == previous.
    ///
    /// Used after a reconnect to avoid a spurious edge. Both timestamps become
    /// `time`. On a transient failure the buffer is left as it was.
    pub fn reset(&mut self, time: Duration) -> Result<()> {
        let state = self.read()?;
        self.buffer.initialize_at(state, time);
        debug!(
            "[{}#{}] reset at {:?} (connected={})",
            self.source.name(),
            self.index,
            time,
            self.connected
        );
        Ok(())
    }

    /// Read a new state and rotate it in.
    ///
    /// Calling twice with the same `time` is allowed and duplicates the state.
    /// A `time` earlier than the current stamp is rejected. On a transient
    /// failure the buffer is untouched and the error is returned; the next
    /// successful call recovers.
    ///
    /// The first read after a reconnect re-primes the buffer like [`reset`],
    /// so buttons held across a replug are not reported as new presses.
    ///
    /// [`reset`]: InputDevice::reset
    pub fn update(&mut self, time: Duration) -> Result<()> {
        let now = self.buffer.current_time();
        if time < now {
            return Err(InputError::invalid(
                "update time",
                format!("{time:?} is earlier than the current state time {now:?}"),
            ));
        }
        let was_connected = self.connected;
        let state = self.read()?;
        if self.connected && !was_connected {
            debug!("[{}#{}] re-primed on reconnect", self.source.name(), self.index);
            self.buffer.initialize_at(state, time);
        } else {
            self.buffer.rotate(state, time);
        }
        Ok(())
    }

    fn read(&mut self) -> Result<S::State> {
        match self.source.read_state() {
            Ok(state) => {
                self.set_connected(true);
                Ok(state)
            }
            Err(SourceError::Disconnected) => {
                self.set_connected(false);
                Ok(S::State::neutral())
            }
            Err(SourceError::Failed { code }) => {
                warn!(
                    "[{}#{}] read failed (code {code}), keeping last state",
                    self.source.name(),
                    self.index
                );
                Err(InputError::Hardware { code })
            }
        }
    }

    fn set_connected(&mut self, connected: bool) {
        if self.connected != connected {
            debug!(
                "[{}#{}] {}",
                self.source.name(),
                self.index,
                if connected { "connected" } else { "disconnected" }
            );
            self.connected = connected;
        }
    }

    #[inline]
    pub fn current_state(&self) -> &S::State {
        self.buffer.current()
    }

    #[inline]
    pub fn previous_state(&self) -> &S::State {
        self.buffer.previous()
    }

    #[inline]
    pub fn current_state_time(&self) -> Duration {
        self.buffer.current_time()
    }

    #[inline]
    pub fn previous_state_time(&self) -> Duration {
        self.buffer.previous_time()
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    #[inline]
    pub fn index(&self) -> DeviceIndex {
        self.index
    }

    pub fn buffer(&self) -> &StateBuffer<S::State> {
        &self.buffer
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the adapter, e.g. to feed events into an accumulator.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// `true` if `button` is down in the current state (always `false` while disconnected).
    pub fn is_pressed(&self, button: <S::State as DeviceState>::Button) -> bool {
        self.connected && self.buffer.current().is_active(button)
    }

    pub fn has_just_been_pressed(&self, button: <S::State as DeviceState>::Button) -> bool {
        self.connected
            && edge::has_just_been_pressed(&self.buffer, button, <S::State as DeviceState>::is_active)
    }

    pub fn has_just_been_released(&self, button: <S::State as DeviceState>::Button) -> bool {
        self.connected
            && edge::has_just_been_released(&self.buffer, button, <S::State as DeviceState>::is_active)
    }
}

impl<S: StateSource> fmt::Debug for InputDevice<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputDevice")
            .field("name", &self.source.name())
            .field("index", &self.index)
            .field("connected", &self.connected)
            .field("buffer", &self.buffer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Bits(u8);

    impl DeviceState for Bits {
        type Button = u8;

        fn neutral() -> Self {
            Bits(0)
        }

        fn is_active(&self, button: u8) -> bool {
            self.0 & (1 << button) != 0
        }
    }

    /// Replays queued reads; repeats the last one when the queue runs dry.
    struct Script {
        reads: VecDeque<Result<Bits, SourceError>>,
        last: Result<Bits, SourceError>,
    }

    impl Script {
        fn new(reads: Vec<Result<Bits, SourceError>>) -> Self {
            Self {
                reads: reads.into(),
                last: Ok(Bits(0)),
            }
        }
    }

    impl StateSource for Script {
        type State = Bits;

        fn read_state(&mut self) -> Result<Bits, SourceError> {
            if let Some(next) = self.reads.pop_front() {
                self.last = next;
            }
            self.last.clone()
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn construction_primes_without_edges() {
        let dev = InputDevice::new(Script::new(vec![Ok(Bits(0b1))]), DeviceIndex::FIRST).unwrap();
        assert!(dev.is_connected());
        assert_eq!(dev.current_state(), dev.previous_state());
        assert!(dev.is_pressed(0));
        assert!(!dev.has_just_been_pressed(0));
    }

    #[test]
    fn update_rotates_and_detects_edges() {
        let src = Script::new(vec![Ok(Bits(0)), Ok(Bits(0b1)), Ok(Bits(0b1)), Ok(Bits(0))]);
        let mut dev = InputDevice::new(src, DeviceIndex::FIRST).unwrap();

        dev.update(ms(16)).unwrap();
        assert!(dev.has_just_been_pressed(0));
        assert_eq!(dev.current_state_time(), ms(16));
        assert_eq!(dev.previous_state_time(), Duration::ZERO);

        dev.update(ms(32)).unwrap();
        assert!(!dev.has_just_been_pressed(0));
        assert!(dev.is_pressed(0));

        dev.update(ms(48)).unwrap();
        assert!(dev.has_just_been_released(0));
        assert!(!dev.is_pressed(0));
    }

    #[test]
    fn transient_failure_leaves_buffer_untouched() {
        let src = Script::new(vec![
            Ok(Bits(0b1)),
            Err(SourceError::Failed { code: 5 }),
            Ok(Bits(0)),
        ]);
        let mut dev = InputDevice::new(src, DeviceIndex::FIRST).unwrap();
        let before = dev.buffer().clone();

        let err = dev.update(ms(16)).unwrap_err();
        assert!(matches!(err, InputError::Hardware { code: 5 }));
        assert_eq!(dev.buffer(), &before);
        assert!(dev.is_connected());

        dev.update(ms(32)).unwrap();
        assert!(dev.has_just_been_released(0));
    }

    #[test]
    fn disconnect_substitutes_neutral_and_silences_edges() {
        let src = Script::new(vec![Ok(Bits(0b1)), Err(SourceError::Disconnected)]);
        let mut dev = InputDevice::new(src, DeviceIndex::FIRST).unwrap();

        dev.update(ms(16)).unwrap();
        assert!(!dev.is_connected());
        assert_eq!(dev.current_state(), &Bits(0));
        // previous still holds the pressed state, but no release is reported
        assert!(!dev.has_just_been_released(0));
        assert!(!dev.is_pressed(0));
    }

    #[test]
    fn reconnect_and_reset_avoid_spurious_edges() {
        let src = Script::new(vec![Err(SourceError::Disconnected), Ok(Bits(0b10))]);
        let mut dev = InputDevice::new(src, DeviceIndex::FIRST).unwrap();
        assert!(!dev.is_connected());

        dev.reset(ms(100)).unwrap();
        assert!(dev.is_connected());
        assert!(dev.is_pressed(1));
        assert!(!dev.has_just_been_pressed(1));
        assert_eq!(dev.current_state_time(), ms(100));
        assert_eq!(dev.previous_state_time(), ms(100));
    }

    #[test]
    fn update_after_reconnect_reprimes() {
        let src = Script::new(vec![Ok(Bits(0b10)), Err(SourceError::Disconnected), Ok(Bits(0b10))]);
        let mut dev = InputDevice::new(src, DeviceIndex::FIRST).unwrap();
        dev.update(ms(16)).unwrap();
        assert!(!dev.is_connected());

        dev.update(ms(32)).unwrap();
        assert!(dev.is_connected());
        assert!(dev.is_pressed(1));
        assert!(!dev.has_just_been_pressed(1));
        assert_eq!(dev.previous_state(), dev.current_state());
        assert_eq!(dev.previous_state_time(), ms(32));

        // edges resume on the following frame
        dev.update(ms(48)).unwrap();
        assert!(dev.is_pressed(1));
        assert!(!dev.has_just_been_pressed(1));
    }

    #[test]
    fn same_time_is_allowed_but_going_back_is_not() {
        let mut dev = InputDevice::new(Script::new(vec![]), DeviceIndex::FIRST).unwrap();
        dev.update(ms(10)).unwrap();
        dev.update(ms(10)).unwrap();
        assert_eq!(dev.previous_state_time(), dev.current_state_time());

        let err = dev.update(ms(5)).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(dev.current_state_time(), ms(10));
    }

    #[test]
    fn construction_surfaces_transient_failures() {
        let src = Script::new(vec![Err(SourceError::Failed { code: 31 })]);
        assert!(InputDevice::new(src, DeviceIndex::FIRST).is_err());
    }

    #[test]
    fn device_index_validation() {
        assert!(DeviceIndex::new(-1).unwrap_err().is_invalid_argument());
        assert!(DeviceIndex::new(8).is_err());
        assert_eq!(DeviceIndex::new(7).unwrap().get(), 7);
        assert_eq!(DeviceIndex::try_from(3).unwrap().as_usize(), 3);
    }
}
