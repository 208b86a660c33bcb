//! Audio output.
//!
//! [`AudioRing`] is the platform side of the sound contract: it tracks how
//! far into a device-owned circular buffer the game's samples have been
//! written and computes each frame's write window relative to the hardware
//! play cursor. Devices implement [`AudioDevice`]:
//! - [`CpalDevice`]: the default output device through `cpal`
//! - [`HeadlessDevice`]: wall-clock driven ring for windowless runs
//! - [`NullDevice`]: stand-in when no device opened; audio is skipped

mod config;
mod cpal_output;
mod device;
mod headless;
mod memory;
mod ring;

#[cfg(test)]
pub(crate) mod test_device;

pub use config::AudioConfig;
pub use cpal_output::CpalDevice;
pub use device::{AudioDevice, AudioFormat, Cursors};
pub use headless::{HeadlessDevice, NullDevice};
pub use memory::MemoryRing;
pub use ring::{AudioRing, WriteWindow};
