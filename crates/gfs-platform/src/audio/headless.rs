use std::time::Instant;

use crate::error::AudioError;

use super::device::{AudioDevice, AudioFormat, Cursors};
use super::memory::MemoryRing;

/// Device with no sound card behind it.
///
/// The ring lives in memory and the play cursor advances with wall time at
/// the format's sample rate, so the write-window arithmetic behaves as it
/// would against real hardware.
pub struct HeadlessDevice {
    format: AudioFormat,
    ring: MemoryRing,
    started: Option<Instant>,
}

impl HeadlessDevice {
    pub fn new(format: AudioFormat, capacity_bytes: usize) -> Self {
        Self {
            format,
            ring: MemoryRing::new(capacity_bytes),
            started: None,
        }
    }

    pub fn ring(&self) -> &MemoryRing {
        &self.ring
    }

    fn play_cursor(&self) -> usize {
        let Some(started) = self.started else {
            return 0;
        };
        let capacity = self.ring.capacity() as u128;
        if capacity == 0 {
            return 0;
        }
        let elapsed = started.elapsed().as_nanos();
        let samples = elapsed * self.format.samples_per_second as u128 / 1_000_000_000;
        ((samples * self.format.bytes_per_sample() as u128) % capacity) as usize
    }
}

impl AudioDevice for HeadlessDevice {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn capacity_bytes(&self) -> usize {
        self.ring.capacity()
    }

    fn cursors(&mut self) -> Result<Cursors, AudioError> {
        let play = self.play_cursor();
        Ok(Cursors { play, write: play })
    }

    fn lock(
        &mut self,
        offset: usize,
        len: usize,
        write: &mut dyn FnMut(&mut [u8], &mut [u8]),
    ) -> Result<(), AudioError> {
        self.ring.lock(offset, len, write)
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.started.get_or_insert_with(Instant::now);
        Ok(())
    }
}

/// Stand-in used when no output device could be opened.
///
/// Every query fails, so the frame loop runs with audio skipped.
#[derive(Debug, Clone)]
pub struct NullDevice {
    format: AudioFormat,
    capacity_bytes: usize,
}

impl NullDevice {
    pub fn new(format: AudioFormat, capacity_bytes: usize) -> Self {
        Self {
            format,
            capacity_bytes,
        }
    }
}

impl AudioDevice for NullDevice {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    fn cursors(&mut self) -> Result<Cursors, AudioError> {
        Err(AudioError::Unavailable)
    }

    fn lock(
        &mut self,
        _offset: usize,
        _len: usize,
        _write: &mut dyn FnMut(&mut [u8], &mut [u8]),
    ) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn play(&mut self) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }
}
