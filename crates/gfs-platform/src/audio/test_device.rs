//! Scripted audio device for tests.

use crate::error::AudioError;

use super::device::{AudioDevice, AudioFormat, Cursors};
use super::memory::MemoryRing;

/// In-memory device whose cursors and failures are set by the test.
pub(crate) struct ScriptedDevice {
    format: AudioFormat,
    ring: MemoryRing,
    play_cursor: usize,
    fail_queries: u32,
    fail_locks: u32,
    fail_play: bool,
    pub(crate) lock_calls: u32,
    pub(crate) playing: bool,
}

impl ScriptedDevice {
    pub(crate) fn new(format: AudioFormat, capacity: usize) -> Self {
        Self {
            format,
            ring: MemoryRing::new(capacity),
            play_cursor: 0,
            fail_queries: 0,
            fail_locks: 0,
            fail_play: false,
            lock_calls: 0,
            playing: false,
        }
    }

    pub(crate) fn ring(&self) -> &MemoryRing {
        &self.ring
    }

    pub(crate) fn set_play_cursor(&mut self, at: usize) {
        self.play_cursor = at;
    }

    pub(crate) fn fail_next_query(&mut self) {
        self.fail_queries += 1;
    }

    pub(crate) fn fail_next_lock(&mut self) {
        self.fail_locks += 1;
    }

    pub(crate) fn fail_next_play(&mut self) {
        self.fail_play = true;
    }

    pub(crate) fn fill_ring(&mut self, value: u8) {
        let capacity = self.ring.capacity();
        self.ring
            .lock(0, capacity, &mut |a, b| {
                a.fill(value);
                b.fill(value);
            })
            .unwrap();
    }
}

impl AudioDevice for ScriptedDevice {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn capacity_bytes(&self) -> usize {
        self.ring.capacity()
    }

    fn cursors(&mut self) -> Result<Cursors, AudioError> {
        if self.fail_queries > 0 {
            self.fail_queries -= 1;
            return Err(AudioError::DeviceQueryFailure("scripted".into()));
        }
        Ok(Cursors {
            play: self.play_cursor,
            write: self.play_cursor,
        })
    }

    fn lock(
        &mut self,
        offset: usize,
        len: usize,
        write: &mut dyn FnMut(&mut [u8], &mut [u8]),
    ) -> Result<(), AudioError> {
        self.lock_calls += 1;
        if self.fail_locks > 0 {
            self.fail_locks -= 1;
            return Err(AudioError::LockFailure { offset, len });
        }
        self.ring.lock(offset, len, write)
    }

    fn play(&mut self) -> Result<(), AudioError> {
        if std::mem::take(&mut self.fail_play) {
            return Err(AudioError::Stream("scripted".into()));
        }
        self.playing = true;
        Ok(())
    }
}
