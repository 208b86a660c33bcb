use crate::error::{AudioError, PlatformError};

use super::config::AudioConfig;
use super::device::{AudioDevice, AudioFormat, Cursors};

/// Region of the device ring to fill this frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WriteWindow {
    /// Where our last written sample ends: `running_sample_index * bps % capacity`.
    pub lock_offset: usize,

    /// Where the write should end: `latency` ahead of the play cursor.
    pub target_cursor: usize,

    /// Bytes from `lock_offset` to `target_cursor`, wrapping at capacity.
    pub bytes_to_write: usize,

    /// The play cursor lies inside the window, i.e. playback has overtaken
    /// the writer and part of this window is already late.
    pub overlaps_play_cursor: bool,
}

impl WriteWindow {
    /// Whole sample frames covered by the window.
    pub fn sample_count(&self, bytes_per_sample: usize) -> usize {
        self.bytes_to_write / bytes_per_sample
    }
}

/// Offset bookkeeping for a device-owned circular sample buffer.
///
/// The ring does not hold audio data; it tracks how much has been written
/// and computes where the next write has to go so that it lands
/// `latency_samples` ahead of the hardware play cursor.
#[derive(Debug, Clone)]
pub struct AudioRing {
    format: AudioFormat,
    capacity_bytes: usize,
    latency_samples: u32,
    running_sample_index: u64,
}

impl AudioRing {
    pub fn new(
        format: AudioFormat,
        capacity_bytes: usize,
        latency_samples: u32,
    ) -> Result<Self, PlatformError> {
        let bps = format.bytes_per_sample();
        if bps == 0 {
            return Err(PlatformError::Config("audio format has zero-sized samples".into()));
        }
        if capacity_bytes == 0 || capacity_bytes % bps != 0 {
            return Err(PlatformError::Config(format!(
                "ring capacity {capacity_bytes} is not a positive multiple of {bps}-byte samples"
            )));
        }
        let latency_bytes = latency_samples as usize * bps;
        if latency_bytes >= capacity_bytes {
            return Err(PlatformError::Config(format!(
                "latency of {latency_samples} samples does not fit a {capacity_bytes}-byte ring"
            )));
        }

        Ok(Self {
            format,
            capacity_bytes,
            latency_samples,
            running_sample_index: 0,
        })
    }

    /// Ring for a device that opened with `format` and `capacity_bytes`,
    /// latency taken from `config`.
    pub fn from_config(
        config: &AudioConfig,
        format: AudioFormat,
        capacity_bytes: usize,
    ) -> Result<Self, PlatformError> {
        Self::new(format, capacity_bytes, config.latency_samples(format))
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    pub fn bytes_per_sample(&self) -> usize {
        self.format.bytes_per_sample()
    }

    pub fn latency_samples(&self) -> u32 {
        self.latency_samples
    }

    /// Samples written since the device opened.
    pub fn running_sample_index(&self) -> u64 {
        self.running_sample_index
    }

    /// Byte offset where the next write starts.
    pub fn lock_offset(&self) -> usize {
        let bps = self.bytes_per_sample() as u64;
        ((self.running_sample_index * bps) % self.capacity_bytes as u64) as usize
    }

    /// Byte offset `latency_samples` ahead of `play_cursor`, on a frame boundary.
    pub fn target_cursor(&self, play_cursor: usize) -> usize {
        let bps = self.bytes_per_sample();
        let latency_bytes = self.latency_samples as usize * bps;
        let target = (play_cursor % self.capacity_bytes + latency_bytes) % self.capacity_bytes;
        target - target % bps
    }

    /// Computes this frame's write window from the device cursors.
    ///
    /// `bytes_to_write` is always `< capacity_bytes`; a writer that is level
    /// with the target gets an empty window.
    pub fn compute_write_window(&self, cursors: Cursors) -> WriteWindow {
        let lock_offset = self.lock_offset();
        let target_cursor = self.target_cursor(cursors.play);

        let bytes_to_write = if target_cursor >= lock_offset {
            target_cursor - lock_offset
        } else {
            (self.capacity_bytes - lock_offset) + target_cursor
        };

        let play = cursors.play % self.capacity_bytes;
        let distance_to_play = (play + self.capacity_bytes - lock_offset) % self.capacity_bytes;
        let overlaps_play_cursor = distance_to_play > 0 && distance_to_play < bytes_to_write;

        WriteWindow {
            lock_offset,
            target_cursor,
            bytes_to_write,
            overlaps_play_cursor,
        }
    }

    /// Copies `window.bytes_to_write` bytes of `source` into the device ring
    /// at `window.lock_offset` and advances the running sample index by the
    /// number of whole samples written.
    ///
    /// Returns the number of samples written. On a device error nothing is
    /// counted.
    ///
    /// # Panics
    ///
    /// If `source` is shorter than the window.
    pub fn write_samples<D>(
        &mut self,
        device: &mut D,
        window: &WriteWindow,
        source: &[u8],
    ) -> Result<usize, AudioError>
    where
        D: AudioDevice + ?Sized,
    {
        let byte_count = window.bytes_to_write;
        assert!(
            source.len() >= byte_count,
            "audio source holds {} bytes but the write window needs {byte_count}",
            source.len(),
        );

        let mut written = 0usize;
        device.lock(window.lock_offset, byte_count, &mut |first, second| {
            let split = first.len();
            first.copy_from_slice(&source[..split]);
            second.copy_from_slice(&source[split..split + second.len()]);
            written = split + second.len();
        })?;

        let samples = written / self.bytes_per_sample();
        self.running_sample_index += samples as u64;
        Ok(samples)
    }

    /// Zero-fills `len` bytes of the device ring starting at `offset`.
    pub fn silence<D>(&self, device: &mut D, offset: usize, len: usize) -> Result<(), AudioError>
    where
        D: AudioDevice + ?Sized,
    {
        device.lock(offset, len, &mut |first, second| {
            first.fill(0);
            second.fill(0);
        })
    }

    /// Silences the whole ring. Done once before playback starts.
    pub fn silence_all<D>(&self, device: &mut D) -> Result<(), AudioError>
    where
        D: AudioDevice + ?Sized,
    {
        self.silence(device, 0, self.capacity_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::test_device::ScriptedDevice;

    fn ring(bps: u16, capacity: usize, latency: u32) -> AudioRing {
        let format = AudioFormat {
            samples_per_second: 48_000,
            channels: 1,
            bytes_per_channel_sample: bps,
        };
        AudioRing::new(format, capacity, latency).unwrap()
    }

    fn stereo_ring(capacity: usize, latency: u32) -> AudioRing {
        AudioRing::new(AudioFormat::stereo_i16(48_000), capacity, latency).unwrap()
    }

    fn play(at: usize) -> Cursors {
        Cursors { play: at, write: at }
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn from_config_uses_device_format() {
        let config = AudioConfig::default();
        let format = AudioFormat::stereo_i16(44_100);
        let r = AudioRing::from_config(&config, format, config.capacity_bytes(format)).unwrap();
        assert_eq!(r.capacity_bytes(), 176_400);
        assert_eq!(r.latency_samples(), 2_940);
        assert_eq!(r.bytes_per_sample(), 4);
    }

    #[test]
    fn new_rejects_latency_that_fills_the_ring() {
        let err = AudioRing::new(AudioFormat::stereo_i16(48_000), 400, 100).unwrap_err();
        assert!(matches!(err, PlatformError::Config(_)));
    }

    #[test]
    fn new_rejects_capacity_not_multiple_of_sample() {
        assert!(AudioRing::new(AudioFormat::stereo_i16(48_000), 402, 10).is_err());
        assert!(AudioRing::new(AudioFormat::stereo_i16(48_000), 0, 0).is_err());
    }

    // ── write window ──────────────────────────────────────────────────────

    #[test]
    fn window_from_start_of_stream() {
        // 48000-byte ring, stereo 16-bit, 200 samples of latency.
        let r = stereo_ring(48_000, 200);
        let w = r.compute_write_window(play(0));
        assert_eq!(w.lock_offset, 0);
        assert_eq!(w.target_cursor, 800);
        assert_eq!(w.bytes_to_write, 800);
        assert!(!w.overlaps_play_cursor);
    }

    #[test]
    fn window_without_wrap() {
        // lock 10, target 50 -> 40 bytes.
        let mut r = ring(2, 100, 25);
        r.running_sample_index = 5;
        let w = r.compute_write_window(play(0));
        assert_eq!((w.lock_offset, w.target_cursor), (10, 50));
        assert_eq!(w.bytes_to_write, 40);
    }

    #[test]
    fn window_with_wrap() {
        // lock capacity-10, target 20 -> 10 + 20 bytes.
        let mut r = ring(2, 100, 10);
        r.running_sample_index = 45;
        let w = r.compute_write_window(play(0));
        assert_eq!((w.lock_offset, w.target_cursor), (90, 20));
        assert_eq!(w.bytes_to_write, 30);
    }

    #[test]
    fn window_target_wraps_past_end() {
        let r = stereo_ring(1_000, 50);
        let w = r.compute_write_window(play(900));
        assert_eq!(w.target_cursor, 100);
        // lock 0 -> target 100, no wrap in the subtraction.
        assert_eq!(w.bytes_to_write, 100);
    }

    #[test]
    fn window_level_with_target_is_empty() {
        let mut r = stereo_ring(1_000, 50);
        r.running_sample_index = 50;
        let w = r.compute_write_window(play(0));
        assert_eq!(w.bytes_to_write, 0);
        assert_eq!(w.sample_count(4), 0);
    }

    #[test]
    fn window_bounds_hold_everywhere() {
        for &capacity in &[8usize, 64, 400, 4_000] {
            for latency in [0u32, 1, 3, (capacity / 4 - 1) as u32] {
                if latency as usize * 4 >= capacity {
                    continue;
                }
                let mut r = stereo_ring(capacity, latency);
                for running in (0..(capacity as u64)).step_by(3) {
                    r.running_sample_index = running * 7;
                    for play_at in (0..capacity).step_by(4) {
                        let w = r.compute_write_window(play(play_at));
                        assert!(w.lock_offset < capacity);
                        assert!(w.target_cursor < capacity);
                        assert!(w.bytes_to_write <= capacity);
                        assert_eq!(w.bytes_to_write % 4, 0);
                        assert_eq!(
                            (w.lock_offset + w.bytes_to_write) % capacity,
                            w.target_cursor,
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn writer_ahead_of_play_cursor_does_not_overlap() {
        let mut r = stereo_ring(1_000, 50);
        // Writer 40 bytes ahead of play cursor at 100.
        r.running_sample_index = 35;
        let w = r.compute_write_window(play(100));
        assert_eq!(w.lock_offset, 140);
        assert_eq!(w.bytes_to_write, 160);
        assert!(!w.overlaps_play_cursor);
    }

    #[test]
    fn writer_behind_play_cursor_is_flagged() {
        let mut r = stereo_ring(1_000, 50);
        // Playback at 500 has passed our lock offset at 100.
        r.running_sample_index = 25;
        let w = r.compute_write_window(play(500));
        assert_eq!(w.bytes_to_write, 600);
        assert!(w.overlaps_play_cursor);
    }

    #[test]
    fn unaligned_play_cursor_rounds_target_down() {
        let r = stereo_ring(1_000, 10);
        let w = r.compute_write_window(play(6));
        assert_eq!(w.target_cursor, 44);
        assert_eq!(w.bytes_to_write, 44);
    }

    // ── writes ────────────────────────────────────────────────────────────

    #[test]
    fn write_samples_copies_and_advances() {
        let mut dev = ScriptedDevice::new(AudioFormat::stereo_i16(48_000), 16);
        let mut r = stereo_ring(16, 2);

        let w = r.compute_write_window(dev.cursors().unwrap());
        assert_eq!(w.bytes_to_write, 8);
        let src: Vec<u8> = (1..=8).collect();
        assert_eq!(r.write_samples(&mut dev, &w, &src).unwrap(), 2);
        assert_eq!(r.running_sample_index(), 2);
        assert_eq!(&dev.ring().as_bytes()[..8], src.as_slice());
    }

    #[test]
    fn write_samples_wraps_around_ring_end() {
        let mut dev = ScriptedDevice::new(AudioFormat::stereo_i16(48_000), 16);
        let mut r = stereo_ring(16, 2);
        r.running_sample_index = 3; // lock offset 12

        dev.set_play_cursor(4); // target 12 + 4 -> wraps
        let w = r.compute_write_window(dev.cursors().unwrap());
        assert_eq!((w.lock_offset, w.target_cursor, w.bytes_to_write), (12, 12, 0));

        dev.set_play_cursor(8);
        let w = r.compute_write_window(dev.cursors().unwrap());
        assert_eq!((w.lock_offset, w.target_cursor, w.bytes_to_write), (12, 0, 4));

        dev.set_play_cursor(12);
        let w = r.compute_write_window(dev.cursors().unwrap());
        assert_eq!(w.bytes_to_write, 8);

        let src = [7u8; 8];
        assert_eq!(r.write_samples(&mut dev, &w, &src).unwrap(), 2);
        assert_eq!(dev.ring().as_bytes(), &[7, 7, 7, 7, 0, 0, 0, 0, 0, 0, 0, 0, 7, 7, 7, 7]);
        assert_eq!(r.running_sample_index(), 5);
    }

    #[test]
    fn running_index_is_sum_of_writes() {
        let mut dev = ScriptedDevice::new(AudioFormat::stereo_i16(48_000), 4_000);
        let mut r = stereo_ring(4_000, 100);
        let src = vec![0u8; 4_000];

        let mut expected = 0u64;
        for play_at in [0usize, 120, 360, 1_000, 2_400, 3_960, 200, 800] {
            dev.set_play_cursor(play_at);
            let w = r.compute_write_window(dev.cursors().unwrap());
            expected += r.write_samples(&mut dev, &w, &src).unwrap() as u64;
            assert_eq!(r.running_sample_index(), expected);
        }
        assert!(expected > 0);
    }

    #[test]
    fn lock_failure_leaves_index_unchanged() {
        let mut dev = ScriptedDevice::new(AudioFormat::stereo_i16(48_000), 400);
        let mut r = stereo_ring(400, 10);
        let w = r.compute_write_window(dev.cursors().unwrap());

        dev.fail_next_lock();
        let err = r.write_samples(&mut dev, &w, &[1u8; 40]).unwrap_err();
        assert!(matches!(err, AudioError::LockFailure { .. }));
        assert_eq!(r.running_sample_index(), 0);
        assert!(dev.ring().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    #[should_panic(expected = "write window needs")]
    fn write_samples_short_source_panics() {
        let mut dev = ScriptedDevice::new(AudioFormat::stereo_i16(48_000), 400);
        let mut r = stereo_ring(400, 10);
        let w = r.compute_write_window(dev.cursors().unwrap());
        let _ = r.write_samples(&mut dev, &w, &[0u8; 3]);
    }

    // ── silence ───────────────────────────────────────────────────────────

    #[test]
    fn silence_wraps_and_is_idempotent() {
        let mut dev = ScriptedDevice::new(AudioFormat::stereo_i16(48_000), 16);
        dev.fill_ring(0xAB);
        let r = stereo_ring(16, 2);

        r.silence(&mut dev, 12, 8).unwrap();
        let once = dev.ring().as_bytes().to_vec();
        assert_eq!(&once[..4], &[0, 0, 0, 0]);
        assert_eq!(&once[4..12], &[0xAB; 8]);
        assert_eq!(&once[12..], &[0, 0, 0, 0]);

        r.silence(&mut dev, 12, 8).unwrap();
        assert_eq!(dev.ring().as_bytes(), once.as_slice());
    }

    #[test]
    fn silence_all_clears_ring() {
        let mut dev = ScriptedDevice::new(AudioFormat::stereo_i16(48_000), 64);
        dev.fill_ring(1);
        stereo_ring(64, 2).silence_all(&mut dev).unwrap();
        assert!(dev.ring().as_bytes().iter().all(|&b| b == 0));
    }
}
