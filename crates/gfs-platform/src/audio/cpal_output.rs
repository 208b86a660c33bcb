//! Audio output through `cpal`.
//!
//! The ring is shared with the output callback as one atomic word per stereo
//! i16 frame. The callback is the "hardware": it reads frames at the play
//! cursor, converts them to the stream's sample type and advances the cursor.
//! The frame loop only ever writes ahead of that cursor, so neither side
//! takes a lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

use crate::error::AudioError;

use super::config::AudioConfig;
use super::device::{AudioDevice, AudioFormat, Cursors};
use super::memory::MemoryRing;

const FRAME_BYTES: usize = 4;

struct SharedRing {
    frames: Box<[AtomicU32]>,
    play_cursor: AtomicUsize,
    /// Bytes consumed by the most recent callback; the write cursor sits this
    /// far past the play cursor.
    period_bytes: AtomicUsize,
    playing: AtomicBool,
    failed: AtomicBool,
}

impl SharedRing {
    fn new(capacity_bytes: usize) -> Self {
        Self {
            frames: (0..capacity_bytes / FRAME_BYTES).map(|_| AtomicU32::new(0)).collect(),
            play_cursor: AtomicUsize::new(0),
            period_bytes: AtomicUsize::new(0),
            playing: AtomicBool::new(false),
            failed: AtomicBool::new(false),
        }
    }

    fn capacity_bytes(&self) -> usize {
        self.frames.len() * FRAME_BYTES
    }

    fn read_frame(&self, offset: usize) -> (i16, i16) {
        let [a, b, c, d] = self.frames[offset / FRAME_BYTES]
            .load(Ordering::Relaxed)
            .to_ne_bytes();
        (i16::from_ne_bytes([a, b]), i16::from_ne_bytes([c, d]))
    }

    /// Copies `len` bytes at `offset` from the writer's staging copy into the
    /// shared frames, wrapping at capacity. Both must be frame aligned.
    fn publish(&self, staging: &MemoryRing, offset: usize, len: usize) {
        let bytes = staging.as_bytes();
        let count = self.frames.len();
        let first = offset / FRAME_BYTES;
        for i in 0..len / FRAME_BYTES {
            let index = (first + i) % count;
            let at = index * FRAME_BYTES;
            let word = u32::from_ne_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
            self.frames[index].store(word, Ordering::Relaxed);
        }
    }
}

/// Writes through the staging copy, then publishes the locked region.
fn lock_and_publish(
    staging: &mut MemoryRing,
    shared: &SharedRing,
    offset: usize,
    len: usize,
    write: &mut dyn FnMut(&mut [u8], &mut [u8]),
) -> Result<(), AudioError> {
    if offset % FRAME_BYTES != 0 || len % FRAME_BYTES != 0 {
        return Err(AudioError::LockFailure { offset, len });
    }
    staging.lock(offset, len, write)?;
    shared.publish(staging, offset, len);
    Ok(())
}

/// Default output device driven from an in-process ring.
pub struct CpalDevice {
    format: AudioFormat,
    capacity_bytes: usize,
    shared: Arc<SharedRing>,
    /// Frame-thread copy of everything written; the callback never sees it.
    staging: MemoryRing,
    stream: cpal::Stream,
    name: String,
}

impl CpalDevice {
    /// Opens the default output device.
    ///
    /// Asks for a stereo stream at the configured rate and falls back to the
    /// device's default configuration. The ring always holds stereo i16; the
    /// callback converts to whatever the stream wants.
    pub fn open(config: &AudioConfig) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::Unavailable)?;
        let name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let wanted = cpal::SampleRate(config.samples_per_second);
        let requested = device
            .supported_output_configs()
            .map_err(|e| AudioError::Stream(format!("cannot list output configs: {e}")))?
            .find(|range| {
                range.channels() == 2
                    && range.min_sample_rate() <= wanted
                    && wanted <= range.max_sample_rate()
            })
            .map(|range| range.with_sample_rate(wanted));

        let supported = match requested {
            Some(supported) => supported,
            None => {
                let fallback = device
                    .default_output_config()
                    .map_err(|e| AudioError::Stream(format!("no default output config: {e}")))?;
                log::warn!(
                    "output device '{name}' cannot play {} Hz stereo; using {} Hz x{}",
                    config.samples_per_second,
                    fallback.sample_rate().0,
                    fallback.channels(),
                );
                fallback
            }
        };

        let format = AudioFormat::stereo_i16(supported.sample_rate().0);
        let capacity_bytes = config.capacity_bytes(format);
        let channels = supported.channels() as usize;

        let shared = Arc::new(SharedRing::new(capacity_bytes));

        let stream_config: cpal::StreamConfig = supported.config();
        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, channels, &shared)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, channels, &shared)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, channels, &shared)?,
            other => {
                return Err(AudioError::Stream(format!("unsupported sample format: {other:?}")));
            }
        };

        log::info!(
            "audio output '{name}': {} Hz, {channels} channel(s), {:?}, ring {capacity_bytes} bytes",
            format.samples_per_second,
            supported.sample_format(),
        );

        Ok(Self {
            format,
            capacity_bytes,
            shared,
            staging: MemoryRing::new(capacity_bytes),
            stream,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    shared: &Arc<SharedRing>,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample + FromSample<i16>,
{
    let data_shared = Arc::clone(shared);
    let error_shared = Arc::clone(shared);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                fill_output(&data_shared, data, channels);
            },
            move |err| {
                log::error!("audio stream error: {err}");
                error_shared.failed.store(true, Ordering::Release);
            },
            None,
        )
        .map_err(|e| AudioError::Stream(format!("cannot build output stream: {e}")))
}

/// Output callback body: consume frames at the play cursor.
fn fill_output<T>(shared: &SharedRing, data: &mut [T], channels: usize)
where
    T: Sample + FromSample<i16>,
{
    if channels == 0 || !shared.playing.load(Ordering::Acquire) {
        data.fill(T::EQUILIBRIUM);
        return;
    }
    let capacity = shared.capacity_bytes();
    if capacity == 0 {
        data.fill(T::EQUILIBRIUM);
        return;
    }
    let mut cursor = shared.play_cursor.load(Ordering::Acquire);

    for frame in data.chunks_mut(channels) {
        let (left, right) = shared.read_frame(cursor);
        match frame {
            [mono] => {
                let mixed = ((left as i32 + right as i32) / 2) as i16;
                *mono = T::from_sample(mixed);
            }
            [l, r, rest @ ..] => {
                *l = T::from_sample(left);
                *r = T::from_sample(right);
                rest.fill(T::EQUILIBRIUM);
            }
            [] => {}
        }
        cursor = (cursor + FRAME_BYTES) % capacity;
    }

    shared.play_cursor.store(cursor, Ordering::Release);
    shared
        .period_bytes
        .store(data.len() / channels * FRAME_BYTES, Ordering::Relaxed);
}

impl AudioDevice for CpalDevice {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    fn cursors(&mut self) -> Result<Cursors, AudioError> {
        if self.shared.failed.load(Ordering::Acquire) {
            return Err(AudioError::DeviceQueryFailure(format!(
                "output stream on '{}' reported an error",
                self.name
            )));
        }
        let play = self.shared.play_cursor.load(Ordering::Acquire);
        let period = self.shared.period_bytes.load(Ordering::Relaxed);
        Ok(Cursors {
            play,
            write: (play + period) % self.capacity_bytes,
        })
    }

    fn lock(
        &mut self,
        offset: usize,
        len: usize,
        write: &mut dyn FnMut(&mut [u8], &mut [u8]),
    ) -> Result<(), AudioError> {
        lock_and_publish(&mut self.staging, &self.shared, offset, len, write)
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::Stream(format!("cannot start playback: {e}")))?;
        self.shared.playing.store(true, Ordering::Release);
        log::debug!("audio playback started");
        Ok(())
    }
}
