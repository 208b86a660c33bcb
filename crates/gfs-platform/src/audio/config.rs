use super::device::AudioFormat;

/// Audio output configuration.
///
/// The requested rate is a preference; devices may open at a different rate
/// and report it through [`AudioFormat`]. Ring size and latency are always
/// derived from the format the device actually opened with.
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub samples_per_second: u32,
    pub channels: u16,
    pub bytes_per_channel_sample: u16,

    /// Ring length in seconds of audio.
    pub buffer_seconds: u32,

    /// Latency target is `samples_per_second / latency_divisor` samples
    /// (15 gives roughly four frames at 60 Hz).
    pub latency_divisor: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            samples_per_second: 48_000,
            channels: 2,
            bytes_per_channel_sample: 2,
            buffer_seconds: 1,
            latency_divisor: 15,
        }
    }
}

impl AudioConfig {
    /// Format requested from the device.
    pub fn requested_format(&self) -> AudioFormat {
        AudioFormat {
            samples_per_second: self.samples_per_second,
            channels: self.channels,
            bytes_per_channel_sample: self.bytes_per_channel_sample,
        }
    }

    /// Ring size in bytes for `format`.
    pub fn capacity_bytes(&self, format: AudioFormat) -> usize {
        format.samples_per_second as usize * format.bytes_per_sample() * self.buffer_seconds as usize
    }

    /// Lookahead in samples for `format`.
    pub fn latency_samples(&self, format: AudioFormat) -> u32 {
        format.samples_per_second / self.latency_divisor.max(1)
    }
}
