use crate::error::AudioError;

/// Sample layout of a device ring.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AudioFormat {
    pub samples_per_second: u32,
    pub channels: u16,
    /// Width of one channel sample in bytes (2 for 16-bit PCM).
    pub bytes_per_channel_sample: u16,
}

impl AudioFormat {
    /// Interleaved stereo, 16-bit.
    pub const fn stereo_i16(samples_per_second: u32) -> Self {
        Self {
            samples_per_second,
            channels: 2,
            bytes_per_channel_sample: 2,
        }
    }

    /// Bytes per sample frame (all channels).
    pub fn bytes_per_sample(&self) -> usize {
        self.channels as usize * self.bytes_per_channel_sample as usize
    }

    pub fn is_stereo_i16(&self) -> bool {
        self.channels == 2 && self.bytes_per_channel_sample == 2
    }
}

/// Cursor positions reported by the device, in bytes into its ring.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Cursors {
    /// Position currently being read for playback.
    pub play: usize,
    /// Earliest position that is safe to write.
    pub write: usize,
}

/// Audio device collaborator.
///
/// The device owns a fixed-capacity circular byte buffer that an independent
/// playback clock consumes. The core never owns that storage: it asks for
/// cursors and writes through [`AudioDevice::lock`].
pub trait AudioDevice {
    fn format(&self) -> AudioFormat;

    /// Ring size in bytes; fixed for the lifetime of the device.
    fn capacity_bytes(&self) -> usize;

    fn cursors(&mut self) -> Result<Cursors, AudioError>;

    /// Locks `len` bytes starting at `offset` and hands them to `write`.
    ///
    /// A request that runs past the end of the ring arrives as two regions:
    /// the tail of the buffer, then its head. The second region is empty when
    /// there is no wrap. The lock is released when `write` returns.
    fn lock(
        &mut self,
        offset: usize,
        len: usize,
        write: &mut dyn FnMut(&mut [u8], &mut [u8]),
    ) -> Result<(), AudioError>;

    /// Starts looping playback of the ring.
    fn play(&mut self) -> Result<(), AudioError>;
}

impl<D: AudioDevice + ?Sized> AudioDevice for Box<D> {
    fn format(&self) -> AudioFormat {
        (**self).format()
    }

    fn capacity_bytes(&self) -> usize {
        (**self).capacity_bytes()
    }

    fn cursors(&mut self) -> Result<Cursors, AudioError> {
        (**self).cursors()
    }

    fn lock(
        &mut self,
        offset: usize,
        len: usize,
        write: &mut dyn FnMut(&mut [u8], &mut [u8]),
    ) -> Result<(), AudioError> {
        (**self).lock(offset, len, write)
    }

    fn play(&mut self) -> Result<(), AudioError> {
        (**self).play()
    }
}
