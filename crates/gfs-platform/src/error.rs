use thiserror::Error;

/// Pixel surface failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The requested block could not be allocated (or its size overflows).
    ///
    /// The surface is left empty until the next successful resize.
    #[error("cannot allocate a {width}x{height} pixel surface")]
    AllocationFailure { width: u32, height: u32 },
}

/// Audio device failures.
///
/// None of these are fatal to the frame loop: the frame is produced without
/// audio and the device keeps playing whatever it already holds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AudioError {
    /// No output device is open.
    #[error("audio device unavailable")]
    Unavailable,

    /// The play/write cursor query failed.
    #[error("audio cursor query failed: {0}")]
    DeviceQueryFailure(String),

    /// The requested ring region could not be locked.
    #[error("cannot lock {len} bytes of the audio ring at offset {offset}")]
    LockFailure { offset: usize, len: usize },

    /// Stream creation or playback control failed.
    #[error("audio stream error: {0}")]
    Stream(String),
}

/// Errors surfaced while bringing the platform layer up.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
