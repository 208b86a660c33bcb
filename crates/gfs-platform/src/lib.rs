//! Platform layer of the gfs game.
//!
//! Owns the window, the audio device and the frame loop, and hands the game
//! a pixel surface and a sample buffer once per frame.

pub mod audio;
pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod render;
pub mod surface;
pub mod time;
pub mod window;

pub use error::{AudioError, PlatformError, SurfaceError};
