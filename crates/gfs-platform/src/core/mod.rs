//! Core platform/game contracts.
//!
//! This module defines the interface between the platform loop and the game
//! layer: the game callback, the per-frame buffer views, the events the
//! platform delivers and the driver that runs one frame at a time.

mod app;
mod driver;
mod events;

pub use app::{AppControl, Game, SoundBuffer};
pub use driver::{DriverConfig, DriverState, FrameDriver, FrameReport, FrameStats};
pub use events::{EventQueue, EventSource, PlatformEvent};
