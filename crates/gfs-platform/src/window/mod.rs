//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, translates window events into
//! platform events and drives one frame per redraw.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
pub use winit::dpi::LogicalSize;
