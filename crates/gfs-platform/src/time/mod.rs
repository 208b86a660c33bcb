//! Time subsystem.
//!
//! Frame timing from a monotonic tick counter and a cycle counter, without
//! coupling to the runtime. One `FrameClock` per frame loop; call `tick()`
//! once per presented frame.

mod frame_clock;
mod tick_source;

pub use frame_clock::{FrameClock, FrameElapsed, FrameInstant, FrameMetrics, FrameTime};
pub use tick_source::{SystemTicks, TickSource};
