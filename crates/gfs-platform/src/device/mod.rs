//! GPU device + swapchain management for the windowed presenter.
//!
//! Creates the wgpu adapter/device/queue bound to a window surface,
//! reconfigures the swapchain on resize and hands out frames to record into.

mod frame;
mod gpu;
mod init;
mod surface;

pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
