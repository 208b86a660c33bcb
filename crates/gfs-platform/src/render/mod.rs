//! GPU presentation.
//!
//! The pixel surface is uploaded into a texture each frame and drawn with a
//! fullscreen triangle stretched to the swapchain.

mod blit;
mod ctx;
mod presenter;

pub use blit::BlitRenderer;
pub use ctx::{RenderCtx, RenderTarget};
pub use presenter::GpuPresenter;
