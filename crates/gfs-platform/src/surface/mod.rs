//! Pixel surface (the CPU framebuffer) and presentation.
//!
//! The game draws into a [`PixelSurface`] through an [`OffscreenBuffer`] view;
//! a [`Presenter`] then pushes the finished surface to the device output.

mod pixel_surface;
mod present;

pub use pixel_surface::{
    pack_bgrx, OffscreenBuffer, PixelSurface, PresentTarget, BYTES_PER_PIXEL,
};
pub use present::{PresentOutcome, Presenter, SoftwarePresenter};
