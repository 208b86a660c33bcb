use winit::dpi::PhysicalSize;

use crate::device::Gpu;
use crate::surface::{PixelSurface, PresentOutcome, Presenter};

use super::{BlitRenderer, RenderCtx, RenderTarget};

/// Presents the pixel surface to a window through wgpu.
pub struct GpuPresenter<'w> {
    gpu: Gpu<'w>,
    blit: BlitRenderer,
}

impl<'w> GpuPresenter<'w> {
    pub fn new(gpu: Gpu<'w>) -> Self {
        Self {
            gpu,
            blit: BlitRenderer::new(),
        }
    }

    pub fn gpu(&self) -> &Gpu<'w> {
        &self.gpu
    }

    /// Follows a window resize; the surface is stretched to the new size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }
}

impl Presenter for GpuPresenter<'_> {
    fn present(&mut self, surface: &PixelSurface) -> PresentOutcome {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            return PresentOutcome::Skipped;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(e) => return self.gpu.handle_surface_error(e),
        };

        let ctx = RenderCtx::new(self.gpu.device(), self.gpu.queue(), self.gpu.surface_format());
        let drawn = self.blit.upload(&ctx, surface);
        {
            // An empty surface still clears, so the window shows black.
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            self.blit.render(&mut target);
        }
        self.gpu.submit(frame);

        if drawn {
            PresentOutcome::Presented
        } else {
            PresentOutcome::Skipped
        }
    }
}
