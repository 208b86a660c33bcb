use super::pixel_surface::{PixelSurface, PresentTarget};

/// Result of a present attempt.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PresentOutcome {
    /// The surface reached the output.
    Presented,
    /// Nothing to show (zero-area surface or output); not an error.
    Skipped,
    /// The output was reconfigured; presenting resumes next frame.
    Reconfigured,
    /// The output is gone for good; the loop should shut down.
    Fatal,
}

/// Display collaborator: pushes the surface to whatever the platform shows.
///
/// Must not mutate the surface.
pub trait Presenter {
    fn present(&mut self, surface: &PixelSurface) -> PresentOutcome;
}

/// Presenter that stretches into an owned CPU buffer.
///
/// Used for headless runs and tests where there is no window.
#[derive(Debug, Clone)]
pub struct SoftwarePresenter {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    presented_frames: u64,
}

impl SoftwarePresenter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
            presented_frames: 0,
        }
    }

    /// Changes the output size; the contents are cleared.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, 0);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Number of frames that actually reached the output.
    pub fn presented_frames(&self) -> u64 {
        self.presented_frames
    }
}

impl Presenter for SoftwarePresenter {
    fn present(&mut self, surface: &PixelSurface) -> PresentOutcome {
        let mut target = PresentTarget::packed(self.width, self.height, &mut self.pixels);
        if surface.present(&mut target) {
            self.presented_frames += 1;
            PresentOutcome::Presented
        } else {
            PresentOutcome::Skipped
        }
    }
}
