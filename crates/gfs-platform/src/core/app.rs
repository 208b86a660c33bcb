use crate::surface::OffscreenBuffer;

/// Control directive returned by the frame driver.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Mutable view of the frame's sample scratch buffer.
///
/// Interleaved stereo: `samples.len() == sample_count * 2`.
pub struct SoundBuffer<'a> {
    pub samples: &'a mut [i16],
    pub sample_count: usize,
    pub samples_per_second: u32,
}

impl<'a> SoundBuffer<'a> {
    pub fn new(samples: &'a mut [i16], samples_per_second: u32) -> Self {
        debug_assert!(samples.len() % 2 == 0, "stereo buffer with an odd sample count");
        Self {
            sample_count: samples.len() / 2,
            samples,
            samples_per_second,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// Stereo frames as `[left, right]` pairs.
    pub fn frames_mut(&mut self) -> impl Iterator<Item = &mut [i16]> {
        self.samples.chunks_exact_mut(2)
    }
}

/// Game contract implemented by the layer above the platform.
///
/// Called exactly once per frame. The views are only valid for the call and
/// must be filled in place.
pub trait Game {
    fn update_and_render(
        &mut self,
        buffer: &mut OffscreenBuffer<'_>,
        sound: &mut SoundBuffer<'_>,
        x_offset: i32,
        y_offset: i32,
    );
}

impl<G: Game + ?Sized> Game for Box<G> {
    fn update_and_render(
        &mut self,
        buffer: &mut OffscreenBuffer<'_>,
        sound: &mut SoundBuffer<'_>,
        x_offset: i32,
        y_offset: i32,
    ) {
        (**self).update_and_render(buffer, sound, x_offset, y_offset)
    }
}
