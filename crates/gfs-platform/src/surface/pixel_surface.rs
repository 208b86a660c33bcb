use crate::error::SurfaceError;

/// Bytes per pixel. Memory order is blue, green, red, unused.
pub const BYTES_PER_PIXEL: usize = 4;

/// Packs a color into a pixel whose in-memory byte order is `B G R X`.
#[inline]
pub fn pack_bgrx(r: u8, g: u8, b: u8) -> u32 {
    u32::from_ne_bytes([b, g, r, 0])
}

/// CPU-writable framebuffer handed to the game every frame.
///
/// Memory is always sized exactly `stride * height` bytes for the current
/// dimensions. A failed resize leaves the surface unavailable (0x0, no
/// memory) until the next successful one.
#[derive(Debug)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    stride: usize,

    // Stored as whole pixels so the game can address `u32`s without
    // alignment concerns; `stride` is still expressed in bytes.
    memory: Option<Vec<u32>>,
}

impl PixelSurface {
    /// Creates a surface and allocates its first block.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let mut surface = Self::empty();
        surface.resize(width, height)?;
        Ok(surface)
    }

    /// An unavailable surface with no memory.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            stride: 0,
            memory: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the start of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// `false` after a failed resize or a release.
    pub fn is_available(&self) -> bool {
        self.memory.is_some()
    }

    /// `true` when there is nothing to draw or present.
    pub fn is_zero_area(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Reallocates the surface for new dimensions.
    ///
    /// The previous block is released first; the new block is
    /// zero-initialized. Zero-area sizes are accepted and hold no memory.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.release();

        let failure = SurfaceError::AllocationFailure { width, height };

        let pixel_count = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| failure.clone())?;
        let stride = (width as usize)
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| failure.clone())?;
        pixel_count
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| failure.clone())?;

        let mut memory: Vec<u32> = Vec::new();
        memory
            .try_reserve_exact(pixel_count)
            .map_err(|_| failure)?;
        memory.resize(pixel_count, 0);

        self.width = width;
        self.height = height;
        self.stride = stride;
        self.memory = Some(memory);

        log::debug!("pixel surface resized to {width}x{height} (stride {stride})");
        Ok(())
    }

    /// Drops the pixel memory and leaves the surface unavailable.
    pub fn release(&mut self) {
        self.width = 0;
        self.height = 0;
        self.stride = 0;
        self.memory = None;
    }

    /// Pixel memory as raw bytes (`B G R X` per pixel). Empty when unavailable.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.memory {
            Some(pixels) => bytemuck::cast_slice(pixels),
            None => &[],
        }
    }

    /// Pixel memory as packed pixels. Empty when unavailable.
    pub fn pixels(&self) -> &[u32] {
        self.memory.as_deref().unwrap_or(&[])
    }

    /// The game's view of the surface.
    ///
    /// An unavailable surface produces an empty 0x0 view so the frame can
    /// still be run.
    pub fn view_mut(&mut self) -> OffscreenBuffer<'_> {
        match self.memory.as_mut() {
            Some(pixels) => OffscreenBuffer {
                width: self.width,
                height: self.height,
                stride: self.stride,
                pixels,
            },
            None => OffscreenBuffer {
                width: 0,
                height: 0,
                stride: 0,
                pixels: &mut [],
            },
        }
    }

    /// Stretches the surface into `target` using nearest-neighbour sampling.
    ///
    /// The surface itself is never modified. Returns `false` (and leaves the
    /// target untouched) when either side has zero area, the surface is
    /// unavailable, or the target's pixels cannot hold its rows.
    pub fn present(&self, target: &mut PresentTarget<'_>) -> bool {
        let Some(src) = self.memory.as_deref() else {
            return false;
        };
        if self.is_zero_area() || target.width == 0 || target.height == 0 {
            return false;
        }

        let src_w = self.width as usize;
        let src_h = self.height as usize;
        let dst_w = target.width as usize;
        let dst_h = target.height as usize;
        let fits = target.row_pixels >= dst_w
            && target
                .row_pixels
                .checked_mul(dst_h - 1)
                .and_then(|n| n.checked_add(dst_w))
                .is_some_and(|needed| target.pixels.len() >= needed);
        if !fits {
            return false;
        }
        let src_row_pixels = self.stride / BYTES_PER_PIXEL;

        for dy in 0..dst_h {
            let sy = dy * src_h / dst_h;
            let src_row = &src[sy * src_row_pixels..sy * src_row_pixels + src_w];
            let dst_row = &mut target.pixels[dy * target.row_pixels..dy * target.row_pixels + dst_w];

            for (dx, out) in dst_row.iter_mut().enumerate() {
                *out = src_row[dx * src_w / dst_w];
            }
        }

        true
    }
}

/// Mutable view of the pixel surface passed to the game.
///
/// Borrowed for the duration of one game callback only.
pub struct OffscreenBuffer<'a> {
    pub width: u32,
    pub height: u32,
    /// Bytes per row.
    pub stride: usize,
    pub pixels: &'a mut [u32],
}

impl OffscreenBuffer<'_> {
    /// Mutable access to row `y`, `width` pixels long.
    ///
    /// Panics if `y` is out of range.
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let row_pixels = self.stride / BYTES_PER_PIXEL;
        let start = y as usize * row_pixels;
        &mut self.pixels[start..start + self.width as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Destination of a software present (device output of any size).
pub struct PresentTarget<'a> {
    pub width: u32,
    pub height: u32,
    /// Pixels per row; at least `width`.
    pub row_pixels: usize,
    pub pixels: &'a mut [u32],
}

impl<'a> PresentTarget<'a> {
    /// Wraps a tightly packed `width * height` pixel slice.
    pub fn packed(width: u32, height: u32, pixels: &'a mut [u32]) -> Self {
        debug_assert!(pixels.len() >= width as usize * height as usize);
        Self {
            width,
            height,
            row_pixels: width as usize,
            pixels,
        }
    }
}
