//! Game layer.
//!
//! Fills whatever buffers the platform hands over: a sine tone into the sound
//! buffer and a scrolling gradient with a bouncing square into the pixels.
//! Nothing here knows about windows, GPUs or audio devices.

use std::f32::consts::TAU;

use gfs_platform::core::{Game, SoundBuffer};
use gfs_platform::surface::{pack_bgrx, OffscreenBuffer};

/// All state the game keeps between frames.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Sine phase in radians, kept in `[0, TAU)`.
    t_sine: f32,
    pub tone_hz: u32,
    pub tone_volume: i16,

    player_x: i32,
    player_y: i32,
    player_dx: i32,
    pub player_size: i32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            t_sine: 0.0,
            tone_hz: 256,
            tone_volume: 3000,
            player_x: 100,
            player_y: 100,
            player_dx: 2,
            player_size: 24,
        }
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> f32 {
        self.t_sine
    }

    pub fn player_position(&self) -> (i32, i32) {
        (self.player_x, self.player_y)
    }

    /// Writes `sound.sample_count` stereo frames of the tone.
    fn output_sound(&mut self, sound: &mut SoundBuffer<'_>) {
        if sound.is_empty() {
            return;
        }

        let wave_period = (sound.samples_per_second / self.tone_hz.max(1)).max(1) as f32;
        let step = TAU / wave_period;
        let volume = self.tone_volume as f32;

        for frame in sound.frames_mut() {
            let value = (self.t_sine.sin() * volume) as i16;
            frame[0] = value;
            frame[1] = value;

            self.t_sine += step;
            if self.t_sine >= TAU {
                self.t_sine -= TAU;
            }
        }
    }

    fn render(&mut self, buffer: &mut OffscreenBuffer<'_>, x_offset: i32, y_offset: i32) {
        if buffer.is_empty() {
            return;
        }

        for y in 0..buffer.height {
            let green = (y as i32).wrapping_add(y_offset) as u8;
            for (x, pixel) in buffer.row_mut(y).iter_mut().enumerate() {
                let blue = (x as i32).wrapping_add(x_offset) as u8;
                *pixel = pack_bgrx(0, green, blue);
            }
        }

        self.draw_player(buffer);
    }

    fn draw_player(&mut self, buffer: &mut OffscreenBuffer<'_>) {
        let size = self.player_size;
        let max_x = buffer.width as i32 - size;
        let max_y = buffer.height as i32 - size;
        if size <= 0 || max_x < 0 || max_y < 0 {
            return;
        }

        self.player_x += self.player_dx;
        if self.player_x <= 0 || self.player_x >= max_x {
            self.player_dx = -self.player_dx;
        }
        self.player_x = self.player_x.clamp(0, max_x);
        self.player_y = self.player_y.clamp(0, max_y);

        let black = pack_bgrx(0, 0, 0);
        let x0 = self.player_x as usize;
        for y in self.player_y..self.player_y + size {
            buffer.row_mut(y as u32)[x0..x0 + size as usize].fill(black);
        }
    }
}

impl Game for GameState {
    fn update_and_render(
        &mut self,
        buffer: &mut OffscreenBuffer<'_>,
        sound: &mut SoundBuffer<'_>,
        x_offset: i32,
        y_offset: i32,
    ) {
        self.output_sound(sound);
        self.render(buffer, x_offset, y_offset);
    }
}
