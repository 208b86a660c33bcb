use crate::audio::{AudioConfig, AudioDevice, AudioRing, WriteWindow};
use crate::error::{AudioError, PlatformError};
use crate::surface::{PixelSurface, PresentOutcome, Presenter};
use crate::time::{FrameClock, FrameMetrics, FrameTime, SystemTicks, TickSource};

use super::app::{AppControl, Game, SoundBuffer};
use super::events::{EventSource, PlatformEvent};

/// Frame driver configuration.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Size of the pixel surface until the first resize event.
    pub surface_width: u32,
    pub surface_height: u32,

    pub audio: AudioConfig,

    /// Frames between debug-level metric lines; 0 disables them.
    pub metrics_log_interval: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            surface_width: 1280,
            surface_height: 720,
            audio: AudioConfig::default(),
            metrics_log_interval: 120,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriverState {
    Initializing,
    Running,
    ShuttingDown,
}

/// Counters accumulated over the driver's lifetime.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub samples_written: u64,
    /// Frames that produced no audio (cursor query or lock failed).
    pub audio_skipped: u64,
    /// Frames whose write window already contained the play cursor.
    pub underruns: u64,
    pub surface_failures: u64,
}

/// What happened during one [`FrameDriver::step`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub control: AppControl,
    /// `None` when audio was skipped this frame.
    pub window: Option<WriteWindow>,
    /// Samples handed to the game.
    pub samples_requested: usize,
    /// Samples that reached the device ring.
    pub samples_written: usize,
    pub present: Option<PresentOutcome>,
    pub metrics: Option<FrameMetrics>,
}

impl FrameReport {
    fn exit() -> Self {
        Self {
            control: AppControl::Exit,
            window: None,
            samples_requested: 0,
            samples_written: 0,
            present: None,
            metrics: None,
        }
    }
}

/// Per-frame orchestration between the platform and the game.
///
/// Owns the pixel surface, the audio ring bookkeeping, the sample scratch
/// buffer and the frame clock. Every [`step`](Self::step) runs the frame in
/// a fixed order: events, audio window, game, audio flush, present, timing.
pub struct FrameDriver<G, A, T = SystemTicks>
where
    G: Game,
    A: AudioDevice,
    T: TickSource,
{
    config: DriverConfig,
    state: DriverState,

    game: G,
    device: A,
    ring: AudioRing,
    surface: PixelSurface,

    // One ring's worth of interleaved samples; each frame uses a prefix.
    scratch: Vec<i16>,

    clock: FrameClock<T>,
    events: Vec<PlatformEvent>,
    stats: FrameStats,

    x_offset: i32,
    y_offset: i32,

    audio_ok: bool,
    playback_started: bool,
    released: bool,
}

impl<G, A, T> FrameDriver<G, A, T>
where
    G: Game,
    A: AudioDevice,
    T: TickSource,
{
    /// Sets up the surface, the ring and the scratch buffer.
    ///
    /// The driver stays in [`DriverState::Initializing`] and the device stays
    /// stopped until [`begin`](Self::begin), so slow window or GPU setup in
    /// between does not let the play cursor run ahead of the ring.
    pub fn new(config: DriverConfig, game: G, device: A, ticks: T) -> Result<Self, PlatformError> {
        let format = device.format();
        if !format.is_stereo_i16() {
            return Err(PlatformError::Config(format!(
                "frame driver needs stereo 16-bit audio, device opened {} channel(s) x {} byte(s)",
                format.channels, format.bytes_per_channel_sample,
            )));
        }

        let ring = AudioRing::from_config(&config.audio, format, device.capacity_bytes())?;
        let surface = PixelSurface::new(config.surface_width, config.surface_height)?;
        let scratch = vec![0i16; ring.capacity_bytes() / std::mem::size_of::<i16>()];

        Ok(Self {
            config,
            state: DriverState::Initializing,
            game,
            device,
            ring,
            surface,
            scratch,
            clock: FrameClock::with_source(ticks),
            events: Vec::new(),
            stats: FrameStats::default(),
            x_offset: 0,
            y_offset: 0,
            audio_ok: true,
            playback_started: false,
            released: false,
        })
    }

    /// Silences the device ring, starts playback, resets the clock and enters
    /// [`DriverState::Running`].
    ///
    /// Call once the window exists, right before the first frame. Does
    /// nothing outside `Initializing`. A device that fails to start is
    /// logged and the driver still runs; every frame then skips audio.
    pub fn begin(&mut self) {
        if self.state != DriverState::Initializing {
            return;
        }

        self.start_audio();
        self.clock.reset();
        self.state = DriverState::Running;

        let format = self.ring.format();
        log::info!(
            "frame driver running: surface {}x{}, audio {} Hz, ring {} bytes, latency {} samples",
            self.surface.width(),
            self.surface.height(),
            format.samples_per_second,
            self.ring.capacity_bytes(),
            self.ring.latency_samples(),
        );
    }

    fn start_audio(&mut self) {
        if let Err(e) = self.ring.silence_all(&mut self.device) {
            log::warn!("cannot silence audio ring: {e}");
        }
        match self.device.play() {
            Ok(()) => self.playback_started = true,
            Err(e) => {
                log::warn!("audio playback not started: {e}; frames will run without sound");
                self.audio_ok = false;
            }
        }
    }

    /// Whether the device accepted the request to start playback.
    pub fn playback_started(&self) -> bool {
        self.playback_started
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    pub fn ring(&self) -> &AudioRing {
        &self.ring
    }

    pub fn device(&self) -> &A {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut A {
        &mut self.device
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Debug animation offsets passed to the game next frame.
    pub fn offsets(&self) -> (i32, i32) {
        (self.x_offset, self.y_offset)
    }

    /// Runs one frame.
    ///
    /// Begins the driver first if [`begin`](Self::begin) was not called.
    /// A `Stop` event (or a presenter that lost its output) still completes
    /// the frame; the report then carries [`AppControl::Exit`] and later
    /// calls do nothing.
    pub fn step<E, P>(&mut self, events: &mut E, presenter: &mut P) -> FrameReport
    where
        E: EventSource + ?Sized,
        P: Presenter + ?Sized,
    {
        self.begin();
        if self.state != DriverState::Running {
            return FrameReport::exit();
        }

        let stop = self.drain_events(events);

        let window = self.query_write_window();

        let format = self.ring.format();
        let sample_count = window.map_or(0, |w| w.sample_count(self.ring.bytes_per_sample()));
        let sample_len = sample_count * format.channels as usize;
        {
            let mut buffer = self.surface.view_mut();
            let mut sound = SoundBuffer::new(&mut self.scratch[..sample_len], format.samples_per_second);
            self.game
                .update_and_render(&mut buffer, &mut sound, self.x_offset, self.y_offset);
        }

        let samples_written = match &window {
            Some(w) => self.flush_audio(w, sample_len),
            None => 0,
        };

        let outcome = presenter.present(&self.surface);
        if outcome == PresentOutcome::Reconfigured {
            log::debug!("presenter reconfigured its output");
        }

        let time = self.clock.tick();
        self.stats.frames += 1;
        self.log_frame(&time, sample_count);

        self.x_offset = self.x_offset.wrapping_add(1);

        if outcome == PresentOutcome::Fatal {
            log::error!("presenter lost its output; shutting down");
            self.state = DriverState::ShuttingDown;
        }
        if stop {
            log::info!("stop requested after frame {}", time.frame_index);
            self.state = DriverState::ShuttingDown;
        }

        FrameReport {
            control: match self.state {
                DriverState::Running => AppControl::Continue,
                _ => AppControl::Exit,
            },
            window,
            samples_requested: sample_count,
            samples_written,
            present: Some(outcome),
            metrics: Some(time.metrics()),
        }
    }

    /// Steps until a frame asks to exit. Returns the accumulated stats.
    pub fn run<E, P>(&mut self, events: &mut E, presenter: &mut P) -> FrameStats
    where
        E: EventSource + ?Sized,
        P: Presenter + ?Sized,
    {
        while self.step(events, presenter).control == AppControl::Continue {}
        self.stats
    }

    /// Releases the surface and scratch memory and logs the final stats.
    ///
    /// Safe to call more than once.
    pub fn shutdown(&mut self) -> FrameStats {
        self.state = DriverState::ShuttingDown;
        if !self.released {
            self.released = true;
            self.surface.release();
            self.scratch = Vec::new();

            let s = &self.stats;
            log::info!(
                "frame driver stopped: {} frames, {} samples written, {} audio frames skipped, {} underruns",
                s.frames,
                s.samples_written,
                s.audio_skipped,
                s.underruns,
            );
        }
        self.stats
    }

    /// Drains pending events. Returns `true` if a stop was requested.
    fn drain_events<E>(&mut self, source: &mut E) -> bool
    where
        E: EventSource + ?Sized,
    {
        let mut events = std::mem::take(&mut self.events);
        source.poll_events(&mut events);

        let mut stop = false;
        for event in events.drain(..) {
            match event {
                PlatformEvent::Resize { width, height } => self.resize_surface(width, height),
                PlatformEvent::Stop => stop = true,
            }
        }

        self.events = events;
        stop
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        if self.surface.is_available()
            && self.surface.width() == width
            && self.surface.height() == height
        {
            return;
        }

        if let Err(e) = self.surface.resize(width, height) {
            self.stats.surface_failures += 1;
            log::warn!("{e}; frames render without pixels until the next resize");
        }
    }

    fn query_write_window(&mut self) -> Option<WriteWindow> {
        match self.device.cursors() {
            Ok(cursors) => {
                if !self.audio_ok {
                    // A device that never started has nothing to recover.
                    if self.playback_started {
                        log::info!("audio output available again");
                    }
                    self.audio_ok = true;
                }

                let window = self.ring.compute_write_window(cursors);
                if window.overlaps_play_cursor {
                    self.stats.underruns += 1;
                    log::debug!(
                        "audio underrun: play cursor {} inside write window at {} (+{} bytes)",
                        cursors.play,
                        window.lock_offset,
                        window.bytes_to_write,
                    );
                }
                Some(window)
            }
            Err(e) => {
                self.skip_audio(&e);
                None
            }
        }
    }

    fn flush_audio(&mut self, window: &WriteWindow, sample_len: usize) -> usize {
        let source: &[u8] = bytemuck::cast_slice(&self.scratch[..sample_len]);
        match self.ring.write_samples(&mut self.device, window, source) {
            Ok(written) => {
                self.stats.samples_written += written as u64;
                written
            }
            Err(e) => {
                self.skip_audio(&e);
                0
            }
        }
    }

    // Warn on the first failure of a run, debug afterwards.
    fn skip_audio(&mut self, err: &AudioError) {
        self.stats.audio_skipped += 1;
        if self.audio_ok {
            log::warn!("skipping audio: {err}");
            self.audio_ok = false;
        } else {
            log::debug!("skipping audio: {err}");
        }
    }

    fn log_frame(&self, time: &FrameTime, sample_count: usize) {
        let interval = self.config.metrics_log_interval;
        let periodic = interval > 0 && time.frame_index % interval == 0;
        if !periodic && !log::log_enabled!(log::Level::Trace) {
            return;
        }

        let m = time.metrics();
        let fps = m.fps.map_or_else(|| "-".to_string(), |f| format!("{f:.1}"));
        let line = format!(
            "frame {}: {:.2} ms, {fps} fps, {:.2} Mc/f, {sample_count} samples",
            time.frame_index, m.ms_per_frame, m.megacycles_per_frame,
        );

        if periodic {
            log::debug!("{line}");
        } else {
            log::trace!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::test_device::ScriptedDevice;
    use crate::audio::{AudioFormat, NullDevice};
    use crate::core::EventQueue;
    use crate::surface::{OffscreenBuffer, SoftwarePresenter};

    #[derive(Default)]
    struct RecordingGame {
        calls: u32,
        sample_counts: Vec<usize>,
        sizes: Vec<(u32, u32)>,
        offsets: Vec<(i32, i32)>,
    }

    impl Game for RecordingGame {
        fn update_and_render(
            &mut self,
            buffer: &mut OffscreenBuffer<'_>,
            sound: &mut SoundBuffer<'_>,
            x_offset: i32,
            y_offset: i32,
        ) {
            self.calls += 1;
            self.sample_counts.push(sound.sample_count);
            self.sizes.push((buffer.width, buffer.height));
            self.offsets.push((x_offset, y_offset));

            buffer.pixels.fill(0x00AB_CDEF);
            for (i, s) in sound.samples.iter_mut().enumerate() {
                *s = (i % 100) as i16 + 1;
            }
        }
    }

    struct RecordingPresenter {
        outcomes: Vec<PresentOutcome>,
        presented: u32,
        next: PresentOutcome,
    }

    impl RecordingPresenter {
        fn new() -> Self {
            Self {
                outcomes: Vec::new(),
                presented: 0,
                next: PresentOutcome::Presented,
            }
        }
    }

    impl Presenter for RecordingPresenter {
        fn present(&mut self, _surface: &PixelSurface) -> PresentOutcome {
            self.presented += 1;
            self.outcomes.push(self.next);
            self.next
        }
    }

    struct StepTicks;

    impl TickSource for StepTicks {
        fn frequency(&self) -> u64 {
            1_000
        }

        fn ticks(&self) -> u64 {
            0
        }

        fn cycles(&self) -> u64 {
            0
        }
    }

    // 4000-byte ring, latency 100 samples = 400 bytes.
    fn config() -> DriverConfig {
        DriverConfig {
            surface_width: 32,
            surface_height: 16,
            audio: AudioConfig {
                samples_per_second: 1_000,
                latency_divisor: 10,
                ..AudioConfig::default()
            },
            metrics_log_interval: 0,
        }
    }

    fn driver() -> FrameDriver<RecordingGame, ScriptedDevice, StepTicks> {
        let device = ScriptedDevice::new(AudioFormat::stereo_i16(1_000), 4_000);
        let mut d = FrameDriver::new(config(), RecordingGame::default(), device, StepTicks).unwrap();
        d.begin();
        d
    }

    #[test]
    fn new_waits_for_begin_before_starting_playback() {
        let mut device = ScriptedDevice::new(AudioFormat::stereo_i16(1_000), 4_000);
        device.fill_ring(0x55);
        let mut d = FrameDriver::new(config(), RecordingGame::default(), device, StepTicks).unwrap();

        assert_eq!(d.state(), DriverState::Initializing);
        assert!(!d.device().playing);
        assert!(d.device().ring().as_bytes().iter().all(|&b| b == 0x55));
        assert_eq!((d.surface().width(), d.surface().height()), (32, 16));
        assert_eq!(d.ring().latency_samples(), 100);

        d.begin();
        assert_eq!(d.state(), DriverState::Running);
        assert!(d.device().playing);
        assert!(d.playback_started());
        assert!(d.device().ring().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn begin_runs_once() {
        let mut d = driver();
        d.begin();
        d.device_mut().fill_ring(0x11);
        d.begin();
        assert!(d.device().ring().as_bytes().iter().all(|&b| b == 0x11));
    }

    #[test]
    fn step_begins_an_initializing_driver() {
        let device = ScriptedDevice::new(AudioFormat::stereo_i16(1_000), 4_000);
        let mut d = FrameDriver::new(config(), RecordingGame::default(), device, StepTicks).unwrap();
        let mut events = EventQueue::new();
        let mut presenter = RecordingPresenter::new();

        let report = d.step(&mut events, &mut presenter);
        assert_eq!(report.control, AppControl::Continue);
        assert!(d.device().playing);
        assert_eq!(d.game().calls, 1);
    }

    #[test]
    fn failed_playback_is_not_reported_as_recovered() {
        let mut device = ScriptedDevice::new(AudioFormat::stereo_i16(1_000), 4_000);
        device.fail_next_play();
        let mut d = FrameDriver::new(config(), RecordingGame::default(), device, StepTicks).unwrap();
        d.begin();
        assert_eq!(d.state(), DriverState::Running);
        assert!(!d.playback_started());

        let mut events = EventQueue::new();
        let mut presenter = RecordingPresenter::new();
        let report = d.step(&mut events, &mut presenter);
        assert!(report.window.is_some());
        assert!(!d.playback_started());
    }

    #[test]
    fn new_rejects_non_stereo_devices() {
        let format = AudioFormat {
            samples_per_second: 1_000,
            channels: 1,
            bytes_per_channel_sample: 2,
        };
        let device = ScriptedDevice::new(format, 4_000);
        let err = FrameDriver::new(config(), RecordingGame::default(), device, StepTicks);
        assert!(matches!(err, Err(PlatformError::Config(_))));
    }

    #[test]
    fn step_runs_game_once_and_writes_window() {
        let mut d = driver();
        let mut events = EventQueue::new();
        let mut presenter = RecordingPresenter::new();

        let report = d.step(&mut events, &mut presenter);
        assert_eq!(report.control, AppControl::Continue);
        assert_eq!(report.window.map(|w| w.bytes_to_write), Some(400));
        assert_eq!(report.samples_requested, 100);
        assert_eq!(report.samples_written, 100);
        assert_eq!(report.present, Some(PresentOutcome::Presented));

        assert_eq!(d.game().calls, 1);
        assert_eq!(presenter.presented, 1);
        assert_eq!(d.ring().running_sample_index(), 100);

        // First sample pair the game wrote is 1, 2 in native order.
        let bytes = d.device().ring().as_bytes();
        assert_eq!(&bytes[..4], bytemuck::cast_slice::<i16, u8>(&[1, 2]));
        assert!(bytes[400..].iter().all(|&b| b == 0));
        assert!(d.surface().pixels().iter().all(|&p| p == 0x00AB_CDEF));
    }

    #[test]
    fn running_index_matches_sum_of_frame_writes() {
        let mut d = driver();
        let mut events = EventQueue::new();
        let mut presenter = RecordingPresenter::new();

        let mut total = 0u64;
        for play_at in [0usize, 160, 320, 800, 2_000, 3_600, 400, 1_200] {
            d.device_mut().set_play_cursor(play_at);
            let report = d.step(&mut events, &mut presenter);
            assert_eq!(report.samples_written, report.samples_requested);
            total += report.samples_written as u64;
            assert_eq!(d.ring().running_sample_index(), total);
        }
        assert_eq!(d.stats().samples_written, total);
        assert_eq!(d.game().sample_counts.iter().sum::<usize>() as u64, total);
    }

    #[test]
    fn query_failure_still_runs_game_with_no_samples() {
        let mut d = driver();
        let mut events = EventQueue::new();
        let mut presenter = RecordingPresenter::new();

        d.device_mut().fail_next_query();
        let locks_before = d.device().lock_calls;
        let report = d.step(&mut events, &mut presenter);

        assert_eq!(report.window, None);
        assert_eq!(report.samples_requested, 0);
        assert_eq!(d.game().calls, 1);
        assert_eq!(d.game().sample_counts, vec![0]);
        assert_eq!(d.device().lock_calls, locks_before);
        assert_eq!(d.ring().running_sample_index(), 0);
        assert_eq!(d.stats().audio_skipped, 1);
        assert_eq!(presenter.presented, 1);

        // Next frame recovers.
        let report = d.step(&mut events, &mut presenter);
        assert_eq!(report.samples_written, 100);
    }

    #[test]
    fn lock_failure_skips_audio_for_the_frame() {
        let mut d = driver();
        let mut events = EventQueue::new();
        let mut presenter = RecordingPresenter::new();

        d.device_mut().fail_next_lock();
        let report = d.step(&mut events, &mut presenter);
        assert!(report.window.is_some());
        assert_eq!(report.samples_requested, 100);
        assert_eq!(report.samples_written, 0);
        assert_eq!(d.ring().running_sample_index(), 0);
        assert_eq!(d.stats().audio_skipped, 1);
    }

    #[test]
    fn null_device_runs_without_audio() {
        let device = NullDevice::new(AudioFormat::stereo_i16(1_000), 4_000);
        let mut d = FrameDriver::new(config(), RecordingGame::default(), device, StepTicks).unwrap();
        let mut events = EventQueue::new();
        let mut presenter = RecordingPresenter::new();

        for _ in 0..3 {
            let report = d.step(&mut events, &mut presenter);
            assert_eq!(report.control, AppControl::Continue);
            assert_eq!(report.samples_requested, 0);
        }
        assert_eq!(d.stats().audio_skipped, 3);
        assert_eq!(d.game().calls, 3);
    }

    #[test]
    fn stop_completes_frame_then_exits() {
        let mut d = driver();
        let mut events = EventQueue::new();
        let mut presenter = RecordingPresenter::new();

        events.push(PlatformEvent::Stop);
        let report = d.step(&mut events, &mut presenter);
        assert_eq!(report.control, AppControl::Exit);
        assert_eq!(d.game().calls, 1);
        assert_eq!(presenter.presented, 1);
        assert_eq!(d.state(), DriverState::ShuttingDown);

        let report = d.step(&mut events, &mut presenter);
        assert_eq!(report, FrameReport::exit());
        assert_eq!(d.game().calls, 1);
        assert_eq!(presenter.presented, 1);
    }

    #[test]
    fn fatal_present_shuts_down() {
        let mut d = driver();
        let mut events = EventQueue::new();
        let mut presenter = RecordingPresenter::new();
        presenter.next = PresentOutcome::Fatal;

        assert_eq!(d.run(&mut events, &mut presenter).frames, 1);
        assert_eq!(d.state(), DriverState::ShuttingDown);
    }

    #[test]
    fn resize_is_applied_before_the_game_runs() {
        let mut d = driver();
        let mut events = EventQueue::new();
        let mut presenter = SoftwarePresenter::new(8, 8);

        events.push(PlatformEvent::Resize { width: 64, height: 48 });
        d.step(&mut events, &mut presenter);
        assert_eq!(d.game().sizes, vec![(64, 48)]);
        assert_eq!(d.surface().stride(), 256);
        assert_eq!(presenter.presented_frames(), 1);
    }

    #[test]
    fn zero_area_resize_keeps_the_loop_running() {
        let mut d = driver();
        let mut events = EventQueue::new();
        let mut presenter = SoftwarePresenter::new(8, 8);

        events.push(PlatformEvent::Resize { width: 0, height: 48 });
        let report = d.step(&mut events, &mut presenter);
        assert_eq!(report.control, AppControl::Continue);
        assert_eq!(report.present, Some(PresentOutcome::Skipped));
        assert_eq!(d.game().sizes, vec![(0, 48)]);
        assert_eq!(presenter.presented_frames(), 0);
    }

    #[test]
    fn allocation_failure_produces_frames_with_an_empty_view() {
        let mut d = driver();
        let mut events = EventQueue::new();
        let mut presenter = RecordingPresenter::new();

        events.push(PlatformEvent::Resize { width: u32::MAX, height: u32::MAX });
        let report = d.step(&mut events, &mut presenter);
        assert_eq!(report.control, AppControl::Continue);
        assert!(!d.surface().is_available());
        assert_eq!(d.game().sizes, vec![(0, 0)]);
        assert_eq!(d.stats().surface_failures, 1);

        events.push(PlatformEvent::Resize { width: 10, height: 10 });
        d.step(&mut events, &mut presenter);
        assert!(d.surface().is_available());
        assert_eq!(d.game().sizes[1], (10, 10));
    }

    #[test]
    fn x_offset_advances_once_per_frame() {
        let mut d = driver();
        let mut events = EventQueue::new();
        let mut presenter = RecordingPresenter::new();

        for _ in 0..3 {
            d.step(&mut events, &mut presenter);
        }
        assert_eq!(d.game().offsets, vec![(0, 0), (1, 0), (2, 0)]);
        assert_eq!(d.offsets(), (3, 0));
    }

    #[test]
    fn shutdown_releases_memory_once() {
        let mut d = driver();
        let mut events = EventQueue::new();
        let mut presenter = RecordingPresenter::new();
        d.step(&mut events, &mut presenter);

        let stats = d.shutdown();
        assert_eq!(stats.frames, 1);
        assert!(!d.surface().is_available());
        assert_eq!(d.shutdown(), stats);
        assert_eq!(d.step(&mut events, &mut presenter).control, AppControl::Exit);
    }
}
