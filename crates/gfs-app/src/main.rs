use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use gfs_game::GameState;
use gfs_platform::audio::{AudioConfig, AudioFormat, HeadlessDevice};
use gfs_platform::core::{DriverConfig, EventSource, FrameDriver, FrameStats, PlatformEvent};
use gfs_platform::logging::{init_logging, LoggingConfig};
use gfs_platform::surface::SoftwarePresenter;
use gfs_platform::time::SystemTicks;
use gfs_platform::window::{LogicalSize, Runtime, RuntimeConfig};

#[derive(Debug, Parser)]
#[command(name = "gfs", version, about = "Platform/game split frame loop")]
struct Args {
    /// Run without a window or sound card for a fixed number of frames.
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode.
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u64).range(1..))]
    frames: u64,

    /// Pixel surface (and initial window) width.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Pixel surface (and initial window) height.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Requested audio sample rate in Hz.
    #[arg(long, default_value_t = 48_000)]
    sample_rate: u32,

    /// Log filter in env_logger syntax; overrides RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

impl Args {
    fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            surface_width: self.width,
            surface_height: self.height,
            audio: AudioConfig {
                samples_per_second: self.sample_rate,
                ..AudioConfig::default()
            },
            ..DriverConfig::default()
        }
    }
}

/// Event source for headless runs: paces frames to a fixed rate and asks
/// to stop once the frame budget is spent.
struct HeadlessEvents {
    remaining: u64,
    frame_interval: Duration,
    last_frame: Option<Instant>,
}

impl HeadlessEvents {
    fn new(frames: u64, frames_per_second: u32) -> Self {
        Self {
            remaining: frames,
            frame_interval: Duration::from_secs(1) / frames_per_second.max(1),
            last_frame: None,
        }
    }
}

impl EventSource for HeadlessEvents {
    fn poll_events(&mut self, out: &mut Vec<PlatformEvent>) {
        if let Some(last) = self.last_frame {
            let spent = last.elapsed();
            if spent < self.frame_interval {
                std::thread::sleep(self.frame_interval - spent);
            }
        }
        self.last_frame = Some(Instant::now());

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            out.push(PlatformEvent::Stop);
        }
    }
}

fn run_headless(args: &Args) -> Result<FrameStats> {
    let config = args.driver_config();
    let format = AudioFormat::stereo_i16(config.audio.samples_per_second);
    let device = HeadlessDevice::new(format, config.audio.capacity_bytes(format));

    let mut driver = FrameDriver::new(config, GameState::new(), device, SystemTicks::new())
        .context("failed to start the headless frame driver")?;

    let mut events = HeadlessEvents::new(args.frames, 60);
    let mut presenter = SoftwarePresenter::new(args.width, args.height);

    driver.begin();
    driver.run(&mut events, &mut presenter);
    log::info!("headless run presented {} frames", presenter.presented_frames());
    Ok(driver.shutdown())
}

fn run_windowed(args: &Args) -> Result<FrameStats> {
    let config = RuntimeConfig {
        initial_size: LogicalSize::new(args.width as f64, args.height as f64),
        driver: args.driver_config(),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GameState::new())
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let stats = if args.headless {
        run_headless(&args)?
    } else {
        run_windowed(&args)?
    };

    log::info!(
        "{} frames, {} samples written, {} audio frames skipped, {} underruns",
        stats.frames,
        stats.samples_written,
        stats.audio_skipped,
        stats.underruns,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_map_to_driver_config() {
        let args = Args::parse_from(["gfs", "--width", "320", "--height", "200", "--sample-rate", "44100"]);
        let cfg = args.driver_config();
        assert_eq!((cfg.surface_width, cfg.surface_height), (320, 200));
        assert_eq!(cfg.audio.samples_per_second, 44_100);
        assert_eq!(cfg.audio.latency_divisor, 15);
        assert!(!args.headless);
    }

    #[test]
    fn zero_frames_is_rejected() {
        assert!(Args::try_parse_from(["gfs", "--headless", "--frames", "0"]).is_err());
    }

    #[test]
    fn headless_events_stop_after_budget() {
        let mut events = HeadlessEvents::new(3, 10_000);
        let mut out = Vec::new();
        events.poll_events(&mut out);
        events.poll_events(&mut out);
        assert!(out.is_empty());
        events.poll_events(&mut out);
        assert_eq!(out, vec![PlatformEvent::Stop]);
    }

    #[test]
    fn headless_run_writes_audio_and_stops() {
        let args = Args::parse_from(["gfs", "--headless", "--frames", "5", "--width", "64", "--height", "48"]);
        let stats = run_headless(&args).unwrap();
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.audio_skipped, 0);
        assert!(stats.samples_written > 0);
    }
}
