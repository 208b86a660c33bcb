use super::tick_source::{SystemTicks, TickSource};

/// Raw counter snapshot.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameInstant {
    pub ticks: u64,
    pub cycles: u64,
}

/// Time between two snapshots.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameElapsed {
    pub seconds: f64,
    pub cycles: u64,
}

impl FrameElapsed {
    pub fn metrics(&self) -> FrameMetrics {
        FrameMetrics {
            ms_per_frame: self.seconds * 1000.0,
            fps: (self.seconds > 0.0).then(|| 1.0 / self.seconds),
            megacycles_per_frame: self.cycles as f64 / 1_000_000.0,
        }
    }
}

/// Derived per-frame figures, for logging only.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameMetrics {
    pub ms_per_frame: f64,
    /// `None` when no time elapsed.
    pub fps: Option<f64>,
    pub megacycles_per_frame: f64,
}

/// Frame timing snapshot produced by [`FrameClock::tick`].
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous tick.
    pub elapsed: FrameElapsed,

    /// Counters sampled at this tick.
    pub now: FrameInstant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    pub fn metrics(&self) -> FrameMetrics {
        self.elapsed.metrics()
    }
}

/// Frame clock over a [`TickSource`].
///
/// Elapsed values are never negative: a counter that runs backwards between
/// two snapshots is reported as zero elapsed.
#[derive(Debug, Clone)]
pub struct FrameClock<T: TickSource = SystemTicks> {
    source: T,
    frequency: u64,
    last: FrameInstant,
    frame_index: u64,
}

impl FrameClock<SystemTicks> {
    pub fn new() -> Self {
        Self::with_source(SystemTicks::new())
    }
}

impl Default for FrameClock<SystemTicks> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TickSource> FrameClock<T> {
    /// Creates a clock and takes the first baseline.
    pub fn with_source(source: T) -> Self {
        let frequency = source.frequency().max(1);
        let mut clock = Self {
            source,
            frequency,
            last: FrameInstant::default(),
            frame_index: 0,
        };
        clock.last = clock.now();
        clock
    }

    /// Ticks per second, as queried at creation.
    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn now(&self) -> FrameInstant {
        FrameInstant {
            ticks: self.source.ticks(),
            cycles: self.source.cycles(),
        }
    }

    pub fn elapsed_since(&self, previous: FrameInstant, now: FrameInstant) -> FrameElapsed {
        FrameElapsed {
            seconds: now.ticks.saturating_sub(previous.ticks) as f64 / self.frequency as f64,
            cycles: now.cycles.saturating_sub(previous.cycles),
        }
    }

    /// Resets the baseline, e.g. after a long stall that should not count.
    pub fn reset(&mut self) {
        self.last = self.now();
    }

    /// Measures the time since the previous tick and advances the baseline.
    pub fn tick(&mut self) -> FrameTime {
        let now = self.now();
        let elapsed = self.elapsed_since(self.last, now);
        self.last = now;

        let ft = FrameTime {
            elapsed,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    /// Tick source whose counters are set by the test.
    #[derive(Clone)]
    struct ManualTicks {
        ticks: Rc<Cell<u64>>,
        cycles: Rc<Cell<u64>>,
    }

    impl ManualTicks {
        fn new() -> Self {
            Self {
                ticks: Rc::new(Cell::new(0)),
                cycles: Rc::new(Cell::new(0)),
            }
        }

        fn set(&self, ticks: u64, cycles: u64) {
            self.ticks.set(ticks);
            self.cycles.set(cycles);
        }
    }

    impl TickSource for ManualTicks {
        fn frequency(&self) -> u64 {
            1_000
        }

        fn ticks(&self) -> u64 {
            self.ticks.get()
        }

        fn cycles(&self) -> u64 {
            self.cycles.get()
        }
    }

    #[test]
    fn elapsed_uses_frequency() {
        let clock = FrameClock::with_source(ManualTicks::new());
        let a = FrameInstant { ticks: 1_000, cycles: 5_000_000 };
        let b = FrameInstant { ticks: 1_016, cycles: 9_000_000 };
        let e = clock.elapsed_since(a, b);
        assert!((e.seconds - 0.016).abs() < 1e-12);
        assert_eq!(e.cycles, 4_000_000);

        let m = e.metrics();
        assert!((m.ms_per_frame - 16.0).abs() < 1e-9);
        assert!((m.fps.unwrap() - 62.5).abs() < 1e-9);
        assert!((m.megacycles_per_frame - 4.0).abs() < 1e-12);
    }

    #[test]
    fn backward_jump_counts_as_zero() {
        let clock = FrameClock::with_source(ManualTicks::new());
        let a = FrameInstant { ticks: 500, cycles: 500 };
        let b = FrameInstant { ticks: 400, cycles: 100 };
        let e = clock.elapsed_since(a, b);
        assert_eq!(e.seconds, 0.0);
        assert_eq!(e.cycles, 0);
        assert_eq!(e.metrics().fps, None);
    }

    #[test]
    fn tick_advances_baseline_and_index() {
        let src = ManualTicks::new();
        let mut clock = FrameClock::with_source(src.clone());

        src.set(20, 100);
        let first = clock.tick();
        assert_eq!(first.frame_index, 0);
        assert!((first.elapsed.seconds - 0.020).abs() < 1e-12);

        src.set(50, 400);
        let second = clock.tick();
        assert_eq!(second.frame_index, 1);
        assert!((second.elapsed.seconds - 0.030).abs() < 1e-12);
        assert_eq!(second.elapsed.cycles, 300);
    }

    #[test]
    fn reset_discards_pending_time() {
        let src = ManualTicks::new();
        let mut clock = FrameClock::with_source(src.clone());
        src.set(10_000, 0);
        clock.reset();
        src.set(10_005, 0);
        assert!((clock.tick().elapsed.seconds - 0.005).abs() < 1e-12);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = FrameClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(clock.elapsed_since(a, b).seconds >= 0.0);
        assert_eq!(clock.frequency(), 1_000_000_000);
    }
}
