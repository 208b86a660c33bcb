use std::time::Instant;

/// Clock collaborator: a monotonic tick counter and a cycle counter.
pub trait TickSource {
    /// Ticks per second. Queried once when a clock is created.
    fn frequency(&self) -> u64;

    /// Current tick count. Never decreases on a well-behaved source.
    fn ticks(&self) -> u64;

    /// CPU cycle counter snapshot, or 0 when the platform has none.
    fn cycles(&self) -> u64;
}

/// Wall clock in nanoseconds since creation, plus the CPU timestamp counter
/// on x86_64.
#[derive(Debug, Clone)]
pub struct SystemTicks {
    origin: Instant,
}

impl SystemTicks {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemTicks {
    fn frequency(&self) -> u64 {
        1_000_000_000
    }

    fn ticks(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    fn cycles(&self) -> u64 {
        read_cycle_counter()
    }
}

#[cfg(target_arch = "x86_64")]
fn read_cycle_counter() -> u64 {
    // rdtsc has no preconditions; the unsafe marker depends on toolchain version.
    #[allow(unused_unsafe)]
    unsafe {
        std::arch::x86_64::_rdtsc()
    }
}

#[cfg(not(target_arch = "x86_64"))]
fn read_cycle_counter() -> u64 {
    0
}
