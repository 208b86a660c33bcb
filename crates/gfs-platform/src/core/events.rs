use std::collections::VecDeque;

/// Events the platform delivers to the frame driver.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PlatformEvent {
    /// The client area changed size; the pixel surface follows it.
    Resize { width: u32, height: u32 },
    /// The user asked to quit.
    Stop,
}

/// Source of platform events, drained once at the start of every frame.
pub trait EventSource {
    /// Appends every pending event to `out`, oldest first.
    fn poll_events(&mut self, out: &mut Vec<PlatformEvent>);
}

/// Buffered event source.
///
/// The windowing runtime pushes into it between frames; the driver drains it.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<PlatformEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PlatformEvent) {
        // Consecutive resizes collapse into the latest one.
        let collapses = matches!(
            (self.pending.back(), &event),
            (Some(PlatformEvent::Resize { .. }), PlatformEvent::Resize { .. })
        );
        if collapses {
            self.pending.pop_back();
        }
        self.pending.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl EventSource for EventQueue {
    fn poll_events(&mut self, out: &mut Vec<PlatformEvent>) {
        out.extend(self.pending.drain(..));
    }
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn poll_events(&mut self, out: &mut Vec<PlatformEvent>) {
        (**self).poll_events(out)
    }
}
