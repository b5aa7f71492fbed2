//! Fixed-rate frame scheduling

use std::time::{Duration, Instant};

/// A request to render one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRequest {
    pub index: u64,
    /// Time since the previous frame was requested
    pub delta: Duration,
}

/// Produces frame requests at a fixed target rate.
#[derive(Debug)]
pub struct FrameScheduler {
    interval: Duration,
    next_index: u64,
    last_request: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            next_index: 0,
            last_request: None,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.interval
    }

    /// How long to wait at `now` before the next frame is due
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match self.last_request {
            Some(last) => (last + self.interval).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Record a frame request issued at `now`
    pub fn request_at(&mut self, now: Instant) -> FrameRequest {
        let delta = match self.last_request {
            Some(last) => now.saturating_duration_since(last),
            None => self.interval,
        };
        let request = FrameRequest {
            index: self.next_index,
            delta,
        };
        self.next_index += 1;
        self.last_request = Some(now);
        request
    }

    /// Sleep until the next tick is due, then issue its request
    pub fn next_frame(&mut self) -> FrameRequest {
        let wait = self.time_until_next(Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        self.request_at(Instant::now())
    }
}

/// Rolling frames-per-second measurement.
#[derive(Debug)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            window_start: None,
            frames: 0,
            fps: 0.0,
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Count a frame. Returns the new rate once at least a second has passed.
    pub fn record(&mut self, now: Instant) -> Option<f32> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;

        let elapsed = now.saturating_duration_since(start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }

        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = Some(now);
        Some(self.fps)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_fps() {
        assert_eq!(FrameScheduler::new(50).frame_interval(), Duration::from_millis(20));
        // Zero fps is clamped to one frame per second
        assert_eq!(FrameScheduler::new(0).frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_requests_are_numbered_with_deltas() {
        let mut scheduler = FrameScheduler::new(10);
        let t0 = Instant::now();

        let first = scheduler.request_at(t0);
        assert_eq!(first.index, 0);
        assert_eq!(first.delta, Duration::from_millis(100));

        let second = scheduler.request_at(t0 + Duration::from_millis(130));
        assert_eq!(second.index, 1);
        assert_eq!(second.delta, Duration::from_millis(130));
    }

    #[test]
    fn test_time_until_next() {
        let mut scheduler = FrameScheduler::new(10);
        let t0 = Instant::now();
        assert_eq!(scheduler.time_until_next(t0), Duration::ZERO);

        scheduler.request_at(t0);
        assert_eq!(
            scheduler.time_until_next(t0 + Duration::from_millis(40)),
            Duration::from_millis(60)
        );
        assert_eq!(
            scheduler.time_until_next(t0 + Duration::from_millis(250)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_fps_counter_reports_each_second() {
        let mut counter = FpsCounter::new();
        let t0 = Instant::now();
        for i in 0..30 {
            assert!(counter.record(t0 + Duration::from_millis(i * 33)).is_none());
        }
        let fps = counter.record(t0 + Duration::from_secs(1)).unwrap();
        assert!((fps - 31.0).abs() < 1e-3);
        assert_eq!(counter.fps(), fps);
    }
}
