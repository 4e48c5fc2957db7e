use std::time::{Duration, Instant};

/// Timing for one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f64,

    /// Seconds of clamped time accumulated since the clock started.
    pub elapsed: f64,

    /// Frames per second over the last completed one-second window.
    pub fps: f64,

    pub now: Instant,

    pub frame_index: u64,
}

/// Produces [`FrameTime`] values, one per `tick`.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// feed a huge step into animations.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    elapsed: f64,
    dt_min: Duration,
    dt_max: Duration,

    fps: f64,
    fps_window_start: Instant,
    fps_window_frames: u32,
}

const FPS_WINDOW: Duration = Duration::from_secs(1);

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            last: now,
            frame_index: 0,
            elapsed: 0.0,
            dt_min,
            dt_max,
            fps: 0.0,
            fps_window_start: now,
            fps_window_frames: 0,
        }
    }

    /// Restarts delta measurement from now, e.g. after resuming.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.last = now;
        self.fps_window_start = now;
        self.fps_window_frames = 0;
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;
        self.elapsed += dt.as_secs_f64();

        self.fps_window_frames += 1;
        let window = now.saturating_duration_since(self.fps_window_start);
        if window >= FPS_WINDOW {
            self.fps = f64::from(self.fps_window_frames) / window.as_secs_f64();
            self.fps_window_start = now;
            self.fps_window_frames = 0;
        }

        let ft = FrameTime {
            dt: dt.as_secs_f64(),
            elapsed: self.elapsed,
            fps: self.fps,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
