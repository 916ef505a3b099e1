use std::time::{Duration, Instant};

/// Length of the window FPS is averaged over.
const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds. Never negative.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Monotonic frame clock.
///
/// The baseline for the first tick is the instant the clock was created, so the
/// first delta reflects real time elapsed since construction rather than zero.
///
/// Deltas are raw by default. [`FrameClock::with_clamps`] opts into clamping for
/// callers that drive simulations and want to survive debugger pauses.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    clamps: Option<(Duration, Duration)>,

    fps_window_start: Instant,
    fps_window_frames: u32,
    fps: f32,
}

impl FrameClock {
    /// Creates a clock whose baseline is now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock with an explicit baseline.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last: start,
            frame_index: 0,
            clamps: None,
            fps_window_start: start,
            fps_window_frames: 0,
            fps: 0.0,
        }
    }

    /// Clamps every subsequent delta to `[dt_min, dt_max]`.
    pub fn with_clamps(mut self, dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        self.clamps = Some((dt_min, dt_max));
        self
    }

    /// Resets the delta baseline. Elapsed time since creation is unaffected.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    ///
    /// An instant earlier than the previous tick yields a zero delta.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let mut dt = now.saturating_duration_since(self.last);

        if let Some((dt_min, dt_max)) = self.clamps {
            dt = dt.clamp(dt_min, dt_max);
        }

        self.last = now.max(self.last);
        self.update_fps(now);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }

    /// Instant of the previous tick, or the creation instant before the first tick.
    pub fn last_tick(&self) -> Instant {
        self.last
    }

    /// Seconds since the clock was created.
    pub fn elapsed(&self) -> f64 {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_at(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.start).as_secs_f64()
    }

    /// Frames per second over the last completed averaging window.
    ///
    /// Zero until the first window completes.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    fn update_fps(&mut self, now: Instant) {
        self.fps_window_frames += 1;

        let window = now.saturating_duration_since(self.fps_window_start);
        if window >= FPS_WINDOW {
            self.fps = self.fps_window_frames as f32 / window.as_secs_f32();
            self.fps_window_frames = 0;
            self.fps_window_start = now;
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
