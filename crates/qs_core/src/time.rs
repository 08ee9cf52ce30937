//! Fixed-timestep accumulator.
//!
//! The simulation advances in constant `fixed_dt_ms` slices regardless of how
//! fast the display callback fires: each frame the wall-clock delta is added
//! to `lag_ms`, and the drain loop consumes it one fixed step at a time. After
//! every drain `0 <= lag_ms < fixed_dt_ms` holds.
//!
//! Timestamps are supplied by the caller (milliseconds on any monotonic
//! clock), so the accumulator is testable without a real scheduler.

const FPS_SAMPLE_COUNT: usize = 60;

pub const DEFAULT_FIXED_DT_MS: f64 = 1000.0 / 60.0;
pub const DEFAULT_MAX_LAG_MS: f64 = 250.0;

pub struct TimeState {
    pub fixed_dt_ms: f64,
    pub max_lag_ms: f64,
    lag_ms: f64,
    previous_time_ms: f64,
    started: bool,
    /// Cooperative-cancellation flag. Once false no further steps are taken;
    /// the driver stops drawing and rescheduling. Terminal.
    pub alive: bool,
    pub real_dt_ms: f64,
    pub total_time_ms: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            fixed_dt_ms: DEFAULT_FIXED_DT_MS,
            max_lag_ms: DEFAULT_MAX_LAG_MS,
            lag_ms: 0.0,
            previous_time_ms: 0.0,
            started: false,
            alive: true,
            real_dt_ms: 0.0,
            total_time_ms: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            fps_samples: [DEFAULT_FIXED_DT_MS; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: DEFAULT_FIXED_DT_MS,
        }
    }

    /// Seed the clock at loop start. Time spent before this call (resource
    /// setup, waiting for the first frame) never lands in the accumulator.
    pub fn start(&mut self, now_ms: f64) {
        self.previous_time_ms = now_ms;
        self.started = true;
    }

    pub fn begin_frame(&mut self, now_ms: f64) {
        if !self.started {
            self.start(now_ms);
        }
        self.real_dt_ms = now_ms - self.previous_time_ms;
        self.previous_time_ms = now_ms;

        // Spiral-of-death cap
        if self.real_dt_ms > self.max_lag_ms {
            log::warn!(
                "Frame took {:.1}ms — capping accumulator to {}ms",
                self.real_dt_ms,
                self.max_lag_ms
            );
            self.real_dt_ms = self.max_lag_ms;
        }

        self.lag_ms += self.real_dt_ms;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        // FPS smoothing
        self.fps_samples[self.fps_sample_index] = self.real_dt_ms;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt;
        self.smoothed_fps = if avg_dt > 0.0 { 1000.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.alive && self.lag_ms >= self.fixed_dt_ms {
            self.lag_ms -= self.fixed_dt_ms;
            self.total_time_ms += self.fixed_dt_ms;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn stop(&mut self) {
        self.alive = false;
    }

    pub fn lag_ms(&self) -> f64 {
        self.lag_ms
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
