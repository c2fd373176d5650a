//! FPS and frame time tracking.

use jovian_panel::FrameTiming;

/// Averaging window for the reported FPS.
const FPS_WINDOW_SECS: f64 = 0.5;

/// Per-frame timing with a windowed FPS average and a periodic log cue.
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_count: u64,
    window_elapsed: f64,
    window_frames: u32,
    fps: f64,
    frame_time_ms: f64,
    since_log: f64,
    log_interval: f64,
}

impl FrameStats {
    /// `log_interval_secs` of 0 or less disables the log cue.
    pub fn new(log_interval_secs: f32) -> Self {
        Self {
            frame_count: 0,
            window_elapsed: 0.0,
            window_frames: 0,
            fps: 0.0,
            frame_time_ms: 0.0,
            since_log: 0.0,
            log_interval: log_interval_secs as f64,
        }
    }

    /// Record a frame that took `dt` seconds. Returns `true` when a stats
    /// log line is due.
    pub fn record(&mut self, dt: f64) -> bool {
        let dt = dt.max(0.0);
        self.frame_count += 1;
        self.frame_time_ms = dt * 1000.0;

        self.window_elapsed += dt;
        self.window_frames += 1;
        if self.window_elapsed >= FPS_WINDOW_SECS {
            self.fps = self.window_frames as f64 / self.window_elapsed;
            self.window_elapsed = 0.0;
            self.window_frames = 0;
        }

        if self.log_interval <= 0.0 {
            return false;
        }
        self.since_log += dt;
        if self.since_log >= self.log_interval {
            self.since_log = 0.0;
            return true;
        }
        false
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time_ms
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn timing(&self, uptime_seconds: f64) -> FrameTiming {
        FrameTiming {
            fps: self.fps,
            frame_time_ms: self.frame_time_ms,
            frame_count: self.frame_count,
            uptime_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_from_steady_frames() {
        let mut stats = FrameStats::new(0.0);
        for _ in 0..60 {
            stats.record(1.0 / 60.0);
        }
        assert!((stats.fps() - 60.0).abs() < 0.5, "fps {}", stats.fps());
        assert!((stats.frame_time_ms() - 16.667).abs() < 0.01);
        assert_eq!(stats.frame_count(), 60);
    }

    #[test]
    fn test_fps_zero_before_first_window() {
        let mut stats = FrameStats::new(0.0);
        stats.record(0.01);
        assert_eq!(stats.fps(), 0.0);
    }

    #[test]
    fn test_log_cue_interval() {
        let mut stats = FrameStats::new(1.0);
        let due: Vec<bool> = (0..25).map(|_| stats.record(0.1)).collect();
        assert_eq!(due.iter().filter(|d| **d).count(), 2);
        assert!(!due[0]);
    }

    #[test]
    fn test_disabled_log_cue() {
        let mut stats = FrameStats::new(0.0);
        assert!((0..100).all(|_| !stats.record(1.0)));
    }

    #[test]
    fn test_timing_snapshot() {
        let mut stats = FrameStats::new(5.0);
        stats.record(0.02);
        let timing = stats.timing(12.5);
        assert_eq!(timing.frame_count, 1);
        assert_eq!(timing.uptime_seconds, 12.5);
        assert!((timing.frame_time_ms - 20.0).abs() < 1e-9);
    }
}
