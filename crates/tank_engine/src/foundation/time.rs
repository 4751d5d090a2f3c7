//! Time management utilities

use std::time::{Duration, Instant};

/// Snapshot of frame timing handed to every per-frame update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameTime {
    /// Time since the previous frame
    pub elapsed: Duration,
    /// Time since the game loop started
    pub total: Duration,
}

impl GameTime {
    /// Create a new time snapshot
    pub const fn new(elapsed: Duration, total: Duration) -> Self {
        Self { elapsed, total }
    }

    /// Create a snapshot from seconds, mostly useful in tests
    pub fn from_secs(elapsed: f32, total: f32) -> Self {
        Self {
            elapsed: Duration::from_secs_f32(elapsed),
            total: Duration::from_secs_f32(total),
        }
    }

    /// Frame delta in seconds
    pub fn delta_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Total time in seconds
    pub fn total_seconds(&self) -> f32 {
        self.total.as_secs_f32()
    }
}

/// Frame timer producing [`GameTime`] snapshots.
///
/// A timer either follows the wall clock or advances by a fixed step on every
/// tick, which keeps headless simulations deterministic.
#[derive(Debug)]
pub struct Timer {
    last_frame: Instant,
    fixed_step: Option<Duration>,
    current: GameTime,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new wall-clock timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            fixed_step: None,
            current: GameTime::default(),
            frame_count: 0,
        }
    }

    /// Create a timer that advances by `step` on every tick
    pub fn with_fixed_step(step: Duration) -> Self {
        Self {
            fixed_step: Some(step),
            ..Self::new()
        }
    }

    /// Create a fixed-step timer running at `frame_rate` frames per second
    pub fn with_frame_rate(frame_rate: u32) -> Self {
        Self::with_fixed_step(Duration::from_secs(1) / frame_rate.max(1))
    }

    /// Advance the timer (should be called once per frame)
    pub fn tick(&mut self) -> GameTime {
        let elapsed = match self.fixed_step {
            Some(step) => step,
            None => {
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_frame);
                self.last_frame = now;
                elapsed
            }
        };

        self.current = GameTime::new(elapsed, self.current.total + elapsed);
        self.frame_count += 1;
        self.current
    }

    /// The most recent snapshot
    pub const fn current(&self) -> GameTime {
        self.current
    }

    /// Get the current frame count
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        let total = self.current.total_seconds();
        if total > 0.0 {
            self.frame_count as f32 / total
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_step_timer_accumulates() {
        let mut timer = Timer::with_fixed_step(Duration::from_millis(20));

        let first = timer.tick();
        assert_eq!(first.elapsed, Duration::from_millis(20));
        assert_eq!(first.total, Duration::from_millis(20));

        timer.tick();
        let third = timer.tick();
        assert_eq!(third.total, Duration::from_millis(60));
        assert_eq!(timer.frame_count(), 3);
        assert_relative_eq!(timer.average_fps(), 50.0, epsilon = 1e-3);
    }

    #[test]
    fn test_frame_rate_zero_is_clamped() {
        let mut timer = Timer::with_frame_rate(0);
        assert_eq!(timer.tick().elapsed, Duration::from_secs(1));
    }

    #[test]
    fn test_game_time_seconds() {
        let time = GameTime::from_secs(0.25, 2.0);
        assert_relative_eq!(time.delta_seconds(), 0.25);
        assert_relative_eq!(time.total_seconds(), 2.0);
    }
}
