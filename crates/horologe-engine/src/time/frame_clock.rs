use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped time since the previous tick.
    pub dt: Duration,
    pub now: Instant,
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped so a stall (debugger, minimized window) does not hand
/// animations one enormous step. Call [`reset`](Self::reset) when the window
/// wakes from an idle wait, so the wait itself is not counted as a frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    pub fn reset_at(&mut self, now: Instant) {
        self.last = now;
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt,
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

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn reports_elapsed_time_between_ticks() {
        let mut clock = FrameClock::with_clamps(Duration::ZERO, Duration::from_secs(1));
        let t0 = Instant::now() + MS;
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 + 16 * MS);
        assert_eq!(ft.dt, 16 * MS);
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn long_idle_is_clamped() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now() + MS;
        clock.tick_at(t0);
        assert_eq!(clock.tick_at(t0 + Duration::from_secs(1)).dt, 250 * MS);
    }

    #[test]
    fn reset_discards_the_idle_gap() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now() + MS;
        clock.tick_at(t0);
        clock.reset_at(t0 + Duration::from_secs(1));
        let ft = clock.tick_at(t0 + Duration::from_secs(1) + 8 * MS);
        assert_eq!(ft.dt, 8 * MS);
    }

    #[test]
    fn repeated_instant_yields_minimum_step() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now() + MS;
        clock.tick_at(t0);
        assert_eq!(clock.tick_at(t0).dt, Duration::from_micros(100));
    }
}
