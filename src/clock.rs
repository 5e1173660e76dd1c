//! Animation clock.
//!
//! [`SceneClock`] accumulates wall-clock deltas while animation is enabled and stays
//! frozen otherwise. Timelines are evaluated against [`SceneClock::cycle_time`], the
//! elapsed time wrapped into a fixed period so the scene loops.

/// Length of one loop of the beach scene, in seconds.
pub const CYCLE_SECONDS: f32 = 30.0;

/// Elapsed and wrapped time for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Unwrapped seconds since the clock was last reset.
    pub elapsed: f32,
    /// `elapsed` wrapped into the clock's period.
    pub cycle: f32,
}

/// Frame-driven animation clock.
#[derive(Clone, Debug)]
pub struct SceneClock {
    elapsed: f32,
    period: f32,
    running: bool,
    resync: bool,
}

impl Default for SceneClock {
    fn default() -> Self {
        Self::with_period(CYCLE_SECONDS)
    }
}

impl SceneClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A paused clock that wraps every `period` seconds.
    pub fn with_period(period: f32) -> Self {
        assert!(period > 0.0, "clock period must be positive");
        Self {
            elapsed: 0.0,
            period,
            running: false,
            resync: true,
        }
    }

    /// Start the clock at `elapsed` seconds.
    pub fn starting_at(mut self, elapsed: f32) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    /// Enable or disable animation.
    ///
    /// Enabling flags the next [`tick`](Self::tick) to discard its delta, so the time
    /// spent paused is not added in one jump.
    pub fn set_running(&mut self, running: bool) {
        if running && !self.running {
            self.resync = true;
        }
        self.running = running;
    }

    /// Flip between running and paused. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_running(!self.running);
        self.running
    }

    /// Rewind to zero without changing the running state.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Advance by a wall-clock delta in seconds. Does nothing while paused.
    pub fn tick(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        if self.resync {
            self.resync = false;
            return;
        }
        self.elapsed += dt.max(0.0);
    }

    /// Unwrapped seconds since the last reset.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Elapsed time wrapped into `[0, period)`.
    pub fn cycle_time(&self) -> f32 {
        self.elapsed.rem_euclid(self.period)
    }

    pub fn frame_time(&self) -> FrameTime {
        FrameTime {
            elapsed: self.elapsed,
            cycle: self.cycle_time(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_clock() -> SceneClock {
        let mut clock = SceneClock::new();
        clock.set_running(true);
        clock.tick(0.0);
        clock
    }

    #[test]
    fn paused_clock_is_frozen() {
        let mut clock = SceneClock::new();
        clock.tick(1.0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn running_clock_accumulates() {
        let mut clock = running_clock();
        clock.tick(0.5);
        clock.tick(0.25);
        assert_eq!(clock.elapsed(), 0.75);
    }

    #[test]
    fn wraps_into_cycle() {
        let clock = SceneClock::new().starting_at(65.5);
        assert_eq!(clock.cycle_time(), 5.5);
        assert_eq!(clock.frame_time().elapsed, 65.5);
    }

    #[test]
    fn first_tick_after_enable_is_discarded() {
        let mut clock = running_clock();
        clock.tick(1.0);
        assert!(!clock.toggle());
        clock.tick(5.0);
        assert!(clock.toggle());
        // The gap spent paused arrives as one large delta and must not count.
        clock.tick(12.0);
        assert_eq!(clock.elapsed(), 1.0);
        clock.tick(0.5);
        assert_eq!(clock.elapsed(), 1.5);
    }

    #[test]
    fn reset_keeps_running_state() {
        let mut clock = running_clock();
        clock.tick(3.0);
        clock.reset();
        assert_eq!(clock.elapsed(), 0.0);
        assert!(clock.is_running());
    }
}
