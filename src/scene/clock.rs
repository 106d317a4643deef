use crate::config::MAX_DELTA_TIME;

/// Simulation clock fed by wall-clock timestamps.
///
/// Each tick advances by the real elapsed time, capped at
/// [`MAX_DELTA_TIME`], so a stalled or backgrounded window never produces a
/// large jump. The first tick only records the baseline.
#[derive(Debug, Clone, Default)]
pub struct SceneClock {
    last_real: Option<f64>,
    now: f64,
}

impl SceneClock {
    /// Simulation time (ms).
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Feed a wall-clock timestamp (ms); returns the applied delta.
    pub fn advance(&mut self, real_now: f64) -> f64 {
        let dt = match self.last_real {
            Some(last) => (real_now - last).clamp(0.0, MAX_DELTA_TIME),
            None => 0.0,
        };
        self.last_real = Some(real_now);
        self.now += dt;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_long_gaps() {
        let mut clock = SceneClock::default();
        assert_eq!(clock.advance(5_000.0), 0.0);
        assert_eq!(clock.advance(5_016.0), 16.0);
        assert_eq!(clock.advance(65_016.0), MAX_DELTA_TIME);
        assert_eq!(clock.now(), 116.0);
    }

    #[test]
    fn backwards_time_is_ignored() {
        let mut clock = SceneClock::default();
        clock.advance(100.0);
        assert_eq!(clock.advance(90.0), 0.0);
        assert_eq!(clock.advance(106.0), 16.0);
    }
}
