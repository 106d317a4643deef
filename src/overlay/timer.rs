use std::time::Duration;

/// Which part of a frame is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    Update,
    Draw,
    Overlay,
    Submit,
}

impl FramePhase {
    pub const ALL: [FramePhase; 4] = [Self::Update, Self::Draw, Self::Overlay, Self::Submit];

    pub fn label(self) -> &'static str {
        match self {
            Self::Update => "Update",
            Self::Draw => "Draw",
            Self::Overlay => "Overlay",
            Self::Submit => "Submit",
        }
    }
}

/// Weight of the newest sample in the running average.
const SMOOTHING: f64 = 0.1;

/// Smoothed time spent in each frame phase.
#[derive(Debug, Default)]
pub struct PhaseTimers {
    smoothed_us: [f64; FramePhase::ALL.len()],
}

impl PhaseTimers {
    /// Fold one measurement of `phase` into its running average.
    pub fn record(&mut self, phase: FramePhase, elapsed: Duration) {
        let sample = elapsed.as_secs_f64() * 1_000_000.0;
        let slot = &mut self.smoothed_us[phase as usize];
        *slot += (sample - *slot) * SMOOTHING;
    }

    /// Smoothed duration of `phase` (microseconds).
    pub fn get(&self, phase: FramePhase) -> f64 {
        self.smoothed_us[phase as usize]
    }

    /// Whole frame (microseconds).
    pub fn total_us(&self) -> f64 {
        self.smoothed_us.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_settles_on_steady_samples() {
        let mut timers = PhaseTimers::default();
        timers.record(FramePhase::Draw, Duration::from_millis(1));
        assert!((timers.get(FramePhase::Draw) - 100.0).abs() < 1e-6);

        for _ in 0..200 {
            timers.record(FramePhase::Draw, Duration::from_millis(1));
        }
        assert!((timers.get(FramePhase::Draw) - 1000.0).abs() < 1.0);
        assert_eq!(timers.get(FramePhase::Update), 0.0);
    }

    #[test]
    fn total_sums_every_phase() {
        let mut timers = PhaseTimers::default();
        timers.record(FramePhase::Update, Duration::from_micros(500));
        timers.record(FramePhase::Submit, Duration::from_micros(300));
        let expected = timers.get(FramePhase::Update) + timers.get(FramePhase::Submit);
        assert!((timers.total_us() - expected).abs() < 1e-9);
        assert!((timers.total_us() - 80.0).abs() < 1e-6);
    }
}
