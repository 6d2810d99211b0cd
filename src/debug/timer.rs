use instant::Instant;

/// Phases of a session tick, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SystemPhase {
    Lifetime = 0,
    Difficulty = 1,
    Behavior = 2,
    Movement = 3,
    Spawning = 4,
}

const PHASES: usize = 5;
const EMA_ALPHA: f64 = 0.1;

impl SystemPhase {
    pub const ALL: [SystemPhase; PHASES] = [
        Self::Lifetime,
        Self::Difficulty,
        Self::Behavior,
        Self::Movement,
        Self::Spawning,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Lifetime => "lifetime",
            Self::Difficulty => "difficulty",
            Self::Behavior => "behavior",
            Self::Movement => "movement",
            Self::Spawning => "spawning",
        }
    }
}

/// Smoothed and peak per-phase durations, in microseconds.
#[derive(Debug, Clone, Default)]
pub struct SystemTimers {
    smoothed_us: [f64; PHASES],
    peak_us: [f64; PHASES],
    /// Samples folded per phase; the first seeds the average.
    samples: [u64; PHASES],
}

impl SystemTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the time since `started` against `phase`.
    pub fn record(&mut self, phase: SystemPhase, started: Instant) {
        let elapsed_us = started.elapsed().as_secs_f64() * 1_000_000.0;
        self.fold(phase, elapsed_us);
    }

    fn fold(&mut self, phase: SystemPhase, elapsed_us: f64) {
        let i = phase as usize;
        self.smoothed_us[i] = if self.samples[i] == 0 {
            elapsed_us
        } else {
            self.smoothed_us[i] + (elapsed_us - self.smoothed_us[i]) * EMA_ALPHA
        };
        self.peak_us[i] = self.peak_us[i].max(elapsed_us);
        self.samples[i] += 1;
    }

    pub fn smoothed_us(&self, phase: SystemPhase) -> f64 {
        self.smoothed_us[phase as usize]
    }

    pub fn peak_us(&self, phase: SystemPhase) -> f64 {
        self.peak_us[phase as usize]
    }

    /// Smoothed cost of a whole tick.
    pub fn total_us(&self) -> f64 {
        self.smoothed_us.iter().sum()
    }

    pub fn reset_peaks(&mut self) {
        self.peak_us = [0.0; PHASES];
    }

    /// One-line breakdown for log output.
    pub fn summary(&self) -> String {
        let mut line = format!("tick {:.1}us", self.total_us());
        for phase in SystemPhase::ALL {
            line.push_str(&format!(
                " | {} {:.1}us (peak {:.1})",
                phase.label(),
                self.smoothed_us(phase),
                self.peak_us(phase)
            ));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_seeds_then_smooths() {
        let mut timers = SystemTimers::new();
        timers.fold(SystemPhase::Behavior, 100.0);
        assert_eq!(timers.smoothed_us(SystemPhase::Behavior), 100.0);
        timers.fold(SystemPhase::Behavior, 200.0);
        assert!((timers.smoothed_us(SystemPhase::Behavior) - 110.0).abs() < 1e-9);
        assert_eq!(timers.peak_us(SystemPhase::Behavior), 200.0);
        assert_eq!(timers.smoothed_us(SystemPhase::Movement), 0.0);
        timers.reset_peaks();
        assert_eq!(timers.peak_us(SystemPhase::Behavior), 0.0);
    }

    #[test]
    fn summary_names_every_phase() {
        let mut timers = SystemTimers::new();
        timers.record(SystemPhase::Spawning, Instant::now());
        let line = timers.summary();
        for phase in SystemPhase::ALL {
            assert!(line.contains(phase.label()));
        }
    }
}
