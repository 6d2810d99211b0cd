//! Difficulty control loop.
//!
//! Rolling accuracy over the last few actions periodically moves a target
//! difficulty; the current difficulty eases toward it every tick.

use crate::config::{ConfigError, DifficultyConfig};
use crate::debug::ring::RingBuffer;

/// Difficulty at session start and after `reset`.
pub const BASELINE: f32 = 0.3;
pub const MIN_DIFFICULTY: f32 = 0.1;
pub const MAX_DIFFICULTY: f32 = 1.0;
/// Actions kept for the accuracy estimate.
const ACTION_HISTORY: usize = 20;
/// Per-second easing factor of current toward target.
const SMOOTHING: f32 = 0.1;

/// Outcome of one player action, as seen by the difficulty loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionResult {
    FishPopped,
    DecoyClicked,
    #[default]
    Miss,
}

/// Snapshot for HUDs and logs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceMetrics {
    pub accuracy: f32,
    pub recent_actions: usize,
    pub current: f32,
    pub target: f32,
}

pub struct DifficultyController {
    config: DifficultyConfig,
    current: f32,
    target: f32,
    /// Seconds since the target was last recomputed.
    since_adjust: f32,
    actions: RingBuffer<ActionResult>,
}

impl DifficultyController {
    pub fn new(config: DifficultyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            current: BASELINE,
            target: BASELINE,
            since_adjust: 0.0,
            actions: RingBuffer::new(ACTION_HISTORY),
        })
    }

    /// Swap in a new configuration and put both levels back at baseline.
    /// Recorded actions and the adjustment window carry over; use
    /// [`reset`](Self::reset) to drop them too.
    pub fn initialize(&mut self, config: DifficultyConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.current = BASELINE;
        self.target = BASELINE;
        Ok(())
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    pub fn update(&mut self, dt: f32) {
        self.since_adjust += dt;

        if self.since_adjust < self.config.adjustment_window {
            // Deliberately dt-scaled, not a time-constant decay.
            self.current += (self.target - self.current) * SMOOTHING * dt;
            self.current = self.current.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
            return;
        }

        self.since_adjust = 0.0;
        let accuracy = self.accuracy();
        let thresholds = &self.config.accuracy_thresholds;
        let previous = self.target;

        if accuracy >= thresholds.increase {
            self.target += self.config.scaling_factor;
        } else if accuracy <= thresholds.decrease {
            self.target -= self.config.scaling_factor;
        }
        self.target = self.target.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);

        if self.target != previous {
            log::info!(
                "Difficulty target {:.2} -> {:.2} (accuracy {:.0}%)",
                previous,
                self.target,
                accuracy * 100.0
            );
        }
    }

    pub fn record_action(&mut self, action: ActionResult) {
        self.actions.push(action);
    }

    /// Popped fish over recent actions; 0.5 with no history.
    pub fn accuracy(&self) -> f32 {
        if self.actions.is_empty() {
            return 0.5;
        }
        let popped = self
            .actions
            .iter()
            .filter(|a| **a == ActionResult::FishPopped)
            .count();
        popped as f32 / self.actions.len() as f32
    }

    /// Nudge the target directly.
    pub fn adjust_difficulty(&mut self, delta: f32) {
        self.target = (self.target + delta).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Spawns per second for the current difficulty.
    pub fn spawn_rate(&self) -> f32 {
        let c = &self.config;
        c.min_spawn_rate + (c.max_spawn_rate - c.min_spawn_rate) * self.current
    }

    pub fn movement_speed_multiplier(&self) -> f32 {
        1.0 + 0.5 * self.current
    }

    pub fn reset(&mut self) {
        self.current = BASELINE;
        self.target = BASELINE;
        self.since_adjust = 0.0;
        self.actions.clear();
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        PerformanceMetrics {
            accuracy: self.accuracy(),
            recent_actions: self.actions.len(),
            current: self.current,
            target: self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> DifficultyController {
        DifficultyController::new(DifficultyConfig::default()).unwrap()
    }

    #[test]
    fn perfect_window_raises_target() {
        let mut d = controller();
        for _ in 0..20 {
            d.record_action(ActionResult::FishPopped);
        }
        d.update(10.0);
        assert!((d.target() - 0.4).abs() < 1e-6);
        // Adjustment tick does not move current.
        assert!((d.current() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn middling_accuracy_holds_target() {
        let mut d = controller();
        for i in 0..10 {
            d.record_action(if i < 7 {
                ActionResult::FishPopped
            } else {
                ActionResult::Miss
            });
        }
        d.update(10.0);
        assert!((d.target() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn empty_history_counts_as_half() {
        let mut d = controller();
        assert_eq!(d.accuracy(), 0.5);
        // 0.5 sits on the decrease threshold.
        d.update(10.0);
        assert!((d.target() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn smoothing_is_literal_dt_scaled() {
        let mut d = controller();
        d.adjust_difficulty(0.5);
        d.update(1.0);
        // 0.3 + (0.8 - 0.3) * 0.1 * 1.0
        assert!((d.current() - 0.35).abs() < 1e-6);
        d.update(1.0 / 60.0);
        let expected = 0.35 + (0.8 - 0.35) * 0.1 / 60.0;
        assert!((d.current() - expected).abs() < 1e-6);
    }

    #[test]
    fn stays_clamped_under_extremes() {
        let mut d = controller();
        for _ in 0..50 {
            for _ in 0..20 {
                d.record_action(ActionResult::FishPopped);
            }
            for _ in 0..60 {
                d.update(1.0);
            }
            assert!(d.target() <= MAX_DIFFICULTY && d.current() <= MAX_DIFFICULTY);
        }
        assert_eq!(d.target(), MAX_DIFFICULTY);

        for _ in 0..50 {
            for _ in 0..20 {
                d.record_action(ActionResult::Miss);
            }
            for _ in 0..60 {
                d.update(1.0);
            }
            assert!(d.target() >= MIN_DIFFICULTY && d.current() >= MIN_DIFFICULTY);
        }
        assert_eq!(d.target(), MIN_DIFFICULTY);

        d.adjust_difficulty(-5.0);
        assert_eq!(d.target(), MIN_DIFFICULTY);
    }

    #[test]
    fn action_history_is_bounded() {
        let mut d = controller();
        for _ in 0..20 {
            d.record_action(ActionResult::Miss);
        }
        for _ in 0..20 {
            d.record_action(ActionResult::FishPopped);
        }
        assert_eq!(d.metrics().recent_actions, 20);
        assert_eq!(d.accuracy(), 1.0);
    }

    #[test]
    fn derived_outputs() {
        let d = controller();
        // 1.5 + 3.5 * 0.3
        assert!((d.spawn_rate() - 2.55).abs() < 1e-5);
        assert!((d.movement_speed_multiplier() - 1.15).abs() < 1e-6);
    }

    #[test]
    fn reset_and_initialize() {
        let mut d = controller();
        d.record_action(ActionResult::DecoyClicked);
        d.adjust_difficulty(0.4);
        d.reset();
        assert_eq!(d.metrics().recent_actions, 0);
        assert_eq!(d.target(), BASELINE);

        let mut bad = DifficultyConfig::default();
        bad.min_spawn_rate = 8.0;
        assert!(d.initialize(bad).is_err());

        let mut faster = DifficultyConfig::default();
        faster.adjustment_window = 2.0;
        d.initialize(faster).unwrap();
        assert_eq!(d.config().adjustment_window, 2.0);
    }

    #[test]
    fn initialize_keeps_history() {
        let mut d = controller();
        d.record_action(ActionResult::FishPopped);
        d.record_action(ActionResult::Miss);
        d.adjust_difficulty(0.8);
        d.update(0.5);

        d.initialize(DifficultyConfig::default()).unwrap();
        assert_eq!(d.current(), BASELINE);
        assert_eq!(d.target(), BASELINE);
        assert_eq!(d.metrics().recent_actions, 2);
        assert_eq!(d.accuracy(), 0.5);
    }
}
