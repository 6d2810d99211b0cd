//! Timed power-up effects, keyed on session time.

use crate::util::rand::RandomSource;

/// Seconds an effect lasts once collected.
pub const POWER_UP_DURATION: f64 = 5.0;
/// Simulation speed while slow time is active.
const SLOW_TIME_SCALE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PowerUpKind {
    SlowTime = 0,
    Shield = 1,
    Magnet = 2,
    DoublePoints = 3,
}

const KINDS: usize = 4;

impl PowerUpKind {
    pub const ALL: [PowerUpKind; KINDS] = [
        Self::SlowTime,
        Self::Shield,
        Self::Magnet,
        Self::DoublePoints,
    ];

    /// Uniform pick, rolled when a power-up spawns.
    pub fn roll(rng: &mut impl RandomSource) -> Self {
        Self::ALL[rng.index(KINDS)]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SlowTime => "Slow Time",
            Self::Shield => "Shield",
            Self::Magnet => "Magnet",
            Self::DoublePoints => "Double Points",
        }
    }
}

/// Active effects and the session time each one ends at.
/// Collecting a kind that is already active restarts its timer.
#[derive(Debug, Clone, Default)]
pub struct PowerUps {
    ends_at: [Option<f64>; KINDS],
}

impl PowerUps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self, kind: PowerUpKind, now: f64, duration: f64) {
        self.ends_at[kind as usize] = Some(now + duration);
        log::debug!("{} active for {:.1}s", kind.label(), duration);
    }

    /// Drop effects whose end time has passed. Returns the ones dropped.
    pub fn update(&mut self, now: f64) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let slot = &mut self.ends_at[kind as usize];
            if matches!(*slot, Some(end) if now >= end) {
                *slot = None;
                expired.push(kind);
            }
        }
        expired
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.ends_at[kind as usize].is_some()
    }

    /// Seconds left on `kind`, 0 when inactive.
    pub fn remaining(&self, kind: PowerUpKind, now: f64) -> f64 {
        self.ends_at[kind as usize].map_or(0.0, |end| (end - now).max(0.0))
    }

    pub fn active(&self) -> impl Iterator<Item = PowerUpKind> + '_ {
        PowerUpKind::ALL.into_iter().filter(move |&k| self.is_active(k))
    }

    pub fn clear(&mut self) {
        self.ends_at = [None; KINDS];
    }

    /// Scale applied to entity and behavior time steps.
    pub fn time_multiplier(&self) -> f32 {
        if self.is_active(PowerUpKind::SlowTime) {
            SLOW_TIME_SCALE
        } else {
            1.0
        }
    }

    pub fn points_multiplier(&self) -> u32 {
        if self.is_active(PowerUpKind::DoublePoints) {
            2
        } else {
            1
        }
    }

    pub fn has_shield(&self) -> bool {
        self.is_active(PowerUpKind::Shield)
    }

    /// Use up the shield. False when there was none to use.
    pub fn consume_shield(&mut self) -> bool {
        self.ends_at[PowerUpKind::Shield as usize].take().is_some()
    }

    pub fn has_magnet(&self) -> bool {
        self.is_active(PowerUpKind::Magnet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::rand::ScriptedRng;

    #[test]
    fn effects_expire_on_time() {
        let mut p = PowerUps::new();
        p.activate(PowerUpKind::SlowTime, 1.0, POWER_UP_DURATION);
        p.activate(PowerUpKind::DoublePoints, 3.0, POWER_UP_DURATION);
        assert_eq!(p.time_multiplier(), 0.5);
        assert_eq!(p.points_multiplier(), 2);
        assert_eq!(p.remaining(PowerUpKind::SlowTime, 2.0), 4.0);

        assert!(p.update(5.9).is_empty());
        assert_eq!(p.update(6.0), vec![PowerUpKind::SlowTime]);
        assert_eq!(p.time_multiplier(), 1.0);
        assert_eq!(p.remaining(PowerUpKind::SlowTime, 6.0), 0.0);
        assert_eq!(p.active().collect::<Vec<_>>(), vec![PowerUpKind::DoublePoints]);

        assert_eq!(p.update(8.0), vec![PowerUpKind::DoublePoints]);
        assert_eq!(p.points_multiplier(), 1);
    }

    #[test]
    fn shield_is_single_use() {
        let mut p = PowerUps::new();
        assert!(!p.consume_shield());
        p.activate(PowerUpKind::Shield, 0.0, POWER_UP_DURATION);
        assert!(p.has_shield());
        assert!(p.consume_shield());
        assert!(!p.has_shield());
        assert!(p.update(10.0).is_empty());
    }

    #[test]
    fn recollecting_restarts_timer() {
        let mut p = PowerUps::new();
        p.activate(PowerUpKind::Magnet, 0.0, POWER_UP_DURATION);
        p.activate(PowerUpKind::Magnet, 4.0, POWER_UP_DURATION);
        assert!(p.update(6.0).is_empty());
        assert!(p.has_magnet());
        p.clear();
        assert_eq!(p.active().count(), 0);
    }

    #[test]
    fn roll_covers_every_kind() {
        let mut rng = ScriptedRng::new(&[0.0, 0.3, 0.6, 0.99]);
        let kinds: Vec<PowerUpKind> = (0..4).map(|_| PowerUpKind::roll(&mut rng)).collect();
        assert_eq!(kinds, PowerUpKind::ALL.to_vec());
    }
}
