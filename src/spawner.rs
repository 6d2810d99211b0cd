//! Spawn placement informed by player analytics.
//!
//! Every query may answer `None`, meaning "no suggestion": the caller falls
//! back to its own placement.

use glam::Vec2;

use crate::analytics::{ClickPattern, PlayerAnalytics};
use crate::config::Viewport;
use crate::util::rand::RandomSource;
use crate::util::vector::from_heading;

/// Keep suggested positions this far inside the viewport.
const EDGE_MARGIN: f32 = 50.0;
const SMART_DECOY_CHANCE: f32 = 0.7;
const SMART_FISH_CHANCE: f32 = 0.5;
const CHALLENGE_CHANCE: f32 = 0.3;
const CHALLENGE_MIN_ACCURACY: f32 = 0.7;

pub struct SmartSpawner<'a> {
    analytics: &'a PlayerAnalytics,
    viewport: Viewport,
}

impl<'a> SmartSpawner<'a> {
    pub fn new(analytics: &'a PlayerAnalytics, viewport: Viewport) -> Self {
        Self {
            analytics,
            viewport,
        }
    }

    fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(EDGE_MARGIN, self.viewport.width - EDGE_MARGIN),
            p.y.clamp(EDGE_MARGIN, self.viewport.height - EDGE_MARGIN),
        )
    }

    /// Put decoys where the player struggles, or close to where they are
    /// about to click.
    pub fn suggest_decoy_position(&self, rng: &mut impl RandomSource) -> Option<Vec2> {
        if !rng.chance(SMART_DECOY_CHANCE) {
            return None;
        }

        let weak = self.analytics.weak_areas();
        if !weak.is_empty() {
            return Some(weak[rng.index(weak.len())]);
        }

        let predicted = self.analytics.predict_next_click()?;
        let angle = rng.angle();
        let offset = rng.range(50.0, 150.0);
        Some(self.clamp(predicted + from_heading(angle, offset)))
    }

    /// Put fish away from the player's hotspot.
    pub fn suggest_fish_position(&self, rng: &mut impl RandomSource) -> Option<Vec2> {
        if !rng.chance(SMART_FISH_CHANCE) {
            return None;
        }

        let hotspot = self.analytics.most_clicked_area()?;
        let angle = rng.angle();
        let distance = rng.range(200.0, 400.0);
        Some(self.clamp(hotspot + from_heading(angle, distance)))
    }

    /// Accurate players with a side bias occasionally get a fish on the
    /// side they neglect.
    pub fn should_spawn_challenging_fish(&self, rng: &mut impl RandomSource) -> bool {
        self.analytics.accuracy() > CHALLENGE_MIN_ACCURACY
            && self.analytics.clicking_pattern() != ClickPattern::Balanced
            && rng.chance(CHALLENGE_CHANCE)
    }

    /// Position opposite the player's observed bias.
    pub fn challenging_fish_position(&self, rng: &mut impl RandomSource) -> Vec2 {
        let Viewport { width, height } = self.viewport;
        let center = Vec2::new(width / 2.0, height / 2.0);

        match self.analytics.clicking_pattern() {
            ClickPattern::Left => Vec2::new(
                center.x + width / 4.0 + rng.unit() * (width / 4.0 - EDGE_MARGIN),
                center.y + (rng.unit() - 0.5) * height * 0.6,
            ),
            ClickPattern::Right => Vec2::new(
                EDGE_MARGIN + rng.unit() * width / 4.0,
                center.y + (rng.unit() - 0.5) * height * 0.6,
            ),
            ClickPattern::Center => {
                let x = if rng.chance(0.5) {
                    EDGE_MARGIN + rng.unit() * 100.0
                } else {
                    width - 150.0 + rng.unit() * 100.0
                };
                Vec2::new(x, EDGE_MARGIN + rng.unit() * (height - 2.0 * EDGE_MARGIN))
            }
            ClickPattern::Balanced => Vec2::new(
                EDGE_MARGIN + rng.unit() * (width - 2.0 * EDGE_MARGIN),
                EDGE_MARGIN + rng.unit() * (height - 2.0 * EDGE_MARGIN),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::click::ClickRecord;
    use crate::util::rand::ScriptedRng;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn record(a: &mut PlayerAnalytics, x: f32, y: f32, success: bool) {
        a.record_click(ClickRecord {
            pos: Vec2::new(x, y),
            timestamp: 0.0,
            success,
            reaction_ms: 300.0,
        });
    }

    #[test]
    fn no_data_means_no_suggestion() {
        let analytics = PlayerAnalytics::new(viewport());
        let spawner = SmartSpawner::new(&analytics, viewport());
        let mut rng = ScriptedRng::new(&[0.0]);
        assert_eq!(spawner.suggest_decoy_position(&mut rng), None);
        assert_eq!(spawner.suggest_fish_position(&mut rng), None);
    }

    #[test]
    fn decoy_prefers_weak_area() {
        let mut analytics = PlayerAnalytics::new(viewport());
        for _ in 0..3 {
            record(&mut analytics, 310.0, 210.0, false);
        }
        let spawner = SmartSpawner::new(&analytics, viewport());
        let mut rng = ScriptedRng::new(&[0.1, 0.0]);
        assert_eq!(
            spawner.suggest_decoy_position(&mut rng),
            Some(Vec2::new(325.0, 225.0))
        );

        // The 30% branch declines.
        let mut rng = ScriptedRng::new(&[0.9]);
        assert_eq!(spawner.suggest_decoy_position(&mut rng), None);
    }

    #[test]
    fn decoy_near_prediction_stays_in_bounds() {
        let mut analytics = PlayerAnalytics::new(viewport());
        for _ in 0..4 {
            record(&mut analytics, 20.0, 20.0, true);
        }
        let spawner = SmartSpawner::new(&analytics, viewport());
        let mut rng = fastrand::Rng::with_seed(11);
        for _ in 0..50 {
            if let Some(p) = spawner.suggest_decoy_position(&mut rng) {
                assert!((50.0..=750.0).contains(&p.x));
                assert!((50.0..=550.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn fish_avoids_hotspot() {
        let mut analytics = PlayerAnalytics::new(viewport());
        for _ in 0..5 {
            record(&mut analytics, 410.0, 310.0, true);
        }
        let spawner = SmartSpawner::new(&analytics, viewport());
        // chance, angle 0, distance 200 -> straight right of the hotspot.
        let mut rng = ScriptedRng::new(&[0.0, 0.0, 0.0]);
        assert_eq!(
            spawner.suggest_fish_position(&mut rng),
            Some(Vec2::new(625.0, 325.0))
        );
    }

    #[test]
    fn challenging_fish_gated_on_accuracy() {
        let mut analytics = PlayerAnalytics::new(viewport());
        // Left-biased, 70% accuracy exactly.
        for i in 0..10 {
            record(&mut analytics, 60.0, 300.0, i < 7);
        }
        assert_eq!(analytics.clicking_pattern(), ClickPattern::Left);
        let spawner = SmartSpawner::new(&analytics, viewport());
        let mut rng = ScriptedRng::new(&[0.0]);
        for _ in 0..20 {
            assert!(!spawner.should_spawn_challenging_fish(&mut rng));
        }
        let mut seeded = fastrand::Rng::with_seed(9);
        for _ in 0..200 {
            assert!(!spawner.should_spawn_challenging_fish(&mut seeded));
        }
    }

    #[test]
    fn challenging_fish_needs_bias_and_luck() {
        let mut balanced = PlayerAnalytics::new(viewport());
        for x in [100.0, 400.0, 700.0].repeat(4) {
            record(&mut balanced, x, 300.0, true);
        }
        let spawner = SmartSpawner::new(&balanced, viewport());
        let mut rng = ScriptedRng::new(&[0.0]);
        assert!(!spawner.should_spawn_challenging_fish(&mut rng));

        let mut biased = PlayerAnalytics::new(viewport());
        for _ in 0..10 {
            record(&mut biased, 60.0, 300.0, true);
        }
        let spawner = SmartSpawner::new(&biased, viewport());
        assert!(spawner.should_spawn_challenging_fish(&mut ScriptedRng::new(&[0.1])));
        assert!(!spawner.should_spawn_challenging_fish(&mut ScriptedRng::new(&[0.5])));
    }

    #[test]
    fn challenging_position_opposes_bias() {
        let mut left = PlayerAnalytics::new(viewport());
        for _ in 0..10 {
            record(&mut left, 60.0, 300.0, true);
        }
        let spawner = SmartSpawner::new(&left, viewport());
        let mut rng = fastrand::Rng::with_seed(4);
        for _ in 0..50 {
            let p = spawner.challenging_fish_position(&mut rng);
            assert!(p.x >= 600.0 && p.x <= 750.0);
            assert!(p.y >= 120.0 && p.y <= 480.0);
        }

        let mut right = PlayerAnalytics::new(viewport());
        for _ in 0..10 {
            record(&mut right, 760.0, 300.0, true);
        }
        let spawner = SmartSpawner::new(&right, viewport());
        for _ in 0..50 {
            let p = spawner.challenging_fish_position(&mut rng);
            assert!(p.x >= 50.0 && p.x <= 250.0);
        }

        let mut center = PlayerAnalytics::new(viewport());
        for _ in 0..10 {
            record(&mut center, 400.0, 300.0, true);
        }
        let spawner = SmartSpawner::new(&center, viewport());
        for _ in 0..50 {
            let p = spawner.challenging_fish_position(&mut rng);
            assert!(p.x <= 150.0 || p.x >= 650.0);
        }
    }
}
