//! Player analytics: rolling click history, heatmap, click prediction and
//! coaching tips.

use glam::Vec2;

use crate::click::ClickRecord;
use crate::config::Viewport;
use crate::debug::ring::RingBuffer;
use crate::heatmap::Heatmap;

/// Click history capacity.
pub const HISTORY_CAPACITY: usize = 50;
/// Weak cells need at least this many clicks...
const WEAK_MIN_CLICKS: u32 = 3;
/// ...and a success rate strictly below this.
const WEAK_MAX_RATE: f32 = 0.5;
/// Clicks averaged by the next-click prediction.
const PREDICTION_WINDOW: usize = 5;
const PREDICTION_MIN_CLICKS: usize = 3;
/// Clicks needed before side bias or coaching is reported.
const PATTERN_MIN_CLICKS: usize = 10;
const COACHING_MIN_CLICKS: usize = 10;
const SLOW_REACTION_MS: f32 = 1000.0;

/// Side of the screen the player favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickPattern {
    Left,
    Right,
    Center,
    #[default]
    Balanced,
}

impl ClickPattern {
    pub fn label(self) -> &'static str {
        match self {
            ClickPattern::Left => "left",
            ClickPattern::Right => "right",
            ClickPattern::Center => "center",
            ClickPattern::Balanced => "balanced",
        }
    }
}

pub struct PlayerAnalytics {
    viewport: Viewport,
    history: RingBuffer<ClickRecord>,
    heatmap: Heatmap,
}

impl PlayerAnalytics {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            history: RingBuffer::new(HISTORY_CAPACITY),
            heatmap: Heatmap::new(viewport.width, viewport.height),
        }
    }

    /// Record a click. Off-screen clicks still enter the history.
    pub fn record_click(&mut self, click: ClickRecord) {
        self.history.push(click);
        if !self.heatmap.record(click.pos, click.success) {
            log::trace!("click at {:?} outside heatmap grid", click.pos);
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> impl Iterator<Item = &ClickRecord> {
        self.history.iter()
    }

    pub fn heatmap(&self) -> &Heatmap {
        &self.heatmap
    }

    /// Center of the most-clicked heatmap cell.
    pub fn most_clicked_area(&self) -> Option<Vec2> {
        self.heatmap.hotspot()
    }

    /// Centers of cells the player clicks often but mostly misses.
    pub fn weak_areas(&self) -> Vec<Vec2> {
        self.heatmap.weak_cells(WEAK_MIN_CLICKS, WEAK_MAX_RATE)
    }

    /// Mean of the last few click positions.
    pub fn predict_next_click(&self) -> Option<Vec2> {
        if self.history.len() < PREDICTION_MIN_CLICKS {
            return None;
        }
        let recent: Vec<Vec2> = self
            .history
            .recent(PREDICTION_WINDOW)
            .map(|c| c.pos)
            .collect();
        let sum: Vec2 = recent.iter().copied().sum();
        Some(sum / recent.len() as f32)
    }

    /// Mean reaction time in ms, 0 with no history.
    pub fn average_reaction_time(&self) -> f32 {
        if self.history.is_empty() {
            return 0.0;
        }
        let total: f32 = self.history.iter().map(|c| c.reaction_ms).sum();
        total / self.history.len() as f32
    }

    /// Fraction of successful clicks, 0 with no history.
    pub fn accuracy(&self) -> f32 {
        if self.history.is_empty() {
            return 0.0;
        }
        let hits = self.history.iter().filter(|c| c.success).count();
        hits as f32 / self.history.len() as f32
    }

    /// Bucket clicks into thirds of the viewport width; a side wins with
    /// more than half the clicks.
    pub fn clicking_pattern(&self) -> ClickPattern {
        let total = self.history.len();
        if total < PATTERN_MIN_CLICKS {
            return ClickPattern::Balanced;
        }

        let center_x = self.viewport.width / 2.0;
        let band = self.viewport.width / 6.0;
        let (mut left, mut right, mut center) = (0usize, 0usize, 0usize);
        for click in self.history.iter() {
            if click.pos.x < center_x - band {
                left += 1;
            } else if click.pos.x > center_x + band {
                right += 1;
            } else {
                center += 1;
            }
        }

        let share = |n: usize| n as f32 / total as f32;
        if share(left) > 0.5 {
            ClickPattern::Left
        } else if share(right) > 0.5 {
            ClickPattern::Right
        } else if share(center) > 0.5 {
            ClickPattern::Center
        } else {
            ClickPattern::Balanced
        }
    }

    /// First matching tip wins.
    pub fn coaching_tip(&self) -> Option<String> {
        if self.history.len() < COACHING_MIN_CLICKS {
            return None;
        }

        if self.accuracy() < 0.5 {
            return Some("Take your time! Accuracy is more important than speed.".to_string());
        }

        if self.average_reaction_time() > SLOW_REACTION_MS {
            return Some("Try to react faster! Click as soon as you see a fish.".to_string());
        }

        let pattern = self.clicking_pattern();
        if pattern != ClickPattern::Balanced {
            return Some(format!(
                "You're focusing too much on the {}. Look around the whole screen!",
                pattern.label()
            ));
        }

        let recent_hits = self.history.recent(5).filter(|c| c.success).count();
        if recent_hits >= 4 {
            return Some("Great combo! Keep it up!".to_string());
        }

        None
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.heatmap.clear();
    }
}
