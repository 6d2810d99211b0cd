use glam::Vec2;

use crate::powerup::PowerUpKind;

/// Current world position in viewport units.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Velocity in units/second.
#[derive(Debug, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// Closed set of entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityKind {
    /// Normal prey fish.
    Fish,
    Decoy,
    /// Rare, high-value prey.
    GoldenFish,
    PowerUp,
    Treasure,
    /// Hazard. Clicking it costs points.
    Shark,
    School,
    BonusCreature,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        Self::Fish,
        Self::Decoy,
        Self::GoldenFish,
        Self::PowerUp,
        Self::Treasure,
        Self::Shark,
        Self::School,
        Self::BonusCreature,
    ];

    /// Normal prey fish: the only kind that schools and flees.
    pub fn is_prey_fish(self) -> bool {
        self == Self::Fish
    }

    /// Clicking this kind counts as a hit for analytics.
    pub fn is_reward(self) -> bool {
        matches!(
            self,
            Self::Fish | Self::GoldenFish | Self::School | Self::BonusCreature
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fish => "Fish",
            Self::Decoy => "Decoy",
            Self::GoldenFish => "Golden Fish",
            Self::PowerUp => "Power-Up",
            Self::Treasure => "Treasure",
            Self::Shark => "Shark",
            Self::School => "School",
            Self::BonusCreature => "Bonus Creature",
        }
    }
}

/// Which kind of thing an entity is. Immutable after spawn.
#[derive(Debug, Clone, Copy)]
pub struct Kind(pub EntityKind);

/// Spawn timestamp and max age, both in session seconds.
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    pub spawned_at: f64,
    pub max_age: f32,
}

impl Lifetime {
    pub fn expired(&self, now: f64) -> bool {
        now - self.spawned_at > self.max_age as f64
    }
}

/// Click hit box half extents, centred on the position.
#[derive(Debug, Clone, Copy)]
pub struct Hitbox(pub Vec2);

impl Hitbox {
    pub fn contains(&self, center: Vec2, point: Vec2) -> bool {
        let d = (point - center).abs();
        d.x <= self.0.x && d.y <= self.0.y
    }
}

/// What clicking an entity is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reward {
    Points(u32),
    Penalty(u32),
    /// Power-up pickup, no score change.
    Pickup(PowerUpKind),
}

/// Fish behavior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BehaviorState {
    Normal,
    Schooling,
    Fleeing,
}

/// Behavior fields carried by prey fish only.
#[derive(Debug, Clone)]
pub struct FishState {
    pub state: BehaviorState,
    /// Session time at which fleeing ends.
    pub flee_until: f64,
    /// Other fish within the schooling radius. Rebuilt every tick.
    pub nearby: Vec<hecs::Entity>,
}

impl FishState {
    pub fn new() -> Self {
        Self {
            state: BehaviorState::Normal,
            flee_until: 0.0,
            nearby: Vec::new(),
        }
    }

    pub fn start_fleeing(&mut self, now: f64, duration: f32) {
        self.state = BehaviorState::Fleeing;
        self.flee_until = now + duration as f64;
    }
}

impl Default for FishState {
    fn default() -> Self {
        Self::new()
    }
}
