use glam::Vec2;

/// Reaction time reported before anything has spawned (ms).
const DEFAULT_REACTION_MS: f32 = 500.0;

/// One recorded player click.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClickRecord {
    pub pos: Vec2,
    /// Session time of the click (seconds).
    pub timestamp: f64,
    pub success: bool,
    /// Milliseconds since the last spawn event.
    pub reaction_ms: f32,
}

/// Tracks session time and the last spawn event so clicks can be stamped
/// with a reaction time.
#[derive(Debug, Clone, Default)]
pub struct ReactionClock {
    /// Elapsed session time (seconds).
    elapsed: f64,
    last_spawn: Option<f64>,
}

impl ReactionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt as f64;
    }

    pub fn now(&self) -> f64 {
        self.elapsed
    }

    pub fn mark_spawn(&mut self) {
        self.last_spawn = Some(self.elapsed);
    }

    pub fn reaction_ms(&self) -> f32 {
        match self.last_spawn {
            Some(t) => ((self.elapsed - t) * 1000.0) as f32,
            None => DEFAULT_REACTION_MS,
        }
    }

    /// Stamp a click at the current time.
    pub fn stamp(&self, pos: Vec2, success: bool) -> ClickRecord {
        ClickRecord {
            pos,
            timestamp: self.elapsed,
            success,
            reaction_ms: self.reaction_ms(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
