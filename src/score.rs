/// Lives at session start.
pub const STARTING_LIVES: u32 = 3;

/// A change the UI may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreEvent {
    Score { score: u32, delta: i64 },
    Combo { combo: u32, max_combo: u32 },
    Lives { lives: u32 },
}

/// Score, combo multiplier and lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBoard {
    score: u32,
    combo: u32,
    max_combo: u32,
    lives: u32,
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self {
            score: 0,
            combo: 1,
            max_combo: 1,
            lives: STARTING_LIVES,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Add `points` scaled by the current combo.
    pub fn add(&mut self, points: u32) -> ScoreEvent {
        let gained = points.saturating_mul(self.combo);
        self.score = self.score.saturating_add(gained);
        ScoreEvent::Score {
            score: self.score,
            delta: gained as i64,
        }
    }

    /// Remove `points`, never dropping below zero.
    pub fn subtract(&mut self, points: u32) -> ScoreEvent {
        let before = self.score;
        self.score = self.score.saturating_sub(points);
        ScoreEvent::Score {
            score: self.score,
            delta: self.score as i64 - before as i64,
        }
    }

    pub fn increase_combo(&mut self) -> ScoreEvent {
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.combo_event()
    }

    pub fn reset_combo(&mut self) -> ScoreEvent {
        self.combo = 1;
        self.combo_event()
    }

    pub fn lose_life(&mut self) -> ScoreEvent {
        self.lives = self.lives.saturating_sub(1);
        ScoreEvent::Lives { lives: self.lives }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn combo_event(&self) -> ScoreEvent {
        ScoreEvent::Combo {
            combo: self.combo,
            max_combo: self.max_combo,
        }
    }
}
