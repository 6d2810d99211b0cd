/// Uniform random source used by every AI decision.
///
/// Production code hands in a `fastrand::Rng`; tests hand in a seeded one or a
/// [`ScriptedRng`] to pin exact draws.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// True with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Uniform value in `[lo, hi)`.
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.unit() * (hi - lo)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.unit() * len as f32) as usize).min(len.saturating_sub(1))
    }

    /// Uniform angle in `[0, TAU)`.
    fn angle(&mut self) -> f32 {
        self.unit() * std::f32::consts::TAU
    }
}

impl RandomSource for fastrand::Rng {
    fn unit(&mut self) -> f32 {
        self.f32()
    }

    fn index(&mut self, len: usize) -> usize {
        self.usize(0..len)
    }
}

/// Replays a fixed list of unit draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: &[f32]) -> Self {
        Self {
            values: if values.is_empty() {
                vec![0.0]
            } else {
                values.to_vec()
            },
            cursor: 0,
        }
    }

    /// How many draws have been taken so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn unit(&mut self) -> f32 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(0.0, 0.999_999)
    }
}
