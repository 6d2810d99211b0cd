//! Movement patterns: per-entity velocity update strategies.
//!
//! A pattern instance belongs to exactly one entity. Evasive keeps its own
//! timer and heading, so instances must never be shared.

use std::f32::consts::FRAC_PI_2;
use std::f32::consts::FRAC_PI_4;

use glam::Vec2;

use crate::config::{BehaviorConfig, Viewport};
use crate::ecs::components::{BehaviorState, EntityKind};
use crate::steering::{self, Agent};
use crate::util::rand::RandomSource;
use crate::util::vector::{from_heading, heading, limit};

/// Sinusoidal wave amplitude (units/second).
const WAVE_AMPLITUDE: f32 = 50.0;
/// Sinusoidal wave frequency (radians/second).
const WAVE_FREQUENCY: f32 = 2.0;
/// Seconds between evasive heading changes.
const EVASIVE_INTERVAL: f64 = 0.5;
/// Schooling separation distance.
const SEPARATION_DISTANCE: f32 = 50.0;
/// Schooling speed cap.
const SCHOOLING_MAX_SPEED: f32 = 60.0;

/// Shared per-tick inputs.
#[derive(Debug, Clone, Copy)]
pub struct BehaviorContext {
    pub viewport: Viewport,
    pub difficulty: f32,
    /// Accumulated session time in seconds.
    pub time: f64,
}

/// The entity a pattern is evaluated for.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub agent: Agent,
    pub kind: EntityKind,
    /// `None` for kinds without fish behavior.
    pub fish_state: Option<BehaviorState>,
    pub neighbors: &'a [Agent],
}

/// Weights and radius for the schooling blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchoolingWeights {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
    pub radius: f32,
}

impl Default for SchoolingWeights {
    fn default() -> Self {
        Self {
            separation: 1.5,
            alignment: 1.0,
            cohesion: 1.0,
            radius: 100.0,
        }
    }
}

impl From<&BehaviorConfig> for SchoolingWeights {
    fn from(config: &BehaviorConfig) -> Self {
        Self {
            separation: config.separation_weight,
            alignment: config.alignment_weight,
            cohesion: config.cohesion_weight,
            radius: config.schooling_radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Linear,
    Sinusoidal,
    Evasive,
    Schooling,
}

impl PatternKind {
    pub fn label(self) -> &'static str {
        match self {
            PatternKind::Linear => "Linear",
            PatternKind::Sinusoidal => "Sinusoidal",
            PatternKind::Evasive => "Evasive",
            PatternKind::Schooling => "Schooling",
        }
    }
}

/// One entity's movement pattern plus whatever state it keeps.
#[derive(Debug, Clone, PartialEq)]
pub enum MovementPattern {
    /// Straight-line continuation.
    Linear,
    /// Perpendicular wave on top of the current velocity.
    Sinusoidal { amplitude: f32, frequency: f32 },
    /// Zigzag: hold a heading, then jitter it by up to ±45°.
    Evasive {
        /// Session time of the last heading change. `None` until first use.
        last_change: Option<f64>,
        direction: Vec2,
    },
    Schooling(SchoolingWeights),
}

impl MovementPattern {
    pub fn linear() -> Self {
        Self::Linear
    }

    pub fn sinusoidal() -> Self {
        Self::Sinusoidal {
            amplitude: WAVE_AMPLITUDE,
            frequency: WAVE_FREQUENCY,
        }
    }

    pub fn evasive() -> Self {
        Self::Evasive {
            last_change: None,
            direction: Vec2::X,
        }
    }

    pub fn schooling(weights: SchoolingWeights) -> Self {
        Self::Schooling(weights)
    }

    pub fn from_kind(kind: PatternKind, weights: SchoolingWeights) -> Self {
        match kind {
            PatternKind::Linear => Self::linear(),
            PatternKind::Sinusoidal => Self::sinusoidal(),
            PatternKind::Evasive => Self::evasive(),
            PatternKind::Schooling => Self::schooling(weights),
        }
    }

    pub fn kind(&self) -> PatternKind {
        match self {
            Self::Linear => PatternKind::Linear,
            Self::Sinusoidal { .. } => PatternKind::Sinusoidal,
            Self::Evasive { .. } => PatternKind::Evasive,
            Self::Schooling(_) => PatternKind::Schooling,
        }
    }

    /// New velocity for `subject` this tick.
    pub fn calculate(
        &mut self,
        subject: &Subject<'_>,
        dt: f32,
        ctx: &BehaviorContext,
        rng: &mut impl RandomSource,
    ) -> Vec2 {
        let vel = subject.agent.vel;
        match self {
            Self::Linear => vel,

            Self::Sinusoidal {
                amplitude,
                frequency,
            } => {
                let perp = heading(vel) + FRAC_PI_2;
                let offset = (ctx.time as f32 * *frequency).sin() * *amplitude * dt;
                vel + from_heading(perp, offset)
            }

            Self::Evasive {
                last_change,
                direction,
            } => match *last_change {
                None => {
                    *last_change = Some(ctx.time);
                    *direction = vel;
                    vel
                }
                Some(t) if ctx.time - t >= EVASIVE_INTERVAL => {
                    let jitter = rng.range(-FRAC_PI_4, FRAC_PI_4);
                    *direction = from_heading(heading(vel) + jitter, vel.length());
                    *last_change = Some(ctx.time);
                    *direction
                }
                Some(_) => *direction,
            },

            Self::Schooling(weights) => schooling(subject, weights),
        }
    }
}

fn schooling(subject: &Subject<'_>, w: &SchoolingWeights) -> Vec2 {
    let agent = &subject.agent;
    if !subject.kind.is_prey_fish()
        || subject.fish_state == Some(BehaviorState::Fleeing)
        || subject.neighbors.is_empty()
    {
        return agent.vel;
    }

    let separation = steering::separate(agent, subject.neighbors, SEPARATION_DISTANCE);
    let alignment = steering::align(agent, subject.neighbors, w.radius);
    let cohesion = steering::cohere(agent, subject.neighbors, w.radius);

    let accel = separation * w.separation + alignment * w.alignment + cohesion * w.cohesion;
    limit(agent.vel + accel, SCHOOLING_MAX_SPEED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::rand::ScriptedRng;

    fn ctx(time: f64) -> BehaviorContext {
        BehaviorContext {
            viewport: Viewport::default(),
            difficulty: 0.5,
            time,
        }
    }

    fn subject<'a>(world: &mut hecs::World, vel: Vec2, neighbors: &'a [Agent]) -> Subject<'a> {
        Subject {
            agent: Agent {
                id: world.spawn(()),
                pos: Vec2::new(100.0, 100.0),
                vel,
            },
            kind: EntityKind::Fish,
            fish_state: Some(BehaviorState::Normal),
            neighbors,
        }
    }

    #[test]
    fn linear_keeps_velocity() {
        let mut world = hecs::World::new();
        let s = subject(&mut world, Vec2::new(3.0, -4.0), &[]);
        let mut rng = ScriptedRng::new(&[0.5]);
        let v = MovementPattern::linear().calculate(&s, 1.0 / 60.0, &ctx(1.0), &mut rng);
        assert_eq!(v, Vec2::new(3.0, -4.0));
    }

    #[test]
    fn sinusoidal_offsets_perpendicular() {
        let mut world = hecs::World::new();
        let s = subject(&mut world, Vec2::new(30.0, 0.0), &[]);
        let mut rng = ScriptedRng::new(&[0.5]);
        // sin(0.25 * PI * 2) = 1 at time PI/4.
        let time = std::f64::consts::FRAC_PI_4;
        let v = MovementPattern::sinusoidal().calculate(&s, 0.1, &ctx(time), &mut rng);
        assert!((v.x - 30.0).abs() < 1e-4);
        assert!((v.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn evasive_holds_then_turns_with_same_speed() {
        let mut world = hecs::World::new();
        let s = subject(&mut world, Vec2::new(40.0, 0.0), &[]);
        // 1.0 maps to +45 degrees.
        let mut rng = ScriptedRng::new(&[1.0]);
        let mut pattern = MovementPattern::evasive();

        let first = pattern.calculate(&s, 0.016, &ctx(1.0), &mut rng);
        assert_eq!(first, Vec2::new(40.0, 0.0));
        let held = pattern.calculate(&s, 0.016, &ctx(1.3), &mut rng);
        assert_eq!(held, first);
        assert_eq!(rng.draws(), 0);

        let turned = pattern.calculate(&s, 0.016, &ctx(1.5), &mut rng);
        assert!((turned.length() - 40.0).abs() < 1e-3);
        assert!(turned.y > 0.0);
        assert!((heading(turned) - FRAC_PI_4).abs() < 1e-3);
    }

    #[test]
    fn evasive_state_is_per_instance() {
        let mut world = hecs::World::new();
        let s = subject(&mut world, Vec2::new(10.0, 0.0), &[]);
        let mut rng = ScriptedRng::new(&[0.0]);
        let mut a = MovementPattern::evasive();
        let b = MovementPattern::evasive();
        a.calculate(&s, 0.016, &ctx(2.0), &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn schooling_short_circuits() {
        let mut world = hecs::World::new();
        let neighbor = Agent {
            id: world.spawn(()),
            pos: Vec2::new(120.0, 100.0),
            vel: Vec2::new(0.0, 20.0),
        };
        let neighbors = [neighbor];
        let mut rng = ScriptedRng::new(&[0.5]);
        let mut pattern = MovementPattern::schooling(SchoolingWeights::default());
        let vel = Vec2::new(20.0, 0.0);

        let lonely = subject(&mut world, vel, &[]);
        assert_eq!(pattern.calculate(&lonely, 0.016, &ctx(0.0), &mut rng), vel);

        let mut fleeing = subject(&mut world, vel, &neighbors);
        fleeing.fish_state = Some(BehaviorState::Fleeing);
        assert_eq!(pattern.calculate(&fleeing, 0.016, &ctx(0.0), &mut rng), vel);

        let mut decoy = subject(&mut world, vel, &neighbors);
        decoy.kind = EntityKind::Decoy;
        decoy.fish_state = None;
        assert_eq!(pattern.calculate(&decoy, 0.016, &ctx(0.0), &mut rng), vel);

        let schooling = subject(&mut world, vel, &neighbors);
        let v = pattern.calculate(&schooling, 0.016, &ctx(0.0), &mut rng);
        assert_ne!(v, vel);
        assert!(v.length() <= SCHOOLING_MAX_SPEED + 1e-4);
    }

    #[test]
    fn schooling_caps_speed() {
        let mut world = hecs::World::new();
        let neighbor = Agent {
            id: world.spawn(()),
            pos: Vec2::new(130.0, 100.0),
            vel: Vec2::new(200.0, 0.0),
        };
        let neighbors = [neighbor];
        let fast = subject(&mut world, Vec2::new(200.0, 0.0), &neighbors);
        let mut rng = ScriptedRng::new(&[0.5]);
        let v = MovementPattern::schooling(SchoolingWeights::default())
            .calculate(&fast, 0.016, &ctx(0.0), &mut rng);
        assert!((v.length() - SCHOOLING_MAX_SPEED).abs() < 1e-3);
    }
}
