use std::collections::HashMap;

use glam::Vec2;

use crate::config::{BehaviorConfig, Viewport};
use crate::ecs::components::{BehaviorState, EntityKind, FishState, Kind, Position, Velocity};
use crate::pattern::{BehaviorContext, MovementPattern, PatternKind, SchoolingWeights, Subject};
use crate::steering::Agent;
use crate::util::rand::RandomSource;
use crate::util::vector::from_heading;

/// Entities further than this outside the viewport are despawned.
pub const DESPAWN_MARGIN: f32 = 100.0;
/// Speed of a freshly startled fish.
const FLEE_SPEED: f32 = 60.0;

/// True once `pos` has drifted more than the margin outside the viewport.
pub fn should_despawn(pos: Vec2, viewport: &Viewport) -> bool {
    pos.x < -DESPAWN_MARGIN
        || pos.x > viewport.width + DESPAWN_MARGIN
        || pos.y < -DESPAWN_MARGIN
        || pos.y > viewport.height + DESPAWN_MARGIN
}

/// Speed multiplier the controller applies on top of pattern output.
pub fn speed_scale(difficulty: f32) -> f32 {
    0.8 + difficulty * 0.3
}

/// Pick a pattern by kind and difficulty.
pub fn pick_pattern(kind: EntityKind, difficulty: f32, rng: &mut impl RandomSource) -> PatternKind {
    if !kind.is_prey_fish() {
        return if rng.chance(0.7) {
            PatternKind::Linear
        } else {
            PatternKind::Sinusoidal
        };
    }
    if difficulty < 0.3 {
        PatternKind::Linear
    } else if difficulty < 0.7 {
        if rng.chance(0.5) {
            PatternKind::Linear
        } else {
            PatternKind::Sinusoidal
        }
    } else {
        let roll = rng.unit();
        if roll < 0.33 {
            PatternKind::Linear
        } else if roll < 0.66 {
            PatternKind::Sinusoidal
        } else {
            PatternKind::Evasive
        }
    }
}

/// One entity's pattern and the speed scale already baked into its velocity.
#[derive(Debug, Clone)]
struct PatternSlot {
    pattern: MovementPattern,
    applied_scale: f32,
}

impl PatternSlot {
    fn new(pattern: MovementPattern) -> Self {
        Self {
            pattern,
            applied_scale: 1.0,
        }
    }
}

/// Per-entity snapshot for one update pass.
struct Record {
    agent: Agent,
    /// Speed scale baked into `agent.vel` when the snapshot was taken.
    scale: f32,
    kind: EntityKind,
    fish_state: Option<BehaviorState>,
    nearby: Vec<hecs::Entity>,
}

/// Owns movement pattern assignments and drives fish behavior state.
pub struct BehaviorController {
    viewport: Viewport,
    config: BehaviorConfig,
    slots: HashMap<hecs::Entity, PatternSlot>,
    /// Accumulated simulation time (seconds).
    time: f64,
    // Scratch buffers, reused each tick.
    records: Vec<Record>,
    neighbors: Vec<Agent>,
    updates: Vec<(hecs::Entity, Vec2)>,
}

impl BehaviorController {
    pub fn new(viewport: Viewport, config: BehaviorConfig) -> Self {
        Self {
            viewport,
            config,
            slots: HashMap::new(),
            time: 0.0,
            records: Vec::with_capacity(64),
            neighbors: Vec::with_capacity(16),
            updates: Vec::with_capacity(64),
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    /// Number of live pattern assignments.
    pub fn assigned_count(&self) -> usize {
        self.slots.len()
    }

    pub fn pattern_of(&self, entity: hecs::Entity) -> Option<PatternKind> {
        self.slots.get(&entity).map(|s| s.pattern.kind())
    }

    /// Assign a pattern by kind and difficulty, replacing any previous one.
    pub fn assign_behavior(
        &mut self,
        entity: hecs::Entity,
        kind: EntityKind,
        difficulty: f32,
        rng: &mut impl RandomSource,
    ) -> PatternKind {
        let chosen = pick_pattern(kind, difficulty, rng);
        let pattern = MovementPattern::from_kind(chosen, SchoolingWeights::from(&self.config));
        log::trace!("{:?} ({}) -> {}", entity, kind.label(), chosen.label());
        self.slots.insert(entity, PatternSlot::new(pattern));
        chosen
    }

    /// Assign a specific pattern, replacing any previous one.
    pub fn assign_pattern(&mut self, entity: hecs::Entity, pattern: MovementPattern) {
        self.slots.insert(entity, PatternSlot::new(pattern));
    }

    /// Rebuild every fish's neighbor list and settle its behavior state.
    /// All-pairs distance check: fine at a few dozen fish.
    pub fn calculate_schooling(&mut self, world: &mut hecs::World) {
        let radius = self.config.schooling_radius;
        let now = self.time;

        let fish: Vec<(hecs::Entity, Vec2)> = world
            .query::<(&Position, &FishState)>()
            .iter()
            .map(|(entity, (pos, _))| (entity, pos.0))
            .collect();

        for &(entity, pos) in &fish {
            let Ok(mut state) = world.get::<&mut FishState>(entity) else {
                continue;
            };

            if state.state == BehaviorState::Fleeing && now >= state.flee_until {
                state.state = BehaviorState::Normal;
            }

            state.nearby.clear();
            for &(other, other_pos) in &fish {
                if other != entity && pos.distance(other_pos) < radius {
                    state.nearby.push(other);
                }
            }

            if !state.nearby.is_empty() && state.state != BehaviorState::Fleeing {
                state.state = BehaviorState::Schooling;
            } else if state.state == BehaviorState::Schooling {
                state.state = BehaviorState::Normal;
            }
        }
    }

    /// Advance every entity's velocity one tick. Entities past the despawn
    /// margin are removed from the registry and returned.
    pub fn update(
        &mut self,
        world: &mut hecs::World,
        dt: f32,
        difficulty: f32,
        rng: &mut impl RandomSource,
    ) -> Vec<hecs::Entity> {
        self.time += dt as f64;
        self.calculate_schooling(world);

        let ctx = BehaviorContext {
            viewport: self.viewport,
            difficulty,
            time: self.time,
        };
        let scale = speed_scale(difficulty);
        let weights = SchoolingWeights::from(&self.config);

        // Snapshot first so every entity sees pre-update neighbor velocities.
        self.records.clear();
        for (entity, (pos, vel, kind, fish)) in world
            .query::<(&Position, &Velocity, &Kind, Option<&FishState>)>()
            .iter()
        {
            self.records.push(Record {
                agent: Agent {
                    id: entity,
                    pos: pos.0,
                    vel: vel.0,
                },
                scale: self.slots.get(&entity).map_or(1.0, |s| s.applied_scale),
                kind: kind.0,
                fish_state: fish.map(|f| f.state),
                nearby: fish.map(|f| f.nearby.clone()).unwrap_or_default(),
            });
        }

        self.updates.clear();
        for record in &self.records {
            let id = record.agent.id;
            if !self.slots.contains_key(&id) {
                let chosen = pick_pattern(record.kind, difficulty, rng);
                log::trace!("{:?} ({}) -> {} (lazy)", id, record.kind.label(), chosen.label());
                self.slots
                    .insert(id, PatternSlot::new(MovementPattern::from_kind(chosen, weights)));
            }
            let Some(slot) = self.slots.get_mut(&id) else {
                continue;
            };

            let base = record.agent.vel / record.scale;
            let next_base = if record.fish_state == Some(BehaviorState::Fleeing) {
                // Flee velocity overrides the pattern until it expires.
                base
            } else {
                // Neighbors are compared at their unscaled speed too.
                self.neighbors.clear();
                self.neighbors.extend(record.nearby.iter().filter_map(|other| {
                    self.records
                        .iter()
                        .find(|r| r.agent.id == *other)
                        .map(|r| Agent {
                            vel: r.agent.vel / r.scale,
                            ..r.agent
                        })
                }));
                let subject = Subject {
                    agent: Agent {
                        vel: base,
                        ..record.agent
                    },
                    kind: record.kind,
                    fish_state: record.fish_state,
                    neighbors: &self.neighbors,
                };
                slot.pattern.calculate(&subject, dt, &ctx, rng)
            };

            slot.applied_scale = scale;
            self.updates.push((id, next_base * scale));
        }

        let mut despawned = Vec::new();
        for &(entity, new_vel) in &self.updates {
            if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
                vel.0 = new_vel;
            }
            let out = world
                .get::<&Position>(entity)
                .map(|pos| should_despawn(pos.0, &self.viewport))
                .unwrap_or(false);
            if out {
                despawned.push(entity);
            }
        }

        for &entity in &despawned {
            let _ = world.despawn(entity);
            self.remove_entity(entity);
        }
        if !despawned.is_empty() {
            log::debug!("Despawned {} off-screen entities", despawned.len());
        }
        despawned
    }

    /// Startle every prey fish within `radius` of `epicenter`: it flees
    /// straight away from the epicenter at a fixed speed. Returns how many
    /// fish were startled.
    pub fn trigger_flee_response(
        &mut self,
        world: &mut hecs::World,
        epicenter: Vec2,
        radius: f32,
    ) -> usize {
        let now = self.time;
        let duration = self.config.flee_duration;
        let mut startled = Vec::new();

        for (entity, (pos, vel, kind, fish)) in
            world.query_mut::<(&Position, &mut Velocity, &Kind, &mut FishState)>()
        {
            if !kind.0.is_prey_fish() {
                continue;
            }
            let delta = pos.0 - epicenter;
            if delta.length() < radius {
                fish.start_fleeing(now, duration);
                vel.0 = from_heading(delta.y.atan2(delta.x), FLEE_SPEED);
                startled.push(entity);
            }
        }

        // The flee velocity is unscaled; the next update applies the scale.
        for entity in &startled {
            if let Some(slot) = self.slots.get_mut(entity) {
                slot.applied_scale = 1.0;
            }
        }
        if !startled.is_empty() {
            log::debug!(
                "Flee response at ({:.0}, {:.0}) startled {} fish",
                epicenter.x,
                epicenter.y,
                startled.len()
            );
        }
        startled.len()
    }

    /// Drop the pattern assignment of a despawned entity.
    pub fn remove_entity(&mut self, entity: hecs::Entity) {
        self.slots.remove(&entity);
    }

    /// Clear every assignment and restart the clock.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.time = 0.0;
    }
}
