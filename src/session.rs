//! One game session: the registry plus every controller, driven by a fixed
//! timestep `tick` and player `click`s.

use glam::Vec2;
use instant::Instant;

use crate::analytics::PlayerAnalytics;
use crate::click::ReactionClock;
use crate::config::{ConfigError, GameConfig, Viewport};
use crate::debug::timer::{SystemPhase, SystemTimers};
use crate::difficulty::{ActionResult, DifficultyController};
use crate::ecs::components::{EntityKind, Reward};
use crate::ecs::systems::behavior::BehaviorController;
use crate::ecs::systems::{lifetime, movement};
use crate::entity;
use crate::pattern::{MovementPattern, SchoolingWeights};
use crate::powerup::{PowerUpKind, PowerUps, POWER_UP_DURATION};
use crate::score::{ScoreBoard, ScoreEvent};
use crate::spawner::SmartSpawner;
use crate::util::rand::RandomSource;
use crate::util::vector::from_heading;

/// Share of regular spawns that are prey fish.
const FISH_SHARE: f32 = 0.7;
/// Share of fallback spawns entering from an edge.
const EDGE_SHARE: f32 = 0.6;
const COACHING_CHANCE: f32 = 0.2;
/// How far offscreen regular and special spawns start.
const REGULAR_EDGE_OFFSET: f32 = 20.0;
const SPECIAL_EDGE_OFFSET: f32 = 50.0;
/// Spread of a shoal around its center.
const SHOAL_RADIUS: f32 = 40.0;

/// Why an entity left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DespawnReason {
    Expired,
    OffScreen,
    Clicked,
}

/// Something the UI layer may want to show.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Spawned {
        entity: hecs::Entity,
        kind: EntityKind,
        pos: Vec2,
    },
    Despawned {
        entity: hecs::Entity,
        reason: DespawnReason,
    },
    /// A reward entity was clicked.
    Popped { kind: EntityKind, points: u32 },
    /// A decoy or hazard was clicked.
    Penalized { kind: EntityKind, points: u32 },
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    /// The shield took a decoy hit in place of the player.
    ShieldAbsorbed,
    Missed { pos: Vec2 },
    FishStartled { count: usize },
    Score(ScoreEvent),
    CoachingTip(String),
    GameOver,
}

/// Recurring spawn of one special kind.
#[derive(Debug, Clone, Copy)]
struct SpecialSchedule {
    kind: EntityKind,
    first_at: f64,
    /// Seconds between spawns after the first.
    interval: (f32, f32),
    next_at: f64,
}

impl SpecialSchedule {
    const fn new(kind: EntityKind, first_at: f64, min: f32, max: f32) -> Self {
        Self {
            kind,
            first_at,
            interval: (min, max),
            next_at: first_at,
        }
    }
}

fn special_schedules() -> [SpecialSchedule; 6] {
    [
        SpecialSchedule::new(EntityKind::GoldenFish, 15.0, 20.0, 35.0),
        SpecialSchedule::new(EntityKind::PowerUp, 10.0, 15.0, 25.0),
        SpecialSchedule::new(EntityKind::Treasure, 20.0, 25.0, 40.0),
        SpecialSchedule::new(EntityKind::Shark, 25.0, 30.0, 50.0),
        SpecialSchedule::new(EntityKind::School, 18.0, 22.0, 35.0),
        SpecialSchedule::new(EntityKind::BonusCreature, 30.0, 35.0, 60.0),
    ]
}

/// Enter from a random edge, `offset` outside the viewport, moving inward at
/// a speed in `speed`.
fn edge_entry(
    viewport: &Viewport,
    offset: f32,
    speed: (f32, f32),
    rng: &mut impl RandomSource,
) -> (Vec2, Vec2) {
    let Viewport { width, height } = *viewport;
    match rng.index(4) {
        // Top
        0 => {
            let pos = Vec2::new(rng.unit() * width, -offset);
            let vel = Vec2::new((rng.unit() - 0.5) * 30.0, rng.range(speed.0, speed.1));
            (pos, vel)
        }
        // Right
        1 => {
            let pos = Vec2::new(width + offset, rng.unit() * height);
            let vel = Vec2::new(-rng.range(speed.0, speed.1), (rng.unit() - 0.5) * 30.0);
            (pos, vel)
        }
        // Bottom
        2 => {
            let pos = Vec2::new(rng.unit() * width, height + offset);
            let vel = Vec2::new((rng.unit() - 0.5) * 30.0, -rng.range(speed.0, speed.1));
            (pos, vel)
        }
        // Left
        _ => {
            let pos = Vec2::new(-offset, rng.unit() * height);
            let vel = Vec2::new(rng.range(speed.0, speed.1), (rng.unit() - 0.5) * 30.0);
            (pos, vel)
        }
    }
}

fn random_heading(speed: (f32, f32), rng: &mut impl RandomSource) -> Vec2 {
    let angle = rng.angle();
    from_heading(angle, rng.range(speed.0, speed.1))
}

/// Choose kind, position and velocity for a regular spawn. Analytics-driven
/// placement first, edge or mid-field placement otherwise.
fn plan_regular_spawn(
    analytics: &PlayerAnalytics,
    viewport: &Viewport,
    rng: &mut impl RandomSource,
) -> (EntityKind, Vec2, Vec2) {
    let kind = if rng.chance(FISH_SHARE) {
        EntityKind::Fish
    } else {
        EntityKind::Decoy
    };

    let spawner = SmartSpawner::new(analytics, *viewport);
    let smart = match kind {
        EntityKind::Decoy => spawner
            .suggest_decoy_position(rng)
            .map(|pos| (pos, random_heading((15.0, 30.0), rng))),
        _ => {
            if spawner.should_spawn_challenging_fish(rng) {
                let pos = spawner.challenging_fish_position(rng);
                Some((pos, random_heading((25.0, 40.0), rng)))
            } else {
                spawner
                    .suggest_fish_position(rng)
                    .map(|pos| (pos, random_heading((20.0, 40.0), rng)))
            }
        }
    };

    let (pos, vel) = smart.unwrap_or_else(|| {
        if rng.chance(EDGE_SHARE) {
            edge_entry(viewport, REGULAR_EDGE_OFFSET, (20.0, 40.0), rng)
        } else {
            let pos = Vec2::new(
                rng.range(100.0, viewport.width - 100.0),
                rng.range(100.0, viewport.height - 100.0),
            );
            (pos, random_heading((20.0, 40.0), rng))
        }
    });
    (kind, pos, vel)
}

pub struct Session<R: RandomSource = fastrand::Rng> {
    config: GameConfig,
    world: hecs::World,
    behavior: BehaviorController,
    analytics: PlayerAnalytics,
    difficulty: DifficultyController,
    score: ScoreBoard,
    clock: ReactionClock,
    rng: R,
    power_ups: PowerUps,
    /// Seconds since the last regular spawn.
    spawn_elapsed: f32,
    specials: [SpecialSchedule; 6],
    timers: SystemTimers,
}

impl Session<fastrand::Rng> {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, fastrand::Rng::new())
    }
}

impl<R: RandomSource> Session<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            world: hecs::World::new(),
            behavior: BehaviorController::new(config.viewport, config.behavior),
            analytics: PlayerAnalytics::new(config.viewport),
            difficulty: DifficultyController::new(config.difficulty)?,
            score: ScoreBoard::new(),
            clock: ReactionClock::new(),
            rng,
            power_ups: PowerUps::new(),
            spawn_elapsed: 0.0,
            specials: special_schedules(),
            timers: SystemTimers::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn behavior(&self) -> &BehaviorController {
        &self.behavior
    }

    pub fn analytics(&self) -> &PlayerAnalytics {
        &self.analytics
    }

    pub fn difficulty(&self) -> &DifficultyController {
        &self.difficulty
    }

    pub fn score(&self) -> &ScoreBoard {
        &self.score
    }

    pub fn power_ups(&self) -> &PowerUps {
        &self.power_ups
    }

    pub fn timers(&self) -> &SystemTimers {
        &self.timers
    }

    /// Session time in seconds.
    pub fn time(&self) -> f64 {
        self.clock.now()
    }

    pub fn entity_count(&self) -> u32 {
        self.world.len()
    }

    /// Advance the simulation by `dt` seconds. Does nothing once the game
    /// is over.
    pub fn tick(&mut self, dt: f32) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.score.is_game_over() {
            return events;
        }
        self.clock.advance(dt);
        let now = self.clock.now();

        // Slow time stretches entity motion only; spawning and difficulty
        // stay on session time.
        let scaled_dt = dt * self.power_ups.time_multiplier();
        events.extend(
            self.power_ups
                .update(now)
                .into_iter()
                .map(|kind| SessionEvent::PowerUpExpired { kind }),
        );

        let started = Instant::now();
        for entity in lifetime::expire(&mut self.world, now) {
            self.behavior.remove_entity(entity);
            events.push(SessionEvent::Despawned {
                entity,
                reason: DespawnReason::Expired,
            });
        }
        self.timers.record(SystemPhase::Lifetime, started);

        let started = Instant::now();
        self.difficulty.update(dt);
        self.timers.record(SystemPhase::Difficulty, started);

        let started = Instant::now();
        let difficulty = self.difficulty.current();
        let off_screen = self
            .behavior
            .update(&mut self.world, scaled_dt, difficulty, &mut self.rng);
        events.extend(off_screen.into_iter().map(|entity| SessionEvent::Despawned {
            entity,
            reason: DespawnReason::OffScreen,
        }));
        self.timers.record(SystemPhase::Behavior, started);

        let started = Instant::now();
        movement::integrate(&mut self.world, scaled_dt);
        self.timers.record(SystemPhase::Movement, started);

        let started = Instant::now();
        self.spawn_elapsed += dt;
        if self.spawn_elapsed >= 1.0 / self.difficulty.spawn_rate() {
            self.spawn_elapsed = 0.0;
            events.push(self.spawn_regular());
        }
        self.spawn_specials(now, &mut events);
        self.timers.record(SystemPhase::Spawning, started);

        events
    }

    fn spawn_regular(&mut self) -> SessionEvent {
        let (kind, pos, vel) =
            plan_regular_spawn(&self.analytics, &self.config.viewport, &mut self.rng);
        let event = self.spawn(kind, pos, vel);
        self.clock.mark_spawn();
        event
    }

    fn spawn_specials(&mut self, now: f64, events: &mut Vec<SessionEvent>) {
        for i in 0..self.specials.len() {
            let schedule = self.specials[i];
            if now < schedule.next_at {
                continue;
            }
            let (pos, vel) = edge_entry(
                &self.config.viewport,
                SPECIAL_EDGE_OFFSET,
                (15.0, 30.0),
                &mut self.rng,
            );
            events.push(self.spawn(schedule.kind, pos, vel));
            let (min, max) = schedule.interval;
            self.specials[i].next_at = now + self.rng.range(min, max) as f64;
            log::debug!(
                "Spawned {}; next in {:.1}s",
                schedule.kind.label(),
                self.specials[i].next_at - now
            );
        }
    }

    /// Spawn one entity and give it a movement pattern.
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2, vel: Vec2) -> SessionEvent {
        let now = self.clock.now();
        let entity = entity::spawn(&mut self.world, kind, pos, vel, now, &mut self.rng);
        self.behavior
            .assign_behavior(entity, kind, self.difficulty.current(), &mut self.rng);
        SessionEvent::Spawned { entity, kind, pos }
    }

    /// Spawn `count` prey fish around `center`, all heading the same way and
    /// assigned the schooling pattern.
    pub fn spawn_shoal(&mut self, center: Vec2, count: usize) -> Vec<hecs::Entity> {
        let now = self.clock.now();
        let weights = SchoolingWeights::from(self.behavior.config());
        let heading = self.rng.angle();
        let mut spawned = Vec::with_capacity(count);

        for _ in 0..count {
            let angle = self.rng.angle();
            let offset = from_heading(angle, self.rng.range(0.0, SHOAL_RADIUS));
            let vel = from_heading(heading, self.rng.range(20.0, 30.0));
            let entity = entity::spawn(
                &mut self.world,
                EntityKind::Fish,
                center + offset,
                vel,
                now,
                &mut self.rng,
            );
            self.behavior
                .assign_pattern(entity, MovementPattern::schooling(weights));
            spawned.push(entity);
        }
        self.clock.mark_spawn();
        log::debug!(
            "Spawned shoal of {} at ({:.0}, {:.0})",
            count,
            center.x,
            center.y
        );
        spawned
    }

    /// Resolve a click at `pos`. Ignored once the game is over.
    pub fn click(&mut self, pos: Vec2) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.score.is_game_over() {
            return events;
        }

        let Some((target, kind)) = entity::at_point(&self.world, pos) else {
            self.difficulty.record_action(ActionResult::Miss);
            self.analytics.record_click(self.clock.stamp(pos, false));
            events.push(SessionEvent::Missed { pos });
            return events;
        };

        let Ok(reward) = self.world.get::<&Reward>(target).map(|r| *r) else {
            return events;
        };
        let _ = self.world.despawn(target);
        self.behavior.remove_entity(target);
        events.push(SessionEvent::Despawned {
            entity: target,
            reason: DespawnReason::Clicked,
        });

        let multiplier = self.power_ups.points_multiplier();
        match (kind, reward) {
            (EntityKind::Fish, Reward::Points(points)) => {
                let points = points * multiplier;
                events.push(SessionEvent::Score(self.score.add(points)));
                events.push(SessionEvent::Score(self.score.increase_combo()));
                events.push(SessionEvent::Popped { kind, points });

                let radius = self.behavior.config().flee_radius;
                let count = self.behavior.trigger_flee_response(&mut self.world, pos, radius);
                if count > 0 {
                    events.push(SessionEvent::FishStartled { count });
                }

                self.difficulty.record_action(ActionResult::FishPopped);
                self.analytics.record_click(self.clock.stamp(pos, true));
                if self.rng.chance(COACHING_CHANCE) {
                    if let Some(tip) = self.analytics.coaching_tip() {
                        events.push(SessionEvent::CoachingTip(tip));
                    }
                }
            }
            (_, Reward::Points(points)) => {
                let points = points * multiplier;
                events.push(SessionEvent::Score(self.score.add(points)));
                // Treasure scores but is not a catch.
                if kind.is_reward() {
                    events.push(SessionEvent::Score(self.score.increase_combo()));
                    self.analytics.record_click(self.clock.stamp(pos, true));
                }
                events.push(SessionEvent::Popped { kind, points });
            }
            (EntityKind::Decoy, Reward::Penalty(_)) if self.power_ups.consume_shield() => {
                log::debug!("Shield absorbed a decoy hit");
                events.push(SessionEvent::ShieldAbsorbed);
            }
            (EntityKind::Decoy, Reward::Penalty(points)) => {
                events.push(SessionEvent::Score(self.score.subtract(points)));
                events.push(SessionEvent::Score(self.score.reset_combo()));
                events.push(SessionEvent::Penalized { kind, points });
                self.difficulty.record_action(ActionResult::DecoyClicked);
                self.analytics.record_click(self.clock.stamp(pos, false));

                events.push(SessionEvent::Score(self.score.lose_life()));
                if self.score.is_game_over() {
                    log::info!("Game over with score {}", self.score.score());
                    events.push(SessionEvent::GameOver);
                }
            }
            (_, Reward::Penalty(points)) => {
                events.push(SessionEvent::Score(self.score.subtract(points)));
                events.push(SessionEvent::Score(self.score.reset_combo()));
                events.push(SessionEvent::Penalized { kind, points });
                self.analytics.record_click(self.clock.stamp(pos, false));
            }
            (_, Reward::Pickup(power_up)) => {
                self.power_ups
                    .activate(power_up, self.clock.now(), POWER_UP_DURATION);
                events.push(SessionEvent::PowerUpCollected { kind: power_up });
            }
        }

        events
    }

    /// Back to a fresh session with the same configuration.
    pub fn reset(&mut self) {
        self.world.clear();
        self.behavior.clear();
        self.analytics.reset();
        self.difficulty.reset();
        self.score.reset();
        self.clock.reset();
        self.power_ups.clear();
        self.spawn_elapsed = 0.0;
        for schedule in &mut self.specials {
            schedule.next_at = schedule.first_at;
        }
        log::info!("Session reset");
    }
}
