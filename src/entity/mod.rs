use glam::Vec2;

use crate::ecs::components::*;
use crate::powerup::PowerUpKind;
use crate::util::rand::RandomSource;

/// Per-kind spawn attributes.
#[derive(Debug, Clone, Copy)]
struct Archetype {
    max_age: f32,
    half_extents: Vec2,
}

fn archetype(kind: EntityKind) -> Archetype {
    let (max_age, w, h) = match kind {
        EntityKind::Fish => (30.0, 40.0, 28.0),
        EntityKind::Decoy => (30.0, 32.0, 32.0),
        EntityKind::GoldenFish => (15.0, 45.0, 32.0),
        EntityKind::PowerUp => (12.0, 30.0, 30.0),
        EntityKind::Treasure => (10.0, 40.0, 35.0),
        EntityKind::Shark => (20.0, 80.0, 40.0),
        EntityKind::School => (25.0, 80.0, 60.0),
        EntityKind::BonusCreature => (18.0, 60.0, 40.0),
    };
    Archetype {
        max_age,
        half_extents: Vec2::new(w * 0.5, h * 0.5),
    }
}

/// Roll the click reward for a freshly spawned entity.
fn roll_reward(kind: EntityKind, rng: &mut impl RandomSource) -> Reward {
    match kind {
        EntityKind::Fish => Reward::Points(10),
        EntityKind::Decoy => Reward::Penalty(5),
        EntityKind::GoldenFish => Reward::Points(30),
        EntityKind::PowerUp => Reward::Pickup(PowerUpKind::roll(rng)),
        // 50-100 points
        EntityKind::Treasure => Reward::Points(50 + rng.index(50) as u32),
        EntityKind::Shark => Reward::Penalty(20),
        EntityKind::School => Reward::Points(25),
        // Turtle, dolphin or whale
        EntityKind::BonusCreature => {
            const POINTS: [u32; 3] = [40, 50, 100];
            Reward::Points(POINTS[rng.index(POINTS.len())])
        }
    }
}

/// Spawn one entity of `kind` into the registry.
pub fn spawn(
    world: &mut hecs::World,
    kind: EntityKind,
    pos: Vec2,
    vel: Vec2,
    now: f64,
    rng: &mut impl RandomSource,
) -> hecs::Entity {
    let arch = archetype(kind);
    let reward = roll_reward(kind, rng);
    let entity = world.spawn((
        Position(pos),
        Velocity(vel),
        Kind(kind),
        Lifetime {
            spawned_at: now,
            max_age: arch.max_age,
        },
        Hitbox(arch.half_extents),
        reward,
    ));
    if kind.is_prey_fish() {
        // Only prey fish school and flee.
        let _ = world.insert_one(entity, FishState::new());
    }
    log::trace!("Spawned {} at ({:.0}, {:.0})", kind.label(), pos.x, pos.y);
    entity
}

/// First entity whose hit box contains `point`.
pub fn at_point(world: &hecs::World, point: Vec2) -> Option<(hecs::Entity, EntityKind)> {
    world
        .query::<(&Position, &Hitbox, &Kind)>()
        .iter()
        .find(|(_, (pos, hitbox, _))| hitbox.contains(pos.0, point))
        .map(|(entity, (_, _, kind))| (entity, kind.0))
}

/// Nearest entity of `kind` to `point`, if any.
pub fn nearest_of_kind(
    world: &hecs::World,
    kind: EntityKind,
    point: Vec2,
) -> Option<(hecs::Entity, Vec2)> {
    let mut best: Option<(hecs::Entity, Vec2)> = None;
    let mut best_dist_sq = f32::MAX;
    for (entity, (pos, k)) in world.query::<(&Position, &Kind)>().iter() {
        if k.0 != kind {
            continue;
        }
        let dist_sq = (pos.0 - point).length_squared();
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some((entity, pos.0));
        }
    }
    best
}
