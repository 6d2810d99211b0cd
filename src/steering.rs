//! Classic steering forces. Each function returns a force; callers weight,
//! sum and clamp them.

use glam::Vec2;

use crate::util::vector::limit;

/// Speed used when cohesion seeks the local centroid.
const COHESION_SEEK_SPEED: f32 = 50.0;

/// Position/velocity snapshot of one entity, taken before any velocity is
/// rewritten this tick.
#[derive(Debug, Clone, Copy)]
pub struct Agent {
    pub id: hecs::Entity,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Steer toward `target` at `max_speed`. Force is clamped to 10% of max speed.
pub fn seek(agent: &Agent, target: Vec2, max_speed: f32) -> Vec2 {
    let to_target = target - agent.pos;
    if to_target == Vec2::ZERO {
        return Vec2::ZERO;
    }
    let desired = to_target.normalize_or_zero() * max_speed;
    limit(desired - agent.vel, max_speed * 0.1)
}

/// Steer away from `threat`. Force is clamped to 20% of max speed.
pub fn flee(agent: &Agent, threat: Vec2, max_speed: f32) -> Vec2 {
    let away = agent.pos - threat;
    if away == Vec2::ZERO {
        return Vec2::ZERO;
    }
    let desired = away.normalize_or_zero() * max_speed;
    limit(desired - agent.vel, max_speed * 0.2)
}

/// Neighbors strictly inside `radius`, excluding `agent` itself and any
/// neighbor sitting exactly on top of it.
fn within<'a>(
    agent: &'a Agent,
    neighbors: &'a [Agent],
    radius: f32,
) -> impl Iterator<Item = (&'a Agent, f32)> + 'a {
    neighbors.iter().filter_map(move |other| {
        if other.id == agent.id {
            return None;
        }
        let dist = agent.pos.distance(other.pos);
        (dist > 0.0 && dist < radius).then_some((other, dist))
    })
}

/// Push away from crowding neighbors, weighted by inverse distance.
pub fn separate(agent: &Agent, neighbors: &[Agent], desired_separation: f32) -> Vec2 {
    let mut steer = Vec2::ZERO;
    let mut count = 0u32;
    for (other, dist) in within(agent, neighbors, desired_separation) {
        steer += (agent.pos - other.pos).normalize_or_zero() / dist;
        count += 1;
    }
    if count > 0 {
        steer / count as f32
    } else {
        Vec2::ZERO
    }
}

/// Match the average heading of nearby neighbors. Clamped to magnitude 1.
pub fn align(agent: &Agent, neighbors: &[Agent], neighbor_dist: f32) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0u32;
    for (other, _) in within(agent, neighbors, neighbor_dist) {
        sum += other.vel;
        count += 1;
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    limit(sum / count as f32 - agent.vel, 1.0)
}

/// Seek the centroid of nearby neighbors at a reduced speed.
pub fn cohere(agent: &Agent, neighbors: &[Agent], neighbor_dist: f32) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0u32;
    for (other, _) in within(agent, neighbors, neighbor_dist) {
        sum += other.pos;
        count += 1;
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    seek(agent, sum / count as f32, COHESION_SEEK_SPEED)
}
