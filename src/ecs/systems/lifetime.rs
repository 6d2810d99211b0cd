use crate::ecs::components::Lifetime;

/// Despawn every entity older than its max age. Returns what was removed so
/// the caller can drop any per-entity bookkeeping.
pub fn expire(world: &mut hecs::World, now: f64) -> Vec<hecs::Entity> {
    let expired: Vec<hecs::Entity> = world
        .query::<&Lifetime>()
        .iter()
        .filter(|(_, life)| life.expired(now))
        .map(|(entity, _)| entity)
        .collect();

    for &entity in &expired {
        let _ = world.despawn(entity);
    }
    if !expired.is_empty() {
        log::debug!("Expired {} entities", expired.len());
    }
    expired
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_only_old_entities() {
        let mut world = hecs::World::new();
        let old = world.spawn((Lifetime {
            spawned_at: 0.0,
            max_age: 5.0,
        },));
        let young = world.spawn((Lifetime {
            spawned_at: 4.0,
            max_age: 5.0,
        },));

        let removed = expire(&mut world, 6.0);
        assert_eq!(removed, vec![old]);
        assert!(!world.contains(old));
        assert!(world.contains(young));
    }
}
