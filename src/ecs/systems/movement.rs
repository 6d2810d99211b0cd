use crate::ecs::components::{Position, Velocity};

/// Integrate velocity into position.
/// No bounds clamping: entities drift off-screen and the behavior
/// controller despawns them once they are past the margin.
pub fn integrate(world: &mut hecs::World, dt: f32) {
    for (_, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
        pos.0 += vel.0 * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn advances_by_velocity() {
        let mut world = hecs::World::new();
        let e = world.spawn((Position(Vec2::new(10.0, 10.0)), Velocity(Vec2::new(60.0, -30.0))));
        integrate(&mut world, 0.5);
        let pos = world.get::<&Position>(e).unwrap().0;
        assert_eq!(pos, Vec2::new(40.0, -5.0));
    }
}
