use log::trace;

use crate::geometry::Vec2;

use super::{context::PhysicsContext, sim_object::SimObject};

/// Advances one body by `dt`: integration followed by collision response for
/// bodies that collide.
pub fn step(body: &mut SimObject, context: &PhysicsContext, dt: f32) {
    let previous = body.bounds();
    let Some(movement) = integrate(body, context, dt) else {
        return;
    };
    if body.collides() {
        context.check_collisions(body, &previous, movement);
    }
}

/// Re-validates the resting surface, accumulates gravity, clamps velocity and
/// moves the body. Returns the movement applied, or `None` when the body is
/// resting and still.
pub fn integrate(body: &mut SimObject, context: &PhysicsContext, dt: f32) -> Option<Vec2> {
    revalidate_resting(body, context);

    let resting = body.resting_on().is_some();
    if resting && body.velocity().is_zero() {
        return None;
    }

    let mut velocity = body.velocity();
    if !resting {
        velocity += context.gravity() * (body.weight() * dt);
    }
    velocity = velocity.clamp_axes(context.config().max_velocity);
    body.set_velocity(velocity);

    let movement = velocity * dt;
    body.move_by(movement);
    trace!(
        "integrated to {:?} (velocity {:?}, resting {})",
        body.position(),
        velocity,
        resting
    );
    Some(movement)
}

/// Drops the resting surface when it no longer exists or the strip under
/// the body has stopped touching it.
fn revalidate_resting(body: &mut SimObject, context: &PhysicsContext) {
    let Some(surface) = body.resting_on() else {
        return;
    };
    let footprint = body.bounds().footprint(context.config().footprint_depth);
    let supported = context
        .index()
        .obstacle(surface)
        .map(|obstacle| footprint.overlaps(&obstacle.bounds()))
        .unwrap_or(false);
    if !supported {
        trace!("lost support from {}", surface);
        body.set_resting_on(None);
    }
}
