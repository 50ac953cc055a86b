use log::debug;

use crate::geometry::{CollisionBox, Direction, Vec2};

use super::{
    context::PhysicsContext,
    obstacle::{ObstacleKey, StaticObstacle},
    sim_object::SimObject,
};

/// Corrects `body` against every obstacle it overlaps, in ascending key order.
///
/// `previous` is the body's box before this tick's integration and `movement`
/// the displacement integration applied. Obstacles whose directional block
/// does not face the movement are ignored. Platforms only catch falling
/// bodies; walls push out, assist step-ups and fall back to undoing movement
/// when pushing out is not enough. Never fails, and never leaves the body
/// inside a wall that was clear of it before the tick.
pub fn resolve(body: &mut SimObject, context: &PhysicsContext, previous: &CollisionBox, movement: Vec2) {
    let travel = Direction::from_movement(movement);
    let candidates = context
        .index()
        .query_overlapping(&body.bounds(), &|_, obstacle| obstacle.blocks(travel));

    for key in candidates {
        let Some(obstacle) = context.index().obstacle(key) else {
            continue;
        };
        // an earlier correction may already have cleared this one
        let Some(displacement) = body.bounds().minimum_translation(&obstacle.bounds()) else {
            continue;
        };

        if obstacle.is_platform() {
            land_on_platform(body, context, previous, key, obstacle, displacement);
        } else {
            push_out_of_wall(
                body,
                context,
                previous,
                movement,
                travel,
                key,
                obstacle,
                displacement,
            );
        }
    }
}

fn land_on_platform(
    body: &mut SimObject,
    context: &PhysicsContext,
    previous: &CollisionBox,
    key: ObstacleKey,
    platform: &StaticObstacle,
    displacement: Vec2,
) {
    let falling = body.velocity().y > 0.0;
    let platform_below = displacement.y < 0.0;
    let came_from_above =
        previous.bottom() <= platform.bounds().top() + context.config().platform_leniency;
    if !(falling && platform_below && came_from_above) {
        return;
    }

    body.move_by(Vec2::new(0.0, displacement.y));
    let velocity = body.velocity();
    body.set_velocity(Vec2::new(velocity.x, 0.0));
    body.set_resting_on(Some(key));
    debug!("caught on platform {} at {:?}", key, body.position());
}

#[allow(clippy::too_many_arguments)]
fn push_out_of_wall(
    body: &mut SimObject,
    context: &PhysicsContext,
    previous: &CollisionBox,
    movement: Vec2,
    travel: Direction,
    key: ObstacleKey,
    wall: &StaticObstacle,
    displacement: Vec2,
) {
    if displacement.y == 0.0 && try_step_up(body, context, travel, key, wall) {
        return;
    }

    let before = body.position();
    body.move_by(displacement);
    if overlaps_solid(context, &body.bounds(), travel, None) {
        undo_movement(body, context, previous, movement, travel, before);
    }

    let correction = body.position() - before;
    settle(body, key, correction);
}

/// Lifts the body onto the wall's top when its feet are only slightly below
/// it and nothing solid is in the way.
fn try_step_up(
    body: &mut SimObject,
    context: &PhysicsContext,
    travel: Direction,
    key: ObstacleKey,
    wall: &StaticObstacle,
) -> bool {
    let bounds = body.bounds();
    let gap = bounds.bottom() - wall.bounds().top();
    if gap <= 0.0 || gap >= context.config().max_step_height {
        return false;
    }

    let lift = Vec2::new(0.0, -gap);
    if overlaps_solid(context, &bounds.translated(lift), travel, Some(key)) {
        return false;
    }

    body.move_by(lift);
    let velocity = body.velocity();
    body.set_velocity(Vec2::new(velocity.x, 0.0));
    body.set_resting_on(Some(key));
    debug!("stepped up {} onto {}", gap, key);
    true
}

/// Push-out failed: cancel the smaller axis of the movement, then the other
/// one, then return to where the tick started.
fn undo_movement(
    body: &mut SimObject,
    context: &PhysicsContext,
    previous: &CollisionBox,
    movement: Vec2,
    travel: Direction,
    before: Vec2,
) {
    let cancel_x = Vec2::new(before.x - movement.x, before.y);
    let cancel_y = Vec2::new(before.x, before.y - movement.y);
    let trials = if movement.x.abs() <= movement.y.abs() {
        [cancel_x, cancel_y]
    } else {
        [cancel_y, cancel_x]
    };

    let size = body.size();
    for trial in trials {
        if !overlaps_solid(context, &CollisionBox::new(trial, size), travel, None) {
            debug!("push-out blocked, cancelled one axis: {:?}", trial);
            body.move_to(trial);
            return;
        }
    }

    debug!("push-out blocked, reverting to {:?}", previous.min());
    body.move_to(previous.min());
}

/// Velocity bookkeeping after a wall moved the body by `correction`.
fn settle(body: &mut SimObject, key: ObstacleKey, correction: Vec2) {
    let mut velocity = body.velocity();

    if correction.y < 0.0 && velocity.y >= 0.0 {
        velocity.y = 0.0;
        body.set_resting_on(Some(key));
    } else if correction.y > 0.0 && velocity.y < 0.0 {
        velocity.y = 0.0;
    }

    if correction.x != 0.0 && velocity.x != 0.0 && correction.x.signum() != velocity.x.signum() {
        velocity.x = 0.0;
    }

    body.set_velocity(velocity);
}

fn overlaps_solid(
    context: &PhysicsContext,
    area: &CollisionBox,
    travel: Direction,
    except: Option<ObstacleKey>,
) -> bool {
    !context
        .index()
        .query_overlapping(area, &|key, obstacle| {
            Some(key) != except && !obstacle.is_platform() && obstacle.blocks(travel)
        })
        .is_empty()
}
