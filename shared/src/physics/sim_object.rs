use log::trace;

use crate::{
    geometry::{CollisionBox, Vec2},
    instant::Instant,
    replication::{PositionVelocityChannel, Property, PropertyRegistryBuilder, ResendConfig},
    world::Replicate,
};

use super::obstacle::ObstacleKey;

/// The simulated body every replicated object carries: an axis-aligned box
/// moving under velocity and gravity.
///
/// Size, weight and the collision flag are diffed like any other network
/// attribute. Position and velocity travel over the object's
/// [`PositionVelocityChannel`] instead and only appear in full snapshots.
pub struct SimObject {
    position: Property<Vec2>,
    size: Property<Vec2>,
    velocity: Property<Vec2>,
    weight: Property<f32>,
    collides: Property<bool>,
    resting_on: Option<ObstacleKey>,
    motion: PositionVelocityChannel,
}

impl SimObject {
    /// `position` is the minimum corner. Negative sizes are normalized.
    pub fn new(position: Vec2, size: Vec2, weight: f32) -> Self {
        let bounds = CollisionBox::new(position, size);
        Self {
            position: Property::new(bounds.min()),
            size: Property::new(bounds.size()),
            velocity: Property::new(Vec2::ZERO),
            weight: Property::new(weight),
            collides: Property::new(true),
            resting_on: None,
            motion: PositionVelocityChannel::new(ResendConfig::default()),
        }
    }

    /// Declares the body's attributes on an object kind's registry. Call it
    /// before the kind's own attributes so every kind shares the same prefix.
    pub fn register_properties<T: Replicate>(
        builder: PropertyRegistryBuilder<T>,
    ) -> PropertyRegistryBuilder<T> {
        builder
            .network(
                "body.size",
                |object: &T| &object.body().size,
                |object: &mut T| &mut object.body_mut().size,
            )
            .network(
                "body.weight",
                |object: &T| &object.body().weight,
                |object: &mut T| &mut object.body_mut().weight,
            )
            .network(
                "body.collides",
                |object: &T| &object.body().collides,
                |object: &mut T| &mut object.body_mut().collides,
            )
            .local(
                "body.position",
                |object: &T| &object.body().position,
                |object: &mut T| &mut object.body_mut().position,
            )
            .local(
                "body.velocity",
                |object: &T| &object.body().velocity,
                |object: &mut T| &mut object.body_mut().velocity,
            )
    }

    pub fn position(&self) -> Vec2 {
        *self.position
    }

    pub fn size(&self) -> Vec2 {
        *self.size
    }

    pub fn velocity(&self) -> Vec2 {
        *self.velocity
    }

    pub fn weight(&self) -> f32 {
        *self.weight
    }

    pub fn collides(&self) -> bool {
        *self.collides
    }

    pub fn resting_on(&self) -> Option<ObstacleKey> {
        self.resting_on
    }

    pub fn bounds(&self) -> CollisionBox {
        CollisionBox::new(*self.position, *self.size)
    }

    /// Sets the velocity. A sign change on either axis, including to or from
    /// zero, cannot be extrapolated by a remote observer and forces a resync.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        let previous = *self.velocity;
        if *self.velocity == velocity {
            return;
        }
        if sign(previous.x) != sign(velocity.x) || sign(previous.y) != sign(velocity.y) {
            trace!("velocity flipped {:?} -> {:?}, forcing sync", previous, velocity);
            self.motion.force_sync();
        }
        self.velocity.set(velocity);
    }

    /// Moves the object instantly. Drops any resting surface and forces a
    /// resync.
    pub fn teleport(&mut self, position: Vec2) {
        self.position.set(position);
        self.resting_on = None;
        self.motion.force_sync();
    }

    pub fn resize(&mut self, size: Vec2) {
        let bounds = CollisionBox::new(*self.position, size);
        if bounds.min() != *self.position {
            self.position.set(bounds.min());
        }
        self.size.set(bounds.size());
    }

    pub fn set_weight(&mut self, weight: f32) {
        self.weight.set(weight);
    }

    pub fn set_collides(&mut self, collides: bool) {
        self.collides.set(collides);
        if !collides {
            self.resting_on = None;
        }
    }

    pub fn motion(&self) -> &PositionVelocityChannel {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut PositionVelocityChannel {
        &mut self.motion
    }

    pub fn needs_motion_sync(&self, now: &Instant) -> bool {
        self.motion.needs_sync(now, *self.velocity)
    }

    // Raw bookkeeping used by the integrator and resolver. Unlike `teleport`,
    // these are predictable from velocity and never force a resync.

    pub(crate) fn move_by(&mut self, delta: Vec2) {
        if delta.is_zero() {
            return;
        }
        *self.position += delta;
    }

    pub(crate) fn move_to(&mut self, position: Vec2) {
        if *self.position != position {
            self.position.set(position);
        }
    }

    pub(crate) fn set_resting_on(&mut self, surface: Option<ObstacleKey>) {
        self.resting_on = surface;
    }

    /// Applies position and velocity received from the authoritative peer
    pub fn apply_motion(&mut self, position: Vec2, velocity: Vec2) {
        self.position.set(position);
        self.velocity.set(velocity);
    }
}

fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
