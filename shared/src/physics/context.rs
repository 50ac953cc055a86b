use crate::geometry::{CollisionBox, Vec2};

use super::{config::PhysicsConfig, resolver, sim_object::SimObject, spatial_index::SpatialIndex};

/// Everything a physics step reads from its surroundings: the tunables and
/// the obstacles. Handed explicitly to the integrator and resolver.
#[derive(Clone, Copy)]
pub struct PhysicsContext<'w> {
    config: &'w PhysicsConfig,
    index: &'w dyn SpatialIndex,
}

impl<'w> PhysicsContext<'w> {
    pub fn new(config: &'w PhysicsConfig, index: &'w dyn SpatialIndex) -> Self {
        Self { config, index }
    }

    pub fn config(&self) -> &'w PhysicsConfig {
        self.config
    }

    pub fn index(&self) -> &'w dyn SpatialIndex {
        self.index
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    /// Resolves `body` against every obstacle it overlaps after moving by
    /// `movement` from `previous`
    pub fn check_collisions(&self, body: &mut SimObject, previous: &CollisionBox, movement: Vec2) {
        resolver::resolve(body, self, previous, movement);
    }
}
