use std::{collections::BTreeMap, sync::Arc};

use log::{info, trace};

use crate::{
    geometry::{CollisionBox, Vec2},
    physics::{self, ObstacleKey, ObstacleTable, PhysicsContext, StaticObstacle},
    protocol::Protocol,
};

use super::{
    config::WorldConfig,
    error::WorldError,
    object_key::ObjectKey,
    replica::{Replica, Replicate, Replicated},
};

/// The live objects and static obstacles of one simulation, advanced in
/// fixed steps.
pub struct SimWorld {
    config: WorldConfig,
    protocol: Arc<Protocol>,
    obstacles: ObstacleTable,
    objects: BTreeMap<ObjectKey, Box<dyn Replica>>,
    next_key: u64,
}

impl SimWorld {
    pub fn new(config: WorldConfig, protocol: Arc<Protocol>) -> Self {
        Self {
            config,
            protocol,
            obstacles: ObstacleTable::new(),
            objects: BTreeMap::new(),
            next_key: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn protocol(&self) -> &Arc<Protocol> {
        &self.protocol
    }

    // Objects

    /// Adds a locally created object under a fresh key
    pub fn spawn<T: Replicate>(&mut self, object: T) -> Result<ObjectKey, WorldError> {
        let replicated: Replicated<T> = self.protocol.object_kinds.replicate(object)?;
        let key = ObjectKey::new(self.next_key);
        self.next_key = next_key_after(key)?;
        self.attach(key, Box::new(replicated));
        Ok(key)
    }

    /// Adds an object under a key chosen by the authoritative peer
    pub fn insert(&mut self, key: ObjectKey, replica: Box<dyn Replica>) -> Result<(), WorldError> {
        if self.objects.contains_key(&key) {
            return Err(WorldError::DuplicateObject { key });
        }
        self.next_key = self.next_key.max(next_key_after(key)?);
        self.attach(key, replica);
        Ok(())
    }

    fn attach(&mut self, key: ObjectKey, mut replica: Box<dyn Replica>) {
        replica.body_mut().motion_mut().set_config(self.config.resend);
        info!("spawned {} as {}", replica.kind_name(), key);
        self.objects.insert(key, replica);
    }

    pub fn despawn(&mut self, key: ObjectKey) -> Option<Box<dyn Replica>> {
        let removed = self.objects.remove(&key);
        if removed.is_some() {
            info!("despawned {}", key);
        }
        removed
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Keys of all live objects, ascending
    pub fn keys(&self) -> Vec<ObjectKey> {
        self.objects.keys().copied().collect()
    }

    pub fn replica(&self, key: ObjectKey) -> Option<&dyn Replica> {
        self.objects.get(&key).map(|replica| replica.as_ref())
    }

    pub fn replica_mut(&mut self, key: ObjectKey) -> Option<&mut Box<dyn Replica>> {
        self.objects.get_mut(&key)
    }

    pub fn get<T: Replicate>(&self, key: ObjectKey) -> Option<&T> {
        self.objects
            .get(&key)?
            .as_any()
            .downcast_ref::<Replicated<T>>()
            .map(|replicated| replicated.object())
    }

    pub fn get_mut<T: Replicate>(&mut self, key: ObjectKey) -> Option<&mut T> {
        self.objects
            .get_mut(&key)?
            .as_any_mut()
            .downcast_mut::<Replicated<T>>()
            .map(|replicated| replicated.object_mut())
    }

    // Obstacles

    pub fn add_obstacle(&mut self, obstacle: StaticObstacle) -> ObstacleKey {
        self.obstacles.insert(obstacle)
    }

    /// Objects resting on the removed obstacle start falling on the next tick
    pub fn remove_obstacle(&mut self, key: ObstacleKey) -> Option<StaticObstacle> {
        self.obstacles.remove(key)
    }

    pub fn obstacles(&self) -> &ObstacleTable {
        &self.obstacles
    }

    // Simulation

    /// Advances every object by `dt`: first integration of all objects, then
    /// collision response for those that collide, both in ascending key
    /// order.
    pub fn tick(&mut self, dt: f32) {
        let context = PhysicsContext::new(&self.config.physics, &self.obstacles);

        let mut moved: Vec<(ObjectKey, CollisionBox, Vec2)> = Vec::new();
        for (key, replica) in self.objects.iter_mut() {
            let body = replica.body_mut();
            let previous = body.bounds();
            if let Some(movement) = physics::integrate(body, &context, dt) {
                moved.push((*key, previous, movement));
            }
        }

        for (key, previous, movement) in moved {
            let Some(replica) = self.objects.get_mut(&key) else {
                continue;
            };
            let body = replica.body_mut();
            if body.collides() {
                context.check_collisions(body, &previous, movement);
            }
        }
        trace!("ticked {} objects", self.objects.len());
    }
}

// `u64::MAX` has no successor, so it is never a valid key
fn next_key_after(key: ObjectKey) -> Result<u64, WorldError> {
    key.to_u64()
        .checked_add(1)
        .ok_or(WorldError::KeyOutOfRange { key })
}
