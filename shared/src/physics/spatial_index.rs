use std::collections::BTreeMap;

use crate::geometry::{CollisionBox, Vec2};

use super::obstacle::{ObstacleKey, StaticObstacle};

/// Broad-phase lookup of static obstacles.
pub trait SpatialIndex {
    fn obstacle(&self, key: ObstacleKey) -> Option<&StaticObstacle>;

    /// Obstacles overlapping `area` and accepted by `predicate`, in ascending
    /// key order
    fn query_overlapping(
        &self,
        area: &CollisionBox,
        predicate: &dyn Fn(ObstacleKey, &StaticObstacle) -> bool,
    ) -> Vec<ObstacleKey>;

    /// Obstacle whose center is closest to `point`
    fn nearest(&self, point: Vec2) -> Option<ObstacleKey>;
}

/// Linear-scan obstacle storage. Keys are handed out in increasing order and
/// never reused.
#[derive(Debug, Default)]
pub struct ObstacleTable {
    obstacles: BTreeMap<ObstacleKey, StaticObstacle>,
    next_id: u32,
}

impl ObstacleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, obstacle: StaticObstacle) -> ObstacleKey {
        let key = ObstacleKey::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.obstacles.insert(key, obstacle);
        key
    }

    pub fn remove(&mut self, key: ObstacleKey) -> Option<StaticObstacle> {
        self.obstacles.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObstacleKey, &StaticObstacle)> + '_ {
        self.obstacles.iter().map(|(key, obstacle)| (*key, obstacle))
    }
}

impl SpatialIndex for ObstacleTable {
    fn obstacle(&self, key: ObstacleKey) -> Option<&StaticObstacle> {
        self.obstacles.get(&key)
    }

    fn query_overlapping(
        &self,
        area: &CollisionBox,
        predicate: &dyn Fn(ObstacleKey, &StaticObstacle) -> bool,
    ) -> Vec<ObstacleKey> {
        self.iter()
            .filter(|(key, obstacle)| area.overlaps(&obstacle.bounds()) && predicate(*key, *obstacle))
            .map(|(key, _)| key)
            .collect()
    }

    fn nearest(&self, point: Vec2) -> Option<ObstacleKey> {
        self.iter()
            .map(|(key, obstacle)| {
                let offset = obstacle.bounds().center() - point;
                (key, offset.x * offset.x + offset.y * offset.y)
            })
            .filter(|(_, distance)| !distance.is_nan())
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(key, _)| key)
    }
}
