use std::fmt;

use crate::geometry::{CollisionBox, Direction, Vec2};

/// Handle of a [`StaticObstacle`] in the world's obstacle table. Objects hold
/// it to name the surface they rest on without owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObstacleKey(u32);

impl ObstacleKey {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn to_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObstacleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obstacle#{}", self.0)
    }
}

/// Immovable, weightless collision geometry: a wall, or a platform that only
/// catches objects falling onto it from above.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticObstacle {
    bounds: CollisionBox,
    platform: bool,
    directional_block: Direction,
    resource: Option<String>,
}

impl StaticObstacle {
    /// A solid wall blocking from every side
    pub fn wall(position: Vec2, size: Vec2) -> Self {
        Self {
            bounds: CollisionBox::new(position, size),
            platform: false,
            directional_block: Direction::None,
            resource: None,
        }
    }

    pub fn platform(position: Vec2, size: Vec2) -> Self {
        Self {
            platform: true,
            ..Self::wall(position, size)
        }
    }

    /// Restricts collision response to objects arriving at the `side` face
    pub fn blocking_from(mut self, side: Direction) -> Self {
        self.directional_block = side;
        self
    }

    /// Attaches an opaque tag for external tooling
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn bounds(&self) -> CollisionBox {
        self.bounds
    }

    pub fn is_platform(&self) -> bool {
        self.platform
    }

    pub fn directional_block(&self) -> Direction {
        self.directional_block
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn weight(&self) -> f32 {
        0.0
    }

    /// Whether this obstacle reacts to an object travelling along `travel`
    pub fn blocks(&self, travel: Direction) -> bool {
        self.directional_block.blocks_arrival(travel)
    }
}
