mod config;
mod context;
mod integrator;
mod obstacle;
mod resolver;
mod sim_object;
mod spatial_index;

pub use config::PhysicsConfig;
pub use context::PhysicsContext;
pub use integrator::{integrate, step};
pub use obstacle::{ObstacleKey, StaticObstacle};
pub use resolver::resolve;
pub use sim_object::SimObject;
pub use spatial_index::{ObstacleTable, SpatialIndex};
