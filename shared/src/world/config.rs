use crate::{physics::PhysicsConfig, replication::ResendConfig};

/// Configuration of a [`SimWorld`](super::SimWorld)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldConfig {
    pub physics: PhysicsConfig,
    /// Applied to the position/velocity channel of every object spawned into
    /// the world
    pub resend: ResendConfig,
}
