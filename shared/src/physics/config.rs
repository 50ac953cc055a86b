use crate::geometry::Vec2;

/// Tunables for integration and collision response. Distances are in world
/// units, times in the same unit as the `dt` passed to a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Acceleration applied to non-resting objects, scaled by their weight
    pub gravity: Vec2,
    /// Per-axis cap on velocity magnitude
    pub max_velocity: Vec2,
    /// Largest ledge an object walks onto instead of being stopped by
    pub max_step_height: f32,
    /// How far below a platform's top an object's feet may have been before
    /// the tick and still be caught
    pub platform_leniency: f32,
    /// Height of the strip under an object tested against its resting surface
    pub footprint_depth: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 980.0),
            max_velocity: Vec2::new(400.0, 900.0),
            max_step_height: 8.0,
            platform_leniency: 3.0,
            footprint_depth: 1.0,
        }
    }
}
