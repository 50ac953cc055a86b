mod collision_box;
mod direction;
mod vector;

pub use collision_box::CollisionBox;
pub use direction::Direction;
pub use vector::Vec2;
