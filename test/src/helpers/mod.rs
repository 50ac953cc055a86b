pub mod assertions;
pub mod logging;

pub use layouts::{no_gravity, with_floor, with_platform};
pub use logging::init_logger;
