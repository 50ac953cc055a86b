mod config;
mod error;
mod object_key;
mod record_type;
mod replica;
mod sim_world;
mod world_reader;
mod world_writer;

pub use config::WorldConfig;
pub use error::WorldError;
pub use object_key::ObjectKey;
pub use record_type::WorldRecordType;
pub use replica::{Replica, Replicate, Replicated};
pub use sim_world::SimWorld;
pub use world_reader::{WorldEvent, WorldReader};
pub use world_writer::WorldWriter;
