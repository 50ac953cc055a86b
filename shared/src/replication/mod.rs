mod config;
mod diff_mask;
mod diff_sync;
mod error;
mod mut_channel;
mod position_channel;
mod property;
mod property_mutate;
mod registry;
mod snapshot;

pub use config::ResendConfig;
pub use diff_mask::DiffMask;
pub use diff_sync::ObjectDiffSync;
pub use error::{RegistryError, ReplicationError};
pub use mut_channel::{MutChannel, PropertyObserver};
pub use position_channel::{PositionVelocityChannel, ReceivedMotion, ResendState};
pub use property::Property;
pub use property_mutate::{PropertyMutate, PropertyMutator};
pub use registry::{AttributeDescriptor, PropertyAccess, PropertyRegistry, PropertyRegistryBuilder};
pub use snapshot::{EncodedValue, SyncSnapshot};
