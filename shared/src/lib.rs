//! # Perch Shared
//! An authoritative 2D world: axis-aligned collision response against static
//! obstacles, changed-property replication of object attributes, and a
//! loss-tolerant position/velocity channel, all written into bit-packed world
//! packets.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use perch_serde::{
    BitCounter, BitReader, BitWrite, BitWriter, BoundedInteger, ConstBitLength, Serde, SerdeErr,
    StreamWriter, UnsignedInteger, UnsignedVariableInteger, MTU_SIZE_BITS, MTU_SIZE_BYTES,
};

mod geometry;
mod instant;
mod physics;
mod protocol;
mod replication;
mod world;

pub use geometry::{CollisionBox, Direction, Vec2};
pub use instant::Instant;
pub use physics::{
    integrate, resolve, step, ObstacleKey, ObstacleTable, PhysicsConfig, PhysicsContext,
    SimObject, SpatialIndex, StaticObstacle,
};
pub use protocol::{NetId, ObjectKind, ObjectKinds, Protocol, ProtocolError};
pub use replication::{
    AttributeDescriptor, DiffMask, EncodedValue, MutChannel, ObjectDiffSync,
    PositionVelocityChannel, Property, PropertyAccess, PropertyMutate, PropertyMutator,
    PropertyObserver, PropertyRegistry, PropertyRegistryBuilder, ReceivedMotion, RegistryError,
    ReplicationError, ResendConfig, ResendState, SyncSnapshot,
};
pub use world::{
    ObjectKey, Replica, Replicate, Replicated, SimWorld, WorldConfig, WorldError, WorldEvent,
    WorldReader, WorldRecordType, WorldWriter,
};
