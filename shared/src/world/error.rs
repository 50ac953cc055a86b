use thiserror::Error;

use perch_serde::SerdeErr;

use crate::{protocol::ProtocolError, replication::ReplicationError};

use super::object_key::ObjectKey;

/// Errors raised while spawning objects or applying an incoming world packet.
/// When reading a packet, every variant means the stream can no longer be
/// trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// An update or despawn referenced an object that doesn't exist
    #[error("Object {key} not found")]
    ObjectNotFound { key: ObjectKey },

    /// A spawn reused the key of a live object
    #[error("Object {key} already exists")]
    DuplicateObject { key: ObjectKey },

    /// A key too large to leave room for later spawns
    #[error("Object key {key} is out of range")]
    KeyOutOfRange { key: ObjectKey },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Replication(#[from] ReplicationError),

    #[error("Malformed world packet: {0}")]
    Serde(#[from] SerdeErr),
}
