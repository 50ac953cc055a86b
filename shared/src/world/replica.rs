use std::{any::Any, sync::Arc};

use perch_serde::{BitReader, BitWrite, SerdeErr, StreamWriter};

use crate::{
    physics::SimObject,
    protocol::ObjectKind,
    replication::{ObjectDiffSync, PropertyObserver, PropertyRegistry, ReplicationError},
};

/// A type whose instances live in a [`SimWorld`](super::SimWorld): it carries
/// a simulated body and exposes its replicated attributes through a
/// [`PropertyRegistry`].
pub trait Replicate: Send + Sync + 'static {
    fn body(&self) -> &SimObject;
    fn body_mut(&mut self) -> &mut SimObject;
}

/// Object-safe view of a replicated object, as stored by the world.
pub trait Replica: Send + Sync {
    fn kind(&self) -> ObjectKind;
    fn kind_name(&self) -> &'static str;
    fn fingerprint(&self) -> u32;

    fn body(&self) -> &SimObject;
    fn body_mut(&mut self) -> &mut SimObject;

    /// Every attribute in index order, no count prefix
    fn write_all(&self, writer: &mut dyn BitWrite);
    fn read_all(&mut self, reader: &mut BitReader) -> Result<(), ReplicationError>;

    /// Changed network attributes since the last real (non-counting) write
    fn write_diff(&mut self, writer: &mut dyn BitWrite) -> Result<usize, SerdeErr>;
    fn read_diff(&mut self, reader: &mut BitReader) -> Result<Vec<u8>, ReplicationError>;

    fn is_synchronized(&mut self) -> bool;
    fn mark_synchronized(&mut self);
    fn observe(&self, observer: PropertyObserver);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Full attribute snapshot for persistence
    fn save_snapshot(&self) -> Vec<u8> {
        let mut writer = StreamWriter::new();
        self.write_all(&mut writer);
        writer.to_bytes()
    }

    fn load_snapshot(&mut self, bytes: &[u8]) -> Result<(), ReplicationError> {
        let mut reader = BitReader::new(bytes);
        self.read_all(&mut reader)
    }
}

/// A `Replicate` object paired with its change tracking
pub struct Replicated<T: Replicate> {
    kind: ObjectKind,
    object: T,
    sync: ObjectDiffSync<T>,
}

impl<T: Replicate> Replicated<T> {
    pub fn new(kind: ObjectKind, registry: Arc<PropertyRegistry<T>>, mut object: T) -> Self {
        let sync = ObjectDiffSync::new(registry, &mut object);
        Self { kind, object, sync }
    }

    pub fn object(&self) -> &T {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut T {
        &mut self.object
    }

    pub fn sync(&self) -> &ObjectDiffSync<T> {
        &self.sync
    }

    pub fn changed_indices(&self) -> Vec<u8> {
        self.sync.changed_indices(&self.object)
    }
}

impl<T: Replicate> Replica for Replicated<T> {
    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn kind_name(&self) -> &'static str {
        self.sync.registry().kind_name()
    }

    fn fingerprint(&self) -> u32 {
        self.sync.registry().fingerprint()
    }

    fn body(&self) -> &SimObject {
        self.object.body()
    }

    fn body_mut(&mut self) -> &mut SimObject {
        self.object.body_mut()
    }

    fn write_all(&self, writer: &mut dyn BitWrite) {
        self.sync.write_all(&self.object, writer);
    }

    fn read_all(&mut self, reader: &mut BitReader) -> Result<(), ReplicationError> {
        self.sync.read_all(&mut self.object, reader)
    }

    fn write_diff(&mut self, writer: &mut dyn BitWrite) -> Result<usize, SerdeErr> {
        self.sync.serialize(&self.object, writer)
    }

    fn read_diff(&mut self, reader: &mut BitReader) -> Result<Vec<u8>, ReplicationError> {
        self.sync.deserialize(&mut self.object, reader)
    }

    fn is_synchronized(&mut self) -> bool {
        self.sync.is_synchronized(&self.object)
    }

    fn mark_synchronized(&mut self) {
        self.sync.mark_synchronized(&self.object);
    }

    fn observe(&self, observer: PropertyObserver) {
        self.sync.observe(observer);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
