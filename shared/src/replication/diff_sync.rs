use std::sync::Arc;

use log::warn;

use perch_serde::{BitReader, BitWrite, BoundedInteger, SerdeErr};

use super::{
    error::ReplicationError,
    mut_channel::{MutChannel, PropertyObserver},
    property_mutate::PropertyMutator,
    registry::{AttributeDescriptor, PropertyRegistry},
    snapshot::{EncodedValue, SyncSnapshot},
};

/// Change tracking for one object instance.
///
/// Owns the object's mutation channel and the snapshot of what was last sent.
/// A diff is written as a count bounded by `[0, network_count]` followed by
/// `(index, value)` pairs in ascending index order, each index bounded below
/// by its predecessor and above by the last network index.
pub struct ObjectDiffSync<T> {
    registry: Arc<PropertyRegistry<T>>,
    channel: MutChannel,
    snapshot: SyncSnapshot,
}

impl<T> ObjectDiffSync<T> {
    /// Attaches every property of `object` to a fresh mutation channel and
    /// takes its current state as the baseline.
    pub fn new(registry: Arc<PropertyRegistry<T>>, object: &mut T) -> Self {
        let channel = MutChannel::new(registry.len() as u16);
        let mutator = PropertyMutator::new(channel.clone());
        for descriptor in registry.descriptors() {
            descriptor.attach(object, &mutator);
        }
        let snapshot = capture(&registry, object);

        Self {
            registry,
            channel,
            snapshot,
        }
    }

    pub fn registry(&self) -> &Arc<PropertyRegistry<T>> {
        &self.registry
    }

    /// Registers a callback run synchronously on every attribute mutation of
    /// this instance, including values applied from the network.
    pub fn observe(&self, observer: PropertyObserver) {
        self.channel.observe(observer);
    }

    /// Network indices whose value differs from the snapshot, ascending.
    /// Only attributes flagged by the mutation channel are re-encoded.
    pub fn changed_indices(&self, object: &T) -> Vec<u8> {
        let network_count = self.registry.network_count();
        self.channel
            .mask()
            .ones()
            .take_while(|index| *index < network_count)
            .filter(|index| {
                self.registry
                    .descriptor(*index)
                    .map(|descriptor| !self.snapshot.matches(*index, &encode(descriptor, object)))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Writes the changed network attributes. When `writer` is a real writer
    /// (not a counter) and took every bit, the snapshot is advanced and the
    /// dirty mask cleared. A capped writer that overflowed leaves both alone,
    /// so the changes are written again next time. Returns the number of
    /// attributes written.
    pub fn serialize(&mut self, object: &T, writer: &mut dyn BitWrite) -> Result<usize, SerdeErr> {
        let changed = self.changed_indices(object);
        self.write_changes(object, &changed, writer)?;
        if !writer.is_counter() && !writer.overflowed() {
            for index in &changed {
                if let Some(descriptor) = self.registry.descriptor(*index) {
                    self.snapshot.update(*index, encode(descriptor, object));
                }
            }
            self.channel.clear_mask();
            self.snapshot.set_dirty(false);
        }
        Ok(changed.len())
    }

    fn write_changes(
        &self,
        object: &T,
        changed: &[u8],
        writer: &mut dyn BitWrite,
    ) -> Result<(), SerdeErr> {
        let network_count = u32::from(self.registry.network_count());
        BoundedInteger::new(changed.len() as u32, 0, network_count)?.ser(writer);

        let Some(last) = self.registry.last_network_index() else {
            return Ok(());
        };
        let mut previous = 0;
        for index in changed {
            let index = u32::from(*index);
            BoundedInteger::new(index, previous, u32::from(last))?.ser(writer);
            if let Some(descriptor) = self.registry.descriptor(index as u8) {
                descriptor.write(object, writer);
            }
            previous = index;
        }
        Ok(())
    }

    /// Applies a diff written by [`ObjectDiffSync::serialize`]. Returns the
    /// indices that were updated.
    ///
    /// Any error means the peers disagree on the object's layout; the caller
    /// must treat the object as lost.
    pub fn deserialize(
        &mut self,
        object: &mut T,
        reader: &mut BitReader,
    ) -> Result<Vec<u8>, ReplicationError> {
        let network_count = self.registry.network_count();
        let count = BoundedInteger::de_raw(reader, 0, u32::from(network_count))?;
        if count > u64::from(network_count) {
            let error = ReplicationError::CountOutOfRange {
                count: count.min(u64::from(u32::MAX)) as u32,
                limit: network_count,
            };
            warn!("{}: {}", self.registry.kind_name(), error);
            return Err(error);
        }

        let mut applied = Vec::with_capacity(count as usize);
        let Some(last) = self.registry.last_network_index() else {
            return Ok(applied);
        };

        let mut previous: Option<u8> = None;
        for _ in 0..count {
            let lower = previous.map(u32::from).unwrap_or(0);
            let raw = BoundedInteger::de_raw(reader, lower, u32::from(last))?;
            if raw > u64::from(last) {
                let error = ReplicationError::IndexOutOfRange {
                    index: raw.min(u64::from(u32::MAX)) as u32,
                    last,
                };
                warn!("{}: {}", self.registry.kind_name(), error);
                return Err(error);
            }
            let index = raw as u8;
            if let Some(previous) = previous {
                if index <= previous {
                    let error = ReplicationError::IndexNotIncreasing { previous, index };
                    warn!("{}: {}", self.registry.kind_name(), error);
                    return Err(error);
                }
            }

            let Some(descriptor) = self.registry.descriptor(index) else {
                return Err(ReplicationError::IndexOutOfRange {
                    index: u32::from(index),
                    last,
                });
            };
            descriptor.read(object, reader)?;
            self.snapshot.update(index, encode(descriptor, object));
            self.channel.set_bit(index, false);

            applied.push(index);
            previous = Some(index);
        }

        Ok(applied)
    }

    /// Whether every network attribute still matches the snapshot. Answers
    /// from the mutation mask alone unless a mutation was recorded or a
    /// previous check already found the object dirty.
    pub fn is_synchronized(&mut self, object: &T) -> bool {
        let network_count = self.registry.network_count();
        if !self.snapshot.is_dirty() && !self.channel.any_below(u16::from(network_count)) {
            return true;
        }

        let changed = self.changed_indices(object);
        // flagged but unchanged attributes need no further rescans
        for index in self.channel.mask().ones() {
            if index < network_count && !changed.contains(&index) {
                self.channel.set_bit(index, false);
            }
        }
        self.snapshot.set_dirty(!changed.is_empty());
        changed.is_empty()
    }

    /// Writes every attribute, network-visible and local, in index order with
    /// no count prefix. Does not touch the snapshot.
    pub fn write_all(&self, object: &T, writer: &mut dyn BitWrite) {
        for descriptor in self.registry.descriptors() {
            descriptor.write(object, writer);
        }
    }

    /// Reads every attribute in index order, then takes the result as the new
    /// baseline.
    pub fn read_all(&mut self, object: &mut T, reader: &mut BitReader) -> Result<(), ReplicationError> {
        for descriptor in self.registry.descriptors() {
            descriptor.read(object, reader)?;
        }
        self.mark_synchronized(object);
        Ok(())
    }

    /// Takes the object's current state as what the remote side holds, e.g.
    /// after its full state went out in a spawn record.
    pub fn mark_synchronized(&mut self, object: &T) {
        self.snapshot = capture(&self.registry, object);
        self.channel.clear_mask();
    }
}

fn encode<T>(descriptor: &AttributeDescriptor<T>, object: &T) -> EncodedValue {
    EncodedValue::capture(|writer| descriptor.write(object, writer))
}

fn capture<T>(registry: &PropertyRegistry<T>, object: &T) -> SyncSnapshot {
    SyncSnapshot::new(
        registry
            .network_descriptors()
            .iter()
            .map(|descriptor| encode(descriptor, object))
            .collect(),
    )
}
