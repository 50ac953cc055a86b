use std::collections::BTreeSet;

use log::{trace, warn};

use perch_serde::{BitWrite, BitWriter, Serde};

use crate::instant::Instant;

use super::{
    error::WorldError, object_key::ObjectKey, record_type::WorldRecordType, sim_world::SimWorld,
};

/// Authoritative side of world replication: turns the difference between what
/// a peer has been told and the current [`SimWorld`] into packets.
///
/// A packet is a sequence of records, each prefixed by a continue bit and
/// terminated by a `false` bit. Despawns go first, then spawns, then updates,
/// all in ascending key order. A record that doesn't fit in the remaining
/// space ends the packet; nothing about it is committed, so it is retried on
/// the next write. A record too large for even an empty packet is skipped with
/// a warning so it can't hold back the records after it.
#[derive(Default)]
pub struct WorldWriter {
    known: BTreeSet<ObjectKey>,
}

impl WorldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the peer has been sent a spawn for `key` and no despawn since
    pub fn is_known(&self, key: ObjectKey) -> bool {
        self.known.contains(&key)
    }

    /// Writes a fresh packet. Returns `None` when there is nothing to send.
    pub fn write_packet(
        &mut self,
        world: &mut SimWorld,
        now: &Instant,
    ) -> Result<Option<Box<[u8]>>, WorldError> {
        let mut writer = BitWriter::new();
        if self.write_into(world, now, &mut writer)? {
            Ok(Some(writer.to_bytes()))
        } else {
            Ok(None)
        }
    }

    /// Appends world records to `writer`. Returns whether any record was
    /// written.
    pub fn write_into(
        &mut self,
        world: &mut SimWorld,
        now: &Instant,
        writer: &mut BitWriter,
    ) -> Result<bool, WorldError> {
        let mut has_written = false;

        // the finishing continue bit must always fit
        writer.reserve_bits(1);

        self.write_records(world, now, writer, &mut has_written)?;

        // Finish records by writing false continue bit
        writer.release_bits(1);
        false.ser(writer);

        Ok(has_written)
    }

    /// Marks everything pending as sent without writing it, for a tick where
    /// the peer is unreachable. Unsent spawns stay pending.
    pub fn bypass(&mut self, world: &mut SimWorld, now: &Instant) {
        for key in world.keys() {
            if !self.known.contains(&key) {
                continue;
            }
            let Some(replica) = world.replica_mut(key) else {
                continue;
            };
            let body = replica.body_mut();
            if body.needs_motion_sync(now) {
                let (position, velocity) = (body.position(), body.velocity());
                body.motion_mut().bypass(now, position, velocity);
            }
        }
    }

    fn write_records(
        &mut self,
        world: &mut SimWorld,
        now: &Instant,
        writer: &mut BitWriter,
        has_written: &mut bool,
    ) -> Result<(), WorldError> {
        // despawns
        let despawned: Vec<ObjectKey> = self
            .known
            .iter()
            .filter(|key| !world.contains(**key))
            .copied()
            .collect();
        for key in despawned {
            let record = |writer: &mut dyn BitWrite| -> Result<(), WorldError> {
                WorldRecordType::Despawn.ser(writer);
                key.ser(writer);
                Ok(())
            };
            match Self::write_record(writer, has_written, record)? {
                RecordOutcome::Written => {}
                RecordOutcome::Oversized => continue,
                RecordOutcome::PacketFull => return Ok(()),
            }
            self.known.remove(&key);
            trace!("wrote despawn of {}", key);
        }

        // spawns
        let protocol = world.protocol().clone();
        for key in world.keys() {
            if self.known.contains(&key) {
                continue;
            }
            let Some(replica) = world.replica_mut(key) else {
                continue;
            };
            let kind = replica.kind();
            let fingerprint = replica.fingerprint();
            let record = |writer: &mut dyn BitWrite| -> Result<(), WorldError> {
                WorldRecordType::Spawn.ser(writer);
                key.ser(writer);
                protocol.object_kinds.write_net_id(&kind, writer)?;
                fingerprint.ser(writer);
                replica.write_all(writer);
                Ok(())
            };
            match Self::write_record(writer, has_written, record)? {
                RecordOutcome::Written => {}
                RecordOutcome::Oversized => continue,
                RecordOutcome::PacketFull => return Ok(()),
            }

            replica.mark_synchronized();
            let body = replica.body_mut();
            let (position, velocity) = (body.position(), body.velocity());
            body.motion_mut().mark_full_sync(now, position, velocity);
            self.known.insert(key);
            trace!("wrote spawn of {} as {}", replica.kind_name(), key);
        }

        // updates
        for key in world.keys() {
            if !self.known.contains(&key) {
                continue;
            }
            let Some(replica) = world.replica_mut(key) else {
                continue;
            };
            let has_diff = !replica.is_synchronized();
            let has_motion = replica.body().needs_motion_sync(now);
            if !has_diff && !has_motion {
                continue;
            }

            let record = |writer: &mut dyn BitWrite| -> Result<(), WorldError> {
                WorldRecordType::Update.ser(writer);
                key.ser(writer);
                has_diff.ser(writer);
                if has_diff {
                    replica.write_diff(writer)?;
                }
                has_motion.ser(writer);
                if has_motion {
                    let body = replica.body_mut();
                    let (position, velocity) = (body.position(), body.velocity());
                    body.motion_mut().serialize(now, position, velocity, writer);
                }
                Ok(())
            };
            match Self::write_record(writer, has_written, record)? {
                RecordOutcome::Written => {}
                RecordOutcome::Oversized => continue,
                RecordOutcome::PacketFull => return Ok(()),
            }
            trace!("wrote update of {} (diff {}, motion {})", key, has_diff, has_motion);
        }

        Ok(())
    }

    /// Measures `record` with a counter first and only writes it for real if
    /// it fits.
    fn write_record(
        writer: &mut BitWriter,
        has_written: &mut bool,
        mut record: impl FnMut(&mut dyn BitWrite) -> Result<(), WorldError>,
    ) -> Result<RecordOutcome, WorldError> {
        // check that we can write the next record
        let mut counter = writer.counter();
        // write continue bit
        true.ser(&mut counter);
        record(&mut counter)?;

        if counter.overflowed() {
            // if nothing useful has been written in this packet yet,
            // send warning about size of record being too big
            if !*has_written {
                warn!(
                    "World record requires {} bits, but packet only has {} bits available! This record will never be sent.",
                    counter.bits_needed(),
                    writer.bits_free()
                );
                return Ok(RecordOutcome::Oversized);
            }
            return Ok(RecordOutcome::PacketFull);
        }

        // write continue bit
        true.ser(writer);
        record(writer)?;
        *has_written = true;
        Ok(RecordOutcome::Written)
    }
}

enum RecordOutcome {
    Written,
    /// Doesn't fit even an empty packet
    Oversized,
    PacketFull,
}
