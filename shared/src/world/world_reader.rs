use log::{debug, warn};

use perch_serde::{BitReader, Serde};

use crate::{
    instant::Instant,
    protocol::{ObjectKind, ObjectKinds, ProtocolError},
};

use super::{
    error::WorldError, object_key::ObjectKey, record_type::WorldRecordType, sim_world::SimWorld,
};

/// What a world packet did to the receiving [`SimWorld`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldEvent {
    Spawned { key: ObjectKey, kind: ObjectKind },
    Despawned { key: ObjectKey },
    /// Network attributes that changed, ascending
    Updated { key: ObjectKey, attributes: Vec<u8> },
    Moved { key: ObjectKey },
}

/// Applies packets written by a [`WorldWriter`](super::WorldWriter).
pub struct WorldReader;

impl WorldReader {
    /// Reads every record in the packet. Records before a failing one have
    /// already been applied; after an error the rest of the packet is lost.
    pub fn read_packet(
        world: &mut SimWorld,
        now: &Instant,
        reader: &mut BitReader,
    ) -> Result<Vec<WorldEvent>, WorldError> {
        let mut events = Vec::new();

        loop {
            // read record continue bit
            let record_continue = bool::de(reader)?;
            if !record_continue {
                break;
            }

            Self::read_record(world, now, reader, &mut events)?;
        }

        Ok(events)
    }

    fn read_record(
        world: &mut SimWorld,
        now: &Instant,
        reader: &mut BitReader,
        events: &mut Vec<WorldEvent>,
    ) -> Result<(), WorldError> {
        let record_type = WorldRecordType::de(reader)?;
        let key = ObjectKey::de(reader)?;

        match record_type {
            WorldRecordType::Spawn => {
                let kind = Self::read_spawn(world, now, key, reader)?;
                events.push(WorldEvent::Spawned { key, kind });
            }
            WorldRecordType::Despawn => {
                if world.despawn(key).is_none() {
                    warn!("despawn of unknown {}", key);
                    return Err(WorldError::ObjectNotFound { key });
                }
                events.push(WorldEvent::Despawned { key });
            }
            WorldRecordType::Update => {
                let Some(replica) = world.replica_mut(key) else {
                    warn!("update of unknown {}", key);
                    return Err(WorldError::ObjectNotFound { key });
                };

                if bool::de(reader)? {
                    let attributes = replica.read_diff(reader)?;
                    events.push(WorldEvent::Updated { key, attributes });
                }

                if bool::de(reader)? {
                    let body = replica.body_mut();
                    let motion = body.motion_mut().deserialize(now, reader)?;
                    body.apply_motion(motion.position, motion.velocity);
                    events.push(WorldEvent::Moved { key });
                }
            }
        }

        Ok(())
    }

    fn read_spawn(
        world: &mut SimWorld,
        now: &Instant,
        key: ObjectKey,
        reader: &mut BitReader,
    ) -> Result<ObjectKind, WorldError> {
        let net_id = ObjectKinds::read_net_id(reader)?;
        let remote_fingerprint = u32::de(reader)?;

        let mut replica = world.protocol().object_kinds.create(net_id)?;
        let local_fingerprint = replica.fingerprint();
        if local_fingerprint != remote_fingerprint {
            let error = ProtocolError::SchemaMismatch {
                kind: replica.kind_name(),
                local: local_fingerprint,
                remote: remote_fingerprint,
            };
            warn!("rejecting spawn of {}: {}", key, error);
            return Err(error.into());
        }

        replica.read_all(reader)?;
        let body = replica.body_mut();
        let (position, velocity) = (body.position(), body.velocity());
        body.motion_mut().receive(now, position, velocity);

        let kind = replica.kind();
        debug!("received spawn of {} as {}", replica.kind_name(), key);
        world.insert(key, replica)?;
        Ok(kind)
    }
}
