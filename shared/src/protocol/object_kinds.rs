use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use perch_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use crate::{
    replication::PropertyRegistry,
    world::{Replica, Replicate, Replicated},
};

use super::error::ProtocolError;

pub type NetId = u16;

/// Identifies a registered object type
#[derive(Eq, Hash, Copy, Clone, PartialEq, Debug)]
pub struct ObjectKind {
    type_id: TypeId,
}

impl ObjectKind {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
        }
    }
}

trait KindEntry: Send + Sync {
    fn name(&self) -> &'static str;
    fn fingerprint(&self) -> u32;
    fn create(&self, kind: ObjectKind) -> Box<dyn Replica>;
    fn as_any(&self) -> &dyn Any;
}

struct TypedKind<T: Replicate> {
    registry: Arc<PropertyRegistry<T>>,
    factory: fn() -> T,
}

impl<T: Replicate> KindEntry for TypedKind<T> {
    fn name(&self) -> &'static str {
        self.registry.kind_name()
    }

    fn fingerprint(&self) -> u32 {
        self.registry.fingerprint()
    }

    fn create(&self, kind: ObjectKind) -> Box<dyn Replica> {
        Box::new(Replicated::new(kind, self.registry.clone(), (self.factory)()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Registered object kinds. Net ids are assigned densely in registration
/// order, so both peers must register the same kinds in the same order.
pub struct ObjectKinds {
    current_net_id: NetId,
    kind_map: HashMap<ObjectKind, (NetId, Box<dyn KindEntry>)>,
    net_id_map: HashMap<NetId, ObjectKind>,
}

impl ObjectKinds {
    pub fn new() -> Self {
        Self {
            current_net_id: 0,
            kind_map: HashMap::new(),
            net_id_map: HashMap::new(),
        }
    }

    pub fn add_object<T: Replicate>(
        &mut self,
        registry: PropertyRegistry<T>,
        factory: fn() -> T,
    ) -> Result<NetId, ProtocolError> {
        let kind = ObjectKind::of::<T>();
        if self.kind_map.contains_key(&kind) {
            return Err(ProtocolError::DuplicateKind {
                name: registry.kind_name(),
            });
        }

        let net_id = self.current_net_id;
        let entry = TypedKind {
            registry: Arc::new(registry),
            factory,
        };
        self.kind_map.insert(kind, (net_id, Box::new(entry)));
        self.net_id_map.insert(net_id, kind);
        self.current_net_id += 1;
        Ok(net_id)
    }

    pub fn len(&self) -> usize {
        self.kind_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kind_map.is_empty()
    }

    pub fn kind_of<T: 'static>(&self) -> Result<ObjectKind, ProtocolError> {
        let kind = ObjectKind::of::<T>();
        if self.kind_map.contains_key(&kind) {
            Ok(kind)
        } else {
            Err(ProtocolError::UnknownKind {
                type_name: type_name::<T>(),
            })
        }
    }

    pub fn net_id(&self, kind: &ObjectKind) -> Option<NetId> {
        self.kind_map.get(kind).map(|(net_id, _)| *net_id)
    }

    pub fn kind_from_net_id(&self, net_id: NetId) -> Result<ObjectKind, ProtocolError> {
        self.net_id_map
            .get(&net_id)
            .copied()
            .ok_or(ProtocolError::UnknownNetId { net_id })
    }

    pub fn name(&self, kind: &ObjectKind) -> Option<&'static str> {
        self.kind_map.get(kind).map(|(_, entry)| entry.name())
    }

    pub fn fingerprint(&self, kind: &ObjectKind) -> Option<u32> {
        self.kind_map.get(kind).map(|(_, entry)| entry.fingerprint())
    }

    pub fn registry<T: Replicate>(&self) -> Result<Arc<PropertyRegistry<T>>, ProtocolError> {
        let kind = self.kind_of::<T>()?;
        self.kind_map
            .get(&kind)
            .and_then(|(_, entry)| entry.as_any().downcast_ref::<TypedKind<T>>())
            .map(|typed| typed.registry.clone())
            .ok_or(ProtocolError::UnknownKind {
                type_name: type_name::<T>(),
            })
    }

    /// Wraps a locally created object for replication
    pub fn replicate<T: Replicate>(&self, object: T) -> Result<Replicated<T>, ProtocolError> {
        let registry = self.registry::<T>()?;
        Ok(Replicated::new(ObjectKind::of::<T>(), registry, object))
    }

    /// Builds a default instance of the kind registered under `net_id`
    pub fn create(&self, net_id: NetId) -> Result<Box<dyn Replica>, ProtocolError> {
        let kind = self.kind_from_net_id(net_id)?;
        let (_, entry) = self
            .kind_map
            .get(&kind)
            .ok_or(ProtocolError::UnknownNetId { net_id })?;
        Ok(entry.create(kind))
    }

    pub fn write_net_id(&self, kind: &ObjectKind, writer: &mut dyn BitWrite) -> Result<(), ProtocolError> {
        let net_id = self.net_id(kind).ok_or(ProtocolError::UnknownKind {
            type_name: "<unregistered>",
        })?;
        UnsignedVariableInteger::<7>::new(net_id).ser(writer);
        Ok(())
    }

    pub fn read_net_id(reader: &mut BitReader) -> Result<NetId, SerdeErr> {
        let value = UnsignedVariableInteger::<7>::de(reader)?.get();
        NetId::try_from(value).map_err(|_| SerdeErr)
    }
}

impl Default for ObjectKinds {
    fn default() -> Self {
        Self::new()
    }
}
