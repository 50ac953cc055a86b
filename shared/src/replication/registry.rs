use std::collections::HashSet;

use log::info;

use perch_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::{error::RegistryError, property::Property, property_mutate::PropertyMutator};

/// Type-erased read/write access to one `Property` field of `T`.
pub trait PropertyAccess<T>: Send + Sync {
    fn write(&self, object: &T, writer: &mut dyn BitWrite);
    fn read(&self, object: &mut T, reader: &mut BitReader) -> Result<(), SerdeErr>;
    fn attach(&self, object: &mut T, index: u8, mutator: &PropertyMutator);
}

struct FieldAccess<T, V: Serde> {
    get: fn(&T) -> &Property<V>,
    get_mut: fn(&mut T) -> &mut Property<V>,
}

impl<T, V: Serde> PropertyAccess<T> for FieldAccess<T, V> {
    fn write(&self, object: &T, writer: &mut dyn BitWrite) {
        (self.get)(object).write(writer);
    }

    fn read(&self, object: &mut T, reader: &mut BitReader) -> Result<(), SerdeErr> {
        (self.get_mut)(object).read(reader)
    }

    fn attach(&self, object: &mut T, index: u8, mutator: &PropertyMutator) {
        (self.get_mut)(object).set_mutator(index, mutator);
    }
}

/// One registered attribute: its stable index, its name, whether it is sent
/// over the network, and how to reach it on an instance.
pub struct AttributeDescriptor<T> {
    index: u8,
    name: &'static str,
    network: bool,
    access: Box<dyn PropertyAccess<T>>,
}

impl<T> AttributeDescriptor<T> {
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_network(&self) -> bool {
        self.network
    }

    pub fn write(&self, object: &T, writer: &mut dyn BitWrite) {
        self.access.write(object, writer);
    }

    pub fn read(&self, object: &mut T, reader: &mut BitReader) -> Result<(), SerdeErr> {
        self.access.read(object, reader)
    }

    pub fn attach(&self, object: &mut T, mutator: &PropertyMutator) {
        self.access.attach(object, self.index, mutator);
    }
}

/// The ordered attribute table of one object kind.
///
/// Network-visible attributes occupy indices `0..network_count()` in the order
/// they were declared, local-only attributes follow. Both peers must build the
/// same table; [`PropertyRegistry::fingerprint`] lets them check that they did.
pub struct PropertyRegistry<T> {
    kind_name: &'static str,
    descriptors: Vec<AttributeDescriptor<T>>,
    network_count: u8,
    fingerprint: u32,
}

impl<T: 'static> PropertyRegistry<T> {
    pub fn builder(kind_name: &'static str) -> PropertyRegistryBuilder<T> {
        PropertyRegistryBuilder::new(kind_name)
    }
}

impl<T> PropertyRegistry<T> {
    pub fn kind_name(&self) -> &'static str {
        self.kind_name
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn network_count(&self) -> u8 {
        self.network_count
    }

    /// `None` when the kind has no network-visible attributes
    pub fn last_network_index(&self) -> Option<u8> {
        self.network_count.checked_sub(1)
    }

    pub fn descriptors(&self) -> &[AttributeDescriptor<T>] {
        &self.descriptors
    }

    pub fn network_descriptors(&self) -> &[AttributeDescriptor<T>] {
        &self.descriptors[..usize::from(self.network_count)]
    }

    pub fn descriptor(&self, index: u8) -> Option<&AttributeDescriptor<T>> {
        self.descriptors.get(usize::from(index))
    }

    pub fn index_of(&self, name: &str) -> Option<u8> {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.name == name)
            .map(|descriptor| descriptor.index)
    }

    /// CRC-32 over the kind name and the ordered `(name, visibility)` list
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }
}

// PropertyRegistryBuilder
pub struct PropertyRegistryBuilder<T> {
    kind_name: &'static str,
    network: Vec<(&'static str, Box<dyn PropertyAccess<T>>)>,
    local: Vec<(&'static str, Box<dyn PropertyAccess<T>>)>,
}

impl<T: 'static> PropertyRegistryBuilder<T> {
    fn new(kind_name: &'static str) -> Self {
        Self {
            kind_name,
            network: Vec::new(),
            local: Vec::new(),
        }
    }

    /// Declares a network-visible attribute
    pub fn network<V: Serde + 'static>(
        mut self,
        name: &'static str,
        get: fn(&T) -> &Property<V>,
        get_mut: fn(&mut T) -> &mut Property<V>,
    ) -> Self {
        self.network.push((name, Box::new(FieldAccess { get, get_mut })));
        self
    }

    /// Declares an attribute that is persisted and sent in full snapshots but
    /// never diffed
    pub fn local<V: Serde + 'static>(
        mut self,
        name: &'static str,
        get: fn(&T) -> &Property<V>,
        get_mut: fn(&mut T) -> &mut Property<V>,
    ) -> Self {
        self.local.push((name, Box::new(FieldAccess { get, get_mut })));
        self
    }

    pub fn build(self) -> Result<PropertyRegistry<T>, RegistryError> {
        let kind = self.kind_name;
        if kind.is_empty() {
            return Err(RegistryError::EmptyKindName);
        }

        let count = self.network.len() + self.local.len();
        if count > usize::from(u8::MAX) {
            return Err(RegistryError::TooManyAttributes { kind, count });
        }

        let mut names = HashSet::new();
        let network_count = self.network.len() as u8;
        let mut descriptors = Vec::with_capacity(count);
        let declared = self
            .network
            .into_iter()
            .map(|entry| (entry, true))
            .chain(self.local.into_iter().map(|entry| (entry, false)));

        for (index, ((name, access), network)) in declared.enumerate() {
            if !names.insert(name) {
                return Err(RegistryError::DuplicateAttribute { kind, name });
            }
            descriptors.push(AttributeDescriptor {
                index: index as u8,
                name,
                network,
                access,
            });
        }

        let fingerprint = fingerprint(kind, &descriptors);
        info!(
            "Registered kind `{}`: {} network, {} local attributes, fingerprint {:08x}",
            kind,
            network_count,
            descriptors.len() - usize::from(network_count),
            fingerprint
        );

        Ok(PropertyRegistry {
            kind_name: kind,
            descriptors,
            network_count,
            fingerprint,
        })
    }
}

fn fingerprint<T>(kind_name: &str, descriptors: &[AttributeDescriptor<T>]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(kind_name.as_bytes());
    for descriptor in descriptors {
        hasher.update(&[0]);
        hasher.update(descriptor.name.as_bytes());
        hasher.update(&[u8::from(descriptor.network)]);
    }
    hasher.finalize()
}
