use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use log::warn;

use perch_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::property_mutate::PropertyMutator;

/// A replicated attribute of an object, that contains data
/// which must be tracked for updates.
///
/// Mutable access through `DerefMut` (or `set`) notifies the owning object's
/// mutator with this property's index, whether or not the value actually
/// changes. Cloning yields a detached copy with no mutator.
pub struct Property<V: Serde> {
    inner: V,
    mutator: Option<PropertyMutator>,
    index: u8,
}

impl<V: Serde> Property<V> {
    pub fn new(value: V) -> Self {
        Self {
            inner: value,
            mutator: None,
            index: 0,
        }
    }

    /// Attaches the Property to its owner's mutation channel under `index`
    pub fn set_mutator(&mut self, index: u8, mutator: &PropertyMutator) {
        self.index = index;
        self.mutator = Some(mutator.clone());
    }

    pub fn has_mutator(&self) -> bool {
        self.mutator.is_some()
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    /// Writes contained value into outgoing byte stream
    pub fn write(&self, writer: &mut dyn BitWrite) {
        self.inner.ser(writer);
    }

    /// Given a cursor into incoming data, updates the Property with the synced
    /// value. Observers are notified like for any local mutation.
    pub fn read(&mut self, reader: &mut BitReader) -> Result<(), SerdeErr> {
        self.inner = V::de(reader)?;
        self.mutate();
        Ok(())
    }

    pub fn bit_length(&self) -> u32 {
        self.inner.bit_length()
    }

    /// Replaces the value, notifying the mutator
    pub fn set(&mut self, value: V) {
        self.inner = value;
        self.mutate();
    }

    fn mutate(&mut self) {
        let Some(mutator) = &mut self.mutator else {
            return;
        };
        if !mutator.mutate(self.index) {
            warn!(
                "Mutation of property {} could not be recorded, channel busy",
                self.index
            );
        }
    }
}

impl<V: Serde> Clone for Property<V> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<V: Serde + PartialEq> PartialEq for Property<V> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<V: Serde + fmt::Debug> fmt::Debug for Property<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.inner)
            .field("index", &self.index)
            .field("tracked", &self.mutator.is_some())
            .finish()
    }
}

impl<V: Serde + Default> Default for Property<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: Serde> Deref for Property<V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<V: Serde> DerefMut for Property<V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // Just assume inner value will be changed, queue for update
        self.mutate();
        &mut self.inner
    }
}
