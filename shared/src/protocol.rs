use log::info;

use crate::{replication::PropertyRegistry, world::Replicate};

pub mod error;
mod object_kinds;

pub use error::ProtocolError;
pub use object_kinds::{NetId, ObjectKind, ObjectKinds};

/// Everything both peers must agree on before exchanging world packets: the
/// registered object kinds.
pub struct Protocol {
    pub object_kinds: ObjectKinds,
    locked: bool,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            object_kinds: ObjectKinds::new(),
            locked: false,
        }
    }
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    /// Registers an object kind with its attribute table and the factory used
    /// to create blank instances for incoming spawns.
    ///
    /// # Panics
    ///
    /// Panics if the protocol is locked or `T` is already registered.
    /// Consider using `try_add_object` for non-panicking error handling.
    pub fn add_object<T: Replicate>(
        &mut self,
        registry: PropertyRegistry<T>,
        factory: fn() -> T,
    ) -> &mut Self {
        self.check_lock();
        if let Err(error) = self.object_kinds.add_object(registry, factory) {
            panic!("{}", error);
        }
        self
    }

    // Non-panicking builder methods

    pub fn try_add_object<T: Replicate>(
        &mut self,
        registry: PropertyRegistry<T>,
        factory: fn() -> T,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.object_kinds.add_object(registry, factory)?;
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        self.locked = true;
        info!("Protocol locked with {} object kinds", self.object_kinds.len());
        Ok(())
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
        info!("Protocol locked with {} object kinds", self.object_kinds.len());
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Checks if protocol is locked without panicking
    /// Returns Err if protocol is locked
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Checks if protocol is locked, panics if it is
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
