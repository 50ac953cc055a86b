use std::sync::{Arc, RwLock};

/// Receives a notification every time a tracked property is mutably accessed.
pub trait PropertyMutate: Send + Sync + 'static {
    /// Records that the property at `property_index` may have changed.
    /// Returns false if the notification could not be delivered.
    fn mutate(&mut self, property_index: u8) -> bool;
}

#[derive(Clone)]
pub struct PropertyMutator {
    inner: Arc<RwLock<dyn PropertyMutate>>,
}

impl PropertyMutator {
    pub fn new<M: PropertyMutate>(mutator: M) -> Self {
        let inner = Arc::new(RwLock::new(mutator));
        Self { inner }
    }

    /// Never blocks: a notification raised while another one is still being
    /// delivered (an observer mutating its own object) is dropped.
    pub fn mutate(&mut self, property_index: u8) -> bool {
        let Ok(mut guard) = self.inner.as_ref().try_write() else {
            return false;
        };
        guard.mutate(property_index)
    }
}
