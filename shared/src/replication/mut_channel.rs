use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{diff_mask::DiffMask, property_mutate::PropertyMutate};

/// Callback invoked with the attribute index every time an attribute of the
/// observed object is mutably accessed.
pub type PropertyObserver = Box<dyn FnMut(u8) + Send + Sync>;

struct MutChannelState {
    mask: DiffMask,
    observers: Vec<PropertyObserver>,
}

/// Per-object sink for property mutations. Every property of an object holds
/// a mutator pointing at the same channel; the channel accumulates a dirty
/// mask and fans each notification out to the registered observers.
#[derive(Clone)]
pub struct MutChannel {
    state: Arc<RwLock<MutChannelState>>,
}

impl MutChannel {
    pub fn new(diff_mask_length: u16) -> Self {
        Self {
            state: Arc::new(RwLock::new(MutChannelState {
                mask: DiffMask::new(diff_mask_length),
                observers: Vec::new(),
            })),
        }
    }

    fn state(&self) -> RwLockReadGuard<'_, MutChannelState> {
        let Ok(state) = self.state.as_ref().read() else {
            panic!("Mask held on current thread");
        };
        state
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, MutChannelState> {
        let Ok(state) = self.state.as_ref().write() else {
            panic!("Mask held on current thread");
        };
        state
    }

    /// Registers an observer. Observers run synchronously, in registration
    /// order, inside the mutating call.
    pub fn observe(&self, observer: PropertyObserver) {
        self.state_mut().observers.push(observer);
    }

    pub fn mask(&self) -> DiffMask {
        self.state().mask.clone()
    }

    pub fn is_clear(&self) -> bool {
        self.state().mask.is_clear()
    }

    pub fn any_below(&self, limit: u16) -> bool {
        self.state().mask.any_below(limit)
    }

    pub fn set_bit(&self, index: u8, value: bool) {
        self.state_mut().mask.set_bit(index, value);
    }

    pub fn clear_mask(&self) {
        self.state_mut().mask.clear();
    }

    fn notify(&self, index: u8) -> bool {
        // Observers run with the lock released so they may read the mask.
        let mut observers = {
            let Ok(mut state) = self.state.as_ref().write() else {
                return false;
            };
            state.mask.set_bit(index, true);
            std::mem::take(&mut state.observers)
        };

        for observer in observers.iter_mut() {
            observer(index);
        }

        let Ok(mut state) = self.state.as_ref().write() else {
            return false;
        };
        // keep observers registered from inside a callback, after the old ones
        observers.append(&mut state.observers);
        state.observers = observers;
        true
    }
}

impl PropertyMutate for MutChannel {
    fn mutate(&mut self, property_index: u8) -> bool {
        self.notify(property_index)
    }
}
