use perch_serde::{BitWrite, StreamWriter};

/// A value captured in its wire encoding. Two values are considered equal
/// exactly when they encode to the same bits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedValue {
    bits: u32,
    bytes: Vec<u8>,
}

impl EncodedValue {
    pub fn capture(write: impl FnOnce(&mut dyn BitWrite)) -> Self {
        let mut writer = StreamWriter::new();
        write(&mut writer);
        let bits = writer.bits_written();
        Self {
            bits,
            bytes: writer.to_bytes(),
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }
}

/// Last transmitted encoding of every network-visible attribute of one object,
/// plus a flag recording that a previous check found the object out of sync.
#[derive(Debug, Clone, Default)]
pub struct SyncSnapshot {
    values: Vec<EncodedValue>,
    dirty: bool,
}

impl SyncSnapshot {
    pub fn new(values: Vec<EncodedValue>) -> Self {
        Self {
            values,
            dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn matches(&self, index: u8, value: &EncodedValue) -> bool {
        self.values.get(usize::from(index)) == Some(value)
    }

    pub fn update(&mut self, index: u8, value: EncodedValue) {
        if let Some(slot) = self.values.get_mut(usize::from(index)) {
            *slot = value;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}
