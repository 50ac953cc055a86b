use std::fmt;

/// A fixed-length bitset with one bit per registered attribute.
#[derive(Clone, PartialEq, Eq)]
pub struct DiffMask {
    mask: Vec<u8>,
    bit_length: u16,
}

impl DiffMask {
    pub fn new(bit_length: u16) -> Self {
        let byte_length = (usize::from(bit_length) + 7) / 8;
        Self {
            mask: vec![0; byte_length],
            bit_length,
        }
    }

    pub fn bit_length(&self) -> u16 {
        self.bit_length
    }

    /// Returns `None` for indices past the end of the mask.
    pub fn bit(&self, index: u8) -> Option<bool> {
        if u16::from(index) >= self.bit_length {
            return None;
        }
        let byte = self.mask[usize::from(index / 8)];
        Some(byte & (1 << (index % 8)) != 0)
    }

    /// Out-of-range indices are ignored.
    pub fn set_bit(&mut self, index: u8, value: bool) {
        if u16::from(index) >= self.bit_length {
            return;
        }
        let byte = &mut self.mask[usize::from(index / 8)];
        let flag = 1u8 << (index % 8);
        if value {
            *byte |= flag;
        } else {
            *byte &= !flag;
        }
    }

    pub fn clear(&mut self) {
        self.mask.iter_mut().for_each(|byte| *byte = 0);
    }

    pub fn is_clear(&self) -> bool {
        self.mask.iter().all(|byte| *byte == 0)
    }

    /// Whether any bit below `limit` is set.
    pub fn any_below(&self, limit: u16) -> bool {
        self.ones().any(|index| u16::from(index) < limit)
    }

    /// Indices of all set bits, ascending.
    pub fn ones(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.bit_length)
            .map(|index| index as u8)
            .filter(|index| self.bit(*index) == Some(true))
    }
}

impl fmt::Debug for DiffMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DiffMask(")?;
        for index in 0..self.bit_length {
            let set = self.bit(index as u8) == Some(true);
            write!(f, "{}", if set { '1' } else { '0' })?;
        }
        write!(f, ")")
    }
}
