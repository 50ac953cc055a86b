use crate::constants::MTU_SIZE_BITS;

/// Sink for a stream of bits. Bits are packed least-significant first.
pub trait BitWrite {
    fn write_bit(&mut self, bit: bool);
    fn write_byte(&mut self, byte: u8);
    fn count_bits(&mut self, bits: u32);
    fn is_counter(&self) -> bool;
    /// Whether any bit was dropped (or, for a counter, would not fit).
    fn overflowed(&self) -> bool;
}

// BitWriter

/// Writes bits into a buffer capped at one MTU. Writes past the cap are
/// dropped and flag the writer as overflowed; callers measure with
/// [`BitWriter::counter`] before committing a record.
pub struct BitWriter {
    buffer: Vec<u8>,
    current_bits: u32,
    max_bits: u32,
    overflowed: bool,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_max_bits(MTU_SIZE_BITS)
    }

    pub fn with_max_bits(max_bits: u32) -> Self {
        Self {
            buffer: Vec::with_capacity(max_bits.div_ceil(8) as usize),
            current_bits: 0,
            max_bits,
            overflowed: false,
        }
    }

    /// Returns a counter which measures how many bits a record would take and
    /// whether it would still fit in this writer.
    pub fn counter(&self) -> BitCounter {
        BitCounter::new(self.current_bits, self.max_bits)
    }

    /// Reserves `bits` at the end of the buffer, e.g. for a terminating flag
    /// that must always be written.
    pub fn reserve_bits(&mut self, bits: u32) {
        self.max_bits = self.max_bits.saturating_sub(bits);
    }

    /// Gives back bits previously taken by [`BitWriter::reserve_bits`].
    pub fn release_bits(&mut self, bits: u32) {
        self.max_bits += bits;
    }

    pub fn bits_written(&self) -> u32 {
        self.current_bits
    }

    pub fn bits_free(&self) -> u32 {
        self.max_bits.saturating_sub(self.current_bits)
    }

    pub fn to_bytes(self) -> Box<[u8]> {
        self.buffer.into_boxed_slice()
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWrite for BitWriter {
    fn write_bit(&mut self, bit: bool) {
        if self.current_bits >= self.max_bits {
            self.overflowed = true;
            return;
        }

        let bit_index = self.current_bits % 8;
        if bit_index == 0 {
            self.buffer.push(0);
        }
        if bit {
            if let Some(last) = self.buffer.last_mut() {
                *last |= 1 << bit_index;
            }
        }
        self.current_bits += 1;
    }

    fn write_byte(&mut self, byte: u8) {
        let mut temp = byte;
        for _ in 0..8 {
            self.write_bit(temp & 1 != 0);
            temp >>= 1;
        }
    }

    fn count_bits(&mut self, _bits: u32) {}

    fn is_counter(&self) -> bool {
        false
    }

    fn overflowed(&self) -> bool {
        self.overflowed
    }
}

// BitCounter

/// A [`BitWrite`] that stores nothing and only tallies how many bits were
/// written through it.
pub struct BitCounter {
    start_bits: u32,
    current_bits: u32,
    max_bits: u32,
}

impl BitCounter {
    pub fn new(start_bits: u32, max_bits: u32) -> Self {
        Self {
            start_bits,
            current_bits: start_bits,
            max_bits,
        }
    }

    pub fn bits_needed(&self) -> u32 {
        self.current_bits - self.start_bits
    }
}

impl BitWrite for BitCounter {
    fn write_bit(&mut self, _bit: bool) {
        self.current_bits += 1;
    }

    fn write_byte(&mut self, _byte: u8) {
        self.current_bits += 8;
    }

    fn count_bits(&mut self, bits: u32) {
        self.current_bits += bits;
    }

    fn is_counter(&self) -> bool {
        true
    }

    fn overflowed(&self) -> bool {
        self.current_bits > self.max_bits
    }
}
