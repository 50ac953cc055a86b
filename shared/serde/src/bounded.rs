use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr};

/// An integer known by both ends to lie in `[min, max]`.
///
/// It is written as `value - min` using exactly as many bits as the span
/// `max - min` needs, so a range of one value costs nothing on the wire. The
/// bounds are never transmitted; the reader must supply the same ones.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct BoundedInteger {
    value: u32,
    min: u32,
    max: u32,
}

impl BoundedInteger {
    pub fn new(value: u32, min: u32, max: u32) -> Result<Self, SerdeErr> {
        if min > max || value < min || value > max {
            return Err(SerdeErr);
        }
        Ok(Self { value, min, max })
    }

    pub fn get(&self) -> u32 {
        self.value
    }

    /// Bits needed to encode any offset in `0..=span`.
    pub fn bits_for_span(span: u32) -> u32 {
        u32::BITS - span.leading_zeros()
    }

    pub fn bit_length(&self) -> u32 {
        Self::bits_for_span(self.max - self.min)
    }

    pub fn ser(&self, writer: &mut dyn BitWrite) {
        let mut offset = self.value - self.min;
        for _ in 0..self.bit_length() {
            writer.write_bit(offset & 1 != 0);
            offset >>= 1;
        }
    }

    pub fn de(reader: &mut BitReader, min: u32, max: u32) -> Result<Self, SerdeErr> {
        let value = Self::de_raw(reader, min, max)?;
        if value > u64::from(max) {
            return Err(SerdeErr);
        }
        Ok(Self {
            value: value as u32,
            min,
            max,
        })
    }

    /// Reads the encoded value without checking it against `max`. The width
    /// of the field still derives from `max - min`, so an encoder's overshoot
    /// can be reported with more context than a bare `SerdeErr`.
    pub fn de_raw(reader: &mut BitReader, min: u32, max: u32) -> Result<u64, SerdeErr> {
        if min > max {
            return Err(SerdeErr);
        }
        let mut offset: u64 = 0;
        for bit in 0..Self::bits_for_span(max - min) {
            if reader.read_bit()? {
                offset |= 1u64 << bit;
            }
        }
        Ok(u64::from(min) + offset)
    }
}
