use crate::{
    bit_reader::BitReader,
    bit_writer::BitWrite,
    error::SerdeErr,
    serde::{ConstBitLength, Serde},
};

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<true, BITS>;

/// An unsigned integer written in `BITS`-bit chunks.
///
/// A fixed integer always takes exactly `BITS` bits. A variable integer writes
/// a continuation bit before every chunk, so small values stay small on the
/// wire while large values remain representable.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const VARIABLE: bool, const BITS: u8> {
    value: u64,
}

impl<const VARIABLE: bool, const BITS: u8> SerdeInteger<VARIABLE, BITS> {
    /// Wraps `value`. For fixed integers the value is truncated to `BITS` bits;
    /// use [`SerdeInteger::try_new`] to reject values that don't fit.
    pub fn new<T: Into<u64>>(value: T) -> Self {
        let value = value.into();
        if VARIABLE {
            Self { value }
        } else {
            Self {
                value: value & Self::mask(),
            }
        }
    }

    pub fn try_new<T: Into<u64>>(value: T) -> Result<Self, SerdeErr> {
        let value = value.into();
        if !VARIABLE && value > Self::mask() {
            return Err(SerdeErr);
        }
        Ok(Self { value })
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    fn mask() -> u64 {
        if BITS >= 64 {
            u64::MAX
        } else {
            (1u64 << BITS) - 1
        }
    }

    fn write_chunk(writer: &mut dyn BitWrite, mut value: u64) {
        for _ in 0..BITS {
            writer.write_bit(value & 1 != 0);
            value >>= 1;
        }
    }

    fn read_chunk(reader: &mut BitReader) -> Result<u64, SerdeErr> {
        let mut output: u64 = 0;
        for offset in 0..BITS {
            if reader.read_bit()? {
                output |= 1u64 << offset;
            }
        }
        Ok(output)
    }
}

impl<const VARIABLE: bool, const BITS: u8> Serde for SerdeInteger<VARIABLE, BITS> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        if !VARIABLE {
            Self::write_chunk(writer, self.value);
            return;
        }

        let mut value = self.value;
        loop {
            let proceed = value > Self::mask();
            writer.write_bit(proceed);
            Self::write_chunk(writer, value & Self::mask());
            if !proceed {
                return;
            }
            value >>= BITS;
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if !VARIABLE {
            return Ok(Self {
                value: Self::read_chunk(reader)?,
            });
        }

        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let proceed = reader.read_bit()?;
            let chunk = Self::read_chunk(reader)?;
            if shift >= 64 {
                return Err(SerdeErr);
            }
            value |= chunk << shift;
            shift += BITS as u32;
            if !proceed {
                return Ok(Self { value });
            }
        }
    }

    fn bit_length(&self) -> u32 {
        if !VARIABLE {
            return BITS as u32;
        }

        let mut output: u32 = 0;
        let mut value = self.value;
        loop {
            output += 1 + BITS as u32;
            if value <= Self::mask() {
                return output;
            }
            value >>= BITS;
        }
    }
}

impl<const BITS: u8> ConstBitLength for SerdeInteger<false, BITS> {
    fn const_bit_length() -> u32 {
        BITS as u32
    }
}
