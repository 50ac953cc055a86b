use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr};

/// A type that can be written to and read back from a bit stream.
pub trait Serde: Sized + Clone {
    /// Writes the value into a stream of bits
    fn ser(&self, writer: &mut dyn BitWrite);

    /// Parses a value out of a stream of bits
    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;

    /// Number of bits [`Serde::ser`] will write for this value
    fn bit_length(&self) -> u32;
}

/// Implemented by types whose encoding always takes the same number of bits.
pub trait ConstBitLength {
    fn const_bit_length() -> u32;
}
