//! # Perch Serde
//! Bit-packed serialization shared by both ends of a perch connection.

mod bit_reader;
mod bit_writer;
mod bounded;
mod constants;
mod error;
mod impls;
mod integer;
mod serde;
mod stream_writer;

pub use bit_reader::BitReader;
pub use bit_writer::{BitCounter, BitWrite, BitWriter};
pub use bounded::BoundedInteger;
pub use constants::{MTU_SIZE_BITS, MTU_SIZE_BYTES};
pub use error::SerdeErr;
pub use integer::{SerdeInteger, UnsignedInteger, UnsignedVariableInteger};
pub use serde::{ConstBitLength, Serde};
pub use stream_writer::StreamWriter;
