use perch_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

// Enum used as a shared network protocol, representing the records a world
// packet can carry
#[derive(Copy, PartialEq, Eq, Clone, Debug)]
pub enum WorldRecordType {
    // A new object with its full state
    Spawn,
    // An object leaving the world
    Despawn,
    // Changed attributes and/or motion of a known object
    Update,
}

impl Serde for WorldRecordType {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let index: u8 = match self {
            WorldRecordType::Spawn => 0,
            WorldRecordType::Despawn => 1,
            WorldRecordType::Update => 2,
        };
        UnsignedInteger::<2>::new(index).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match UnsignedInteger::<2>::de(reader)?.get() {
            0 => Ok(WorldRecordType::Spawn),
            1 => Ok(WorldRecordType::Despawn),
            2 => Ok(WorldRecordType::Update),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        Self::const_bit_length()
    }
}

impl ConstBitLength for WorldRecordType {
    fn const_bit_length() -> u32 {
        2
    }
}
