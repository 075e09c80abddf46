use core::{cmp::Ordering, fmt};

use crate::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable, SerializationError,
};

// INTEGER WIDTH
// ================================================================================================

/// Width of a fixed-size unsigned integer field.
///
/// Used by the dynamic integer operations ([ByteWriter::write_uint] and [ByteReader::read_uint])
/// when the width of a field is only known at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntWidth {
    U8,
    U16,
    U32,
    U64,
    U128,
}

impl IntWidth {
    /// Returns the number of bytes a value of this width occupies on the wire.
    pub const fn num_bytes(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
            Self::U128 => 16,
        }
    }

    /// Returns the largest value representable with this width.
    pub const fn max_value(&self) -> u128 {
        match self {
            Self::U8 => u8::MAX as u128,
            Self::U16 => u16::MAX as u128,
            Self::U32 => u32::MAX as u128,
            Self::U64 => u64::MAX as u128,
            Self::U128 => u128::MAX,
        }
    }

    /// Returns true if `value` fits into this width.
    pub const fn fits(&self, value: u128) -> bool {
        value <= self.max_value()
    }
}

impl fmt::Display for IntWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
        };
        f.write_str(name)
    }
}

// U256
// ================================================================================================

/// A 256-bit unsigned integer, stored as 32 little-endian bytes.
///
/// Only the conversions needed by the codec are provided; no arithmetic is implemented.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct U256([u8; 32]);

impl U256 {
    pub const ZERO: Self = Self([0; 32]);
    pub const MAX: Self = Self([u8::MAX; 32]);

    pub const fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_le_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn from_be_bytes(mut bytes: [u8; 32]) -> Self {
        bytes.reverse();
        Self(bytes)
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&value.to_le_bytes());
        Self(bytes)
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self::from(value as u128)
    }
}

impl TryFrom<U256> for u128 {
    type Error = U256;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        if value.0[16..].iter().any(|&b| b != 0) {
            return Err(value);
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&value.0[..16]);
        Ok(u128::from_le_bytes(low))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({self:#x})")
    }
}

impl fmt::LowerHex for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        let be = self.to_be_bytes();
        match be.iter().position(|&b| b != 0) {
            None => f.write_str("0"),
            Some(first) => {
                write!(f, "{:x}", be[first])?;
                for byte in &be[first + 1..] {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            },
        }
    }
}

impl Serializable for U256 {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_bytes(&self.0);
        Ok(())
    }

    fn get_size_hint(&self) -> usize {
        32
    }
}

impl Deserializable for U256 {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_array::<32>().map(Self)
    }

    fn min_serialized_size() -> usize {
        32
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_width_bounds() {
        assert!(IntWidth::U8.fits(255));
        assert!(!IntWidth::U8.fits(256));
        assert!(IntWidth::U16.fits(u16::MAX as u128));
        assert!(!IntWidth::U32.fits(u32::MAX as u128 + 1));
        assert!(IntWidth::U128.fits(u128::MAX));
        assert_eq!(IntWidth::U64.num_bytes(), 8);
        assert_eq!(format!("{}", IntWidth::U16), "u16");
    }

    #[test]
    fn u256_conversions() {
        let value = U256::from(0x0102_u128);
        assert_eq!(value.to_le_bytes()[..2], [0x02, 0x01]);
        assert_eq!(u128::try_from(value), Ok(0x0102));
        assert!(u128::try_from(U256::MAX).is_err());
        assert_eq!(U256::from_be_bytes(value.to_be_bytes()), value);
    }

    #[test]
    fn u256_ordering_is_numeric() {
        let small = U256::from(u128::MAX);
        let mut bytes = [0u8; 32];
        bytes[16] = 1;
        let large = U256::from_le_bytes(bytes);
        assert!(small < large);
        assert!(U256::ZERO < small);
        assert_eq!(format!("{:#x}", large), "0x100000000000000000000000000000000");
        assert_eq!(format!("{:x}", U256::ZERO), "0");
    }
}
