use alloc::string::String;
use core::{fmt, str::FromStr};

use thiserror::Error;

use crate::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable, SerializationError,
};

/// Number of bytes in an address, object id or digest.
pub const ADDRESS_LENGTH: usize = 32;

// HEX PARSING
// ================================================================================================

/// Defines errors which can occur during parsing of hex-encoded addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    #[error("hex encoded address must have at most {max} digits, found {actual}")]
    InvalidLength { max: usize, actual: usize },
    #[error("hex encoded address must not be empty")]
    Empty,
    #[error("hex encoded data must contain only characters [0-9a-fA-F]")]
    InvalidChar,
}

/// Parses a hex string with an optional `0x` prefix into 32 bytes, left-padding short values with
/// zeros (`0x2` is the same address as `0x00..02`).
fn hex_to_address_bytes(value: &str) -> Result<[u8; ADDRESS_LENGTH], AddressParseError> {
    let digits = value.strip_prefix("0x").unwrap_or(value).as_bytes();
    if digits.is_empty() {
        return Err(AddressParseError::Empty);
    }
    if digits.len() > ADDRESS_LENGTH * 2 {
        return Err(AddressParseError::InvalidLength {
            max: ADDRESS_LENGTH * 2,
            actual: digits.len(),
        });
    }

    let mut nibbles = [0u8; ADDRESS_LENGTH * 2];
    let offset = nibbles.len() - digits.len();
    for (slot, &digit) in nibbles[offset..].iter_mut().zip(digits) {
        *slot = match digit {
            b'0'..=b'9' => digit - b'0',
            b'a'..=b'f' => digit - b'a' + 10,
            b'A'..=b'F' => digit - b'A' + 10,
            _ => return Err(AddressParseError::InvalidChar),
        };
    }

    let mut decoded = [0u8; ADDRESS_LENGTH];
    for (byte, pair) in decoded.iter_mut().zip(nibbles.chunks_exact(2)) {
        *byte = (pair[0] << 4) | pair[1];
    }
    Ok(decoded)
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("0x")?;
    for byte in bytes {
        write!(f, "{byte:02x}")?;
    }
    Ok(())
}

// SUI ADDRESS
// ================================================================================================

/// A 32-byte Sui account address or object id.
///
/// Encoded as 32 raw bytes with no length prefix.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuiAddress([u8; ADDRESS_LENGTH]);

/// Object ids share the address representation.
pub type ObjectId = SuiAddress;

impl SuiAddress {
    pub const ZERO: Self = Self([0; ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the address whose last byte is `value` and all other bytes are zero.
    pub const fn from_u8(value: u8) -> Self {
        let mut bytes = [0; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = value;
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("{self}")
    }
}

impl From<[u8; ADDRESS_LENGTH]> for SuiAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl FromStr for SuiAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_address_bytes(s).map(Self)
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl Serializable for SuiAddress {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_bytes(&self.0);
        Ok(())
    }

    fn get_size_hint(&self) -> usize {
        ADDRESS_LENGTH
    }
}

impl Deserializable for SuiAddress {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_array().map(Self)
    }

    fn min_serialized_size() -> usize {
        ADDRESS_LENGTH
    }
}

// OBJECT DIGEST
// ================================================================================================

/// The 32-byte digest of an object's contents.
///
/// Unlike addresses, digests are encoded as a byte sequence: a `0x20` length prefix followed by
/// the 32 bytes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectDigest([u8; ADDRESS_LENGTH]);

impl ObjectDigest {
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObjectDigest(")?;
        write_hex(f, &self.0)?;
        f.write_str(")")
    }
}

impl Serializable for ObjectDigest {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_byte_seq(&self.0)
    }

    fn get_size_hint(&self) -> usize {
        ADDRESS_LENGTH + 1
    }
}

impl Deserializable for ObjectDigest {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let len = source.read_len()?;
        if len != ADDRESS_LENGTH {
            return Err(DeserializationError::malformed(format!(
                "object digest must be {ADDRESS_LENGTH} bytes, found {len}"
            )));
        }
        source.read_array().map(Self)
    }

    fn min_serialized_size() -> usize {
        ADDRESS_LENGTH + 1
    }
}

// SEQUENCE NUMBER
// ================================================================================================

/// Version of an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceNumber(pub u64);

impl Serializable for SequenceNumber {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_u64(self.0);
        Ok(())
    }

    fn get_size_hint(&self) -> usize {
        8
    }
}

impl Deserializable for SequenceNumber {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_u64().map(Self)
    }

    fn min_serialized_size() -> usize {
        8
    }
}

// OBJECT REFERENCE
// ================================================================================================

/// A reference to a specific version of an owned object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectRef {
    pub object_id: ObjectId,
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
}

impl Serializable for ObjectRef {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        self.object_id.write_into(target)?;
        self.version.write_into(target)?;
        self.digest.write_into(target)
    }

    fn get_size_hint(&self) -> usize {
        self.object_id.get_size_hint() + self.version.get_size_hint() + self.digest.get_size_hint()
    }
}

impl Deserializable for ObjectRef {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        Ok(Self {
            object_id: source.read()?,
            version: source.read()?,
            digest: source.read()?,
        })
    }

    fn min_serialized_size() -> usize {
        ADDRESS_LENGTH + 8 + ADDRESS_LENGTH + 1
    }
}
