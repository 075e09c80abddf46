#![no_std]

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod config;
mod error;
mod int;
mod reader;
mod traits;
mod writer;

pub mod sui;
pub mod uleb128;
pub mod value;

// RE-EXPORTS
// ================================================================================================

pub use config::{DecoderConfig, TrailingBytes};
pub use error::{DeserializationError, SerializationError};
pub use int::{IntWidth, U256};
pub use reader::{BudgetedReader, ByteReader, Deserializer, ReadManyIter};
#[cfg(feature = "derive")]
pub use sui_bcs_derive::{Deserializable, Serializable};
pub use traits::{Deserializable, Serializable};
pub use writer::{ByteWriter, Serializer};

// CONSTANTS
// ================================================================================================

/// Largest length a BCS sequence, byte string or map may declare.
pub const MAX_SEQUENCE_LENGTH: usize = (1 << 31) - 1;

/// Default limit on the nesting of containers when decoding layout-driven values.
pub const MAX_CONTAINER_DEPTH: usize = 500;

// CONVENIENCE FUNCTIONS
// ================================================================================================

/// Serializes `value` into a freshly allocated vector of bytes.
pub fn to_bytes<T: Serializable + ?Sized>(
    value: &T,
) -> Result<alloc::vec::Vec<u8>, SerializationError> {
    value.to_bytes()
}

/// Deserializes a `T` from `bytes`, rejecting any trailing input.
pub fn from_bytes<T: Deserializable>(bytes: &[u8]) -> Result<T, DeserializationError> {
    T::read_from_bytes(bytes)
}
