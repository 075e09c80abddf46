use alloc::vec::Vec;

use crate::{IntWidth, MAX_SEQUENCE_LENGTH, Serializable, SerializationError, uleb128};

// BYTE WRITER TRAIT
// ================================================================================================

/// Defines how primitive values are to be written into `Self`.
///
/// Writers are append-only. Multi-byte integers are always written in little-endian byte order.
pub trait ByteWriter: Sized {
    // REQUIRED METHODS
    // --------------------------------------------------------------------------------------------

    /// Writes a single byte into `self`.
    fn write_u8(&mut self, value: u8);

    /// Writes a sequence of bytes into `self`, without a length prefix.
    fn write_bytes(&mut self, values: &[u8]);

    // PROVIDED METHODS
    // --------------------------------------------------------------------------------------------

    /// Writes a boolean value into `self` as a single byte: `0x01` for true, `0x00` for false.
    fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    /// Writes a u16 value in little-endian byte order into `self`.
    fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a u32 value in little-endian byte order into `self`.
    fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a u64 value in little-endian byte order into `self`.
    fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a u128 value in little-endian byte order into `self`.
    fn write_u128(&mut self, value: u128) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes `value` using exactly `width` bytes in little-endian byte order.
    ///
    /// # Errors
    /// Returns [SerializationError::IntegerOutOfRange] if `value` does not fit into `width`. In
    /// this case nothing is written.
    fn write_uint(&mut self, width: IntWidth, value: u128) -> Result<(), SerializationError> {
        if !width.fits(value) {
            return Err(SerializationError::IntegerOutOfRange { width, value });
        }
        self.write_bytes(&value.to_le_bytes()[..width.num_bytes()]);
        Ok(())
    }

    /// Writes `value` in ULEB128 format into `self`.
    fn write_uleb128(&mut self, value: u64) {
        let mut buf = [0u8; uleb128::MAX_ENCODED_LEN];
        let len = uleb128::encode(value, &mut buf);
        self.write_bytes(&buf[..len]);
    }

    /// Writes a sequence length prefix into `self`.
    ///
    /// # Errors
    /// Returns [SerializationError::SequenceTooLong] if `len` exceeds
    /// [MAX_SEQUENCE_LENGTH](crate::MAX_SEQUENCE_LENGTH). In this case nothing is written.
    fn write_len(&mut self, len: usize) -> Result<(), SerializationError> {
        if len > MAX_SEQUENCE_LENGTH {
            return Err(SerializationError::SequenceTooLong(len));
        }
        self.write_uleb128(len as u64);
        Ok(())
    }

    /// Writes a length-prefixed byte sequence into `self`.
    fn write_byte_seq(&mut self, values: &[u8]) -> Result<(), SerializationError> {
        self.write_len(values.len())?;
        self.write_bytes(values);
        Ok(())
    }

    /// Writes the length of `items` followed by every item, in iteration order, using
    /// `element_writer` for each element.
    fn write_seq<I, F>(&mut self, items: I, mut element_writer: F) -> Result<(), SerializationError>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        F: FnMut(&mut Self, I::Item) -> Result<(), SerializationError>,
    {
        let items = items.into_iter();
        self.write_len(items.len())?;
        for item in items {
            element_writer(self, item)?;
        }
        Ok(())
    }

    /// Writes a tagged-union discriminant followed by the payload produced by `payload_writer`.
    fn write_variant<F>(&mut self, tag: u32, payload_writer: F) -> Result<(), SerializationError>
    where
        F: FnOnce(&mut Self) -> Result<(), SerializationError>,
    {
        self.write_uleb128(tag as u64);
        payload_writer(self)
    }

    /// Serializes `value` into `self`.
    fn write<S: Serializable + ?Sized>(&mut self, value: &S) -> Result<(), SerializationError> {
        value.write_into(self)
    }

    /// Serializes all `elements` into `self`, without a length prefix.
    fn write_many<S, T>(&mut self, elements: T) -> Result<(), SerializationError>
    where
        T: IntoIterator<Item = S>,
        S: Serializable,
    {
        for element in elements {
            element.write_into(self)?;
        }
        Ok(())
    }
}

impl ByteWriter for Vec<u8> {
    fn write_u8(&mut self, value: u8) {
        self.push(value);
    }

    fn write_bytes(&mut self, values: &[u8]) {
        self.extend_from_slice(values);
    }
}

// SERIALIZER
// ================================================================================================

/// An accumulating output buffer for one encode operation.
///
/// The buffer is owned by the serializer until it is handed over with [Serializer::into_bytes].
#[derive(Debug, Default, Clone)]
pub struct Serializer {
    output: Vec<u8>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity) }
    }

    /// Returns the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.output
    }

    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Consumes the serializer and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }
}

impl ByteWriter for Serializer {
    fn write_u8(&mut self, value: u8) {
        self.output.push(value);
    }

    fn write_bytes(&mut self, values: &[u8]) {
        self.output.extend_from_slice(values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializer_primitives() {
        let mut serializer = Serializer::new();
        serializer.write_bool(true);
        serializer.write_bool(false);
        serializer.write_u16(0x0203);
        serializer.write_u32(0x04050607);

        let expected = vec![
            0x01, 0x00,
            0x03, 0x02,  // u16 little-endian
            0x07, 0x06, 0x05, 0x04,  // u32 little-endian
        ];
        assert_eq!(serializer.as_slice(), &expected[..]);
        assert_eq!(serializer.len(), 8);
    }

    #[test]
    fn test_serializer_wide_integers() {
        let mut serializer = Serializer::with_capacity(24);
        serializer.write_u64(0x123456789abcdef0);
        serializer.write_u128(1);

        let bytes = serializer.into_bytes();
        assert_eq!(&bytes[..8], &0x123456789abcdef0_u64.to_le_bytes());
        assert_eq!(bytes[8], 1);
        assert!(bytes[9..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_uint_checks_width() {
        let mut serializer = Serializer::new();
        serializer.write_uint(IntWidth::U16, 0xbeef).unwrap();
        assert_eq!(serializer.as_slice(), &[0xef, 0xbe]);

        let err = serializer.write_uint(IntWidth::U8, 256).unwrap_err();
        assert_eq!(err, SerializationError::IntegerOutOfRange { width: IntWidth::U8, value: 256 });
        // nothing was appended by the failed write
        assert_eq!(serializer.len(), 2);
    }

    #[test]
    fn test_write_len_limit() {
        let mut serializer = Serializer::new();
        assert_eq!(
            serializer.write_len(MAX_SEQUENCE_LENGTH + 1),
            Err(SerializationError::SequenceTooLong(MAX_SEQUENCE_LENGTH + 1))
        );
        assert!(serializer.is_empty());

        serializer.write_len(MAX_SEQUENCE_LENGTH).unwrap();
        assert_eq!(serializer.as_slice(), &[0xff, 0xff, 0xff, 0xff, 0x07]);
    }

    #[test]
    fn test_write_seq_and_variant() {
        let mut serializer = Serializer::new();
        serializer
            .write_seq([true, false, true], |w, item| {
                w.write_bool(item);
                Ok(())
            })
            .unwrap();
        assert_eq!(serializer.as_slice(), &[0x03, 0x01, 0x00, 0x01]);

        let mut serializer = Serializer::new();
        serializer
            .write_variant(130, |w| {
                w.write_u8(7);
                Ok(())
            })
            .unwrap();
        assert_eq!(serializer.as_slice(), &[0x82, 0x01, 0x07]);
    }

    #[test]
    fn test_write_byte_seq() {
        let mut buf = Vec::new();
        buf.write_byte_seq(b"sui").unwrap();
        assert_eq!(buf, [0x03, b's', b'u', b'i']);

        let mut buf = Vec::new();
        buf.write_byte_seq(&[]).unwrap();
        assert_eq!(buf, [0x00]);
    }
}
