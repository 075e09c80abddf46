use alloc::{string::String, vec::Vec};
use core::marker::PhantomData;

use crate::{
    Deserializable, DeserializationError, IntWidth, MAX_SEQUENCE_LENGTH,
    uleb128::{self, Step},
};

/// Upper bound on the capacity reserved up front for a sequence, whatever length it claims.
const MAX_PREALLOCATION: usize = 4096;

// BYTE READER TRAIT
// ================================================================================================

/// Defines how primitive values are to be read from `Self`.
///
/// Whenever data is read from the reader using any of the `read_*` functions, the reader advances
/// past exactly the bytes that were consumed. If an error occurs, the reader is not rolled back to
/// the state prior to calling the function.
pub trait ByteReader {
    // REQUIRED METHODS
    // --------------------------------------------------------------------------------------------

    /// Returns a single byte read from `self`.
    ///
    /// # Errors
    /// Returns [DeserializationError::UnexpectedEof] if the reader is at the end of its input.
    fn read_u8(&mut self) -> Result<u8, DeserializationError>;

    /// Returns the next byte to be read from `self` without advancing the reader.
    ///
    /// # Errors
    /// Returns [DeserializationError::UnexpectedEof] if the reader is at the end of its input.
    fn peek_u8(&self) -> Result<u8, DeserializationError>;

    /// Returns a slice of bytes of the specified length read from `self`.
    ///
    /// # Errors
    /// Returns [DeserializationError::UnexpectedEof] if fewer than `len` bytes remain.
    fn read_slice(&mut self, len: usize) -> Result<&[u8], DeserializationError>;

    /// Returns a byte array of length `N` read from `self`.
    ///
    /// # Errors
    /// Returns [DeserializationError::UnexpectedEof] if fewer than `N` bytes remain.
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializationError>;

    /// Checks if it is possible to read at least `num_bytes` bytes from `self`.
    fn check_eor(&self, num_bytes: usize) -> Result<(), DeserializationError>;

    /// Returns true if there are more bytes left to be read from `self`.
    fn has_more_bytes(&self) -> bool;

    /// Returns the number of bytes that can still be read from `self`.
    fn remaining_bytes(&self) -> usize;

    /// Returns the maximum number of elements that can be safely allocated, given each element
    /// occupies at least `element_size` bytes when serialized.
    ///
    /// The bound is `remaining_bytes() / element_size`. Elements that encode to zero bytes are
    /// charged one byte each, so no sequence may claim more elements than there are bytes left.
    /// For a [BudgetedReader] the remaining bytes are capped by the budget.
    fn max_alloc(&self, element_size: usize) -> usize {
        self.remaining_bytes() / element_size.max(1)
    }

    // PROVIDED METHODS
    // --------------------------------------------------------------------------------------------

    /// Returns a boolean value read from `self` consuming 1 byte from the reader.
    ///
    /// # Errors
    /// Returns [DeserializationError::MalformedEncoding] if the byte is neither `0x00` nor `0x01`.
    fn read_bool(&mut self) -> Result<bool, DeserializationError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => {
                Err(DeserializationError::malformed(format!("{byte:#04x} is not a boolean value")))
            },
        }
    }

    /// Returns a u16 value read from `self` in little-endian byte order.
    fn read_u16(&mut self) -> Result<u16, DeserializationError> {
        self.read_array::<2>().map(u16::from_le_bytes)
    }

    /// Returns a u32 value read from `self` in little-endian byte order.
    fn read_u32(&mut self) -> Result<u32, DeserializationError> {
        self.read_array::<4>().map(u32::from_le_bytes)
    }

    /// Returns a u64 value read from `self` in little-endian byte order.
    fn read_u64(&mut self) -> Result<u64, DeserializationError> {
        self.read_array::<8>().map(u64::from_le_bytes)
    }

    /// Returns a u128 value read from `self` in little-endian byte order.
    fn read_u128(&mut self) -> Result<u128, DeserializationError> {
        self.read_array::<16>().map(u128::from_le_bytes)
    }

    /// Returns an unsigned value of the specified `width` read from `self`.
    fn read_uint(&mut self, width: IntWidth) -> Result<u128, DeserializationError> {
        let bytes = self.read_slice(width.num_bytes())?;
        let mut buf = [0u8; 16];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(u128::from_le_bytes(buf))
    }

    /// Returns a u64 value read from `self` in ULEB128 format.
    ///
    /// # Errors
    /// Returns a [DeserializationError] if:
    /// * the input ends before the final byte of the value.
    /// * the encoded value overflows a u64.
    /// * the encoding is not the shortest one for the value.
    fn read_uleb128_u64(&mut self) -> Result<u64, DeserializationError> {
        read_uleb128(self, u64::MAX)
    }

    /// Returns a u32 value read from `self` in ULEB128 format.
    ///
    /// # Errors
    /// Same as [ByteReader::read_uleb128_u64], with overflow checked against `u32::MAX`.
    fn read_uleb128_u32(&mut self) -> Result<u32, DeserializationError> {
        read_uleb128(self, u32::MAX as u64).map(|value| value as u32)
    }

    /// Returns a sequence length read from `self`.
    ///
    /// # Errors
    /// Returns [DeserializationError::MalformedEncoding] if the length exceeds
    /// [MAX_SEQUENCE_LENGTH](crate::MAX_SEQUENCE_LENGTH).
    fn read_len(&mut self) -> Result<usize, DeserializationError> {
        let len = self.read_uleb128_u32()? as usize;
        if len > MAX_SEQUENCE_LENGTH {
            return Err(DeserializationError::malformed(format!(
                "sequence length {len} exceeds the maximum of {MAX_SEQUENCE_LENGTH}"
            )));
        }
        Ok(len)
    }

    /// Returns a length-prefixed byte vector read from `self`.
    fn read_byte_seq(&mut self) -> Result<Vec<u8>, DeserializationError> {
        let len = self.read_len()?;
        self.read_vec(len)
    }

    /// Returns a byte vector of the specified length read from `self`.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, DeserializationError> {
        self.read_slice(len).map(<[u8]>::to_vec)
    }

    /// Returns a length-prefixed UTF-8 string read from `self`.
    fn read_string(&mut self) -> Result<String, DeserializationError> {
        let data = self.read_byte_seq()?;
        String::from_utf8(data).map_err(|err| DeserializationError::malformed(format!("{err}")))
    }

    /// Reads a deserializable value from `self`.
    fn read<D>(&mut self) -> Result<D, DeserializationError>
    where
        Self: Sized,
        D: Deserializable,
    {
        D::read_from(self)
    }

    /// Reads a length prefix and then invokes `element_reader` that many times, collecting the
    /// elements in order.
    ///
    /// # Errors
    /// Returns [DeserializationError::MalformedEncoding] if the length exceeds
    /// `self.max_alloc(1)`, i.e. if the input cannot back one byte per claimed element.
    fn read_seq<T, F>(&mut self, mut element_reader: F) -> Result<Vec<T>, DeserializationError>
    where
        Self: Sized,
        F: FnMut(&mut Self) -> Result<T, DeserializationError>,
    {
        let len = self.read_len()?;
        let max_elements = self.max_alloc(1);
        if len > max_elements {
            return Err(DeserializationError::malformed(format!(
                "requested {len} elements but reader can provide at most {max_elements}"
            )));
        }
        let mut result = Vec::with_capacity(len.min(MAX_PREALLOCATION));
        for _ in 0..len {
            result.push(element_reader(self)?);
        }
        Ok(result)
    }

    /// Returns an iterator that deserializes `num_elements` instances of `D` from this reader.
    ///
    /// # Errors
    /// Returns an error if `num_elements` exceeds `self.max_alloc(D::min_serialized_size())`,
    /// indicating the input cannot possibly hold that many elements.
    fn read_many_iter<D>(
        &mut self,
        num_elements: usize,
    ) -> Result<ReadManyIter<'_, Self, D>, DeserializationError>
    where
        Self: Sized,
        D: Deserializable,
    {
        let max_elements = self.max_alloc(D::min_serialized_size());
        if num_elements > max_elements {
            return Err(DeserializationError::malformed(format!(
                "requested {num_elements} elements but reader can provide at most {max_elements}"
            )));
        }
        Ok(ReadManyIter {
            reader: self,
            remaining: num_elements,
            _item: PhantomData,
        })
    }

    /// Returns the discriminant of a tagged union read from `self`.
    fn read_variant_index(&mut self) -> Result<u32, DeserializationError> {
        self.read_uleb128_u32()
    }

    /// Reads a tagged-union discriminant and dispatches to the matching payload reader.
    ///
    /// `readers[i]` reconstructs the variant with discriminant `i`.
    ///
    /// # Errors
    /// Returns [DeserializationError::UnknownVariant] if no reader is registered for the decoded
    /// discriminant; no further bytes are consumed in this case.
    fn read_variant<T>(
        &mut self,
        type_name: &'static str,
        readers: &[fn(&mut Self) -> Result<T, DeserializationError>],
    ) -> Result<T, DeserializationError>
    where
        Self: Sized,
    {
        let tag = self.read_variant_index()?;
        let reader = readers
            .get(tag as usize)
            .ok_or(DeserializationError::UnknownVariant { type_name, tag: u64::from(tag) })?;
        reader(self)
    }
}

fn read_uleb128<R: ByteReader + ?Sized>(
    source: &mut R,
    max: u64,
) -> Result<u64, DeserializationError> {
    let mut decoder = uleb128::Decoder::new(max);
    loop {
        match decoder.push(source.read_u8()?) {
            Step::NeedMore => continue,
            Step::Done(value) => return Ok(value),
            Step::Overflow => {
                return Err(DeserializationError::malformed(format!(
                    "ULEB128 value overflows the maximum of {max}"
                )));
            },
            Step::NonCanonical => {
                return Err(DeserializationError::malformed("non-canonical ULEB128 encoding"));
            },
        }
    }
}

// READ MANY ITERATOR
// ================================================================================================

/// Iterator that lazily deserializes elements from a [ByteReader].
///
/// Created by [ByteReader::read_many_iter].
#[derive(Debug)]
pub struct ReadManyIter<'reader, R: ByteReader, D: Deserializable> {
    reader: &'reader mut R,
    remaining: usize,
    _item: PhantomData<D>,
}

impl<R: ByteReader, D: Deserializable> Iterator for ReadManyIter<'_, R, D> {
    type Item = Result<D, DeserializationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining > 0 {
            self.remaining -= 1;
            Some(D::read_from(self.reader))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: ByteReader, D: Deserializable> ExactSizeIterator for ReadManyIter<'_, R, D> {}

// DESERIALIZER
// ================================================================================================

/// An input cursor over a borrowed byte slice.
///
/// The read offset never exceeds the length of the source, and every read advances it by exactly
/// the number of bytes consumed.
#[derive(Debug, Clone)]
pub struct Deserializer<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> Deserializer<'a> {
    /// Creates a new deserializer reading from the start of `source`.
    pub fn new(source: &'a [u8]) -> Self {
        Deserializer { source, pos: 0 }
    }

    /// Returns the current read offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the bytes that have not been read yet.
    pub fn remaining_slice(&self) -> &'a [u8] {
        &self.source[self.pos..]
    }
}

impl ByteReader for Deserializer<'_> {
    fn read_u8(&mut self) -> Result<u8, DeserializationError> {
        self.check_eor(1)?;
        let result = self.source[self.pos];
        self.pos += 1;
        Ok(result)
    }

    fn peek_u8(&self) -> Result<u8, DeserializationError> {
        self.check_eor(1)?;
        Ok(self.source[self.pos])
    }

    fn read_slice(&mut self, len: usize) -> Result<&[u8], DeserializationError> {
        self.check_eor(len)?;
        let result = &self.source[self.pos..self.pos + len];
        self.pos += len;
        Ok(result)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializationError> {
        self.check_eor(N)?;
        let mut result = [0_u8; N];
        result.copy_from_slice(&self.source[self.pos..self.pos + N]);
        self.pos += N;
        Ok(result)
    }

    fn check_eor(&self, num_bytes: usize) -> Result<(), DeserializationError> {
        if num_bytes > self.remaining_bytes() {
            return Err(DeserializationError::UnexpectedEof);
        }
        Ok(())
    }

    fn has_more_bytes(&self) -> bool {
        self.pos < self.source.len()
    }

    fn remaining_bytes(&self) -> usize {
        self.source.len() - self.pos
    }
}

// CURSOR
// ================================================================================================

#[cfg(feature = "std")]
macro_rules! cursor_remaining_buf {
    ($cursor:ident) => {{
        let buf = $cursor.get_ref().as_ref();
        let start = $cursor.position().min(buf.len() as u64) as usize;
        &buf[start..]
    }};
}

#[cfg(feature = "std")]
impl<T: AsRef<[u8]>> ByteReader for std::io::Cursor<T> {
    fn read_u8(&mut self) -> Result<u8, DeserializationError> {
        let byte = self.peek_u8()?;
        self.set_position(self.position() + 1);
        Ok(byte)
    }

    fn peek_u8(&self) -> Result<u8, DeserializationError> {
        cursor_remaining_buf!(self).first().copied().ok_or(DeserializationError::UnexpectedEof)
    }

    fn read_slice(&mut self, len: usize) -> Result<&[u8], DeserializationError> {
        self.check_eor(len)?;
        let start = self.position().min(self.get_ref().as_ref().len() as u64) as usize;
        self.set_position((start + len) as u64);
        Ok(&self.get_ref().as_ref()[start..start + len])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializationError> {
        self.read_slice(N).map(|bytes| {
            let mut result = [0u8; N];
            result.copy_from_slice(bytes);
            result
        })
    }

    fn check_eor(&self, num_bytes: usize) -> Result<(), DeserializationError> {
        if cursor_remaining_buf!(self).len() >= num_bytes {
            Ok(())
        } else {
            Err(DeserializationError::UnexpectedEof)
        }
    }

    fn has_more_bytes(&self) -> bool {
        !cursor_remaining_buf!(self).is_empty()
    }

    fn remaining_bytes(&self) -> usize {
        cursor_remaining_buf!(self).len()
    }
}

// BUDGETED READER
// ================================================================================================

/// A reader wrapper that enforces a byte budget during deserialization.
///
/// Malicious input can claim a huge sequence length up front. [ByteReader::max_alloc] derives a
/// bound from the remaining budget, which sequence reads check before iterating, and every read is
/// charged against the budget.
#[derive(Debug)]
pub struct BudgetedReader<R> {
    inner: R,
    remaining: usize,
}

impl<R> BudgetedReader<R> {
    /// Wraps a reader with the specified byte budget.
    pub fn new(inner: R, budget: usize) -> Self {
        Self { inner, remaining: budget }
    }

    /// Returns remaining budget in bytes.
    pub fn budget(&self) -> usize {
        self.remaining
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn consume_budget(&mut self, requested: usize) -> Result<(), DeserializationError> {
        if requested > self.remaining {
            return Err(DeserializationError::BudgetExhausted {
                requested,
                remaining: self.remaining,
            });
        }
        self.remaining -= requested;
        Ok(())
    }
}

impl<R: ByteReader> ByteReader for BudgetedReader<R> {
    fn read_u8(&mut self) -> Result<u8, DeserializationError> {
        self.consume_budget(1)?;
        self.inner.read_u8()
    }

    fn peek_u8(&self) -> Result<u8, DeserializationError> {
        // peek doesn't consume budget since it doesn't advance the reader
        self.inner.peek_u8()
    }

    fn read_slice(&mut self, len: usize) -> Result<&[u8], DeserializationError> {
        self.consume_budget(len)?;
        self.inner.read_slice(len)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializationError> {
        self.consume_budget(N)?;
        self.inner.read_array()
    }

    fn check_eor(&self, num_bytes: usize) -> Result<(), DeserializationError> {
        if num_bytes > self.remaining {
            return Err(DeserializationError::BudgetExhausted {
                requested: num_bytes,
                remaining: self.remaining,
            });
        }
        self.inner.check_eor(num_bytes)
    }

    fn has_more_bytes(&self) -> bool {
        self.remaining > 0 && self.inner.has_more_bytes()
    }

    fn remaining_bytes(&self) -> usize {
        self.remaining.min(self.inner.remaining_bytes())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_deserializer_basic() {
        let data = [1u8, 2, 3, 4];
        let mut reader = Deserializer::new(&data);

        assert_eq!(reader.position(), 0);
        assert!(reader.has_more_bytes());
        assert_eq!(reader.remaining_bytes(), 4);

        assert_eq!(reader.read_u8().unwrap(), 1);
        assert_eq!(reader.peek_u8().unwrap(), 2);
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.read_u16().unwrap(), 0x0302);
        assert_eq!(reader.remaining_slice(), &[4]);
        assert_eq!(reader.read_u8().unwrap(), 4);

        assert!(!reader.has_more_bytes());
        assert_eq!(reader.read_u8(), Err(DeserializationError::UnexpectedEof));
        // a failed read does not move the cursor past the end
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_read_bool() {
        let data = [0u8, 1, 2];
        let mut reader = Deserializer::new(&data);
        assert!(!reader.read_bool().unwrap());
        assert!(reader.read_bool().unwrap());
        assert_matches!(reader.read_bool(), Err(DeserializationError::MalformedEncoding(_)));

        let mut reader = Deserializer::new(&[]);
        assert_eq!(reader.read_bool(), Err(DeserializationError::UnexpectedEof));
    }

    #[test]
    fn test_read_fixed_width_eof() {
        let data = [0xffu8; 7];
        let mut reader = Deserializer::new(&data);
        assert_eq!(reader.read_u64(), Err(DeserializationError::UnexpectedEof));
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u32().unwrap(), u32::MAX);
        assert_eq!(reader.read_u32(), Err(DeserializationError::UnexpectedEof));
    }

    #[test]
    fn test_read_uint() {
        let data = [0xef, 0xbe, 0x01];
        let mut reader = Deserializer::new(&data);
        assert_eq!(reader.read_uint(IntWidth::U16).unwrap(), 0xbeef);
        assert_eq!(reader.read_uint(IntWidth::U8).unwrap(), 1);
        assert_eq!(reader.read_uint(IntWidth::U8), Err(DeserializationError::UnexpectedEof));
    }

    #[test]
    fn test_read_uleb128() {
        let data = [0xac, 0x02, 0x7f, 0x80];
        let mut reader = Deserializer::new(&data);
        assert_eq!(reader.read_uleb128_u64().unwrap(), 300);
        assert_eq!(reader.read_uleb128_u32().unwrap(), 127);
        assert_eq!(reader.read_uleb128_u64(), Err(DeserializationError::UnexpectedEof));

        let data = [0x80, 0x80, 0x80, 0x80, 0x10];
        let mut reader = Deserializer::new(&data);
        assert_matches!(reader.read_uleb128_u32(), Err(DeserializationError::MalformedEncoding(_)));

        let mut reader = Deserializer::new(&[0x80, 0x00]);
        assert_matches!(reader.read_uleb128_u64(), Err(DeserializationError::MalformedEncoding(_)));
    }

    #[test]
    fn test_read_len_limit() {
        // 2^31 is a valid u32 but not a valid sequence length
        let data = [0x80, 0x80, 0x80, 0x80, 0x08];
        let mut reader = Deserializer::new(&data);
        assert_matches!(reader.read_len(), Err(DeserializationError::MalformedEncoding(_)));
    }

    #[test]
    fn test_read_byte_seq_and_string() {
        let data = [0x03, b's', b'u', b'i', 0x02, 0xff, 0xfe];
        let mut reader = Deserializer::new(&data);
        assert_eq!(reader.read_byte_seq().unwrap(), b"sui");
        assert_matches!(reader.read_string(), Err(DeserializationError::MalformedEncoding(_)));

        let mut reader = Deserializer::new(&[0x05, 1, 2]);
        assert_eq!(reader.read_byte_seq(), Err(DeserializationError::UnexpectedEof));
    }

    #[test]
    fn test_read_seq() {
        let data = [0x03, 0x01, 0x00, 0x01];
        let mut reader = Deserializer::new(&data);
        let values = reader.read_seq(|r| r.read_bool()).unwrap();
        assert_eq!(values, [true, false, true]);
        assert!(!reader.has_more_bytes());
    }

    #[test]
    fn test_read_variant() {
        let readers: [fn(&mut Deserializer<'static>) -> Result<u16, DeserializationError>; 2] =
            [|_| Ok(0), |r| r.read_u16()];

        let mut reader = Deserializer::new(&[0x01, 0x34, 0x12]);
        assert_eq!(reader.read_variant("Sample", &readers).unwrap(), 0x1234);

        let mut reader = Deserializer::new(&[0x00]);
        assert_eq!(reader.read_variant("Sample", &readers).unwrap(), 0);

        let mut reader = Deserializer::new(&[0x02, 0x34, 0x12]);
        assert_eq!(
            reader.read_variant("Sample", &readers),
            Err(DeserializationError::UnknownVariant { type_name: "Sample", tag: 2 })
        );
        // only the discriminant was consumed
        assert_eq!(reader.position(), 1);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_cursor_reader() {
        let mut cursor = std::io::Cursor::new(vec![0x01u8, 0x02, 0x03]);
        assert_eq!(cursor.remaining_bytes(), 3);
        assert!(cursor.read_bool().unwrap());
        assert_eq!(cursor.read_slice(2).unwrap(), &[0x02, 0x03]);
        assert!(!cursor.has_more_bytes());
        assert_eq!(cursor.read_u8(), Err(DeserializationError::UnexpectedEof));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_cursor_positioned_past_end() {
        let mut cursor = std::io::Cursor::new(vec![0x01u8, 0x02, 0x03]);
        cursor.set_position(10);
        assert_eq!(cursor.read_array::<0>().unwrap(), [0u8; 0]);
        assert_eq!(cursor.read_slice(0).unwrap(), &[] as &[u8]);
        assert_eq!(cursor.read_slice(1), Err(DeserializationError::UnexpectedEof));
        assert_eq!(cursor.remaining_bytes(), 0);
    }

    #[test]
    fn budgeted_reader_basic() {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut reader = BudgetedReader::new(Deserializer::new(&data), 4);

        assert_eq!(reader.budget(), 4);
        assert!(reader.has_more_bytes());
        assert_eq!(reader.read_u32().unwrap(), 0x04030201);
        assert_eq!(reader.budget(), 0);

        assert!(!reader.has_more_bytes());
        assert_eq!(
            reader.read_u8(),
            Err(DeserializationError::BudgetExhausted { requested: 1, remaining: 0 })
        );
        // the inner reader still holds the rest of the input
        assert_eq!(reader.into_inner().remaining_bytes(), 4);
    }

    #[test]
    fn budgeted_reader_peek_does_not_consume() {
        let data = [42u8];
        let mut reader = BudgetedReader::new(Deserializer::new(&data), 1);

        assert_eq!(reader.peek_u8().unwrap(), 42);
        assert_eq!(reader.peek_u8().unwrap(), 42);
        assert_eq!(reader.budget(), 1);
        assert_eq!(reader.read_u8().unwrap(), 42);
        assert_eq!(reader.budget(), 0);
    }

    #[test]
    fn budgeted_reader_max_alloc() {
        let data = [0u8; 100];
        let reader = BudgetedReader::new(Deserializer::new(&data), 64);

        assert_eq!(reader.max_alloc(8), 8);
        assert_eq!(reader.max_alloc(1), 64);
        assert_eq!(reader.max_alloc(16), 4);
        // zero-width elements are charged one byte each
        assert_eq!(reader.max_alloc(0), 64);
        assert_eq!(reader.remaining_bytes(), 64);
        assert!(reader.check_eor(65).is_err());

        let unbounded = Deserializer::new(&data);
        assert_eq!(unbounded.max_alloc(8), 12);
        assert_eq!(unbounded.max_alloc(0), 100);
    }

    #[test]
    fn budgeted_reader_rejects_fake_length_upfront() {
        // claims 1000 u64 values but only carries one
        let mut data = vec![0xe8, 0x07];
        data.extend_from_slice(&42u64.to_le_bytes());

        let mut reader = BudgetedReader::new(Deserializer::new(&data), data.len());
        let len = reader.read_len().unwrap();
        assert_eq!(len, 1000);
        assert_matches!(
            reader.read_many_iter::<u64>(len),
            Err(DeserializationError::MalformedEncoding(_))
        );

        // a plain slice reader bounds the length by the bytes it has left
        let mut reader = Deserializer::new(&data);
        let len = reader.read_len().unwrap();
        assert_matches!(
            reader.read_many_iter::<u64>(len),
            Err(DeserializationError::MalformedEncoding(_))
        );
    }

    #[test]
    fn zero_width_elements_are_bounded_by_input() {
        // 10_000_000 as ULEB128
        let data = [0x80, 0xad, 0xe2, 0x04];

        let mut reader = BudgetedReader::new(Deserializer::new(&data), data.len());
        let len = reader.read_len().unwrap();
        assert_eq!(len, 10_000_000);
        assert_matches!(
            reader.read_many_iter::<()>(len),
            Err(DeserializationError::MalformedEncoding(_))
        );

        let mut reader = Deserializer::new(&data);
        assert_matches!(
            reader.read_seq(|_| Ok(())),
            Err(DeserializationError::MalformedEncoding(_))
        );

        // short sequences of zero-width elements still decode
        let mut reader = Deserializer::new(&[0x02, 0xff, 0xff]);
        assert_eq!(reader.read_seq(|_| Ok(())).unwrap().len(), 2);
    }
}
