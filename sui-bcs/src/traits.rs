//! Core serialization traits and their implementations for standard types.

use alloc::{
    boxed::Box,
    collections::{BTreeMap, BTreeSet},
    string::String,
    vec::Vec,
};

use crate::{
    BudgetedReader, ByteReader, ByteWriter, DecoderConfig, DeserializationError, Deserializer,
    SerializationError, Serializer, uleb128,
};

// SERIALIZABLE
// ================================================================================================

/// Defines how to serialize `Self` into BCS bytes.
pub trait Serializable {
    /// Serializes `self` into bytes and writes these bytes into the `target`.
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError>;

    /// Serializes `self` into a freshly allocated vector of bytes.
    ///
    /// If serialization fails no bytes are returned.
    fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        let mut serializer = Serializer::with_capacity(self.get_size_hint());
        self.write_into(&mut serializer)?;
        Ok(serializer.into_bytes())
    }

    /// Returns an estimate of how many bytes are needed to represent self.
    ///
    /// The default implementation returns zero.
    fn get_size_hint(&self) -> usize {
        0
    }
}

impl<T: Serializable + ?Sized> Serializable for &T {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        (*self).write_into(target)
    }

    fn get_size_hint(&self) -> usize {
        (*self).get_size_hint()
    }
}

// DESERIALIZABLE
// ================================================================================================

/// Defines how to deserialize `Self` from BCS bytes.
///
/// The byte stream carries no schema: the caller picks the type to decode.
pub trait Deserializable: Sized {
    /// Reads a sequence of bytes from the provided `source`, attempts to deserialize these bytes
    /// into `Self`, and returns the result.
    ///
    /// # Errors
    /// Returns a [DeserializationError] if the bytes do not form a valid encoding of `Self`.
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError>;

    /// Returns the minimum number of bytes an encoding of `Self` occupies.
    ///
    /// Used together with [ByteReader::max_alloc] to reject implausible sequence lengths early.
    fn min_serialized_size() -> usize {
        1
    }

    /// Attempts to deserialize the provided `bytes` into `Self`.
    ///
    /// All of `bytes` must be consumed: leftover input fails with
    /// [DeserializationError::TrailingBytes].
    fn read_from_bytes(bytes: &[u8]) -> Result<Self, DeserializationError> {
        Self::read_from_bytes_with_config(bytes, &DecoderConfig::default())
    }

    /// Attempts to deserialize the provided `bytes` into `Self` under the given `config`.
    fn read_from_bytes_with_config(
        bytes: &[u8],
        config: &DecoderConfig,
    ) -> Result<Self, DeserializationError> {
        let (value, remaining) = match config.budget {
            Some(budget) => {
                let mut reader = BudgetedReader::new(Deserializer::new(bytes), budget);
                let value = Self::read_from(&mut reader)?;
                (value, reader.into_inner().remaining_bytes())
            },
            None => {
                let mut reader = Deserializer::new(bytes);
                let value = Self::read_from(&mut reader)?;
                (value, reader.remaining_bytes())
            },
        };
        config.trailing_bytes.check(remaining)?;
        Ok(value)
    }

    /// Attempts to deserialize the provided `bytes` into `Self`, consuming at most `budget`
    /// bytes.
    fn read_from_bytes_with_budget(
        bytes: &[u8],
        budget: usize,
    ) -> Result<Self, DeserializationError> {
        Self::read_from_bytes_with_config(bytes, &DecoderConfig::default().with_budget(budget))
    }
}

impl<T: Deserializable> Deserializable for Box<T> {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        T::read_from(source).map(Box::new)
    }

    fn min_serialized_size() -> usize {
        T::min_serialized_size()
    }
}

impl<T: Serializable + ?Sized> Serializable for Box<T> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        self.as_ref().write_into(target)
    }

    fn get_size_hint(&self) -> usize {
        self.as_ref().get_size_hint()
    }
}

// UNIT AND BOOLEAN
// ================================================================================================

impl Serializable for () {
    fn write_into<W: ByteWriter>(&self, _target: &mut W) -> Result<(), SerializationError> {
        Ok(())
    }
}

impl Deserializable for () {
    fn read_from<R: ByteReader>(_source: &mut R) -> Result<Self, DeserializationError> {
        Ok(())
    }

    fn min_serialized_size() -> usize {
        0
    }
}

impl Serializable for bool {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_bool(*self);
        Ok(())
    }

    fn get_size_hint(&self) -> usize {
        1
    }
}

impl Deserializable for bool {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_bool()
    }
}

// INTEGERS
// ================================================================================================

macro_rules! impl_unsigned {
    ($($ty:ty => $write:ident, $read:ident;)*) => {$(
        impl Serializable for $ty {
            fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
                target.$write(*self);
                Ok(())
            }

            fn get_size_hint(&self) -> usize {
                core::mem::size_of::<$ty>()
            }
        }

        impl Deserializable for $ty {
            fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
                source.$read()
            }

            fn min_serialized_size() -> usize {
                core::mem::size_of::<$ty>()
            }
        }
    )*};
}

impl_unsigned! {
    u8 => write_u8, read_u8;
    u16 => write_u16, read_u16;
    u32 => write_u32, read_u32;
    u64 => write_u64, read_u64;
    u128 => write_u128, read_u128;
}

// signed integers are two's complement, little-endian
macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl Serializable for $ty {
            fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
                target.write_bytes(&self.to_le_bytes());
                Ok(())
            }

            fn get_size_hint(&self) -> usize {
                core::mem::size_of::<$ty>()
            }
        }

        impl Deserializable for $ty {
            fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
                source.read_array().map(<$ty>::from_le_bytes)
            }

            fn min_serialized_size() -> usize {
                core::mem::size_of::<$ty>()
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, i128);

// OPTION
// ================================================================================================

impl<T: Serializable> Serializable for Option<T> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        match self {
            Some(value) => {
                target.write_u8(1);
                value.write_into(target)
            },
            None => {
                target.write_u8(0);
                Ok(())
            },
        }
    }

    fn get_size_hint(&self) -> usize {
        1 + self.as_ref().map(Serializable::get_size_hint).unwrap_or(0)
    }
}

impl<T: Deserializable> Deserializable for Option<T> {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        match source.read_u8()? {
            0 => Ok(None),
            1 => T::read_from(source).map(Some),
            tag => Err(DeserializationError::malformed(format!("invalid option tag {tag:#04x}"))),
        }
    }
}

// STRINGS
// ================================================================================================

impl Serializable for str {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_byte_seq(self.as_bytes())
    }

    fn get_size_hint(&self) -> usize {
        uleb128::encoded_len(self.len() as u64) + self.len()
    }
}

impl Serializable for String {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        self.as_str().write_into(target)
    }

    fn get_size_hint(&self) -> usize {
        self.as_str().get_size_hint()
    }
}

impl Deserializable for String {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_string()
    }
}

// SEQUENCES
// ================================================================================================

impl<T: Serializable> Serializable for [T] {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_seq(self, |w, item| item.write_into(w))
    }

    fn get_size_hint(&self) -> usize {
        uleb128::encoded_len(self.len() as u64)
            + self.iter().map(Serializable::get_size_hint).sum::<usize>()
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        self.as_slice().write_into(target)
    }

    fn get_size_hint(&self) -> usize {
        self.as_slice().get_size_hint()
    }
}

impl<T: Deserializable> Deserializable for Vec<T> {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let len = source.read_len()?;
        source.read_many_iter::<T>(len)?.collect()
    }
}

// fixed-size arrays carry no length prefix
impl<T: Serializable, const N: usize> Serializable for [T; N] {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_many(self)
    }

    fn get_size_hint(&self) -> usize {
        self.iter().map(Serializable::get_size_hint).sum()
    }
}

impl<T: Deserializable, const N: usize> Deserializable for [T; N] {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let items = source.read_many_iter::<T>(N)?.collect::<Result<Vec<_>, _>>()?;
        items.try_into().map_err(|items: Vec<T>| {
            DeserializationError::malformed(format!("expected {N} elements, found {}", items.len()))
        })
    }

    fn min_serialized_size() -> usize {
        N * T::min_serialized_size()
    }
}

// TUPLES
// ================================================================================================

macro_rules! impl_tuple {
    ($($name:ident),+) => {
        impl<$($name: Serializable),+> Serializable for ($($name,)+) {
            #[allow(non_snake_case)]
            fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
                let ($($name,)+) = self;
                $($name.write_into(target)?;)+
                Ok(())
            }

            #[allow(non_snake_case)]
            fn get_size_hint(&self) -> usize {
                let ($($name,)+) = self;
                0 $(+ $name.get_size_hint())+
            }
        }

        impl<$($name: Deserializable),+> Deserializable for ($($name,)+) {
            fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
                Ok(($($name::read_from(source)?,)+))
            }

            fn min_serialized_size() -> usize {
                0 $(+ $name::min_serialized_size())+
            }
        }
    };
}

impl_tuple!(T1);
impl_tuple!(T1, T2);
impl_tuple!(T1, T2, T3);
impl_tuple!(T1, T2, T3, T4);
impl_tuple!(T1, T2, T3, T4, T5);
impl_tuple!(T1, T2, T3, T4, T5, T6);

// MAPS AND SETS
// ================================================================================================

// Entries are written in the lexicographic order of the serialized keys, which is not always the
// `Ord` order of the keys themselves.
fn sorted_key_bytes<'a, K, V, I>(entries: I) -> Result<Vec<(Vec<u8>, V)>, SerializationError>
where
    K: Serializable + 'a,
    I: Iterator<Item = (&'a K, V)>,
{
    let mut encoded = entries
        .map(|(key, value)| Ok((key.to_bytes()?, value)))
        .collect::<Result<Vec<_>, SerializationError>>()?;
    encoded.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(encoded)
}

/// Reads a key and checks that its encoding sorts strictly after `previous`.
fn read_ordered_key<K, R>(
    source: &mut R,
    previous: &mut Option<Vec<u8>>,
) -> Result<K, DeserializationError>
where
    K: Serializable + Deserializable,
    R: ByteReader,
{
    let key = K::read_from(source)?;
    let key_bytes =
        key.to_bytes().map_err(|err| DeserializationError::malformed(format!("{err}")))?;
    if previous.as_ref().is_some_and(|prev| key_bytes <= *prev) {
        return Err(DeserializationError::malformed("keys are not in canonical order or repeat"));
    }
    *previous = Some(key_bytes);
    Ok(key)
}

impl<K: Serializable, V: Serializable> Serializable for BTreeMap<K, V> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        let entries = sorted_key_bytes(self.iter())?;
        target.write_seq(entries, |w, (key, value)| {
            w.write_bytes(&key);
            value.write_into(w)
        })
    }

    fn get_size_hint(&self) -> usize {
        uleb128::encoded_len(self.len() as u64)
            + self.iter().map(|(k, v)| k.get_size_hint() + v.get_size_hint()).sum::<usize>()
    }
}

impl<K, V> Deserializable for BTreeMap<K, V>
where
    K: Serializable + Deserializable + Ord,
    V: Deserializable,
{
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let len = source.read_len()?;
        let max_entries = source.max_alloc(K::min_serialized_size() + V::min_serialized_size());
        if len > max_entries {
            return Err(DeserializationError::malformed(format!(
                "requested {len} entries but reader can provide at most {max_entries}"
            )));
        }

        let mut map = BTreeMap::new();
        let mut previous = None;
        for _ in 0..len {
            let key = read_ordered_key(source, &mut previous)?;
            let value = V::read_from(source)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<T: Serializable> Serializable for BTreeSet<T> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        let entries = sorted_key_bytes(self.iter().map(|item| (item, ())))?;
        target.write_seq(entries, |w, (key, ())| {
            w.write_bytes(&key);
            Ok(())
        })
    }

    fn get_size_hint(&self) -> usize {
        uleb128::encoded_len(self.len() as u64)
            + self.iter().map(Serializable::get_size_hint).sum::<usize>()
    }
}

impl<T> Deserializable for BTreeSet<T>
where
    T: Serializable + Deserializable + Ord,
{
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let len = source.read_len()?;
        let max_entries = source.max_alloc(T::min_serialized_size());
        if len > max_entries {
            return Err(DeserializationError::malformed(format!(
                "requested {len} entries but reader can provide at most {max_entries}"
            )));
        }

        let mut set = BTreeSet::new();
        let mut previous = None;
        for _ in 0..len {
            set.insert(read_ordered_key(source, &mut previous)?);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_bool_boundaries() {
        assert_eq!(false.to_bytes().unwrap(), [0x00]);
        assert_eq!(true.to_bytes().unwrap(), [0x01]);
        assert_matches!(
            bool::read_from_bytes(&[0x02]),
            Err(DeserializationError::MalformedEncoding(_))
        );
        assert_eq!(bool::read_from_bytes(&[]), Err(DeserializationError::UnexpectedEof));
    }

    #[test]
    fn test_bool_sequence() {
        let values = vec![true, false, true];
        let bytes = values.to_bytes().unwrap();
        assert_eq!(bytes, [0x03, 0x01, 0x00, 0x01]);
        assert_eq!(Vec::<bool>::read_from_bytes(&bytes).unwrap(), values);
    }

    #[test]
    fn test_integers_little_endian() {
        assert_eq!(0x0102_u16.to_bytes().unwrap(), [0x02, 0x01]);
        assert_eq!(1_u64.to_bytes().unwrap(), [1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!((-1_i32).to_bytes().unwrap(), [0xff; 4]);
        assert_eq!(i16::read_from_bytes(&[0xfe, 0xff]).unwrap(), -2);
        assert_eq!(u128::read_from_bytes(&[0u8; 15]), Err(DeserializationError::UnexpectedEof));
    }

    #[test]
    fn test_trailing_bytes_rejected_by_default() {
        assert_eq!(
            u8::read_from_bytes(&[1, 2]),
            Err(DeserializationError::TrailingBytes { remaining: 1 })
        );
        let config = DecoderConfig::default().with_trailing_bytes(crate::TrailingBytes::Allow);
        assert_eq!(u8::read_from_bytes_with_config(&[1, 2], &config), Ok(1));
    }

    #[test]
    fn test_option() {
        assert_eq!(None::<u8>.to_bytes().unwrap(), [0x00]);
        assert_eq!(Some(7u8).to_bytes().unwrap(), [0x01, 0x07]);
        assert_eq!(Option::<u8>::read_from_bytes(&[0x01, 0x07]).unwrap(), Some(7));
        assert_matches!(
            Option::<u8>::read_from_bytes(&[0x02, 0x07]),
            Err(DeserializationError::MalformedEncoding(_))
        );
        assert_eq!(Some(7u32).get_size_hint(), 5);
    }

    #[test]
    fn test_string() {
        let bytes = "çå∞≠¢õß∂ƒ∫".to_bytes().unwrap();
        assert_eq!(bytes[0] as usize, bytes.len() - 1);
        assert_eq!(String::read_from_bytes(&bytes).unwrap(), "çå∞≠¢õß∂ƒ∫");
        assert_eq!(String::from("sui").get_size_hint(), 4);
    }

    #[test]
    fn test_arrays_and_tuples() {
        let array = [1u16, 2, 3];
        let bytes = array.to_bytes().unwrap();
        assert_eq!(bytes, [1, 0, 2, 0, 3, 0]);
        assert_eq!(<[u16; 3]>::read_from_bytes(&bytes).unwrap(), array);
        assert_eq!(<[u16; 3]>::min_serialized_size(), 6);

        let tuple = (true, 7u8, String::from("a"));
        let bytes = tuple.to_bytes().unwrap();
        assert_eq!(bytes, [0x01, 0x07, 0x01, b'a']);
        assert_eq!(<(bool, u8, String)>::read_from_bytes(&bytes).unwrap(), tuple);
        assert_eq!(().to_bytes().unwrap(), [] as [u8; 0]);
    }

    #[test]
    fn test_nested_vectors() {
        let value = vec![vec![1u8, 2], vec![], vec![3]];
        let bytes = value.to_bytes().unwrap();
        assert_eq!(bytes, [0x03, 0x02, 1, 2, 0x00, 0x01, 3]);
        assert_eq!(Vec::<Vec<u8>>::read_from_bytes(&bytes).unwrap(), value);
    }

    #[test]
    fn test_map_sorted_by_encoded_key() {
        // 256 encodes as [0x00, 0x01] and sorts before 1 = [0x01, 0x00]
        let mut map = BTreeMap::new();
        map.insert(1u16, true);
        map.insert(256u16, false);

        let bytes = map.to_bytes().unwrap();
        assert_eq!(bytes, [0x02, 0x00, 0x01, 0x00, 0x01, 0x00, 0x01]);
        assert_eq!(BTreeMap::<u16, bool>::read_from_bytes(&bytes).unwrap(), map);
    }

    #[test]
    fn test_map_rejects_non_canonical_order() {
        let unsorted = [0x02, 0x01, 0x00, 0x01, 0x00, 0x01, 0x00];
        assert_matches!(
            BTreeMap::<u16, bool>::read_from_bytes(&unsorted),
            Err(DeserializationError::MalformedEncoding(_))
        );

        let duplicate = [0x02, 0x05, 0x05];
        assert_matches!(
            BTreeSet::<u8>::read_from_bytes(&duplicate),
            Err(DeserializationError::MalformedEncoding(_))
        );
    }

    #[test]
    fn test_set_roundtrip() {
        let set: BTreeSet<String> = ["b", "a", "ab"].into_iter().map(String::from).collect();
        let bytes = set.to_bytes().unwrap();
        assert_eq!(BTreeSet::<String>::read_from_bytes(&bytes).unwrap(), set);
    }

    #[test]
    fn test_budget_limits_collections() {
        let bytes = vec![1u64, 2, 3].to_bytes().unwrap();
        let decoded = Vec::<u64>::read_from_bytes_with_budget(&bytes, bytes.len()).unwrap();
        assert_eq!(decoded, [1, 2, 3]);
        assert!(Vec::<u64>::read_from_bytes_with_budget(&bytes, bytes.len() - 1).is_err());
    }

    #[test]
    fn test_unit_vectors_charge_one_byte_per_element() {
        // length prefix of ten million and nothing after it
        let bytes = [0x80, 0xad, 0xe2, 0x04];
        assert_matches!(
            Vec::<()>::read_from_bytes_with_budget(&bytes, 4),
            Err(DeserializationError::MalformedEncoding(_))
        );
        assert_matches!(
            Vec::<()>::read_from_bytes(&bytes),
            Err(DeserializationError::MalformedEncoding(_))
        );
        assert!(Vec::<()>::read_from_bytes(&[0x00]).unwrap().is_empty());
    }
}
