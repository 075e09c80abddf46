#![no_main]

use libfuzzer_sys::fuzz_target;
use sui_bcs::{ByteReader, ByteWriter, Deserializer, Serializer, uleb128};

fuzz_target!(|data: &[u8]| {
    let mut deserializer = Deserializer::new(data);
    let Ok(value) = deserializer.read_uleb128_u64() else {
        return;
    };

    // only the shortest form is accepted, so re-encoding yields the consumed prefix
    let consumed = deserializer.position();
    assert_eq!(consumed, uleb128::encoded_len(value));

    let mut serializer = Serializer::new();
    serializer.write_uleb128(value);
    assert_eq!(serializer.as_slice(), &data[..consumed]);

    let mut buf = [0u8; uleb128::MAX_ENCODED_LEN];
    let len = uleb128::encode(value, &mut buf);
    assert_eq!(&buf[..len], &data[..consumed]);
});
