#![no_main]

use std::collections::{BTreeMap, BTreeSet};

use libfuzzer_sys::fuzz_target;
use sui_bcs::{Deserializable, Serializable, U256};

/// Decodes `data` as `T` and, on success, checks that re-encoding reproduces the consumed bytes.
fn check_canonical<T: Deserializable + Serializable>(data: &[u8]) {
    if let Ok(value) = T::read_from_bytes(data) {
        let bytes = value.to_bytes().expect("decoded values re-encode");
        assert_eq!(bytes, data, "decoding accepted a non-canonical encoding");
    }
}

fuzz_target!(|data: &[u8]| {
    check_canonical::<bool>(data);
    check_canonical::<u16>(data);
    check_canonical::<u64>(data);
    check_canonical::<U256>(data);
    check_canonical::<String>(data);
    check_canonical::<Vec<u8>>(data);
    check_canonical::<Vec<Option<u32>>>(data);
    check_canonical::<(bool, u8, Vec<u16>)>(data);
    check_canonical::<BTreeMap<String, u8>>(data);
    check_canonical::<BTreeSet<Vec<u8>>>(data);
});
