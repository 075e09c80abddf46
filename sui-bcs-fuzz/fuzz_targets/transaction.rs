#![no_main]

use libfuzzer_sys::fuzz_target;
use sui_bcs::{
    Deserializable, Serializable,
    sui::{Argument, CallArg, Command, ObjectArg, ProgrammableTransaction, TypeTag},
};

fuzz_target!(|data: &[u8]| {
    // arbitrary input must never panic, only fail with an error
    let _ = Argument::read_from_bytes(data);
    let _ = ObjectArg::read_from_bytes(data);
    let _ = CallArg::read_from_bytes(data);
    let _ = Vec::<Command>::read_from_bytes(data);

    if let Ok(tag) = TypeTag::read_from_bytes(data) {
        assert_eq!(tag.to_bytes().unwrap(), data);
        assert_eq!(tag.to_string().parse::<TypeTag>().unwrap(), tag);
    }

    if let Ok(transaction) = ProgrammableTransaction::read_from_bytes(data) {
        let bytes = transaction.to_bytes().unwrap();
        assert_eq!(bytes, data);
        assert_eq!(transaction.get_size_hint(), bytes.len());
    }
});
