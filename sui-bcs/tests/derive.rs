#![cfg(feature = "derive")]

use sui_bcs::{
    Deserializable, DeserializationError, Serializable, from_bytes,
    sui::{Argument, SuiAddress},
    to_bytes,
};

#[derive(Debug, PartialEq, Serializable, Deserializable)]
struct Transfer {
    amount: u64,
    recipient: SuiAddress,
    memo: Option<String>,
}

#[derive(Debug, PartialEq, Serializable, Deserializable)]
struct Pair(u8, u16);

#[derive(Debug, PartialEq, Serializable, Deserializable)]
struct Marker;

#[derive(Debug, PartialEq, Serializable, Deserializable)]
enum Action {
    Noop,
    Pay(Transfer),
    Split { coin: Argument, amounts: Vec<u64> },
    Tuple(Pair, bool),
}

#[derive(Debug, PartialEq, Serializable, Deserializable)]
struct Wrapper<T> {
    head: T,
    tail: Vec<T>,
}

#[derive(Debug, PartialEq, Serializable, Deserializable)]
enum Numbered {
    First = 10,
    Second = 20,
}

#[test]
fn named_struct_fields_in_order() {
    let transfer = Transfer {
        amount: 5,
        recipient: SuiAddress::from_u8(0x2),
        memo: Some("hi".into()),
    };
    let bytes = to_bytes(&transfer).unwrap();

    let mut expected = 5u64.to_le_bytes().to_vec();
    expected.extend_from_slice(SuiAddress::from_u8(0x2).as_bytes());
    expected.extend_from_slice(&[0x01, 0x02, b'h', b'i']);
    assert_eq!(bytes, expected);
    assert_eq!(from_bytes::<Transfer>(&bytes).unwrap(), transfer);
}

#[test]
fn tuple_and_unit_structs() {
    assert_eq!(to_bytes(&Pair(1, 0x0302)).unwrap(), [0x01, 0x02, 0x03]);
    assert_eq!(from_bytes::<Pair>(&[0x01, 0x02, 0x03]).unwrap(), Pair(1, 0x0302));

    assert!(to_bytes(&Marker).unwrap().is_empty());
    assert_eq!(from_bytes::<Marker>(&[]).unwrap(), Marker);
}

#[test]
fn enum_variants_use_declaration_index() {
    assert_eq!(to_bytes(&Action::Noop).unwrap(), [0x00]);

    let split = Action::Split { coin: Argument::GasCoin, amounts: vec![7] };
    let bytes = to_bytes(&split).unwrap();
    assert_eq!(bytes, [0x02, 0x00, 0x01, 0x07, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(from_bytes::<Action>(&bytes).unwrap(), split);

    let tuple = Action::Tuple(Pair(9, 1), true);
    let bytes = to_bytes(&tuple).unwrap();
    assert_eq!(bytes, [0x03, 0x09, 0x01, 0x00, 0x01]);
    assert_eq!(from_bytes::<Action>(&bytes).unwrap(), tuple);
}

#[test]
fn explicit_discriminants_are_ignored() {
    assert_eq!(to_bytes(&Numbered::First).unwrap(), [0x00]);
    assert_eq!(to_bytes(&Numbered::Second).unwrap(), [0x01]);
    assert_eq!(from_bytes::<Numbered>(&[0x01]).unwrap(), Numbered::Second);
}

#[test]
fn unknown_variant_names_the_enum() {
    assert_eq!(
        from_bytes::<Action>(&[0x04]),
        Err(DeserializationError::UnknownVariant { type_name: "Action", tag: 4 })
    );
}

#[test]
fn variant_index_must_fit_in_u32() {
    // 2^32 as canonical ULEB128
    let tag = [0x80, 0x80, 0x80, 0x80, 0x10];
    assert!(matches!(from_bytes::<Action>(&tag), Err(DeserializationError::MalformedEncoding(_))));
    assert!(matches!(
        from_bytes::<Numbered>(&[0xff, 0xff, 0xff, 0xff, 0x0f]),
        Err(DeserializationError::UnknownVariant { type_name: "Numbered", tag: 0xffff_ffff })
    ));
}

#[test]
fn generic_struct() {
    let wrapper = Wrapper { head: 1u16, tail: vec![2, 3] };
    let bytes = wrapper.to_bytes().unwrap();
    assert_eq!(bytes, [0x01, 0x00, 0x02, 0x02, 0x00, 0x03, 0x00]);
    assert_eq!(Wrapper::<u16>::read_from_bytes(&bytes).unwrap(), wrapper);
}

#[test]
fn struct_minimum_size_sums_fields() {
    assert_eq!(Transfer::min_serialized_size(), 8 + 32 + 1);
    assert_eq!(Pair::min_serialized_size(), 3);
    assert_eq!(Marker::min_serialized_size(), 0);

    // zero-sized elements still count one byte each against the input
    assert!(matches!(
        Vec::<Marker>::read_from_bytes_with_budget(&[0x03], 1),
        Err(DeserializationError::MalformedEncoding(_))
    ));
    assert!(matches!(
        Vec::<Marker>::read_from_bytes(&[0x80, 0xad, 0xe2, 0x04]),
        Err(DeserializationError::MalformedEncoding(_))
    ));
    assert!(from_bytes::<Vec<Marker>>(&[0x00]).unwrap().is_empty());
}
