// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0
use super::*;
use crate::error::CodecError;
use rstest::rstest;

#[rstest]
#[case(Encodable::u8(128), "80", "80")]
#[case(Encodable::u16(256), "0100", "0100")]
#[case(Encodable::u64(1234), "04d2", "00000000000004d2")]
#[case(Encodable::big_uint(1u8), "01", "0000000101")]
#[case(Encodable::i8(-128), "80", "80")]
#[case(Encodable::i16(128), "0080", "0080")]
#[case(Encodable::i16(-129), "ff7f", "ff7f")]
#[case(Encodable::i32(-2), "fe", "fffffffe")]
#[case(Encodable::big_int(-257), "feff", "00000002feff")]
#[case(Encodable::bool(true), "01", "01")]
#[case(Encodable::bool(false), "", "00")]
#[case(Encodable::str("ab"), "6162", "000000026162")]
#[case(Encodable::bytes(vec![1, 2]), "0102", "0102")]
fn test_scalar_forms(#[case] value: Encodable, #[case] top: &str, #[case] nest: &str) {
    assert_eq!(value.to_top_hex(), top);
    assert_eq!(value.to_nest_hex(), nest);
}

#[test]
fn test_tuple_uses_nested_items() {
    let tuple = Encodable::tuple([Encodable::u8(1), Encodable::u16(2)]);
    assert_eq!(tuple.to_top_hex(), "010002");
    assert_eq!(tuple.to_nest_hex(), "010002");

    let tuple = Encodable::tuple([Encodable::u32(1234), Encodable::i32(-2)]);
    assert_eq!(tuple.to_top_hex(), "000004d2fffffffe");

    let tuple = Encodable::tuple([Encodable::str("a"), Encodable::big_uint(0u8)]);
    assert_eq!(tuple.to_top_hex(), "000000016100000000");
}

#[test]
fn test_list_nest_adds_count() {
    let list = Encodable::list([Encodable::u8(1), Encodable::u8(2)]);
    assert_eq!(list.to_top_hex(), "0102");
    assert_eq!(list.to_nest_hex(), "000000020102");

    let list = Encodable::list([Encodable::u32(1234), Encodable::u32(4321)]);
    assert_eq!(list.to_top_hex(), "000004d2000010e1");

    let empty = Encodable::list([]);
    assert_eq!(empty.to_top_hex(), "");
    assert_eq!(empty.to_nest_hex(), "00000000");
}

#[test]
fn test_option_absence_is_asymmetric() {
    assert_eq!(Encodable::none().to_top_bytes(), Vec::<u8>::new());
    assert_eq!(Encodable::none().to_nest_bytes(), vec![0]);

    let some = Encodable::some(Encodable::u16(0));
    assert_eq!(some.to_top_bytes(), vec![1, 0, 0]);
    assert_eq!(some.to_nest_bytes(), vec![1, 0, 0]);

    assert_eq!(
        Encodable::some(Encodable::u32(1234)).to_top_hex(),
        "01000004d2"
    );
    assert_eq!(Encodable::from(Some(7u8)).to_top_hex(), "0107");
    assert_eq!(Encodable::from(None::<u8>).to_nest_hex(), "00");
}

#[test]
fn test_address_is_raw_in_both_forms() {
    let address = Encodable::address(Address::new([0xff; 32]));
    assert_eq!(address.to_top_bytes(), vec![0xff; 32]);
    assert_eq!(address.to_nest_bytes(), vec![0xff; 32]);

    let parsed = Encodable::address_str(
        "erd1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq6gq4hu",
    )
    .unwrap();
    assert_eq!(parsed.to_top_bytes(), vec![0; 32]);
}

#[test]
fn test_checked_constructors() {
    assert_eq!(Encodable::uint(255, Some(1)).unwrap().to_top_hex(), "ff");
    assert!(matches!(
        Encodable::uint(256, Some(1)),
        Err(CodecError::Overflow { .. })
    ));
    assert!(matches!(
        Encodable::uint(-1, None),
        Err(CodecError::NegativeValue(_))
    ));
    assert!(matches!(
        Encodable::int(-129, Some(1)),
        Err(CodecError::Underflow { .. })
    ));
    assert_eq!(Encodable::int(-1, None).unwrap().to_nest_hex(), "00000001ff");
}

#[test]
fn test_hex_and_base64() {
    let buffer = Encodable::buffer_hex("0a0b").unwrap();
    assert_eq!(buffer.to_top_bytes(), vec![0x0a, 0x0b]);
    assert_eq!(buffer.to_top_b64(), "Cgs=");
    assert_eq!(buffer.to_nest_b64(), "AAAAAgoL");
    assert!(matches!(
        Encodable::buffer_hex("zz"),
        Err(CodecError::InvalidHex(_))
    ));
}
