// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0
use super::*;

fn kvs(pairs: &[(&str, &str)]) -> Kvs {
    Kvs::from_hex_map(pairs.iter().copied()).unwrap()
}

#[test]
fn test_from_hex_map() {
    let kvs = kvs(&[("6161", "01"), ("62", "")]);
    assert_eq!(kvs.len(), 2);
    assert_eq!(kvs.get(b"aa"), Some(&[1u8][..]));
    assert_eq!(kvs.get(b"b"), Some(&[][..]));
    assert_eq!(kvs.get_present(b"b"), None);
    assert_eq!(kvs.get(b"c"), None);

    assert!(Kvs::from_hex_map([("zz", "00")]).is_err());
    assert!(Kvs::from_hex_map([("00", "0")]).is_err());
}

#[test]
fn test_non_empty() {
    let kvs = kvs(&[("01", "02"), ("03", ""), ("04", "05")]);
    assert_eq!(kvs.non_empty(), self::kvs(&[("01", "02"), ("04", "05")]));
    assert!(Kvs::new().non_empty().is_empty());
}

#[test]
fn test_merge_last_writer_wins() {
    let merged = Kvs::merge([
        kvs(&[("01", "0a"), ("02", "0b")]),
        kvs(&[("02", "0c"), ("03", "")]),
    ]);
    assert_eq!(
        merged.to_hex_map().into_iter().collect::<Vec<_>>(),
        vec![
            ("01".to_string(), "0a".to_string()),
            ("02".to_string(), "0c".to_string()),
            ("03".to_string(), String::new()),
        ]
    );
}

#[test]
fn test_iter_prefix() {
    let mut kvs = Kvs::new();
    kvs.insert(b"ab".to_vec(), vec![1]);
    kvs.insert(b"abc".to_vec(), vec![2]);
    kvs.insert(b"abd".to_vec(), vec![3]);
    kvs.insert(b"ac".to_vec(), vec![4]);
    kvs.insert(b"a".to_vec(), vec![5]);

    let found: Vec<(&[u8], &[u8])> = kvs.iter_prefix(b"ab").collect();
    assert_eq!(
        found,
        vec![
            (&b""[..], &[1u8][..]),
            (&b"c"[..], &[2u8][..]),
            (&b"d"[..], &[3u8][..]),
        ]
    );
    assert_eq!(kvs.iter_prefix(b"b").count(), 0);
    assert_eq!(kvs.iter_prefix(b"").count(), 5);
}

#[test]
fn test_diff_has() {
    let actual = kvs(&[("01", "0a"), ("02", "0b"), ("03", "0c")]);

    // Extra actual keys are fine, and an empty expected value matches an absent key.
    assert!(actual.diff_has(&kvs(&[("01", "0a"), ("09", "")])).is_empty());

    let mismatches = actual.diff_has(&kvs(&[("02", "0f"), ("04", "0d")]));
    assert_eq!(
        mismatches,
        vec![
            KvMismatch {
                key: "02".to_string(),
                expected: "0f".to_string(),
                actual: "0b".to_string(),
            },
            KvMismatch {
                key: "04".to_string(),
                expected: "0d".to_string(),
                actual: String::new(),
            },
        ]
    );
    assert_eq!(
        mismatches[1].to_string(),
        r#"key 04: expected "0d", got """#
    );
}

#[test]
fn test_diff_all() {
    let actual = kvs(&[("01", "0a"), ("02", "0b"), ("03", "")]);
    assert!(actual.diff_all(&kvs(&[("01", "0a"), ("02", "0b")])).is_empty());

    let mismatches = actual.diff_all(&kvs(&[("01", "0a")]));
    assert_eq!(
        mismatches,
        vec![KvMismatch {
            key: "02".to_string(),
            expected: String::new(),
            actual: "0b".to_string(),
        }]
    );
}

#[test]
fn test_serde_hex_map() {
    let kvs = kvs(&[("6b6579", "76616c7565"), ("00", "")]);
    let json = serde_json::to_string(&kvs).unwrap();
    assert_eq!(json, r#"{"00":"","6b6579":"76616c7565"}"#);
    assert_eq!(serde_json::from_str::<Kvs>(&json).unwrap(), kvs);
    assert!(serde_json::from_str::<Kvs>(r#"{"0x":"00"}"#).is_err());
}
