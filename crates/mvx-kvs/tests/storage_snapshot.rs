// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use mvx_codec::{Address, Decoder, Encodable};
use mvx_kvs::{decode_esdts, Esdt, EsdtRole, Kvs, KvsBuilder, Mapper};
use proptest::collection;
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn contract_storage() -> Kvs {
    let mut builder = KvsBuilder::new();
    builder
        .value(&Mapper::new("fee", []), Some(&Encodable::big_uint(1_000u32)))
        .unwrap()
        .vec(
            &Mapper::new("history", [Encodable::address(Address::ZERO)]),
            &[Encodable::u64(5), Encodable::u64(0), Encodable::u64(7)],
        )
        .unwrap()
        .set(
            &Mapper::new("tokens", []),
            &[
                (1, Encodable::str("WEGLD-abcdef")),
                (2, Encodable::str("USDC-abcdef")),
            ],
        )
        .unwrap()
        .map(
            &Mapper::new("balances", []),
            &[
                (1, Encodable::address(Address::ZERO), Encodable::big_uint(3u32)),
                (2, Encodable::address(Address::new([2; 32])), Encodable::big_uint(4u32)),
            ],
        )
        .unwrap();
    builder.esdts(&[
        Esdt {
            roles: Some(vec![EsdtRole::LocalMint, EsdtRole::LocalBurn]),
            ..Esdt::fungible("WEGLD-abcdef", 10u32.pow(9))
        },
        Esdt::instance("LP-abcdef", 3, 1u32),
    ]);
    builder.build()
}

#[test]
fn snapshot_matches_ledger_dump() {
    init_tracing();
    let kvs = contract_storage();

    // A ledger dump omits empty values, like the zero item of the vec.
    let dump: BTreeMap<String, String> = kvs.non_empty().to_hex_map();
    let json = serde_json::to_string(&dump).unwrap();
    let loaded: Kvs = serde_json::from_str(&json).unwrap();

    assert!(loaded.diff_has(&kvs).is_empty());
    assert!(loaded.diff_all(&kvs).is_empty());

    let mut changed = loaded.clone();
    changed.insert(b"fee".to_vec(), vec![0x01]);
    let mismatches = changed.diff_has(&kvs);
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].key, hex::encode("fee"));
    assert_eq!(mismatches[0].expected, "03e8");
}

#[test]
fn snapshot_decodes_back() {
    init_tracing();
    let kvs = contract_storage().non_empty();

    let fee = Mapper::new("fee", [])
        .decode_value_as(&kvs, &Decoder::big_uint())
        .unwrap()
        .unwrap();
    assert_eq!(fee.as_u64().unwrap(), 1_000);

    let history = Mapper::new("history", [Encodable::address(Address::ZERO)])
        .decode_vec_as(&kvs, &Decoder::u64())
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(history, vec![5, 0, 7]);

    let tokens = Mapper::new("tokens", [])
        .decode_set_as(&kvs, &Decoder::Str)
        .unwrap()
        .into_iter()
        .map(|(id, v)| (id, v.into_string().unwrap()))
        .collect::<Vec<_>>();
    assert_eq!(
        tokens,
        vec![(1, "WEGLD-abcdef".to_string()), (2, "USDC-abcdef".to_string())]
    );

    let balances = Mapper::new("balances", [])
        .decode_map_as(&kvs, &Decoder::Address, &Decoder::big_uint())
        .unwrap();
    assert_eq!(balances.len(), 2);
    assert_eq!(*balances[1].0.as_address().unwrap(), Address::new([2; 32]));
    assert_eq!(balances[1].1.as_u64().unwrap(), 4);

    let esdts = decode_esdts(&kvs).unwrap();
    assert_eq!(esdts.len(), 2);
    assert_eq!(esdts[0], Esdt::instance("LP-abcdef", 3, 1u32));
    assert_eq!(
        esdts[1].roles,
        Some(vec![EsdtRole::LocalMint, EsdtRole::LocalBurn])
    );
}

#[test]
fn cleared_mappers_match_missing_keys() {
    let mut builder = KvsBuilder::new();
    builder
        .vec(&Mapper::new("history", []), &[])
        .unwrap()
        .set(&Mapper::new("tokens", []), &[])
        .unwrap()
        .value(&Mapper::new("fee", []), None)
        .unwrap();
    let expected = builder.build();
    assert!(expected.iter().all(|(_, v)| v.is_empty()));

    let unrelated = Kvs::from_pairs([(b"other".to_vec(), vec![1])]);
    assert!(unrelated.diff_has(&expected).is_empty());
    assert_eq!(unrelated.diff_all(&expected).len(), 1);
}

proptest! {
    #[test]
    fn vec_mapper_round_trip(items in collection::vec(any::<u64>(), 0..20)) {
        let mapper = Mapper::new("items", [Encodable::u8(1)]);
        let kvs = Kvs::from_pairs(mapper.vec(
            &items.iter().map(|i| Encodable::u64(*i)).collect::<Vec<_>>(),
        ))
        .non_empty();
        let decoded = mapper
            .decode_vec_as(&kvs, &Decoder::u64())
            .unwrap()
            .iter()
            .map(|v| v.as_u64().unwrap())
            .collect::<Vec<_>>();
        prop_assert_eq!(decoded, items);
    }

    #[test]
    fn set_mapper_round_trip(ids in collection::btree_set(1i64..1000, 0..20)) {
        let mapper = Mapper::new("ids", []);
        let entries: Vec<(i64, Encodable)> = ids
            .iter()
            .map(|id| (*id, Encodable::big_uint(*id as u64 * 3)))
            .collect();
        let kvs = Kvs::from_pairs(mapper.set(&entries).unwrap()).non_empty();
        let decoded = mapper.decode_set_as(&kvs, &Decoder::big_uint()).unwrap();
        prop_assert_eq!(decoded.len(), ids.len());
        for ((id, value), expected) in decoded.iter().zip(&ids) {
            prop_assert_eq!(i64::from(*id), *expected);
            prop_assert_eq!(value.as_u64().unwrap(), *expected as u64 * 3);
        }
    }

    #[test]
    fn unordered_set_round_trip(items in collection::btree_set(any::<u32>(), 0..20)) {
        let mapper = Mapper::new("members", []);
        let items: Vec<Encodable> = items.into_iter().map(Encodable::u32).collect();
        let kvs = Kvs::from_pairs(mapper.unordered_set(&items)).non_empty();
        let decoded = mapper.decode_unordered_set(&kvs).unwrap();
        prop_assert_eq!(
            decoded,
            items.iter().map(Encodable::to_top_bytes).collect::<Vec<_>>()
        );
    }
}
