// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Flat key/value storage snapshots.

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Bound;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::KvsResult;

/// A raw storage pair. An empty value stands for an absent key.
pub type Kv = (Vec<u8>, Vec<u8>);

/// An ordered snapshot of contract storage.
///
/// Inserting an existing key replaces its value, so merging several groups of pairs keeps the
/// last one written. Serializes as a map of hex keys to hex values, which is how ledgers dump
/// account storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Kvs(BTreeMap<Vec<u8>, Vec<u8>>);

/// One key whose value differs between two snapshots. Values are hex, an absent key reads as
/// the empty string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KvMismatch {
    pub key: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for KvMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key {}: expected {:?}, got {:?}",
            self.key, self.expected, self.actual
        )
    }
}

impl Kvs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = Kv>) -> Self {
        pairs.into_iter().collect()
    }

    pub fn from_hex_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> KvsResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut kvs = Self::new();
        for (key, value) in pairs {
            let key = hex::decode(key.as_ref()).map_err(mvx_codec::CodecError::from)?;
            let value = hex::decode(value.as_ref()).map_err(mvx_codec::CodecError::from)?;
            kvs.insert(key, value);
        }
        Ok(kvs)
    }

    /// Combines groups of pairs in order; later groups override earlier ones.
    pub fn merge(groups: impl IntoIterator<Item = Kvs>) -> Self {
        let mut merged = Self::new();
        for group in groups {
            merged.0.extend(group.0);
        }
        merged
    }

    pub fn insert(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Like [`Kvs::get`], but treats an empty value as absent.
    pub fn get_present(&self, key: &[u8]) -> Option<&[u8]> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.0.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    /// Pairs whose key starts with `prefix`, in key order, with the prefix stripped.
    pub fn iter_prefix<'a>(
        &'a self,
        prefix: &'a [u8],
    ) -> impl Iterator<Item = (&'a [u8], &'a [u8])> + 'a {
        self.0
            .range::<[u8], _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(move |(k, v)| (&k[prefix.len()..], v.as_slice()))
    }

    /// Drops pairs with an empty value.
    pub fn non_empty(&self) -> Self {
        self.0
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn to_hex_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (hex::encode(k), hex::encode(v)))
            .collect()
    }

    /// Checks that every expected pair is present with the same value. Keys only present in
    /// `self` are ignored.
    pub fn diff_has(&self, expected: &Kvs) -> Vec<KvMismatch> {
        expected
            .0
            .keys()
            .filter_map(|key| self.mismatch(expected, key))
            .collect()
    }

    /// Checks that both snapshots hold the same non-empty pairs.
    pub fn diff_all(&self, expected: &Kvs) -> Vec<KvMismatch> {
        let keys: BTreeSet<&Vec<u8>> = self.0.keys().chain(expected.0.keys()).collect();
        keys.into_iter()
            .filter_map(|key| self.mismatch(expected, key))
            .collect()
    }

    fn mismatch(&self, expected: &Kvs, key: &[u8]) -> Option<KvMismatch> {
        let expected = expected.get(key).unwrap_or_default();
        let actual = self.get(key).unwrap_or_default();
        (expected != actual).then(|| KvMismatch {
            key: hex::encode(key),
            expected: hex::encode(expected),
            actual: hex::encode(actual),
        })
    }
}

impl FromIterator<Kv> for Kvs {
    fn from_iter<I: IntoIterator<Item = Kv>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Kv> for Kvs {
    fn extend<I: IntoIterator<Item = Kv>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for Kvs {
    type Item = Kv;
    type IntoIter = btree_map::IntoIter<Vec<u8>, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for Kvs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_hex_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Kvs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, String>::deserialize(deserializer)?;
        Self::from_hex_map(map).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "unit_tests/kvs_tests.rs"]
mod kvs_tests;
