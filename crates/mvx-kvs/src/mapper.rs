// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Storage layouts of contract mappers.
//!
//! A mapper lives under a base key: its name followed by the nested encoding of each key
//! argument. Every layout key appends a raw segment name and, where needed, the nested encoding
//! of an element or a `u32` index. Stored values are top-encoded.
//!
//! Building a mapper with no data yields the pairs that clear it (empty values), so the output
//! can be compared against a storage snapshot to assert that the mapper is empty.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use itertools::Itertools;
use mvx_codec::{Address, CodecError, Decoder, Encodable, Value};
use tracing::trace;

use crate::error::{KvsError, KvsResult};
use crate::kvs::{Kv, Kvs};

pub mod segment {
    pub const ITEM: &str = ".item";
    pub const LEN: &str = ".len";
    pub const INDEX: &str = ".index";
    pub const NODE_ID: &str = ".node_id";
    pub const VALUE: &str = ".value";
    pub const NODE_LINKS: &str = ".node_links";
    pub const INFO: &str = ".info";
    pub const MAPPED: &str = ".mapped";
    pub const ADDRESS_TO_ID: &str = "_address_to_id";
    pub const ID_TO_ADDRESS: &str = "_id_to_address";
    pub const COUNT: &str = "_count";
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum MapperKind {
    Value,
    Vec,
    UnorderedSet,
    Set,
    Map,
    User,
}

impl fmt::Display for MapperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MapperKind::Value => "SingleValueMapper",
            MapperKind::Vec => "VecMapper",
            MapperKind::UnorderedSet => "UnorderedSetMapper",
            MapperKind::Set => "SetMapper",
            MapperKind::Map => "MapMapper",
            MapperKind::User => "UserMapper",
        };
        write!(f, "{name}")
    }
}

/// One element of a set mapper, in list order.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct SetEntry {
    pub id: u32,
    /// Top-encoded element.
    pub value: Vec<u8>,
}

/// One entry of a map mapper, in insertion order.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct MapEntry {
    pub id: u32,
    /// Top-encoded key.
    pub key: Vec<u8>,
    /// Top-encoded value.
    pub value: Vec<u8>,
}

/// Header of the linked list backing set and map mappers.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Default)]
pub struct ListInfo {
    pub len: u32,
    pub front: u32,
    pub back: u32,
    pub new_id: u32,
}

impl ListInfo {
    fn encodable(&self) -> Encodable {
        Encodable::tuple([
            Encodable::u32(self.len),
            Encodable::u32(self.front),
            Encodable::u32(self.back),
            Encodable::u32(self.new_id),
        ])
    }

    fn decode(bytes: &[u8]) -> KvsResult<Self> {
        let [len, front, back, new_id] = decode_u32s::<4>(bytes)?;
        Ok(Self {
            len,
            front,
            back,
            new_id,
        })
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub struct Mapper {
    base_key: Vec<u8>,
}

impl Mapper {
    pub fn new(name: &str, keys: impl IntoIterator<Item = Encodable>) -> Self {
        let base = Encodable::tuple(
            std::iter::once(Encodable::bytes(name.as_bytes())).chain(keys),
        );
        Self {
            base_key: base.to_top_bytes(),
        }
    }

    pub fn base_key(&self) -> &[u8] {
        &self.base_key
    }

    fn key(&self, segment: &str) -> Vec<u8> {
        let mut key = self.base_key.clone();
        key.extend_from_slice(segment.as_bytes());
        key
    }

    fn key_with(&self, segment: &str, suffix: &Encodable) -> Vec<u8> {
        let mut key = self.key(segment);
        suffix.write_nest(&mut key);
        key
    }

    fn index_key(&self, segment: &str, index: u32) -> Vec<u8> {
        self.key_with(segment, &Encodable::u32(index))
    }

    /// Pairs of a single value mapper. `None` clears it.
    pub fn value(&self, value: Option<&Encodable>) -> Vec<Kv> {
        vec![(
            self.base_key.clone(),
            value.map(Encodable::to_top_bytes).unwrap_or_default(),
        )]
    }

    pub fn vec(&self, items: &[Encodable]) -> Vec<Kv> {
        let mut kvs: Vec<Kv> = items
            .iter()
            .zip(1u32..)
            .map(|(item, index)| (self.index_key(segment::ITEM, index), item.to_top_bytes()))
            .collect();
        kvs.push((self.key(segment::LEN), count_bytes(items.len())));
        trace!(pairs = kvs.len(), "built vec mapper");
        kvs
    }

    pub fn unordered_set(&self, items: &[Encodable]) -> Vec<Kv> {
        let mut kvs = self.vec(items);
        kvs.extend(items.iter().zip(1u32..).map(|(item, index)| {
            (
                self.key_with(segment::INDEX, item),
                Encodable::u32(index).to_top_bytes(),
            )
        }));
        kvs
    }

    /// Pairs of a set mapper holding `entries`, given as `(id, element)`.
    ///
    /// Entries are linked in ascending id order. Ids must be strictly positive; nothing is built
    /// otherwise.
    pub fn set(&self, entries: &[(i64, Encodable)]) -> KvsResult<Vec<Kv>> {
        let entries = sorted_by_id(entries.iter().map(|(id, value)| (*id, value)))?;
        let mut kvs = Vec::with_capacity(3 * entries.len() + 1);
        for (position, (id, value)) in entries.iter().enumerate() {
            let prev = position
                .checked_sub(1)
                .map_or(0, |prev| entries[prev].0);
            let next = entries.get(position + 1).map_or(0, |next| next.0);
            kvs.push((
                self.key_with(segment::NODE_ID, value),
                Encodable::u32(*id).to_top_bytes(),
            ));
            kvs.push((self.index_key(segment::VALUE, *id), value.to_top_bytes()));
            kvs.push((
                self.index_key(segment::NODE_LINKS, *id),
                Encodable::tuple([Encodable::u32(prev), Encodable::u32(next)]).to_top_bytes(),
            ));
        }
        let info = match (entries.first(), entries.last()) {
            (Some((front, _)), Some((back, _))) => ListInfo {
                len: entries.len() as u32,
                front: *front,
                back: *back,
                // Highest id among the current entries. Ids of removed entries are not
                // remembered, so this can be lower than what the contract would allocate next.
                new_id: entries.iter().map(|(id, _)| *id).max().unwrap_or_default(),
            }
            .encodable()
            .to_top_bytes(),
            _ => vec![],
        };
        kvs.push((self.key(segment::INFO), info));
        trace!(pairs = kvs.len(), "built set mapper");
        Ok(kvs)
    }

    /// Pairs of a map mapper holding `entries`, given as `(id, key, value)`. The keys form a set
    /// mapper under the same base key.
    pub fn map(&self, entries: &[(i64, Encodable, Encodable)]) -> KvsResult<Vec<Kv>> {
        let keys: Vec<(i64, Encodable)> = entries
            .iter()
            .map(|(id, key, _)| (*id, key.clone()))
            .collect();
        let mut kvs = self.set(&keys)?;
        kvs.extend(
            entries
                .iter()
                .map(|(_, key, value)| (self.key_with(segment::MAPPED, key), value.to_top_bytes())),
        );
        Ok(kvs)
    }

    /// Pairs of a user mapper assigning ids `1..` to `addresses` in order.
    pub fn user(&self, addresses: &[Address]) -> Vec<Kv> {
        let mut kvs = Vec::with_capacity(2 * addresses.len() + 1);
        for (address, id) in addresses.iter().zip(1u32..) {
            let address = Encodable::address(*address);
            kvs.push((
                self.key_with(segment::ADDRESS_TO_ID, &address),
                Encodable::u32(id).to_top_bytes(),
            ));
            kvs.push((
                self.index_key(segment::ID_TO_ADDRESS, id),
                address.to_top_bytes(),
            ));
        }
        kvs.push((self.key(segment::COUNT), count_bytes(addresses.len())));
        trace!(pairs = kvs.len(), "built user mapper");
        kvs
    }

    pub fn decode_value(&self, kvs: &Kvs) -> Option<Vec<u8>> {
        kvs.get_present(&self.base_key).map(<[u8]>::to_vec)
    }

    pub fn decode_value_as(&self, kvs: &Kvs, decoder: &Decoder) -> KvsResult<Option<Value>> {
        self.decode_value(kvs)
            .map(|bytes| decoder.from_top(bytes))
            .transpose()
            .map_err(Into::into)
    }

    /// Items in index order, top-encoded.
    ///
    /// An item that top-encodes to nothing (a zero) is indistinguishable from a missing pair in
    /// a ledger dump, so a missing item reads as empty.
    pub fn decode_vec(&self, kvs: &Kvs) -> KvsResult<Vec<Vec<u8>>> {
        let len = match kvs.get_present(&self.key(segment::LEN)) {
            Some(bytes) => Decoder::u32().from_top(bytes)?.as_u32()?,
            None => 0,
        };
        Ok((1..=len)
            .map(|index| stored_value(kvs, &self.index_key(segment::ITEM, index)))
            .collect())
    }

    pub fn decode_vec_as(&self, kvs: &Kvs, decoder: &Decoder) -> KvsResult<Vec<Value>> {
        decode_all(self.decode_vec(kvs)?, decoder)
    }

    /// Items in index order, top-encoded. The reverse index must map each item back to its
    /// position.
    pub fn decode_unordered_set(&self, kvs: &Kvs) -> KvsResult<Vec<Vec<u8>>> {
        let items = self.decode_vec(kvs)?;
        let index_prefix = self.key(segment::INDEX);
        let mut positions = BTreeSet::new();
        for (_, value) in kvs.iter_prefix(&index_prefix).filter(|(_, v)| !v.is_empty()) {
            let position = Decoder::u32().from_top(value)?.as_u32()?;
            if position == 0 || position as usize > items.len() {
                return Err(KvsError::BrokenLinks { id: position });
            }
            if !positions.insert(position) {
                return Err(KvsError::BrokenLinks { id: position });
            }
        }
        if let Some(position) = (1..=items.len() as u32).find(|p| !positions.contains(p)) {
            return Err(KvsError::BrokenLinks { id: position });
        }
        Ok(items)
    }

    pub fn decode_unordered_set_as(&self, kvs: &Kvs, decoder: &Decoder) -> KvsResult<Vec<Value>> {
        decode_all(self.decode_unordered_set(kvs)?, decoder)
    }

    /// Elements in list order.
    ///
    /// Membership and order come only from the linked list: traversal starts at the front id in
    /// `.info` and follows `.node_links`. Pairs of removed nodes that are still in the snapshot
    /// are ignored.
    pub fn decode_set(&self, kvs: &Kvs) -> KvsResult<Vec<SetEntry>> {
        let entries = self
            .linked_ids(kvs)?
            .into_iter()
            .map(|id| SetEntry {
                id,
                value: stored_value(kvs, &self.index_key(segment::VALUE, id)),
            })
            .collect::<Vec<_>>();
        trace!(entries = entries.len(), "decoded set mapper");
        Ok(entries)
    }

    pub fn decode_set_as(&self, kvs: &Kvs, decoder: &Decoder) -> KvsResult<Vec<(u32, Value)>> {
        self.decode_set(kvs)?
            .into_iter()
            .map(|entry| Ok((entry.id, decoder.from_top(entry.value)?)))
            .collect()
    }

    /// Entries in insertion order.
    ///
    /// The nested encoding of each key, needed to locate its `.mapped` value, is recovered from
    /// the `.node_id` reverse index.
    pub fn decode_map(&self, kvs: &Kvs) -> KvsResult<Vec<MapEntry>> {
        let node_id_prefix = self.key(segment::NODE_ID);
        let mut nested_keys = BTreeMap::new();
        for (nested_key, id) in kvs.iter_prefix(&node_id_prefix) {
            if id.is_empty() {
                continue;
            }
            let id = Decoder::u32().from_top(id)?.as_u32()?;
            nested_keys.insert(id, nested_key);
        }

        let entries = self
            .decode_set(kvs)?
            .into_iter()
            .map(|SetEntry { id, value: key }| {
                let nested_key = nested_keys
                    .get(&id)
                    .ok_or(KvsError::BrokenLinks { id })?;
                let mut mapped_key = self.key(segment::MAPPED);
                mapped_key.extend_from_slice(nested_key);
                Ok(MapEntry {
                    id,
                    key,
                    value: stored_value(kvs, &mapped_key),
                })
            })
            .collect::<KvsResult<Vec<_>>>()?;
        trace!(entries = entries.len(), "decoded map mapper");
        Ok(entries)
    }

    pub fn decode_map_as(
        &self,
        kvs: &Kvs,
        key_decoder: &Decoder,
        value_decoder: &Decoder,
    ) -> KvsResult<Vec<(Value, Value)>> {
        self.decode_map(kvs)?
            .into_iter()
            .map(|entry| {
                Ok((
                    key_decoder.from_top(entry.key)?,
                    value_decoder.from_top(entry.value)?,
                ))
            })
            .collect()
    }

    /// Addresses for ids `1..=count`.
    pub fn decode_user(&self, kvs: &Kvs) -> KvsResult<Vec<Address>> {
        let count = match kvs.get_present(&self.key(segment::COUNT)) {
            Some(bytes) => Decoder::u32().from_top(bytes)?.as_u32()?,
            None => 0,
        };
        (1..=count)
            .map(|id| {
                let key = self.index_key(segment::ID_TO_ADDRESS, id);
                let bytes = kvs
                    .get_present(&key)
                    .ok_or_else(|| KvsError::missing_key(&key))?;
                let address = Address::from_bytes(bytes)?;

                let reverse_key = self.key_with(segment::ADDRESS_TO_ID, &Encodable::address(address));
                let reverse = kvs
                    .get_present(&reverse_key)
                    .ok_or_else(|| KvsError::missing_key(&reverse_key))?;
                if Decoder::u32().from_top(reverse)?.as_u32()? != id {
                    return Err(KvsError::BrokenLinks { id });
                }
                Ok(address)
            })
            .collect()
    }

    /// Ids reachable from the front of the list, in order. Fails if the chain disagrees with
    /// `.info`.
    fn linked_ids(&self, kvs: &Kvs) -> KvsResult<Vec<u32>> {
        let Some(info) = kvs.get_present(&self.key(segment::INFO)) else {
            return Ok(vec![]);
        };
        let info = ListInfo::decode(info)?;

        let mut ids = Vec::with_capacity(info.len as usize);
        let (mut prev, mut current) = (0u32, info.front);
        while current != 0 {
            if ids.len() >= info.len as usize {
                return Err(KvsError::BrokenLinks { id: current });
            }
            let key = self.index_key(segment::NODE_LINKS, current);
            let links = kvs
                .get_present(&key)
                .ok_or_else(|| KvsError::missing_key(&key))?;
            let [link_prev, link_next] = decode_u32s::<2>(links)?;
            if link_prev != prev {
                return Err(KvsError::BrokenLinks { id: current });
            }
            ids.push(current);
            (prev, current) = (current, link_next);
        }
        if ids.len() != info.len as usize || prev != info.back {
            return Err(KvsError::BrokenLinks { id: prev });
        }
        Ok(ids)
    }
}

fn sorted_by_id<'a>(
    entries: impl Iterator<Item = (i64, &'a Encodable)>,
) -> KvsResult<Vec<(u32, &'a Encodable)>> {
    entries
        .sorted_by_key(|(id, _)| *id)
        .map(|(id, value)| {
            if id <= 0 {
                return Err(KvsError::NonPositiveId(id));
            }
            let id = u32::try_from(id).map_err(|_| CodecError::Overflow {
                value: id.to_string(),
                byte_length: 4,
            })?;
            Ok((id, value))
        })
        .collect()
}

/// Value-carrying keys may legitimately hold nothing, so a missing pair reads as empty.
fn stored_value(kvs: &Kvs, key: &[u8]) -> Vec<u8> {
    kvs.get(key).unwrap_or_default().to_vec()
}

/// Top-encoded u32 count, or the empty value when there is nothing to count.
fn count_bytes(len: usize) -> Vec<u8> {
    if len == 0 {
        return vec![];
    }
    Encodable::u32(len as u32).to_top_bytes()
}

fn decode_u32s<const N: usize>(bytes: &[u8]) -> KvsResult<[u32; N]> {
    let values = Decoder::list_n(N, Decoder::u32())
        .from_nest(bytes)?
        .into_list()?;
    let mut out = [0u32; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value.as_u32()?;
    }
    Ok(out)
}

fn decode_all(items: Vec<Vec<u8>>, decoder: &Decoder) -> KvsResult<Vec<Value>> {
    items
        .into_iter()
        .map(|item| Ok(decoder.from_top(item)?))
        .collect()
}

#[cfg(test)]
#[path = "unit_tests/mapper_tests.rs"]
mod mapper_tests;
