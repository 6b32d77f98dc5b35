// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use mvx_codec::{Address, Encodable};

use crate::config::KvsConfig;
use crate::error::{KvsError, KvsResult};
use crate::esdt::{esdt_pairs_with_config, Esdt};
use crate::kvs::{Kv, Kvs};
use crate::mapper::{Mapper, MapperKind};

/// Accumulates mapper contents and tokens into one storage snapshot.
///
/// Each base key may only be described as one kind of mapper. Re-describing it with the same
/// kind overrides the previous pairs.
#[derive(Debug, Default)]
pub struct KvsBuilder {
    config: KvsConfig,
    kinds: HashMap<Vec<u8>, MapperKind>,
    kvs: Kvs,
}

impl KvsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: KvsConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &KvsConfig {
        &self.config
    }

    fn check_kind(&self, mapper: &Mapper, kind: MapperKind) -> KvsResult<()> {
        match self.kinds.get(mapper.base_key()) {
            Some(existing) if *existing != kind => Err(KvsError::InconsistentMapperDefinition {
                base_key: hex::encode(mapper.base_key()),
                existing: *existing,
                requested: kind,
            }),
            _ => Ok(()),
        }
    }

    fn add(&mut self, mapper: &Mapper, kind: MapperKind, pairs: Vec<Kv>) -> KvsResult<&mut Self> {
        self.check_kind(mapper, kind)?;
        self.kinds.insert(mapper.base_key().to_vec(), kind);
        self.kvs.extend(pairs);
        Ok(self)
    }

    pub fn value(&mut self, mapper: &Mapper, value: Option<&Encodable>) -> KvsResult<&mut Self> {
        self.add(mapper, MapperKind::Value, mapper.value(value))
    }

    pub fn vec(&mut self, mapper: &Mapper, items: &[Encodable]) -> KvsResult<&mut Self> {
        self.add(mapper, MapperKind::Vec, mapper.vec(items))
    }

    pub fn unordered_set(&mut self, mapper: &Mapper, items: &[Encodable]) -> KvsResult<&mut Self> {
        self.add(mapper, MapperKind::UnorderedSet, mapper.unordered_set(items))
    }

    pub fn set(&mut self, mapper: &Mapper, entries: &[(i64, Encodable)]) -> KvsResult<&mut Self> {
        // A failed call leaves the builder untouched, registry included.
        self.check_kind(mapper, MapperKind::Set)?;
        let pairs = mapper.set(entries)?;
        self.add(mapper, MapperKind::Set, pairs)
    }

    pub fn map(
        &mut self,
        mapper: &Mapper,
        entries: &[(i64, Encodable, Encodable)],
    ) -> KvsResult<&mut Self> {
        self.check_kind(mapper, MapperKind::Map)?;
        let pairs = mapper.map(entries)?;
        self.add(mapper, MapperKind::Map, pairs)
    }

    pub fn user(&mut self, mapper: &Mapper, addresses: &[Address]) -> KvsResult<&mut Self> {
        self.add(mapper, MapperKind::User, mapper.user(addresses))
    }

    /// Like [`KvsBuilder::user`], with addresses given as strings in the configured format.
    pub fn user_bech32<S: AsRef<str>>(
        &mut self,
        mapper: &Mapper,
        addresses: &[S],
    ) -> KvsResult<&mut Self> {
        let addresses = addresses
            .iter()
            .map(|a| self.config.parse_address(a.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.user(mapper, &addresses)
    }

    pub fn esdts(&mut self, esdts: &[Esdt]) -> &mut Self {
        self.kvs.extend(esdt_pairs_with_config(esdts, &self.config));
        self
    }

    /// Raw pairs, outside of any mapper.
    pub fn pairs(&mut self, pairs: impl IntoIterator<Item = Kv>) -> &mut Self {
        self.kvs.extend(pairs);
        self
    }

    pub fn build(&self) -> Kvs {
        self.kvs.clone()
    }
}

#[cfg(test)]
#[path = "unit_tests/builder_tests.rs"]
mod builder_tests;
