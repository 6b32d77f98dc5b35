// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Contract storage as flat key/value pairs.
//!
//! Builds the exact pairs the VM writes for mappers and ESDT tokens, and reads structured views
//! back out of a storage snapshot.

pub mod builder;
pub mod config;
pub mod error;
pub mod esdt;
pub mod kvs;
pub mod mapper;
pub mod proto;

pub use builder::KvsBuilder;
pub use config::KvsConfig;
pub use error::{KvsError, KvsResult};
pub use esdt::{
    decode_esdts, decode_esdts_with_config, esdt_pairs, esdt_pairs_with_config, Esdt, EsdtRole,
};
pub use kvs::{Kv, KvMismatch, Kvs};
pub use mapper::{ListInfo, MapEntry, Mapper, MapperKind, SetEntry};
