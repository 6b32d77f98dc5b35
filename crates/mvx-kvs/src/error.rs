// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use mvx_codec::CodecError;
use thiserror::Error;

use crate::mapper::MapperKind;

pub type KvsResult<T> = Result<T, KvsError>;

#[derive(Eq, PartialEq, Clone, Debug, Error)]
pub enum KvsError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Non-positive id not allowed: {0}")]
    NonPositiveId(i64),
    #[error("Mapper {base_key} is already defined as {existing}, cannot redefine it as {requested}")]
    InconsistentMapperDefinition {
        base_key: String,
        existing: MapperKind,
        requested: MapperKind,
    },

    #[error("Missing storage key {key}")]
    MissingKey { key: String },
    #[error("Broken mapper links at id {id}")]
    BrokenLinks { id: u32 },
    #[error("Invalid ESDT message: {0}")]
    InvalidMessage(String),
    #[error("Invalid ESDT storage key: {0}")]
    InvalidTokenKey(String),
}

impl KvsError {
    pub(crate) fn missing_key(key: &[u8]) -> Self {
        KvsError::MissingKey {
            key: hex::encode(key),
        }
    }
}

impl From<prost::DecodeError> for KvsError {
    fn from(err: prost::DecodeError) -> Self {
        KvsError::InvalidMessage(err.to_string())
    }
}
