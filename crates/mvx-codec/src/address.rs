// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encodable::Encodable;
use crate::error::{CodecError, CodecResult};

pub const ADDRESS_LENGTH: usize = 32;

/// Human-readable part of account addresses on the main network.
pub const DEFAULT_HRP: &str = "erd";

/// A 32-byte account address.
///
/// Rendered as bech32 (`erd1…`) by `Display`. Parsing accepts bech32 with the expected
/// human-readable part or a 64-char hex string.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> CodecResult<Self> {
        let bytes = bytes.as_ref();
        let array: [u8; ADDRESS_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| CodecError::InvalidAddressLength {
                    expected: ADDRESS_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Parses a bech32 string with the default prefix or a hex string.
    pub fn parse(s: &str) -> CodecResult<Self> {
        Self::parse_with_hrp(s, DEFAULT_HRP)
    }

    pub fn parse_with_hrp(s: &str, hrp: &str) -> CodecResult<Self> {
        if s.len() == 2 * ADDRESS_LENGTH && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::from_bytes(hex::decode(s)?);
        }
        let (decoded_hrp, data, variant) = bech32::decode(s)
            .map_err(|e| CodecError::InvalidAddressFormat(format!("{s}: {e}")))?;
        if decoded_hrp != hrp || variant != Variant::Bech32 {
            return Err(CodecError::InvalidAddressFormat(format!(
                "{s}: expected bech32 address with prefix {hrp}"
            )));
        }
        let bytes = Vec::<u8>::from_base32(&data)
            .map_err(|e| CodecError::InvalidAddressFormat(format!("{s}: {e}")))?;
        Self::from_bytes(bytes)
    }

    pub fn to_bech32(&self) -> String {
        self.to_bech32_with_hrp(DEFAULT_HRP)
            .unwrap_or_else(|_| self.to_hex())
    }

    /// Fails only when `hrp` itself is not a valid bech32 human-readable part.
    pub fn to_bech32_with_hrp(&self, hrp: &str) -> CodecResult<String> {
        bech32::encode(hrp, self.0.to_base32(), Variant::Bech32)
            .map_err(|e| CodecError::InvalidAddressFormat(format!("{hrp}: {e}")))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = CodecError;

    fn try_from(bytes: &[u8]) -> CodecResult<Self> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<Vec<u8>> for Address {
    type Error = CodecError;

    fn try_from(bytes: Vec<u8>) -> CodecResult<Self> {
        Self::from_bytes(bytes)
    }
}

/// An encodable whose top-level encoding is exactly 32 bytes.
impl TryFrom<&Encodable> for Address {
    type Error = CodecError;

    fn try_from(encodable: &Encodable) -> CodecResult<Self> {
        Self::from_bytes(encodable.to_top_bytes())
    }
}

impl FromStr for Address {
    type Err = CodecError;

    fn from_str(s: &str) -> CodecResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_bech32_with_hrp(DEFAULT_HRP).map_err(|_| fmt::Error)?;
        write!(f, "{s}")
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_bech32())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "unit_tests/address_tests.rs"]
mod address_tests;
