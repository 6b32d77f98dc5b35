// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use num_bigint::{BigInt, BigUint};

use crate::address::Address;
use crate::error::CodecResult;
use crate::scalar::{write_length, write_prefixed, IntValue, UintValue};

/// A value that can be rendered in both top-level and nested form.
///
/// Values are immutable once built; range checks happen in the fallible constructors
/// ([`Encodable::uint`], [`Encodable::int`]) so that encoding itself never fails.
#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub enum Encodable {
    /// Variable-size byte buffer. Nested form is length-prefixed.
    Buffer(Vec<u8>),
    /// Constant byte sequence, written as-is in both forms.
    Bytes(Vec<u8>),
    Uint(UintValue),
    Int(IntValue),
    Address(Address),
    Tuple(Vec<Encodable>),
    List(Vec<Encodable>),
    Option(Option<Box<Encodable>>),
}

impl Encodable {
    pub fn buffer(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Buffer(bytes.into())
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    pub fn str(s: impl AsRef<str>) -> Self {
        Self::Buffer(s.as_ref().as_bytes().to_vec())
    }

    /// Builds a buffer from a hex string.
    pub fn buffer_hex(s: &str) -> CodecResult<Self> {
        Ok(Self::Buffer(hex::decode(s)?))
    }

    pub fn address(address: Address) -> Self {
        Self::Address(address)
    }

    /// Parses a bech32 or 64-char hex address.
    pub fn address_str(s: &str) -> CodecResult<Self> {
        Ok(Self::Address(Address::parse(s)?))
    }

    pub fn bool(value: bool) -> Self {
        Self::Uint(UintValue::fixed(u8::from(value), 1))
    }

    pub fn u8(value: u8) -> Self {
        Self::Uint(UintValue::fixed(value, 1))
    }

    pub fn u16(value: u16) -> Self {
        Self::Uint(UintValue::fixed(value, 2))
    }

    pub fn u32(value: u32) -> Self {
        Self::Uint(UintValue::fixed(value, 4))
    }

    pub fn u64(value: u64) -> Self {
        Self::Uint(UintValue::fixed(value, 8))
    }

    /// Size-independent count; encoded as a u32 like the VM's `usize`.
    pub fn usize(value: u32) -> Self {
        Self::u32(value)
    }

    /// Unsigned integer with no declared width.
    pub fn big_uint(value: impl Into<BigUint>) -> Self {
        Self::Uint(UintValue::unbounded(value.into()))
    }

    pub fn uint(value: impl Into<BigInt>, byte_length: Option<usize>) -> CodecResult<Self> {
        Ok(Self::Uint(UintValue::new(value, byte_length)?))
    }

    pub fn i8(value: i8) -> Self {
        Self::Int(IntValue::fixed(value, 1))
    }

    pub fn i16(value: i16) -> Self {
        Self::Int(IntValue::fixed(value, 2))
    }

    pub fn i32(value: i32) -> Self {
        Self::Int(IntValue::fixed(value, 4))
    }

    pub fn i64(value: i64) -> Self {
        Self::Int(IntValue::fixed(value, 8))
    }

    pub fn isize(value: i32) -> Self {
        Self::i32(value)
    }

    /// Signed integer with no declared width.
    pub fn big_int(value: impl Into<BigInt>) -> Self {
        Self::Int(IntValue::unbounded(value.into()))
    }

    pub fn int(value: impl Into<BigInt>, byte_length: Option<usize>) -> CodecResult<Self> {
        Ok(Self::Int(IntValue::new(value, byte_length)?))
    }

    pub fn tuple(items: impl IntoIterator<Item = Encodable>) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    pub fn list(items: impl IntoIterator<Item = Encodable>) -> Self {
        Self::List(items.into_iter().collect())
    }

    pub fn some(value: Encodable) -> Self {
        Self::Option(Some(Box::new(value)))
    }

    pub fn none() -> Self {
        Self::Option(None)
    }

    pub fn option(value: Option<Encodable>) -> Self {
        Self::Option(value.map(Box::new))
    }

    pub fn write_top(&self, out: &mut Vec<u8>) {
        match self {
            Self::Buffer(bytes) | Self::Bytes(bytes) => out.extend_from_slice(bytes),
            Self::Uint(value) => value.write_top(out),
            Self::Int(value) => value.write_top(out),
            Self::Address(address) => out.extend_from_slice(address.as_ref()),
            Self::Tuple(items) | Self::List(items) => {
                items.iter().for_each(|item| item.write_nest(out))
            }
            Self::Option(None) => {}
            Self::Option(Some(value)) => {
                out.push(1);
                value.write_nest(out);
            }
        }
    }

    pub fn write_nest(&self, out: &mut Vec<u8>) {
        match self {
            Self::Buffer(bytes) => write_prefixed(out, bytes),
            Self::Bytes(bytes) => out.extend_from_slice(bytes),
            Self::Uint(value) => value.write_nest(out),
            Self::Int(value) => value.write_nest(out),
            Self::Address(_) | Self::Tuple(_) => self.write_top(out),
            Self::List(items) => {
                write_length(out, items.len());
                self.write_top(out);
            }
            Self::Option(None) => out.push(0),
            Self::Option(Some(_)) => self.write_top(out),
        }
    }

    pub fn to_top_bytes(&self) -> Vec<u8> {
        let mut out = vec![];
        self.write_top(&mut out);
        out
    }

    pub fn to_nest_bytes(&self) -> Vec<u8> {
        let mut out = vec![];
        self.write_nest(&mut out);
        out
    }

    pub fn to_top_hex(&self) -> String {
        hex::encode(self.to_top_bytes())
    }

    pub fn to_nest_hex(&self) -> String {
        hex::encode(self.to_nest_bytes())
    }

    pub fn to_top_b64(&self) -> String {
        BASE64.encode(self.to_top_bytes())
    }

    pub fn to_nest_b64(&self) -> String {
        BASE64.encode(self.to_nest_bytes())
    }
}

impl From<Address> for Encodable {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

impl From<bool> for Encodable {
    fn from(value: bool) -> Self {
        Self::bool(value)
    }
}

impl From<u8> for Encodable {
    fn from(value: u8) -> Self {
        Self::u8(value)
    }
}

impl From<u16> for Encodable {
    fn from(value: u16) -> Self {
        Self::u16(value)
    }
}

impl From<u32> for Encodable {
    fn from(value: u32) -> Self {
        Self::u32(value)
    }
}

impl From<u64> for Encodable {
    fn from(value: u64) -> Self {
        Self::u64(value)
    }
}

impl From<i8> for Encodable {
    fn from(value: i8) -> Self {
        Self::i8(value)
    }
}

impl From<i16> for Encodable {
    fn from(value: i16) -> Self {
        Self::i16(value)
    }
}

impl From<i32> for Encodable {
    fn from(value: i32) -> Self {
        Self::i32(value)
    }
}

impl From<i64> for Encodable {
    fn from(value: i64) -> Self {
        Self::i64(value)
    }
}

impl From<&str> for Encodable {
    fn from(value: &str) -> Self {
        Self::str(value)
    }
}

impl From<String> for Encodable {
    fn from(value: String) -> Self {
        Self::Buffer(value.into_bytes())
    }
}

impl<T: Into<Encodable>> From<Option<T>> for Encodable {
    fn from(value: Option<T>) -> Self {
        Self::option(value.map(Into::into))
    }
}

#[cfg(test)]
#[path = "unit_tests/encodable_tests.rs"]
mod encodable_tests;
