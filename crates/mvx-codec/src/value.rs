// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;

use crate::address::Address;
use crate::error::{CodecError, CodecResult};

/// The result of running a [`crate::Decoder`] over some bytes.
///
/// Accessors consume or borrow the value and fail with [`CodecError::UnexpectedValue`] when the
/// decoded shape is not the one asked for, or [`CodecError::ValueTooLarge`] when a number does
/// not fit the requested machine type.
#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub enum Value {
    Bytes(Vec<u8>),
    Str(String),
    Bool(bool),
    Uint(BigUint),
    Int(BigInt),
    Address(Address),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Option(Option<Box<Value>>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bytes(_) => "bytes",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Uint(_) => "unsigned integer",
            Value::Int(_) => "signed integer",
            Value::Address(_) => "address",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Option(_) => "option",
        }
    }

    fn unexpected<T>(&self, expected: &'static str) -> CodecResult<T> {
        Err(CodecError::UnexpectedValue {
            expected,
            found: self.kind(),
        })
    }

    pub fn as_bytes(&self) -> CodecResult<&[u8]> {
        match self {
            Value::Bytes(bytes) => Ok(bytes),
            Value::Str(s) => Ok(s.as_bytes()),
            _ => self.unexpected("bytes"),
        }
    }

    pub fn into_bytes(self) -> CodecResult<Vec<u8>> {
        match self {
            Value::Bytes(bytes) => Ok(bytes),
            Value::Str(s) => Ok(s.into_bytes()),
            _ => self.unexpected("bytes"),
        }
    }

    pub fn as_str(&self) -> CodecResult<&str> {
        match self {
            Value::Str(s) => Ok(s),
            _ => self.unexpected("string"),
        }
    }

    /// Byte values are accepted as long as they are valid UTF-8.
    pub fn into_string(self) -> CodecResult<String> {
        match self {
            Value::Str(s) => Ok(s),
            Value::Bytes(bytes) => Ok(String::from_utf8(bytes)?),
            _ => self.unexpected("string"),
        }
    }

    pub fn as_bool(&self) -> CodecResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => self.unexpected("bool"),
        }
    }

    pub fn as_biguint(&self) -> CodecResult<&BigUint> {
        match self {
            Value::Uint(n) => Ok(n),
            _ => self.unexpected("unsigned integer"),
        }
    }

    pub fn into_biguint(self) -> CodecResult<BigUint> {
        match self {
            Value::Uint(n) => Ok(n),
            _ => self.unexpected("unsigned integer"),
        }
    }

    /// Unsigned values widen losslessly into signed ones.
    pub fn into_bigint(self) -> CodecResult<BigInt> {
        match self {
            Value::Int(n) => Ok(n),
            Value::Uint(n) => Ok(n.into()),
            _ => self.unexpected("signed integer"),
        }
    }

    pub fn as_u64(&self) -> CodecResult<u64> {
        self.as_biguint()?
            .to_u64()
            .ok_or(CodecError::ValueTooLarge { kind: "u64" })
    }

    pub fn as_u32(&self) -> CodecResult<u32> {
        self.as_biguint()?
            .to_u32()
            .ok_or(CodecError::ValueTooLarge { kind: "u32" })
    }

    pub fn as_i64(&self) -> CodecResult<i64> {
        let value = match self {
            Value::Int(n) => n.to_i64(),
            Value::Uint(n) => n.to_i64(),
            _ => return self.unexpected("signed integer"),
        };
        value.ok_or(CodecError::ValueTooLarge { kind: "i64" })
    }

    pub fn as_address(&self) -> CodecResult<&Address> {
        match self {
            Value::Address(address) => Ok(address),
            _ => self.unexpected("address"),
        }
    }

    pub fn into_address(self) -> CodecResult<Address> {
        self.as_address().copied()
    }

    pub fn into_tuple(self) -> CodecResult<Vec<Value>> {
        match self {
            Value::Tuple(items) => Ok(items),
            _ => self.unexpected("tuple"),
        }
    }

    pub fn into_list(self) -> CodecResult<Vec<Value>> {
        match self {
            Value::List(items) => Ok(items),
            _ => self.unexpected("list"),
        }
    }

    pub fn into_option(self) -> CodecResult<Option<Value>> {
        match self {
            Value::Option(value) => Ok(value.map(|v| *v)),
            _ => self.unexpected("option"),
        }
    }
}

impl From<Address> for Value {
    fn from(address: Address) -> Self {
        Value::Address(address)
    }
}

impl From<BigUint> for Value {
    fn from(n: BigUint) -> Self {
        Value::Uint(n)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::Int(n)
    }
}
