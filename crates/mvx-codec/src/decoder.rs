// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::address::{Address, ADDRESS_LENGTH};
use crate::error::{CodecError, CodecResult};
use crate::reader::ByteReader;
use crate::scalar::{int_from_bytes, uint_from_bytes};
use crate::value::Value;

/// Describes the shape of the bytes to decode.
///
/// A decoder is a plain description; the same instance can decode any number of inputs, from any
/// number of threads. Top-level entry points ([`Decoder::from_top`], [`Decoder::from_nest`])
/// reject input that is not fully consumed.
#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub enum Decoder {
    /// Length-prefixed in nested form, the whole input at top level.
    Buffer,
    /// Raw bytes with no prefix: exactly `n` bytes, or everything that is left when unsized.
    CstBuffer(Option<usize>),
    Str,
    Address,
    Bool,
    Uint(Option<usize>),
    Int(Option<usize>),
    Tuple(Vec<Decoder>),
    List(Box<Decoder>),
    /// A list of known length whose nested form carries no count.
    ListN(usize, Box<Decoder>),
    Option(Box<Decoder>),
}

impl Decoder {
    pub fn u8() -> Self {
        Self::Uint(Some(1))
    }

    pub fn u16() -> Self {
        Self::Uint(Some(2))
    }

    pub fn u32() -> Self {
        Self::Uint(Some(4))
    }

    pub fn u64() -> Self {
        Self::Uint(Some(8))
    }

    pub fn usize() -> Self {
        Self::u32()
    }

    pub fn big_uint() -> Self {
        Self::Uint(None)
    }

    pub fn i8() -> Self {
        Self::Int(Some(1))
    }

    pub fn i16() -> Self {
        Self::Int(Some(2))
    }

    pub fn i32() -> Self {
        Self::Int(Some(4))
    }

    pub fn i64() -> Self {
        Self::Int(Some(8))
    }

    pub fn isize() -> Self {
        Self::i32()
    }

    pub fn big_int() -> Self {
        Self::Int(None)
    }

    pub fn tuple(decoders: impl IntoIterator<Item = Decoder>) -> Self {
        Self::Tuple(decoders.into_iter().collect())
    }

    pub fn list(decoder: Decoder) -> Self {
        Self::List(Box::new(decoder))
    }

    pub fn list_n(len: usize, decoder: Decoder) -> Self {
        Self::ListN(len, Box::new(decoder))
    }

    pub fn option(decoder: Decoder) -> Self {
        Self::Option(Box::new(decoder))
    }

    pub fn from_top(&self, bytes: impl AsRef<[u8]>) -> CodecResult<Value> {
        let mut reader = ByteReader::new(bytes.as_ref());
        let value = self.decode_top(&mut reader)?;
        reader.assert_consumed()?;
        Ok(value)
    }

    pub fn from_nest(&self, bytes: impl AsRef<[u8]>) -> CodecResult<Value> {
        let mut reader = ByteReader::new(bytes.as_ref());
        let value = self.decode_nest(&mut reader)?;
        reader.assert_consumed()?;
        Ok(value)
    }

    pub fn from_top_hex(&self, s: &str) -> CodecResult<Value> {
        self.from_top(hex::decode(s)?)
    }

    pub fn from_nest_hex(&self, s: &str) -> CodecResult<Value> {
        self.from_nest(hex::decode(s)?)
    }

    pub fn decode_top(&self, r: &mut ByteReader<'_>) -> CodecResult<Value> {
        match self {
            Self::Buffer => Ok(Value::Bytes(r.read_remaining().to_vec())),
            Self::Str => Ok(Value::Str(String::from_utf8(
                r.read_remaining().to_vec(),
            )?)),
            Self::Bool => decode_bool(r.read_at_most(1)),
            Self::Uint(byte_length) => {
                let bytes = match byte_length {
                    Some(n) => r.read_at_most(*n),
                    None => r.read_remaining(),
                };
                Ok(Value::Uint(uint_from_bytes(bytes)))
            }
            Self::Int(byte_length) => {
                let bytes = match byte_length {
                    Some(n) => r.read_at_most(*n),
                    None => r.read_remaining(),
                };
                Ok(Value::Int(int_from_bytes(bytes)))
            }
            Self::Tuple(_) | Self::CstBuffer(_) | Self::Address => self.decode_nest(r),
            Self::List(item) | Self::ListN(_, item) => {
                let mut items = vec![];
                while !r.is_consumed() {
                    let offset = r.offset();
                    items.push(item.decode_nest(r)?);
                    // An item that reads nothing can never exhaust the input.
                    if r.offset() == offset {
                        return Err(CodecError::TrailingBytes {
                            remaining: r.remaining(),
                        });
                    }
                }
                Ok(Value::List(items))
            }
            Self::Option(inner) => {
                if r.is_consumed() {
                    return Ok(Value::Option(None));
                }
                match r.read_u8()? {
                    1 => Ok(Value::Option(Some(Box::new(inner.decode_nest(r)?)))),
                    byte => Err(CodecError::InvalidOptionEncoding { top: true, byte }),
                }
            }
        }
    }

    pub fn decode_nest(&self, r: &mut ByteReader<'_>) -> CodecResult<Value> {
        match self {
            Self::Buffer => Ok(Value::Bytes(read_prefixed(r)?.to_vec())),
            Self::CstBuffer(Some(n)) => Ok(Value::Bytes(r.read_exact(*n)?.to_vec())),
            Self::CstBuffer(None) => Ok(Value::Bytes(r.read_remaining().to_vec())),
            Self::Str => Ok(Value::Str(String::from_utf8(read_prefixed(r)?.to_vec())?)),
            Self::Address => Ok(Value::Address(Address::from_bytes(
                r.read_exact(ADDRESS_LENGTH)?,
            )?)),
            Self::Bool => decode_bool(r.read_exact(1)?),
            Self::Uint(byte_length) => {
                let bytes = match byte_length {
                    Some(n) => r.read_exact(*n)?,
                    None => read_prefixed(r)?,
                };
                Ok(Value::Uint(uint_from_bytes(bytes)))
            }
            Self::Int(byte_length) => {
                let bytes = match byte_length {
                    Some(n) => r.read_exact(*n)?,
                    None => read_prefixed(r)?,
                };
                Ok(Value::Int(int_from_bytes(bytes)))
            }
            Self::Tuple(decoders) => decoders
                .iter()
                .map(|d| d.decode_nest(r))
                .collect::<CodecResult<Vec<_>>>()
                .map(Value::Tuple),
            Self::List(item) => {
                let len = r.read_u32()?;
                decode_items(item, len as usize, r)
            }
            Self::ListN(len, item) => decode_items(item, *len, r),
            Self::Option(inner) => match r.read_u8()? {
                0 => Ok(Value::Option(None)),
                1 => Ok(Value::Option(Some(Box::new(inner.decode_nest(r)?)))),
                byte => Err(CodecError::InvalidOptionEncoding { top: false, byte }),
            },
        }
    }
}

fn read_prefixed<'a>(r: &mut ByteReader<'a>) -> CodecResult<&'a [u8]> {
    let len = r.read_u32()?;
    r.read_exact(len as usize)
}

// The count comes from untrusted input, so items are pushed one by one rather than reserved.
fn decode_items(item: &Decoder, len: usize, r: &mut ByteReader<'_>) -> CodecResult<Value> {
    let mut items = vec![];
    for _ in 0..len {
        items.push(item.decode_nest(r)?);
    }
    Ok(Value::List(items))
}

fn decode_bool(bytes: &[u8]) -> CodecResult<Value> {
    match bytes {
        [] | [0] => Ok(Value::Bool(false)),
        [1] => Ok(Value::Bool(true)),
        [byte, ..] => Err(CodecError::InvalidBoolEncoding(*byte)),
    }
}

#[cfg(test)]
#[path = "unit_tests/decoder_tests.rs"]
mod decoder_tests;
