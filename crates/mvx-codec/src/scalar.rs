// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Integer and buffer primitives shared by every encodable.
//!
//! Integers are arbitrary precision. A declared byte length fixes the nested width and bounds the
//! accepted range; without one, the nested form falls back to a 4-byte length prefix followed by
//! the top-encoding.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, Zero};

use crate::error::{CodecError, CodecResult};

/// Size of the big-endian length/count prefix used by variable-size nested values.
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// An unsigned integer, optionally bound to a fixed byte width.
#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub struct UintValue {
    value: BigUint,
    byte_length: Option<usize>,
}

impl UintValue {
    pub fn new(value: impl Into<BigInt>, byte_length: Option<usize>) -> CodecResult<Self> {
        let value: BigInt = value.into();
        let Some(value) = value.to_biguint() else {
            return Err(CodecError::NegativeValue(value.to_string()));
        };
        if let Some(byte_length) = byte_length {
            if value.bits() > 8 * byte_length as u64 {
                return Err(CodecError::Overflow {
                    value: value.to_string(),
                    byte_length,
                });
            }
        }
        Ok(Self { value, byte_length })
    }

    /// Builds an unbounded value; an unsigned bigint is always in range.
    pub fn unbounded(value: BigUint) -> Self {
        Self {
            value,
            byte_length: None,
        }
    }

    /// For machine integers whose type already bounds them to `byte_length`.
    pub(crate) fn fixed(value: impl Into<BigUint>, byte_length: usize) -> Self {
        Self {
            value: value.into(),
            byte_length: Some(byte_length),
        }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn byte_length(&self) -> Option<usize> {
        self.byte_length
    }

    /// Big-endian bytes without leading zeros. Zero encodes to nothing.
    pub fn top_bytes(&self) -> Vec<u8> {
        uint_to_minimal_bytes(&self.value)
    }

    pub fn write_top(&self, out: &mut Vec<u8>) {
        out.extend(self.top_bytes());
    }

    pub fn write_nest(&self, out: &mut Vec<u8>) {
        let top = self.top_bytes();
        match self.byte_length {
            Some(byte_length) => {
                out.resize(out.len() + byte_length - top.len(), 0);
                out.extend(top);
            }
            None => write_prefixed(out, &top),
        }
    }
}

/// A signed integer, optionally bound to a fixed byte width.
#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub struct IntValue {
    value: BigInt,
    byte_length: Option<usize>,
}

impl IntValue {
    pub fn new(value: impl Into<BigInt>, byte_length: Option<usize>) -> CodecResult<Self> {
        let value: BigInt = value.into();
        if let Some(byte_length) = byte_length {
            check_signed_range(&value, byte_length)?;
        }
        Ok(Self { value, byte_length })
    }

    pub fn unbounded(value: BigInt) -> Self {
        Self {
            value,
            byte_length: None,
        }
    }

    pub(crate) fn fixed(value: impl Into<BigInt>, byte_length: usize) -> Self {
        Self {
            value: value.into(),
            byte_length: Some(byte_length),
        }
    }

    pub fn value(&self) -> &BigInt {
        &self.value
    }

    pub fn byte_length(&self) -> Option<usize> {
        self.byte_length
    }

    /// Minimal two's-complement bytes whose leading bit still carries the sign.
    pub fn top_bytes(&self) -> Vec<u8> {
        twos_complement(&self.value, unambiguous_num_bytes(&self.value))
    }

    pub fn write_top(&self, out: &mut Vec<u8>) {
        out.extend(self.top_bytes());
    }

    pub fn write_nest(&self, out: &mut Vec<u8>) {
        match self.byte_length {
            Some(byte_length) => out.extend(twos_complement(&self.value, byte_length)),
            None => write_prefixed(out, &self.top_bytes()),
        }
    }
}

fn check_signed_range(value: &BigInt, byte_length: usize) -> CodecResult<()> {
    if byte_length == 0 {
        return match value.sign() {
            Sign::NoSign => Ok(()),
            Sign::Plus => Err(CodecError::Overflow {
                value: value.to_string(),
                byte_length,
            }),
            Sign::Minus => Err(CodecError::Underflow {
                value: value.to_string(),
                byte_length,
            }),
        };
    }
    let bound = BigInt::one() << (8 * byte_length - 1);
    if *value >= bound {
        return Err(CodecError::Overflow {
            value: value.to_string(),
            byte_length,
        });
    }
    if *value < -bound {
        return Err(CodecError::Underflow {
            value: value.to_string(),
            byte_length,
        });
    }
    Ok(())
}

/// Number of bytes needed so that the two's-complement form of `value` can be read back
/// unambiguously, i.e. the high bit of the leading byte is the sign bit.
///
/// Negative values are folded onto `-value - 1` so that both signs share the same threshold:
/// a byte is added as long as the remaining magnitude does not fit in 7 bits.
pub fn unambiguous_num_bytes(value: &BigInt) -> usize {
    if value.is_zero() {
        return 0;
    }
    let mut magnitude = if value.is_negative() {
        -value - BigInt::one()
    } else {
        value.clone()
    };
    let threshold = BigInt::from(0x80u8);
    let mut num_bytes = 1;
    while magnitude >= threshold {
        magnitude >>= 8;
        num_bytes += 1;
    }
    num_bytes
}

/// Big-endian two's complement of `value` over exactly `num_bytes` bytes. The caller guarantees
/// that `value` fits.
pub fn twos_complement(value: &BigInt, num_bytes: usize) -> Vec<u8> {
    if num_bytes == 0 {
        return vec![];
    }
    let bytes = value.to_signed_bytes_be();
    let fill = if value.is_negative() { 0xff } else { 0x00 };
    let mut out = vec![fill; num_bytes.saturating_sub(bytes.len())];
    out.extend_from_slice(&bytes[bytes.len().saturating_sub(num_bytes)..]);
    out
}

pub fn uint_to_minimal_bytes(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        return vec![];
    }
    value.to_bytes_be()
}

pub fn uint_from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Reads `bytes` as big-endian two's complement. An empty slice is zero.
pub fn int_from_bytes(bytes: &[u8]) -> BigInt {
    if bytes.is_empty() {
        return BigInt::zero();
    }
    BigInt::from_signed_bytes_be(bytes)
}

/// Appends the 4-byte big-endian length of `bytes` followed by `bytes` themselves.
pub fn write_prefixed(out: &mut Vec<u8>, bytes: &[u8]) {
    write_length(out, bytes.len());
    out.extend_from_slice(bytes);
}

/// Writes a 4-byte big-endian length or count.
///
/// The VM cannot represent lengths above `u32::MAX`. Such lengths are a caller bug: debug builds
/// panic, release builds truncate to the low 32 bits.
pub fn write_length(out: &mut Vec<u8>, len: usize) {
    debug_assert!(
        u32::try_from(len).is_ok(),
        "length {len} does not fit the 4-byte prefix"
    );
    out.extend_from_slice(&(len as u32).to_be_bytes());
}

#[cfg(test)]
#[path = "unit_tests/scalar_tests.rs"]
mod scalar_tests;
