// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while building or decoding encodable values.
///
/// Range checks fail at construction time, malformed input fails at decode time. Nothing is
/// recovered partially: a value either encodes/decodes completely or the call returns one of
/// these.
#[derive(Eq, PartialEq, Clone, Debug, Error, Hash)]
pub enum CodecError {
    #[error("Number is negative: {0}")]
    NegativeValue(String),
    #[error("Number {value} above maximal value allowed for {byte_length} byte(s)")]
    Overflow { value: String, byte_length: usize },
    #[error("Number {value} below minimal value allowed for {byte_length} byte(s)")]
    Underflow { value: String, byte_length: usize },

    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),
    #[error("Invalid address length: expected {expected} bytes, got {actual}")]
    InvalidAddressLength { expected: usize, actual: usize },

    #[error("Not all bytes have been read: {remaining} byte(s) left")]
    TrailingBytes { remaining: usize },
    #[error("Cannot read {requested} byte(s), only {remaining} remaining")]
    NotEnoughBytes { requested: usize, remaining: usize },
    /// `top` tells whether the discriminant was read from a top-encoding (where only `0x01` is
    /// valid) or from a nest-encoding (where `0x00` and `0x01` are valid).
    #[error("Invalid Option encoding: unexpected discriminant {byte:#04x}")]
    InvalidOptionEncoding { top: bool, byte: u8 },
    #[error("Invalid bool encoding: expected 0 or 1, found {0}")]
    InvalidBoolEncoding(u8),
    #[error("Invalid UTF-8 string")]
    InvalidUtf8,
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Decoded {kind} does not fit into the requested type")]
    ValueTooLarge { kind: &'static str },
    #[error("Expected a decoded {expected}, found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },
}

impl From<hex::FromHexError> for CodecError {
    fn from(err: hex::FromHexError) -> Self {
        CodecError::InvalidHex(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for CodecError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        CodecError::InvalidUtf8
    }
}
