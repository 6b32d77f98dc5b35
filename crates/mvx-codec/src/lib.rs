// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Binary codec for smart contract values.
//!
//! Every value has two renderings. The *top* encoding is the minimal form of a value that stands
//! alone (a storage value, a return value). The *nest* encoding is self-delimiting so that values
//! can be concatenated (call arguments, tuple fields, list items, storage key segments).
//!
//! ```
//! use mvx_codec::{Decoder, Encodable};
//!
//! let pair = Encodable::tuple([Encodable::u32(1234), Encodable::i32(-2)]);
//! assert_eq!(pair.to_top_hex(), "000004d2fffffffe");
//!
//! let decoded = Decoder::tuple([Decoder::u32(), Decoder::i32()])
//!     .from_top(pair.to_top_bytes())
//!     .unwrap();
//! assert_eq!(decoded.into_tuple().unwrap()[0].as_u64().unwrap(), 1234);
//! ```

pub mod address;
pub mod decoder;
pub mod encodable;
pub mod error;
pub mod reader;
pub mod scalar;
pub mod value;

pub use address::{Address, ADDRESS_LENGTH, DEFAULT_HRP};
pub use decoder::Decoder;
pub use encodable::Encodable;
pub use error::{CodecError, CodecResult};
pub use reader::ByteReader;
pub use value::Value;
