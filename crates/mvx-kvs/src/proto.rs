// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Protobuf messages stored as ESDT values.
//!
//! Field numbers are fixed by the protocol. Proto3 rules apply: scalar fields holding their
//! default value are not written, so a message with every field at its default encodes to no
//! bytes at all.

/// Value of a token balance key.
#[derive(Clone, PartialEq, prost::Message)]
pub struct EsdtSystem {
    #[prost(uint64, tag = "1")]
    pub r#type: u64,
    // Sign byte followed by the big-endian amount.
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub properties: Vec<u8>,
    #[prost(message, optional, tag = "4")]
    pub metadata: Option<EsdtMetadata>,
    #[prost(bytes = "vec", tag = "5")]
    pub reserved: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct EsdtMetadata {
    #[prost(uint64, tag = "1")]
    pub nonce: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub name: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub creator: Vec<u8>,
    #[prost(uint64, tag = "4")]
    pub royalties: u64,
    #[prost(bytes = "vec", tag = "5")]
    pub hash: Vec<u8>,
    #[prost(string, repeated, tag = "6")]
    pub uris: Vec<String>,
    #[prost(bytes = "vec", tag = "7")]
    pub attributes: Vec<u8>,
}

/// Value of a token roles key.
#[derive(Clone, PartialEq, prost::Message)]
pub struct EsdtRoles {
    #[prost(string, repeated, tag = "1")]
    pub roles: Vec<String>,
}
