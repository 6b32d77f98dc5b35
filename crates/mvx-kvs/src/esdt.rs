// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! ESDT token storage.
//!
//! A token instance is stored under `<esdt prefix><id>[<nonce>]` where the nonce is the minimal
//! big-endian encoding and is left out for the fungible instance (nonce 0). Its value is an
//! [`EsdtSystem`] message. Token-wide data lives under `<nonce prefix><id>` (last created nonce)
//! and `<roles prefix><id>` (an [`EsdtRoles`] message).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use mvx_codec::{Address, Decoder, Encodable};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use prost::Message;
use tracing::{debug, trace};

use crate::config::KvsConfig;
use crate::error::{KvsError, KvsResult};
use crate::kvs::{Kv, Kvs};
use crate::proto::{EsdtMetadata, EsdtRoles, EsdtSystem};

/// Length of the random suffix of a token identifier, after the dash.
const TOKEN_ID_SUFFIX_LEN: usize = 6;

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Debug, Hash)]
pub enum EsdtRole {
    LocalMint,
    LocalBurn,
    Transfer,
    NftCreate,
    NftBurn,
    NftUpdateAttributes,
    NftAddUri,
    NftAddQuantity,
    /// A role name this crate does not know about, kept verbatim.
    Other(String),
}

impl EsdtRole {
    pub fn as_str(&self) -> &str {
        match self {
            EsdtRole::LocalMint => "ESDTRoleLocalMint",
            EsdtRole::LocalBurn => "ESDTRoleLocalBurn",
            EsdtRole::Transfer => "ESDTTransferRole",
            EsdtRole::NftCreate => "ESDTRoleNFTCreate",
            EsdtRole::NftBurn => "ESDTRoleNFTBurn",
            EsdtRole::NftUpdateAttributes => "ESDTRoleNFTUpdateAttributes",
            EsdtRole::NftAddUri => "ESDTRoleNFTAddURI",
            EsdtRole::NftAddQuantity => "ESDTRoleNFTAddQuantity",
            EsdtRole::Other(name) => name,
        }
    }
}

impl From<&str> for EsdtRole {
    fn from(s: &str) -> Self {
        match s {
            "ESDTRoleLocalMint" => EsdtRole::LocalMint,
            "ESDTRoleLocalBurn" => EsdtRole::LocalBurn,
            "ESDTTransferRole" => EsdtRole::Transfer,
            "ESDTRoleNFTCreate" => EsdtRole::NftCreate,
            "ESDTRoleNFTBurn" => EsdtRole::NftBurn,
            "ESDTRoleNFTUpdateAttributes" => EsdtRole::NftUpdateAttributes,
            "ESDTRoleNFTAddURI" => EsdtRole::NftAddUri,
            "ESDTRoleNFTAddQuantity" => EsdtRole::NftAddQuantity,
            other => EsdtRole::Other(other.to_string()),
        }
    }
}

impl FromStr for EsdtRole {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl fmt::Display for EsdtRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Description of one token instance held by an account.
///
/// `None` means "not described": no pair is produced for it when building, and it was not found
/// (or held its default) when decoding. Metadata fields only apply to instances with a non-zero
/// nonce. Roles and last nonce are token-wide; decoding attaches them to the nonce-0 entry.
#[derive(Eq, PartialEq, Clone, Debug, Default)]
pub struct Esdt {
    pub id: String,
    pub nonce: u64,
    pub amount: Option<BigUint>,
    pub roles: Option<Vec<EsdtRole>>,
    pub last_nonce: Option<u64>,
    pub name: Option<Vec<u8>>,
    pub creator: Option<Address>,
    pub royalties: Option<u64>,
    pub hash: Option<Vec<u8>>,
    pub uris: Option<Vec<String>>,
    pub attributes: Option<Vec<u8>>,
}

impl Esdt {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn fungible(id: impl Into<String>, amount: impl Into<BigUint>) -> Self {
        Self {
            amount: Some(amount.into()),
            ..Self::new(id)
        }
    }

    pub fn instance(id: impl Into<String>, nonce: u64, amount: impl Into<BigUint>) -> Self {
        Self {
            nonce,
            amount: Some(amount.into()),
            ..Self::new(id)
        }
    }

    fn describes_instance(&self) -> bool {
        self.amount.is_some()
            || self.name.is_some()
            || self.creator.is_some()
            || self.royalties.is_some()
            || self.hash.is_some()
            || self.uris.is_some()
            || self.attributes.is_some()
    }

    /// Metadata with defaults left out, or `None` if nothing is left.
    fn metadata(&self) -> Option<EsdtMetadata> {
        if self.nonce == 0 {
            return None;
        }
        let metadata = EsdtMetadata {
            nonce: 0,
            name: self.name.clone().unwrap_or_default(),
            creator: self.creator.map(|c| c.to_vec()).unwrap_or_default(),
            royalties: self.royalties.unwrap_or_default(),
            hash: self.hash.clone().unwrap_or_default(),
            uris: self.uris.clone().unwrap_or_default(),
            attributes: self.attributes.clone().unwrap_or_default(),
        };
        (metadata != EsdtMetadata::default()).then(|| EsdtMetadata {
            nonce: self.nonce,
            ..metadata
        })
    }

    fn system_message(&self) -> EsdtSystem {
        let amount = self.amount.clone().unwrap_or_default();
        let metadata = self.metadata();
        let mut message = EsdtSystem::default();
        if self.nonce != 0 && (!amount.is_zero() || metadata.is_some()) {
            message.r#type = 1;
        }
        if metadata.is_some() {
            message.properties = vec![1];
        }
        if metadata.is_some() || !amount.is_zero() {
            // Leading sign byte, then the magnitude; zero is written as a single 0.
            message.value = vec![0];
            if amount.is_zero() {
                message.value.push(0);
            } else {
                message.value.extend(amount.to_bytes_be());
            }
        }
        message.metadata = metadata;
        message
    }
}

pub fn esdt_pairs(esdts: &[Esdt]) -> Vec<Kv> {
    esdt_pairs_with_config(esdts, &KvsConfig::default())
}

pub fn esdt_pairs_with_config(esdts: &[Esdt], config: &KvsConfig) -> Vec<Kv> {
    let kvs: Vec<Kv> = esdts
        .iter()
        .flat_map(|esdt| single_esdt_pairs(esdt, config))
        .collect();
    trace!(tokens = esdts.len(), pairs = kvs.len(), "built esdt pairs");
    kvs
}

fn single_esdt_pairs(esdt: &Esdt, config: &KvsConfig) -> Vec<Kv> {
    let mut kvs = vec![];
    if esdt.describes_instance() {
        let mut key = format!("{}{}", config.esdt_key_prefix, esdt.id).into_bytes();
        if esdt.nonce != 0 {
            Encodable::u64(esdt.nonce).write_top(&mut key);
        }
        kvs.push((key, esdt.system_message().encode_to_vec()));
    }
    if let Some(last_nonce) = esdt.last_nonce {
        kvs.push((
            format!("{}{}", config.esdt_nonce_key_prefix, esdt.id).into_bytes(),
            Encodable::big_uint(last_nonce).to_top_bytes(),
        ));
    }
    if let Some(roles) = &esdt.roles {
        let message = EsdtRoles {
            roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
        };
        kvs.push((
            format!("{}{}", config.esdt_roles_key_prefix, esdt.id).into_bytes(),
            message.encode_to_vec(),
        ));
    }
    kvs
}

pub fn decode_esdts(kvs: &Kvs) -> KvsResult<Vec<Esdt>> {
    decode_esdts_with_config(kvs, &KvsConfig::default())
}

/// Reconstructs token descriptions from a storage snapshot.
///
/// Pairs with an empty value are absent. The result is sorted by token id, then nonce.
pub fn decode_esdts_with_config(kvs: &Kvs, config: &KvsConfig) -> KvsResult<Vec<Esdt>> {
    let mut esdts: BTreeMap<(String, u64), Esdt> = BTreeMap::new();

    for (suffix, value) in kvs.iter_prefix(config.esdt_roles_key_prefix.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        let id = token_id(suffix)?;
        let roles = EsdtRoles::decode(value)?;
        entry(&mut esdts, id, 0).roles =
            Some(roles.roles.iter().map(|r| EsdtRole::from(r.as_str())).collect());
    }

    for (suffix, value) in kvs.iter_prefix(config.esdt_nonce_key_prefix.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        let id = token_id(suffix)?;
        let last_nonce = Decoder::big_uint().from_top(value)?.as_u64()?;
        entry(&mut esdts, id, 0).last_nonce = Some(last_nonce);
    }

    for (suffix, value) in kvs.iter_prefix(config.esdt_key_prefix.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        let (id, nonce) = match split_instance_key(suffix) {
            Ok(parts) => parts,
            Err(err) => {
                debug!(key = hex::encode(suffix), "skipping esdt key: {err}");
                continue;
            }
        };
        let message = EsdtSystem::decode(value)?;
        apply_system_message(entry(&mut esdts, id, nonce), message)?;
    }

    trace!(tokens = esdts.len(), "decoded esdt pairs");
    Ok(esdts.into_values().collect())
}

fn entry(esdts: &mut BTreeMap<(String, u64), Esdt>, id: String, nonce: u64) -> &mut Esdt {
    esdts.entry((id.clone(), nonce)).or_insert_with(|| Esdt {
        nonce,
        ..Esdt::new(id)
    })
}

fn apply_system_message(esdt: &mut Esdt, message: EsdtSystem) -> KvsResult<()> {
    let amount = match message.value.split_first() {
        Some((0, magnitude)) => BigUint::from_bytes_be(magnitude),
        Some((sign, _)) => {
            return Err(KvsError::InvalidMessage(format!(
                "unexpected amount sign byte {sign:#04x}"
            )))
        }
        None => BigUint::zero(),
    };
    esdt.amount = Some(amount);

    if let Some(metadata) = message.metadata {
        let non_empty = |bytes: Vec<u8>| (!bytes.is_empty()).then_some(bytes);
        esdt.name = non_empty(metadata.name);
        esdt.creator = non_empty(metadata.creator)
            .map(Address::try_from)
            .transpose()?;
        esdt.royalties = (metadata.royalties != 0).then_some(metadata.royalties);
        esdt.hash = non_empty(metadata.hash);
        esdt.uris = (!metadata.uris.is_empty()).then_some(metadata.uris);
        esdt.attributes = non_empty(metadata.attributes);
    }
    Ok(())
}

fn token_id(bytes: &[u8]) -> KvsResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| KvsError::InvalidTokenKey(hex::encode(bytes)))
}

/// Splits `<ticker>-<6 chars><nonce bytes>` into the token identifier and its nonce. A key
/// without a dash is an identifier with no nonce.
fn split_instance_key(bytes: &[u8]) -> KvsResult<(String, u64)> {
    let id_len = match bytes.iter().position(|b| *b == b'-') {
        Some(dash) => dash + 1 + TOKEN_ID_SUFFIX_LEN,
        None => bytes.len(),
    };
    if id_len > bytes.len() {
        return Err(KvsError::InvalidTokenKey(hex::encode(bytes)));
    }
    let (id, nonce) = bytes.split_at(id_len);
    let nonce = BigUint::from_bytes_be(nonce)
        .to_u64()
        .ok_or_else(|| KvsError::InvalidTokenKey(hex::encode(bytes)))?;
    Ok((token_id(id)?, nonce))
}

#[cfg(test)]
#[path = "unit_tests/esdt_tests.rs"]
mod esdt_tests;
