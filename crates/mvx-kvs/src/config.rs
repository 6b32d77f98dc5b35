// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::{Context, Result};
use mvx_codec::{Address, CodecResult, DEFAULT_HRP};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Storage key prefixes and address presentation used when building and decoding pairs.
///
/// Every field has a default matching the main network, so an empty YAML document is a valid
/// configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct KvsConfig {
    #[serde(default = "default_address_hrp")]
    pub address_hrp: String,
    /// Prefix of the key holding a token balance (and metadata, for NFT/SFT instances).
    #[serde(default = "default_esdt_key_prefix")]
    pub esdt_key_prefix: String,
    /// Prefix of the key holding the last nonce created for a token.
    #[serde(default = "default_esdt_nonce_key_prefix")]
    pub esdt_nonce_key_prefix: String,
    #[serde(default = "default_esdt_roles_key_prefix")]
    pub esdt_roles_key_prefix: String,
}

fn default_address_hrp() -> String {
    DEFAULT_HRP.to_string()
}

fn default_esdt_key_prefix() -> String {
    "ELRONDesdt".to_string()
}

fn default_esdt_nonce_key_prefix() -> String {
    "ELRONDnonce".to_string()
}

fn default_esdt_roles_key_prefix() -> String {
    "ELRONDroleesdt".to_string()
}

impl Default for KvsConfig {
    fn default() -> Self {
        Self {
            address_hrp: default_address_hrp(),
            esdt_key_prefix: default_esdt_key_prefix(),
            esdt_nonce_key_prefix: default_esdt_nonce_key_prefix(),
            esdt_roles_key_prefix: default_esdt_roles_key_prefix(),
        }
    }
}

impl KvsConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading kvs config from {:?}", path);
        let contents =
            std::fs::read_to_string(path).context(format!("cannot open {:?}", path))?;
        Self::from_yaml(&contents).context(format!("cannot parse {:?}", path))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn parse_address(&self, s: &str) -> CodecResult<Address> {
        Address::parse_with_hrp(s, &self.address_hrp)
    }

    pub fn format_address(&self, address: &Address) -> CodecResult<String> {
        address.to_bech32_with_hrp(&self.address_hrp)
    }
}
