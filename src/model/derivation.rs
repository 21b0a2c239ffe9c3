//! BIP-44 path assembly: `[fingerprint]/purpose'/coin'/account'/chain/address`.

use super::master::MasterCells;
use super::parse_index;
use crate::attribute::{Attribute, Graph, Handle};
use crate::core::names::path as names;
use crate::error::{Error, Result};
use crate::path::{DerivationPath, DerivationStep};
use crate::use_info::UseInfo;
use std::fmt;
use std::str::FromStr;

/// BIP-44 change level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainType { #[default] External, Internal }

impl ChainType {
    pub fn as_str(&self) -> &'static str {
        match self { ChainType::External => "external", ChainType::Internal => "internal" }
    }

    pub fn index(&self) -> u32 {
        match self { ChainType::External => 0, ChainType::Internal => 1 }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ChainType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "external" | "0" => Ok(ChainType::External),
            "internal" | "change" | "1" => Ok(ChainType::Internal),
            other => Err(Error::parse(format!("unknown chain type '{other}' (expected external | internal)"))),
        }
    }
}

pub struct PathCells {
    pub purpose: Handle<u32>,
    pub coin_type: Handle<u32>,
    pub account_index: Handle<u32>,
    pub account: Handle<DerivationPath>,
    pub chain_type: Handle<ChainType>,
    pub address_index: Handle<u32>,
    pub full_address: Handle<DerivationPath>,
}

fn index_cell(name: &'static str, help: &'static str) -> Handle<u32> {
    Attribute::new(name, "INDEX", help, |i: &u32| i.to_string(), parse_index)
}

impl PathCells {
    pub(super) fn setup(graph: &mut Graph, master: &MasterCells) -> Self {
        let purpose = graph.register(index_cell(names::PURPOSE, "The BIP-43 purpose field."));
        let coin_type = graph.register(index_cell(names::COIN_TYPE, "The SLIP-44 coin type."));
        let account_index = graph.register(index_cell(names::ACCOUNT_INDEX, "The BIP-44 account index."));
        let account: Handle<DerivationPath> = graph.register(Attribute::textual(names::ACCOUNT, "BIP32_PATH", "The BIP-44 account derivation path."));
        let chain_type: Handle<ChainType> = graph.register(Attribute::textual(names::CHAIN_TYPE, "ENUM external | internal", "The BIP-44 change level."));
        let address_index = graph.register(index_cell(names::ADDRESS_INDEX, "The BIP-44 address index."));
        let full_address: Handle<DerivationPath> = graph.register(Attribute::textual(
            names::FULL_ADDRESS,
            "BIP32_PATH",
            "The complete BIP-44 derivation path down to one address.",
        ));

        graph.document("purpose (default: 44)");
        purpose.default_value(44);

        graph.document("coin-type <- [asset, network]");
        coin_type.derive_from((master.asset.clone(), master.network.clone()), |(asset, network)| {
            Ok(Some(UseInfo::new(asset.value()?, network.value()?).coin_type()))
        });

        graph.document("account-index (default: 0)");
        account_index.default_value(0);

        graph.document("account-derivation-path <- [master-key-fingerprint, purpose, coin-type, account-index]");
        account.derive_from(
            (master.master_key_fingerprint.clone(), purpose.clone(), coin_type.clone(), account_index.clone()),
            |(fingerprint, purpose, coin_type, account_index)| {
                let steps = vec![
                    DerivationStep::hardened(purpose.value()?)?,
                    DerivationStep::hardened(coin_type.value()?)?,
                    DerivationStep::hardened(account_index.value()?)?,
                ];
                Ok(Some(DerivationPath::new(steps, fingerprint.optional_value()?, None)))
            },
        );

        graph.document("chain-type (default: external)");
        chain_type.default_value(ChainType::External);

        graph.document("full-address-derivation-path <- [account-derivation-path, chain-type, address-index]");
        full_address.derive_from(
            (account.clone(), chain_type.clone(), address_index.clone()),
            |(account, chain_type, address_index)| {
                let Some(address_index) = address_index.optional_value()? else {
                    return Ok(None);
                };
                let Some(account) = account.optional_value()? else {
                    return Ok(None);
                };
                let tail = vec![DerivationStep::normal(chain_type.value()?.index())?, DerivationStep::normal(address_index)?];
                Ok(Some(account.append(&DerivationPath::new(tail, None, None))))
            },
        );

        Self { purpose, coin_type, account_index, account, chain_type, address_index, full_address }
    }
}
