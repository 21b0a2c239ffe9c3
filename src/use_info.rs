//! Use info - which asset and network a key is meant for.

use crate::core::tags;
use crate::error::{Error, Result};
use crate::wire::{self, MapReader};
use ciborium::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network { #[default] Mainnet, Testnet }

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self { Network::Mainnet => "mainnet", Network::Testnet => "testnet" }
    }

    pub fn code(&self) -> u64 {
        match self { Network::Mainnet => 0, Network::Testnet => 1 }
    }

    pub fn from_code(code: u64) -> Result<Self> {
        match code {
            0 => Ok(Network::Mainnet),
            1 => Ok(Network::Testnet),
            _ => Err(Error::codec(format!("unknown network code {code}"))),
        }
    }

    pub fn kind(&self) -> bitcoin::NetworkKind {
        match self { Network::Mainnet => bitcoin::NetworkKind::Main, Network::Testnet => bitcoin::NetworkKind::Test }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            other => Err(Error::parse(format!("unknown network '{other}' (expected mainnet | testnet)"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Asset { #[default] Btc, Eth }

impl Asset {
    pub fn as_str(&self) -> &'static str {
        match self { Asset::Btc => "btc", Asset::Eth => "eth" }
    }

    /// SLIP-44 coin type.
    pub fn coin_type(&self) -> u32 {
        match self { Asset::Btc => 0, Asset::Eth => 60 }
    }

    pub fn from_coin_type(coin_type: u64) -> Result<Self> {
        match coin_type {
            0 => Ok(Asset::Btc),
            60 => Ok(Asset::Eth),
            _ => Err(Error::codec(format!("unknown asset coin type {coin_type}"))),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Asset {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "btc" => Ok(Asset::Btc),
            "eth" => Ok(Asset::Eth),
            other => Err(Error::parse(format!("unknown asset '{other}' (expected btc | eth)"))),
        }
    }
}

/// Asset + network pair carried by key requests (`crypto-coin-info`, tag 305).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UseInfo {
    pub asset: Asset,
    pub network: Network,
}

impl UseInfo {
    pub fn new(asset: Asset, network: Network) -> Self { Self { asset, network } }

    /// Coin type for the BIP-44 path: testnets share coin type 1.
    pub fn coin_type(&self) -> u32 {
        match self.network { Network::Testnet => 1, Network::Mainnet => self.asset.coin_type() }
    }

    pub fn to_tagged_value(&self) -> Value {
        wire::tagged(tags::USE_INFO, wire::map(vec![
            (1, wire::uint(self.asset.coin_type())),
            (2, wire::uint(self.network.code())),
        ]))
    }

    pub fn from_tagged_value(value: Value) -> Result<Self> {
        let mut map = MapReader::new(wire::untag(value, tags::USE_INFO)?, "use-info")?;
        let asset = Asset::from_coin_type(wire::as_u64(&map.require(1)?, "use-info asset")?)?;
        let network = Network::from_code(wire::as_u64(&map.require(2)?, "use-info network")?)?;
        map.finish()?;
        Ok(Self { asset, network })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_type() {
        assert_eq!(UseInfo::new(Asset::Btc, Network::Mainnet).coin_type(), 0);
        assert_eq!(UseInfo::new(Asset::Eth, Network::Mainnet).coin_type(), 60);
        assert_eq!(UseInfo::new(Asset::Eth, Network::Testnet).coin_type(), 1);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("TESTNET".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("eth".parse::<Asset>().unwrap(), Asset::Eth);
        assert!(matches!("doge".parse::<Asset>(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_cbor() {
        let info = UseInfo::new(Asset::Eth, Network::Testnet);
        let bytes = wire::to_bytes(&info.to_tagged_value()).unwrap();
        // d9 0131 a2 01 18 3c 02 01
        assert_eq!(bytes, vec![0xd9, 0x01, 0x31, 0xa2, 0x01, 0x18, 0x3c, 0x02, 0x01]);
        assert_eq!(UseInfo::from_tagged_value(wire::from_bytes(&bytes).unwrap()).unwrap(), info);
    }
}
