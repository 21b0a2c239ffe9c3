//! HD keys - thin layer over `bitcoin::bip32` plus seed material.
//!
//! The elliptic-curve arithmetic lives entirely in the `bitcoin` crate;
//! this module only decides what gets derived and how keys are rendered.
//!
//! ```text
//! Seed ──from_seed──▶ HdKey (master, private)
//!                       │
//!                       └──derive(kind, path, derivable)──▶ HdKey (origin = parent origin + path)
//! ```

use crate::core::tags;
use crate::error::{Error, Result};
use crate::path::DerivationPath;
use crate::use_info::Network;
use crate::wire::{self, MapReader, Transport};
use bitcoin::bip32::{ChildNumber, Xpriv, Xpub};
use bitcoin::secp256k1::{All, Secp256k1};
use ciborium::Value;
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

static SECP: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyType { #[default] Private, Public }

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self { KeyType::Private => "private", KeyType::Public => "public" }
    }

    pub fn is_private(&self) -> bool { matches!(self, KeyType::Private) }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for KeyType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "private" => Ok(KeyType::Private),
            "public" => Ok(KeyType::Public),
            other => Err(Error::parse(format!("unknown key type '{other}' (expected private | public)"))),
        }
    }
}

/// BIP-32 seed bytes (16..=64). Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed(Vec<u8>);

impl Seed {
    pub const MIN_LEN: usize = 16;
    pub const MAX_LEN: usize = 64;

    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&bytes.len()) {
            return Err(Error::parse(format!("seed must be {}..={} bytes, got {}", Self::MIN_LEN, Self::MAX_LEN, bytes.len())));
        }
        Ok(Self(bytes))
    }

    /// BIP-39 seed for a mnemonic with an empty passphrase.
    pub fn from_mnemonic(words: &str) -> Result<Self> {
        let mnemonic = bip39::Mnemonic::parse_normalized(words).map_err(|e| Error::parse(format!("invalid mnemonic: {e}")))?;
        Self::new(mnemonic.to_seed("").to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    /// SHA-256 of the seed bytes; identifies a seed without revealing it.
    pub fn digest(&self) -> [u8; 32] { Sha256::digest(&self.0).into() }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Seed(<{} bytes>)", self.0.len()) }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&hex::encode(&self.0)) }
}

impl FromStr for Seed {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(hex::decode(s.trim()).map_err(|e| Error::parse(format!("seed hex: {e}")))?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ExtendedKey {
    Private(Xpriv),
    Public(Xpub),
}

/// An extended key with its derivability flag and optional origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdKey {
    key: ExtendedKey,
    is_derivable: bool,
    origin: Option<DerivationPath>,
}

impl HdKey {
    /// Master key for a seed.
    pub fn from_seed(seed: &Seed, network: Network) -> Result<Self> {
        let xprv = Xpriv::new_master(network.kind(), seed.as_bytes())?;
        Ok(Self::from_xpriv(xprv))
    }

    pub fn from_xpriv(xprv: Xpriv) -> Self { Self { key: ExtendedKey::Private(xprv), is_derivable: true, origin: None } }
    pub fn from_xpub(xpub: Xpub) -> Self { Self { key: ExtendedKey::Public(xpub), is_derivable: true, origin: None } }

    pub fn is_private(&self) -> bool { matches!(self.key, ExtendedKey::Private(_)) }

    pub fn key_type(&self) -> KeyType {
        if self.is_private() { KeyType::Private } else { KeyType::Public }
    }

    pub fn is_derivable(&self) -> bool { self.is_derivable }
    pub fn origin(&self) -> Option<&DerivationPath> { self.origin.as_ref() }

    pub fn depth(&self) -> u8 {
        match &self.key { ExtendedKey::Private(k) => k.depth, ExtendedKey::Public(k) => k.depth }
    }

    pub fn xpub(&self) -> Xpub {
        match &self.key { ExtendedKey::Private(k) => Xpub::from_priv(&*SECP, k), ExtendedKey::Public(k) => *k }
    }

    /// This key's own fingerprint as a big-endian integer.
    pub fn fingerprint(&self) -> u32 { u32::from_be_bytes(self.xpub().fingerprint().to_bytes()) }

    /// Walk `path` from this key and render the result as `kind`.
    ///
    /// A public source cannot produce a private key nor take a hardened step.
    pub fn derive(&self, kind: KeyType, path: &DerivationPath, is_derivable: bool) -> Result<HdKey> {
        let steps: Vec<ChildNumber> = path.steps().iter().copied().map(ChildNumber::from).collect();
        let key = match (&self.key, kind) {
            (ExtendedKey::Private(xprv), kind) => {
                let child = xprv.derive_priv(&*SECP, &steps)?;
                match kind {
                    KeyType::Private => ExtendedKey::Private(child),
                    KeyType::Public => ExtendedKey::Public(Xpub::from_priv(&*SECP, &child)),
                }
            }
            (ExtendedKey::Public(_), KeyType::Private) => {
                return Err(Error::Derivation("a private key cannot be derived from a public key".into()));
            }
            (ExtendedKey::Public(xpub), KeyType::Public) => {
                if path.steps().iter().any(|s| s.is_hardened()) {
                    return Err(Error::Derivation("hardened steps require a private source key".into()));
                }
                ExtendedKey::Public(xpub.derive_pub(&*SECP, &steps)?)
            }
        };
        let base = self.origin.clone().unwrap_or_else(|| DerivationPath::from_fingerprint(self.fingerprint()));
        Ok(HdKey { key, is_derivable, origin: Some(base.append(path)) })
    }

    pub fn to_base58(&self) -> String {
        match &self.key { ExtendedKey::Private(k) => k.to_string(), ExtendedKey::Public(k) => k.to_string() }
    }

    pub fn from_base58(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.starts_with("xprv") || text.starts_with("tprv") {
            Ok(Self::from_xpriv(Xpriv::from_str(text).map_err(|e| Error::parse(format!("xprv: {e}")))?))
        } else {
            Ok(Self::from_xpub(Xpub::from_str(text).map_err(|e| Error::parse(format!("xpub: {e}")))?))
        }
    }

    pub fn to_cbor_value(&self) -> Value {
        let data = match &self.key { ExtendedKey::Private(k) => k.encode(), ExtendedKey::Public(k) => k.encode() };
        let mut entries = vec![
            (1, Value::Bool(self.is_private())),
            (2, Value::Bytes(data.to_vec())),
            (3, Value::Bool(self.is_derivable)),
        ];
        if let Some(origin) = &self.origin {
            entries.push((4, origin.to_tagged_value()));
        }
        wire::map(entries)
    }

    pub fn from_cbor_value(value: Value) -> Result<Self> {
        let mut map = MapReader::new(value, "hdkey")?;
        let is_private = wire::as_bool(&map.require(1)?, "hdkey is-private")?;
        let data = wire::into_bytes(map.require(2)?, "hdkey key-data")?;
        let is_derivable = wire::as_bool(&map.require(3)?, "hdkey is-derivable")?;
        let origin = map.take(4).map(DerivationPath::from_tagged_value).transpose()?;
        map.finish()?;
        let key = if is_private {
            ExtendedKey::Private(Xpriv::decode(&data).map_err(|e| Error::codec(format!("hdkey key-data: {e}")))?)
        } else {
            ExtendedKey::Public(Xpub::decode(&data).map_err(|e| Error::codec(format!("hdkey key-data: {e}")))?)
        };
        Ok(Self { key, is_derivable, origin })
    }

    pub fn to_tagged_value(&self) -> Value { wire::tagged(tags::HDKEY, self.to_cbor_value()) }

    pub fn from_tagged_value(value: Value) -> Result<Self> { Self::from_cbor_value(wire::untag(value, tags::HDKEY)?) }

    pub fn to_wire_with(&self, transport: &impl Transport) -> Result<String> {
        Ok(transport.seal(tags::kind::HDKEY, &wire::to_bytes(&self.to_cbor_value())?))
    }

    pub fn from_wire_with(transport: &impl Transport, text: &str) -> Result<Self> {
        Self::from_cbor_value(wire::from_bytes(&transport.open(tags::kind::HDKEY, text)?)?)
    }
}

impl fmt::Display for HdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_with(&wire::Base64Transport).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for HdKey {
    type Err = Error;

    /// Accepts base58 (`xprv`/`tprv`/`xpub`/`tpub`) or a transport string.
    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        if ["xprv", "tprv", "xpub", "tpub"].iter().any(|p| text.starts_with(p)) {
            Self::from_base58(text)
        } else {
            Self::from_wire_with(&wire::Base64Transport, text)
        }
    }
}
