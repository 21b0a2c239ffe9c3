//! Seed material, chain parameters and the master key.

use super::{parse_bool, parse_digest};
use crate::attribute::{Attribute, Graph, Handle};
use crate::core::names;
use crate::error::{Error, Result};
use crate::hdkey::{HdKey, Seed};
use crate::use_info::{Asset, Network};

pub struct MasterCells {
    pub bip39_words: Handle<String>,
    pub seed: Handle<Seed>,
    pub seed_digest: Handle<[u8; 32]>,
    pub network: Handle<Network>,
    pub asset: Handle<Asset>,
    pub is_derivable: Handle<bool>,
    pub master_key: Handle<HdKey>,
    pub master_key_fingerprint: Handle<u32>,
}

fn parse_words(text: &str) -> Result<String> {
    let mnemonic = bip39::Mnemonic::parse_normalized(text.trim()).map_err(|e| Error::parse(format!("invalid mnemonic: {e}")))?;
    Ok(mnemonic.to_string())
}

fn parse_fingerprint(text: &str) -> Result<u32> {
    let text = text.trim();
    if text.len() != 8 {
        return Err(Error::parse(format!("fingerprint must be 8 hex digits, got '{text}'")));
    }
    u32::from_str_radix(text, 16).map_err(|e| Error::parse(format!("fingerprint: {e}")))
}

impl MasterCells {
    pub(super) fn setup(graph: &mut Graph) -> Self {
        let bip39_words = graph.register(Attribute::new(
            names::BIP39_WORDS,
            "TEXT",
            "The BIP-39 mnemonic words encoding the seed.",
            |words: &String| words.clone(),
            parse_words,
        ));
        let seed: Handle<Seed> = graph.register(Attribute::textual(names::SEED, "HEX", "The random seed from which the master key is derived."));
        let seed_digest = graph.register(Attribute::new(
            names::SEED_DIGEST,
            "HEX",
            "The SHA-256 digest of the seed.",
            |digest: &[u8; 32]| hex::encode(digest),
            parse_digest,
        ));
        let network: Handle<Network> = graph.register(Attribute::textual(names::NETWORK, "ENUM mainnet | testnet", "The network."));
        let asset: Handle<Asset> = graph.register(Attribute::textual(names::ASSET, "ENUM btc | eth", "The cryptocurrency asset."));
        let is_derivable = graph.register(Attribute::new(
            names::IS_DERIVABLE,
            "BOOLEAN",
            "Whether a derived key may itself be used for further derivation.",
            |b: &bool| b.to_string(),
            parse_bool,
        ));
        let master_key: Handle<HdKey> = graph.register(Attribute::textual(names::MASTER_KEY, "HDKEY", "The BIP-32 master key."));
        let master_key_fingerprint = graph.register(Attribute::new(
            names::MASTER_KEY_FINGERPRINT,
            "HEX",
            "The fingerprint of the master key.",
            |fp: &u32| format!("{fp:08x}"),
            parse_fingerprint,
        ));

        graph.document("seed <- [bip39-words]");
        seed.derive_from(bip39_words.clone(), |words| {
            words.optional_value()?.map(|w| Seed::from_mnemonic(&w)).transpose()
        });

        graph.document("seed-digest <- [seed]");
        seed_digest.derive_from(seed.clone(), |seed| Ok(seed.optional_value()?.map(|s| s.digest())));

        graph.document("network (default: mainnet)");
        network.default_value(Network::Mainnet);

        graph.document("asset (default: btc)");
        asset.default_value(Asset::Btc);

        graph.document("is-derivable (default: true)");
        is_derivable.default_value(true);

        graph.document("master-key <- [seed, network]");
        master_key.derive_from((seed.clone(), network.clone()), |(seed, network)| {
            let Some(seed) = seed.optional_value()? else {
                return Ok(None);
            };
            HdKey::from_seed(&seed, network.value()?).map(Some)
        });

        graph.document("master-key-fingerprint <- [master-key]");
        master_key_fingerprint.derive_from(master_key.clone(), |key| Ok(key.optional_value()?.map(|k| k.fingerprint())));

        Self { bip39_words, seed, seed_digest, network, asset, is_derivable, master_key, master_key_fingerprint }
    }
}
