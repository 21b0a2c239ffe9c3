//! Attribute names
//!
//! Centralized registry for every cell in the model. Names are what the
//! CLI accepts as `--<name>` and what documentation lines refer to.

/// Seed material
pub const BIP39_WORDS: &str = "bip39-words";
pub const SEED: &str = "seed";
pub const SEED_DIGEST: &str = "seed-digest";

/// Chain parameters
pub const NETWORK: &str = "network";
pub const ASSET: &str = "asset";
pub const IS_DERIVABLE: &str = "is-derivable";

/// Keys
pub const MASTER_KEY: &str = "master-key";
pub const MASTER_KEY_FINGERPRINT: &str = "master-key-fingerprint";
pub const SOURCE_KEY: &str = "source-key";
pub const DERIVED_KEY: &str = "derived-key";
pub const DERIVED_KEY_BASE58: &str = "derived-key-base58";

/// Derivation paths
pub mod path {
    pub const PURPOSE: &str = "purpose";
    pub const COIN_TYPE: &str = "coin-type";
    pub const ACCOUNT_INDEX: &str = "account-index";
    pub const ACCOUNT: &str = "account-derivation-path";
    pub const CHAIN_TYPE: &str = "chain-type";
    pub const ADDRESS_INDEX: &str = "address-index";
    pub const FULL_ADDRESS: &str = "full-address-derivation-path";
}

/// Key request / response flow
pub mod key_request {
    pub const DESCRIPTION: &str = "key-request-description";
    pub const TYPE: &str = "key-request-type";
    pub const ID: &str = "key-request-id";
    pub const DERIVATION_PATH: &str = "key-request-derivation-path";
    pub const REQUEST: &str = "key-request";
    pub const RESPONSE: &str = "key-response";
}

/// Seed request / response flow
pub mod seed_request {
    pub const DESCRIPTION: &str = "seed-request-description";
    pub const ID: &str = "seed-request-id";
    pub const REQUEST: &str = "seed-request";
    pub const RESPONSE: &str = "seed-response";
}
