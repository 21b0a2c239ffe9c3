//! CBOR semantic tags and transport type names
//!
//! Tag numbers follow the registry used by the UR ecosystem so payloads
//! stay recognisable when embedded in larger tagged structures.

pub const UUID: u64 = 37;

pub const SEED: u64 = 300;
pub const HDKEY: u64 = 303;
pub const KEYPATH: u64 = 304;
pub const USE_INFO: u64 = 305;
pub const PSBT: u64 = 310;

pub const SEED_REQUEST: u64 = 500;
pub const KEY_REQUEST: u64 = 501;
pub const PSBT_SIGNATURE_REQUEST: u64 = 502;

pub const SEED_DIGEST: u64 = 600;

/// Transport type names (first component of a wire string)
pub mod kind {
    pub const REQUEST: &str = "crypto-request";
    pub const RESPONSE: &str = "crypto-response";
    pub const HDKEY: &str = "crypto-hdkey";
    pub const KEYPATH: &str = "crypto-keypath";
}
