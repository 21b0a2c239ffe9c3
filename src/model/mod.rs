//! Model - the concrete cell set for one `hdkey` invocation.
//!
//! # Layout
//!
//! ```text
//! bip39-words ──▶ seed ──▶ master-key ──▶ master-key-fingerprint
//!                  │           │                   │
//!                  ▼           ▼                   ▼
//!            seed-digest   source-key    account-derivation-path ──▶ full-address-derivation-path
//!                  │           │                                              │
//!                  ▼           └──────────────▶ key-response ◀── key-request ◀┘
//!            seed-request ──▶ seed-response          │
//!                                                    ▼
//!                                               derived-key
//! ```
//!
//! | Group | Cells |
//! |-------|-------|
//! | [`MasterCells`] | seed material, network, asset, master key |
//! | [`PathCells`] | BIP-44 path components |
//! | [`KeyRequestCells`] | key request, response and derived key |
//! | [`SeedRequestCells`] | seed request and response |
//!
//! Every cell is wired before the model is handed out; the graph is
//! never rewired afterwards.

mod derivation;
mod key_request;
mod master;
mod seed_request;

pub use derivation::{ChainType, PathCells};
pub use key_request::{key_body, response_key, KeyRequestCells};
pub use master::MasterCells;
pub use seed_request::{response_seed, seed_body, SeedRequestCells};

use crate::attribute::{AttributeInfo, Graph};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::path::HARDENED_BIT;
use uuid::Uuid;

pub struct Model {
    graph: Graph,
    pub master: MasterCells,
    pub path: PathCells,
    pub key: KeyRequestCells,
    pub seed_request: SeedRequestCells,
}

impl Model {
    pub fn new() -> Self {
        let mut graph = Graph::new();
        let master = MasterCells::setup(&mut graph);
        let path = PathCells::setup(&mut graph, &master);
        let key = KeyRequestCells::setup(&mut graph, &master, &path);
        let seed_request = SeedRequestCells::setup(&mut graph, &master);
        tracing::debug!("model wired: {} attributes", graph.names().len());
        Self { graph, master, path, key, seed_request }
    }

    /// Assign configured defaults to cells the caller left unassigned.
    pub fn apply_config(&self, config: &Config) {
        if let Some(network) = config.network {
            if !self.master.network.has_assigned_value() {
                self.master.network.set(network);
            }
        }
        if let Some(asset) = config.asset {
            if !self.master.asset.has_assigned_value() {
                self.master.asset.set(asset);
            }
        }
    }

    pub fn graph(&self) -> &Graph { &self.graph }

    pub fn assign(&self, name: &str, text: &str) -> Result<()> { self.graph.assign(name, text) }

    pub fn value_string(&self, name: &str) -> Result<Option<String>> { self.graph.value_string(name) }

    pub fn describe(&self) -> Vec<AttributeInfo> { self.graph.describe() }

    pub fn derivations(&self) -> &[String] { self.graph.derivations() }
}

impl Default for Model {
    fn default() -> Self { Self::new() }
}

fn parse_text(text: &str) -> Result<String> { Ok(text.to_string()) }

fn parse_index(text: &str) -> Result<u32> {
    let index: u32 = text.trim().parse().map_err(|_| Error::parse(format!("invalid index '{text}'")))?;
    if index & HARDENED_BIT != 0 {
        return Err(Error::parse(format!("index {index} collides with the hardened bit")));
    }
    Ok(index)
}

fn parse_bool(text: &str) -> Result<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(Error::parse(format!("expected true | false, got '{other}'"))),
    }
}

fn parse_digest(text: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(text.trim()).map_err(|e| Error::parse(format!("digest hex: {e}")))?;
    bytes.try_into().map_err(|b: Vec<u8>| Error::parse(format!("digest must be 32 bytes, got {}", b.len())))
}

fn parse_uuid(text: &str) -> Result<Uuid> {
    Uuid::parse_str(text.trim()).map_err(|e| Error::parse(format!("uuid: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_bounds() {
        assert_eq!(parse_index("2147483647").unwrap(), HARDENED_BIT - 1);
        assert!(parse_index("2147483648").is_err());
        assert!(parse_index("-1").is_err());
    }

    #[test]
    fn test_parse_bool_words() {
        assert!(parse_bool("Yes").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_every_name_registered_once() {
        let model = Model::new();
        let mut names = model.graph().names();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 28);
    }

    #[test]
    fn test_config_fills_only_unassigned() {
        use crate::use_info::{Asset, Network};
        let model = Model::new();
        model.assign("network", "mainnet").unwrap();
        model.apply_config(&Config::default().with_network(Network::Testnet).with_asset(Asset::Eth));
        assert_eq!(model.master.network.value().unwrap(), Network::Mainnet);
        assert_eq!(model.master.asset.value().unwrap(), Asset::Eth);
    }
}
