//! Configuration - process-wide defaults read from the environment.
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `HDKEY_NETWORK` | default for `network` when not assigned |
//! | `HDKEY_ASSET` | default for `asset` when not assigned |
//! | `HDKEY_LOG_JSON` | `1` switches log output to JSON |

use crate::error::Result;
use crate::use_info::{Asset, Network};

pub const ENV_NETWORK: &str = "HDKEY_NETWORK";
pub const ENV_ASSET: &str = "HDKEY_ASSET";
pub const ENV_LOG_JSON: &str = "HDKEY_LOG_JSON";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub network: Option<Network>,
    pub asset: Option<Asset>,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let network = env_value(ENV_NETWORK).map(|v| v.parse()).transpose()?;
        let asset = env_value(ENV_ASSET).map(|v| v.parse()).transpose()?;
        let log_json = env_value(ENV_LOG_JSON).is_some_and(|v| v == "1");
        Ok(Self { network, asset, log_json })
    }

    pub fn with_network(mut self, network: Network) -> Self { self.network = Some(network); self }
    pub fn with_asset(mut self, asset: Asset) -> Self { self.asset = Some(asset); self }
    pub fn with_log_json(mut self, enabled: bool) -> Self { self.log_json = enabled; self }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
