//! Configuration Tests
//!
//! `Config::from_env` reads process environment, so every test holds
//! `ENV_LOCK` while it mutates `HDKEY_*` variables.

use hdkey_model::config::{ENV_ASSET, ENV_LOG_JSON, ENV_NETWORK};
use hdkey_model::{Asset, Config, Error, Model, Network};
use once_cell::sync::Lazy;
use std::sync::Mutex;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    for key in [ENV_NETWORK, ENV_ASSET, ENV_LOG_JSON] {
        std::env::remove_var(key);
    }
    guard
}

#[test]
fn empty_environment_is_default() {
    let _guard = lock_env();
    assert_eq!(Config::from_env().expect("config"), Config::default());
}

#[test]
fn reads_all_variables() {
    let _guard = lock_env();
    std::env::set_var(ENV_NETWORK, "testnet");
    std::env::set_var(ENV_ASSET, "ETH");
    std::env::set_var(ENV_LOG_JSON, "1");

    let config = Config::from_env().expect("config");
    assert_eq!(config.network, Some(Network::Testnet));
    assert_eq!(config.asset, Some(Asset::Eth));
    assert!(config.log_json);
}

#[test]
fn blank_values_are_ignored() {
    let _guard = lock_env();
    std::env::set_var(ENV_NETWORK, "  ");
    std::env::set_var(ENV_LOG_JSON, "0");
    let config = Config::from_env().expect("config");
    assert_eq!(config.network, None);
    assert!(!config.log_json);
}

#[test]
fn invalid_value_is_parse_error() {
    let _guard = lock_env();
    std::env::set_var(ENV_NETWORK, "signet");
    assert!(matches!(Config::from_env(), Err(Error::Parse(_))));
}

#[test]
fn config_applies_to_model() {
    let _guard = lock_env();
    std::env::set_var(ENV_NETWORK, "testnet");
    let config = Config::from_env().expect("config");

    let model = Model::new();
    model.apply_config(&config);
    assert_eq!(model.value_string("network").expect("network").as_deref(), Some("testnet"));
    assert_eq!(model.value_string("coin-type").expect("coin").as_deref(), Some("1"));
}

#[test]
fn builder_sets_fields() {
    let config = Config::default().with_network(Network::Testnet).with_asset(Asset::Eth).with_log_json(true);
    assert_eq!(config, Config { network: Some(Network::Testnet), asset: Some(Asset::Eth), log_json: true });
}
