//! Application configuration, read once from the environment at startup.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";
pub const DEFAULT_NETWORK: &str = "sepolia";
pub const DEFAULT_CHAIN_ID: u64 = 11_155_111;
pub const DEFAULT_FACTORY: &str = "0x0000000000000000000000000000000000000000";
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 3_000;
pub const DEFAULT_RECEIPT_POLL_MS: u64 = 1_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: expected an unsigned integer, got {value:?}")]
    NotANumber { var: &'static str, value: String },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Network the contracts are deployed on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    pub chain_id: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub rpc_url: String,
    pub network: Network,
    /// Address of the campaign factory contract.
    pub factory_address: String,
    /// Hex private key for the local signer. `None` means no active account.
    #[serde(skip_serializing)]
    pub wallet_key: Option<String>,
    /// Wait after a confirmed write before re-reading dependent fields.
    pub settle_delay: Duration,
    pub receipt_poll_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            network: Network {
                name: DEFAULT_NETWORK.to_string(),
                chain_id: DEFAULT_CHAIN_ID,
            },
            factory_address: DEFAULT_FACTORY.to_string(),
            wallet_key: None,
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            receipt_poll_interval: Duration::from_millis(DEFAULT_RECEIPT_POLL_MS),
        }
    }
}

impl AppConfig {
    /// Read `CROWDFUND_*` variables, falling back to the Sepolia defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = text(&lookup, "CROWDFUND_RPC_URL")? {
            config.rpc_url = url;
        }
        if let Some(name) = text(&lookup, "CROWDFUND_NETWORK")? {
            config.network.name = name;
        }
        if let Some(id) = number(&lookup, "CROWDFUND_CHAIN_ID")? {
            config.network.chain_id = id;
        }
        if let Some(factory) = text(&lookup, "CROWDFUND_FACTORY")? {
            config.factory_address = factory;
        }
        config.wallet_key = lookup("CROWDFUND_WALLET_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        if let Some(ms) = number(&lookup, "CROWDFUND_SETTLE_DELAY_MS")? {
            config.settle_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = number(&lookup, "CROWDFUND_RECEIPT_POLL_MS")? {
            config.receipt_poll_interval = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

fn text(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<String>, ConfigError> {
    match lookup(var) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { var }),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

fn number(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::NotANumber { var, value }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.settle_delay, Duration::from_secs(3));
        assert!(config.wallet_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("CROWDFUND_RPC_URL", "http://127.0.0.1:8545"),
            ("CROWDFUND_CHAIN_ID", "31337"),
            ("CROWDFUND_NETWORK", "anvil"),
            ("CROWDFUND_SETTLE_DELAY_MS", " 250 "),
            ("CROWDFUND_WALLET_KEY", "   "),
        ]))
        .unwrap();
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.network.chain_id, 31_337);
        assert_eq!(config.network.name, "anvil");
        assert_eq!(config.settle_delay, Duration::from_millis(250));
        assert!(config.wallet_key.is_none());
    }

    #[test]
    fn test_bad_number_is_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[("CROWDFUND_CHAIN_ID", "sepolia")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotANumber { var: "CROWDFUND_CHAIN_ID", .. }
        ));
    }

    #[test]
    fn test_wallet_key_not_serialized() {
        let config = AppConfig {
            wallet_key: Some("0xdead".into()),
            ..AppConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("0xdead"));
    }
}
