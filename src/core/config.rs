use crate::core::{constants::*, error::ClientResult, Address, ClientError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Wallet provider endpoint; signs and sends transactions for `account`.
    pub rpc_url: String,
    /// Node on the storage network used for reads.
    pub storage_rpc_url: String,
    pub storage_contract: Option<Address>,
    /// Key the deployment's data is stored under.
    pub domain: String,
    pub storage_network_id: u64,
    pub account: Option<Address>,
    /// Read endpoints per chain, used for token metadata lookups.
    pub chain_rpc_urls: BTreeMap<u64, String>,
    /// Admin named by the hosting site; overrides the on-chain admin for network checks.
    pub host_admin: Option<Address>,
    /// Chains the hosting site allows. Empty means no restriction.
    pub host_network_ids: Vec<u64>,
    pub timeout_secs: u64,
    pub token_info_cache_ttl: u64,
    pub state_file: PathBuf,
}

impl Config {
    pub fn from_env() -> ClientResult<Self> {
        let rpc_url = env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
        let storage_rpc_url = env::var("STORAGE_RPC_URL").unwrap_or_else(|_| rpc_url.clone());

        let storage_contract = match env::var("STORAGE_CONTRACT") {
            Ok(value) if !value.trim().is_empty() => Some(value.parse()?),
            _ => None,
        };

        let account = match env::var("ACCOUNT") {
            Ok(value) if !value.trim().is_empty() => Some(value.parse()?),
            _ => None,
        };

        let host_admin = match env::var("HOST_ADMIN") {
            Ok(value) if !value.trim().is_empty() => Some(value.parse()?),
            _ => None,
        };

        let storage_network_id = env::var("STORAGE_NETWORK_ID")
            .unwrap_or_default()
            .parse()
            .unwrap_or(STORAGE_NETWORK_ID);

        let mut chain_rpc_urls = parse_chain_rpc_urls(&env::var("CHAIN_RPC_URLS").unwrap_or_default())?;
        chain_rpc_urls
            .entry(storage_network_id)
            .or_insert_with(|| storage_rpc_url.clone());

        Ok(Self {
            rpc_url,
            storage_rpc_url,
            storage_contract,
            domain: env::var("DOMAIN").unwrap_or_default(),
            account,
            chain_rpc_urls,
            host_admin,
            host_network_ids: parse_chain_ids(&env::var("HOST_NETWORK_IDS").unwrap_or_default())?,
            storage_network_id,
            timeout_secs: env::var("TIMEOUT_SECS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(DEFAULT_RPC_TIMEOUT),
            token_info_cache_ttl: env::var("TOKEN_INFO_CACHE_TTL")
                .unwrap_or_default()
                .parse()
                .unwrap_or(TOKEN_INFO_CACHE_TTL),
            state_file: env::var("STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_FILE)),
        })
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.timeout_secs == 0 {
            return Err(ClientError::ConfigError(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if self.rpc_url.is_empty() || self.storage_rpc_url.is_empty() {
            return Err(ClientError::ConfigError(
                "RPC url cannot be empty".to_string(),
            ));
        }

        if self.domain.trim().is_empty() {
            return Err(ClientError::ConfigError(
                "DOMAIN must be set to the key the deployment is stored under".to_string(),
            ));
        }

        Ok(())
    }

    /// Storage contract address, required by anything that reads or writes app data.
    pub fn require_storage_contract(&self) -> ClientResult<Address> {
        self.storage_contract
            .clone()
            .ok_or_else(|| ClientError::ConfigError("STORAGE_CONTRACT is not set".to_string()))
    }
}

/// Parses `1=https://a,56=https://b`.
pub fn parse_chain_rpc_urls(raw: &str) -> ClientResult<BTreeMap<u64, String>> {
    let mut urls = BTreeMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (chain, url) = entry.split_once('=').ok_or_else(|| {
            ClientError::ConfigError(format!("expected <chain>=<url>, got {}", entry))
        })?;
        let chain_id = chain
            .trim()
            .parse()
            .map_err(|_| ClientError::InvalidChainId(chain.to_string()))?;
        urls.insert(chain_id, url.trim().to_string());
    }
    Ok(urls)
}

/// Parses `1,56,137`.
pub fn parse_chain_ids(raw: &str) -> ClientResult<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|e| e.parse().map_err(|_| ClientError::InvalidChainId(e.to_string())))
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            storage_rpc_url: DEFAULT_RPC_URL.to_string(),
            storage_contract: None,
            domain: String::new(),
            storage_network_id: STORAGE_NETWORK_ID,
            account: None,
            chain_rpc_urls: BTreeMap::from([(STORAGE_NETWORK_ID, DEFAULT_RPC_URL.to_string())]),
            host_admin: None,
            host_network_ids: Vec::new(),
            timeout_secs: DEFAULT_RPC_TIMEOUT,
            token_info_cache_ttl: TOKEN_INFO_CACHE_TTL,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_needs_domain() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let config = Config {
            domain: "swap.example.org".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = Config {
            domain: "swap.example.org".to_string(),
            timeout_secs: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ClientError::ConfigError(_))));
    }

    #[test]
    fn test_parse_chain_rpc_urls() {
        let urls = parse_chain_rpc_urls("1=https://eth.example.org, 56=https://bsc.example.org").unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[&56], "https://bsc.example.org");
        assert!(parse_chain_rpc_urls("").unwrap().is_empty());
        assert!(parse_chain_rpc_urls("bsc").is_err());
        assert!(parse_chain_rpc_urls("x=https://a").is_err());
    }

    #[test]
    fn test_parse_chain_ids() {
        assert_eq!(parse_chain_ids("1, 56,137").unwrap(), vec![1, 56, 137]);
        assert!(parse_chain_ids("").unwrap().is_empty());
        assert!(parse_chain_ids("1,two").is_err());
    }

    #[test]
    fn test_missing_storage_contract() {
        assert!(Config::default().require_storage_contract().is_err());
    }
}
