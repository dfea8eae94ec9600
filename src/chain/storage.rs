use crate::chain::abi::{decode_address_string, encode_get_data, encode_set_key_data};
use crate::chain::{AppDataStore, DomainDataSource, OnHash, RpcClient, SaveRequest, TokenListSave};
use crate::core::{
    Address, ChainId, ClientError, ClientResult, Config, DomainConfig, TokenList, TokenListVersion,
};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Token lists grouped by chain id, then list id.
pub type TokenLists = BTreeMap<String, BTreeMap<String, TokenList>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainContracts {
    #[serde(default)]
    pub factory: Option<String>,
    #[serde(default)]
    pub router: Option<String>,
    #[serde(default)]
    pub pair_hash: Option<String>,
}

/// JSON document kept in the `info` half of a storage record.
///
/// Keys this crate does not know about are carried through `extra` so a save
/// never drops settings written by other tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredInfo {
    #[serde(default)]
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default)]
    pub contracts: BTreeMap<String, ChainContracts>,
    #[serde(default)]
    pub token_lists: TokenLists,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageRecord {
    pub owner: Address,
    pub info: StoredInfo,
}

fn lenient_address(raw: &Option<String>) -> Option<Address> {
    raw.as_deref()
        .and_then(|value| value.parse::<Address>().ok())
        .filter(|address| !address.is_zero())
}

impl StorageRecord {
    pub fn domain_config(&self, chain_id: Option<ChainId>) -> DomainConfig {
        let contracts = chain_id
            .and_then(|id| self.info.contracts.get(&id.to_string()))
            .cloned()
            .unwrap_or_default();

        DomainConfig {
            admin: Some(self.owner.clone()).filter(|a| !a.is_zero()),
            factory: lenient_address(&contracts.factory),
            router: lenient_address(&contracts.router),
            project_name: self.info.project_name.clone(),
            pair_hash: contracts.pair_hash.unwrap_or_default(),
            favicon: self.info.favicon.clone().filter(|f| !f.is_empty()),
        }
    }
}

/// Applies a token list write to the stored lists.
///
/// An update whose chain or id changed moves the list: the old entry is
/// removed before the new one is written. Versions bump their patch number on
/// every write of an existing list.
pub fn apply_token_list(lists: &mut TokenLists, save: &TokenListSave, timestamp: String) {
    let mut previous = None;

    let moved = save.old_chain_id != save.chain_id || save.old_id != save.id;
    if save.need_to_update && moved && !save.old_chain_id.is_empty() && !save.old_id.is_empty() {
        if let Some(chain_lists) = lists.get_mut(&save.old_chain_id) {
            previous = chain_lists.remove(&save.old_id);
            if chain_lists.is_empty() {
                lists.remove(&save.old_chain_id);
            }
        }
    }

    let chain_lists = lists.entry(save.chain_id.clone()).or_default();
    if let Some(existing) = chain_lists.get(&save.id) {
        previous = Some(existing.clone());
    }

    let version = match previous.and_then(|list| list.version) {
        Some(v) => TokenListVersion {
            patch: v.patch + 1,
            ..v
        },
        None => TokenListVersion::default(),
    };

    chain_lists.insert(
        save.id.clone(),
        TokenList {
            name: Some(save.name.clone()),
            logo_uri: Some(save.logo_uri.clone()),
            tokens: Some(save.tokens.clone()),
            timestamp: Some(timestamp),
            version: Some(version),
        },
    );
}

/// Storage contract client for one deployment key.
pub struct StorageContract {
    reader: RpcClient,
    wallet: RpcClient,
    contract: Address,
    key: String,
}

impl StorageContract {
    pub fn new(reader: RpcClient, wallet: RpcClient, contract: Address, key: impl Into<String>) -> Self {
        Self {
            reader,
            wallet,
            contract,
            key: key.into(),
        }
    }

    pub fn from_config(config: &Config) -> ClientResult<Self> {
        Ok(Self::new(
            RpcClient::new(config.storage_rpc_url.clone(), config.timeout_secs)?,
            RpcClient::new(config.rpc_url.clone(), config.timeout_secs)?,
            config.require_storage_contract()?,
            config.domain.clone(),
        ))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the record for this key. `None` when nothing was ever stored.
    pub async fn read_record(&self) -> ClientResult<Option<StorageRecord>> {
        debug!("Reading storage record for {}", self.key);
        let raw = self.reader.call(&self.contract, &encode_get_data(&self.key)).await?;
        if raw.is_empty() {
            return Ok(None);
        }

        let (owner, info) = decode_address_string(&raw)?;
        if info.trim().is_empty() {
            return Ok(None);
        }

        let info: StoredInfo = serde_json::from_str(&info)?;
        Ok(Some(StorageRecord { owner, info }))
    }

    pub async fn token_lists(&self) -> ClientResult<TokenLists> {
        Ok(self
            .read_record()
            .await?
            .map(|record| record.info.token_lists)
            .unwrap_or_default())
    }
}

#[async_trait]
impl DomainDataSource for StorageContract {
    async fn fetch_domain_data(&self, chain_id: Option<ChainId>) -> ClientResult<Option<DomainConfig>> {
        let record = self.read_record().await?;
        Ok(record.map(|record| record.domain_config(chain_id)))
    }
}

#[async_trait]
impl AppDataStore for StorageContract {
    async fn save_app_data(&self, request: SaveRequest, on_hash: OnHash) -> ClientResult<()> {
        let record = self.read_record().await?;

        if let Some(existing) = &record {
            if !existing.owner.is_zero() && existing.owner != request.owner {
                warn!(
                    "Saving {} as {} but the record is owned by {}",
                    self.key, request.owner, existing.owner
                );
            }
        }

        let mut info = record.map(|record| record.info).unwrap_or_default();
        match &request.data.token_list {
            Some(save) => apply_token_list(&mut info.token_lists, save, Utc::now().to_rfc3339()),
            None => return Err(ClientError::NothingToSave),
        }

        let payload = serde_json::to_string(&info)?;
        let data = encode_set_key_data(&self.key, &request.owner, &payload);

        info!("Submitting app data for {} from {}", self.key, request.owner);
        let hash = self
            .wallet
            .send_transaction(&request.owner, &self.contract, &data)
            .await?;
        on_hash(&hash);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::abi::{encode_record, to_hex};
    use crate::chain::AppData;
    use crate::core::Token;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    const OWNER: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18";
    const CONTRACT: &str = "0x1111111111111111111111111111111111111111";
    const FACTORY: &str = "0x2222222222222222222222222222222222222222";
    const ROUTER: &str = "0x3333333333333333333333333333333333333333";

    fn token(address: &str) -> Token {
        Token {
            name: "Token".to_string(),
            symbol: "TKN".to_string(),
            decimals: 18,
            address: address.parse().unwrap(),
            chain_id: 56,
            logo_uri: None,
        }
    }

    fn save(old: (&str, &str), new: (&str, &str), need_to_update: bool) -> TokenListSave {
        TokenListSave {
            need_to_update,
            old_chain_id: old.0.to_string(),
            old_id: old.1.to_string(),
            old_name: Some("Old".to_string()),
            chain_id: new.0.to_string(),
            id: new.1.to_string(),
            name: "New".to_string(),
            logo_uri: String::new(),
            tokens: vec![token(FACTORY)],
        }
    }

    fn stored_info() -> String {
        json!({
            "projectName": "Example Swap",
            "favicon": "https://example.org/favicon.ico",
            "contracts": { "56": { "factory": FACTORY, "router": ROUTER, "pairHash": "0xabc" } },
            "tokenLists": {},
            "logoUrl": "https://example.org/logo.png"
        })
        .to_string()
    }

    fn contract_for(server: &mockito::ServerGuard) -> StorageContract {
        StorageContract::new(
            RpcClient::new(server.url(), 5).unwrap(),
            RpcClient::new(server.url(), 5).unwrap(),
            CONTRACT.parse().unwrap(),
            "swap.example.org",
        )
    }

    async fn mock_record(server: &mut mockito::ServerGuard, info: &str) -> mockito::Mock {
        let owner: Address = OWNER.parse().unwrap();
        let result = to_hex(&encode_record(&owner, info));
        server
            .mock("POST", "/")
            .match_body(mockito::Matcher::PartialJson(json!({ "method": "eth_call" })))
            .with_header("content-type", "application/json")
            .with_body(json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string())
            .create_async()
            .await
    }

    #[test]
    fn test_apply_new_list() {
        let mut lists = TokenLists::new();
        apply_token_list(&mut lists, &save(("", ""), ("56", "main"), true), "t0".to_string());

        let list = &lists["56"]["main"];
        assert_eq!(list.name.as_deref(), Some("New"));
        assert_eq!(list.version, Some(TokenListVersion::default()));
        assert_eq!(list.timestamp.as_deref(), Some("t0"));
    }

    #[test]
    fn test_apply_update_bumps_patch() {
        let mut lists = TokenLists::new();
        apply_token_list(&mut lists, &save(("", ""), ("56", "main"), true), "t0".to_string());
        apply_token_list(&mut lists, &save(("56", "main"), ("56", "main"), true), "t1".to_string());

        let version = lists["56"]["main"].version.unwrap();
        assert_eq!(version.to_string(), "1.0.1");
    }

    #[test]
    fn test_apply_rename_moves_list() {
        let mut lists = TokenLists::new();
        apply_token_list(&mut lists, &save(("", ""), ("56", "main"), true), "t0".to_string());
        apply_token_list(&mut lists, &save(("56", "main"), ("1", "eth"), true), "t1".to_string());

        assert!(!lists.contains_key("56"));
        assert_eq!(lists["1"]["eth"].version.unwrap().to_string(), "1.0.1");
    }

    #[test]
    fn test_record_without_contracts_for_chain() {
        let record = StorageRecord {
            owner: OWNER.parse().unwrap(),
            info: serde_json::from_str(&stored_info()).unwrap(),
        };
        let config = record.domain_config(Some(1));
        assert!(config.has_admin());
        assert!(!config.has_contracts());
        assert_eq!(config.project_name, "Example Swap");
    }

    #[tokio::test]
    async fn test_fetch_domain_data() {
        let mut server = mockito::Server::new_async().await;
        mock_record(&mut server, &stored_info()).await;

        let storage = contract_for(&server);
        let config = storage.fetch_domain_data(Some(56)).await.unwrap().unwrap();
        assert!(config.has_contracts());
        assert_eq!(config.admin, Some(OWNER.parse().unwrap()));
        assert_eq!(config.pair_hash, "0xabc");
        assert_eq!(config.favicon.as_deref(), Some("https://example.org/favicon.ico"));
    }

    #[tokio::test]
    async fn test_fetch_domain_data_for_empty_record() {
        let mut server = mockito::Server::new_async().await;
        mock_record(&mut server, "").await;

        let storage = contract_for(&server);
        assert_eq!(storage.fetch_domain_data(Some(56)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_keeps_unknown_keys_and_reports_hash() {
        let mut server = mockito::Server::new_async().await;
        mock_record(&mut server, &stored_info()).await;
        let send = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::PartialJson(json!({ "method": "eth_sendTransaction" })),
                // "logoUrl" survives the rewrite, hex encoded inside the call data
                mockito::Matcher::Regex(hex::encode("logoUrl")),
            ]))
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":2,"result":"0xfeed"}"#)
            .create_async()
            .await;

        let storage = contract_for(&server);
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let request = SaveRequest {
            owner: OWNER.parse().unwrap(),
            data: AppData {
                token_list: Some(save(("", ""), ("56", "main"), true)),
            },
        };

        storage
            .save_app_data(request, Box::new(move |hash| *sink.lock().unwrap() = Some(hash.to_string())))
            .await
            .unwrap();

        send.assert_async().await;
        assert_eq!(seen.lock().unwrap().as_deref(), Some("0xfeed"));
    }
}
