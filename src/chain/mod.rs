pub mod abi;
pub mod rpc;
pub mod storage;
pub mod token_info;

use crate::core::{Address, ChainId, ClientResult, DomainConfig, Token, TokenInfo};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use rpc::RpcClient;
pub use storage::StorageContract;
pub use token_info::{Erc20Metadata, TokenInfoCache};

/// Called with the transaction hash as soon as the wallet returns it.
pub type OnHash = Box<dyn FnOnce(&str) + Send>;

/// Reads the per-deployment configuration for a chain.
#[async_trait]
pub trait DomainDataSource: Send + Sync {
    /// `Ok(None)` when nothing was ever stored for this deployment. Without a
    /// chain the per-chain contract addresses are left empty.
    async fn fetch_domain_data(&self, chain_id: Option<ChainId>) -> ClientResult<Option<DomainConfig>>;
}

/// Resolves ERC-20 metadata.
#[async_trait]
pub trait TokenInfoSource: Send + Sync {
    /// `Ok(None)` when the address is not a token on `chain_id`.
    async fn token_info(&self, chain_id: ChainId, address: &Address) -> ClientResult<Option<TokenInfo>>;
}

/// Persists app data through a wallet-signed transaction.
#[async_trait]
pub trait AppDataStore: Send + Sync {
    async fn save_app_data(&self, request: SaveRequest, on_hash: OnHash) -> ClientResult<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub owner: Address,
    pub data: AppData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_list: Option<TokenListSave>,
}

/// A token list write. `old_*` identify the list being replaced so the store
/// can tell an update (possibly a rename) from a new list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListSave {
    pub need_to_update: bool,
    pub old_chain_id: String,
    pub old_id: String,
    pub old_name: Option<String>,
    pub chain_id: String,
    pub id: String,
    pub name: String,
    #[serde(rename = "logoURI")]
    pub logo_uri: String,
    pub tokens: Vec<Token>,
}
