use crate::chain::abi::{decode_string, decode_uint8};
use crate::chain::{RpcClient, TokenInfoSource};
use crate::core::{
    Address, ChainId, ClientError, ClientResult, Config, TokenInfo, ERC20_DECIMALS_SELECTOR,
    ERC20_NAME_SELECTOR, ERC20_SYMBOL_SELECTOR, TOKEN_INFO_CACHE_SIZE,
};
use async_trait::async_trait;
use cached::{Cached, TimedSizedCache};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// TTL cache of resolved token metadata keyed by chain and lowercase address.
pub struct TokenInfoCache {
    inner: Mutex<TimedSizedCache<(ChainId, String), TokenInfo>>,
}

impl TokenInfoCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            inner: Mutex::new(TimedSizedCache::with_size_and_lifespan(
                TOKEN_INFO_CACHE_SIZE,
                ttl_secs,
            )),
        }
    }

    pub async fn get(&self, chain_id: ChainId, address: &Address) -> Option<TokenInfo> {
        let mut cache = self.inner.lock().await;
        cache.cache_get(&(chain_id, address.to_lowercase())).cloned()
    }

    pub async fn set(&self, chain_id: ChainId, address: &Address, token: TokenInfo) {
        let mut cache = self.inner.lock().await;
        cache.cache_set((chain_id, address.to_lowercase()), token);
    }

    pub async fn size(&self) -> usize {
        self.inner.lock().await.cache_size()
    }

    pub async fn clear(&self) {
        self.inner.lock().await.cache_clear();
    }
}

/// Reads `name()`, `symbol()` and `decimals()` from ERC-20 contracts.
pub struct Erc20Metadata {
    endpoints: HashMap<ChainId, Arc<RpcClient>>,
    cache: TokenInfoCache,
}

impl Erc20Metadata {
    pub fn new(endpoints: HashMap<ChainId, Arc<RpcClient>>, cache_ttl_secs: u64) -> Self {
        Self {
            endpoints,
            cache: TokenInfoCache::new(cache_ttl_secs),
        }
    }

    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let mut endpoints = HashMap::new();
        for (chain_id, url) in &config.chain_rpc_urls {
            endpoints.insert(*chain_id, Arc::new(RpcClient::new(url.clone(), config.timeout_secs)?));
        }
        Ok(Self::new(endpoints, config.token_info_cache_ttl))
    }

    pub fn cache(&self) -> &TokenInfoCache {
        &self.cache
    }

    async fn fetch(&self, rpc: &RpcClient, address: &Address) -> ClientResult<TokenInfo> {
        let (name, symbol, decimals) = futures::try_join!(
            rpc.call(address, &ERC20_NAME_SELECTOR),
            rpc.call(address, &ERC20_SYMBOL_SELECTOR),
            rpc.call(address, &ERC20_DECIMALS_SELECTOR),
        )?;

        // Accounts without code answer eth_call with empty data
        if decimals.is_empty() {
            return Err(ClientError::AbiDecode("empty return data".to_string()));
        }

        Ok(TokenInfo {
            name: decode_string(&name)?,
            symbol: decode_string(&symbol)?,
            decimals: decode_uint8(&decimals)?,
        })
    }
}

#[async_trait]
impl TokenInfoSource for Erc20Metadata {
    async fn token_info(&self, chain_id: ChainId, address: &Address) -> ClientResult<Option<TokenInfo>> {
        if let Some(token) = self.cache.get(chain_id, address).await {
            debug!("Token info for {} on {} served from cache", address, chain_id);
            return Ok(Some(token));
        }

        let Some(rpc) = self.endpoints.get(&chain_id) else {
            warn!("No RPC endpoint configured for chain {}", chain_id);
            return Ok(None);
        };

        info!("Fetching token info for {} on chain {}", address, chain_id);
        match self.fetch(rpc, address).await {
            Ok(token) => {
                debug!("Token {} is {} ({}), {} decimals", address, token.name, token.symbol, token.decimals);
                self.cache.set(chain_id, address, token.clone()).await;
                Ok(Some(token))
            }
            Err(e @ ClientError::NetworkError(_)) => Err(e),
            Err(e) => {
                warn!("{} does not look like a token on chain {}: {}", address, chain_id, e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TOKEN: &str = "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c";

    fn string_result(value: &str) -> String {
        let mut out = format!("{:064x}", 32);
        out.push_str(&format!("{:064x}", value.len()));
        let mut encoded = hex::encode(value.as_bytes());
        while encoded.len() % 64 != 0 {
            encoded.push('0');
        }
        out.push_str(&encoded);
        format!("0x{}", out)
    }

    fn rpc_body(result: &str) -> String {
        json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string()
    }

    async fn mock_selector(server: &mut mockito::ServerGuard, selector: &str, result: String) -> mockito::Mock {
        server
            .mock("POST", "/")
            .match_body(mockito::Matcher::Regex(selector.to_string()))
            .with_header("content-type", "application/json")
            .with_body(rpc_body(&result))
            .expect(1)
            .create_async()
            .await
    }

    fn metadata_for(server: &mockito::ServerGuard) -> Erc20Metadata {
        let rpc = Arc::new(RpcClient::new(server.url(), 5).unwrap());
        Erc20Metadata::new(HashMap::from([(56, rpc)]), 60)
    }

    #[tokio::test]
    async fn test_token_info_resolves_and_caches() {
        let mut server = mockito::Server::new_async().await;
        let name = mock_selector(&mut server, "0x06fdde03", string_result("Wrapped BNB")).await;
        let symbol = mock_selector(&mut server, "0x95d89b41", string_result("WBNB")).await;
        let decimals = mock_selector(&mut server, "0x313ce567", format!("0x{:064x}", 18)).await;

        let metadata = metadata_for(&server);
        let address: Address = TOKEN.parse().unwrap();
        let token = metadata.token_info(56, &address).await.unwrap().unwrap();
        assert_eq!(token.name, "Wrapped BNB");
        assert_eq!(token.symbol, "WBNB");
        assert_eq!(token.decimals, 18);
        assert_eq!(metadata.cache().size().await, 1);

        // Second lookup is answered from the cache
        let again = metadata.token_info(56, &address).await.unwrap();
        assert_eq!(again, Some(token));
        name.assert_async().await;
        symbol.assert_async().await;
        decimals.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_return_is_not_a_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_header("content-type", "application/json")
            .with_body(rpc_body("0x"))
            .create_async()
            .await;

        let metadata = metadata_for(&server);
        let address: Address = TOKEN.parse().unwrap();
        assert_eq!(metadata.token_info(56, &address).await.unwrap(), None);
        assert_eq!(metadata.cache().size().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_chain_is_not_a_token() {
        let metadata = Erc20Metadata::new(HashMap::new(), 60);
        let address: Address = TOKEN.parse().unwrap();
        assert_eq!(metadata.token_info(1, &address).await.unwrap(), None);
    }

    #[test]
    fn test_cache_keys_ignore_address_case() {
        let cache = TokenInfoCache::new(60);
        let upper: Address = TOKEN.to_uppercase().replacen("0X", "0x", 1).parse().unwrap();
        let lower: Address = TOKEN.to_lowercase().parse().unwrap();
        let info = TokenInfo {
            name: "Wrapped BNB".to_string(),
            symbol: "WBNB".to_string(),
            decimals: 18,
        };

        tokio_test::block_on(cache.set(56, &upper, info.clone()));
        assert_eq!(tokio_test::block_on(cache.get(56, &lower)), Some(info));
        assert_eq!(tokio_test::block_on(cache.get(1, &lower)), None);

        tokio_test::block_on(cache.clear());
        assert_eq!(tokio_test::block_on(cache.size()), 0);
    }
}
