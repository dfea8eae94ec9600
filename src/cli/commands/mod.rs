pub mod gate;
pub mod route;
pub mod token_list;

use crate::chain::RpcClient;
use crate::core::{Address, ChainId, ClientResult, Config};
use log::{debug, warn};

/// Chain and account the wallet provider at `RPC_URL` is connected with.
///
/// `ACCOUNT` wins over the provider's first unlocked account. A provider that
/// cannot answer leaves the chain unknown.
pub(crate) async fn wallet_context(config: &Config) -> ClientResult<(Option<ChainId>, Option<Address>)> {
    let wallet = RpcClient::new(config.rpc_url.clone(), config.timeout_secs)?;

    let chain_id = match wallet.chain_id().await {
        Ok(chain_id) => Some(chain_id),
        Err(e) => {
            warn!("Could not read chain id from {}: {}", wallet.url(), e);
            None
        }
    };

    let account = match &config.account {
        Some(account) => Some(account.clone()),
        None => wallet.accounts().await.ok().and_then(|accounts| accounts.into_iter().next()),
    };
    debug!("Wallet context: chain {:?}, account {:?}", chain_id, account);

    Ok((chain_id, account))
}
