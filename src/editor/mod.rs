pub mod draft;
pub mod popups;
pub mod transactions;

pub use draft::TokenListDraft;
pub use popups::{Popup, PopupContent, PopupQueue};
pub use transactions::{PendingTransaction, TransactionTracker};

use crate::chain::{AppData, AppDataStore, SaveRequest, TokenInfoSource, TokenListSave};
use crate::core::{
    is_valid_address, Address, ChainId, ClientError, ClientResult, InFlightGuard, OpState, Token,
    TokenList, WRONG_TOKEN_ADDRESS_MESSAGE, WRONG_TOKEN_ADDRESS_POPUP,
};
use crate::utils::chain_name;
use log::{debug, error, info, warn};
use std::fmt;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddButton {
    /// Wallet is not on the storage network with this id.
    SwitchNetwork(ChainId),
    FillChainId,
    EnterValidAddress,
    Add,
}

impl fmt::Display for AddButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddButton::SwitchNetwork(chain_id) => write!(f, "Switch to {}", chain_name(*chain_id)),
            AddButton::FillChainId => write!(f, "Fill in the list chain id"),
            AddButton::EnterValidAddress => write!(f, "Enter a valid token address"),
            AddButton::Add => write!(f, "Add token"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveButton {
    SwitchNetwork(ChainId),
    Save,
    Update,
}

impl fmt::Display for SaveButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveButton::SwitchNetwork(chain_id) => write!(f, "Switch to {}", chain_name(*chain_id)),
            SaveButton::Save => write!(f, "Save token list"),
            SaveButton::Update => write!(f, "Update token list"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(Token),
    AlreadyPresent,
    /// No token at the address, or the list chain id is not a number.
    /// A warning popup was queued.
    Rejected,
}

/// Identity of the list as it was loaded. A save replaces this entry.
#[derive(Debug, Clone, Default)]
struct LoadedList {
    chain_id: String,
    list_id: String,
    name: Option<String>,
}

/// Admin form over one token list.
///
/// The form keeps the draft it was opened with as a snapshot; a save is only
/// allowed once the live draft differs from it (new lists always count as
/// changed), the required fields are filled, and the wallet sits on the
/// storage network.
pub struct TokenListEditor {
    loaded: LoadedList,
    is_new_list: bool,
    snapshot: TokenListDraft,
    draft: TokenListDraft,
    new_token_address: String,
    new_token_logo: String,
    address_is_valid: bool,
    connected_chain: Option<ChainId>,
    account: Option<Address>,
    storage_network_id: ChainId,
    pending: InFlightGuard,
    add_state: OpState<Token>,
    save_state: OpState<Option<String>>,
    popups: PopupQueue,
    transactions: TransactionTracker,
}

impl TokenListEditor {
    /// Opens an existing list stored under `chain_id` / `list_id`.
    pub fn open(chain_id: &str, list_id: &str, list: &TokenList, storage_network_id: ChainId) -> Self {
        let draft = TokenListDraft::from_list(chain_id, list_id, list);
        Self::build(
            LoadedList {
                chain_id: chain_id.to_string(),
                list_id: list_id.to_string(),
                name: list.name.clone(),
            },
            false,
            draft,
            storage_network_id,
        )
    }

    pub fn new_list(storage_network_id: ChainId) -> Self {
        Self::build(LoadedList::default(), true, TokenListDraft::default(), storage_network_id)
    }

    fn build(loaded: LoadedList, is_new_list: bool, draft: TokenListDraft, storage_network_id: ChainId) -> Self {
        Self {
            loaded,
            is_new_list,
            snapshot: draft.clone(),
            draft,
            new_token_address: String::new(),
            new_token_logo: String::new(),
            address_is_valid: false,
            connected_chain: None,
            account: None,
            storage_network_id,
            pending: InFlightGuard::new(),
            add_state: OpState::Idle,
            save_state: OpState::Idle,
            popups: PopupQueue::new(),
            transactions: TransactionTracker::new(),
        }
    }

    /// Shares the pending flag with other editors on the same panel.
    pub fn with_pending_guard(mut self, guard: InFlightGuard) -> Self {
        self.pending = guard;
        self
    }

    pub fn connect(&mut self, chain_id: Option<ChainId>, account: Option<Address>) {
        self.connected_chain = chain_id;
        self.account = account;
    }

    pub fn draft(&self) -> &TokenListDraft {
        &self.draft
    }

    pub fn is_new_list(&self) -> bool {
        self.is_new_list
    }

    pub fn set_chain_id(&mut self, chain_id: impl Into<String>) {
        self.draft.chain_id = chain_id.into();
    }

    pub fn set_list_id(&mut self, list_id: impl Into<String>) {
        self.draft.list_id = list_id.into();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_logo(&mut self, logo_uri: impl Into<String>) {
        self.draft.logo_uri = logo_uri.into();
    }

    pub fn set_new_token_address(&mut self, input: impl Into<String>) {
        self.new_token_address = input.into();
        self.address_is_valid = is_valid_address(self.new_token_address.trim());
    }

    pub fn set_new_token_logo(&mut self, logo_uri: impl Into<String>) {
        self.new_token_logo = logo_uri.into();
    }

    pub fn new_token_address(&self) -> &str {
        &self.new_token_address
    }

    pub fn address_is_valid(&self) -> bool {
        self.address_is_valid
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_busy()
    }

    pub fn add_state(&self) -> &OpState<Token> {
        &self.add_state
    }

    pub fn save_state(&self) -> &OpState<Option<String>> {
        &self.save_state
    }

    pub fn popups(&self) -> &PopupQueue {
        &self.popups
    }

    pub fn take_popups(&mut self) -> Vec<Popup> {
        self.popups.drain()
    }

    pub fn transactions(&self) -> &TransactionTracker {
        &self.transactions
    }

    fn on_storage_network(&self) -> bool {
        self.connected_chain == Some(self.storage_network_id)
    }

    pub fn add_button(&self) -> AddButton {
        if !self.on_storage_network() {
            AddButton::SwitchNetwork(self.storage_network_id)
        } else if self.draft.chain_id.is_empty() {
            AddButton::FillChainId
        } else if !self.address_is_valid {
            AddButton::EnterValidAddress
        } else {
            AddButton::Add
        }
    }

    /// Adding does not need the storage network, only a valid address and
    /// a list chain id.
    pub fn can_add(&self) -> bool {
        self.address_is_valid && !self.draft.chain_id.is_empty() && !self.is_pending()
    }

    pub fn save_button(&self) -> SaveButton {
        if !self.on_storage_network() {
            SaveButton::SwitchNetwork(self.storage_network_id)
        } else if self.is_new_list {
            SaveButton::Save
        } else {
            SaveButton::Update
        }
    }

    /// Sets the inputs to `address` and `logo`, then submits them.
    pub async fn add_token(
        &mut self,
        source: &dyn TokenInfoSource,
        address: &str,
        logo: Option<&str>,
    ) -> ClientResult<AddOutcome> {
        self.set_new_token_address(address);
        if let Some(logo) = logo {
            self.set_new_token_logo(logo);
        }
        self.submit_new_token(source).await
    }

    /// Looks up the token in the address input and appends it to the draft.
    pub async fn submit_new_token(&mut self, source: &dyn TokenInfoSource) -> ClientResult<AddOutcome> {
        let address: Address = self.new_token_address.parse()?;

        if self.draft.contains(&address) {
            debug!("Token {} is already in the list", address);
            return Ok(AddOutcome::AlreadyPresent);
        }

        let chain_id: ChainId = match self.draft.chain_id.trim().parse() {
            Ok(chain_id) => chain_id,
            Err(_) => {
                warn!("List chain id {:?} is not a number", self.draft.chain_id);
                return Ok(self.reject_new_token());
            }
        };

        let _ticket = self
            .pending
            .try_acquire()
            .ok_or(ClientError::AlreadyInFlight("add token"))?;
        self.add_state = OpState::InFlight;

        let info = match source.token_info(chain_id, &address).await {
            Ok(info) => info,
            Err(e) => {
                warn!("Token lookup for {} on chain {} failed: {}", address, chain_id, e);
                None
            }
        };

        match info {
            Some(info) => {
                let logo = self.new_token_logo.trim();
                let token = Token {
                    name: info.name,
                    symbol: info.symbol,
                    decimals: info.decimals,
                    address,
                    chain_id,
                    logo_uri: (!logo.is_empty()).then(|| logo.to_string()),
                };
                info!("Added {} ({}) to list {}", token.symbol, token.address, self.draft.list_id);
                self.draft.tokens.push(token.clone());
                self.set_new_token_address("");
                self.add_state = OpState::Succeeded(token.clone());
                Ok(AddOutcome::Added(token))
            }
            None => Ok(self.reject_new_token()),
        }
    }

    fn reject_new_token(&mut self) -> AddOutcome {
        self.popups
            .error(WRONG_TOKEN_ADDRESS_MESSAGE, None, Some(WRONG_TOKEN_ADDRESS_POPUP));
        self.add_state = OpState::Failed(WRONG_TOKEN_ADDRESS_MESSAGE.to_string());
        AddOutcome::Rejected
    }

    /// Removes every token with `address`. Returns whether the draft changed.
    pub fn remove_token(&mut self, address: &Address) -> bool {
        self.draft.remove(address)
    }

    pub fn is_dirty(&self) -> bool {
        self.is_new_list || self.draft != self.snapshot
    }

    /// Why saving is currently not allowed, if anything blocks it.
    pub fn save_blocker(&self) -> Option<ClientError> {
        if !self.on_storage_network() {
            return Some(ClientError::WrongNetwork {
                expected: self.storage_network_id,
                actual: self.connected_chain,
            });
        }
        if self.account.is_none() {
            return Some(ClientError::MissingField("account"));
        }
        if let Some(field) = self.draft.missing_field() {
            return Some(ClientError::MissingField(field));
        }
        if !self.is_dirty() {
            return Some(ClientError::NothingToSave);
        }
        None
    }

    pub fn can_save(&self) -> bool {
        self.save_blocker().is_none()
    }

    pub fn save_request(&self, owner: Address) -> SaveRequest {
        SaveRequest {
            owner,
            data: AppData {
                token_list: Some(TokenListSave {
                    need_to_update: self.is_dirty(),
                    old_chain_id: self.loaded.chain_id.clone(),
                    old_id: self.loaded.list_id.clone(),
                    old_name: self.loaded.name.clone(),
                    chain_id: self.draft.chain_id.clone(),
                    id: self.draft.list_id.clone(),
                    name: self.draft.name.clone(),
                    logo_uri: self.draft.logo_uri.clone(),
                    tokens: self.draft.tokens.clone(),
                }),
            },
        }
    }

    /// Submits the draft. Returns the transaction hash when the store
    /// reported one.
    ///
    /// Store failures are also queued as an error popup carrying the
    /// wallet's error code. After a successful save the draft becomes the
    /// new snapshot, so saving again needs another edit.
    pub async fn save(&mut self, store: &dyn AppDataStore) -> ClientResult<Option<String>> {
        if let Some(blocker) = self.save_blocker() {
            return Err(blocker);
        }
        let owner = self.account.clone().ok_or(ClientError::MissingField("account"))?;

        let _ticket = self
            .pending
            .try_acquire()
            .ok_or(ClientError::AlreadyInFlight("save token list"))?;
        self.save_state = OpState::InFlight;

        let request = self.save_request(owner);
        if let Ok(canonical) = self.draft.canonical_serialization() {
            debug!("Saving token list {}", canonical);
        }

        let (hash_tx, mut hash_rx) = oneshot::channel::<String>();
        let tracker = self.transactions.clone();
        let chain_id = self.connected_chain;
        let summary = format!(
            "Chain {}. Token list is saved",
            chain_id.map(|c| c.to_string()).unwrap_or_default()
        );
        let notice = summary.clone();
        let on_hash = Box::new(move |hash: &str| {
            tracker.add(hash, chain_id, summary);
            let _ = hash_tx.send(hash.to_string());
        });

        match store.save_app_data(request, on_hash).await {
            Ok(()) => {
                let hash = hash_rx.try_recv().ok();
                info!(
                    "Token list {}/{} saved{}",
                    self.draft.chain_id,
                    self.draft.list_id,
                    hash.as_deref().map(|h| format!(" in {}", h)).unwrap_or_default()
                );
                self.loaded = LoadedList {
                    chain_id: self.draft.chain_id.clone(),
                    list_id: self.draft.list_id.clone(),
                    name: Some(self.draft.name.clone()),
                };
                self.snapshot = self.draft.clone();
                self.is_new_list = false;
                if let Some(hash) = &hash {
                    self.popups.push(PopupContent::Info { summary: notice }, Some(hash.as_str()));
                }
                self.save_state = OpState::Succeeded(hash.clone());
                Ok(hash)
            }
            Err(e) => {
                error!("Saving token list failed: {}", e);
                self.popups.error(e.to_string(), e.code(), None);
                self.save_state = OpState::Failed(e.to_string());
                Err(e)
            }
        }
    }
}
