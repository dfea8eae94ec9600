pub mod eligibility;
pub mod favicon;
pub mod routes;

use crate::chain::DomainDataSource;
use crate::core::{Address, ChainId, ClientResult, Config, DomainConfig, LocalStore, OpState};
use log::{debug, error, info, warn};
use std::fmt;
use std::sync::Arc;

pub use eligibility::{is_app_admin, network_eligibility, HostRestrictions};
pub use favicon::{reconcile_favicon, FaviconAction};
pub use routes::{resolve, Route};

/// What the client shows. Exactly one per evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Loading,
    /// Admin editor in place of the trading UI.
    Panel,
    MainApp,
    /// First-run setup for a deployment with no stored data.
    Greeting,
    Connection { network_eligible: bool },
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Loading => write!(f, "loading"),
            RenderMode::Panel => write!(f, "panel"),
            RenderMode::MainApp => write!(f, "main app"),
            RenderMode::Greeting => write!(f, "greeting"),
            RenderMode::Connection { network_eligible } => {
                write!(f, "connection (network eligible: {})", network_eligible)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Dark,
    Default,
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorScheme::Dark => write!(f, "dark"),
            ColorScheme::Default => write!(f, "default"),
        }
    }
}

/// Side effect for the host to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetColorScheme(ColorScheme),
    Reload,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletState {
    pub active: bool,
    pub chain_id: Option<ChainId>,
    pub account: Option<Address>,
}

/// Identifies one domain data fetch. Results carrying an outdated ticket
/// belong to a previous chain and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    pub chain_id: Option<ChainId>,
}

/// Derives the render mode from wallet, domain data and admin state.
pub struct ReadinessGate {
    wallet: WalletState,
    domain: OpState<Option<DomainConfig>>,
    epoch: u64,
    network_eligible: bool,
    app_management: bool,
    greeting_dismissed: bool,
    dark_mode: Option<bool>,
    host: HostRestrictions,
    storage_network_id: ChainId,
    local: Arc<dyn LocalStore>,
}

impl ReadinessGate {
    pub fn new(host: HostRestrictions, storage_network_id: ChainId, local: Arc<dyn LocalStore>) -> Self {
        Self {
            wallet: WalletState::default(),
            domain: OpState::Idle,
            epoch: 0,
            network_eligible: true,
            app_management: false,
            greeting_dismissed: false,
            dark_mode: None,
            host,
            storage_network_id,
            local,
        }
    }

    pub fn from_config(config: &Config, local: Arc<dyn LocalStore>) -> Self {
        Self::new(HostRestrictions::from_config(config), config.storage_network_id, local)
    }

    pub fn wallet(&self) -> &WalletState {
        &self.wallet
    }

    pub fn domain_state(&self) -> &OpState<Option<DomainConfig>> {
        &self.domain
    }

    pub fn domain_config(&self) -> Option<&DomainConfig> {
        self.domain.value().and_then(|c| c.as_ref())
    }

    pub fn network_eligible(&self) -> bool {
        self.network_eligible
    }

    pub fn set_active(&mut self, active: bool) {
        self.wallet.active = active;
    }

    /// Switches chain. The previous domain data no longer applies: it is
    /// dropped and any fetch still in flight is orphaned.
    pub fn set_chain(&mut self, chain_id: Option<ChainId>) {
        if self.wallet.chain_id == chain_id {
            return;
        }
        info!("Chain changed: {:?} -> {:?}", self.wallet.chain_id, chain_id);
        self.wallet.chain_id = chain_id;
        self.epoch += 1;
        self.domain = OpState::Idle;
        self.recompute_eligibility();
    }

    /// Admin identity may differ per account, so only eligibility changes.
    pub fn set_account(&mut self, account: Option<Address>) {
        if self.wallet.account == account {
            return;
        }
        self.wallet.account = account;
        self.recompute_eligibility();
    }

    pub fn set_app_management(&mut self, enabled: bool) {
        self.app_management = enabled;
    }

    pub fn dismiss_greeting(&mut self) {
        self.greeting_dismissed = true;
    }

    /// Emits a scheme change on the first call and whenever the preference flips.
    pub fn set_dark_mode(&mut self, dark: bool) -> Option<Effect> {
        if self.dark_mode == Some(dark) {
            return None;
        }
        self.dark_mode = Some(dark);
        let scheme = if dark {
            ColorScheme::Dark
        } else {
            ColorScheme::Default
        };
        Some(Effect::SetColorScheme(scheme))
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.domain = OpState::InFlight;
        FetchTicket {
            epoch: self.epoch,
            chain_id: self.wallet.chain_id,
        }
    }

    /// Applies a fetch outcome. Failures are logged and leave the gate loading
    /// until the next chain change re-triggers a fetch.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: ClientResult<Option<DomainConfig>>,
    ) -> Vec<Effect> {
        if ticket.epoch != self.epoch {
            debug!(
                "Dropping domain data fetched for chain {:?}; current chain is {:?}",
                ticket.chain_id, self.wallet.chain_id
            );
            return Vec::new();
        }

        match result {
            Ok(config) => {
                if config.is_none() {
                    info!("No domain data stored for this deployment");
                }
                let favicon = config.as_ref().and_then(|c| c.favicon.clone());
                self.domain = OpState::Succeeded(config);
                self.recompute_eligibility();

                match reconcile_favicon(self.local.as_ref(), favicon.as_deref(), false) {
                    Ok(FaviconAction::Reload) => vec![Effect::Reload],
                    Ok(FaviconAction::Keep) => Vec::new(),
                    Err(e) => {
                        warn!("Could not update cached favicon: {}", e);
                        Vec::new()
                    }
                }
            }
            Err(e) => {
                error!("Failed to fetch domain data for chain {:?}: {}", ticket.chain_id, e);
                self.domain = OpState::Failed(e.to_string());
                Vec::new()
            }
        }
    }

    /// Fetches domain data for the current chain and applies it.
    pub async fn refresh(&mut self, source: &dyn DomainDataSource) -> Vec<Effect> {
        let ticket = self.begin_fetch();
        let result = source.fetch_domain_data(ticket.chain_id).await;
        self.complete_fetch(ticket, result)
    }

    fn recompute_eligibility(&mut self) {
        // Without a chain the last verdict stands
        let Some(chain_id) = self.wallet.chain_id else {
            return;
        };
        let admin = self.domain_config().and_then(|c| c.admin.clone());
        self.network_eligible = network_eligibility(
            chain_id,
            self.wallet.account.as_ref(),
            admin.as_ref(),
            &self.host,
            self.storage_network_id,
        );
    }

    /// Wallet active, contracts known and the network allowed.
    pub fn is_ready(&self) -> bool {
        self.wallet.active
            && self.domain_config().map_or(false, DomainConfig::has_contracts)
            && self.network_eligible
    }

    fn greeting_active(&self) -> bool {
        !self.greeting_dismissed && !self.domain_config().map_or(false, DomainConfig::has_admin)
    }

    pub fn render_mode(&self) -> RenderMode {
        if !self.domain.is_resolved() {
            return RenderMode::Loading;
        }

        if self.is_ready() {
            return if self.app_management {
                RenderMode::Panel
            } else {
                RenderMode::MainApp
            };
        }

        if self.greeting_active() {
            RenderMode::Greeting
        } else {
            RenderMode::Connection {
                network_eligible: self.network_eligible,
            }
        }
    }

    /// Document title: the project name once known.
    pub fn title<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.domain_config()
            .map(|c| c.project_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClientError, MemoryStore, FAVICON_STORAGE_KEY, STORAGE_NETWORK_ID};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const ADMIN: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18";
    const FACTORY: &str = "0x2222222222222222222222222222222222222222";
    const ROUTER: &str = "0x3333333333333333333333333333333333333333";
    const STRANGER: &str = "0x4444444444444444444444444444444444444444";

    fn full_config() -> DomainConfig {
        DomainConfig {
            admin: Some(ADMIN.parse().unwrap()),
            factory: Some(FACTORY.parse().unwrap()),
            router: Some(ROUTER.parse().unwrap()),
            project_name: "Example Swap".to_string(),
            pair_hash: "0xabc".to_string(),
            favicon: None,
        }
    }

    fn gate() -> (ReadinessGate, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let gate = ReadinessGate::new(HostRestrictions::default(), STORAGE_NETWORK_ID, store.clone());
        (gate, store)
    }

    fn connected(gate: &mut ReadinessGate, chain_id: ChainId, account: &str) {
        gate.set_active(true);
        gate.set_chain(Some(chain_id));
        gate.set_account(Some(account.parse().unwrap()));
    }

    struct FailingSource;

    #[async_trait]
    impl DomainDataSource for FailingSource {
        async fn fetch_domain_data(&self, _chain_id: Option<ChainId>) -> ClientResult<Option<DomainConfig>> {
            Err(ClientError::NetworkError("connection refused".to_string()))
        }
    }

    struct FixedSource(Option<DomainConfig>);

    #[async_trait]
    impl DomainDataSource for FixedSource {
        async fn fetch_domain_data(&self, _chain_id: Option<ChainId>) -> ClientResult<Option<DomainConfig>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_loading_until_resolved() {
        let (mut gate, _) = gate();
        assert_eq!(gate.render_mode(), RenderMode::Loading);
        gate.begin_fetch();
        assert_eq!(gate.render_mode(), RenderMode::Loading);
    }

    #[tokio::test]
    async fn test_main_app_when_ready() {
        let (mut gate, _) = gate();
        connected(&mut gate, 56, ADMIN);
        gate.refresh(&FixedSource(Some(full_config()))).await;
        assert_eq!(gate.render_mode(), RenderMode::MainApp);

        gate.set_app_management(true);
        assert_eq!(gate.render_mode(), RenderMode::Panel);
        assert_eq!(gate.title("DEX"), "Example Swap");
    }

    struct CaptureLogger;

    lazy_static::lazy_static! {
        static ref CAPTURED: Mutex<Vec<(log::Level, String)>> = Mutex::new(Vec::new());
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut captured) = CAPTURED.lock() {
                captured.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger;

    fn capture_logs() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Debug);
    }

    #[tokio::test]
    async fn test_failed_fetch_stays_loading() {
        capture_logs();
        let (mut gate, _) = gate();
        connected(&mut gate, 56, ADMIN);
        let effects = gate.refresh(&FailingSource).await;
        assert!(effects.is_empty());
        assert!(matches!(gate.domain_state(), OpState::Failed(_)));
        assert_eq!(gate.render_mode(), RenderMode::Loading);

        let captured = CAPTURED.lock().unwrap();
        assert!(captured.iter().any(|(level, message)| {
            *level == log::Level::Error
                && message.contains("Failed to fetch domain data for chain Some(56)")
                && message.contains("connection refused")
        }));
    }

    #[tokio::test]
    async fn test_greeting_for_unclaimed_deployment() {
        let (mut gate, _) = gate();
        connected(&mut gate, 56, ADMIN);
        gate.refresh(&FixedSource(None)).await;
        assert_eq!(gate.render_mode(), RenderMode::Greeting);

        gate.dismiss_greeting();
        assert_eq!(
            gate.render_mode(),
            RenderMode::Connection {
                network_eligible: true
            }
        );
    }

    #[tokio::test]
    async fn test_connection_when_wallet_inactive() {
        let (mut gate, _) = gate();
        gate.set_chain(Some(56));
        gate.refresh(&FixedSource(Some(full_config()))).await;
        assert_eq!(
            gate.render_mode(),
            RenderMode::Connection {
                network_eligible: true
            }
        );
    }

    #[tokio::test]
    async fn test_unsupported_chain_shows_ineligible_connection() {
        let (mut gate, _) = gate();
        connected(&mut gate, 31337, ADMIN);
        gate.refresh(&FixedSource(Some(full_config()))).await;
        assert_eq!(
            gate.render_mode(),
            RenderMode::Connection {
                network_eligible: false
            }
        );
    }

    #[tokio::test]
    async fn test_account_change_rechecks_eligibility() {
        let store = Arc::new(MemoryStore::new());
        let host = HostRestrictions {
            admin: None,
            network_ids: vec![137],
        };
        let mut gate = ReadinessGate::new(host, STORAGE_NETWORK_ID, store);
        connected(&mut gate, STORAGE_NETWORK_ID, ADMIN);
        gate.refresh(&FixedSource(Some(full_config()))).await;
        assert!(gate.network_eligible());

        gate.set_account(Some(STRANGER.parse().unwrap()));
        assert!(!gate.network_eligible());
        assert!(gate.domain_state().is_resolved());
    }

    #[test]
    fn test_stale_fetch_is_dropped() {
        let (mut gate, _) = gate();
        connected(&mut gate, 56, ADMIN);
        let stale = gate.begin_fetch();

        gate.set_chain(Some(1));
        let current = gate.begin_fetch();

        let effects = gate.complete_fetch(stale, Ok(Some(full_config())));
        assert!(effects.is_empty());
        assert!(gate.domain_state().is_in_flight());

        gate.complete_fetch(current, Ok(Some(full_config())));
        assert!(gate.domain_state().is_resolved());
    }

    #[test]
    fn test_chain_change_invalidates_domain_data() {
        let (mut gate, _) = gate();
        connected(&mut gate, 56, ADMIN);
        let ticket = gate.begin_fetch();
        gate.complete_fetch(ticket, Ok(Some(full_config())));
        assert_eq!(gate.render_mode(), RenderMode::MainApp);

        gate.set_chain(Some(137));
        assert_eq!(gate.render_mode(), RenderMode::Loading);
        assert!(gate.domain_config().is_none());
    }

    #[test]
    fn test_new_favicon_requests_single_reload() {
        let (mut gate, store) = gate();
        connected(&mut gate, 56, ADMIN);
        let config = DomainConfig {
            favicon: Some("https://example.org/new.ico".to_string()),
            ..full_config()
        };

        let ticket = gate.begin_fetch();
        assert_eq!(gate.complete_fetch(ticket, Ok(Some(config.clone()))), vec![Effect::Reload]);
        assert_eq!(
            store.get(FAVICON_STORAGE_KEY).unwrap().as_deref(),
            Some("https://example.org/new.ico")
        );

        let ticket = gate.begin_fetch();
        assert!(gate.complete_fetch(ticket, Ok(Some(config))).is_empty());
    }

    #[test]
    fn test_dark_mode_effect() {
        let (mut gate, _) = gate();
        assert_eq!(gate.set_dark_mode(false), Some(Effect::SetColorScheme(ColorScheme::Default)));
        assert_eq!(gate.set_dark_mode(false), None);
        assert_eq!(gate.set_dark_mode(true), Some(Effect::SetColorScheme(ColorScheme::Dark)));
    }
}
