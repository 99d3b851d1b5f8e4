use crate::error::provider::{ConnectError, DisconnectError};
use crate::identity::SessionIdentity;
use crate::provider::{ProviderSession, WalletKind, WalletProvider};
use async_trait::async_trait;
use candid::Principal;
use ic_agent::Agent;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

/// Timeout the wallet applies to its own connect prompt.
pub const CONNECT_TIMEOUT_MS: u64 = 50_000;

/// Parameters of a wallet connection: which canisters the session may act
/// on, which gateway the wallet's agent should talk to.
#[derive(Clone, Debug)]
pub struct ConnectArgs {
    pub whitelist: Vec<String>,
    pub host: String,
    pub timeout_ms: u64,
}

/// The object the extension injects into the host environment. Implemented
/// by the embedding application over the real extension; absent entirely
/// when the extension is not installed.
#[async_trait]
pub trait WalletBridge: Send + Sync {
    /// Ask the wallet to open its connect prompt. Resolves to the session's
    /// connection token (the wallet-held public key).
    async fn request_connect(&self, args: &ConnectArgs) -> Result<Vec<u8>, String>;

    /// Establish the wallet-owned transport scoped to the same
    /// allow-list and host as the connect request.
    async fn create_agent(&self, args: &ConnectArgs) -> Result<Agent, String>;

    async fn principal(&self) -> Result<Principal, String>;

    async fn is_connected(&self) -> bool;

    async fn disconnect(&self) -> Result<(), String>;
}

pub struct ExtensionWalletProvider {
    bridge: Option<Arc<dyn WalletBridge>>,
    args: ConnectArgs,
}

impl ExtensionWalletProvider {
    /// `bridge` is `None` when the extension is not installed in the host
    /// environment; every connect attempt then fails fast.
    pub fn new(
        bridge: Option<Arc<dyn WalletBridge>>,
        whitelist: Vec<String>,
        host: String,
    ) -> Self {
        Self {
            bridge,
            args: ConnectArgs {
                whitelist,
                host,
                timeout_ms: CONNECT_TIMEOUT_MS,
            },
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.args.timeout_ms = timeout_ms;
        self
    }

    fn bridge(&self) -> Result<&Arc<dyn WalletBridge>, ConnectError> {
        self.bridge.as_ref().ok_or(ConnectError::ProviderUnavailable)
    }

    async fn session_from(
        &self,
        bridge: &Arc<dyn WalletBridge>,
    ) -> Result<ProviderSession, ConnectError> {
        let agent = bridge
            .create_agent(&self.args)
            .await
            .map_err(ConnectError::AuthFailed)?;
        let principal = bridge.principal().await.map_err(ConnectError::AuthFailed)?;
        Ok(ProviderSession {
            identity: Arc::new(SessionIdentity::wallet(principal)),
            principal,
            agent: Some(agent),
        })
    }
}

#[async_trait]
impl WalletProvider for ExtensionWalletProvider {
    fn kind(&self) -> WalletKind {
        WalletKind::ExtensionWallet
    }

    fn is_available(&self) -> bool {
        self.bridge.is_some()
    }

    async fn connect(&self) -> Result<ProviderSession, ConnectError> {
        let bridge = self.bridge()?;

        let token = time::timeout(
            Duration::from_millis(self.args.timeout_ms),
            bridge.request_connect(&self.args),
        )
        .await
        .map_err(|_| ConnectError::Timeout(self.args.timeout_ms))?
        .map_err(ConnectError::AuthFailed)?;
        if token.is_empty() {
            return Err(ConnectError::NoConnectionToken);
        }

        self.session_from(bridge).await
    }

    async fn active_session(&self) -> Result<Option<ProviderSession>, ConnectError> {
        let Some(bridge) = self.bridge.as_ref() else {
            return Ok(None);
        };
        if !bridge.is_connected().await {
            return Ok(None);
        }
        Ok(Some(self.session_from(bridge).await?))
    }

    async fn disconnect(&self) -> Result<(), DisconnectError> {
        match self.bridge.as_ref() {
            Some(bridge) => bridge
                .disconnect()
                .await
                .map_err(DisconnectError::LogoutFailed),
            None => Ok(()),
        }
    }
}
