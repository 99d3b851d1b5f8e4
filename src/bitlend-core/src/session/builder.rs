use crate::config::network_descriptor::NetworkDescriptor;
use crate::error::builder::BuildAgentError;
use crate::error::network_config::NetworkConfigError;
use crate::identity::SessionIdentity;
use crate::provider::extension_wallet::{ExtensionWalletProvider, WalletBridge};
use crate::provider::internet_identity::{DelegationExchange, InternetIdentityProvider};
use crate::provider::WalletProvider;
use crate::session::SessionManager;
use ic_agent::Agent;
use slog::{o, Logger};
use std::sync::Arc;

#[derive(PartialEq)]
pub enum NetworkPicker {
    Local,
    Mainnet,
    Custom(NetworkDescriptor),
}

/// Assembles a [`SessionManager`] owned by the application root.
///
/// The two standard providers are wired from whatever the host environment
/// supplies: a delegation exchange for the redirect flow, a wallet bridge
/// when the extension is installed. Tests inject providers directly.
pub struct SessionManagerBuilder {
    network: NetworkPicker,
    logger: Option<Logger>,
    whitelist: Vec<String>,
    exchange: Option<Arc<dyn DelegationExchange>>,
    wallet_bridge: Option<Arc<dyn WalletBridge>>,
    wallet_connect_timeout_ms: Option<u64>,
    providers: Vec<Arc<dyn WalletProvider>>,
}

impl SessionManagerBuilder {
    pub fn new() -> Self {
        Self {
            network: NetworkPicker::Local,
            logger: None,
            whitelist: Vec::new(),
            exchange: None,
            wallet_bridge: None,
            wallet_connect_timeout_ms: None,
            providers: Vec::new(),
        }
    }

    pub fn mainnet(self) -> Self {
        self.with_network(NetworkPicker::Mainnet)
    }

    pub fn with_network(self, network: NetworkPicker) -> Self {
        Self { network, ..self }
    }

    pub fn with_logger(self, logger: Logger) -> Self {
        Self {
            logger: Some(logger),
            ..self
        }
    }

    /// Canisters the extension-wallet session is allowed to act on.
    pub fn with_whitelist(self, whitelist: Vec<String>) -> Self {
        Self { whitelist, ..self }
    }

    pub fn with_delegation_exchange(self, exchange: Arc<dyn DelegationExchange>) -> Self {
        Self {
            exchange: Some(exchange),
            ..self
        }
    }

    /// Pass `None` when the extension is not installed; login attempts
    /// against it then fail fast as unavailable.
    pub fn with_wallet_bridge(self, bridge: Option<Arc<dyn WalletBridge>>) -> Self {
        Self {
            wallet_bridge: bridge,
            ..self
        }
    }

    pub fn with_wallet_connect_timeout_ms(self, timeout_ms: u64) -> Self {
        Self {
            wallet_connect_timeout_ms: Some(timeout_ms),
            ..self
        }
    }

    /// Register a provider directly, skipping the standard wiring. Intended
    /// for substituting test doubles.
    pub fn with_provider(mut self, provider: Arc<dyn WalletProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn build(self) -> Result<SessionManager, NetworkConfigError> {
        let network = match self.network {
            NetworkPicker::Local => NetworkDescriptor::local(),
            NetworkPicker::Mainnet => NetworkDescriptor::mainnet(),
            NetworkPicker::Custom(descriptor) => descriptor,
        };
        let logger = self
            .logger
            .unwrap_or_else(|| Logger::root(slog::Discard, o!()));

        let mut providers = self.providers;
        if providers.is_empty() {
            // Internet Identity first: when both providers report an active
            // session on initialize, the delegated identity wins.
            if let Some(exchange) = self.exchange {
                providers.push(Arc::new(InternetIdentityProvider::new(
                    network.identity_provider.clone(),
                    exchange,
                )));
            }
            let host = network.first_provider()?.to_string();
            let mut wallet =
                ExtensionWalletProvider::new(self.wallet_bridge, self.whitelist, host);
            if let Some(timeout_ms) = self.wallet_connect_timeout_ms {
                wallet = wallet.with_timeout_ms(timeout_ms);
            }
            providers.push(Arc::new(wallet));
        }

        Ok(SessionManager::new(logger, network, providers))
    }
}

impl Default for SessionManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn build_agent(
    identity: Arc<SessionIdentity>,
    network: &NetworkDescriptor,
) -> Result<Agent, BuildAgentError> {
    let url = network.first_provider()?;
    Agent::builder()
        .with_url(url)
        .with_arc_identity(identity)
        .build()
        .map_err(BuildAgentError::CreateAgent)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::network_descriptor::MAINNET_IDENTITY_PROVIDER;
    use crate::provider::WalletKind;

    #[test]
    fn default_build_registers_the_wallet_provider_only() {
        let manager = SessionManagerBuilder::new().build().unwrap();
        assert_eq!(manager.network().name, "local");
        assert!(!manager.is_authenticated());
        // No delegation exchange was supplied, so the delegated-identity
        // flow is not wired.
        assert!(manager
            .providers
            .iter()
            .all(|p| p.kind() == WalletKind::ExtensionWallet));
    }

    #[test]
    fn mainnet_build_uses_the_public_endpoints() {
        let manager = SessionManagerBuilder::new().mainnet().build().unwrap();
        assert!(manager.network().is_ic);
        assert_eq!(
            manager.network().identity_provider,
            MAINNET_IDENTITY_PROVIDER
        );
    }

    #[test]
    fn custom_network_without_providers_is_rejected() {
        let descriptor = NetworkDescriptor {
            name: "empty".to_string(),
            providers: vec![],
            identity_provider: MAINNET_IDENTITY_PROVIDER.to_string(),
            is_ic: false,
        };
        let result = SessionManagerBuilder::new()
            .with_network(NetworkPicker::Custom(descriptor))
            .build();
        assert!(matches!(
            result,
            Err(NetworkConfigError::NetworkHasNoProviders(_))
        ));
    }
}
