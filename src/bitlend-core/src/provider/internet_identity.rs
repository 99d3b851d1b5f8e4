use crate::error::provider::{ConnectError, DisconnectError};
use crate::identity::delegation::{DelegationError, JsonDelegationChain};
use crate::identity::SessionIdentity;
use crate::provider::{ProviderSession, WalletKind, WalletProvider};
use async_trait::async_trait;
use std::sync::Arc;

/// What the identity provider hands back after a completed authorization:
/// the session key generated for this login and the delegation chain that
/// lets it act on the user's behalf.
pub struct AuthorizedSession {
    pub session_key: Box<dyn ic_agent::Identity + Send + Sync>,
    pub chain: JsonDelegationChain,
}

/// The redirect round-trip against the identity provider, and the storage
/// that lets a delegation survive a restart. Implemented by the embedding
/// application; injected so the provider can run against a fake in tests.
#[async_trait]
pub trait DelegationExchange: Send + Sync {
    /// Run the authorization flow against `identity_provider`. Resolves when
    /// the flow reports success or error; abandonment surfaces as an error.
    async fn authorize(&self, identity_provider: &str) -> Result<AuthorizedSession, ConnectError>;

    /// Delegation persisted by an earlier authorization, if any.
    async fn stored_session(&self) -> Option<AuthorizedSession>;

    /// Drop the persisted delegation.
    async fn clear(&self) -> Result<(), DisconnectError>;
}

pub struct InternetIdentityProvider {
    identity_provider: String,
    exchange: Arc<dyn DelegationExchange>,
}

impl InternetIdentityProvider {
    pub fn new(identity_provider: String, exchange: Arc<dyn DelegationExchange>) -> Self {
        Self {
            identity_provider,
            exchange,
        }
    }

    fn session_from(&self, authorized: AuthorizedSession) -> Result<ProviderSession, ConnectError> {
        let identity = authorized
            .chain
            .into_delegated_identity(authorized.session_key)?;
        let identity = Arc::new(SessionIdentity::delegated(identity));
        let principal = ic_agent::Identity::sender(identity.as_ref()).map_err(ConnectError::AuthFailed)?;
        Ok(ProviderSession {
            identity,
            principal,
            agent: None,
        })
    }
}

#[async_trait]
impl WalletProvider for InternetIdentityProvider {
    fn kind(&self) -> WalletKind {
        WalletKind::InternetIdentity
    }

    async fn connect(&self) -> Result<ProviderSession, ConnectError> {
        let authorized = self.exchange.authorize(&self.identity_provider).await?;
        self.session_from(authorized)
    }

    async fn active_session(&self) -> Result<Option<ProviderSession>, ConnectError> {
        match self.exchange.stored_session().await {
            Some(authorized) => match self.session_from(authorized) {
                Ok(session) => Ok(Some(session)),
                // A delegation that expired while stored means logged out,
                // not a broken restore.
                Err(ConnectError::Delegation(DelegationError::Expired)) => Ok(None),
                Err(err) => Err(err),
            },
            None => Ok(None),
        }
    }

    async fn disconnect(&self) -> Result<(), DisconnectError> {
        self.exchange.clear().await
    }
}
