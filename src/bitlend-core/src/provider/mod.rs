//! Wallet provider contract.
//!
//! The two login flows are structurally different: the delegated-identity
//! flow hands back a delegation chain and no transport, the extension wallet
//! hands back a ready-made agent and no keys. Both are normalized here into
//! [`ProviderSession`] so the session manager depends on one contract only.
use crate::error::provider::{ConnectError, DisconnectError};
use crate::identity::SessionIdentity;
use async_trait::async_trait;
use candid::Principal;
use ic_agent::Agent;
use std::fmt;
use std::sync::Arc;

pub mod extension_wallet;
pub mod internet_identity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalletKind {
    InternetIdentity,
    ExtensionWallet,
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletKind::InternetIdentity => write!(f, "internet-identity"),
            WalletKind::ExtensionWallet => write!(f, "extension-wallet"),
        }
    }
}

/// The normalized result of a successful connect or session restore.
pub struct ProviderSession {
    pub identity: Arc<SessionIdentity>,
    pub principal: Principal,

    /// Transport supplied by the provider itself. `Some` only for the
    /// extension wallet; delegated-identity sessions get an agent built
    /// against the configured gateway instead.
    pub agent: Option<Agent>,
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    fn kind(&self) -> WalletKind;

    /// Whether this provider can be used at all in the host environment.
    fn is_available(&self) -> bool {
        true
    }

    /// Check for a session that survived a restart of the host application.
    async fn active_session(&self) -> Result<Option<ProviderSession>, ConnectError>;

    async fn connect(&self) -> Result<ProviderSession, ConnectError>;

    async fn disconnect(&self) -> Result<(), DisconnectError>;
}
