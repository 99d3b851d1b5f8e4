//! Session manager: the single source of truth for who is logged in and how.
//!
//! Consumers never talk to a wallet provider directly. They ask this type to
//! log in, log out, and mint the agent that canister calls go through.
use crate::config::network_descriptor::NetworkDescriptor;
use crate::error::session::{CreateAgentError, LoginError};
use crate::identity::SessionIdentity;
use crate::network::root_key::fetch_root_key_if_needed;
use crate::provider::{ProviderSession, WalletKind, WalletProvider};
use candid::Principal;
use ic_agent::Agent;
use slog::{debug, info, warn, Logger};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time;

pub mod builder;

pub use builder::{NetworkPicker, SessionManagerBuilder};

/// How long a provider's own logout may run before local state is cleared
/// without it.
const LOGOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// The authenticated session. Exists only as a whole: a wallet kind is never
/// recorded without the identity that wallet produced.
#[derive(Clone)]
pub struct ActiveSession {
    pub wallet: WalletKind,
    pub identity: Arc<SessionIdentity>,
    pub principal: Principal,
    pub agent: Option<Agent>,
}

pub struct SessionManager {
    logger: Logger,
    network: NetworkDescriptor,

    /// Checked in order by `initialize`; the first provider reporting an
    /// active session wins.
    providers: Vec<Arc<dyn WalletProvider>>,

    /// Replaced in a single assignment per transition, so readers observe
    /// either the previous session or the new one, never a half-written mix.
    state: RwLock<Option<ActiveSession>>,

    /// Held for the duration of one login attempt; concurrent attempts are
    /// rejected, not queued.
    login_gate: Mutex<()>,
}

impl SessionManager {
    pub fn builder() -> SessionManagerBuilder {
        SessionManagerBuilder::new()
    }

    pub fn new(
        logger: Logger,
        network: NetworkDescriptor,
        providers: Vec<Arc<dyn WalletProvider>>,
    ) -> Self {
        Self {
            logger,
            network,
            providers,
            state: RwLock::new(None),
            login_gate: Mutex::new(()),
        }
    }

    /// Restore a session that survived a restart of the host application.
    ///
    /// Never fails: a provider that cannot be checked is logged and skipped,
    /// and the state is left unauthenticated when nothing restores.
    pub async fn initialize(&self) {
        if self.is_authenticated() {
            return;
        }
        for provider in &self.providers {
            if !provider.is_available() {
                debug!(
                    self.logger,
                    "wallet provider {} is not available", provider.kind()
                );
                continue;
            }
            match provider.active_session().await {
                Ok(Some(session)) => {
                    info!(
                        self.logger,
                        "restored {} session for {}", provider.kind(), session.principal
                    );
                    self.commit(provider.kind(), session);
                    return;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        self.logger,
                        "could not check {} for an active session: {}", provider.kind(), err
                    );
                }
            }
        }
    }

    /// Log in with the named wallet. At most one login may be in flight;
    /// further attempts fail with [`LoginError::LoginInFlight`] until the
    /// first resolves. On failure the previous state is left untouched so
    /// the caller can present a retry.
    pub async fn login_with(&self, kind: WalletKind) -> Result<(), LoginError> {
        let Ok(_guard) = self.login_gate.try_lock() else {
            return Err(LoginError::LoginInFlight);
        };
        let provider = self.provider(kind).ok_or(LoginError::UnknownProvider(kind))?;
        match provider.connect().await {
            Ok(session) => {
                info!(self.logger, "logged in to {} as {}", kind, session.principal);
                self.commit(kind, session);
                Ok(())
            }
            Err(err) => {
                warn!(self.logger, "{} login failed: {}", kind, err);
                Err(LoginError::Connect(err))
            }
        }
    }

    /// Log out of the active session, if any. The provider's own logout is
    /// best-effort and bounded; local state is cleared unconditionally so a
    /// failed disconnect can never leave the user looking authenticated.
    pub async fn logout(&self) {
        let Some(active) = self.active_session() else {
            return;
        };
        if let Some(provider) = self.provider(active.wallet) {
            match time::timeout(LOGOUT_TIMEOUT, provider.disconnect()).await {
                Ok(Ok(())) => info!(self.logger, "logged out of {}", active.wallet),
                Ok(Err(err)) => {
                    warn!(self.logger, "{} logout failed: {}", active.wallet, err);
                }
                Err(_) => {
                    warn!(
                        self.logger,
                        "{} logout timed out; clearing local session anyway", active.wallet
                    );
                }
            }
        }
        *self.write_state() = None;
    }

    /// Agent for canister calls on behalf of the active session: the
    /// wallet-owned transport for extension sessions, otherwise a fresh
    /// agent bound to the session identity and the configured gateway.
    pub async fn create_agent(&self) -> Result<Agent, CreateAgentError> {
        let active = self
            .active_session()
            .ok_or(CreateAgentError::NotAuthenticated)?;
        if let Some(agent) = active.agent {
            return Ok(agent);
        }
        let agent = builder::build_agent(active.identity, &self.network)?;
        fetch_root_key_if_needed(&agent, &self.network).await?;
        Ok(agent)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state(|state| state.is_some())
    }

    pub fn principal(&self) -> Option<String> {
        self.read_state(|state| state.as_ref().map(|s| s.principal.to_text()))
    }

    pub fn wallet_type(&self) -> Option<WalletKind> {
        self.read_state(|state| state.as_ref().map(|s| s.wallet))
    }

    pub fn identity(&self) -> Option<Arc<SessionIdentity>> {
        self.read_state(|state| state.as_ref().map(|s| s.identity.clone()))
    }

    pub fn active_session(&self) -> Option<ActiveSession> {
        self.read_state(Clone::clone)
    }

    pub fn network(&self) -> &NetworkDescriptor {
        &self.network
    }

    fn provider(&self, kind: WalletKind) -> Option<&Arc<dyn WalletProvider>> {
        self.providers.iter().find(|p| p.kind() == kind)
    }

    fn commit(&self, wallet: WalletKind, session: ProviderSession) {
        let active = ActiveSession {
            wallet,
            identity: session.identity,
            principal: session.principal,
            agent: session.agent,
        };
        *self.write_state() = Some(active);
    }

    fn read_state<T>(&self, f: impl FnOnce(&Option<ActiveSession>) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, Option<ActiveSession>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
