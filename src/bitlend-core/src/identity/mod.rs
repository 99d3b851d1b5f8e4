//! Session identity type.
//!
//! Whatever wallet the user signed in with, the rest of the crate sees one
//! identity type. The wallet kind travels with the identity so a signing
//! capability can never be built against the wrong provider's transport.
use crate::provider::WalletKind;
use candid::Principal;
use ic_agent::agent::EnvelopeContent;
use ic_agent::identity::{Delegation, DelegatedIdentity, SignedDelegation};
use ic_agent::Signature;

pub mod delegation;

pub struct SessionIdentity {
    /// The wallet that produced this identity.
    wallet: WalletKind,

    /// Inner implementation of this identity.
    inner: Box<dyn ic_agent::Identity + Sync + Send>,
}

impl SessionIdentity {
    /// Identity backed by a delegation chain from the identity provider.
    pub fn delegated(inner: DelegatedIdentity) -> Self {
        Self {
            wallet: WalletKind::InternetIdentity,
            inner: Box::new(inner),
        }
    }

    /// Identity for an extension-wallet session. The wallet keeps the keys;
    /// this identity can name the caller but cannot sign.
    pub fn wallet(principal: Principal) -> Self {
        Self {
            wallet: WalletKind::ExtensionWallet,
            inner: Box::new(WalletSessionIdentity { principal }),
        }
    }

    pub fn wallet_kind(&self) -> WalletKind {
        self.wallet
    }
}

impl ic_agent::Identity for SessionIdentity {
    fn sender(&self) -> Result<Principal, String> {
        self.inner.sender()
    }

    fn public_key(&self) -> Option<Vec<u8>> {
        self.inner.public_key()
    }

    fn delegation_chain(&self) -> Vec<SignedDelegation> {
        self.inner.delegation_chain()
    }

    fn sign(&self, content: &EnvelopeContent) -> Result<Signature, String> {
        self.inner.sign(content)
    }

    fn sign_arbitrary(&self, content: &[u8]) -> Result<Signature, String> {
        self.inner.sign_arbitrary(content)
    }

    fn sign_delegation(&self, content: &Delegation) -> Result<Signature, String> {
        self.inner.sign_delegation(content)
    }
}

/// Extension-wallet sessions expose the principal only; request signing
/// happens inside the extension, on its own transport.
struct WalletSessionIdentity {
    principal: Principal,
}

impl ic_agent::Identity for WalletSessionIdentity {
    fn sender(&self) -> Result<Principal, String> {
        Ok(self.principal)
    }

    fn public_key(&self) -> Option<Vec<u8>> {
        None
    }

    fn sign(&self, _content: &EnvelopeContent) -> Result<Signature, String> {
        Err("extension wallet sessions sign inside the wallet".to_string())
    }
}
