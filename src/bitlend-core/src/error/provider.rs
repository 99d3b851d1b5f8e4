use crate::identity::delegation::DelegationError;
use thiserror::Error;

/// Failure of a wallet provider's connect procedure. Caught at the adapter
/// boundary; never propagates as a panic into consumer code.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("wallet extension is not installed")]
    ProviderUnavailable,

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("connect request timed out after {0} ms")]
    Timeout(u64),

    #[error("connect request returned no connection token")]
    NoConnectionToken,

    #[error(transparent)]
    Delegation(#[from] DelegationError),
}

/// Provider-native logout failure. Best-effort: local session state is
/// cleared whether or not this occurs.
#[derive(Error, Debug)]
pub enum DisconnectError {
    #[error("provider logout failed: {0}")]
    LogoutFailed(String),
}
