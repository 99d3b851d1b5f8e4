use crate::error::builder::BuildAgentError;
use crate::error::provider::ConnectError;
use crate::error::root_key::FetchRootKeyError;
use crate::provider::WalletKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("another login is already in flight")]
    LoginInFlight,

    #[error("no provider is registered for {0}")]
    UnknownProvider(WalletKind),

    #[error(transparent)]
    Connect(#[from] ConnectError),
}

#[derive(Error, Debug)]
pub enum CreateAgentError {
    #[error("no wallet session is active")]
    NotAuthenticated,

    #[error(transparent)]
    BuildAgent(#[from] BuildAgentError),

    #[error(transparent)]
    FetchRootKey(#[from] FetchRootKeyError),
}
