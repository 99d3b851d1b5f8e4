use ic_agent::AgentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchRootKeyError {
    #[error("failed to fetch the root key from the replica")]
    ReplicaError(#[source] AgentError),
}
