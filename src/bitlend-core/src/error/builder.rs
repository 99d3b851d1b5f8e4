use crate::error::network_config::NetworkConfigError;
use ic_agent::AgentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildAgentError {
    #[error(transparent)]
    NetworkConfig(#[from] NetworkConfigError),

    #[error("failed to create agent")]
    CreateAgent(#[source] AgentError),
}
