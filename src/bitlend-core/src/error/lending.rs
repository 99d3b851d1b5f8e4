use ic_agent::AgentError;
use ic_utils::canister::CanisterBuilderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CallError {
    #[error("failed to build lending canister client")]
    Build(#[source] CanisterBuilderError),

    #[error("call to the lending canister failed")]
    Agent(#[source] AgentError),

    #[error("the lending canister rejected the call: {0}")]
    Rejected(String),
}
