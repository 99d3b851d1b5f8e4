use crate::config::network_descriptor::NetworkDescriptor;
use crate::error::root_key::FetchRootKeyError;
use ic_agent::Agent;

/// Fetches the root key of a local network. The hardcoded mainnet key is
/// used as-is when the network is the real IC.
pub async fn fetch_root_key_if_needed(
    agent: &Agent,
    network: &NetworkDescriptor,
) -> Result<(), FetchRootKeyError> {
    if !network.is_ic {
        agent
            .fetch_root_key()
            .await
            .map_err(FetchRootKeyError::ReplicaError)?;
    }
    Ok(())
}
