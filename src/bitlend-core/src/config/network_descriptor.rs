use crate::error::network_config::NetworkConfigError;
use url::Url;

pub const DEFAULT_IC_GATEWAY: &str = "https://ic0.app";
pub const DEFAULT_IC_GATEWAY_TRAILING_SLASH: &str = "https://ic0.app/";
pub const MAINNET_IDENTITY_PROVIDER: &str = "https://identity.ic0.app";

pub const LOCAL_GATEWAY: &str = "http://localhost:4943";
pub const LOCAL_IDENTITY_PROVIDER: &str = "http://rdmx6-jaaaa-aaaaa-aaadq-cai.localhost:4943";

/// Where the session talks to: gateway providers for canister calls and the
/// identity provider used for the delegated-identity login flow.
///
/// Endpoint selection is resolved by the embedding application and injected
/// here; the core never inspects the runtime environment itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub name: String,
    pub providers: Vec<String>,
    pub identity_provider: String,
    pub is_ic: bool,
}

impl NetworkDescriptor {
    pub fn mainnet() -> Self {
        NetworkDescriptor {
            name: "ic".to_string(),
            providers: vec![DEFAULT_IC_GATEWAY.to_string()],
            identity_provider: MAINNET_IDENTITY_PROVIDER.to_string(),
            is_ic: true,
        }
    }

    pub fn local() -> Self {
        NetworkDescriptor {
            name: "local".to_string(),
            providers: vec![LOCAL_GATEWAY.to_string()],
            identity_provider: LOCAL_IDENTITY_PROVIDER.to_string(),
            is_ic: false,
        }
    }

    /// Determines whether the provided connection is the official IC or not.
    #[allow(clippy::ptr_arg)]
    pub fn is_ic(network_name: &str, providers: &Vec<String>) -> bool {
        let name_match = matches!(
            network_name,
            "ic" | DEFAULT_IC_GATEWAY | DEFAULT_IC_GATEWAY_TRAILING_SLASH
        );
        let provider_match = {
            providers.len() == 1
                && matches!(
                    providers.get(0).unwrap().as_str(),
                    DEFAULT_IC_GATEWAY | DEFAULT_IC_GATEWAY_TRAILING_SLASH
                )
        };
        name_match || provider_match
    }

    /// Return the first provider in the list
    pub fn first_provider(&self) -> Result<&str, NetworkConfigError> {
        match self.providers.first() {
            Some(provider) => Ok(provider),
            None => Err(NetworkConfigError::NetworkHasNoProviders(self.name.clone())),
        }
    }

    /// First gateway provider, parsed.
    pub fn gateway_url(&self) -> Result<Url, NetworkConfigError> {
        let provider = self.first_provider()?;
        Url::parse(provider).map_err(|e| {
            NetworkConfigError::ParseProviderUrlFailed(Box::new(provider.to_string()), e)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ic_by_netname() {
        assert!(NetworkDescriptor::is_ic("ic", &vec![]));
        assert!(NetworkDescriptor::is_ic(DEFAULT_IC_GATEWAY, &vec![]));
        assert!(NetworkDescriptor::is_ic(
            DEFAULT_IC_GATEWAY_TRAILING_SLASH,
            &vec![]
        ));
    }

    #[test]
    fn ic_by_provider() {
        assert!(NetworkDescriptor::is_ic(
            "not_ic",
            &vec![DEFAULT_IC_GATEWAY.to_string()]
        ));
    }

    #[test]
    fn ic_by_netname_fail() {
        assert!(!NetworkDescriptor::is_ic("not_ic", &vec![]));
    }

    #[test]
    fn mainnet_descriptor_is_ic() {
        let network = NetworkDescriptor::mainnet();
        assert!(network.is_ic);
        assert_eq!(network.first_provider().unwrap(), DEFAULT_IC_GATEWAY);
        assert_eq!(network.identity_provider, MAINNET_IDENTITY_PROVIDER);
    }

    #[test]
    fn local_descriptor_is_not_ic() {
        let network = NetworkDescriptor::local();
        assert!(!network.is_ic);
        assert_eq!(network.gateway_url().unwrap().port(), Some(4943));
    }

    #[test]
    fn no_providers() {
        let network = NetworkDescriptor {
            name: "empty".to_string(),
            providers: vec![],
            identity_provider: MAINNET_IDENTITY_PROVIDER.to_string(),
            is_ic: false,
        };
        assert!(matches!(
            network.first_provider(),
            Err(NetworkConfigError::NetworkHasNoProviders(_))
        ));
    }
}
