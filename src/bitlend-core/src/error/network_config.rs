use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkConfigError {
    #[error("network '{0}' does not specify any gateway providers")]
    NetworkHasNoProviders(String),

    #[error("failed to parse gateway url {0}")]
    ParseProviderUrlFailed(Box<String>, #[source] url::ParseError),
}
