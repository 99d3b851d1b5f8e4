use ic_agent::identity::{DelegatedIdentity, Delegation, SignedDelegation};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DelegationError {
    #[error("malformed delegation: {0}")]
    Malformed(String),

    #[error("this delegation has expired; request a fresh delegation and try again")]
    Expired,

    #[error("delegation chain rejected: {0}")]
    ChainInvalid(String),
}

/// One hop of the chain as the identity provider hands it back: hex-encoded
/// fields, expiration in hexadecimal nanoseconds since the epoch.
#[derive(Debug, candid::Deserialize, serde::Serialize)]
pub struct JsonDelegation {
    expiration: String,
    pubkey: String,
}

#[derive(Debug, candid::Deserialize, serde::Serialize)]
pub struct SignedJsonDelegation {
    delegation: JsonDelegation,
    signature: String,
}

#[derive(Debug, candid::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDelegationChain {
    delegations: Vec<SignedJsonDelegation>,
    public_key: String,
}

impl SignedJsonDelegation {
    fn to_signed_delegation(&self) -> Result<SignedDelegation, DelegationError> {
        let expiration = u64::from_str_radix(&self.delegation.expiration, 16)
            .map_err(|err| DelegationError::Malformed(err.to_string()))?;

        let now_in_nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|err| DelegationError::Malformed(err.to_string()))?
            .as_nanos();
        if u128::from(expiration) < now_in_nanos {
            return Err(DelegationError::Expired);
        }

        let pubkey = hex::decode(&self.delegation.pubkey)
            .map_err(|err| DelegationError::Malformed(err.to_string()))?;
        let signature =
            hex::decode(&self.signature).map_err(|err| DelegationError::Malformed(err.to_string()))?;

        Ok(SignedDelegation {
            delegation: Delegation {
                expiration,
                pubkey,
                targets: None,
            },
            signature,
        })
    }
}

impl JsonDelegationChain {
    pub fn new(delegations: Vec<SignedJsonDelegation>, public_key: String) -> Self {
        Self {
            delegations,
            public_key,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DelegationError> {
        serde_json::from_str(json).map_err(|err| DelegationError::Malformed(err.to_string()))
    }

    /// Decode and validate every hop. Expired delegations are rejected here,
    /// before an identity is ever constructed from them.
    pub fn signed_delegations(&self) -> Result<Vec<SignedDelegation>, DelegationError> {
        self.delegations
            .iter()
            .map(SignedJsonDelegation::to_signed_delegation)
            .collect()
    }

    /// Build the identity the session signs with: the session key generated
    /// for this login, acting under the chain's delegated authority.
    pub fn into_delegated_identity(
        self,
        session_key: Box<dyn ic_agent::Identity + Send + Sync>,
    ) -> Result<DelegatedIdentity, DelegationError> {
        let delegations = self.signed_delegations()?;
        let from_key = hex::decode(&self.public_key)
            .map_err(|err| DelegationError::Malformed(err.to_string()))?;

        DelegatedIdentity::new(from_key, session_key, delegations)
            .map_err(|err| DelegationError::ChainInvalid(err.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub(crate) fn hex_nanos_from_now(offset_nanos: i128) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos() as i128;
        format!("{:x}", (now + offset_nanos) as u64)
    }

    pub(crate) fn chain_expiring_in(offset_nanos: i128, pubkey: &[u8]) -> JsonDelegationChain {
        JsonDelegationChain::new(
            vec![SignedJsonDelegation {
                delegation: JsonDelegation {
                    expiration: hex_nanos_from_now(offset_nanos),
                    pubkey: hex::encode(pubkey),
                },
                signature: "deadbeef".to_string(),
            }],
            hex::encode([7u8; 32]),
        )
    }

    const HOUR_NANOS: i128 = 3_600_000_000_000;

    #[test]
    fn valid_chain_decodes() {
        let chain = chain_expiring_in(HOUR_NANOS, &[1, 2, 3]);
        let delegations = chain.signed_delegations().unwrap();
        assert_eq!(delegations.len(), 1);
        assert_eq!(delegations[0].delegation.pubkey, vec![1, 2, 3]);
        assert_eq!(delegations[0].signature, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn expired_chain_is_rejected() {
        let chain = chain_expiring_in(-HOUR_NANOS, &[1, 2, 3]);
        assert!(matches!(
            chain.signed_delegations(),
            Err(DelegationError::Expired)
        ));
    }

    #[test]
    fn malformed_expiration_is_rejected() {
        let chain = JsonDelegationChain::new(
            vec![SignedJsonDelegation {
                delegation: JsonDelegation {
                    expiration: "not-hex".to_string(),
                    pubkey: hex::encode([1u8]),
                },
                signature: "00".to_string(),
            }],
            hex::encode([7u8; 32]),
        );
        assert!(matches!(
            chain.signed_delegations(),
            Err(DelegationError::Malformed(_))
        ));
    }

    #[test]
    fn malformed_pubkey_is_rejected() {
        let chain = JsonDelegationChain::new(
            vec![SignedJsonDelegation {
                delegation: JsonDelegation {
                    expiration: hex_nanos_from_now(HOUR_NANOS),
                    pubkey: "zz".to_string(),
                },
                signature: "00".to_string(),
            }],
            hex::encode([7u8; 32]),
        );
        assert!(matches!(
            chain.signed_delegations(),
            Err(DelegationError::Malformed(_))
        ));
    }

    #[test]
    fn chain_parses_from_json() {
        let json = format!(
            r#"{{"delegations":[{{"delegation":{{"expiration":"{}","pubkey":"0102"}},"signature":"00"}}],"publicKey":"0707"}}"#,
            hex_nanos_from_now(HOUR_NANOS)
        );
        let chain = JsonDelegationChain::from_json(&json).unwrap();
        assert_eq!(chain.signed_delegations().unwrap().len(), 1);
    }
}
