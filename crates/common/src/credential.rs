use std::fmt;
use std::str::FromStr;

use crate::capability::CapabilitySet;

/// Number of dot-delimited fields in a composite API key
pub const API_KEY_FIELDS: usize = 5;

/// Errors that can occur while decoding an API key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("malformed API key: expected 5 dot-delimited fields, got {0}")]
    MalformedCredential(usize),
    #[error("malformed API key: scope is not a base-10 integer: {0:?}")]
    InvalidScope(String),
}

/// Composite API key of the form `keyId.scope.userId.hash.edgeToken`.
///
/// The key is decoded once and never changes afterwards. Only the scope and
/// the edge token mean anything to the client; the remaining fields are kept
/// verbatim. The raw string is what gets presented to the server, both as
/// the HTTP bearer token and as the event channel auth token.
///
/// ```ignore
/// let key: ApiKey = "k1.3.u1.deadbeef.edge".parse()?;
/// assert!(key.scope().grants(CapabilitySet::READ_FILE));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    raw: String,
    key_id: String,
    scope: CapabilitySet,
    user_id: String,
    hash: String,
    edge_token: String,
}

impl ApiKey {
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let fields: Vec<&str> = raw.split('.').collect();
        let [key_id, scope, user_id, hash, edge_token] = fields.as_slice() else {
            return Err(CredentialError::MalformedCredential(fields.len()));
        };

        // `u32::from_str` would accept a leading '+'
        if scope.is_empty() || !scope.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CredentialError::InvalidScope(scope.to_string()));
        }
        let scope = scope
            .parse::<u32>()
            .map_err(|_| CredentialError::InvalidScope(scope.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            key_id: key_id.to_string(),
            scope: CapabilitySet::from_bits(scope),
            user_id: user_id.to_string(),
            hash: hash.to_string(),
            edge_token: edge_token.to_string(),
        })
    }

    /// The key exactly as issued
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn scope(&self) -> CapabilitySet {
        self.scope
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Auxiliary token forwarded on uploads
    pub fn edge_token(&self) -> &str {
        &self.edge_token
    }
}

impl FromStr for ApiKey {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("key_id", &self.key_id)
            .field("scope", &self.scope)
            .field("user_id", &self.user_id)
            .field("hash", &"<redacted>")
            .field("edge_token", &"<redacted>")
            .finish()
    }
}
