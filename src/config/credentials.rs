//! Per-provider credential records

use serde::{Deserialize, Serialize};

use crate::auth::TokenSet;

/// Everything persisted for one provider
///
/// Mutated only by the token manager (on refresh) and the login command
/// (on initial authorization); the rest of the system reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCredentials {
    /// OAuth client id of the user's registered application
    pub client_id: String,
    /// OAuth client secret of the user's registered application
    pub client_secret: String,
    /// AniList username the source list is read from (AniList only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Last-known token triple, absent before the first login completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenSet>,
}

impl ProviderCredentials {
    /// Create a credential record without tokens
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: None,
            tokens: None,
        }
    }
}
