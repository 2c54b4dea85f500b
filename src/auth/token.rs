//! Token triple with absolute expiry

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A bearer token triple as persisted between runs
///
/// Expiry is stored as an absolute timestamp computed at issue time
/// (`issued_at + ttl`), so the near-expiry check stays correct across
/// runs instead of drifting with each startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Short-lived credential sent as the `Authorization: Bearer` value
    pub access_token: String,
    /// Longer-lived credential used to obtain a new access token
    pub refresh_token: String,
    /// Token type reported by the provider (always `Bearer` in practice)
    pub token_type: String,
    /// Absolute instant after which the access token is invalid
    pub expires_at: DateTime<Utc>,
}

impl TokenSet {
    /// Build a token set expiring `expires_in` seconds from now
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: i64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: token_type.into(),
            expires_at: Utc::now() + TimeDelta::seconds(expires_in),
        }
    }

    /// Whether the access token expires within the given safety margin
    #[must_use]
    pub fn expires_within(&self, buffer: TimeDelta) -> bool {
        Utc::now() + buffer >= self.expires_at
    }
}

/// Wire shape returned by both providers' token endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Token type (`Bearer`)
    pub token_type: String,
    /// Lifetime of the access token in seconds
    pub expires_in: i64,
    /// The new access token
    pub access_token: String,
    /// The new refresh token
    pub refresh_token: String,
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        Self::new(
            response.access_token,
            response.refresh_token,
            response.token_type,
            response.expires_in,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_is_not_near_expiry() {
        let tokens = TokenSet::new("access", "refresh", "Bearer", 3600);
        assert!(!tokens.expires_within(TimeDelta::minutes(20)));
    }

    #[test]
    fn test_short_lived_token_is_near_expiry() {
        let tokens = TokenSet::new("access", "refresh", "Bearer", 60);
        assert!(tokens.expires_within(TimeDelta::minutes(20)));
    }

    #[test]
    fn test_expired_token_is_near_expiry() {
        let tokens = TokenSet::new("access", "refresh", "Bearer", -10);
        assert!(tokens.expires_within(TimeDelta::zero()));
    }

    #[test]
    fn test_buffer_longer_than_lifetime_always_refreshes() {
        // Accepted behavior: a provider-configured margin larger than the
        // token lifetime simply refreshes on every call.
        let tokens = TokenSet::new("access", "refresh", "Bearer", 600);
        assert!(tokens.expires_within(TimeDelta::minutes(20)));
    }

    #[test]
    fn test_wire_response_conversion() {
        let response = TokenResponse {
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };
        let tokens: TokenSet = response.into();
        assert_eq!(tokens.access_token, "a");
        assert_eq!(tokens.refresh_token, "r");
        assert!(tokens.expires_at > Utc::now() + TimeDelta::minutes(50));
    }

    #[test]
    fn test_serde_round_trip() {
        let tokens = TokenSet::new("access", "refresh", "Bearer", 3600);
        let json = serde_json::to_string(&tokens).unwrap();
        let back: TokenSet = serde_json::from_str(&json).unwrap();
        assert_eq!(tokens, back);
    }
}
