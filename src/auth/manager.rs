//! Token lifecycle management
//!
//! [`TokenManager::ensure_valid`] is the single entry point for getting a
//! usable access token: fresh tokens are returned without any network
//! call, near-expiry tokens are refreshed through the provider's token
//! endpoint and persisted before the new token is handed out.
//!
//! The manager never retries; retry policy belongs to the caller. The
//! pipeline is single-threaded, so there is at most one in-flight refresh
//! per provider per run by construction.

use anyhow::anyhow;
use chrono::TimeDelta;

use super::token::TokenSet;
use crate::config::{CredentialStore, ProviderCredentials};
use crate::error::SyncError;
use crate::providers::Provider;

/// Safety margin before expiry at which a token is refreshed
///
/// A margin longer than a token's total lifetime simply refreshes on
/// every call; that is accepted behavior, not a bug.
pub const EXPIRATION_BUFFER: TimeDelta = TimeDelta::minutes(20);

/// A provider's OAuth token endpoint
pub trait TokenEndpoint {
    /// Which provider this endpoint belongs to
    fn provider(&self) -> Provider;

    /// Exchange a refresh token for a new token triple
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success HTTP status,
    /// or a malformed response body.
    fn refresh(
        &self,
        credentials: &ProviderCredentials,
        refresh_token: &str,
    ) -> crate::error::Result<TokenSet>;
}

/// Keeps one provider's access token valid across a run
pub struct TokenManager<'a, E: TokenEndpoint, S: CredentialStore> {
    endpoint: E,
    store: &'a S,
    buffer: TimeDelta,
}

impl<'a, E: TokenEndpoint, S: CredentialStore> TokenManager<'a, E, S> {
    /// Create a manager with the default expiration buffer
    #[must_use]
    pub fn new(endpoint: E, store: &'a S) -> Self {
        Self {
            endpoint,
            store,
            buffer: EXPIRATION_BUFFER,
        }
    }

    /// Create a manager with an explicit expiration buffer
    #[must_use]
    pub const fn with_buffer(endpoint: E, store: &'a S, buffer: TimeDelta) -> Self {
        Self {
            endpoint,
            store,
            buffer,
        }
    }

    /// Return a currently-valid access token, refreshing if necessary
    ///
    /// On refresh, the stored token triple is replaced and persisted
    /// through the credential store before the new token is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::TokenRefreshFailed`] if no tokens are stored,
    /// the refresh exchange fails, or the refreshed triple cannot be
    /// persisted.
    pub fn ensure_valid(
        &self,
        credentials: &mut ProviderCredentials,
    ) -> Result<String, SyncError> {
        let provider = self.endpoint.provider();

        let Some(tokens) = credentials.tokens.as_ref() else {
            return Err(SyncError::TokenRefreshFailed {
                provider,
                source: anyhow!(
                    "no stored tokens; run `ani2mal login {}` first",
                    provider.short_name()
                ),
            });
        };

        if !tokens.expires_within(self.buffer) {
            return Ok(tokens.access_token.clone());
        }

        let refresh_token = tokens.refresh_token.clone();
        let refreshed = self
            .endpoint
            .refresh(credentials, &refresh_token)
            .map_err(|source| SyncError::TokenRefreshFailed { provider, source })?;

        let access_token = refreshed.access_token.clone();
        credentials.tokens = Some(refreshed);
        self.store
            .save(provider, credentials)
            .map_err(|source| SyncError::TokenRefreshFailed {
                provider,
                source: source.context("refreshed token could not be persisted"),
            })?;

        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    struct FakeEndpoint {
        refresh_calls: Cell<usize>,
        fail: bool,
    }

    impl FakeEndpoint {
        fn new(fail: bool) -> Self {
            Self {
                refresh_calls: Cell::new(0),
                fail,
            }
        }
    }

    impl TokenEndpoint for FakeEndpoint {
        fn provider(&self) -> Provider {
            Provider::Mal
        }

        fn refresh(
            &self,
            _credentials: &ProviderCredentials,
            refresh_token: &str,
        ) -> crate::error::Result<TokenSet> {
            self.refresh_calls.set(self.refresh_calls.get() + 1);
            if self.fail {
                anyhow::bail!("token endpoint returned HTTP 401");
            }
            assert_eq!(refresh_token, "old-refresh");
            Ok(TokenSet::new("new-access", "new-refresh", "Bearer", 3600))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        saved: RefCell<Option<ProviderCredentials>>,
    }

    impl CredentialStore for MemoryStore {
        fn load(&self, _provider: Provider) -> crate::error::Result<ProviderCredentials> {
            anyhow::bail!("not used in these tests")
        }

        fn save(
            &self,
            _provider: Provider,
            credentials: &ProviderCredentials,
        ) -> crate::error::Result<()> {
            *self.saved.borrow_mut() = Some(credentials.clone());
            Ok(())
        }
    }

    fn credentials_with_ttl(expires_in: i64) -> ProviderCredentials {
        let mut credentials = ProviderCredentials::new("id", "secret");
        credentials.tokens = Some(TokenSet::new("old-access", "old-refresh", "Bearer", expires_in));
        credentials
    }

    #[test]
    fn test_fresh_token_returned_without_refresh() {
        let store = MemoryStore::default();
        let manager = TokenManager::new(FakeEndpoint::new(false), &store);
        let mut credentials = credentials_with_ttl(3600);

        let token = manager.ensure_valid(&mut credentials).unwrap();

        assert_eq!(token, "old-access");
        assert_eq!(manager.endpoint.refresh_calls.get(), 0);
        assert!(store.saved.borrow().is_none());
    }

    #[test]
    fn test_near_expiry_token_is_refreshed_and_persisted() {
        let store = MemoryStore::default();
        let manager = TokenManager::new(FakeEndpoint::new(false), &store);
        let mut credentials = credentials_with_ttl(60);

        let token = manager.ensure_valid(&mut credentials).unwrap();

        assert_eq!(token, "new-access");
        assert_eq!(manager.endpoint.refresh_calls.get(), 1);

        // The whole triple was replaced and the replacement was persisted
        let tokens = credentials.tokens.as_ref().unwrap();
        assert_eq!(tokens.refresh_token, "new-refresh");
        let saved = store.saved.borrow();
        assert_eq!(saved.as_ref().unwrap(), &credentials);
    }

    #[test]
    fn test_refresh_failure_is_typed_and_leaves_tokens_untouched() {
        let store = MemoryStore::default();
        let manager = TokenManager::new(FakeEndpoint::new(true), &store);
        let mut credentials = credentials_with_ttl(60);

        let err = manager.ensure_valid(&mut credentials).unwrap_err();

        assert!(matches!(
            err,
            SyncError::TokenRefreshFailed {
                provider: Provider::Mal,
                ..
            }
        ));
        assert_eq!(
            credentials.tokens.as_ref().unwrap().access_token,
            "old-access"
        );
        assert!(store.saved.borrow().is_none());
    }

    #[test]
    fn test_missing_tokens_demand_login() {
        let store = MemoryStore::default();
        let manager = TokenManager::new(FakeEndpoint::new(false), &store);
        let mut credentials = ProviderCredentials::new("id", "secret");

        let err = manager.ensure_valid(&mut credentials).unwrap_err();
        let SyncError::TokenRefreshFailed { source, .. } = err else {
            panic!("expected TokenRefreshFailed, got {err:?}");
        };
        assert!(source.to_string().contains("login mal"));
    }

    #[test]
    fn test_custom_buffer_controls_refresh_decision() {
        let store = MemoryStore::default();
        // 1-minute buffer: a 10-minute token is still considered fresh
        let manager =
            TokenManager::with_buffer(FakeEndpoint::new(false), &store, TimeDelta::minutes(1));
        let mut credentials = credentials_with_ttl(600);

        let token = manager.ensure_valid(&mut credentials).unwrap();
        assert_eq!(token, "old-access");
        assert_eq!(manager.endpoint.refresh_calls.get(), 0);
    }
}
