//! Credential file storage

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::credentials::ProviderCredentials;
use crate::error::Result;
use crate::providers::Provider;

/// Persistence seam for provider credentials
///
/// The token manager writes refreshed tokens through this trait; tests
/// substitute an in-memory implementation.
pub trait CredentialStore {
    /// Load the stored credentials for a provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider has never been logged in or the
    /// file cannot be read or parsed.
    fn load(&self, provider: Provider) -> Result<ProviderCredentials>;

    /// Persist the credentials for a provider
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, provider: Provider, credentials: &ProviderCredentials) -> Result<()>;
}

/// File-backed credential store under the platform config directory
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_dir: PathBuf,
}

impl ConfigStore {
    /// Open the store at the default platform location
    /// (e.g. `~/.config/ani2mal`), creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the platform config directory cannot be
    /// determined or created.
    pub fn open() -> Result<Self> {
        let base = dirs::config_dir().context("Failed to locate the configuration directory")?;
        Self::open_at(base.join("ani2mal"))
    }

    /// Open the store at an explicit directory, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open_at(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();
        fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;
        Ok(Self { config_dir })
    }

    /// Directory all credential files live in
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of one provider's credential file
    #[must_use]
    pub fn credentials_path(&self, provider: Provider) -> PathBuf {
        self.config_dir.join(format!("{}.json", provider.short_name()))
    }
}

impl CredentialStore for ConfigStore {
    fn load(&self, provider: Provider) -> Result<ProviderCredentials> {
        let path = self.credentials_path(provider);
        if !path.exists() {
            anyhow::bail!(
                "Not logged in to {provider}. Run `ani2mal login {}` first.",
                provider.short_name()
            );
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read credentials file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse credentials file: {}", path.display()))
    }

    fn save(&self, provider: Provider, credentials: &ProviderCredentials) -> Result<()> {
        let path = self.credentials_path(provider);
        let json = serde_json::to_string_pretty(credentials)
            .context("Failed to serialize credentials")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write credentials file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenSet;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, ConfigStore) {
        let tmp = TempDir::new().unwrap();
        let store = ConfigStore::open_at(tmp.path().join("ani2mal")).unwrap();
        (tmp, store)
    }

    #[test]
    fn test_open_at_creates_directory() {
        let (_tmp, store) = test_store();
        assert!(store.config_dir().exists());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_tmp, store) = test_store();

        let mut credentials = ProviderCredentials::new("id", "secret");
        credentials.tokens = Some(TokenSet::new("access", "refresh", "Bearer", 3600));

        store.save(Provider::Mal, &credentials).unwrap();
        let loaded = store.load(Provider::Mal).unwrap();
        assert_eq!(loaded, credentials);
    }

    #[test]
    fn test_load_missing_file_mentions_login() {
        let (_tmp, store) = test_store();

        let err = store.load(Provider::Anilist).unwrap_err();
        assert!(err.to_string().contains("login anilist"));
    }

    #[test]
    fn test_providers_use_separate_files() {
        let (_tmp, store) = test_store();

        store
            .save(Provider::Mal, &ProviderCredentials::new("mal-id", "s"))
            .unwrap();
        store
            .save(Provider::Anilist, &ProviderCredentials::new("al-id", "s"))
            .unwrap();

        assert_ne!(
            store.credentials_path(Provider::Mal),
            store.credentials_path(Provider::Anilist)
        );
        assert_eq!(store.load(Provider::Mal).unwrap().client_id, "mal-id");
        assert_eq!(store.load(Provider::Anilist).unwrap().client_id, "al-id");
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let (_tmp, store) = test_store();
        fs::write(store.credentials_path(Provider::Mal), "not json").unwrap();

        let err = store.load(Provider::Mal).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
