//! Credential persistence
//!
//! This module handles:
//! - Platform config directory discovery (`~/.config/ani2mal` on Linux)
//! - Per-provider JSON credential files (`mal.json`, `anilist.json`)
//! - The [`CredentialStore`] seam the token manager persists through

mod credentials;
mod store;

pub use credentials::ProviderCredentials;
pub use store::{ConfigStore, CredentialStore};
