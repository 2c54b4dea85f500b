//! Provider setup shared by the sync and status commands

use anyhow::Context;

use ani2mal::auth::TokenManager;
use ani2mal::config::{ConfigStore, CredentialStore};
use ani2mal::providers::{AnilistAuth, AnilistClient, MalAuth, MalClient, Provider};

/// Load both providers' credentials, validate their tokens once up front,
/// and build ready-to-use clients.
///
/// Token refresh happens here and nowhere else during a run; the clients
/// returned carry already-valid tokens for their whole lifetime.
pub fn build_clients(store: &ConfigStore) -> anyhow::Result<(AnilistClient, MalClient)> {
    let mut anilist_credentials = store.load(Provider::Anilist)?;
    let mut mal_credentials = store.load(Provider::Mal)?;

    let username = anilist_credentials
        .username
        .clone()
        .context("No AniList username stored. Run `ani2mal login anilist` again.")?;

    TokenManager::new(AnilistAuth::new()?, store).ensure_valid(&mut anilist_credentials)?;
    let mal_token = TokenManager::new(MalAuth::new()?, store).ensure_valid(&mut mal_credentials)?;

    Ok((AnilistClient::new(username)?, MalClient::new(mal_token)?))
}
