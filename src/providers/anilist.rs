//! AniList API client
//!
//! The authoritative source of the sync. Lists are read through the public
//! GraphQL endpoint (one `MediaListCollection` query per kind); entries are
//! cross-mapped to MyAnimeList ids via `idMal` and entries without one are
//! skipped. The OAuth2 token endpoint uses the pin-based redirect flow.

use anyhow::Context;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::Provider;
use crate::auth::{TokenEndpoint, TokenResponse, TokenSet};
use crate::config::ProviderCredentials;
use crate::error::{Result, SyncError};
use crate::media::{Media, MediaCollection, MediaKind, MediaStatus};
use crate::sync::SourceCatalog;

const GRAPHQL_URL: &str = "https://graphql.anilist.co";
const TOKEN_URL: &str = "https://anilist.co/api/v2/oauth/token";
const AUTHORIZE_URL: &str = "https://anilist.co/api/v2/oauth/authorize";

/// Redirect URI of the pin flow: the authorization code is displayed to
/// the user instead of being delivered to a callback server.
const PIN_REDIRECT_URI: &str = "https://anilist.co/api/v2/oauth/pin";

#[derive(Debug, Serialize)]
struct GraphQlRequest {
    query: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnilistResponse {
    pub(crate) data: AnilistData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnilistData {
    #[serde(rename = "MediaListCollection")]
    pub(crate) media_list_collection: AnilistMediaListCollection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnilistMediaListCollection {
    #[serde(default)]
    pub(crate) lists: Vec<AnilistList>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnilistList {
    #[serde(default)]
    pub(crate) entries: Vec<AnilistEntry>,
    #[serde(default, rename = "isCustomList")]
    pub(crate) is_custom_list: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnilistEntry {
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) score: f64,
    #[serde(default)]
    pub(crate) progress: u32,
    #[serde(default)]
    pub(crate) repeat: u32,
    pub(crate) media: AnilistMedia,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnilistMedia {
    #[serde(default)]
    pub(crate) chapters: Option<u32>,
    #[serde(default)]
    pub(crate) episodes: Option<u32>,
    #[serde(default, rename = "idMal")]
    pub(crate) id_mal: Option<u32>,
    pub(crate) title: AnilistTitle,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnilistTitle {
    pub(crate) romaji: String,
}

/// AniList GraphQL client reading one user's public lists
pub struct AnilistClient {
    http: Client,
    username: String,
}

impl AnilistClient {
    /// Create a client for the given AniList username
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(username: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: super::http_client()?,
            username: username.into(),
        })
    }

    fn fetch_list(&self, kind: MediaKind) -> Result<AnilistResponse> {
        let request = GraphQlRequest {
            query: list_query(&self.username, kind),
        };

        let response = self
            .http
            .post(GRAPHQL_URL)
            .json(&request)
            .send()
            .with_context(|| format!("Failed to fetch the AniList {kind} list"))?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("AniList list request failed with {status}");
        }

        response
            .json()
            .context("Failed to parse the AniList list response")
    }
}

impl SourceCatalog for AnilistClient {
    fn fetch_collection(&self) -> std::result::Result<MediaCollection, SyncError> {
        let mut collection = MediaCollection::new();
        for kind in [MediaKind::Anime, MediaKind::Manga] {
            let response = self.fetch_list(kind).map_err(|source| SyncError::FetchFailed {
                provider: Provider::Anilist,
                source,
            })?;
            let records = normalize(response, kind).map_err(|source| SyncError::FetchFailed {
                provider: Provider::Anilist,
                source,
            })?;
            for media in records {
                collection.insert(media);
            }
        }
        Ok(collection)
    }
}

fn list_query(username: &str, kind: MediaKind) -> String {
    let media_type = match kind {
        MediaKind::Anime => "ANIME",
        MediaKind::Manga => "MANGA",
    };
    format!(
        r#"{{
  MediaListCollection(userName: "{username}", type: {media_type}) {{
    lists {{
      entries {{
        id
        status
        score(format: POINT_10)
        progress
        repeat
        media {{
          chapters
          episodes
          idMal
          title {{ romaji }}
        }}
      }}
      name
      isCustomList
    }}
  }}
}}"#
    )
}

/// Normalize a full list response into canonical records
///
/// Custom lists are skipped (their entries also appear in the status
/// lists) and so are entries with no MyAnimeList id, since they cannot
/// be represented on the target side at all.
pub(crate) fn normalize(response: AnilistResponse, kind: MediaKind) -> Result<Vec<Media>> {
    let mut records = Vec::new();

    for list in response.data.media_list_collection.lists {
        if list.is_custom_list {
            continue;
        }
        for entry in list.entries {
            let Some(id) = entry.media.id_mal else {
                continue;
            };
            let (status, repeating) = parse_status(&entry.status)?;

            // POINT_10 scores arrive as floats; clamp before narrowing
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let score = entry.score.round().clamp(0.0, 10.0) as u8;

            records.push(Media {
                id,
                title: entry.media.title.romaji,
                kind,
                status,
                progress: entry.progress,
                score,
                length: entry.media.chapters.or(entry.media.episodes).unwrap_or(0),
                repeat: repeating || entry.repeat > 0,
            });
        }
    }

    Ok(records)
}

/// Translate an AniList entry status into the canonical vocabulary
///
/// `REPEATING` maps to `current` with the repeat flag set. Unknown
/// statuses are an error rather than a silent default.
pub(crate) fn parse_status(raw: &str) -> Result<(MediaStatus, bool)> {
    match raw {
        "PLANNING" => Ok((MediaStatus::Planning, false)),
        "CURRENT" => Ok((MediaStatus::Current, false)),
        "REPEATING" => Ok((MediaStatus::Current, true)),
        "COMPLETED" => Ok((MediaStatus::Completed, false)),
        "PAUSED" => Ok((MediaStatus::Paused, false)),
        "DROPPED" => Ok((MediaStatus::Dropped, false)),
        other => anyhow::bail!("unknown AniList status: {other}"),
    }
}

/// AniList OAuth2 token endpoint (pin-based flow)
pub struct AnilistAuth {
    http: Client,
}

impl AnilistAuth {
    /// Create a token endpoint client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: super::http_client()?,
        })
    }

    /// URL the user must visit to authorize the application
    #[must_use]
    pub fn authorize_url(client_id: &str) -> String {
        format!(
            "{AUTHORIZE_URL}?client_id={client_id}&redirect_uri={PIN_REDIRECT_URI}&response_type=code"
        )
    }

    /// Exchange an authorization code for the initial token triple
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success HTTP status,
    /// or a malformed response body.
    pub fn exchange_code(
        &self,
        credentials: &ProviderCredentials,
        code: &str,
    ) -> Result<TokenSet> {
        self.token_request(&serde_json::json!({
            "grant_type": "authorization_code",
            "client_id": credentials.client_id,
            "client_secret": credentials.client_secret,
            "redirect_uri": PIN_REDIRECT_URI,
            "code": code,
        }))
    }

    fn token_request(&self, body: &serde_json::Value) -> Result<TokenSet> {
        let response = self
            .http
            .post(TOKEN_URL)
            .json(body)
            .send()
            .context("Failed to reach the AniList token endpoint")?;

        let status = response.status();
        let body = response
            .text()
            .context("Failed to read the AniList token response")?;
        if !status.is_success() {
            anyhow::bail!("AniList token request failed with {status}: {body}");
        }

        let token: TokenResponse =
            serde_json::from_str(&body).context("Failed to parse the AniList token response")?;
        Ok(token.into())
    }
}

impl TokenEndpoint for AnilistAuth {
    fn provider(&self) -> Provider {
        Provider::Anilist
    }

    fn refresh(
        &self,
        credentials: &ProviderCredentials,
        refresh_token: &str,
    ) -> Result<TokenSet> {
        self.token_request(&serde_json::json!({
            "grant_type": "refresh_token",
            "client_id": credentials.client_id,
            "client_secret": credentials.client_secret,
            "refresh_token": refresh_token,
        }))
    }
}
