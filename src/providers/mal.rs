//! MyAnimeList API client
//!
//! The target side of the sync: list fetching (v2 REST, paginated),
//! per-entry upsert/delete mutations, and the OAuth2 token endpoint with
//! plain PKCE.

use anyhow::{Context, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use super::Provider;
use crate::auth::{TokenEndpoint, TokenResponse, TokenSet};
use crate::config::ProviderCredentials;
use crate::error::{Result, SyncError};
use crate::media::{Media, MediaCollection, MediaKind, MediaStatus};
use crate::sync::TargetCatalog;

const API_URL: &str = "https://api.myanimelist.net/v2";
const AUTH_URL: &str = "https://myanimelist.net/v1/oauth2";

/// One page of a MyAnimeList list response
#[derive(Debug, Deserialize)]
pub(crate) struct MalListResponse {
    #[serde(default)]
    pub(crate) data: Vec<MalDatum>,
    #[serde(default)]
    pub(crate) paging: MalPaging,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MalPaging {
    #[serde(default)]
    pub(crate) next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MalDatum {
    pub(crate) node: MalNode,
    pub(crate) list_status: MalListStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MalNode {
    pub(crate) id: u32,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) num_episodes: u32,
    #[serde(default)]
    pub(crate) num_chapters: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MalListStatus {
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) score: u8,
    #[serde(default)]
    pub(crate) num_episodes_watched: u32,
    #[serde(default)]
    pub(crate) num_chapters_read: u32,
    #[serde(default)]
    pub(crate) is_rewatching: bool,
    #[serde(default)]
    pub(crate) is_rereading: bool,
}

/// Authenticated MyAnimeList API client
pub struct MalClient {
    http: Client,
    bearer_token: String,
}

impl MalClient {
    /// Create a client using an already-validated access token
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(bearer_token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: super::http_client()?,
            bearer_token: bearer_token.into(),
        })
    }

    /// Fetch every page of one list
    fn fetch_list(&self, kind: MediaKind) -> Result<Vec<MalDatum>> {
        let list = match kind {
            MediaKind::Anime => "animelist",
            MediaKind::Manga => "mangalist",
        };
        let mut url = format!(
            "{API_URL}/users/@me/{list}?fields=list_status,num_episodes,num_chapters&limit=1000&nsfw=true"
        );

        let mut data = Vec::new();
        loop {
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.bearer_token)
                .send()
                .with_context(|| format!("Failed to fetch the MyAnimeList {kind} list"))?;
            let status = response.status();
            if !status.is_success() {
                anyhow::bail!("MyAnimeList list request failed with {status}");
            }

            let page: MalListResponse = response
                .json()
                .context("Failed to parse the MyAnimeList list response")?;
            data.extend(page.data);

            match page.paging.next {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(data)
    }

    fn entry_url(record: &Media) -> String {
        let segment = match record.kind {
            MediaKind::Anime => "anime",
            MediaKind::Manga => "manga",
        };
        format!("{API_URL}/{segment}/{}/my_list_status", record.id)
    }

    fn mutation_failed(record: &Media, source: anyhow::Error) -> SyncError {
        SyncError::MutationFailed {
            provider: Provider::Mal,
            title: record.title.clone(),
            kind: record.kind,
            id: record.id,
            source,
        }
    }
}

impl TargetCatalog for MalClient {
    fn fetch_collection(&self) -> std::result::Result<MediaCollection, SyncError> {
        let mut collection = MediaCollection::new();
        for kind in [MediaKind::Anime, MediaKind::Manga] {
            let data = self.fetch_list(kind).map_err(|source| SyncError::FetchFailed {
                provider: Provider::Mal,
                source,
            })?;
            for datum in data {
                let media = normalize(datum, kind).map_err(|source| SyncError::FetchFailed {
                    provider: Provider::Mal,
                    source,
                })?;
                collection.insert(media);
            }
        }
        Ok(collection)
    }

    fn upsert(&self, record: &Media) -> std::result::Result<(), SyncError> {
        let response = self
            .http
            .put(Self::entry_url(record))
            .bearer_auth(&self.bearer_token)
            .json(&upsert_body(record))
            .send()
            .map_err(|e| Self::mutation_failed(record, anyhow::Error::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::mutation_failed(
                record,
                anyhow!("update request failed with {status}"),
            ));
        }
        Ok(())
    }

    fn delete(&self, record: &Media) -> std::result::Result<(), SyncError> {
        let response = self
            .http
            .delete(Self::entry_url(record))
            .bearer_auth(&self.bearer_token)
            .send()
            .map_err(|e| Self::mutation_failed(record, anyhow::Error::new(e)))?;

        let status = response.status();
        // Already absent counts as deleted, so re-runs stay idempotent
        if status == StatusCode::NOT_FOUND || status.is_success() {
            return Ok(());
        }
        Err(Self::mutation_failed(
            record,
            anyhow!("delete request failed with {status}"),
        ))
    }
}

/// Normalize one list datum into the canonical record shape
pub(crate) fn normalize(datum: MalDatum, kind: MediaKind) -> Result<Media> {
    let status = parse_status(&datum.list_status.status)?;
    let (progress, length, repeat) = match kind {
        MediaKind::Anime => (
            datum.list_status.num_episodes_watched,
            datum.node.num_episodes,
            datum.list_status.is_rewatching,
        ),
        MediaKind::Manga => (
            datum.list_status.num_chapters_read,
            datum.node.num_chapters,
            datum.list_status.is_rereading,
        ),
    };

    Ok(Media {
        id: datum.node.id,
        title: datum.node.title,
        kind,
        status,
        progress,
        score: datum.list_status.score,
        length,
        repeat,
    })
}

/// Translate a MyAnimeList status string into the canonical vocabulary
///
/// Unknown statuses are an error: a silently defaulted status would be
/// written back to the provider on the next sync.
pub(crate) fn parse_status(raw: &str) -> Result<MediaStatus> {
    match raw {
        "plan_to_watch" | "plan_to_read" => Ok(MediaStatus::Planning),
        "watching" | "reading" => Ok(MediaStatus::Current),
        "completed" => Ok(MediaStatus::Completed),
        "on_hold" => Ok(MediaStatus::Paused),
        "dropped" => Ok(MediaStatus::Dropped),
        other => anyhow::bail!("unknown MyAnimeList status: {other}"),
    }
}

/// Translate a canonical status into the provider vocabulary for one kind
pub(crate) const fn outgoing_status(status: MediaStatus, kind: MediaKind) -> &'static str {
    match (status, kind) {
        (MediaStatus::Planning, MediaKind::Anime) => "plan_to_watch",
        (MediaStatus::Planning, MediaKind::Manga) => "plan_to_read",
        (MediaStatus::Current, MediaKind::Anime) => "watching",
        (MediaStatus::Current, MediaKind::Manga) => "reading",
        (MediaStatus::Completed, _) => "completed",
        (MediaStatus::Paused, _) => "on_hold",
        (MediaStatus::Dropped, _) => "dropped",
    }
}

fn upsert_body(record: &Media) -> serde_json::Value {
    match record.kind {
        MediaKind::Anime => json!({
            "status": outgoing_status(record.status, record.kind),
            "num_watched_episodes": record.progress,
            "score": record.score,
        }),
        MediaKind::Manga => json!({
            "status": outgoing_status(record.status, record.kind),
            "num_chapters_read": record.progress,
            "score": record.score,
        }),
    }
}

/// MyAnimeList OAuth2 token endpoint
pub struct MalAuth {
    http: Client,
}

impl MalAuth {
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

    /// Generate a PKCE code verifier (32 random bytes, URL-safe base64)
    ///
    /// MyAnimeList only supports the `plain` challenge method, so the
    /// verifier doubles as the challenge.
    #[must_use]
    pub fn generate_code_verifier() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// URL the user must visit to authorize the application
    #[must_use]
    pub fn authorize_url(client_id: &str, code_challenge: &str) -> String {
        format!(
            "{AUTH_URL}/authorize?response_type=code&client_id={client_id}&code_challenge={code_challenge}"
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
        code_verifier: &str,
    ) -> Result<TokenSet> {
        self.token_request(&[
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("code", code),
            ("code_verifier", code_verifier),
            ("grant_type", "authorization_code"),
        ])
    }

    fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenSet> {
        let response = self
            .http
            .post(format!("{AUTH_URL}/token"))
            .form(params)
            .send()
            .context("Failed to reach the MyAnimeList token endpoint")?;

        let status = response.status();
        let body = response
            .text()
            .context("Failed to read the MyAnimeList token response")?;
        if !status.is_success() {
            anyhow::bail!("MyAnimeList token request failed with {status}: {body}");
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .context("Failed to parse the MyAnimeList token response")?;
        Ok(token.into())
    }
}

impl TokenEndpoint for MalAuth {
    fn provider(&self) -> Provider {
        Provider::Mal
    }

    fn refresh(
        &self,
        credentials: &ProviderCredentials,
        refresh_token: &str,
    ) -> Result<TokenSet> {
        self.token_request(&[
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_FIXTURE: &str = r#"{
        "data": [
            {
                "node": {"id": 1, "title": "Cowboy Bebop", "num_episodes": 26},
                "list_status": {
                    "status": "completed",
                    "score": 9,
                    "num_episodes_watched": 26,
                    "is_rewatching": false,
                    "updated_at": "2017-11-11T19:51:22+00:00"
                }
            },
            {
                "node": {"id": 21, "title": "One Piece", "num_episodes": 0},
                "list_status": {
                    "status": "watching",
                    "score": 7,
                    "num_episodes_watched": 1000,
                    "is_rewatching": true
                }
            }
        ],
        "paging": {"next": "https://api.myanimelist.net/v2/users/@me/animelist?offset=1000"}
    }"#;

    #[test]
    fn test_parse_and_normalize_list_page() {
        let page: MalListResponse = serde_json::from_str(LIST_FIXTURE).unwrap();
        assert_eq!(page.data.len(), 2);
        assert!(page.paging.next.is_some());

        let records: Vec<Media> = page
            .data
            .into_iter()
            .map(|d| normalize(d, MediaKind::Anime).unwrap())
            .collect();

        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].status, MediaStatus::Completed);
        assert_eq!(records[0].progress, 26);
        assert_eq!(records[0].length, 26);
        assert!(!records[0].repeat);

        assert_eq!(records[1].status, MediaStatus::Current);
        assert_eq!(records[1].length, 0);
        assert!(records[1].repeat);
    }

    #[test]
    fn test_last_page_has_no_next_link() {
        let page: MalListResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(page.data.is_empty());
        assert!(page.paging.next.is_none());
    }

    #[test]
    fn test_manga_normalization_uses_chapters() {
        let datum: MalDatum = serde_json::from_str(
            r#"{
                "node": {"id": 2, "title": "Berserk", "num_chapters": 364},
                "list_status": {"status": "reading", "num_chapters_read": 100, "score": 10, "is_rereading": true}
            }"#,
        )
        .unwrap();

        let media = normalize(datum, MediaKind::Manga).unwrap();
        assert_eq!(media.kind, MediaKind::Manga);
        assert_eq!(media.status, MediaStatus::Current);
        assert_eq!(media.progress, 100);
        assert_eq!(media.length, 364);
        assert!(media.repeat);
    }

    #[test]
    fn test_unknown_status_fails_loudly() {
        let err = parse_status("rewatching_soon").unwrap_err();
        assert!(err.to_string().contains("rewatching_soon"));
    }

    #[test]
    fn test_status_translation_covers_both_kinds() {
        assert_eq!(
            outgoing_status(MediaStatus::Planning, MediaKind::Anime),
            "plan_to_watch"
        );
        assert_eq!(
            outgoing_status(MediaStatus::Planning, MediaKind::Manga),
            "plan_to_read"
        );
        assert_eq!(
            outgoing_status(MediaStatus::Current, MediaKind::Manga),
            "reading"
        );
        // Inbound and outbound tables agree for every canonical status
        for status in [
            MediaStatus::Planning,
            MediaStatus::Current,
            MediaStatus::Completed,
            MediaStatus::Paused,
            MediaStatus::Dropped,
        ] {
            for kind in [MediaKind::Anime, MediaKind::Manga] {
                assert_eq!(parse_status(outgoing_status(status, kind)).unwrap(), status);
            }
        }
    }

    #[test]
    fn test_upsert_body_shape() {
        let record = Media {
            id: 5,
            title: "t".to_string(),
            kind: MediaKind::Anime,
            status: MediaStatus::Current,
            progress: 12,
            score: 8,
            length: 24,
            repeat: false,
        };
        let body = upsert_body(&record);
        assert_eq!(body["status"], "watching");
        assert_eq!(body["num_watched_episodes"], 12);
        assert_eq!(body["score"], 8);
        assert!(body.get("num_chapters_read").is_none());
    }

    #[test]
    fn test_code_verifier_is_url_safe_and_unique() {
        let a = MalAuth::generate_code_verifier();
        let b = MalAuth::generate_code_verifier();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43); // 32 bytes, unpadded base64
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_authorize_url_carries_challenge() {
        let url = MalAuth::authorize_url("client-123", "challenge-abc");
        assert!(url.starts_with("https://myanimelist.net/v1/oauth2/authorize"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("code_challenge=challenge-abc"));
    }
}
