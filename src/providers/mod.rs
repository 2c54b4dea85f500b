//! Provider API clients
//!
//! One module per remote service:
//! - [`anilist`] — the authoritative source list, read over GraphQL
//! - [`mal`] — the target list, converged via the MyAnimeList v2 REST API
//!
//! Each client normalizes its provider's wire shapes into the canonical
//! [`crate::media::Media`] record, including the MAL-id cross-mapping and
//! the status-vocabulary translation. Unknown provider statuses fail the
//! fetch loudly instead of being silently defaulted.

pub mod anilist;
pub mod mal;

pub use anilist::{AnilistAuth, AnilistClient};
pub use mal::{MalAuth, MalClient};

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Network timeout applied to every provider call
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// The two remote services this tool talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// MyAnimeList, the target catalog
    Mal,
    /// AniList, the source catalog
    Anilist,
}

impl Provider {
    /// Stable short name, used for credential file names and CLI values
    #[must_use]
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::Mal => "mal",
            Self::Anilist => "anilist",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mal => write!(f, "MyAnimeList"),
            Self::Anilist => write!(f, "AniList"),
        }
    }
}

/// Build a blocking HTTP client with the standard timeout
pub(crate) fn http_client() -> crate::error::Result<reqwest::blocking::Client> {
    use anyhow::Context;

    reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}
