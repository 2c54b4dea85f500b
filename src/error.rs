//! Error types shared across the library
//!
//! Fetch and token failures abort a sync run before any mutation is
//! attempted; mutation failures are collected per record and the run
//! continues. The command layer wraps everything else in `anyhow`.

use crate::media::MediaKind;
use crate::providers::Provider;

/// Result type alias using `anyhow::Error`, used by glue layers
pub type Result<T> = anyhow::Result<T>;

/// Typed failures produced by a sync run
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A provider's collection could not be fetched. Fatal to the run:
    /// reconciling against an incomplete list risks spurious deletes.
    #[error("failed to fetch the {provider} list")]
    FetchFailed {
        /// Provider whose fetch failed
        provider: Provider,
        /// Underlying transport or parse error
        #[source]
        source: anyhow::Error,
    },

    /// A provider's access token could not be refreshed. Fatal to the run.
    #[error("failed to obtain a valid {provider} access token")]
    TokenRefreshFailed {
        /// Provider whose token refresh failed
        provider: Provider,
        /// Underlying transport or parse error
        #[source]
        source: anyhow::Error,
    },

    /// A single upsert or delete call failed. Non-fatal: the record is
    /// reported and the rest of the batch continues.
    #[error("failed to apply \"{title}\" ({kind} {id}) to {provider}")]
    MutationFailed {
        /// Provider the mutation was sent to
        provider: Provider,
        /// Display title of the failing record
        title: String,
        /// Kind of the failing record
        kind: MediaKind,
        /// Catalog id of the failing record
        id: u32,
        /// Underlying transport error or HTTP status
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_display_names_provider() {
        let err = SyncError::FetchFailed {
            provider: Provider::Anilist,
            source: anyhow::anyhow!("connection refused"),
        };
        assert!(err.to_string().contains("AniList"));
    }

    #[test]
    fn test_mutation_failed_display_names_record() {
        let err = SyncError::MutationFailed {
            provider: Provider::Mal,
            title: "Cowboy Bebop".to_string(),
            kind: MediaKind::Anime,
            id: 1,
            source: anyhow::anyhow!("HTTP 500"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Cowboy Bebop"));
        assert!(msg.contains("anime 1"));
    }
}
