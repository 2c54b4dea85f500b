//! Canonical media records and per-provider collections
//!
//! Every provider-specific list shape is normalized into [`Media`] before
//! reconciliation: ids are MyAnimeList catalog ids on both sides, statuses
//! use the canonical vocabulary, and scores are on a 0-10 scale.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a media record
///
/// Partitions all operations: anime and manga ids live in separate
/// sequences and must never be compared or merged across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Anime entries (progress counts episodes)
    Anime,
    /// Manga entries (progress counts chapters)
    Manga,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anime => write!(f, "anime"),
            Self::Manga => write!(f, "manga"),
        }
    }
}

/// Canonical watch status
///
/// Provider-specific vocabularies (`plan_to_watch`, `CURRENT`, ...) are
/// translated to this set by the provider clients before reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    /// Plans to watch/read
    Planning,
    /// Currently watching/reading
    Current,
    /// Finished
    Completed,
    /// On hold
    Paused,
    /// Dropped
    Dropped,
}

impl fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Planning => "planning",
            Self::Current => "current",
            Self::Completed => "completed",
            Self::Paused => "paused",
            Self::Dropped => "dropped",
        };
        write!(f, "{name}")
    }
}

/// A single normalized list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// MyAnimeList catalog id (both providers are normalized to this id)
    pub id: u32,
    /// Display title, informational only, never part of equality
    pub title: String,
    /// Anime or manga
    pub kind: MediaKind,
    /// Canonical watch status
    pub status: MediaStatus,
    /// Episodes watched / chapters read
    pub progress: u32,
    /// Score on a 0-10 scale
    pub score: u8,
    /// Total known episodes/chapters, 0 when unknown. Content metadata,
    /// not user state: never part of equality.
    #[serde(default)]
    pub length: u32,
    /// Whether the user is re-watching/re-reading
    #[serde(default)]
    pub repeat: bool,
}

/// Per-status entry counts for one collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Entries in planning
    pub planning: usize,
    /// Entries currently in progress
    pub current: usize,
    /// Completed entries
    pub completed: usize,
    /// Paused entries
    pub paused: usize,
    /// Dropped entries
    pub dropped: usize,
}

impl CollectionStats {
    /// Total number of counted entries
    #[must_use]
    pub const fn total(&self) -> usize {
        self.planning + self.current + self.completed + self.paused + self.dropped
    }

    fn record(&mut self, status: MediaStatus) {
        match status {
            MediaStatus::Planning => self.planning += 1,
            MediaStatus::Current => self.current += 1,
            MediaStatus::Completed => self.completed += 1,
            MediaStatus::Paused => self.paused += 1,
            MediaStatus::Dropped => self.dropped += 1,
        }
    }
}

/// A user's complete normalized list for one provider
///
/// Anime and manga are kept in separate id-keyed maps, so a record's id is
/// only ever resolved within the kind it was tagged with. `BTreeMap` gives
/// deterministic ascending-id iteration, which makes reconciliation output
/// reproducible.
///
/// Built once per sync run and never modified afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaCollection {
    anime: BTreeMap<u32, Media>,
    manga: BTreeMap<u32, Media>,
}

impl MediaCollection {
    /// Create an empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self {
            anime: BTreeMap::new(),
            manga: BTreeMap::new(),
        }
    }

    /// Insert a record, routed by its kind
    ///
    /// Returns the previous record with the same id and kind, if any.
    pub fn insert(&mut self, media: Media) -> Option<Media> {
        match media.kind {
            MediaKind::Anime => self.anime.insert(media.id, media),
            MediaKind::Manga => self.manga.insert(media.id, media),
        }
    }

    /// Entries of one kind, keyed by id in ascending order
    #[must_use]
    pub const fn entries(&self, kind: MediaKind) -> &BTreeMap<u32, Media> {
        match kind {
            MediaKind::Anime => &self.anime,
            MediaKind::Manga => &self.manga,
        }
    }

    /// Total number of entries across both kinds
    #[must_use]
    pub fn len(&self) -> usize {
        self.anime.len() + self.manga.len()
    }

    /// Whether the collection has no entries at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anime.is_empty() && self.manga.is_empty()
    }

    /// Per-status counts across both kinds
    #[must_use]
    pub fn stats(&self) -> CollectionStats {
        let mut stats = CollectionStats::default();
        for media in self.anime.values().chain(self.manga.values()) {
            stats.record(media.status);
        }
        stats
    }
}

impl FromIterator<Media> for MediaCollection {
    fn from_iter<I: IntoIterator<Item = Media>>(iter: I) -> Self {
        let mut collection = Self::new();
        for media in iter {
            collection.insert(media);
        }
        collection
    }
}
