//! Cross-provider reconciliation
//!
//! This module implements the core diff logic: given two normalized
//! collections of the same kind, classify every record into
//! added/updated/removed/unchanged. The source side (AniList) is
//! authoritative; updated records carry the source version.
//!
//! Reconciliation is a pure function over in-memory data: it performs no
//! I/O and never fails. Output order within each sequence is ascending id
//! (the iteration order of the underlying `BTreeMap`), so results are
//! reproducible across runs.

use std::collections::BTreeMap;

use crate::media::{Media, MediaStatus};

/// The three-way classification produced by one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    /// Records present only in the source, in ascending id order
    pub added: Vec<Media>,
    /// Records present in both but not equal (source version), ascending id
    pub updated: Vec<Media>,
    /// Records present only in the target, in ascending id order
    pub removed: Vec<Media>,
}

impl Changeset {
    /// Total number of pending mutations
    #[must_use]
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }

    /// Whether both collections were already converged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Diffs two same-kind collections into a [`Changeset`]
pub struct Reconciler;

impl Reconciler {
    /// Classify every record of `source` and `target` by id
    ///
    /// Records only in `source` become `added`, records only in `target`
    /// become `removed`, records in both that fail [`Reconciler::records_equal`]
    /// become `updated` (carrying the source version). Both inputs must hold
    /// records of a single kind; callers reconcile anime and manga separately.
    #[must_use]
    pub fn reconcile(source: &BTreeMap<u32, Media>, target: &BTreeMap<u32, Media>) -> Changeset {
        let mut changeset = Changeset::default();

        for (id, source_record) in source {
            match target.get(id) {
                None => changeset.added.push(source_record.clone()),
                Some(target_record) => {
                    if !Self::records_equal(source_record, target_record) {
                        changeset.updated.push(source_record.clone());
                    }
                }
            }
        }

        for (id, target_record) in target {
            if !source.contains_key(id) {
                changeset.removed.push(target_record.clone());
            }
        }

        changeset
    }

    /// Whether two same-id records represent the same user state
    ///
    /// Deliberately permissive: the two providers track slightly different
    /// signals, and metadata drift must not cause spurious updates. Two
    /// records are equal iff their ids match and at least one of:
    ///
    /// - both are completed with the same score (progress and length often
    ///   disagree for finished entries),
    /// - status and score match and the providers disagree on total length
    ///   (a length mismatch means progress counts are not comparable),
    /// - status, score and progress all match.
    ///
    /// `length` itself is never grounds for an update.
    // TODO: the repeat flag is not reconciled yet; needs a product decision
    // on whether re-watch state should overwrite the MAL side.
    #[must_use]
    pub fn records_equal(a: &Media, b: &Media) -> bool {
        if a.id != b.id {
            return false;
        }

        let completed =
            a.status == MediaStatus::Completed && b.status == MediaStatus::Completed;

        (completed && a.score == b.score)
            || (a.status == b.status && a.score == b.score && a.length != b.length)
            || (a.progress == b.progress && a.score == b.score && a.status == b.status)
    }
}
