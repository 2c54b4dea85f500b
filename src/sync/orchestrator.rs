//! Sync orchestration - coordinates the sync workflow
//!
//! Each [`SyncEngine::run`] is a fresh, self-contained pass: fetch both
//! collections, reconcile per kind, apply. There is no resumable state;
//! because every run re-derives the changeset from two live fetches,
//! re-running after a failure is always safe (applying the same changeset
//! twice yields no further changes).

use super::{Operation, SyncFailure, SyncReport};
use crate::error::SyncError;
use crate::media::{Media, MediaCollection, MediaKind};
use crate::reconcile::{Changeset, Reconciler};

/// The catalog the user's true state is read from
pub trait SourceCatalog {
    /// Fetch the complete normalized collection
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FetchFailed`] on any transport or parse
    /// failure; a partial collection is never returned.
    fn fetch_collection(&self) -> Result<MediaCollection, SyncError>;
}

/// The catalog being converged to match the source
pub trait TargetCatalog {
    /// Fetch the complete normalized collection
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FetchFailed`] on any transport or parse
    /// failure; a partial collection is never returned.
    fn fetch_collection(&self) -> Result<MediaCollection, SyncError>;

    /// Create or overwrite one record (overwrite semantics, not
    /// create-only)
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MutationFailed`] carrying the record.
    fn upsert(&self, record: &Media) -> Result<(), SyncError>;

    /// Remove one record; an already-absent record counts as success
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MutationFailed`] carrying the record.
    fn delete(&self, record: &Media) -> Result<(), SyncError>;
}

/// Main sync engine
///
/// Collaborators are expected to be already authorized; token
/// acquisition happens once at the command layer before the engine is
/// constructed, which also keeps refreshes serialized per provider.
pub struct SyncEngine<'a, S: SourceCatalog, T: TargetCatalog> {
    source: &'a S,
    target: &'a T,
    kinds: Vec<MediaKind>,
    dry_run: bool,
    verbose: bool,
}

impl<'a, S: SourceCatalog, T: TargetCatalog> SyncEngine<'a, S, T> {
    /// Create an engine syncing both kinds
    #[must_use]
    pub fn new(source: &'a S, target: &'a T) -> Self {
        Self {
            source,
            target,
            kinds: vec![MediaKind::Anime, MediaKind::Manga],
            dry_run: false,
            verbose: false,
        }
    }

    /// Restrict the run to the given kinds
    #[must_use]
    pub fn kinds(mut self, kinds: Vec<MediaKind>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Preview mode: classify and report, apply nothing
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Print a line per applied record
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Execute one full sync pass
    ///
    /// Both fetches must succeed before any mutation is attempted;
    /// reconciling against an incomplete collection could produce
    /// spurious deletes. Anime and manga are reconciled independently.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FetchFailed`] if either collection cannot be
    /// fetched. Per-record mutation failures do not abort the run; they
    /// are collected in the returned report.
    pub fn run(&self) -> Result<SyncReport, SyncError> {
        let source = self.source.fetch_collection()?;
        let target = self.target.fetch_collection()?;

        let mut report = SyncReport::default();
        for kind in self.kinds.iter().copied() {
            let changeset = Reconciler::reconcile(source.entries(kind), target.entries(kind));
            if self.verbose {
                println!(
                    "{kind}: {} to add, {} to update, {} to remove",
                    changeset.added.len(),
                    changeset.updated.len(),
                    changeset.removed.len()
                );
            }
            self.apply(&changeset, &mut report);
        }

        Ok(report)
    }

    /// Apply one changeset: added first, then updated, then removed
    fn apply(&self, changeset: &Changeset, report: &mut SyncReport) {
        for record in &changeset.added {
            if self.apply_one(record, Operation::Upsert, report) {
                report.added += 1;
            }
        }
        for record in &changeset.updated {
            if self.apply_one(record, Operation::Upsert, report) {
                report.updated += 1;
            }
        }
        for record in &changeset.removed {
            if self.apply_one(record, Operation::Delete, report) {
                report.removed += 1;
            }
        }
    }

    /// Apply a single mutation; returns whether it counts as applied
    fn apply_one(&self, record: &Media, operation: Operation, report: &mut SyncReport) -> bool {
        if self.dry_run {
            eprintln!(
                "[DRY RUN] Would {operation}: {} ({} {})",
                record.title, record.kind, record.id
            );
            return true;
        }

        let result = match operation {
            Operation::Upsert => self.target.upsert(record),
            Operation::Delete => self.target.delete(record),
        };

        match result {
            Ok(()) => {
                if self.verbose {
                    println!("{operation}: {} ({} {})", record.title, record.kind, record.id);
                }
                true
            }
            Err(error) => {
                // One bad record must not block convergence of the rest
                eprintln!("Error: {error}");
                report.failures.push(SyncFailure {
                    operation,
                    record: record.clone(),
                    error,
                });
                false
            }
        }
    }
}
