//! One-way synchronization engine
//!
//! Wires the token-validated provider clients and the reconciler
//! together: fetch both collections, reconcile anime and manga
//! independently, apply the changeset against the target with a
//! continue-on-failure policy, and report the outcome.

mod orchestrator;
mod reporting;

pub use orchestrator::{SourceCatalog, SyncEngine, TargetCatalog};
pub use reporting::SyncReporter;

use crate::error::SyncError;
use crate::media::Media;

/// Kind of mutation that was attempted against the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create-or-overwrite of one record
    Upsert,
    /// Removal of one record
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upsert => write!(f, "upsert"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// One mutation that failed, with its cause
#[derive(Debug)]
pub struct SyncFailure {
    /// Which mutation was attempted
    pub operation: Operation,
    /// The record the mutation was for
    pub record: Media,
    /// The typed failure returned by the target
    pub error: SyncError,
}

/// Synchronization result with statistics
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Records created on the target
    pub added: usize,
    /// Records overwritten on the target
    pub updated: usize,
    /// Records deleted from the target
    pub removed: usize,
    /// Mutations that failed, in added/updated-then-removed order
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// Total mutations applied successfully
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.added + self.updated + self.removed
    }

    /// Number of failed mutations
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether the run converged without any per-record failure
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
