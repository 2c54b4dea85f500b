//! Sync operation reporting and statistics

use std::fmt::Write;

use super::SyncReport;

/// Sync operation reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(report: &SyncReport) -> String {
        let mut output = String::new();

        output.push_str("\n=== Sync Summary ===\n");
        let _ = writeln!(output, "Added:    {}", report.added);
        let _ = writeln!(output, "Updated:  {}", report.updated);
        let _ = writeln!(output, "Removed:  {}", report.removed);
        let _ = writeln!(output, "Failed:   {}", report.failed());

        if !report.failures.is_empty() {
            let _ = writeln!(output, "\nFailures ({}):", report.failures.len());
            for failure in &report.failures {
                let _ = writeln!(
                    output,
                    "  - {} \"{}\" ({} {}): {}",
                    failure.operation,
                    failure.record.title,
                    failure.record.kind,
                    failure.record.id,
                    failure.error
                );
            }
        }

        let _ = writeln!(output, "\nTotal operations: {}", report.total_operations());

        if report.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::media::{Media, MediaKind, MediaStatus};
    use crate::providers::Provider;
    use crate::sync::{Operation, SyncFailure};

    #[test]
    fn test_summary_counts() {
        let report = SyncReport {
            added: 5,
            updated: 3,
            removed: 2,
            failures: Vec::new(),
        };

        let summary = SyncReporter::generate_summary(&report);

        assert!(summary.contains("Added:    5"));
        assert!(summary.contains("Updated:  3"));
        assert!(summary.contains("Removed:  2"));
        assert!(summary.contains("Total operations: 10"));
        assert!(summary.contains("✓ Success"));
    }

    #[test]
    fn test_summary_lists_failures() {
        let record = Media {
            id: 1,
            title: "Cowboy Bebop".to_string(),
            kind: MediaKind::Anime,
            status: MediaStatus::Completed,
            progress: 26,
            score: 9,
            length: 26,
            repeat: false,
        };
        let report = SyncReport {
            added: 1,
            updated: 0,
            removed: 0,
            failures: vec![SyncFailure {
                operation: Operation::Upsert,
                error: SyncError::MutationFailed {
                    provider: Provider::Mal,
                    title: record.title.clone(),
                    kind: record.kind,
                    id: record.id,
                    source: anyhow::anyhow!("HTTP 500"),
                },
                record,
            }],
        };

        let summary = SyncReporter::generate_summary(&report);

        assert!(summary.contains("Failures (1)"));
        assert!(summary.contains("upsert \"Cowboy Bebop\" (anime 1)"));
        assert!(summary.contains("✗ Completed with errors"));
    }
}
