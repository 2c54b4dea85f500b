use ani2mal::sync::{SyncEngine, SyncReporter};

use super::SyncOptions;
use super::common::build_clients;
use crate::cli::KindArg;

pub struct Sync;

impl Sync {
    pub fn execute(kind: Option<KindArg>, options: &SyncOptions) -> anyhow::Result<()> {
        if options.verbose {
            println!("Executing sync command");
            println!("Kind filter: {kind:?}");
        }

        let store = options.open_store()?;
        let (source, target) = build_clients(&store)?;

        let report = SyncEngine::new(&source, &target)
            .kinds(KindArg::kinds(kind))
            .dry_run(options.dry_run)
            .verbose(options.verbose)
            .run()?;

        let summary = SyncReporter::generate_summary(&report);
        println!("{summary}");

        if !report.is_success() {
            anyhow::bail!("sync completed with {} failed operations", report.failed());
        }
        Ok(())
    }
}
