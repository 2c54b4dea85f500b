use ani2mal::reconcile::Reconciler;
use ani2mal::sync::{SourceCatalog, TargetCatalog};

use super::SyncOptions;
use super::common::build_clients;
use crate::cli::KindArg;

pub struct Status;

impl Status {
    pub fn execute(kind: Option<KindArg>, options: &SyncOptions) -> anyhow::Result<()> {
        if options.verbose {
            println!("Executing status command");
            println!("Kind filter: {kind:?}");
        }

        let store = options.open_store()?;
        let (anilist, mal) = build_clients(&store)?;

        let source = anilist.fetch_collection()?;
        let target = mal.fetch_collection()?;

        let stats = source.stats();
        println!(
            "AniList: {} entries (current {}, completed {}, planning {}, paused {}, dropped {})",
            stats.total(),
            stats.current,
            stats.completed,
            stats.planning,
            stats.paused,
            stats.dropped
        );
        println!("MyAnimeList: {} entries", target.len());

        let mut pending = 0;
        for kind in KindArg::kinds(kind) {
            let changeset = Reconciler::reconcile(source.entries(kind), target.entries(kind));
            pending += changeset.len();
            println!(
                "\n{kind}: {} to add, {} to update, {} to remove",
                changeset.added.len(),
                changeset.updated.len(),
                changeset.removed.len()
            );
            if options.verbose {
                for record in &changeset.added {
                    println!("  + {} ({})", record.title, record.id);
                }
                for record in &changeset.updated {
                    println!("  ~ {} ({})", record.title, record.id);
                }
                for record in &changeset.removed {
                    println!("  - {} ({})", record.title, record.id);
                }
            }
        }

        if pending == 0 {
            println!("\nLists are in sync.");
        } else {
            println!("\n{pending} pending changes. Run `ani2mal sync` to apply them.");
        }
        Ok(())
    }
}
