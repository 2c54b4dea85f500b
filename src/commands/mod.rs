pub mod common;
pub mod config;
pub mod login;
pub mod status;
pub mod sync;

pub use config::Config;
pub use login::Login;
pub use status::Status;
pub use sync::Sync;

use std::path::PathBuf;

use ani2mal::config::ConfigStore;

/// Global options shared by every command
pub struct SyncOptions {
    pub verbose: bool,
    pub dry_run: bool,
    pub config_dir: Option<PathBuf>,
}

impl SyncOptions {
    /// Open the credential store, honoring the `--config-dir` override
    pub fn open_store(&self) -> anyhow::Result<ConfigStore> {
        match &self.config_dir {
            Some(dir) => ConfigStore::open_at(dir),
            None => ConfigStore::open(),
        }
    }
}
