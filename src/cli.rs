use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use ani2mal::media::MediaKind;
use ani2mal::providers::Provider;

/// AniList to MyAnimeList Synchronization Tool
///
/// One-way sync: reads your AniList anime and manga lists and converges your
/// MyAnimeList account to match them. Nothing is ever written back to AniList.
#[derive(Parser, Debug)]
#[command(name = "ani2mal")]
#[command(long_about = None, version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preview changes without executing (dry-run)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Override the config directory (default: platform config dir)
    #[arg(long, global = true, value_name = "PATH", env = "ANI2MAL_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authorize with a provider and store the resulting tokens
    Login {
        /// Provider to log in to
        #[arg(value_enum)]
        provider: ProviderArg,
    },

    /// Sync the AniList lists to MyAnimeList
    Sync {
        /// Restrict the sync to one kind
        #[arg(short = 'k', long = "kind", value_enum)]
        kind: Option<KindArg>,
    },

    /// Show pending changes without making any
    Status {
        /// Restrict the report to one kind
        #[arg(short = 'k', long = "kind", value_enum)]
        kind: Option<KindArg>,
    },

    /// Show the config location and login state
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProviderArg {
    /// MyAnimeList (the sync target)
    Mal,
    /// AniList (the sync source)
    Anilist,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Mal => Self::Mal,
            ProviderArg::Anilist => Self::Anilist,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    /// Anime lists only
    Anime,
    /// Manga lists only
    Manga,
}

impl KindArg {
    /// Expand an optional filter into the kinds a run should cover
    pub fn kinds(filter: Option<Self>) -> Vec<MediaKind> {
        match filter {
            None => vec![MediaKind::Anime, MediaKind::Manga],
            Some(Self::Anime) => vec![MediaKind::Anime],
            Some(Self::Manga) => vec![MediaKind::Manga],
        }
    }
}
