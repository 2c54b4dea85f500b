mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::SyncOptions;

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nInterrupted.");
        std::process::exit(130);
    })
    .context("Failed to install the interrupt handler")?;

    let cli = Cli::parse();
    let options = SyncOptions {
        verbose: cli.verbose,
        dry_run: cli.dry_run,
        config_dir: cli.config_dir.clone(),
    };

    if cli.verbose {
        println!("Verbose mode enabled");
        println!("Dry run: {}", cli.dry_run);
    }

    match &cli.command {
        Commands::Login { provider } => {
            commands::Login::execute(*provider, &options)
                .context("Failed to execute login command")?;
        }
        Commands::Sync { kind } => {
            commands::Sync::execute(*kind, &options)
                .context("Failed to execute sync command")?;
        }
        Commands::Status { kind } => {
            commands::Status::execute(*kind, &options)
                .context("Failed to execute status command")?;
        }
        Commands::Config => {
            commands::Config::execute(&options)
                .context("Failed to execute config command")?;
        }
    }

    Ok(())
}
