use ani2mal::config::{ConfigStore, CredentialStore};
use ani2mal::providers::Provider;

use super::SyncOptions;

pub struct Config;

impl Config {
    pub fn execute(options: &SyncOptions) -> anyhow::Result<()> {
        if options.verbose {
            println!("Executing config command");
        }

        let store = options.open_store()?;
        println!("Config directory: {}", store.config_dir().display());

        for provider in [Provider::Anilist, Provider::Mal] {
            println!("\n{provider}");
            println!("  File: {}", store.credentials_path(provider).display());
            Self::print_login_state(&store, provider);
        }
        Ok(())
    }

    fn print_login_state(store: &ConfigStore, provider: Provider) {
        let Ok(credentials) = store.load(provider) else {
            println!("  Logged in: no");
            return;
        };

        println!("  Logged in: yes");
        if let Some(username) = &credentials.username {
            println!("  Username: {username}");
        }
        match &credentials.tokens {
            Some(tokens) => println!("  Token expires: {}", tokens.expires_at.to_rfc3339()),
            None => println!("  Tokens: none stored"),
        }
    }
}
