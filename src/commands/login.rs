use std::io::Write as _;

use anyhow::Context;

use ani2mal::config::{ConfigStore, CredentialStore, ProviderCredentials};
use ani2mal::providers::{AnilistAuth, MalAuth, Provider};

use super::SyncOptions;
use crate::cli::ProviderArg;

pub struct Login;

impl Login {
    pub fn execute(provider: ProviderArg, options: &SyncOptions) -> anyhow::Result<()> {
        if options.verbose {
            println!("Executing login command");
            println!("Provider: {provider:?}");
        }

        let store = options.open_store()?;
        match provider {
            ProviderArg::Mal => Self::login_mal(&store),
            ProviderArg::Anilist => Self::login_anilist(&store),
        }
    }

    fn login_mal(store: &ConfigStore) -> anyhow::Result<()> {
        println!("Register an application at https://myanimelist.net/apiconfig");
        println!("(app type \"other\", redirect URI can be left blank)\n");

        let client_id = prompt("Client ID")?;
        let client_secret = prompt("Client secret")?;
        let mut credentials = ProviderCredentials::new(client_id, client_secret);

        // MAL only supports the plain method, so the verifier is the challenge
        let verifier = MalAuth::generate_code_verifier();
        println!("\nOpen this URL in your browser and authorize the application:");
        println!(
            "{}",
            MalAuth::authorize_url(&credentials.client_id, &verifier)
        );
        let code = prompt("\nAuthorization code")?;

        let auth = MalAuth::new()?;
        credentials.tokens = Some(auth.exchange_code(&credentials, &code, &verifier)?);
        store.save(Provider::Mal, &credentials)?;

        println!(
            "\nLogged in to MyAnimeList. Credentials saved to {}",
            store.credentials_path(Provider::Mal).display()
        );
        Ok(())
    }

    fn login_anilist(store: &ConfigStore) -> anyhow::Result<()> {
        println!("Register an application at https://anilist.co/settings/developer");
        println!("(set the redirect URL to https://anilist.co/api/v2/oauth/pin)\n");

        let client_id = prompt("Client ID")?;
        let client_secret = prompt("Client secret")?;
        let username = prompt("AniList username")?;
        let mut credentials = ProviderCredentials::new(client_id, client_secret);
        credentials.username = Some(username);

        println!("\nOpen this URL in your browser and authorize the application:");
        println!("{}", AnilistAuth::authorize_url(&credentials.client_id));
        let code = prompt("\nAuthorization pin")?;

        let auth = AnilistAuth::new()?;
        credentials.tokens = Some(auth.exchange_code(&credentials, &code)?);
        store.save(Provider::Anilist, &credentials)?;

        println!(
            "\nLogged in to AniList. Credentials saved to {}",
            store.credentials_path(Provider::Anilist).display()
        );
        Ok(())
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}: ");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read input")?;
    let value = line.trim().to_string();
    if value.is_empty() {
        anyhow::bail!("{label} must not be empty");
    }
    Ok(value)
}
