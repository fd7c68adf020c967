//! `ymusage fetch` handler.

use std::io::IsTerminal;

use anyhow::{Context, Result};

use ymobile_usage::{Config, Credentials, UsageFetcher};

use super::format_record;

/// Fetch (or serve cached) usage and print it.
pub(crate) async fn cmd_fetch(refresh: bool, json: bool) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let credentials = resolve_credentials(&config)?;

    let fetcher = UsageFetcher::new(&config);
    let record = fetcher
        .get_data(&credentials, refresh)
        .await
        .map_err(|e| {
            if e.is_credential_error() {
                eprintln!("Check YMUSAGE_ID / YMUSAGE_PASSWORD; the portal rejected the login.");
            }
            e
        })
        .context("Usage fetch failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", format_record(&record));
    }
    Ok(())
}

/// Identifier from config/env; password from config/env or an interactive prompt.
fn resolve_credentials(config: &Config) -> Result<Credentials> {
    let identifier = config.identifier.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "No account identifier configured.\n\
             Set YMUSAGE_ID or add \"identifier\" to {}",
            Config::path().display()
        )
    })?;

    let password = match &config.password {
        Some(pw) => pw.clone(),
        None if std::io::stdin().is_terminal() => {
            rpassword::prompt_password(format!("Password for {}: ", identifier))
                .context("Failed to read password")?
        }
        None => anyhow::bail!("No password configured. Set YMUSAGE_PASSWORD."),
    };

    Ok(Credentials::new(identifier, password))
}
