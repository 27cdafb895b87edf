//! Config command - show or change settings.json

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use helios_core::config::Config;

use super::get_helios_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change settings
    Set {
        /// Backend base URL, including the /api prefix
        #[arg(long)]
        api_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Google OAuth client id
        #[arg(long)]
        google_client_id: Option<String>,
        /// Where exports are saved
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
}

pub fn run(command: Option<ConfigCommands>) -> Result<()> {
    let helios_dir = get_helios_dir()?;
    let mut config = Config::load(&helios_dir)?;

    match command.unwrap_or(ConfigCommands::Show { json: false }) {
        ConfigCommands::Show { json } => {
            if json {
                let value = serde_json::json!({
                    "apiUrl": config.api_url,
                    "timeoutSecs": config.timeout_secs,
                    "loginPath": config.login_path,
                    "googleClientId": config.google_client_id,
                    "oauthScopes": config.oauth_scopes,
                    "exportDir": config.export_dir,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }
            println!("{} {}", "Settings in".bold(), helios_dir.display());
            println!(
                "{}",
                output::summary_table(&[
                    ("API URL", config.api_url.clone()),
                    ("Timeout", format!("{}s", config.timeout_secs)),
                    (
                        "Google client id",
                        config.google_client_id.clone().unwrap_or_else(|| "-".into())
                    ),
                    ("OAuth scopes", config.oauth_scopes.join(" ")),
                    (
                        "Export directory",
                        config
                            .export_dir
                            .as_ref()
                            .map(|d| d.display().to_string())
                            .unwrap_or_else(|| "current directory".into())
                    ),
                ])
            );
        }
        ConfigCommands::Set {
            api_url,
            timeout,
            google_client_id,
            export_dir,
        } => {
            if api_url.is_none()
                && timeout.is_none()
                && google_client_id.is_none()
                && export_dir.is_none()
            {
                output::warning("Nothing to change");
                return Ok(());
            }
            if let Some(url) = api_url {
                if !helios_core::validators::is_valid_url(&url) {
                    anyhow::bail!("Invalid API URL: {}", url);
                }
                config.api_url = url;
            }
            if let Some(timeout) = timeout {
                config.timeout_secs = timeout;
            }
            if let Some(client_id) = google_client_id {
                config.google_client_id = Some(client_id).filter(|id| !id.is_empty());
            }
            if let Some(dir) = export_dir {
                config.export_dir = Some(dir);
            }
            config.save(&helios_dir)?;
            output::success("Settings saved");
        }
    }

    Ok(())
}
