//! CLI command implementations

pub mod auth;
pub mod billing;
pub mod clients;
pub mod config;
pub mod consumption;
pub mod export;
pub mod production;
pub mod validate;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use helios_core::adapters::save_download;
use helios_core::ports::SessionListener;
use helios_core::{Download, HeliosContext};

use crate::output;

/// Get the helios directory from environment or default
pub fn get_helios_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("HELIOS_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".helios"))
}

/// Tells the user to sign in again when the stored session dies mid-command
struct ExpiryNotice;

impl SessionListener for ExpiryNotice {
    fn session_expired(&self, _login_path: &str) {
        output::warning("Sua sessão expirou. Entre novamente com 'helios login'.");
    }
}

/// Get or create helios context
pub fn get_context() -> Result<HeliosContext> {
    let helios_dir = get_helios_dir()?;

    std::fs::create_dir_all(&helios_dir)
        .with_context(|| format!("Failed to create helios directory: {:?}", helios_dir))?;
    tracing::debug!(dir = %helios_dir.display(), "using helios directory");

    HeliosContext::with_listener(&helios_dir, Arc::new(ExpiryNotice))
        .context("Failed to initialize helios context")
}

/// Context with the stored session restored; fails when nobody is signed in
pub async fn signed_in_context() -> Result<HeliosContext> {
    let ctx = get_context()?;
    let snapshot = ctx.session.init().await?;
    if snapshot.user.is_none() {
        anyhow::bail!("Not signed in. Run 'helios login' first.");
    }
    Ok(ctx)
}

/// Like [`signed_in_context`], additionally requiring the admin role
pub async fn admin_context() -> Result<HeliosContext> {
    let ctx = signed_in_context().await?;
    if !ctx.session.is_admin() {
        anyhow::bail!("This command requires an administrator account.");
    }
    Ok(ctx)
}

/// Print `value` as pretty JSON
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Save a download into `dir`, the configured export directory, or the
/// current directory, in that order
pub fn save(ctx: &HeliosContext, download: &Download, dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir.or_else(|| ctx.config.export_dir.clone()) {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let path = save_download(download, &dir)?;
    output::success(&format!("Saved {}", path.display()));
    Ok(())
}
