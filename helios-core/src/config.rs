//! Configuration management
//!
//! Reads `settings.json` from the helios directory:
//! ```json
//! {
//!   "api": { "url": "https://api.example.com/api", "timeoutSecs": 30 },
//!   "auth": { "googleClientId": "...", "scopes": ["email", "profile"], "loginPath": "/login" },
//!   "export": { "directory": "/home/me/Downloads" }
//! }
//! ```
//! Fields this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ports::{OAuthConfig, DEFAULT_SCOPES};

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOGIN_PATH: &str = "/login";

pub const API_URL_ENV: &str = "HELIOS_API_URL";
pub const GOOGLE_CLIENT_ID_ENV: &str = "HELIOS_GOOGLE_CLIENT_ID";
pub const TIMEOUT_ENV: &str = "HELIOS_TIMEOUT_SECS";

const SETTINGS_FILE: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api: ApiSettings,
    #[serde(default)]
    auth: AuthSettings,
    #[serde(default)]
    export: ExportSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    google_client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scopes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    login_path: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    directory: Option<PathBuf>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Helios configuration (resolved view of settings + environment)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
    pub login_path: String,
    pub google_client_id: Option<String>,
    pub oauth_scopes: Vec<String>,
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            google_client_id: None,
            oauth_scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            export_dir: None,
        }
    }
}

impl Config {
    /// Configuration pointing at `api_url` with every other value defaulted
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Load config from the helios directory
    ///
    /// Environment variables win over the file:
    /// `HELIOS_API_URL`, `HELIOS_GOOGLE_CLIENT_ID`, `HELIOS_TIMEOUT_SECS`.
    pub fn load(helios_dir: &Path) -> Result<Self> {
        let raw = read_settings(helios_dir)?;
        let mut config = Self::from_settings(&raw);
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn from_settings(raw: &SettingsFile) -> Self {
        let defaults = Self::default();
        Self {
            api_url: raw.api.url.clone().unwrap_or(defaults.api_url),
            timeout_secs: raw.api.timeout_secs.unwrap_or(defaults.timeout_secs),
            login_path: raw.auth.login_path.clone().unwrap_or(defaults.login_path),
            google_client_id: raw.auth.google_client_id.clone(),
            oauth_scopes: raw
                .auth
                .scopes
                .clone()
                .filter(|scopes| !scopes.is_empty())
                .unwrap_or(defaults.oauth_scopes),
            export_dir: raw.export.directory.clone(),
        }
    }

    fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(client_id) = var(GOOGLE_CLIENT_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.google_client_id = Some(client_id);
        }
        if let Some(timeout) = var(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            self.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of seconds, got '{}'", TIMEOUT_ENV, timeout))?;
        }
        Ok(())
    }

    /// Save config to the helios directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, helios_dir: &Path) -> Result<()> {
        let mut settings = read_settings(helios_dir)?;

        settings.api.url = Some(self.api_url.clone());
        settings.api.timeout_secs = Some(self.timeout_secs);
        settings.auth.login_path = Some(self.login_path.clone());
        settings.auth.google_client_id = self.google_client_id.clone();
        settings.auth.scopes = Some(self.oauth_scopes.clone());
        settings.export.directory = self.export_dir.clone();

        std::fs::create_dir_all(helios_dir)
            .with_context(|| format!("Failed to create {}", helios_dir.display()))?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(helios_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// OAuth settings for the identity provider, if a client id is configured
    pub fn oauth(&self) -> Option<OAuthConfig> {
        self.google_client_id.as_ref().map(|client_id| OAuthConfig {
            client_id: client_id.clone(),
            scopes: self.oauth_scopes.clone(),
        })
    }
}

fn read_settings(helios_dir: &Path) -> Result<SettingsFile> {
    let settings_path = helios_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::from_settings(&read_settings(dir.path()).unwrap());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.oauth_scopes, vec!["email", "profile"]);
        assert!(config.oauth().is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"api":{"url":"https://file.example/api","timeoutSecs":5}}"#,
        )
        .unwrap();

        let mut config = Config::from_settings(&read_settings(dir.path()).unwrap());
        assert_eq!(config.timeout_secs, 5);

        config
            .apply_env(|key| match key {
                API_URL_ENV => Some("https://env.example/api".to_string()),
                GOOGLE_CLIENT_ID_ENV => Some("client-123".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.api_url, "https://env.example/api");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.oauth().unwrap().client_id, "client-123");
    }

    #[test]
    fn test_bad_timeout_env_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_env(|key| (key == TIMEOUT_ENV).then(|| "soon".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"theme":"dark","api":{"url":"http://a","retries":3}}"#,
        )
        .unwrap();

        let mut config = Config::from_settings(&read_settings(dir.path()).unwrap());
        config.api_url = "http://b".to_string();
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["theme"], "dark");
        assert_eq!(json["api"]["retries"], 3);
        assert_eq!(json["api"]["url"], "http://b");
    }
}
