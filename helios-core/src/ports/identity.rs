//! OAuth identity provider port

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;

/// Scopes requested from the identity provider unless configured otherwise
pub const DEFAULT_SCOPES: [&str; 2] = ["email", "profile"];

/// Settings handed to the provider before it prompts the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthConfig {
    pub client_id: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// External sign-in flow yielding a credential the backend can verify
///
/// `initialize` is called once per sign-in attempt, then `prompt` runs the
/// interactive part and returns the credential token.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider name (e.g., "google")
    fn name(&self) -> &str;

    async fn initialize(&self, config: &OAuthConfig) -> Result<()>;

    async fn prompt(&self) -> Result<String>;
}
