//! Session credentials and lifecycle phases

use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Keys under which the session is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    AccessToken,
    RefreshToken,
    User,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [
        StorageKey::AccessToken,
        StorageKey::RefreshToken,
        StorageKey::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::AccessToken => "token",
            StorageKey::RefreshToken => "refreshToken",
            StorageKey::User => "user",
        }
    }
}

/// Access and refresh token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Expiry of the access token when it is a JWT carrying `exp`
    pub fn access_token_expiry(&self) -> Option<DateTime<Utc>> {
        token_expiry(&self.access_token)
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: i64,
}

/// Read the `exp` claim of a JWT without verifying it.
///
/// Opaque tokens and malformed payloads yield `None`.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&bytes).ok()?;
    Utc.timestamp_opt(claim.exp, 0).single()
}

/// Payload returned by the login, OAuth and register endpoints.
///
/// The backend sends either `{user, tokens: {accessToken, refreshToken}}`
/// or the tokens flattened next to the user (`token`/`accessToken`,
/// `refreshToken`, `expiresIn`); both decode to the same value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "AuthPayload")]
pub struct AuthResponse {
    pub user: User,
    pub tokens: CredentialPair,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuthPayload {
    Nested { user: User, tokens: CredentialPair },
    Flat(FlatAuth),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatAuth {
    user: User,
    #[serde(alias = "token")]
    access_token: String,
    refresh_token: String,
}

impl From<AuthPayload> for AuthResponse {
    fn from(payload: AuthPayload) -> Self {
        match payload {
            AuthPayload::Nested { user, tokens } => Self { user, tokens },
            AuthPayload::Flat(flat) => Self {
                user: flat.user,
                tokens: CredentialPair::new(flat.access_token, flat.refresh_token),
            },
        }
    }
}

/// Payload returned by the refresh endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedTokens {
    #[serde(alias = "token")]
    pub access_token: String,
    /// Present when the backend rotates refresh tokens
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Anonymous,
    Authenticating,
    Authenticated,
    Refreshing,
}

impl SessionPhase {
    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(self, next: SessionPhase) -> bool {
        use SessionPhase::*;
        matches!(
            (self, next),
            (Anonymous, Authenticating)
                | (Authenticated, Authenticating)
                | (Authenticating, Authenticated)
                | (Authenticating, Anonymous)
                | (Authenticated, Refreshing)
                | (Anonymous, Refreshing)
                | (Refreshing, Authenticated)
                | (Refreshing, Anonymous)
                | (Authenticated, Anonymous)
        )
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionPhase::Anonymous => "anonymous",
            SessionPhase::Authenticating => "authenticating",
            SessionPhase::Authenticated => "authenticated",
            SessionPhase::Refreshing => "refreshing",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_payload(payload: &str) -> String {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        format!(
            "{}.{}.sig",
            engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            engine.encode(payload)
        )
    }

    #[test]
    fn test_storage_keys_match_persisted_names() {
        assert_eq!(StorageKey::AccessToken.as_str(), "token");
        assert_eq!(StorageKey::RefreshToken.as_str(), "refreshToken");
        assert_eq!(StorageKey::User.as_str(), "user");
    }

    #[test]
    fn test_token_expiry_reads_exp_claim() {
        let token = jwt_with_payload(r#"{"sub":"u-1","exp":1700000000}"#);
        let pair = CredentialPair::new(token, "refresh");
        let expiry = pair.access_token_expiry().unwrap();
        assert_eq!(expiry.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_opaque_token_has_no_expiry() {
        assert!(token_expiry("opaque-token").is_none());
        assert!(token_expiry(&jwt_with_payload(r#"{"sub":"x"}"#)).is_none());
    }

    #[test]
    fn test_refresh_payload_accepts_legacy_token_field() {
        let tokens: RefreshedTokens = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(tokens.access_token, "abc");
        assert!(tokens.refresh_token.is_none());
    }

    #[test]
    fn test_auth_response_accepts_nested_and_flat_tokens() {
        let user = r#"{"id":"u-1","name":"Ana","email":"ana@example.com","role":"user","createdAt":"2024-01-10T12:00:00Z"}"#;

        let nested = format!(
            r#"{{"user":{},"tokens":{{"accessToken":"a-1","refreshToken":"r-1"}}}}"#,
            user
        );
        let auth: AuthResponse = serde_json::from_str(&nested).unwrap();
        assert_eq!(auth.tokens, CredentialPair::new("a-1", "r-1"));

        let flat = format!(
            r#"{{"user":{},"token":"a-2","refreshToken":"r-2","expiresIn":3600}}"#,
            user
        );
        let auth: AuthResponse = serde_json::from_str(&flat).unwrap();
        assert_eq!(auth.user.id, "u-1");
        assert_eq!(auth.tokens, CredentialPair::new("a-2", "r-2"));

        let flat = format!(
            r#"{{"user":{},"accessToken":"a-3","refreshToken":"r-3"}}"#,
            user
        );
        let auth: AuthResponse = serde_json::from_str(&flat).unwrap();
        assert_eq!(auth.tokens.access_token, "a-3");
    }

    #[test]
    fn test_phase_transitions() {
        use SessionPhase::*;
        assert!(Anonymous.can_transition_to(Authenticating));
        assert!(Authenticated.can_transition_to(Refreshing));
        assert!(Refreshing.can_transition_to(Anonymous));
        assert!(!Anonymous.can_transition_to(Authenticated));
        assert!(!Refreshing.can_transition_to(Authenticating));
    }
}
