//! Session lifecycle
//!
//! [`SessionManager`] owns sign-in, sign-out and profile updates. It shares
//! its [`SessionStorage`] and [`SessionState`] with the HTTP client, which
//! handles token refresh on its own.

mod state;
mod storage;

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

pub use state::{SessionSnapshot, SessionState};
pub use storage::SessionStorage;

use crate::domain::result::{Error, Result};
use crate::domain::{AuthResponse, LoginCredentials, SessionPhase, User, UserPatch};
use crate::http::ApiClient;
use crate::ports::{IdentityProvider, OAuthConfig};
use crate::services::AuthService;
use crate::validators;

pub struct SessionManager {
    client: Arc<ApiClient>,
    auth: AuthService,
    oauth: Option<OAuthConfig>,
}

impl SessionManager {
    pub fn new(client: Arc<ApiClient>, oauth: Option<OAuthConfig>) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&client)),
            client,
            oauth,
        }
    }

    fn storage(&self) -> &SessionStorage {
        self.client.storage()
    }

    pub fn state(&self) -> &Arc<SessionState> {
        self.client.state()
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state().snapshot()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state().user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|user| user.is_admin())
    }

    /// Restore a stored session.
    ///
    /// A stored access token is checked against `/auth/me`; any failure
    /// drops the stored session without surfacing an error. Only storage
    /// failures are returned.
    pub async fn init(&self) -> Result<SessionSnapshot> {
        let state = self.state();
        if !self.storage().has_session()? {
            state.clear();
            return Ok(state.snapshot());
        }

        let previous = state.begin_login();
        match self.auth.me().await {
            Ok(user) => {
                self.storage().set_user(&user)?;
                debug!(user_id = %user.id, "stored session restored");
                state.authenticated(user);
            }
            Err(e) => {
                debug!(error = %e, "stored session rejected");
                self.storage().clear()?;
                state.abort_login(previous);
                state.clear();
            }
        }
        state.set_loading(false);
        Ok(state.snapshot())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        validators::require("email", validators::email_error(email))?;
        if password.is_empty() {
            return Err(Error::invalid_field("password", "Senha é obrigatória"));
        }
        let credentials = LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.establish(self.auth.login(&credentials)).await
    }

    /// Sign in with a credential issued by the identity provider
    pub async fn login_with_oauth(&self, credential: &str) -> Result<User> {
        if credential.trim().is_empty() {
            return Err(Error::invalid_field("credential", "Credencial ausente"));
        }
        self.establish(self.auth.login_with_google(credential)).await
    }

    /// Run the provider's sign-in flow and log in with its credential
    pub async fn login_with_provider(&self, provider: &dyn IdentityProvider) -> Result<User> {
        let config = self.oauth.as_ref().ok_or_else(|| {
            Error::Config(format!("no OAuth client id configured for {}", provider.name()))
        })?;
        provider.initialize(config).await?;
        let credential = provider.prompt().await?;
        debug!(provider = provider.name(), "identity provider returned a credential");
        self.login_with_oauth(&credential).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        if !validators::is_not_empty(name) {
            return Err(Error::invalid_field("name", "Nome é obrigatório"));
        }
        validators::require("email", validators::email_error(email))?;
        validators::require("password", validators::password_error(password))?;
        self.establish(self.auth.register(email, password, name.trim()))
            .await
    }

    /// Sign-in common path: tokens then user are persisted before the
    /// in-memory session changes.
    async fn establish<F>(&self, call: F) -> Result<User>
    where
        F: Future<Output = Result<AuthResponse>>,
    {
        let state = self.state();
        let previous = state.begin_login();
        state.set_loading(true);

        let auth = match call.await {
            Ok(auth) => auth,
            Err(e) => {
                debug!(error = %e, "sign-in rejected");
                state.abort_login(previous);
                state.set_loading(false);
                return Err(e);
            }
        };

        if let Err(e) = self.storage().save_login(&auth) {
            warn!(error = %e, "could not persist session");
            state.abort_login(SessionPhase::Anonymous);
            state.clear();
            return Err(e);
        }

        info!(user_id = %auth.user.id, "signed in");
        state.authenticated(auth.user.clone());
        Ok(auth.user)
    }

    /// Refresh the access token now
    pub async fn refresh(&self) -> Result<()> {
        self.client.refresh_session().await.map(|_| ())
    }

    /// Sign out. The backend is told when reachable; local state is always
    /// cleared.
    pub async fn logout(&self) -> Result<()> {
        if let Err(e) = self.auth.logout().await {
            warn!(error = %e, "logout request failed, clearing local session anyway");
        }
        self.state().clear();
        self.storage().clear()?;
        info!("signed out");
        Ok(())
    }

    /// Merge `patch` into the signed-in user and persist it.
    /// Returns `None` when nobody is signed in.
    pub fn update_user(&self, patch: &UserPatch) -> Result<Option<User>> {
        let Some(mut user) = self.current_user() else {
            return Ok(None);
        };
        user.apply(patch);
        self.storage().set_user(&user)?;
        self.state().replace_user(user.clone());
        Ok(Some(user))
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("phase", &self.state().phase())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::config::Config;
    use crate::domain::Role;

    fn manager() -> SessionManager {
        let storage = SessionStorage::new(Arc::new(MemoryStore::new()));
        let state = Arc::new(SessionState::default());
        // nothing listens on port 9
        let config = Config::with_api_url("http://127.0.0.1:9/api");
        let client = ApiClient::new(&config, storage, state).unwrap();
        SessionManager::new(Arc::new(client), None)
    }

    #[tokio::test]
    async fn test_init_without_token_is_anonymous() {
        let manager = manager();
        let snapshot = manager.init().await.unwrap();
        assert_eq!(snapshot.phase, SessionPhase::Anonymous);
        assert!(!snapshot.loading);
        assert!(snapshot.user.is_none());
    }

    #[tokio::test]
    async fn test_login_validates_before_sending() {
        let manager = manager();
        let err = manager.login("not-an-email", "secret").await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(manager.state().phase(), SessionPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_register_checks_password_strength() {
        let manager = manager();
        let err = manager
            .register("Ana", "ana@example.com", "abcdefgh")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Senha deve conter letra maiúscula, minúscula e número"
        );
    }

    #[tokio::test]
    async fn test_login_with_provider_requires_oauth_config() {
        struct Fake;

        #[async_trait::async_trait]
        impl IdentityProvider for Fake {
            fn name(&self) -> &str {
                "google"
            }
            async fn initialize(&self, _config: &OAuthConfig) -> Result<()> {
                Ok(())
            }
            async fn prompt(&self) -> Result<String> {
                Ok("credential".to_string())
            }
        }

        let err = manager().login_with_provider(&Fake).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_update_user_is_noop_when_anonymous() {
        let manager = manager();
        let patch = UserPatch {
            name: Some("Bia".to_string()),
            ..Default::default()
        };
        assert!(manager.update_user(&patch).unwrap().is_none());
    }

    #[test]
    fn test_update_user_merges_and_persists() {
        let manager = manager();
        manager.state().begin_login();
        manager
            .state()
            .authenticated(User::new("u-1", "Ana", "ana@example.com", Role::User));

        let patch = UserPatch {
            name: Some("Ana Souza".to_string()),
            phone: Some("11987654321".to_string()),
            ..Default::default()
        };
        let updated = manager.update_user(&patch).unwrap().unwrap();
        assert_eq!(updated.name, "Ana Souza");
        assert_eq!(updated.email, "ana@example.com");
        assert_eq!(manager.storage().user().unwrap().unwrap().name, "Ana Souza");
        assert!(!manager.is_admin());
    }
}
