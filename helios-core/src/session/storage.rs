//! Typed access to the persisted session keys

use std::sync::Arc;

use tracing::warn;

use crate::domain::result::Result;
use crate::domain::{AuthResponse, StorageKey, User};
use crate::ports::SessionStore;

/// Session credentials and user record on top of a `SessionStore`
///
/// Cheap to clone; every clone shares the same store.
#[derive(Clone)]
pub struct SessionStorage {
    store: Arc<dyn SessionStore>,
}

impl SessionStorage {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    fn read(&self, key: StorageKey) -> Result<Option<String>> {
        Ok(self.store.get(key)?.filter(|value| !value.is_empty()))
    }

    pub fn access_token(&self) -> Result<Option<String>> {
        self.read(StorageKey::AccessToken)
    }

    pub fn refresh_token(&self) -> Result<Option<String>> {
        self.read(StorageKey::RefreshToken)
    }

    /// Stored user record. A record that no longer decodes is dropped.
    pub fn user(&self) -> Result<Option<User>> {
        let Some(raw) = self.read(StorageKey::User)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "discarding unreadable stored user");
                self.store.remove(StorageKey::User)?;
                Ok(None)
            }
        }
    }

    pub fn set_access_token(&self, token: &str) -> Result<()> {
        self.store.set(StorageKey::AccessToken, token)
    }

    pub fn set_refresh_token(&self, token: &str) -> Result<()> {
        self.store.set(StorageKey::RefreshToken, token)
    }

    pub fn set_user(&self, user: &User) -> Result<()> {
        self.store.set(StorageKey::User, &serde_json::to_string(user)?)
    }

    /// Persist a fresh login: access token, then refresh token, then user.
    ///
    /// If any write fails the partial session is removed again.
    pub fn save_login(&self, auth: &AuthResponse) -> Result<()> {
        let written = self
            .set_access_token(&auth.tokens.access_token)
            .and_then(|_| self.set_refresh_token(&auth.tokens.refresh_token))
            .and_then(|_| self.set_user(&auth.user));
        if let Err(e) = written {
            if let Err(cleanup) = self.clear() {
                warn!(error = %cleanup, "failed to remove partial session");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove all three keys. Returns whether anything was stored.
    pub fn clear(&self) -> Result<bool> {
        let mut had_any = false;
        for key in StorageKey::ALL {
            had_any |= self.store.get(key)?.is_some();
            self.store.remove(key)?;
        }
        Ok(had_any)
    }

    /// Whether an access token is stored. Says nothing about its validity.
    pub fn has_session(&self) -> Result<bool> {
        Ok(self.access_token()?.is_some())
    }
}

impl std::fmt::Debug for SessionStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStorage").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::{CredentialPair, Role};

    fn storage() -> (Arc<MemoryStore>, SessionStorage) {
        let store = Arc::new(MemoryStore::new());
        let storage = SessionStorage::new(store.clone());
        (store, storage)
    }

    #[test]
    fn test_save_login_persists_all_keys() {
        let (store, storage) = storage();
        let auth = AuthResponse {
            user: User::new("u-1", "Ana", "ana@example.com", Role::User),
            tokens: CredentialPair::new("access", "refresh"),
        };
        storage.save_login(&auth).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(storage.access_token().unwrap().as_deref(), Some("access"));
        assert_eq!(storage.refresh_token().unwrap().as_deref(), Some("refresh"));
        assert_eq!(storage.user().unwrap().unwrap().email, "ana@example.com");
    }

    #[test]
    fn test_clear_reports_whether_anything_was_removed() {
        let (store, storage) = storage();
        assert!(!storage.clear().unwrap());

        storage.set_refresh_token("refresh").unwrap();
        assert!(storage.clear().unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        let (_, storage) = storage();
        storage.set_access_token("").unwrap();
        assert!(!storage.has_session().unwrap());
    }

    #[test]
    fn test_corrupt_user_is_dropped() {
        let (store, storage) = storage();
        store.set(StorageKey::User, "{not json").unwrap();
        assert!(storage.user().unwrap().is_none());
        assert!(store.get(StorageKey::User).unwrap().is_none());
    }
}
