//! In-memory session state shared by the HTTP client and the session manager

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::domain::{SessionPhase, User};
use crate::ports::{NoopListener, SessionListener};

/// Point-in-time view of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub user: Option<User>,
    pub loading: bool,
}

/// Phase, user and loading flag behind one lock
///
/// Every phase change goes through `SessionPhase::can_transition_to`;
/// illegal moves are logged and ignored. Listener callbacks run after the
/// lock is released.
pub struct SessionState {
    inner: RwLock<SessionSnapshot>,
    listener: Arc<dyn SessionListener>,
}

impl SessionState {
    pub fn new(listener: Arc<dyn SessionListener>) -> Self {
        Self {
            inner: RwLock::new(SessionSnapshot {
                phase: SessionPhase::Anonymous,
                user: None,
                loading: true,
            }),
            listener,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionSnapshot> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionSnapshot> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.read().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.read().phase
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn set_loading(&self, loading: bool) {
        self.write().loading = loading;
    }

    /// Apply `next` if legal; returns the new phase when it changed
    fn apply(state: &mut SessionSnapshot, next: SessionPhase) -> Option<SessionPhase> {
        if state.phase == next {
            return None;
        }
        if !state.phase.can_transition_to(next) {
            warn!(from = %state.phase, to = %next, "ignoring illegal session transition");
            return None;
        }
        debug!(from = %state.phase, to = %next, "session transition");
        state.phase = next;
        Some(next)
    }

    fn notify(&self, changed: Option<SessionPhase>) {
        if let Some(phase) = changed {
            self.listener.phase_changed(phase);
        }
    }

    /// A login started. Returns the phase to restore if it fails.
    pub fn begin_login(&self) -> SessionPhase {
        let (previous, changed) = {
            let mut state = self.write();
            let previous = state.phase;
            (previous, Self::apply(&mut state, SessionPhase::Authenticating))
        };
        self.notify(changed);
        previous
    }

    /// A login failed; go back to where we were
    pub fn abort_login(&self, previous: SessionPhase) {
        let changed = {
            let mut state = self.write();
            if state.phase != SessionPhase::Authenticating {
                None
            } else {
                let target = if previous == SessionPhase::Authenticated {
                    SessionPhase::Authenticated
                } else {
                    SessionPhase::Anonymous
                };
                Self::apply(&mut state, target)
            }
        };
        self.notify(changed);
    }

    /// Credentials are stored and `user` is now signed in
    pub fn authenticated(&self, user: User) {
        let changed = {
            let mut state = self.write();
            let changed = Self::apply(&mut state, SessionPhase::Authenticated);
            if state.phase == SessionPhase::Authenticated {
                state.user = Some(user);
                state.loading = false;
            }
            changed
        };
        self.notify(changed);
    }

    /// A token refresh started.
    ///
    /// While a login or restore is in progress the phase stays
    /// `authenticating`: that flow settles the outcome, and the refresh only
    /// swaps the stored token underneath it.
    pub fn begin_refresh(&self) {
        let changed = {
            let mut state = self.write();
            if state.phase == SessionPhase::Authenticating {
                None
            } else {
                Self::apply(&mut state, SessionPhase::Refreshing)
            }
        };
        self.notify(changed);
    }

    /// The refresh succeeded. `stored_user` fills in the user when the
    /// session was restored from storage without `init`.
    pub fn refreshed(&self, stored_user: Option<User>) {
        let changed = {
            let mut state = self.write();
            if state.phase != SessionPhase::Refreshing {
                None
            } else {
                if state.user.is_none() {
                    state.user = stored_user;
                }
                Self::apply(&mut state, SessionPhase::Authenticated)
            }
        };
        self.notify(changed);
    }

    /// Replace the in-memory user, e.g. after a profile patch
    pub fn replace_user(&self, user: User) {
        self.write().user = Some(user);
    }

    /// Drop the user and return to `anonymous`
    pub fn clear(&self) {
        let changed = {
            let mut state = self.write();
            state.user = None;
            state.loading = false;
            if state.phase == SessionPhase::Authenticating {
                // a login racing with an expiry keeps its own phase
                None
            } else {
                Self::apply(&mut state, SessionPhase::Anonymous)
            }
        };
        self.notify(changed);
    }

    /// The session ended without the user asking. Clears memory and tells
    /// the listener where to send the user.
    pub fn expire(&self, login_path: &str) {
        self.clear();
        info!(login_path, "session expired");
        self.listener.session_expired(login_path);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Arc::new(NoopListener))
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("inner", &*self.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        phases: Mutex<Vec<SessionPhase>>,
        expired: Mutex<Vec<String>>,
    }

    impl SessionListener for Recorder {
        fn session_expired(&self, login_path: &str) {
            self.expired.lock().unwrap().push(login_path.to_string());
        }

        fn phase_changed(&self, phase: SessionPhase) {
            self.phases.lock().unwrap().push(phase);
        }
    }

    fn user() -> User {
        User::new("u-1", "Ana", "ana@example.com", Role::User)
    }

    #[test]
    fn test_starts_anonymous_and_loading() {
        let state = SessionState::default();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Anonymous);
        assert!(snapshot.loading);
        assert!(snapshot.user.is_none());
    }

    #[test]
    fn test_login_then_refresh_then_logout() {
        let recorder = Arc::new(Recorder::default());
        let state = SessionState::new(recorder.clone());

        state.begin_login();
        state.authenticated(user());
        assert!(state.is_authenticated());
        assert!(!state.is_loading());

        state.begin_refresh();
        state.refreshed(None);
        assert_eq!(state.phase(), SessionPhase::Authenticated);

        state.clear();
        assert_eq!(state.phase(), SessionPhase::Anonymous);
        assert!(state.user().is_none());

        assert_eq!(
            *recorder.phases.lock().unwrap(),
            vec![
                SessionPhase::Authenticating,
                SessionPhase::Authenticated,
                SessionPhase::Refreshing,
                SessionPhase::Authenticated,
                SessionPhase::Anonymous,
            ]
        );
    }

    #[test]
    fn test_failed_login_restores_previous_phase() {
        let state = SessionState::default();
        let previous = state.begin_login();
        state.abort_login(previous);
        assert_eq!(state.phase(), SessionPhase::Anonymous);

        state.begin_login();
        state.authenticated(user());
        let previous = state.begin_login();
        state.abort_login(previous);
        assert_eq!(state.phase(), SessionPhase::Authenticated);
        assert!(state.is_authenticated());
    }

    #[test]
    fn test_refresh_during_login_keeps_login_phase() {
        let recorder = Arc::new(Recorder::default());
        let state = SessionState::new(recorder.clone());
        state.begin_login();

        state.begin_refresh();
        state.refreshed(None);
        assert_eq!(state.phase(), SessionPhase::Authenticating);

        state.authenticated(user());
        assert_eq!(state.phase(), SessionPhase::Authenticated);
        assert_eq!(
            *recorder.phases.lock().unwrap(),
            vec![SessionPhase::Authenticating, SessionPhase::Authenticated]
        );
    }

    #[test]
    fn test_refresh_restores_user_from_storage() {
        let state = SessionState::default();
        state.begin_refresh();
        state.refreshed(Some(user()));
        assert_eq!(state.phase(), SessionPhase::Authenticated);
        assert_eq!(state.user().unwrap().id, "u-1");
    }

    #[test]
    fn test_expire_notifies_listener() {
        let recorder = Arc::new(Recorder::default());
        let state = SessionState::new(recorder.clone());
        state.begin_refresh();
        state.expire("/login");
        assert_eq!(state.phase(), SessionPhase::Anonymous);
        assert_eq!(*recorder.expired.lock().unwrap(), vec!["/login".to_string()]);
    }
}
