//! Session event port

use crate::domain::SessionPhase;

/// Receives session lifecycle events
///
/// Both methods default to no-ops so implementors only override what they
/// care about.
pub trait SessionListener: Send + Sync {
    /// The session ended without the user asking (refresh impossible or
    /// rejected). `login_path` is where the user should be sent.
    fn session_expired(&self, _login_path: &str) {}

    /// The session moved to a new phase
    fn phase_changed(&self, _phase: SessionPhase) {}
}

/// Listener that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl SessionListener for NoopListener {}
