//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The session
//! manager and HTTP client depend only on these traits, not on concrete
//! implementations.

mod identity;
mod listener;
mod session_store;

pub use identity::{IdentityProvider, OAuthConfig, DEFAULT_SCOPES};
pub use listener::{NoopListener, SessionListener};
pub use session_store::SessionStore;
