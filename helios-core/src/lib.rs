//! Helios Core - client library for the Helios solar energy dashboard
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: Wire models for users, consumption, production, billing and
//!   clients, the session types and the error type
//! - **ports**: Traits for what the host provides (session storage, identity
//!   provider, expiry listener)
//! - **adapters**: In-memory and file-backed session stores, download saving
//! - **http**: The authenticated request pipeline with token refresh
//! - **session**: Sign-in, sign-out and shared session state
//! - **services**: One typed facade per backend resource
//! - **validators** / **formatters**: Form checks and pt-BR display helpers

pub mod adapters;
pub mod config;
pub mod domain;
pub mod formatters;
pub mod http;
pub mod ports;
pub mod services;
pub mod session;
pub mod validators;

use std::path::Path;
use std::sync::Arc;

use adapters::FileStore;
use config::Config;
use http::ApiClient;
use ports::{NoopListener, SessionListener, SessionStore};
use services::*;
use session::{SessionManager, SessionState, SessionStorage};

// Re-export commonly used types at crate root
pub use domain::result::{ApiError, Envelope, Error, Result};
pub use domain::{Download, Role, SessionPhase, User};

/// Main context for Helios operations
///
/// Wires configuration, the session store, the HTTP client, the session
/// manager and every service around one shared session.
pub struct HeliosContext {
    pub config: Config,
    pub client: Arc<ApiClient>,
    pub session: SessionManager,
    pub consumption_service: ConsumptionService,
    pub production_service: ProductionService,
    pub billing_service: BillingService,
    pub clients_service: ClientsService,
    pub users_service: UsersService,
    pub export_service: ExportService,
}

impl HeliosContext {
    /// Create a context from `settings.json` and `session.json` in `helios_dir`
    pub fn new(helios_dir: &Path) -> anyhow::Result<Self> {
        Self::with_listener(helios_dir, Arc::new(NoopListener))
    }

    /// Like [`HeliosContext::new`], reporting session expiry to `listener`
    pub fn with_listener(
        helios_dir: &Path,
        listener: Arc<dyn SessionListener>,
    ) -> anyhow::Result<Self> {
        let config = Config::load(helios_dir)?;
        let store = Arc::new(FileStore::in_dir(helios_dir));
        Ok(Self::with_store(config, store, listener)?)
    }

    /// Build a context over any session store
    pub fn with_store(
        config: Config,
        store: Arc<dyn SessionStore>,
        listener: Arc<dyn SessionListener>,
    ) -> Result<Self> {
        let storage = SessionStorage::new(store);
        let state = Arc::new(SessionState::new(listener));
        let client = Arc::new(ApiClient::new(&config, storage, state)?);

        let session = SessionManager::new(Arc::clone(&client), config.oauth());
        let consumption_service = ConsumptionService::new(Arc::clone(&client));
        let production_service = ProductionService::new(Arc::clone(&client));
        let billing_service = BillingService::new(Arc::clone(&client));
        let clients_service = ClientsService::new(Arc::clone(&client));
        let users_service = UsersService::new(Arc::clone(&client));
        let export_service = ExportService::new(Arc::clone(&client));

        Ok(Self {
            config,
            client,
            session,
            consumption_service,
            production_service,
            billing_service,
            clients_service,
            users_service,
            export_service,
        })
    }
}
