//! Service layer - one facade per backend resource
//!
//! Services know paths and query shapes and hand back typed results. They do
//! no retries or caching of their own; refresh-and-replay lives in the HTTP
//! client.

pub mod auth;
mod billing;
mod clients;
mod consumption;
pub mod export;
mod production;
mod users;

pub use auth::AuthService;
pub use billing::BillingService;
pub use clients::ClientsService;
pub use consumption::ConsumptionService;
pub use export::{
    BillingExport, ComparisonExport, CompleteReportExport, ConsumptionExport, CsvOptions,
    EnvironmentalExport, ExportService, ImpactWindow, MaintenanceExport, OptimizationExport,
    PanelsExport, ProductionExport, Record,
};
pub use production::{BestDayWindow, ProductionService};
pub use users::UsersService;
