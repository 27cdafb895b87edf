//! Helios CLI - solar energy dashboard in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{auth, billing, clients, config, consumption, export, production, validate};

/// Environment variable holding the tracing filter directive
const LOG_ENV: &str = "HELIOS_LOG";

/// Helios - solar energy dashboard in your terminal
#[derive(Parser)]
#[command(name = "helios", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        /// Account email
        email: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign in with a Google ID token
    LoginGoogle {
        /// Credential issued by Google Identity Services
        credential: String,
    },

    /// Create an account and sign in
    Register {
        /// Display name
        name: String,
        /// Account email
        email: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Energy consumption
    Consumption {
        #[command(subcommand)]
        command: consumption::ConsumptionCommands,
    },

    /// Solar production and panels
    Production {
        #[command(subcommand)]
        command: production::ProductionCommands,
    },

    /// Energy bills
    Billing {
        #[command(subcommand)]
        command: billing::BillingCommands,
    },

    /// Client administration (admin only)
    Clients {
        #[command(subcommand)]
        command: clients::ClientsCommands,
    },

    /// Download reports
    Export {
        #[command(subcommand)]
        command: export::ExportCommands,
        /// Directory to save into (defaults to the configured export directory)
        #[arg(short, long, global = true)]
        output: Option<PathBuf>,
    },

    /// Check a value against a form validator
    Validate {
        /// Validator to run
        #[arg(value_enum)]
        kind: validate::Kind,
        /// Value to check
        value: String,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `HELIOS_LOG` (warnings only by default)
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { email, password } => auth::login(&email, password).await,
        Commands::LoginGoogle { credential } => auth::login_google(&credential).await,
        Commands::Register { name, email } => auth::register(&name, &email).await,
        Commands::Logout => auth::logout().await,
        Commands::Whoami { json } => auth::whoami(json).await,
        Commands::Consumption { command } => consumption::run(command).await,
        Commands::Production { command } => production::run(command).await,
        Commands::Billing { command } => billing::run(command).await,
        Commands::Clients { command } => clients::run(command).await,
        Commands::Export { command, output } => export::run(command, output).await,
        Commands::Validate { kind, value } => validate::run(kind, &value),
        Commands::Config { command } => config::run(command),
    }
}
