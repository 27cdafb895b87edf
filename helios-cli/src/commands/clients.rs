//! Client administration commands

use std::path::PathBuf;

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use helios_core::domain::metrics::ClientSummary;
use helios_core::domain::{
    ClientConsumption, ClientExportFilters, ClientFilters, ClientSortBy, ClientStatus,
    RankingMetric, SortOrder,
};

use super::{admin_context, print_json, save};
use crate::output;

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Active,
    Inactive,
}

impl From<StatusArg> for ClientStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Active => ClientStatus::Active,
            StatusArg::Inactive => ClientStatus::Inactive,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Name,
    Consumption,
    Savings,
    JoinDate,
}

impl From<SortArg> for ClientSortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => ClientSortBy::Name,
            SortArg::Consumption => ClientSortBy::Consumption,
            SortArg::Savings => ClientSortBy::Savings,
            SortArg::JoinDate => ClientSortBy::JoinDate,
        }
    }
}

#[derive(Subcommand)]
pub enum ClientsCommands {
    /// List clients
    List {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long)]
        plan: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search by name or email
    Search {
        text: String,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Totals across all clients
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Top clients by consumption or savings
    Ranking {
        /// Rank by savings instead of consumption
        #[arg(long)]
        savings: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Download the client list
    Export {
        /// Excel instead of CSV
        #[arg(long)]
        excel: bool,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long)]
        plan: Option<String>,
        /// Directory to save into
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(command: ClientsCommands) -> Result<()> {
    let ctx = admin_context().await?;
    let service = &ctx.clients_service;

    match command {
        ClientsCommands::List {
            status,
            plan,
            sort,
            desc,
            page,
            limit,
            json,
        } => {
            let filters = ClientFilters {
                status: status.map(Into::into),
                plan,
                sort_by: sort.map(Into::into),
                order: sort.map(|_| if desc { SortOrder::Desc } else { SortOrder::Asc }),
                page,
                limit,
            };
            let result = service.list(&filters).await?;
            if json {
                return print_json(&result);
            }
            print_clients(&result.clients);
            println!(
                "Page {} of {} ({} clients)",
                result.page, result.total_pages, result.total
            );
        }
        ClientsCommands::Search { text, status } => {
            let clients = service.search(&text, status.map(Into::into), None).await?;
            if clients.is_empty() {
                output::info("No clients found");
                return Ok(());
            }
            print_clients(&clients);
        }
        ClientsCommands::Stats { json } => {
            let stats = service.stats().await?;
            if json {
                return print_json(&stats);
            }
            println!(
                "{}",
                output::summary_table(&[
                    ("Clientes", stats.total_clients.to_string()),
                    ("Ativos", stats.active_clients.to_string()),
                    ("Novos no mês", stats.new_clients_this_month.to_string()),
                    ("Consumo total", output::kwh(stats.total_consumption)),
                    ("Economia total", output::currency(stats.total_savings)),
                    ("Churn", output::percent(stats.churn_rate)),
                ])
            );
        }
        ClientsCommands::Ranking { savings, limit } => {
            let metric = if savings {
                RankingMetric::Savings
            } else {
                RankingMetric::Consumption
            };
            let entries = service.ranking(metric, limit).await?;
            let mut table = output::create_table();
            table.set_header(vec!["#", "Cliente", "Email", "Valor", "%"]);
            for e in &entries {
                let value = match metric {
                    RankingMetric::Consumption => output::kwh(e.value),
                    RankingMetric::Savings => output::currency(e.value),
                };
                table.add_row(vec![
                    e.rank.to_string().into(),
                    e.user_name.clone().into(),
                    e.email.clone().into(),
                    output::right(value),
                    output::right(output::percent(e.percentage)),
                ]);
            }
            println!("{}", table);
        }
        ClientsCommands::Export {
            excel,
            status,
            plan,
            output,
        } => {
            let filters = ClientExportFilters {
                status: status.map(Into::into),
                plan,
                ..Default::default()
            };
            let download = if excel {
                service.export_excel(&filters).await?
            } else {
                service.export_csv(&filters).await?
            };
            save(&ctx, &download, output)?;
        }
    }

    Ok(())
}

fn print_clients(clients: &[ClientConsumption]) {
    let mut table = output::create_table();
    table.set_header(vec!["Cliente", "Email", "Plano", "Status", "Consumo", "Economia"]);
    for c in clients {
        let status = match c.status {
            ClientStatus::Active => c.status.label().green().to_string(),
            ClientStatus::Inactive => c.status.label().dimmed().to_string(),
        };
        table.add_row(vec![
            c.user_name.clone().into(),
            c.email.clone().into(),
            c.plan.clone().unwrap_or_default().into(),
            status.into(),
            output::right(output::kwh(c.total_consumption)),
            output::right(output::currency(c.savings)),
        ]);
    }
    println!("{}", table);

    let summary = ClientSummary::from_clients(clients);
    let active = summary
        .active_share()
        .map(output::percent)
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{} ativos ({}), {} no total, economia {}",
        summary.active_clients,
        active,
        output::kwh(summary.total_consumption),
        output::currency(summary.total_savings)
    );
}
