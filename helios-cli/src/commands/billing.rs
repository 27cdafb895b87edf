//! Billing commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use helios_core::domain::BillStatus;

use super::{print_json, save, signed_in_context};
use crate::output;

#[derive(Subcommand)]
pub enum BillingCommands {
    /// Bill for the current cycle
    Current,
    /// Past bills
    History {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Billing totals
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Next due date and estimated amount
    NextDue,
    /// Estimate savings for a monthly consumption in kWh
    Simulate {
        consumption: f64,
        /// Tariff in R$/kWh
        #[arg(long)]
        tariff: Option<f64>,
    },
    /// Download a bill as PDF
    Pdf {
        id: String,
        /// Directory to save into
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(command: BillingCommands) -> Result<()> {
    let ctx = signed_in_context().await?;
    let service = &ctx.billing_service;

    match command {
        BillingCommands::Current => {
            let bill = service.current().await?;
            println!("{} {}", "Fatura".bold(), bill.reference_month);
            println!(
                "{}",
                output::summary_table(&[
                    ("Consumo", output::kwh(bill.consumption)),
                    ("Produção", output::kwh(bill.production)),
                    ("Créditos", output::currency(bill.credits)),
                    ("Total", output::currency(bill.total_amount)),
                    ("Vencimento", output::date(&bill.due_date)),
                    ("Status", status(bill.status)),
                ])
            );
        }
        BillingCommands::History { start, end, json } => {
            let bills = service.history(start.as_deref(), end.as_deref()).await?;
            if json {
                return print_json(&bills);
            }
            let mut table = output::create_table();
            table.set_header(vec![
                "Mês", "Consumo", "Com solar", "Sem solar", "Economia", "Status",
            ]);
            for b in &bills {
                table.add_row(vec![
                    format!("{}/{}", b.month, b.year).into(),
                    output::right(output::kwh(b.consumption)),
                    output::right(output::currency(b.cost_with_solar)),
                    output::right(output::currency(b.cost_without_solar)),
                    output::right(output::currency(b.savings)),
                    status(b.status).into(),
                ]);
            }
            println!("{}", table);
        }
        BillingCommands::Stats { json } => {
            let stats = service.stats().await?;
            if json {
                return print_json(&stats);
            }
            println!(
                "{}",
                output::summary_table(&[
                    ("Economia total", output::currency(stats.total_savings)),
                    ("Economia no ano", output::currency(stats.year_to_date_savings)),
                    ("Custo médio mensal", output::currency(stats.average_monthly_cost)),
                    ("Total pago", output::currency(stats.total_paid)),
                    ("Pendente", output::currency(stats.pending_amount)),
                    ("Economia %", output::percent(stats.savings_percentage)),
                ])
            );
        }
        BillingCommands::NextDue => {
            let due = service.next_due().await?;
            if due.is_paid {
                output::success("Current bill already paid");
            }
            println!(
                "{}",
                output::summary_table(&[
                    ("Vencimento", output::date(&due.due_date)),
                    ("Dias restantes", due.days_remaining.to_string()),
                    ("Valor estimado", output::currency(due.estimated_amount)),
                    ("Consumo estimado", output::kwh(due.estimated_consumption)),
                ])
            );
        }
        BillingCommands::Simulate {
            consumption,
            tariff,
        } => {
            let estimate = service.calculate_savings(consumption, tariff).await?;
            println!(
                "{}",
                output::summary_table(&[
                    ("Com solar", output::currency(estimate.with_solar)),
                    ("Sem solar", output::currency(estimate.without_solar)),
                    ("Economia", output::currency(estimate.savings)),
                    ("Economia %", output::percent(estimate.savings_percentage)),
                    ("Retorno", format!("{:.0} meses", estimate.payback_months)),
                ])
            );
        }
        BillingCommands::Pdf { id, output } => {
            let download = service.export_pdf(&id).await?;
            save(&ctx, &download, output)?;
        }
    }

    Ok(())
}

fn status(status: BillStatus) -> String {
    let label = status.label();
    match status {
        BillStatus::Paid => label.green().to_string(),
        BillStatus::Pending => label.yellow().to_string(),
        BillStatus::Overdue => label.red().to_string(),
        BillStatus::Canceled => label.dimmed().to_string(),
    }
}
