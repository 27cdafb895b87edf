//! Consumption commands

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use helios_core::formatters;

use super::{print_json, signed_in_context};
use crate::output;

#[derive(Subcommand)]
pub enum ConsumptionCommands {
    /// Headline consumption numbers
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Readings over a date range
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
    /// Cost with and without solar for one month
    Compare {
        year: i32,
        month: u32,
    },
    /// Consumption per hour of one day
    Hourly {
        /// Day (YYYY-MM-DD)
        date: String,
    },
    /// Expected consumption for the coming months
    Forecast {
        #[arg(long)]
        months: Option<u32>,
    },
    /// Consumption alerts
    Alerts,
}

pub async fn run(command: ConsumptionCommands) -> Result<()> {
    let ctx = signed_in_context().await?;
    let service = &ctx.consumption_service;

    match command {
        ConsumptionCommands::Stats { json } => {
            let stats = service.stats().await?;
            if json {
                return print_json(&stats);
            }
            println!("{}", "Consumo".bold());
            println!(
                "{}",
                output::summary_table(&[
                    ("Total", output::kwh(stats.total_consumption)),
                    ("Média", output::kwh(stats.average_consumption)),
                    ("Pico", output::kwh(stats.peak_consumption)),
                    ("Mínimo", output::kwh(stats.lowest_consumption)),
                    ("Economia", output::currency(stats.total_savings)),
                ])
            );
        }
        ConsumptionCommands::History { start, end, json } => {
            let readings = service.history(start.as_deref(), end.as_deref()).await?;
            if json {
                return print_json(&readings);
            }
            if readings.is_empty() {
                output::info("No readings in this range");
                return Ok(());
            }
            let mut table = output::create_table();
            table.set_header(vec!["Data", "Consumo", "Ponta", "Fora Ponta", "Custo"]);
            for r in &readings {
                table.add_row(vec![
                    output::date(&r.date).into(),
                    output::right(output::kwh(r.consumption)),
                    output::right(output::kwh(r.peak)),
                    output::right(output::kwh(r.off_peak)),
                    output::right(output::currency(r.cost)),
                ]);
            }
            println!("{}", table);
        }
        ConsumptionCommands::Compare { year, month } => {
            let cmp = service.comparative(year, month).await?;
            let title = formatters::format_month_year(month, year)
                .unwrap_or_else(|| format!("{}/{}", month, year));
            println!("{}", title.bold());
            println!(
                "{}",
                output::summary_table(&[
                    ("Com solar", output::currency(cmp.with_solar)),
                    ("Sem solar", output::currency(cmp.without_solar)),
                    ("Economia", output::currency(cmp.savings)),
                    ("Economia %", output::percent(cmp.savings_percentage)),
                ])
            );
        }
        ConsumptionCommands::Hourly { date } => {
            let hours = service.hourly(&date).await?;
            let mut table = output::create_table();
            table.set_header(vec!["Hora", "Consumo"]);
            for h in &hours {
                table.add_row(vec![
                    format!("{:02}:00", h.hour).into(),
                    output::right(output::kwh(h.consumption)),
                ]);
            }
            println!("{}", table);
        }
        ConsumptionCommands::Forecast { months } => {
            let forecast = service.forecast(months).await?;
            let mut table = output::create_table();
            table.set_header(vec!["Mês", "Consumo estimado", "Custo estimado"]);
            for f in &forecast {
                table.add_row(vec![
                    format!("{}/{}", f.month, f.year).into(),
                    output::right(output::kwh(f.estimated_consumption)),
                    output::right(output::currency(f.estimated_cost)),
                ]);
            }
            println!("{}", table);
        }
        ConsumptionCommands::Alerts => {
            let alerts = service.alerts().await?;
            if alerts.is_empty() {
                output::success("No consumption alerts");
                return Ok(());
            }
            for alert in &alerts {
                println!(
                    "{} [{:?}] {}",
                    output::date(&alert.date),
                    alert.severity,
                    alert.message
                );
            }
        }
    }

    Ok(())
}
