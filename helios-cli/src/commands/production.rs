//! Production commands

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use helios_core::domain::{AlertStatus, PanelState, Period};

use super::{print_json, signed_in_context};
use crate::output;

#[derive(Subcommand)]
pub enum ProductionCommands {
    /// Headline production numbers
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Production readings
    Data {
        /// daily, monthly or yearly
        #[arg(long, default_value = "daily")]
        period: Period,
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
    /// Panel status
    Panels,
    /// Current power output
    Realtime,
    /// Environmental impact of the installation
    Impact,
    /// Active panel alerts
    Alerts,
    /// Return on investment for an installation cost in R$
    Roi {
        cost: f64,
    },
}

pub async fn run(command: ProductionCommands) -> Result<()> {
    let ctx = signed_in_context().await?;
    let service = &ctx.production_service;

    match command {
        ProductionCommands::Stats { json } => {
            let stats = service.stats().await?;
            if json {
                return print_json(&stats);
            }
            println!("{}", "Produção".bold());
            println!(
                "{}",
                output::summary_table(&[
                    ("Total", output::kwh(stats.total_production)),
                    ("Média diária", output::kwh(stats.average_daily_production)),
                    ("Potência atual", format!("{} W", stats.current_power)),
                    ("Eficiência", output::percent(stats.system_efficiency)),
                    (
                        "Painéis ativos",
                        format!("{}/{}", stats.active_panels, stats.total_panels)
                    ),
                    ("Economia mensal", output::currency(stats.monthly_economy)),
                    ("CO2 evitado", format!("{} t", stats.co2_saved)),
                ])
            );
        }
        ProductionCommands::Data {
            period,
            start,
            end,
            json,
        } => {
            let readings = service
                .data(period, start.as_deref(), end.as_deref())
                .await?;
            if json {
                return print_json(&readings);
            }
            let mut table = output::create_table();
            table.set_header(vec!["Data", "Produção", "Capacidade", "Eficiência", "Horas de sol"]);
            for r in &readings {
                table.add_row(vec![
                    output::date(&r.date).into(),
                    output::right(output::kwh(r.production)),
                    output::right(output::kwh(r.capacity)),
                    output::right(output::percent(r.efficiency)),
                    output::right(format!("{:.1}", r.sun_hours)),
                ]);
            }
            println!("{}", table);
        }
        ProductionCommands::Panels => {
            let panels = service.panels().await?;
            let mut table = output::create_table();
            table.set_header(vec!["Painel", "Status", "Potência", "Eficiência", "Atualizado"]);
            for p in &panels {
                table.add_row(vec![
                    p.name.clone().into(),
                    panel_state(p.status).into(),
                    output::right(format!("{} W", p.current_power)),
                    output::right(output::percent(p.efficiency)),
                    output::date(&p.last_update).into(),
                ]);
            }
            println!("{}", table);
        }
        ProductionCommands::Realtime => {
            let now = service.realtime().await?;
            println!(
                "{}",
                output::summary_table(&[
                    ("Potência", format!("{} W", now.current_power)),
                    ("Eficiência", output::percent(now.efficiency)),
                    ("Medido em", output::date(&now.timestamp)),
                ])
            );
        }
        ProductionCommands::Impact => {
            let impact = service.environmental_impact().await?;
            println!(
                "{}",
                output::summary_table(&[
                    ("CO2 evitado", format!("{} t", impact.co2_avoided)),
                    ("Árvores equivalentes", impact.trees_equivalent.to_string()),
                    ("Carros fora da rua", impact.cars_off_road.to_string()),
                    ("Casas abastecidas", impact.homes_equivalent.to_string()),
                ])
            );
        }
        ProductionCommands::Alerts => {
            let alerts = service.alerts(Some(AlertStatus::Active)).await?;
            if alerts.is_empty() {
                output::success("No active panel alerts");
                return Ok(());
            }
            for alert in &alerts {
                println!(
                    "{} {} [{:?}] {}",
                    output::date(&alert.detected_at),
                    alert.panel_id,
                    alert.severity,
                    alert.message
                );
            }
        }
        ProductionCommands::Roi { cost } => {
            let roi = service.calculate_roi(cost).await?;
            println!(
                "{}",
                output::summary_table(&[
                    ("ROI", output::percent(roi.roi)),
                    ("Retorno", format!("{:.0} meses", roi.payback_period)),
                    ("Economia total", output::currency(roi.total_savings)),
                    ("Média mensal", output::currency(roi.monthly_average)),
                ])
            );
        }
    }

    Ok(())
}

fn panel_state(state: PanelState) -> String {
    match state {
        PanelState::Active => "ativo".green().to_string(),
        PanelState::Warning => "alerta".yellow().to_string(),
        PanelState::Inactive => "inativo".red().to_string(),
        PanelState::Maintenance => "manutenção".cyan().to_string(),
    }
}
