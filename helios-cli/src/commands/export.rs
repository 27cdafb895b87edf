//! Export commands
//!
//! Server-rendered reports are downloaded as-is. `local` builds CSV, JSON
//! or a stats summary on this machine from the raw readings.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use helios_core::domain::{ExportFormat, Period};
use helios_core::services::export::{
    consumption_rows, generate_csv, generate_json, generate_stats_text, production_rows,
};
use helios_core::services::{
    BillingExport, ComparisonExport, CompleteReportExport, ConsumptionExport, CsvOptions,
    EnvironmentalExport, ImpactWindow, MaintenanceExport, OptimizationExport, PanelsExport,
    ProductionExport,
};
use helios_core::{Download, HeliosContext};

use super::{save, signed_in_context};

#[derive(Clone, Copy, ValueEnum)]
pub enum WindowArg {
    Monthly,
    Yearly,
    All,
}

impl From<WindowArg> for ImpactWindow {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::Monthly => ImpactWindow::Monthly,
            WindowArg::Yearly => ImpactWindow::Yearly,
            WindowArg::All => ImpactWindow::All,
        }
    }
}

/// What a local export is built from
#[derive(Clone, Copy, ValueEnum)]
pub enum Source {
    Production,
    Consumption,
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Production report
    Production {
        /// csv, xlsx or pdf
        #[arg(long, default_value = "pdf")]
        format: ExportFormat,
        #[arg(long, default_value = "monthly")]
        period: Period,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Include charts
        #[arg(long)]
        charts: bool,
        /// File name to use instead of the generated one
        #[arg(long)]
        name: Option<String>,
    },
    /// Consumption report
    Consumption {
        #[arg(long, default_value = "pdf")]
        format: ExportFormat,
        #[arg(long, default_value = "monthly")]
        period: Period,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        charts: bool,
    },
    /// Production and consumption together (pdf or xlsx, monthly or yearly)
    Report {
        #[arg(long, default_value = "pdf")]
        format: ExportFormat,
        #[arg(long, default_value = "monthly")]
        period: Period,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Billing history
    Billing {
        #[arg(long, default_value = "xlsx")]
        format: ExportFormat,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Panel status
    Panels {
        #[arg(long, default_value = "pdf")]
        format: ExportFormat,
        /// Include open alerts
        #[arg(long)]
        alerts: bool,
    },
    /// Maintenance history
    Maintenance {
        #[arg(long, default_value = "pdf")]
        format: ExportFormat,
        #[arg(long)]
        panel: Option<String>,
    },
    /// Environmental impact (pdf)
    Environmental {
        #[arg(long, value_enum, default_value = "yearly")]
        window: WindowArg,
    },
    /// Optimization analysis (pdf)
    Optimization,
    /// Compare two periods (YYYY-MM)
    Comparison {
        current: String,
        previous: String,
        #[arg(long, default_value = "pdf")]
        format: ExportFormat,
    },
    /// Build a file locally from readings (csv, json or txt)
    Local {
        #[arg(value_enum)]
        source: Source,
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        #[arg(long, default_value = "daily")]
        period: Period,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Field separator for CSV
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },
}

pub async fn run(command: ExportCommands, output: Option<PathBuf>) -> Result<()> {
    let ctx = signed_in_context().await?;
    let service = &ctx.export_service;

    let download = match command {
        ExportCommands::Production {
            format,
            period,
            start,
            end,
            charts,
            name,
        } => {
            let mut options = ProductionExport::new(format, period);
            options.start_date = start;
            options.end_date = end;
            options.include_charts = charts.then_some(true);
            options.filename = name;
            service.production(&options).await?
        }
        ExportCommands::Consumption {
            format,
            period,
            start,
            end,
            charts,
        } => {
            let mut options = ConsumptionExport::new(format, period);
            options.start_date = start;
            options.end_date = end;
            options.include_charts = charts.then_some(true);
            service.consumption(&options).await?
        }
        ExportCommands::Report {
            format,
            period,
            start,
            end,
        } => {
            let mut options = CompleteReportExport::new(format, period);
            options.start_date = start;
            options.end_date = end;
            service.complete_report(&options).await?
        }
        ExportCommands::Billing { format, start, end } => {
            let options = BillingExport {
                format,
                start_date: start,
                end_date: end,
                status: None,
            };
            service.billing(&options).await?
        }
        ExportCommands::Panels { format, alerts } => {
            let options = PanelsExport {
                format,
                include_alerts: alerts.then_some(true),
                include_maintenance_history: None,
            };
            service.panels_status(&options).await?
        }
        ExportCommands::Maintenance { format, panel } => {
            let options = MaintenanceExport {
                format,
                start_date: None,
                end_date: None,
                panel_id: panel,
            };
            service.maintenance_history(&options).await?
        }
        ExportCommands::Environmental { window } => {
            let options = EnvironmentalExport {
                window: window.into(),
                include_comparisons: None,
            };
            service.environmental_impact(&options).await?
        }
        ExportCommands::Optimization => {
            service
                .optimization_analysis(&OptimizationExport::default())
                .await?
        }
        ExportCommands::Comparison {
            current,
            previous,
            format,
        } => {
            let options = ComparisonExport {
                format,
                current_period: current,
                previous_period: previous,
                include_charts: None,
            };
            service.comparison(&options).await?
        }
        ExportCommands::Local {
            source,
            format,
            period,
            start,
            end,
            delimiter,
        } => {
            let delimiter = u8::try_from(delimiter)
                .map_err(|_| anyhow::anyhow!("Delimiter must be a single ASCII character"))?;
            local_export(&ctx, source, format, period, start, end, delimiter).await?
        }
    };

    save(&ctx, &download, output)
}

async fn local_export(
    ctx: &HeliosContext,
    source: Source,
    format: ExportFormat,
    period: Period,
    start: Option<String>,
    end: Option<String>,
    delimiter: u8,
) -> Result<Download> {
    let csv = CsvOptions {
        headers: None,
        delimiter,
    };

    let download = match (source, format) {
        (Source::Production, ExportFormat::Txt) => {
            let stats = ctx.production_service.stats().await?;
            generate_stats_text(&stats, "estatisticas_producao")?
        }
        (Source::Consumption, ExportFormat::Txt) => {
            let stats = ctx.consumption_service.stats().await?;
            generate_stats_text(&stats, "estatisticas_consumo")?
        }
        (Source::Production, ExportFormat::Csv | ExportFormat::Json) => {
            let data = ctx
                .production_service
                .data(period, start.as_deref(), end.as_deref())
                .await?;
            let rows = production_rows(&data);
            if format == ExportFormat::Csv {
                generate_csv(&rows, "producao", &csv)?
            } else {
                generate_json(&rows, "producao")?
            }
        }
        (Source::Consumption, ExportFormat::Csv | ExportFormat::Json) => {
            let data = ctx
                .consumption_service
                .history(start.as_deref(), end.as_deref())
                .await?;
            let rows = consumption_rows(&data);
            if format == ExportFormat::Csv {
                generate_csv(&rows, "consumo", &csv)?
            } else {
                generate_json(&rows, "consumo")?
            }
        }
        (_, other) => anyhow::bail!(
            "Local exports support csv, json and txt, not {}. Use the server export instead.",
            other
        ),
    };
    Ok(download)
}
