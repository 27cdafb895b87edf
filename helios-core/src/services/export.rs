//! Export service - server-rendered reports and client-side file generation
//!
//! Server exports stream a file from the backend and name it
//! `<prefix>[_<period>]_<YYYY-MM-DD>.<ext>`. The `generate_*` helpers build
//! the same kind of [`Download`] locally from data already fetched.

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::result::{Error, Result};
use crate::domain::{
    BillStatus, ConsumptionData, Download, ExportFormat, Period, ProductionData,
};
use crate::formatters::{format_date, format_naive_date_time, format_number};
use crate::http::{ApiClient, ApiRequest, QueryParams};

/// One exported row, keyed by column header in insertion order
pub type Record = Map<String, Value>;

const NO_DATA_MESSAGE: &str = "Nenhum dado para exportar";

/// `<prefix>[_<period>]_<today UTC>.<ext>`
pub(crate) fn dated_filename(prefix: &str, period: Option<&str>, format: ExportFormat) -> String {
    dated_filename_on(prefix, period, format, Utc::now().date_naive())
}

fn dated_filename_on(
    prefix: &str,
    period: Option<&str>,
    format: ExportFormat,
    date: NaiveDate,
) -> String {
    match period {
        Some(period) => format!(
            "{}_{}_{}.{}",
            prefix,
            period,
            date.format("%Y-%m-%d"),
            format.extension()
        ),
        None => format!("{}_{}.{}", prefix, date.format("%Y-%m-%d"), format.extension()),
    }
}

/// Server exports render csv, xlsx or pdf only
fn require_server_format(format: ExportFormat, allowed: &[ExportFormat]) -> Result<()> {
    if allowed.contains(&format) {
        Ok(())
    } else {
        Err(Error::invalid_field(
            "format",
            format!("Formato não suportado: {}", format),
        ))
    }
}

const TABULAR: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Pdf];

/// Options for a production export
#[derive(Debug, Clone)]
pub struct ProductionExport {
    pub format: ExportFormat,
    pub period: Period,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub include_charts: Option<bool>,
    pub include_panels_status: Option<bool>,
    pub include_environmental_impact: Option<bool>,
    /// Overrides the generated file name
    pub filename: Option<String>,
}

impl ProductionExport {
    pub fn new(format: ExportFormat, period: Period) -> Self {
        Self {
            format,
            period,
            start_date: None,
            end_date: None,
            include_charts: None,
            include_panels_status: None,
            include_environmental_impact: None,
            filename: None,
        }
    }

    pub fn query(&self) -> Result<QueryParams> {
        require_server_format(self.format, &TABULAR)?;
        Ok(QueryParams::new()
            .with("format", self.format)
            .with("period", self.period)
            .with_opt("startDate", self.start_date.as_deref())
            .with_opt("endDate", self.end_date.as_deref())
            .with_opt("includeCharts", self.include_charts)
            .with_opt("includePanelsStatus", self.include_panels_status)
            .with_opt("includeEnvironmentalImpact", self.include_environmental_impact))
    }

    pub(crate) fn filename_or(&self, prefix: &str) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| dated_filename(prefix, Some(self.period.as_str()), self.format))
    }
}

/// Options for a consumption export
#[derive(Debug, Clone)]
pub struct ConsumptionExport {
    pub format: ExportFormat,
    pub period: Period,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub include_charts: Option<bool>,
    pub include_insights: Option<bool>,
    pub filename: Option<String>,
}

impl ConsumptionExport {
    pub fn new(format: ExportFormat, period: Period) -> Self {
        Self {
            format,
            period,
            start_date: None,
            end_date: None,
            include_charts: None,
            include_insights: None,
            filename: None,
        }
    }

    pub fn query(&self) -> Result<QueryParams> {
        require_server_format(self.format, &TABULAR)?;
        Ok(QueryParams::new()
            .with("format", self.format)
            .with("period", self.period)
            .with_opt("startDate", self.start_date.as_deref())
            .with_opt("endDate", self.end_date.as_deref())
            .with_opt("includeCharts", self.include_charts)
            .with_opt("includeInsights", self.include_insights))
    }
}

/// Production and consumption together, monthly or yearly
#[derive(Debug, Clone)]
pub struct CompleteReportExport {
    pub format: ExportFormat,
    pub period: Period,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub include_charts: Option<bool>,
    pub include_insights: Option<bool>,
}

impl CompleteReportExport {
    pub fn new(format: ExportFormat, period: Period) -> Self {
        Self {
            format,
            period,
            start_date: None,
            end_date: None,
            include_charts: None,
            include_insights: None,
        }
    }

    pub fn query(&self) -> Result<QueryParams> {
        require_server_format(self.format, &[ExportFormat::Pdf, ExportFormat::Xlsx])?;
        if self.period == Period::Daily {
            return Err(Error::invalid_field(
                "period",
                "Relatório completo aceita apenas período mensal ou anual",
            ));
        }
        Ok(QueryParams::new()
            .with("format", self.format)
            .with("period", self.period)
            .with_opt("startDate", self.start_date.as_deref())
            .with_opt("endDate", self.end_date.as_deref())
            .with_opt("includeCharts", self.include_charts)
            .with_opt("includeInsights", self.include_insights))
    }
}

#[derive(Debug, Clone)]
pub struct BillingExport {
    pub format: ExportFormat,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<BillStatus>,
}

impl BillingExport {
    pub fn query(&self) -> Result<QueryParams> {
        require_server_format(self.format, &TABULAR)?;
        Ok(QueryParams::new()
            .with("format", self.format)
            .with_opt("startDate", self.start_date.as_deref())
            .with_opt("endDate", self.end_date.as_deref())
            .with_opt("status", self.status.map(|s| s.as_str())))
    }
}

#[derive(Debug, Clone)]
pub struct PanelsExport {
    pub format: ExportFormat,
    pub include_alerts: Option<bool>,
    pub include_maintenance_history: Option<bool>,
}

impl PanelsExport {
    pub fn query(&self) -> Result<QueryParams> {
        require_server_format(self.format, &TABULAR)?;
        Ok(QueryParams::new()
            .with("format", self.format)
            .with_opt("includeAlerts", self.include_alerts)
            .with_opt("includeMaintenanceHistory", self.include_maintenance_history))
    }
}

#[derive(Debug, Clone)]
pub struct MaintenanceExport {
    pub format: ExportFormat,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub panel_id: Option<String>,
}

impl MaintenanceExport {
    pub fn query(&self) -> Result<QueryParams> {
        require_server_format(self.format, &TABULAR)?;
        Ok(QueryParams::new()
            .with("format", self.format)
            .with_opt("startDate", self.start_date.as_deref())
            .with_opt("endDate", self.end_date.as_deref())
            .with_opt("panelId", self.panel_id.as_deref()))
    }
}

/// Window covered by the environmental impact report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactWindow {
    Monthly,
    Yearly,
    All,
}

impl ImpactWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactWindow::Monthly => "monthly",
            ImpactWindow::Yearly => "yearly",
            ImpactWindow::All => "all",
        }
    }
}

/// Always rendered as PDF
#[derive(Debug, Clone)]
pub struct EnvironmentalExport {
    pub window: ImpactWindow,
    pub include_comparisons: Option<bool>,
}

impl EnvironmentalExport {
    pub fn query(&self) -> QueryParams {
        QueryParams::new()
            .with("format", ExportFormat::Pdf)
            .with("period", self.window.as_str())
            .with_opt("includeComparisons", self.include_comparisons)
    }
}

/// Always rendered as PDF
#[derive(Debug, Clone, Default)]
pub struct OptimizationExport {
    pub include_recommendations: Option<bool>,
}

impl OptimizationExport {
    pub fn query(&self) -> QueryParams {
        QueryParams::new()
            .with("format", ExportFormat::Pdf)
            .with_opt("includeRecommendations", self.include_recommendations)
    }
}

#[derive(Debug, Clone)]
pub struct ComparisonExport {
    pub format: ExportFormat,
    pub current_period: String,
    pub previous_period: String,
    pub include_charts: Option<bool>,
}

impl ComparisonExport {
    pub fn query(&self) -> Result<QueryParams> {
        require_server_format(self.format, &TABULAR)?;
        Ok(QueryParams::new()
            .with("format", self.format)
            .with("currentPeriod", &self.current_period)
            .with("previousPeriod", &self.previous_period)
            .with_opt("includeCharts", self.include_charts))
    }
}

pub struct ExportService {
    client: Arc<ApiClient>,
}

impl ExportService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    async fn fetch(&self, path: &str, query: QueryParams, filename: String) -> Result<Download> {
        tracing::debug!(path, filename = %filename, "Requesting export");
        self.client
            .download(ApiRequest::get(path).query(query), filename)
            .await
    }

    pub async fn production(&self, options: &ProductionExport) -> Result<Download> {
        let query = options.query()?;
        self.fetch(
            "/production/export",
            query,
            options.filename_or("producao_solar"),
        )
        .await
    }

    pub async fn consumption(&self, options: &ConsumptionExport) -> Result<Download> {
        let query = options.query()?;
        let filename = options.filename.clone().unwrap_or_else(|| {
            dated_filename("consumo_energia", Some(options.period.as_str()), options.format)
        });
        self.fetch("/consumption/export", query, filename).await
    }

    pub async fn complete_report(&self, options: &CompleteReportExport) -> Result<Download> {
        let query = options.query()?;
        let filename = dated_filename(
            "relatorio_completo",
            Some(options.period.as_str()),
            options.format,
        );
        self.fetch("/reports/complete", query, filename).await
    }

    pub async fn billing(&self, options: &BillingExport) -> Result<Download> {
        let query = options.query()?;
        let filename = dated_filename("faturas", None, options.format);
        self.fetch("/billing/export", query, filename).await
    }

    pub async fn panels_status(&self, options: &PanelsExport) -> Result<Download> {
        let query = options.query()?;
        let filename = dated_filename("paineis_status", None, options.format);
        self.fetch("/production/panels/export", query, filename).await
    }

    pub async fn maintenance_history(&self, options: &MaintenanceExport) -> Result<Download> {
        let query = options.query()?;
        let filename = dated_filename("manutencao", None, options.format);
        self.fetch("/production/maintenance/export", query, filename)
            .await
    }

    pub async fn environmental_impact(&self, options: &EnvironmentalExport) -> Result<Download> {
        let filename = dated_filename(
            "impacto_ambiental",
            Some(options.window.as_str()),
            ExportFormat::Pdf,
        );
        self.fetch(
            "/production/environmental-impact/export",
            options.query(),
            filename,
        )
        .await
    }

    pub async fn optimization_analysis(&self, options: &OptimizationExport) -> Result<Download> {
        let filename = dated_filename("analise_otimizacao", None, ExportFormat::Pdf);
        self.fetch("/production/optimization/export", options.query(), filename)
            .await
    }

    pub async fn comparison(&self, options: &ComparisonExport) -> Result<Download> {
        let query = options.query()?;
        let filename = dated_filename("comparativo", None, options.format);
        self.fetch("/analytics/comparison/export", query, filename)
            .await
    }
}

/// Options for [`generate_csv`]
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Column order; defaults to the keys of the first row
    pub headers: Option<Vec<String>>,
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            headers: None,
            delimiter: b',',
        }
    }
}

fn with_extension(filename: &str, format: ExportFormat) -> String {
    let suffix = format!(".{}", format.extension());
    if filename.ends_with(&suffix) {
        filename.to_string()
    } else {
        format!("{}{}", filename, suffix)
    }
}

/// Number rendered the way a browser prints it (`12`, `12.5`)
fn number_text(number: &serde_json::Number) -> String {
    if let Some(i) = number.as_i64() {
        i.to_string()
    } else if let Some(u) = number.as_u64() {
        u.to_string()
    } else {
        number.as_f64().map(|f| f.to_string()).unwrap_or_default()
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_text(n),
        Some(other) => other.to_string(),
    }
}

fn to_records<T: Serialize>(rows: &[T]) -> Result<Vec<Record>> {
    rows.iter()
        .map(|row| match serde_json::to_value(row)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::validation(format!(
                "Linha de exportação não é um objeto: {}",
                other
            ))),
        })
        .collect()
}

/// Build a CSV file from rows of objects.
///
/// Fields containing the delimiter, quotes or line breaks are quoted.
pub fn generate_csv<T: Serialize>(
    rows: &[T],
    filename: &str,
    options: &CsvOptions,
) -> Result<Download> {
    let records = to_records(rows)?;
    let first = records
        .first()
        .ok_or_else(|| Error::validation(NO_DATA_MESSAGE))?;
    let headers = options
        .headers
        .clone()
        .unwrap_or_else(|| first.keys().cloned().collect());

    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let csv_error = |e: csv::Error| Error::Other(format!("CSV: {}", e));

    writer.write_record(&headers).map_err(csv_error)?;
    for record in &records {
        writer
            .write_record(headers.iter().map(|h| cell_text(record.get(h))))
            .map_err(csv_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Other(format!("CSV: {}", e)))?;

    Ok(Download {
        filename: with_extension(filename, ExportFormat::Csv),
        content_type: Some(ExportFormat::Csv.content_type().to_string()),
        bytes,
    })
}

/// Pretty-printed JSON file (two-space indent)
pub fn generate_json<T: Serialize + ?Sized>(data: &T, filename: &str) -> Result<Download> {
    let bytes = serde_json::to_vec_pretty(data)?;
    Ok(Download {
        filename: with_extension(filename, ExportFormat::Json),
        content_type: Some(ExportFormat::Json.content_type().to_string()),
        bytes,
    })
}

fn display_date(date: &str) -> String {
    format_date(date).unwrap_or_else(|_| date.to_string())
}

fn record(cells: Vec<(&str, Value)>) -> Record {
    cells
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Production readings as spreadsheet rows with Portuguese headers
pub fn production_rows(data: &[ProductionData]) -> Vec<Record> {
    data.iter()
        .map(|item| {
            record(vec![
                ("Data", display_date(&item.date).into()),
                ("Produção (kWh)", format_number(item.production, 2).into()),
                ("Capacidade (kWh)", format_number(item.capacity, 2).into()),
                ("Eficiência (%)", format_number(item.efficiency, 2).into()),
                ("Pico de Potência (W)", item.peak_power.into()),
                ("Potência Média (W)", item.average_power.into()),
                ("Horas de Sol", format_number(item.sun_hours, 2).into()),
                (
                    "Clima",
                    item.weather
                        .map(|w| Value::from(w.as_str()))
                        .unwrap_or(Value::Null),
                ),
            ])
        })
        .collect()
}

/// Consumption readings as spreadsheet rows with Portuguese headers
pub fn consumption_rows(data: &[ConsumptionData]) -> Vec<Record> {
    data.iter()
        .map(|item| {
            record(vec![
                ("Data", display_date(&item.date).into()),
                ("Consumo Total (kWh)", format_number(item.consumption, 2).into()),
                ("Horário de Ponta (kWh)", format_number(item.peak, 2).into()),
                ("Fora de Ponta (kWh)", format_number(item.off_peak, 2).into()),
                ("Custo (R$)", format_number(item.cost, 2).into()),
            ])
        })
        .collect()
}

/// `totalProduction` → `Total Production`
fn prettify_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        if i == 0 {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn stat_value(key: &str, value: &Value) -> String {
    let Value::Number(number) = value else {
        return match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    };
    let key = key.to_ascii_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| key.contains(w));
    let n = number.as_f64().unwrap_or_default();
    if has(&["percentage", "efficiency"]) {
        format!("{}%", format_number(n, 2))
    } else if has(&["cost", "economy", "savings"]) {
        format!("R$ {}", format_number(n, 2))
    } else if has(&["consumption", "production"]) {
        format!("{} kWh", format_number(n, 2))
    } else if has(&["power"]) {
        format!("{} W", number_text(number))
    } else {
        number_text(number)
    }
}

/// Readable text dump of production or consumption statistics.
///
/// Statistics carrying `totalProduction` get the production heading.
pub fn stats_text<T: Serialize>(stats: &T, generated_at: NaiveDateTime) -> Result<String> {
    let Value::Object(fields) = serde_json::to_value(stats)? else {
        return Err(Error::validation("Estatísticas devem ser um objeto"));
    };
    let mut text = if fields.contains_key("totalProduction") {
        String::from("=== ESTATÍSTICAS DE PRODUÇÃO ===\n\n")
    } else {
        String::from("=== ESTATÍSTICAS DE CONSUMO ===\n\n")
    };
    for (key, value) in &fields {
        text.push_str(&format!("{}: {}\n", prettify_key(key), stat_value(key, value)));
    }
    text.push_str(&format!(
        "\n\nGerado em: {}",
        format_naive_date_time(&generated_at)
    ));
    Ok(text)
}

/// [`stats_text`] stamped with the local time, as a `.txt` file
pub fn generate_stats_text<T: Serialize>(stats: &T, filename: &str) -> Result<Download> {
    let text = stats_text(stats, Local::now().naive_local())?;
    Ok(Download {
        filename: with_extension(filename, ExportFormat::Txt),
        content_type: Some(ExportFormat::Txt.content_type().to_string()),
        bytes: text.into_bytes(),
    })
}

/// Extension for a format name; unknown names are returned as given
pub fn file_extension(format: &str) -> String {
    format
        .parse::<ExportFormat>()
        .map(|f| f.extension().to_string())
        .unwrap_or_else(|_| format.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConsumptionSummary, ProductionStats, WeatherCondition};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_dated_filename() {
        assert_eq!(
            dated_filename_on("producao_solar", Some("monthly"), ExportFormat::Pdf, day()),
            "producao_solar_monthly_2024-03-05.pdf"
        );
        assert_eq!(
            dated_filename_on("faturas", None, ExportFormat::Xlsx, day()),
            "faturas_2024-03-05.xlsx"
        );
    }

    #[test]
    fn test_export_queries() {
        let mut options = ProductionExport::new(ExportFormat::Csv, Period::Monthly);
        options.start_date = Some("2024-01-01".to_string());
        options.include_charts = Some(false);
        assert_eq!(
            options.query().unwrap().to_query_string(),
            "?format=csv&period=monthly&startDate=2024-01-01&includeCharts=false"
        );

        let json = ProductionExport::new(ExportFormat::Json, Period::Daily);
        assert!(json.query().is_err());

        let report = CompleteReportExport::new(ExportFormat::Csv, Period::Monthly);
        assert!(report.query().is_err());
        let report = CompleteReportExport::new(ExportFormat::Pdf, Period::Daily);
        assert!(report.query().is_err());

        let impact = EnvironmentalExport {
            window: ImpactWindow::All,
            include_comparisons: Some(true),
        };
        assert_eq!(
            impact.query().to_query_string(),
            "?format=pdf&period=all&includeComparisons=true"
        );

        let billing = BillingExport {
            format: ExportFormat::Xlsx,
            start_date: None,
            end_date: None,
            status: Some(BillStatus::Overdue),
        };
        assert_eq!(
            billing.query().unwrap().to_query_string(),
            "?format=xlsx&status=overdue"
        );
    }

    #[test]
    fn test_generate_csv_quotes_and_orders_columns() {
        let rows = vec![
            serde_json::json!({"name": "Ana, Souza", "kwh": 12.5, "note": null}),
            serde_json::json!({"name": "Bia \"B\"", "kwh": 3}),
        ];
        let download = generate_csv(&rows, "clientes", &CsvOptions::default()).unwrap();
        assert_eq!(download.filename, "clientes.csv");
        let text = String::from_utf8(download.bytes).unwrap();
        assert_eq!(
            text,
            "name,kwh,note\n\"Ana, Souza\",12.5,\n\"Bia \"\"B\"\"\",3,\n"
        );
    }

    #[test]
    fn test_generate_csv_with_headers_and_delimiter() {
        let rows = vec![serde_json::json!({"a": 1, "b": "x;y"})];
        let options = CsvOptions {
            headers: Some(vec!["b".to_string(), "a".to_string()]),
            delimiter: b';',
        };
        let download = generate_csv(&rows, "dados.csv", &options).unwrap();
        assert_eq!(download.filename, "dados.csv");
        assert_eq!(String::from_utf8(download.bytes).unwrap(), "b;a\n\"x;y\";1\n");
    }

    #[test]
    fn test_generate_csv_rejects_empty_data() {
        let rows: Vec<Record> = Vec::new();
        let err = generate_csv(&rows, "vazio", &CsvOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), NO_DATA_MESSAGE);
    }

    #[test]
    fn test_generate_json_is_pretty() {
        let download = generate_json(&serde_json::json!({"a": 1}), "dados").unwrap();
        assert_eq!(download.filename, "dados.json");
        assert_eq!(String::from_utf8(download.bytes).unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_production_rows() {
        let item: ProductionData = serde_json::from_value(serde_json::json!({
            "date": "2024-03-05",
            "production": 42.456,
            "capacity": 50.0,
            "efficiency": 84.9,
            "peakPower": 5200.5,
            "averagePower": 3100,
            "sunHours": 6.2,
            "weather": "partly_cloudy"
        }))
        .unwrap();
        assert_eq!(item.weather, Some(WeatherCondition::PartlyCloudy));
        let rows = production_rows(&[item]);
        let headers: Vec<_> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(
            headers,
            vec![
                "Data",
                "Produção (kWh)",
                "Capacidade (kWh)",
                "Eficiência (%)",
                "Pico de Potência (W)",
                "Potência Média (W)",
                "Horas de Sol",
                "Clima"
            ]
        );
        assert_eq!(rows[0]["Data"], "05/03/2024");
        assert_eq!(rows[0]["Produção (kWh)"], "42.46");
        assert_eq!(rows[0]["Clima"], "partly_cloudy");

        let csv = generate_csv(&rows, "producao", &CsvOptions::default()).unwrap();
        let text = String::from_utf8(csv.bytes).unwrap();
        assert!(text.ends_with("05/03/2024,42.46,50.00,84.90,5200.5,3100,6.20,partly_cloudy\n"));
    }

    #[test]
    fn test_consumption_rows() {
        let item: ConsumptionData = serde_json::from_value(serde_json::json!({
            "date": "2024-03-05T10:00:00Z",
            "consumption": 10.0,
            "peak": 4.0,
            "offPeak": 6.0,
            "cost": 8.5
        }))
        .unwrap();
        let rows = consumption_rows(&[item]);
        assert_eq!(rows[0]["Data"], "05/03/2024");
        assert_eq!(rows[0]["Custo (R$)"], "8.50");
        assert_eq!(rows[0].len(), 5);
    }

    #[test]
    fn test_stats_text_for_production() {
        let stats: ProductionStats = serde_json::from_value(serde_json::json!({
            "totalProduction": 1234.5,
            "currentPower": 3200,
            "systemEfficiency": 91.237,
            "activePanels": 10,
            "totalPanels": 12,
            "co2Saved": 1.5,
            "treesEquivalent": 70,
            "monthlyEconomy": 450.0,
            "averageDailyProduction": 41.15
        }))
        .unwrap();
        let at = day().and_hms_opt(14, 3, 9).unwrap();
        let text = stats_text(&stats, at).unwrap();
        assert!(text.starts_with("=== ESTATÍSTICAS DE PRODUÇÃO ===\n\n"));
        assert!(text.contains("Total Production: 1234.50 kWh\n"));
        assert!(text.contains("Current Power: 3200 W\n"));
        assert!(text.contains("System Efficiency: 91.24%\n"));
        assert!(text.contains("Monthly Economy: R$ 450.00\n"));
        assert!(text.contains("Active Panels: 10\n"));
        assert!(text.ends_with("\n\nGerado em: 05/03/2024, 14:03:09"));
    }

    #[test]
    fn test_stats_text_for_consumption() {
        let stats = ConsumptionSummary {
            total_consumption: 300.0,
            average_consumption: 10.0,
            total_savings: 55.5,
            peak_consumption: 20.0,
            lowest_consumption: 2.0,
        };
        let at = day().and_hms_opt(0, 0, 0).unwrap();
        let text = stats_text(&stats, at).unwrap();
        assert!(text.starts_with("=== ESTATÍSTICAS DE CONSUMO ===\n\n"));
        assert!(text.contains("Total Consumption: 300.00 kWh\n"));
        assert!(text.contains("Total Savings: R$ 55.50\n"));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("XLSX"), "xlsx");
        assert_eq!(file_extension("docx"), "docx");
    }
}
