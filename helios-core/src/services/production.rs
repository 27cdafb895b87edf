//! Production service - `/production` endpoints

use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{
    AlertStatus, Benchmark, Download, EnvironmentalImpact, InverterData, MaintenanceRecord,
    MaintenanceStatus, NewMaintenance, PanelAlert, PanelConfigUpdate, PanelConnectionTest,
    PanelLogEntry, PanelStatus, Period, ProductionByDayOfWeek, ProductionByHour,
    ProductionComparison, ProductionData, ProductionForecast, ProductionOptimization,
    ProductionQuery, ProductionReport, ProductionStats, RealTimeProduction, RoiEstimate,
    SystemPerformance,
};
use crate::http::{ApiClient, ApiRequest, QueryParams};

use super::export::ProductionExport;

const DEFAULT_FORECAST_DAYS: u32 = 7;
const DEFAULT_LOG_LIMIT: u32 = 100;

/// Window used to pick the best production day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BestDayWindow {
    #[default]
    Month,
    Year,
    All,
}

impl BestDayWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            BestDayWindow::Month => "month",
            BestDayWindow::Year => "year",
            BestDayWindow::All => "all",
        }
    }
}

#[derive(Serialize)]
struct StatusBody {
    status: MaintenanceStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoiBody {
    installation_cost: f64,
}

pub struct ProductionService {
    client: Arc<ApiClient>,
}

impl ProductionService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn data(
        &self,
        period: Period,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<ProductionData>> {
        let query = QueryParams::new()
            .with("period", period)
            .with_opt("startDate", start_date)
            .with_opt("endDate", end_date);
        self.client.get("/production/data", query).await
    }

    pub async fn stats(&self) -> Result<ProductionStats> {
        self.client.get("/production/stats", QueryParams::new()).await
    }

    pub async fn panels(&self) -> Result<Vec<PanelStatus>> {
        self.client.get("/production/panels", QueryParams::new()).await
    }

    pub async fn panel(&self, panel_id: &str) -> Result<PanelStatus> {
        self.client
            .get(&format!("/production/panels/{}", panel_id), QueryParams::new())
            .await
    }

    /// Forecast for the next `days` days (7 when `None`)
    pub async fn forecast(&self, days: Option<u32>) -> Result<Vec<ProductionForecast>> {
        let query = QueryParams::new().with("days", days.unwrap_or(DEFAULT_FORECAST_DAYS));
        self.client.get("/production/forecast", query).await
    }

    pub async fn by_hour(&self, date: Option<&str>) -> Result<Vec<ProductionByHour>> {
        let query = QueryParams::new().with_opt("date", date);
        self.client.get("/production/by-hour", query).await
    }

    pub async fn comparison(&self, current: &str, previous: &str) -> Result<ProductionComparison> {
        let query = QueryParams::new()
            .with("current", current)
            .with("previous", previous);
        self.client.get("/production/comparison", query).await
    }

    pub async fn performance(&self) -> Result<SystemPerformance> {
        self.client
            .get("/production/performance", QueryParams::new())
            .await
    }

    pub async fn environmental_impact(&self) -> Result<EnvironmentalImpact> {
        self.client
            .get("/production/environmental-impact", QueryParams::new())
            .await
    }

    pub async fn inverters(&self) -> Result<Vec<InverterData>> {
        self.client
            .get("/production/inverters", QueryParams::new())
            .await
    }

    pub async fn inverter(&self, inverter_id: &str) -> Result<InverterData> {
        self.client
            .get(
                &format!("/production/inverters/{}", inverter_id),
                QueryParams::new(),
            )
            .await
    }

    pub async fn alerts(&self, status: Option<AlertStatus>) -> Result<Vec<PanelAlert>> {
        let query = QueryParams::new().with_opt("status", status.map(|s| s.as_str()));
        self.client.get("/production/alerts", query).await
    }

    pub async fn resolve_alert(&self, alert_id: &str) -> Result<()> {
        self.client
            .send_unit(ApiRequest::patch(format!(
                "/production/alerts/{}/resolve",
                alert_id
            )))
            .await
    }

    pub async fn ignore_alert(&self, alert_id: &str) -> Result<()> {
        self.client
            .send_unit(ApiRequest::patch(format!(
                "/production/alerts/{}/ignore",
                alert_id
            )))
            .await
    }

    pub async fn maintenance_history(&self, panel_id: Option<&str>) -> Result<Vec<MaintenanceRecord>> {
        let query = QueryParams::new().with_opt("panelId", panel_id);
        self.client.get("/production/maintenance", query).await
    }

    pub async fn schedule_maintenance(&self, maintenance: &NewMaintenance) -> Result<MaintenanceRecord> {
        self.client
            .post("/production/maintenance", maintenance)
            .await
    }

    pub async fn update_maintenance_status(
        &self,
        maintenance_id: &str,
        status: MaintenanceStatus,
    ) -> Result<()> {
        let request = ApiRequest::patch(format!("/production/maintenance/{}", maintenance_id))
            .json(&StatusBody { status })?;
        self.client.send_unit(request).await
    }

    pub async fn optimization(&self) -> Result<ProductionOptimization> {
        self.client
            .get("/production/optimization", QueryParams::new())
            .await
    }

    pub async fn report(&self, query: &ProductionQuery) -> Result<ProductionReport> {
        self.client
            .get("/production/report", report_query(query))
            .await
    }

    /// Server-side export of production data, saved as `producao_<period>_<date>`
    /// unless the options name the file
    pub async fn export(&self, options: &ProductionExport) -> Result<Download> {
        let request = ApiRequest::get("/production/export").query(options.query()?);
        self.client
            .download(request, options.filename_or("producao"))
            .await
    }

    pub async fn realtime(&self) -> Result<RealTimeProduction> {
        self.client.get("/production/realtime", QueryParams::new()).await
    }

    pub async fn best_day(&self, window: BestDayWindow) -> Result<ProductionData> {
        let query = QueryParams::new().with("period", window.as_str());
        self.client.get("/production/best-day", query).await
    }

    pub async fn by_day_of_week(&self) -> Result<Vec<ProductionByDayOfWeek>> {
        self.client
            .get("/production/by-day-of-week", QueryParams::new())
            .await
    }

    pub async fn update_panel_config(
        &self,
        panel_id: &str,
        update: &PanelConfigUpdate,
    ) -> Result<PanelStatus> {
        self.client
            .patch(&format!("/production/panels/{}", panel_id), update)
            .await
    }

    pub async fn test_panel_connection(&self, panel_id: &str) -> Result<PanelConnectionTest> {
        self.client
            .send(ApiRequest::post(format!("/production/panels/{}/test", panel_id)))
            .await
    }

    pub async fn restart_inverter(&self, inverter_id: &str) -> Result<()> {
        self.client
            .send_unit(ApiRequest::post(format!(
                "/production/inverters/{}/restart",
                inverter_id
            )))
            .await
    }

    /// Most recent log entries of a panel (100 when `limit` is `None`)
    pub async fn panel_logs(&self, panel_id: &str, limit: Option<u32>) -> Result<Vec<PanelLogEntry>> {
        let query = QueryParams::new().with("limit", limit.unwrap_or(DEFAULT_LOG_LIMIT));
        self.client
            .get(&format!("/production/panels/{}/logs", panel_id), query)
            .await
    }

    pub async fn calculate_roi(&self, installation_cost: f64) -> Result<RoiEstimate> {
        self.client
            .post("/production/calculate-roi", &RoiBody { installation_cost })
            .await
    }

    pub async fn benchmark(&self) -> Result<Benchmark> {
        self.client.get("/production/benchmark", QueryParams::new()).await
    }
}

fn report_query(query: &ProductionQuery) -> QueryParams {
    QueryParams::new()
        .with("period", query.period)
        .with_opt("startDate", query.start_date.as_deref())
        .with_opt("endDate", query.end_date.as_deref())
        .with_opt("groupBy", query.group_by.map(|g| g.as_str()))
        .with_opt("includeForecast", query.include_forecast)
        .with_opt("includeDetails", query.include_details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GroupBy;

    #[test]
    fn test_report_query_shapes_optional_filters() {
        let mut query = ProductionQuery::new(Period::Monthly);
        query.group_by = Some(GroupBy::Week);
        query.include_forecast = Some(true);
        assert_eq!(
            report_query(&query).to_query_string(),
            "?period=monthly&groupBy=week&includeForecast=true"
        );
    }
}
