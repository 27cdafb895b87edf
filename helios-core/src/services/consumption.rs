//! Consumption service - `/consumption` endpoints

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{
    ConsumptionAlert, ConsumptionComparative, ConsumptionData, ConsumptionForecast,
    ConsumptionSummary, Download, EnergyBill, ExportFormat, HourlyConsumption,
};
use crate::http::{ApiClient, ApiRequest, QueryParams};
use crate::validators;

use super::export::dated_filename;

const DEFAULT_FORECAST_MONTHS: u32 = 3;

pub struct ConsumptionService {
    client: Arc<ApiClient>,
}

impl ConsumptionService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Readings between two optional dates (YYYY-MM-DD)
    pub async fn history(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<ConsumptionData>> {
        self.client
            .get("/consumption/history", date_range(start_date, end_date))
            .await
    }

    pub async fn monthly(&self, year: i32, month: u32) -> Result<ConsumptionData> {
        check_month(month)?;
        self.client
            .get(
                &format!("/consumption/monthly/{}/{}", year, month),
                QueryParams::new(),
            )
            .await
    }

    pub async fn current_billing(&self) -> Result<EnergyBill> {
        self.client.get("/billing/current", QueryParams::new()).await
    }

    /// Cost with and without solar for one month
    pub async fn comparative(&self, year: i32, month: u32) -> Result<ConsumptionComparative> {
        check_month(month)?;
        self.client
            .get(
                &format!("/consumption/comparative/{}/{}", year, month),
                QueryParams::new(),
            )
            .await
    }

    pub async fn stats(&self) -> Result<ConsumptionSummary> {
        self.client.get("/consumption/stats", QueryParams::new()).await
    }

    pub async fn hourly(&self, date: &str) -> Result<Vec<HourlyConsumption>> {
        if !validators::is_valid_date(date) {
            return Err(Error::invalid_field("date", "Data inválida"));
        }
        self.client
            .get(&format!("/consumption/hourly/{}", date), QueryParams::new())
            .await
    }

    /// Forecast for the next `months` months (3 when `None`)
    pub async fn forecast(&self, months: Option<u32>) -> Result<Vec<ConsumptionForecast>> {
        let query =
            QueryParams::new().with("months", months.unwrap_or(DEFAULT_FORECAST_MONTHS));
        self.client.get("/consumption/forecast", query).await
    }

    pub async fn alerts(&self) -> Result<Vec<ConsumptionAlert>> {
        self.client.get("/consumption/alerts", QueryParams::new()).await
    }

    pub async fn mark_alert_read(&self, alert_id: &str) -> Result<()> {
        self.client
            .send_unit(ApiRequest::patch(format!(
                "/consumption/alerts/{}/read",
                alert_id
            )))
            .await
    }

    pub async fn export_pdf(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Download> {
        self.export_report("pdf", ExportFormat::Pdf, start_date, end_date)
            .await
    }

    pub async fn export_excel(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Download> {
        self.export_report("excel", ExportFormat::Xlsx, start_date, end_date)
            .await
    }

    async fn export_report(
        &self,
        kind: &str,
        format: ExportFormat,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Download> {
        let request = ApiRequest::get(format!("/reports/consumption/{}", kind))
            .query(date_range(start_date, end_date));
        self.client
            .download(request, dated_filename("relatorio_consumo", None, format))
            .await
    }
}

/// `startDate` / `endDate` query shared by the history-style endpoints
pub(crate) fn date_range(start_date: Option<&str>, end_date: Option<&str>) -> QueryParams {
    QueryParams::new()
        .with_opt("startDate", start_date)
        .with_opt("endDate", end_date)
}

fn check_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(Error::invalid_field("month", format!("Mês inválido: {}", month)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_skips_missing_bounds() {
        assert_eq!(date_range(None, None).to_query_string(), "");
        assert_eq!(
            date_range(Some("2024-01-01"), None).to_query_string(),
            "?startDate=2024-01-01"
        );
    }

    #[test]
    fn test_check_month() {
        assert!(check_month(1).is_ok());
        assert!(check_month(12).is_ok());
        assert!(check_month(0).is_err());
        assert!(check_month(13).is_err());
    }
}
