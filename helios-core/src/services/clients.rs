//! Clients service - `/admin/clients` endpoints (admin only)

use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{
    Audience, BulkResult, ChurnAnalysis, ClientBill, ClientConsumption, ClientDetail,
    ClientExportFilters, ClientFilters, ClientPage, ClientStats, ClientStatus, ClientUpdate,
    ClientUsagePoint, Download, ExportFormat, Notification, Plan, RankingEntry, RankingMetric,
    Segmentation,
};
use crate::http::{ApiClient, ApiRequest, QueryParams};

use super::consumption::date_range;
use super::export::dated_filename;

const DEFAULT_RANKING_LIMIT: u32 = 10;
const DEFAULT_CHURN_MONTHS: u32 = 6;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePlanBody<'a> {
    plan_id: &'a str,
}

#[derive(Serialize)]
struct BulkNotifyBody<'a> {
    filters: &'a Audience,
    notification: &'a Notification,
}

pub struct ClientsService {
    client: Arc<ApiClient>,
}

impl ClientsService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &ClientFilters) -> Result<ClientPage> {
        let query = QueryParams::new()
            .with_opt("status", filters.status.map(|s| s.as_str()))
            .with_opt("plan", filters.plan.as_deref())
            .with_opt("sortBy", filters.sort_by.map(|s| s.as_str()))
            .with_opt("order", filters.order.map(|o| o.as_str()))
            .with_opt("page", filters.page.filter(|p| *p > 0))
            .with_opt("limit", filters.limit.filter(|l| *l > 0));
        self.client.get("/admin/clients", query).await
    }

    pub async fn by_id(&self, client_id: &str) -> Result<ClientDetail> {
        self.client
            .get(&format!("/admin/clients/{}", client_id), QueryParams::new())
            .await
    }

    pub async fn consumption(
        &self,
        client_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<ClientUsagePoint>> {
        self.client
            .get(
                &format!("/admin/clients/{}/consumption", client_id),
                date_range(start_date, end_date),
            )
            .await
    }

    pub async fn stats(&self) -> Result<ClientStats> {
        self.client
            .get("/admin/clients/stats", QueryParams::new())
            .await
    }

    /// Search by name or email
    pub async fn search(
        &self,
        text: &str,
        status: Option<ClientStatus>,
        plan: Option<&str>,
    ) -> Result<Vec<ClientConsumption>> {
        let query = QueryParams::new()
            .with("q", text.trim())
            .with_opt("status", status.map(|s| s.as_str()))
            .with_opt("plan", plan);
        self.client.get("/admin/clients/search", query).await
    }

    pub async fn export_csv(&self, filters: &ClientExportFilters) -> Result<Download> {
        self.export("csv", ExportFormat::Csv, filters).await
    }

    pub async fn export_excel(&self, filters: &ClientExportFilters) -> Result<Download> {
        self.export("excel", ExportFormat::Xlsx, filters).await
    }

    async fn export(
        &self,
        kind: &str,
        format: ExportFormat,
        filters: &ClientExportFilters,
    ) -> Result<Download> {
        let query = date_range(filters.start_date.as_deref(), filters.end_date.as_deref())
            .with_opt("status", filters.status.map(|s| s.as_str()))
            .with_opt("plan", filters.plan.as_deref());
        let request = ApiRequest::get(format!("/admin/clients/export/{}", kind)).query(query);
        self.client
            .download(request, dated_filename("clientes", None, format))
            .await
    }

    pub async fn ranking(&self, metric: RankingMetric, limit: Option<u32>) -> Result<Vec<RankingEntry>> {
        let query = QueryParams::new()
            .with("metric", metric.as_str())
            .with("limit", limit.unwrap_or(DEFAULT_RANKING_LIMIT));
        self.client.get("/admin/clients/ranking", query).await
    }

    pub async fn billing_history(&self, client_id: &str, limit: Option<u32>) -> Result<Vec<ClientBill>> {
        let query = QueryParams::new().with_opt("limit", limit.filter(|l| *l > 0));
        self.client
            .get(&format!("/admin/clients/{}/billing", client_id), query)
            .await
    }

    pub async fn update(&self, client_id: &str, update: &ClientUpdate) -> Result<()> {
        let request = ApiRequest::patch(format!("/admin/clients/{}", client_id)).json(update)?;
        self.client.send_unit(request).await
    }

    pub async fn plans(&self) -> Result<Vec<Plan>> {
        self.client
            .get("/admin/clients/plans", QueryParams::new())
            .await
    }

    pub async fn change_plan(&self, client_id: &str, plan_id: &str) -> Result<()> {
        let request = ApiRequest::patch(format!("/admin/clients/{}/change-plan", client_id))
            .json(&ChangePlanBody { plan_id })?;
        self.client.send_unit(request).await
    }

    /// Churn over the last `months` months (6 when `None`)
    pub async fn churn_analysis(&self, months: Option<u32>) -> Result<ChurnAnalysis> {
        let query = QueryParams::new().with("months", months.unwrap_or(DEFAULT_CHURN_MONTHS));
        self.client
            .get("/admin/clients/churn-analysis", query)
            .await
    }

    pub async fn segmentation(&self) -> Result<Segmentation> {
        self.client
            .get("/admin/clients/segmentation", QueryParams::new())
            .await
    }

    pub async fn notify(&self, client_id: &str, notification: &Notification) -> Result<()> {
        let request =
            ApiRequest::post(format!("/admin/clients/{}/notify", client_id)).json(notification)?;
        self.client.send_unit(request).await
    }

    pub async fn bulk_notify(
        &self,
        audience: &Audience,
        notification: &Notification,
    ) -> Result<BulkResult> {
        self.client
            .post(
                "/admin/clients/bulk-notify",
                &BulkNotifyBody {
                    filters: audience,
                    notification,
                },
            )
            .await
    }
}
