//! Client administration models

use serde::{Deserialize, Serialize};

use super::{BillStatus, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Inactive,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClientStatus::Active => "Ativo",
            ClientStatus::Inactive => "Inativo",
        }
    }
}

/// Row of the admin client list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConsumption {
    #[serde(alias = "id")]
    pub user_id: String,
    #[serde(alias = "name")]
    pub user_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    pub status: ClientStatus,
    /// kWh in the current month
    #[serde(alias = "consumption")]
    pub total_consumption: f64,
    /// kWh in the previous month
    #[serde(default)]
    pub last_month: Option<f64>,
    /// R$
    #[serde(default)]
    pub savings: f64,
    #[serde(default)]
    pub join_date: Option<String>,
    #[serde(default)]
    pub last_update: String,
}

/// One page of clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPage {
    pub clients: Vec<ClientConsumption>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientSortBy {
    Name,
    Consumption,
    Savings,
    JoinDate,
}

impl ClientSortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientSortBy::Name => "name",
            ClientSortBy::Consumption => "consumption",
            ClientSortBy::Savings => "savings",
            ClientSortBy::JoinDate => "joinDate",
        }
    }
}

/// Filters for the client list
#[derive(Debug, Clone, Default)]
pub struct ClientFilters {
    pub status: Option<ClientStatus>,
    pub plan: Option<String>,
    pub sort_by: Option<ClientSortBy>,
    pub order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Filters accepted by the client export endpoints
#[derive(Debug, Clone, Default)]
pub struct ClientExportFilters {
    pub status: Option<ClientStatus>,
    pub plan: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyUsage {
    pub month: String,
    pub year: i32,
    pub consumption: f64,
    pub cost: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetail {
    pub user_id: String,
    pub user_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    pub plan: String,
    pub status: ClientStatus,
    pub join_date: String,
    pub total_consumption: f64,
    pub total_savings: f64,
    pub average_monthly_consumption: f64,
    #[serde(default)]
    pub monthly_consumption: Vec<MonthlyUsage>,
    pub last_update: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUsagePoint {
    pub date: String,
    pub consumption: f64,
    pub cost: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopConsumer {
    pub user_id: String,
    pub user_name: String,
    pub consumption: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub total_clients: u64,
    pub active_clients: u64,
    pub inactive_clients: u64,
    pub total_consumption: f64,
    pub total_savings: f64,
    pub average_consumption: f64,
    pub average_savings: f64,
    #[serde(default)]
    pub top_consumers: Vec<TopConsumer>,
    pub new_clients_this_month: u64,
    pub churn_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingMetric {
    #[default]
    Consumption,
    Savings,
}

impl RankingMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMetric::Consumption => "consumption",
            RankingMetric::Savings => "savings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: u32,
    pub user_id: String,
    pub user_name: String,
    pub email: String,
    pub value: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBill {
    pub id: String,
    pub month: String,
    pub year: i32,
    pub consumption: f64,
    pub cost: f64,
    pub savings: f64,
    pub status: BillStatus,
    pub due_date: String,
    #[serde(default)]
    pub paid_date: Option<String>,
}

/// Admin-side edit of a client record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClientStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub price: f64,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnReason {
    pub reason: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnPoint {
    pub month: String,
    pub churn_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnAnalysis {
    pub churn_rate: f64,
    pub churned: u64,
    pub retained: u64,
    #[serde(default)]
    pub reasons: Vec<ChurnReason>,
    #[serde(default)]
    pub trend: Vec<ChurnPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSegment {
    pub plan: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSegment {
    pub range: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySegment {
    pub city: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segmentation {
    pub by_plan: Vec<PlanSegment>,
    pub by_consumption: Vec<RangeSegment>,
    pub by_location: Vec<CitySegment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    Push,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

/// Audience filter for a bulk notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audience {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClientStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    pub sent: u64,
    pub failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_row_accepts_list_page_shape() {
        let json = r#"{"id":"c1","name":"Maria Silva","email":"maria@example.com",
            "status":"active","consumption":420.5,"lastMonth":400,"savings":310.2,
            "plan":"Premium","joinDate":"2023-01-15"}"#;
        let client: ClientConsumption = serde_json::from_str(json).unwrap();
        assert_eq!(client.user_id, "c1");
        assert_eq!(client.user_name, "Maria Silva");
        assert_eq!(client.total_consumption, 420.5);
        assert_eq!(client.last_month, Some(400.0));
        assert_eq!(client.status.label(), "Ativo");
    }

    #[test]
    fn test_notification_serializes_channel_as_type() {
        let notification = Notification {
            channel: Channel::Sms,
            subject: None,
            message: "Sua fatura venceu".to_string(),
        };
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "sms");
        assert!(json.get("subject").is_none());
    }
}
