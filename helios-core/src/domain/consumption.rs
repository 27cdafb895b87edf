//! Energy consumption models

use serde::{Deserialize, Serialize};

use super::Severity;

/// One consumption reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub date: String,
    /// Total kWh
    pub consumption: f64,
    /// kWh during peak hours
    #[serde(default)]
    pub peak: f64,
    /// kWh outside peak hours
    #[serde(default)]
    pub off_peak: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate: Option<f64>,
    /// R$
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub created_at: String,
}

/// Headline numbers for the consumption page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionSummary {
    pub total_consumption: f64,
    pub average_consumption: f64,
    pub total_savings: f64,
    pub peak_consumption: f64,
    pub lowest_consumption: f64,
}

/// Direction of consumption over the selected period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumptionTrend {
    Increasing,
    Decreasing,
    Stable,
}

/// Detailed consumption statistics, part of a consumption report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionStats {
    pub total_consumption: f64,
    pub average_daily_consumption: f64,
    pub peak_consumption: f64,
    pub off_peak_consumption: f64,
    pub total_cost: f64,
    pub average_cost: f64,
    pub cost_without_solar: f64,
    pub savings_amount: f64,
    pub savings_percentage: f64,
    pub consumption_trend: ConsumptionTrend,
    pub trend_percentage: f64,
}

/// Cost with and without solar for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionComparative {
    pub with_solar: f64,
    pub without_solar: f64,
    pub savings: f64,
    pub savings_percentage: f64,
}

/// Consumption in one hour of a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyConsumption {
    pub hour: u8,
    pub consumption: f64,
}

/// Expected consumption for an upcoming month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionForecast {
    pub month: String,
    pub year: i32,
    pub estimated_consumption: f64,
    pub estimated_cost: f64,
}

/// Alert raised on the consumption side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub date: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub read: bool,
}
