//! Solar production models

use serde::{Deserialize, Serialize};

use super::{GroupBy, Period, Severity};

/// Operating status of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    Active,
    Warning,
    Inactive,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rainy,
    Stormy,
}

impl WeatherCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::PartlyCloudy => "partly_cloudy",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Stormy => "stormy",
        }
    }
}

/// One production reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub date: String,
    /// kWh produced
    pub production: f64,
    /// kWh installed capacity
    pub capacity: f64,
    /// % of capacity reached
    pub efficiency: f64,
    /// W
    #[serde(default)]
    pub peak_power: f64,
    /// W
    #[serde(default)]
    pub average_power: f64,
    #[serde(default)]
    pub sun_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherCondition>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemHealth {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Headline production numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionStats {
    pub total_production: f64,
    pub current_power: f64,
    pub system_efficiency: f64,
    pub active_panels: u32,
    pub total_panels: u32,
    #[serde(default)]
    pub inactive_panels: u32,
    #[serde(default)]
    pub warning_panels: u32,
    /// Tonnes of CO2
    pub co2_saved: f64,
    pub trees_equivalent: f64,
    pub monthly_economy: f64,
    #[serde(default)]
    pub yearly_economy: f64,
    pub average_daily_production: f64,
    #[serde(default)]
    pub best_production_day: Option<String>,
    #[serde(default)]
    pub best_production_value: Option<f64>,
    #[serde(default)]
    pub system_health: Option<SystemHealth>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceKind {
    Preventive,
    Corrective,
    Inspection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
    Canceled,
}

/// Maintenance performed or scheduled on a panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: String,
    pub panel_id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: MaintenanceKind,
    pub description: String,
    pub technician: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub status: MaintenanceStatus,
}

/// New maintenance booking; id and status are assigned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMaintenance {
    pub panel_id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: MaintenanceKind,
    pub description: String,
    pub technician: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Resolved,
    Ignored,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Resolved => "resolved",
            AlertStatus::Ignored => "ignored",
        }
    }
}

/// Alert raised by a panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelAlert {
    pub id: String,
    pub panel_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    pub detected_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
    pub status: AlertStatus,
}

/// Live status of a panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelStatus {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub serial_number: String,
    pub status: PanelState,
    pub current_power: f64,
    pub efficiency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    pub last_update: String,
    #[serde(default)]
    pub installation_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_history: Option<Vec<MaintenanceRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<PanelAlert>>,
}

/// Panel settings an admin may change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PanelState>,
}

/// Expected production for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionForecast {
    pub date: String,
    pub expected_production: f64,
    #[serde(default)]
    pub min_production: Option<f64>,
    #[serde(default)]
    pub max_production: Option<f64>,
    pub weather_condition: WeatherCondition,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub cloud_cover: Option<f64>,
    pub confidence: f64,
    #[serde(default)]
    pub sunrise_time: Option<String>,
    #[serde(default)]
    pub sunset_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionByHour {
    pub hour: u8,
    pub production: f64,
    pub power: f64,
    pub efficiency: f64,
    /// W/m²
    pub irradiance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionComparison {
    pub period: String,
    pub current_production: f64,
    pub previous_production: f64,
    pub variation: f64,
    pub expected_production: f64,
    pub performance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemPerformance {
    pub performance_ratio: f64,
    pub capacity_factor: f64,
    pub availability_rate: f64,
    pub degradation_rate: f64,
    pub expected_lifespan: f64,
    pub total_lifespan: f64,
    pub system_age: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalImpact {
    pub co2_avoided: f64,
    pub trees_equivalent: f64,
    pub cars_off_road: f64,
    pub water_saved: f64,
    pub coal_not_burned: f64,
    pub homes_equivalent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InverterState {
    Online,
    Offline,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InverterData {
    pub id: String,
    pub model: String,
    pub serial_number: String,
    pub status: InverterState,
    pub input_voltage: f64,
    pub input_current: f64,
    pub output_voltage: f64,
    pub output_current: f64,
    pub frequency: f64,
    pub temperature: f64,
    pub efficiency: f64,
    pub total_production: f64,
    pub last_update: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRecommendation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: Severity,
    pub title: String,
    pub description: String,
    pub estimated_impact: String,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    #[serde(default)]
    pub payback_period: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionOptimization {
    pub current_efficiency: f64,
    pub potential_efficiency: f64,
    pub improvement_percentage: f64,
    /// kWh per month
    pub estimated_gain: f64,
    pub recommendations: Vec<OptimizationRecommendation>,
}

/// Everything the production report page shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionReport {
    pub period: String,
    pub production: Vec<ProductionData>,
    pub stats: ProductionStats,
    #[serde(default)]
    pub by_hour: Option<Vec<ProductionByHour>>,
    #[serde(default)]
    pub comparison: Option<ProductionComparison>,
    #[serde(default)]
    pub forecast: Option<Vec<ProductionForecast>>,
    pub system_performance: SystemPerformance,
    pub environmental_impact: EnvironmentalImpact,
    pub panels: Vec<PanelStatus>,
    pub inverters: Vec<InverterData>,
    pub alerts: Vec<PanelAlert>,
    pub recommendations: Vec<String>,
}

/// Filters for the production report
#[derive(Debug, Clone)]
pub struct ProductionQuery {
    pub period: Period,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub group_by: Option<GroupBy>,
    pub include_forecast: Option<bool>,
    pub include_details: Option<bool>,
}

impl ProductionQuery {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            start_date: None,
            end_date: None,
            group_by: None,
            include_forecast: None,
            include_details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeProduction {
    pub current_power: f64,
    pub efficiency: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionByDayOfWeek {
    pub day_of_week: u8,
    pub day_name: String,
    pub average_production: f64,
    pub total_production: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelConnectionTest {
    pub success: bool,
    /// Milliseconds
    pub latency: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelLogEntry {
    pub timestamp: String,
    pub event: String,
    pub severity: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiEstimate {
    pub roi: f64,
    /// Months
    pub payback_period: f64,
    pub total_savings: f64,
    pub monthly_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    pub your_system: f64,
    pub average: f64,
    pub top10_percent: f64,
    pub ranking: u32,
    pub total_systems: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_uses_snake_case() {
        let weather: WeatherCondition = serde_json::from_str(r#""partly_cloudy""#).unwrap();
        assert_eq!(weather, WeatherCondition::PartlyCloudy);
        assert_eq!(weather.as_str(), "partly_cloudy");
    }

    #[test]
    fn test_panel_status_decodes_minimal_panel() {
        let json = r#"{
            "id": "p1",
            "name": "Painel 01",
            "status": "warning",
            "currentPower": 310.5,
            "efficiency": 17.8,
            "lastUpdate": "2024-06-01T10:00:00Z",
            "temperature": 48.2
        }"#;
        let panel: PanelStatus = serde_json::from_str(json).unwrap();
        assert_eq!(panel.status, PanelState::Warning);
        assert_eq!(panel.temperature, Some(48.2));
        assert!(panel.alerts.is_none());
    }

    #[test]
    fn test_maintenance_status_in_progress() {
        let json = r#"{"id":"m1","panelId":"p1","date":"2024-06-01","type":"corrective",
            "description":"Troca de conector","technician":"João","status":"in_progress"}"#;
        let record: MaintenanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, MaintenanceStatus::InProgress);
        assert_eq!(record.kind, MaintenanceKind::Corrective);
    }
}
