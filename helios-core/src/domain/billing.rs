//! Billing models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Paid,
    Pending,
    Overdue,
    Canceled,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Paid => "paid",
            BillStatus::Pending => "pending",
            BillStatus::Overdue => "overdue",
            BillStatus::Canceled => "canceled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Paid => "Paga",
            BillStatus::Pending => "Pendente",
            BillStatus::Overdue => "Vencida",
            BillStatus::Canceled => "Cancelada",
        }
    }
}

/// Energy bill for the current cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyBill {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    /// YYYY-MM
    pub reference_month: String,
    pub consumption: f64,
    #[serde(default)]
    pub production: f64,
    #[serde(default)]
    pub surplus: f64,
    pub cost: f64,
    #[serde(default)]
    pub credits: f64,
    #[serde(default)]
    pub taxes: f64,
    pub total_amount: f64,
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<String>,
    pub status: BillStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// One row of the billing history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    pub id: String,
    pub month: String,
    pub year: i32,
    pub consumption: f64,
    #[serde(default)]
    pub energy_injected: f64,
    pub cost_with_solar: f64,
    pub cost_without_solar: f64,
    pub savings: f64,
    pub savings_percentage: f64,
    pub status: BillStatus,
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLine {
    pub description: String,
    pub quantity: String,
    pub unit_price: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxShare {
    pub name: String,
    pub percentage: f64,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Full breakdown of a single bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDetail {
    pub id: String,
    pub user_id: String,
    pub month: String,
    pub year: i32,
    pub consumption: f64,
    pub energy_injected: f64,
    pub cost_with_solar: f64,
    pub cost_without_solar: f64,
    pub savings: f64,
    pub savings_percentage: f64,
    pub base_fee: f64,
    pub energy_cost: f64,
    pub taxes: f64,
    pub status: BillStatus,
    pub due_date: String,
    #[serde(default)]
    pub paid_date: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub details: Vec<BillLine>,
    #[serde(default)]
    pub tax_breakdown: Vec<TaxShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingStats {
    pub total_savings: f64,
    pub average_monthly_cost: f64,
    pub total_paid: f64,
    pub pending_amount: f64,
    pub savings_percentage: f64,
    pub total_consumption: f64,
    pub total_energy_injected: f64,
    pub year_to_date_savings: f64,
}

/// Savings simulation for a given consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsEstimate {
    pub consumption: f64,
    pub with_solar: f64,
    pub without_solar: f64,
    pub savings: f64,
    pub savings_percentage: f64,
    pub payback_months: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCost {
    pub month: u32,
    pub month_name: String,
    pub with_solar: f64,
    pub without_solar: f64,
    pub savings: f64,
    pub consumption: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyComparison {
    pub year: i32,
    pub total_with_solar: f64,
    pub total_without_solar: f64,
    pub total_savings: f64,
    pub savings_percentage: f64,
    pub monthly_breakdown: Vec<MonthlyCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextDue {
    pub due_date: String,
    pub estimated_amount: f64,
    pub estimated_consumption: f64,
    pub days_remaining: i64,
    pub is_paid: bool,
}

/// Generated bill reference, returned by admin and payment actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Created {
    pub id: String,
    #[serde(default)]
    pub message: String,
}

/// Admin request to generate a bill manually
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBill {
    pub user_id: String,
    pub month: u32,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_injected: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    CreditCard,
    DebitCard,
    BankTransfer,
    BankSlip,
    Pix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoPayMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub last_four_digits: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoPayStatus {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<AutoPayMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub last_four_digits: Option<String>,
    #[serde(default)]
    pub expiry_month: Option<u32>,
    #[serde(default)]
    pub expiry_year: Option<i32>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub created_at: String,
}

/// Tokenized payment method registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentMethod {
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_as_default: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub success: bool,
    pub transaction_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Failed,
    Pending,
    Refunded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub billing_id: String,
    pub amount: f64,
    pub status: TransactionStatus,
    pub payment_method: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundReceipt {
    pub success: bool,
    pub refund_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffDetails {
    pub base_tariff: f64,
    pub peak_tariff: f64,
    pub off_peak_tariff: f64,
    #[serde(default)]
    pub taxes: Vec<TaxShare>,
    pub valid_from: String,
    pub valid_until: String,
}

/// Input of a bill simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub consumption: f64,
    pub solar_installed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_capacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioItem {
    pub item: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub estimated_cost: f64,
    #[serde(default)]
    pub breakdown: Vec<ScenarioItem>,
    pub savings: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub severity: super::Severity,
    pub date: String,
    #[serde(default)]
    pub is_read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthAmount {
    pub month: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualSummary {
    pub year: i32,
    pub total_paid: f64,
    pub total_savings: f64,
    pub average_monthly: f64,
    pub highest_month: MonthAmount,
    pub lowest_month: MonthAmount,
    pub total_consumption: f64,
    pub co2_avoided: f64,
}

/// Attachment sent with a bill dispute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Contestation of a bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispute {
    pub reason: String,
    pub description: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeReceipt {
    pub dispute_id: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_row_decodes() {
        let json = r#"{"id":"b1","month":"Maio","year":2024,"consumption":350,
            "costWithSolar":80.5,"costWithoutSolar":290,"savings":209.5,
            "savingsPercentage":72.2,"status":"overdue","dueDate":"2024-06-10"}"#;
        let row: BillSummary = serde_json::from_str(json).unwrap();
        assert_eq!(row.status, BillStatus::Overdue);
        assert_eq!(row.status.label(), "Vencida");
        assert_eq!(row.energy_injected, 0.0);
    }

    #[test]
    fn test_payment_kind_is_snake_case() {
        let method = NewPaymentMethod {
            kind: PaymentKind::CreditCard,
            token: "tok_1".to_string(),
            set_as_default: None,
        };
        let json = serde_json::to_value(&method).unwrap();
        assert_eq!(json["type"], "credit_card");
        assert!(json.get("setAsDefault").is_none());
    }
}
