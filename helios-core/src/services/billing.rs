//! Billing service - `/billing` and `/admin/billing` endpoints

use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{
    AnnualSummary, AutoPayStatus, BillDetail, BillSummary, BillingAlert, BillingStats, Created,
    Dispute, DisputeReceipt, Download, EnergyBill, ExportFormat, GenerateBill, NewPaymentMethod,
    NextDue, PaymentMethod, PaymentReceipt, RefundReceipt, SavingsEstimate, Scenario,
    ScenarioResult, TariffDetails, Transaction, YearlyComparison,
};
use crate::http::{ApiClient, ApiRequest, FilePart, MultipartBody, QueryParams};

use super::consumption::date_range;
use super::export::dated_filename;

#[derive(Serialize)]
struct CalculateBody {
    consumption: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    tariff: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkPaidBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    paid_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method: Option<&'a str>,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AutoPayBody<'a> {
    enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method_id: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PayBody<'a> {
    payment_method_id: &'a str,
}

#[derive(Serialize)]
struct RefundBody<'a> {
    reason: &'a str,
}

pub struct BillingService {
    client: Arc<ApiClient>,
}

impl BillingService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn current(&self) -> Result<EnergyBill> {
        self.client.get("/billing/current", QueryParams::new()).await
    }

    pub async fn history(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<BillSummary>> {
        self.client
            .get("/billing/history", date_range(start_date, end_date))
            .await
    }

    pub async fn by_id(&self, billing_id: &str) -> Result<BillDetail> {
        self.client
            .get(&format!("/billing/{}", billing_id), QueryParams::new())
            .await
    }

    pub async fn stats(&self) -> Result<BillingStats> {
        self.client.get("/billing/stats", QueryParams::new()).await
    }

    /// Savings simulation for a monthly consumption in kWh
    pub async fn calculate_savings(&self, consumption: f64, tariff: Option<f64>) -> Result<SavingsEstimate> {
        if !consumption.is_finite() || consumption < 0.0 {
            return Err(Error::invalid_field("consumption", "Consumo inválido"));
        }
        self.client
            .post("/billing/calculate", &CalculateBody { consumption, tariff })
            .await
    }

    /// Admin: mark a bill as paid
    pub async fn mark_paid(
        &self,
        billing_id: &str,
        paid_date: Option<&str>,
        payment_method: Option<&str>,
    ) -> Result<()> {
        let request = ApiRequest::patch(format!("/admin/billing/{}/mark-paid", billing_id)).json(
            &MarkPaidBody {
                paid_date,
                payment_method,
            },
        )?;
        self.client.send_unit(request).await
    }

    /// Admin: generate a bill manually
    pub async fn generate(&self, bill: &GenerateBill) -> Result<Created> {
        if !(1..=12).contains(&bill.month) {
            return Err(Error::invalid_field("month", format!("Mês inválido: {}", bill.month)));
        }
        self.client.post("/admin/billing/generate", bill).await
    }

    pub async fn export_pdf(&self, billing_id: &str) -> Result<Download> {
        let request = ApiRequest::get(format!("/billing/{}/pdf", billing_id));
        self.client
            .download(request, format!("fatura_{}.pdf", billing_id))
            .await
    }

    pub async fn send_by_email(&self, billing_id: &str, email: Option<&str>) -> Result<()> {
        let request =
            ApiRequest::post(format!("/billing/{}/send-email", billing_id)).json(&EmailBody { email })?;
        self.client.send_unit(request).await
    }

    pub async fn yearly_comparison(&self, year: i32) -> Result<YearlyComparison> {
        self.client
            .get(&format!("/billing/yearly/{}", year), QueryParams::new())
            .await
    }

    pub async fn next_due(&self) -> Result<NextDue> {
        self.client.get("/billing/next-due", QueryParams::new()).await
    }

    pub async fn setup_auto_pay(&self, enabled: bool, payment_method_id: Option<&str>) -> Result<()> {
        let request = ApiRequest::post("/billing/auto-pay").json(&AutoPayBody {
            enabled,
            payment_method_id,
        })?;
        self.client.send_unit(request).await
    }

    pub async fn auto_pay_status(&self) -> Result<AutoPayStatus> {
        self.client.get("/billing/auto-pay", QueryParams::new()).await
    }

    pub async fn payment_methods(&self) -> Result<Vec<PaymentMethod>> {
        self.client
            .get("/billing/payment-methods", QueryParams::new())
            .await
    }

    pub async fn add_payment_method(&self, method: &NewPaymentMethod) -> Result<Created> {
        self.client.post("/billing/payment-methods", method).await
    }

    pub async fn remove_payment_method(&self, payment_method_id: &str) -> Result<()> {
        self.client
            .send_unit(ApiRequest::delete(format!(
                "/billing/payment-methods/{}",
                payment_method_id
            )))
            .await
    }

    pub async fn set_default_payment_method(&self, payment_method_id: &str) -> Result<()> {
        self.client
            .send_unit(ApiRequest::patch(format!(
                "/billing/payment-methods/{}/set-default",
                payment_method_id
            )))
            .await
    }

    pub async fn pay(&self, billing_id: &str, payment_method_id: &str) -> Result<PaymentReceipt> {
        self.client
            .post(
                &format!("/billing/{}/pay", billing_id),
                &PayBody { payment_method_id },
            )
            .await
    }

    pub async fn transactions(&self, limit: Option<u32>) -> Result<Vec<Transaction>> {
        let query = QueryParams::new().with_opt("limit", limit.filter(|l| *l > 0));
        self.client.get("/billing/transactions", query).await
    }

    pub async fn request_refund(&self, billing_id: &str, reason: &str) -> Result<RefundReceipt> {
        self.client
            .post(
                &format!("/billing/{}/refund", billing_id),
                &RefundBody { reason },
            )
            .await
    }

    pub async fn tariff_details(&self) -> Result<TariffDetails> {
        self.client
            .get("/billing/tariff-details", QueryParams::new())
            .await
    }

    pub async fn simulate(&self, scenario: &Scenario) -> Result<ScenarioResult> {
        self.client.post("/billing/simulate", scenario).await
    }

    pub async fn alerts(&self) -> Result<Vec<BillingAlert>> {
        self.client.get("/billing/alerts", QueryParams::new()).await
    }

    pub async fn mark_alert_read(&self, alert_id: &str) -> Result<()> {
        self.client
            .send_unit(ApiRequest::patch(format!("/billing/alerts/{}/read", alert_id)))
            .await
    }

    pub async fn export_history_excel(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Download> {
        let request =
            ApiRequest::get("/billing/export/excel").query(date_range(start_date, end_date));
        self.client
            .download(request, dated_filename("historico_faturas", None, ExportFormat::Xlsx))
            .await
    }

    pub async fn annual_summary(&self, year: i32) -> Result<AnnualSummary> {
        self.client
            .get(&format!("/billing/annual-summary/{}", year), QueryParams::new())
            .await
    }

    /// Contest a bill; attachments are sent as `attachment0`, `attachment1`, ...
    pub async fn dispute(&self, billing_id: &str, dispute: &Dispute) -> Result<DisputeReceipt> {
        let request = ApiRequest::post(format!("/billing/{}/dispute", billing_id))
            .multipart(dispute_form(dispute));
        self.client.send(request).await
    }
}

fn dispute_form(dispute: &Dispute) -> MultipartBody {
    dispute.attachments.iter().enumerate().fold(
        MultipartBody::new()
            .text("reason", dispute.reason.clone())
            .text("description", dispute.description.clone()),
        |form, (index, attachment)| {
            form.file(FilePart {
                field: format!("attachment{}", index),
                filename: attachment.filename.clone(),
                content_type: attachment.content_type.clone(),
                bytes: attachment.bytes.clone(),
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Attachment;

    #[test]
    fn test_dispute_form_numbers_attachments() {
        let dispute = Dispute {
            reason: "cobranca_indevida".to_string(),
            description: "Leitura duplicada".to_string(),
            attachments: vec![
                Attachment {
                    filename: "foto.jpg".to_string(),
                    content_type: Some("image/jpeg".to_string()),
                    bytes: vec![0xff, 0xd8],
                },
                Attachment {
                    filename: "conta.pdf".to_string(),
                    content_type: None,
                    bytes: b"%PDF".to_vec(),
                },
            ],
        };
        let form = dispute_form(&dispute);
        assert_eq!(form.fields.len(), 2);
        assert_eq!(form.fields[0], ("reason".to_string(), "cobranca_indevida".to_string()));
        let names: Vec<_> = form.files.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["attachment0", "attachment1"]);
    }
}
