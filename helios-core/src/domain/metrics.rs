//! Derived numbers shown on dashboard cards

use serde::Serialize;

use super::{ClientConsumption, ClientStatus};

/// Relative change from `previous` to `current`, in percent.
///
/// `None` when there is no previous value to compare against.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// `part` as a percentage of `total`
pub fn share_percentage(part: f64, total: f64) -> Option<f64> {
    if total == 0.0 || !total.is_finite() || !part.is_finite() {
        return None;
    }
    Some(part / total * 100.0)
}

/// Direction of a change, as rendered by the trend arrows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn of(current: f64, previous: f64) -> Self {
        if current > previous {
            Trend::Up
        } else if current < previous {
            Trend::Down
        } else {
            Trend::Flat
        }
    }
}

/// Totals across a client list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub total_clients: usize,
    pub active_clients: usize,
    pub total_consumption: f64,
    pub total_savings: f64,
}

impl ClientSummary {
    pub fn from_clients(clients: &[ClientConsumption]) -> Self {
        clients.iter().fold(Self::default(), |mut acc, client| {
            acc.total_clients += 1;
            if client.status == ClientStatus::Active {
                acc.active_clients += 1;
            }
            acc.total_consumption += client.total_consumption;
            acc.total_savings += client.savings;
            acc
        })
    }

    /// Share of active clients; `None` for an empty list
    pub fn active_share(&self) -> Option<f64> {
        share_percentage(self.active_clients as f64, self.total_clients as f64)
    }
}
