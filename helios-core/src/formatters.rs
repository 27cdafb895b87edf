//! pt-BR display formatting
//!
//! Numbers follow JavaScript `toFixed` rounding: the exact binary value of
//! the `f64` is rounded half away from zero, so `1.005` becomes `1.00` while
//! `0.125` becomes `0.13`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::result::{Error, Result};

pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Round to `decimals` places, half away from zero on the binary value.
/// `None` for values `Decimal` cannot hold.
fn round_exact(value: f64, decimals: u32) -> Option<Decimal> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero))
}

/// Fixed-point rendering with `decimals` places (`toFixed`)
pub fn format_number(value: f64, decimals: u32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let places = decimals as usize;
    match round_exact(value, decimals) {
        Some(rounded) => format!("{:.*}", places, rounded),
        None => format!("{:.*}", places, value),
    }
}

/// `1234.5` → `R$ 1.234,50`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("R$ {}", format_number(value, 2));
    }
    let fixed = format_number(value.abs(), 2);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    format!(
        "{}R$ {},{}",
        if negative { "-" } else { "" },
        group_thousands(int_part),
        frac_part
    )
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// `12.3` → `12.30 kWh`
pub fn format_kwh(value: f64) -> String {
    format!("{} kWh", format_number(value, 2))
}

/// `12.345, 1` → `12.3%`
pub fn format_percentage(value: f64, decimals: u32) -> String {
    format!("{}%", format_number(value, decimals))
}

/// Parse a date or timestamp as the backend sends it.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (kept in their own offset) and
/// `YYYY-MM-DDTHH:MM:SS` without offset.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(dt);
        }
    }
    Err(Error::invalid_field("date", format!("Data inválida: {}", input)))
}

/// `2024-03-05` → `05/03/2024`
pub fn format_date(input: &str) -> Result<String> {
    Ok(parse_timestamp(input)?.format("%d/%m/%Y").to_string())
}

/// `2024-03-05T14:03:09Z` → `05/03/2024, 14:03:09`
pub fn format_date_time(input: &str) -> Result<String> {
    Ok(format_naive_date_time(&parse_timestamp(input)?))
}

pub fn format_naive_date_time(dt: &NaiveDateTime) -> String {
    dt.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// `(1, 2024)` → `Janeiro/2024`; `None` for a month outside 1-12
pub fn format_month_year(month: u32, year: i32) -> Option<String> {
    let name = MONTH_NAMES.get(month.checked_sub(1)? as usize)?;
    Some(format!("{}/{}", name, year))
}

/// `1500` → `1.5K`, `2_000_000` → `2.0M`; smaller values unchanged
pub fn abbreviate_number(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{}M", format_number(value / 1_000_000.0, 1))
    } else if value >= 1_000.0 {
        format!("{}K", format_number(value / 1_000.0, 1))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5), "R$ 1.234,50");
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_currency(999.999), "R$ 1.000,00");
        assert_eq!(format_currency(-45.1), "-R$ 45,10");
    }

    #[test]
    fn test_format_number_matches_to_fixed() {
        assert_eq!(format_number(1.005, 2), "1.00");
        assert_eq!(format_number(1.45, 1), "1.4");
        assert_eq!(format_number(0.125, 2), "0.13");
        assert_eq!(format_number(12.345, 2), "12.35");
        assert_eq!(format_number(2.5, 0), "3");
        assert_eq!(format_number(-2.5, 0), "-3");
        assert_eq!(format_number(10.0, 2), "10.00");
        assert_eq!(format_number(f64::NAN, 2), "NaN");
    }

    #[test]
    fn test_units() {
        assert_eq!(format_kwh(12.3), "12.30 kWh");
        assert_eq!(format_percentage(12.5, 1), "12.5%");
        assert_eq!(format_percentage(33.333, 2), "33.33%");
    }

    #[test]
    fn test_dates() {
        assert_eq!(format_date("2024-03-05").unwrap(), "05/03/2024");
        assert_eq!(format_date("2024-03-05T23:10:00-03:00").unwrap(), "05/03/2024");
        assert_eq!(
            format_date_time("2024-03-05T14:03:09Z").unwrap(),
            "05/03/2024, 14:03:09"
        );
        assert!(format_date("05/03/2024").is_err());
        assert!(format_date("2024-02-30").is_err());
    }

    #[test]
    fn test_month_year() {
        assert_eq!(format_month_year(1, 2024).as_deref(), Some("Janeiro/2024"));
        assert_eq!(format_month_year(3, 2023).as_deref(), Some("Março/2023"));
        assert!(format_month_year(0, 2024).is_none());
        assert!(format_month_year(13, 2024).is_none());
    }

    #[test]
    fn test_abbreviate_number() {
        assert_eq!(abbreviate_number(1500.0), "1.5K");
        assert_eq!(abbreviate_number(2_000_000.0), "2.0M");
        assert_eq!(abbreviate_number(999.0), "999");
        assert_eq!(abbreviate_number(12.5), "12.5");
    }
}
