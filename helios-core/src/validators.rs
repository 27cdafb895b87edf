//! Form validation
//!
//! Pure predicates over user input. The `*_error` functions return the
//! Portuguese message shown next to a form field, or `None` when the value
//! is acceptable. Numeric checks treat NaN as invalid.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

use crate::domain::result::{Error, Result};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9]{2}9?[0-9]{8}$").expect("valid phone pattern"));
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-1][0-9]|2[0-3]):[0-5][0-9]$").expect("valid time pattern"));
static SERIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9-]{5,20}$").expect("valid serial pattern"));

fn digits(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_equal(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least 8 characters with a lowercase letter, an uppercase letter and a
/// digit. Line breaks are not allowed anywhere.
pub fn is_valid_password(password: &str) -> bool {
    let line_break = |c: char| matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}');
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && !password.chars().any(line_break)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// CPF with or without punctuation (`529.982.247-25`)
pub fn is_valid_cpf(cpf: &str) -> bool {
    let d = digits(cpf);
    if d.len() != 11 || all_equal(&d) {
        return false;
    }
    let check = |len: usize| {
        let sum: u32 = d[..len]
            .iter()
            .enumerate()
            .map(|(i, n)| n * (len as u32 + 1 - i as u32))
            .sum();
        let digit = 11 - (sum % 11);
        if digit >= 10 {
            0
        } else {
            digit
        }
    };
    check(9) == d[9] && check(10) == d[10]
}

/// CNPJ with or without punctuation (`11.222.333/0001-81`)
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    let d = digits(cnpj);
    if d.len() != 14 || all_equal(&d) {
        return false;
    }
    let check = |len: usize| {
        // weights run 5..2 then 9..2 for the first digit, 6..2 then 9..2 for the second
        let mut weight = len as u32 - 7;
        let mut sum = 0;
        for n in &d[..len] {
            sum += n * weight;
            weight = if weight == 2 { 9 } else { weight - 1 };
        }
        if sum % 11 < 2 {
            0
        } else {
            11 - sum % 11
        }
    };
    check(12) == d[12] && check(13) == d[13]
}

/// Brazilian phone, landline or mobile, any punctuation
pub fn is_valid_phone(phone: &str) -> bool {
    let cleaned: String = phone.chars().filter(char::is_ascii_digit).collect();
    PHONE_RE.is_match(&cleaned)
}

pub fn is_valid_cep(cep: &str) -> bool {
    cep.chars().filter(char::is_ascii_digit).count() == 8
}

/// Absolute URL
pub fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

/// `YYYY-MM-DD` naming a real calendar day
pub fn is_valid_date(date: &str) -> bool {
    parse_date(date).is_some()
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    let bytes = date.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Strictly after today (local calendar)
pub fn is_future_date(date: &str) -> bool {
    is_future_date_from(date, Local::now().date_naive())
}

/// Strictly before today (local calendar)
pub fn is_past_date(date: &str) -> bool {
    is_past_date_from(date, Local::now().date_naive())
}

pub fn is_future_date_from(date: &str, today: NaiveDate) -> bool {
    parse_date(date).is_some_and(|d| d > today)
}

pub fn is_past_date_from(date: &str, today: NaiveDate) -> bool {
    parse_date(date).is_some_and(|d| d < today)
}

/// 24-hour `HH:MM`
pub fn is_valid_time(time: &str) -> bool {
    TIME_RE.is_match(time)
}

pub fn is_not_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn has_min_length(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

pub fn has_max_length(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

/// Both entries equal and not empty
pub fn passwords_match(password: &str, confirmation: &str) -> bool {
    !password.is_empty() && password == confirmation
}

/// Uppercase letters, digits and hyphens, 5 to 20 long
pub fn is_valid_serial_number(serial: &str) -> bool {
    SERIAL_RE.is_match(serial)
}

pub fn is_positive(value: f64) -> bool {
    !value.is_nan() && value > 0.0
}

pub fn is_non_negative(value: f64) -> bool {
    !value.is_nan() && value >= 0.0
}

/// Inclusive on both ends
pub fn is_in_range(value: f64, min: f64, max: f64) -> bool {
    !value.is_nan() && value >= min && value <= max
}

pub fn is_valid_percentage(value: f64) -> bool {
    is_in_range(value, 0.0, 100.0)
}

/// kWh, positive and below one million
pub fn is_valid_energy(value: f64) -> bool {
    is_positive(value) && value < 1_000_000.0
}

/// Watts, positive and below ten million
pub fn is_valid_power(value: f64) -> bool {
    is_positive(value) && value < 10_000_000.0
}

pub fn is_valid_efficiency(value: f64) -> bool {
    is_valid_percentage(value)
}

/// °C
pub fn is_valid_temperature(value: f64) -> bool {
    is_in_range(value, -50.0, 150.0)
}

pub fn is_valid_voltage(value: f64) -> bool {
    is_in_range(value, 0.0, 1000.0)
}

pub fn is_valid_current(value: f64) -> bool {
    is_in_range(value, 0.0, 100.0)
}

pub fn is_valid_monetary(value: f64) -> bool {
    is_non_negative(value) && value < 1_000_000_000.0
}

pub fn email_error(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        Some("Email é obrigatório")
    } else if !is_valid_email(email) {
        Some("Email inválido")
    } else {
        None
    }
}

pub fn password_error(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some("Senha é obrigatória")
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some("Senha deve ter no mínimo 8 caracteres")
    } else if !is_valid_password(password) {
        Some("Senha deve conter letra maiúscula, minúscula e número")
    } else {
        None
    }
}

pub fn cpf_error(cpf: &str) -> Option<&'static str> {
    if cpf.is_empty() {
        Some("CPF é obrigatório")
    } else if !is_valid_cpf(cpf) {
        Some("CPF inválido")
    } else {
        None
    }
}

pub fn cnpj_error(cnpj: &str) -> Option<&'static str> {
    if cnpj.is_empty() {
        Some("CNPJ é obrigatório")
    } else if !is_valid_cnpj(cnpj) {
        Some("CNPJ inválido")
    } else {
        None
    }
}

pub fn phone_error(phone: &str) -> Option<&'static str> {
    if phone.is_empty() {
        Some("Telefone é obrigatório")
    } else if !is_valid_phone(phone) {
        Some("Telefone inválido")
    } else {
        None
    }
}

pub fn cep_error(cep: &str) -> Option<&'static str> {
    if cep.is_empty() {
        Some("CEP é obrigatório")
    } else if !is_valid_cep(cep) {
        Some("CEP inválido")
    } else {
        None
    }
}

/// Turn a field message into a validation error
pub fn require(field: &str, message: Option<&str>) -> Result<()> {
    match message {
        Some(message) => Err(Error::invalid_field(field, message)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        for re in [&*EMAIL_RE, &*PHONE_RE, &*TIME_RE, &*SERIAL_RE] {
            assert!(!re.as_str().is_empty());
        }
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.com.br"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@@example.com"));
    }

    #[test]
    fn test_password() {
        assert!(is_valid_password("Abcdef12"));
        assert!(!is_valid_password("abcdefgh"));
        assert!(!is_valid_password("ABCDEFG1"));
        assert!(!is_valid_password("Abc12"));
        assert!(!is_valid_password("Abcd\nef12"));
    }

    #[test]
    fn test_cpf() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(is_valid_cpf("52998224725"));
        assert!(!is_valid_cpf("529.982.247-24"));
        assert!(!is_valid_cpf("111.111.111-11"));
        assert!(!is_valid_cpf("00000000000"));
        assert!(!is_valid_cpf("5299822472"));
    }

    #[test]
    fn test_cnpj() {
        assert!(is_valid_cnpj("11.222.333/0001-81"));
        assert!(is_valid_cnpj("11222333000181"));
        assert!(!is_valid_cnpj("11.222.333/0001-80"));
        assert!(!is_valid_cnpj("22222222222222"));
        assert!(!is_valid_cnpj("1122233300018"));
    }

    #[test]
    fn test_phone_and_cep() {
        assert!(is_valid_phone("(11) 98765-4321"));
        assert!(is_valid_phone("(11) 3456-7890"));
        assert!(!is_valid_phone("(01) 98765-4321"));
        assert!(!is_valid_phone("98765-4321"));
        assert!(is_valid_cep("01310-100"));
        assert!(!is_valid_cep("0131-100"));
    }

    #[test]
    fn test_dates_and_times() {
        assert!(is_valid_date("2024-02-29"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("2024-13-01"));
        assert!(!is_valid_date("2024-1-01"));
        assert!(!is_valid_date("+2024-01-01"));

        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert!(is_future_date_from("2024-06-16", today));
        assert!(!is_future_date_from("2024-06-15", today));
        assert!(is_past_date_from("2024-06-14", today));
        assert!(!is_past_date_from("2024-06-15", today));
        assert!(!is_past_date_from("not-a-date", today));

        assert!(is_valid_time("00:00"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("9:30"));
    }

    #[test]
    fn test_strings() {
        assert!(!is_not_empty("   "));
        assert!(is_not_empty(" a "));
        assert!(has_min_length("abc", 3));
        assert!(!has_max_length("abcd", 3));
        assert!(passwords_match("Abcdef12", "Abcdef12"));
        assert!(!passwords_match("", ""));
        assert!(is_valid_serial_number("INV-2024-001"));
        assert!(!is_valid_serial_number("inv-2024"));
        assert!(!is_valid_serial_number("AB1"));
        assert!(is_valid_url("https://example.com/path?q=1"));
        assert!(!is_valid_url("example.com"));
    }

    #[test]
    fn test_numeric_ranges() {
        assert!(!is_positive(0.0));
        assert!(is_non_negative(0.0));
        assert!(!is_non_negative(f64::NAN));
        assert!(is_valid_percentage(100.0));
        assert!(!is_valid_percentage(100.1));
        assert!(!is_valid_energy(1_000_000.0));
        assert!(is_valid_power(9_999_999.0));
        assert!(is_valid_temperature(-50.0));
        assert!(!is_valid_temperature(151.0));
        assert!(is_valid_voltage(1000.0));
        assert!(!is_valid_current(-1.0));
        assert!(is_valid_monetary(0.0));
        assert!(!is_valid_monetary(1e9));
        assert!(!is_valid_efficiency(f64::NAN));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(email_error(""), Some("Email é obrigatório"));
        assert_eq!(email_error("x"), Some("Email inválido"));
        assert_eq!(email_error("ana@example.com"), None);
        assert_eq!(password_error("Abc1"), Some("Senha deve ter no mínimo 8 caracteres"));
        assert_eq!(
            password_error("abcdefgh"),
            Some("Senha deve conter letra maiúscula, minúscula e número")
        );
        assert_eq!(cpf_error("529.982.247-24"), Some("CPF inválido"));
        assert_eq!(cnpj_error(""), Some("CNPJ é obrigatório"));
        assert_eq!(phone_error("123"), Some("Telefone inválido"));
        assert_eq!(cep_error(""), Some("CEP é obrigatório"));
    }

    #[test]
    fn test_require_maps_to_field_error() {
        let err = require("email", email_error("x")).unwrap_err();
        assert!(matches!(err, Error::Validation { field: Some(ref f), .. } if f == "email"));
        assert!(require("email", None).is_ok());
    }
}
