//! Validate command - run a form validator against a value

use anyhow::Result;
use clap::ValueEnum;
use helios_core::validators;

use crate::output;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Kind {
    Email,
    Password,
    Cpf,
    Cnpj,
    Phone,
    Cep,
    Url,
    Date,
    Time,
    Serial,
    Percentage,
    Efficiency,
    Temperature,
    Voltage,
}

pub fn run(kind: Kind, value: &str) -> Result<()> {
    match check(kind, value) {
        None => {
            output::success("Válido");
            Ok(())
        }
        Some(message) => anyhow::bail!("{}", message),
    }
}

/// Error message for `value`, `None` when it passes
fn check(kind: Kind, value: &str) -> Option<String> {
    let message = match kind {
        Kind::Email => validators::email_error(value),
        Kind::Password => validators::password_error(value),
        Kind::Cpf => validators::cpf_error(value),
        Kind::Cnpj => validators::cnpj_error(value),
        Kind::Phone => validators::phone_error(value),
        Kind::Cep => validators::cep_error(value),
        Kind::Url => (!validators::is_valid_url(value)).then_some("URL inválida"),
        Kind::Date => (!validators::is_valid_date(value)).then_some("Data inválida"),
        Kind::Time => (!validators::is_valid_time(value)).then_some("Horário inválido"),
        Kind::Serial => {
            (!validators::is_valid_serial_number(value)).then_some("Número de série inválido")
        }
        Kind::Percentage | Kind::Efficiency | Kind::Temperature | Kind::Voltage => {
            return check_number(kind, value);
        }
    };
    message.map(str::to_string)
}

fn check_number(kind: Kind, value: &str) -> Option<String> {
    let Ok(number) = value.trim().parse::<f64>() else {
        return Some(format!("Número inválido: {}", value));
    };
    let valid = match kind {
        Kind::Percentage => validators::is_valid_percentage(number),
        Kind::Efficiency => validators::is_valid_efficiency(number),
        Kind::Temperature => validators::is_valid_temperature(number),
        Kind::Voltage => validators::is_valid_voltage(number),
        _ => true,
    };
    (!valid).then(|| format!("Valor fora do intervalo: {}", number))
}
