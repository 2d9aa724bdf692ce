pub mod dates;
pub mod health;
pub mod housing;
pub mod loan;
pub mod payroll;
pub mod percent;
pub mod savings;
pub mod units;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub type CommandResult = Result<Value, Box<dyn std::error::Error>>;

/// clap value parser for the core's serde enums (`monthly`, `discount`, ...).
pub fn serde_enum<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(Value::String(s.trim().to_string()))
        .map_err(|_| format!("unrecognised value '{s}'"))
}

pub fn to_value<T: Serialize>(output: &T) -> CommandResult {
    Ok(serde_json::to_value(output)?)
}
