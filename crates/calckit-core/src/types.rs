use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::CalcResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Rates as entered on a form, in percentage points (4.5 = 4.5%).
pub type Percent = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    for warning in &warnings {
        tracing::warn!(methodology, %warning, "calculation warning");
    }
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Convert percentage points to a decimal rate (4.5 -> 0.045).
pub fn percent_to_rate(pct: Percent) -> Rate {
    pct / Decimal::ONE_HUNDRED
}

/// Overflow-checked arithmetic for values derived from caller input.
///
/// `Decimal`'s operators panic when a result leaves its 96-bit range;
/// these report the offending input field instead.
pub trait CheckedArith: Sized {
    fn mul_checked(self, rhs: Decimal, field: &str) -> CalcResult<Decimal>;
    fn div_checked(self, rhs: Decimal, field: &str) -> CalcResult<Decimal>;
    fn add_checked(self, rhs: Decimal, field: &str) -> CalcResult<Decimal>;
    fn sub_checked(self, rhs: Decimal, field: &str) -> CalcResult<Decimal>;
}

impl CheckedArith for Decimal {
    fn mul_checked(self, rhs: Decimal, field: &str) -> CalcResult<Decimal> {
        self.checked_mul(rhs).ok_or_else(|| out_of_range(field))
    }

    fn div_checked(self, rhs: Decimal, field: &str) -> CalcResult<Decimal> {
        if rhs.is_zero() {
            return Err(CalcError::DivisionByZero {
                context: field.to_string(),
            });
        }
        self.checked_div(rhs).ok_or_else(|| out_of_range(field))
    }

    fn add_checked(self, rhs: Decimal, field: &str) -> CalcResult<Decimal> {
        self.checked_add(rhs).ok_or_else(|| out_of_range(field))
    }

    fn sub_checked(self, rhs: Decimal, field: &str) -> CalcResult<Decimal> {
        self.checked_sub(rhs).ok_or_else(|| out_of_range(field))
    }
}

/// Sum without panicking on overflow.
pub fn checked_sum<I: IntoIterator<Item = Decimal>>(values: I, field: &str) -> CalcResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.add_checked(v, field))
}

fn out_of_range(field: &str) -> CalcError {
    CalcError::InvalidInput {
        field: field.to_string(),
        reason: "Value is too large to calculate with".into(),
    }
}
