use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, CheckedArith, ComputationOutput};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PercentKind {
    /// b% of a
    Basic,
    /// a as a percentage of b
    Ratio,
    /// Percentage change from a to b
    Change,
    /// a after a b% discount
    Discount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Increase,
    Decrease,
    Unchanged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentInput {
    pub kind: PercentKind,
    pub a: Decimal,
    pub b: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentOutput {
    pub result: Decimal,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<ChangeDirection>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn compute_percent(input: &PercentInput) -> CalcResult<ComputationOutput<PercentOutput>> {
    let start = Instant::now();
    let (a, b) = (input.a, input.b);

    tracing::debug!(kind = ?input.kind, a = %a, b = %b, "computing percentage");

    let (methodology, output) = match input.kind {
        PercentKind::Basic => {
            let result = a.mul_checked(b / dec!(100), "a")?;
            (
                "a * b / 100",
                PercentOutput {
                    result,
                    explanation: format!("{}% of {} is {}", show(b), show(a), show(result)),
                    direction: None,
                },
            )
        }
        PercentKind::Ratio => {
            if b.is_zero() {
                return Err(CalcError::DivisionByZero {
                    context: "ratio: the reference value b is zero".into(),
                });
            }
            let result = a.div_checked(b, "a")?.mul_checked(dec!(100), "a")?;
            (
                "a / b * 100",
                PercentOutput {
                    result,
                    explanation: format!("{} is {:.2}% of {}", show(a), result, show(b)),
                    direction: None,
                },
            )
        }
        PercentKind::Change => {
            if a.is_zero() {
                return Err(CalcError::DivisionByZero {
                    context: "change: the starting value a is zero".into(),
                });
            }
            let result = b
                .sub_checked(a, "b")?
                .div_checked(a, "b")?
                .mul_checked(dec!(100), "b")?;
            let direction = if result > Decimal::ZERO {
                ChangeDirection::Increase
            } else if result < Decimal::ZERO {
                ChangeDirection::Decrease
            } else {
                ChangeDirection::Unchanged
            };
            let explanation = match direction {
                ChangeDirection::Unchanged => format!("{} to {} is unchanged", show(a), show(b)),
                ChangeDirection::Increase => {
                    format!("{} to {} is a {:.2}% increase", show(a), show(b), result.abs())
                }
                ChangeDirection::Decrease => {
                    format!("{} to {} is a {:.2}% decrease", show(a), show(b), result.abs())
                }
            };
            (
                "(b - a) / a * 100",
                PercentOutput {
                    result,
                    explanation,
                    direction: Some(direction),
                },
            )
        }
        PercentKind::Discount => {
            let result = a.sub_checked(a.mul_checked(b / dec!(100), "a")?, "a")?;
            (
                "a - a * b / 100",
                PercentOutput {
                    result,
                    explanation: format!(
                        "{} with a {}% discount is {}",
                        show(a),
                        show(b),
                        show(result)
                    ),
                    direction: None,
                },
            )
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, Vec::new(), elapsed, output))
}

fn show(value: Decimal) -> String {
    value.normalize().to_string()
}
