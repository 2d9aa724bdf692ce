use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, CheckedArith, ComputationOutput, Money, Percent};
use crate::CalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipInput {
    pub bill_amount: Money,
    pub tip_pct: Percent,
    #[serde(default = "default_people")]
    pub people: u32,
}

fn default_people() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipOutput {
    pub tip_amount: Money,
    pub total_amount: Money,
    pub per_person_total: Money,
    pub per_person_tip: Money,
}

/// Tip on a bill and each diner's share.
pub fn split_bill(input: &TipInput) -> CalcResult<ComputationOutput<TipOutput>> {
    let start = Instant::now();

    if input.bill_amount <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "bill_amount".into(),
            reason: "Bill amount must be positive".into(),
        });
    }
    if input.tip_pct < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "tip_pct".into(),
            reason: "Tip percentage cannot be negative".into(),
        });
    }
    if input.people == 0 {
        return Err(CalcError::InvalidInput {
            field: "people".into(),
            reason: "At least one person must share the bill".into(),
        });
    }

    tracing::debug!(bill = %input.bill_amount, tip_pct = %input.tip_pct, people = input.people, "splitting bill");

    let people = Decimal::from(input.people);
    let tip_amount = input.bill_amount.mul_checked(input.tip_pct / dec!(100), "tip_pct")?;
    let total_amount = input.bill_amount.add_checked(tip_amount, "bill_amount")?;

    let output = TipOutput {
        tip_amount,
        total_amount,
        per_person_total: total_amount.div_checked(people, "people")?,
        per_person_tip: tip_amount.div_checked(people, "people")?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Tip = bill * pct / 100, split evenly",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}
