use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::payment::LoanInput;
use crate::time_value::amortizing_payment;
use crate::types::{with_metadata, CheckedArith, ComputationOutput, Money};
use crate::CalcResult;

/// One year (or the final partial year) of an amortisation schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub payments: u32,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub ending_balance: Money,
}

/// Year-by-year breakdown of how each level payment splits between
/// interest and principal.
pub fn amortization_schedule(
    input: &LoanInput,
) -> CalcResult<ComputationOutput<Vec<AmortizationYear>>> {
    let start = Instant::now();
    input.validate()?;

    let monthly_rate = input.monthly_rate();
    let payment = amortizing_payment(input.principal, monthly_rate, input.term_months)?;
    // Every running total below is bounded by the lifetime payments.
    payment.mul_checked(Decimal::from(input.term_months), "principal")?;

    tracing::debug!(
        term_months = input.term_months,
        payment = %payment,
        "building amortization schedule"
    );

    let mut rows: Vec<AmortizationYear> = Vec::new();
    let mut balance = input.principal;
    let mut current = AmortizationYear {
        year: 1,
        payments: 0,
        interest_paid: Decimal::ZERO,
        principal_paid: Decimal::ZERO,
        ending_balance: balance,
    };

    for month in 1..=input.term_months {
        let interest = balance * monthly_rate;
        // The last payment absorbs accumulated rounding so the loan closes at zero.
        let principal_part = if month == input.term_months {
            balance
        } else {
            (payment - interest).min(balance)
        };
        balance -= principal_part;

        current.payments += 1;
        current.interest_paid += interest;
        current.principal_paid += principal_part;
        current.ending_balance = balance;

        if month % 12 == 0 || month == input.term_months {
            let next_year = current.year + 1;
            rows.push(current);
            current = AmortizationYear {
                year: next_year,
                payments: 0,
                interest_paid: Decimal::ZERO,
                principal_paid: Decimal::ZERO,
                ending_balance: balance,
            };
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Amortization schedule (annual summary of monthly payments)",
        input,
        Vec::new(),
        elapsed,
        rows,
    ))
}
