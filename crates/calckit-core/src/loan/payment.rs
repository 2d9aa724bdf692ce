use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::time_value::amortizing_payment;
use crate::types::{
    percent_to_rate, with_metadata, CheckedArith, ComputationOutput, Money, Percent, Rate,
};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A fixed-rate, fully amortising loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    /// Nominal annual rate in percentage points (4.5 = 4.5%).
    pub annual_rate_pct: Percent,
    pub term_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOutput {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub monthly_rate: Rate,
}

impl LoanInput {
    /// Build an input from a term quoted in whole years.
    pub fn from_years(principal: Money, annual_rate_pct: Percent, years: u32) -> Self {
        LoanInput {
            principal,
            annual_rate_pct,
            term_months: years.saturating_mul(12),
        }
    }

    pub fn monthly_rate(&self) -> Rate {
        percent_to_rate(self.annual_rate_pct) / dec!(12)
    }

    pub(crate) fn validate(&self) -> CalcResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(CalcError::InvalidInput {
                field: "principal".into(),
                reason: "Loan principal must be positive".into(),
            });
        }
        if self.annual_rate_pct < Decimal::ZERO {
            return Err(CalcError::InvalidInput {
                field: "annual_rate_pct".into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }
        if self.term_months == 0 {
            return Err(CalcError::InvalidInput {
                field: "term_months".into(),
                reason: "Term must be at least 1 month".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Level monthly payment, total cost and total interest of an amortising loan.
pub fn compute_loan_payment(input: &LoanInput) -> CalcResult<ComputationOutput<LoanOutput>> {
    let start = Instant::now();
    input.validate()?;

    tracing::debug!(
        principal = %input.principal,
        annual_rate_pct = %input.annual_rate_pct,
        term_months = input.term_months,
        "computing loan payment"
    );

    let monthly_rate = input.monthly_rate();
    let monthly_payment = amortizing_payment(input.principal, monthly_rate, input.term_months)?;
    let total_paid = monthly_payment.mul_checked(Decimal::from(input.term_months), "principal")?;
    let total_interest = total_paid - input.principal;

    let output = LoanOutput {
        monthly_payment,
        total_paid,
        total_interest,
        monthly_rate,
    };

    let methodology = if monthly_rate.is_zero() {
        "Interest-free loan: principal / term"
    } else {
        "Amortizing annuity: P * r(1+r)^n / ((1+r)^n - 1)"
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, Vec::new(), elapsed, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LoanInput {
        LoanInput {
            principal: dec!(200_000),
            annual_rate_pct: dec!(6),
            term_months: 360,
        }
    }

    #[test]
    fn test_thirty_year_mortgage() {
        // 200k at 6% over 30 years: ~1,199.10/month
        let out = compute_loan_payment(&sample()).unwrap().result;
        assert!((out.monthly_payment - dec!(1199.10)).abs() < dec!(0.01));
        assert_eq!(out.monthly_rate, dec!(0.005));
    }

    #[test]
    fn test_totals_are_consistent() {
        let out = compute_loan_payment(&sample()).unwrap().result;
        assert_eq!(out.total_paid, out.monthly_payment * dec!(360));
        assert_eq!(out.total_interest, out.total_paid - dec!(200_000));
        assert!(out.total_interest > Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_is_straight_division() {
        let input = LoanInput {
            principal: dec!(1_000_000),
            annual_rate_pct: Decimal::ZERO,
            term_months: 8,
        };
        let out = compute_loan_payment(&input).unwrap();
        assert_eq!(out.result.monthly_payment, dec!(125_000));
        assert_eq!(out.result.total_interest, Decimal::ZERO);
        assert!(out.methodology.starts_with("Interest-free"));
    }

    #[test]
    fn test_principal_beyond_decimal_range_is_rejected() {
        let input = LoanInput {
            principal: Decimal::MAX,
            annual_rate_pct: Decimal::ZERO,
            term_months: 1,
        };
        assert!(compute_loan_payment(&input).is_ok());

        let input = LoanInput {
            principal: Decimal::MAX,
            annual_rate_pct: dec!(12),
            term_months: 360,
        };
        match compute_loan_payment(&input).unwrap_err() {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_years() {
        let input = LoanInput::from_years(dec!(10_000), dec!(5), 3);
        assert_eq!(input.term_months, 36);
    }

    #[test]
    fn test_rejects_non_positive_principal() {
        let mut input = sample();
        input.principal = Decimal::ZERO;
        match compute_loan_payment(&input).unwrap_err() {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_negative_rate() {
        let mut input = sample();
        input.annual_rate_pct = dec!(-0.5);
        assert!(compute_loan_payment(&input).is_err());
    }

    #[test]
    fn test_rejects_zero_term() {
        let mut input = sample();
        input.term_months = 0;
        match compute_loan_payment(&input).unwrap_err() {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
