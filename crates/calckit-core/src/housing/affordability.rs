use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::locale::Locale;
use crate::time_value::annuity_present_value;
use crate::types::{
    percent_to_rate, with_metadata, CheckedArith, ComputationOutput, Money, Percent, Rate,
};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub annual_income: Money,
    /// Existing monthly debt service (car loans, cards, ...).
    #[serde(default)]
    pub monthly_debt: Money,
    #[serde(default)]
    pub down_payment: Money,
    pub annual_rate_pct: Percent,
    pub term_years: u32,
    /// Maximum debt-to-income ratio as a decimal (0.43 = 43%).
    pub max_dti_ratio: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub max_monthly_housing_payment: Money,
    pub max_loan_amount: Money,
    pub max_home_price: Money,
    /// Debt-to-income after the housing payment, in percent.
    pub resulting_dti_pct: Percent,
    /// Loan-to-value at the maximum price, in percent.
    pub resulting_ltv_pct: Percent,
}

impl AffordabilityInput {
    /// Fill the DTI ceiling from the locale's lending conventions.
    pub fn for_locale(
        locale: Locale,
        annual_income: Money,
        monthly_debt: Money,
        down_payment: Money,
        annual_rate_pct: Percent,
        term_years: u32,
    ) -> Self {
        AffordabilityInput {
            annual_income,
            monthly_debt,
            down_payment,
            annual_rate_pct,
            term_years,
            max_dti_ratio: locale.profile().max_dti_ratio,
        }
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Largest loan and home price an income supports under a DTI ceiling.
pub fn compute_affordability(
    input: &AffordabilityInput,
) -> CalcResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    validate_input(input)?;

    tracing::debug!(
        annual_income = %input.annual_income,
        monthly_debt = %input.monthly_debt,
        max_dti_ratio = %input.max_dti_ratio,
        "computing affordability"
    );

    let monthly_income = input.annual_income / dec!(12);
    // The ceiling is at most 1, so this cannot exceed monthly income.
    let max_monthly_housing_payment = monthly_income * input.max_dti_ratio - input.monthly_debt;

    if max_monthly_housing_payment <= Decimal::ZERO {
        return Err(CalcError::FinancialImpossibility(format!(
            "Existing monthly debt of {} already uses the full {}% debt-to-income allowance",
            input.monthly_debt,
            (input.max_dti_ratio * dec!(100)).normalize()
        )));
    }

    let monthly_rate = percent_to_rate(input.annual_rate_pct) / dec!(12);
    let term_months = input.term_years.checked_mul(12).ok_or_else(|| CalcError::InvalidInput {
        field: "term_years".into(),
        reason: "Loan term is too long".into(),
    })?;

    let max_loan_amount =
        annuity_present_value(max_monthly_housing_payment, monthly_rate, term_months)?;
    let max_home_price = max_loan_amount.add_checked(input.down_payment, "down_payment")?;

    let resulting_dti_pct = (input.monthly_debt + max_monthly_housing_payment)
        .div_checked(monthly_income, "annual_income")?
        .mul_checked(dec!(100), "annual_income")?;
    let resulting_ltv_pct = if input.down_payment > Decimal::ZERO {
        max_loan_amount
            .div_checked(max_home_price, "down_payment")?
            .mul_checked(dec!(100), "down_payment")?
    } else {
        dec!(100)
    };

    let output = AffordabilityOutput {
        max_monthly_housing_payment,
        max_loan_amount,
        max_home_price,
        resulting_dti_pct,
        resulting_ltv_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "DTI-constrained affordability: inverted amortizing payment",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

fn validate_input(input: &AffordabilityInput) -> CalcResult<()> {
    if input.annual_income <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "annual_income".into(),
            reason: "Annual income must be positive".into(),
        });
    }
    if input.monthly_debt < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "monthly_debt".into(),
            reason: "Monthly debt cannot be negative".into(),
        });
    }
    if input.down_payment < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "down_payment".into(),
            reason: "Down payment cannot be negative".into(),
        });
    }
    if input.annual_rate_pct < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if input.term_years == 0 {
        return Err(CalcError::InvalidInput {
            field: "term_years".into(),
            reason: "Loan term must be at least 1 year".into(),
        });
    }
    if input.max_dti_ratio <= Decimal::ZERO || input.max_dti_ratio > Decimal::ONE {
        return Err(CalcError::InvalidInput {
            field: "max_dti_ratio".into(),
            reason: "DTI ceiling must be between 0 (exclusive) and 1".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_value::amortizing_payment;

    fn sample() -> AffordabilityInput {
        AffordabilityInput {
            annual_income: dec!(120_000),
            monthly_debt: dec!(500),
            down_payment: dec!(60_000),
            annual_rate_pct: dec!(6),
            term_years: 30,
            max_dti_ratio: dec!(0.43),
        }
    }

    #[test]
    fn test_housing_capacity() {
        let out = compute_affordability(&sample()).unwrap().result;
        // 10,000 * 0.43 - 500 = 3,800
        assert_eq!(out.max_monthly_housing_payment, dec!(3800));
        assert_eq!(out.max_home_price, out.max_loan_amount + dec!(60_000));
        assert_eq!(out.resulting_dti_pct, dec!(43));
    }

    #[test]
    fn test_loan_amount_services_at_capacity() {
        let out = compute_affordability(&sample()).unwrap().result;
        let pmt = amortizing_payment(out.max_loan_amount, dec!(0.005), 360).unwrap();
        assert!((pmt - dec!(3800)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_ltv_with_down_payment() {
        let out = compute_affordability(&sample()).unwrap().result;
        let expected = out.max_loan_amount / out.max_home_price * dec!(100);
        assert_eq!(out.resulting_ltv_pct, expected);
        assert!(out.resulting_ltv_pct < dec!(100));
    }

    #[test]
    fn test_ltv_without_down_payment() {
        let mut input = sample();
        input.down_payment = Decimal::ZERO;
        let out = compute_affordability(&input).unwrap().result;
        assert_eq!(out.resulting_ltv_pct, dec!(100));
        assert_eq!(out.max_home_price, out.max_loan_amount);
    }

    #[test]
    fn test_zero_rate() {
        let mut input = sample();
        input.annual_rate_pct = Decimal::ZERO;
        let out = compute_affordability(&input).unwrap().result;
        assert_eq!(out.max_loan_amount, dec!(3800) * dec!(360));
    }

    #[test]
    fn test_debt_exhausts_allowance() {
        let mut input = sample();
        input.monthly_debt = dec!(4300);
        match compute_affordability(&input).unwrap_err() {
            CalcError::FinancialImpossibility(msg) => assert!(msg.contains("43%")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_for_locale_uses_profile_ceiling() {
        let input = AffordabilityInput::for_locale(
            Locale::Ko,
            dec!(60_000_000),
            Decimal::ZERO,
            dec!(100_000_000),
            dec!(4),
            30,
        );
        assert_eq!(input.max_dti_ratio, dec!(0.40));
        let out = compute_affordability(&input).unwrap().result;
        assert_eq!(out.max_monthly_housing_payment, dec!(2_000_000));
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let mut input = sample();
        input.annual_income = Decimal::ZERO;
        assert!(compute_affordability(&input).is_err());

        let mut input = sample();
        input.term_years = 0;
        assert!(compute_affordability(&input).is_err());

        let mut input = sample();
        input.max_dti_ratio = dec!(1.5);
        assert!(compute_affordability(&input).is_err());
    }

    #[test]
    fn test_amounts_beyond_decimal_range_are_errors() {
        let mut input = sample();
        input.annual_income = Decimal::MAX;
        input.annual_rate_pct = Decimal::ZERO;
        assert!(matches!(
            compute_affordability(&input).unwrap_err(),
            CalcError::InvalidInput { .. }
        ));

        let mut input = sample();
        input.down_payment = Decimal::MAX;
        match compute_affordability(&input).unwrap_err() {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "down_payment"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
