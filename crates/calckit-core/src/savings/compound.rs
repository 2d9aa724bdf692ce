use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::time_value::{annuity_future_value, growth_factor};
use crate::types::{
    percent_to_rate, with_metadata, CheckedArith, ComputationOutput, Money, Percent, Years,
};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How often accrued interest is added to the balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundingFrequency {
    Annually,
    Quarterly,
    #[default]
    Monthly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Annually => 1,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Daily => 365,
        }
    }
}

impl TryFrom<u32> for CompoundingFrequency {
    type Error = CalcError;

    fn try_from(periods: u32) -> Result<Self, Self::Error> {
        match periods {
            1 => Ok(CompoundingFrequency::Annually),
            4 => Ok(CompoundingFrequency::Quarterly),
            12 => Ok(CompoundingFrequency::Monthly),
            365 => Ok(CompoundingFrequency::Daily),
            other => Err(CalcError::InvalidInput {
                field: "frequency".into(),
                reason: format!("{other} periods per year is not supported (use 1, 4, 12 or 365)"),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInput {
    pub principal: Money,
    pub annual_rate_pct: Percent,
    pub years: Years,
    #[serde(default)]
    pub frequency: CompoundingFrequency,
    #[serde(default)]
    pub monthly_contribution: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundOutput {
    pub future_value: Money,
    pub total_contributed: Money,
    pub total_interest_earned: Money,
    pub simple_interest_comparison: Money,
    pub compound_advantage: Money,
    /// Interest earned as a percentage of everything paid in.
    pub return_on_contributions_pct: Percent,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Future value of a lump sum plus an optional stream of deposits, with a
/// simple-interest comparison figure.
pub fn compute_compound_growth(
    input: &CompoundInput,
) -> CalcResult<ComputationOutput<CompoundOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    tracing::debug!(
        principal = %input.principal,
        annual_rate_pct = %input.annual_rate_pct,
        years = %input.years,
        frequency = ?input.frequency,
        "computing compound growth"
    );

    let rate = percent_to_rate(input.annual_rate_pct);
    let n = Decimal::from(input.frequency.periods_per_year());
    let rate_per_period = rate / n;
    let periods = n.mul_checked(input.years, "years")?;
    let contribution = input.monthly_contribution;

    let lump_sum = input
        .principal
        .mul_checked(growth_factor(rate_per_period, periods)?, "principal")?;

    // Deposits share the compounding period's rate basis.
    let annuity = if contribution > Decimal::ZERO {
        annuity_future_value(contribution, rate_per_period, periods)?
    } else {
        Decimal::ZERO
    };

    let future_value = lump_sum.add_checked(annuity, "monthly_contribution")?;
    let deposits = contribution
        .mul_checked(dec!(12), "monthly_contribution")?
        .mul_checked(input.years, "monthly_contribution")?;
    let total_contributed = input.principal.add_checked(deposits, "principal")?;
    let total_interest_earned = future_value - total_contributed;

    // Heuristic comparison figure: linear growth on the principal, and
    // contributions credited with half the horizon's simple interest on
    // average. Not a textbook identity.
    let simple_growth = rate.mul_checked(input.years, "years")?;
    let principal_simple = input
        .principal
        .mul_checked(simple_growth.add_checked(Decimal::ONE, "years")?, "principal")?;
    let deposits_simple =
        deposits.mul_checked(Decimal::ONE + simple_growth / dec!(2), "monthly_contribution")?;
    let simple_interest_comparison =
        principal_simple.add_checked(deposits_simple, "monthly_contribution")?;
    let compound_advantage = future_value - simple_interest_comparison;

    if contribution > Decimal::ZERO && input.frequency != CompoundingFrequency::Monthly {
        warnings.push(format!(
            "Contributions are applied once per compounding period ({} per year), \
             while total contributions assume 12 deposits per year",
            input.frequency.periods_per_year()
        ));
    }
    if compound_advantage < Decimal::ZERO {
        warnings.push(format!(
            "Simple-interest comparison exceeds compound growth by {}; \
             the comparison is an approximation",
            compound_advantage.abs().round_dp(2)
        ));
    }

    let return_on_contributions_pct = total_interest_earned
        .div_checked(total_contributed, "principal")?
        .mul_checked(dec!(100), "principal")?;

    let output = CompoundOutput {
        future_value,
        total_contributed,
        total_interest_earned,
        simple_interest_comparison,
        compound_advantage,
        return_on_contributions_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Compound growth: P(1+r/n)^(nt) + PMT((1+r/n)^(nt) - 1)/(r/n)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_input(input: &CompoundInput) -> CalcResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if input.annual_rate_pct <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Interest rate must be positive".into(),
        });
    }
    if input.years <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "years".into(),
            reason: "Investment horizon must be positive".into(),
        });
    }
    if input.monthly_contribution < Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "monthly_contribution".into(),
            reason: "Monthly contribution cannot be negative".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lump(frequency: CompoundingFrequency) -> CompoundInput {
        CompoundInput {
            principal: dec!(10_000),
            annual_rate_pct: dec!(5),
            years: dec!(10),
            frequency,
            monthly_contribution: Decimal::ZERO,
        }
    }

    #[test]
    fn test_annual_compounding_lump_sum() {
        // 10,000 * 1.05^10 = 16,288.95
        let out = compute_compound_growth(&lump(CompoundingFrequency::Annually))
            .unwrap()
            .result;
        assert!((out.future_value - dec!(16288.95)).abs() < dec!(0.01));
        assert_eq!(out.total_contributed, dec!(10_000));
        assert_eq!(out.simple_interest_comparison, dec!(15_000));
        assert!(out.compound_advantage > Decimal::ZERO);
    }

    #[test]
    fn test_monthly_contributions_positive_advantage() {
        let input = CompoundInput {
            principal: dec!(1000),
            annual_rate_pct: dec!(5),
            years: dec!(10),
            frequency: CompoundingFrequency::Monthly,
            monthly_contribution: dec!(100),
        };
        let out = compute_compound_growth(&input).unwrap();
        let r = &out.result;
        // 1000*(1+0.05/12)^120 + 100*((1+0.05/12)^120 - 1)/(0.05/12) ≈ 17,175.24
        assert!((r.future_value - dec!(17175.24)).abs() < dec!(0.01));
        assert_eq!(r.total_contributed, dec!(13_000));
        // 1000*1.5 + 12000*1.25
        assert_eq!(r.simple_interest_comparison, dec!(16_500));
        assert!(r.compound_advantage > Decimal::ZERO);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_annual_frequency_with_contributions_warns() {
        let input = CompoundInput {
            principal: dec!(1000),
            annual_rate_pct: dec!(5),
            years: dec!(10),
            frequency: CompoundingFrequency::Annually,
            monthly_contribution: dec!(100),
        };
        let out = compute_compound_growth(&input).unwrap();
        // One deposit per year undershoots the 12-per-year comparison.
        assert!(out.result.compound_advantage < Decimal::ZERO);
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_return_on_contributions() {
        let out = compute_compound_growth(&lump(CompoundingFrequency::Annually))
            .unwrap()
            .result;
        let expected = out.total_interest_earned / dec!(10_000) * dec!(100);
        assert_eq!(out.return_on_contributions_pct, expected);
    }

    #[test]
    fn test_frequency_from_periods() {
        assert_eq!(
            CompoundingFrequency::try_from(365).unwrap(),
            CompoundingFrequency::Daily
        );
        assert!(CompoundingFrequency::try_from(2).is_err());
    }

    #[test]
    fn test_validation() {
        let mut input = lump(CompoundingFrequency::Monthly);
        input.principal = Decimal::ZERO;
        assert!(compute_compound_growth(&input).is_err());

        let mut input = lump(CompoundingFrequency::Monthly);
        input.annual_rate_pct = Decimal::ZERO;
        assert!(compute_compound_growth(&input).is_err());

        let mut input = lump(CompoundingFrequency::Monthly);
        input.years = dec!(-1);
        assert!(compute_compound_growth(&input).is_err());

        let mut input = lump(CompoundingFrequency::Monthly);
        input.monthly_contribution = dec!(-5);
        assert!(compute_compound_growth(&input).is_err());
    }

    #[test]
    fn test_frequency_deserializes_lowercase() {
        let input: CompoundInput = serde_json::from_str(
            r#"{"principal":"100","annual_rate_pct":"3","years":"2","frequency":"quarterly"}"#,
        )
        .unwrap();
        assert_eq!(input.frequency, CompoundingFrequency::Quarterly);
        assert_eq!(input.monthly_contribution, Decimal::ZERO);
    }

    #[test]
    fn test_growth_beyond_decimal_range_is_an_error() {
        let input = CompoundInput {
            principal: dec!(100_000_000_000_000_000_000),
            annual_rate_pct: dec!(100),
            years: dec!(30),
            frequency: CompoundingFrequency::Annually,
            monthly_contribution: Decimal::ZERO,
        };
        match compute_compound_growth(&input).unwrap_err() {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("unexpected error: {other}"),
        }

        let input = CompoundInput {
            monthly_contribution: Decimal::MAX,
            ..lump(CompoundingFrequency::Monthly)
        };
        assert!(compute_compound_growth(&input).is_err());
    }
}
