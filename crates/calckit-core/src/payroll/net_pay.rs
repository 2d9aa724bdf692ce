use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

use super::rates::{DeductionBase, PayPeriod, PayrollTable};
use crate::error::CalcError;
use crate::locale::Jurisdiction;
use crate::types::{checked_sum, with_metadata, CheckedArith, ComputationOutput, Money, Percent};
use crate::CalcResult;

const DEFAULT_WEEKLY_HOURS: Decimal = dec!(40);
const WEEKS_PER_YEAR: Decimal = dec!(52);
const HOURS_PER_WEEK_LIMIT: Decimal = dec!(168);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Unit the entered amount is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayBasis {
    Annual,
    Monthly,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollInput {
    pub amount: Money,
    /// Unit of `amount`; when absent, `amount` is already gross pay per `period`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<PayBasis>,
    /// Period the result is reported in.
    #[serde(default)]
    pub period: PayPeriod,
    pub jurisdiction: Jurisdiction,
    /// Used for hourly wages only; defaults to 40.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_hours: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionLine {
    pub name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollOutput {
    pub jurisdiction: Jurisdiction,
    pub period: PayPeriod,
    pub gross_pay: Money,
    pub deductions: Vec<DeductionLine>,
    pub total_deductions: Money,
    pub net_pay: Money,
    pub effective_deduction_rate_pct: Percent,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Net pay under the built-in table for the input's jurisdiction.
pub fn compute_net_pay(input: &PayrollInput) -> CalcResult<ComputationOutput<PayrollOutput>> {
    compute_net_pay_with_table(input, &PayrollTable::for_jurisdiction(input.jurisdiction))
}

/// Net pay under an explicit deduction table.
pub fn compute_net_pay_with_table(
    input: &PayrollInput,
    table: &PayrollTable,
) -> CalcResult<ComputationOutput<PayrollOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if table.jurisdiction != input.jurisdiction {
        return Err(CalcError::InvalidInput {
            field: "jurisdiction".into(),
            reason: format!(
                "Table is for {} but the input asks for {}",
                table.jurisdiction, input.jurisdiction
            ),
        });
    }
    table.validate()?;

    let gross_pay = gross_for_period(input)?;

    tracing::debug!(
        jurisdiction = %input.jurisdiction,
        period = ?input.period,
        gross_pay = %gross_pay,
        "computing net pay"
    );

    // Rates and caps are defined on the table's basis period.
    let basis_gross = input.period.convert(gross_pay, table.basis)?;
    let mut computed: HashMap<&str, Money> = HashMap::new();
    let mut deductions: Vec<DeductionLine> = Vec::with_capacity(table.rules.len());

    for rule in &table.rules {
        let base = match &rule.base {
            DeductionBase::Gross => basis_gross,
            DeductionBase::GrossLess(names) => {
                let less = checked_sum(names.iter().map(|n| prior(&computed, n)), "amount")?;
                (basis_gross - less).max(Decimal::ZERO)
            }
            DeductionBase::Deduction(name) => prior(&computed, name),
        };

        let mut amount = base.mul_checked(rule.rate, "amount")?;
        if let Some(cap) = rule.cap {
            if amount > cap {
                warnings.push(format!(
                    "{} capped at the statutory ceiling of {} per {}",
                    rule.name,
                    cap,
                    period_label(table.basis)
                ));
                amount = cap;
            }
        }

        computed.insert(rule.name.as_str(), amount);
        deductions.push(DeductionLine {
            name: rule.name.clone(),
            amount: table.basis.convert(amount, input.period)?,
        });
    }

    let total_deductions = checked_sum(deductions.iter().map(|d| d.amount), "amount")?;
    let net_pay = gross_pay.sub_checked(total_deductions, "amount")?;
    let effective_deduction_rate_pct = total_deductions
        .div_checked(gross_pay, "amount")?
        .mul_checked(dec!(100), "amount")?;

    let output = PayrollOutput {
        jurisdiction: input.jurisdiction,
        period: input.period,
        gross_pay,
        deductions,
        total_deductions,
        net_pay,
        effective_deduction_rate_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!("Payroll withholding ({} table)", table.jurisdiction),
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Gross pay for the requested period, derived from the entered basis.
pub fn gross_for_period(input: &PayrollInput) -> CalcResult<Money> {
    if input.amount <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "amount".into(),
            reason: "Pay amount must be positive".into(),
        });
    }

    let gross = match (input.basis, input.period) {
        (None, _)
        | (Some(PayBasis::Monthly), PayPeriod::Monthly)
        | (Some(PayBasis::Annual), PayPeriod::Annual) => input.amount,
        (Some(PayBasis::Annual), PayPeriod::Monthly) => input.amount / dec!(12),
        (Some(PayBasis::Monthly), PayPeriod::Annual) => input.amount.mul_checked(dec!(12), "amount")?,
        (Some(PayBasis::Hourly), period) => {
            let hours = input.weekly_hours.unwrap_or(DEFAULT_WEEKLY_HOURS);
            if hours <= Decimal::ZERO || hours > HOURS_PER_WEEK_LIMIT {
                return Err(CalcError::InvalidInput {
                    field: "weekly_hours".into(),
                    reason: "Weekly hours must be between 0 (exclusive) and 168".into(),
                });
            }
            let annual = input
                .amount
                .mul_checked(hours, "amount")?
                .mul_checked(WEEKS_PER_YEAR, "amount")?;
            PayPeriod::Annual.convert(annual, period)?
        }
    };

    Ok(gross)
}

// `PayrollTable::validate` guarantees every reference was computed earlier.
fn prior(computed: &HashMap<&str, Money>, name: &str) -> Money {
    computed.get(name).copied().unwrap_or_default()
}

fn period_label(period: PayPeriod) -> &'static str {
    match period {
        PayPeriod::Monthly => "month",
        PayPeriod::Annual => "year",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kr_monthly(amount: Money) -> PayrollInput {
        PayrollInput {
            amount,
            basis: None,
            period: PayPeriod::Monthly,
            jurisdiction: Jurisdiction::Kr,
            weekly_hours: None,
        }
    }

    fn line(out: &PayrollOutput, name: &str) -> Money {
        out.deductions
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.amount)
            .unwrap()
    }

    #[test]
    fn test_korea_monthly() {
        let out = compute_net_pay(&kr_monthly(dec!(3_000_000))).unwrap();
        let r = &out.result;
        assert_eq!(line(r, "national_pension"), dec!(135_000));
        assert_eq!(line(r, "health_insurance"), dec!(106_200));
        assert_eq!(line(r, "employment_insurance"), dec!(27_000));
        // (3,000,000 - 268,200) * 6%
        assert_eq!(line(r, "income_tax"), dec!(163_908));
        assert_eq!(line(r, "local_income_tax"), dec!(16_390.8));
        assert_eq!(r.total_deductions, dec!(448_498.8));
        assert_eq!(r.net_pay, dec!(2_551_501.2));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_korea_pension_cap() {
        let out = compute_net_pay(&kr_monthly(dec!(10_000_000))).unwrap();
        assert_eq!(line(&out.result, "national_pension"), dec!(248_850));
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("national_pension"));
    }

    #[test]
    fn test_korea_annual_scales_monthly_lines() {
        let input = PayrollInput {
            amount: dec!(36_000_000),
            basis: None,
            period: PayPeriod::Annual,
            jurisdiction: Jurisdiction::Kr,
            weekly_hours: None,
        };
        let r = compute_net_pay(&input).unwrap().result;
        assert_eq!(r.gross_pay, dec!(36_000_000));
        assert_eq!(line(&r, "national_pension"), dec!(1_620_000));
        assert_eq!(r.total_deductions, dec!(5_381_985.6));
        assert_eq!(r.net_pay, dec!(30_618_014.4));
    }

    #[test]
    fn test_us_annual() {
        let input = PayrollInput {
            amount: dec!(60_000),
            basis: None,
            period: PayPeriod::Annual,
            jurisdiction: Jurisdiction::Us,
            weekly_hours: None,
        };
        let r = compute_net_pay(&input).unwrap().result;
        let expected = vec![
            DeductionLine { name: "federal_income_tax".into(), amount: dec!(7200) },
            DeductionLine { name: "state_income_tax".into(), amount: dec!(3000) },
            DeductionLine { name: "social_security".into(), amount: dec!(3720) },
            DeductionLine { name: "medicare".into(), amount: dec!(870) },
        ];
        assert_eq!(r.deductions, expected);
        assert_eq!(r.net_pay, dec!(45_210));
    }

    #[test]
    fn test_us_monthly_from_annual_salary() {
        let input = PayrollInput {
            amount: dec!(60_000),
            basis: Some(PayBasis::Annual),
            period: PayPeriod::Monthly,
            jurisdiction: Jurisdiction::Us,
            weekly_hours: None,
        };
        let r = compute_net_pay(&input).unwrap().result;
        assert_eq!(r.gross_pay, dec!(5000));
        assert_eq!(line(&r, "federal_income_tax"), dec!(600));
        assert_eq!(r.total_deductions, dec!(1232.5));
        assert_eq!(r.net_pay, dec!(3767.5));
    }

    #[test]
    fn test_us_social_security_cap() {
        let input = PayrollInput {
            amount: dec!(200_000),
            basis: None,
            period: PayPeriod::Annual,
            jurisdiction: Jurisdiction::Us,
            weekly_hours: None,
        };
        let out = compute_net_pay(&input).unwrap();
        assert_eq!(line(&out.result, "social_security"), dec!(9932.40));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_hourly_wage_conversion() {
        let input = PayrollInput {
            amount: dec!(30),
            basis: Some(PayBasis::Hourly),
            period: PayPeriod::Annual,
            jurisdiction: Jurisdiction::Us,
            weekly_hours: None,
        };
        // 30 * 40 * 52
        assert_eq!(gross_for_period(&input).unwrap(), dec!(62_400));

        let monthly = PayrollInput {
            period: PayPeriod::Monthly,
            weekly_hours: Some(dec!(30)),
            ..input
        };
        // 30 * 30 * 52 / 12
        assert_eq!(gross_for_period(&monthly).unwrap(), dec!(3900));
    }

    #[test]
    fn test_net_equals_gross_less_deductions() {
        let r = compute_net_pay(&kr_monthly(dec!(4_250_000))).unwrap().result;
        let sum: Money = r.deductions.iter().map(|d| d.amount).sum();
        assert_eq!(r.net_pay, r.gross_pay - sum);
    }

    #[test]
    fn test_custom_table_changes_result() {
        let mut table = PayrollTable::united_states();
        table.rules[1].rate = Decimal::ZERO;
        let input = PayrollInput {
            amount: dec!(60_000),
            basis: None,
            period: PayPeriod::Annual,
            jurisdiction: Jurisdiction::Us,
            weekly_hours: None,
        };
        let r = compute_net_pay_with_table(&input, &table).unwrap().result;
        assert_eq!(r.net_pay, dec!(48_210));
    }

    #[test]
    fn test_mismatched_table_rejected() {
        let err = compute_net_pay_with_table(&kr_monthly(dec!(1)), &PayrollTable::united_states())
            .unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        assert!(compute_net_pay(&kr_monthly(Decimal::ZERO)).is_err());
    }

    #[test]
    fn test_rejects_impossible_hours() {
        let input = PayrollInput {
            amount: dec!(15),
            basis: Some(PayBasis::Hourly),
            period: PayPeriod::Monthly,
            jurisdiction: Jurisdiction::Kr,
            weekly_hours: Some(dec!(200)),
        };
        assert!(compute_net_pay(&input).is_err());
    }

    #[test]
    fn test_amounts_beyond_decimal_range_are_errors() {
        let hourly = PayrollInput {
            amount: Decimal::MAX,
            basis: Some(PayBasis::Hourly),
            period: PayPeriod::Monthly,
            jurisdiction: Jurisdiction::Us,
            weekly_hours: Some(dec!(40)),
        };
        match compute_net_pay(&hourly).unwrap_err() {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "amount"),
            other => panic!("unexpected error: {other}"),
        }

        // The US table is annual, so only a monthly gross has to be scaled up.
        let annual = PayrollInput {
            amount: Decimal::MAX,
            basis: None,
            period: PayPeriod::Annual,
            jurisdiction: Jurisdiction::Us,
            weekly_hours: None,
        };
        assert!(compute_net_pay(&annual).is_ok());

        let monthly = PayrollInput {
            period: PayPeriod::Monthly,
            ..annual
        };
        assert!(compute_net_pay(&monthly).is_err());
    }
}
