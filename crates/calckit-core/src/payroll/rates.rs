//! Statutory payroll deduction tables.
//!
//! Rates and caps are data: a table lists the deductions of one
//! jurisdiction in evaluation order, so next year's figures only require a
//! new table (built here or loaded from JSON), never a change to
//! [`super::net_pay`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::CalcError;
use crate::locale::Jurisdiction;
use crate::types::{CheckedArith, Money, Rate};
use crate::CalcResult;

/// Pay period an amount refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPeriod {
    #[default]
    Monthly,
    Annual,
}

impl PayPeriod {
    pub fn periods_per_year(self) -> Decimal {
        match self {
            PayPeriod::Monthly => dec!(12),
            PayPeriod::Annual => Decimal::ONE,
        }
    }

    /// Re-express an amount quoted per `self` as an amount per `target`.
    pub fn convert(self, amount: Money, target: PayPeriod) -> CalcResult<Money> {
        amount
            .mul_checked(self.periods_per_year(), "amount")?
            .div_checked(target.periods_per_year(), "amount")
    }
}

/// What a deduction's rate is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "of")]
pub enum DeductionBase {
    /// Gross pay for the table's basis period.
    Gross,
    /// Gross pay less the named, previously computed deductions.
    GrossLess(Vec<String>),
    /// Another, previously computed deduction (surtaxes).
    Deduction(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionRule {
    pub name: String,
    pub rate: Rate,
    pub base: DeductionBase,
    /// Statutory ceiling on the deduction itself, per basis period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTable {
    pub jurisdiction: Jurisdiction,
    /// Period on which the rates and caps are defined.
    pub basis: PayPeriod,
    pub rules: Vec<DeductionRule>,
}

impl PayrollTable {
    pub fn for_jurisdiction(jurisdiction: Jurisdiction) -> Self {
        match jurisdiction {
            Jurisdiction::Kr => Self::korea(),
            Jurisdiction::Us => Self::united_states(),
        }
    }

    /// Four social insurances plus a simplified flat income tax, per month.
    pub fn korea() -> Self {
        PayrollTable {
            jurisdiction: Jurisdiction::Kr,
            basis: PayPeriod::Monthly,
            rules: vec![
                DeductionRule {
                    name: "national_pension".into(),
                    rate: dec!(0.045),
                    base: DeductionBase::Gross,
                    cap: Some(dec!(248_850)),
                },
                DeductionRule {
                    name: "health_insurance".into(),
                    rate: dec!(0.0354),
                    base: DeductionBase::Gross,
                    cap: None,
                },
                DeductionRule {
                    name: "employment_insurance".into(),
                    rate: dec!(0.009),
                    base: DeductionBase::Gross,
                    cap: None,
                },
                DeductionRule {
                    name: "income_tax".into(),
                    rate: dec!(0.06),
                    base: DeductionBase::GrossLess(vec![
                        "national_pension".into(),
                        "health_insurance".into(),
                        "employment_insurance".into(),
                    ]),
                    cap: None,
                },
                DeductionRule {
                    name: "local_income_tax".into(),
                    rate: dec!(0.10),
                    base: DeductionBase::Deduction("income_tax".into()),
                    cap: None,
                },
            ],
        }
    }

    /// Flat federal and state approximations plus FICA, per year.
    pub fn united_states() -> Self {
        PayrollTable {
            jurisdiction: Jurisdiction::Us,
            basis: PayPeriod::Annual,
            rules: vec![
                DeductionRule {
                    name: "federal_income_tax".into(),
                    rate: dec!(0.12),
                    base: DeductionBase::Gross,
                    cap: None,
                },
                DeductionRule {
                    name: "state_income_tax".into(),
                    rate: dec!(0.05),
                    base: DeductionBase::Gross,
                    cap: None,
                },
                // 6.2% of the 160,200 wage base
                DeductionRule {
                    name: "social_security".into(),
                    rate: dec!(0.062),
                    base: DeductionBase::Gross,
                    cap: Some(dec!(9_932.40)),
                },
                DeductionRule {
                    name: "medicare".into(),
                    rate: dec!(0.0145),
                    base: DeductionBase::Gross,
                    cap: None,
                },
            ],
        }
    }

    /// Reject tables the evaluator cannot apply in a single ordered pass.
    pub fn validate(&self) -> CalcResult<()> {
        if self.rules.is_empty() {
            return Err(CalcError::invalid("rules", "Payroll table has no deductions"));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for rule in &self.rules {
            if rule.name.trim().is_empty() {
                return Err(CalcError::invalid("rules", "Deduction name cannot be empty"));
            }
            if rule.rate < Decimal::ZERO || rule.rate > Decimal::ONE {
                return Err(CalcError::InvalidInput {
                    field: format!("rules.{}.rate", rule.name),
                    reason: "Rate must be between 0 and 1".into(),
                });
            }
            if matches!(rule.cap, Some(cap) if cap < Decimal::ZERO) {
                return Err(CalcError::InvalidInput {
                    field: format!("rules.{}.cap", rule.name),
                    reason: "Cap cannot be negative".into(),
                });
            }

            let references: Vec<&String> = match &rule.base {
                DeductionBase::Gross => Vec::new(),
                DeductionBase::GrossLess(names) => names.iter().collect(),
                DeductionBase::Deduction(name) => vec![name],
            };
            for reference in references {
                if !seen.contains(reference.as_str()) {
                    return Err(CalcError::InvalidInput {
                        field: format!("rules.{}.base", rule.name),
                        reason: format!("'{reference}' must be defined before it is referenced"),
                    });
                }
            }

            if !seen.insert(rule.name.as_str()) {
                return Err(CalcError::InvalidInput {
                    field: format!("rules.{}", rule.name),
                    reason: "Duplicate deduction name".into(),
                });
            }
        }
        Ok(())
    }
}
