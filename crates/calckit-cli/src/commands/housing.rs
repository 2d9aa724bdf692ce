use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calckit_core::housing::affordability::{compute_affordability, AffordabilityInput};
use calckit_core::Locale;

use super::{to_value, CommandResult};
use crate::input;

/// Arguments for home affordability
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross annual income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Existing monthly debt payments
    #[arg(long, default_value = "0")]
    pub monthly_debt: Decimal,

    /// Cash available for the down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Mortgage rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Mortgage term in years
    #[arg(long, default_value_t = 30)]
    pub years: u32,

    /// Debt-to-income ceiling as a ratio (defaults to the locale's: en 0.43, ko 0.40)
    #[arg(long)]
    pub max_dti: Option<Decimal>,
}

pub fn run_affordability(args: AffordabilityArgs, locale: Locale) -> CommandResult {
    let default_dti = locale.profile().max_dti_ratio;

    let affordability_input: AffordabilityInput = match input::load::<Value>(args.input.as_deref())? {
        Some(mut loaded) => {
            // Documents may leave the ceiling to the locale.
            if let Value::Object(map) = &mut loaded {
                map.entry("max_dti_ratio")
                    .or_insert_with(|| Value::String(default_dti.to_string()));
            }
            serde_json::from_value(loaded)?
        }
        None => AffordabilityInput {
            annual_income: args.income.ok_or("--income is required (or provide --input)")?,
            monthly_debt: args.monthly_debt,
            down_payment: args.down_payment,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_years: args.years,
            max_dti_ratio: args.max_dti.unwrap_or(default_dti),
        },
    };
    to_value(&compute_affordability(&affordability_input)?)
}
