use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calckit_core::payroll::net_pay::{compute_net_pay_with_table, PayBasis, PayrollInput};
use calckit_core::payroll::rates::{PayPeriod, PayrollTable};
use calckit_core::{Jurisdiction, Locale};

use super::{serde_enum, to_value, CommandResult};
use crate::input;

/// Arguments for net pay estimation
#[derive(Args)]
pub struct PayrollArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross pay amount
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Unit of --amount: annual, monthly or hourly (defaults to --period)
    #[arg(long, value_parser = serde_enum::<PayBasis>)]
    pub basis: Option<PayBasis>,

    /// Period to report: monthly or annual
    #[arg(long, value_parser = serde_enum::<PayPeriod>, default_value = "monthly")]
    pub period: PayPeriod,

    /// KR or US (defaults to the locale's)
    #[arg(long)]
    pub jurisdiction: Option<Jurisdiction>,

    /// Weekly hours for hourly wages
    #[arg(long)]
    pub hours: Option<Decimal>,

    /// Deduction table file replacing the built-in rates
    #[arg(long)]
    pub rates: Option<String>,
}

/// Arguments for printing a deduction table
#[derive(Args)]
pub struct RatesArgs {
    /// KR or US (defaults to the locale's)
    #[arg(long)]
    pub jurisdiction: Option<Jurisdiction>,
}

pub fn run_payroll(args: PayrollArgs, locale: Locale) -> CommandResult {
    let default_jurisdiction = args.jurisdiction.unwrap_or(locale.profile().jurisdiction);

    let payroll_input: PayrollInput = match input::load::<Value>(args.input.as_deref())? {
        Some(mut loaded) => {
            if let Value::Object(map) = &mut loaded {
                map.entry("jurisdiction")
                    .or_insert_with(|| serde_json::json!(default_jurisdiction));
            }
            serde_json::from_value(loaded)?
        }
        None => PayrollInput {
            amount: args.amount.ok_or("--amount is required (or provide --input)")?,
            basis: args.basis,
            period: args.period,
            jurisdiction: default_jurisdiction,
            weekly_hours: args.hours,
        },
    };

    let table = match args.rates.as_deref() {
        Some(path) => {
            let table: PayrollTable = input::file::read_document(path)?;
            tracing::info!(path, jurisdiction = %table.jurisdiction, "using custom deduction table");
            table
        }
        None => PayrollTable::for_jurisdiction(payroll_input.jurisdiction),
    };

    to_value(&compute_net_pay_with_table(&payroll_input, &table)?)
}

pub fn run_rates(args: RatesArgs, locale: Locale) -> CommandResult {
    let jurisdiction = args.jurisdiction.unwrap_or(locale.profile().jurisdiction);
    to_value(&PayrollTable::for_jurisdiction(jurisdiction))
}
