use clap::Args;
use rust_decimal::Decimal;

use calckit_core::loan::payment::{compute_loan_payment, LoanInput};
use calckit_core::loan::schedule::amortization_schedule;

use super::{to_value, CommandResult};
use crate::input;

/// Arguments shared by `loan` and `schedule`
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (4.5 = 4.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long, conflicts_with = "months")]
    pub years: Option<u32>,

    /// Term in months
    #[arg(long)]
    pub months: Option<u32>,
}

fn build_input(args: LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if let Some(loaded) = input::load(args.input.as_deref())? {
        return Ok(loaded);
    }
    let term_months = match (args.months, args.years) {
        (Some(months), _) => months,
        (None, Some(years)) => years
            .checked_mul(12)
            .ok_or("--years is too large")?,
        (None, None) => return Err("--years or --months is required (or provide --input)".into()),
    };
    Ok(LoanInput {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
        term_months,
    })
}

pub fn run_loan(args: LoanArgs) -> CommandResult {
    let loan = build_input(args)?;
    to_value(&compute_loan_payment(&loan)?)
}

pub fn run_schedule(args: LoanArgs) -> CommandResult {
    let loan = build_input(args)?;
    to_value(&amortization_schedule(&loan)?)
}
