use clap::Args;
use rust_decimal::Decimal;

use calckit_core::savings::compound::{compute_compound_growth, CompoundInput, CompoundingFrequency};

use super::{serde_enum, to_value, CommandResult};
use crate::input;

/// Arguments for compound growth
#[derive(Args)]
pub struct CompoundArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Initial deposit
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Investment horizon in years (fractions allowed)
    #[arg(long)]
    pub years: Option<Decimal>,

    /// annually, quarterly, monthly or daily
    #[arg(long, value_parser = serde_enum::<CompoundingFrequency>, conflicts_with = "periods_per_year")]
    pub frequency: Option<CompoundingFrequency>,

    /// Compounding periods per year (1, 4, 12 or 365)
    #[arg(long)]
    pub periods_per_year: Option<u32>,

    /// Deposit added every month
    #[arg(long, default_value = "0")]
    pub monthly_contribution: Decimal,
}

pub fn run_compound(args: CompoundArgs) -> CommandResult {
    let compound_input: CompoundInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => {
            let frequency = match (args.frequency, args.periods_per_year) {
                (Some(f), _) => f,
                (None, Some(n)) => CompoundingFrequency::try_from(n)?,
                (None, None) => CompoundingFrequency::default(),
            };
            CompoundInput {
                principal: args
                    .principal
                    .ok_or("--principal is required (or provide --input)")?,
                annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
                years: args.years.ok_or("--years is required (or provide --input)")?,
                frequency,
                monthly_contribution: args.monthly_contribution,
            }
        }
    };
    to_value(&compute_compound_growth(&compound_input)?)
}
