use chrono::NaiveDate;
use clap::Args;

use calckit_core::dates::age::{calculate_age, calculate_age_today, AgeInput};

use super::{to_value, CommandResult};
use crate::input;

/// Arguments for age calculation
#[derive(Args)]
pub struct AgeArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Birth year
    #[arg(long)]
    pub year: Option<i32>,

    /// Birth month (1-12)
    #[arg(long)]
    pub month: Option<u32>,

    /// Birth day of month
    #[arg(long)]
    pub day: Option<u32>,

    /// Reference date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_age(args: AgeArgs) -> CommandResult {
    let age_input: AgeInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => AgeInput {
            year: args.year.ok_or("--year is required (or provide --input)")?,
            month: args.month.ok_or("--month is required (or provide --input)")?,
            day: args.day.ok_or("--day is required (or provide --input)")?,
        },
    };
    let output = match args.as_of {
        Some(today) => calculate_age(&age_input, today)?,
        None => calculate_age_today(&age_input)?,
    };
    to_value(&output)
}
