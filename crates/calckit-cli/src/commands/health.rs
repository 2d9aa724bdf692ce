use clap::Args;
use rust_decimal::Decimal;

use calckit_core::health::bmi::{compute_bmi, BmiInput};

use super::{to_value, CommandResult};
use crate::input;

/// Arguments for body-mass index
#[derive(Args)]
pub struct BmiArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Height in centimetres
    #[arg(long, conflicts_with = "feet")]
    pub height_cm: Option<Decimal>,

    /// Weight in kilograms
    #[arg(long, conflicts_with = "weight_lb")]
    pub weight_kg: Option<Decimal>,

    /// Height, whole feet
    #[arg(long)]
    pub feet: Option<Decimal>,

    /// Height, remaining inches
    #[arg(long, default_value = "0")]
    pub inches: Decimal,

    /// Weight in pounds
    #[arg(long)]
    pub weight_lb: Option<Decimal>,
}

pub fn run_bmi(args: BmiArgs) -> CommandResult {
    let bmi_input: BmiInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => match (args.height_cm, args.feet) {
            (Some(height_cm), _) => BmiInput::Metric {
                height_cm,
                weight_kg: args
                    .weight_kg
                    .ok_or("--weight-kg is required with --height-cm")?,
            },
            (None, Some(feet)) => BmiInput::Imperial {
                feet,
                inches: args.inches,
                weight_lb: args.weight_lb.ok_or("--weight-lb is required with --feet")?,
            },
            (None, None) => {
                return Err("--height-cm or --feet is required (or provide --input)".into())
            }
        },
    };
    to_value(&compute_bmi(&bmi_input)?)
}
