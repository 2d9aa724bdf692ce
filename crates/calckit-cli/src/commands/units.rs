use clap::Args;
use rust_decimal::Decimal;

use calckit_core::units::conversion::{convert_units, ConversionInput, Unit, UnitCategory};

use super::{serde_enum, to_value, CommandResult};
use crate::input;

/// Arguments for unit conversion
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ConvertArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// length, weight or temperature (inferred from --from when omitted)
    #[arg(long, value_parser = serde_enum::<UnitCategory>)]
    pub category: Option<UnitCategory>,

    /// Source unit (km, lb, fahrenheit, ...)
    #[arg(long)]
    pub from: Option<String>,

    /// Target unit
    #[arg(long)]
    pub to: Option<String>,

    /// Quantity to convert
    #[arg(long)]
    pub value: Option<Decimal>,
}

pub fn run_convert(args: ConvertArgs) -> CommandResult {
    let conversion: ConversionInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => {
            let from = args.from.ok_or("--from is required (or provide --input)")?;
            let category = match args.category {
                Some(category) => category,
                None => from.parse::<Unit>()?.category(),
            };
            ConversionInput {
                category,
                from,
                to: args.to.ok_or("--to is required (or provide --input)")?,
                value: args.value.ok_or("--value is required (or provide --input)")?,
            }
        }
    };
    to_value(&convert_units(&conversion)?)
}
