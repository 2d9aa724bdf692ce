use clap::Args;
use rust_decimal::Decimal;

use calckit_core::percent::operations::{compute_percent, PercentInput, PercentKind};
use calckit_core::percent::tip::{split_bill, TipInput};

use super::{serde_enum, to_value, CommandResult};
use crate::input;

/// Arguments for percentage operations
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PercentArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// basic (b% of a), ratio (a as % of b), change (a to b) or discount (a less b%)
    #[arg(long, value_parser = serde_enum::<PercentKind>, default_value = "basic")]
    pub kind: PercentKind,

    /// First operand
    #[arg(long)]
    pub a: Option<Decimal>,

    /// Second operand
    #[arg(long)]
    pub b: Option<Decimal>,
}

/// Arguments for tip and bill splitting
#[derive(Args)]
pub struct TipArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Bill before tip
    #[arg(long)]
    pub bill: Option<Decimal>,

    /// Tip in percent
    #[arg(long, default_value = "15")]
    pub tip: Decimal,

    /// Number of people sharing the bill
    #[arg(long, default_value_t = 1)]
    pub people: u32,
}

pub fn run_percent(args: PercentArgs) -> CommandResult {
    let percent_input: PercentInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => PercentInput {
            kind: args.kind,
            a: args.a.ok_or("--a is required (or provide --input)")?,
            b: args.b.ok_or("--b is required (or provide --input)")?,
        },
    };
    to_value(&compute_percent(&percent_input)?)
}

pub fn run_tip(args: TipArgs) -> CommandResult {
    let tip_input: TipInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => TipInput {
            bill_amount: args.bill.ok_or("--bill is required (or provide --input)")?,
            tip_pct: args.tip,
            people: args.people,
        },
    };
    to_value(&split_bill(&tip_input)?)
}
