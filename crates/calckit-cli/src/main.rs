mod commands;
mod input;
mod logging;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use calckit_core::Locale;
use commands::dates::AgeArgs;
use commands::health::BmiArgs;
use commands::housing::AffordabilityArgs;
use commands::loan::LoanArgs;
use commands::payroll::{PayrollArgs, RatesArgs};
use commands::percent::{PercentArgs, TipArgs};
use commands::savings::CompoundArgs;
use commands::units::ConvertArgs;

/// Everyday financial, health and unit calculations
#[derive(Parser)]
#[command(
    name = "calckit",
    version,
    about = "Everyday financial, health and unit calculations",
    long_about = "A CLI for loan, savings, affordability, payroll, percentage, unit, \
                  age and BMI calculations with decimal precision. Korean and US \
                  conventions are selected with --locale."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Locale whose lending and payroll conventions apply (en, ko)
    #[arg(long, default_value = "en", global = true)]
    locale: Locale,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Level monthly payment and total interest of a loan
    Loan(LoanArgs),
    /// Year-by-year amortization schedule
    Schedule(LoanArgs),
    /// Compound growth of a deposit with optional monthly contributions
    Compound(CompoundArgs),
    /// Maximum loan and home price under a debt-to-income ceiling
    Affordability(AffordabilityArgs),
    /// Net pay after statutory deductions
    Payroll(PayrollArgs),
    /// Print a built-in payroll deduction table
    Rates(RatesArgs),
    /// Percentage of, ratio, change and discount
    Percent(PercentArgs),
    /// Tip and per-person bill split
    Tip(TipArgs),
    /// Convert length, weight or temperature
    Convert(ConvertArgs),
    /// Age under international, traditional and calendar-year counting
    Age(AgeArgs),
    /// Body-mass index
    Bmi(BmiArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: commands::CommandResult = match cli.command {
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Compound(args) => commands::savings::run_compound(args),
        Commands::Affordability(args) => commands::housing::run_affordability(args, cli.locale),
        Commands::Payroll(args) => commands::payroll::run_payroll(args, cli.locale),
        Commands::Rates(args) => commands::payroll::run_rates(args, cli.locale),
        Commands::Percent(args) => commands::percent::run_percent(args),
        Commands::Tip(args) => commands::percent::run_tip(args),
        Commands::Convert(args) => commands::units::run_convert(args),
        Commands::Age(args) => commands::dates::run_age(args),
        Commands::Bmi(args) => commands::health::run_bmi(args),
        Commands::Version => {
            println!("calckit {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
