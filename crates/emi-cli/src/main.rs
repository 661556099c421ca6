mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::{CalculateArgs, ScheduleArgs};

/// Loan EMI and amortization calculations
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan EMI and amortization calculations",
    long_about = "A CLI for computing the equated monthly installment (EMI), total amount \
                  payable and total interest of a fixed-rate loan, using decimal \
                  arithmetic and a month-by-month amortization schedule."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate EMI, total amount payable and total interest
    Calculate(CalculateArgs),
    /// Print the month-by-month amortization schedule
    Schedule(ScheduleArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::loan::run_calculate(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
