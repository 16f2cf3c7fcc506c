pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use shopquote_core::config::{AppConfig, LoadOptions};
use std::process::ExitCode;

use crate::commands::quote::QuoteArgs;

#[derive(Debug, Parser)]
#[command(
    name = "shopquote",
    about = "Repair service quote calculator",
    long_about = "Price repair services on-site or in-shop, with extra charges, surcharge, and discount.",
    after_help = "Examples:\n  shopquote quote --select kit-basico=2 --location in-shop\n  shopquote quote --select reparo --apply-surcharge --discount 10 --summary\n  shopquote catalog\n  shopquote config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Calculate a quote and return the result as structured output")]
    Quote(QuoteArgs),
    #[command(about = "List the effective service catalog with prices per location")]
    Catalog,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        if let Err(error) = logging::init_logging(&config) {
            eprintln!("{error:#}");
        }
    }

    let result = match cli.command {
        Command::Quote(args) => commands::quote::run(args),
        Command::Catalog => commands::catalog::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
