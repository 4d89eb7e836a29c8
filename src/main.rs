use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xrate::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_code(s: &str) -> Result<String, String> {
    let code = s.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(format!("`{s}` is not a three-letter currency code"))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount from one currency to another
    Convert {
        amount: f64,
        #[arg(value_parser = parse_code)]
        from: String,
        #[arg(value_parser = parse_code)]
        to: String,
    },
    /// Display the exchange rates currently in effect
    Rates {
        /// Currency to express the rates against
        #[arg(short, long, value_parser = parse_code)]
        base: Option<String>,
    },
    /// List supported currency codes
    Codes,
}

impl From<Commands> for xrate::AppCommand {
    fn from(cmd: Commands) -> xrate::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => {
                xrate::AppCommand::Convert { amount, from, to }
            }
            Commands::Rates { base } => xrate::AppCommand::Rates { base },
            Commands::Codes => xrate::AppCommand::Codes,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xrate::cli::setup::setup(),
        Some(cmd) => xrate::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
