// residesk CLI - headless residual reconciliation and comp calculation

mod comp;
mod exit_codes;
mod recon;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Structured CLI failure: exit code plus operator-facing message.
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Parser)]
#[command(name = "rdesk")]
#[command(about = "Residual reconciliation desk (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Config-driven residual vs wireline reconciliation
    #[command(subcommand)]
    Recon(recon::ReconCommands),

    /// Expected-compensation calculator over a won-services CSV
    Comp(comp::CompArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Recon(cmd) => recon::cmd_recon(cmd),
        Commands::Comp(args) => comp::cmd_comp(args),
    };

    match result {
        Ok(()) => ExitCode::from(exit_codes::EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(ref hint) = e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}
