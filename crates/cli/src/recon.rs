//! `rdesk recon` — config-driven residual vs wireline reconciliation.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use residesk_recon::engine::{load_residual_rows, load_wireline_rows};
use residesk_recon::model::{ReconInput, ReconResult};
use residesk_recon::ReconConfig;

use crate::exit_codes::{EXIT_RECON_INVALID_CONFIG, EXIT_RECON_MISMATCH, EXIT_RECON_RUNTIME};
use crate::CliError;

#[derive(Subcommand)]
pub enum ReconCommands {
    /// Run reconciliation from a TOML config file
    #[command(after_help = "\
Examples:
  rdesk recon run residuals.recon.toml
  rdesk recon run residuals.recon.toml --json
  rdesk recon run residuals.recon.toml --output result.json
  rdesk recon run residuals.recon.toml --show-unmerged")]
    Run {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Bypass matching: emit every row standalone (audit mode)
        #[arg(long)]
        show_unmerged: bool,
    },

    /// Validate a recon config without running
    #[command(after_help = "\
Examples:
  rdesk recon validate residuals.recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },
}

pub fn cmd_recon(cmd: ReconCommands) -> Result<(), CliError> {
    match cmd {
        ReconCommands::Run { config, json, output, show_unmerged } => {
            cmd_recon_run(config, json, output, show_unmerged)
        }
        ReconCommands::Validate { config } => cmd_recon_validate(config),
    }
}

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn load_input(config: &ReconConfig, base_dir: &Path) -> Result<ReconInput, CliError> {
    let residual_path = base_dir.join(&config.feeds.residual.file);
    let residual_csv = std::fs::read_to_string(&residual_path).map_err(|e| {
        recon_err(EXIT_RECON_RUNTIME, format!("cannot read {}: {e}", residual_path.display()))
    })?;

    let wireline_path = base_dir.join(&config.feeds.wireline.file);
    let wireline_csv = std::fs::read_to_string(&wireline_path).map_err(|e| {
        recon_err(EXIT_RECON_RUNTIME, format!("cannot read {}: {e}", wireline_path.display()))
    })?;

    Ok(ReconInput {
        residuals: load_residual_rows(&residual_csv, &config.feeds.residual.columns)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, e.to_string()))?,
        wirelines: load_wireline_rows(&wireline_csv, &config.feeds.wireline.columns)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, e.to_string()))?,
    })
}

fn cmd_recon_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    show_unmerged: bool,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot read config: {e}")))?;

    let mut config = ReconConfig::from_toml(&config_str)
        .map_err(|e| recon_err(EXIT_RECON_INVALID_CONFIG, e.to_string()))?;
    if show_unmerged {
        config.options.show_unmerged = true;
    }

    // Feed paths resolve relative to the config file's directory.
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let input = load_input(&config, base_dir)?;

    let result = residesk_recon::run(&config, &input);

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file.or_else(|| config.output.json.clone().map(PathBuf::from)) {
        std::fs::write(path, &json_str)
            .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    eprintln!("{}", summary_line(&result));

    if result.summary.all_balanced {
        Ok(())
    } else {
        Err(recon_err(EXIT_RECON_MISMATCH, "unbalanced accounts found"))
    }
}

fn summary_line(result: &ReconResult) -> String {
    let s = &result.summary;
    format!(
        "recon '{}': {} account(s) — {} merged ({} auto), {} standalone, {}/{} balanced, residual {:.2} vs wireline {:.2}",
        result.meta.config_name,
        s.accounts,
        s.merged,
        s.auto_merged,
        s.residual_only + s.wireline_only,
        s.balanced_accounts,
        s.balanced_accounts + s.unbalanced_accounts,
        s.total_residual,
        s.total_wireline,
    )
}

fn cmd_recon_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| recon_err(EXIT_RECON_RUNTIME, format!("cannot read config: {e}")))?;

    match ReconConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: recon '{}' (residual: {}, wireline: {})",
                config.name, config.feeds.residual.file, config.feeds.wireline.file,
            );
            Ok(())
        }
        Err(e) => Err(recon_err(EXIT_RECON_INVALID_CONFIG, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use residesk_recon::model::{ReconMeta, ReconSummary};

    #[test]
    fn summary_line_reads_like_an_operator_report() {
        let result = ReconResult {
            meta: ReconMeta {
                config_name: "Monthly".into(),
                engine_version: "0.0.0".into(),
                run_at: "2026-08-01T00:00:00Z".into(),
                show_unmerged: false,
                tolerance: 0.01,
            },
            summary: ReconSummary {
                accounts: 3,
                merged: 4,
                auto_merged: 2,
                residual_only: 1,
                wireline_only: 1,
                balanced_accounts: 2,
                unbalanced_accounts: 1,
                all_balanced: false,
                total_residual: 350.0,
                total_wireline: 360.0,
            },
            groups: vec![],
        };
        let line = summary_line(&result);
        assert!(line.contains("'Monthly'"));
        assert!(line.contains("4 merged (2 auto)"));
        assert!(line.contains("2/3 balanced"));
        assert!(line.contains("350.00"));
    }
}
