//! `rdesk comp` — expected-compensation calculator over a won-services CSV.

use std::path::PathBuf;

use clap::Args;
use serde::{Deserialize, Serialize};

use residesk_recon::comp::{calculate_expected_comp, CompInput, RevenueType};

use crate::exit_codes::{EXIT_COMP_PARSE, EXIT_ERROR, EXIT_USAGE};
use crate::CliError;

#[derive(Args)]
#[command(after_help = "\
Examples:
  rdesk comp won-services.csv
  rdesk comp won-services.csv --assumed-margin 35
  rdesk comp quote-lines.csv --json

Expected CSV headers (missing/empty columns are tolerated):
  service, revenue_type, renewal_type, term, mrr, tcv, margin,
  mrr_uptick, existing_mrr")]
pub struct CompArgs {
    /// Won-services or quote-line CSV
    pub input: PathBuf,

    /// Assumed margin percent for rows without an actual line margin
    #[arg(long)]
    pub assumed_margin: Option<f64>,

    /// Output JSON to stdout instead of one line per row
    #[arg(long)]
    pub json: bool,
}

/// One CSV row. Everything optional: the calculator owns the fallbacks, and
/// a half-filled export must still produce a full report.
#[derive(Debug, Default, Deserialize)]
struct CompRow {
    #[serde(default)]
    service: String,
    #[serde(default)]
    revenue_type: String,
    #[serde(default)]
    renewal_type: Option<String>,
    #[serde(default)]
    term: Option<f64>,
    #[serde(default)]
    mrr: Option<f64>,
    #[serde(default)]
    tcv: Option<f64>,
    #[serde(default)]
    margin: Option<f64>,
    #[serde(default)]
    mrr_uptick: Option<f64>,
    #[serde(default)]
    existing_mrr: Option<f64>,
}

#[derive(Debug, Serialize)]
struct CompLine {
    service: String,
    revenue_type: RevenueType,
    comp: f64,
    explanation: String,
}

#[derive(Debug, Serialize)]
struct CompReport {
    assumed_margin_pct: Option<f64>,
    total_comp: f64,
    lines: Vec<CompLine>,
}

pub fn cmd_comp(args: CompArgs) -> Result<(), CliError> {
    let csv_data = std::fs::read_to_string(&args.input).map_err(|e| CliError {
        code: EXIT_USAGE,
        message: format!("cannot read {}: {e}", args.input.display()),
        hint: None,
    })?;

    let report = build_report(&csv_data, args.assumed_margin).map_err(|message| CliError {
        code: EXIT_COMP_PARSE,
        message,
        hint: Some("expected headers: service, revenue_type, renewal_type, term, mrr, tcv, margin, mrr_uptick, existing_mrr".into()),
    })?;

    if args.json {
        let json_str = serde_json::to_string_pretty(&report).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{json_str}");
    } else {
        for (i, line) in report.lines.iter().enumerate() {
            let label = if line.service.is_empty() {
                format!("row {}", i + 1)
            } else {
                line.service.clone()
            };
            println!("{label}: {:.2} — {}", line.comp, line.explanation);
        }
    }

    eprintln!(
        "comp: {} line(s), total expected comp {:.2}",
        report.lines.len(),
        report.total_comp,
    );

    Ok(())
}

fn build_report(csv_data: &str, assumed_margin_pct: Option<f64>) -> Result<CompReport, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let mut lines = Vec::new();
    let mut total_comp = 0.0;

    for (i, record) in reader.deserialize::<CompRow>().enumerate() {
        let row = record.map_err(|e| format!("row {}: {e}", i + 1))?;
        let revenue_type = RevenueType::parse(&row.revenue_type);

        let item = CompInput {
            revenue_type,
            renewal_type: row.renewal_type,
            term: row.term.unwrap_or(0.0),
            mrr: row.mrr.unwrap_or(0.0),
            tcv: row.tcv,
            margin: row.margin,
            mrr_uptick: row.mrr_uptick,
            existing_mrr: row.existing_mrr,
        };

        let result = calculate_expected_comp(&item, assumed_margin_pct);
        total_comp += result.comp;
        lines.push(CompLine {
            service: row.service,
            revenue_type,
            comp: result.comp,
            explanation: result.explanation,
        });
    }

    Ok(CompReport {
        assumed_margin_pct,
        total_comp,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_over_mixed_rows() {
        let csv = "\
service,revenue_type,renewal_type,term,mrr,tcv,margin,mrr_uptick,existing_mrr
Fiber HQ,New,,12,1000,12000,0.40,,
Voice renewal,Renewal,,12,1500,,0.40,,1000
Early bird,Renewal,Early Renewal,36,2000,72000,0.60,,
Mystery,Hardware,,12,500,,,,
";
        let report = build_report(csv, None).unwrap();
        assert_eq!(report.lines.len(), 4);

        // 12000 * 0.14
        assert!((report.lines[0].comp - 1680.0).abs() < 1e-9);
        // 1000*12*0.05 + 500*12*0.14
        assert!((report.lines[1].comp - 1440.0).abs() < 1e-9);
        assert_eq!(report.lines[2].comp, 0.0);
        assert_eq!(report.lines[3].comp, 0.0);
        assert_eq!(report.lines[3].explanation, "No matching compensation rules");

        assert!((report.total_comp - 3120.0).abs() < 1e-9);
    }

    #[test]
    fn assumed_margin_applies_to_marginless_rows() {
        let csv = "\
service,revenue_type,term,mrr
Quote line,New,12,1000
";
        // 55% assumption → 20% tier on TCV 12000.
        let report = build_report(csv, Some(55.0)).unwrap();
        assert!((report.lines[0].comp - 2400.0).abs() < 1e-9);
    }

    #[test]
    fn empty_numeric_fields_deserialize_as_none() {
        let csv = "\
service,revenue_type,term,mrr,margin
X,New,12,1000,
";
        let report = build_report(csv, None).unwrap();
        // Default 20% assumption → 10% tier on 12000.
        assert!((report.lines[0].comp - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn bad_numeric_field_is_a_parse_error() {
        let csv = "\
service,revenue_type,term,mrr
X,New,twelve,1000
";
        let err = build_report(csv, None).unwrap_err();
        assert!(err.contains("row 1"));
    }
}
