use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    #[serde(default)]
    pub options: OptionsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct FeedsConfig {
    pub residual: ResidualFeedConfig,
    pub wireline: WirelineFeedConfig,
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

/// The two feeds name the billing account differently (`billingNumber` vs
/// `signAcct` upstream). That mapping is config, not engine logic — a third
/// feed with yet another column name is a config change only.
#[derive(Debug, Clone, Deserialize)]
pub struct ResidualFeedConfig {
    pub file: String,
    pub columns: ResidualColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirelineFeedConfig {
    pub file: String,
    pub columns: WirelineColumns,
}

/// Column mapping for the residual feed. `account` and `amount` are
/// required; the rest default to absent and load as empty strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ResidualColumns {
    pub account: String,
    pub amount: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub charge_item: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirelineColumns {
    pub account: String,
    pub amount: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub billing_start: Option<String>,
    #[serde(default)]
    pub estimated_end: Option<String>,
}

// ---------------------------------------------------------------------------
// Tolerance + Options + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ToleranceConfig {
    /// Residual-vs-wireline totals within this delta count as balanced.
    #[serde(default = "default_amount_tolerance")]
    pub amount: f64,
}

fn default_amount_tolerance() -> f64 {
    crate::aggregate::BALANCE_TOLERANCE
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            amount: default_amount_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionsConfig {
    /// Bypass matching entirely: every row standalone, totals still
    /// accumulated. Audit mode for inspecting raw inputs.
    #[serde(default)]
    pub show_unmerged: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        for (feed, account, amount) in [
            (
                "residual",
                &self.feeds.residual.columns.account,
                &self.feeds.residual.columns.amount,
            ),
            (
                "wireline",
                &self.feeds.wireline.columns.account,
                &self.feeds.wireline.columns.amount,
            ),
        ] {
            if account.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "feed '{feed}': account column must not be empty"
                )));
            }
            if amount.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "feed '{feed}': amount column must not be empty"
                )));
            }
        }

        if !self.tolerance.amount.is_finite() || self.tolerance.amount < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance.amount must be a non-negative number, got {}",
                self.tolerance.amount
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Monthly Residuals"

[feeds.residual]
file = "residual.csv"
[feeds.residual.columns]
account     = "billingNumber"
amount      = "actuals"
company     = "companyName"
product     = "product"
charge_item = "chargeItem"
period      = "billingPeriod"

[feeds.wireline]
file = "wireline.csv"
[feeds.wireline.columns]
account    = "signAcct"
amount     = "charges"
company    = "companyName"
site       = "siteName"
service_id = "serviceId"

[tolerance]
amount = 0.01

[options]
show_unmerged = false
"#;

    #[test]
    fn parse_valid_config() {
        let config = ReconConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Monthly Residuals");
        assert_eq!(config.feeds.residual.columns.account, "billingNumber");
        assert_eq!(config.feeds.wireline.columns.account, "signAcct");
        assert_eq!(config.tolerance.amount, 0.01);
        assert!(!config.options.show_unmerged);
        assert!(config.output.json.is_none());
    }

    #[test]
    fn tolerance_defaults_when_omitted() {
        let minimal = r#"
name = "Minimal"

[feeds.residual]
file = "r.csv"
[feeds.residual.columns]
account = "billingNumber"
amount  = "actuals"

[feeds.wireline]
file = "w.csv"
[feeds.wireline.columns]
account = "signAcct"
amount  = "charges"
"#;
        let config = ReconConfig::from_toml(minimal).unwrap();
        assert_eq!(config.tolerance.amount, crate::aggregate::BALANCE_TOLERANCE);
    }

    #[test]
    fn reject_empty_account_column() {
        let bad = VALID.replace("account     = \"billingNumber\"", "account     = \"\"");
        let err = ReconConfig::from_toml(&bad).unwrap_err();
        assert!(err.to_string().contains("account column"));
    }

    #[test]
    fn reject_negative_tolerance() {
        let bad = VALID.replace("amount = 0.01", "amount = -0.5");
        let err = ReconConfig::from_toml(&bad).unwrap_err();
        assert!(err.to_string().contains("tolerance.amount"));
    }

    #[test]
    fn reject_missing_feed() {
        let bad = r#"
name = "No wireline"

[feeds.residual]
file = "r.csv"
[feeds.residual.columns]
account = "billingNumber"
amount  = "actuals"
"#;
        assert!(ReconConfig::from_toml(bad).is_err());
    }
}
