use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One charge line from the residual billing feed. Amount already normalized
/// at load time; the raw string never leaves the loader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidualRow {
    /// Billing account identifier (`billingNumber` upstream).
    pub account: String,
    pub company: String,
    pub product: String,
    pub charge_item: String,
    pub period: String,
    /// Normalized `actuals` amount.
    pub actuals: f64,
}

/// One service line from the wireline billing feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WirelineRow {
    /// Billing account identifier (`signAcct` upstream).
    pub account: String,
    pub company: String,
    pub site: String,
    pub service_id: String,
    pub address: String,
    /// Contract term in months, kept verbatim — display field, never summed.
    pub term: String,
    pub quantity: String,
    pub billing_start: String,
    pub estimated_end: String,
    /// Normalized `charges` amount.
    pub charges: f64,
}

/// Account extraction seam. The two feeds name the account column
/// differently; the column mapping lives in config, and grouping only ever
/// goes through this trait.
pub trait AccountKeyed {
    fn account_key(&self) -> &str;
    fn company_name(&self) -> &str;
}

impl AccountKeyed for ResidualRow {
    fn account_key(&self) -> &str {
        &self.account
    }
    fn company_name(&self) -> &str {
        &self.company
    }
}

impl AccountKeyed for WirelineRow {
    fn account_key(&self) -> &str {
        &self.account
    }
    fn company_name(&self) -> &str {
        &self.company
    }
}

/// Pre-loaded feed rows, both scoped to the same pull.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub residuals: Vec<ResidualRow>,
    pub wirelines: Vec<WirelineRow>,
}

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

/// One row of the reconciliation table. Tagged union rather than structural
/// checks so match arms stay exhaustive when a variant is added.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableRecord {
    Residual {
        key: String,
        row: ResidualRow,
    },
    Wireline {
        key: String,
        row: WirelineRow,
    },
    /// A residual and a wireline row judged to be the same underlying charge.
    /// `auto_merged` distinguishes positional same-amount pairing (lower
    /// confidence) from an unambiguous 1:1 match.
    Merged {
        key: String,
        residual: ResidualRow,
        wireline: WirelineRow,
        auto_merged: bool,
    },
}

impl TableRecord {
    pub fn key(&self) -> &str {
        match self {
            Self::Residual { key, .. } => key,
            Self::Wireline { key, .. } => key,
            Self::Merged { key, .. } => key,
        }
    }

    /// Amount used for descending sort. Merged rows sort by the wireline
    /// charge (equal to the residual amount by construction).
    pub fn effective_amount(&self) -> f64 {
        match self {
            Self::Residual { row, .. } => row.actuals,
            Self::Wireline { row, .. } => row.charges,
            Self::Merged { wireline, .. } => wireline.charges,
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }

    pub fn is_auto_merged(&self) -> bool {
        matches!(self, Self::Merged { auto_merged: true, .. })
    }
}

/// One account's worth of reconciled rows. Built fresh on every pass, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountGroup {
    pub key: String,
    pub account: String,
    /// First non-empty company name found across either feed.
    pub company: String,
    pub total_residual: f64,
    pub total_wireline: f64,
    pub has_auto_merged: bool,
    /// Sorted descending by effective amount.
    pub children: Vec<TableRecord>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconSummary {
    pub accounts: usize,
    pub merged: usize,
    pub auto_merged: usize,
    pub residual_only: usize,
    pub wireline_only: usize,
    pub balanced_accounts: usize,
    pub unbalanced_accounts: usize,
    /// True iff every account with children balances within tolerance.
    /// A single mismatched account suppresses the signal.
    pub all_balanced: bool,
    pub total_residual: f64,
    pub total_wireline: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub show_unmerged: bool,
    pub tolerance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub groups: Vec<AccountGroup>,
}
