use crate::aggregate::{compute_summary, sort_children};
use crate::amount::normalize_amount;
use crate::config::{ReconConfig, ResidualColumns, WirelineColumns};
use crate::error::ReconError;
use crate::group::group_by_account;
use crate::key::KeyGen;
use crate::matcher::{match_account, passthrough_account};
use crate::model::{
    AccountGroup, ReconInput, ReconMeta, ReconResult, ResidualRow, WirelineRow,
};

/// Full pipeline: group both feeds by account, match within each account,
/// sort children, accumulate totals. `show_unmerged` bypasses matching and
/// emits every row standalone (audit mode).
///
/// Deterministic and idempotent: identical input yields identical keys,
/// totals, and order, so callers may re-run on every toggle flip.
pub fn combine_residual_data(
    residuals: &[ResidualRow],
    wirelines: &[WirelineRow],
    show_unmerged: bool,
) -> Vec<AccountGroup> {
    let grouped = group_by_account(residuals, wirelines);
    let mut keys = KeyGen::new();
    let mut groups = Vec::with_capacity(grouped.len());

    for (account, buckets) in grouped {
        let mut out = if show_unmerged {
            passthrough_account(&buckets, &mut keys)
        } else {
            match_account(&buckets, &mut keys)
        };
        sort_children(&mut out.children);

        let company = buckets.resolve_company();
        let key = keys.next_key("group", &[&account]);
        groups.push(AccountGroup {
            key,
            account,
            company,
            total_residual: out.total_residual,
            total_wireline: out.total_wireline,
            has_auto_merged: out.has_auto_merged,
            children: out.children,
        });
    }

    groups
}

/// Run reconciliation per config. Wraps `combine_residual_data` with run
/// metadata and a computed summary for the CLI / JSON surface.
pub fn run(config: &ReconConfig, input: &ReconInput) -> ReconResult {
    let show_unmerged = config.options.show_unmerged;
    let groups = combine_residual_data(&input.residuals, &input.wirelines, show_unmerged);
    let summary = compute_summary(&groups, config.tolerance.amount);

    ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            show_unmerged,
            tolerance: config.tolerance.amount,
        },
        summary,
        groups,
    }
}

// ---------------------------------------------------------------------------
// CSV ingest
// ---------------------------------------------------------------------------

struct HeaderIndex {
    headers: Vec<String>,
}

impl HeaderIndex {
    fn new(reader: &mut csv::Reader<&[u8]>, feed: &str) -> Result<Self, ReconError> {
        let headers = reader
            .headers()
            .map_err(|e| ReconError::Csv {
                feed: feed.into(),
                message: e.to_string(),
            })?
            .iter()
            .map(|h| h.to_string())
            .collect();
        Ok(Self { headers })
    }

    fn required(&self, feed: &str, name: &str) -> Result<usize, ReconError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn {
                feed: feed.into(),
                column: name.into(),
            })
    }

    /// Optional mapping: unmapped or absent columns load as empty fields.
    fn optional(&self, name: Option<&String>) -> Option<usize> {
        name.and_then(|n| self.headers.iter().position(|h| h == n))
    }
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| record.get(i)).unwrap_or("").trim().to_string()
}

/// Load residual feed rows, applying the config's column mapping. Amounts
/// are normalized here; malformed values degrade to 0 rather than erroring.
pub fn load_residual_rows(
    csv_data: &str,
    columns: &ResidualColumns,
) -> Result<Vec<ResidualRow>, ReconError> {
    let feed = "residual";
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());
    let index = HeaderIndex::new(&mut reader, feed)?;

    let account_idx = index.required(feed, &columns.account)?;
    let amount_idx = index.required(feed, &columns.amount)?;
    let company_idx = index.optional(columns.company.as_ref());
    let product_idx = index.optional(columns.product.as_ref());
    let charge_item_idx = index.optional(columns.charge_item.as_ref());
    let period_idx = index.optional(columns.period.as_ref());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Csv {
            feed: feed.into(),
            message: e.to_string(),
        })?;

        rows.push(ResidualRow {
            account: field(&record, Some(account_idx)),
            company: field(&record, company_idx),
            product: field(&record, product_idx),
            charge_item: field(&record, charge_item_idx),
            period: field(&record, period_idx),
            actuals: normalize_amount(record.get(amount_idx)),
        });
    }

    Ok(rows)
}

/// Load wireline feed rows per the config's column mapping.
pub fn load_wireline_rows(
    csv_data: &str,
    columns: &WirelineColumns,
) -> Result<Vec<WirelineRow>, ReconError> {
    let feed = "wireline";
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());
    let index = HeaderIndex::new(&mut reader, feed)?;

    let account_idx = index.required(feed, &columns.account)?;
    let amount_idx = index.required(feed, &columns.amount)?;
    let company_idx = index.optional(columns.company.as_ref());
    let site_idx = index.optional(columns.site.as_ref());
    let service_id_idx = index.optional(columns.service_id.as_ref());
    let address_idx = index.optional(columns.address.as_ref());
    let term_idx = index.optional(columns.term.as_ref());
    let quantity_idx = index.optional(columns.quantity.as_ref());
    let billing_start_idx = index.optional(columns.billing_start.as_ref());
    let estimated_end_idx = index.optional(columns.estimated_end.as_ref());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Csv {
            feed: feed.into(),
            message: e.to_string(),
        })?;

        rows.push(WirelineRow {
            account: field(&record, Some(account_idx)),
            company: field(&record, company_idx),
            site: field(&record, site_idx),
            service_id: field(&record, service_id_idx),
            address: field(&record, address_idx),
            term: field(&record, term_idx),
            quantity: field(&record, quantity_idx),
            billing_start: field(&record, billing_start_idx),
            estimated_end: field(&record, estimated_end_idx),
            charges: normalize_amount(record.get(amount_idx)),
        });
    }

    Ok(rows)
}
