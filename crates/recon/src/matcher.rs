use std::collections::BTreeSet;

use crate::amount::AmountKey;
use crate::group::AccountBuckets;
use crate::key::KeyGen;
use crate::model::{ResidualRow, TableRecord, WirelineRow};

/// Matcher output for one account. Totals accumulate from every input row
/// exactly once, whatever branch emitted it.
#[derive(Debug, Default)]
pub struct MatchOutput {
    pub children: Vec<TableRecord>,
    pub total_residual: f64,
    pub total_wireline: f64,
    pub has_auto_merged: bool,
}

/// Match one account's residual rows against its wireline rows by amount.
///
/// Per distinct amount present on either side, visited exactly once:
/// 1. one row each side → a single merged row (`auto_merged = false`);
/// 2. equal cardinality N > 1 → N positional merged rows
///    (`auto_merged = true`) — same amount, but there is no stronger
///    correlating key, so the pairing follows input order and is a known
///    precision limitation;
/// 3. anything else → every row on both sides emitted standalone.
pub fn match_account(buckets: &AccountBuckets, keys: &mut KeyGen) -> MatchOutput {
    let mut out = MatchOutput::default();

    // Union of both keysets; an amount appearing on both sides must not be
    // processed twice.
    let amounts: BTreeSet<AmountKey> = buckets
        .residuals
        .keys()
        .chain(buckets.wirelines.keys())
        .copied()
        .collect();

    for amount in amounts {
        let residuals = buckets
            .residuals
            .get(&amount)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let wirelines = buckets
            .wirelines
            .get(&amount)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        if residuals.len() == 1 && wirelines.len() == 1 {
            out.push_merged(&residuals[0], &wirelines[0], false, keys);
        } else if residuals.len() == wirelines.len() && residuals.len() > 1 {
            for (r, w) in residuals.iter().zip(wirelines) {
                out.push_merged(r, w, true, keys);
            }
        } else {
            for r in residuals {
                out.push_residual(r, keys);
            }
            for w in wirelines {
                out.push_wireline(w, keys);
            }
        }
    }

    out
}

/// Audit mode: no merge attempts, every row standalone, totals unchanged.
pub fn passthrough_account(buckets: &AccountBuckets, keys: &mut KeyGen) -> MatchOutput {
    let mut out = MatchOutput::default();

    for rows in buckets.residuals.values() {
        for r in rows {
            out.push_residual(r, keys);
        }
    }
    for rows in buckets.wirelines.values() {
        for w in rows {
            out.push_wireline(w, keys);
        }
    }

    out
}

impl MatchOutput {
    fn push_residual(&mut self, row: &ResidualRow, keys: &mut KeyGen) {
        self.total_residual += row.actuals;
        let key = keys.next_key("residual", &[&row.account, &row.charge_item, &row.period]);
        self.children.push(TableRecord::Residual {
            key,
            row: row.clone(),
        });
    }

    fn push_wireline(&mut self, row: &WirelineRow, keys: &mut KeyGen) {
        self.total_wireline += row.charges;
        let key = keys.next_key("wireline", &[&row.account, &row.service_id]);
        self.children.push(TableRecord::Wireline {
            key,
            row: row.clone(),
        });
    }

    fn push_merged(
        &mut self,
        residual: &ResidualRow,
        wireline: &WirelineRow,
        auto_merged: bool,
        keys: &mut KeyGen,
    ) {
        self.total_residual += residual.actuals;
        self.total_wireline += wireline.charges;
        self.has_auto_merged |= auto_merged;
        let key = keys.next_key(
            "merged",
            &[&residual.account, &residual.charge_item, &wireline.service_id],
        );
        self.children.push(TableRecord::Merged {
            key,
            residual: residual.clone(),
            wireline: wireline.clone(),
            auto_merged,
        });
    }
}
