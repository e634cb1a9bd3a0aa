use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::amount::AmountKey;
use crate::model::{AccountKeyed, ResidualRow, WirelineRow};

/// One account's rows from both feeds, sub-bucketed by normalized amount.
#[derive(Debug, Clone, Default)]
pub struct AccountBuckets {
    pub residuals: BTreeMap<AmountKey, Vec<ResidualRow>>,
    pub wirelines: BTreeMap<AmountKey, Vec<WirelineRow>>,
}

impl AccountBuckets {
    /// First non-empty company name across either feed, residuals first.
    pub fn resolve_company(&self) -> String {
        self.residuals
            .values()
            .flatten()
            .map(|r| r.company_name())
            .chain(self.wirelines.values().flatten().map(|w| w.company_name()))
            .find(|name| !name.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

/// Partition both feeds into per-account buckets.
///
/// No row is ever dropped: a missing account identifier groups under the
/// empty key, an unparseable amount sits in the 0.0 bucket. Account order is
/// the BTreeMap's, so repeated passes over identical input walk identically.
pub fn group_by_account(
    residuals: &[ResidualRow],
    wirelines: &[WirelineRow],
) -> BTreeMap<String, AccountBuckets> {
    let mut accounts: BTreeMap<String, AccountBuckets> = BTreeMap::new();

    for row in residuals {
        accounts
            .entry(row.account_key().to_string())
            .or_default()
            .residuals
            .entry(OrderedFloat(row.actuals))
            .or_default()
            .push(row.clone());
    }

    for row in wirelines {
        accounts
            .entry(row.account_key().to_string())
            .or_default()
            .wirelines
            .entry(OrderedFloat(row.charges))
            .or_default()
            .push(row.clone());
    }

    accounts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residual(account: &str, company: &str, amount: f64) -> ResidualRow {
        ResidualRow {
            account: account.into(),
            company: company.into(),
            product: "Fiber 100".into(),
            charge_item: "MRC".into(),
            period: "2026-07".into(),
            actuals: amount,
        }
    }

    fn wireline(account: &str, company: &str, amount: f64) -> WirelineRow {
        WirelineRow {
            account: account.into(),
            company: company.into(),
            site: "HQ".into(),
            service_id: "SVC-1".into(),
            address: "".into(),
            term: "36".into(),
            quantity: "1".into(),
            billing_start: "2025-01-01".into(),
            estimated_end: "2028-01-01".into(),
            charges: amount,
        }
    }

    #[test]
    fn buckets_by_account_then_amount() {
        let grouped = group_by_account(
            &[
                residual("1001", "Acme", 50.0),
                residual("1001", "Acme", 50.0),
                residual("2002", "Globex", 75.0),
            ],
            &[wireline("1001", "Acme", 50.0)],
        );

        assert_eq!(grouped.len(), 2);
        let acc = &grouped["1001"];
        assert_eq!(acc.residuals[&OrderedFloat(50.0)].len(), 2);
        assert_eq!(acc.wirelines[&OrderedFloat(50.0)].len(), 1);
        assert!(grouped["2002"].wirelines.is_empty());
    }

    #[test]
    fn missing_account_groups_under_empty_key() {
        let grouped = group_by_account(&[residual("", "NoAcct Co", 10.0)], &[]);
        assert_eq!(grouped.len(), 1);
        assert!(grouped.contains_key(""));
        assert_eq!(grouped[""].resolve_company(), "NoAcct Co");
    }

    #[test]
    fn zero_amounts_are_kept() {
        let grouped = group_by_account(&[residual("1001", "Acme", 0.0)], &[]);
        assert_eq!(grouped["1001"].residuals[&OrderedFloat(0.0)].len(), 1);
    }

    #[test]
    fn company_resolution_prefers_first_non_empty() {
        let grouped = group_by_account(
            &[residual("1001", "", 10.0)],
            &[wireline("1001", "Acme Telecom", 20.0)],
        );
        assert_eq!(grouped["1001"].resolve_company(), "Acme Telecom");
    }
}
