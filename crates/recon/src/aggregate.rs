use ordered_float::OrderedFloat;

use crate::model::{AccountGroup, ReconSummary, TableRecord};

/// Residual and wireline totals within this delta count as balanced.
/// Currency equality under float arithmetic, not exact equality.
pub const BALANCE_TOLERANCE: f64 = 0.01;

/// Sort children descending by effective amount. `sort_by` is stable, so
/// ties keep emission order and repeated passes over identical input produce
/// identical output.
pub fn sort_children(children: &mut [TableRecord]) {
    children.sort_by(|a, b| {
        OrderedFloat(b.effective_amount()).cmp(&OrderedFloat(a.effective_amount()))
    });
}

/// True iff the group has at least one child and its totals agree within
/// `tolerance`.
pub fn totals_balanced(group: &AccountGroup, tolerance: f64) -> bool {
    !group.children.is_empty()
        && (group.total_residual - group.total_wireline).abs() < tolerance
}

/// True iff every group with children balances. Conservative: one mismatched
/// account suppresses the signal system-wide.
pub fn all_balanced(groups: &[AccountGroup], tolerance: f64) -> bool {
    groups
        .iter()
        .filter(|g| !g.children.is_empty())
        .all(|g| totals_balanced(g, tolerance))
}

/// Roll the grouped output up into run-level counts.
pub fn compute_summary(groups: &[AccountGroup], tolerance: f64) -> ReconSummary {
    let mut merged = 0;
    let mut auto_merged = 0;
    let mut residual_only = 0;
    let mut wireline_only = 0;
    let mut balanced_accounts = 0;
    let mut unbalanced_accounts = 0;
    let mut total_residual = 0.0;
    let mut total_wireline = 0.0;

    for group in groups {
        total_residual += group.total_residual;
        total_wireline += group.total_wireline;

        if group.children.is_empty() {
            continue;
        }
        if totals_balanced(group, tolerance) {
            balanced_accounts += 1;
        } else {
            unbalanced_accounts += 1;
        }

        for child in &group.children {
            match child {
                TableRecord::Merged { auto_merged: auto, .. } => {
                    merged += 1;
                    if *auto {
                        auto_merged += 1;
                    }
                }
                TableRecord::Residual { .. } => residual_only += 1,
                TableRecord::Wireline { .. } => wireline_only += 1,
            }
        }
    }

    ReconSummary {
        accounts: groups.len(),
        merged,
        auto_merged,
        residual_only,
        wireline_only,
        balanced_accounts,
        unbalanced_accounts,
        all_balanced: all_balanced(groups, tolerance),
        total_residual,
        total_wireline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResidualRow;

    fn residual_child(key: &str, amount: f64) -> TableRecord {
        TableRecord::Residual {
            key: key.into(),
            row: ResidualRow {
                account: "1001".into(),
                company: "Acme".into(),
                product: "Fiber".into(),
                charge_item: "MRC".into(),
                period: "2026-07".into(),
                actuals: amount,
            },
        }
    }

    fn group(total_residual: f64, total_wireline: f64, children: Vec<TableRecord>) -> AccountGroup {
        AccountGroup {
            key: "group-0-1001".into(),
            account: "1001".into(),
            company: "Acme".into(),
            total_residual,
            total_wireline,
            has_auto_merged: false,
            children,
        }
    }

    #[test]
    fn sorts_descending_and_stable() {
        let mut children = vec![
            residual_child("a", 10.0),
            residual_child("b", 30.0),
            residual_child("c", 10.0),
            residual_child("d", 20.0),
        ];
        sort_children(&mut children);
        let keys: Vec<&str> = children.iter().map(TableRecord::key).collect();
        // a before c: equal amounts keep emission order.
        assert_eq!(keys, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn balance_respects_tolerance() {
        let g = group(100.0, 100.005, vec![residual_child("a", 100.0)]);
        assert!(totals_balanced(&g, BALANCE_TOLERANCE));

        let g = group(100.0, 100.02, vec![residual_child("a", 100.0)]);
        assert!(!totals_balanced(&g, BALANCE_TOLERANCE));
    }

    #[test]
    fn empty_group_is_never_balanced() {
        let g = group(0.0, 0.0, vec![]);
        assert!(!totals_balanced(&g, BALANCE_TOLERANCE));
    }

    #[test]
    fn one_mismatch_suppresses_all_balanced() {
        let groups = vec![
            group(50.0, 50.0, vec![residual_child("a", 50.0)]),
            group(80.0, 90.0, vec![residual_child("b", 80.0)]),
        ];
        assert!(!all_balanced(&groups, BALANCE_TOLERANCE));

        let groups = vec![
            group(50.0, 50.0, vec![residual_child("a", 50.0)]),
            group(80.0, 80.0, vec![residual_child("b", 80.0)]),
        ];
        assert!(all_balanced(&groups, BALANCE_TOLERANCE));
    }

    #[test]
    fn summary_counts() {
        let groups = vec![
            group(50.0, 50.0, vec![residual_child("a", 50.0)]),
            group(80.0, 90.0, vec![residual_child("b", 80.0)]),
            group(0.0, 0.0, vec![]),
        ];
        let summary = compute_summary(&groups, BALANCE_TOLERANCE);
        assert_eq!(summary.accounts, 3);
        assert_eq!(summary.residual_only, 2);
        assert_eq!(summary.balanced_accounts, 1);
        assert_eq!(summary.unbalanced_accounts, 1);
        assert!(!summary.all_balanced);
        assert_eq!(summary.total_residual, 130.0);
        assert_eq!(summary.total_wireline, 140.0);
    }
}
