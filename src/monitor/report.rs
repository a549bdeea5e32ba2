//! Check outcome aggregation
//!
//! One check pass produces a `CheckOutcome`: what was checked, what
//! failed, and per-owner buckets of BIS counter changes and new 311
//! complaints. The notifier turns each bucket into one Discord embed.

use std::collections::HashMap;

use crate::scrape::bis::BisSummary;
use crate::scrape::open_data::Complaint311Record;

/// A single counter that moved between two checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterChange {
    pub field: &'static str,
    pub old: i32,
    pub new: i32,
}

/// BIS counter movement for one address.
#[derive(Debug, Clone)]
pub struct BisChange {
    pub address: String,
    pub changes: Vec<CounterChange>,
    pub new_totals: BisSummary,
}

/// New 311 complaints detected for one address in this pass.
#[derive(Debug, Clone)]
pub struct NewComplaints {
    pub address: String,
    /// `created_date` of the most recent new complaint
    pub last_date: Option<String>,
    pub complaints: Vec<Complaint311Record>,
}

/// Everything one notification recipient should hear about.
#[derive(Debug, Clone, Default)]
pub struct RecipientReport {
    pub bis_changes: Vec<BisChange>,
    pub new_complaints: Vec<NewComplaints>,
}

impl RecipientReport {
    pub fn is_all_clear(&self) -> bool {
        self.bis_changes.is_empty() && self.new_complaints.is_empty()
    }
}

/// Aggregated result of one check pass.
#[derive(Debug, Default)]
pub struct CheckOutcome {
    pub checked_addresses: Vec<String>,
    pub failed_addresses: Vec<String>,
    /// Per-owner buckets, keyed by owner id
    pub per_owner: HashMap<i64, RecipientReport>,
    /// Everything that happened, for the fallback webhook
    pub global: RecipientReport,
}

impl CheckOutcome {
    /// Record a BIS change for every owner of the address and for the
    /// global report.
    pub fn record_bis_change(&mut self, owners: &[i64], change: BisChange) {
        for owner_id in owners {
            self.per_owner
                .entry(*owner_id)
                .or_default()
                .bis_changes
                .push(change.clone());
        }
        self.global.bis_changes.push(change);
    }

    /// Record new 311 complaints the same way.
    pub fn record_new_complaints(&mut self, owners: &[i64], complaints: NewComplaints) {
        for owner_id in owners {
            self.per_owner
                .entry(*owner_id)
                .or_default()
                .new_complaints
                .push(complaints.clone());
        }
        self.global.new_complaints.push(complaints);
    }

    pub fn report_for_owner(&self, owner_id: i64) -> RecipientReport {
        self.per_owner.get(&owner_id).cloned().unwrap_or_default()
    }
}

/// Diff a fresh scrape against the stored snapshot. Returns the moved
/// counters; a first-ever scrape (no previous snapshot) never counts as
/// a change.
pub fn diff_violations(previous: Option<(i32, i32)>, summary: &BisSummary) -> Vec<CounterChange> {
    let Some((old_dob, old_ecb)) = previous else {
        return vec![];
    };

    let mut changes = Vec::new();
    if summary.dob_violations != old_dob {
        changes.push(CounterChange {
            field: "Violations-DOB",
            old: old_dob,
            new: summary.dob_violations,
        });
    }
    if summary.ecb_violations != old_ecb {
        changes.push(CounterChange {
            field: "Violations-OATH/ECB",
            old: old_ecb,
            new: summary.ecb_violations,
        });
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(dob: i32, ecb: i32) -> BisSummary {
        BisSummary {
            complaints: 1,
            dob_violations: dob,
            ecb_violations: ecb,
        }
    }

    #[test]
    fn should_report_no_change_on_first_scrape() {
        // Arrange & Act
        let changes = diff_violations(None, &summary(3, 5));

        // Assert
        assert!(changes.is_empty());
    }

    #[test]
    fn should_report_no_change_when_counters_match() {
        let changes = diff_violations(Some((3, 5)), &summary(3, 5));
        assert!(changes.is_empty());
    }

    #[test]
    fn should_detect_dob_violation_change() {
        // Arrange & Act
        let changes = diff_violations(Some((3, 5)), &summary(4, 5));

        // Assert
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "Violations-DOB");
        assert_eq!(changes[0].old, 3);
        assert_eq!(changes[0].new, 4);
    }

    #[test]
    fn should_detect_both_counters_changing() {
        let changes = diff_violations(Some((3, 5)), &summary(2, 9));
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1].field, "Violations-OATH/ECB");
    }

    #[test]
    fn should_bucket_changes_per_owner_and_globally() {
        // Arrange
        let mut outcome = CheckOutcome::default();
        let change = BisChange {
            address: "952A Greene Ave".to_string(),
            changes: diff_violations(Some((0, 0)), &summary(1, 0)),
            new_totals: summary(1, 0),
        };

        // Act
        outcome.record_bis_change(&[1, 2], change);

        // Assert
        assert_eq!(outcome.report_for_owner(1).bis_changes.len(), 1);
        assert_eq!(outcome.report_for_owner(2).bis_changes.len(), 1);
        assert!(outcome.report_for_owner(3).bis_changes.is_empty());
        assert_eq!(outcome.global.bis_changes.len(), 1);
    }

    #[test]
    fn should_be_all_clear_when_nothing_recorded() {
        let outcome = CheckOutcome::default();
        assert!(outcome.global.is_all_clear());
    }
}
