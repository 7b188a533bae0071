// src/migrate/validator.rs
//! Post-load count validation.

use crate::store::{ReportStore, StoreCounts};
use crate::Result;

use super::loader::LoadTotals;

/// Comparison of loader expectations against recomputed store counts.
///
/// This is a post-hoc audit, not a transactional guarantee: a mismatch is
/// reported, never rolled back or repaired.
#[derive(Debug)]
pub struct ValidationReport {
    /// Number of documents that parsed successfully.
    pub parsed_reports: usize,
    pub expected: LoadTotals,
    pub actual: StoreCounts,
}

impl ValidationReport {
    /// Whether every recomputed count matches what the run expected.
    pub fn passed(&self) -> bool {
        self.actual.reports == self.parsed_reports
            && self.actual.accomplishments == self.expected.accomplishments
            && self.actual.goals == self.expected.goals
            && self.actual.blockers == self.expected.blockers
            && self.actual.risks == self.expected.risks
    }
}

/// Recompute entity counts from the store and compare with loader totals.
pub fn validate_counts(
    store: &ReportStore,
    parsed_reports: usize,
    totals: &LoadTotals,
) -> Result<ValidationReport> {
    let actual = store.counts()?;
    Ok(ValidationReport {
        parsed_reports,
        expected: totals.clone(),
        actual,
    })
}
