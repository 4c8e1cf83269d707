//! Cohort retention simulation
//!
//! Customers are grouped into signup year-month cohorts, and each cohort
//! gets a synthetic 13-point retention curve derived from the cohort's mean
//! churn rate: `retained(m) = trunc(initial * (1 - avg_churn)^m)` for
//! months 0 through 12 inclusive. The truncation toward zero is part of the
//! output contract; counts are never rounded.

use crate::data::CustomerRecord;
use ndarray::Array2;
use std::collections::BTreeMap;

/// Months simulated after acquisition. Month 0 is the acquisition month, so
/// every curve has `RETENTION_HORIZON_MONTHS + 1` points.
pub const RETENTION_HORIZON_MONTHS: u32 = 12;

/// One point of a cohort's retention curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortRetentionPoint {
    pub cohort: String,
    pub months_since_acquisition: u32,
    pub customers_remaining: i64,
}

/// A signup cohort: its label, initial size, and mean raw churn rate.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortGroup {
    pub label: String,
    pub initial_customers: usize,
    /// Arithmetic mean of the cohort's raw churn rates. The division-safe
    /// adjusted value is not used here.
    pub avg_churn: f64,
}

impl CohortGroup {
    /// Lazy retention curve for this cohort, months 0..=12.
    ///
    /// The iterator is a pure function of the group: it can be re-created
    /// any number of times and always yields the same 13 points.
    pub fn retention_curve(&self) -> impl Iterator<Item = CohortRetentionPoint> + '_ {
        let initial = self.initial_customers as f64;
        let survival = 1.0 - self.avg_churn;

        (0..=RETENTION_HORIZON_MONTHS).map(move |month| {
            let retention_rate = survival.powi(month as i32);
            CohortRetentionPoint {
                cohort: self.label.clone(),
                months_since_acquisition: month,
                // truncation toward zero, not rounding
                customers_remaining: (initial * retention_rate) as i64,
            }
        })
    }
}

/// Partition records into signup cohorts.
///
/// Grouping is keyed by the `"{year}-{month:02}"` label, so all records
/// sharing a signup year-month land in one group regardless of input order.
/// Groups come back sorted by label, which is chronological thanks to the
/// zero-padded month.
pub fn cohort_groups(records: &[CustomerRecord]) -> Vec<CohortGroup> {
    let mut groups: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for r in records {
        let entry = groups.entry(r.cohort_label()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += r.churn_rate;
    }

    log::debug!("{} signup cohorts", groups.len());

    groups
        .into_iter()
        .map(|(label, (count, churn_sum))| CohortGroup {
            label,
            initial_customers: count,
            avg_churn: churn_sum / count as f64,
        })
        .collect()
}

/// Simulate retention for every cohort in the table.
///
/// Returns 13 points per distinct cohort, cohorts in label order and months
/// ascending within each cohort.
pub fn simulate_retention(records: &[CustomerRecord]) -> Vec<CohortRetentionPoint> {
    let groups = cohort_groups(records);
    groups.iter().flat_map(CohortGroup::retention_curve).collect()
}

/// Pivot retention points into a cohort × month matrix for the heatmap.
///
/// Rows follow the cohorts' first appearance in `points` (label order when
/// the points come from [`simulate_retention`]); columns are months 0..=12.
pub fn retention_matrix(points: &[CohortRetentionPoint]) -> (Vec<String>, Array2<i64>) {
    let mut row_index: BTreeMap<&str, usize> = BTreeMap::new();
    let mut cohorts: Vec<String> = Vec::new();
    for p in points {
        if !row_index.contains_key(p.cohort.as_str()) {
            row_index.insert(&p.cohort, cohorts.len());
            cohorts.push(p.cohort.clone());
        }
    }

    let n_months = (RETENTION_HORIZON_MONTHS + 1) as usize;
    let mut matrix = Array2::<i64>::zeros((cohorts.len(), n_months));
    for p in points {
        let row = row_index[p.cohort.as_str()];
        let col = p.months_since_acquisition as usize;
        if col < n_months {
            matrix[[row, col]] = p.customers_remaining;
        }
    }

    (cohorts, matrix)
}
