use crate::config::Config;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tabled::Tabled;

/// One parsed line of the export. Cells may be missing on ragged rows.
pub type Row = Vec<String>;

/// Lifecycle of a pick list, as read from the export's status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleState {
    Picked,
    InProgress,
    Unassigned,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub deadline: NaiveDateTime,
    pub state: LifecycleState,
    pub assigned_workers: BTreeSet<String>,
}

/// Pick lists sharing one exact stage-by instant.
///
/// `total` also counts records in [`LifecycleState::Other`], which have no
/// field of their own; see [`Bucket::other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub deadline: NaiveDateTime,
    pub total: usize,
    pub picked: usize,
    pub in_progress: usize,
    pub unassigned: usize,
}

impl Bucket {
    pub fn new(deadline: NaiveDateTime) -> Self {
        Bucket { deadline, total: 0, picked: 0, in_progress: 0, unassigned: 0 }
    }

    pub fn other(&self) -> usize {
        self.total
            .saturating_sub(self.picked)
            .saturating_sub(self.in_progress)
            .saturating_sub(self.unassigned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    #[serde(rename = "Safe")]
    Safe,
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Proj Miss")]
    ProjectedMiss,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Safe => "Safe",
            RiskTier::LowRisk => "Low Risk",
            RiskTier::HighRisk => "High Risk",
            RiskTier::ProjectedMiss => "Proj Miss",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketTotals {
    pub total: usize,
    pub picked: usize,
    pub in_progress: usize,
    pub unassigned: usize,
}

/// Result of the risk pass for one bucket.
///
/// `risk_tier` is `None` for buckets whose deadline has already passed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedBucket {
    pub deadline: NaiveDateTime,
    pub is_past: bool,
    pub totals: BucketTotals,
    pub lists_remaining: usize,
    pub fully_departed: bool,
    pub headcount_need: u64,
    pub time_left_display: String,
    pub risk_tier: Option<RiskTier>,
    pub cum_need: usize,
    pub time_left_minutes: f64,
    pub capacity: f64,
    pub pl_need_for_risk: f64,
    pub ratio: f64,
}

impl ComputedBucket {
    /// Tier label, empty when the bucket was not evaluated.
    pub fn risk_label(&self) -> &'static str {
        self.risk_tier.map(|t| t.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub now_time: String,
    pub total_records: usize,
    pub in_progress_records: usize,
    pub avg_pick_list_minutes: f64,
    pub shift_end_display: String,
    pub active_headcount: usize,
    pub max_headcount_need: u64,
    pub headcount_surplus: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub future_buckets: Vec<ComputedBucket>,
    pub summary: Summary,
}

impl RiskReport {
    /// Future buckets to display; Safe rows only when the config asks for them.
    pub fn visible_buckets(&self, config: &Config) -> Vec<&ComputedBucket> {
        self.future_buckets
            .iter()
            .filter(|b| config.show_safe_rows || b.risk_tier != Some(RiskTier::Safe))
            .collect()
    }
}

/// Console/CSV row for one future bucket.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BucketRow {
    #[serde(rename = "StageBy")]
    #[tabled(rename = "STAGE BY")]
    pub stage_by: String,
    #[serde(rename = "TotalPicklists")]
    #[tabled(rename = "Total Picklists")]
    pub total: usize,
    #[serde(rename = "ListsRemaining")]
    #[tabled(rename = "Lists Remaining")]
    pub lists_remaining: usize,
    #[serde(rename = "NotAssigned")]
    #[tabled(rename = "Not Assigned")]
    pub not_assigned: usize,
    #[serde(rename = "HCNeed")]
    #[tabled(rename = "HC Need")]
    pub hc_need: u64,
    #[serde(rename = "TimeLeft")]
    #[tabled(rename = "TIME LEFT")]
    pub time_left: String,
    #[serde(rename = "Risk")]
    #[tabled(rename = "Risk?")]
    pub risk: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SummaryRow {
    #[tabled(rename = "TIME")]
    pub time: String,
    #[tabled(rename = "Total")]
    pub total: String,
    #[tabled(rename = "IP")]
    pub in_progress: String,
    #[tabled(rename = "AVG")]
    pub avg: String,
    #[tabled(rename = "End")]
    pub shift_end: String,
    #[tabled(rename = "Active HC")]
    pub active_hc: String,
    #[tabled(rename = "HCNeed")]
    pub hc_need: String,
    #[tabled(rename = "Surplus")]
    pub surplus: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_other_count_never_underflows() {
        let deadline = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let b = Bucket { deadline, total: 4, picked: 1, in_progress: 1, unassigned: 1 };
        assert_eq!(b.other(), 1);
        let inconsistent = Bucket { deadline, total: 1, picked: 2, in_progress: 3, unassigned: 0 };
        assert_eq!(inconsistent.other(), 0);
    }
}
