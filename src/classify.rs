use crate::columns::{cell, ColumnIndex};
use crate::types::{LifecycleState, NormalizedRecord, Row};
use crate::util::parse_instant;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::debug;

static PICKED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^picked\b").expect("valid regex"));
static IN_PROGRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\s)in\s*progress\b|picking").expect("valid regex"));
static UNASSIGNED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"not\s*assigned|unassigned").expect("valid regex"));

/// Map a raw status cell to a lifecycle state.
///
/// Checks run in order, so "picking (unassigned)" is in progress.
pub fn classify_status(raw: &str) -> LifecycleState {
    let status = raw.trim().to_lowercase();
    if PICKED.is_match(&status) {
        LifecycleState::Picked
    } else if IN_PROGRESS.is_match(&status) {
        LifecycleState::InProgress
    } else if UNASSIGNED.is_match(&status) {
        LifecycleState::Unassigned
    } else {
        LifecycleState::Other
    }
}

/// Split an associate cell on `;` or `,` into a set of worker ids.
pub fn split_workers(raw: &str) -> BTreeSet<String> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize one data row. Rows without a pick-list code or a parseable
/// stage-by time are not work items and yield `None`.
pub fn classify_row(row: &Row, idx: &ColumnIndex, now: NaiveDateTime) -> Option<NormalizedRecord> {
    let plcode = cell(row, idx.plcode).trim();
    if plcode.is_empty() {
        return None;
    }
    let deadline = parse_instant(cell(row, idx.stage_by), now)?;
    Some(NormalizedRecord {
        deadline,
        state: classify_status(cell(row, idx.status)),
        assigned_workers: split_workers(cell(row, idx.assoc)),
    })
}

pub fn classify_rows(rows: &[Row], idx: &ColumnIndex, now: NaiveDateTime) -> Vec<NormalizedRecord> {
    let records: Vec<NormalizedRecord> = rows.iter().filter_map(|r| classify_row(r, idx, now)).collect();
    debug!(
        rows = rows.len(),
        kept = records.len(),
        dropped = rows.len() - records.len(),
        "classified pick-list rows"
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap().and_hms_opt(7, 30, 0).unwrap()
    }

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn idx() -> ColumnIndex {
        ColumnIndex { stage_by: Some(0), status: Some(1), assoc: Some(2), plcode: Some(3) }
    }

    #[test]
    fn test_status_patterns() {
        assert_eq!(classify_status("Picked"), LifecycleState::Picked);
        assert_eq!(classify_status("  PICKED - staged "), LifecycleState::Picked);
        assert_eq!(classify_status("pickedup"), LifecycleState::Other);
        assert_eq!(classify_status("In Progress"), LifecycleState::InProgress);
        assert_eq!(classify_status("in   progress"), LifecycleState::InProgress);
        assert_eq!(classify_status("inprogress"), LifecycleState::InProgress);
        assert_eq!(classify_status("Picking"), LifecycleState::InProgress);
        assert_eq!(classify_status("Not Assigned"), LifecycleState::Unassigned);
        assert_eq!(classify_status("notassigned"), LifecycleState::Unassigned);
        assert_eq!(classify_status("Unassigned"), LifecycleState::Unassigned);
        assert_eq!(classify_status("Cancelled"), LifecycleState::Other);
        assert_eq!(classify_status(""), LifecycleState::Other);
    }

    #[test]
    fn test_status_precedence() {
        assert_eq!(classify_status("picking unassigned"), LifecycleState::InProgress);
        assert_eq!(classify_status("picked, not assigned"), LifecycleState::Picked);
    }

    #[test]
    fn test_split_workers_dedupes() {
        let w = split_workers(" alice; bob ,alice,, ");
        assert_eq!(w.len(), 2);
        assert!(w.contains("alice") && w.contains("bob"));
        assert!(split_workers("").is_empty());
    }

    #[test]
    fn test_drops_missing_plcode() {
        assert_eq!(classify_row(&row(&["08:00", "Picked", "alice", "  "]), &idx(), now()), None);
    }

    #[test]
    fn test_drops_unparseable_deadline() {
        assert_eq!(classify_row(&row(&["N/A", "Picked", "alice", "PL1"]), &idx(), now()), None);
    }

    #[test]
    fn test_short_row_uses_empty_cells() {
        let rec = classify_row(&row(&["08:00", "In Progress"]), &idx(), now());
        // plcode column is missing entirely
        assert_eq!(rec, None);

        let idx = ColumnIndex { stage_by: Some(0), status: Some(1), assoc: Some(4), plcode: Some(2) };
        let rec = classify_row(&row(&["08:00", "In Progress", "PL9"]), &idx, now()).unwrap();
        assert_eq!(rec.state, LifecycleState::InProgress);
        assert!(rec.assigned_workers.is_empty());
    }

    #[test]
    fn test_classify_rows_keeps_valid() {
        let rows = vec![
            row(&["08:00", "In Progress", "alice", "PL1"]),
            row(&["", "Picked", "bob", "PL2"]),
            row(&["08:30", "Not Assigned", "", "PL3"]),
        ];
        let recs = classify_rows(&rows, &idx(), now());
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].state, LifecycleState::Unassigned);
    }
}
