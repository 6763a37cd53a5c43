//! Header resolution for the pick-list export.
//!
//! Exports from different dashboards name the same columns differently, so
//! each logical field carries a list of candidate names. Resolution runs in
//! two passes over the trimmed, lower-cased header:
//!
//! 1. exact match, trying candidates in priority order;
//! 2. substring match, walking columns left to right and trying every
//!    candidate against each column.
//!
//! A field with no match resolves to `None`; rows then contribute an empty
//! value for it instead of failing.

use tracing::{debug, warn};

/// Candidate names for the stage-by deadline column
pub const STAGE_BY: &[&str] = &["stage by time", "stage by", "stageby", "stage_time", "stage time"];
/// Candidate names for the pick-list status column
pub const STATUS: &[&str] = &["status", "state"];
/// Candidate names for the associate column
pub const ASSOCIATE: &[&str] = &["associate", "employee", "picker", "user"];
/// Candidate names for the pick-list code column
pub const PICKLIST_CODE: &[&str] = &["picklist code", "picklist", "pl code"];

/// Position of each logical field in the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnIndex {
    pub stage_by: Option<usize>,
    pub status: Option<usize>,
    pub assoc: Option<usize>,
    pub plcode: Option<usize>,
}

impl ColumnIndex {
    pub fn resolve(header: &[String]) -> Self {
        let normalized: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let idx = ColumnIndex {
            stage_by: find_column(&normalized, STAGE_BY),
            status: find_column(&normalized, STATUS),
            assoc: find_column(&normalized, ASSOCIATE),
            plcode: find_column(&normalized, PICKLIST_CODE),
        };
        debug!(?idx, "resolved header columns");
        if idx.plcode.is_none() {
            warn!("no pick-list code column found; every row will be dropped");
        }
        if idx.stage_by.is_none() {
            warn!("no stage-by column found; every row will be dropped");
        }
        idx
    }
}

/// Find the first column matching any of `names`; header must already be
/// trimmed and lower-cased.
pub fn find_column(header: &[String], names: &[&str]) -> Option<usize> {
    for name in names {
        if let Some(j) = header.iter().position(|h| h == name) {
            return Some(j);
        }
    }
    for (j, h) in header.iter().enumerate() {
        if names.iter().any(|n| h.contains(n)) {
            return Some(j);
        }
    }
    None
}

/// Cell at `idx`, or `""` when the field is unresolved or the row is short.
pub fn cell<'a>(row: &'a [String], idx: Option<usize>) -> &'a str {
    idx.and_then(|j| row.get(j)).map(String::as_str).unwrap_or("")
}
