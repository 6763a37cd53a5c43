//! Staffing-risk projection for warehouse pick-list exports.
//!
//! Raw export text flows through [`loader`] (CSV rows), [`classify`] (one
//! normalized record per real pick list) and [`reports`] (stage-by buckets and
//! the risk pass). Every step is a pure function of its input, the run's
//! [`Config`] and the reference "now".
pub mod classify;
pub mod columns;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use config::{Config, ConfigStore, Thresholds};
pub use error::{Error, Result};
pub use reports::{compute_report, compute_risk};
pub use types::{ComputedBucket, RiskReport, RiskTier, Summary};

use chrono::NaiveDateTime;

/// Parse captured export text and compute the report in one call.
pub fn analyze_text(text: &str, config: &Config, now: NaiveDateTime) -> Result<RiskReport> {
    let table = loader::load_table(text)?;
    compute_report(&table.rows, &table.header, config, now)
}
