use crate::config::Config;
use crate::error::Result;
use crate::types::{BucketRow, ComputedBucket, RiskReport, Summary, SummaryRow};
use crate::util::{format_clock, format_int, format_number};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn bucket_row(b: &ComputedBucket) -> BucketRow {
    BucketRow {
        stage_by: format_clock(b.deadline),
        total: b.totals.total,
        lists_remaining: b.lists_remaining,
        not_assigned: b.totals.unassigned,
        hc_need: b.headcount_need,
        time_left: b.time_left_display.clone(),
        risk: b.risk_label().to_string(),
    }
}

pub fn summary_row(s: &Summary) -> SummaryRow {
    SummaryRow {
        time: s.now_time.clone(),
        total: format_int(s.total_records),
        in_progress: format_int(s.in_progress_records),
        avg: format_number(s.avg_pick_list_minutes, 1),
        shift_end: s.shift_end_display.clone(),
        active_hc: format_int(s.active_headcount),
        hc_need: format_int(s.max_headcount_need),
        surplus: format_int(s.headcount_surplus),
    }
}

/// Rows for the bucket table, after the Safe-row filter.
pub fn visible_rows(report: &RiskReport, config: &Config) -> Vec<BucketRow> {
    report.visible_buckets(config).into_iter().map(bucket_row).collect()
}

pub fn empty_message(config: &Config) -> &'static str {
    if config.show_safe_rows {
        "No future waves."
    } else {
        "No at-risk waves (non-Safe, non-PAST, non-departed)."
    }
}

pub fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::markdown()).to_string()
}

/// Summary tiles followed by the bucket table, as printed by the binary.
pub fn render_report(report: &RiskReport, config: &Config) -> String {
    let mut out = String::new();
    out.push_str("Pick Risk Waves\n\n");
    out.push_str(&render_table(vec![summary_row(&report.summary)]));
    out.push_str("\n\n");
    let rows = visible_rows(report, config);
    if rows.is_empty() {
        out.push_str(empty_message(config));
    } else {
        out.push_str(&render_table(rows));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BucketTotals, RiskTier};
    use chrono::NaiveDate;

    fn computed(h: u32, tier: RiskTier) -> ComputedBucket {
        ComputedBucket {
            deadline: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap().and_hms_opt(h, 5, 0).unwrap(),
            is_past: false,
            totals: BucketTotals { total: 4, picked: 1, in_progress: 2, unassigned: 1 },
            lists_remaining: 3,
            fully_departed: false,
            headcount_need: 2,
            time_left_display: "1:00:00".to_string(),
            risk_tier: Some(tier),
            cum_need: 3,
            time_left_minutes: 60.0,
            capacity: 4.0,
            pl_need_for_risk: 3.0,
            ratio: 1.3,
        }
    }

    fn report() -> RiskReport {
        RiskReport {
            future_buckets: vec![computed(8, RiskTier::Safe), computed(9, RiskTier::HighRisk)],
            summary: Summary {
                now_time: "07:30:00".to_string(),
                total_records: 1234,
                in_progress_records: 4,
                avg_pick_list_minutes: 13.5,
                shift_end_display: "11:50".to_string(),
                active_headcount: 3,
                max_headcount_need: 5,
                headcount_surplus: -2,
            },
        }
    }

    #[test]
    fn test_safe_rows_hidden_by_default() {
        let cfg = Config::default();
        let rows = visible_rows(&report(), &cfg);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stage_by, "09:05");
        assert_eq!(rows[0].risk, "High Risk");

        let rows = visible_rows(&report(), &cfg.with_show_safe_rows(true));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_summary_row_formatting() {
        let row = summary_row(&report().summary);
        assert_eq!(row.total, "1,234");
        assert_eq!(row.avg, "13.5");
        assert_eq!(row.surplus, "-2");
    }

    #[test]
    fn test_render_report_empty_message() {
        let mut r = report();
        r.future_buckets.truncate(1);
        let text = render_report(&r, &Config::default());
        assert!(text.contains("No at-risk waves"));
        assert!(text.contains("HCNeed"));
    }

    #[test]
    fn test_write_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let r = report();
        let rows: Vec<BucketRow> = r.future_buckets.iter().map(bucket_row).collect();
        write_csv(dir.path().join("b.csv"), &rows).unwrap();
        write_json(dir.path().join("r.json"), &r).unwrap();
        let csv_text = std::fs::read_to_string(dir.path().join("b.csv")).unwrap();
        assert!(csv_text.starts_with("StageBy,TotalPicklists"));
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("r.json")).unwrap()).unwrap();
        assert_eq!(json["summary"]["headcountSurplus"], -2);
        assert_eq!(json["futureBuckets"][1]["riskTier"], "High Risk");
    }
}
