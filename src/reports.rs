use crate::classify::classify_rows;
use crate::columns::ColumnIndex;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{
    Bucket, BucketTotals, ComputedBucket, LifecycleState, NormalizedRecord, RiskReport, RiskTier,
    Row, Summary,
};
use crate::util::{format_clock_seconds, format_hms, minutes_between};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Marker shown instead of a countdown once the stage-by time has passed.
pub const PAST_MARKER: &str = "PAST";

/// Group records by exact stage-by instant, ascending.
pub fn aggregate_buckets(records: &[NormalizedRecord]) -> Vec<Bucket> {
    let mut map: BTreeMap<NaiveDateTime, Bucket> = BTreeMap::new();
    for r in records {
        let b = map.entry(r.deadline).or_insert_with(|| Bucket::new(r.deadline));
        b.total += 1;
        match r.state {
            LifecycleState::Picked => b.picked += 1,
            LifecycleState::InProgress => b.in_progress += 1,
            LifecycleState::Unassigned => b.unassigned += 1,
            LifecycleState::Other => {}
        }
    }
    map.into_values().collect()
}

/// Distinct workers on in-progress pick lists.
///
/// Exports without an associate column carry no worker ids at all; the count
/// of in-progress records stands in for headcount then.
pub fn active_headcount(records: &[NormalizedRecord]) -> usize {
    let in_progress = records.iter().filter(|r| r.state == LifecycleState::InProgress);
    let workers: HashSet<&str> = in_progress
        .clone()
        .flat_map(|r| r.assigned_workers.iter().map(String::as_str))
        .collect();
    if workers.is_empty() {
        in_progress.count()
    } else {
        workers.len()
    }
}

/// Tier for a capacity/need ratio. Non-finite ratios mean no outstanding
/// need and classify as Safe.
pub fn classify_ratio(ratio: f64, config: &Config) -> RiskTier {
    let t = &config.thresholds;
    if !ratio.is_finite() || ratio >= t.safe {
        RiskTier::Safe
    } else if ratio >= t.low {
        RiskTier::LowRisk
    } else if ratio >= t.high {
        RiskTier::HighRisk
    } else {
        RiskTier::ProjectedMiss
    }
}

/// Project staffing risk for every bucket.
///
/// Demand accumulates across buckets in deadline order and is never reset:
/// a later wave has to absorb everything still open ahead of it.
///
/// The ratio is not `capacity / cum_need`. The headcount need is turned back
/// into an implied pick-list count (rounded, floored at 1) and capacity is
/// compared against that, which is what the planning sheet's risk bands were
/// tuned against.
pub fn compute_risk(
    buckets: &[Bucket],
    active_headcount: usize,
    config: &Config,
    now: NaiveDateTime,
) -> RiskReport {
    let avg = config.avg_pl_min;
    let sf = config.thresholds.safe;
    let hc = active_headcount as f64;

    let mut cum_need = 0usize;
    let mut computed = Vec::with_capacity(buckets.len());
    for b in buckets {
        let is_past = b.deadline <= now;
        cum_need += b.unassigned + b.in_progress;
        let cum = cum_need as f64;

        let tl_min = minutes_between(now, b.deadline);
        let (capacity, headcount_need, pl_need_for_risk) = if tl_min > 0.0 {
            let capacity = hc * (tl_min / avg);
            let need = (cum * (avg / tl_min) * sf).ceil().max(0.0);
            let pl_need = ((need * tl_min) / (avg * sf)).round().max(1.0);
            (capacity, need as u64, pl_need)
        } else {
            (0.0, 0, cum)
        };

        let ratio = if pl_need_for_risk > 0.0 {
            capacity / pl_need_for_risk
        } else {
            f64::INFINITY
        };
        let risk_tier = if is_past { None } else { Some(classify_ratio(ratio, config)) };

        computed.push(ComputedBucket {
            deadline: b.deadline,
            is_past,
            totals: BucketTotals {
                total: b.total,
                picked: b.picked,
                in_progress: b.in_progress,
                unassigned: b.unassigned,
            },
            lists_remaining: b.total.saturating_sub(b.picked),
            fully_departed: b.total > 0 && b.picked == b.total,
            headcount_need,
            time_left_display: if is_past { PAST_MARKER.to_string() } else { format_hms(tl_min) },
            risk_tier,
            cum_need,
            time_left_minutes: tl_min,
            capacity,
            pl_need_for_risk,
            ratio,
        });
    }

    let future_buckets: Vec<ComputedBucket> =
        computed.into_iter().filter(|b| !b.is_past && !b.fully_departed).collect();
    let max_headcount_need = future_buckets.iter().map(|b| b.headcount_need).max().unwrap_or(0);

    let summary = Summary {
        now_time: format_clock_seconds(now),
        total_records: buckets.iter().map(|b| b.total).sum(),
        in_progress_records: buckets.iter().map(|b| b.in_progress).sum(),
        avg_pick_list_minutes: avg,
        shift_end_display: config.shift_end_display.clone(),
        active_headcount,
        max_headcount_need,
        headcount_surplus: active_headcount as i64 - max_headcount_need as i64,
    };
    debug!(
        buckets = buckets.len(),
        future = future_buckets.len(),
        active_headcount,
        max_headcount_need,
        "computed risk"
    );
    RiskReport { future_buckets, summary }
}

/// Run the whole pipeline over already-parsed rows.
///
/// Fails only when the header carries no column names or the configuration is
/// out of range; bad data rows are dropped.
pub fn compute_report(
    rows: &[Row],
    header: &Row,
    config: &Config,
    now: NaiveDateTime,
) -> Result<RiskReport> {
    if header.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::MissingHeader);
    }
    config.validate()?;

    let idx = ColumnIndex::resolve(header);
    let records = classify_rows(rows, &idx, now);
    let buckets = aggregate_buckets(&records);
    let hc = active_headcount(&records);
    Ok(compute_risk(&buckets, hc, config, now))
}
