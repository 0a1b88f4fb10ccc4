//! Dashboard statistics engine.
//!
//! # Responsibility
//! - Compute, on demand, a flat snapshot of counters, a 7-day capture
//!   histogram and activity streaks from the store's current contents.
//!
//! # Invariants
//! - Read-only and idempotent: two computations with no intervening writes
//!   yield identical snapshots.
//! - Counters degrade independently: a failed read zeroes that counter
//!   (logged) and never fails the snapshot.
//! - Day bucketing uses the local calendar; a "day" is
//!   [local midnight, next local midnight).

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Local, NaiveDate, TimeZone};
use log::warn;
use rusqlite::Connection;
use serde::Serialize;

use crate::model::task::TaskStatus;
use crate::repo::task_repo::status_to_db;
use crate::repo::RepoResult;

/// Flat, read-only dashboard snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    /// Inspirations created today (local calendar).
    pub today_inspirations: u32,
    /// Tasks created today (local calendar).
    pub today_tasks: u32,
    pub total_inspirations: u32,
    pub total_tasks: u32,
    pub pending_tasks: u32,
    pub in_progress_tasks: u32,
    pub completed_tasks: u32,
    /// Inspirations with at least one linked task.
    pub organized_inspirations: u32,
    /// Inspirations with zero linked tasks.
    pub unorganized_inspirations: u32,
    /// Inspirations created on each of the last 7 days, today included.
    /// Always exactly 7 entries.
    pub weekly_inspirations: BTreeMap<NaiveDate, u32>,
    /// Consecutive active days ending today; 0 when today is inactive.
    pub current_streak: u32,
    /// Longest run of consecutive active days over all history.
    pub longest_streak: u32,
    /// Total number of distinct days with any capture or task activity.
    /// Despite the name, this is a distinct-day total, not a streak length;
    /// the field keeps its historical dashboard meaning.
    pub consecutive_days: u32,
}

/// Computes the snapshot for the current local day.
///
/// Invoked explicitly by the caller (app foreground, dashboard appear);
/// nothing keeps it in sync with later writes.
pub fn dashboard_snapshot(conn: &Connection) -> DashboardSnapshot {
    snapshot_for_day(conn, Local::now().date_naive())
}

/// Computes the snapshot treating `today` as the current local day.
///
/// Split out so callers (and tests) can pin the reference day across a
/// midnight boundary.
pub fn snapshot_for_day(conn: &Connection, today: NaiveDate) -> DashboardSnapshot {
    let today_bounds = local_day_bounds_ms(today);

    let today_inspirations = match today_bounds {
        Some((start, end)) => counter_or_zero(
            "today_inspirations",
            count_created_between(conn, "inspirations", start, end),
        ),
        None => 0,
    };
    let today_tasks = match today_bounds {
        Some((start, end)) => counter_or_zero(
            "today_tasks",
            count_created_between(conn, "tasks", start, end),
        ),
        None => 0,
    };

    let total_inspirations = counter_or_zero(
        "total_inspirations",
        count_query(conn, "SELECT COUNT(*) FROM inspirations;"),
    );
    let total_tasks = counter_or_zero(
        "total_tasks",
        count_query(conn, "SELECT COUNT(*) FROM tasks;"),
    );

    let pending_tasks = counter_or_zero(
        "pending_tasks",
        count_by_status(conn, TaskStatus::Pending),
    );
    let in_progress_tasks = counter_or_zero(
        "in_progress_tasks",
        count_by_status(conn, TaskStatus::InProgress),
    );
    let completed_tasks = counter_or_zero(
        "completed_tasks",
        count_by_status(conn, TaskStatus::Completed),
    );

    let organized_inspirations = counter_or_zero(
        "organized_inspirations",
        count_query(
            conn,
            "SELECT COUNT(*) FROM inspirations
             WHERE EXISTS (
                SELECT 1 FROM tasks WHERE tasks.inspiration_uuid = inspirations.uuid
             );",
        ),
    );
    let unorganized_inspirations = counter_or_zero(
        "unorganized_inspirations",
        count_query(
            conn,
            "SELECT COUNT(*) FROM inspirations
             WHERE NOT EXISTS (
                SELECT 1 FROM tasks WHERE tasks.inspiration_uuid = inspirations.uuid
             );",
        ),
    );

    let inspiration_dates = dates_or_empty("weekly_inspirations", created_dates(conn, "inspirations"));
    let task_dates = dates_or_empty("activity_dates", created_dates(conn, "tasks"));

    let weekly_inspirations = weekly_histogram(&inspiration_dates, today);

    let mut activity_dates: BTreeSet<NaiveDate> = inspiration_dates.into_iter().collect();
    activity_dates.extend(task_dates);

    DashboardSnapshot {
        today_inspirations,
        today_tasks,
        total_inspirations,
        total_tasks,
        pending_tasks,
        in_progress_tasks,
        completed_tasks,
        organized_inspirations,
        unorganized_inspirations,
        weekly_inspirations,
        current_streak: streak_ending_at(&activity_dates, today),
        longest_streak: longest_run(&activity_dates),
        consecutive_days: activity_dates.len() as u32,
    }
}

/// Counts distinct-day activity backwards from `today`, stopping at the
/// first inactive day. Zero when `today` itself is inactive.
fn streak_ending_at(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut cursor = today;
    while dates.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive dates, single ascending pass with a final
/// flush. "Consecutive" means exactly one day apart.
fn longest_run(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for &date in dates {
        run = match previous {
            Some(prev) if (date - prev).num_days() == 1 => run + 1,
            _ => {
                longest = longest.max(run);
                1
            }
        };
        previous = Some(date);
    }

    longest.max(run)
}

/// Builds the 7-day capture histogram ending at `today`, inclusive.
fn weekly_histogram(dates: &[NaiveDate], today: NaiveDate) -> BTreeMap<NaiveDate, u32> {
    let mut histogram = BTreeMap::new();
    for offset in 0..7u64 {
        if let Some(day) = today.checked_sub_days(chrono::Days::new(offset)) {
            histogram.insert(day, 0u32);
        }
    }

    for date in dates {
        if let Some(count) = histogram.get_mut(date) {
            *count += 1;
        }
    }

    histogram
}

fn counter_or_zero(counter: &str, result: RepoResult<u32>) -> u32 {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!("event=dashboard_counter module=stats status=degraded counter={counter} error={err}");
            0
        }
    }
}

fn dates_or_empty(counter: &str, result: RepoResult<Vec<NaiveDate>>) -> Vec<NaiveDate> {
    match result {
        Ok(dates) => dates,
        Err(err) => {
            warn!("event=dashboard_counter module=stats status=degraded counter={counter} error={err}");
            Vec::new()
        }
    }
}

fn count_query(conn: &Connection, sql: &str) -> RepoResult<u32> {
    let count: u32 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}

fn count_by_status(conn: &Connection, status: TaskStatus) -> RepoResult<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM tasks WHERE status = ?1;",
        [status_to_db(status)],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn count_created_between(
    conn: &Connection,
    table: &str,
    start_ms: i64,
    end_ms: i64,
) -> RepoResult<u32> {
    let count: u32 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE created_at >= ?1 AND created_at < ?2;"),
        [start_ms, end_ms],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Loads every `created_at` from `table` as a local calendar date.
///
/// Timestamps that cannot be mapped to a local date are skipped.
fn created_dates(conn: &Connection, table: &str) -> RepoResult<Vec<NaiveDate>> {
    let mut stmt = conn.prepare(&format!("SELECT created_at FROM {table};"))?;
    let mut rows = stmt.query([])?;
    let mut dates = Vec::new();
    while let Some(row) = rows.next()? {
        let epoch_ms: i64 = row.get(0)?;
        if let Some(date) = epoch_ms_to_local_date(epoch_ms) {
            dates.push(date);
        }
    }
    Ok(dates)
}

fn epoch_ms_to_local_date(epoch_ms: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map(|datetime| datetime.date_naive())
}

/// Returns `[local midnight of day, local midnight of next day)` as epoch
/// milliseconds. `None` only at the edges of the representable calendar.
fn local_day_bounds_ms(day: NaiveDate) -> Option<(i64, i64)> {
    let start = local_midnight_ms(day)?;
    let end = local_midnight_ms(day.succ_opt()?)?;
    Some((start, end))
}

fn local_midnight_ms(day: NaiveDate) -> Option<i64> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    // `earliest` handles DST transitions where midnight does not exist.
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|datetime| datetime.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::{longest_run, streak_ending_at, weekly_histogram};
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn day(ordinal: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, ordinal).expect("valid fixture date")
    }

    #[test]
    fn longest_run_flushes_final_segment() {
        let dates: BTreeSet<_> = [day(1), day(2), day(3), day(6)].into_iter().collect();
        assert_eq!(longest_run(&dates), 3);

        let tail_heavy: BTreeSet<_> = [day(1), day(4), day(5), day(6), day(7)]
            .into_iter()
            .collect();
        assert_eq!(longest_run(&tail_heavy), 4);
    }

    #[test]
    fn longest_run_of_empty_set_is_zero() {
        assert_eq!(longest_run(&BTreeSet::new()), 0);
    }

    #[test]
    fn streak_requires_activity_today() {
        let dates: BTreeSet<_> = [day(10), day(11)].into_iter().collect();
        assert_eq!(streak_ending_at(&dates, day(12)), 0);
        assert_eq!(streak_ending_at(&dates, day(11)), 2);
    }

    #[test]
    fn weekly_histogram_always_has_seven_buckets() {
        let histogram = weekly_histogram(&[], day(20));
        assert_eq!(histogram.len(), 7);
        assert!(histogram.values().all(|&count| count == 0));
        assert!(histogram.contains_key(&day(14)));
        assert!(histogram.contains_key(&day(20)));
        assert!(!histogram.contains_key(&day(13)));
    }

    #[test]
    fn weekly_histogram_counts_only_window_days() {
        let captures = vec![day(20), day(20), day(18), day(10)];
        let histogram = weekly_histogram(&captures, day(20));
        assert_eq!(histogram[&day(20)], 2);
        assert_eq!(histogram[&day(18)], 1);
        assert_eq!(histogram[&day(14)], 0);
    }
}
