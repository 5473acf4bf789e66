pub mod series;
pub mod summary;

pub use series::{
    bucket, monthly_calories, weekly, Bucket, BucketedSeries, DailySeriesPoint,
    CALORIES_PER_ACTIVITY, MONTH_DAYS, WEEK_DAYS,
};
pub use summary::{
    attendance_summary, daily_chart, daily_series, posture_summary, DailyAttendance,
    PostureSummary, TrendPoint,
};

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::db::{Database, SUMMARY_SESSION_LIMIT};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardTotals {
    pub attendance_logs: u64,
    pub posture_sessions: usize,
}

/// Everything the dashboard charts need, in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub totals: DashboardTotals,
    pub attendance_summary: BTreeMap<String, DailyAttendance>,
    pub daily: BucketedSeries,
    pub weekly: BucketedSeries,
    pub monthly_calories: BucketedSeries,
    pub posture_summary: PostureSummary,
}

/// Start of the attendance window ending at `now`.
pub fn attendance_cutoff(now: DateTime<Utc>, window_days: i64) -> Result<DateTime<Utc>> {
    Duration::try_days(window_days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| anyhow!("attendance window of {window_days} days is out of range"))
}

/// Builds the dashboard from attendance logged in the last `window_days` and
/// the most recent stored sessions.
pub async fn build_dashboard(
    db: &Database,
    now: DateTime<Utc>,
    window_days: i64,
) -> Result<Dashboard> {
    let cutoff = attendance_cutoff(now, window_days)?;
    let logs = db.list_attendance_since(cutoff).await?;
    let sessions = db.list_recent_sessions(SUMMARY_SESSION_LIMIT).await?;

    let attendance = attendance_summary(&logs);
    let daily = daily_chart(&attendance);
    let weekly = weekly(&daily)?;
    let monthly_calories = monthly_calories(&daily)?;
    let posture = posture_summary(&sessions);

    Ok(Dashboard {
        totals: DashboardTotals {
            attendance_logs: attendance.values().map(DailyAttendance::total).sum(),
            posture_sessions: posture.total_sessions,
        },
        attendance_summary: attendance,
        daily,
        weekly,
        monthly_calories,
        posture_summary: posture,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn cutoff_is_window_before_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(
            attendance_cutoff(now, 7).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn oversized_window_is_an_error() {
        let now = Utc::now();
        assert!(attendance_cutoff(now, i64::MAX).is_err());
        assert!(attendance_cutoff(now, 400_000_000).is_err());
    }
}
