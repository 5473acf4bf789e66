use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{AttendanceLog, CheckType, StoredSession};

use super::series::{BucketedSeries, DailySeriesPoint};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAttendance {
    pub checkins: u64,
    pub checkouts: u64,
}

impl DailyAttendance {
    pub fn total(&self) -> u64 {
        self.checkins + self.checkouts
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub completion: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostureSummary {
    pub total_sessions: usize,
    /// Mean session completion rounded to two decimals.
    pub avg_completion: f64,
    pub exercise_breakdown: BTreeMap<String, u64>,
    pub accuracy_trend: Vec<TrendPoint>,
}

/// Check-ins and check-outs per calendar day (UTC, `YYYY-MM-DD`). Days with no
/// logs are absent rather than zero.
pub fn attendance_summary(logs: &[AttendanceLog]) -> BTreeMap<String, DailyAttendance> {
    let mut daily: BTreeMap<String, DailyAttendance> = BTreeMap::new();
    for log in logs {
        let day = daily
            .entry(log.timestamp.format("%Y-%m-%d").to_string())
            .or_default();
        match log.check_type {
            CheckType::Checkin => day.checkins += 1,
            CheckType::Checkout => day.checkouts += 1,
        }
    }
    daily
}

/// Total attendance events per day, in day order.
pub fn daily_series(summary: &BTreeMap<String, DailyAttendance>) -> Vec<DailySeriesPoint> {
    summary
        .iter()
        .map(|(day, counts)| DailySeriesPoint {
            label: day.clone(),
            value: counts.total() as f64,
        })
        .collect()
}

pub fn daily_chart(summary: &BTreeMap<String, DailyAttendance>) -> BucketedSeries {
    BucketedSeries::from_points(&daily_series(summary))
}

pub fn posture_summary(sessions: &[StoredSession]) -> PostureSummary {
    if sessions.is_empty() {
        return PostureSummary::default();
    }

    let mut completion_sum: u64 = 0;
    let mut exercise_breakdown = BTreeMap::new();
    let mut accuracy_trend = Vec::with_capacity(sessions.len());

    for session in sessions {
        completion_sum += u64::from(session.average_completion);
        *exercise_breakdown
            .entry(session.exercise.as_str().to_string())
            .or_insert(0) += 1;
        accuracy_trend.push(TrendPoint {
            timestamp: session.timestamp,
            completion: session.average_completion,
        });
    }
    accuracy_trend.sort_by_key(|point| point.timestamp);

    let mean = completion_sum as f64 / sessions.len() as f64;

    PostureSummary {
        total_sessions: sessions.len(),
        avg_completion: (mean * 100.0).round() / 100.0,
        exercise_breakdown,
        accuracy_trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseMode, Feedback};
    use chrono::TimeZone;

    fn log(day: u32, hour: u32, check_type: CheckType) -> AttendanceLog {
        AttendanceLog {
            id: None,
            user_id: 1,
            check_type,
            qr_token: "token".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
        }
    }

    fn session(minute: u32, exercise: ExerciseMode, completion: u8) -> StoredSession {
        StoredSession {
            id: format!("s{minute}"),
            user_id: 1,
            exercise,
            average_completion: completion,
            feedback: Feedback::GoodPosture,
            frame_count: 10,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, minute, 0).unwrap(),
        }
    }

    #[test]
    fn groups_attendance_by_day() {
        let logs = vec![
            log(2, 8, CheckType::Checkin),
            log(1, 8, CheckType::Checkin),
            log(1, 18, CheckType::Checkout),
            log(2, 19, CheckType::Checkout),
            log(2, 20, CheckType::Checkin),
        ];

        let summary = attendance_summary(&logs);

        assert_eq!(summary.len(), 2);
        assert_eq!(
            summary["2024-03-01"],
            DailyAttendance {
                checkins: 1,
                checkouts: 1
            }
        );
        assert_eq!(summary["2024-03-02"].total(), 3);

        let chart = daily_chart(&summary);
        assert_eq!(chart.labels, vec!["2024-03-01", "2024-03-02"]);
        assert_eq!(chart.values, vec![2.0, 3.0]);
    }

    #[test]
    fn summarises_sessions() {
        let sessions = vec![
            session(30, ExerciseMode::HandRaises, 80),
            session(10, ExerciseMode::Default, 33),
            session(20, ExerciseMode::HandRaises, 34),
        ];

        let summary = posture_summary(&sessions);

        assert_eq!(summary.total_sessions, 3);
        // 147 / 3 = 49.0
        assert_eq!(summary.avg_completion, 49.0);
        assert_eq!(summary.exercise_breakdown["hand_raises"], 2);
        assert_eq!(summary.exercise_breakdown["default"], 1);
        let order: Vec<u8> = summary.accuracy_trend.iter().map(|p| p.completion).collect();
        assert_eq!(order, vec![33, 34, 80]);
    }

    #[test]
    fn rounds_average_to_two_decimals() {
        let sessions = vec![
            session(1, ExerciseMode::Default, 10),
            session(2, ExerciseMode::Default, 10),
            session(3, ExerciseMode::Default, 11),
        ];
        assert_eq!(posture_summary(&sessions).avg_completion, 10.33);
    }

    #[test]
    fn empty_summary_is_zeroed() {
        let summary = posture_summary(&[]);
        assert_eq!(summary.total_sessions, 0);
        assert_eq!(summary.avg_completion, 0.0);
        assert!(summary.accuracy_trend.is_empty());
    }
}
