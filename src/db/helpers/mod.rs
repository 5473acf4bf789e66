use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::db::models::CheckType;
use crate::models::{ExerciseMode, Feedback};

pub fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn to_u8(value: i64, field: &str) -> Result<u8> {
    u8::try_from(value).map_err(|_| anyhow!("{field} out of range: {value}"))
}

pub fn to_usize(value: i64, field: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| anyhow!("{field} contains negative value {value}"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_exercise(value: &str) -> Result<ExerciseMode> {
    value
        .parse::<ExerciseMode>()
        .with_context(|| format!("stored exercise '{value}' is not recognised"))
}

pub fn parse_feedback(value: &str) -> Result<Feedback> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .with_context(|| format!("stored feedback '{value}' is not recognised"))
}

pub fn parse_check_type(value: &str) -> Result<CheckType> {
    match value {
        "checkin" => Ok(CheckType::Checkin),
        "checkout" => Ok(CheckType::Checkout),
        other => Err(anyhow!("unknown check type {other}")),
    }
}
