//! Fixed-size bucketing of daily series for the weekly and monthly charts.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const WEEK_DAYS: usize = 7;
pub const MONTH_DAYS: usize = 30;

/// Estimated calories per counted activity, applied to monthly sums only.
pub const CALORIES_PER_ACTIVITY: f64 = 35.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub value: f64,
}

/// Chart-ready parallel sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketedSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl BucketedSeries {
    pub fn from_points(points: &[DailySeriesPoint]) -> Self {
        Self {
            labels: points.iter().map(|p| p.label.clone()).collect(),
            values: points.iter().map(|p| p.value).collect(),
        }
    }

    pub fn buckets(&self) -> Vec<Bucket> {
        self.labels
            .iter()
            .zip(&self.values)
            .map(|(label, value)| Bucket {
                label: label.clone(),
                value: *value,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Splits the series into consecutive groups of `group_size` starting at the
/// first element. The last group may be short. Each group becomes one bucket
/// labelled `"<first> - <last>"` holding the sum of its values.
pub fn bucket(
    labels: &[String],
    values: &[f64],
    group_size: usize,
) -> Result<BucketedSeries, EngineError> {
    if group_size == 0 {
        return Err(EngineError::InvalidGroupSize);
    }
    if labels.len() != values.len() {
        return Err(EngineError::SeriesLengthMismatch {
            labels: labels.len(),
            values: values.len(),
        });
    }

    let mut result = BucketedSeries::default();
    for (label_group, value_group) in labels.chunks(group_size).zip(values.chunks(group_size)) {
        // chunks() never yields an empty slice
        let first = &label_group[0];
        let last = &label_group[label_group.len() - 1];
        result.labels.push(format!("{first} - {last}"));
        result.values.push(value_group.iter().sum());
    }
    Ok(result)
}

pub fn weekly(daily: &BucketedSeries) -> Result<BucketedSeries, EngineError> {
    bucket(&daily.labels, &daily.values, WEEK_DAYS)
}

/// Thirty-day buckets converted to a calorie estimate.
pub fn monthly_calories(daily: &BucketedSeries) -> Result<BucketedSeries, EngineError> {
    let mut monthly = bucket(&daily.labels, &daily.values, MONTH_DAYS)?;
    for value in monthly.values.iter_mut() {
        *value = calories_for(*value);
    }
    Ok(monthly)
}

pub fn calories_for(activity: f64) -> f64 {
    (activity * CALORIES_PER_ACTIVITY).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("d{i}")).collect()
    }

    #[test]
    fn splits_into_full_and_trailing_bucket() {
        let labels = days(10);
        let values = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0];

        let result = bucket(&labels, &values, 7).unwrap();

        assert_eq!(result.labels, vec!["d1 - d7", "d8 - d10"]);
        assert_eq!(result.values, vec![7.0, 6.0]);
        assert_eq!(
            result.buckets()[1],
            Bucket {
                label: "d8 - d10".into(),
                value: 6.0
            }
        );
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let result = bucket(&[], &[], 7).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn oversized_group_spans_everything() {
        let labels = days(3);
        let result = bucket(&labels, &[1.0, 2.0, 3.0], 30).unwrap();
        assert_eq!(result.labels, vec!["d1 - d3"]);
        assert_eq!(result.values, vec![6.0]);
    }

    #[test]
    fn single_element_group_repeats_label() {
        let labels = days(2);
        let result = bucket(&labels, &[4.0, 5.0], 1).unwrap();
        assert_eq!(result.labels, vec!["d1 - d1", "d2 - d2"]);
    }

    #[test]
    fn rejects_zero_group_and_mismatched_lengths() {
        assert_eq!(
            bucket(&days(2), &[1.0, 2.0], 0),
            Err(EngineError::InvalidGroupSize)
        );
        assert_eq!(
            bucket(&days(2), &[1.0], 7),
            Err(EngineError::SeriesLengthMismatch {
                labels: 2,
                values: 1
            })
        );
    }

    #[test]
    fn bucketing_is_repeatable() {
        let labels = days(45);
        let values: Vec<f64> = (0..45).map(|i| (i % 4) as f64).collect();
        let first = bucket(&labels, &values, 7).unwrap();
        let second = bucket(&labels, &values, 7).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn calories_apply_to_monthly_only() {
        let daily = BucketedSeries {
            labels: days(3),
            values: vec![3.0, 3.0, 4.0],
        };

        let monthly = monthly_calories(&daily).unwrap();
        assert_eq!(monthly.values, vec![350.0]);

        let week = weekly(&daily).unwrap();
        assert_eq!(week.values, vec![10.0]);
    }

    #[test]
    fn calorie_estimate_rounds() {
        assert_eq!(calories_for(10.0), 350.0);
        assert_eq!(calories_for(0.5), 18.0);
    }
}
