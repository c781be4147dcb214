//! Grouping and yearly aggregation of usage records

use crate::data::UsageRecord;
use crate::error::{ForecastError, Result};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Categorical key records are grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupBy {
    /// Group by municipality
    #[default]
    Municipal,
    /// Group by usage type
    UsageType,
}

impl GroupBy {
    /// The key a record belongs to under this grouping
    pub fn key<'a>(&self, record: &'a UsageRecord) -> &'a str {
        match self {
            GroupBy::Municipal => &record.municipal,
            GroupBy::UsageType => &record.usage_type,
        }
    }

    /// Wire name as used in parameter files
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Municipal => "municipal",
            GroupBy::UsageType => "usageType",
        }
    }
}

/// Yearly totals of one group, ascending by year
#[derive(Debug, Clone, PartialEq)]
pub struct YearlySeries {
    points: Vec<(i32, f64)>,
}

impl YearlySeries {
    /// Create a series from `(year, total)` pairs
    ///
    /// The pairs must be non-empty and strictly ascending by year.
    pub fn new(points: Vec<(i32, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(ForecastError::ValidationError(
                "A yearly series needs at least one point".to_string(),
            ));
        }

        if let Some(pair) = points.windows(2).find(|pair| pair[1].0 <= pair[0].0) {
            return Err(ForecastError::ValidationError(format!(
                "Years must be strictly ascending, found {} after {}",
                pair[1].0, pair[0].0
            )));
        }

        Ok(Self { points })
    }

    /// Number of observed years
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true for a constructed series
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(i32, f64)] {
        &self.points
    }

    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|(year, _)| *year).collect()
    }

    pub fn totals(&self) -> Vec<f64> {
        self.points.iter().map(|(_, total)| *total).collect()
    }

    pub fn first_year(&self) -> i32 {
        self.points[0].0
    }

    pub fn last_year(&self) -> i32 {
        self.points[self.points.len() - 1].0
    }
}

/// Partition records by `group_by` and sum their amounts per calendar year
///
/// Groups come back ordered by label, each series ordered by year.
pub fn aggregate_by_year(
    records: &[UsageRecord],
    group_by: GroupBy,
) -> Result<BTreeMap<String, YearlySeries>> {
    let mut totals: BTreeMap<String, BTreeMap<i32, f64>> = BTreeMap::new();

    for record in records {
        *totals
            .entry(group_by.key(record).to_string())
            .or_default()
            .entry(record.date.year())
            .or_insert(0.0) += record.amount;
    }

    totals
        .into_iter()
        .map(|(label, years)| {
            YearlySeries::new(years.into_iter().collect()).map(|series| (label, series))
        })
        .collect()
}
