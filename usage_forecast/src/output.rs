//! Per-group results and the combined output document

use crate::error::Result;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Group label as emitted in data points
///
/// Labels made of digits without a leading zero are written as JSON numbers;
/// everything else, zero-padded codes included, stays a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupLabel {
    Numeric(u64),
    Text(String),
}

impl GroupLabel {
    pub fn parse(label: &str) -> Self {
        let canonical = !label.is_empty()
            && label.bytes().all(|b| b.is_ascii_digit())
            && (label == "0" || !label.starts_with('0'));

        match label.parse::<u64>() {
            Ok(number) if canonical => GroupLabel::Numeric(number),
            _ => GroupLabel::Text(label.to_string()),
        }
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupLabel::Numeric(number) => write!(f, "{}", number),
            GroupLabel::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for GroupLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            GroupLabel::Numeric(number) => serializer.serialize_u64(*number),
            GroupLabel::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// An observed yearly total
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalPoint {
    pub year: i32,
    pub amount: f64,
}

/// A predicted yearly total past the last observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub year: i32,
    pub amount: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Everything produced for one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupResult {
    pub label: String,
    pub historical_points: Vec<HistoricalPoint>,
    pub forecast_points: Vec<ForecastPoint>,
    /// R² on the reference segment; `None` when undefined
    pub fit_score: Option<f64>,
    pub last_historical_year: i32,
    pub curve_descriptor: String,
}

/// Diagnostics of one group, keyed by label in [`OutputDocument::meta`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMeta {
    pub curve: String,
    #[serde(rename = "rScore")]
    pub r_score: Option<f64>,
    #[serde(rename = "realDataUntil")]
    pub real_data_until: i32,
}

/// One row of the output data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: GroupLabel,
    pub x: i32,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<[f64; 2]>,
}

/// The final document written by a forecasting run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputDocument {
    pub meta: BTreeMap<String, GroupMeta>,
    pub data: Vec<DataPoint>,
}

impl OutputDocument {
    /// Merge group results, in the order given, into one document
    pub fn assemble<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = GroupResult>,
    {
        let mut document = Self::default();

        for group in groups {
            let label = GroupLabel::parse(&group.label);

            document.data.extend(group.historical_points.iter().map(|point| DataPoint {
                label: label.clone(),
                x: point.year,
                y: point.amount,
                uncertainty: None,
            }));
            document.data.extend(group.forecast_points.iter().map(|point| DataPoint {
                label: label.clone(),
                x: point.year,
                y: point.amount,
                uncertainty: Some([point.lower, point.upper]),
            }));

            document.meta.insert(
                group.label,
                GroupMeta {
                    curve: group.curve_descriptor,
                    r_score: group.fit_score,
                    real_data_until: group.last_historical_year,
                },
            );
        }

        document
    }

    /// Serialize the document, pretty-printed when `pretty` is set
    pub fn to_writer<W: Write>(&self, writer: W, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_json::to_writer(writer, self)?;
        }
        Ok(())
    }

    /// Write the document to `path`, replacing any existing file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P, pretty: bool) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer, pretty)?;
        writer.flush()?;
        Ok(())
    }
}
