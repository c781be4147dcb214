//! Usage record loading
//!
//! Records arrive as a flat list of `{municipal, usageType, date, amount}`
//! objects, either as a JSON array or as CSV with the same header.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One metered usage amount
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UsageRecord {
    /// Municipality identifier
    #[serde(deserialize_with = "deserialize_identifier")]
    pub municipal: String,
    /// Usage type (consumer group) identifier
    #[serde(rename = "usageType", deserialize_with = "deserialize_identifier")]
    pub usage_type: String,
    /// Local wall-clock time of the reading
    #[serde(deserialize_with = "deserialize_usage_date")]
    pub date: NaiveDateTime,
    /// Metered amount
    pub amount: f64,
}

impl UsageRecord {
    pub fn new(municipal: &str, usage_type: &str, date: NaiveDateTime, amount: f64) -> Self {
        Self {
            municipal: municipal.to_string(),
            usage_type: usage_type.to_string(),
            date,
            amount,
        }
    }
}

/// Data loader for usage records
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load records from a file, choosing the format by extension
    ///
    /// `.csv` files are read as CSV, everything else as a JSON array.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<UsageRecord>> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            Self::from_csv(path)
        } else {
            Self::from_json(path)
        }
    }

    /// Load records from a JSON array file
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Vec<UsageRecord>> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Parse records from any JSON source
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Vec<UsageRecord>> {
        let records: Vec<UsageRecord> = serde_json::from_reader(reader)?;
        Self::validate(records)
    }

    /// Parse records from a JSON string
    pub fn from_json_str(json: &str) -> Result<Vec<UsageRecord>> {
        Self::from_json_reader(json.as_bytes())
    }

    /// Load records from a CSV file with a `municipal,usageType,date,amount` header
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<UsageRecord>> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Parse records from any CSV source
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<UsageRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.deserialize::<CsvRow>() {
            records.push(UsageRecord::try_from(row?)?);
        }

        Self::validate(records)
    }

    fn validate(records: Vec<UsageRecord>) -> Result<Vec<UsageRecord>> {
        if let Some(index) = records.iter().position(|r| !r.amount.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Record {} has a non-finite amount",
                index
            )));
        }

        Ok(records)
    }
}

/// CSV fields stay text until converted, so zero-padded identifiers survive.
#[derive(Debug, Deserialize)]
struct CsvRow {
    municipal: String,
    #[serde(rename = "usageType")]
    usage_type: String,
    date: String,
    amount: f64,
}

impl TryFrom<CsvRow> for UsageRecord {
    type Error = ForecastError;

    fn try_from(row: CsvRow) -> Result<Self> {
        let date = match row.date.trim().parse::<i64>() {
            Ok(millis) => usage_date_from_millis(millis)?,
            Err(_) => parse_usage_date(&row.date)?,
        };

        Ok(Self {
            municipal: row.municipal,
            usage_type: row.usage_type,
            date,
            amount: row.amount,
        })
    }
}

/// Parse a usage timestamp, keeping the local wall-clock time
///
/// Accepts RFC 3339 (offset dropped after conversion to local time),
/// `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS[.fff]` and `YYYY-MM-DD`.
pub fn parse_usage_date(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(timestamp);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ForecastError::DataError(format!("Unrecognised date: {}", text)))
}

/// Convert epoch milliseconds (UTC) to a timestamp
pub fn usage_date_from_millis(millis: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis)
        .map(|timestamp| timestamp.naive_utc())
        .ok_or_else(|| ForecastError::DataError(format!("Timestamp out of range: {}", millis)))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Millis(i64),
    Text(String),
}

fn deserialize_usage_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    match RawDate::deserialize(deserializer)? {
        RawDate::Millis(millis) => usage_date_from_millis(millis),
        RawDate::Text(text) => parse_usage_date(&text),
    }
    .map_err(serde::de::Error::custom)
}

/// Numeric identifiers are kept in their JSON spelling (`301`, `-5`, `301.0`)
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
    Number(serde_json::Number),
    Text(String),
}

fn deserialize_identifier<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawIdentifier::deserialize(deserializer)? {
        RawIdentifier::Number(number) => number.to_string(),
        RawIdentifier::Text(text) => text,
    })
}
