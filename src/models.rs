// Wire models: collectd write_http input, InfluxDB series output

use crate::error::TranslateError;
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;

/// Column layout of every point written to InfluxDB.
pub const SERIES_COLUMNS: [&str; 3] = ["time", "value", "hostname"];

/// collectd data source type; anything besides counter, gauge and derive is unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceType {
    Counter,
    Gauge,
    Derive,
    #[serde(other)]
    Unsupported,
}

impl DataSourceType {
    pub fn is_supported(self) -> bool {
        !matches!(self, DataSourceType::Unsupported)
    }
}

/// One element of the JSON array posted by collectd's write_http plugin.
///
/// Every field is required. Extra fields such as `interval` and `meta` are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SampleGroup {
    pub host: String,
    pub plugin: String,
    pub plugin_instance: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub type_instance: String,
    pub dstypes: Vec<DataSourceType>,
    pub dsnames: Vec<String>,
    /// Kept as the JSON number collectd sent, so integer counters stay integers.
    pub values: Vec<Number>,
    /// Epoch seconds; fractional timestamps are truncated.
    #[serde(deserialize_with = "epoch_seconds")]
    pub time: i64,
}

impl SampleGroup {
    /// Checks that the three statistic arrays line up index by index.
    pub fn validate(&self) -> Result<(), TranslateError> {
        let n = self.dstypes.len();
        if self.dsnames.len() != n || self.values.len() != n {
            return Err(TranslateError::LengthMismatch {
                plugin: self.plugin.clone(),
                dstypes: n,
                dsnames: self.dsnames.len(),
                values: self.values.len(),
            });
        }
        Ok(())
    }
}

fn epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = Number::deserialize(deserializer)?;
    if let Some(secs) = n.as_i64() {
        return Ok(secs);
    }
    match n.as_f64() {
        Some(secs) if secs.is_finite() => Ok(secs.trunc() as i64),
        _ => Err(D::Error::custom(format!("invalid timestamp {n}"))),
    }
}

/// One point of one InfluxDB series. Serializes as
/// `{"name": .., "columns": ["time","value","hostname"], "points": [[time, value, hostname]]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub name: String,
    pub time: i64,
    pub value: Number,
    pub hostname: String,
}

impl Serialize for OutputRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut series = serializer.serialize_struct("OutputRecord", 3)?;
        series.serialize_field("name", &self.name)?;
        series.serialize_field("columns", &SERIES_COLUMNS)?;
        series.serialize_field("points", &[(self.time, &self.value, self.hostname.as_str())])?;
        series.end()
    }
}
