//! Data model handed from the generator to the renderer.

use chrono::{DateTime, Utc};

use crate::errors::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Evenly spaced samples of a simulated metric.
///
/// `values[i]` is the sample taken at `timestamps[i]`; timestamps are strictly increasing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub(crate) fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self { timestamps, values }
    }

    /// Returns the sample instants in chronological order.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Returns the sample values, index-aligned with [`TimeSeries::timestamps`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series has no sample.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(timestamp, value)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }

    /// Smallest and largest value, or `None` for an empty series.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

/// Position of the sample that breached the threshold.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyMarker {
    pub(crate) index: usize,
}

impl AnomalyMarker {
    /// Creates a marker, checking that `index` points inside a series of `len` samples.
    pub fn new(index: usize, len: usize) -> Result<Self> {
        if index >= len {
            return Err(Error::AnomalyOutOfRange(index, len));
        }
        Ok(Self { index })
    }

    /// Returns the anomaly index.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Alert boundary and the labels printed around it.
///
/// Only `value` takes part in generation; the labels are for display.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSpec {
    /// The alert boundary.
    pub value: f64,
    /// Unit printed next to values (e.g. `%`, `ms`).
    pub unit: String,
    /// Name of the alert.
    pub alert_name: String,
    /// Host the alert fired on.
    pub host: String,
}

impl ThresholdSpec {
    /// Creates a threshold with its display labels.
    pub fn new(value: f64, unit: impl ToString, alert_name: impl ToString, host: impl ToString) -> Self {
        Self {
            value,
            unit: unit.to_string(),
            alert_name: alert_name.to_string(),
            host: host.to_string(),
        }
    }
}

/// A generated series together with its anomaly marker.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct AlertSeries {
    series: TimeSeries,
    anomaly: AnomalyMarker,
}

impl AlertSeries {
    /// Pairs a series with an anomaly marker, checking the marker fits the series.
    pub fn new(series: TimeSeries, anomaly: AnomalyMarker) -> Result<Self> {
        if anomaly.index() >= series.len() {
            return Err(Error::AnomalyOutOfRange(anomaly.index(), series.len()));
        }
        Ok(Self { series, anomaly })
    }

    pub(crate) fn from_generated(series: TimeSeries, anomaly: AnomalyMarker) -> Self {
        debug_assert!(anomaly.index < series.len());
        Self { series, anomaly }
    }

    /// Returns the series.
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    /// Returns the anomaly marker.
    pub fn anomaly(&self) -> AnomalyMarker {
        self.anomaly
    }

    /// Returns the value of the anomaly sample.
    pub fn anomaly_value(&self) -> f64 {
        self.series.values[self.anomaly.index]
    }

    /// Splits into `(timestamps, values, anomaly_index)`.
    pub fn into_parts(self) -> (Vec<DateTime<Utc>>, Vec<f64>, usize) {
        (self.series.timestamps, self.series.values, self.anomaly.index)
    }

    /// Serializes the fixture to pretty-printed JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> TimeSeries {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let timestamps = (0..4).map(|i| start + Duration::minutes(30 * i)).collect();
        TimeSeries::new(timestamps, vec![3.0, -1.0, 7.5, 2.0])
    }

    #[test]
    fn bounds() {
        assert_eq!(sample().bounds(), Some((-1.0, 7.5)));
        assert_eq!(TimeSeries::new(vec![], vec![]).bounds(), None);
    }

    #[test]
    fn marker_must_fit() {
        assert!(AnomalyMarker::new(3, 4).is_ok());
        assert!(matches!(AnomalyMarker::new(4, 4), Err(Error::AnomalyOutOfRange(4, 4))));
    }

    #[test]
    fn alert_series_rejects_foreign_marker() {
        let marker = AnomalyMarker::new(9, 10).unwrap();
        assert!(matches!(AlertSeries::new(sample(), marker), Err(Error::AnomalyOutOfRange(9, 4))));
    }

    #[test]
    fn into_parts_keeps_alignment() {
        let alert = AlertSeries::new(sample(), AnomalyMarker::new(2, 4).unwrap()).unwrap();
        assert_eq!(alert.anomaly_value(), 7.5);
        let (timestamps, values, index) = alert.into_parts();
        assert_eq!(timestamps.len(), values.len());
        assert_eq!(values[index], 7.5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn to_json() {
        let alert = AlertSeries::new(sample(), AnomalyMarker::new(2, 4).unwrap()).unwrap();
        let json = alert.to_json().unwrap();
        assert!(json.contains("\"index\": 2"));
        let back: AlertSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back, alert);
    }
}
