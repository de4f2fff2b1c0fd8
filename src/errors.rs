/// Result type returned across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while generating or rendering a series.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Fewer positional parameters than the invocation requires.
    #[error("Missing parameters: expected <alert_name> <threshold> <unit> <host> <save_path>")]
    Usage,

    /// The threshold parameter is not a finite real number.
    #[error("Threshold must be a finite number (got: {0:?})")]
    InvalidThreshold(String),

    /// The sampling interval is zero minutes.
    #[error("Interval must be at least one minute")]
    ZeroInterval,

    /// The duration and interval produce a series without any sample.
    #[error("Series is empty: {duration_hours}h sampled every {interval_minutes}min yields no point")]
    EmptySeries {
        /// Requested duration in hours.
        duration_hours: u32,
        /// Requested interval in minutes.
        interval_minutes: u32,
    },

    /// The anomaly index does not point inside the series.
    /// Index: {0}, Length: {1}
    #[error("Anomaly index {0} is out of range for a series of {1} samples")]
    AnomalyOutOfRange(usize, usize),

    /// The drawing backend failed.
    #[error("Plotters error: {0}")]
    Plotters(String),

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error occurred.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
