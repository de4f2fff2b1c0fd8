//! # Alert Charts: synthetic monitoring alert fixtures
//!
//! **Alert Charts** produces time series that look like the charts a monitoring system
//! attaches to an alert notification, without any monitoring backend behind them.
//! It is meant for test and demo harnesses that need a believable picture of an alert.
//!
//! ## Scenarios
//! | Variant        | Anomaly placement                | After the anomaly                                   |
//! |----------------|----------------------------------|-----------------------------------------------------|
//! | **Ongoing**    | random, within the last 20%      | plain baseline noise, the alert is still open        |
//! | **Resolution** | the midpoint                     | decay down to 40%, then the last samples sit below   |
//!
//! Both variants share the same construction:
//! 1. `n = duration_hours * 60 / interval_minutes` timestamps, evenly spaced and ending *now*.
//! 2. Baseline noise: `threshold * 0.7 ± 10` (or `50 ± 10` without threshold).
//! 3. Anomaly sample: `threshold * 1.2` (or `95`).
//! 4. Ramp-up: the three previous samples at 80%, 70% and 60% of the anomaly.
//!
//! ## Core Components
//! | Component           | Description                                                                  |
//! |---------------------|------------------------------------------------------------------------------|
//! | **`SeriesBuilder`** | Validated generation parameters and the generation routine.                  |
//! | **`Variant`**       | Ongoing or resolution scenario.                                              |
//! | **`AlertSeries`**   | Timestamps, values and the anomaly marker produced by a generation.          |
//! | **`ThresholdSpec`** | The alert boundary and its display labels.                                   |
//! | **`Clock`**         | Injectable source of "now".                                                  |
//! | **`Draw`**          | Renders an `AlertSeries` to PNG or SVG (`draws` feature).                    |
//!
//! ## Getting Started
//! ```rust
//! use alert_charts::prelude::*;
//! use chrono::DateTime;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let builder = SeriesBuilder::builder().threshold(80.0).build().unwrap();
//! let clock = FixedClock::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let alert = builder.generate_with(Variant::Resolution, &mut rng, &clock);
//! assert_eq!(alert.series().len(), 48);
//! assert_eq!(alert.anomaly().index(), 24);
//! assert_eq!(alert.anomaly_value(), 96.0);
//! ```
//!
//! ## Threshold of zero
//! A threshold of exactly `0.0` is handled as if no threshold was given: the default
//! levels (`50`, `95`, `30`) are used. See [`Scale`].
//!
//! ## Integrations
//! | Crate          | Purpose                                                                     |
//! |----------------|-----------------------------------------------------------------------------|
//! | [`rand`](https://crates.io/crates/rand) | Noise and anomaly placement, any `Rng` can be injected. |
//! | [`chrono`](https://crates.io/crates/chrono) | Timestamps.                                         |
//! | [`plotters`](https://crates.io/crates/plotters) | Chart rendering.                                |
//! | [`serde`](https://crates.io/crates/serde) | Serialize generated fixtures.                         |
//!
//! ## License
//! MIT
#![warn(missing_docs)]

/// Source of the instant series are anchored to.
pub mod clock;

/// Error types for the library.
pub mod errors;

/// Series generation: parameters, anomaly placement and shaping.
pub mod generator;

/// Generated series, anomaly marker and threshold labels.
pub mod series;

/// Draw alert charts with png or svg backends.
#[cfg(feature = "draws")]
pub mod draws;

/// Invocation layer shared by the binaries.
#[cfg(feature = "cli")]
pub mod cli;

/// Re-exports of commonly used types and traits for convenience.
pub mod prelude {
    pub use super::*;
    pub use crate::clock::*;
    pub use crate::errors::*;
    pub use crate::generator::*;
    pub use crate::series::*;

    #[cfg(feature = "draws")]
    pub use crate::draws::*;
}

/// Trait for deriving a level from an optional threshold.
///
/// A missing threshold and a threshold of exactly zero both fall back to the
/// default level, so a caller cannot ask for a zero threshold.
pub trait Scale {
    /// Returns `threshold * factor`, or `fallback` when the threshold is absent or zero.
    ///
    /// ### Arguments
    /// * `factor` - Multiplier applied to the threshold (e.g., 0.7 for the baseline).
    /// * `fallback` - Level used without a usable threshold.
    fn scale_or(self, factor: f64, fallback: f64) -> f64;
}

impl Scale for Option<f64> {
    fn scale_or(self, factor: f64, fallback: f64) -> f64 {
        match self {
            Some(threshold) if threshold != 0.0 => threshold * factor,
            _ => fallback,
        }
    }
}
