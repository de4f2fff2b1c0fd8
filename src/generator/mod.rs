//! Series generation.
//!
//! This module builds the two alert scenarios from a single routine:
//! - `Placement`: where the anomaly lands (random tail or midpoint).
//! - `PostProcess`: what follows the anomaly (nothing, or decay and tail clamp).
//! - `Variant`: the pairing of both for the ongoing and resolution scenarios.

mod placement;
mod shaping;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::debug;

use crate::{
    Scale,
    clock::{Clock, SystemClock},
    errors::{Error, Result},
    series::{AlertSeries, AnomalyMarker, TimeSeries},
};

pub use placement::*;
pub use shaping::{
    DECAY_FLOOR, DECAY_STEPS, PostProcess, RAMP_UP_STEPS, TAIL_LEN, decay_factor, ramp_factor, resolved_level,
};


/// Default length of a series.
pub const DEFAULT_DURATION_HOURS: u32 = 24;
/// Default spacing between two samples.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 30;
/// Half-width of the uniform baseline noise.
pub const NOISE_AMPLITUDE: f64 = 10.0;

/// Alert scenario to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// The value breaches the threshold near the end and stays there.
    #[default]
    Ongoing,
    /// The value breaches the threshold mid-series, then decays back under it.
    Resolution,
}

impl Variant {
    /// Returns the anomaly placement of this scenario.
    pub fn placement(&self) -> Placement {
        match self {
            Self::Ongoing => Placement::RandomTail,
            Self::Resolution => Placement::Midpoint,
        }
    }

    /// Returns the post-anomaly shaping of this scenario.
    pub fn post_process(&self) -> PostProcess {
        match self {
            Self::Ongoing => PostProcess::Identity,
            Self::Resolution => PostProcess::DecayAndClamp,
        }
    }
}

/// Generation parameters collected before validation.
#[derive(Debug, Clone, Copy)]
pub struct SeriesBuilderOptions {
    duration_hours: u32,
    interval_minutes: u32,
    threshold: Option<f64>,
}

impl Default for SeriesBuilderOptions {
    fn default() -> Self {
        Self {
            duration_hours: DEFAULT_DURATION_HOURS,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            threshold: None,
        }
    }
}

impl SeriesBuilderOptions {
    /// Sets how many hours the series covers.
    pub fn duration_hours(mut self, hours: u32) -> Self {
        self.duration_hours = hours;
        self
    }

    /// Sets the spacing between samples.
    pub fn interval_minutes(mut self, minutes: u32) -> Self {
        self.interval_minutes = minutes;
        self
    }

    /// Sets the alert threshold. A threshold of `0.0` behaves like no threshold.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Sets or clears the alert threshold.
    pub fn maybe_threshold(mut self, threshold: Option<f64>) -> Self {
        self.threshold = threshold;
        self
    }

    /// Validates the parameters.
    ///
    /// ### Returns
    /// The builder, or an error when the interval is zero, the series would be empty,
    /// or the threshold is not finite.
    pub fn build(self) -> Result<SeriesBuilder> {
        if self.interval_minutes == 0 {
            return Err(Error::ZeroInterval);
        }

        let len = (self.duration_hours as u64 * 60 / self.interval_minutes as u64) as usize;
        if len == 0 {
            return Err(Error::EmptySeries {
                duration_hours: self.duration_hours,
                interval_minutes: self.interval_minutes,
            });
        }

        if let Some(threshold) = self.threshold
            && !threshold.is_finite()
        {
            return Err(Error::InvalidThreshold(threshold.to_string()));
        }

        Ok(SeriesBuilder { options: self, len })
    }
}

/// Generates alert series from validated parameters.
#[derive(Debug, Clone, Copy)]
pub struct SeriesBuilder {
    options: SeriesBuilderOptions,
    len: usize,
}

impl SeriesBuilder {
    /// Starts from the defaults: 24 hours sampled every 30 minutes, no threshold.
    pub fn builder() -> SeriesBuilderOptions {
        SeriesBuilderOptions::default()
    }

    /// Creates a builder with the default duration and interval.
    ///
    /// ### Example
    /// ```rust
    /// use alert_charts::prelude::*;
    ///
    /// let builder = SeriesBuilder::new(Some(80.0)).unwrap();
    /// assert_eq!(builder.len(), 48);
    /// assert_eq!(builder.anomaly_level(), 96.0);
    /// ```
    pub fn new(threshold: Option<f64>) -> Result<Self> {
        Self::builder().maybe_threshold(threshold).build()
    }

    /// Returns the number of samples every generated series has.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: empty series are rejected by [`SeriesBuilderOptions::build`].
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the covered duration in hours.
    pub fn duration_hours(&self) -> u32 {
        self.options.duration_hours
    }

    /// Returns the sample spacing in minutes.
    pub fn interval_minutes(&self) -> u32 {
        self.options.interval_minutes
    }

    /// Returns the threshold, if any.
    pub fn threshold(&self) -> Option<f64> {
        self.options.threshold
    }

    /// Level the baseline noise is centred on.
    pub fn baseline_level(&self) -> f64 {
        self.options.threshold.scale_or(0.7, 50.0)
    }

    /// Value of the anomaly sample.
    pub fn anomaly_level(&self) -> f64 {
        self.options.threshold.scale_or(1.2, 95.0)
    }

    /// Generates a series with the thread-local random source and the wall clock.
    pub fn generate(&self, variant: Variant) -> AlertSeries {
        self.generate_with(variant, &mut rand::rng(), &SystemClock)
    }

    /// Generates a series with the given random source and clock.
    ///
    /// ### Arguments
    /// * `variant` - Scenario to generate.
    /// * `rng` - Source of the baseline noise and, for [`Variant::Ongoing`], the anomaly index.
    /// * `clock` - Provides the instant the series ends at.
    ///
    /// ### Returns
    /// Timestamps, values and the anomaly marker.
    pub fn generate_with<R, C>(&self, variant: Variant, rng: &mut R, clock: &C) -> AlertSeries
    where
        R: Rng + ?Sized,
        C: Clock + ?Sized,
    {
        let timestamps = self.timestamps(clock);
        let (values, anomaly) = self.values(variant.placement(), variant.post_process(), rng);
        debug!(?variant, len = self.len, anomaly, value = values[anomaly], "series generated");

        AlertSeries::from_generated(TimeSeries::new(timestamps, values), AnomalyMarker { index: anomaly })
    }

    /// Generates an ongoing alert.
    pub fn ongoing<R: Rng + ?Sized, C: Clock + ?Sized>(&self, rng: &mut R, clock: &C) -> AlertSeries {
        self.generate_with(Variant::Ongoing, rng, clock)
    }

    /// Generates a resolved alert.
    pub fn resolution<R: Rng + ?Sized, C: Clock + ?Sized>(&self, rng: &mut R, clock: &C) -> AlertSeries {
        self.generate_with(Variant::Resolution, rng, clock)
    }

    /// Evenly spaced instants, oldest first, the last one being `clock.now()`.
    fn timestamps<C: Clock + ?Sized>(&self, clock: &C) -> Vec<DateTime<Utc>> {
        let end = clock.now();
        let interval = Duration::minutes(self.options.interval_minutes as i64);
        (0..self.len as i32).rev().map(|i| end - interval * i).collect()
    }

    /// Baseline noise, anomaly, ramp-up, then the variant's post-processing.
    fn values<R: Rng + ?Sized>(&self, placement: Placement, post: PostProcess, rng: &mut R) -> (Vec<f64>, usize) {
        let base = self.baseline_level();
        let mut values = (0..self.len)
            .map(|_| base + rng.random_range(-NOISE_AMPLITUDE..=NOISE_AMPLITUDE))
            .collect::<Vec<_>>();

        let anomaly = placement.select(self.len, rng);
        values[anomaly] = self.anomaly_level();
        shaping::ramp_up(&mut values, anomaly);
        post.apply(&mut values, anomaly, self.options.threshold);

        (values, anomaly)
    }
}
