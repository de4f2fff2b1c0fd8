//! Passes applied around the anomaly once the baseline is in place.

use crate::Scale;

/// Number of samples shaped before the anomaly.
pub const RAMP_UP_STEPS: usize = 3;
/// Number of samples shaped after the anomaly (resolution only).
pub const DECAY_STEPS: usize = 9;
/// Number of trailing samples forced below the threshold (resolution only).
pub const TAIL_LEN: usize = 5;
/// Lowest fraction of the anomaly value the decay reaches.
pub const DECAY_FLOOR: f64 = 0.4;

/// Fraction of the anomaly value `step` samples before it.
pub fn ramp_factor(step: usize) -> f64 {
    0.9 - step as f64 * 0.1
}

/// Fraction of the anomaly value `step` samples after it.
pub fn decay_factor(step: usize) -> f64 {
    (1.0 - step as f64 * 0.1).max(DECAY_FLOOR)
}

/// Level of the resolved tail.
pub fn resolved_level(threshold: Option<f64>) -> f64 {
    threshold.scale_or(0.6, 30.0)
}

/// Rewrites the samples before `anomaly` so they climb towards it (0.8, 0.7, 0.6).
/// Indices below zero are skipped.
pub(crate) fn ramp_up(values: &mut [f64], anomaly: usize) {
    let peak = values[anomaly];
    for step in 1..=RAMP_UP_STEPS.min(anomaly) {
        values[anomaly - step] = peak * ramp_factor(step);
    }
}

/// Rewrites the samples after `anomaly` so they fall back, never under [`DECAY_FLOOR`].
pub(crate) fn decay(values: &mut [f64], anomaly: usize) {
    let peak = values[anomaly];
    for step in 1..=DECAY_STEPS {
        let Some(value) = values.get_mut(anomaly + step) else {
            break;
        };
        *value = peak * decay_factor(step);
    }
}

/// Forces the last [`TAIL_LEN`] samples located after `anomaly` to `level`.
pub(crate) fn tail_clamp(values: &mut [f64], anomaly: usize, level: f64) {
    let start = values.len().saturating_sub(TAIL_LEN).max(anomaly + 1);
    for value in values.iter_mut().skip(start) {
        *value = level;
    }
}

/// What happens to the samples after the anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Leave them as baseline noise.
    Identity,
    /// Decay, then clamp the tail under the threshold. The clamp wins on overlap.
    DecayAndClamp,
}

impl PostProcess {
    pub(crate) fn apply(&self, values: &mut [f64], anomaly: usize, threshold: Option<f64>) {
        match self {
            Self::Identity => {}
            Self::DecayAndClamp => {
                decay(values, anomaly);
                tail_clamp(values, anomaly, resolved_level(threshold));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(len: usize) -> Vec<f64> {
        vec![1.0; len]
    }

    #[test]
    fn ramp_up_three_steps() {
        let mut values = flat(10);
        values[6] = 100.0;
        ramp_up(&mut values, 6);
        assert_eq!(values[5], 100.0 * ramp_factor(1));
        assert_eq!(values[4], 100.0 * ramp_factor(2));
        assert_eq!(values[3], 100.0 * ramp_factor(3));
        assert!((values[5] - 80.0).abs() < 1e-9);
        assert!((values[4] - 70.0).abs() < 1e-9);
        assert!((values[3] - 60.0).abs() < 1e-9);
        assert_eq!(values[2], 1.0);
        assert_eq!(values[7], 1.0);
    }

    #[test]
    fn ramp_up_near_start() {
        let mut values = flat(4);
        values[1] = 50.0;
        ramp_up(&mut values, 1);
        assert_eq!(values, vec![50.0 * ramp_factor(1), 50.0, 1.0, 1.0]);

        let mut values = flat(2);
        values[0] = 50.0;
        ramp_up(&mut values, 0);
        assert_eq!(values, vec![50.0, 1.0]);
    }

    #[test]
    fn decay_is_floored() {
        let mut values = flat(20);
        values[0] = 100.0;
        decay(&mut values, 0);
        for step in 1..=9 {
            assert_eq!(values[step], 100.0 * decay_factor(step));
        }
        assert!((values[1] - 90.0).abs() < 1e-9);
        assert_eq!(values[6], 40.0);
        assert_eq!(values[9], 40.0);
        assert_eq!(values[10], 1.0);
    }

    #[test]
    fn decay_stops_at_end() {
        let mut values = flat(3);
        values[1] = 10.0;
        decay(&mut values, 1);
        assert_eq!(values, vec![1.0, 10.0, 10.0 * decay_factor(1)]);
    }

    #[test]
    fn tail_clamp_only_after_anomaly() {
        let mut values = flat(6);
        tail_clamp(&mut values, 2, 0.0);
        assert_eq!(values, vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);

        let mut values = flat(3);
        tail_clamp(&mut values, 2, 0.0);
        assert_eq!(values, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn clamp_overrides_decay() {
        let mut values = flat(8);
        values[4] = 100.0;
        PostProcess::DecayAndClamp.apply(&mut values, 4, Some(80.0));
        assert_eq!(&values[5..], &[48.0, 48.0, 48.0]);
        assert_eq!(values[4], 100.0);
    }

    #[test]
    fn identity() {
        let mut values = flat(8);
        PostProcess::Identity.apply(&mut values, 4, Some(80.0));
        assert_eq!(values, flat(8));
    }
}
