use rand::Rng;

/// Where the anomaly sample lands in a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Uniformly random index in `[floor(len * 0.8), len - 1]`.
    RandomTail,
    /// Always `floor(len * 0.5)`.
    Midpoint,
}

impl Placement {
    /// Returns the smallest index this placement can select for a series of `len` samples.
    pub fn lower_bound(&self, len: usize) -> usize {
        match self {
            Self::RandomTail => len * 4 / 5,
            Self::Midpoint => len / 2,
        }
    }

    /// Selects the anomaly index for a series of `len` samples.
    ///
    /// `len` must be positive; [`Placement::Midpoint`] never draws from `rng`.
    pub fn select<R: Rng + ?Sized>(&self, len: usize, rng: &mut R) -> usize {
        debug_assert!(len > 0);
        match self {
            Self::RandomTail => rng.random_range(self.lower_bound(len)..=len - 1),
            Self::Midpoint => self.lower_bound(len),
        }
    }
}

#[cfg(test)]
use rand::{SeedableRng, rngs::StdRng};

#[cfg(test)]
#[test]
fn random_tail_stays_in_last_fifth() {
    let mut rng = StdRng::seed_from_u64(42);
    for len in 1..200 {
        for _ in 0..20 {
            let index = Placement::RandomTail.select(len, &mut rng);
            assert!(index >= len * 4 / 5, "len {len}: {index}");
            assert!(index < len);
        }
    }
}

#[cfg(test)]
#[test]
fn random_tail_covers_whole_window() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut seen = [false; 10];
    for _ in 0..500 {
        let index = Placement::RandomTail.select(48, &mut rng);
        seen[index - 38] = true;
    }
    assert!(seen.iter().all(|s| *s));
}

#[cfg(test)]
#[test]
fn midpoint() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(Placement::Midpoint.select(48, &mut rng), 24);
    assert_eq!(Placement::Midpoint.select(7, &mut rng), 3);
    assert_eq!(Placement::Midpoint.select(1, &mut rng), 0);
}

#[cfg(test)]
#[test]
fn lower_bounds() {
    assert_eq!(Placement::RandomTail.lower_bound(48), 38);
    assert_eq!(Placement::RandomTail.lower_bound(2), 1);
    assert_eq!(Placement::RandomTail.lower_bound(1), 0);
    assert_eq!(Placement::Midpoint.lower_bound(2), 1);
}
