//! Selection sampling without replacement
//!
//! Observations of a sample are visited one at a time; each is kept with
//! probability `(target - kept) / (depth - tried)`. After all `depth`
//! observations exactly `target` have been kept.

use rand::RngCore;
use rand_pcg::Pcg32;

/// Number of whole observations an abundance stands for
#[inline]
pub fn observations(value: f64) -> u32 {
    value as u32
}

/// Total observations of a sample's entries
pub fn observation_depth(values: impl IntoIterator<Item = f64>) -> u64 {
    values.into_iter().map(|x| u64::from(observations(x))).sum()
}

/// Generator for one sample: PCG32 with `seed` as initial state and the
/// sample index as stream, so every sample draws the same numbers no matter
/// which worker runs it.
pub fn sample_rng(seed: u64, sample: usize) -> Pcg32 {
    Pcg32::new(seed, sample as u64)
}

/// Running state of selection sampling over one sample
#[derive(Debug, Clone)]
pub struct Selection {
    rng: Pcg32,
    depth: u64,
    target: u64,
    tried: u64,
    kept: u64,
}

impl Selection {
    /// Start sampling `sample`, or `None` when its depth does not exceed `target`
    pub fn begin(seed: u64, sample: usize, depth: u64, target: u32) -> Option<Self> {
        let target = u64::from(target);
        (depth > target).then(|| Self {
            rng: sample_rng(seed, sample),
            depth,
            target,
            tried: 0,
            kept: 0,
        })
    }

    /// Walk `count` observations, returning how many are kept
    pub fn take(&mut self, count: u32) -> u32 {
        let mut retained = 0;
        for _ in 0..count {
            if self.kept == self.target {
                break;
            }
            let not_tried = self.depth - self.tried;
            let still_needed = self.target - self.kept;
            if u64::from(self.rng.next_u32()) % not_tried < still_needed {
                retained += 1;
                self.kept += 1;
            }
            self.tried += 1;
        }
        retained
    }

    pub fn kept(&self) -> u64 {
        self.kept
    }
}
