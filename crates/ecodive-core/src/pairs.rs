//! Sample pair enumeration
//!
//! Pairs are numbered along the upper triangle in row order:
//! `(0,1), (0,2), …, (0,n-1), (1,2), …, (n-2,n-1)`. A [`PairList`] selects a
//! strictly increasing subset of those numbers and resolves each one to its
//! `(i, j)` sample indices up front.

use crate::{Error, Result};

/// Number of unordered sample pairs for `n_samples`
pub fn total_pairs(n_samples: usize) -> usize {
    n_samples * n_samples.saturating_sub(1) / 2
}

/// Upper-triangle position of the pair `(i, j)`, `i < j < n_samples`
pub fn condensed_index(n_samples: usize, i: usize, j: usize) -> usize {
    debug_assert!(i < j && j < n_samples);
    i * n_samples - i * (i + 1) / 2 + (j - i - 1)
}

/// Resolved list of sample pairs, one per output slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairList {
    n_samples: usize,
    pairs: Vec<(usize, usize)>,
}

impl PairList {
    /// Every pair of `n_samples` samples
    pub fn all(n_samples: usize) -> Result<Self> {
        let mut pairs = reserve_pairs(total_pairs(n_samples))?;
        for i in 0..n_samples {
            for j in (i + 1)..n_samples {
                pairs.push((i, j));
            }
        }
        Ok(Self { n_samples, pairs })
    }

    /// Pairs selected by strictly increasing upper-triangle positions
    pub fn from_indices(n_samples: usize, indices: &[usize]) -> Result<Self> {
        let total = total_pairs(n_samples);
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidInput(
                "pair indices must be strictly increasing".to_string(),
            ));
        }
        if let Some(&last) = indices.last() {
            if last >= total {
                return Err(Error::InvalidInput(format!(
                    "pair index {last} out of range for {total} pairs"
                )));
            }
        }

        let mut pairs = reserve_pairs(indices.len())?;
        let mut wanted = indices.iter().copied().peekable();
        let mut k = 0;
        'outer: for i in 0..n_samples {
            for j in (i + 1)..n_samples {
                match wanted.peek() {
                    None => break 'outer,
                    Some(&next) if next == k => {
                        pairs.push((i, j));
                        wanted.next();
                    }
                    Some(_) => {}
                }
                k += 1;
            }
        }
        Ok(Self { n_samples, pairs })
    }

    /// Pairs from an optional selection, defaulting to all pairs
    pub fn select(n_samples: usize, indices: Option<&[usize]>) -> Result<Self> {
        match indices {
            Some(idx) => Self::from_indices(n_samples, idx),
            None => Self::all(n_samples),
        }
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of output slots
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `(i, j)` of output slot `slot`
    #[inline]
    pub fn pair(&self, slot: usize) -> (usize, usize) {
        self.pairs[slot]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }
}

fn reserve_pairs(len: usize) -> Result<Vec<(usize, usize)>> {
    let mut pairs = Vec::new();
    pairs
        .try_reserve_exact(len)
        .map_err(|_| Error::allocation("pair table", len))?;
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_pairs_order() {
        let list = PairList::all(4).unwrap();
        let pairs: Vec<_> = list.iter().collect();
        assert_eq!(
            pairs,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
        for (k, (i, j)) in pairs.into_iter().enumerate() {
            assert_eq!(condensed_index(4, i, j), k);
        }
    }

    #[test]
    fn test_subset() {
        let list = PairList::from_indices(4, &[1, 3, 5]).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.pair(0), (0, 2));
        assert_eq!(list.pair(1), (1, 2));
        assert_eq!(list.pair(2), (2, 3));
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(PairList::all(0).unwrap().is_empty());
        assert!(PairList::all(1).unwrap().is_empty());
        assert_eq!(total_pairs(2), 1);
        assert!(PairList::from_indices(3, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_indices() {
        assert!(PairList::from_indices(4, &[2, 1]).is_err());
        assert!(PairList::from_indices(4, &[1, 1]).is_err());
        assert!(PairList::from_indices(4, &[6]).is_err());
    }
}
