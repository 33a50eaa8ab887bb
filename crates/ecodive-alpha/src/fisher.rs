//! Fisher's log-series alpha
//!
//! Solves `S = α ln(1 + N/α)` for α. The left bound is halved and the right
//! bound doubled until they bracket the root, then the bracket is bisected
//! until both ends agree after rounding to the requested number of decimals.

/// Round `value` to `digits` decimal places
#[inline]
pub fn round_to(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (value * scale).round() / scale
}

#[inline]
fn expected_richness(alpha: f64, depth: f64) -> f64 {
    alpha * (1.0 + depth / alpha).ln()
}

/// Fisher's alpha for `richness` observed features over `depth` observations.
///
/// Returns `0` for an empty sample and `+∞` when every observation is a
/// distinct feature, since `α ln(1 + N/α) < N` for all finite α.
pub fn fisher_alpha(richness: f64, depth: f64, digits: u32) -> f64 {
    if richness <= 0.0 {
        return 0.0;
    }
    if richness >= depth {
        return f64::INFINITY;
    }

    let mut lo = 1.0f64;
    let mut hi = 1.0f64;
    while expected_richness(hi, depth) < richness {
        hi *= 2.0;
    }
    while expected_richness(lo, depth) > richness {
        lo /= 2.0;
    }

    while round_to(lo, digits) != round_to(hi, digits) {
        let mid = lo + (hi - lo) / 2.0;
        if mid <= lo || mid >= hi {
            break;
        }
        if expected_richness(mid, depth) < richness {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    round_to(lo + (hi - lo) / 2.0, digits)
}
