//! Certainty-factor arithmetic.
//!
//! Confidences live in `[0, 1]`. Independent evidence for the same value is
//! merged with the MYCIN union rule `cf1 + cf2 * (1 - cf1)`.

/// Updates smaller than this are treated as no change.
pub const CF_EPSILON: f64 = 1e-9;

/// Clip a confidence into `[0, 1]`. NaN collapses to 0.
pub fn clip(cf: f64) -> f64 {
    if cf.is_nan() {
        0.0
    } else {
        cf.clamp(0.0, 1.0)
    }
}

/// Combine two confidences for the same conclusion.
pub fn combine(cf1: f64, cf2: f64) -> f64 {
    let (a, b) = (clip(cf1), clip(cf2));
    clip(a + b * (1.0 - a))
}

/// Running mean after appending one value to a collection of `count` items
/// (`count` includes the new one).
pub fn running_mean(mean: f64, count: usize, new_cf: f64) -> f64 {
    if count == 0 {
        return clip(new_cf);
    }
    let n = count as f64;
    clip((mean * (n - 1.0) + new_cf) / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_combine_known_values() {
        assert!((combine(0.6, 0.5) - 0.8).abs() < 1e-12);
        assert_eq!(combine(1.0, 0.3), 1.0);
        assert_eq!(combine(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_clip_bounds() {
        assert_eq!(clip(1.7), 1.0);
        assert_eq!(clip(-0.2), 0.0);
        assert_eq!(clip(f64::NAN), 0.0);
    }

    #[test]
    fn test_running_mean() {
        // two items at 0.8, third arrives at 0.2
        let mean = running_mean(0.8, 3, 0.2);
        assert!((mean - 0.6).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn combine_is_commutative(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            prop_assert!((combine(a, b) - combine(b, a)).abs() < 1e-12);
        }

        #[test]
        fn combine_is_associative(a in 0.0f64..=1.0, b in 0.0f64..=1.0, c in 0.0f64..=1.0) {
            let left = combine(combine(a, b), c);
            let right = combine(a, combine(b, c));
            prop_assert!((left - right).abs() < 1e-9);
        }

        #[test]
        fn combine_dominates_both_inputs(a in 0.001f64..0.999, b in 0.001f64..0.999) {
            let c = combine(a, b);
            prop_assert!(c >= a.max(b));
            prop_assert!(c <= 1.0);
        }
    }
}
