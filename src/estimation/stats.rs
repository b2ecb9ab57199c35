//! Statistical helpers shared by the estimation engine and its callers.
//!
//! All functions are total: input they cannot make sense of yields `None`
//! (or `0` for [`trend`]) instead of an error.

/// Decimal places used for temperatures and most derived values.
pub const STANDARD_PRECISION: u32 = 2;

/// Decimal places used for the power and pressure domains.
pub const POWER_PRECISION: u32 = 4;

// ---

/// Round `value` to `places` decimals; `None` for missing, NaN or infinite input.
///
/// Exact ties go to the even neighbour, so `0.125` rounds to `0.12`.
pub fn round_to(value: Option<f64>, places: u32) -> Option<f64> {
    // ---
    let value = value.filter(|v| v.is_finite())?;
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round_ties_even() / factor;

    // Magnitudes beyond the scaled range already have no fractional digits
    Some(if rounded.is_finite() { rounded } else { value })
}

pub fn round2(value: Option<f64>) -> Option<f64> {
    round_to(value, STANDARD_PRECISION)
}

pub fn round4(value: Option<f64>) -> Option<f64> {
    round_to(value, POWER_PRECISION)
}

/// Direction of change between two consecutive values of a variable.
///
/// Returns `1` when `current` rose, `-1` when it fell and `0` when the values
/// are equal or either one is missing or zero.
pub fn trend(previous: Option<f64>, current: Option<f64>) -> i8 {
    // ---
    match (previous, current) {
        (Some(prev), Some(curr)) if prev != 0.0 && curr != 0.0 && prev != curr => {
            if curr > prev {
                1
            } else {
                -1
            }
        }
        _ => 0,
    }
}

/// Sample standard deviation of the present, non-zero entries of `values`,
/// rounded to `places` decimals. `None` with fewer than two such entries.
pub fn stdev(values: &[Option<f64>], places: u32) -> Option<f64> {
    // ---
    let items: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| *v != 0.0)
        .collect();

    if items.len() < 2 {
        return None;
    }

    let n = items.len() as f64;
    let mean = items.iter().sum::<f64>() / n;
    let variance = items.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

    round_to(Some(variance.sqrt()), places)
}

/// [`stdev`] at the standard precision.
pub fn deviation(values: &[Option<f64>]) -> Option<f64> {
    stdev(values, STANDARD_PRECISION)
}

/// [`stdev`] at the power/pressure precision.
pub fn deviation_power(values: &[Option<f64>]) -> Option<f64> {
    stdev(values, POWER_PRECISION)
}

/// Keep the elements of `data` whose distance to the mean is strictly less
/// than `m` population standard deviations, in their original order.
///
/// `None` for fewer than two points or any non-finite element.
pub fn reject_outliers(data: &[f64], m: f64) -> Option<Vec<f64>> {
    // ---
    if data.len() < 2 || !m.is_finite() || data.iter().any(|v| !v.is_finite()) {
        tracing::debug!(len = data.len(), "Outlier rejection needs two finite points");
        return None;
    }

    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let std = (data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    let limit = m * std;

    Some(
        data.iter()
            .copied()
            .filter(|v| (v - mean).abs() < limit)
            .collect(),
    )
}

/// Continuous median (the 0.5 percentile with linear interpolation).
///
/// `None` for empty input or any NaN.
pub fn median(values: &[f64]) -> Option<f64> {
    // ---
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_round2_and_round4() {
        // ---
        assert_eq!(round2(Some(11.1111)), Some(11.11));
        assert_eq!(round2(Some(-3.456)), Some(-3.46));
        assert_eq!(round4(Some(0.123456)), Some(0.1235));
        assert_eq!(round2(Some(1.5e307)), Some(1.5e307));
    }

    #[test]
    fn test_rounding_ties_go_to_even() {
        // ---
        assert_eq!(round2(Some(0.125)), Some(0.12));
        assert_eq!(round2(Some(0.375)), Some(0.38));
        assert_eq!(round2(Some(-0.125)), Some(-0.12));
    }

    #[test]
    fn test_rounding_rejects_non_finite() {
        // ---
        for bad in [None, Some(f64::NAN), Some(f64::INFINITY), Some(f64::NEG_INFINITY)] {
            assert_eq!(round2(bad), None);
            assert_eq!(round4(bad), None);
        }
    }

    #[test]
    fn test_rounding_is_idempotent() {
        // ---
        for x in [0.0, 1.005, 2.675, 11.111, -7.12345, 123456.789, 0.1 + 0.2] {
            assert_eq!(round2(round2(Some(x))), round2(Some(x)), "round2 {x}");
            assert_eq!(round4(round4(Some(x))), round4(Some(x)), "round4 {x}");
        }
    }

    #[test]
    fn test_trend() {
        // ---
        assert_eq!(trend(Some(20.0), Some(21.5)), 1);
        assert_eq!(trend(Some(21.5), Some(20.0)), -1);
        assert_eq!(trend(Some(20.0), Some(20.0)), 0);
        assert_eq!(trend(None, Some(20.0)), 0);
        assert_eq!(trend(Some(20.0), None), 0);
        assert_eq!(trend(Some(0.0), Some(20.0)), 0);
        assert_eq!(trend(Some(-2.0), Some(0.0)), 0);
        assert_eq!(trend(Some(-2.0), Some(-1.0)), 1);
    }

    #[test]
    fn test_stdev_filters_missing_and_zero() {
        // ---
        let values = [
            Some(2.0),
            None,
            Some(4.0),
            Some(0.0),
            Some(4.0),
            Some(4.0),
            Some(5.0),
            Some(5.0),
            Some(7.0),
            Some(9.0),
        ];
        // Sample stdev of [2,4,4,4,5,5,7,9]
        assert_eq!(deviation(&values), Some(2.14));
        assert_eq!(deviation_power(&values), Some(2.1381));
    }

    #[test]
    fn test_stdev_needs_two_samples() {
        // ---
        assert_eq!(deviation(&[]), None);
        assert_eq!(deviation(&[Some(3.0), None, Some(0.0)]), None);
        assert_eq!(deviation(&[Some(3.0), Some(3.0)]), Some(0.0));
    }

    #[test]
    fn test_reject_outliers_drops_far_values() {
        // ---
        let data = [1.0, 2.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 100.0];
        assert_eq!(
            reject_outliers(&data, 2.0),
            Some(vec![1.0, 2.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0])
        );
    }

    #[test]
    fn test_reject_outliers_threshold_is_strict() {
        // ---
        // 100 sits at 78.4 from the mean with 2σ ≈ 78.41, so it survives m=2
        let data = [1.0, 2.0, 2.0, 3.0, 100.0];
        assert_eq!(reject_outliers(&data, 2.0), Some(data.to_vec()));
        assert_eq!(reject_outliers(&data, 1.5), Some(vec![1.0, 2.0, 2.0, 3.0]));

        // Constant data has σ = 0 and nothing is strictly inside
        assert_eq!(reject_outliers(&[5.0, 5.0], 2.0), Some(vec![]));
    }

    #[test]
    fn test_reject_outliers_unusable_input() {
        // ---
        assert_eq!(reject_outliers(&[], 2.0), None);
        assert_eq!(reject_outliers(&[1.0], 2.0), None);
        assert_eq!(reject_outliers(&[1.0, f64::NAN], 2.0), None);
    }

    #[test]
    fn test_median() {
        // ---
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[1.0, f64::NAN]), None);
    }
}
