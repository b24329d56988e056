//! Numeric primitives shared by the factor scorers.
//!
//! Every function is total: empty input returns 0 and nothing here
//! produces NaN or panics.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted_copy(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation (divides by N).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Linear-interpolated percentile, `p` in [0, 100].
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted_copy(values);
    let idx = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let frac = idx - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Coefficient of variation scaled to a 1-10 volatility score.
pub fn compute_volatility(values: &[f64]) -> u8 {
    if values.len() <= 1 {
        return 1;
    }
    let m = mean(values);
    if m == 0.0 {
        return 1;
    }
    let cv = std_dev(values) / m.abs();
    ((cv * 12.0).round()).clamp(1.0, 10.0) as u8
}

/// Trailing mean over `[max(0, i - window + 1), i]` for each index.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean(&values[start..=i])
        })
        .collect()
}

/// Exponentially weighted moving average. Input must be oldest-first.
pub fn ewma(values: &[f64], alpha: f64) -> f64 {
    let Some((first, rest)) = values.split_first() else {
        return 0.0;
    };
    rest.iter()
        .fold(*first, |acc, v| alpha * v + (1.0 - alpha) * acc)
}

/// Share of values strictly above the line.
pub fn hit_rate(values: &[f64], line: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| **v > line).count() as f64 / values.len() as f64
}

/// Clamp to [0, 1], mapping NaN to 0.
#[inline]
pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Division that returns 0 instead of NaN/Infinity.
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(median(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(ewma(&[], 0.85), 0.0);
        assert_eq!(hit_rate(&[], 10.0), 0.0);
        assert!(moving_average(&[], 3).is_empty());
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_population_std_dev() {
        // population variance of [2,4,4,4,5,5,7,9] is 4
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&v) - 2.0).abs() < 1e-12);
        assert_eq!(std_dev(&[5.0]), 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let v = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&v, 0.0), 10.0);
        assert_eq!(percentile(&v, 100.0), 40.0);
        // idx = 0.5 * 3 = 1.5
        assert!((percentile(&v, 50.0) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_volatility_bounds() {
        assert_eq!(compute_volatility(&[5.0]), 1);
        assert_eq!(compute_volatility(&[0.0, 0.0, 0.0]), 1);
        assert_eq!(compute_volatility(&[20.0, 20.0, 20.0]), 1);
        assert_eq!(compute_volatility(&[0.0, 100.0, 0.0, 100.0]), 10);
    }

    #[test]
    fn test_moving_average_trailing() {
        assert_eq!(moving_average(&[2.0, 4.0, 6.0, 8.0], 2), vec![2.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_ewma_oldest_first() {
        assert!((ewma(&[10.0, 20.0, 30.0], 0.5) - 22.5).abs() < 1e-12);
        assert_eq!(ewma(&[7.0], 0.9), 7.0);
    }

    #[test]
    fn test_safe_div_guards() {
        assert_eq!(safe_div(5.0, 0.0), 0.0);
        assert_eq!(safe_div(5.0, 2.0), 2.5);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }
}
