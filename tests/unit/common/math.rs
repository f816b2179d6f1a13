//! Unit tests for descriptive statistics

use statewatt::common::math::{mean, quantile, sample_variance, sorted_finite};

#[test]
fn test_mean() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[2.0, 4.0, 6.0]), Some(4.0));
}

#[test]
fn test_sample_variance_uses_n_minus_one() {
    // mean 5, squared deviations sum to 32 over 8 values
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let variance = sample_variance(&values).unwrap();
    assert!((variance - 32.0 / 7.0).abs() < 1e-12);
}

#[test]
fn test_sample_variance_needs_two_values() {
    assert_eq!(sample_variance(&[]), None);
    assert_eq!(sample_variance(&[3.0]), None);
    assert_eq!(sample_variance(&[3.0, 3.0]), Some(0.0));
}

#[test]
fn test_quantile_linear_interpolation() {
    let sorted = [1.0, 2.0, 3.0, 4.0];
    // position 0.75 -> between 1 and 2
    assert!((quantile(&sorted, 0.25).unwrap() - 1.75).abs() < 1e-12);
    // position 2.25 -> between 3 and 4
    assert!((quantile(&sorted, 0.75).unwrap() - 3.25).abs() < 1e-12);
    assert_eq!(quantile(&sorted, 0.0), Some(1.0));
    assert_eq!(quantile(&sorted, 1.0), Some(4.0));
}

#[test]
fn test_quantile_edge_cases() {
    assert_eq!(quantile(&[], 0.5), None);
    assert_eq!(quantile(&[7.0], 0.25), Some(7.0));
    assert_eq!(quantile(&[1.0, 2.0], 1.5), None);
}

#[test]
fn test_sorted_finite_drops_nan() {
    let sorted = sorted_finite(vec![3.0, f64::NAN, 1.0, 2.0]);
    assert_eq!(sorted, vec![1.0, 2.0, 3.0]);
}
