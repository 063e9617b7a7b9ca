pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`, not `n - 1`).
///
/// Returns `0.0` for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mean = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;

    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::{mean, population_std_dev};

    #[test]
    fn mean_of_empty_slice_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn mean_averages_values() {
        assert_eq!(mean(&[100.0, 101.0, 99.0, 102.0, 103.0]), 101.0);
    }

    #[test]
    fn std_dev_of_empty_slice_is_zero() {
        assert_eq!(population_std_dev(&[]), 0.0);
    }

    #[test]
    fn std_dev_of_constant_series_is_zero() {
        assert_eq!(population_std_dev(&[42.0, 42.0, 42.0]), 0.0);
    }

    #[test]
    fn std_dev_divides_by_population_size() {
        let std_dev = population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);

        assert_eq!(std_dev, 2.0);
    }
}
