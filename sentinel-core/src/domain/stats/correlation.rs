// sentinel-core/src/domain/stats/correlation.rs

use std::collections::HashMap;

/// Pearson correlation coefficient.
///
/// `None` when the slices differ in length, hold fewer than two points, or
/// either side has zero variance (the coefficient is undefined there).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom <= f64::EPSILON {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

/// Integer-encodes categories in order of first appearance.
pub fn factorize<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<f64> {
    let mut codes: HashMap<&'a str, usize> = HashMap::new();
    values
        .into_iter()
        .map(|v| {
            let next = codes.len();
            *codes.entry(v).or_insert(next) as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_perfect_correlations() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];
        assert_abs_diff_eq!(pearson(&xs, &up).unwrap_or_default(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pearson(&xs, &down).unwrap_or_default(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_column_is_undefined() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[0.0, 1.0, 0.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
    }

    #[test]
    fn test_factorize_first_appearance_order() {
        let codes = factorize(["Part-time", "Full-time", "Part-time", "Unemployed"]);
        assert_eq!(codes, vec![0.0, 1.0, 0.0, 2.0]);
    }
}
