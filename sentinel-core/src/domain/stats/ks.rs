// sentinel-core/src/domain/stats/ks.rs

use serde::{Deserialize, Serialize};

/// Largest sample size that still gets an exact p-value.
pub const EXACT_MAX_SIZE: usize = 10_000;

/// Result of a two-sided, two-sample Kolmogorov–Smirnov test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KsOutcome {
    /// Largest absolute gap between the two empirical CDFs.
    pub statistic: f64,
    pub p_value: f64,
}

/// Two-sample KS test. `None` if either sample is empty.
///
/// The p-value is exact up to [`EXACT_MAX_SIZE`] records per side: a
/// closed-form recursion for equal sizes, a lattice-path walk otherwise.
/// Larger samples use the asymptotic Kolmogorov distribution with Stephens'
/// small-sample correction.
pub fn ks_two_sample(baseline: &[f64], current: &[f64]) -> Option<KsOutcome> {
    if baseline.is_empty() || current.is_empty() {
        return None;
    }

    let statistic = ks_statistic(baseline, current);
    let (n, m) = (baseline.len(), current.len());

    let exact = if n.max(m) > EXACT_MAX_SIZE {
        None
    } else if n == m {
        exact_equal_size(n, statistic)
    } else {
        exact_lattice(n, m, statistic)
    };
    let p_value = exact.unwrap_or_else(|| asymptotic(n, m, statistic));

    Some(KsOutcome {
        statistic,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// sup |F_a(x) - F_b(x)| evaluated at every observed value.
fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let (a, b) = (sorted(a), sorted(b));
    let (n, m) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0usize, 0usize);
    let mut d: f64 = 0.0;

    // Once one side is exhausted its CDF is 1 and the gap only shrinks.
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n - j as f64 / m).abs());
    }
    d
}

/// P(D >= d) for two samples of size n.
fn exact_equal_size(n: usize, d: f64) -> Option<f64> {
    let h = (d * n as f64).round() as usize;
    if h == 0 {
        return Some(1.0);
    }

    let mut p = 0.0;
    let mut k = (n / h) as i64;
    while k >= 0 {
        let kh = k as f64 * h as f64;
        let mut p1 = 1.0;
        for j in 0..h {
            p1 = (n as f64 - kh - j as f64) * p1 / (n as f64 + kh + j as f64 + 1.0);
        }
        p = p1 * (1.0 - p);
        k -= 1;
    }

    let prob = 2.0 * p;
    (prob.is_finite() && (0.0..=1.0).contains(&prob)).then_some(prob)
}

/// P(D >= d) for sizes n and m, by walking every monotone path from (0, 0)
/// to (n, m) and keeping the probability mass that never leaves the band
/// |i/n - j/m| < d. Paths are drawn uniformly, so each step's probability is
/// the share of remaining values on that side.
fn exact_lattice(n: usize, m: usize, d: f64) -> Option<f64> {
    // d is a multiple of 1/(n*m): compare on integers
    let h = (d * (n * m) as f64).round() as i64;
    if h == 0 {
        return Some(1.0);
    }
    let (ni, mi) = (n as i64, m as i64);
    let outside = |i: usize, j: usize| (i as i64 * mi - j as i64 * ni).abs() >= h;
    let step = |left: usize, other: usize| left as f64 / (left + other) as f64;

    let mut prev = vec![0.0; m + 1];
    prev[0] = 1.0;
    for j in 1..=m {
        prev[j] = if outside(0, j) {
            0.0
        } else {
            prev[j - 1] * step(m - j + 1, n)
        };
    }

    let mut cur = vec![0.0; m + 1];
    for i in 1..=n {
        for j in 0..=m {
            cur[j] = if outside(i, j) {
                0.0
            } else {
                let from_below = prev[j] * step(n - i + 1, m - j);
                let from_left = if j > 0 {
                    cur[j - 1] * step(m - j + 1, n - i)
                } else {
                    0.0
                };
                from_below + from_left
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    let prob = 1.0 - prev[m];
    (prob.is_finite() && (-1e-12..=1.0 + 1e-12).contains(&prob)).then_some(prob)
}

fn asymptotic(n: usize, m: usize, d: f64) -> f64 {
    let en = (n * m) as f64 / (n + m) as f64;
    let sqrt_en = en.sqrt();
    let lambda = (sqrt_en + 0.12 + 0.11 / sqrt_en) * d;
    kolmogorov_survival(lambda)
}

/// Q(λ) = 2 Σ (-1)^(k-1) exp(-2 k² λ²)
fn kolmogorov_survival(lambda: f64) -> f64 {
    // The series is numerically 1 below this point and converges badly.
    if lambda < 0.2 {
        return 1.0;
    }
    let mut sum = 0.0;
    let mut sign = 1.0;
    for k in 1..=100 {
        let kf = k as f64;
        let term = sign * (-2.0 * kf * kf * lambda * lambda).exp();
        sum += term;
        if term.abs() < 1e-12 {
            break;
        }
        sign = -sign;
    }
    (2.0 * sum).clamp(0.0, 1.0)
}
