//! Descriptive statistics used by the dataset summary

/// Arithmetic mean (0.0 for an empty slice)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median (0.0 for an empty slice)
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation (n - 1 denominator); 0.0 below two values
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Pearson correlation; `None` when either side has zero variance
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x);
    let my = mean(y);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        cov += (a - mx) * (b - my);
        var_x += (a - mx).powi(2);
        var_y += (b - my).powi(2);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Least-squares quadratic fit `y ≈ a·x² + b·x + c`, returned as `[a, b, c]`
///
/// `None` when fewer than three distinct `x` values make the system singular.
pub fn quadratic_fit(x: &[f64], y: &[f64]) -> Option<[f64; 3]> {
    if x.len() != y.len() || x.len() < 3 {
        return None;
    }

    // Fit on standardized u = (x - m) / s to keep the normal equations well conditioned
    let m = mean(x);
    let s = sample_std(x);
    if s == 0.0 {
        return None;
    }

    // Power sums Σu^k (k = 0..4) and Σu^k·y (k = 0..2)
    let mut su = [0.0; 5];
    let mut suy = [0.0; 3];
    for (&xi, &yi) in x.iter().zip(y) {
        let u = (xi - m) / s;
        let mut p = 1.0;
        for (k, acc) in su.iter_mut().enumerate() {
            *acc += p;
            if k < 3 {
                suy[k] += p * yi;
            }
            p *= u;
        }
    }

    let system = [
        [su[4], su[3], su[2], suy[2]],
        [su[3], su[2], su[1], suy[1]],
        [su[2], su[1], su[0], suy[0]],
    ];
    let [qa, qb, qc] = solve3(system)?;

    // Expand A·u² + B·u + C back into powers of x
    let a = qa / (s * s);
    let b = qb / s - 2.0 * qa * m / (s * s);
    let c = qa * m * m / (s * s) - qb * m / s + qc;
    Some([a, b, c])
}

/// Gaussian elimination with partial pivoting on an augmented 3x4 matrix
fn solve3(mut m: [[f64; 4]; 3]) -> Option<[f64; 3]> {
    let scale = m
        .iter()
        .flat_map(|row| row[..3].iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return None;
    }
    let tolerance = scale * 1e-12;

    for col in 0..3 {
        let pivot = (col..3).max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
        if m[pivot][col].abs() <= tolerance {
            return None;
        }
        m.swap(col, pivot);

        for row in col + 1..3 {
            let factor = m[row][col] / m[col][col];
            for k in col..4 {
                m[row][k] -= factor * m[col][k];
            }
        }
    }

    let mut solution = [0.0; 3];
    for row in (0..3).rev() {
        let tail: f64 = (row + 1..3).map(|k| m[row][k] * solution[k]).sum();
        solution[row] = (m[row][3] - tail) / m[row][row];
    }
    Some(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_median_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0);
        assert_relative_eq!(median(&values), 4.5);
        assert_relative_eq!(sample_std(&values), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(sample_std(&[1.0]), 0.0);
    }

    #[test]
    fn test_pearson() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(pearson(&x, &[2.0, 4.0, 6.0, 8.0]).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson(&x, &[8.0, 6.0, 4.0, 2.0]).unwrap(), -1.0, epsilon = 1e-12);
        assert!(pearson(&x, &[1.0, 1.0, 1.0, 1.0]).is_none());
    }

    #[test]
    fn test_quadratic_fit_recovers_exact_parabola() {
        let x: Vec<f64> = (0..10).map(|i| i as f64 * 50.0).collect();
        let y: Vec<f64> = x.iter().map(|v| 0.0002 * v * v - 0.1 * v + 12.0).collect();

        let [a, b, c] = quadratic_fit(&x, &y).unwrap();
        assert_relative_eq!(a, 0.0002, epsilon = 1e-9);
        assert_relative_eq!(b, -0.1, epsilon = 1e-6);
        assert_relative_eq!(c, 12.0, epsilon = 1e-4);
    }

    #[test]
    fn test_quadratic_fit_needs_three_distinct_x() {
        assert!(quadratic_fit(&[1.0, 1.0, 2.0, 2.0], &[1.0, 2.0, 3.0, 4.0]).is_none());
        assert!(quadratic_fit(&[1.0, 2.0], &[1.0, 2.0]).is_none());
    }
}
