//! Discrete calculus on sampled curves.

/// Trapezoid-rule integral of `y` over `x`.
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| 0.5 * (xw[1] - xw[0]) * (yw[0] + yw[1]))
        .sum()
}

/// Running trapezoid integral; element `i` is the integral from `x[0]` to `x[i+1]`.
pub fn cumulative_trapezoid(y: &[f64], x: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| {
            acc += 0.5 * (xw[1] - xw[0]) * (yw[0] + yw[1]);
            acc
        })
        .collect()
}

/// Symmetric difference `(y[i+2] − y[i]) / (x[i+2] − x[i])`.
///
/// Element `i` is the derivative at interior sample `i + 1`; the result has
/// `n − 2` elements (empty for fewer than three samples).
pub fn central_difference(x: &[f64], y: &[f64]) -> Vec<f64> {
    if x.len() < 3 {
        return Vec::new();
    }
    (0..x.len() - 2)
        .map(|i| (y[i + 2] - y[i]) / (x[i + 2] - x[i]))
        .collect()
}

/// Indices strictly greater than both neighbours. End points never qualify.
pub fn local_maxima(y: &[f64]) -> Vec<usize> {
    (1..y.len().saturating_sub(1))
        .filter(|&i| y[i] > y[i - 1] && y[i] > y[i + 1])
        .collect()
}

/// Indices strictly less than both neighbours. End points never qualify.
pub fn local_minima(y: &[f64]) -> Vec<usize> {
    (1..y.len().saturating_sub(1))
        .filter(|&i| y[i] < y[i - 1] && y[i] < y[i + 1])
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trapezoid_is_exact_for_lines() {
        let x = [0.0, 0.5, 1.0, 2.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v + 1.0).collect();
        assert!((trapezoid(&y, &x) - 8.0).abs() < 1e-12);
        let c = cumulative_trapezoid(&y, &x);
        assert_eq!(c.len(), 3);
        assert!((c[2] - 8.0).abs() < 1e-12);
        assert!((c[0] - 0.875).abs() < 1e-12);
    }

    #[test]
    fn central_difference_of_parabola() {
        let x: Vec<f64> = (0..5).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let d = central_difference(&x, &y);
        assert_eq!(d, vec![2.0, 4.0, 6.0]);
        assert!(central_difference(&[0.0, 1.0], &[0.0, 1.0]).is_empty());
    }

    #[test]
    fn extrema_ignore_plateaus_and_ends() {
        let y = [5.0, 1.0, 3.0, 3.0, 2.0, 4.0, 0.0];
        assert_eq!(local_maxima(&y), vec![5]);
        assert_eq!(local_minima(&y), vec![1, 4]);
        assert!(local_maxima(&[1.0]).is_empty());
        assert!(local_minima(&[]).is_empty());
    }
}
