use faer::Mat;

use crate::types::{DmdError, DmdResult, ErrorMetrics, ModeInfo, Stability};

/// Analyze the eigenvalue spectrum of a DMD result.
///
/// Returns per-mode information: magnitude, oscillation frequency, growth
/// rate, amplitude, and stability classification. The frequency is signed,
/// so a conjugate mode pair reports ±f.
pub fn mode_spectrum(result: &DmdResult) -> Vec<ModeInfo> {
    let mut info = Vec::with_capacity(result.rank);

    for i in 0..result.rank {
        let lambda = result.eigenvalues[i];
        let magnitude = lambda.norm();
        let frequency = lambda.arg() / (2.0 * std::f64::consts::PI * result.dt);
        let growth_rate = magnitude.ln() / result.dt;
        let amplitude = result.amplitudes[i].norm();

        info.push(ModeInfo {
            index: i,
            eigenvalue: lambda,
            magnitude,
            frequency,
            growth_rate,
            amplitude,
            stability: classify_eigenvalue(magnitude, 1e-6),
        });
    }

    info
}

/// Aggregate reconstruction error against the original snapshot matrix.
pub fn reconstruction_error(
    result: &DmdResult,
    x: &Mat<f64>,
) -> Result<ErrorMetrics, DmdError> {
    let n_points = result.n_points();
    let n_time = result.n_time();
    if x.nrows() != n_points || x.ncols() != n_time {
        return Err(DmdError::InvalidInput(format!(
            "snapshot matrix is {}x{}, reconstruction is {n_points}x{n_time}",
            x.nrows(),
            x.ncols()
        )));
    }

    let mut sum_sq = 0.0;
    let mut orig_norm_sq = 0.0;
    for k in 0..n_time {
        for i in 0..n_points {
            let diff = faer::c64::new(x[(i, k)], 0.0) - result.reconstruction[(i, k)];
            sum_sq += diff.norm_sqr();
            orig_norm_sq += x[(i, k)] * x[(i, k)];
        }
    }

    let n_total = (n_points * n_time) as f64;
    let rmse = (sum_sq / n_total).sqrt();
    let relative_error = if orig_norm_sq > 0.0 {
        (sum_sq / orig_norm_sq).sqrt()
    } else {
        0.0
    };

    Ok(ErrorMetrics {
        rmse,
        relative_error,
    })
}

/// Classify an eigenvalue by its magnitude relative to the unit circle.
fn classify_eigenvalue(magnitude: f64, tol: f64) -> Stability {
    if magnitude < 1.0 - tol {
        Stability::Decaying
    } else if magnitude > 1.0 + tol {
        Stability::Growing
    } else {
        Stability::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dmd::run;
    use crate::types::DmdConfig;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn decaying_rotation(freq: f64, decay: f64, dt: f64, n_time: usize) -> Mat<f64> {
        let theta = 2.0 * PI * freq * dt;
        let rho = (-decay * dt).exp();
        let mut x = Mat::<f64>::zeros(2, n_time);
        for k in 0..n_time {
            let scale = rho.powi(k as i32);
            x[(0, k)] = scale * (theta * k as f64).cos();
            x[(1, k)] = scale * (theta * k as f64).sin();
        }
        x
    }

    #[test]
    fn test_mode_spectrum_frequency_and_growth() {
        let dt = 0.05;
        let x = decaying_rotation(1.2, 0.3, dt, 100);
        let config = DmdConfig {
            dt,
            rank: Some(2),
            ..Default::default()
        };
        let result = run(&x, &config).unwrap();
        let spectrum = mode_spectrum(&result);

        assert_eq!(spectrum.len(), 2);
        for mode in &spectrum {
            assert_abs_diff_eq!(mode.frequency.abs(), 1.2, epsilon = 1e-6);
            assert_abs_diff_eq!(mode.growth_rate, -0.3, epsilon = 1e-6);
            assert_eq!(mode.stability, Stability::Decaying);
            assert!(mode.amplitude > 0.0);
        }

        // Conjugate pair: frequencies of opposite sign.
        let freq_sum: f64 = spectrum.iter().map(|m| m.frequency).sum();
        assert_abs_diff_eq!(freq_sum, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mode_spectrum_neutral_mode() {
        let dt = 0.05;
        let x = decaying_rotation(0.8, 0.0, dt, 100);
        let config = DmdConfig {
            dt,
            rank: Some(2),
            ..Default::default()
        };
        let result = run(&x, &config).unwrap();
        let spectrum = mode_spectrum(&result);
        for mode in &spectrum {
            assert_eq!(mode.stability, Stability::Neutral);
        }
    }

    #[test]
    fn test_reconstruction_error_full_rank() {
        let dt = 0.05;
        let x = decaying_rotation(0.8, 0.2, dt, 60);
        let config = DmdConfig {
            dt,
            rank: Some(2),
            ..Default::default()
        };
        let result = run(&x, &config).unwrap();
        let metrics = reconstruction_error(&result, &x).unwrap();

        assert!(metrics.rmse < 1e-8);
        assert!(metrics.relative_error < 1e-8);
    }

    #[test]
    fn test_reconstruction_error_shape_mismatch() {
        let dt = 0.05;
        let x = decaying_rotation(0.8, 0.2, dt, 60);
        let config = DmdConfig {
            dt,
            rank: Some(2),
            ..Default::default()
        };
        let result = run(&x, &config).unwrap();
        let wrong = Mat::<f64>::zeros(3, 60);
        assert!(matches!(
            reconstruction_error(&result, &wrong),
            Err(DmdError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_classify_eigenvalue() {
        assert_eq!(classify_eigenvalue(0.9, 1e-6), Stability::Decaying);
        assert_eq!(classify_eigenvalue(1.0, 1e-6), Stability::Neutral);
        assert_eq!(classify_eigenvalue(1.1, 1e-6), Stability::Growing);
    }
}
