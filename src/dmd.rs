use faer::{c64, ColRef, Mat, MatRef};
use tracing::{debug, info};

use crate::rank::select_rank;
use crate::types::{DmdConfig, DmdError, DmdResult};
use crate::utils::{to_complex, validate_matrix, vandermonde};

/// Perform Dynamic Mode Decomposition on a snapshot matrix.
///
/// # Arguments
/// * `x` - Snapshot matrix (p spatial points × t timesteps), columns in
///   strictly increasing time order. Real vorticity data; the complex
///   structure of the decomposition arises at the eigendecomposition.
/// * `config` - Run configuration (dt, energy threshold, rank override).
///
/// # Algorithm
/// 1. Split X into X₀ = X[:, ..t-1] and X₁ = X[:, 1..]
/// 2. Economy SVD: X₀ = U Σ Vᴴ
/// 3. Truncate to rank r from the energy threshold (or the override)
/// 4. Reduced operator: Ã = Uᵣᴴ X₁ Vᵣ Σᵣ⁻¹
/// 5. Eigendecomposition: Ã W = W Λ
/// 6. Exact DMD modes: Φ = X₁ Vᵣ Σᵣ⁻¹ W
/// 7. Amplitudes: b = Φ⁺ x₀ (least squares)
/// 8. Dynamics diag(b)·V(λ), reconstruction Φ·dynamics, per-step MSE
///
/// The computation is a pure function of its inputs: no state survives
/// between calls and identical inputs yield identical outputs.
pub fn run(x: &Mat<f64>, config: &DmdConfig) -> Result<DmdResult, DmdError> {
    validate_matrix(x.as_ref(), 1, 2)?;
    if config.dt <= 0.0 {
        return Err(DmdError::InvalidInput(format!(
            "dt must be positive, got {}",
            config.dt
        )));
    }

    let n_points = x.nrows();
    let n_time = x.ncols();
    let n_pairs = n_time - 1;

    // Snapshot pair views: X₁ column i is the step after X₀ column i.
    let x0 = x.as_ref().subcols(0, n_pairs);
    let x1 = x.as_ref().subcols(1, n_pairs);

    let svd = x0
        .svd()
        .map_err(|e| DmdError::SvdFailed(format!("{e:?}")))?;
    let u_full = svd.U();
    let v_full = svd.V();
    let s_col = svd.S().column_vector();

    let n_sv = s_col.nrows();
    let s_vals: Vec<f64> = (0..n_sv).map(|i| s_col[i]).collect();

    if s_vals[0] <= 0.0 {
        return Err(DmdError::InvalidInput(
            "snapshot matrix is identically zero".to_string(),
        ));
    }

    let rank = match config.rank {
        Some(r) => r.clamp(1, n_sv),
        None => {
            let r = select_rank(&s_vals, config.threshold)?;
            if r == 0 {
                return Err(DmdError::DegenerateRank(format!(
                    "threshold {}% is met by the first singular value alone, \
                     retaining zero modes",
                    config.threshold
                )));
            }
            r
        }
    };
    info!(
        rank,
        discarded = n_sv - rank,
        threshold = config.threshold,
        "truncating singular-value spectrum"
    );

    // Retained singular values must be invertible for Σᵣ⁻¹.
    let tol = s_vals[0] * n_points.max(n_pairs) as f64 * f64::EPSILON;
    if s_vals[rank - 1] <= tol {
        return Err(DmdError::SingularOperator(format!(
            "retained singular value {} is numerically zero (tolerance {tol:.3e})",
            s_vals[rank - 1]
        )));
    }

    let u_r = u_full.subcols(0, rank);
    let v_r = v_full.subcols(0, rank);
    let s_r = &s_vals[..rank];

    // Ã = Uᵣᴴ X₁ Vᵣ Σᵣ⁻¹; the factors are real here, so the conjugate
    // transposes reduce to plain transposes. Σᵣ⁻¹ scales columns.
    let ut_x1 = u_r.transpose() * x1;
    let ut_x1_v = &ut_x1 * v_r;
    let mut a_tilde = Mat::<f64>::zeros(rank, rank);
    for j in 0..rank {
        for i in 0..rank {
            a_tilde[(i, j)] = ut_x1_v[(i, j)] / s_r[j];
        }
    }

    let eigen = a_tilde
        .as_ref()
        .eigen()
        .map_err(|e| DmdError::EigenFailed(format!("{e:?}")))?;
    let lambda_col = eigen.S().column_vector();
    let eigenvalues: Vec<c64> = (0..rank).map(|i| lambda_col[i]).collect();
    let eigenvectors = eigen.U().to_owned();

    for (i, lambda) in eigenvalues.iter().enumerate() {
        debug!(
            mode = i,
            frequency = lambda.arg() / (2.0 * std::f64::consts::PI * config.dt),
            magnitude = lambda.norm(),
            "mode eigenvalue"
        );
    }

    // Exact DMD modes Φ = X₁ Vᵣ Σᵣ⁻¹ W, reusing the reduction factors
    // instead of projecting through Uᵣ.
    let x1_v = x1 * v_r;
    let mut x1_v_sinv = Mat::<f64>::zeros(n_points, rank);
    for j in 0..rank {
        for i in 0..n_points {
            x1_v_sinv[(i, j)] = x1_v[(i, j)] / s_r[j];
        }
    }
    let x1_v_sinv_c = to_complex(x1_v_sinv.as_ref());
    let modes = &x1_v_sinv_c * &eigenvectors;

    let amplitudes = fit_amplitudes(modes.as_ref(), x.as_ref().col(0))?;

    // Dynamics: row i of the Vandermonde matrix scaled by bᵢ.
    let vander = vandermonde(&eigenvalues, n_time);
    let mut dynamics = Mat::<c64>::zeros(rank, n_time);
    for k in 0..n_time {
        for i in 0..rank {
            dynamics[(i, k)] = amplitudes[i] * vander[(i, k)];
        }
    }

    let reconstruction = &modes * &dynamics;

    let mut mse = vec![0.0; n_time];
    for k in 0..n_time {
        let mut acc = 0.0;
        for i in 0..n_points {
            acc += (c64::new(x[(i, k)], 0.0) - reconstruction[(i, k)]).norm_sqr();
        }
        mse[k] = acc / n_points as f64;
    }

    info!(mean_mse = mse.iter().sum::<f64>() / n_time as f64, "reconstruction complete");

    Ok(DmdResult {
        rank,
        eigenvalues,
        eigenvectors,
        modes,
        amplitudes,
        dynamics,
        reconstruction,
        mse,
        dt: config.dt,
    })
}

/// Solve for amplitudes b via least squares: Φ b ≈ x₀.
///
/// Uses the normal equations (Φᴴ Φ) b = Φᴴ x₀, the least-squares solution
/// for r ≤ p with Φ of full column rank.
fn fit_amplitudes(modes: MatRef<'_, c64>, x0: ColRef<'_, f64>) -> Result<Vec<c64>, DmdError> {
    let n_points = modes.nrows();
    let rank = modes.ncols();

    let mut gram = vec![vec![c64::new(0.0, 0.0); rank]; rank];
    let mut rhs = vec![c64::new(0.0, 0.0); rank];

    for i in 0..rank {
        for j in 0..rank {
            let mut val = c64::new(0.0, 0.0);
            for k in 0..n_points {
                val += modes[(k, i)].conj() * modes[(k, j)];
            }
            gram[i][j] = val;
        }
        let mut val = c64::new(0.0, 0.0);
        for k in 0..n_points {
            val += modes[(k, i)].conj() * x0[k];
        }
        rhs[i] = val;
    }

    complex_solve(&gram, &rhs)
}

/// Solve a complex linear system Ax = b by Gaussian elimination with
/// partial pivoting.
fn complex_solve(a: &[Vec<c64>], b: &[c64]) -> Result<Vec<c64>, DmdError> {
    let n = b.len();
    let mut aug: Vec<Vec<c64>> = a
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut new_row = row.clone();
            new_row.push(b[i]);
            new_row
        })
        .collect();

    for col in 0..n {
        let mut max_norm = aug[col][col].norm();
        let mut max_row = col;
        for row in (col + 1)..n {
            let norm = aug[row][col].norm();
            if norm > max_norm {
                max_norm = norm;
                max_row = row;
            }
        }
        if max_norm < 1e-14 {
            return Err(DmdError::SolveFailed(
                "mode basis is rank deficient".to_string(),
            ));
        }
        aug.swap(col, max_row);

        let pivot = aug[col][col];
        for row in (col + 1)..n {
            let factor = aug[row][col] / pivot;
            for j in col..=n {
                let sub = factor * aug[col][j];
                aug[row][j] -= sub;
            }
        }
    }

    let mut x = vec![c64::new(0.0, 0.0); n];
    for i in (0..n).rev() {
        let mut sum = aug[i][n];
        for j in (i + 1)..n {
            sum -= aug[i][j] * x[j];
        }
        x[i] = sum / aug[i][i];
    }

    Ok(x)
}
