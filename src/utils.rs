use faer::{c64, Mat, MatRef};

use crate::types::DmdError;

/// Validate that a snapshot matrix meets minimum dimension requirements
/// and contains no NaN/Inf.
pub fn validate_matrix(x: MatRef<'_, f64>, min_rows: usize, min_cols: usize) -> Result<(), DmdError> {
    let (rows, cols) = (x.nrows(), x.ncols());
    if rows < min_rows {
        return Err(DmdError::InvalidInput(format!(
            "snapshot matrix has {rows} spatial points, need at least {min_rows}"
        )));
    }
    if cols < min_cols {
        return Err(DmdError::InvalidInput(format!(
            "snapshot matrix has {cols} timesteps, need at least {min_cols}"
        )));
    }
    for j in 0..cols {
        for i in 0..rows {
            if !x[(i, j)].is_finite() {
                return Err(DmdError::InvalidInput(
                    "snapshot matrix contains NaN or Inf values".to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Promote a real matrix to complex, imaginary parts zero.
pub fn to_complex(x: MatRef<'_, f64>) -> Mat<c64> {
    Mat::from_fn(x.nrows(), x.ncols(), |i, j| c64::new(x[(i, j)], 0.0))
}

/// Vandermonde matrix of increasing eigenvalue powers.
///
/// Row i holds λᵢᵏ for k = 0..n_cols-1, built by running products so each
/// entry is one multiplication away from its predecessor.
pub fn vandermonde(eigenvalues: &[c64], n_cols: usize) -> Mat<c64> {
    let r = eigenvalues.len();
    let mut v = Mat::<c64>::zeros(r, n_cols);
    for i in 0..r {
        let mut power = c64::new(1.0, 0.0);
        for k in 0..n_cols {
            v[(i, k)] = power;
            power *= eigenvalues[i];
        }
    }
    v
}
