use faer::{c64, Mat};

/// Error types for the decomposition pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DmdError {
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("degenerate rank: {0}")]
    DegenerateRank(String),

    #[error("singular operator: {0}")]
    SingularOperator(String),

    #[error("SVD computation failed: {0}")]
    SvdFailed(String),

    #[error("eigendecomposition failed: {0}")]
    EigenFailed(String),

    #[error("linear solve failed: {0}")]
    SolveFailed(String),
}

/// Configuration for a DMD run.
#[derive(Debug, Clone)]
pub struct DmdConfig {
    /// Time delta between consecutive snapshots. Must be positive.
    pub dt: f64,
    /// Percentage of the singular-value energy to retain, in (0, 100].
    pub threshold: f64,
    /// Explicit truncation rank. None for energy-based selection.
    pub rank: Option<usize>,
}

impl Default for DmdConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            threshold: 99.5,
            rank: None,
        }
    }
}

/// Result of a DMD run.
///
/// All fields are derived, read-only products of a single invocation;
/// nothing here is mutated after construction.
#[derive(Debug, Clone)]
pub struct DmdResult {
    /// Number of retained singular values.
    pub rank: usize,
    /// Eigenvalues λ of the reduced operator (r).
    pub eigenvalues: Vec<c64>,
    /// Eigenvectors W of the reduced operator (r × r), column i pairs with λᵢ.
    pub eigenvectors: Mat<c64>,
    /// DMD modes Φ (p × r), columns are full-dimensional mode shapes.
    pub modes: Mat<c64>,
    /// Mode amplitudes b (r), coordinates of the first snapshot in the mode basis.
    pub amplitudes: Vec<c64>,
    /// Time dynamics (r × t), row i = bᵢ · λᵢᵏ for k = 0..t-1.
    pub dynamics: Mat<c64>,
    /// Low-rank reconstruction Φ · dynamics (p × t).
    pub reconstruction: Mat<c64>,
    /// Per-timestep mean squared reconstruction error (t).
    pub mse: Vec<f64>,
    /// Time delta the run was performed with.
    pub dt: f64,
}

impl DmdResult {
    /// Number of spatial points.
    pub fn n_points(&self) -> usize {
        self.modes.nrows()
    }

    /// Number of timesteps.
    pub fn n_time(&self) -> usize {
        self.reconstruction.ncols()
    }
}

/// Per-mode spectral information.
#[derive(Debug, Clone)]
pub struct ModeInfo {
    /// Mode index (column of Φ).
    pub index: usize,
    /// Complex eigenvalue.
    pub eigenvalue: c64,
    /// Eigenvalue magnitude |λ|.
    pub magnitude: f64,
    /// Oscillation frequency arg(λ) / (2π·dt), signed (Hz for dt in seconds).
    pub frequency: f64,
    /// Continuous-time growth rate ln|λ| / dt.
    pub growth_rate: f64,
    /// Mode amplitude |b|.
    pub amplitude: f64,
    /// Stability classification against the unit circle.
    pub stability: Stability,
}

/// Stability classification of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    Decaying,
    Neutral,
    Growing,
}

impl std::fmt::Display for Stability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stability::Decaying => write!(f, "decaying"),
            Stability::Neutral => write!(f, "neutral"),
            Stability::Growing => write!(f, "growing"),
        }
    }
}

/// Aggregate reconstruction error metrics.
#[derive(Debug, Clone)]
pub struct ErrorMetrics {
    /// Root mean square error over all entries.
    pub rmse: f64,
    /// Frobenius-norm ratio ‖X − X̂‖ / ‖X‖.
    pub relative_error: f64,
}
