use faer::{Mat, MatRef};
use tracing::info;

use crate::types::DmdError;
use crate::utils::validate_matrix;

/// Narrow interface over a simulation dataset.
///
/// Implementations wrap whatever mesh-based storage holds the simulation
/// output; this crate never parses files itself. Snapshots are vector
/// fields sampled at the grid vertices, one row per vertex.
pub trait SnapshotSource {
    /// Available write times, in strictly increasing order.
    fn write_times(&self) -> Vec<f64>;

    /// Names of the fields stored per write time.
    fn field_names(&self) -> Vec<String>;

    /// Grid vertices, one row per point, columns (x, y). The simulation
    /// is planar, so any z coordinate is dropped by the implementation.
    fn vertices(&self) -> Mat<f64>;

    /// Load one field at one write time as an n × 3 matrix of vector
    /// components. Only column 2 (the out-of-plane component) is consumed
    /// here, since vorticity of a planar flow is nonzero only along z.
    fn load_snapshot(&self, field_name: &str, time: f64) -> Result<Mat<f64>, DmdError>;
}

/// Configuration for snapshot assembly.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Field to extract from the source.
    pub field_name: String,
    /// Lower corner (x, y) of the spatial box mask.
    pub mask_lower: [f64; 2],
    /// Upper corner (x, y) of the spatial box mask.
    pub mask_upper: [f64; 2],
    /// Write times below this are dropped. Vortex shedding in the
    /// reference cylinder case is established after 4 seconds.
    pub min_time: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            field_name: "vorticity".to_string(),
            mask_lower: [0.1, -1.0],
            mask_upper: [0.75, 1.0],
            min_time: 4.0,
        }
    }
}

/// Assembled input for the DMD engine.
#[derive(Debug, Clone)]
pub struct SnapshotSet {
    /// Per-vertex mask; true where the vertex lies inside the box.
    pub mask: Vec<bool>,
    /// Retained write times, strictly increasing.
    pub times: Vec<f64>,
    /// Time delta between consecutive retained write times.
    pub dt: f64,
    /// Snapshot matrix (masked points × retained times).
    pub matrix: Mat<f64>,
}

/// Boolean mask selecting points inside an axis-aligned box.
pub fn mask_box(points: MatRef<'_, f64>, lower: [f64; 2], upper: [f64; 2]) -> Vec<bool> {
    (0..points.nrows())
        .map(|i| {
            let (x, y) = (points[(i, 0)], points[(i, 1)]);
            x >= lower[0] && x <= upper[0] && y >= lower[1] && y <= upper[1]
        })
        .collect()
}

/// Assemble the snapshot matrix from a source.
///
/// Validates the grid and write times, masks the vertices to the
/// configured box, drops write times before `config.min_time`, and fills
/// one column per retained time with the masked out-of-plane component.
///
/// # Errors
/// [`DmdError::InvalidInput`] if the grid is empty or non-finite, fewer
/// than two write times survive the time filter, the write times are not
/// strictly increasing, the mask selects no points, or a snapshot has the
/// wrong shape.
pub fn assemble_snapshots(
    source: &dyn SnapshotSource,
    config: &SourceConfig,
) -> Result<SnapshotSet, DmdError> {
    let points = source.vertices();
    if points.nrows() == 0 {
        return Err(DmdError::InvalidInput("grid has no vertices".to_string()));
    }
    if points.ncols() != 2 {
        return Err(DmdError::InvalidInput(format!(
            "expected planar vertices with 2 coordinates, got {}",
            points.ncols()
        )));
    }
    validate_matrix(points.as_ref(), 1, 2)
        .map_err(|_| DmdError::InvalidInput("grid vertices contain NaN or Inf".to_string()))?;

    let all_times = source.write_times();
    if all_times.is_empty() {
        return Err(DmdError::InvalidInput("source has no write times".to_string()));
    }

    let cutoff = config.min_time.max(all_times[0]);
    let times: Vec<f64> = all_times.into_iter().filter(|&t| t >= cutoff).collect();
    if times.len() < 2 {
        return Err(DmdError::InvalidInput(format!(
            "need at least 2 write times after the {cutoff} s cutoff, got {}",
            times.len()
        )));
    }
    if times.windows(2).any(|w| w[1] <= w[0]) {
        return Err(DmdError::InvalidInput(
            "write times are not strictly increasing".to_string(),
        ));
    }

    // Write intervals are stored with millisecond resolution.
    let dt = ((times[1] - times[0]) * 1000.0).round() / 1000.0;

    let mask = mask_box(points.as_ref(), config.mask_lower, config.mask_upper);
    let n_masked = mask.iter().filter(|&&m| m).count();
    if n_masked == 0 {
        return Err(DmdError::InvalidInput(
            "spatial mask selects no points".to_string(),
        ));
    }
    info!(
        n_masked,
        n_vertices = points.nrows(),
        n_times = times.len(),
        dt,
        "assembling snapshot matrix"
    );

    let mut matrix = Mat::<f64>::zeros(n_masked, times.len());
    for (idx, &t) in times.iter().enumerate() {
        let snapshot = source.load_snapshot(&config.field_name, t)?;
        if snapshot.nrows() != points.nrows() || snapshot.ncols() < 3 {
            return Err(DmdError::InvalidInput(format!(
                "snapshot at t={t} is {}x{}, expected {}x3",
                snapshot.nrows(),
                snapshot.ncols(),
                points.nrows()
            )));
        }
        let mut row = 0;
        for (i, &selected) in mask.iter().enumerate() {
            if selected {
                matrix[(row, idx)] = snapshot[(i, 2)];
                row += 1;
            }
        }
    }

    validate_matrix(matrix.as_ref(), 1, 2)?;

    Ok(SnapshotSet {
        mask,
        times,
        dt,
        matrix,
    })
}
