//! # vortex-dmd
//!
//! Dynamic Mode Decomposition of vorticity snapshot sequences from
//! fluid-flow simulations.
//!
//! Given a matrix of scalar-field snapshots over time, the crate computes
//! a small set of complex modes, their oscillation frequencies and growth
//! rates, and a low-rank reconstruction of the observed dynamics together
//! with a per-timestep reconstruction error:
//!
//! - **Engine** ([`run`]): rank-truncated SVD, reduced-operator
//!   eigendecomposition, exact DMD modes, amplitudes, time dynamics,
//!   reconstruction, and MSE.
//! - **Rank selection** ([`select_rank`]): minimal truncation rank
//!   retaining a given percentage of the singular-value energy.
//! - **Spectrum analysis** ([`mode_spectrum`], [`reconstruction_error`]):
//!   per-mode frequency/growth/stability and aggregate error metrics.
//! - **Data acquisition** ([`SnapshotSource`], [`assemble_snapshots`]):
//!   narrow interface over a simulation dataset, spatial box masking,
//!   snapshot-matrix assembly.
//!
//! ## Quick Start
//!
//! ```rust
//! use vortex_dmd::{run, DmdConfig};
//!
//! // Snapshots of a decaying rotation, columns time-ordered
//! let n = 100;
//! let dt = 0.1;
//! let mut snapshots = faer::Mat::<f64>::zeros(2, n);
//! for k in 0..n {
//!     let t = k as f64 * dt;
//!     let scale = (-0.1 * t).exp();
//!     snapshots[(0, k)] = scale * t.cos();
//!     snapshots[(1, k)] = scale * t.sin();
//! }
//!
//! let config = DmdConfig { dt, rank: Some(2), ..Default::default() };
//! let result = run(&snapshots, &config).unwrap();
//! assert_eq!(result.modes.ncols(), result.rank);
//! ```
//!
//! ## References
//!
//! - Schmid (2010), *J. Fluid Mech.*, 656, 5-28
//! - Tu et al. (2014), *J. Comput. Dyn.*, 1, 391-421 (exact DMD)
//! - Kutz et al. (2016), *Dynamic Mode Decomposition*, SIAM

pub mod analysis;
pub mod dmd;
pub mod rank;
pub mod source;
pub mod types;
pub mod utils;

pub use analysis::{mode_spectrum, reconstruction_error};
pub use dmd::run;
pub use rank::select_rank;
pub use source::{assemble_snapshots, mask_box, SnapshotSet, SnapshotSource, SourceConfig};
pub use types::{DmdConfig, DmdError, DmdResult, ErrorMetrics, ModeInfo, Stability};
