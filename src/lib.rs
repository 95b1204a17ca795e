//! # stiffness-spy: sparsity patterns of Matrix Market matrices
//!
//! Loads a sparse matrix (typically the stiffness matrix exported by a
//! finite-element solver) from a Matrix Market file, converts it to
//! Compressed Sparse Row form and draws a spy plot: one marker per entry
//! whose magnitude exceeds a precision threshold.
//!
//! ## Pipeline
//!
//! 1. **Loader** ([`io::read_matrix_market`]): Matrix Market text to a
//!    coordinate (`sprs::TriMat`) matrix, expanding symmetric storage.
//! 2. **Converter** ([`matrix::coo_to_csr`]): coordinate form to
//!    [`SparseMatrixCSR`].
//! 3. **Renderer** ([`spy`]): layout ([`SpyPlot`]), rasterisation
//!    ([`spy::render_rgb`]) and an interactive window ([`spy::show`]).
//!
//! ## Usage
//!
//! ```no_run
//! use stiffness_spy::{spy_matrix_market, SpyConfig};
//! use stiffness_spy::spy::{render_rgb, show};
//!
//! # fn main() -> stiffness_spy::Result<()> {
//! let config = SpyConfig::default();
//! let figure = spy_matrix_market("matrix.mtx", &config)?;
//! let raster = render_rgb(&figure.plot, &config)?;
//! show(&raster, &figure.plot.title)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod io;
pub mod matrix;
pub mod pipeline;
pub mod spy;
pub mod utils;

// Re-export primary components
pub use error::{Result, SpyError};
pub use io::{read_matrix_market, MatrixMarket, MatrixMarketHeader};
pub use matrix::{coo_to_csr, SparseMatrixCSR};
pub use pipeline::{spy_matrix_market, SpyFigure};
pub use spy::{Marker, SpyConfig, SpyPlot};
pub use utils::from_sprs_csr;

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
