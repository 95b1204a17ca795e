//! Loader -> converter -> layout, as a single call

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::io::{read_matrix_market, MatrixMarketHeader};
use crate::matrix::{coo_to_csr, SparseMatrixCSR};
use crate::spy::{SpyConfig, SpyPlot};

/// A loaded matrix together with its spy plot layout
#[derive(Debug, Clone)]
pub struct SpyFigure {
    pub header: MatrixMarketHeader,
    pub matrix: SparseMatrixCSR<f64>,
    pub plot: SpyPlot,
}

/// Loads the Matrix Market file at `path`, converts it to CSR and lays out
/// its spy plot
///
/// Stops at the first failure: a missing or malformed file never reaches
/// conversion, and an empty matrix never reaches layout.
pub fn spy_matrix_market<P: AsRef<Path>>(path: P, config: &SpyConfig) -> Result<SpyFigure> {
    config.validate()?;

    let loaded = read_matrix_market(path)?;
    let header = loaded.header.clone();
    let matrix = coo_to_csr(&loaded.into_triplets());
    let plot = SpyPlot::from_csr(&matrix, config)?;

    info!(
        rows = plot.n_rows,
        cols = plot.n_cols,
        markers = plot.markers.len(),
        "spy plot ready"
    );

    Ok(SpyFigure {
        header,
        matrix,
        plot,
    })
}
