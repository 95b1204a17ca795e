//! Spy plot layout: which entries become markers and where the ticks go
//!
//! Everything here is pure and independent of the drawing backend, so the
//! geometry of a figure can be checked without rasterising it.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{Result, SpyError};
use crate::matrix::SparseMatrixCSR;
use crate::spy::config::SpyConfig;

/// Matrices with at least this many rows are scanned in parallel
pub const PARALLEL_ROW_THRESHOLD: usize = 4096;

/// One plotted point, in matrix coordinates (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marker {
    pub col: usize,
    pub row: usize,
}

/// Returns one marker per stored entry with `|value| > precision`, in
/// row-major order
pub fn markers(matrix: &SparseMatrixCSR<f64>, precision: f64) -> Vec<Marker> {
    let row_markers = |i: usize| -> Vec<Marker> {
        matrix
            .row_iter(i)
            .filter(|(_, value)| value.abs() > precision)
            .map(|(col, _)| Marker { col, row: i })
            .collect()
    };

    if matrix.n_rows >= PARALLEL_ROW_THRESHOLD {
        // Indexed parallel iterators keep row order on collect
        (0..matrix.n_rows)
            .into_par_iter()
            .map(row_markers)
            .flatten_iter()
            .collect()
    } else {
        (0..matrix.n_rows).flat_map(row_markers).collect()
    }
}

/// Tick positions `k * (n_cols + 1) / intervals` for `k = 0..=intervals`
pub fn x_ticks(n_cols: usize, intervals: usize) -> Result<Vec<f64>> {
    if intervals == 0 {
        return Err(SpyError::Config("tick intervals must be positive".to_string()));
    }
    let span = (n_cols + 1) as f64;
    Ok((0..=intervals)
        .map(|k| k as f64 * span / intervals as f64)
        .collect())
}

/// Backend-independent description of a spy figure
#[derive(Debug, Clone, PartialEq)]
pub struct SpyPlot {
    pub title: String,
    pub n_rows: usize,
    pub n_cols: usize,
    /// Plotted entries
    pub markers: Vec<Marker>,
    /// Stored entries at or below the precision threshold
    pub suppressed: usize,
    /// x-axis tick positions
    pub x_ticks: Vec<f64>,
}

impl SpyPlot {
    /// Lays out the spy plot of `matrix`
    ///
    /// Fails with [`SpyError::EmptyMatrix`] if the matrix has no rows or
    /// no columns.
    pub fn from_csr(matrix: &SparseMatrixCSR<f64>, config: &SpyConfig) -> Result<Self> {
        config.validate()?;
        if matrix.n_rows == 0 || matrix.n_cols == 0 {
            return Err(SpyError::EmptyMatrix {
                rows: matrix.n_rows,
                cols: matrix.n_cols,
            });
        }

        let markers = markers(matrix, config.precision);
        let suppressed = matrix.nnz() - markers.len();
        if suppressed > 0 {
            warn!(
                suppressed,
                precision = config.precision,
                "entries at or below precision are not plotted"
            );
        }

        let x_ticks = x_ticks(matrix.n_cols, config.tick_intervals)?;
        debug!(markers = markers.len(), ticks = x_ticks.len(), "laid out spy plot");

        Ok(Self {
            title: config.title.clone(),
            n_rows: matrix.n_rows,
            n_cols: matrix.n_cols,
            markers,
            suppressed,
            x_ticks,
        })
    }

    /// x range covering every cell and every tick
    pub fn x_range(&self) -> (f64, f64) {
        let last_tick = self.x_ticks.last().copied().unwrap_or(0.0);
        (-0.5, last_tick.max(self.n_cols as f64 - 0.5))
    }

    /// Row range, top to bottom
    pub fn row_range(&self) -> (f64, f64) {
        (-0.5, self.n_rows as f64 - 0.5)
    }
}
