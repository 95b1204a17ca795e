//! Conversion from coordinate (triplet) form to CSR

use sprs::{CsMat, TriMat};
use tracing::debug;

use crate::matrix::SparseMatrixCSR;
use crate::utils::from_sprs_csr;

/// Converts a coordinate matrix into CSR form
///
/// The heavy lifting is done by `sprs`: indices are sorted within each row
/// and duplicate coordinates are summed. Shape and stored values are
/// otherwise carried over unchanged, including explicit zeros.
pub fn coo_to_csr(triplets: &TriMat<f64>) -> SparseMatrixCSR<f64> {
    let csr: CsMat<f64> = triplets.to_csr();
    let matrix = from_sprs_csr(csr);

    debug!(
        rows = matrix.n_rows,
        cols = matrix.n_cols,
        triplets = triplets.nnz(),
        nnz = matrix.nnz(),
        "converted coordinate matrix to CSR"
    );

    matrix
}
