//! Utilities for converting sprs matrices into our matrix format

use crate::matrix::SparseMatrixCSR;
use sprs::CsMat;
use num_traits::Num;

/// Converts sprs CsMat to our SparseMatrixCSR format
///
/// A CSC input is converted to CSR first.
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> SparseMatrixCSR<T>
where
    T: Copy + Num + Default,
{
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSR::new(shape.0, shape.1, indptr, indices, data)
}
