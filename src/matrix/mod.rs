// Matrix data structures and format conversion

pub mod conversion;
pub mod csr;

pub use conversion::coo_to_csr;
pub use csr::SparseMatrixCSR;
