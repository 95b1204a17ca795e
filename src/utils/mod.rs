//! Utility functions and helpers

pub mod formats;

pub use formats::from_sprs_csr;
