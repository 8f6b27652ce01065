//! Common utilities for integration tests

pub mod test_helpers;

// Re-export commonly used items
pub use test_helpers::{continuous_1d, plane_source_2d, relative_error, slug_1d};
