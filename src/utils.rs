//! Utility functions for dimension and timestamp conversions.

pub mod safe_cast;
