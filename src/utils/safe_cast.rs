//! Safe casting utilities for pixel dimensions and timestamps

use crate::{constants::MS_PER_SECOND, Error, Result};

/// Convert a pixel dimension to a surface size, rounding to the nearest pixel
///
/// # Errors
///
/// Returns an error if the value is not finite, not positive, or outside u32 range
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is safe
#[allow(clippy::cast_sign_loss)] // Sign is checked before the cast
pub fn f64_to_pixels(value: f64) -> Result<u32> {
    let rounded = value.round();
    if value.is_finite() && rounded >= 1.0 && rounded <= f64::from(u32::MAX) {
        Ok(rounded as u32)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be used as a pixel dimension"
        )))
    }
}

/// Convert a presentation timestamp in seconds to milliseconds
///
/// # Errors
///
/// Returns an error if the timestamp is not finite or negative
pub fn seconds_to_ms(seconds: f64) -> Result<f64> {
    if seconds.is_finite() && seconds >= 0.0 {
        Ok(seconds * MS_PER_SECOND)
    } else {
        Err(Error::InvalidInput(format!(
            "Timestamp {seconds} is not a valid presentation time"
        )))
    }
}
