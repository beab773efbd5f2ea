/// Input validation for request data
///
/// Everything a caller sends is checked here before it reaches the model
/// registry, so a rejected request never touches model state.
use crate::error::{IrisError, Result};

/// Exclusive bounds for a flower measurement in centimetres
pub const MEASUREMENT_MIN_CM: f64 = 0.0;
pub const MEASUREMENT_MAX_CM: f64 = 10.0;

/// Validate a single measurement (must lie strictly inside (0, 10))
///
/// # Arguments
/// * `value` - Measurement in centimetres
/// * `field_name` - Name of the field for error messages
pub fn validate_measurement(value: f64, field_name: &str) -> Result<()> {
    if !value.is_finite() {
        return Err(IrisError::Validation(format!(
            "{} must be a finite number",
            field_name
        )));
    }

    if value <= MEASUREMENT_MIN_CM || value >= MEASUREMENT_MAX_CM {
        return Err(IrisError::Validation(format!(
            "{} must be greater than {} and less than {}: {}",
            field_name, MEASUREMENT_MIN_CM, MEASUREMENT_MAX_CM, value
        )));
    }

    Ok(())
}

/// Validate the held-out fraction for training (must lie strictly inside (0, 1))
pub fn validate_test_size(test_size: f64) -> Result<()> {
    if !test_size.is_finite() || test_size <= 0.0 || test_size >= 1.0 {
        return Err(IrisError::Validation(format!(
            "test_size must be greater than 0 and less than 1: {}",
            test_size
        )));
    }

    Ok(())
}

/// Validate a full set of named measurements, reporting the first offender
pub fn validate_measurements(fields: &[(&str, f64)]) -> Result<()> {
    for (name, value) in fields {
        validate_measurement(*value, name)?;
    }
    Ok(())
}
