// crates/data-console-core/src/validate.rs
// ============================================================================
// Module: Input Validator
// Description: Rejects malformed tool parameters before any I/O occurs.
// Purpose: Fast, side-effect-free checks ahead of the authoritative guards.
// Dependencies: data-console-core::error
// ============================================================================

//! ## Overview
//! String parameters arriving from tool calls are untrusted. These checks
//! reject empty and oversized values up front; the path sandbox and the
//! table whitelist remain the authoritative guards for their domains.

use crate::error::ServiceError;

/// Maximum accepted city name length in characters.
pub const MAX_CITY_LENGTH: usize = 100;
/// Maximum accepted filename length in characters.
pub const MAX_FILENAME_LENGTH: usize = 255;
/// Maximum accepted column name length in characters.
pub const MAX_COLUMN_LENGTH: usize = 100;
/// Maximum accepted record query limit.
pub const MAX_QUERY_LIMIT: i64 = 100;

/// Validates a city name parameter.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] when the city is empty or too long.
pub fn validate_city(city: &str) -> Result<(), ServiceError> {
    if city.trim().is_empty() {
        return Err(ServiceError::Validation("Invalid city name".to_string()));
    }
    if city.chars().count() > MAX_CITY_LENGTH {
        return Err(ServiceError::Validation(format!(
            "city name exceeds {MAX_CITY_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates a filename parameter ahead of sandbox resolution.
///
/// The parent-directory check lives in [`crate::sandbox::DataRoot::resolve`],
/// which is the authoritative guard; this check bounds length and emptiness.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] when the filename is empty or too
/// long.
pub fn validate_filename(filename: &str) -> Result<(), ServiceError> {
    if filename.is_empty() {
        return Err(ServiceError::Validation("filename must not be empty".to_string()));
    }
    if filename.chars().count() > MAX_FILENAME_LENGTH {
        return Err(ServiceError::Validation(format!(
            "filename exceeds {MAX_FILENAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates a CSV column name parameter.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] when the column is empty or too long.
pub fn validate_column(column: &str) -> Result<(), ServiceError> {
    if column.is_empty() {
        return Err(ServiceError::Validation("column must not be empty".to_string()));
    }
    if column.chars().count() > MAX_COLUMN_LENGTH {
        return Err(ServiceError::Validation(format!(
            "column name exceeds {MAX_COLUMN_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates a record query limit and narrows it to `u32`.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] when the limit is outside `[1, 100]`.
pub fn validate_limit(limit: i64) -> Result<u32, ServiceError> {
    if !(1 ..= MAX_QUERY_LIMIT).contains(&limit) {
        return Err(ServiceError::Validation(format!(
            "limit must be between 1 and {MAX_QUERY_LIMIT}"
        )));
    }
    u32::try_from(limit)
        .map_err(|_| ServiceError::Validation("limit out of range".to_string()))
}

#[cfg(test)]
mod tests;
