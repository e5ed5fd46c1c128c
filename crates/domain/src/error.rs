//! Unified error types for the domain layer

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A time/date field is outside the range the clock accepts
    #[error("{field}={value} is outside {min}..={max}")]
    FieldOutOfRange {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },
}

impl DomainError {
    /// Create a field-out-of-range validation error
    pub fn out_of_range(field: &'static str, value: u8, min: u8, max: u8) -> Self {
        Self::FieldOutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    /// Name of the offending field, if this is a field validation error.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::FieldOutOfRange { field, .. } => Some(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_error() {
        let err = DomainError::out_of_range("hour", 24, 0, 23);
        assert!(matches!(err, DomainError::FieldOutOfRange { .. }));
        assert_eq!(err.to_string(), "hour=24 is outside 0..=23");
        assert_eq!(err.field(), Some("hour"));
    }
}
