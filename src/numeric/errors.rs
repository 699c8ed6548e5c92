// ============================================================================
// Numeric Errors
// Error types for fixed-point ratio arithmetic
// ============================================================================

use thiserror::Error;

/// Errors that can occur during fixed-point arithmetic operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Result exceeded the representable maximum
    #[error("arithmetic overflow: result exceeded maximum value")]
    Overflow,
    /// Attempted division by zero
    #[error("division by zero")]
    DivisionByZero,
    /// Conversion would lose significant digits
    #[error("precision loss: conversion would lose significant digits")]
    PrecisionLoss,
    /// Input string or value is invalid
    #[error("invalid input: could not parse value")]
    InvalidInput,
    /// Value lies outside the byte-sortable window
    #[error("value outside the sortable window")]
    OutOfSortableRange,
}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NumericError::Overflow.to_string(),
            "arithmetic overflow: result exceeded maximum value"
        );
        assert_eq!(NumericError::DivisionByZero.to_string(), "division by zero");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::Overflow, NumericError::Overflow);
        assert_ne!(NumericError::Overflow, NumericError::OutOfSortableRange);
    }
}
