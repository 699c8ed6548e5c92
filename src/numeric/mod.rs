// ============================================================================
// Numeric Module
// Fixed-point arithmetic for deterministic price ratios
// ============================================================================
//
// This module provides:
// - FixedDecimal<D>: Fixed-point decimal with compile-time precision
// - Ratio: the 10.10 decimal window used for every price
// - NumericError: Error types for arithmetic operations
//
// Design principles:
// - No floating-point operations
// - All arithmetic returns Result (no panics)
// - Round half-up everywhere a result is narrowed
// - Byte-sortable text encoding inside the sortable window

mod errors;
mod fixed_decimal;

pub use errors::{NumericError, NumericResult};
pub use fixed_decimal::{FixedDecimal, Ratio, SORTABLE_KEY_LEN};
