// ============================================================================
// Engine Errors
// Error taxonomy shared by every engine operation
// ============================================================================

use crate::interfaces::LedgerError;
use crate::numeric::{NumericError, Ratio};
use thiserror::Error;

/// Top-level engine error.
///
/// Validation variants abort an operation before any state is touched.
/// `Corruption` means a persisted record could not be decoded; the engine
/// must not keep matching against that state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid price {ratio}: must be between 10^-10 and 10^10")]
    InvalidPriceRange { ratio: Ratio },

    #[error("invalid price format: price denominated in {denominator_unit} but order sells {sell_unit}")]
    InvalidPriceFormat {
        sell_unit: String,
        denominator_unit: String,
    },

    #[error("invalid denom pair: {0}")]
    InvalidDenomPair(String),

    #[error("order not found: {order_id}")]
    OrderNotFound { order_id: i64 },

    #[error("invalid order id: {0}")]
    InvalidOrderId(String),

    #[error("unit mismatch: expected {expected}, found {found}")]
    UnitMismatch { expected: String, found: String },

    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid unit: {0:?}")]
    InvalidUnit(String),

    #[error("account {account} does not own order {order_id}")]
    Unauthorized { account: String, order_id: i64 },

    #[error("unknown request: {0}")]
    UnknownRequest(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("numeric error: {0}")]
    Numeric(#[from] NumericError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("corrupted record at {key}: {reason}")]
    Corruption { key: String, reason: String },
}

impl EngineError {
    /// Fatal errors leave the store in a state the engine cannot trust.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::Corruption { .. })
    }

    pub(crate) fn corruption(key: &[u8], reason: impl ToString) -> Self {
        EngineError::Corruption {
            key: String::from_utf8_lossy(key).into_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
