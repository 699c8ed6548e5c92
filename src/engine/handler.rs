// ============================================================================
// Messages
// Closed set of state-changing requests and their basic validation
// ============================================================================

use super::execution::Execution;
use crate::domain::{validate_unit, AccountId, Amount, Order, OrderId, Price};
use crate::errors::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Place a new limit order.
///
/// `price` is quoted as buy-unit per sell-unit, so its denominator must be
/// the unit of `sell_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgMakeOrder {
    pub owner: AccountId,
    pub sell_amount: Amount,
    pub price: Price,
    pub expiration: Option<DateTime<Utc>>,
}

impl MsgMakeOrder {
    pub fn new(
        owner: impl Into<AccountId>,
        sell_amount: Amount,
        price: Price,
        expiration: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            owner: owner.into(),
            sell_amount,
            price,
            expiration,
        }
    }

    /// Stateless checks, run before anything is reserved or written.
    pub fn validate_basic(&self) -> EngineResult<()> {
        if self.owner.is_empty() {
            return Err(EngineError::InvalidAddress(self.owner.to_string()));
        }

        if !self.sell_amount.is_positive() {
            return Err(EngineError::InvalidAmount(self.sell_amount.to_string()));
        }

        validate_unit(&self.price.numerator_unit)?;
        validate_unit(&self.price.denominator_unit)?;

        if self.sell_amount.unit != self.price.denominator_unit {
            return Err(EngineError::InvalidPriceFormat {
                sell_unit: self.sell_amount.unit.clone(),
                denominator_unit: self.price.denominator_unit.clone(),
            });
        }

        if self.price.numerator_unit == self.price.denominator_unit {
            return Err(EngineError::InvalidDenomPair(format!(
                "{}|{}",
                self.price.denominator_unit, self.price.numerator_unit
            )));
        }

        if !self.price.is_valid() {
            return Err(EngineError::InvalidPriceRange {
                ratio: self.price.ratio,
            });
        }

        Ok(())
    }
}

/// Cancel a resting order and refund its remainder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRemoveOrder {
    pub owner: AccountId,
    pub order_id: OrderId,
}

impl MsgRemoveOrder {
    pub fn new(owner: impl Into<AccountId>, order_id: OrderId) -> Self {
        Self {
            owner: owner.into(),
            order_id,
        }
    }

    pub fn validate_basic(&self) -> EngineResult<()> {
        if self.owner.is_empty() {
            return Err(EngineError::InvalidAddress(self.owner.to_string()));
        }

        if !self.order_id.is_valid() {
            return Err(EngineError::InvalidOrderId(self.order_id.to_string()));
        }

        Ok(())
    }
}

/// Every request the engine accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    MakeOrder(MsgMakeOrder),
    RemoveOrder(MsgRemoveOrder),
}

impl Msg {
    pub fn validate_basic(&self) -> EngineResult<()> {
        match self {
            Msg::MakeOrder(msg) => msg.validate_basic(),
            Msg::RemoveOrder(msg) => msg.validate_basic(),
        }
    }

    /// Short route name, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Msg::MakeOrder(_) => "make_order",
            Msg::RemoveOrder(_) => "remove_order",
        }
    }
}

impl From<MsgMakeOrder> for Msg {
    fn from(msg: MsgMakeOrder) -> Self {
        Msg::MakeOrder(msg)
    }
}

impl From<MsgRemoveOrder> for Msg {
    fn from(msg: MsgRemoveOrder) -> Self {
        Msg::RemoveOrder(msg)
    }
}

/// Outcome of a handled [`Msg`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsgResult {
    OrderMade(Execution),
    OrderRemoved(Order),
}

impl MsgResult {
    /// Whether a made order was immediately and fully consumed
    pub fn consumed(&self) -> Option<bool> {
        match self {
            MsgResult::OrderMade(execution) => Some(execution.consumed),
            MsgResult::OrderRemoved(_) => None,
        }
    }
}
