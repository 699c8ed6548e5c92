// ============================================================================
// Order Domain Model
// ============================================================================

use super::Price;
use crate::errors::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between the two units of a [`DenomPair`] string.
pub const PAIR_SEPARATOR: char = '|';

/// Separator between key segments in the store.
pub const KEY_SEPARATOR: char = '/';

// ============================================================================
// Value Objects
// ============================================================================

/// Monotonically assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(i64);

impl OrderId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    /// Identifiers are never negative.
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }

    /// Big-endian encoding; sorts like the id for every valid id.
    pub fn to_sortable_bytes(self) -> [u8; 8] {
        (self.0 as u64).to_be_bytes()
    }

    pub fn from_sortable_bytes(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; 8] = bytes.try_into().ok()?;
        Some(Self(u64::from_be_bytes(raw) as i64))
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: i64 = s
            .trim()
            .parse()
            .map_err(|_| EngineError::InvalidOrderId(s.to_string()))?;
        let id = OrderId(id);
        if !id.is_valid() {
            return Err(EngineError::InvalidOrderId(s.to_string()));
        }
        Ok(id)
    }
}

/// Trading party identifier, opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A whole quantity of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    pub unit: String,
    pub quantity: u64,
}

impl Amount {
    pub fn new(unit: impl Into<String>, quantity: u64) -> Self {
        Self {
            unit: unit.into(),
            quantity,
        }
    }

    pub fn zero(unit: impl Into<String>) -> Self {
        Self::new(unit, 0)
    }

    pub fn is_positive(&self) -> bool {
        self.quantity > 0
    }

    pub fn is_zero(&self) -> bool {
        self.quantity == 0
    }

    pub fn same_unit(&self, other: &Amount) -> bool {
        self.unit == other.unit
    }

    /// Subtract an amount of the same unit.
    pub fn checked_sub(&self, other: &Amount) -> EngineResult<Amount> {
        if !self.same_unit(other) {
            return Err(EngineError::UnitMismatch {
                expected: self.unit.clone(),
                found: other.unit.clone(),
            });
        }
        let quantity = self.quantity.checked_sub(other.quantity).ok_or_else(|| {
            EngineError::InvalidAmount(format!("cannot take {} from {}", other, self))
        })?;
        Ok(Amount::new(self.unit.clone(), quantity))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quantity, self.unit)
    }
}

/// Reject unit names that would break pair strings or store keys.
pub fn validate_unit(unit: &str) -> EngineResult<()> {
    if unit.trim().is_empty() || unit.contains(PAIR_SEPARATOR) || unit.contains(KEY_SEPARATOR) {
        return Err(EngineError::InvalidUnit(unit.to_string()));
    }
    Ok(())
}

// ============================================================================
// Denom Pair
// ============================================================================

/// Directional market key: orders selling `sell_unit` for `buy_unit`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DenomPair {
    pub sell_unit: String,
    pub buy_unit: String,
}

impl DenomPair {
    pub fn new(sell_unit: impl Into<String>, buy_unit: impl Into<String>) -> Self {
        Self {
            sell_unit: sell_unit.into(),
            buy_unit: buy_unit.into(),
        }
    }

    /// The opposite side of the same market.
    pub fn reverse_pair(&self) -> DenomPair {
        DenomPair {
            sell_unit: self.buy_unit.clone(),
            buy_unit: self.sell_unit.clone(),
        }
    }
}

impl fmt::Display for DenomPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.sell_unit, PAIR_SEPARATOR, self.buy_unit)
    }
}

impl FromStr for DenomPair {
    type Err = EngineError;

    /// Parse `sell|buy`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(PAIR_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(sell), Some(buy), None)
                if validate_unit(sell).is_ok() && validate_unit(buy).is_ok() =>
            {
                Ok(DenomPair::new(sell, buy))
            },
            _ => Err(EngineError::InvalidDenomPair(s.to_string())),
        }
    }
}

// ============================================================================
// Order Entity
// ============================================================================

/// A resting or incoming limit order.
///
/// Only `sell_amount.quantity` changes over an order's life; price and units
/// are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner: AccountId,
    pub sell_amount: Amount,
    /// Quoted as buy-unit per sell-unit
    pub price: Price,
    /// Logical time after which the order is swept; `None` means never
    pub expiration: Option<DateTime<Utc>>,
}

impl Order {
    /// Create an order, checking that the price is quoted against the sell
    /// leg.
    pub fn new(
        id: OrderId,
        owner: AccountId,
        sell_amount: Amount,
        price: Price,
        expiration: Option<DateTime<Utc>>,
    ) -> EngineResult<Self> {
        if price.denominator_unit != sell_amount.unit {
            return Err(EngineError::InvalidPriceFormat {
                sell_unit: sell_amount.unit,
                denominator_unit: price.denominator_unit,
            });
        }

        Ok(Self {
            id,
            owner,
            sell_amount,
            price,
            expiration,
        })
    }

    /// The order wall this order rests in.
    pub fn pair(&self) -> DenomPair {
        DenomPair::new(
            self.sell_amount.unit.clone(),
            self.price.numerator_unit.clone(),
        )
    }

    pub fn buy_unit(&self) -> &str {
        &self.price.numerator_unit
    }

    pub fn is_consumed(&self) -> bool {
        self.sell_amount.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order::new(
            OrderId::new(1),
            AccountId::new("alice"),
            Amount::new("BTC", 10),
            Price::new("20".parse().unwrap(), "ETH", "BTC").unwrap(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_order_pair() {
        let order = sample_order();
        assert_eq!(order.pair(), DenomPair::new("BTC", "ETH"));
        assert_eq!(order.pair().reverse_pair(), DenomPair::new("ETH", "BTC"));
        assert_eq!(order.buy_unit(), "ETH");
        assert!(!order.is_consumed());
    }

    #[test]
    fn test_order_rejects_mismatched_price() {
        let result = Order::new(
            OrderId::new(1),
            AccountId::new("alice"),
            Amount::new("BTC", 10),
            Price::new("20".parse().unwrap(), "BTC", "ETH").unwrap(),
            None,
        );
        assert!(matches!(
            result,
            Err(EngineError::InvalidPriceFormat { .. })
        ));
    }

    #[test]
    fn test_denom_pair_round_trip() {
        let pair: DenomPair = "BTC|ETH".parse().unwrap();
        assert_eq!(pair, DenomPair::new("BTC", "ETH"));
        assert_eq!(pair.to_string(), "BTC|ETH");
    }

    #[test]
    fn test_denom_pair_invalid() {
        for bad in ["BTC", "BTC|", "|ETH", "A|B|C", "", "A/B|C"] {
            assert!(
                matches!(bad.parse::<DenomPair>(), Err(EngineError::InvalidDenomPair(_))),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_order_id_parse() {
        assert_eq!("42".parse::<OrderId>().unwrap(), OrderId::new(42));
        assert!(matches!(
            "-1".parse::<OrderId>(),
            Err(EngineError::InvalidOrderId(_))
        ));
        assert!(matches!(
            "abc".parse::<OrderId>(),
            Err(EngineError::InvalidOrderId(_))
        ));
    }

    #[test]
    fn test_order_id_sortable_bytes() {
        let a = OrderId::new(2);
        let b = OrderId::new(256);
        assert!(a.to_sortable_bytes() < b.to_sortable_bytes());
        assert_eq!(OrderId::from_sortable_bytes(&b.to_sortable_bytes()), Some(b));
        assert_eq!(OrderId::from_sortable_bytes(&[1, 2, 3]), None);
    }

    #[test]
    fn test_amount_checked_sub() {
        let a = Amount::new("BTC", 10);
        assert_eq!(a.checked_sub(&Amount::new("BTC", 4)).unwrap(), Amount::new("BTC", 6));
        assert!(matches!(
            a.checked_sub(&Amount::new("ETH", 1)),
            Err(EngineError::UnitMismatch { .. })
        ));
        assert!(matches!(
            a.checked_sub(&Amount::new("BTC", 11)),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_validate_unit() {
        assert!(validate_unit("BTC").is_ok());
        assert!(validate_unit("").is_err());
        assert!(validate_unit("A|B").is_err());
        assert!(validate_unit("A/B").is_err());
    }
}
