// ============================================================================
// Price Domain Model
// Unit-tagged exact ratios and amount conversion
// ============================================================================

use super::Amount;
use crate::errors::{EngineError, EngineResult};
use crate::numeric::Ratio;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A ratio between two units, quoted as `numerator_unit` per
/// `denominator_unit`.
///
/// An order's price is always quoted as buy-unit per sell-unit, so its
/// `denominator_unit` equals the order's sell unit. Comparing or converting
/// across mismatched units is an error, never a coercion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    pub ratio: Ratio,
    pub numerator_unit: String,
    pub denominator_unit: String,
}

impl Price {
    /// Create a price, rejecting ratios outside the sortable window.
    ///
    /// # Errors
    /// `InvalidPriceRange` when `ratio` is not in `[10^-10, 10^10]`; this
    /// also rules out zero and negative ratios.
    pub fn new(
        ratio: Ratio,
        numerator_unit: impl Into<String>,
        denominator_unit: impl Into<String>,
    ) -> EngineResult<Self> {
        if !ratio.is_sortable() {
            return Err(EngineError::InvalidPriceRange { ratio });
        }

        Ok(Self {
            ratio,
            numerator_unit: numerator_unit.into(),
            denominator_unit: denominator_unit.into(),
        })
    }

    /// Create a price from a `rust_decimal` ratio.
    ///
    /// # Errors
    /// `Numeric(PrecisionLoss)` for more than ten fractional digits, then the
    /// same range check as [`Price::new`].
    pub fn from_decimal(
        ratio: Decimal,
        numerator_unit: impl Into<String>,
        denominator_unit: impl Into<String>,
    ) -> EngineResult<Self> {
        Self::new(Ratio::from_decimal(ratio)?, numerator_unit, denominator_unit)
    }

    /// The ratio as a `rust_decimal` value.
    pub fn to_decimal(&self) -> EngineResult<Decimal> {
        Ok(self.ratio.to_decimal()?)
    }

    /// Whether the ratio lies inside the sortable window.
    pub fn is_valid(&self) -> bool {
        self.ratio.is_sortable()
    }

    /// Swap the units and invert the ratio.
    ///
    /// The inverse of a value inside the sortable window stays inside it.
    pub fn reciprocal(&self) -> EngineResult<Price> {
        Ok(Price {
            ratio: self.ratio.reciprocal()?,
            numerator_unit: self.denominator_unit.clone(),
            denominator_unit: self.numerator_unit.clone(),
        })
    }

    /// Compare two prices quoted in the same units.
    pub fn compare(&self, other: &Price) -> EngineResult<Ordering> {
        self.ensure_same_units(other)?;
        Ok(self.ratio.cmp(&other.ratio))
    }

    pub fn lt(&self, other: &Price) -> EngineResult<bool> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    pub fn lte(&self, other: &Price) -> EngineResult<bool> {
        Ok(self.compare(other)? != Ordering::Greater)
    }

    pub fn gt(&self, other: &Price) -> EngineResult<bool> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    pub fn gte(&self, other: &Price) -> EngineResult<bool> {
        Ok(self.compare(other)? != Ordering::Less)
    }

    pub fn equals(&self, other: &Price) -> EngineResult<bool> {
        Ok(self.compare(other)? == Ordering::Equal)
    }

    fn ensure_same_units(&self, other: &Price) -> EngineResult<()> {
        if self.numerator_unit != other.numerator_unit
            || self.denominator_unit != other.denominator_unit
        {
            return Err(EngineError::UnitMismatch {
                expected: format!("{}/{}", self.numerator_unit, self.denominator_unit),
                found: format!("{}/{}", other.numerator_unit, other.denominator_unit),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}",
            self.ratio, self.numerator_unit, self.denominator_unit
        )
    }
}

/// Convert `amount` through `price`: `quantity × ratio`, rounded half-up to
/// a whole unit of `price.numerator_unit`.
///
/// # Errors
/// `UnitMismatch` if `amount.unit` is not `price.denominator_unit`.
pub fn convert_amount(amount: &Amount, price: &Price) -> EngineResult<Amount> {
    if amount.unit != price.denominator_unit {
        return Err(EngineError::UnitMismatch {
            expected: price.denominator_unit.clone(),
            found: amount.unit.clone(),
        });
    }

    Ok(Amount {
        unit: price.numerator_unit.clone(),
        quantity: price.ratio.mul_quantity(amount.quantity)?,
    })
}
