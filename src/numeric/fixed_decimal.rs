// ============================================================================
// Fixed-Point Decimal
// Deterministic fixed-point arithmetic with compile-time precision
// ============================================================================

use super::errors::{NumericError, NumericResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;

/// Fixed-point decimal number with compile-time precision.
///
/// Internally stores `value × 10^DECIMALS` as an i128.
///
/// # Type Parameter
/// - `DECIMALS`: Number of decimal places (0-18). Default is 10.
///
/// # Example
/// ```ignore
/// use orderwall_engine::numeric::Ratio;
///
/// let price: Ratio = "0.25".parse()?;        // 0.2500000000
/// let inverse = price.reciprocal()?;         // 4.0000000000
/// let bought = price.mul_quantity(10)?;      // 3 (2.5 rounded half-up)
/// ```
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct FixedDecimal<const DECIMALS: u8 = 10>(i128);

// ============================================================================
// Scale Constants
// ============================================================================

/// Compute 10^n at compile time
const fn pow10(n: u8) -> i128 {
    let mut result: i128 = 1;
    let mut i = 0;
    while i < n {
        result *= 10;
        i += 1;
    }
    result
}

impl<const D: u8> FixedDecimal<D> {
    /// The scale factor (10^DECIMALS)
    pub const SCALE: i128 = pow10(D);

    /// Half scale for rounding (SCALE / 2)
    const HALF_SCALE: i128 = pow10(D) / 2;

    /// Zero value
    pub const ZERO: Self = Self(0);

    /// One (1.0)
    pub const ONE: Self = Self(pow10(D));

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from raw internal representation.
    #[inline]
    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    /// Create from an integer value.
    #[inline]
    pub fn from_integer(value: i64) -> NumericResult<Self> {
        (value as i128)
            .checked_mul(Self::SCALE)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    /// Create from integer and fractional parts.
    ///
    /// `fraction` must be below `SCALE`; it is applied with the sign of
    /// `integer`.
    #[inline]
    pub fn from_parts(integer: i64, fraction: u64) -> NumericResult<Self> {
        if fraction as i128 >= Self::SCALE {
            return Err(NumericError::InvalidInput);
        }

        let int_scaled = (integer as i128)
            .checked_mul(Self::SCALE)
            .ok_or(NumericError::Overflow)?;

        let frac_signed = if integer < 0 {
            -(fraction as i128)
        } else {
            fraction as i128
        };

        int_scaled
            .checked_add(frac_signed)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the integer part (truncated toward zero).
    #[inline]
    pub const fn integer_part(self) -> i128 {
        self.0 / Self::SCALE
    }

    /// Get the fractional part as a positive value.
    #[inline]
    pub const fn fractional_part(self) -> u128 {
        (self.0 % Self::SCALE).unsigned_abs()
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Checked division with round half-up.
    #[inline]
    pub fn checked_div(self, rhs: Self) -> NumericResult<Self> {
        if rhs.0 == 0 {
            return Err(NumericError::DivisionByZero);
        }

        let numerator = self
            .0
            .unsigned_abs()
            .checked_mul(Self::SCALE as u128)
            .ok_or(NumericError::Overflow)?;
        let divisor = rhs.0.unsigned_abs();
        let quotient = numerator
            .checked_add(divisor / 2)
            .ok_or(NumericError::Overflow)?
            / divisor;
        let magnitude = i128::try_from(quotient).map_err(|_| NumericError::Overflow)?;

        if (self.0 < 0) != (rhs.0 < 0) {
            Ok(Self(-magnitude))
        } else {
            Ok(Self(magnitude))
        }
    }

    /// `1 / self`, rounded half-up at the last decimal place.
    #[inline]
    pub fn reciprocal(self) -> NumericResult<Self> {
        Self::ONE.checked_div(self)
    }

    /// Multiply a whole quantity by this value, rounding half-up to the
    /// nearest whole unit.
    ///
    /// # Errors
    /// - `InvalidInput` if this value is negative
    /// - `Overflow` if the result does not fit in a u64
    pub fn mul_quantity(self, quantity: u64) -> NumericResult<u64> {
        if self.0 < 0 {
            return Err(NumericError::InvalidInput);
        }

        let product = (self.0 as u128)
            .checked_mul(quantity as u128)
            .ok_or(NumericError::Overflow)?;
        let rounded = product
            .checked_add(Self::HALF_SCALE as u128)
            .ok_or(NumericError::Overflow)?
            / Self::SCALE as u128;

        u64::try_from(rounded).map_err(|_| NumericError::Overflow)
    }
}

// ============================================================================
// Sortable Window (10 digits either side of the decimal point)
// ============================================================================

/// Byte length of [`Ratio::sortable_bytes`]: 11 integer digits, a point,
/// and 10 fractional digits.
pub const SORTABLE_KEY_LEN: usize = 22;

const SORTABLE_INT_DIGITS: usize = 11;

impl FixedDecimal<10> {
    /// Smallest value inside the sortable window (0.0000000001)
    pub const MIN_SORTABLE: Self = Self(1);

    /// Largest value inside the sortable window (10^10)
    pub const MAX_SORTABLE: Self = Self(10_000_000_000 * Self::SCALE);

    /// Whether this value can be used as a byte-ordered key.
    #[inline]
    pub fn is_sortable(self) -> bool {
        self >= Self::MIN_SORTABLE && self <= Self::MAX_SORTABLE
    }

    /// Fixed-width, zero-padded text encoding whose byte order equals the
    /// numeric order of every value inside the sortable window.
    ///
    /// `1` encodes as `00000000001.0000000000`.
    pub fn sortable_bytes(self) -> NumericResult<[u8; SORTABLE_KEY_LEN]> {
        if !self.is_sortable() {
            return Err(NumericError::OutOfSortableRange);
        }

        let mut buf = [b'0'; SORTABLE_KEY_LEN];
        let mut int = self.integer_part() as u128;
        for slot in buf[..SORTABLE_INT_DIGITS].iter_mut().rev() {
            *slot = b'0' + (int % 10) as u8;
            int /= 10;
        }
        buf[SORTABLE_INT_DIGITS] = b'.';
        let mut frac = self.fractional_part();
        for slot in buf[SORTABLE_INT_DIGITS + 1..].iter_mut().rev() {
            *slot = b'0' + (frac % 10) as u8;
            frac /= 10;
        }

        Ok(buf)
    }

    /// Inverse of [`Self::sortable_bytes`].
    pub fn from_sortable_bytes(bytes: &[u8]) -> NumericResult<Self> {
        if bytes.len() != SORTABLE_KEY_LEN || bytes[SORTABLE_INT_DIGITS] != b'.' {
            return Err(NumericError::InvalidInput);
        }
        let text = std::str::from_utf8(bytes).map_err(|_| NumericError::InvalidInput)?;
        let value: Self = text.parse()?;
        if !value.is_sortable() {
            return Err(NumericError::OutOfSortableRange);
        }
        Ok(value)
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl<const D: u8> Default for FixedDecimal<D> {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const D: u8> PartialEq for FixedDecimal<D> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<const D: u8> Eq for FixedDecimal<D> {}

impl<const D: u8> PartialOrd for FixedDecimal<D> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const D: u8> Ord for FixedDecimal<D> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<const D: u8> Hash for FixedDecimal<D> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<const D: u8> Neg for FixedDecimal<D> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl<const D: u8> fmt::Debug for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedDecimal<{}>({}, raw={})", D, self, self.0)
    }
}

impl<const D: u8> fmt::Display for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int_part = self.integer_part();
        let frac_part = self.fractional_part();

        if D == 0 {
            write!(f, "{}", int_part)
        } else if self.0 < 0 && int_part == 0 {
            // Handle -0.xxx case
            write!(f, "-0.{:0>width$}", frac_part, width = D as usize)
        } else {
            write!(f, "{}.{:0>width$}", int_part, frac_part, width = D as usize)
        }
    }
}

// ============================================================================
// Serde (decimal string form)
// ============================================================================

impl<const D: u8> Serialize for FixedDecimal<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de, const D: u8> Deserialize<'de> for FixedDecimal<D> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Conversion from rust_decimal (for API boundaries)
// ============================================================================

impl<const D: u8> FixedDecimal<D> {
    /// Convert from rust_decimal::Decimal.
    ///
    /// # Errors
    /// - `PrecisionLoss` if the decimal carries more than DECIMALS places
    /// - `Overflow` if the value is too large
    pub fn from_decimal(d: rust_decimal::Decimal) -> NumericResult<Self> {
        let normalized = d.normalize();
        if normalized.scale() > D as u32 {
            return Err(NumericError::PrecisionLoss);
        }

        let mut rescaled = normalized;
        rescaled.rescale(D as u32);
        // rescale silently caps the scale when the mantissa would not fit
        if rescaled.scale() != D as u32 {
            return Err(NumericError::Overflow);
        }

        Ok(Self(rescaled.mantissa()))
    }

    /// Convert to rust_decimal::Decimal.
    pub fn to_decimal(self) -> NumericResult<rust_decimal::Decimal> {
        rust_decimal::Decimal::try_from_i128_with_scale(self.0, D as u32)
            .map_err(|_| NumericError::Overflow)
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl<const D: u8> std::str::FromStr for FixedDecimal<D> {
    type Err = NumericError;

    /// Parse from a decimal string.
    ///
    /// # Examples
    /// - "123" -> 123.0000000000
    /// - "0.25" -> 0.2500000000
    /// - "-0.001" -> -0.0010000000
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NumericError::InvalidInput);
        }

        let (is_negative, s) = if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else {
            (false, s)
        };

        let (int_str, frac_str) = if let Some(pos) = s.find('.') {
            (&s[..pos], Some(&s[pos + 1..]))
        } else {
            (s, None)
        };

        if int_str.is_empty() && frac_str.map_or(true, str::is_empty) {
            return Err(NumericError::InvalidInput);
        }
        if !int_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NumericError::InvalidInput);
        }
        let int_val: i64 = if int_str.is_empty() {
            0
        } else {
            int_str.parse().map_err(|_| NumericError::InvalidInput)?
        };

        let frac_val: u64 = match frac_str {
            None | Some("") => 0,
            Some(frac) if !frac.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(NumericError::InvalidInput)
            },
            Some(frac) if frac.len() > D as usize => return Err(NumericError::PrecisionLoss),
            Some(frac) => {
                // Pad with zeros to reach DECIMALS length
                let padded = format!("{:0<width$}", frac, width = D as usize);
                padded.parse().map_err(|_| NumericError::InvalidInput)?
            },
        };

        let result = Self::from_parts(int_val, frac_val)?;
        Ok(if is_negative { -result } else { result })
    }
}

// ============================================================================
// Type Aliases
// ============================================================================

/// Price ratio with 10 decimal places
pub type Ratio = FixedDecimal<10>;

// ============================================================================
// Tests
// ============================================================================
