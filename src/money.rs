//! Fixed-point monetary amount with 2 decimal places precision.
//!
//! Uses `rust_decimal` internally with scale enforcement so balances never
//! pick up floating-point drift across deposits and withdrawals.
//!
//! Amounts are bounded by [`Money::MAX`] in both directions. The bound keeps
//! every value exactly representable as a JSON number, so a balance written
//! to the data file reads back to the same cent.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A monetary amount that always carries exactly 2 decimal places.
///
/// Values are persisted as plain JSON numbers so files stay readable and
/// compatible with hand-edited data.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use atm_console::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Largest amount, 999,999,999,999.99. Fourteen significant digits fit
    /// an f64 without losing a cent.
    pub const MAX: Self = Money(Decimal::from_parts(
        0x107A_3FFF,
        0x5AF3,
        0,
        false,
        Self::SCALE,
    ));

    /// Smallest amount, the negation of [`Money::MAX`].
    pub const MIN: Self = Money(Decimal::from_parts(
        0x107A_3FFF,
        0x5AF3,
        0,
        true,
        Self::SCALE,
    ));

    /// Rounds `value` half away from zero to 2 decimal places.
    ///
    /// Returns `None` when the rounded value lies outside
    /// [`Money::MIN`]..=[`Money::MAX`].
    pub fn new(value: Decimal) -> Option<Self> {
        let mut normalized =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        normalized.rescale(Self::SCALE);
        let money = Money(normalized);
        (Self::MIN..=Self::MAX).contains(&money).then_some(money)
    }

    /// Creates an amount from a whole number of cents, clamped to the
    /// supported range.
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, Self::SCALE)).clamp(Self::MIN, Self::MAX)
    }

    /// Converts a float through its shortest decimal rendering, so `0.1`
    /// becomes exactly `0.10`. `None` for NaN, infinities and out-of-range
    /// values.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Money::from_str(&value.to_string()).ok()
    }

    /// `self + rhs`, or `None` if the sum leaves the supported range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).and_then(Money::new)
    }

    /// `self - rhs`, or `None` if the difference leaves the supported range.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).and_then(Money::new)
    }

    /// Returns `true` if this amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    /// Parses plain (`"12.5"`) or scientific (`"1.25e1"`) notation.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = match Decimal::from_str(trimmed) {
            Ok(decimal) => decimal,
            Err(e) if !has_small_exponent(trimmed) => return Err(e),
            Err(_) => Decimal::from_scientific(trimmed)?,
        };
        Money::new(decimal).ok_or(if decimal.is_sign_negative() {
            rust_decimal::Error::LessThanMinimumPossibleValue
        } else {
            rust_decimal::Error::ExceedsMaximumPossibleValue
        })
    }
}

/// `true` if `s` has an `e`/`E` exponent within the range a `Decimal` scale
/// can express.
fn has_small_exponent(s: &str) -> bool {
    s.split_once(['e', 'E'])
        .and_then(|(_, exp)| exp.parse::<i32>().ok())
        .is_some_and(|exp| exp.abs() <= 28)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = self
            .0
            .to_f64()
            .ok_or_else(|| serde::ser::Error::custom(format!("{} is not representable", self)))?;
        serializer.serialize_f64(value)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a number or numeric string between {} and {}", Money::MIN, Money::MAX)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Money, E> {
        Money::new(Decimal::from(v)).ok_or_else(|| E::custom(format!("{} is out of range", v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Money, E> {
        Money::new(Decimal::from(v)).ok_or_else(|| E::custom(format!("{} is out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Money, E> {
        Money::from_f64(v).ok_or_else(|| E::custom(format!("{} is not a valid amount", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Money, E> {
        Money::from_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MoneyVisitor)
    }
}
