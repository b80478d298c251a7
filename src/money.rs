//! Money amounts. Kept as integer cents in the store so budget arithmetic
//! there is exact; parsed from and rendered as decimals.

use std::{fmt, iter::Sum, str::FromStr};

use json::Value;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use sea_orm::DeriveValueType;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

#[derive(
  Clone,
  Copy,
  Debug,
  Default,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  DeriveValueType,
)]
pub struct Cents(pub i64);

impl Cents {
  pub const ZERO: Self = Self(0);

  /// Rounds to whole cents, half away from zero. `None` when out of range.
  pub fn from_decimal(amount: Decimal) -> Option<Self> {
    amount
      .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
      .checked_mul(Decimal::ONE_HUNDRED)?
      .to_i64()
      .map(Self)
  }

  /// Number or numeric string, read as a decimal so `0.1` stays `0.1`.
  pub fn parse(value: &Value) -> Option<Self> {
    let raw = match value {
      Value::Number(n) => n.to_string(),
      Value::String(s) => s.trim().to_string(),
      _ => return None,
    };
    Decimal::from_str(&raw)
      .or_else(|_| Decimal::from_scientific(&raw))
      .ok()
      .and_then(Self::from_decimal)
  }

  pub fn to_decimal(self) -> Decimal {
    Decimal::new(self.0, 2)
  }

  pub fn is_negative(self) -> bool {
    self.0 < 0
  }

  pub fn checked_add(self, other: Self) -> Option<Self> {
    self.0.checked_add(other.0).map(Self)
  }

  pub fn saturating_add(self, other: Self) -> Self {
    Self(self.0.saturating_add(other.0))
  }

  /// Share of `whole` in percent with two decimals, 0 for an empty whole.
  pub fn percent_of(self, whole: Self) -> Decimal {
    if whole.0 <= 0 {
      return Decimal::ZERO;
    }
    (Decimal::from(self.0) * Decimal::ONE_HUNDRED / Decimal::from(whole.0))
      .round_dp(2)
  }
}

impl Sum for Cents {
  fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
    iter.fold(Self::ZERO, Self::saturating_add)
  }
}

impl fmt::Display for Cents {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.to_decimal())
  }
}

impl Serialize for Cents {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    rust_decimal::serde::float::serialize(&self.to_decimal(), serializer)
  }
}

impl<'de> Deserialize<'de> for Cents {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let amount = rust_decimal::serde::float::deserialize(deserializer)?;
    Self::from_decimal(amount)
      .ok_or_else(|| de::Error::custom("amount out of range"))
  }
}
