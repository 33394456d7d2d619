// src/models/money.rs

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::errors::DomainError;

/// Whole-unit currency scale. Every amount is rounded to this many decimal places.
const SCALE: u32 = 0;

/// Largest amount a `Money` may hold; matches the `NUMERIC(18, 0)` columns.
pub const MAX_AMOUNT: Decimal = dec!(999_999_999_999_999_999);

fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn checked(result: Option<Decimal>, operation: &str) -> Result<Money, DomainError> {
    result
        .ok_or_else(|| DomainError::InvalidAmount(format!("{} overflowed", operation)))
        .and_then(Money::wons)
}

// ─── Money ────────────────────────────────────────────────────────────────────

/// Non-negative amount of money in whole currency units.
///
/// Every operation returns a new value; an operation that would produce a
/// negative amount fails with [`DomainError::InvalidAmount`] instead of clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "Decimal", into = "Decimal")]
#[schema(value_type = String, example = "1000000")]
pub struct Money(Decimal);

impl Money {
    /// Fails when `amount` is negative or above [`MAX_AMOUNT`].
    pub fn wons(amount: Decimal) -> Result<Self, DomainError> {
        if amount < Decimal::ZERO {
            return Err(DomainError::InvalidAmount(format!(
                "amount cannot be negative: {}",
                amount
            )));
        }
        let rounded = round_half_up(amount);
        if rounded > MAX_AMOUNT {
            return Err(DomainError::InvalidAmount(format!(
                "amount exceeds {}: {}",
                MAX_AMOUNT, amount
            )));
        }
        Ok(Money(rounded))
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Fails only when the sum exceeds [`MAX_AMOUNT`].
    pub fn add(&self, other: Money) -> Result<Money, DomainError> {
        checked(self.0.checked_add(other.0), "addition")
    }

    /// Fails when `other` is larger than `self`.
    pub fn subtract(&self, other: Money) -> Result<Money, DomainError> {
        if other.0 > self.0 {
            return Err(DomainError::InvalidAmount(format!(
                "cannot subtract {} from {}",
                other.0, self.0
            )));
        }
        Ok(Money(round_half_up(self.0 - other.0)))
    }

    pub fn multiply(&self, factor: Decimal) -> Result<Money, DomainError> {
        if factor < Decimal::ZERO {
            return Err(DomainError::InvalidAmount(format!(
                "multiplication factor cannot be negative: {}",
                factor
            )));
        }
        checked(self.0.checked_mul(factor), "multiplication")
    }

    pub fn divide(&self, divisor: Decimal) -> Result<Money, DomainError> {
        if divisor <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount(format!(
                "divisor must be positive: {}",
                divisor
            )));
        }
        checked(self.0.checked_div(divisor), "division")
    }

    pub fn is_greater_than(&self, other: Money) -> bool {
        self.0 > other.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::wons(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── SignedMoney ──────────────────────────────────────────────────────────────

/// Whole-unit amount that may go below zero. Used for profit, where a month
/// with more cost than revenue is a deficit rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(from = "Decimal", into = "Decimal")]
#[schema(value_type = String, example = "-300000")]
pub struct SignedMoney(Decimal);

impl SignedMoney {
    pub fn new(amount: Decimal) -> Self {
        SignedMoney(round_half_up(amount))
    }

    pub fn zero() -> Self {
        SignedMoney(Decimal::ZERO)
    }

    /// `minuend - subtrahend`, negative when the subtrahend is larger.
    pub fn difference(minuend: Money, subtrahend: Money) -> Self {
        SignedMoney::new(minuend.amount() - subtrahend.amount())
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_deficit(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl From<Decimal> for SignedMoney {
    fn from(value: Decimal) -> Self {
        SignedMoney::new(value)
    }
}

impl From<SignedMoney> for Decimal {
    fn from(money: SignedMoney) -> Self {
        money.0
    }
}

impl From<Money> for SignedMoney {
    fn from(money: Money) -> Self {
        SignedMoney(money.amount())
    }
}

impl fmt::Display for SignedMoney {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn won(amount: Decimal) -> Money {
        Money::wons(amount).unwrap()
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(matches!(
            Money::wons(dec!(-1)),
            Err(DomainError::InvalidAmount(_))
        ));
        assert!(Money::wons(dec!(-0.4)).is_err());
    }

    #[test]
    fn rounds_half_up_to_whole_units() {
        assert_eq!(won(dec!(100.5)).amount(), dec!(101));
        assert_eq!(won(dec!(100.49)).amount(), dec!(100));
        assert_eq!(won(dec!(50.50)).add(won(dec!(100))).unwrap().amount(), dec!(151));
    }

    #[test]
    fn zero_is_zero() {
        assert!(Money::zero().is_zero());
        assert_eq!(Money::default(), Money::zero());
    }

    #[test]
    fn subtract_fails_instead_of_clamping() {
        assert_eq!(
            won(dec!(1000)).subtract(won(dec!(700))).unwrap().amount(),
            dec!(300)
        );
        assert!(won(dec!(500)).subtract(won(dec!(800))).is_err());
        assert!(won(dec!(100)).subtract(won(dec!(100))).unwrap().is_zero());
    }

    #[test]
    fn multiply_and_divide_validate_operands() {
        assert_eq!(won(dec!(100)).multiply(dec!(1.5)).unwrap().amount(), dec!(150));
        assert!(won(dec!(100)).multiply(dec!(-1)).is_err());
        assert!(won(dec!(100)).multiply(Decimal::ZERO).unwrap().is_zero());

        assert_eq!(won(dec!(100)).divide(dec!(4)).unwrap().amount(), dec!(25));
        assert_eq!(won(dec!(100)).divide(dec!(3)).unwrap().amount(), dec!(33));
        assert_eq!(won(dec!(5)).divide(dec!(2)).unwrap().amount(), dec!(3));
        assert!(won(dec!(100)).divide(Decimal::ZERO).is_err());
        assert!(won(dec!(100)).divide(dec!(-2)).is_err());
    }

    #[test]
    fn arithmetic_past_the_upper_bound_is_an_error() {
        let max = won(MAX_AMOUNT);
        assert!(matches!(Money::wons(MAX_AMOUNT + Decimal::ONE), Err(DomainError::InvalidAmount(_))));
        assert!(Money::wons(Decimal::MAX).is_err());

        assert!(matches!(max.add(won(dec!(1))), Err(DomainError::InvalidAmount(_))));
        assert!(max.multiply(dec!(2)).is_err());
        assert!(max.multiply(Decimal::MAX).is_err());
        assert!(max.divide(dec!(0.0000000001)).is_err());
        assert_eq!(max.add(Money::zero()).unwrap(), max);
        assert_eq!(max.multiply(Decimal::ONE).unwrap(), max);
    }

    #[test]
    fn greater_than_is_strict() {
        assert!(won(dec!(2)).is_greater_than(won(dec!(1))));
        assert!(!won(dec!(1)).is_greater_than(won(dec!(1))));
    }

    #[test]
    fn deserializing_a_negative_amount_fails() {
        let parsed: Result<Money, _> = serde_json::from_str("\"-10\"");
        assert!(parsed.is_err());
        let parsed: Money = serde_json::from_str("\"10.6\"").unwrap();
        assert_eq!(parsed.amount(), dec!(11));
    }

    #[test]
    fn signed_difference_allows_deficit() {
        let deficit = SignedMoney::difference(won(dec!(500)), won(dec!(800)));
        assert_eq!(deficit.amount(), dec!(-300));
        assert!(deficit.is_deficit());
        assert!(!SignedMoney::difference(won(dec!(100)), won(dec!(100))).is_deficit());
    }

    proptest! {
        #[test]
        fn add_matches_decimal_sum(a in 0i64..1_000_000_000_000, b in 0i64..1_000_000_000_000) {
            let sum = won(Decimal::from(a)).add(won(Decimal::from(b))).unwrap();
            prop_assert_eq!(sum.amount(), Decimal::from(a + b));
        }

        #[test]
        fn subtract_fails_when_operand_is_larger(a in 0i64..1_000_000_000, delta in 1i64..1_000_000) {
            let smaller = won(Decimal::from(a));
            let larger = won(Decimal::from(a + delta));
            prop_assert!(smaller.subtract(larger).is_err());
            prop_assert_eq!(larger.subtract(smaller).unwrap().amount(), Decimal::from(delta));
        }

        #[test]
        fn negative_construction_always_fails(a in 1i64..i64::MAX) {
            prop_assert!(Money::wons(Decimal::from(-a)).is_err());
        }
    }
}
