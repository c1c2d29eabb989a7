use crate::error::{PricingError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Number of decimal places shown to customers.
const CURRENCY_DP: u32 = 2;

/// Largest unit price accepted from a catalog.
pub const MAX_PRICE: Decimal = dec!(1000000);

/// A monetary value in dollars.
///
/// Wraps `rust_decimal::Decimal` so that intermediate sums stay exact. Rounding to
/// cents happens only through [`Money::rounded`] and the `Display` impl, never while
/// accumulating line totals. The arithmetic operators saturate; pricing code that
/// must report overflow goes through [`Money::checked_mul`] and [`Money::checked_add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Builds a price, rejecting negative values and values above [`MAX_PRICE`].
    pub fn price(amount: Decimal) -> Result<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PricingError::DomainError(format!(
                "Price must not be negative, got {amount}"
            )));
        }
        if amount > MAX_PRICE {
            return Err(PricingError::DomainError(format!(
                "Price must not exceed {MAX_PRICE}, got {amount}"
            )));
        }
        Ok(Self(amount))
    }

    /// `self × factor`, or a `DomainError` when the product does not fit a `Decimal`.
    pub fn checked_mul(self, factor: Decimal) -> Result<Self> {
        self.0
            .checked_mul(factor)
            .map(Self)
            .ok_or_else(|| PricingError::DomainError(format!("Amount overflow: {self} × {factor}")))
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| PricingError::DomainError(format!("Amount overflow: {self} + {rhs}")))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The amount rounded to cents, half away from zero.
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.rounded())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;
    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0.saturating_mul(rhs))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
