use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Exact monetary amount stored in cents.
///
/// All arithmetic is plain integer arithmetic, so amounts never pick up
/// rounding error and comparisons are exact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Dollar portion of the amount, truncated toward zero.
    pub const fn whole_dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Cent portion of the amount, always 0-99.
    pub const fn cent_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Adds two amounts, or `None` when the sum does not fit in cents.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Parses customer-fed cash, which the machine only accepts as whole
    /// dollar bills of $1 or more.
    pub fn parse_whole_dollars(raw: &str) -> Result<Self, DepositError> {
        let dollars: i64 = raw
            .trim()
            .parse()
            .map_err(|_| DepositError::NotAWholeNumber)?;
        if dollars < 1 {
            return Err(DepositError::BelowMinimum);
        }
        // A parseable dollar figure can still overflow the cents
        // representation.
        let cents = dollars.checked_mul(100).ok_or(DepositError::TooLarge)?;
        Ok(Self::from_cents(cents))
    }
}

/// Why a fed bill was rejected. Recoverable; the caller re-prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DepositError {
    #[error("please enter a whole dollar amount only")]
    NotAWholeNumber,
    #[error("please enter a whole dollar amount of $1 or more")]
    BelowMinimum,
    #[error("that amount is more than the machine can hold")]
    TooLarge,
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.whole_dollars().abs(),
            self.cent_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// A single bill or coin size the change hopper can pay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denomination {
    pub label: &'static str,
    pub value: Money,
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// Fixed descending ladder used for greedy change computation.
///
/// The order is semantically required: change is always paid out largest
/// denomination first. The smallest unit (5 cents) evenly divides every
/// balance the machine can reach, which the catalog loader enforces.
pub const DENOMINATIONS: [Denomination; 9] = [
    Denomination { label: "$100", value: Money::from_cents(10_000) },
    Denomination { label: "$50", value: Money::from_cents(5_000) },
    Denomination { label: "$20", value: Money::from_cents(2_000) },
    Denomination { label: "$10", value: Money::from_cents(1_000) },
    Denomination { label: "$5", value: Money::from_cents(500) },
    Denomination { label: "$1", value: Money::from_cents(100) },
    Denomination { label: "25\u{a2}", value: Money::from_cents(25) },
    Denomination { label: "10\u{a2}", value: Money::from_cents(10) },
    Denomination { label: "5\u{a2}", value: Money::from_cents(5) },
];

/// One row of a change payout: `count` units of `denomination`. The count
/// shares the cent arithmetic's width, so no payout the ledger can compute
/// gets truncated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeLine {
    pub denomination: Denomination,
    pub count: i64,
}

impl ChangeLine {
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.denomination.value.cents() * self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_whole_dollars() {
        assert_eq!(
            Money::parse_whole_dollars("10"),
            Ok(Money::from_dollars(10))
        );
        assert_eq!(Money::parse_whole_dollars(" 5 "), Ok(Money::from_dollars(5)));
    }

    #[test]
    fn parse_rejects_fractions_and_garbage() {
        assert_eq!(
            Money::parse_whole_dollars("4.5"),
            Err(DepositError::NotAWholeNumber)
        );
        assert_eq!(
            Money::parse_whole_dollars("ten"),
            Err(DepositError::NotAWholeNumber)
        );
        assert_eq!(
            Money::parse_whole_dollars(""),
            Err(DepositError::NotAWholeNumber)
        );
    }

    #[test]
    fn parse_rejects_amounts_too_large_to_hold_in_cents() {
        // Largest dollar figure whose cent value still fits in i64.
        assert_eq!(
            Money::parse_whole_dollars("92233720368547758"),
            Ok(Money::from_cents(9_223_372_036_854_775_800))
        );
        assert_eq!(
            Money::parse_whole_dollars("92233720368547759"),
            Err(DepositError::TooLarge)
        );
        assert_eq!(
            Money::parse_whole_dollars("9223372036854775807"),
            Err(DepositError::TooLarge)
        );
    }

    #[test]
    fn parse_rejects_amounts_below_one_dollar() {
        assert_eq!(
            Money::parse_whole_dollars("0"),
            Err(DepositError::BelowMinimum)
        );
        assert_eq!(
            Money::parse_whole_dollars("-3"),
            Err(DepositError::BelowMinimum)
        );
    }

    #[test]
    fn display_formats_dollars_and_cents() {
        assert_eq!(Money::from_cents(305).to_string(), "$3.05");
        assert_eq!(Money::from_cents(1000).to_string(), "$10.00");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn arithmetic_is_exact() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(305);
        assert_eq!(a - b, Money::from_cents(695));
        assert_eq!(b + b, Money::from_cents(610));
    }

    #[test]
    fn ladder_descends_strictly() {
        for pair in DENOMINATIONS.windows(2) {
            assert!(pair[0].value > pair[1].value);
        }
    }
}
