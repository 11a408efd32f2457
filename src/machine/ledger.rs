use thiserror::Error;

use crate::currency::{ChangeLine, DepositError, Money, DENOMINATIONS};

/// Running balance of money the customer has fed into the machine.
///
/// The balance never goes negative: it only grows through [`deposit`] and
/// only shrinks through [`debit`] or a full [`dispense_change`].
///
/// [`deposit`]: CashLedger::deposit
/// [`debit`]: CashLedger::debit
/// [`dispense_change`]: CashLedger::dispense_change
#[derive(Debug, Default)]
pub struct CashLedger {
    balance: Money,
}

/// A debit was refused because the balance could not cover it. The balance
/// is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient funds: balance {balance}, required {required}")]
pub struct InsufficientFunds {
    pub balance: Money,
    pub required: Money,
}

impl CashLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Accepts raw customer input as a whole-dollar bill. Rejected input
    /// leaves the balance unchanged; the caller re-prompts.
    pub fn deposit(&mut self, raw: &str) -> Result<Money, DepositError> {
        let amount = Money::parse_whole_dollars(raw)?;
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(DepositError::TooLarge)?;
        Ok(self.balance)
    }

    /// Subtracts `amount` if the balance covers it, returning the new
    /// balance.
    pub fn debit(&mut self, amount: Money) -> Result<Money, InsufficientFunds> {
        if self.balance < amount {
            return Err(InsufficientFunds {
                balance: self.balance,
                required: amount,
            });
        }
        self.balance -= amount;
        Ok(self.balance)
    }

    /// Pays out the entire balance greedily, largest denomination first.
    ///
    /// Postcondition: the balance is exactly zero. A remainder below the
    /// smallest coin is unreachable while the catalog enforces
    /// nickel-multiple prices; should it ever appear it is flushed and
    /// reported rather than left to corrupt the next session.
    pub fn dispense_change(&mut self) -> Vec<ChangeLine> {
        let mut lines = Vec::new();
        let mut remaining = self.balance.cents();
        for denomination in DENOMINATIONS {
            if remaining == 0 {
                break;
            }
            let count = remaining / denomination.value.cents();
            if count > 0 {
                remaining -= count * denomination.value.cents();
                lines.push(ChangeLine { denomination, count });
            }
        }
        if remaining != 0 {
            tracing::error!(
                remaining_cents = remaining,
                "balance not representable by the denomination ladder; flushing"
            );
        }
        self.balance = Money::zero();
        lines
    }
}
