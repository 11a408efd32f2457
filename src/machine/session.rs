use uuid::Uuid;

use crate::catalog::Product;
use crate::currency::{ChangeLine, DepositError, Money};

use super::engine::{self, PurchaseError};
use super::inventory::Inventory;
use super::ledger::CashLedger;

/// Where a session is in its lifecycle.
///
/// `Idle` until the customer first acts, `Active` for the rest of the
/// interaction, `Finished` once change has been dispensed. There is no path
/// to `Finished` that skips change dispensal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Finished,
}

/// One customer interaction: any number of deposits and purchases, closed by
/// an explicit finish that pays out the remaining balance.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    ledger: CashLedger,
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            ledger: CashLedger::new(),
            state: SessionState::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn balance(&self) -> Money {
        self.ledger.balance()
    }

    /// Routes a raw bill to the ledger. Any attempt, accepted or not, makes
    /// the session active.
    pub fn deposit(&mut self, raw: &str) -> Result<Money, DepositError> {
        self.activate();
        self.ledger.deposit(raw)
    }

    /// Routes a purchase through the engine. Any attempt, successful or
    /// rejected, keeps the session active.
    pub fn purchase(
        &mut self,
        inventory: &mut Inventory,
        id: &str,
    ) -> Result<Product, PurchaseError> {
        self.activate();
        engine::purchase(inventory, &mut self.ledger, id)
    }

    /// Dispenses the remaining balance as change and closes the session.
    pub fn finish(&mut self) -> Vec<ChangeLine> {
        let change = self.ledger.dispense_change();
        self.state = SessionState::Finished;
        change
    }

    fn activate(&mut self) {
        if self.state == SessionState::Idle {
            self.state = SessionState::Active;
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn inventory() -> Inventory {
        let catalog = Catalog::parse("A1|Crisps|3.05|5\n").unwrap();
        Inventory::from_catalog(&catalog)
    }

    #[test]
    fn starts_idle_with_zero_balance() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.balance(), Money::zero());
    }

    #[test]
    fn any_attempt_activates_even_when_rejected() {
        let mut session = Session::new();
        assert!(session.deposit("4.5").is_err());
        assert_eq!(session.state(), SessionState::Active);

        let mut session = Session::new();
        let mut inventory = inventory();
        assert!(session.purchase(&mut inventory, "Z9").is_err());
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn finish_dispenses_everything_and_closes() {
        let mut session = Session::new();
        session.deposit("10").unwrap();
        let change = session.finish();
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.balance(), Money::zero());
        let paid: i64 = change.iter().map(|line| line.subtotal().cents()).sum();
        assert_eq!(paid, 1_000);
    }

    #[test]
    fn each_session_gets_a_distinct_id() {
        assert_ne!(Session::new().id(), Session::new().id());
    }
}
