//! The transaction engine: cash ledger, inventory, purchase validation, and
//! the session state machine, tied together by the [`VendingMachine`]
//! facade.

mod engine;
mod inventory;
mod ledger;
mod session;

use uuid::Uuid;

pub use engine::{purchase, PurchaseError};
pub use inventory::{Inventory, Slot};
pub use ledger::{CashLedger, InsufficientFunds};
pub use session::{Session, SessionState};

use crate::catalog::Product;
use crate::currency::{ChangeLine, DepositError, Money};

/// Append-only sink for completed transaction records. Fire and forget:
/// implementations swallow their own I/O failures.
pub trait TransactionSink {
    fn record(&mut self, label: &str, amount: Money, balance: Money);
}

/// Sink notified once per successful purchase, for cumulative sales totals.
pub trait SalesSink {
    fn record_sale(&mut self, product: &Product);
}

/// Everything paid out when a session finishes.
#[derive(Debug)]
pub struct SessionReceipt {
    pub session_id: Uuid,
    pub change: Vec<ChangeLine>,
    pub total: Money,
}

/// Owns the machine-wide inventory and the current session, and routes
/// every mutation through them. No ambient globals: callers construct the
/// machine with its collaborators and pass it around explicitly.
pub struct VendingMachine {
    inventory: Inventory,
    session: Session,
    transactions: Box<dyn TransactionSink>,
    sales: Box<dyn SalesSink>,
}

impl VendingMachine {
    pub fn new(
        inventory: Inventory,
        transactions: Box<dyn TransactionSink>,
        sales: Box<dyn SalesSink>,
    ) -> Self {
        Self {
            inventory,
            session: Session::new(),
            transactions,
            sales,
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn balance(&self) -> Money {
        self.session.balance()
    }

    /// Feeds a raw bill into the current session and records the deposit.
    pub fn deposit(&mut self, raw: &str) -> Result<Money, DepositError> {
        let before = self.session.balance();
        let balance = self.session.deposit(raw)?;
        self.transactions
            .record("FEED MONEY", balance - before, balance);
        tracing::debug!(session = %self.session.id(), %balance, "deposit accepted");
        Ok(balance)
    }

    /// Attempts a purchase. On success the transaction record and the sale
    /// event are both emitted; sink failures are the sinks' problem and
    /// never roll the purchase back.
    pub fn purchase(&mut self, id: &str) -> Result<Product, PurchaseError> {
        let product = self.session.purchase(&mut self.inventory, id)?;
        let balance = self.session.balance();
        let label = format!("{} {}", product.name, product.id);
        self.transactions.record(&label, product.price, balance);
        self.sales.record_sale(&product);
        tracing::debug!(session = %self.session.id(), id = %product.id, %balance, "purchase applied");
        Ok(product)
    }

    /// Finishes the current session: dispenses all remaining balance as
    /// change, records the payout when there is one, and starts a fresh
    /// idle session.
    pub fn finish(&mut self) -> SessionReceipt {
        let total = self.session.balance();
        let change = self.session.finish();
        if !total.is_zero() {
            self.transactions
                .record("DISPENSE CHANGE", total, Money::zero());
        }
        let receipt = SessionReceipt {
            session_id: self.session.id(),
            change,
            total,
        };
        tracing::debug!(session = %receipt.session_id, %total, "session finished");
        self.session = Session::new();
        receipt
    }
}
